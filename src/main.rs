//! Volley headless runner
//!
//! Plays one match between two tracking paddles and prints the result.
//!
//! Usage: `volley [seed] [tuning.json] [save-dir]`

use std::env;
use std::fs;
use std::process::ExitCode;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use volley::consts::*;
use volley::sim::{Card, CardKind, CardPickup, Game, GameEvent, Side, TickInput};
use volley::{AudioManager, SaveStore, Settings, Tuning};

/// Paddle travel per second at full responsiveness
const PADDLE_SPEED: f32 = 7.0;
/// Longest match before giving up, in real seconds
const MAX_MATCH_SECONDS: f32 = 60.0 * 30.0;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let tuning = match args.get(1) {
        Some(path) => match load_tuning(path) {
            Ok(t) => t,
            Err(e) => {
                log::error!("Bad tuning file {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let store = args.get(2).map(SaveStore::in_dir);
    let saved = match store.as_ref().map(SaveStore::load) {
        Some(Ok(save)) => save,
        Some(Err(e)) => {
            log::warn!("Ignoring unreadable save: {}", e);
            None
        }
        None => None,
    };
    let mut settings = Settings::default();
    if let Some(save) = &saved {
        settings.apply_save(save);
    }

    let mut mixer = AudioManager::new(seed);
    settings.apply_to_audio(&mut mixer);
    let audio = Rc::new(mixer);

    let mut game = match Game::seeded(&tuning, seed, audio.clone()) {
        Ok(g) => g,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(save) = &saved {
        game.restore(save);
        if game.is_over() {
            log::info!("Saved match already finished, starting a new one");
            game.replay();
        }
    }

    log::info!("Volley starting with seed: {}", seed);

    let mut rng = Pcg32::seed_from_u64(seed ^ 0xCA4D);
    scatter_pickups(&mut game, &mut rng);

    let mut paddles = [0.0_f32; 2];
    let mut elapsed = 0.0;
    while !game.is_over() && elapsed < MAX_MATCH_SECONDS {
        let input = TickInput {
            paddle_y: paddles,
            play_card: choose_card(&game),
        };

        for event in game.frame(SIM_DT, &input) {
            match event {
                GameEvent::Goal { conceding, outcome } => {
                    log::info!(
                        "{:?} conceded ({} - {}), {:?}",
                        conceding,
                        game.match_state.left_score(),
                        game.match_state.right_score(),
                        outcome
                    );
                }
                GameEvent::Served { .. } => scatter_pickups(&mut game, &mut rng),
                other => log::debug!("{:?}", other),
            }
        }
        for cue in audio.drain_cues() {
            log::trace!("cue {:?}", cue);
        }

        let step = PADDLE_SPEED * settings.ai_responsiveness * SIM_DT;
        let ball_y = game.ball.position().y;
        for y in &mut paddles {
            *y += (ball_y - *y).clamp(-step, step);
        }
        elapsed += SIM_DT;
    }

    let (left, right) = (game.match_state.left_score(), game.match_state.right_score());
    match game.match_state.winner() {
        Some(winner) => println!("{:?} wins {} - {}", winner, left, right),
        None => println!("No winner after {:.0}s: {} - {}", elapsed, left, right),
    }

    if let Some(store) = &store {
        let mut save = game.snapshot(&settings);
        if let Err(e) = store.save(&mut save) {
            log::warn!("Failed to save: {}", e);
        }
    }

    ExitCode::SUCCESS
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(Tuning::from_json_str(&json)?)
}

/// Top the court up to two pickups at random spots
fn scatter_pickups(game: &mut Game, rng: &mut Pcg32) {
    const KINDS: [CardKind; 3] = [CardKind::SpeedBoost, CardKind::ShieldWall, CardKind::TimeSlow];

    while game.arena.pickups.len() < 2 {
        let kind = KINDS[rng.random_range(0..KINDS.len())];
        let card = match kind {
            CardKind::SpeedBoost => Card::new(kind, 1.3, 0.0),
            CardKind::ShieldWall => Card::new(kind, 1.0, 3.0),
            CardKind::TimeSlow => Card::new(kind, 0.6, 2.0),
        };
        let pos = Vec2::new(
            rng.random_range(-4.0..=4.0),
            rng.random_range(-3.5..=3.5),
        );
        game.place_pickup(CardPickup {
            pos,
            radius: 0.5,
            card,
        });
    }
}

/// Play the first card of whichever side the ball is heading toward
fn choose_card(game: &Game) -> Option<(Side, usize)> {
    if !game.is_ball_in_play() {
        return None;
    }
    let defending = if game.ball.velocity().x < 0.0 {
        Side::Left
    } else {
        Side::Right
    };
    if game.hand(defending).cards().is_empty() {
        None
    } else {
        Some((defending, 0))
    }
}
