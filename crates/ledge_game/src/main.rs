//! Ledge runner.
//!
//! Drives the level without a window: every fixed tick takes the next entry of
//! a replay (a JSON key script, or the built-in demo) and feeds it through the
//! engine. Draw commands go to a [`FrameRecorder`] so the full frame path is
//! exercised. With `--realtime` the loop is paced against the wall clock the
//! same way a windowed build would be.

use std::path::PathBuf;
use std::time::Duration;

use ledge_core::config::{load_config_from_path, GameConfig};
use ledge_core::input::InputEvent;
use ledge_core::time::FrameClock;
use ledge_game::engine::Engine;
use ledge_game::render::FrameRecorder;
use ledge_game::replay::{load_replay_from_path, ReplaySequence};
use ledge_game::scene::LevelScene;

const LEVEL_SCENE: &str = "level_1";

struct RunnerArgs {
    config: Option<PathBuf>,
    replay: Option<PathBuf>,
    max_frames: Option<u64>,
    realtime: bool,
}

fn usage() -> String {
    "Usage: ledge [--config <game.json>] [--replay <replay.json>] [--frames <n>] [--realtime]\nExample: cargo run -p ledge_game -- --replay assets/replays/demo.json --frames 600".to_string()
}

fn parse_args(args: &[String]) -> Result<RunnerArgs, String> {
    let mut parsed = RunnerArgs {
        config: None,
        replay: None,
        max_frames: None,
        realtime: false,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or_else(usage)?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--replay" => {
                let value = iter.next().ok_or_else(usage)?;
                parsed.replay = Some(PathBuf::from(value));
            }
            "--frames" => {
                let value = iter.next().ok_or_else(usage)?;
                let frames = value
                    .parse::<u64>()
                    .map_err(|e| format!("Invalid frame count '{value}': {e}"))?;
                parsed.max_frames = Some(frames);
            }
            "--realtime" => parsed.realtime = true,
            "--help" | "-h" => return Err(usage()),
            other => return Err(format!("Unknown argument '{other}'\n{}", usage())),
        }
    }
    Ok(parsed)
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    log::info!("Ledge starting...");

    let config = match &args.config {
        Some(path) => load_config_from_path(path).unwrap_or_else(|err| {
            log::warn!("{err}; using default config");
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };

    let replay = match &args.replay {
        Some(path) => load_replay_from_path(path).unwrap_or_else(|err| {
            log::error!("{err}; running built-in demo");
            ReplaySequence::demo()
        }),
        None => ReplaySequence::demo(),
    };

    let mut clock = FrameClock::new(config.fps);
    if (replay.fixed_dt_ms as f64 - clock.fixed_dt_ms).abs() > 0.01 {
        log::warn!(
            "Replay was recorded at {:.3}ms per tick, stepping at {:.3}ms",
            replay.fixed_dt_ms,
            clock.fixed_dt_ms
        );
    }

    log::info!(
        "{} ({}x{} @ {} fps)",
        config.title,
        config.screen_width,
        config.screen_height,
        config.fps
    );

    let mut engine = Engine::new();
    engine.register_scene(
        LEVEL_SCENE,
        Box::new(LevelScene::new(LEVEL_SCENE, config.clone())),
    );
    engine.set_scene(LEVEL_SCENE);

    let mut ticks = replay.expanded_events().into_iter();
    let mut recorder = FrameRecorder::new();
    let dt_ms = config.frame_ms();
    let report_every = u64::from(config.fps.max(1));

    'run: while engine.is_running() {
        if args.realtime {
            clock.begin_frame_now();
        } else {
            clock.begin_frame(clock.fixed_dt_ms);
        }

        while clock.should_step() {
            if args
                .max_frames
                .is_some_and(|limit| clock.fixed_step_count > limit)
            {
                log::info!("Frame limit reached");
                break 'run;
            }
            let Some(events) = ticks.next() else {
                log::info!("Replay finished");
                break 'run;
            };

            recorder.clear();
            step_frame(&mut engine, dt_ms, &events, &mut recorder);

            if clock.fixed_step_count % report_every == 0 {
                if let Some(hud) = engine.hud() {
                    log::info!(
                        "t={:.1}s score={} health={}/{} draws={}",
                        clock.total_time_ms / 1000.0,
                        hud.score,
                        hud.health,
                        hud.max_health,
                        recorder.len()
                    );
                }
            }
            if !engine.is_running() {
                break 'run;
            }
        }

        if args.realtime {
            let wait_ms = clock.time_until_next_step_ms();
            std::thread::sleep(Duration::from_secs_f64(wait_ms / 1000.0));
        }
    }

    match engine.hud() {
        Some(hud) => log::info!(
            "Finished after {} frames: score={} health={}/{}",
            engine.frame_count(),
            hud.score,
            hud.health,
            hud.max_health
        ),
        None => log::info!("Finished after {} frames", engine.frame_count()),
    }
    Ok(())
}

fn step_frame(engine: &mut Engine, dt_ms: f32, events: &[InputEvent], recorder: &mut FrameRecorder) {
    engine.step(dt_ms, events, recorder);
    if recorder.sprite_count() > 0 {
        log::trace!("Frame {} drew {} sprites", engine.frame_count(), recorder.sprite_count());
    }
}
