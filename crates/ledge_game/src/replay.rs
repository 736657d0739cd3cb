use ledge_core::input::{InputEvent, Key};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt_ms")]
    pub fixed_dt_ms: f32,
    pub frames: Vec<ReplayFrame>,
}

/// Keys held for `repeat` consecutive ticks. Presses and releases are derived
/// from the difference to the previous frame.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<String>,
    #[serde(default)]
    pub quit: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    fn keys(&self) -> HashSet<Key> {
        self.held.iter().filter_map(|name| Key::from_name(name)).collect()
    }
}

impl ReplaySequence {
    /// A short scripted run through the default level: walk right, hop onto
    /// the first platform, walk back left and close the level.
    pub fn demo() -> Self {
        let frame = |held: &[&str], repeat: u32| ReplayFrame {
            held: held.iter().map(|k| k.to_string()).collect(),
            quit: false,
            repeat,
        };
        Self {
            fixed_dt_ms: default_dt_ms(),
            frames: vec![
                frame(&[], 30),
                frame(&["right"], 60),
                frame(&["right", "space"], 1),
                frame(&["right"], 40),
                frame(&[], 20),
                frame(&["left", "w"], 1),
                frame(&["left"], 90),
                frame(&[], 30),
                frame(&["escape"], 1),
            ],
        }
    }

    pub fn tick_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }

    /// Events to feed the engine before each tick, one entry per tick.
    pub fn expanded_events(&self) -> Vec<Vec<InputEvent>> {
        let mut out = Vec::with_capacity(self.tick_count());
        let mut previous: HashSet<Key> = HashSet::new();
        for frame in &self.frames {
            let keys = frame.keys();
            for tick in 0..frame.repeat.max(1) {
                let mut events = Vec::new();
                if tick == 0 {
                    let mut released: Vec<Key> = previous.difference(&keys).copied().collect();
                    let mut pressed: Vec<Key> = keys.difference(&previous).copied().collect();
                    // HashSet order is unspecified; keep the event stream stable.
                    released.sort_by_key(|k| *k as u8);
                    pressed.sort_by_key(|k| *k as u8);
                    events.extend(released.into_iter().map(InputEvent::KeyUp));
                    events.extend(pressed.into_iter().map(InputEvent::KeyDown));
                    if frame.quit {
                        events.push(InputEvent::Quit);
                    }
                }
                out.push(events);
            }
            previous = keys;
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    log::info!(
        "Loaded replay {} ({} ticks)",
        path.display(),
        replay.tick_count()
    );
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt_ms <= 0.0 {
        return Err("Replay validation failed: fixed_dt_ms must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    for (i, frame) in replay.frames.iter().enumerate() {
        for name in &frame.held {
            if Key::from_name(name).is_none() {
                return Err(format!(
                    "Replay validation failed: frame {i} holds unknown key '{name}'"
                ));
            }
        }
    }
    Ok(())
}

fn default_dt_ms() -> f32 {
    1000.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::entity::Entity;
    use crate::render::FrameRecorder;
    use crate::scene::{HudStats, LevelScene, Scene};
    use ledge_core::config::GameConfig;
    use ledge_core::input::InputState;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ledge_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn run_engine(replay: &ReplaySequence) -> HudStats {
        let mut engine = Engine::new();
        engine.register_scene(
            "level_1",
            Box::new(LevelScene::new("level_1", GameConfig::default())),
        );
        engine.set_scene("level_1");
        let mut recorder = FrameRecorder::new();
        for events in replay.expanded_events() {
            recorder.clear();
            engine.step(replay.fixed_dt_ms, &events, &mut recorder);
        }
        engine.hud().expect("level has a hud")
    }

    fn run_level(replay: &ReplaySequence) -> LevelScene {
        let mut scene = LevelScene::new("level_1", GameConfig::default());
        let mut input = InputState::new();
        for events in replay.expanded_events() {
            for event in &events {
                input.apply(*event);
                scene.handle_event(*event);
            }
            if scene.is_active() {
                scene.update(replay.fixed_dt_ms, &input);
            }
            input.end_frame();
        }
        scene
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt_ms": 16.0,
              "frames": [
                { "held": ["right"], "repeat": 3 },
                { "held": ["right", "space"] },
                { "held": [], "quit": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_events();
        assert_eq!(expanded.len(), 5);
        assert_eq!(expanded[0], vec![InputEvent::KeyDown(Key::Right)]);
        assert!(expanded[1].is_empty());
        assert_eq!(expanded[3], vec![InputEvent::KeyDown(Key::Space)]);
        assert_eq!(
            expanded[4],
            vec![
                InputEvent::KeyUp(Key::Right),
                InputEvent::KeyUp(Key::Space),
                InputEvent::Quit
            ]
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let path = temp_file_path("bad_key");
        fs::write(&path, r#"{ "frames": [ { "held": ["jetpack"] } ] }"#)
            .expect("write replay file");

        let err = load_replay_from_path(&path).expect_err("unknown key should fail");
        assert!(err.contains("unknown key 'jetpack'"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_frames_and_bad_dt_are_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);

        let path = temp_file_path("bad_dt");
        fs::write(&path, r#"{ "fixed_dt_ms": 0, "frames": [ {} ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero dt should fail");
        assert!(err.contains("fixed_dt_ms must be > 0"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn demo_ends_by_closing_the_level() {
        let replay = ReplaySequence::demo();
        assert!(validate_replay(&replay).is_ok());
        let scene = run_level(&replay);
        assert!(!scene.is_active());
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = ReplaySequence::demo();

        let a = run_level(&replay);
        let b = run_level(&replay);
        let pa = a.player().expect("player");
        let pb = b.player().expect("player");

        assert_eq!(pa.body().position(), pb.body().position());
        assert_eq!(pa.velocity(), pb.velocity());
        assert_eq!(pa.grounded, pb.grounded);
        assert_eq!(pa.health, pb.health);
        assert_eq!(a.score(), b.score());

        let hud = run_engine(&replay);
        assert_eq!(hud, run_engine(&replay));
        assert_eq!(hud.score, a.score());
        assert_eq!(hud.health, pa.health);
    }
}
