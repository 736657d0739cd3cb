//! Immutable game configuration threaded through constructors.
//!
//! Every tunable that the simulation reads (screen size, gravity, player
//! speeds, invincibility windows) lives in [`GameConfig`]. Nothing in the
//! update path reads module-level globals; scenes and entities receive a
//! reference or a copy of the config when they are built.
//!
//! Units follow the frame-stepped model: velocities are pixels per tick,
//! timers are milliseconds. The screen uses y-down coordinates.
//!
//! A config can be loaded from JSON. Missing fields fall back to the
//! built-in defaults, so a partial file only overrides what it names.

use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,

    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    #[serde(default = "default_jump_power")]
    pub jump_power: f32,
    #[serde(default = "default_max_fall_speed")]
    pub max_fall_speed: f32,

    #[serde(default = "default_player_width")]
    pub player_width: u32,
    #[serde(default = "default_player_height")]
    pub player_height: u32,
    #[serde(default = "default_player_spawn")]
    pub player_spawn: Point,
    #[serde(default = "default_max_health")]
    pub max_health: i32,

    /// Player y beyond which the fall-reset fires. Sits past the bottom of the
    /// default 720px screen.
    #[serde(default = "default_fall_limit_y")]
    pub fall_limit_y: f32,
    #[serde(default = "default_fall_reset")]
    pub fall_reset: Point,

    #[serde(default = "default_hit_invincibility_ms")]
    pub hit_invincibility_ms: f32,
    #[serde(default = "default_respawn_invincibility_ms")]
    pub respawn_invincibility_ms: f32,
    #[serde(default = "default_knockback_vy")]
    pub knockback_vy: f32,
    /// Half-period of the invincibility blink, in ms.
    #[serde(default = "default_blink_period_ms")]
    pub blink_period_ms: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            fps: default_fps(),
            gravity: default_gravity(),
            player_speed: default_player_speed(),
            jump_power: default_jump_power(),
            max_fall_speed: default_max_fall_speed(),
            player_width: default_player_width(),
            player_height: default_player_height(),
            player_spawn: default_player_spawn(),
            max_health: default_max_health(),
            fall_limit_y: default_fall_limit_y(),
            fall_reset: default_fall_reset(),
            hit_invincibility_ms: default_hit_invincibility_ms(),
            respawn_invincibility_ms: default_respawn_invincibility_ms(),
            knockback_vy: default_knockback_vy(),
            blink_period_ms: default_blink_period_ms(),
        }
    }
}

impl GameConfig {
    /// Duration of one simulation tick in milliseconds.
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.fps as f32
    }

    /// Upward velocity applied to the player after stomping an enemy.
    pub fn stomp_bounce_vy(&self) -> f32 {
        -self.jump_power / 2.0
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    log::info!(
        "Config loaded from {}: {}x{} @ {} fps",
        path.display(),
        config.screen_width,
        config.screen_height,
        config.fps
    );
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.screen_width == 0 || config.screen_height == 0 {
        return Err("Config validation failed: screen size must be > 0".to_string());
    }
    if config.fps == 0 {
        return Err("Config validation failed: fps must be > 0".to_string());
    }
    if !config.gravity.is_finite() || config.gravity < 0.0 {
        return Err("Config validation failed: gravity must be finite and >= 0".to_string());
    }
    if !config.max_fall_speed.is_finite() || config.max_fall_speed <= 0.0 {
        return Err("Config validation failed: max_fall_speed must be > 0".to_string());
    }
    if config.player_width == 0 || config.player_height == 0 {
        return Err("Config validation failed: player size must be > 0".to_string());
    }
    if config.max_health <= 0 {
        return Err("Config validation failed: max_health must be > 0".to_string());
    }
    let finite = [
        ("player_speed", config.player_speed),
        ("jump_power", config.jump_power),
        ("knockback_vy", config.knockback_vy),
        ("fall_limit_y", config.fall_limit_y),
        ("fall_reset.x", config.fall_reset.x),
        ("fall_reset.y", config.fall_reset.y),
        ("player_spawn.x", config.player_spawn.x),
        ("player_spawn.y", config.player_spawn.y),
        ("hit_invincibility_ms", config.hit_invincibility_ms),
        ("respawn_invincibility_ms", config.respawn_invincibility_ms),
    ];
    for (name, value) in finite {
        if !value.is_finite() {
            return Err(format!("Config validation failed: {name} must be finite"));
        }
    }
    if !config.blink_period_ms.is_finite() || config.blink_period_ms <= 0.0 {
        return Err("Config validation failed: blink_period_ms must be > 0".to_string());
    }
    Ok(())
}

fn default_title() -> String {
    "Ledge".to_string()
}

const fn default_screen_width() -> u32 {
    1280
}

const fn default_screen_height() -> u32 {
    720
}

const fn default_fps() -> u32 {
    60
}

const fn default_gravity() -> f32 {
    0.6
}

const fn default_player_speed() -> f32 {
    5.0
}

const fn default_jump_power() -> f32 {
    15.0
}

const fn default_max_fall_speed() -> f32 {
    20.0
}

const fn default_player_width() -> u32 {
    80
}

const fn default_player_height() -> u32 {
    120
}

const fn default_player_spawn() -> Point {
    Point { x: 100.0, y: 100.0 }
}

const fn default_max_health() -> i32 {
    3
}

const fn default_fall_limit_y() -> f32 {
    800.0
}

const fn default_fall_reset() -> Point {
    Point { x: 100.0, y: 100.0 }
}

const fn default_hit_invincibility_ms() -> f32 {
    1000.0
}

const fn default_respawn_invincibility_ms() -> f32 {
    1500.0
}

const fn default_knockback_vy() -> f32 {
    -6.0
}

const fn default_blink_period_ms() -> f32 {
    100.0
}
