use crate::collision::{overlaps, resolve_direction, Direction, Rect};
use crate::entity::{Body, Entity};
use crate::render::{Color, DrawCommand, DrawTarget};
use glam::Vec2;
use ledge_core::animation::{AnimationClip, AnimationController};
use ledge_core::config::GameConfig;
use ledge_core::input::{InputState, Key};

const LEFT_KEYS: &[Key] = &[Key::Left, Key::A];
const RIGHT_KEYS: &[Key] = &[Key::Right, Key::D];
const JUMP_KEYS: &[Key] = &[Key::Space, Key::W];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// -1 left, 0 idle, +1 right.
    pub move_x: f32,
    pub jump_pressed: bool,
}

impl PlayerInput {
    /// Left wins when both directions are held.
    pub fn from_keys(input: &InputState) -> Self {
        let move_x = if input.any_held(LEFT_KEYS) {
            -1.0
        } else if input.any_held(RIGHT_KEYS) {
            1.0
        } else {
            0.0
        };
        Self {
            move_x,
            jump_pressed: input.any_just_pressed(JUMP_KEYS),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    pub speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub fall_limit_y: f32,
    pub fall_reset: Vec2,
    pub max_health: i32,
    pub hit_invincibility_ms: f32,
    pub respawn_invincibility_ms: f32,
    pub knockback_vy: f32,
    pub blink_period_ms: f32,
}

impl PlayerTuning {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            speed: config.player_speed,
            jump_power: config.jump_power,
            gravity: config.gravity,
            max_fall_speed: config.max_fall_speed,
            fall_limit_y: config.fall_limit_y,
            fall_reset: config.fall_reset.to_vec2(),
            max_health: config.max_health,
            hit_invincibility_ms: config.hit_invincibility_ms,
            respawn_invincibility_ms: config.respawn_invincibility_ms,
            knockback_vy: config.knockback_vy,
            blink_period_ms: config.blink_period_ms,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Idle,
    Run,
    Jump,
    Fall,
}

impl Pose {
    pub fn clip_name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    /// +1 facing right, -1 facing left.
    pub direction: i32,
    pub grounded: bool,
    pub can_jump: bool,
    pub jumping: bool,
    pub jump_count: u32,
    pub health: i32,
    pub max_health: i32,
    pub spawn: Vec2,
    pub invincible: bool,
    pub invincible_timer_ms: f32,
    pub tuning: PlayerTuning,
    animation: AnimationController,
}

impl Player {
    pub fn new(x: f32, y: f32, config: &GameConfig) -> Self {
        let tuning = PlayerTuning::from_config(config);
        let mut animation = build_animations();
        animation.play(Pose::Idle.clip_name());
        Self {
            body: Body::new(x, y, config.player_width, config.player_height),
            direction: 1,
            grounded: false,
            can_jump: true,
            jumping: false,
            jump_count: 0,
            health: tuning.max_health,
            max_health: tuning.max_health,
            spawn: Vec2::new(x, y),
            invincible: false,
            invincible_timer_ms: 0.0,
            tuning,
            animation,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn set_velocity_y(&mut self, vy: f32) {
        self.body.velocity.y = vy;
    }

    pub fn handle_input(&mut self, input: PlayerInput) {
        if input.move_x < 0.0 {
            self.body.velocity.x = -self.tuning.speed;
            self.direction = -1;
        } else if input.move_x > 0.0 {
            self.body.velocity.x = self.tuning.speed;
            self.direction = 1;
        } else {
            self.body.velocity.x = 0.0;
        }

        // Permission, not grounded state, gates the jump; it is restored on landing.
        if input.jump_pressed && self.can_jump {
            self.body.velocity.y = -self.tuning.jump_power;
            self.grounded = false;
            self.can_jump = false;
            self.jumping = true;
            self.jump_count += 1;
        }
    }

    /// One physics tick against the static solids of the level.
    pub fn update_with_solids(&mut self, dt_ms: f32, solids: &[Rect]) {
        if self.invincible {
            self.invincible_timer_ms -= dt_ms;
            if self.invincible_timer_ms <= 0.0 {
                self.invincible = false;
                self.invincible_timer_ms = 0.0;
            }
        }

        self.body.velocity.y =
            (self.body.velocity.y + self.tuning.gravity).min(self.tuning.max_fall_speed);

        let velocity = self.body.velocity;
        self.body.move_by(velocity.x, velocity.y);

        if !solids.is_empty() {
            self.resolve_solids(solids);
        }

        if self.grounded {
            self.can_jump = true;
            self.jump_count = 0;
            if self.body.velocity.y > 0.0 {
                self.body.velocity.y = 0.0;
            }
        }

        if self.body.y() > self.tuning.fall_limit_y {
            self.on_fall();
        }

        self.animation.play(self.pose().clip_name());
        self.animation.tick_ms(dt_ms);
    }

    /// Each overlapping solid is resolved on its own, in list order. Corner
    /// cases touching several solids at once depend on that order.
    fn resolve_solids(&mut self, solids: &[Rect]) {
        self.grounded = false;

        for solid in solids {
            let rect = self.body.rect();
            if !overlaps(rect, *solid) {
                continue;
            }

            let vy = self.body.velocity.y;
            match resolve_direction(rect, *solid) {
                Direction::Top if vy >= 0.0 => {
                    let y = solid.top() - rect.h;
                    self.body.set_position(rect.x, y);
                    self.body.velocity.y = 0.0;
                    self.jumping = false;
                    self.grounded = true;
                }
                Direction::Bottom if vy < 0.0 => {
                    self.body.set_position(rect.x, solid.bottom());
                    self.body.velocity.y = 0.0;
                }
                Direction::Left => {
                    self.body.set_position(solid.left() - rect.w, rect.y);
                    self.body.velocity.x = 0.0;
                }
                Direction::Right => {
                    self.body.set_position(solid.right(), rect.y);
                    self.body.velocity.x = 0.0;
                }
                _ => {}
            }
        }
    }

    /// Returns false when the hit was absorbed by invincibility.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.invincible {
            return false;
        }
        self.health -= amount;
        self.invincible = true;
        self.invincible_timer_ms = self.tuning.hit_invincibility_ms;
        self.body.velocity.y = self.tuning.knockback_vy;
        log::debug!("Player hit: health {}/{}", self.health, self.max_health);

        if self.health <= 0 {
            self.on_death();
        }
        true
    }

    pub fn on_death(&mut self) {
        log::info!("Player died, respawning at ({}, {})", self.spawn.x, self.spawn.y);
        self.body.set_position(self.spawn.x, self.spawn.y);
        self.health = self.max_health;
        self.invincible = true;
        self.invincible_timer_ms = self.tuning.respawn_invincibility_ms;
    }

    /// Positional reset after leaving the level or touching a hazard. Health
    /// and velocity are left alone, and the target is the fall-reset point,
    /// not the spawn.
    pub fn on_fall(&mut self) {
        let target = self.tuning.fall_reset;
        log::debug!("Player fall reset to ({}, {})", target.x, target.y);
        self.body.set_position(target.x, target.y);
    }

    pub fn pose(&self) -> Pose {
        if !self.grounded {
            if self.body.velocity.y < 0.0 {
                Pose::Jump
            } else {
                Pose::Fall
            }
        } else if self.body.velocity.x != 0.0 {
            Pose::Run
        } else {
            Pose::Idle
        }
    }

    /// True on the "off" half of the invincibility blink.
    pub fn blink_hidden(&self) -> bool {
        if !self.invincible {
            return false;
        }
        let phase = (self.invincible_timer_ms / self.tuning.blink_period_ms) as i64;
        phase % 2 == 0
    }

    pub fn current_sprite(&self) -> Option<&str> {
        self.animation.current_sprite()
    }

    fn draw_fallback(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        let rect = self.body.rect();
        let x = rect.x;
        let y = rect.y;
        target.submit(DrawCommand::Circle {
            center: Vec2::new(x + rect.w * 0.5, y + 10.0),
            radius: 8.0,
            color: Color::YELLOW,
            outline: None,
        })?;
        target.submit(DrawCommand::Rect {
            rect: Rect::new(x + 8.0, y + 18.0, 16.0, 20.0),
            color: Color::YELLOW,
            outline: None,
        })?;
        for arm in [Rect::new(x, y + 21.0, 8.0, 3.0), Rect::new(x + 24.0, y + 21.0, 8.0, 3.0)] {
            target.submit(DrawCommand::Rect {
                rect: arm,
                color: Color::YELLOW,
                outline: None,
            })?;
        }
        Ok(())
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt_ms: f32) {
        self.update_with_solids(dt_ms, &[]);
    }

    fn draw(&self, target: &mut dyn DrawTarget) -> Result<(), String> {
        if self.blink_hidden() {
            return Ok(());
        }
        if let Some(sprite_id) = self.animation.current_sprite() {
            let command = DrawCommand::Sprite {
                sprite_id: sprite_id.to_string(),
                rect: self.body.rect(),
                flip_x: self.direction < 0,
            };
            match target.submit(command) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    log::debug!("Player sprite '{}' rejected ({err}); drawing fallback", sprite_id);
                }
            }
        }
        self.draw_fallback(target)
    }
}

fn build_animations() -> AnimationController {
    let mut animation = AnimationController::new();
    animation.add_clip(
        Pose::Idle.clip_name(),
        AnimationClip::uniform(&["player_idle_0", "player_idle_1"], 400, true),
    );
    animation.add_clip(
        Pose::Run.clip_name(),
        AnimationClip::uniform(
            &["player_run_0", "player_run_1", "player_run_2", "player_run_3"],
            100,
            true,
        ),
    );
    animation.add_clip(
        Pose::Jump.clip_name(),
        AnimationClip::uniform(&["player_jump_0"], 100, false),
    );
    animation.add_clip(
        Pose::Fall.clip_name(),
        AnimationClip::uniform(&["player_fall_0"], 100, false),
    );
    animation
}
