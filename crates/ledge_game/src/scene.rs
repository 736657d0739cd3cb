//! Scenes and the level orchestration.
//!
//! A scene exclusively owns its entities. Storage is an insertion-ordered list
//! of tagged [`SceneEntity`] slots; the typed lists (solids, spikes, enemies,
//! collectibles) hold ids into that list and are filled as entities are added,
//! so collision dispatch never needs to inspect types at runtime.
//!
//! Per-frame order inside [`LevelScene::update`] is fixed: input, entity
//! updates, collectibles, hazards, enemies. Later passes read positions the
//! earlier ones produced in the same frame.

use crate::collision::{overlaps, resolve_direction, Direction, Rect};
use crate::enemy::{live_rect, PatrolEnemy};
use crate::entity::Entity;
use crate::player::{Player, PlayerInput};
use crate::render::{Color, DrawCommand, DrawTarget};
use crate::world::{Collectible, Platform, Spike, Wall, DEFAULT_COLLECTIBLE_VALUE, DEFAULT_SPIKE_SIZE};
use ledge_core::config::GameConfig;
use ledge_core::input::{InputEvent, InputState, Key};

const BACKGROUND: Color = Color::rgb(50, 50, 50);
const SKY: Color = Color::rgb(135, 206, 235);
const GRASS: Color = Color::rgb(100, 150, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudStats {
    pub score: u32,
    pub health: i32,
    pub max_health: i32,
}

pub trait Scene {
    fn name(&self) -> &str;

    /// Build (or rebuild) the scene's contents.
    fn setup(&mut self);

    fn handle_event(&mut self, event: InputEvent);

    fn update(&mut self, dt_ms: f32, input: &InputState);

    fn draw(&self, target: &mut dyn DrawTarget);

    fn is_active(&self) -> bool;

    fn hud(&self) -> Option<HudStats> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Platform,
    Wall,
    Spike,
    Collectible,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

#[derive(Debug, Clone)]
pub enum SceneEntity {
    Player(Player),
    Platform(Platform),
    Wall(Wall),
    Spike(Spike),
    Collectible(Collectible),
    Enemy(PatrolEnemy),
}

impl SceneEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Platform(_) => EntityKind::Platform,
            Self::Wall(_) => EntityKind::Wall,
            Self::Spike(_) => EntityKind::Spike,
            Self::Collectible(_) => EntityKind::Collectible,
            Self::Enemy(_) => EntityKind::Enemy,
        }
    }

    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            Self::Player(e) => e,
            Self::Platform(e) => e,
            Self::Wall(e) => e,
            Self::Spike(e) => e,
            Self::Collectible(e) => e,
            Self::Enemy(e) => e,
        }
    }

    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            Self::Player(e) => e,
            Self::Platform(e) => e,
            Self::Wall(e) => e,
            Self::Spike(e) => e,
            Self::Collectible(e) => e,
            Self::Enemy(e) => e,
        }
    }
}

pub struct LevelScene {
    name: String,
    config: GameConfig,
    entities: Vec<Option<SceneEntity>>,
    player: Option<EntityId>,
    solids: Vec<EntityId>,
    spikes: Vec<EntityId>,
    enemies: Vec<EntityId>,
    collectibles: Vec<EntityId>,
    score: u32,
    active: bool,
}

impl LevelScene {
    pub fn new(name: &str, config: GameConfig) -> Self {
        let mut scene = Self::empty(name, config);
        scene.setup();
        scene
    }

    /// A scene with no entities; callers place everything themselves.
    pub fn empty(name: &str, config: GameConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            entities: Vec::new(),
            player: None,
            solids: Vec::new(),
            spikes: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            score: 0,
            active: true,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn add_entity(&mut self, entity: SceneEntity) -> EntityId {
        let id = EntityId(self.entities.len());
        match entity.kind() {
            EntityKind::Player => {
                if let Some(previous) = self.player.replace(id) {
                    log::warn!("Scene '{}' already has a player ({:?}); replacing", self.name, previous);
                    if let Some(slot) = self.entities.get_mut(previous.0) {
                        *slot = None;
                    }
                }
            }
            EntityKind::Platform | EntityKind::Wall => self.solids.push(id),
            EntityKind::Spike => self.spikes.push(id),
            EntityKind::Collectible => self.collectibles.push(id),
            EntityKind::Enemy => self.enemies.push(id),
        }
        self.entities.push(Some(entity));
        id
    }

    /// Drops an entity from storage and from every typed list. The player
    /// cannot be removed.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if self.player == Some(id) {
            log::warn!("Refusing to remove the player from scene '{}'", self.name);
            return false;
        }
        let Some(slot) = self.entities.get_mut(id.0) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        for list in [
            &mut self.solids,
            &mut self.spikes,
            &mut self.enemies,
            &mut self.collectibles,
        ] {
            list.retain(|other| *other != id);
        }
        true
    }

    pub fn entity(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(id.0).and_then(Option::as_ref)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        self.entities.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Ids of live slots of `kind`, in insertion order.
    pub fn entities_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Some(entity) if entity.kind() == kind => Some(EntityId(i)),
                _ => None,
            })
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.iter().flatten().count()
    }

    pub fn player(&self) -> Option<&Player> {
        match self.entity(self.player?) {
            Some(SceneEntity::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        let id = self.player?;
        match self.entity_mut(id) {
            Some(SceneEntity::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn enemy(&self, id: EntityId) -> Option<&PatrolEnemy> {
        match self.entity(id) {
            Some(SceneEntity::Enemy(enemy)) => Some(enemy),
            _ => None,
        }
    }

    pub fn collectible(&self, id: EntityId) -> Option<&Collectible> {
        match self.entity(id) {
            Some(SceneEntity::Collectible(item)) => Some(item),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    fn solid_rects(&self) -> Vec<Rect> {
        self.solids
            .iter()
            .filter_map(|id| self.entity(*id))
            .map(|e| e.as_entity().rect())
            .collect()
    }

    fn update_entities(&mut self, dt_ms: f32) {
        let solids = self.solid_rects();
        for entity in self.entities.iter_mut().flatten() {
            match entity {
                SceneEntity::Player(player) => player.update_with_solids(dt_ms, &solids),
                other => other.as_entity_mut().update(dt_ms),
            }
        }
    }

    fn collectible_pass(&mut self) {
        let Some(player_rect) = self.player().map(|p| p.rect()) else {
            return;
        };
        let mut gained: u32 = 0;
        for id in &self.collectibles {
            let Some(Some(SceneEntity::Collectible(item))) = self.entities.get_mut(id.0) else {
                continue;
            };
            if item.is_collected() || !overlaps(player_rect, item.rect()) {
                continue;
            }
            if let Some(value) = item.collect() {
                log::debug!("Collected item worth {}", value);
                gained = gained.saturating_add(value);
            }
        }
        self.score = self.score.saturating_add(gained);
    }

    fn hazard_pass(&mut self) {
        for id in self.spikes.clone() {
            let Some(spike_rect) = self
                .entity(id)
                .map(SceneEntity::as_entity)
                .filter(|e| e.is_active())
                .map(|e| e.rect())
            else {
                continue;
            };
            let Some(player) = self.player_mut() else {
                return;
            };
            if overlaps(player.rect(), spike_rect) {
                log::debug!("Player touched spike {:?}", id);
                player.on_fall();
            }
        }
    }

    fn enemy_pass(&mut self) {
        let bounce_vy = self.config.stomp_bounce_vy();
        for id in self.enemies.clone() {
            let Some(enemy_rect) = self.enemy(id).and_then(live_rect) else {
                continue;
            };
            let Some(player) = self.player() else {
                return;
            };
            let player_rect = player.rect();
            if !overlaps(player_rect, enemy_rect) {
                continue;
            }

            let descending = player.velocity().y > 0.0;
            let stomp = resolve_direction(player_rect, enemy_rect) == Direction::Top && descending;
            if stomp {
                if let Some(SceneEntity::Enemy(enemy)) = self.entity_mut(id) {
                    enemy.take_damage(1);
                }
                if let Some(player) = self.player_mut() {
                    player.set_velocity_y(bounce_vy);
                }
                log::debug!("Stomped enemy {:?}", id);
            } else if let Some(player) = self.player_mut() {
                player.take_damage(1);
            }
        }
    }
}

impl Scene for LevelScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self) {
        self.entities.clear();
        self.player = None;
        self.solids.clear();
        self.spikes.clear();
        self.enemies.clear();
        self.collectibles.clear();
        self.score = 0;
        self.active = true;

        let w = self.config.screen_width;
        let h = self.config.screen_height;
        let wf = w as f32;
        let hf = h as f32;

        let spawn = self.config.player_spawn;
        let player = Player::new(spawn.x, spawn.y, &self.config);
        self.add_entity(SceneEntity::Player(player));

        self.add_entity(SceneEntity::Platform(Platform::new(0.0, hf - 50.0, w, 50, GRASS)));
        for (x, y) in [(300.0, hf - 200.0), (600.0, hf - 300.0), (900.0, hf - 250.0)] {
            self.add_entity(SceneEntity::Platform(Platform::new(x, y, 150, 20, GRASS)));
        }

        self.add_entity(SceneEntity::Wall(Wall::new(0.0, 0.0, 20, h)));
        self.add_entity(SceneEntity::Wall(Wall::new(wf - 20.0, 0.0, 20, h)));

        for (x, y) in [(250.0, hf - 70.0), (400.0, hf - 250.0)] {
            self.add_entity(SceneEntity::Spike(Spike::new(x, y, DEFAULT_SPIKE_SIZE)));
        }

        for i in 0..5 {
            let x = 200.0 + i as f32 * 80.0;
            self.add_entity(SceneEntity::Collectible(Collectible::new(
                x,
                hf - 120.0,
                DEFAULT_COLLECTIBLE_VALUE,
            )));
        }

        self.add_entity(SceneEntity::Enemy(PatrolEnemy::new(500.0, hf - 82.0, 200.0, 1.6)));
        self.add_entity(SceneEntity::Enemy(PatrolEnemy::new(650.0, hf - 332.0, 120.0, 1.2)));

        log::info!(
            "Scene '{}' set up with {} entities",
            self.name,
            self.entity_count()
        );
    }

    fn handle_event(&mut self, event: InputEvent) {
        if event == InputEvent::KeyDown(Key::Escape) {
            log::info!("Scene '{}' closed by Escape", self.name);
            self.active = false;
        }
    }

    fn update(&mut self, dt_ms: f32, input: &InputState) {
        let Some(player) = self.player_mut() else {
            return;
        };
        player.handle_input(PlayerInput::from_keys(input));

        self.update_entities(dt_ms);
        self.collectible_pass();
        self.hazard_pass();
        self.enemy_pass();
    }

    fn draw(&self, target: &mut dyn DrawTarget) {
        let sky = Rect::new(
            0.0,
            0.0,
            self.config.screen_width as f32,
            (self.config.screen_height / 2) as f32,
        );
        let backdrop = [
            DrawCommand::Clear(BACKGROUND),
            DrawCommand::Rect {
                rect: sky,
                color: SKY,
                outline: None,
            },
        ];
        for command in backdrop {
            if let Err(err) = target.submit(command) {
                log::warn!("Failed to draw background: {err}");
            }
        }

        for entity in self.entities.iter().flatten() {
            if let Err(err) = entity.as_entity().draw(target) {
                log::warn!("Failed to draw {:?}: {err}", entity.kind());
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn hud(&self) -> Option<HudStats> {
        let player = self.player()?;
        Some(HudStats {
            score: self.score,
            health: player.health,
            max_health: player.max_health,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameRecorder;

    const DT: f32 = 1000.0 / 60.0;

    fn bare_scene() -> LevelScene {
        LevelScene::empty("test", GameConfig::default())
    }

    fn place_player(scene: &mut LevelScene, x: f32, y: f32) -> EntityId {
        let player = Player::new(x, y, scene.config());
        scene.add_entity(SceneEntity::Player(player))
    }

    struct FailingTarget {
        accepted: FrameRecorder,
    }

    impl DrawTarget for FailingTarget {
        fn submit(&mut self, command: DrawCommand) -> Result<(), String> {
            match command {
                DrawCommand::Triangle { .. } => Err("triangles unsupported".to_string()),
                other => self.accepted.submit(other),
            }
        }
    }

    #[test]
    fn level_layout_fills_typed_lists() {
        let scene = LevelScene::new("level_1", GameConfig::default());
        assert_eq!(scene.entity_count(), 1 + 4 + 2 + 2 + 5 + 2);
        assert_eq!(scene.solids.len(), 6);
        assert_eq!(scene.spikes.len(), 2);
        assert_eq!(scene.collectibles.len(), 5);
        assert_eq!(scene.enemies.len(), 2);
        assert_eq!(scene.entities_of(EntityKind::Wall).len(), 2);
        assert_eq!(scene.entities_of(EntityKind::Player), vec![EntityId(0)]);
        assert!(scene.player().is_some());
        assert!(scene.is_active());
    }

    #[test]
    fn entity_kind_query_on_empty_scene_is_empty() {
        let scene = bare_scene();
        assert!(scene.entities_of(EntityKind::Enemy).is_empty());
        assert!(scene.player().is_none());
        assert!(scene.hud().is_none());
    }

    #[test]
    fn update_without_player_is_a_no_op() {
        let mut scene = bare_scene();
        let coin = scene.add_entity(SceneEntity::Collectible(Collectible::new(0.0, 0.0, 10)));
        scene.update(DT, &InputState::new());
        assert_eq!(scene.score(), 0);
        assert_eq!(scene.collectible(coin).map(|c| c.body().y()), Some(0.0));
    }

    #[test]
    fn collecting_counts_once() {
        let mut scene = bare_scene();
        place_player(&mut scene, 0.0, 0.0);
        let a = scene.add_entity(SceneEntity::Collectible(Collectible::new(10.0, 50.0, 10)));
        scene.add_entity(SceneEntity::Collectible(Collectible::new(30.0, 60.0, 25)));
        scene.add_entity(SceneEntity::Collectible(Collectible::new(900.0, 60.0, 1000)));

        let input = InputState::new();
        scene.update(DT, &input);
        assert_eq!(scene.score(), 35);
        assert!(scene.collectible(a).is_some_and(Collectible::is_collected));

        scene.update(DT, &input);
        scene.update(DT, &input);
        assert_eq!(scene.score(), 35);
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let mut scene = bare_scene();
        place_player(&mut scene, 0.0, 0.0);
        scene.add_entity(SceneEntity::Collectible(Collectible::new(10.0, 50.0, u32::MAX)));
        scene.add_entity(SceneEntity::Collectible(Collectible::new(30.0, 60.0, 1)));

        scene.update(DT, &InputState::new());
        assert_eq!(scene.score(), u32::MAX);

        scene.add_entity(SceneEntity::Collectible(Collectible::new(20.0, 40.0, 5)));
        scene.update(DT, &InputState::new());
        assert_eq!(scene.score(), u32::MAX);
    }

    #[test]
    fn second_player_replaces_the_first() {
        let mut scene = bare_scene();
        let first = place_player(&mut scene, 0.0, 0.0);
        let second = place_player(&mut scene, 300.0, 0.0);

        assert!(scene.entity(first).is_none());
        assert_eq!(scene.entities_of(EntityKind::Player), vec![second]);
        assert_eq!(scene.player().map(|p| p.body().x()), Some(300.0));

        let mut recorder = FrameRecorder::new();
        scene.draw(&mut recorder);
        assert_eq!(recorder.sprite_count(), 1);
    }

    #[test]
    fn spike_triggers_fall_reset_not_damage() {
        let mut scene = bare_scene();
        place_player(&mut scene, 400.0, 400.0);
        scene.add_entity(SceneEntity::Spike(Spike::new(420.0, 450.0, DEFAULT_SPIKE_SIZE)));

        scene.update(DT, &InputState::new());

        let player = scene.player().expect("player");
        assert_eq!(player.body().position(), scene.config().fall_reset.to_vec2());
        assert_eq!(player.health, player.max_health);
        assert!(!player.invincible);
    }

    #[test]
    fn stomp_damages_enemy_and_bounces_player() {
        let mut scene = bare_scene();
        // Player bottom at 495 + vy; enemy top at 490.
        place_player(&mut scene, 100.0, 375.0);
        let enemy = scene.add_entity(SceneEntity::Enemy(PatrolEnemy::new(120.0, 490.0, 0.0, 0.0)));
        scene.player_mut().expect("player").set_velocity_y(4.0);

        scene.update(DT, &InputState::new());

        assert!(!scene.enemy(enemy).expect("enemy").is_alive());
        let player = scene.player().expect("player");
        assert_eq!(player.velocity().y, scene.config().stomp_bounce_vy());
        assert!(player.velocity().y < 0.0);
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn side_contact_damages_player_only() {
        let mut scene = bare_scene();
        place_player(&mut scene, 100.0, 400.0);
        let enemy = scene.add_entity(SceneEntity::Enemy(PatrolEnemy::new(175.0, 450.0, 0.0, 0.0)));

        scene.update(DT, &InputState::new());

        assert!(scene.enemy(enemy).expect("enemy").is_alive());
        let player = scene.player().expect("player");
        assert_eq!(player.health, player.max_health - 1);
        assert!(player.invincible);
    }

    #[test]
    fn dead_enemy_is_ignored_but_kept() {
        let mut scene = bare_scene();
        place_player(&mut scene, 100.0, 400.0);
        let enemy = scene.add_entity(SceneEntity::Enemy(PatrolEnemy::new(175.0, 450.0, 0.0, 0.0)));
        if let Some(SceneEntity::Enemy(e)) = scene.entity_mut(enemy) {
            e.take_damage(1);
        }

        scene.update(DT, &InputState::new());

        let player = scene.player().expect("player");
        assert_eq!(player.health, player.max_health);
        assert!(scene.enemy(enemy).is_some());
    }

    #[test]
    fn escape_deactivates_scene() {
        let mut scene = LevelScene::new("level_1", GameConfig::default());
        scene.handle_event(InputEvent::KeyDown(Key::Space));
        assert!(scene.is_active());
        scene.handle_event(InputEvent::KeyDown(Key::Escape));
        assert!(!scene.is_active());
    }

    #[test]
    fn remove_entity_updates_typed_lists() {
        let mut scene = LevelScene::new("level_1", GameConfig::default());
        let spike = scene.entities_of(EntityKind::Spike)[0];
        assert!(scene.remove_entity(spike));
        assert!(!scene.remove_entity(spike));
        assert_eq!(scene.spikes.len(), 1);
        assert!(scene.entity(spike).is_none());

        let player = scene.entities_of(EntityKind::Player)[0];
        assert!(!scene.remove_entity(player));
        assert!(scene.player().is_some());
    }

    #[test]
    fn draw_failure_is_skipped_not_fatal() {
        let scene = LevelScene::new("level_1", GameConfig::default());
        let mut target = FailingTarget {
            accepted: FrameRecorder::new(),
        };
        scene.draw(&mut target);

        let mut full = FrameRecorder::new();
        scene.draw(&mut full);
        // Two spikes draw one triangle each.
        assert_eq!(target.accepted.len(), full.len() - 2);
        assert!(matches!(full.commands()[0], DrawCommand::Clear(_)));
    }

    #[test]
    fn setup_rebuilds_level_and_resets_score() {
        let mut scene = LevelScene::new("level_1", GameConfig::default());
        scene.score = 40;
        scene.handle_event(InputEvent::KeyDown(Key::Escape));
        scene.setup();
        assert_eq!(scene.score(), 0);
        assert!(scene.is_active());
        assert_eq!(scene.entity_count(), 16);
    }

    #[test]
    fn hud_reports_score_and_health() {
        let mut scene = LevelScene::new("level_1", GameConfig::default());
        scene.score = 30;
        scene.player_mut().expect("player").health = 2;
        assert_eq!(
            scene.hud(),
            Some(HudStats {
                score: 30,
                health: 2,
                max_health: 3
            })
        );
        scene.reset_score();
        assert_eq!(scene.score(), 0);
    }
}
