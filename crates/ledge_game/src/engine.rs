//! Scene registry and the per-frame driver.
//!
//! The engine owns the keyboard state and every registered scene. One frame
//! is: apply events, update the current scene if it is active, draw it, then
//! roll the input edges over.

use crate::render::{Color, DrawCommand, DrawTarget};
use crate::scene::{HudStats, Scene};
use ledge_core::input::{InputEvent, InputState};
use std::collections::HashMap;

pub struct Engine {
    scenes: HashMap<String, Box<dyn Scene>>,
    current: Option<String>,
    input: InputState,
    running: bool,
    frame_count: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            current: None,
            input: InputState::new(),
            running: true,
            frame_count: 0,
        }
    }

    /// Registering under an existing name replaces the old scene.
    pub fn register_scene(&mut self, name: &str, scene: Box<dyn Scene>) {
        if self.scenes.insert(name.to_string(), scene).is_some() {
            log::warn!("Scene '{}' re-registered; previous instance dropped", name);
        } else {
            log::debug!("Registered scene '{}'", name);
        }
    }

    /// Unknown names are logged and leave the current scene in place.
    pub fn set_scene(&mut self, name: &str) -> bool {
        if !self.scenes.contains_key(name) {
            log::error!("Cannot switch to unknown scene '{}'", name);
            return false;
        }
        log::info!("Switched to scene '{}'", name);
        self.current = Some(name.to_string());
        true
    }

    pub fn current_scene_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_scene(&self) -> Option<&dyn Scene> {
        let name = self.current.as_ref()?;
        self.scenes.get(name).map(|scene| scene.as_ref())
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        let name = self.current.as_ref()?;
        self.scenes.get_mut(name).map(|scene| scene.as_mut())
    }

    pub fn scene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Stops the loop on `Quit`; every event also reaches the current scene.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.apply(event);
        if event == InputEvent::Quit {
            log::info!("Quit requested, exiting.");
            self.running = false;
        }
        if let Some(scene) = self.current_scene_mut() {
            scene.handle_event(event);
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        let Some(name) = self.current.as_ref() else {
            return;
        };
        let Some(scene) = self.scenes.get_mut(name) else {
            return;
        };
        if scene.is_active() {
            scene.update(dt_ms, &self.input);
        }
    }

    pub fn draw(&self, target: &mut dyn DrawTarget) {
        if let Err(err) = target.submit(DrawCommand::Clear(Color::BLACK)) {
            log::warn!("Failed to clear frame: {err}");
        }
        if let Some(scene) = self.current_scene() {
            scene.draw(target);
        }
    }

    /// One full frame.
    pub fn step(&mut self, dt_ms: f32, events: &[InputEvent], target: &mut dyn DrawTarget) {
        for event in events {
            self.handle_event(*event);
        }
        if self.running {
            self.update(dt_ms);
        }
        self.draw(target);
        self.input.end_frame();
        self.frame_count += 1;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// False after a quit or once the current scene has deactivated itself.
    pub fn is_running(&self) -> bool {
        self.running && self.current_scene().map_or(true, |scene| scene.is_active())
    }

    pub fn hud(&self) -> Option<HudStats> {
        self.current_scene().and_then(|scene| scene.hud())
    }
}
