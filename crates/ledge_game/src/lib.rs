//! Ledge: a small 2D side-scrolling platformer core.
//!
//! Entities are axis-aligned boxes in y-down screen space. A [`scene::LevelScene`]
//! owns the player, the static level pieces and the enemies, and resolves their
//! interactions once per fixed tick. [`engine::Engine`] keeps a registry of
//! named scenes and drives the current one. Drawing goes through the
//! [`render::DrawTarget`] seam, so the simulation runs the same with or without
//! a window.

pub mod collision;
pub mod enemy;
pub mod engine;
pub mod entity;
pub mod player;
pub mod render;
pub mod replay;
pub mod scene;
pub mod world;
