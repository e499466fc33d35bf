//! Tillfield library crate: the simulation core and its Bevy wiring.
//!
//! The binary crate (`main.rs`) adds a window and the placeholder renderer.
//! Everything else lives here so `tests/` integration tests can drive the
//! engine headless, without a window or GPU.

pub mod shared;
pub mod config;
pub mod input;
pub mod calendar;
pub mod stamina;
pub mod player;
pub mod farming;
pub mod transition;
pub mod world;
pub mod interaction;
pub mod economy;
pub mod ui;
pub mod engine;
