//! Display orchestration for the convention badge.
//!
//! This crate contains the platform-agnostic part of the badge firmware,
//! shared between the desktop simulator and any hardware driver:
//!
//! - [`manager`]: frame loop orchestration (timing, input, power, render)
//! - [`registry`]: ordered view cycle plus the settings view
//! - [`views`]: badge, plasma, QR code, program, mini-game and settings screens
//! - [`animations`]: neon effects (flicker, glitch, particles, chip, pulses, glow)
//! - [`game`]: crop defender simulation, independent of drawing
//! - [`input`]: button and touch disambiguation into events
//! - [`power`]: inactivity sleep and backlight levels
//! - [`clock`]: frame pacing gate
//! - [`config`]: constants, persisted settings, user identity
//! - [`event_log`]: bounded log ring buffer
//! - [`sink`]: display capability the drivers implement
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` outside of tests. Hardware access (panel, touch
//! controller, backlight PWM, flash) stays behind the [`sink::FrameSink`],
//! [`input::InputSource`] and [`config::ConfigStore`] traits.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod clock;
pub mod colors;
pub mod config;
pub mod event_log;
pub mod game;
pub mod input;
pub mod manager;
pub mod pool;
pub mod power;
pub mod random;
pub mod registry;
pub mod sink;
pub mod state;
pub mod styles;
pub mod views;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use colors::Palette;
pub use config::{ConfigStore, Settings, StoreError, UserInfo};
pub use event_log::EventLog;
pub use input::InputSource;
pub use manager::DisplayManager;
pub use registry::ViewRegistry;
pub use sink::FrameSink;
