//! Convention badge simulator for Windows/Desktop.
//!
//! This is the simulator binary that runs the badge core on desktop platforms
//! using the embedded-graphics-simulator crate.
//!
//! Controls:
//! - mouse: touch panel (click = tap, hold = settings, drag = slider scrub)
//! - space / enter: side button (hold 2 s to rotate the screen)
//! - escape: quit

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod qr;
mod store;
mod timing;

use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use badge_common::config::{DEFAULT_TARGET_FPS, SCREEN_HEIGHT, SCREEN_WIDTH, UserInfo};
use badge_common::input::InputSource;
use badge_common::views::{
    BadgeView,
    DEFAULT_AGENDA,
    GameView,
    PlasmaView,
    ProgramView,
    QrCodeView,
    SettingsView,
    ViewKind,
};
use badge_common::{DisplayManager, Palette, ViewRegistry};
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorEvent;
use embedded_graphics_simulator::sdl2::Keycode;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::display::SimulatorSink;
use crate::qr::placeholder_grid;
use crate::store::MemoryStore;
use crate::timing::IDLE_POLL;

/// Mouse and keyboard levels, refreshed from window events every loop.
#[derive(Debug, Default)]
struct DesktopInput {
    button: bool,
    mouse_down: bool,
    touch: Option<Point>,
}

impl InputSource for DesktopInput {
    fn button_pressed(&mut self) -> bool { self.button }

    fn touch(&mut self) -> Option<Point> { self.touch }
}

fn main() {
    let palette = Palette::neon();
    let user = UserInfo::demo();

    let mut registry = ViewRegistry::new();
    let views: [ViewKind; 5] = [
        BadgeView::new(palette).into(),
        PlasmaView::new(palette).into(),
        QrCodeView::new(palette, placeholder_grid(user.token)).into(),
        ProgramView::new(palette, &DEFAULT_AGENDA).into(),
        GameView::new(palette, SCREEN_WIDTH, SCREEN_HEIGHT).into(),
    ];
    for view in views {
        if registry.push(view).is_err() {
            eprintln!("[sim] view registry full");
        }
    }
    registry.set_settings(SettingsView::new(palette));

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x00C0_FFEE);
    let rng = SmallRng::seed_from_u64(seed);

    let boot = Instant::now();
    let mut manager = DisplayManager::new(
        registry,
        MemoryStore::default(),
        rng,
        user,
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        DEFAULT_TARGET_FPS,
        0,
    );

    let mut sink = SimulatorSink::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), "Convention Badge Sim");
    let mut input = DesktopInput::default();
    let mut seen_lines = 0u32;

    loop {
        // Handle events
        let mut quit = false;
        let mut pointer = None;
        for ev in sink.window_mut().events() {
            match ev {
                SimulatorEvent::Quit => quit = true,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => quit = true,
                        Keycode::Space | Keycode::Return => input.button = true,
                        _ => {}
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if matches!(keycode, Keycode::Space | Keycode::Return) {
                        input.button = false;
                    }
                }
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    input.mouse_down = true;
                    pointer = Some(point);
                }
                SimulatorEvent::MouseButtonUp { .. } => input.mouse_down = false,
                SimulatorEvent::MouseMove { point } => pointer = Some(point),
                _ => {}
            }
        }
        if quit {
            return;
        }

        input.touch = if input.mouse_down {
            pointer.map(|p| sink.map_point(p)).or(input.touch)
        } else {
            None
        };

        let now_ms = boot.elapsed().as_millis() as u64;
        let rendered = manager.tick(now_ms, &mut input, &mut sink);

        let log = manager.log();
        for line in log.since(seen_lines) {
            println!("[badge] {line}");
        }
        seen_lines = log.total();

        if !rendered {
            thread::sleep(IDLE_POLL);
        }
    }
}
