//! Crop defense mini-game simulation.
//!
//! Threats fly in from the screen edges toward a grid of six crops. A threat
//! that touches a crop infects it; infected crops drain health until they die
//! or are healed by a tap. Surviving [`WIN_SECONDS`] wins; running out of
//! healthy crops loses.
//!
//! ```text
//! Intro --play--> Playing --30 s--> Victory
//!   ^                |                 |
//!   |                +--no crops--> Defeat
//!   +----- back button / any tap ------+
//! ```
//!
//! All entities live in fixed [`Pool`]s. Pool exhaustion silently drops the
//! spawn. Everything advances by the clamped frame delta, never by frame count.

use core::f32::consts::TAU;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use rand::RngCore;

use crate::animations::{cos, sin, sqrt, wrap};
use crate::event_log::EventLog;
use crate::pool::{Pool, Slot};
use crate::random::RandomExt;

// =============================================================================
// Tuning
// =============================================================================

pub const CROP_COUNT: usize = 6;
pub const THREAT_POOL: usize = 12;
pub const SPARK_POOL: usize = 48;

/// Survive this long to win.
pub const WIN_SECONDS: f32 = 30.0;

const INITIAL_SPAWN_INTERVAL: f32 = 1.4;
const MIN_SPAWN_INTERVAL: f32 = 0.5;
/// Seconds removed from the spawn interval per elapsed second.
const SPAWN_TIGHTENING: f32 = 0.015;
const DOUBLE_SPAWN_AFTER: f32 = 10.0;
const DOUBLE_SPAWN_CHANCE: f32 = 0.15;

const THREAT_SPEED: f32 = 50.0;
const THREAT_SIZE_MIN: u32 = 14;
const THREAT_SIZE_MAX: u32 = 20;
const SINE_RATE: f32 = 5.0;
const SINE_AMPLITUDE: f32 = 30.0;
const WOBBLE_RATE: f32 = 8.0;
const WOBBLE_AMPLITUDE: f32 = 15.0;
/// Threats this far outside the screen are culled.
const CULL_MARGIN: f32 = 30.0;
/// Added to the threat size for crop collisions.
const COLLISION_SLACK: f32 = 15.0;

/// Added to the threat size for tap hits.
const HIT_SLACK: f32 = 10.0;
const HEAL_RADIUS: f32 = 20.0;
const HIT_SCORE: u32 = 10;
const HEAL_SCORE: u32 = 5;

pub const CROP_MAX_HEALTH: f32 = 100.0;
/// Health lost per second while infected.
const INFECTION_DRAIN: f32 = 15.0;
const CROP_PULSE_RATE: f32 = 3.0;

const CROP_SPACING_X: i32 = 55;
const CROP_SPACING_Y: i32 = 60;
const CROP_COLUMNS: usize = 3;

/// Height of the HUD strip; the playfield starts below it.
pub const HUD_HEIGHT: i32 = 50;

const EXPLOSION_SPARKS: usize = 8;

// =============================================================================
// Entities
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GamePhase {
    Intro,
    Playing,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovePattern {
    #[default]
    Straight,
    /// Perpendicular sine sway around the direct track.
    Sinusoidal,
    /// Small circular wobble on top of the direct track.
    Wobble,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Crop {
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub infected: bool,
    pub pulse: f32,
}

impl Crop {
    #[inline]
    pub fn is_alive(&self) -> bool { self.health > 0.0 }

    #[inline]
    fn is_healthy(&self) -> bool { self.is_alive() && !self.infected }
}

impl Slot for Crop {
    fn is_active(&self) -> bool { self.is_alive() }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Threat {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub pattern: MovePattern,
    pub phase: f32,
    pub size: u32,
    /// Sprite variant (0-2), picks the leg style.
    pub kind: u8,
    /// Seconds since spawn, drives the sprite pulse.
    pub age: f32,
    pub active: bool,
}

impl Threat {
    fn advance(
        &mut self,
        dt: f32,
    ) {
        self.age += dt;
        let (mut vx, mut vy) = (self.vx, self.vy);
        match self.pattern {
            MovePattern::Straight => {}
            MovePattern::Sinusoidal => {
                self.phase = wrap(self.phase + dt * SINE_RATE, TAU);
                let (dx, dy) = (self.target_x - self.x, self.target_y - self.y);
                let len = sqrt(dx * dx + dy * dy);
                if len > 0.1 {
                    let sway = sin(self.phase) * SINE_AMPLITUDE;
                    vx += -dy / len * sway;
                    vy += dx / len * sway;
                }
            }
            MovePattern::Wobble => {
                // 1.3x on y, so wrap on a period both components share
                self.phase = wrap(self.phase + dt * WOBBLE_RATE, 10.0 * TAU);
                vx += cos(self.phase) * WOBBLE_AMPLITUDE;
                vy += sin(self.phase * 1.3) * WOBBLE_AMPLITUDE;
            }
        }
        self.x += vx * dt;
        self.y += vy * dt;
    }
}

impl Slot for Threat {
    fn is_active(&self) -> bool { self.active }
}

/// What caused an explosion; the view maps it to a color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SparkKind {
    #[default]
    Hit,
    Heal,
    Infection,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub kind: SparkKind,
    pub active: bool,
}

impl Slot for Spark {
    fn is_active(&self) -> bool { self.active }
}

// =============================================================================
// Buttons
// =============================================================================

/// Back button in the top-right corner of the HUD.
pub fn back_button(width: u32) -> Rectangle { Rectangle::new(Point::new(width as i32 - 32, 5), Size::new(25, 25)) }

/// Play button on the intro screen.
pub fn play_button(
    width: u32,
    height: u32,
) -> Rectangle {
    Rectangle::new(Point::new(width as i32 / 2 - 40, height as i32 - 60), Size::new(80, 35))
}

#[inline]
fn inside(
    area: Rectangle,
    x: i32,
    y: i32,
) -> bool {
    let br = area.top_left + Point::new(area.size.width as i32, area.size.height as i32);
    x >= area.top_left.x && x <= br.x && y >= area.top_left.y && y <= br.y
}

// =============================================================================
// Simulation
// =============================================================================

pub struct GameSimulation {
    phase: GamePhase,
    width: u32,
    height: u32,
    score: u32,
    elapsed: f32,
    spawn_interval: f32,
    spawn_timer: f32,
    crops: Pool<Crop, CROP_COUNT>,
    threats: Pool<Threat, THREAT_POOL>,
    sparks: Pool<Spark, SPARK_POOL>,
}

impl GameSimulation {
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            phase: GamePhase::Intro,
            width,
            height,
            score: 0,
            elapsed: 0.0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            spawn_timer: 0.0,
            crops: Pool::new(),
            threats: Pool::new(),
            sparks: Pool::new(),
        }
    }

    #[inline]
    pub const fn phase(&self) -> GamePhase { self.phase }

    #[inline]
    pub const fn score(&self) -> u32 { self.score }

    #[inline]
    pub const fn elapsed(&self) -> f32 { self.elapsed }

    /// Whole seconds left before victory.
    pub fn remaining_seconds(&self) -> u32 { (WIN_SECONDS - self.elapsed).max(0.0) as u32 }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    pub fn crops(&self) -> impl Iterator<Item = &Crop> { self.crops.iter() }

    pub fn threats(&self) -> impl Iterator<Item = &Threat> { self.threats.active() }

    pub fn sparks(&self) -> impl Iterator<Item = &Spark> { self.sparks.active() }

    /// Adopt new screen geometry. Takes effect at the next start.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
    ) {
        self.width = width;
        self.height = height;
    }

    /// Back to the intro screen with empty pools.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Intro;
        self.score = 0;
        self.elapsed = 0.0;
        self.spawn_interval = INITIAL_SPAWN_INTERVAL;
        self.spawn_timer = 0.0;
        self.crops.reset();
        self.threats.reset();
        self.sparks.reset();
    }

    /// Reset everything and enter `Playing`.
    pub fn start<R: RngCore>(
        &mut self,
        rng: &mut R,
    ) {
        self.reset();
        self.phase = GamePhase::Playing;

        let start_x = (self.width as i32 - 2 * CROP_SPACING_X) / 2;
        let start_y = HUD_HEIGHT + (self.height as i32 - HUD_HEIGHT - CROP_SPACING_Y) / 2 - 20;
        for i in 0..CROP_COUNT {
            if let Some(crop) = self.crops.get_mut(i) {
                *crop = Crop {
                    x: (start_x + (i % CROP_COLUMNS) as i32 * CROP_SPACING_X) as f32,
                    y: (start_y + (i / CROP_COLUMNS) as i32 * CROP_SPACING_Y) as f32,
                    health: CROP_MAX_HEALTH,
                    infected: false,
                    pulse: rng.range_f32(0.0, TAU),
                };
            }
        }
    }

    /// Advance one frame. Returns the phase change, if any.
    pub fn update<R: RngCore>(
        &mut self,
        dt: f32,
        rng: &mut R,
    ) -> Option<GamePhase> {
        self.update_sparks(dt);
        if self.phase != GamePhase::Playing {
            return None;
        }

        self.elapsed += dt;
        if self.elapsed >= WIN_SECONDS {
            self.phase = GamePhase::Victory;
            return Some(self.phase);
        }

        self.spawn_interval = spawn_interval_at(self.elapsed);
        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            let count = if self.elapsed > DOUBLE_SPAWN_AFTER && rng.chance(DOUBLE_SPAWN_CHANCE) { 2 } else { 1 };
            for _ in 0..count {
                self.spawn_threat(rng);
            }
        }

        for crop in self.crops.iter_mut() {
            crop.pulse = wrap(crop.pulse + dt * CROP_PULSE_RATE, TAU * 10.0);
            if crop.infected && crop.is_alive() {
                crop.health = (crop.health - INFECTION_DRAIN * dt).max(0.0);
            }
        }

        let (w, h) = (self.width as f32, self.height as f32);
        for threat in self.threats.active_mut() {
            threat.advance(dt);
            if threat.x < -CULL_MARGIN || threat.x > w + CULL_MARGIN || threat.y < -CULL_MARGIN || threat.y > h + CULL_MARGIN {
                threat.active = false;
            }
        }

        self.check_collisions(rng);

        if self.crops.iter().all(|c| !c.is_healthy()) {
            self.phase = GamePhase::Defeat;
            return Some(self.phase);
        }
        None
    }

    /// Tap at `(x, y)`. Returns `true` when consumed.
    ///
    /// The back button is checked before the playfield and is never consumed,
    /// so the view switcher still acts on it.
    pub fn handle_tap<R: RngCore>(
        &mut self,
        x: i32,
        y: i32,
        rng: &mut R,
    ) -> bool {
        match self.phase {
            GamePhase::Intro => {
                if inside(play_button(self.width, self.height), x, y) {
                    self.start(rng);
                    return true;
                }
                false
            }
            _ if inside(back_button(self.width), x, y) => {
                self.reset();
                false
            }
            GamePhase::Playing => {
                self.strike(x as f32, y as f32, rng);
                true
            }
            GamePhase::Victory | GamePhase::Defeat => {
                self.reset();
                true
            }
        }
    }

    fn strike<R: RngCore>(
        &mut self,
        x: f32,
        y: f32,
        rng: &mut R,
    ) {
        let hit = self.threats.active_mut().find(|t| {
            let (dx, dy) = (x - t.x, y - t.y);
            sqrt(dx * dx + dy * dy) < t.size as f32 + HIT_SLACK
        });
        if let Some(t) = hit {
            t.active = false;
            let (tx, ty) = (t.x, t.y);
            self.score += HIT_SCORE;
            self.explode(tx, ty, SparkKind::Hit, rng);
            return;
        }

        let healed = self.crops.iter_mut().find(|c| {
            let (dx, dy) = (x - c.x, y - c.y);
            c.infected && c.is_alive() && sqrt(dx * dx + dy * dy) < HEAL_RADIUS
        });
        if let Some(c) = healed {
            c.infected = false;
            c.health = CROP_MAX_HEALTH;
            let (cx, cy) = (c.x, c.y);
            self.score += HEAL_SCORE;
            self.explode(cx, cy, SparkKind::Heal, rng);
        }
    }

    fn spawn_threat<R: RngCore>(
        &mut self,
        rng: &mut R,
    ) {
        let Some((target_x, target_y)) = self.pick_target(rng) else {
            return;
        };

        let (w, h) = (self.width as f32, self.height as f32);
        let (x, y) = match rng.range_u32(0, 4) {
            0 => (rng.range_f32(0.0, w), -10.0),
            1 => (w + 10.0, rng.range_f32(0.0, h)),
            2 => (rng.range_f32(0.0, w), h + 10.0),
            _ => (-10.0, rng.range_f32(0.0, h)),
        };
        let pattern = if self.elapsed > DOUBLE_SPAWN_AFTER {
            match rng.range_u32(0, 3) {
                0 => MovePattern::Straight,
                1 => MovePattern::Sinusoidal,
                _ => MovePattern::Wobble,
            }
        } else if rng.chance(0.7) {
            MovePattern::Straight
        } else {
            MovePattern::Sinusoidal
        };

        let speed = THREAT_SPEED * rng.range_f32(0.7, 0.9);
        let (dx, dy) = (target_x - x, target_y - y);
        let dist = sqrt(dx * dx + dy * dy);
        let (vx, vy) = if dist > 0.0 { (dx / dist * speed, dy / dist * speed) } else { (0.0, speed) };

        let kind = rng.range_u32(0, 3) as u8;
        let phase = rng.range_f32(0.0, TAU);
        let size = rng.range_u32(THREAT_SIZE_MIN, THREAT_SIZE_MAX);

        let Some(slot) = self.threats.claim() else {
            return;
        };
        *slot = Threat {
            x,
            y,
            vx,
            vy,
            target_x,
            target_y,
            pattern,
            phase,
            size,
            kind,
            age: 0.0,
            active: true,
        };
    }

    /// Random healthy crop, or any living crop once none are healthy.
    fn pick_target<R: RngCore>(
        &self,
        rng: &mut R,
    ) -> Option<(f32, f32)> {
        let healthy = self.crops.iter().filter(|c| c.is_healthy()).count();
        let pick = |filter: fn(&Crop) -> bool, n: usize, rng: &mut R| {
            let k = rng.range_u32(0, n as u32) as usize;
            self.crops.iter().filter(|c| filter(c)).nth(k).map(|c| (c.x, c.y))
        };
        if healthy > 0 {
            return pick(Crop::is_healthy, healthy, rng);
        }
        let alive = self.crops.iter().filter(|c| c.is_alive()).count();
        if alive > 0 { pick(Crop::is_alive, alive, rng) } else { None }
    }

    fn check_collisions<R: RngCore>(
        &mut self,
        rng: &mut R,
    ) {
        for index in 0..THREAT_POOL {
            let Some(threat) = self.threats.get(index).filter(|t| t.active).copied() else {
                continue;
            };
            let reach = threat.size as f32 + COLLISION_SLACK;
            let struck = self.crops.iter_mut().find(|c| {
                let (dx, dy) = (threat.x - c.x, threat.y - c.y);
                c.is_alive() && sqrt(dx * dx + dy * dy) < reach
            });
            if let Some(crop) = struck {
                crop.infected = true;
                if let Some(slot) = self.threats.get_mut(index) {
                    slot.active = false;
                }
                self.explode(threat.x, threat.y, SparkKind::Infection, rng);
            }
        }
    }

    fn explode<R: RngCore>(
        &mut self,
        x: f32,
        y: f32,
        kind: SparkKind,
        rng: &mut R,
    ) {
        for i in 0..EXPLOSION_SPARKS {
            let angle = i as f32 / EXPLOSION_SPARKS as f32 * TAU;
            let speed = rng.range_f32(50.0, 100.0);
            let life = rng.range_f32(0.5, 1.0);
            let Some(spark) = self.sparks.claim() else {
                return;
            };
            *spark = Spark {
                x,
                y,
                vx: cos(angle) * speed,
                vy: sin(angle) * speed,
                life,
                kind,
                active: true,
            };
        }
    }

    fn update_sparks(
        &mut self,
        dt: f32,
    ) {
        for s in self.sparks.active_mut() {
            s.x += s.vx * dt;
            s.y += s.vy * dt;
            s.life -= dt;
            if s.life <= 0.0 {
                s.active = false;
            }
        }
    }
}

/// Seconds between spawns after `elapsed` seconds of play.
#[inline]
fn spawn_interval_at(elapsed: f32) -> f32 { (INITIAL_SPAWN_INTERVAL - elapsed * SPAWN_TIGHTENING).max(MIN_SPAWN_INTERVAL) }

/// Log line for a phase change.
pub fn log_phase(
    log: &mut EventLog,
    phase: GamePhase,
    score: u32,
) {
    match phase {
        GamePhase::Intro => log.push("game: intro"),
        GamePhase::Playing => log.push("game: start"),
        GamePhase::Victory => log.push_with_u32("game: victory, score ", score),
        GamePhase::Defeat => log.push_with_u32("game: defeat, score ", score),
    }
}
