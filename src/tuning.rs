//! Data-driven game balance
//!
//! Every difficulty knob lives here so a run can be re-tuned from a JSON file
//! without touching the simulation. Missing keys fall back to the shipped
//! defaults.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::sim::collision::HIT_SLACK;

/// Fly-to-HUD animation length per pickup kind (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyDurations {
    pub life: f64,
    pub shield: f64,
    pub auto_play: f64,
    pub coin: f64,
}

impl Default for FlyDurations {
    fn default() -> Self {
        Self {
            life: 900.0,
            shield: 850.0,
            auto_play: 950.0,
            coin: 800.0,
        }
    }
}

/// Screen positions of the HUD icons collected pickups fly into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudTargets {
    pub life: Vec2,
    pub shield: Vec2,
    pub auto_play: Vec2,
    pub coin: Vec2,
}

impl Default for HudTargets {
    fn default() -> Self {
        Self {
            life: Vec2::new(36.0, 48.0),
            shield: Vec2::new(WORLD_WIDTH - 36.0, WORLD_HEIGHT - 64.0),
            auto_play: Vec2::new(36.0, WORLD_HEIGHT - 64.0),
            coin: Vec2::new(WORLD_WIDTH - 36.0, 48.0),
        }
    }
}

/// Game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub world_width: f32,
    pub world_height: f32,

    // === Orbit ===
    /// Angular speed at run start (radians/sec)
    pub start_orbit_speed: f32,
    pub speed_inc_per_ring: f32,
    pub speed_cap: f32,

    // === Gate ===
    /// Gate angular width at run start (radians)
    pub start_gate_width: f32,
    pub min_gate_width: f32,
    pub shrink_per_ring: f32,
    /// Max angular distance from gate center for a perfect tap
    pub perfect_threshold: f32,
    /// Beyond `gate_width / 2 + miss_margin` a tap is a miss
    pub miss_margin: f32,

    // === Dash ===
    /// Linear dash speed (pixels/sec)
    pub dash_speed: f32,
    /// Dash is a miss if the next ring isn't entered within this (ms)
    pub dash_timeout_ms: f64,

    // === Scoring / lives ===
    pub lives_max: u8,
    /// Consecutive rings that earn a life orb
    pub streak_for_life: u32,

    // === Pickups ===
    pub autoplay_spawn_chance: f64,
    pub shield_spawn_chance: f64,
    pub coin_spawn_chance: f64,
    /// Squared ball-to-pickup distance that counts as a collection
    pub pickup_collision_radius_sq: f32,
    pub fly_ms: FlyDurations,
    pub hud: HudTargets,
    pub max_shield_charges: u8,
    /// Auto-play countdown granted on activation (seconds)
    pub auto_play_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            start_orbit_speed: 1.2,
            speed_inc_per_ring: 0.06,
            speed_cap: 4.0,

            start_gate_width: 1.0,
            min_gate_width: 0.35,
            shrink_per_ring: 0.025,
            perfect_threshold: 0.12,
            miss_margin: 0.45,

            dash_speed: 900.0,
            dash_timeout_ms: 1200.0,

            lives_max: 3,
            streak_for_life: 10,

            autoplay_spawn_chance: 0.08,
            shield_spawn_chance: 0.06,
            coin_spawn_chance: 0.35,
            pickup_collision_radius_sq: 26.0 * 26.0,
            fly_ms: FlyDurations::default(),
            hud: HudTargets::default(),
            max_shield_charges: 3,
            auto_play_duration: 8.0,
        }
    }
}

impl Tuning {
    /// Environment variable naming an optional tuning override file
    pub const ENV_VAR: &'static str = "ORBIT_DASH_TUNING";

    /// Parse overrides from JSON, then sanitize
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning JSON")?;
        Ok(tuning.validated())
    }

    /// Load overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Load from `ORBIT_DASH_TUNING` if set, falling back to defaults
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => Self::load(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning file {}: {:#}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Fix contradictory values so the simulation invariants can hold
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            log::warn!("World size must be positive, using defaults");
            self.world_width = defaults.world_width;
            self.world_height = defaults.world_height;
        }
        if self.min_gate_width > self.start_gate_width {
            log::warn!(
                "min_gate_width ({}) > start_gate_width ({}), swapping",
                self.min_gate_width,
                self.start_gate_width
            );
            std::mem::swap(&mut self.min_gate_width, &mut self.start_gate_width);
        }
        if self.speed_cap < self.start_orbit_speed {
            log::warn!(
                "speed_cap ({}) < start_orbit_speed ({}), raising cap",
                self.speed_cap,
                self.start_orbit_speed
            );
            self.speed_cap = self.start_orbit_speed;
        }
        if self.miss_margin < HIT_SLACK {
            log::warn!(
                "miss_margin ({}) below hit slack ({}), taps could never be ignored",
                self.miss_margin,
                HIT_SLACK
            );
            self.miss_margin = HIT_SLACK;
        }
        self.shrink_per_ring = self.shrink_per_ring.max(0.0);
        self.speed_inc_per_ring = self.speed_inc_per_ring.max(0.0);
        if self.dash_speed <= 0.0 {
            log::warn!("dash_speed must be positive, using {}", defaults.dash_speed);
            self.dash_speed = defaults.dash_speed;
        }
        self.lives_max = self.lives_max.max(1);
        self.streak_for_life = self.streak_for_life.max(1);
        self.autoplay_spawn_chance = self.autoplay_spawn_chance.clamp(0.0, 1.0);
        self.shield_spawn_chance = self.shield_spawn_chance.clamp(0.0, 1.0);
        self.coin_spawn_chance = self.coin_spawn_chance.clamp(0.0, 1.0);
        self
    }

    /// Ring base radius for the configured world
    pub fn base_radius(&self) -> f32 {
        self.world_width.min(self.world_height) * crate::consts::BASE_RADIUS_FRACTION
    }

    /// World center (starting ring position)
    pub fn world_center(&self) -> Vec2 {
        Vec2::new(self.world_width * 0.5, self.world_height * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "speed_cap": 6.5, "fly_ms": { "coin": 500 } }"#)
            .expect("valid json");
        assert_eq!(tuning.speed_cap, 6.5);
        assert_eq!(tuning.fly_ms.coin, 500.0);
        assert_eq!(tuning.fly_ms.life, 900.0);
        assert_eq!(tuning.start_orbit_speed, 1.2);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_validation_fixes_inverted_ranges() {
        let tuning = Tuning {
            start_gate_width: 0.2,
            min_gate_width: 0.9,
            speed_cap: 0.5,
            miss_margin: 0.05,
            ..Tuning::default()
        }
        .validated();
        assert!(tuning.min_gate_width <= tuning.start_gate_width);
        assert!(tuning.speed_cap >= tuning.start_orbit_speed);
        assert!(tuning.miss_margin >= HIT_SLACK);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read tuning file"));
    }
}
