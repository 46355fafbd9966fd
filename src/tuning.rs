//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so hosts can ship a
//! JSON file instead of recompiling. Missing keys fall back to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "norm" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Ships per level
    pub fn lives(&self) -> u32 {
        match self {
            DifficultyPreset::Easy => 5,
            DifficultyPreset::Normal => 3,
            DifficultyPreset::Hard => 2,
        }
    }

    /// Rockets granted at the start of a level
    pub fn rockets(&self) -> u32 {
        match self {
            DifficultyPreset::Easy => 6,
            DifficultyPreset::Normal => 4,
            DifficultyPreset::Hard => 2,
        }
    }
}

/// What happens to unused rockets when a level is won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RocketPolicy {
    /// Every level starts with its own allotment
    Reset,
    /// Remaining rockets move on to the next level, topped up to its comet count
    #[default]
    CarryOver,
}

/// Playing field rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Player ship handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Degrees; -90 faces the top of the screen
    pub spawn_rotation: f32,
    /// Forward acceleration (px/s²)
    pub thrust: f32,
    /// Reverse acceleration (px/s²), applied against the heading
    pub reverse_thrust: f32,
    /// Degrees per second
    pub turn_rate: f32,
    /// Fraction of velocity kept per second
    pub drag: f32,
    pub max_speed: f32,
    pub bounce: f32,
    pub radius: f32,
    pub wrap_buffer: f32,
    pub invulnerability_ms: u32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            spawn_x: 400.0,
            spawn_y: 400.0,
            spawn_rotation: -90.0,
            thrust: 200.0,
            reverse_thrust: 50.0,
            turn_rate: 300.0,
            drag: 0.99,
            max_speed: 200.0,
            bounce: 1.0,
            radius: 20.0,
            wrap_buffer: SHIP_WRAP_BUFFER,
            invulnerability_ms: INVULNERABILITY_MS,
        }
    }
}

/// One weapon kind (lasers and rockets share the same shape).
///
/// No per-field defaults: a weapon block in a tuning file must be complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponTuning {
    /// Gap between the two projectiles of a pair
    pub spacing: f32,
    /// Ticks between fire events while the trigger is held
    pub delay: u32,
    /// Projectile speed (px/s)
    pub speed: f32,
    /// Cosmetic sprite scale
    pub scale: f32,
    /// Cosmetic sprite alpha
    pub alpha: f32,
    /// Overlap radius
    pub radius: f32,
    /// Distance in front of the ship where projectiles appear
    pub muzzle_offset: f32,
}

impl WeaponTuning {
    pub fn laser() -> Self {
        Self {
            spacing: 58.0,
            delay: 8,
            speed: 800.0,
            scale: 0.5,
            alpha: 0.8,
            radius: 6.0,
            muzzle_offset: 15.0,
        }
    }

    pub fn rocket() -> Self {
        Self {
            spacing: 30.0,
            delay: 50,
            speed: 600.0,
            scale: 0.5,
            alpha: 1.0,
            radius: 10.0,
            muzzle_offset: 15.0,
        }
    }
}

/// Asteroids and comets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialTuning {
    pub base_radius: f32,
    pub max_speed: f32,
    pub bounce: f32,
    pub wrap_buffer: f32,
    pub spawn_margin: f32,
    pub spawn_exclusion: f32,
    pub spawn_push: f32,
    pub fragment_threshold: f32,
}

impl Default for CelestialTuning {
    fn default() -> Self {
        Self {
            base_radius: CELESTIAL_BASE_RADIUS,
            max_speed: CELESTIAL_MAX_SPEED,
            bounce: 1.0,
            wrap_buffer: CELESTIAL_WRAP_BUFFER,
            spawn_margin: SPAWN_MARGIN,
            spawn_exclusion: SPAWN_EXCLUSION,
            spawn_push: SPAWN_PUSH,
            fragment_threshold: FRAGMENT_SCALE_THRESHOLD,
        }
    }
}

/// Upper bound on asteroids (or comets) a level may start with
pub const MAX_LEVEL_OBJECTS: u32 = 256;

/// Level composition, lives and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub lives: u32,
    pub rockets: u32,
    pub asteroids_base: u32,
    pub asteroids_per_level: u32,
    pub comets_base: u32,
    pub comets_per_level: u32,
    pub max_comets: u32,
    /// Winning this level index finishes the game
    pub max_levels: u32,
    pub respawn_delay_ms: u32,
    pub advance_delay_ms: u32,
    pub restart_delay_ms: u32,
    pub rocket_policy: RocketPolicy,
}

impl Default for LevelTuning {
    fn default() -> Self {
        let preset = DifficultyPreset::default();
        Self {
            lives: preset.lives(),
            rockets: preset.rockets(),
            asteroids_base: 4,
            asteroids_per_level: 1,
            comets_base: 0,
            comets_per_level: 1,
            max_comets: 4,
            max_levels: 5,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            advance_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            restart_delay_ms: RESTART_DELAY_MS,
            rocket_policy: RocketPolicy::default(),
        }
    }
}

impl LevelTuning {
    /// Asteroids spawned at the start of a level (1-based index)
    pub fn asteroids_for(&self, level: u32) -> u32 {
        self.asteroids_base
            .saturating_add(self.asteroids_per_level.saturating_mul(level))
    }

    /// Comets spawned at the start of a level (1-based index)
    pub fn comets_for(&self, level: u32) -> u32 {
        self.comets_base
            .saturating_add(self.comets_per_level.saturating_mul(level))
            .min(self.max_comets)
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub preset: DifficultyPreset,
    pub field: FieldTuning,
    pub ship: ShipTuning,
    pub laser: WeaponTuning,
    pub rocket: WeaponTuning,
    pub celestial: CelestialTuning,
    pub level: LevelTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            preset: DifficultyPreset::default(),
            field: FieldTuning::default(),
            ship: ShipTuning::default(),
            laser: WeaponTuning::laser(),
            rocket: WeaponTuning::rocket(),
            celestial: CelestialTuning::default(),
            level: LevelTuning::default(),
        }
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        let mut tuning = Self::default();
        tuning.apply_preset(preset);
        tuning
    }

    /// Apply a difficulty preset (updates preset-dependent values)
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.preset = preset;
        self.level.lives = preset.lives();
        self.level.rockets = preset.rockets();
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning from {} ({} preset)",
            path.display(),
            tuning.preset.as_str()
        );
        Ok(tuning)
    }

    /// Save tuning to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TuningError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Tuning saved to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                log::warn!("Rejected tuning: {} {}", field, reason);
                Err(TuningError::Invalid { field, reason })
            }
        }

        const POSITIVE: &str = "must be greater than zero";
        const FINITE_POSITIVE: &str = "must be finite and greater than zero";
        const NON_NEGATIVE: &str = "must be finite and not negative";

        let finite_positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        check(finite_positive(self.field.width), "field.width", FINITE_POSITIVE)?;
        check(finite_positive(self.field.height), "field.height", FINITE_POSITIVE)?;
        check(non_negative(self.ship.wrap_buffer), "ship.wrap_buffer", NON_NEGATIVE)?;
        check(
            non_negative(self.celestial.wrap_buffer),
            "celestial.wrap_buffer",
            NON_NEGATIVE,
        )?;
        check(
            non_negative(self.celestial.spawn_margin),
            "celestial.spawn_margin",
            NON_NEGATIVE,
        )?;
        check(self.ship.max_speed > 0.0, "ship.max_speed", POSITIVE)?;
        check(self.ship.radius > 0.0, "ship.radius", POSITIVE)?;
        check(
            self.ship.drag > 0.0 && self.ship.drag <= 1.0,
            "ship.drag",
            "must be in (0, 1]",
        )?;
        check(self.laser.speed > 0.0, "laser.speed", POSITIVE)?;
        check(self.rocket.speed > 0.0, "rocket.speed", POSITIVE)?;
        check(self.laser.radius > 0.0, "laser.radius", POSITIVE)?;
        check(self.rocket.radius > 0.0, "rocket.radius", POSITIVE)?;
        check(self.celestial.max_speed > 0.0, "celestial.max_speed", POSITIVE)?;
        check(self.celestial.base_radius > 0.0, "celestial.base_radius", POSITIVE)?;
        check(
            self.celestial.spawn_margin * 2.0 < self.field.width.min(self.field.height),
            "celestial.spawn_margin",
            "must leave room inside the field",
        )?;
        check(self.level.lives >= 1, "level.lives", "must be at least 1")?;
        check(self.level.max_levels >= 1, "level.max_levels", "must be at least 1")?;
        let last = self.level.max_levels;
        check(
            self.level.asteroids_for(last) <= MAX_LEVEL_OBJECTS,
            "level.asteroids_per_level",
            "too many asteroids by the last level",
        )?;
        check(
            self.level.comets_for(last) <= MAX_LEVEL_OBJECTS,
            "level.max_comets",
            "too many comets by the last level",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in [
            DifficultyPreset::Easy,
            DifficultyPreset::Normal,
            DifficultyPreset::Hard,
        ] {
            assert_eq!(DifficultyPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(DifficultyPreset::from_str("nightmare"), None);
    }

    #[test]
    fn test_from_preset_applies_lives_and_rockets() {
        let tuning = Tuning::from_preset(DifficultyPreset::Hard);
        assert_eq!(tuning.level.lives, 2);
        assert_eq!(tuning.level.rockets, 2);
        assert_eq!(tuning.laser.delay, 8);
        assert_eq!(tuning.rocket.delay, 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "level": { "lives": 7 } }"#).unwrap();
        assert_eq!(tuning.level.lives, 7);
        assert_eq!(tuning.level.asteroids_base, 4);
        assert_eq!(tuning.laser.speed, 800.0);
        assert_eq!(tuning.rocket.speed, 600.0);
        assert_eq!(tuning.field.width, FIELD_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::from_preset(DifficultyPreset::Easy);
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.preset, DifficultyPreset::Easy);
        assert_eq!(back.level.rockets, tuning.level.rockets);
        assert_eq!(back.rocket.spacing, tuning.rocket.spacing);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut tuning = Tuning::default();
        tuning.rocket.speed = 0.0;
        let json = tuning.to_json().unwrap();
        let err = Tuning::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "rocket.speed",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "level": { "lives": 0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "level.lives", .. }));
    }

    #[test]
    fn test_incomplete_weapon_block_rejected() {
        let err = Tuning::from_json(r#"{ "rocket": { "speed": 100.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }

    #[test]
    fn test_level_composition_saturates() {
        let level = LevelTuning {
            asteroids_per_level: 4_000_000_000,
            comets_per_level: 4_000_000_000,
            ..Default::default()
        };
        assert_eq!(level.asteroids_for(2), u32::MAX);
        assert_eq!(level.comets_for(2), level.max_comets);
    }

    #[test]
    fn test_oversized_levels_rejected() {
        let err = Tuning::from_json(r#"{ "level": { "asteroids_per_level": 4000000000 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "level.asteroids_per_level",
                ..
            }
        ));

        let err = Tuning::from_json(
            r#"{ "level": { "comets_per_level": 1000, "max_comets": 100000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "level.max_comets", .. }));
    }

    #[test]
    fn test_negative_distances_rejected() {
        let err = Tuning::from_json(r#"{ "celestial": { "spawn_margin": -3e9 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "celestial.spawn_margin",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "ship": { "wrap_buffer": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "ship.wrap_buffer", .. }));

        let err = Tuning::from_json(r#"{ "celestial": { "wrap_buffer": -64.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "celestial.wrap_buffer",
                ..
            }
        ));
    }

    #[test]
    fn test_level_composition_scales() {
        let level = LevelTuning::default();
        assert_eq!(level.asteroids_for(1), 5);
        assert_eq!(level.asteroids_for(3), 7);
        assert_eq!(level.comets_for(1), 1);
        assert_eq!(level.comets_for(10), level.max_comets);
    }
}
