//! Data-driven game balance
//!
//! Every field has a default reproducing the stock game, and all structs are
//! `#[serde(default)]`, so a JSON document only needs the values it changes.
//! Validation runs on load; the simulation assumes validated tuning.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::entity::{TextureId, TowerKind};

/// Inclusive integer range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &str) -> Result<(), SimError> {
        if self.min > self.max {
            return Err(SimError::tuning(field, "min exceeds max"));
        }
        Ok(())
    }
}

/// Pre-allocated pool sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Capacities {
    pub enemies: usize,
    pub towers: usize,
    pub projectiles: usize,
    pub walls: usize,
    pub explosions: usize,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            enemies: 1000,
            towers: 100,
            projectiles: 2000,
            walls: 100,
            explosions: 100,
        }
    }
}

impl Capacities {
    fn validate(&self) -> Result<(), SimError> {
        let pools = [
            ("capacities.enemies", self.enemies),
            ("capacities.towers", self.towers),
            ("capacities.projectiles", self.projectiles),
            ("capacities.walls", self.walls),
            ("capacities.explosions", self.explosions),
        ];
        for (field, capacity) in pools {
            if capacity == 0 {
                return Err(SimError::tuning(field, "must be positive"));
            }
        }
        Ok(())
    }
}

/// Per-kind tower stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub hit_points: f32,
    pub min_range: f32,
    pub max_range: f32,
    pub cool_down_ms: f64,
    pub num_projectiles: u32,
    pub projectile_damage: f32,
    pub projectile_speed: f32,
    /// Full width and height
    pub size: Vec2,
    pub friction: f32,
    pub restitution: f32,
    pub texture: TextureId,
}

impl TowerStats {
    fn validate(&self, field: &str) -> Result<(), SimError> {
        if !(self.hit_points > 0.0) {
            return Err(SimError::tuning(format!("{field}.hit_points"), "must be positive"));
        }
        if !(self.min_range >= 0.0 && self.min_range <= self.max_range) {
            return Err(SimError::tuning(
                format!("{field}.min_range"),
                "must be non-negative and not exceed max_range",
            ));
        }
        if !(self.cool_down_ms >= 0.0) {
            return Err(SimError::tuning(format!("{field}.cool_down_ms"), "must be non-negative"));
        }
        if !(self.projectile_damage >= 0.0 && self.projectile_speed >= 0.0) {
            return Err(SimError::tuning(
                format!("{field}.projectile_damage"),
                "damage and speed must be non-negative",
            ));
        }
        validate_size(&format!("{field}.size"), self.size)?;
        validate_surface(field, self.friction, self.restitution)
    }
}

/// Stats table for all tower kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerTable {
    pub heavy: TowerStats,
    pub shotgun: TowerStats,
    pub medium: TowerStats,
    pub tiny: TowerStats,
    pub small: TowerStats,
}

impl TowerTable {
    pub fn stats(&self, kind: TowerKind) -> &TowerStats {
        match kind {
            TowerKind::Heavy => &self.heavy,
            TowerKind::Shotgun => &self.shotgun,
            TowerKind::Medium => &self.medium,
            TowerKind::Tiny => &self.tiny,
            TowerKind::Small => &self.small,
        }
    }
}

impl Default for TowerTable {
    fn default() -> Self {
        Self {
            heavy: TowerStats {
                hit_points: 600.0,
                min_range: 1000.0,
                max_range: 8000.0,
                cool_down_ms: 3000.0,
                num_projectiles: 1,
                projectile_damage: 200.0,
                projectile_speed: 5000.0,
                size: Vec2::new(300.0, 200.0),
                friction: 0.9,
                restitution: 0.1,
                texture: 0,
            },
            shotgun: TowerStats {
                hit_points: 300.0,
                min_range: 100.0,
                max_range: 3000.0,
                cool_down_ms: 5000.0,
                num_projectiles: 20,
                projectile_damage: 10.0,
                projectile_speed: 1000.0,
                size: Vec2::new(200.0, 160.0),
                friction: 0.8,
                restitution: 0.2,
                texture: 1,
            },
            medium: TowerStats {
                hit_points: 250.0,
                min_range: 500.0,
                max_range: 3000.0,
                cool_down_ms: 2000.0,
                num_projectiles: 1,
                projectile_damage: 100.0,
                projectile_speed: 2000.0,
                size: Vec2::new(180.0, 150.0),
                friction: 0.7,
                restitution: 0.3,
                texture: 2,
            },
            tiny: TowerStats {
                hit_points: 100.0,
                min_range: 0.0,
                max_range: 2000.0,
                cool_down_ms: 50.0,
                num_projectiles: 1,
                projectile_damage: 1.0,
                projectile_speed: 3000.0,
                size: Vec2::new(150.0, 120.0),
                friction: 0.6,
                restitution: 0.4,
                texture: 3,
            },
            small: TowerStats {
                hit_points: 200.0,
                min_range: 100.0,
                max_range: 2000.0,
                cool_down_ms: 1000.0,
                num_projectiles: 1,
                projectile_damage: 50.0,
                projectile_speed: 2000.0,
                size: Vec2::new(150.0, 120.0),
                friction: 0.5,
                restitution: 0.5,
                texture: 4,
            },
        }
    }
}

/// Player-placed wall block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallStats {
    pub hit_points: f32,
    pub size: Vec2,
    pub friction: f32,
    pub restitution: f32,
    pub texture: TextureId,
}

impl Default for WallStats {
    fn default() -> Self {
        Self {
            hit_points: 200.0,
            size: Vec2::new(250.0, 250.0),
            friction: 0.8,
            restitution: 0.3,
            texture: 0,
        }
    }
}

/// Randomized stats for each enemy in a wave
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveStats {
    pub enemies_per_wave: usize,
    pub hit_points: IntRange,
    pub rest_velocity: IntRange,
    pub spawn_x: IntRange,
    pub spawn_y: IntRange,
    /// Full edge length of the square enemy
    pub size: IntRange,
    pub explosion_range: f32,
    pub explosion_damage: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Number of enemy textures to pick from
    pub texture_count: TextureId,
}

impl Default for WaveStats {
    fn default() -> Self {
        Self {
            enemies_per_wave: 50,
            hit_points: IntRange::new(50, 300),
            rest_velocity: IntRange::new(300, 500),
            spawn_x: IntRange::new(-9000, -8000),
            spawn_y: IntRange::new(-2000, -1500),
            size: IntRange::new(50, 100),
            explosion_range: 500.0,
            explosion_damage: 100.0,
            friction: 0.0,
            restitution: 1.0,
            texture_count: 3,
        }
    }
}

/// Static landscape block (center and full size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainBlock {
    pub pos: Vec2,
    pub size: Vec2,
}

impl TerrainBlock {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

fn default_terrain() -> Vec<TerrainBlock> {
    vec![
        TerrainBlock::new(0.0, 1000.0, 20000.0, 3000.0),
        TerrainBlock::new(14000.0, 1500.0, 8000.0, 2000.0),
        TerrainBlock::new(22000.0, 2000.0, 8000.0, 1000.0),
        TerrainBlock::new(12000.0, -700.0, 2000.0, 500.0),
        TerrainBlock::new(20000.0, -200.0, 2000.0, 500.0),
    ]
}

/// Decorations scattered on terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoodadStats {
    /// Doodads per unit of block half-width
    pub density: f32,
    pub width: IntRange,
    /// Height as a multiple of width, sampled in `[min, max]`
    pub height_factor_min: f32,
    pub height_factor_max: f32,
    pub texture_count: TextureId,
}

impl Default for DoodadStats {
    fn default() -> Self {
        Self {
            density: 0.004,
            width: IntRange::new(80, 240),
            height_factor_min: 1.5,
            height_factor_max: 3.5,
            texture_count: 10,
        }
    }
}

/// Wave schedule and win/lose conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Simulation time between automatic waves; `None` leaves waves to the caller
    pub wave_interval_ms: Option<f64>,
    /// Waves that must be spawned and cleared to win; 0 disables winning
    pub waves_to_win: u32,
    /// An enemy reaching this x loses the game
    pub right_border: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            wave_interval_ms: Some(30_000.0),
            waves_to_win: 10,
            right_border: 26_000.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub capacities: Capacities,
    pub towers: TowerTable,
    pub wall: WallStats,
    pub wave: WaveStats,
    pub terrain: Vec<TerrainBlock>,
    pub doodads: DoodadStats,
    pub rules: Rules,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            capacities: Capacities::default(),
            towers: TowerTable::default(),
            wall: WallStats::default(),
            wave: WaveStats::default(),
            terrain: default_terrain(),
            doodads: DoodadStats::default(),
            rules: Rules::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would produce undefined motion or empty ranges
    pub fn validate(&self) -> Result<(), SimError> {
        self.capacities.validate()?;

        for kind in TowerKind::ALL {
            self.towers
                .stats(kind)
                .validate(&format!("towers.{kind:?}").to_lowercase())?;
        }

        let wall = &self.wall;
        if !(wall.hit_points > 0.0) {
            return Err(SimError::tuning("wall.hit_points", "must be positive"));
        }
        validate_size("wall.size", wall.size)?;
        validate_surface("wall", wall.friction, wall.restitution)?;

        let wave = &self.wave;
        wave.hit_points.validate("wave.hit_points")?;
        wave.rest_velocity.validate("wave.rest_velocity")?;
        wave.spawn_x.validate("wave.spawn_x")?;
        wave.spawn_y.validate("wave.spawn_y")?;
        wave.size.validate("wave.size")?;
        if wave.hit_points.min <= 0 {
            return Err(SimError::tuning("wave.hit_points", "must be positive"));
        }
        if wave.size.min <= 0 {
            return Err(SimError::tuning("wave.size", "must be positive"));
        }
        if !(wave.explosion_range >= 0.0 && wave.explosion_damage >= 0.0) {
            return Err(SimError::tuning("wave.explosion_range", "must be non-negative"));
        }
        validate_surface("wave", wave.friction, wave.restitution)?;

        for (i, block) in self.terrain.iter().enumerate() {
            validate_size(&format!("terrain[{i}].size"), block.size)?;
            if !block.pos.is_finite() {
                return Err(SimError::tuning(format!("terrain[{i}].pos"), "must be finite"));
            }
        }

        let doodads = &self.doodads;
        doodads.width.validate("doodads.width")?;
        if doodads.width.min <= 0 {
            return Err(SimError::tuning("doodads.width", "must be positive"));
        }
        if !(doodads.density >= 0.0) {
            return Err(SimError::tuning("doodads.density", "must be non-negative"));
        }
        if !(doodads.height_factor_min > 0.0 && doodads.height_factor_min <= doodads.height_factor_max) {
            return Err(SimError::tuning(
                "doodads.height_factor_min",
                "must be positive and not exceed height_factor_max",
            ));
        }

        if let Some(interval) = self.rules.wave_interval_ms {
            if !(interval > 0.0) {
                return Err(SimError::tuning("rules.wave_interval_ms", "must be positive"));
            }
        }
        if !self.rules.right_border.is_finite() {
            return Err(SimError::tuning("rules.right_border", "must be finite"));
        }

        Ok(())
    }
}

fn validate_size(field: &str, size: Vec2) -> Result<(), SimError> {
    if !(size.x > 0.0 && size.y > 0.0 && size.is_finite()) {
        return Err(SimError::tuning(field, "must be positive and finite"));
    }
    Ok(())
}

fn validate_surface(field: &str, friction: f32, restitution: f32) -> Result<(), SimError> {
    if !(friction >= 0.0 && friction.is_finite()) {
        return Err(SimError::tuning(format!("{field}.friction"), "must be non-negative"));
    }
    if !(restitution >= 0.0 && restitution.is_finite()) {
        return Err(SimError::tuning(format!("{field}.restitution"), "must be non-negative"));
    }
    Ok(())
}
