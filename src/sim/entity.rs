//! Game entities: a physical body plus hit points and kind-specific state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::pool::{Handle, Poolable};

/// Index into a texture table owned by the renderer
pub type TextureId = u16;

/// Tower archetypes selectable by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Long range, heavy armor, big shells, slow reload
    Heavy,
    /// Short range volley of many weak pellets
    Shotgun,
    Medium,
    /// Tiny damage, near-continuous fire
    Tiny,
    Small,
}

impl TowerKind {
    pub const ALL: [TowerKind; 5] = [
        TowerKind::Heavy,
        TowerKind::Shotgun,
        TowerKind::Medium,
        TowerKind::Tiny,
        TowerKind::Small,
    ];

    /// Map a 1-based selection slot (number keys) to a kind
    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.get(usize::from(slot).checked_sub(1)?).copied()
    }
}

/// Fire readiness, re-checked against the simulation clock each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CoolDown {
    #[default]
    Ready,
    Cooling {
        /// Simulation time (ms) at which the tower may fire again
        until_ms: f64,
    },
}

/// Turret state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerState {
    pub kind: TowerKind,
    /// Weak reference into the enemy pool
    pub target: Option<Handle>,
    pub cool_down: CoolDown,
    pub cool_down_ms: f64,
    pub num_projectiles: u32,
    pub projectile_damage: f32,
    pub projectile_speed: f32,
    pub min_range_sq: f32,
    pub max_range_sq: f32,
}

/// Horde member state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Horizontal cruise speed the enemy relaxes toward
    pub rest_velocity: f32,
    pub explosion_range_sq: f32,
    pub explosion_damage: f32,
}

/// What an entity is, with the fields only that kind carries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum EntityKind {
    Tower(TowerState),
    Enemy(EnemyState),
    /// Player-placed destructible block
    Wall,
    /// Decoration, never collides
    #[default]
    Doodad,
    /// Static landscape block
    Terrain,
}

/// A pooled body with health
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub body: Body,
    pub hit_points: f32,
    pub max_hit_points: f32,
    pub texture: Option<TextureId>,
    pub kind: EntityKind,
}

impl Poolable for Entity {
    #[inline]
    fn is_alive(&self) -> bool {
        self.hit_points > 0.0
    }
}

impl Entity {
    /// Live entity at full health
    pub fn new(body: Body, hit_points: f32, texture: Option<TextureId>, kind: EntityKind) -> Self {
        Self {
            body,
            hit_points,
            max_hit_points: hit_points,
            texture,
            kind,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        Poolable::is_alive(self)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Integrate the body if the entity is alive
    pub fn integrate(&mut self) {
        if self.is_alive() {
            self.body.integrate();
        }
    }

    /// Subtract damage, keeping hit points within `[0, max]`
    pub fn apply_damage(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        self.hit_points = (self.hit_points - amount.max(0.0)).clamp(0.0, self.max_hit_points);
    }

    /// Remaining health in `[0, 1]` for health bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_hit_points > 0.0 {
            (self.hit_points / self.max_hit_points).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn as_tower(&self) -> Option<&TowerState> {
        match &self.kind {
            EntityKind::Tower(tower) => Some(tower),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyState> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }
}
