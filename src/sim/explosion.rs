//! Blast model and the cosmetic explosion entity
//!
//! Blast damage scales with `d² / range²`, so a target at the edge of the
//! range takes the full damage and one at the center takes none. The push
//! is an inverse-square impulse away from the blast origin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::pool::Poolable;
use super::vector::Vector2Ext;
use crate::consts::{BLAST_IMPULSE, EXPLOSION_GROWTH_PER_TICK, SIM_DT, SIM_DT_MS};

/// Damage dealt by a blast to a target `dist_sq` away (range inclusive)
#[inline]
pub fn blast_damage(max_damage: f32, dist_sq: f32, range_sq: f32) -> f32 {
    if range_sq <= 0.0 {
        return 0.0;
    }
    max_damage * (dist_sq / range_sq)
}

/// Velocity change pushing a target at `target_pos` away from `origin`.
///
/// `None` when the two points coincide.
#[inline]
pub fn blast_impulse(origin: Vec2, target_pos: Vec2, inverse_mass: f32) -> Option<Vec2> {
    let delta = origin - target_pos;
    let dist_sq = delta.length_squared();
    if dist_sq <= f32::EPSILON {
        return None;
    }
    Some(-(delta / dist_sq) * inverse_mass * BLAST_IMPULSE)
}

/// Damage and push every live entity within `range_sq` of `origin`.
///
/// Returns the number of entities affected.
pub fn apply_blast(origin: Vec2, range_sq: f32, damage: f32, targets: &mut [Entity]) -> usize {
    let mut affected = 0;
    for target in targets.iter_mut().filter(|t| t.is_alive()) {
        let dist_sq = origin.dist_sq(target.pos());
        if dist_sq > range_sq {
            continue;
        }
        let dealt = blast_damage(damage, dist_sq, range_sq);
        if dealt > 0.0 {
            log::debug!("blast at {origin} deals {dealt:.1} to entity at {}", target.pos());
        }
        target.apply_damage(dealt);
        if let Some(dv) = blast_impulse(origin, target.pos(), target.body.inverse_mass) {
            target.body.vel += dv;
        }
        affected += 1;
    }
    affected
}

/// Push (no damage) every live entity within `range_sq` of `origin`
pub fn apply_knockback(origin: Vec2, range_sq: f32, targets: &mut [Entity]) -> usize {
    let mut affected = 0;
    for target in targets.iter_mut().filter(|t| t.is_alive()) {
        if origin.dist_sq(target.pos()) > range_sq {
            continue;
        }
        if let Some(dv) = blast_impulse(origin, target.pos(), target.body.inverse_mass) {
            target.body.vel += dv;
        }
        affected += 1;
    }
    affected
}

/// Pooled radial glow; its radius doubles as an optional damage radius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining lifetime (ms)
    pub life_time: f32,
    /// Lifetime at spawn, for fading
    pub initial_life_time: f32,
    /// Damage at the edge of the radius
    pub strength: f32,
}

impl Poolable for Explosion {
    #[inline]
    fn is_alive(&self) -> bool {
        self.life_time > 0.0
    }
}

impl Explosion {
    pub fn new(pos: Vec2, vel: Vec2, life_time: f32, strength: f32) -> Self {
        Self {
            pos,
            vel,
            radius: 0.0,
            life_time,
            initial_life_time: life_time,
            strength,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        Poolable::is_alive(self)
    }

    /// Drift, grow, and burn one tick of lifetime
    pub fn update(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.life_time -= SIM_DT_MS as f32;
        self.pos += self.vel * SIM_DT;
        self.radius += EXPLOSION_GROWTH_PER_TICK;
    }

    /// Remaining lifetime in `[0, 1]`, used as render alpha
    pub fn life_fraction(&self) -> f32 {
        if self.initial_life_time > 0.0 {
            (self.life_time / self.initial_life_time).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Area damage using the current radius as range and strength as damage
    pub fn damage_within_radius(&self, targets: &mut [Entity]) -> usize {
        if !self.is_alive() {
            return 0;
        }
        apply_blast(self.pos, self.radius * self.radius, self.strength, targets)
    }
}
