//! Ballistic projectiles fired by towers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::pool::Poolable;
use crate::consts::{GRAVITY, SIM_DT, SIM_DT_MS};

/// A point projectile; alive while it has lifetime left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime (ms)
    pub life_time: f32,
    pub damage: f32,
}

impl Poolable for Projectile {
    #[inline]
    fn is_alive(&self) -> bool {
        self.life_time > 0.0
    }
}

impl Projectile {
    #[inline]
    pub fn is_alive(&self) -> bool {
        Poolable::is_alive(self)
    }

    /// Gravity, move, then burn one tick of lifetime
    pub fn update(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.vel.y += GRAVITY;
        self.pos += self.vel * SIM_DT;
        self.life_time -= SIM_DT_MS as f32;
    }

    /// Kill the projectile
    #[inline]
    pub fn expire(&mut self) {
        self.life_time = 0.0;
    }

    /// Point-in-box test against an enemy's half-extent
    #[inline]
    pub fn hits(&self, target: &Entity) -> bool {
        target.body.contains_point(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Body;
    use crate::sim::entity::EntityKind;

    #[test]
    fn test_update_is_ballistic() {
        let mut p = Projectile {
            pos: Vec2::ZERO,
            vel: Vec2::new(600.0, 0.0),
            life_time: 5000.0,
            damage: 10.0,
        };
        p.update();
        assert_eq!(p.vel.y, GRAVITY);
        assert!((p.pos.x - 10.0).abs() < 1e-4);
        assert!(p.life_time < 5000.0);
    }

    #[test]
    fn test_lifetime_runs_out() {
        let mut p = Projectile {
            life_time: 20.0,
            ..Default::default()
        };
        p.update();
        assert!(p.is_alive());
        p.update();
        assert!(!p.is_alive());

        // Dead projectiles are frozen
        let pos = p.pos;
        p.update();
        assert_eq!(p.pos, pos);
    }

    #[test]
    fn test_hits_is_point_containment() {
        let body = Body::fixed(Vec2::new(100.0, 0.0), Vec2::splat(25.0)).unwrap();
        let target = Entity::new(body, 10.0, None, EntityKind::Terrain);

        let mut p = Projectile {
            pos: Vec2::new(76.0, 24.0),
            life_time: 1.0,
            ..Default::default()
        };
        assert!(p.hits(&target));
        p.pos.x = 74.0;
        assert!(!p.hits(&target));
    }
}
