//! Tower targeting and firing
//!
//! Towers re-select their target every tick: the closest live enemy whose
//! squared distance lies inside `[min_range_sq, max_range_sq]`. A ready tower
//! with a target fires a volley and then cools down until a deadline on the
//! simulation clock.

use glam::Vec2;
use rand::Rng;

use super::entity::{CoolDown, Entity, EntityKind};
use super::pool::{Handle, Pool};
use super::projectile::Projectile;
use super::vector::{Vector2Ext, random_in_square};
use crate::consts::{PROJECTILE_LIFETIME_MS, PROJECTILE_SPREAD};

/// Closest live enemy inside the engagement band (band edges inclusive).
///
/// Exact ties keep the first enemy in pool order.
pub fn select_target(
    from: Vec2,
    min_range_sq: f32,
    max_range_sq: f32,
    enemies: &Pool<Entity>,
) -> Option<Handle> {
    let mut best_inv_dist_sq = 0.0;
    let mut target = None;
    for (index, enemy) in enemies.as_slice().iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let dist_sq = from.dist_sq(enemy.pos());
        if dist_sq < min_range_sq || dist_sq > max_range_sq {
            continue;
        }
        let inv_dist_sq = 1.0 / dist_sq;
        if inv_dist_sq > best_inv_dist_sq {
            best_inv_dist_sq = inv_dist_sq;
            target = enemies.handle_at(index);
        }
    }
    target
}

/// Run one tick of tower behavior. Returns the number of projectiles launched.
pub fn update_tower<R: Rng + ?Sized>(
    tower: &mut Entity,
    enemies: &Pool<Entity>,
    projectiles: &mut Pool<Projectile>,
    rng: &mut R,
    now_ms: f64,
) -> usize {
    if !tower.is_alive() {
        return 0;
    }
    let pos = tower.body.pos;
    let EntityKind::Tower(state) = &mut tower.kind else {
        return 0;
    };

    if let CoolDown::Cooling { until_ms } = state.cool_down {
        if now_ms >= until_ms {
            state.cool_down = CoolDown::Ready;
        }
    }

    state.target = select_target(pos, state.min_range_sq, state.max_range_sq, enemies);

    if state.cool_down != CoolDown::Ready {
        return 0;
    }
    let Some(target) = state.target.and_then(|handle| enemies.get(handle)) else {
        return 0;
    };
    // Coincident target has no direction to aim along
    let Some(aim) = (target.pos() - pos).try_normalize() else {
        return 0;
    };

    let mut fired = 0;
    for _ in 0..state.num_projectiles {
        let vel = state.projectile_speed * (aim + random_in_square(rng, PROJECTILE_SPREAD));
        let damage = state.projectile_damage;
        let spawned = projectiles.spawn(|p| {
            *p = Projectile {
                pos,
                vel,
                life_time: PROJECTILE_LIFETIME_MS,
                damage,
            }
        });
        if spawned.is_none() {
            log::debug!("projectile pool exhausted, volley cut at {fired} shots");
            break;
        }
        fired += 1;
    }

    state.cool_down = CoolDown::Cooling {
        until_ms: now_ms + state.cool_down_ms,
    };
    fired
}
