//! Axis-aligned box collision detection and response
//!
//! A single-pass impulse resolver: no rotation, no contact persistence, no
//! solver iterations. Each overlapping pair is pushed apart along the axis
//! of least penetration, with velocity corrected by restitution on that axis
//! and damped by friction on the other.

use glam::Vec2;

use super::body::Body;
use super::entity::Entity;
use super::projectile::Projectile;
use crate::consts::SEPARATION_SLOP;

/// Axis a collision was resolved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Box-box overlap test with early outs on each separating side.
///
/// Touching edges count as overlapping.
pub fn boxes_overlap(a: &Body, b: &Body) -> bool {
    if a.pos.x - a.half_size.x > b.pos.x + b.half_size.x {
        return false;
    }
    if a.pos.x + a.half_size.x < b.pos.x - b.half_size.x {
        return false;
    }
    if a.pos.y + a.half_size.y < b.pos.y - b.half_size.y {
        return false;
    }
    if a.pos.y - a.half_size.y > b.pos.y + b.half_size.y {
        return false;
    }
    true
}

/// Sign that maps zero to zero (coincident centers get no push)
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Separate two overlapping boxes and exchange velocity.
///
/// Returns the resolution axis, or `None` when both bodies are static.
pub fn resolve_box_collision(a: &mut Body, b: &mut Body) -> Option<Axis> {
    let sum_inverse_mass = a.inverse_mass + b.inverse_mass;
    if sum_inverse_mass <= 0.0 {
        return None;
    }
    let reduced_mass = 1.0 / sum_inverse_mass;
    let share_a = a.inverse_mass * reduced_mass;
    let share_b = b.inverse_mass * reduced_mass;

    let dist = a.pos - b.pos;
    let rel_vel = a.vel - b.vel;
    // Negative while overlapping; the larger value is the shallower axis
    let penetration = dist.abs() - (a.half_size + b.half_size);

    if penetration.x > penetration.y {
        let push = SEPARATION_SLOP * sign(dist.x) * penetration.x;

        a.vel.y -= a.friction * rel_vel.y * share_a;
        a.vel.x -= (1.0 + a.restitution) * rel_vel.x * share_a;
        a.pos.x -= push * share_a;

        b.vel.y += b.friction * rel_vel.y * share_b;
        b.vel.x += (1.0 + b.restitution) * rel_vel.x * share_b;
        b.pos.x += push * share_b;

        Some(Axis::X)
    } else {
        let push = SEPARATION_SLOP * sign(dist.y) * penetration.y;

        a.vel.x -= a.friction * rel_vel.x * share_a;
        a.vel.y -= (1.0 + a.restitution) * rel_vel.y * share_a;
        a.pos.y -= push * share_a;

        b.vel.x += b.friction * rel_vel.x * share_b;
        b.vel.y += (1.0 + b.restitution) * rel_vel.y * share_b;
        b.pos.y += push * share_b;

        Some(Axis::Y)
    }
}

/// Collide every live entity in `group_a` against every live entity in `group_b`
pub fn collide_between(group_a: &mut [Entity], group_b: &mut [Entity]) -> usize {
    let mut contacts = 0;
    for a in group_a.iter_mut() {
        if !a.is_alive() {
            continue;
        }
        for b in group_b.iter_mut() {
            if !b.is_alive() {
                continue;
            }
            if boxes_overlap(&a.body, &b.body) && resolve_box_collision(&mut a.body, &mut b.body).is_some() {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Collide every unordered pair of live entities within one group
pub fn collide_among(group: &mut [Entity]) -> usize {
    let mut contacts = 0;
    for i in 0..group.len() {
        let (head, tail) = group.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_alive() {
            continue;
        }
        for b in tail.iter_mut() {
            if !b.is_alive() {
                continue;
            }
            if boxes_overlap(&a.body, &b.body) && resolve_box_collision(&mut a.body, &mut b.body).is_some() {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Point-in-box hits of projectiles on enemies.
///
/// Each hit applies the projectile's damage, kills the projectile and
/// reports the impact point to `on_hit`. Returns the hit count.
pub fn projectile_hits(
    projectiles: &mut [Projectile],
    enemies: &mut [Entity],
    mut on_hit: impl FnMut(Vec2),
) -> usize {
    let mut hits = 0;
    for enemy in enemies.iter_mut() {
        for projectile in projectiles.iter_mut() {
            if !enemy.is_alive() {
                break;
            }
            if !projectile.is_alive() || !projectile.hits(enemy) {
                continue;
            }
            enemy.apply_damage(projectile.damage);
            projectile.expire();
            on_hit(projectile.pos);
            hits += 1;
        }
    }
    hits
}
