//! Horde behavior: cruise toward the right and detonate near defences

use glam::Vec2;

use super::entity::{EnemyState, Entity, EntityKind};
use super::explosion::{apply_blast, apply_knockback};
use super::pool::Pool;
use super::vector::Vector2Ext;
use crate::consts::{ENEMY_CRUISE_RELAXATION, EXPLOSION_TRIGGER_DIST_SQ};

/// Relax horizontal velocity toward the enemy's cruise speed
#[inline]
pub fn cruise(body_vel: &mut Vec2, rest_velocity: f32) {
    body_vel.x += (rest_velocity - body_vel.x) * ENEMY_CRUISE_RELAXATION;
}

/// Whether any live entity in `group` is close enough to set off a blast
pub fn in_trigger_range(pos: Vec2, group: &[Entity]) -> bool {
    group
        .iter()
        .any(|e| e.is_alive() && pos.dist_sq(e.pos()) < EXPLOSION_TRIGGER_DIST_SQ)
}

/// Blow up the enemy in `slot`.
///
/// Towers and walls in range take distance-scaled damage and a push; the
/// enemy dies; surviving enemies in range are only pushed.
pub fn detonate(
    slot: usize,
    enemies: &mut Pool<Entity>,
    towers: &mut Pool<Entity>,
    walls: &mut Pool<Entity>,
) {
    let Some(enemy) = enemies.as_mut_slice().get_mut(slot) else {
        return;
    };
    let Some(&EnemyState {
        explosion_range_sq,
        explosion_damage,
        ..
    }) = enemy.as_enemy()
    else {
        return;
    };
    let origin = enemy.pos();
    enemy.hit_points = 0.0;

    let towers_hit = apply_blast(origin, explosion_range_sq, explosion_damage, towers.as_mut_slice());
    let walls_hit = apply_blast(origin, explosion_range_sq, explosion_damage, walls.as_mut_slice());
    let pushed = apply_knockback(origin, explosion_range_sq, enemies.as_mut_slice());
    log::debug!(
        "enemy {slot} detonated at {origin}: {towers_hit} towers, {walls_hit} walls, {pushed} enemies pushed"
    );
}

/// Run one tick of behavior for every live enemy. Returns detonation count.
pub fn update_enemies(
    enemies: &mut Pool<Entity>,
    towers: &mut Pool<Entity>,
    walls: &mut Pool<Entity>,
) -> usize {
    let mut detonations = 0;
    for slot in 0..enemies.capacity() {
        let enemy = &mut enemies.as_mut_slice()[slot];
        if !enemy.is_alive() {
            continue;
        }
        let EntityKind::Enemy(state) = enemy.kind else {
            continue;
        };
        cruise(&mut enemy.body.vel, state.rest_velocity);

        let pos = enemy.pos();
        if in_trigger_range(pos, towers.as_slice()) || in_trigger_range(pos, walls.as_slice()) {
            detonate(slot, enemies, towers, walls);
            detonations += 1;
        }
    }
    detonations
}
