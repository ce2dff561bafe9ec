//! World state and spawning
//!
//! The `World` owns every pool, the seeded RNG and the simulation clock.
//! All spawns follow the pool contract: claim the first dead slot, or do
//! nothing and report it through the return value.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::entity::{CoolDown, EnemyState, Entity, EntityKind, TowerKind, TowerState};
use super::explosion::Explosion;
use super::pool::{Handle, Pool};
use super::projectile::Projectile;
use crate::consts::SIM_DT_MS;
use crate::error::SimError;
use crate::tuning::{IntRange, Tuning};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advancing
    #[default]
    Running,
    /// Frozen by the player
    Paused,
    /// All scheduled waves spawned and destroyed
    Won,
    /// An enemy crossed the right border
    Lost,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Waves spawned so far
    pub waves_spawned: u32,
    /// Clock time (ms) of the next scheduled wave
    pub next_wave_ms: Option<f64>,

    pub terrain: Pool<Entity>,
    pub doodads: Vec<Entity>,
    pub towers: Pool<Entity>,
    pub enemies: Pool<Entity>,
    pub walls: Pool<Entity>,
    pub projectiles: Pool<Projectile>,
    pub explosions: Pool<Explosion>,

    pub(crate) rng: Pcg32,
}

impl World {
    /// Build a world from validated tuning: pools, landscape and doodads
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning.validate()?;

        let terrain = tuning
            .terrain
            .iter()
            .map(|block| {
                Body::fixed(block.pos, block.size * 0.5)
                    .map(|body| Entity::new(body, 1.0, None, EntityKind::Terrain))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let caps = tuning.capacities.clone();
        let mut world = Self {
            seed,
            phase: GamePhase::Running,
            time_ticks: 0,
            waves_spawned: 0,
            next_wave_ms: tuning.rules.wave_interval_ms,
            terrain: Pool::from_vec(terrain),
            doodads: Vec::new(),
            towers: Pool::with_capacity(caps.towers),
            enemies: Pool::with_capacity(caps.enemies),
            walls: Pool::with_capacity(caps.walls),
            projectiles: Pool::with_capacity(caps.projectiles),
            explosions: Pool::with_capacity(caps.explosions),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        };
        world.scatter_doodads();

        log::info!(
            "World created: seed={}, terrain={}, doodads={}",
            seed,
            world.terrain.capacity(),
            world.doodads.len()
        );
        Ok(world)
    }

    /// Simulation clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * SIM_DT_MS
    }

    /// Place a tower; `None` if every tower slot is in use
    pub fn spawn_tower(&mut self, kind: TowerKind, pos: Vec2) -> Option<Handle> {
        let stats = self.tuning.towers.stats(kind);
        let half = stats.size * 0.5;
        let body = Body {
            pos,
            vel: Vec2::ZERO,
            half_size: half,
            inverse_mass: Body::inverse_mass_for(half),
            friction: stats.friction,
            restitution: stats.restitution,
        };
        let tower = Entity::new(
            body,
            stats.hit_points,
            Some(stats.texture),
            EntityKind::Tower(TowerState {
                kind,
                target: None,
                cool_down: CoolDown::Ready,
                cool_down_ms: stats.cool_down_ms,
                num_projectiles: stats.num_projectiles,
                projectile_damage: stats.projectile_damage,
                projectile_speed: stats.projectile_speed,
                min_range_sq: stats.min_range * stats.min_range,
                max_range_sq: stats.max_range * stats.max_range,
            }),
        );

        let handle = self.towers.spawn(|slot| *slot = tower);
        match handle {
            Some(h) => log::debug!("{kind:?} tower placed at {pos} (slot {})", h.index),
            None => log::debug!("tower pool full, {kind:?} at {pos} dropped"),
        }
        handle
    }

    /// Place a wall block; `None` if every wall slot is in use
    pub fn spawn_wall(&mut self, pos: Vec2) -> Option<Handle> {
        let stats = &self.tuning.wall;
        let half = stats.size * 0.5;
        let body = Body {
            pos,
            vel: Vec2::ZERO,
            half_size: half,
            inverse_mass: Body::inverse_mass_for(half),
            friction: stats.friction,
            restitution: stats.restitution,
        };
        let wall = Entity::new(body, stats.hit_points, Some(stats.texture), EntityKind::Wall);

        let handle = self.walls.spawn(|slot| *slot = wall);
        if handle.is_none() {
            log::debug!("wall pool full, wall at {pos} dropped");
        }
        handle
    }

    /// Reinitialize up to `count` dead enemy slots with randomized stats.
    ///
    /// Returns how many enemies were actually spawned.
    pub fn spawn_enemies(&mut self, count: usize) -> usize {
        let wave = &self.tuning.wave;
        let rng = &mut self.rng;
        let spawned = self.enemies.spawn_many(count, |slot| {
            let hit_points = sample(rng, wave.hit_points);
            let size = sample(rng, wave.size);
            let half = Vec2::splat(size * 0.5);
            let texture = rng.random_range(0..wave.texture_count.max(1));
            let rest_velocity = sample(rng, wave.rest_velocity);
            let pos = Vec2::new(sample(rng, wave.spawn_x), sample(rng, wave.spawn_y));

            *slot = Entity::new(
                Body {
                    pos,
                    vel: Vec2::ZERO,
                    half_size: half,
                    inverse_mass: Body::inverse_mass_for(half),
                    friction: wave.friction,
                    restitution: wave.restitution,
                },
                hit_points,
                Some(texture),
                EntityKind::Enemy(EnemyState {
                    rest_velocity,
                    explosion_range_sq: wave.explosion_range * wave.explosion_range,
                    explosion_damage: wave.explosion_damage,
                }),
            );
        });
        if spawned < count {
            log::debug!("enemy pool full: {} of {} spawn requests dropped", count - spawned, count);
        }
        spawned
    }

    /// Spawn one scheduled wave and count it toward the win condition
    pub fn spawn_wave(&mut self) -> usize {
        let spawned = self.spawn_enemies(self.tuning.wave.enemies_per_wave);
        self.waves_spawned += 1;
        log::info!(
            "Wave {} spawned {} enemies ({} alive)",
            self.waves_spawned,
            spawned,
            self.enemies.live_count()
        );
        spawned
    }

    /// Cosmetic explosion; `None` if the explosion pool is full
    pub fn spawn_explosion(&mut self, explosion: Explosion) -> Option<Handle> {
        self.explosions.spawn(|slot| *slot = explosion)
    }

    /// Decorations resting on top of each terrain block
    fn scatter_doodads(&mut self) {
        let stats = &self.tuning.doodads;
        let rng = &mut self.rng;
        for block in self.terrain.live() {
            let body = &block.body;
            let count = (body.half_size.x * stats.density).ceil() as usize;
            for _ in 0..count {
                let width = sample(rng, stats.width);
                let height = width * rng.random_range(stats.height_factor_min..=stats.height_factor_max);
                let x = rng.random_range(body.min().x..=body.max().x);
                let y = body.min().y - height * 0.5;
                let texture = rng.random_range(0..stats.texture_count.max(1));

                let body = Body {
                    pos: Vec2::new(x, y),
                    half_size: Vec2::new(width, height) * 0.5,
                    ..Body::default()
                };
                self.doodads
                    .push(Entity::new(body, 1.0, Some(texture), EntityKind::Doodad));
            }
        }
    }
}

#[inline]
fn sample<R: Rng + ?Sized>(rng: &mut R, range: IntRange) -> f32 {
    rng.random_range(range.min..=range.max) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> World {
        let mut tuning = Tuning::default();
        tuning.capacities.enemies = 2;
        tuning.capacities.towers = 1;
        tuning.capacities.walls = 1;
        World::new(42, tuning).unwrap()
    }

    #[test]
    fn test_world_builds_landscape() {
        let world = World::new(1, Tuning::default()).unwrap();
        assert_eq!(world.terrain.live_count(), 5);
        assert!(world.terrain.live().all(|t| t.body.is_static()));
        assert!(!world.doodads.is_empty());
        assert_eq!(world.enemies.capacity(), 1000);
        assert_eq!(world.enemies.live_count(), 0);
    }

    #[test]
    fn test_doodads_rest_on_terrain() {
        let world = World::new(3, Tuning::default()).unwrap();
        let ground = &world.terrain.as_slice()[0].body;
        let on_ground: Vec<_> = world
            .doodads
            .iter()
            .filter(|d| d.pos().x >= ground.min().x && d.pos().x <= ground.max().x)
            .filter(|d| (d.body.max().y - ground.min().y).abs() < 1e-2)
            .collect();
        assert!(!on_ground.is_empty());
        assert!(world.doodads.iter().all(|d| d.body.is_static()));
    }

    #[test]
    fn test_wave_capped_by_capacity() {
        let mut world = small_world();
        assert_eq!(world.spawn_enemies(5), 2);
        assert_eq!(world.enemies.live_count(), 2);

        let before: Vec<_> = world.enemies.as_slice().to_vec();
        assert_eq!(world.spawn_enemies(1), 0);
        assert_eq!(world.enemies.as_slice(), &before[..]);
    }

    #[test]
    fn test_enemy_stats_within_ranges() {
        let mut world = World::new(9, Tuning::default()).unwrap();
        world.spawn_wave();
        assert_eq!(world.enemies.live_count(), 50);
        for e in world.enemies.live() {
            assert!((50.0..=300.0).contains(&e.hit_points));
            assert!((-9000.0..=-8000.0).contains(&e.pos().x));
            assert!((25.0..=50.0).contains(&e.body.half_size.x));
            assert!(e.body.inverse_mass > 0.0);
            let state = e.as_enemy().unwrap();
            assert!((300.0..=500.0).contains(&state.rest_velocity));
            assert_eq!(state.explosion_range_sq, 250_000.0);
            assert!(e.texture.unwrap() < 3);
        }
        assert_eq!(world.waves_spawned, 1);
    }

    #[test]
    fn test_spawn_tower_uses_kind_stats() {
        let mut world = small_world();
        let h = world.spawn_tower(TowerKind::Heavy, Vec2::new(100.0, 0.0)).unwrap();
        let tower = world.towers.get(h).unwrap();
        assert_eq!(tower.hit_points, 600.0);
        assert_eq!(tower.body.half_size, Vec2::new(150.0, 100.0));
        assert_eq!(tower.body.inverse_mass, 1.0 / 15000.0);
        let state = tower.as_tower().unwrap();
        assert_eq!(state.max_range_sq, 8000.0 * 8000.0);

        // Pool of one is now full
        assert!(world.spawn_tower(TowerKind::Tiny, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_spawn_wall() {
        let mut world = small_world();
        assert!(world.spawn_wall(Vec2::new(500.0, 0.0)).is_some());
        assert!(world.spawn_wall(Vec2::new(900.0, 0.0)).is_none());
        assert_eq!(world.walls.live_count(), 1);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = World::new(77, Tuning::default()).unwrap();
        let b = World::new(77, Tuning::default()).unwrap();
        assert_eq!(a.doodads, b.doodads);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = Tuning::default();
        tuning.terrain[0].size.x = -5.0;
        assert!(World::new(0, tuning).is_err());
    }
}
