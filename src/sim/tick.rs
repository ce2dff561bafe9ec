//! Fixed timestep simulation tick
//!
//! Advances the world by exactly one `SIM_DT` in a fixed order:
//! intents, physics integration, tower and enemy behavior, projectile and
//! explosion motion, projectile hits, body-body collisions, then the wave
//! schedule and win/lose rules.

use glam::Vec2;

use super::collision::{collide_among, collide_between, projectile_hits};
use super::enemy::update_enemies;
use super::entity::TowerKind;
use super::explosion::Explosion;
use super::state::{GamePhase, World};
use super::tower::update_tower;
use crate::consts::{IMPACT_FLASH_LIFETIME_MS, MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Towers to place before physics runs
    pub spawn_towers: Vec<(TowerKind, Vec2)>,
    /// Wall blocks to place before physics runs
    pub spawn_walls: Vec<Vec2>,
    /// Spawn a wave now, outside the schedule
    pub spawn_wave: bool,
    /// Pause toggle
    pub pause: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub projectiles_fired: usize,
    pub detonations: usize,
    pub projectile_hits: usize,
    pub contacts: usize,
    pub enemies_spawned: usize,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    if input.pause {
        match world.phase {
            GamePhase::Running => {
                world.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", world.time_ticks);
            }
            GamePhase::Paused => {
                world.phase = GamePhase::Running;
                log::info!("Resumed at tick {}", world.time_ticks);
            }
            GamePhase::Won | GamePhase::Lost => {}
        }
    }
    if world.phase != GamePhase::Running {
        return report;
    }

    for &(kind, pos) in &input.spawn_towers {
        world.spawn_tower(kind, pos);
    }
    for &pos in &input.spawn_walls {
        world.spawn_wall(pos);
    }
    if input.spawn_wave {
        report.enemies_spawned += world.spawn_wave();
    }

    world.time_ticks += 1;
    let now_ms = world.now_ms();

    let World {
        terrain,
        towers,
        enemies,
        walls,
        projectiles,
        explosions,
        rng,
        ..
    } = world;

    // Physics
    for group in [&mut *terrain, &mut *towers, &mut *enemies, &mut *walls] {
        for entity in group.as_mut_slice() {
            entity.integrate();
        }
    }

    // Behavior
    for tower in towers.as_mut_slice() {
        report.projectiles_fired += update_tower(tower, enemies, projectiles, rng, now_ms);
    }
    report.detonations = update_enemies(enemies, towers, walls);
    for projectile in projectiles.as_mut_slice() {
        projectile.update();
    }
    for explosion in explosions.as_mut_slice() {
        explosion.update();
    }

    // Hits
    report.projectile_hits = projectile_hits(
        projectiles.as_mut_slice(),
        enemies.as_mut_slice(),
        |at| {
            let flash = Explosion::new(at, Vec2::ZERO, IMPACT_FLASH_LIFETIME_MS, 0.0);
            if explosions.spawn(|slot| *slot = flash).is_none() {
                log::debug!("explosion pool full, impact flash at {at} dropped");
            }
        },
    );

    // Collisions
    report.contacts += collide_between(towers.as_mut_slice(), terrain.as_mut_slice());
    report.contacts += collide_between(enemies.as_mut_slice(), terrain.as_mut_slice());
    report.contacts += collide_between(walls.as_mut_slice(), terrain.as_mut_slice());
    report.contacts += collide_between(walls.as_mut_slice(), enemies.as_mut_slice());
    report.contacts += collide_between(walls.as_mut_slice(), towers.as_mut_slice());
    report.contacts += collide_among(walls.as_mut_slice());
    report.contacts += collide_among(towers.as_mut_slice());

    report.enemies_spawned += run_wave_schedule(world, now_ms);
    update_phase(world);

    report
}

/// Spawn the next scheduled wave once its deadline passes
fn run_wave_schedule(world: &mut World, now_ms: f64) -> usize {
    let Some(next_ms) = world.next_wave_ms else {
        return 0;
    };
    if now_ms < next_ms {
        return 0;
    }

    let rules = &world.tuning.rules;
    let schedule_done = rules.waves_to_win > 0 && world.waves_spawned >= rules.waves_to_win;
    world.next_wave_ms = match (schedule_done, rules.wave_interval_ms) {
        (false, Some(interval)) => Some(next_ms + interval),
        _ => None,
    };
    if schedule_done {
        return 0;
    }
    world.spawn_wave()
}

/// Lost if any enemy reached the right border, won once every wave is cleared
fn update_phase(world: &mut World) {
    let rules = &world.tuning.rules;
    let breached = world
        .enemies
        .live()
        .any(|enemy| enemy.pos().x >= rules.right_border);

    if breached {
        world.phase = GamePhase::Lost;
        log::info!("Horde reached the border at tick {}: game lost", world.time_ticks);
    } else if rules.waves_to_win > 0
        && world.waves_spawned >= rules.waves_to_win
        && world.enemies.live_count() == 0
    {
        world.phase = GamePhase::Won;
        log::info!("Horde destroyed at tick {}: game won", world.time_ticks);
    }
}

/// Converts variable frame time into a bounded number of fixed ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add elapsed frame time (seconds); returns how many ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, 0.1);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITY, PROJECTILE_SPREAD};
    use crate::sim::body::Body;
    use crate::sim::collision::boxes_overlap;
    use crate::sim::entity::{EnemyState, Entity, EntityKind};
    use crate::sim::projectile::Projectile;
    use crate::tuning::Tuning;

    /// No terrain, no automatic waves
    fn open_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.terrain.clear();
        tuning.rules.wave_interval_ms = None;
        tuning
    }

    fn add_enemy(world: &mut World, pos: Vec2, hit_points: f32) {
        let half = Vec2::splat(25.0);
        let body = Body::new(pos, half, Body::inverse_mass_for(half), 0.0, 1.0).unwrap();
        world
            .enemies
            .spawn(|slot| {
                *slot = Entity::new(
                    body,
                    hit_points,
                    Some(0),
                    EntityKind::Enemy(EnemyState {
                        rest_velocity: 400.0,
                        explosion_range_sq: 500.0 * 500.0,
                        explosion_damage: 100.0,
                    }),
                )
            })
            .unwrap();
    }

    #[test]
    fn test_tower_fires_single_shot_at_enemy() {
        let mut tuning = open_tuning();
        tuning.towers.medium.min_range = 0.0;
        tuning.towers.medium.max_range = 1000.0;
        let damage = tuning.towers.medium.projectile_damage;
        let speed = tuning.towers.medium.projectile_speed;

        let mut world = World::new(7, tuning).unwrap();
        add_enemy(&mut world, Vec2::new(500.0, 0.0), 100.0);
        let input = TickInput {
            spawn_towers: vec![(TowerKind::Medium, Vec2::ZERO)],
            ..Default::default()
        };

        let mut report = tick(&mut world, &input);
        for _ in 0..10 {
            if report.projectiles_fired > 0 {
                break;
            }
            report = tick(&mut world, &TickInput::default());
        }

        assert_eq!(report.projectiles_fired, 1);
        assert_eq!(world.projectiles.live_count(), 1);
        let shot = world.projectiles.live().next().unwrap();
        assert_eq!(shot.damage, damage);

        // One update has already added gravity to the launch velocity
        let dir = (shot.vel - Vec2::new(0.0, GRAVITY)) / speed;
        assert!((dir.x - 1.0).abs() <= PROJECTILE_SPREAD + 1e-4);
        assert!(dir.y.abs() <= PROJECTILE_SPREAD + 1e-4);
    }

    #[test]
    fn test_tick_pause() {
        let mut world = World::new(1, open_tuning()).unwrap();
        add_enemy(&mut world, Vec2::ZERO, 100.0);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks, 1);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Paused);

        let frozen = world.enemies.as_slice()[0].clone();
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks, 1);
        assert_eq!(world.enemies.as_slice()[0], frozen);

        // Unpause runs the tick too
        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.time_ticks, 2);
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut world = World::new(12, open_tuning()).unwrap();
        world.phase = GamePhase::Lost;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause);
        assert_eq!(world.phase, GamePhase::Lost);
        assert_eq!(world.time_ticks, 0);
    }

    #[test]
    fn test_intents_spawn_entities() {
        let mut world = World::new(2, open_tuning()).unwrap();
        let input = TickInput {
            spawn_towers: vec![(TowerKind::Tiny, Vec2::ZERO), (TowerKind::Heavy, Vec2::new(5000.0, 0.0))],
            spawn_walls: vec![Vec2::new(2000.0, 0.0)],
            spawn_wave: true,
            ..Default::default()
        };
        let report = tick(&mut world, &input);
        assert_eq!(world.towers.live_count(), 2);
        assert_eq!(world.walls.live_count(), 1);
        assert_eq!(report.enemies_spawned, 50);
        assert_eq!(world.waves_spawned, 1);
    }

    #[test]
    fn test_gravity_on_first_tick() {
        let mut world = World::new(3, open_tuning()).unwrap();
        add_enemy(&mut world, Vec2::new(-3000.0, 0.0), 100.0);
        tick(&mut world, &TickInput::default());
        let body = &world.enemies.as_slice()[0].body;
        assert_eq!(body.vel.y, GRAVITY);
        assert!((body.pos.y - GRAVITY * SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_enemies_stay_on_terrain() {
        let mut tuning = Tuning::default();
        tuning.rules.wave_interval_ms = None;
        let mut world = World::new(4, tuning).unwrap();
        // Ground block top face is y = -500
        add_enemy(&mut world, Vec2::new(0.0, -600.0), 100.0);
        for _ in 0..600 {
            tick(&mut world, &TickInput::default());
        }
        // Elastic enemies keep bouncing but never sink into the ground
        let enemy = &world.enemies.as_slice()[0];
        assert!(enemy.body.max().y <= -500.0 + 1.0);
        assert!(enemy.body.max().y > -900.0);
        assert!(enemy.pos().x > 0.0);
    }

    #[test]
    fn test_wall_blocks_enemy_on_ground() {
        let mut tuning = Tuning::default();
        tuning.rules.wave_interval_ms = None;
        // Tall enough that the enemy touches it while its center stays out of trigger range
        tuning.wall.size = Vec2::new(250.0, 1000.0);
        let mut world = World::new(10, tuning).unwrap();
        add_enemy(&mut world, Vec2::new(0.0, -525.0), 100.0);
        let input = TickInput {
            spawn_walls: vec![Vec2::new(1000.0, -1000.0)],
            ..Default::default()
        };

        let mut contacts = tick(&mut world, &input).contacts;
        for _ in 0..600 {
            contacts += tick(&mut world, &TickInput::default()).contacts;
        }

        let enemy = &world.enemies.as_slice()[0];
        let wall = &world.walls.as_slice()[0];
        assert!(enemy.is_alive());
        assert!(contacts > 0);
        // Unobstructed, the enemy would have cruised thousands of units past x = 1000
        assert!(enemy.body.max().x <= wall.body.min().x + 1.0);
        // Wall rests on the ground instead of falling through it
        assert!(wall.body.max().y <= -500.0 + 1.0);
        assert!(wall.body.max().y > -600.0);
    }

    #[test]
    fn test_overlapping_towers_and_walls_separate() {
        let mut world = World::new(11, open_tuning()).unwrap();
        let input = TickInput {
            spawn_towers: vec![
                (TowerKind::Tiny, Vec2::ZERO),
                (TowerKind::Tiny, Vec2::new(50.0, 0.0)),
                (TowerKind::Tiny, Vec2::new(6100.0, 0.0)),
            ],
            spawn_walls: vec![
                Vec2::new(3000.0, 0.0),
                Vec2::new(3100.0, 0.0),
                Vec2::new(6000.0, 0.0),
            ],
            ..Default::default()
        };
        let report = tick(&mut world, &input);
        assert_eq!(report.contacts, 3);

        let towers = world.towers.as_slice();
        let walls = world.walls.as_slice();
        // Among towers
        assert!(!boxes_overlap(&towers[0].body, &towers[1].body));
        assert!(towers[1].pos().x - towers[0].pos().x > 150.0);
        // Among walls
        assert!(!boxes_overlap(&walls[0].body, &walls[1].body));
        assert!(walls[1].pos().x - walls[0].pos().x > 250.0);
        // Wall against tower; the lighter tower moves further
        assert!(!boxes_overlap(&walls[2].body, &towers[2].body));
        assert!(towers[2].pos().x - 6100.0 > 6000.0 - walls[2].pos().x);
    }

    #[test]
    fn test_projectile_hit_spawns_impact_flash() {
        let mut world = World::new(5, open_tuning()).unwrap();
        add_enemy(&mut world, Vec2::ZERO, 100.0);
        world
            .projectiles
            .spawn(|p| {
                *p = Projectile {
                    pos: Vec2::ZERO,
                    vel: Vec2::ZERO,
                    life_time: 1000.0,
                    damage: 30.0,
                }
            })
            .unwrap();

        let report = tick(&mut world, &TickInput::default());
        assert_eq!(report.projectile_hits, 1);
        assert_eq!(world.enemies.as_slice()[0].hit_points, 70.0);
        assert_eq!(world.projectiles.live_count(), 0);
        let flash = world.explosions.live().next().unwrap();
        assert_eq!(flash.life_time, IMPACT_FLASH_LIFETIME_MS);
        assert_eq!(flash.strength, 0.0);
    }

    #[test]
    fn test_scheduled_wave() {
        let mut tuning = open_tuning();
        tuning.rules.wave_interval_ms = Some(100.0);
        tuning.wave.enemies_per_wave = 3;
        let mut world = World::new(6, tuning).unwrap();

        for _ in 0..4 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.waves_spawned, 0);
        for _ in 0..3 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.waves_spawned, 1);
        assert_eq!(world.enemies.live_count(), 3);
    }

    #[test]
    fn test_breach_loses_and_freezes() {
        let mut world = World::new(8, open_tuning()).unwrap();
        let border = world.tuning.rules.right_border;
        add_enemy(&mut world, Vec2::new(border + 10.0, 0.0), 100.0);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::Lost);

        let ticks = world.time_ticks;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks, ticks);
    }

    #[test]
    fn test_clearing_all_waves_wins() {
        let mut tuning = open_tuning();
        tuning.rules.waves_to_win = 1;
        tuning.capacities.enemies = 2;
        let mut world = World::new(9, tuning).unwrap();

        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::Running);

        let wave = TickInput {
            spawn_wave: true,
            ..Default::default()
        };
        tick(&mut world, &wave);
        assert_eq!(world.enemies.live_count(), 2);
        assert_eq!(world.phase, GamePhase::Running);

        for enemy in world.enemies.as_mut_slice() {
            enemy.hit_points = 0.0;
        }
        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::Won);
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs must give identical worlds
        let run = || {
            let mut world = World::new(99999, Tuning::default()).unwrap();
            let setup = TickInput {
                spawn_towers: vec![
                    (TowerKind::Tiny, Vec2::new(-7000.0, -560.0)),
                    (TowerKind::Shotgun, Vec2::new(-6500.0, -580.0)),
                ],
                spawn_walls: vec![Vec2::new(-6000.0, -625.0)],
                spawn_wave: true,
                ..Default::default()
            };
            tick(&mut world, &setup);
            for _ in 0..600 {
                tick(&mut world, &TickInput::default());
            }
            world
        };

        let a = run();
        let b = run();
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.enemies.as_slice(), b.enemies.as_slice());
        assert_eq!(a.towers.as_slice(), b.towers.as_slice());
        assert_eq!(a.walls.as_slice(), b.walls.as_slice());
        assert_eq!(a.projectiles.as_slice(), b.projectiles.as_slice());
        assert_eq!(a.explosions.as_slice(), b.explosions.as_slice());
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 2.5), 2);
        assert!(clock.alpha() > 0.4 && clock.alpha() < 0.6);

        // Long frames are clamped and bounded
        assert!(clock.advance(5.0) <= MAX_SUBSTEPS);
        assert_eq!(clock.advance(f32::NAN), clock.advance(0.0));

        clock.reset();
        assert_eq!(clock.advance(0.0), 0);
    }
}
