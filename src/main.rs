//! Horde Defence entry point
//!
//! Headless driver: builds a world, places a scripted defence and runs the
//! simulation through the frame accumulator, logging progress.
//!
//! Usage: `horde-defence [TUNING] [--seed N] [--max-seconds S]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use glam::Vec2;
    use horde_defence::Camera;
    use horde_defence::consts::SIM_DT;
    use horde_defence::scene::{Layer, Scene};
    use horde_defence::sim::{FrameClock, GamePhase, TickInput, TowerKind, World, tick};
    use horde_defence::tuning::Tuning;

    /// Simulated frame time; deliberately off the tick rate to exercise the accumulator
    const FRAME_DT: f32 = 1.0 / 50.0;
    const REPORT_EVERY_TICKS: u64 = 600;
    const DEFAULT_SEED: u64 = 12345;
    const DEFAULT_MAX_SECONDS: u32 = 600;

    /// Command-line arguments for the headless run.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub(crate) struct CliArgs {
        /// Tuning JSON overriding the built-in balance
        #[arg(value_name = "TUNING")]
        pub(crate) tuning: Option<PathBuf>,
        /// World seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        pub(crate) seed: u64,
        /// Simulated seconds before the run is cut off
        #[arg(
            long = "max-seconds",
            value_name = "SECONDS",
            default_value_t = DEFAULT_MAX_SECONDS,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        pub(crate) max_seconds: u32,
    }

    fn load_tuning(path: Option<&Path>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match Tuning::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring tuning {}: {err}", path.display());
                Tuning::default()
            }
        }
    }

    /// Defence line sitting on the ground block (top face at y = -500)
    fn opening_moves() -> TickInput {
        TickInput {
            spawn_towers: vec![
                (TowerKind::Tiny, Vec2::new(-3000.0, -560.0)),
                (TowerKind::Small, Vec2::new(-1000.0, -560.0)),
                (TowerKind::Medium, Vec2::new(0.0, -575.0)),
                (TowerKind::Shotgun, Vec2::new(2000.0, -580.0)),
                (TowerKind::Heavy, Vec2::new(6000.0, -600.0)),
            ],
            spawn_walls: vec![Vec2::new(-4000.0, -625.0), Vec2::new(-4000.0, -875.0)],
            spawn_wave: true,
            pause: false,
        }
    }

    fn leading_enemy(world: &World) -> Option<Vec2> {
        world
            .enemies
            .live()
            .map(|e| e.pos())
            .max_by(|a, b| a.x.total_cmp(&b.x))
    }

    pub fn run() {
        let args = CliArgs::parse();
        env_logger::init();
        log::info!("Horde Defence (headless) starting...");

        let tuning = load_tuning(args.tuning.as_deref());
        let mut world = match World::new(args.seed, tuning) {
            Ok(world) => world,
            Err(err) => {
                log::error!("Failed to build world: {err}");
                std::process::exit(1);
            }
        };

        let mut clock = FrameClock::new();
        let mut camera = Camera::default();
        let mut pending = Some(opening_moves());
        let mut fired = 0;
        let mut detonations = 0;
        let mut hits = 0;

        let max_frames = (args.max_seconds as f32 / FRAME_DT) as u32;
        for _ in 0..max_frames {
            for _ in 0..clock.advance(FRAME_DT) {
                let input = pending.take().unwrap_or_default();
                let report = tick(&mut world, &input);
                fired += report.projectiles_fired;
                detonations += report.detonations;
                hits += report.projectile_hits;

                if world.time_ticks % REPORT_EVERY_TICKS == 0 {
                    let scene = Scene::capture(&world);
                    log::info!(
                        "t={:.0}s enemies={} towers={} walls={} projectiles={} camera={:.0}",
                        world.time_ticks as f32 * SIM_DT,
                        scene.enemies_alive,
                        scene.count(Layer::Tower),
                        scene.count(Layer::Wall),
                        scene.count(Layer::Projectile),
                        camera.position,
                    );
                }
            }

            if let Some(lead) = leading_enemy(&world) {
                camera.rest_position = lead;
            }
            camera.update();

            if world.phase != GamePhase::Running {
                break;
            }
        }

        let scene = Scene::capture(&world);
        log::info!(
            "Finished at tick {} ({:?}): waves={} fired={} hits={} detonations={} enemies={} towers={}",
            world.time_ticks,
            world.phase,
            world.waves_spawned,
            fired,
            hits,
            detonations,
            scene.enemies_alive,
            scene.count(Layer::Tower),
        );
        println!("{:?} after {} ticks", world.phase, world.time_ticks);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Rendering targets embed the library directly
}
