//! Horde Defence - A 2D side-scrolling tower defence simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, pooled entities)
//! - `scene`: Read-only view of the world for a renderer
//! - `camera`: Presentation camera driven by pan/zoom intents
//! - `tuning`: Data-driven game balance
//! - `error`: Error types for construction and configuration

pub mod camera;
pub mod error;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use camera::Camera;
pub use error::SimError;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds advanced per tick
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Flat velocity delta added to every moving body each tick.
    /// Only valid at `SIM_DT`; do not scale by a variable dt.
    pub const GRAVITY: f32 = 4.0;

    /// Projectile lifetime on launch (ms)
    pub const PROJECTILE_LIFETIME_MS: f32 = 5000.0;
    /// Half-extent of a projectile (render only, hits are point tests)
    pub const PROJECTILE_HALF_SIZE: f32 = 6.0;
    /// Per-axis spread added to the unit aim vector
    pub const PROJECTILE_SPREAD: f32 = 0.08;

    /// Enemy cruise relaxation per tick
    pub const ENEMY_CRUISE_RELAXATION: f32 = 0.01;
    /// Squared distance to a tower or wall that makes an enemy detonate
    pub const EXPLOSION_TRIGGER_DIST_SQ: f32 = 200.0 * 200.0;
    /// Scale of the inverse-square blast impulse
    pub const BLAST_IMPULSE: f32 = 1.0e8;

    /// Impact flash spawned by a projectile hit
    pub const IMPACT_FLASH_LIFETIME_MS: f32 = 500.0;
    /// Radius growth of a live explosion per tick
    pub const EXPLOSION_GROWTH_PER_TICK: f32 = 5.0;

    /// Position over-correction applied when separating boxes
    pub const SEPARATION_SLOP: f32 = 1.01;
}
