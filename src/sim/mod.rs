//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod explosion;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod tower;
pub mod vector;

pub use body::Body;
pub use collision::{Axis, boxes_overlap, collide_among, collide_between, resolve_box_collision};
pub use entity::{CoolDown, EnemyState, Entity, EntityKind, TextureId, TowerKind, TowerState};
pub use explosion::Explosion;
pub use pool::{Handle, Pool, Poolable};
pub use projectile::Projectile;
pub use state::{GamePhase, World};
pub use tick::{FrameClock, TickInput, TickReport, tick};
pub use vector::Vector2Ext;
