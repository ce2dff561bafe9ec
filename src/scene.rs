//! Read-only render view of the world
//!
//! A renderer reads a `Scene` captured after a tick completes; it never
//! sees the pools directly. Sprites are emitted in draw order.

use glam::Vec2;
use serde::Serialize;

use crate::consts::PROJECTILE_HALF_SIZE;
use crate::sim::entity::{Entity, TextureId};
use crate::sim::state::{GamePhase, World};

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Layer {
    Doodad,
    Wall,
    Tower,
    Enemy,
    Terrain,
    Projectile,
}

/// Textured (or untextured) axis-aligned quad
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub layer: Layer,
    pub position: Vec2,
    pub half_size: Vec2,
    /// `None` draws a plain filled block
    pub texture: Option<TextureId>,
    /// Health bar fill in `[0, 1]`
    pub health: f32,
}

/// Fading radial glow for explosions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glow {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    pub sprites: Vec<Sprite>,
    pub glows: Vec<Glow>,
    pub enemies_alive: usize,
    /// Time until the next scheduled wave, if any
    pub next_wave_in_ms: Option<f64>,
    pub phase: GamePhase,
}

impl Scene {
    pub fn capture(world: &World) -> Self {
        let mut scene = Scene {
            enemies_alive: world.enemies.live_count(),
            next_wave_in_ms: world.next_wave_ms.map(|at| (at - world.now_ms()).max(0.0)),
            phase: world.phase,
            ..Default::default()
        };

        scene.push_entities(Layer::Doodad, world.doodads.iter());
        scene.push_entities(Layer::Wall, world.walls.live());
        scene.push_entities(Layer::Tower, world.towers.live());
        scene.push_entities(Layer::Enemy, world.enemies.live());
        scene.push_entities(Layer::Terrain, world.terrain.live());

        scene.sprites.extend(world.projectiles.live().map(|p| Sprite {
            layer: Layer::Projectile,
            position: p.pos,
            half_size: Vec2::splat(PROJECTILE_HALF_SIZE),
            texture: None,
            health: 1.0,
        }));

        scene.glows.extend(world.explosions.live().map(|e| Glow {
            position: e.pos,
            radius: e.radius,
            alpha: e.life_fraction(),
        }));

        scene
    }

    fn push_entities<'a>(&mut self, layer: Layer, entities: impl Iterator<Item = &'a Entity>) {
        self.sprites.extend(entities.map(|e| Sprite {
            layer,
            position: e.pos(),
            half_size: e.body.half_size,
            texture: e.texture,
            health: e.health_fraction(),
        }));
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.sprites.iter().filter(|s| s.layer == layer).count()
    }
}
