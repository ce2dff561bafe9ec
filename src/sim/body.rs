//! Rigid axis-aligned box body and its integration step

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY, SIM_DT};
use crate::error::SimError;

/// Physical state shared by every colliding entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half-extent of the box on each axis
    pub half_size: Vec2,
    /// 1 / mass; 0 means immovable
    pub inverse_mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            half_size: Vec2::ZERO,
            inverse_mass: 0.0,
            friction: 0.0,
            restitution: 0.0,
        }
    }
}

impl Body {
    /// Build a body at rest, rejecting negative or non-finite extents and mass
    pub fn new(
        pos: Vec2,
        half_size: Vec2,
        inverse_mass: f32,
        friction: f32,
        restitution: f32,
    ) -> Result<Self, SimError> {
        check_finite("pos.x", pos.x)?;
        check_finite("pos.y", pos.y)?;
        check_non_negative("half_size.x", half_size.x)?;
        check_non_negative("half_size.y", half_size.y)?;
        check_non_negative("inverse_mass", inverse_mass)?;
        check_finite("friction", friction)?;
        check_finite("restitution", restitution)?;

        Ok(Self {
            pos,
            vel: Vec2::ZERO,
            half_size,
            inverse_mass,
            friction,
            restitution,
        })
    }

    /// Static body (inverse mass 0) used for terrain and doodads
    pub fn fixed(pos: Vec2, half_size: Vec2) -> Result<Self, SimError> {
        Self::new(pos, half_size, 0.0, 0.0, 0.0)
    }

    /// Inverse mass derived from box area in half-extent units
    #[inline]
    pub fn inverse_mass_for(half_size: Vec2) -> f32 {
        let area = half_size.x * half_size.y;
        if area > 0.0 { 1.0 / area } else { 0.0 }
    }

    /// Whether this body ignores gravity and impulses
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Semi-implicit Euler step: velocity first, then position.
    ///
    /// Gravity is a flat per-tick delta, not `g * dt`.
    pub fn integrate(&mut self) {
        if self.is_static() {
            return;
        }
        self.vel.y += GRAVITY;
        self.pos += self.vel * SIM_DT;
    }

    /// Add a velocity change scaled by inverse mass
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse * self.inverse_mass;
    }

    /// Min corner of the box
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos - self.half_size
    }

    /// Max corner of the box
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.half_size
    }

    /// Whether `point` lies inside the box (edges inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let r = point - self.pos;
        r.x.abs() <= self.half_size.x && r.y.abs() <= self.half_size.y
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidBody { field, value })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), SimError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(SimError::InvalidBody { field, value });
    }
    Ok(())
}
