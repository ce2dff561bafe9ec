//! 2D vector helpers on top of `glam::Vec2`
//!
//! glam already provides arithmetic, dot, perp, perp_dot, length and
//! `from_angle`. This module adds the projections the simulation needs with
//! zero-length guards, and the two random distributions used for spread and
//! scatter.

use glam::Vec2;
use rand::Rng;

/// Vector operations missing from glam
pub trait Vector2Ext {
    /// Projection of `self` onto `onto`; zero when `onto` has no length
    fn projected_onto(self, onto: Vec2) -> Vec2;

    /// Express `self` in the frame whose x axis is `axis`
    /// (x = along `axis`, y = perpendicular). `axis` should be unit length.
    fn in_frame_of(self, axis: Vec2) -> Vec2;

    /// Squared distance, the metric all range checks use
    fn dist_sq(self, other: Vec2) -> f32;
}

impl Vector2Ext for Vec2 {
    #[inline]
    fn projected_onto(self, onto: Vec2) -> Vec2 {
        let len_sq = onto.length_squared();
        if len_sq <= f32::EPSILON {
            return Vec2::ZERO;
        }
        onto * (self.dot(onto) / len_sq)
    }

    #[inline]
    fn in_frame_of(self, axis: Vec2) -> Vec2 {
        Vec2::new(axis.dot(self), axis.perp_dot(self))
    }

    #[inline]
    fn dist_sq(self, other: Vec2) -> f32 {
        (self - other).length_squared()
    }
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Uniformly distributed point inside a disk of `max_radius`
pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, max_radius: f32) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    let r = (rng.random::<f32>() * max_radius * max_radius).sqrt();
    unit_from_angle(angle) * r
}

/// Triangular-distributed point in the box `[-half, half]²`
///
/// Each axis is the difference of two uniforms, so values cluster around
/// zero. Used for projectile spread.
pub fn random_in_square<R: Rng + ?Sized>(rng: &mut R, half: f32) -> Vec2 {
    Vec2::new(symmetric(rng, half), symmetric(rng, half))
}

#[inline]
fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.random::<f32>() - rng.random::<f32>()) * half
}
