//! Angles and vectors of the sketch, in the right-handed authoring frame.
//!
//! The authoring frame follows the ICRS convention: X toward (α, δ) = (0°, 0°),
//! Y toward (90°, 0°) and Z toward the north pole. All angles are in degrees
//! and are converted to radians explicitly where trigonometry is evaluated.

use crate::math::{rotation_y, rotation_z};
use nalgebra::{Matrix4, Vector3};

pub const YAW_RANGE: (f64, f64) = (-180.0, 180.0);
pub const PITCH_RANGE: (f64, f64) = (-180.0, 180.0);
pub const RIGHT_ASCENSION_RANGE: (f64, f64) = (0.0, 360.0);
pub const DECLINATION_RANGE: (f64, f64) = (-90.0, 90.0);

/// Camera angles chosen by the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewingAngles {
    /// Rotation about the authoring Y-axis, applied first
    pub yaw_deg: f64,
    /// Rotation about the authoring Z-axis, applied second
    pub pitch_deg: f64,
}

impl Default for ViewingAngles {
    fn default() -> Self {
        ViewingAngles {
            yaw_deg: 20.0,
            pitch_deg: -20.0,
        }
    }
}

/// Position of the source on the celestial sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceDirection {
    pub right_ascension_deg: f64,
    pub declination_deg: f64,
}

impl Default for SourceDirection {
    fn default() -> Self {
        SourceDirection {
            right_ascension_deg: 75.0,
            declination_deg: 43.0,
        }
    }
}

impl SourceDirection {
    pub fn new(right_ascension_deg: f64, declination_deg: f64) -> Self {
        SourceDirection {
            right_ascension_deg,
            declination_deg,
        }
    }

    /// Cartesian position of the source on a sphere of the given radius
    pub fn to_vector(&self, radius: f64) -> Vector3<f64> {
        direction_vector(self.right_ascension_deg, self.declination_deg, radius)
    }

    /// Rotation carrying the fixed triad onto the local frame at the source
    pub fn triad_orientation(&self) -> Matrix4<f64> {
        triad_orientation(self.right_ascension_deg, self.declination_deg)
    }

    pub fn tangent_plane_orientation(&self) -> Matrix4<f64> {
        tangent_plane_orientation(self.right_ascension_deg, self.declination_deg)
    }
}

/// Converts (α, δ) in degrees to `radius · (cos α cos δ, sin α cos δ, sin δ)`.
///
/// No range checks are made: a declination outside [-90, 90] still yields a
/// point on the sphere.
pub fn direction_vector(
    right_ascension_deg: f64,
    declination_deg: f64,
    radius: f64,
) -> Vector3<f64> {
    let (sin_a, cos_a) = right_ascension_deg.to_radians().sin_cos();
    let (sin_d, cos_d) = declination_deg.to_radians().sin_cos();
    Vector3::new(cos_a * cos_d, sin_a * cos_d, sin_d) * radius
}

/// `Rz(α) · Ry(−δ)`: takes r = (1,0,0) onto the source direction and p, q onto
/// the tangent plane at the source.
pub fn triad_orientation(right_ascension_deg: f64, declination_deg: f64) -> Matrix4<f64> {
    rotation_z(right_ascension_deg) * rotation_y(-declination_deg)
}

/// `Rz(α) · Ry(90 − δ)`: takes the local +Z normal of a plane onto the outward
/// radial direction at the source.
pub fn tangent_plane_orientation(right_ascension_deg: f64, declination_deg: f64) -> Matrix4<f64> {
    rotation_z(right_ascension_deg) * rotation_y(90.0 - declination_deg)
}

/// Small circle of constant declination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallCircle {
    /// Offset of the circle's plane along Z
    pub offset: f64,
    pub radius: f64,
}

/// The small circle at `declination_deg` on a sphere of radius `sphere_radius`
pub fn small_circle(declination_deg: f64, sphere_radius: f64) -> SmallCircle {
    let (sin_d, cos_d) = declination_deg.to_radians().sin_cos();
    SmallCircle {
        offset: sphere_radius * sin_d,
        radius: sphere_radius * cos_d,
    }
}

/// The [p, q, r] vector triad of the ICRS
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTriad {
    pub p: Vector3<f64>,
    pub q: Vector3<f64>,
    pub r: Vector3<f64>,
}

impl UnitTriad {
    /// The triad scaled to `length`
    pub fn with_length(length: f64) -> Self {
        UnitTriad {
            p: Vector3::y() * length,
            q: Vector3::z() * length,
            r: Vector3::x() * length,
        }
    }

    /// The triad rotated into the local frame of `source`
    pub fn oriented(&self, source: &SourceDirection) -> Self {
        let m = source.triad_orientation();
        UnitTriad {
            p: m.transform_vector(&self.p),
            q: m.transform_vector(&self.q),
            r: m.transform_vector(&self.r),
        }
    }
}

impl Default for UnitTriad {
    fn default() -> Self {
        UnitTriad::with_length(1.0)
    }
}
