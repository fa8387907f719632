//! Remapping of the right-handed authoring frame onto device axes.
//!
//! Drawing code is written in the ICRS frame (X toward the viewer at zero
//! camera angles, Y to the right, Z up). The backend works in its own device
//! frame; [`AxisConvention`] bridges the two and then applies the camera
//! rotations, so a block of drawing calls reads:
//!
//! ```ignore
//! let mut c = canvas.push();
//! axes.apply(&mut *c, &view);
//! c.line3d(origin, tip); // authored in the ICRS frame
//! ```

use crate::canvas::Canvas;
use crate::coords::ViewingAngles;
use crate::math::{rotation_y, rotation_z};
use nalgebra::{Matrix3, Matrix4};

/// Basis permutation onto the screen frame (x right, y down, z toward the
/// viewer). Columns are the device images of the authored X, Y and Z axes.
fn screen_remap() -> Matrix3<f64> {
    Matrix3::new(
        0.0, 1.0, 0.0, //
        0.0, 0.0, -1.0, //
        1.0, 0.0, 0.0,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConvention {
    remap: Matrix4<f64>,
}

impl AxisConvention {
    pub fn new() -> Self {
        AxisConvention {
            remap: screen_remap().to_homogeneous(),
        }
    }

    /// The fixed basis permutation, without camera rotation
    pub fn remap(&self) -> &Matrix4<f64> {
        &self.remap
    }

    /// `remap · Ry(yaw) · Rz(pitch)`
    pub fn transform(&self, view: &ViewingAngles) -> Matrix4<f64> {
        self.remap * rotation_y(view.yaw_deg) * rotation_z(view.pitch_deg)
    }

    /// Composes the convention onto the canvas' current transform. Callers
    /// bracket this in a [`Canvas::push`] scope.
    pub fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C, view: &ViewingAngles) {
        canvas.apply_matrix(&self.transform(view));
    }
}

impl Default for AxisConvention {
    fn default() -> Self {
        AxisConvention::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, RecordingCanvas};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_remap_is_an_axis_permutation() {
        let m = screen_remap();
        assert_relative_eq!(m * m.transpose(), Matrix3::identity());
        // The screen frame is left-handed
        assert_relative_eq!(m.determinant(), -1.0);
        for value in m.iter() {
            assert!(*value == 0.0 || value.abs() == 1.0);
        }
    }

    #[test]
    fn test_remap_places_authored_axes() {
        let axes = AxisConvention::new();
        let m = axes.remap();
        // X toward the viewer, Y to the right, Z up (device y grows downward)
        assert_relative_eq!(m.transform_vector(&Vector3::x()), Vector3::z());
        assert_relative_eq!(m.transform_vector(&Vector3::y()), Vector3::x());
        assert_relative_eq!(m.transform_vector(&Vector3::z()), -Vector3::y());
    }

    #[test]
    fn test_zero_angles_apply_only_the_remap() {
        let axes = AxisConvention::default();
        let view = ViewingAngles {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
        };
        assert_relative_eq!(axes.transform(&view), *axes.remap());

        let p = Point3::new(1.0, 2.0, 3.0);
        let mapped = axes.transform(&view).transform_point(&p);
        assert_relative_eq!(mapped, Point3::new(2.0, -3.0, 1.0));
    }

    #[test]
    fn test_yaw_is_applied_before_pitch() {
        let axes = AxisConvention::default();
        let view = ViewingAngles {
            yaw_deg: 90.0,
            pitch_deg: 90.0,
        };
        // Rz(90) takes X to Y, then Ry(90) leaves Y alone, then remap sends Y to device x
        let m = axes.transform(&view);
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(p, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        // Rz(90) leaves Z alone, Ry(90) takes Z to X, remap sends X to device z
        let p = m.transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_angles_are_periodic() {
        let axes = AxisConvention::default();
        let a = axes.transform(&ViewingAngles {
            yaw_deg: 20.0,
            pitch_deg: -20.0,
        });
        let b = axes.transform(&ViewingAngles {
            yaw_deg: 380.0,
            pitch_deg: 340.0,
        });
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_inside_a_scope_does_not_leak() {
        let mut canvas = RecordingCanvas::default();
        {
            let mut c = canvas.push();
            AxisConvention::default().apply(&mut *c, &ViewingAngles::default());
            c.sphere(1.0);
        }
        canvas.sphere(1.0);

        let calls = canvas.calls();
        assert_relative_eq!(
            calls[0].state.transform,
            AxisConvention::default().transform(&ViewingAngles::default())
        );
        assert_relative_eq!(calls[1].state.transform, Matrix4::identity());
    }
}
