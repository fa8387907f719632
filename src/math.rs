use nalgebra::{Matrix4, Point3, Vector3};

/// Homogeneous rotation about the X-axis, angle in degrees
pub fn rotation_x(angle_deg: f64) -> Matrix4<f64> {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Homogeneous rotation about the Y-axis, angle in degrees
pub fn rotation_y(angle_deg: f64) -> Matrix4<f64> {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Matrix4::new(
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Homogeneous rotation about the Z-axis, angle in degrees
pub fn rotation_z(angle_deg: f64) -> Matrix4<f64> {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Matrix4::new(
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

pub fn translation(offset: &Vector3<f64>) -> Matrix4<f64> {
    Matrix4::new_translation(offset)
}

pub fn scaling(factor: f64) -> Matrix4<f64> {
    Matrix4::new_scaling(factor)
}

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Unit normal of a triangle, or `None` when the triangle is degenerate
pub fn calculate_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Vector3<f64>> {
    (b - a).cross(&(c - a)).try_normalize(f64::EPSILON)
}

/// Light intensity for a surface point. Surfaces are treated as two-sided.
pub fn calculate_light_intensity(
    normal: &Vector3<f64>,
    position: &Point3<f64>,
    light_pos: &Point3<f64>,
) -> f64 {
    let Some(light_dir) = (light_pos - position).try_normalize(f64::EPSILON) else {
        return 1.0;
    };
    normal.dot(&light_dir).abs().max(0.1) // Ensure a minimum ambient light
}
