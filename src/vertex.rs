use nalgebra::Point3;

/// Vertex structure with device position and cell-grid position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub screen_position: [f64; 2],
}

impl Vertex {
    /// Depth toward the viewer; larger is closer
    pub fn depth(&self) -> f64 {
        self.position.z
    }
}
