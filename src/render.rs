//! [`Canvas`] backend drawing into a terminal [`Framebuffer`].
//!
//! Device space is the scene's pixel space (x right, y down, z toward the
//! viewer, origin at the center of a virtual canvas). The [`Viewport`] fits
//! that canvas into the cell grid with an orthographic projection.

use crate::canvas::{Canvas, DrawState};
use crate::graphics::{draw_line, draw_triangle, Framebuffer};
use crate::vertex::Vertex;
use nalgebra::Point3;
use std::f64::consts::TAU;

/// Segments used for ellipses and arcs
const CIRCLE_DETAIL: usize = 50;
const SPHERE_RINGS: usize = 12;
const SPHERE_SEGMENTS: usize = 24;
const CONE_SEGMENTS: usize = 12;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub columns: usize,
    pub rows: usize,
    /// Size of the virtual canvas in device pixels
    pub canvas_size: (f64, f64),
}

impl Viewport {
    /// Cells per device pixel, horizontally
    pub fn scale(&self) -> f64 {
        let (w, h) = self.canvas_size;
        (self.columns as f64 / w).min(self.rows as f64 * CELL_ASPECT / h)
    }

    /// Maps a device point to fractional cell coordinates
    pub fn to_cell(&self, device: &Point3<f64>) -> [f64; 2] {
        let s = self.scale();
        [
            self.columns as f64 / 2.0 + device.x * s,
            self.rows as f64 / 2.0 + device.y * s / CELL_ASPECT,
        ]
    }
}

pub struct TerminalCanvas {
    state: DrawState,
    framebuffer: Framebuffer,
    viewport: Viewport,
    /// Light position in device space, upper left in front of the canvas
    light: Point3<f64>,
}

impl TerminalCanvas {
    pub fn new(viewport: Viewport) -> Self {
        let (w, h) = viewport.canvas_size;
        TerminalCanvas {
            state: DrawState::default(),
            framebuffer: Framebuffer::new(viewport.columns, viewport.rows),
            viewport,
            light: Point3::new(-w, -h, 2.0 * w.max(h)),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.viewport.columns = columns;
        self.viewport.rows = rows;
        self.framebuffer.resize(columns, rows);
    }

    /// Clears the framebuffer and resets transform and style
    pub fn begin_frame(&mut self) {
        self.framebuffer.clear();
        self.state = DrawState::default();
    }

    fn project(&self, local: &Point3<f64>) -> Vertex {
        let position = self.state.transform.transform_point(local);
        Vertex {
            position,
            screen_position: self.viewport.to_cell(&position),
        }
    }

    fn stroke_polyline(&mut self, points: &[Point3<f64>], closed: bool) {
        let Some(stroke) = self.state.stroke else {
            return;
        };
        let vertices: Vec<Vertex> = points.iter().map(|p| self.project(p)).collect();
        for pair in vertices.windows(2) {
            draw_line(
                &mut self.framebuffer,
                &pair[0],
                &pair[1],
                stroke.color,
                stroke.weight,
            );
        }
        if closed && vertices.len() > 2 {
            let (first, last) = (&vertices[0], &vertices[vertices.len() - 1]);
            draw_line(
                &mut self.framebuffer,
                last,
                first,
                stroke.color,
                stroke.weight,
            );
        }
    }

    fn fill_triangles(&mut self, triangles: &[[Point3<f64>; 3]]) {
        let Some(fill) = self.state.fill else {
            return;
        };
        for [a, b, c] in triangles {
            let (v0, v1, v2) = (self.project(a), self.project(b), self.project(c));
            draw_triangle(
                &mut self.framebuffer,
                &v0,
                &v1,
                &v2,
                &self.light,
                fill.color,
                fill.alpha,
            );
        }
    }
}

/// Points of an ellipse arc in the local XY plane
fn arc_points(
    radius_x: f64,
    radius_y: f64,
    start_deg: f64,
    end_deg: f64,
    segments: usize,
) -> Vec<Point3<f64>> {
    let (start, end) = (start_deg.to_radians(), end_deg.to_radians());
    (0..=segments)
        .map(|i| {
            let t = start + (end - start) * i as f64 / segments as f64;
            Point3::new(radius_x * t.cos(), radius_y * t.sin(), 0.0)
        })
        .collect()
}

/// Fan of triangles from the origin to consecutive outline points
fn fan(outline: &[Point3<f64>]) -> Vec<[Point3<f64>; 3]> {
    outline
        .windows(2)
        .map(|pair| [Point3::origin(), pair[0], pair[1]])
        .collect()
}

fn sphere_point(radius: f64, ring: usize, segment: usize) -> Point3<f64> {
    let polar = std::f64::consts::PI * ring as f64 / SPHERE_RINGS as f64;
    let azimuth = TAU * segment as f64 / SPHERE_SEGMENTS as f64;
    Point3::new(
        radius * polar.sin() * azimuth.cos(),
        radius * polar.cos(),
        radius * polar.sin() * azimuth.sin(),
    )
}

impl Canvas for TerminalCanvas {
    fn state(&self) -> &DrawState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DrawState {
        &mut self.state
    }

    fn line3d(&mut self, from: Point3<f64>, to: Point3<f64>) {
        self.stroke_polyline(&[from, to], false);
    }

    fn cone(&mut self, radius: f64, height: f64) {
        let apex = Point3::new(0.0, height / 2.0, 0.0);
        let base: Vec<Point3<f64>> = (0..=CONE_SEGMENTS)
            .map(|i| {
                let t = TAU * i as f64 / CONE_SEGMENTS as f64;
                Point3::new(radius * t.cos(), -height / 2.0, radius * t.sin())
            })
            .collect();

        let triangles: Vec<[Point3<f64>; 3]> = base
            .windows(2)
            .map(|pair| [apex, pair[0], pair[1]])
            .collect();
        self.fill_triangles(&triangles);

        self.stroke_polyline(&base, false);
        for point in base.iter().step_by(CONE_SEGMENTS / 4) {
            self.stroke_polyline(&[*point, apex], false);
        }
    }

    fn sphere(&mut self, radius: f64) {
        if self.state.fill.is_some() {
            let mut triangles = Vec::with_capacity(SPHERE_RINGS * SPHERE_SEGMENTS * 2);
            for ring in 0..SPHERE_RINGS {
                for segment in 0..SPHERE_SEGMENTS {
                    let a = sphere_point(radius, ring, segment);
                    let b = sphere_point(radius, ring + 1, segment);
                    let c = sphere_point(radius, ring + 1, segment + 1);
                    let d = sphere_point(radius, ring, segment + 1);
                    triangles.push([a, b, c]);
                    triangles.push([a, c, d]);
                }
            }
            self.fill_triangles(&triangles);
        }

        if self.state.stroke.is_some() {
            // Equator and two meridians
            let equator: Vec<Point3<f64>> = (0..=SPHERE_SEGMENTS)
                .map(|segment| sphere_point(radius, SPHERE_RINGS / 2, segment))
                .collect();
            self.stroke_polyline(&equator, false);
            for segment in [0, SPHERE_SEGMENTS / 4] {
                let opposite = segment + SPHERE_SEGMENTS / 2;
                let meridian: Vec<Point3<f64>> = (0..=SPHERE_RINGS)
                    .map(|ring| sphere_point(radius, ring, segment))
                    .chain(
                        (0..=SPHERE_RINGS)
                            .rev()
                            .map(|ring| sphere_point(radius, ring, opposite)),
                    )
                    .collect();
                self.stroke_polyline(&meridian, false);
            }
        }
    }

    fn ellipse(&mut self, radius_x: f64, radius_y: f64) {
        let outline = arc_points(radius_x, radius_y, 0.0, 360.0, CIRCLE_DETAIL);
        self.fill_triangles(&fan(&outline));
        self.stroke_polyline(&outline, false);
    }

    fn arc(&mut self, radius: f64, start_deg: f64, end_deg: f64) {
        let outline = arc_points(radius, radius, start_deg, end_deg, CIRCLE_DETAIL);
        self.fill_triangles(&fan(&outline));
        self.stroke_polyline(&outline, false);
    }

    fn plane(&mut self, width: f64, height: f64) {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = [
            Point3::new(-hw, -hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(-hw, hh, 0.0),
        ];
        self.fill_triangles(&[
            [corners[0], corners[1], corners[2]],
            [corners[0], corners[2], corners[3]],
        ]);
        self.stroke_polyline(&corners, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;
    use crate::graphics::Layer;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn canvas(columns: usize, rows: usize) -> TerminalCanvas {
        TerminalCanvas::new(Viewport {
            columns,
            rows,
            canvas_size: (100.0, 100.0),
        })
    }

    #[test]
    fn test_viewport_centers_and_corrects_aspect() {
        let viewport = Viewport {
            columns: 100,
            rows: 50,
            canvas_size: (100.0, 100.0),
        };
        assert_relative_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.to_cell(&Point3::origin()), [50.0, 25.0]);
        let cell = viewport.to_cell(&Point3::new(10.0, 10.0, 99.0));
        assert_eq!(cell, [60.0, 30.0]);
    }

    #[test]
    fn test_line_is_drawn_under_current_transform() {
        let mut c = canvas(100, 50);
        c.translate(Vector3::new(-20.0, 0.0, 0.0));
        c.line3d(Point3::new(0.0, 0.0, 0.0), Point3::new(40.0, 0.0, 0.0));

        let fb = c.framebuffer();
        assert_eq!(fb.cell(30, 25).map(|cell| cell.glyph), Some('-'));
        assert_eq!(fb.cell(69, 25).map(|cell| cell.glyph), Some('-'));
        assert_eq!(fb.cell(75, 25).map(|cell| cell.layer), Some(Layer::Empty));
    }

    #[test]
    fn test_no_stroke_and_no_fill_draws_nothing() {
        let mut c = canvas(40, 20);
        c.no_stroke();
        c.ellipse(10.0, 10.0);
        c.plane(10.0, 10.0);
        assert!(c.framebuffer().to_text().trim().is_empty());
    }

    #[test]
    fn test_filled_ellipse_covers_its_center() {
        let mut c = canvas(40, 20);
        c.no_stroke();
        c.fill(Color::Red, 150);
        c.ellipse(30.0, 30.0);
        let center = c.framebuffer().cell(20, 10).copied();
        assert_eq!(center.map(|cell| cell.layer), Some(Layer::Surface));
        assert_eq!(center.map(|cell| cell.color), Some(Color::Red));
    }

    #[test]
    fn test_begin_frame_resets_everything() {
        let mut c = canvas(40, 20);
        c.scale(3.0);
        c.stroke(Color::Blue);
        c.line3d(Point3::origin(), Point3::new(5.0, 0.0, 0.0));
        c.begin_frame();
        assert_eq!(*c.state(), DrawState::default());
        assert!(c.framebuffer().to_text().trim().is_empty());
    }

    #[test]
    fn test_resize_changes_the_grid() {
        let mut c = canvas(40, 20);
        c.resize(80, 30);
        assert_eq!(c.framebuffer().width(), 80);
        assert_eq!(c.framebuffer().height(), 30);
        assert_eq!(c.viewport().columns, 80);
    }

    #[test]
    fn test_sphere_outline_and_cone() {
        let mut c = canvas(60, 30);
        c.sphere(30.0);
        c.cone(10.0, 20.0);
        let text = c.framebuffer().to_text();
        assert!(text.chars().any(|ch| "-|/\\".contains(ch)));
    }
}
