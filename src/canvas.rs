//! The drawing-primitive boundary the scene is written against.
//!
//! A [`Canvas`] keeps a current transform and style. Primitives are defined in
//! local coordinates and placed by that transform. [`Canvas::push`] opens a
//! scope that restores both when it is dropped, on every exit path.

use crate::math::{rotation_x, rotation_y, rotation_z, scaling, translation};
use nalgebra::{Matrix4, Point3, Vector3};
use std::ops::{Deref, DerefMut};

/// Colors used by the scene (matplotlib tab10 subset, plus black)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Blue,
    Orange,
    Green,
    Red,
    Grey,
}

impl Color {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::Blue => (31, 119, 180),
            Color::Orange => (255, 127, 14),
            Color::Green => (44, 160, 44),
            Color::Red => (214, 39, 40),
            Color::Grey => (127, 127, 127),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub weight: f64,
}

/// Surface fill; `alpha` below 255 is translucent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
    pub alpha: u8,
}

/// Transform and style that a scope saves and restores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub transform: Matrix4<f64>,
    pub stroke: Option<Stroke>,
    pub fill: Option<Fill>,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            transform: Matrix4::identity(),
            stroke: Some(Stroke {
                color: Color::Black,
                weight: 1.0,
            }),
            fill: None,
        }
    }
}

pub trait Canvas {
    fn state(&self) -> &DrawState;
    fn state_mut(&mut self) -> &mut DrawState;

    /// Straight segment between two local points
    fn line3d(&mut self, from: Point3<f64>, to: Point3<f64>);
    /// Cone centered on the origin, apex toward local +Y
    fn cone(&mut self, radius: f64, height: f64);
    fn sphere(&mut self, radius: f64);
    /// Ellipse in the local XY plane, centered on the origin
    fn ellipse(&mut self, radius_x: f64, radius_y: f64);
    /// Open circular arc in the local XY plane, angles from +X toward +Y
    fn arc(&mut self, radius: f64, start_deg: f64, end_deg: f64);
    /// Rectangle in the local XY plane, centered on the origin
    fn plane(&mut self, width: f64, height: f64);

    fn push(&mut self) -> TransformScope<'_, Self>
    where
        Self: Sized,
    {
        TransformScope::new(self)
    }

    fn apply_matrix(&mut self, matrix: &Matrix4<f64>) {
        let state = self.state_mut();
        state.transform *= matrix;
    }

    fn translate(&mut self, offset: Vector3<f64>) {
        self.apply_matrix(&translation(&offset));
    }

    fn rotate_x(&mut self, angle_deg: f64) {
        self.apply_matrix(&rotation_x(angle_deg));
    }

    fn rotate_y(&mut self, angle_deg: f64) {
        self.apply_matrix(&rotation_y(angle_deg));
    }

    fn rotate_z(&mut self, angle_deg: f64) {
        self.apply_matrix(&rotation_z(angle_deg));
    }

    fn scale(&mut self, factor: f64) {
        self.apply_matrix(&scaling(factor));
    }

    fn stroke(&mut self, color: Color) {
        let weight = self.state().stroke.map_or(1.0, |s| s.weight);
        self.state_mut().stroke = Some(Stroke { color, weight });
    }

    fn stroke_weight(&mut self, weight: f64) {
        let color = self.state().stroke.map_or(Color::Black, |s| s.color);
        self.state_mut().stroke = Some(Stroke { color, weight });
    }

    fn no_stroke(&mut self) {
        self.state_mut().stroke = None;
    }

    fn fill(&mut self, color: Color, alpha: u8) {
        self.state_mut().fill = Some(Fill { color, alpha });
    }

    fn no_fill(&mut self) {
        self.state_mut().fill = None;
    }
}

/// Scope over a canvas; restores the saved [`DrawState`] when dropped
pub struct TransformScope<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    saved: DrawState,
}

impl<'a, C: Canvas + ?Sized> TransformScope<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        let saved = *canvas.state();
        TransformScope { canvas, saved }
    }
}

impl<C: Canvas + ?Sized> Deref for TransformScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for TransformScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for TransformScope<'_, C> {
    fn drop(&mut self) {
        *self.canvas.state_mut() = self.saved;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line {
        from: Point3<f64>,
        to: Point3<f64>,
    },
    Cone { radius: f64, height: f64 },
    Sphere { radius: f64 },
    Ellipse {
        radius_x: f64,
        radius_y: f64,
    },
    Arc {
        radius: f64,
        start_deg: f64,
        end_deg: f64,
    },
    Plane { width: f64, height: f64 },
}

/// A primitive together with the state it was issued under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub state: DrawState,
}

impl DrawCall {
    /// Maps a local point of this call into device space
    pub fn to_device(&self, local: &Point3<f64>) -> Point3<f64> {
        self.state.transform.transform_point(local)
    }
}

/// Canvas that records draw calls instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    state: DrawState,
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    fn record(&mut self, primitive: Primitive) {
        self.calls.push(DrawCall {
            primitive,
            state: self.state,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn state(&self) -> &DrawState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DrawState {
        &mut self.state
    }

    fn line3d(&mut self, from: Point3<f64>, to: Point3<f64>) {
        self.record(Primitive::Line { from, to });
    }

    fn cone(&mut self, radius: f64, height: f64) {
        self.record(Primitive::Cone { radius, height });
    }

    fn sphere(&mut self, radius: f64) {
        self.record(Primitive::Sphere { radius });
    }

    fn ellipse(&mut self, radius_x: f64, radius_y: f64) {
        self.record(Primitive::Ellipse { radius_x, radius_y });
    }

    fn arc(&mut self, radius: f64, start_deg: f64, end_deg: f64) {
        self.record(Primitive::Arc {
            radius,
            start_deg,
            end_deg,
        });
    }

    fn plane(&mut self, width: f64, height: f64) {
        self.record(Primitive::Plane { width, height });
    }
}
