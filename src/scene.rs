//! Draw sequence of the ICRS sketch.
//!
//! Both sketch variants are described by a [`SceneConfig`]; the `basic` preset
//! only shows the ICRS axes over the reference plane, `extended` adds the
//! source vector, the [p, q, r] triad, the reference sphere with its circles
//! and the optional tangent plane.

use crate::axes::AxisConvention;
use crate::canvas::{Canvas, Color};
use crate::coords::{small_circle, SourceDirection, UnitTriad, ViewingAngles};
use clap::ValueEnum;
use log::debug;
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// ICRS axes and reference plane only
    Basic,
    /// Source vector, triad, reference sphere and tangent plane
    Extended,
}

/// Cone drawn at the tip of an arrow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub radius: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub variant: Variant,
    /// Radius of the reference sphere and plane, in scene units
    pub radius: f64,
    /// Device pixels per scene unit
    pub pixel_scale: f64,
    /// Length of the X, Y and Z axis arrows as multiples of `radius`
    pub axis_lengths: [f64; 3],
    pub arrow_head: ArrowHead,
    pub triad_length: f64,
    /// Virtual canvas size in device pixels
    pub canvas_size: (f64, f64),
}

impl SceneConfig {
    pub fn basic() -> Self {
        SceneConfig {
            variant: Variant::Basic,
            radius: 1.0,
            pixel_scale: 300.0,
            axis_lengths: [1.05, 1.05, 0.7],
            arrow_head: ArrowHead {
                radius: 0.02,
                height: 0.04,
            },
            triad_length: 1.0,
            canvas_size: (900.0, 600.0),
        }
    }

    pub fn extended() -> Self {
        SceneConfig {
            variant: Variant::Extended,
            radius: 3.0,
            pixel_scale: 100.0,
            axis_lengths: [1.1, 1.1, 1.1],
            arrow_head: ArrowHead {
                radius: 0.05,
                height: 0.1,
            },
            triad_length: 1.0,
            canvas_size: (900.0, 800.0),
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Basic => SceneConfig::basic(),
            Variant::Extended => SceneConfig::extended(),
        }
    }

    pub fn has_tangent_plane(&self) -> bool {
        self.variant == Variant::Extended
    }

    /// Side of the square tangent plane
    pub fn tangent_plane_size(&self) -> f64 {
        2.0 * 0.9 * self.triad_length
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig::extended()
    }
}

/// Inputs of one redraw, captured from the UI state before drawing starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub view: ViewingAngles,
    pub source: SourceDirection,
    pub show_tangent_plane: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

pub struct SceneAssembler {
    config: SceneConfig,
    axes: AxisConvention,
}

impl SceneAssembler {
    pub fn new(config: SceneConfig, axes: AxisConvention) -> Self {
        SceneAssembler { config, axes }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C, frame: &FrameParams) {
        debug!("redraw {:?}", frame);
        let mut c = canvas.push();
        self.axes.apply(&mut *c, &frame.view);
        c.scale(self.config.pixel_scale);

        self.draw_icrs_axes(&mut *c);
        match self.config.variant {
            Variant::Basic => self.draw_reference_disc(&mut *c),
            Variant::Extended => {
                self.draw_source(&mut *c, &frame.source);
                self.draw_reference_circles(&mut *c, &frame.source);
                self.draw_reference_sphere(&mut *c);
                if frame.show_tangent_plane && self.config.has_tangent_plane() {
                    self.draw_tangent_plane(&mut *c, &frame.source);
                }
            }
        }
    }

    fn draw_icrs_axes<C: Canvas>(&self, canvas: &mut C) {
        let mut c = canvas.push();
        c.stroke_weight(1.0);
        c.stroke(Color::Black);
        let axes = [Axis::X, Axis::Y, Axis::Z];
        for (axis, length) in axes.into_iter().zip(self.config.axis_lengths) {
            self.arrow(&mut *c, axis, length * self.config.radius);
        }
    }

    /// Line from the origin along `axis`, capped with a cone
    fn arrow<C: Canvas>(&self, canvas: &mut C, axis: Axis, length: f64) {
        let tip = axis.unit() * length;
        canvas.line3d(Point3::origin(), Point3::from(tip));

        let mut c = canvas.push();
        c.translate(tip);
        // Cones point along local +Y
        match axis {
            Axis::X => c.rotate_z(-90.0),
            Axis::Y => {}
            Axis::Z => c.rotate_x(90.0),
        }
        c.cone(self.config.arrow_head.radius, self.config.arrow_head.height);
    }

    fn draw_source<C: Canvas>(&self, canvas: &mut C, source: &SourceDirection) {
        let tip = source.to_vector(self.config.radius);
        let triad = UnitTriad::with_length(self.config.triad_length);

        canvas.line3d(Point3::origin(), Point3::from(tip));

        // Direction of the source, from the origin
        {
            let mut c = canvas.push();
            c.stroke_weight(3.0);
            c.stroke(Color::Black);
            c.apply_matrix(&source.triad_orientation());
            self.arrow(&mut *c, Axis::X, triad.r.norm());
        }

        // Triad at the position of the source
        let mut c = canvas.push();
        c.translate(tip);
        c.apply_matrix(&source.triad_orientation());
        c.stroke_weight(3.0);
        c.stroke(Color::Blue);
        self.arrow(&mut *c, Axis::X, triad.r.norm());
        c.stroke(Color::Orange);
        self.arrow(&mut *c, Axis::Y, triad.p.norm());
        c.stroke(Color::Green);
        self.arrow(&mut *c, Axis::Z, triad.q.norm());
        c.stroke(Color::Black);
        c.sphere(self.config.arrow_head.radius);
    }

    fn draw_reference_disc<C: Canvas>(&self, canvas: &mut C) {
        let mut c = canvas.push();
        c.no_stroke();
        c.fill(Color::Red, 150);
        c.ellipse(self.config.radius, self.config.radius);
    }

    /// Equator, the meridians at α = 0 and at the source, and the small circle
    /// through the source
    fn draw_reference_circles<C: Canvas>(&self, canvas: &mut C, source: &SourceDirection) {
        let radius = self.config.radius;
        {
            let mut c = canvas.push();
            c.ellipse(radius, radius);
        }
        {
            let mut c = canvas.push();
            c.rotate_x(90.0);
            c.arc(radius, -90.0, 90.0);
            c.rotate_y(source.right_ascension_deg);
            c.arc(radius, -90.0, 90.0);
        }
        {
            let circle = small_circle(source.declination_deg, radius);
            let mut c = canvas.push();
            c.translate(Vector3::new(0.0, 0.0, circle.offset));
            c.ellipse(circle.radius, circle.radius);
        }
    }

    fn draw_reference_sphere<C: Canvas>(&self, canvas: &mut C) {
        let mut c = canvas.push();
        c.no_stroke();
        c.fill(Color::Grey, 100);
        c.sphere(self.config.radius);
    }

    fn draw_tangent_plane<C: Canvas>(&self, canvas: &mut C, source: &SourceDirection) {
        let size = self.config.tangent_plane_size();
        let mut c = canvas.push();
        c.translate(source.to_vector(self.config.radius));
        c.apply_matrix(&source.tangent_plane_orientation());
        c.fill(Color::Red, 100);
        c.plane(size, size);
    }
}
