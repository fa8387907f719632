use crate::canvas::Color;
use crate::math::{calculate_light_intensity, calculate_normal, edge_function};
use crate::vertex::Vertex;
use crossterm::style::{self, Stylize};
use crossterm::{cursor, queue};
use nalgebra::Point3;
use std::io::Write;

/// Glyphs for filled surfaces, dim to bright
const SHADE_RAMP: &[char] = &['.', ',', ':', ';', '~', '=', '+', '*'];

/// What occupies a cell; strokes are drawn over translucent surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Empty,
    Surface,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
    pub depth: f64,
    pub layer: Layer,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        color: Color::Black,
        depth: f64::NEG_INFINITY,
        layer: Layer::Empty,
    };
}

/// Character framebuffer with a depth value per cell
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Writes `cell` if it wins the layer/depth test against the current content
    pub fn plot(&mut self, x: isize, y: isize, cell: Cell) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        let offset = y as usize * self.width + x as usize;
        let current = &mut self.cells[offset];
        let wins = match cell.layer.cmp(&current.layer) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => cell.depth >= current.depth,
            std::cmp::Ordering::Less => false,
        };
        if wins {
            *current = cell;
        }
        wins
    }

    /// Plain text rendering, one line per row with trailing blanks trimmed
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|c| c.glyph).collect();
            text.push_str(line.trim_end());
            text.push('\n');
        }
        text
    }

    /// Queues the framebuffer to a terminal at the given offset
    pub fn present<W: Write>(&self, out: &mut W, origin: (u16, u16)) -> std::io::Result<()> {
        for (row_index, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            queue!(out, cursor::MoveTo(origin.0, origin.1 + row_index as u16))?;
            for cell in row {
                if cell.layer == Layer::Empty {
                    queue!(out, style::Print(' '))?;
                } else {
                    let styled = cell.glyph.with(terminal_color(cell.color));
                    queue!(out, style::PrintStyledContent(styled))?;
                }
            }
        }
        Ok(())
    }
}

/// Black maps to the terminal's default foreground so it shows on dark themes
pub fn terminal_color(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Reset,
        other => {
            let (r, g, b) = other.rgb();
            style::Color::Rgb { r, g, b }
        }
    }
}

/// Glyph for a stroke segment from its direction on the cell grid
fn stroke_glyph(dx: f64, dy: f64, weight: f64) -> char {
    if weight >= 2.5 {
        return '#';
    }
    // Cells are about twice as tall as wide
    let (ax, ay) = (dx.abs(), dy.abs() * 2.0);
    if ay < ax * 0.5 {
        '-'
    } else if ax < ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Glyph for a surface with the given light intensity and opacity
pub fn shade_glyph(intensity: f64, alpha: u8) -> char {
    let level = (intensity.clamp(0.0, 1.0) * (alpha as f64 / 255.0)).sqrt();
    let index = (level * (SHADE_RAMP.len() - 1) as f64).round() as usize;
    SHADE_RAMP[index.min(SHADE_RAMP.len() - 1)]
}

/// Draws a line between two vertices using Bresenham's algorithm,
/// interpolating depth along the way
pub fn draw_line(
    framebuffer: &mut Framebuffer,
    v0: &Vertex,
    v1: &Vertex,
    color: Color,
    weight: f64,
) {
    let [x0f, y0f] = v0.screen_position;
    let [x1f, y1f] = v1.screen_position;
    if !(x0f.is_finite() && y0f.is_finite() && x1f.is_finite() && y1f.is_finite()) {
        return;
    }
    let glyph = stroke_glyph(x1f - x0f, y1f - y0f, weight);

    let (mut x0, mut y0, x1, y1) = (
        x0f.floor() as isize,
        y0f.floor() as isize,
        x1f.floor() as isize,
        y1f.floor() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    let steps = dx.max(-dy).max(1) as f64;
    let mut step = 0.0;
    loop {
        let t = step / steps;
        let depth = v0.depth() + (v1.depth() - v0.depth()) * t;
        framebuffer.plot(
            x0,
            y0,
            Cell {
                glyph,
                color,
                depth,
                layer: Layer::Stroke,
            },
        );

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
        step += 1.0;
    }
}

/// Fills a triangle with flat lighting and depth testing. Both windings are
/// drawn since translucent surfaces are visible from behind.
pub fn draw_triangle(
    framebuffer: &mut Framebuffer,
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    light_pos: &Point3<f64>,
    color: Color,
    alpha: u8,
) {
    let s0 = &v0.screen_position;
    let s1 = &v1.screen_position;
    let s2 = &v2.screen_position;
    if !s0.iter().chain(s1).chain(s2).all(|c| c.is_finite()) {
        return;
    }
    let area = edge_function(s0, s1, s2);
    if area == 0.0 {
        return;
    }

    // Face normal in device space drives the shading glyph
    let centroid = Point3::from(
        (v0.position.coords + v1.position.coords + v2.position.coords) / 3.0,
    );
    let intensity = match calculate_normal(&v0.position, &v1.position, &v2.position) {
        Some(normal) => calculate_light_intensity(&normal, &centroid, light_pos),
        None => 1.0,
    };
    let glyph = shade_glyph(intensity, alpha);

    // Compute bounding box of the triangle
    let max_x = (framebuffer.width() as f64 - 1.0).max(0.0);
    let max_y = (framebuffer.height() as f64 - 1.0).max(0.0);
    let min_x = s0[0].min(s1[0]).min(s2[0]).floor().clamp(0.0, max_x) as usize;
    let max_x = s0[0].max(s1[0]).max(s2[0]).ceil().clamp(0.0, max_x) as usize;
    let min_y = s0[1].min(s1[1]).min(s2[1]).floor().clamp(0.0, max_y) as usize;
    let max_y = s0[1].max(s1[1]).max(s2[1]).ceil().clamp(0.0, max_y) as usize;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            let w0 = edge_function(s1, s2, &p) / area;
            let w1 = edge_function(s2, s0, &p) / area;
            let w2 = edge_function(s0, s1, &p) / area;

            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                let depth = v0.depth() * w0 + v1.depth() * w1 + v2.depth() * w2;
                framebuffer.plot(
                    x as isize,
                    y as isize,
                    Cell {
                        glyph,
                        color,
                        depth,
                        layer: Layer::Surface,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f64, y: f64, depth: f64) -> Vertex {
        Vertex {
            position: Point3::new(x, y, depth),
            screen_position: [x, y],
        }
    }

    #[test]
    fn test_horizontal_line_covers_every_cell() {
        let mut fb = Framebuffer::new(10, 3);
        let (from, to) = (vertex(1.0, 1.0, 0.0), vertex(8.0, 1.0, 0.0));
        draw_line(&mut fb, &from, &to, Color::Blue, 1.0);
        let text = fb.to_text();
        assert_eq!(text.lines().nth(1), Some(" --------"));
        assert_eq!(fb.cell(4, 1).map(|c| c.color), Some(Color::Blue));
    }

    #[test]
    fn test_line_glyphs_follow_direction() {
        assert_eq!(stroke_glyph(0.0, 5.0, 1.0), '|');
        assert_eq!(stroke_glyph(5.0, 0.0, 1.0), '-');
        assert_eq!(stroke_glyph(4.0, 2.0, 1.0), '\\');
        assert_eq!(stroke_glyph(-4.0, 2.0, 1.0), '/');
        assert_eq!(stroke_glyph(-4.0, 2.0, 3.0), '#');
    }

    #[test]
    fn test_closer_stroke_wins() {
        let mut fb = Framebuffer::new(5, 5);
        let line = |fb: &mut Framebuffer, from: [f64; 2], to: [f64; 2], depth: f64, color: Color| {
            let a = vertex(from[0], from[1], depth);
            let b = vertex(to[0], to[1], depth);
            draw_line(fb, &a, &b, color, 1.0);
        };
        line(&mut fb, [2.0, 0.0], [2.0, 4.0], 1.0, Color::Green);
        line(&mut fb, [0.0, 2.0], [4.0, 2.0], -1.0, Color::Red);
        assert_eq!(fb.cell(2, 2).map(|c| c.color), Some(Color::Green));

        line(&mut fb, [0.0, 2.0], [4.0, 2.0], 2.0, Color::Orange);
        assert_eq!(fb.cell(2, 2).map(|c| c.color), Some(Color::Orange));
    }

    #[test]
    fn test_strokes_show_through_surfaces() {
        let mut fb = Framebuffer::new(10, 10);
        let light = Point3::new(0.0, 0.0, 100.0);
        let (from, to) = (vertex(0.0, 5.0, -10.0), vertex(9.0, 5.0, -10.0));
        draw_line(&mut fb, &from, &to, Color::Black, 1.0);
        draw_triangle(
            &mut fb,
            &vertex(0.0, 0.0, 5.0),
            &vertex(10.0, 0.0, 5.0),
            &vertex(0.0, 10.0, 5.0),
            &light,
            Color::Red,
            255,
        );
        assert_eq!(fb.cell(1, 5).map(|c| c.layer), Some(Layer::Stroke));
        assert_eq!(fb.cell(1, 1).map(|c| c.layer), Some(Layer::Surface));
        assert_eq!(fb.cell(9, 9).map(|c| c.layer), Some(Layer::Empty));
    }

    #[test]
    fn test_triangle_winding_does_not_matter() {
        let light = Point3::new(0.0, 0.0, 100.0);
        let a = vertex(0.0, 0.0, 0.0);
        let b = vertex(8.0, 0.0, 0.0);
        let c = vertex(0.0, 8.0, 0.0);

        let mut cw = Framebuffer::new(8, 8);
        draw_triangle(&mut cw, &a, &b, &c, &light, Color::Grey, 100);
        let mut ccw = Framebuffer::new(8, 8);
        draw_triangle(&mut ccw, &a, &c, &b, &light, Color::Grey, 100);

        assert_eq!(cw.to_text(), ccw.to_text());
        assert!(cw.to_text().contains(shade_glyph(1.0, 100)));
    }

    #[test]
    fn test_shade_glyph_brightens_with_light_and_opacity() {
        let ramp_pos = |c: char| SHADE_RAMP.iter().position(|&g| g == c);
        let bright = ramp_pos(shade_glyph(1.0, 255));
        assert!(bright > ramp_pos(shade_glyph(0.1, 255)));
        assert!(bright > ramp_pos(shade_glyph(1.0, 60)));
        assert_eq!(shade_glyph(1.0, 255), '*');
    }

    #[test]
    fn test_offscreen_geometry_is_clipped() {
        let mut fb = Framebuffer::new(4, 4);
        let (from, to) = (vertex(-20.0, -20.0, 0.0), vertex(20.0, 20.0, 0.0));
        draw_line(&mut fb, &from, &to, Color::Black, 1.0);
        let (from, to) = (vertex(f64::NAN, 0.0, 0.0), vertex(1.0, 1.0, 0.0));
        draw_line(&mut fb, &from, &to, Color::Black, 1.0);
        assert_eq!(fb.cell(2, 2).map(|c| c.glyph), Some('\\'));
        assert!(fb.cell(4, 4).is_none());
    }
}
