/// Character-cell drawing surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use triink_core::{DrawSurface, Rgba, Stroke};

/// Glyph used for every painted cell
const FILL_GLYPH: char = '█';

/// Terminal background the fills are composited over
const BACKGROUND: Rgba = Rgba::rgb(0, 0, 0);

/// A grid of coloured cells filled in painter's order.
///
/// There is no depth buffer: each polygon simply overwrites the cells it
/// covers, so the caller must submit polygons back to front.
pub struct CellSurface {
    width: usize,
    height: usize,
    cells: Vec<Option<Rgba>>,
}

impl CellSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![None; width * height];
    }

    /// Colour of a painted cell, `None` if untouched or out of bounds
    pub fn cell(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    /// Number of painted cells
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Blend `color` over whatever the cell holds
    fn paint(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let below = self.cells[idx].unwrap_or(BACKGROUND);
        self.cells[idx] = Some(color.over(below));
    }

    /// Fill a convex polygon as a fan, painting each covered cell once
    fn fill_fan(&mut self, points: &[Point2<f64>], color: Rgba) {
        let (mut lo, mut hi) = (points[0], points[0]);
        for p in &points[1..] {
            lo = Point2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point2::new(hi.x.max(p.x), hi.y.max(p.y));
        }

        // Bounding box, clipped to the surface
        let min_x = lo.x.floor().max(0.0) as i64;
        let max_x = (hi.x.ceil() as i64).min(self.width as i64 - 1);
        let min_y = lo.y.floor().max(0.0) as i64;
        let max_y = (hi.y.ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
                let covered = (1..points.len() - 1).any(|i| {
                    matches!(
                        barycentric(points[0], points[i], points[i + 1], p),
                        Some((w0, w1, w2)) if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                    )
                });
                if covered {
                    self.paint(x, y, color);
                }
            }
        }
    }

    /// Bresenham line between two surface points, clipped to the grid first
    fn stroke_line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Rgba) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let limit = Point2::new(self.width as f64 - 1e-6, self.height as f64 - 1e-6);
        let Some((from, to)) = clip_segment(from, to, limit) else {
            return;
        };
        let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
        let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.paint(x0, y0, color);
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
        }
    }

    /// Write the grid to the terminal, starting at row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, top + y as u16))?;
            let mut current: Option<Rgba> = None;
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(color) => {
                        if current != Some(color) {
                            writer.queue(SetForegroundColor(Color::Rgb {
                                r: color.r,
                                g: color.g,
                                b: color.b,
                            }))?;
                            current = Some(color);
                        }
                        writer.queue(Print(FILL_GLYPH))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawSurface for CellSurface {
    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], fill: Rgba, stroke: Stroke) {
        if points.len() < 3 {
            return;
        }
        self.fill_fan(points, fill);
        if stroke.width > 0.0 {
            for i in 0..points.len() {
                let next = points[(i + 1) % points.len()];
                self.stroke_line(points[i], next, stroke.color);
            }
        }
    }
}

/// Liang-Barsky clip of a segment to the box `[0, limit.x] x [0, limit.y]`
fn clip_segment(
    from: Point2<f64>,
    to: Point2<f64>,
    limit: Point2<f64>,
) -> Option<(Point2<f64>, Point2<f64>)> {
    let d = to - from;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-d.x, from.x),
        (d.x, limit.x - from.x),
        (-d.y, from.y),
        (d.y, limit.y - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((from + d * t0, from + d * t1))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f64>,
    v1: Point2<f64>,
    v2: Point2<f64>,
    p: Point2<f64>,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
