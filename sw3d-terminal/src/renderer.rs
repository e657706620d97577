/// Character-cell rasterizer implementing the core `Surface` trait
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use log::warn;
use std::io::Write;
use sw3d_core::{Affine2D, Rgba, Surface, Vec2};

/// Character luminosity ramp for fill shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Line segments each curve is flattened into
const CURVE_SEGMENTS: usize = 8;

/// Paint, transform and clip saved by `store`
#[derive(Debug, Clone)]
struct GraphicsState {
    transform: Affine2D,
    fill: Rgba,
    stroke: Rgba,
    /// Cells drawing may touch; `None` allows every cell
    clip: Option<Vec<bool>>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine2D::identity(),
            fill: Rgba::WHITE,
            stroke: Rgba::WHITE,
            clip: None,
        }
    }
}

/// A terminal-sized grid of coloured characters.
///
/// One surface unit is one cell and cell `(x, y)` covers
/// `[x, x + 1) x [y, y + 1)`. Fills cover the cells whose centres fall
/// inside the path (even-odd rule) with a character picked by the fill
/// colour's brightness. Strokes trace cells with a slope character. Images
/// are single glyphs that tile every cell the clip region allows.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    /// Flattened subpaths in cell coordinates
    subpaths: Vec<Vec<Vec2>>,
    /// Pen position in untransformed coordinates
    current: Option<Vec2>,
    subpath_start: Option<Vec2>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            subpaths: Vec::new(),
            current: None,
            subpath_start: None,
            state: GraphicsState::default(),
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.index(x, y).map(|idx| self.char_buffer[idx])
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    /// The characters of row `y`
    pub fn row(&self, y: usize) -> String {
        if y >= self.height {
            return String::new();
        }
        self.char_buffer[y * self.width..(y + 1) * self.width].iter().collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn plot(&mut self, idx: usize, character: char, color: Color) {
        if let Some(clip) = &self.state.clip {
            if !clip[idx] {
                return;
            }
        }
        self.char_buffer[idx] = character;
        self.color_buffer[idx] = color;
    }

    fn push_point(&mut self, point: Vec2) {
        let device = self.state.transform.apply(&point);
        let continuing = self.current.is_some() && !self.subpaths.is_empty();
        self.current = Some(point);
        if continuing {
            if let Some(subpath) = self.subpaths.last_mut() {
                subpath.push(device);
            }
        } else {
            self.subpaths.push(vec![device]);
            self.subpath_start = Some(point);
        }
    }

    /// Cells whose centres lie inside the current path, even-odd rule
    fn coverage(&self) -> Vec<bool> {
        let mut mask = vec![false; self.width * self.height];
        let mut crossings = Vec::new();

        for row in 0..self.height {
            let y = row as f64 + 0.5;
            crossings.clear();

            for subpath in self.subpaths.iter().filter(|s| s.len() > 2) {
                for (i, a) in subpath.iter().enumerate() {
                    let b = &subpath[(i + 1) % subpath.len()];
                    if (a.y <= y) != (b.y <= y) {
                        crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().clamp(0.0, self.width as f64) as usize;
                let end = (span[1] - 0.5).ceil().clamp(0.0, self.width as f64) as usize;
                for x in start..end {
                    mask[row * self.width + x] = true;
                }
            }
        }

        mask
    }
}

fn luminance_char(color: &Rgba) -> char {
    let luminance = (0.2126 * color.r + 0.7152 * color.g + 0.0722 * color.b) * color.a;
    let index = (luminance.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn terminal_color(color: &Rgba) -> Color {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

/// The part of segment `a`..`b` inside `[0, width] x [0, height]`
/// (Liang-Barsky). Segments with non-finite ends are dropped.
fn clip_segment(a: Vec2, b: Vec2, width: f64, height: f64) -> Option<(Vec2, Vec2)> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }

    let delta = b - a;
    let mut enter = 0.0_f64;
    let mut leave = 1.0_f64;
    let edges = [
        (-delta.x, a.x),
        (delta.x, width - a.x),
        (-delta.y, a.y),
        (delta.y, height - a.y),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                leave = leave.min(t);
            }
        }
    }

    (enter <= leave).then(|| (a + delta * enter, a + delta * leave))
}

/// Character approximating a segment's slope; y points down
fn slope_char(delta: &Vec2) -> char {
    if delta.x.abs() > 2.0 * delta.y.abs() {
        '-'
    } else if delta.y.abs() > 2.0 * delta.x.abs() {
        '|'
    } else if delta.x * delta.y > 0.0 {
        '\\'
    } else {
        '/'
    }
}

impl Surface for TerminalSurface {
    type Image = char;

    fn new_path(&mut self) {
        self.subpaths.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.current = None;
        self.push_point(Vec2::new(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push_point(Vec2::new(x, y));
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let control = Vec2::new(cx, cy);
        let start = self.current.unwrap_or(control);
        let end = Vec2::new(x, y);
        for step in 1..=CURVE_SEGMENTS {
            let t = step as f64 / CURVE_SEGMENTS as f64;
            let mt = 1.0 - t;
            self.push_point(start * (mt * mt) + control * (2.0 * mt * t) + end * (t * t));
        }
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        let control1 = Vec2::new(c1x, c1y);
        let control2 = Vec2::new(c2x, c2y);
        let start = self.current.unwrap_or(control1);
        let end = Vec2::new(x, y);
        for step in 1..=CURVE_SEGMENTS {
            let t = step as f64 / CURVE_SEGMENTS as f64;
            let mt = 1.0 - t;
            self.push_point(
                start * (mt * mt * mt)
                    + control1 * (3.0 * mt * mt * t)
                    + control2 * (3.0 * mt * t * t)
                    + end * (t * t * t),
            );
        }
    }

    fn close_path(&mut self) {
        if let Some(start) = self.subpath_start {
            self.push_point(start);
        }
    }

    fn fill_color(&mut self, color: Rgba) {
        self.state.fill = color;
    }

    fn stroke_color(&mut self, color: Rgba) {
        self.state.stroke = color;
    }

    fn fill(&mut self) {
        let character = luminance_char(&self.state.fill);
        let color = terminal_color(&self.state.fill);
        for (idx, covered) in self.coverage().into_iter().enumerate() {
            if covered {
                self.plot(idx, character, color);
            }
        }
    }

    fn stroke(&mut self) {
        let color = terminal_color(&self.state.stroke);
        let segments: Vec<(Vec2, Vec2)> = self
            .subpaths
            .iter()
            .flat_map(|subpath| subpath.windows(2).map(|pair| (pair[0], pair[1])))
            .collect();

        for (a, b) in segments {
            let character = slope_char(&(b - a));
            let Some((a, b)) = clip_segment(a, b, self.width as f64, self.height as f64) else {
                continue;
            };
            let delta = b - a;
            let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
            for step in 0..=steps {
                // Clipped points sit inside the grid up to rounding; casts
                // saturate tiny negatives to 0
                let point = a + delta * (step as f64 / steps as f64);
                if let Some(idx) = self.index(point.x as usize, point.y as usize) {
                    self.plot(idx, character, color);
                }
            }
        }
    }

    fn store(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => warn!("restore called without a matching store"),
        }
    }

    fn clip(&mut self) {
        let mask = self.coverage();
        self.state.clip = Some(match self.state.clip.take() {
            Some(clip) => clip.iter().zip(&mask).map(|(a, b)| *a && *b).collect(),
            None => mask,
        });
    }

    fn transform(&mut self, transform: Affine2D) {
        self.state.transform = self.state.transform * transform;
    }

    fn draw_image(&mut self, image: &char) {
        let color = terminal_color(&self.state.fill);
        for idx in 0..self.char_buffer.len() {
            self.plot(idx, *image, color);
        }
    }
}
