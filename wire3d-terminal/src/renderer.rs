/// ASCII line rasterizer for terminal rendering
use wire3d_core::{rotate_all, Camera, GeometryModel, RotationState, ScreenPoint};

/// Default character ramp for depth shading (faintest to boldest)
pub const DEFAULT_RAMP: &str = ".:-=+*#%@";

/// Position of a glyph in a [`ShadeRamp`]; a higher rank is bolder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Shade(pub usize);

/// Ordered list of glyphs from faint to bold.
///
/// Boldness is the glyph's position in the ramp, never its character code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeRamp {
    glyphs: Vec<char>,
}

impl ShadeRamp {
    /// Returns `None` for an empty ramp
    pub fn new(glyphs: &str) -> Option<Self> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            None
        } else {
            Some(Self { glyphs })
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, shade: Shade) -> char {
        self.glyphs[shade.0.min(self.glyphs.len() - 1)]
    }

    pub fn boldest(&self) -> Shade {
        Shade(self.glyphs.len() - 1)
    }
}

impl Default for ShadeRamp {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_RAMP.chars().collect(),
        }
    }
}

/// Depth-to-shade mapping.
///
/// An edge whose average depth equals `reference_depth` (the camera
/// distance, i.e. the model's center) gets the middle of the ramp. Each unit
/// closer to the camera moves `density` steps toward the bold end, each unit
/// further moves toward the faint end; the result is clamped to the ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Shading {
    pub ramp: ShadeRamp,
    pub background: char,
    pub density: f32,
    pub reference_depth: f32,
}

impl Shading {
    pub fn new(ramp: ShadeRamp, background: char, density: f32, reference_depth: f32) -> Self {
        Self {
            ramp,
            background,
            density,
            reference_depth,
        }
    }

    pub fn shade_for_depth(&self, depth: f32) -> Shade {
        let top = (self.ramp.len() - 1) as f32;
        let index = top / 2.0 + (self.reference_depth - depth) * self.density;
        // NaN casts to 0
        Shade(index.round().clamp(0.0, top) as usize)
    }
}

impl Default for Shading {
    fn default() -> Self {
        Self::new(ShadeRamp::default(), ' ', 2.0, 3.0)
    }
}

/// Fixed-size grid of shaded cells; `None` is background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Option<Shade>>,
}

impl FrameBuffer {
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

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    /// Shade at a cell, `None` for background or outside the grid
    pub fn get(&self, x: i64, y: i64) -> Option<Shade> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Write `shade` if the cell is background or `shade` is bolder than
    /// what is there. Cells outside `[0, width) x [0, height)` are ignored.
    pub fn plot(&mut self, x: i64, y: i64, shade: Shade) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            if cell.map_or(true, |current| shade > current) {
                *cell = Some(shade);
            }
        }
    }

    /// Number of non-background cells
    pub fn drawn_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn rows(&self, shading: &Shading) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(shading.background, |s| shading.ramp.glyph(s)))
                    .collect::<String>()
            })
            .collect()
    }
}

/// Clip a segment to the buffer grown by one cell on each side (Liang-Barsky).
///
/// Segments with both ends inside are returned untouched; `None` means the
/// segment misses the buffer entirely.
fn clip_segment(
    buffer: &FrameBuffer,
    from: (i64, i64),
    to: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let inside = |(x, y): (i64, i64)| buffer.index(x, y).is_some();
    if inside(from) && inside(to) {
        return Some((from, to));
    }

    let (x1, y1) = (from.0 as f64, from.1 as f64);
    let dx = to.0 as f64 - x1;
    let dy = to.1 as f64 - y1;
    let (x_max, y_max) = (buffer.width as f64, buffer.height as f64);

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, x1 + 1.0),
        (dx, x_max - x1),
        (-dy, y1 + 1.0),
        (dy, y_max - y1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| ((x1 + t * dx).round() as i64, (y1 + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

/// Draw a shaded line between two projected points (Bresenham).
///
/// The whole line uses one shade chosen from the average endpoint depth.
/// Only the part of the segment near the buffer is walked.
pub fn draw_line(buffer: &mut FrameBuffer, p1: &ScreenPoint, p2: &ScreenPoint, shading: &Shading) {
    let shade = shading.shade_for_depth((p1.depth + p2.depth) / 2.0);

    let from = (i64::from(p1.x), i64::from(p1.y));
    let to = (i64::from(p2.x), i64::from(p2.y));
    let Some(((x1, y1), (x2, y2))) = clip_segment(buffer, from, to) else {
        return;
    };
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        buffer.plot(x, y, shade);
        if x == x2 && y == y2 {
            break;
        }

        let e2 = err * 2;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// ASCII renderer that turns a rotating wireframe into terminal rows
pub struct AsciiRenderer {
    buffer: FrameBuffer,
    shading: Shading,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, shading: Shading) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height),
            shading,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn draw_line(&mut self, p1: &ScreenPoint, p2: &ScreenPoint) {
        draw_line(&mut self.buffer, p1, p2, &self.shading);
    }

    /// Rotate, project and draw every edge of `model`. The buffer is not cleared.
    pub fn render_model(&mut self, model: &GeometryModel, rotation: &RotationState, camera: &Camera) {
        let rotated = rotate_all(model.vertices(), rotation);
        let projected = camera.project_all(&rotated);

        for edge in model.edges() {
            self.draw_line(&projected[edge.a], &projected[edge.b]);
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.buffer.rows(&self.shading)
    }
}
