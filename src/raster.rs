use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// An RGBA8 framebuffer viewed as pixels. Everything drawn outside it is clipped.
pub struct Canvas<'a> {
    px: &'a mut [Rgba],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Wraps a raw `width * height * 4` byte frame, e.g. `Pixels::frame_mut`.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        let px: &mut [Rgba] = bytemuck::cast_slice_mut(frame);
        let len = (width as usize * height as usize).min(px.len());
        Self { px: &mut px[..len], width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[cfg(test)]
    pub fn clear(&mut self, c: Rgba) {
        self.px.fill(c);
    }

    #[cfg(test)]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.px.get((y * self.width + x) as usize).copied()
    }

    pub fn blend(&mut self, x: i32, y: i32, c: Rgba) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        let Some(dst) = self.px.get_mut(idx) else { return };
        let a = c.a as u16;
        let ia = 255 - a;
        dst.r = ((c.r as u16 * a + dst.r as u16 * ia) / 255) as u8;
        dst.g = ((c.g as u16 * a + dst.g as u16 * ia) / 255) as u8;
        dst.b = ((c.b as u16 * a + dst.b as u16 * ia) / 255) as u8;
        dst.a = 255;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, c: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i32).min(self.width as i32);
        let y1 = (y + h as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, c);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, c: Rgba) {
        let r2 = r * r;
        let (x0, y0, x1, y1) = self.clip_box(cx - r, cy - r, cx + r, cy + r);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, c);
                }
            }
        }
    }

    /// Fills a convex polygon given in either winding order.
    pub fn fill_convex(&mut self, pts: &[(f32, f32)], c: Rgba) {
        if pts.len() < 3 {
            return;
        }
        let (mut lx, mut ly, mut hx, mut hy) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for &(x, y) in pts {
            lx = lx.min(x);
            ly = ly.min(y);
            hx = hx.max(x);
            hy = hy.max(y);
        }
        let (x0, y0, x1, y1) = self.clip_box(lx, ly, hx, hy);
        for py in y0..y1 {
            for px in x0..x1 {
                if inside_convex(pts, px as f32 + 0.5, py as f32 + 0.5) {
                    self.blend(px, py, c);
                }
            }
        }
    }

    fn clip_box(&self, lx: f32, ly: f32, hx: f32, hy: f32) -> (i32, i32, i32, i32) {
        let x0 = (lx.floor() as i32).max(0);
        let y0 = (ly.floor() as i32).max(0);
        let x1 = (hx.ceil() as i32 + 1).min(self.width as i32);
        let y1 = (hy.ceil() as i32 + 1).min(self.height as i32);
        (x0, y0, x1, y1)
    }
}

fn inside_convex(pts: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut sign = 0.0f32;
    for i in 0..pts.len() {
        let (ax, ay) = pts[i];
        let (bx, by) = pts[(i + 1) % pts.len()];
        let cross = (bx - ax) * (y - ay) - (by - ay) * (x - ax);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Rotates `(x, y)` by `rad` (clockwise on screen, y pointing down) and moves it to `(ox, oy)`.
pub fn rotate_about(x: f32, y: f32, rad: f32, ox: f32, oy: f32) -> (f32, f32) {
    let (s, c) = rad.sin_cos();
    (ox + x * c - y * s, oy + x * s + y * c)
}
