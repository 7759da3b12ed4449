use crate::pos::Pos;

/// Square board of `size x size` cells drawn at `cell` pixels per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub size: u32,
    pub cell: u32,
}

impl Grid {
    /// Fits the board to a viewport width. The extent is always an exact multiple of the cell.
    pub fn fit(size: u32, viewport_width: u32) -> Self {
        Self { size, cell: cell_size_for(size, viewport_width) }
    }

    pub fn extent(&self) -> u32 {
        self.cell * self.size
    }

    pub fn contains(&self, p: Pos) -> bool {
        let n = self.size as i32;
        p.x >= 0 && p.y >= 0 && p.x < n && p.y < n
    }

    pub fn center(&self) -> Pos {
        let mid = (self.size / 2) as i32;
        Pos::new(mid, mid)
    }

    /// Top-left pixel of a (possibly fractional) grid coordinate.
    pub fn to_px(&self, gx: f32, gy: f32) -> (f32, f32) {
        (gx * self.cell as f32, gy * self.cell as f32)
    }

    /// Pixel center of a (possibly fractional) grid coordinate.
    pub fn center_px(&self, gx: f32, gy: f32) -> (f32, f32) {
        let half = self.cell as f32 / 2.0;
        let (x, y) = self.to_px(gx, gy);
        (x + half, y + half)
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let n = self.size as i32;
        (0..n).flat_map(move |y| (0..n).map(move |x| Pos::new(x, y)))
    }
}

pub fn cell_size_for(size: u32, viewport_width: u32) -> u32 {
    (viewport_width / size.max(1)).max(1)
}
