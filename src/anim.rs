//! Sub-tick motion between two discrete snake states.
//!
//! Each segment keeps the cell it left (`from`) and the cell it is heading to
//! (`to`). Drawing blends the two by the progress through the current move.

use crate::pos::{Dir, Pos};

/// Rotation eases this many times faster than the body slides.
const TURN_RATE: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub from: Pos,
    pub to: Pos,
}

impl Motion {
    pub fn still(p: Pos) -> Self {
        Self { from: p, to: p }
    }

    /// Blended grid coordinate, taking the short way round when a step spans the board edge.
    pub fn at(&self, p: f32, n: u32) -> (f32, f32) {
        (blend_axis(self.from.x, self.to.x, p, n), blend_axis(self.from.y, self.to.y, p, n))
    }
}

fn blend_axis(from: i32, to: i32, p: f32, n: u32) -> f32 {
    let n = n as f32;
    let d = (to - from) as f32;
    if d.abs() > 1.0 {
        let short = if d > 0.0 { d - n } else { d + n };
        (from as f32 + short * p).rem_euclid(n)
    } else {
        from as f32 + d * p
    }
}

/// Pairs each pre-move cell with its post-move cell. The shorter side is padded
/// with its last cell, so a freshly grown tail holds still for one move.
pub fn pair(prev: &[Pos], next: &[Pos]) -> Vec<Motion> {
    let len = prev.len().max(next.len());
    (0..len)
        .filter_map(|i| {
            let from = prev.get(i).or_else(|| prev.last())?;
            let to = next.get(i).or_else(|| next.last())?;
            Some(Motion { from: *from, to: *to })
        })
        .collect()
}

/// Looks up a segment's motion, falling back to the nearest valid record and
/// then to the discrete cell.
pub fn motion_for(track: &[Motion], i: usize, fallback: Pos) -> Motion {
    track.get(i).or_else(|| track.last()).copied().unwrap_or(Motion::still(fallback))
}

/// Fraction of the current move already elapsed, clamped to [0, 1].
pub fn progress(elapsed_ms: f64, move_ms: f64) -> f32 {
    if move_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / move_ms).clamp(0.0, 1.0) as f32
}

/// Smoothed head angle in degrees, normalized to [0, 360).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadTurn {
    pub angle: f32,
}

impl HeadTurn {
    pub fn facing(dir: Dir) -> Self {
        Self { angle: dir.angle().rem_euclid(360.0) }
    }

    /// Eases toward `dir` by `min(1, 3p)` of the remaining turn.
    pub fn ease(&mut self, dir: Dir, p: f32) {
        let mut target = dir.angle();
        let mut current = self.angle;
        if (target - current).abs() > 180.0 {
            if target > current {
                current += 360.0;
            } else {
                target += 360.0;
            }
        }
        current += (target - current) * (p * TURN_RATE).min(1.0);
        self.angle = current.rem_euclid(360.0);
    }

    pub fn snap(&mut self, dir: Dir) {
        *self = Self::facing(dir);
    }
}
