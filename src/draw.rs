use crate::game::{Game, Status};
use crate::raster::{Canvas, Rgba, rotate_about};
use crate::store::ScoreStore;

pub const CELL_LIGHT: Rgba = Rgba::rgb(0xe0, 0xe0, 0xe0);
pub const CELL_DARK: Rgba = Rgba::rgb(0xd0, 0xd0, 0xd0);
pub const GRID_LINE: Rgba = Rgba::rgb(0xcc, 0xcc, 0xcc);
pub const BODY: Rgba = Rgba::rgb(0x3d, 0x99, 0x70);
pub const HEAD: Rgba = Rgba::rgb(0x2c, 0x7a, 0x57);
pub const FOOD: Rgba = Rgba::rgb(0xd9, 0x3b, 0x2b);
const LEAF: Rgba = Rgba::rgb(0x4c, 0xaf, 0x50);
const EYE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
const PUPIL: Rgba = Rgba::rgb(0x1b, 0x1b, 0x1b);
const FLASH: Rgba = Rgba::rgb(255, 0, 0).with_alpha(77);

/// Food and head sprites are drawn 73.2% larger than a cell, centered on it.
const SPRITE_SCALE: f32 = 1.732;
const BODY_WIDTH: f32 = 0.85;

/// Paints one frame. Reads the game only, so it can run any number of times per move.
pub fn render_game<S: ScoreStore>(game: &Game<S>, cv: &mut Canvas) {
    draw_board(game, cv);
    draw_food(game, cv);
    draw_body(game, cv);
    draw_head(game, cv);
    if game.status() == Status::Cooldown {
        let (w, h) = (cv.width(), cv.height());
        cv.fill_rect(0, 0, w, h, FLASH);
    }
}

fn draw_board<S: ScoreStore>(game: &Game<S>, cv: &mut Canvas) {
    let grid = game.grid();
    let cell = grid.cell;
    for y in 0..grid.size {
        for x in 0..grid.size {
            let c = if (x + y) % 2 == 0 { CELL_LIGHT } else { CELL_DARK };
            cv.fill_rect((x * cell) as i32, (y * cell) as i32, cell, cell, c);
        }
    }
    let ext = grid.extent();
    for i in 0..=grid.size {
        let at = (i * cell).min(ext.saturating_sub(1)) as i32;
        cv.fill_rect(at, 0, 1, ext, GRID_LINE);
        cv.fill_rect(0, at, ext, 1, GRID_LINE);
    }
}

fn draw_food<S: ScoreStore>(game: &Game<S>, cv: &mut Canvas) {
    let grid = game.grid();
    let f = game.food();
    let (cx, cy) = grid.center_px(f.x as f32, f.y as f32);
    // half the sprite's height: fruit reaches the bottom edge, leaf the top
    let r = grid.cell as f32 * SPRITE_SCALE / 2.0;
    cv.fill_circle(cx, cy + r * 0.12, r * 0.88, FOOD);
    cv.fill_circle(cx + r * 0.25, cy - r * 0.8, r * 0.2, LEAF);
}

/// The body is one ribbon: a disc on every segment plus a band back to the segment ahead of it.
fn draw_body<S: ScoreStore>(game: &Game<S>, cv: &mut Canvas) {
    let len = game.snake().len();
    if len <= 1 {
        return;
    }
    let grid = game.grid();
    let half = grid.cell as f32 * BODY_WIDTH / 2.0;
    for i in 1..len {
        let (gx, gy) = game.segment_at(i);
        let (px, py) = game.segment_at(i - 1);
        let (cx, cy) = grid.center_px(gx, gy);
        let (ax, ay) = grid.center_px(px, py);
        cv.fill_circle(cx, cy, half, BODY);

        let angle = (ay - cy).atan2(ax - cx);
        let (nx, ny) = (-angle.sin() * half, angle.cos() * half);
        cv.fill_convex(&[(cx + nx, cy + ny), (ax + nx, ay + ny), (ax - nx, ay - ny), (cx - nx, cy - ny)], BODY);
    }
}

fn draw_head<S: ScoreStore>(game: &Game<S>, cv: &mut Canvas) {
    let grid = game.grid();
    let (gx, gy) = game.segment_at(0);
    let (x, y) = grid.to_px(gx, gy);
    let base = grid.cell.saturating_sub(1) as f32;
    let (ox, oy) = (x + base / 2.0, y + base / 2.0);
    let size = base * SPRITE_SCALE;
    let rad = game.head_angle().to_radians();

    // sprite space: facing up, origin at the sprite center
    let put = |lx: f32, ly: f32| rotate_about(lx * size, ly * size, rad, ox, oy);

    let snout: Vec<(f32, f32)> = [(-0.28, 0.0), (-0.2, -0.38), (0.2, -0.38), (0.28, 0.0)]
        .iter()
        .map(|&(lx, ly)| put(lx, ly))
        .collect();
    cv.fill_circle(ox, oy, size * 0.3, HEAD);
    cv.fill_convex(&snout, HEAD);
    let (tx, ty) = put(0.0, -0.38);
    cv.fill_circle(tx, ty, size * 0.2, HEAD);

    for side in [-1.0, 1.0] {
        let (ex, ey) = put(side * 0.14, -0.16);
        cv.fill_circle(ex, ey, size * 0.08, EYE);
        let (px, py) = put(side * 0.14, -0.19);
        cv.fill_circle(px, py, size * 0.04, PUPIL);
    }
}
