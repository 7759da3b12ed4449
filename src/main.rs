mod anim;
mod config;
mod draw;
mod game;
mod grid;
mod hud;
mod input;
mod pos;
mod raster;
mod snake;
mod store;

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::game::{Game, Status, Step};
use crate::pos::Dir;
use crate::raster::Canvas;
use crate::store::{JsonFileStore, ScoreStore};
use anyhow::{Context, Result};
use log::{debug, error, info};
use pixels::{Pixels, SurfaceTexture};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use simplelog::SimpleLogger;
use std::path::PathBuf;
use std::time::Instant;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

const KEYMAP: [([VirtualKeyCode; 2], Dir); 4] = [
    ([VirtualKeyCode::Up, VirtualKeyCode::W], Dir::Up),
    ([VirtualKeyCode::Down, VirtualKeyCode::S], Dir::Down),
    ([VirtualKeyCode::Left, VirtualKeyCode::A], Dir::Left),
    ([VirtualKeyCode::Right, VirtualKeyCode::D], Dir::Right),
];

fn main() -> Result<()> {
    let cfg_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let cfg = Config::load(&cfg_path)?;
    SimpleLogger::init(cfg.level_filter(), simplelog::Config::default()).context("installing logger")?;
    info!("starting glide-snake ({} cells, {} moves/s)", cfg.grid_size, cfg.moves_per_second);

    let store = JsonFileStore::new(&cfg.high_score_path);
    let mut game = Game::new(&cfg, store, SmallRng::from_entropy());
    let touch = cfg.touch_labels;

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();

    let window = WindowBuilder::new()
        .with_title(hud::window_title(&game, touch))
        .with_inner_size(LogicalSize::new(cfg.window_width, cfg.window_width))
        .with_min_inner_size(LogicalSize::new(cfg.grid_size, cfg.grid_size))
        .build(&event_loop)
        .context("creating window")?;

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        let side = game.grid().extent();
        Pixels::new(side, side, surface_texture).context("creating pixel surface")?
    };
    let mut viewport = viewport_side(window.inner_size());
    let mut last_frame = Instant::now();
    let mut drag_from: Option<(f32, f32)> = None;
    let mut title = String::new();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Event::RedrawRequested(_) = event {
            let side = game.grid().extent();
            {
                let mut canvas = Canvas::new(pixels.frame_mut(), side, side);
                draw::render_game(&game, &mut canvas);
            }
            if let Err(e) = pixels.render() {
                error!("dropped frame: {e}");
            }
        }

        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape) || input.close_requested() || input.destroyed() {
                *control_flow = ControlFlow::Exit;
                return;
            }

            if let Some(size) = input.window_resized() {
                if let Err(e) = pixels.resize_surface(size.width, size.height) {
                    error!("resizing surface: {e}");
                }
                viewport = viewport_side(size);
            }

            if input.key_pressed(VirtualKeyCode::Return) || input.key_pressed(VirtualKeyCode::Space) {
                game.press_start();
            }
            for (keys, dir) in KEYMAP {
                if keys.iter().any(|&k| input.key_pressed(k)) {
                    game.steer(dir);
                }
            }

            // pointer drags stand in for touch swipes
            if input.mouse_pressed(0) {
                drag_from = input.mouse();
            }
            if input.mouse_released(0) {
                if let (Some((x0, y0)), Some((x1, y1))) = (drag_from.take(), input.mouse()) {
                    if let Some(dir) = input::swipe_dir(x1 - x0, y1 - y0) {
                        game.steer(dir);
                    }
                }
            }

            if game.status() != Status::Active {
                refit(&mut game, &mut pixels, viewport);
            }

            let now = Instant::now();
            let elapsed_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
            last_frame = now;
            match game.advance(elapsed_ms) {
                Some(Step::Ate { score }) => debug!("ate, score {score}"),
                Some(Step::Crashed(crash)) => debug!("crashed into {crash:?}"),
                _ => {}
            }

            let t = hud::window_title(&game, touch);
            if t != title {
                window.set_title(&t);
                title = t;
            }
            window.request_redraw();
        }
    });
}

/// The largest square the window can show, in physical pixels.
fn viewport_side(size: PhysicalSize<u32>) -> u32 {
    size.width.min(size.height)
}

/// Resizes the board and its pixel buffer to the current viewport, between games only.
fn refit<S: ScoreStore>(game: &mut Game<S>, pixels: &mut Pixels, viewport: u32) {
    let grid = game.grid();
    if grid::cell_size_for(grid.size, viewport) == grid.cell || !game.resize(viewport) {
        return;
    }
    let side = game.grid().extent();
    if let Err(e) = pixels.resize_buffer(side, side) {
        error!("resizing pixel buffer: {e}");
    }
}
