use crate::game::{Game, Status};
use crate::store::ScoreStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Over,
}

impl Phase {
    pub fn of<S: ScoreStore>(game: &Game<S>) -> Self {
        match game.status() {
            Status::Active => Phase::Running,
            _ if game.has_played() => Phase::Over,
            _ => Phase::NotStarted,
        }
    }
}

/// Text for the start/restart control.
pub fn start_label(phase: Phase, touch: bool) -> &'static str {
    match (phase, touch) {
        (Phase::NotStarted, false) => "Start Game (or press any arrow key)",
        (Phase::NotStarted, true) => "Start Game (or swipe in any direction)",
        (Phase::Running, _) => "Restart Game",
        (Phase::Over, false) => "Restart Game (or press any arrow key)",
        (Phase::Over, true) => "Restart Game (or swipe in any direction)",
    }
}

pub fn window_title<S: ScoreStore>(game: &Game<S>, touch: bool) -> String {
    format!(
        "Snake | Score: {} | High Score: {} | {}",
        game.score(),
        game.high_score(),
        start_label(Phase::of(game), touch)
    )
}
