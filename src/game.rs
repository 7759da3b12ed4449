use crate::anim::{self, HeadTurn, Motion};
use crate::config::Config;
use crate::grid::Grid;
use crate::input::InputQueue;
use crate::pos::{Dir, Pos};
use crate::snake::Snake;
use crate::store::ScoreStore;
use ahash::AHashSet;
use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Random draws before falling back to scanning every free cell.
const FOOD_TRIES: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Inactive,
    Active,
    Cooldown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

/// What one discrete move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    Ate { score: u32 },
    Crashed(Crash),
}

pub struct Game<S: ScoreStore> {
    grid: Grid,
    snake: Snake,
    dir: Dir,
    food: Pos,
    score: u32,
    high_score: u32,
    status: Status,
    played: bool,
    queue: InputQueue,
    track: Vec<Motion>,
    turn: HeadTurn,
    move_timer: f64,
    progress: f32,
    cooldown_timer: f64,
    move_ms: f64,
    cooldown_ms: f64,
    store: S,
    rng: SmallRng,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(cfg: &Config, store: S, rng: SmallRng) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            warn!("could not read high score, starting from 0: {e:#}");
            0
        });
        let grid = Grid::fit(cfg.grid_size, cfg.window_width);
        let snake = Snake::new(grid.center());
        let track = snake.iter().map(Motion::still).collect();

        let mut g = Self {
            grid,
            snake,
            dir: Dir::Up,
            food: Pos::new(0, 0),
            score: 0,
            high_score,
            status: Status::Inactive,
            played: false,
            queue: InputQueue::with_capacity(cfg.queue_capacity),
            track,
            turn: HeadTurn::facing(Dir::Up),
            move_timer: 0.0,
            progress: 0.0,
            cooldown_timer: 0.0,
            move_ms: cfg.move_ms(),
            cooldown_ms: cfg.cooldown_ms,
            store,
            rng,
        };
        g.place_food();
        g
    }

    /// Begins a game heading `dir`. Only an idle game can start.
    pub fn start(&mut self, dir: Dir) -> bool {
        if self.status != Status::Inactive {
            return false;
        }
        self.snake = Snake::new(self.grid.center());
        self.dir = dir;
        self.turn.snap(dir);
        self.queue.clear();
        self.move_timer = 0.0;
        self.progress = 0.0;
        self.score = 0;
        self.track = self.snake.iter().map(Motion::still).collect();
        // food from the last session stays put unless the new head sits on it
        if self.food == self.snake.head() {
            self.place_food();
        }
        self.status = Status::Active;
        self.played = true;
        info!("game started heading {:?}", dir);
        true
    }

    /// The start/restart trigger. Mid-game it ends the run; a new one needs another press after the cooldown.
    pub fn press_start(&mut self) {
        match self.status {
            Status::Cooldown => {}
            Status::Inactive => {
                self.start(Dir::Up);
            }
            Status::Active => self.game_over(),
        }
    }

    /// A direction command: starts an idle game, queues a turn in a running one.
    pub fn steer(&mut self, dir: Dir) {
        match self.status {
            Status::Cooldown => {}
            Status::Inactive => {
                self.start(dir);
            }
            Status::Active => self.queue.enqueue(dir),
        }
    }

    /// Advances timers by one frame's worth of time, running a move when one is due.
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<Step> {
        match self.status {
            Status::Inactive => None,
            Status::Cooldown => {
                self.cooldown_timer += elapsed_ms;
                if self.cooldown_timer >= self.cooldown_ms {
                    self.cooldown_timer = 0.0;
                    self.status = Status::Inactive;
                    debug!("cooldown over");
                }
                None
            }
            Status::Active => {
                self.move_timer += elapsed_ms;
                self.progress = anim::progress(self.move_timer, self.move_ms);
                let step = if self.move_timer >= self.move_ms { Some(self.tick()) } else { None };
                if self.status == Status::Active {
                    self.turn.ease(self.dir, self.progress);
                }
                step
            }
        }
    }

    fn tick(&mut self) -> Step {
        let prev = self.snake.to_vec();
        self.dir = self.queue.consume_one(self.dir);

        let head = self.snake.head().step(self.dir);
        if !self.grid.contains(head) {
            self.game_over();
            return Step::Crashed(Crash::Wall);
        }
        if self.snake.body_hits(head) {
            self.game_over();
            return Step::Crashed(Crash::Body);
        }

        self.snake.push_head(head);
        let step = if head == self.food {
            self.score += 1;
            if self.score > self.high_score {
                self.record_high_score();
            }
            self.place_food();
            Step::Ate { score: self.score }
        } else {
            self.snake.drop_tail();
            Step::Moved
        };

        self.track = anim::pair(&prev, &self.snake.to_vec());
        self.move_timer = 0.0;
        self.progress = 0.0;
        step
    }

    fn record_high_score(&mut self) {
        self.high_score = self.score;
        info!("new high score {}", self.high_score);
        if let Err(e) = self.store.save(self.high_score) {
            warn!("failed to save high score: {e:#}");
        }
    }

    fn game_over(&mut self) {
        info!("game over, score {} (best {})", self.score, self.high_score);
        self.status = Status::Cooldown;
        self.cooldown_timer = 0.0;
    }

    pub fn place_food(&mut self) {
        let n = self.grid.size as i32;
        for _ in 0..FOOD_TRIES {
            let p = Pos::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));
            if !self.snake.contains(p) {
                self.food = p;
                return;
            }
        }
        let taken: AHashSet<Pos> = self.snake.iter().collect();
        let free: Vec<Pos> = self.grid.cells().filter(|c| !taken.contains(c)).collect();
        match free.choose(&mut self.rng) {
            Some(&p) => self.food = p,
            None => warn!("no free cell left for food"),
        }
    }

    /// Refits the board to a new viewport. Ignored mid-game.
    pub fn resize(&mut self, viewport_width: u32) -> bool {
        if self.status == Status::Active {
            return false;
        }
        self.grid = Grid::fit(self.grid.size, viewport_width);
        debug!("board resized to {}px cells", self.grid.cell);
        true
    }

    /// Grid coordinate to draw segment `i` at this frame.
    pub fn segment_at(&self, i: usize) -> (f32, f32) {
        let cell = self.snake.get(i).unwrap_or_else(|| self.snake.tail());
        if self.status != Status::Active {
            return (cell.x as f32, cell.y as f32);
        }
        anim::motion_for(&self.track, i, cell).at(self.progress, self.grid.size)
    }

    /// Head rotation in degrees. Outside play it snaps to the last heading.
    pub fn head_angle(&self) -> f32 {
        if self.status == Status::Active { self.turn.angle } else { HeadTurn::facing(self.dir).angle }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn has_played(&self) -> bool {
        self.played
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    #[cfg(test)]
    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[cfg(test)]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[cfg(test)]
    pub fn set_food(&mut self, p: Pos) {
        self.food = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rand::SeedableRng;

    const MOVE: f64 = 1000.0 / 7.0;

    fn game() -> Game<MemoryStore> {
        game_with(MemoryStore::default())
    }

    fn game_with<S: ScoreStore>(store: S) -> Game<S> {
        let cfg = Config { window_width: 340, ..Config::default() };
        Game::new(&cfg, store, SmallRng::seed_from_u64(7))
    }

    /// Runs exactly one move and returns what it did.
    fn one_move<S: ScoreStore>(g: &mut Game<S>) -> Step {
        g.advance(MOVE).expect("a full move duration runs a tick")
    }

    fn park_food<S: ScoreStore>(g: &mut Game<S>) {
        g.food = Pos::new(0, 16);
    }

    /// A store whose disk is gone: every read and write fails.
    struct UnpluggedStore;

    impl ScoreStore for UnpluggedStore {
        fn load(&self) -> anyhow::Result<u32> {
            anyhow::bail!("store unavailable")
        }

        fn save(&mut self, _high_score: u32) -> anyhow::Result<()> {
            anyhow::bail!("store unavailable")
        }
    }

    #[test]
    fn initial_food_is_off_the_snake() {
        let g = game();
        assert!(!g.snake().contains(g.food()));
        assert!(g.grid().contains(g.food()));
        assert_eq!(g.status(), Status::Inactive);
    }

    #[test]
    fn first_move_goes_up_one_cell() {
        let mut g = game();
        park_food(&mut g);
        assert!(g.start(Dir::Up));
        assert_eq!(g.snake().head(), Pos::new(8, 8));
        assert_eq!(one_move(&mut g), Step::Moved);
        assert_eq!(g.snake().head(), Pos::new(8, 7));
        assert_eq!(g.snake().len(), 1);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn no_move_before_duration_elapses() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Right);
        assert_eq!(g.advance(MOVE * 0.5), None);
        assert!((g.progress() - 0.5).abs() < 1e-6);
        assert_eq!(g.advance(MOVE * 0.49), None);
        assert!(g.progress() < 1.0);
        assert_eq!(g.advance(MOVE * 0.01 + 1e-6), Some(Step::Moved));
        assert_eq!(g.progress(), 0.0);
        assert_eq!(g.snake().head(), Pos::new(9, 8));
    }

    #[test]
    fn reversal_in_queue_is_dropped() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Up);
        g.steer(Dir::Down);
        g.steer(Dir::Left);
        one_move(&mut g);
        assert_eq!(g.dir(), Dir::Up);
        assert_eq!(g.snake().head(), Pos::new(8, 7));
        one_move(&mut g);
        assert_eq!(g.dir(), Dir::Left);
        assert_eq!(g.snake().head(), Pos::new(7, 7));
    }

    #[test]
    fn applied_heading_never_reverses() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Right);
        let turns = [Dir::Left, Dir::Up, Dir::Down, Dir::Right, Dir::Left, Dir::Down, Dir::Up];
        let mut last = g.dir();
        for t in turns {
            g.steer(t);
            let before = g.snake().head();
            if let Step::Crashed(_) = one_move(&mut g) {
                break;
            }
            assert!(!g.dir().is_reverse_of(last));
            assert_eq!(before.step(g.dir()), g.snake().head());
            last = g.dir();
        }
    }

    #[test]
    fn wall_crash_leaves_board_untouched() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Left);
        for _ in 0..8 {
            assert_eq!(one_move(&mut g), Step::Moved);
        }
        assert_eq!(g.snake().head(), Pos::new(0, 8));
        let snake = g.snake().clone();
        let food = g.food();
        assert_eq!(one_move(&mut g), Step::Crashed(Crash::Wall));
        assert_eq!(g.status(), Status::Cooldown);
        assert_eq!(g.snake(), &snake);
        assert_eq!(g.food(), food);
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut g = game();
        g.start(Dir::Up);
        g.food = Pos::new(8, 7);
        assert_eq!(one_move(&mut g), Step::Ate { score: 1 });
        assert_eq!(g.snake().len(), 2);
        assert_eq!(g.score(), 1);
        assert!(!g.snake().contains(g.food()));
        assert_eq!(g.high_score(), 1);

        park_food(&mut g);
        one_move(&mut g);
        assert_eq!(g.snake().len(), 2);
        assert_eq!(g.score(), 1);
    }

    #[test]
    fn grown_tail_holds_still_while_head_slides() {
        let mut g = game();
        g.start(Dir::Up);
        g.food = Pos::new(8, 7);
        one_move(&mut g);
        g.advance(MOVE * 0.5);
        assert_eq!(g.segment_at(0), (8.0, 7.5));
        assert_eq!(g.segment_at(1), (8.0, 8.0));
        // past the end falls back to the tail record
        assert_eq!(g.segment_at(5), (8.0, 8.0));
    }

    #[test]
    fn self_collision_counts_departing_tail() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Up);
        // square loop: head at (5,5) heading left into (4,5), which is the tail
        g.snake = Snake::from_cells(&[Pos::new(5, 5), Pos::new(5, 6), Pos::new(4, 6), Pos::new(4, 5)]);
        g.dir = Dir::Left;
        g.steer(Dir::Left);
        assert_eq!(one_move(&mut g), Step::Crashed(Crash::Body));
        assert_eq!(g.status(), Status::Cooldown);
    }

    #[test]
    fn high_score_is_persisted_and_monotonic() {
        let mut g = game_with(MemoryStore { value: 1, writes: 0 });
        assert_eq!(g.high_score(), 1);
        g.start(Dir::Up);
        g.food = Pos::new(8, 7);
        one_move(&mut g);
        assert_eq!(g.high_score(), 1);
        assert_eq!(g.store.writes, 0);
        g.food = Pos::new(8, 6);
        one_move(&mut g);
        assert_eq!(g.high_score(), 2);
        assert_eq!(g.store.value, 2);
        assert_eq!(g.store.writes, 1);

        // a fresh low-scoring game keeps the record
        g.press_start();
        g.advance(600.0);
        g.start(Dir::Up);
        assert_eq!(g.score(), 0);
        assert_eq!(g.high_score(), 2);
    }

    #[test]
    fn unreadable_store_starts_from_zero() {
        let g = game_with(UnpluggedStore);
        assert_eq!(g.high_score(), 0);
        assert_eq!(g.status(), Status::Inactive);
    }

    #[test]
    fn failed_save_still_raises_record() {
        let mut g = game_with(UnpluggedStore);
        g.start(Dir::Up);
        g.food = Pos::new(8, 7);
        assert_eq!(one_move(&mut g), Step::Ate { score: 1 });
        assert_eq!(g.score(), 1);
        assert_eq!(g.high_score(), 1);
        assert_eq!(g.status(), Status::Active);

        park_food(&mut g);
        assert_eq!(one_move(&mut g), Step::Moved);
        assert_eq!(g.high_score(), 1);
    }

    #[test]
    fn cooldown_blocks_restart_for_half_a_second() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Up);
        for _ in 0..9 {
            one_move(&mut g);
        }
        assert_eq!(g.status(), Status::Cooldown);
        assert!(!g.start(Dir::Up));
        g.steer(Dir::Right);
        g.press_start();
        assert_eq!(g.status(), Status::Cooldown);
        g.advance(499.0);
        assert_eq!(g.status(), Status::Cooldown);
        g.advance(1.0);
        assert_eq!(g.status(), Status::Inactive);
        g.steer(Dir::Right);
        assert_eq!(g.status(), Status::Active);
        assert_eq!(g.dir(), Dir::Right);
        assert_eq!(g.snake().head(), Pos::new(8, 8));
    }

    #[test]
    fn restart_mid_game_ends_the_run() {
        let mut g = game();
        park_food(&mut g);
        g.press_start();
        assert_eq!(g.status(), Status::Active);
        assert_eq!(g.dir(), Dir::Up);
        g.press_start();
        assert_eq!(g.status(), Status::Cooldown);
    }

    #[test]
    fn start_replaces_food_under_head() {
        let mut g = game();
        g.food = Pos::new(8, 8);
        g.start(Dir::Up);
        assert_ne!(g.food(), Pos::new(8, 8));
        assert!(!g.snake().contains(g.food()));
    }

    #[test]
    fn start_keeps_food_elsewhere() {
        let mut g = game();
        g.food = Pos::new(3, 3);
        g.start(Dir::Up);
        assert_eq!(g.food(), Pos::new(3, 3));
    }

    #[test]
    fn food_lands_on_last_free_cell() {
        let mut g = game();
        let free = Pos::new(16, 16);
        let cells: Vec<Pos> = g.grid().cells().filter(|&c| c != free).collect();
        g.snake = Snake::from_cells(&cells);
        g.place_food();
        assert_eq!(g.food(), free);
    }

    #[test]
    fn full_board_keeps_food() {
        let mut g = game();
        let cells: Vec<Pos> = g.grid().cells().collect();
        g.snake = Snake::from_cells(&cells);
        g.food = Pos::new(2, 2);
        g.place_food();
        assert_eq!(g.food(), Pos::new(2, 2));
    }

    #[test]
    fn resize_only_between_games() {
        let mut g = game();
        assert!(g.resize(680));
        assert_eq!(g.grid().cell, 40);
        park_food(&mut g);
        g.start(Dir::Up);
        assert!(!g.resize(340));
        assert_eq!(g.grid().cell, 40);
    }

    #[test]
    fn idle_render_positions_are_discrete() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Right);
        g.advance(MOVE * 0.4);
        assert!(g.segment_at(0).0 > 8.0);
        g.press_start();
        assert_eq!(g.segment_at(0), (8.0, 8.0));
        assert_eq!(g.head_angle(), 90.0);
    }

    #[test]
    fn head_turn_eases_during_play() {
        let mut g = game();
        park_food(&mut g);
        g.start(Dir::Up);
        g.steer(Dir::Right);
        one_move(&mut g);
        assert_eq!(g.dir(), Dir::Right);
        // the tick frame itself has zero progress, so no turn yet
        assert_eq!(g.head_angle(), 0.0);
        g.advance(MOVE * 0.1);
        assert!(g.head_angle() > 0.0 && g.head_angle() < 90.0);
        g.advance(MOVE * 0.3);
        assert!((g.head_angle() - 90.0).abs() < 1e-3);
    }
}
