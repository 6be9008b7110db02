//! Game session: owns every piece of per-run state and drives the
//! fixed-timestep update and per-frame render

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use super::cell::GridCell;
use super::difficulty::Difficulty;
use super::direction::Direction;
use super::food::Food;
use super::input::{Enqueued, InputQueue};
use super::particles::ParticleSystem;
use super::snake::{GraceKind, Snake, Step};
use super::timing::{Accumulator, FrameClock};
use crate::config::{GameConfig, DEATH_SHAKE, EAT_SHAKE, REVERSAL_SHAKE, SHAKE_DECAY, SHAKE_EPSILON};
use crate::render::scene::draw_scene;
use crate::render::Surface;
use crate::sound::SoundSink;

/// Where the snake sits before the first run
const INITIAL_HEAD: GridCell = GridCell { x: 15, y: 15 };

/// Where the food sits before it is first placed
const INITIAL_FOOD: GridCell = GridCell { x: 5, y: 5 };

/// Score, speed and flow flags of the current run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunState {
    pub score: u32,
    pub level: u32,
    /// Milliseconds per logic tick
    pub interval: f64,
    pub paused: bool,
    pub started: bool,
    pub difficulty: Difficulty,
    pub high_score: u32,
}

impl RunState {
    fn new(difficulty: Difficulty, high_score: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            interval: difficulty.settings().start_interval,
            paused: false,
            started: false,
            difficulty,
            high_score,
        }
    }
}

/// Things worth telling the outside world about
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RunStarted {
        difficulty: Difficulty,
    },
    FoodEaten {
        cell: GridCell,
        score: u32,
    },
    LevelUp {
        level: u32,
        interval: f64,
    },
    GraceStarted(GraceKind),
    GraceRecovered(GraceKind),
    GameOver {
        score: u32,
        level: u32,
        cause: GraceKind,
        new_high_score: bool,
    },
    ReturnedToStart,
}

/// Timing summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub dt: f64,
    pub dt_factor: f64,
    pub ticks: u32,
}

/// A single player's game
pub struct GameSession {
    config: GameConfig,
    run: RunState,
    snake: Snake,
    food: Food,
    particles: ParticleSystem,
    input: InputQueue,
    clock: FrameClock,
    accumulator: Accumulator,
    shake: f64,
    rng: StdRng,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Create a session seeded from system entropy
    pub fn new(config: GameConfig, high_score: u32) -> Self {
        Self::with_rng(config, high_score, StdRng::from_entropy())
    }

    /// Create a session with a fixed seed; same seed and inputs replay the same game
    pub fn with_seed(config: GameConfig, high_score: u32, seed: u64) -> Self {
        Self::with_rng(config, high_score, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, high_score: u32, rng: StdRng) -> Self {
        let mut session = Self {
            run: RunState::new(Difficulty::default(), high_score),
            snake: Snake::new(INITIAL_HEAD, config.cell_size),
            food: Food::at(INITIAL_FOOD),
            particles: ParticleSystem::new(),
            input: InputQueue::new(config.queue_capacity, config.queue_capacity_near_wall),
            clock: FrameClock::new(config.max_frame_delta_ms, config.reference_frame_ms),
            accumulator: Accumulator::new(),
            shake: 0.0,
            rng,
            events: Vec::new(),
            config,
        };
        session.place_food();
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn input(&self) -> &InputQueue {
        &self.input
    }

    pub fn shake(&self) -> f64 {
        self.shake
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // UI signals
    // =========================================================================

    /// Choose the difficulty used from the next start or restart.
    ///
    /// Ignored while a run is in progress.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if self.run.started {
            debug!("Difficulty change to {} ignored mid-run", difficulty);
            return;
        }
        self.run.difficulty = difficulty;
    }

    /// Begin playing with the selected difficulty; a no-op mid-run
    pub fn start(&mut self) {
        if self.run.started && self.snake.is_alive() {
            debug!("Start ignored, run already in progress");
            return;
        }
        if !self.snake.is_alive() {
            self.reset_run();
        }
        self.begin();
    }

    /// Reset the run and play again immediately
    pub fn restart(&mut self) {
        self.reset_run();
        self.begin();
    }

    /// Abandon the run and go back to the start screen
    pub fn return_to_start(&mut self) {
        self.run.started = false;
        self.run.paused = false;
        self.reset_run();
        self.events.push(SessionEvent::ReturnedToStart);
    }

    /// Toggle pause; ignored unless a run is in progress
    pub fn toggle_pause(&mut self) -> bool {
        if self.run.started {
            self.run.paused = !self.run.paused;
        }
        self.run.paused
    }

    /// Buffer a direction intent; ignored unless a run is in progress
    pub fn queue_direction(&mut self, direction: Direction) -> Option<Enqueued> {
        if !self.run.started {
            return None;
        }

        let near_wall = self.snake.head().near_wall(
            self.config.tiles_x,
            self.config.tiles_y,
            self.config.danger_margin,
        );
        let outcome = self.input.enqueue(
            direction,
            self.snake.direction(),
            self.snake.next_direction(),
            near_wall,
        );
        if outcome == Enqueued::Reversal {
            self.shake = REVERSAL_SHAKE;
        }
        Some(outcome)
    }

    fn begin(&mut self) {
        let settings = self.run.difficulty.settings();
        self.run.interval = settings.start_interval.max(self.config.min_interval_ms);
        self.run.started = true;
        self.run.paused = false;
        self.accumulator.reset();
        self.events.push(SessionEvent::RunStarted {
            difficulty: self.run.difficulty,
        });
        info!("Run started on {}", self.run.difficulty);
    }

    fn reset_run(&mut self) {
        let head = GridCell::random_inset(
            &mut self.rng,
            self.config.tiles_x,
            self.config.tiles_y,
            self.config.spawn_margin,
        );
        self.snake = Snake::new(head, self.config.cell_size);
        self.input.clear();
        self.run.score = 0;
        self.run.level = 1;
        self.particles.clear();
        self.place_food();
    }

    fn place_food(&mut self) {
        let occupied: Vec<GridCell> = self.snake.cells().collect();
        self.food.place(&occupied, self.config.tiles_x, self.config.tiles_y, &mut self.rng);
    }

    // =========================================================================
    // Frame and tick
    // =========================================================================

    /// Handle one animation-frame callback at `timestamp` (milliseconds,
    /// monotonic): run due logic ticks, advance effects, then draw.
    pub fn frame(
        &mut self,
        timestamp: f64,
        surface: &mut dyn Surface,
        sound: &mut dyn SoundSink,
    ) -> FrameReport {
        let delta = self.clock.frame(timestamp);
        let mut ticks = 0;

        if self.run.started {
            if let Some(cause) = self.snake.expired_grace(timestamp) {
                self.game_over(cause, sound);
            }
        }

        if self.run.started && !self.run.paused {
            self.accumulator.add(delta.dt);
            while self.run.started && self.accumulator.try_consume(self.run.interval) {
                self.tick(timestamp, sound);
                ticks += 1;
            }
        }

        self.particles.advance(delta.dt_factor);
        let shake = self.next_shake_offset();
        self.snake.smooth(self.config.smoothing, self.config.cell_size);

        draw_scene(
            surface,
            &self.config,
            &self.snake,
            &mut self.food,
            &self.particles,
            shake,
        );

        FrameReport {
            dt: delta.dt,
            dt_factor: delta.dt_factor,
            ticks,
        }
    }

    fn tick(&mut self, now: f64, sound: &mut dyn SoundSink) {
        let report = self
            .snake
            .advance(&mut self.input, self.food.position, &self.config, now);

        if report.wall_recovered {
            debug!("Recovered from wall collision");
            self.events.push(SessionEvent::GraceRecovered(GraceKind::Wall));
        }
        if report.tail_recovered {
            debug!("Recovered from tail collision");
            self.events.push(SessionEvent::GraceRecovered(GraceKind::Tail));
        }

        match report.step {
            Step::Ate => self.eat(sound),
            Step::GraceStarted(kind) => {
                debug!("Grace period started: {:?}", kind);
                self.events.push(SessionEvent::GraceStarted(kind));
            }
            Step::Moved | Step::GraceHeld(_) | Step::Dead => {}
        }
    }

    fn eat(&mut self, sound: &mut dyn SoundSink) {
        let head = self.snake.head();
        self.run.score += self.config.food_reward;

        self.particles
            .spawn_burst(head, self.config.burst_count, self.config.cell_size, &mut self.rng);
        self.shake = EAT_SHAKE;
        sound.play_eat();
        self.place_food();

        self.events.push(SessionEvent::FoodEaten {
            cell: head,
            score: self.run.score,
        });

        let settings = self.run.difficulty.settings();
        let level = settings.level_for(self.run.score);
        if level > self.run.level {
            self.run.level = level;
            self.run.interval = settings.interval_for(level, self.config.min_interval_ms);
            info!("Level {} reached, tick interval {}ms", level, self.run.interval);
            self.events.push(SessionEvent::LevelUp {
                level,
                interval: self.run.interval,
            });
        }
    }

    fn game_over(&mut self, cause: GraceKind, sound: &mut dyn SoundSink) {
        self.snake.kill();
        self.run.started = false;
        self.shake = DEATH_SHAKE;
        sound.play_crash();
        self.particles.spawn_burst(
            self.snake.head(),
            self.config.burst_count,
            self.config.cell_size,
            &mut self.rng,
        );

        let new_high_score = self.run.score > self.run.high_score;
        if new_high_score {
            self.run.high_score = self.run.score;
        }

        info!(
            "Game over ({:?}): score {}, level {}",
            cause, self.run.score, self.run.level
        );
        self.events.push(SessionEvent::GameOver {
            score: self.run.score,
            level: self.run.level,
            cause,
            new_high_score,
        });
    }

    /// Random translation for this frame's shake, decaying the magnitude
    fn next_shake_offset(&mut self) -> Option<(f64, f64)> {
        if self.shake <= SHAKE_EPSILON {
            return None;
        }
        let dx = self.rng.gen_range(-1.0..1.0) * self.shake;
        let dy = self.rng.gen_range(-1.0..1.0) * self.shake;
        self.shake *= SHAKE_DECAY;
        Some((dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::snake::SnakeState;
    use crate::render::CommandBuffer;
    use crate::sound::{CueBuffer, Muted, SoundCue};

    fn session() -> GameSession {
        GameSession::with_seed(GameConfig::default(), 0, 11)
    }

    fn place(session: &mut GameSession, cells: &[(i32, i32)], direction: Direction) {
        session.snake = Snake::from_cells(
            cells.iter().map(|&(x, y)| GridCell::new(x, y)),
            direction,
            session.config.cell_size,
        );
    }

    #[test]
    fn test_initial_state() {
        let session = session();
        assert!(!session.run().started);
        assert_eq!(session.run().level, 1);
        assert_eq!(session.run().interval, 120.0);
        assert_eq!(session.snake().head(), INITIAL_HEAD);
        assert!(!session.snake().occupies(session.food().position));
    }

    #[test]
    fn test_medium_level_up_scenario() {
        let mut session = session();
        session.start();
        place(&mut session, &[(10, 10)], Direction::East);
        session.food = Food::at(GridCell::new(11, 10));
        session.run.score = 30;

        let mut sound = CueBuffer::new();
        session.tick(0.0, &mut sound);

        assert_eq!(session.run().score, 40);
        assert_eq!(session.run().level, 2);
        assert_eq!(session.run().interval, 110.0);
        assert_eq!(session.snake().len(), 2);
        assert_eq!(session.particles().len(), 15);
        assert_eq!(session.shake(), EAT_SHAKE);
        assert_eq!(sound.take(), vec![SoundCue::Eat]);
        assert!(!session.snake().occupies(session.food().position));

        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::LevelUp {
            level: 2,
            interval: 110.0
        }));
    }

    #[test]
    fn test_length_tracks_food_eaten() {
        let mut session = session();
        session.start();
        place(&mut session, &[(25, 19)], Direction::East);

        let turns = [Direction::North, Direction::West, Direction::South, Direction::East];
        let mut eaten = 0;
        for i in 0..400 {
            if i % 7 == 0 {
                session.queue_direction(turns[(i / 7) % 4]);
            }
            // Steer the food into the snake's path every so often
            if i % 5 == 0 {
                let ahead = session.snake.head().step(session.snake.next_direction());
                if ahead.in_bounds(50, 38) && !session.snake.occupies(ahead) {
                    session.food = Food::at(ahead);
                }
            }
            let before = session.run.score;
            session.tick(i as f64, &mut Muted);
            if session.run.score > before {
                eaten += 1;
                assert!(!session.snake.occupies(session.food.position));
            }
            assert_eq!(session.snake.len(), 1 + eaten);
            if !session.snake.is_alive() || session.snake.state() != SnakeState::Alive {
                session.snake.cancel_grace();
                place(&mut session, &[(25, 19)], Direction::East);
                eaten = 0;
            }
        }
    }

    #[test]
    fn test_wall_grace_ends_run_exactly_once() {
        let mut session = session();
        session.start();
        place(&mut session, &[(0, 0)], Direction::West);
        let mut sound = CueBuffer::new();
        let mut surface = CommandBuffer::new();

        session.tick(100.0, &mut sound);
        assert_eq!(session.snake().state(), SnakeState::WallGracePending);
        assert_eq!(session.snake().head(), GridCell::new(0, 0));

        session.frame(200.0, &mut surface, &mut sound);
        assert!(session.run().started);

        session.frame(260.0, &mut surface, &mut sound);
        assert!(!session.run().started);
        assert_eq!(session.snake().state(), SnakeState::Dead);

        session.frame(400.0, &mut surface, &mut sound);
        session.frame(900.0, &mut surface, &mut sound);

        let game_overs = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert_eq!(sound.take(), vec![SoundCue::Crash]);
    }

    #[test]
    fn test_wall_grace_recovery_keeps_run() {
        let mut session = session();
        session.start();
        place(&mut session, &[(0, 0)], Direction::West);
        let mut surface = CommandBuffer::new();

        session.tick(100.0, &mut Muted);
        assert_eq!(
            session.queue_direction(Direction::South),
            Some(Enqueued::Queued)
        );
        session.tick(200.0, &mut Muted);

        assert_eq!(session.snake().state(), SnakeState::Alive);
        assert_eq!(
            session.snake().cells().collect::<Vec<_>>(),
            vec![GridCell::new(0, 1)]
        );

        session.frame(300.0, &mut surface, &mut Muted);
        session.frame(340.0, &mut surface, &mut Muted);
        assert!(session.run().started);
        assert!(session
            .drain_events()
            .contains(&SessionEvent::GraceRecovered(GraceKind::Wall)));
    }

    #[test]
    fn test_reversal_pulses_without_turning() {
        let mut session = session();
        session.start();
        place(&mut session, &[(20, 20), (19, 20)], Direction::East);

        assert_eq!(session.queue_direction(Direction::West), Some(Enqueued::Reversal));
        assert_eq!(session.shake(), REVERSAL_SHAKE);
        assert!(session.input().is_empty());
        assert_eq!(session.snake().next_direction(), Direction::East);
    }

    #[test]
    fn test_input_ignored_before_start() {
        let mut session = session();
        assert_eq!(session.queue_direction(Direction::North), None);
        assert!(!session.toggle_pause());
        assert!(session.input().is_empty());
    }

    #[test]
    fn test_restart_cancels_grace_and_clears_queue() {
        let mut session = session();
        session.start();
        place(&mut session, &[(0, 10)], Direction::West);
        session.tick(0.0, &mut Muted);
        session.queue_direction(Direction::North);
        session.run.score = 70;
        assert_eq!(session.snake().state(), SnakeState::WallGracePending);

        session.restart();
        assert_eq!(session.snake().state(), SnakeState::Alive);
        assert!(session.input().is_empty());
        assert_eq!(session.run().score, 0);
        assert_eq!(session.run().level, 1);
        assert!(session.run().started);

        // The old deadline must not fire into the new run
        let mut surface = CommandBuffer::new();
        session.frame(1000.0, &mut surface, &mut Muted);
        session.frame(1016.0, &mut surface, &mut Muted);
        assert!(session.run().started);
    }

    #[test]
    fn test_return_to_start() {
        let mut session = session();
        session.start();
        session.queue_direction(Direction::North);
        session.return_to_start();

        assert!(!session.run().started);
        assert!(!session.run().paused);
        assert!(session.input().is_empty());
        let head = session.snake().head();
        assert!(head.x >= 8 && head.x < 42 && head.y >= 8 && head.y < 30);
        assert!(session.drain_events().contains(&SessionEvent::ReturnedToStart));
    }

    #[test]
    fn test_pause_freezes_logic_not_particles() {
        let mut session = session();
        session.start();
        place(&mut session, &[(20, 20)], Direction::East);
        session.food = Food::at(GridCell::new(1, 1));
        session.particles.spawn_burst(GridCell::new(5, 5), 4, 18.0, &mut session.rng);
        assert!(session.toggle_pause());

        let mut surface = CommandBuffer::new();
        let mut t = 0.0;
        for _ in 0..60 {
            let report = session.frame(t, &mut surface, &mut Muted);
            assert_eq!(report.ticks, 0);
            t += 16.67;
        }
        assert_eq!(session.snake().head(), GridCell::new(20, 20));
        assert!(session.particles().is_empty());
    }

    #[test]
    fn test_frames_drive_fixed_ticks() {
        let mut session = session();
        session.start();
        place(&mut session, &[(10, 20)], Direction::East);
        session.food = Food::at(GridCell::new(1, 1));

        let mut surface = CommandBuffer::new();
        let mut ticks = 0;
        let mut t = 0.0;
        session.frame(t, &mut surface, &mut Muted);
        for _ in 0..60 {
            t += 16.0;
            ticks += session.frame(t, &mut surface, &mut Muted).ticks;
        }
        // 960ms at 120ms per tick
        assert_eq!(ticks, 8);
        assert_eq!(session.snake().head(), GridCell::new(18, 20));
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut session = GameSession::with_seed(GameConfig::default(), 50, 5);
        session.start();
        place(&mut session, &[(49, 10)], Direction::East);
        session.run.score = 80;

        let mut surface = CommandBuffer::new();
        session.tick(0.0, &mut Muted);
        session.frame(0.0, &mut surface, &mut Muted);
        session.frame(200.0, &mut surface, &mut Muted);

        assert_eq!(session.run().high_score, 80);
        assert!(session.drain_events().contains(&SessionEvent::GameOver {
            score: 80,
            level: 1,
            cause: GraceKind::Wall,
            new_high_score: true,
        }));
        assert_eq!(session.shake(), DEATH_SHAKE * SHAKE_DECAY);
        assert_eq!(session.particles().len(), 15);
    }

    #[test]
    fn test_start_after_game_over_resets() {
        let mut session = session();
        session.start();
        place(&mut session, &[(49, 10)], Direction::East);
        let mut surface = CommandBuffer::new();
        session.tick(0.0, &mut Muted);
        session.frame(500.0, &mut surface, &mut Muted);
        assert!(!session.snake().is_alive());

        session.start();
        assert!(session.snake().is_alive());
        assert!(session.run().started);
    }

    #[test]
    fn test_start_mid_run_keeps_speed() {
        let mut session = session();
        session.start();
        place(&mut session, &[(10, 10)], Direction::East);
        session.food = Food::at(GridCell::new(11, 10));
        session.run.score = 30;
        session.tick(0.0, &mut Muted);
        assert_eq!(session.run().level, 2);
        assert_eq!(session.run().interval, 110.0);

        assert!(session.toggle_pause());
        session.start();

        assert_eq!(session.run().level, 2);
        assert_eq!(session.run().interval, 110.0);
        assert!(session.run().paused);
        assert_eq!(session.snake().len(), 2);
    }

    #[test]
    fn test_difficulty_locked_during_run() {
        let mut session = session();
        session.start();
        session.select_difficulty(Difficulty::Extreme);
        assert_eq!(session.run().difficulty, Difficulty::Medium);
        assert_eq!(session.run().interval, 120.0);

        session.return_to_start();
        session.select_difficulty(Difficulty::Extreme);
        session.start();
        assert_eq!(session.run().difficulty, Difficulty::Extreme);
        assert_eq!(session.run().interval, 80.0);
    }

    #[test]
    fn test_tail_grace_ends_run_exactly_once() {
        let mut session = session();
        session.start();
        // Head at (5,5) heading north into its own body at (5,4)
        place(
            &mut session,
            &[(5, 5), (6, 5), (6, 4), (5, 4), (4, 4)],
            Direction::North,
        );
        let mut sound = CueBuffer::new();
        let mut surface = CommandBuffer::new();

        session.tick(100.0, &mut sound);
        assert_eq!(session.snake().state(), SnakeState::TailGracePending);
        assert_eq!(session.snake().len(), 5);

        session.frame(200.0, &mut surface, &mut sound);
        assert!(session.run().started);

        session.frame(260.0, &mut surface, &mut sound);
        assert!(!session.run().started);
        assert_eq!(session.snake().state(), SnakeState::Dead);

        session.frame(400.0, &mut surface, &mut sound);
        session.frame(900.0, &mut surface, &mut sound);

        let causes: Vec<GraceKind> = session
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::GameOver { cause, .. } => Some(cause),
                _ => None,
            })
            .collect();
        assert_eq!(causes, vec![GraceKind::Tail]);
        assert_eq!(sound.take(), vec![SoundCue::Crash]);
    }
}
