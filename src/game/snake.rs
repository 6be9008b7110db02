//! Snake entity: movement, growth and grace-period collision handling

use std::collections::VecDeque;

use super::cell::GridCell;
use super::direction::Direction;
use super::input::InputQueue;
use crate::config::GameConfig;

/// Collision state of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeState {
    Alive,
    WallGracePending,
    TailGracePending,
    Dead,
}

/// Which forgiveness window a collision opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceKind {
    Wall,
    Tail,
}

/// A deadline that ends the run unless cancelled first
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GraceTimer {
    deadline: Option<f64>,
}

impl GraceTimer {
    pub fn start(&mut self, now: f64, window: f64) {
        self.deadline = Some(now + window);
    }

    /// Returns true if the timer was running
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn expired(&self, now: f64) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }
}

/// One body segment: logical cell plus the pixel position it is drawn at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub cell: GridCell,
    pub drawn: (f64, f64),
}

impl Segment {
    fn snapped(cell: GridCell, cell_size: f64) -> Self {
        Self {
            cell,
            drawn: cell.origin_px(cell_size),
        }
    }
}

/// Result of a single logic tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Head advanced and the tail followed
    Moved,
    /// Head advanced onto food; the tail stays
    Ate,
    /// Movement suspended by a fresh collision
    GraceStarted(GraceKind),
    /// Movement still suspended by a running grace timer
    GraceHeld(GraceKind),
    /// The snake is dead and ignores ticks
    Dead,
}

/// Tick outcome plus the grace timers the tick cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub step: Step,
    pub wall_recovered: bool,
    pub tail_recovered: bool,
}

impl TickReport {
    fn new(step: Step) -> Self {
        Self {
            step,
            wall_recovered: false,
            tail_recovered: false,
        }
    }
}

/// The player's snake
#[derive(Debug, Clone)]
pub struct Snake {
    /// Body segments (head is front, tail is back)
    body: VecDeque<Segment>,
    /// Heading applied by the last tick
    direction: Direction,
    /// Heading the next tick will commit
    next_direction: Direction,
    wall_grace: GraceTimer,
    tail_grace: GraceTimer,
    dead: bool,
}

impl Snake {
    /// Single-segment snake heading east
    pub fn new(head: GridCell, cell_size: f64) -> Self {
        Self::from_cells([head], Direction::East, cell_size)
    }

    /// Snake with an explicit body, head first
    pub fn from_cells(
        cells: impl IntoIterator<Item = GridCell>,
        direction: Direction,
        cell_size: f64,
    ) -> Self {
        let body: VecDeque<Segment> = cells
            .into_iter()
            .map(|cell| Segment::snapped(cell, cell_size))
            .collect();
        assert!(!body.is_empty(), "snake body must not be empty");

        Self {
            body,
            direction,
            next_direction: direction,
            wall_grace: GraceTimer::default(),
            tail_grace: GraceTimer::default(),
            dead: false,
        }
    }

    /// Get the snake's head cell
    pub fn head(&self) -> GridCell {
        self.body[0].cell
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.body.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.body.iter().map(|segment| segment.cell)
    }

    pub fn occupies(&self, cell: GridCell) -> bool {
        self.cells().any(|c| c == cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn wall_grace(&self) -> GraceTimer {
        self.wall_grace
    }

    pub fn tail_grace(&self) -> GraceTimer {
        self.tail_grace
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn state(&self) -> SnakeState {
        if self.dead {
            SnakeState::Dead
        } else if self.wall_grace.is_active() {
            SnakeState::WallGracePending
        } else if self.tail_grace.is_active() {
            SnakeState::TailGracePending
        } else {
            SnakeState::Alive
        }
    }

    /// Run one logic tick.
    ///
    /// Drains at most one buffered intent, commits the heading, then either
    /// moves, eats `food`, or suspends on a collision under a grace timer.
    pub fn advance(
        &mut self,
        input: &mut InputQueue,
        food: GridCell,
        config: &GameConfig,
        now: f64,
    ) -> TickReport {
        if self.dead {
            return TickReport::new(Step::Dead);
        }

        if let Some(next) = input.dequeue_one(self.direction) {
            self.next_direction = next;
        }
        self.direction = self.next_direction;

        let new_head = self.head().step(self.direction);

        if !new_head.in_bounds(config.tiles_x, config.tiles_y) {
            if self.wall_grace.is_active() {
                return TickReport::new(Step::GraceHeld(GraceKind::Wall));
            }
            self.wall_grace.start(now, config.wall_grace_ms);
            return TickReport::new(Step::GraceStarted(GraceKind::Wall));
        }
        let wall_recovered = self.wall_grace.cancel();

        if self.occupies(new_head) {
            let step = if self.tail_grace.is_active() {
                Step::GraceHeld(GraceKind::Tail)
            } else {
                self.tail_grace.start(now, config.tail_grace_ms);
                Step::GraceStarted(GraceKind::Tail)
            };
            return TickReport {
                step,
                wall_recovered,
                tail_recovered: false,
            };
        }
        let tail_recovered = self.tail_grace.cancel();

        // The new head starts drawn where the old head was and glides over
        let drawn = self.body[0].drawn;
        self.body.push_front(Segment {
            cell: new_head,
            drawn,
        });

        let step = if new_head == food {
            Step::Ate
        } else {
            self.body.pop_back();
            Step::Moved
        };

        TickReport {
            step,
            wall_recovered,
            tail_recovered,
        }
    }

    /// Check the grace deadlines against the frame clock.
    ///
    /// Returns the expired timer, if any; the caller ends the run.
    pub fn expired_grace(&self, now: f64) -> Option<GraceKind> {
        if self.dead {
            None
        } else if self.wall_grace.expired(now) {
            Some(GraceKind::Wall)
        } else if self.tail_grace.expired(now) {
            Some(GraceKind::Tail)
        } else {
            None
        }
    }

    /// Kill the snake, dropping any pending grace timers
    pub fn kill(&mut self) {
        self.cancel_grace();
        self.dead = true;
    }

    pub fn cancel_grace(&mut self) {
        self.wall_grace.cancel();
        self.tail_grace.cancel();
    }

    /// Ease each drawn position towards its grid position
    pub fn smooth(&mut self, factor: f64, cell_size: f64) {
        for segment in self.body.iter_mut() {
            let (tx, ty) = segment.cell.origin_px(cell_size);
            segment.drawn.0 += (tx - segment.drawn.0) * factor;
            segment.drawn.1 += (ty - segment.drawn.1) * factor;
        }
    }
}
