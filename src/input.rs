use crate::pos::Dir;
use log::debug;
use std::collections::VecDeque;

pub const QUEUE_CAPACITY: usize = 3;
pub const MIN_SWIPE_PX: f32 = 30.0;

/// Pending turns, oldest first.
#[derive(Clone, Debug)]
pub struct InputQueue {
    pending: VecDeque<Dir>,
    cap: usize,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }
}

impl InputQueue {
    pub fn with_capacity(cap: usize) -> Self {
        Self { pending: VecDeque::with_capacity(cap + 1), cap: cap.max(1) }
    }

    /// Appends unless it repeats the last queued turn. Overflow evicts the oldest entries.
    pub fn enqueue(&mut self, dir: Dir) {
        if self.pending.back() == Some(&dir) {
            return;
        }
        self.pending.push_back(dir);
        while self.pending.len() > self.cap {
            self.pending.pop_front();
        }
    }

    /// Pops one turn and returns the direction to apply this tick.
    /// A popped reversal of `current` is dropped and `current` is kept.
    pub fn consume_one(&mut self, current: Dir) -> Dir {
        match self.pending.pop_front() {
            Some(d) if d.is_reverse_of(current) => {
                debug!("dropped reversing input {:?} while heading {:?}", d, current);
                current
            }
            Some(d) => d,
            None => current,
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Classifies a pointer drag. Short drags are taps and yield nothing.
pub fn swipe_dir(dx: f32, dy: f32) -> Option<Dir> {
    if dx.abs() < MIN_SWIPE_PX && dy.abs() < MIN_SWIPE_PX {
        return None;
    }
    Some(if dx.abs() > dy.abs() {
        if dx > 0.0 { Dir::Right } else { Dir::Left }
    } else if dy > 0.0 {
        Dir::Down
    } else {
        Dir::Up
    })
}
