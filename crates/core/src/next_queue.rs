//! Next queue module - 7-bag random piece generation
//!
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled. Bags are
//! appended to a small buffer so that at least [`LOOKAHEAD`] pieces are always
//! visible behind the one about to be dealt.
//!
//! Every queue owns its generator. Two playfields never share a sequence unless
//! they are deliberately built from the same seed.

use std::ops::Index;

use arrayvec::ArrayVec;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::{Tetromino, BAG_SIZE, LOOKAHEAD};

/// Largest number of pieces the buffer can hold (a full bag on top of the lookahead)
pub const MAX_QUEUE_SIZE: usize = LOOKAHEAD + BAG_SIZE;

/// 7-bag piece generator with a fixed lookahead
#[derive(Debug, Clone)]
pub struct NextQueue {
    /// Buffered pieces; the piece dealt next sits at the end
    queue: ArrayVec<Tetromino, MAX_QUEUE_SIZE>,
    rng: StdRng,
}

impl NextQueue {
    /// Create a queue seeded from system entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create a queue with a reproducible sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        let mut queue = Self {
            queue: ArrayVec::new(),
            rng,
        };
        queue.push_new_bag_if_needed();
        queue
    }

    /// Shuffle a fresh bag in behind everything already buffered
    fn push_new_bag(&mut self) {
        let mut bag = Tetromino::ALL;
        bag.shuffle(&mut self.rng);

        let mut queue: ArrayVec<Tetromino, MAX_QUEUE_SIZE> = bag.into_iter().collect();
        queue.extend(self.queue.drain(..));
        self.queue = queue;
    }

    /// Append a bag if no more than [`LOOKAHEAD`] pieces remain
    pub fn push_new_bag_if_needed(&mut self) {
        if self.queue.len() <= LOOKAHEAD {
            self.push_new_bag();
        }
    }

    /// Deal the next piece
    pub fn next_tetromino(&mut self) -> Tetromino {
        loop {
            if let Some(piece) = self.queue.pop() {
                self.push_new_bag_if_needed();
                return piece;
            }
            self.push_new_bag();
        }
    }

    /// The `index`-th upcoming piece (0 = dealt next)
    pub fn peek(&self, index: usize) -> Option<Tetromino> {
        let len = self.queue.len();
        if index >= len {
            return None;
        }
        Some(self.queue[len - 1 - index])
    }

    /// The pieces the player can see, dealt-next first
    pub fn preview(&self) -> [Tetromino; LOOKAHEAD] {
        std::array::from_fn(|i| self[i])
    }

    /// Every buffered piece in dealing order
    pub fn upcoming(&self) -> impl Iterator<Item = Tetromino> + '_ {
        self.queue.iter().rev().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Replace the buffer with `pieces` (dealing order), then top it up
    ///
    /// Returns false and leaves the queue untouched if `pieces` does not fit.
    pub fn set_upcoming(&mut self, pieces: &[Tetromino]) -> bool {
        if pieces.len() > MAX_QUEUE_SIZE {
            return false;
        }
        self.queue = pieces.iter().rev().copied().collect();
        self.push_new_bag_if_needed();
        true
    }

    /// Drop the buffer and start over from a fresh bag, keeping the generator
    pub fn reset(&mut self) {
        self.queue.clear();
        self.push_new_bag_if_needed();
    }
}

impl Default for NextQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for NextQueue {
    type Output = Tetromino;

    fn index(&self, index: usize) -> &Self::Output {
        let len = self.queue.len();
        assert!(index < len, "next queue index {index} out of range ({len} buffered)");
        &self.queue[len - 1 - index]
    }
}
