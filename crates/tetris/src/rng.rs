//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled.
//! Whenever the buffered queue runs short, a freshly shuffled bag is appended,
//! so every aligned window of 7 draws is a permutation of all seven kinds.
//!
//! Shuffling uses a seeded ChaCha stream so a seed fully determines the
//! sequence (replays, tests, restart with the same order).

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::types::PieceKind;

/// Number of pieces in one bag
pub const BAG_SIZE: usize = 7;

/// 7-bag piece generator with an extendable look-ahead buffer
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Committed upcoming pieces, front is drawn next
    queue: VecDeque<PieceKind>,
    rng: ChaCha8Rng,
    seed: u64,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            queue: VecDeque::with_capacity(BAG_SIZE * 2),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Append shuffled bags until at least `len` pieces are buffered.
    ///
    /// Pieces already in the buffer are never reordered.
    fn ensure(&mut self, len: usize) {
        while self.queue.len() < len {
            let mut bag = PieceKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        self.ensure(1);
        // ensure(1) guarantees a front element.
        self.queue.pop_front().unwrap_or(PieceKind::I)
    }

    /// Upcoming `count` pieces in draw order, without consuming them
    pub fn peek(&mut self, count: usize) -> impl Iterator<Item = PieceKind> + '_ {
        self.ensure(count);
        self.queue.iter().copied().take(count)
    }

    /// Fixed-size preview of the next `N` pieces.
    ///
    /// Stack-only output; the internal buffer may grow by one bag.
    pub fn peek_array<const N: usize>(&mut self) -> [PieceKind; N] {
        let mut out = [PieceKind::I; N];
        for (slot, kind) in out.iter_mut().zip(self.peek(N)) {
            *slot = kind;
        }
        out
    }

    /// Number of pieces currently committed in the buffer
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    /// Seed this queue was created with (for restarting with the same sequence)
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_is_bag(window: &[PieceKind]) {
        assert_eq!(window.len(), BAG_SIZE);
        let mut sorted = window.to_vec();
        sorted.sort();
        assert_eq!(sorted, PieceKind::ALL.to_vec(), "window {window:?}");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::new(12345);
        let mut b = PieceQueue::new(12345);

        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_every_aligned_window_is_a_bag() {
        let mut queue = PieceQueue::new(7);
        let drawn: Vec<PieceKind> = (0..70).map(|_| queue.draw()).collect();

        for window in drawn.chunks(BAG_SIZE) {
            assert_is_bag(window);
        }
    }

    #[test]
    fn test_peek_matches_draws() {
        let mut queue = PieceQueue::new(99);

        let peeked: Vec<PieceKind> = queue.peek(10).collect();
        let drawn: Vec<PieceKind> = (0..10).map(|_| queue.draw()).collect();

        assert_eq!(peeked, drawn);
    }

    #[test]
    fn test_peek_extends_without_reordering() {
        let mut queue = PieceQueue::new(3);

        let short: Vec<PieceKind> = queue.peek(3).collect();
        assert_eq!(queue.buffered(), BAG_SIZE);

        let long: Vec<PieceKind> = queue.peek(12).collect();
        assert_eq!(queue.buffered(), BAG_SIZE * 2);
        assert_eq!(&long[..3], &short[..]);
    }

    #[test]
    fn test_peek_across_bag_boundary() {
        let mut queue = PieceQueue::new(1);

        for _ in 0..6 {
            let _ = queue.draw();
        }

        let preview: [PieceKind; 5] = queue.peek_array();
        assert_eq!(queue.draw(), preview[0]);
        assert_eq!(queue.draw(), preview[1]);
    }
}
