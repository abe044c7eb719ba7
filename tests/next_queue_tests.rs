//! Next queue tests - 7-bag fairness and lookahead

use std::collections::HashSet;

use proptest::prelude::*;

use raytris::core::next_queue::MAX_QUEUE_SIZE;
use raytris::core::NextQueue;
use raytris::types::{Tetromino, BAG_SIZE, LOOKAHEAD};

#[test]
fn test_preview_tracks_dealing_order() {
    let mut queue = NextQueue::with_seed(2024);
    for _ in 0..40 {
        let preview = queue.preview();
        assert_eq!(queue.next_tetromino(), preview[0]);
        assert_eq!(&queue.preview()[..LOOKAHEAD - 1], &preview[1..]);
    }
}

#[test]
fn test_distinct_seeds_give_distinct_sequences() {
    let mut a = NextQueue::with_seed(1);
    let mut b = NextQueue::with_seed(2);
    let seq_a: Vec<_> = (0..28).map(|_| a.next_tetromino()).collect();
    let seq_b: Vec<_> = (0..28).map(|_| b.next_tetromino()).collect();
    assert_ne!(seq_a, seq_b);
}

#[test]
fn test_reset_keeps_lookahead() {
    let mut queue = NextQueue::with_seed(5);
    queue.next_tetromino();
    queue.reset();
    assert_eq!(queue.len(), BAG_SIZE);
    assert!(queue.len() > LOOKAHEAD);
}

proptest! {
    #[test]
    fn every_bag_holds_each_piece_once(seed in any::<u64>(), bags in 1usize..20) {
        let mut queue = NextQueue::with_seed(seed);
        for _ in 0..bags {
            let bag: HashSet<Tetromino> = (0..BAG_SIZE).map(|_| queue.next_tetromino()).collect();
            prop_assert_eq!(bag.len(), BAG_SIZE);
        }
    }

    #[test]
    fn buffer_stays_within_bounds(seed in any::<u64>(), draws in 0usize..200) {
        let mut queue = NextQueue::with_seed(seed);
        for _ in 0..draws {
            queue.next_tetromino();
            prop_assert!(queue.len() > LOOKAHEAD);
            prop_assert!(queue.len() <= MAX_QUEUE_SIZE);
        }
    }

    #[test]
    fn same_seed_same_sequence(seed in any::<u64>()) {
        let mut a = NextQueue::with_seed(seed);
        let mut b = NextQueue::with_seed(seed);
        for _ in 0..30 {
            prop_assert_eq!(a.next_tetromino(), b.next_tetromino());
        }
    }
}
