// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Block complexity and checkerboard conjugation.
//!
//! The complexity of a binary block is the fraction of adjacent cell pairs
//! (horizontal and vertical) whose bits differ. Noise-like blocks score high
//! and can absorb payload bits without visible change.
//!
//! Conjugation XORs a block with the checkerboard `(row + col) mod 2`. Every
//! adjacent pair straddles one black and one white square, so each pair's
//! "differs" state flips and `score(conjugate(b)) == 1 - score(b)`.

use super::grid::Block;

/// Default complexity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Number of differing adjacent pairs (horizontal + vertical).
pub fn transitions(block: &Block) -> usize {
    let n = block.size();
    let cells = block.cells();
    let mut count = 0usize;
    for r in 0..n {
        let row = &cells[r * n..(r + 1) * n];
        count += row.windows(2).filter(|w| w[0] != w[1]).count();
        if r + 1 < n {
            let below = &cells[(r + 1) * n..(r + 2) * n];
            count += row.iter().zip(below).filter(|(a, b)| a != b).count();
        }
    }
    count
}

/// Number of adjacent pairs in a block: `rows·(cols−1) + cols·(rows−1)`,
/// i.e. `2·n·(n−1)` for an `n × n` block.
pub fn max_transitions(size: usize) -> usize {
    2 * size * size.saturating_sub(1)
}

/// Complexity score in `[0, 1]`. A 1×1 (or empty) block scores 0.
pub fn score(block: &Block) -> f64 {
    let max = max_transitions(block.size());
    if max == 0 {
        return 0.0;
    }
    transitions(block) as f64 / max as f64
}

/// `score(block) >= threshold`.
pub fn is_complex(block: &Block, threshold: f64) -> bool {
    score(block) >= threshold
}

/// Checkerboard value at `(row, col)`.
#[inline]
pub fn checkerboard(row: usize, col: usize) -> u8 {
    ((row + col) & 1) as u8
}

/// XOR `block` with the checkerboard pattern. Self-inverse.
pub fn conjugate(block: &Block) -> Block {
    let mut out = block.clone();
    conjugate_in_place(&mut out);
    out
}

/// In-place form of [`conjugate`].
pub fn conjugate_in_place(block: &mut Block) {
    let n = block.size();
    for (i, cell) in block.cells_mut().iter_mut().enumerate() {
        *cell ^= checkerboard(i / n, i % n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_from(size: usize, f: impl Fn(usize, usize) -> u8) -> Block {
        let cells = (0..size * size).map(|i| f(i / size, i % size)).collect();
        Block::from_cells(size, cells).unwrap()
    }

    #[test]
    fn flat_block_scores_zero() {
        assert_eq!(score(&Block::new(8)), 0.0);
        assert_eq!(score(&block_from(8, |_, _| 1)), 0.0);
        assert!(!is_complex(&Block::new(8), DEFAULT_THRESHOLD));
    }

    #[test]
    fn checkerboard_scores_one() {
        let b = block_from(8, checkerboard);
        assert_eq!(transitions(&b), 112);
        assert_eq!(score(&b), 1.0);
    }

    #[test]
    fn max_matches_square_formula() {
        assert_eq!(max_transitions(8), 2 * 8 * 7);
        assert_eq!(max_transitions(1), 0);
        assert_eq!(max_transitions(0), 0);
    }

    #[test]
    fn single_vertical_edge() {
        // Left half 0, right half 1: one differing pair per row.
        let b = block_from(8, |_, c| (c >= 4) as u8);
        assert_eq!(transitions(&b), 8);
        assert!((score(&b) - 8.0 / 112.0).abs() < 1e-12);
    }

    #[test]
    fn conjugate_is_involution() {
        let b = block_from(8, |r, c| ((r * 7 + c * 3) % 5 == 0) as u8);
        assert_eq!(conjugate(&conjugate(&b)), b);
    }

    #[test]
    fn conjugate_complements_score() {
        for seed in 0..20usize {
            let b = block_from(8, |r, c| ((r * 31 + c * 17 + seed * 13).wrapping_mul(2_654_435_761) >> 7 & 1) as u8);
            let s = score(&b);
            let sc = score(&conjugate(&b));
            assert!((s + sc - 1.0).abs() < 1e-12, "seed {seed}: {s} + {sc} != 1");
        }
    }

    #[test]
    fn conjugation_raises_flat_block() {
        let b = Block::new(8);
        assert!(is_complex(&conjugate(&b), DEFAULT_THRESHOLD));
    }

    #[test]
    fn tiny_block_scores_zero() {
        assert_eq!(score(&block_from(1, |_, _| 1)), 0.0);
    }
}
