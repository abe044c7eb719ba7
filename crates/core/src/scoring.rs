//! Scoring module - line clear, spin, combo and back-to-back rules
//!
//! - Spins use their own table instead of the plain line-clear score.
//! - The back-to-back streak counts "difficult" clears (a Tetris or any spin
//!   clear); once it reaches two the base points are multiplied by 3/2.
//! - Combo bonus is `combo * 50`, added on every clear, never multiplied.
//! - An all clear adds a flat bonus, multiplied like the base points.

use crate::types::{
    SpinType, ALL_CLEAR_SCORE, B2B_DENOMINATOR, B2B_NUMERATOR, B2B_THRESHOLD, COMBO_BASE,
    HARD_DROP_SCORE_PER_CELL, LINE_SCORES, MINI_SPIN_SCORES, PROPER_SPIN_SCORES,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Base points for the clear (b2b multiplier included, combo excluded)
    pub line_clear_score: u32,
    pub combo_bonus: u32,
    pub all_clear_bonus: u32,
    pub total: u32,
    pub b2b_applied: bool,
}

/// Plain line clear points
pub fn line_score(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Base points for a lock with the given spin and line count
///
/// Mini spins past their table (a mini triple) score as plain clears.
pub fn base_score(spin: SpinType, lines: usize) -> u32 {
    match spin {
        SpinType::None => line_score(lines),
        SpinType::Mini => MINI_SPIN_SCORES
            .get(lines)
            .copied()
            .unwrap_or_else(|| line_score(lines)),
        SpinType::Proper => PROPER_SPIN_SCORES
            .get(lines)
            .copied()
            .unwrap_or_else(|| line_score(lines)),
    }
}

/// Whether a clear extends the back-to-back streak
pub fn is_difficult(spin: SpinType, lines: usize) -> bool {
    lines > 0 && (lines >= 4 || spin != SpinType::None)
}

pub fn combo_bonus(combo: u32) -> u32 {
    COMBO_BASE.saturating_mul(combo)
}

/// Apply the back-to-back multiplier (3/2) when the streak is long enough
pub fn apply_b2b(points: u32, b2b: u32) -> u32 {
    if b2b >= B2B_THRESHOLD {
        points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
    } else {
        points
    }
}

/// Score a clear of one or more lines
///
/// `combo` and `b2b` are the counters *after* this clear has updated them.
pub fn clear_score(
    spin: SpinType,
    lines: usize,
    combo: u32,
    b2b: u32,
    all_clear: bool,
) -> ScoreResult {
    let line_clear_score = apply_b2b(base_score(spin, lines), b2b);
    let combo_points = combo_bonus(combo);
    let all_clear_bonus = if all_clear {
        apply_b2b(ALL_CLEAR_SCORE, b2b)
    } else {
        0
    };

    ScoreResult {
        line_clear_score,
        combo_bonus: combo_points,
        all_clear_bonus,
        total: line_clear_score
            .saturating_add(combo_points)
            .saturating_add(all_clear_bonus),
        b2b_applied: b2b >= B2B_THRESHOLD,
    }
}

/// Points for a hard drop over `cells` rows
pub fn hard_drop_score(cells: u32) -> u32 {
    cells.saturating_mul(HARD_DROP_SCORE_PER_CELL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_scores() {
        assert_eq!(line_score(0), 0);
        assert_eq!(line_score(1), 100);
        assert_eq!(line_score(2), 300);
        assert_eq!(line_score(3), 500);
        assert_eq!(line_score(4), 800);
        assert_eq!(line_score(5), 0);
    }

    #[test]
    fn test_spin_scores() {
        assert_eq!(base_score(SpinType::Proper, 0), 400);
        assert_eq!(base_score(SpinType::Proper, 1), 800);
        assert_eq!(base_score(SpinType::Proper, 2), 1200);
        assert_eq!(base_score(SpinType::Proper, 3), 1600);
        assert_eq!(base_score(SpinType::Mini, 0), 100);
        assert_eq!(base_score(SpinType::Mini, 1), 200);
        assert_eq!(base_score(SpinType::Mini, 2), 400);
        assert_eq!(base_score(SpinType::Mini, 3), 500);
    }

    #[test]
    fn test_difficult_clears() {
        assert!(is_difficult(SpinType::None, 4));
        assert!(is_difficult(SpinType::Mini, 1));
        assert!(is_difficult(SpinType::Proper, 2));
        assert!(!is_difficult(SpinType::None, 3));
        assert!(!is_difficult(SpinType::Proper, 0));
    }

    #[test]
    fn test_b2b_multiplier_threshold() {
        assert_eq!(apply_b2b(800, 0), 800);
        assert_eq!(apply_b2b(800, 1), 800);
        assert_eq!(apply_b2b(800, 2), 1200);
        assert_eq!(apply_b2b(800, 4), 1200);
    }

    #[test]
    fn test_clear_score_components() {
        let single = clear_score(SpinType::None, 1, 1, 0, false);
        assert_eq!(single.line_clear_score, 100);
        assert_eq!(single.combo_bonus, 50);
        assert_eq!(single.total, 150);
        assert!(!single.b2b_applied);

        let fourth_tetris = clear_score(SpinType::None, 4, 4, 4, false);
        assert_eq!(fourth_tetris.line_clear_score, 1200);
        assert_eq!(fourth_tetris.total, 1400);
        assert!(fourth_tetris.b2b_applied);

        let all_clear = clear_score(SpinType::None, 2, 1, 0, true);
        assert_eq!(all_clear.all_clear_bonus, 3500);
        assert_eq!(all_clear.total, 300 + 50 + 3500);
    }

    #[test]
    fn test_hard_drop_score() {
        assert_eq!(hard_drop_score(0), 0);
        assert_eq!(hard_drop_score(20), 40);
    }
}
