//! Scoring module - line clear, drop and gravity rules
//!
//! - Line clears: `LINE_SCORES[lines] * level`, level starting at 1.
//! - Drops: 1 point per soft-dropped row, 2 per hard-dropped row.
//! - Level: `1 + lines / LINES_PER_LEVEL`.

use crate::types::{
    DROP_INTERVALS, DROP_INTERVAL_MIN_MS, DROP_INTERVAL_STEP_MS, HARD_DROP_POINTS,
    LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS,
};

/// Points for clearing `lines` rows in one lock at `level`
///
/// Anything outside 1..=4 scores nothing.
pub fn calculate_line_score(lines: u32, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines as usize].saturating_mul(level)
}

/// Points for a drop of `cells` rows
pub fn calculate_drop_score(cells: u32, hard_drop: bool) -> u32 {
    if hard_drop {
        cells * HARD_DROP_POINTS
    } else {
        cells * SOFT_DROP_POINTS
    }
}

/// Level reached after clearing `total_lines`
pub fn level_for_lines(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Gravity interval in milliseconds per row at `level`
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let index = level.saturating_sub(1) as usize;
    if let Some(&interval) = DROP_INTERVALS.get(index) {
        return interval;
    }

    let last = DROP_INTERVALS[DROP_INTERVALS.len() - 1];
    let extra_levels = (index - (DROP_INTERVALS.len() - 1)) as u32;
    last.saturating_sub(extra_levels.saturating_mul(DROP_INTERVAL_STEP_MS))
        .max(DROP_INTERVAL_MIN_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_scale_with_level() {
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 3), 900);
        assert_eq!(calculate_line_score(3, 2), 1000);
        assert_eq!(calculate_line_score(4, 5), 4000);
    }

    #[test]
    fn test_out_of_range_line_counts() {
        assert_eq!(calculate_line_score(0, 7), 0);
        assert_eq!(calculate_line_score(5, 7), 0);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(20, true), 40);
        assert_eq!(calculate_drop_score(3, false), 3);
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(35), 4);
    }

    #[test]
    fn test_drop_interval_curve() {
        assert_eq!(get_drop_interval_ms(0), 1000);
        assert_eq!(get_drop_interval_ms(1), 1000);
        assert_eq!(get_drop_interval_ms(2), 800);
        assert_eq!(get_drop_interval_ms(9), 160);
        assert_eq!(get_drop_interval_ms(10), 150);
        assert_eq!(get_drop_interval_ms(15), 100);
        assert_eq!(get_drop_interval_ms(99), 100);
    }
}
