//! Rate computation.
//!
//! Pure functions deriving observed success rates from recorded counts,
//! for comparison against the catalog's listed rates.

use crate::models::StageCount;

/// Observed success rate for a stage: `success / (success + fail)`.
///
/// Defined as `0.0` when no attempts are recorded; a display policy, not
/// an error.
pub fn observed_rate(count: StageCount) -> f64 {
    let total = count.total();
    if total == 0 {
        0.0
    } else {
        count.success as f64 / total as f64
    }
}

/// Observed success rate as a percentage in [0, 100].
pub fn observed_percent(count: StageCount) -> f64 {
    observed_rate(count) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_rate_zero_attempts() {
        assert_eq!(observed_rate(StageCount::default()), 0.0);
    }

    #[test]
    fn test_observed_rate() {
        assert_eq!(observed_rate(StageCount::new(3, 1)), 0.75);
        assert_eq!(observed_rate(StageCount::new(5, 5)), 0.5);
        assert_eq!(observed_rate(StageCount::new(0, 20)), 0.0);
        assert_eq!(observed_rate(StageCount::new(7, 0)), 1.0);
    }

    #[test]
    fn test_observed_percent() {
        assert_eq!(observed_percent(StageCount::new(90, 10)), 90.0);
        assert_eq!(observed_percent(StageCount::default()), 0.0);
    }
}
