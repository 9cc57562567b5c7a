//! Quadratic judge scoring

use thiserror::Error;

/// Errors from scoring
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("cannot score an empty set of judgements")]
    Empty,
}

/// Reward (or penalty) of a single confidence value.
///
/// `c - 50` is squared and scaled to 0..=100; the sign is positive only when
/// the judge leaned towards the correct answer (`c > 50`).
pub fn quadratic_term(confidence_correct: f64) -> f64 {
    let centered = confidence_correct - 50.0;
    let magnitude = centered * centered / 25.0;
    if confidence_correct > 50.0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Sum of [`quadratic_term`] over a judge's confidences.
///
/// A fully confident correct call is worth +100, a fully confident wrong one
/// -100, and 50 is worth nothing.
///
/// ```
/// use rostrum_core::scoring::quadratic_score;
///
/// assert_eq!(quadratic_score(&[100.0]), Ok(100.0));
/// assert_eq!(quadratic_score(&[0.0]), Ok(-100.0));
/// assert!(quadratic_score(&[]).is_err());
/// ```
pub fn quadratic_score(confidences: &[f64]) -> Result<f64, ScoreError> {
    if confidences.is_empty() {
        return Err(ScoreError::Empty);
    }
    Ok(confidences.iter().copied().map(quadratic_term).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes() {
        assert_eq!(quadratic_score(&[100.0]), Ok(100.0));
        assert_eq!(quadratic_score(&[0.0]), Ok(-100.0));
        assert_eq!(quadratic_score(&[50.0]), Ok(0.0));
    }

    #[test]
    fn test_empty_fails() {
        assert_eq!(quadratic_score(&[]), Err(ScoreError::Empty));
    }

    #[test]
    fn test_sum_of_terms() {
        // 75 -> +25, 25 -> -25, 90 -> +64
        assert_eq!(quadratic_score(&[75.0, 25.0, 90.0]), Ok(64.0));
    }

    #[test]
    fn test_fence_sitting_is_not_rewarded() {
        assert!(quadratic_term(50.0).abs() < f64::EPSILON);
        assert!(quadratic_term(45.0) < 0.0);
        assert!(quadratic_term(55.0) > 0.0);
    }
}
