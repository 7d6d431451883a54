/// Inclusive bounds of a user rating.
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Mean rating of a content item together with the number of ratings it was
/// computed from. `average` is `None` when nobody rated the item yet, which is
/// not the same thing as an average of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: u64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[f64]) -> Self {
        RatingSummary {
            average: aggregate_mean(ratings),
            count: ratings.len() as u64,
        }
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn aggregate_mean(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: f64 = ratings.iter().sum();
    Some(sum / ratings.len() as f64)
}

/// Rejects NaN and anything outside `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rating: f64) -> Result<f64, f64> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_no_ratings_is_absent() {
        assert_eq!(aggregate_mean(&[]), None);
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.average, None);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn mean_is_the_arithmetic_mean() {
        assert_eq!(aggregate_mean(&[3.0, 4.0, 5.0]), Some(4.0));
        assert_eq!(aggregate_mean(&[0.0]), Some(0.0));
        assert_eq!(aggregate_mean(&[4.5, 3.5]), Some(4.0));
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert_eq!(validate_rating(0.0), Ok(0.0));
        assert_eq!(validate_rating(5.0), Ok(5.0));
        assert!(validate_rating(5.5).is_err());
        assert!(validate_rating(-1.0).is_err());
        assert!(validate_rating(f64::NAN).is_err());
        assert!(validate_rating(f64::INFINITY).is_err());
    }
}
