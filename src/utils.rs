//! Utility functions for the squad draw service

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

/// Arithmetic mean of the given ratings, 0 when there are none
pub fn average_rating(ratings: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_difference() {
        assert_eq!(rating_difference(70.0, 60.0), 10.0);
        assert_eq!(rating_difference(60.0, 70.0), 10.0);
        assert_eq!(rating_difference(55.5, 55.5), 0.0);
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating([90.0, 70.0, 50.0]), 70.0);
        assert_eq!(average_rating([40.0]), 40.0);
        assert_eq!(average_rating(std::iter::empty()), 0.0);
    }
}
