//! Statistics calculation engine.
//!
//! Computes derived metrics from recorded drafts:
//! - Hero pick/ban/win rates and role breakdown
//! - Duo synergy and stored combo results
//! - Observed lane matchups
//! - Team hero pools
//! - Win condition evaluation

mod dataset;
mod heroes;
mod matchups;
mod synergy;
mod team_pool;
mod win_condition;

pub use dataset::*;
pub use heroes::*;
pub use matchups::*;
pub use synergy::*;
pub use team_pool::*;
pub use win_condition::*;

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / total * 100`, rounded to one decimal; 0 when `total` is 0.
pub fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(part as f64 / total as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 5), 100.0);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(-4.26), -4.3);
    }
}
