use crate::core::Clock;
use crate::utils::error::{Result, SiteError};
use chrono::{Datelike, NaiveDate};

/// 計算從 `from_date` 到 `today` 已滿的年數
///
/// Only the month/day ordinals are compared, so a Feb 29 birthday completes
/// its year on Mar 1 in non-leap years. A `from_date` after `today` gives a
/// non-positive result from the same formula.
pub fn age_in_years(from_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - from_date.year();

    if today.month() < from_date.month() {
        age -= 1;
    } else if today.month() == from_date.month() && today.day() < from_date.day() {
        age -= 1;
    }

    age
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| SiteError::invalid_date(input, e.to_string()))
}

pub fn date_from_parts(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SiteError::invalid_date(
            format!("{:04}-{:02}-{:02}", year, month, day),
            "no such calendar date",
        )
    })
}

pub struct AgeCalculator<C: Clock> {
    clock: C,
}

impl<C: Clock> AgeCalculator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn age_in_years(&self, from_date: NaiveDate) -> i32 {
        let today = self.clock.today();
        let age = age_in_years(from_date, today);
        tracing::debug!("Age from {} to {}: {}", from_date, today, age);
        age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_zero() {
        let today = date(2026, 10, 14);
        assert_eq!(age_in_years(today, today), 0);
    }

    #[test]
    fn test_exactly_one_year() {
        assert_eq!(age_in_years(date(2025, 10, 14), date(2026, 10, 14)), 1);
    }

    #[test]
    fn test_birthday_later_this_month() {
        // 同月份但生日還沒到
        assert_eq!(age_in_years(date(1990, 10, 20), date(2026, 10, 14)), 35);
    }

    #[test]
    fn test_birthday_month_not_reached() {
        assert_eq!(age_in_years(date(1990, 12, 1), date(2026, 10, 14)), 35);
    }

    #[test]
    fn test_birthday_already_passed() {
        assert_eq!(age_in_years(date(1990, 3, 1), date(2026, 10, 14)), 36);
        assert_eq!(age_in_years(date(1990, 10, 1), date(2026, 10, 14)), 36);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(age_in_years(date(2000, 2, 29), date(2025, 2, 28)), 24);
        assert_eq!(age_in_years(date(2000, 2, 29), date(2025, 3, 1)), 25);
        assert_eq!(age_in_years(date(2000, 2, 29), date(2028, 2, 29)), 28);
    }

    #[test]
    fn test_future_date_is_not_positive() {
        assert_eq!(age_in_years(date(2027, 10, 14), date(2026, 10, 14)), -1);
        assert_eq!(age_in_years(date(2026, 12, 1), date(2026, 10, 14)), -1);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1987-06-15").unwrap(), date(1987, 6, 15));
        assert_eq!(parse_date(" 1987-06-15\n").unwrap(), date(1987, 6, 15));
        assert!(matches!(
            parse_date("2023-02-29"),
            Err(SiteError::InvalidDate { .. })
        ));
        assert!(parse_date("June 15th").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_date_from_parts() {
        assert_eq!(date_from_parts(2024, 2, 29).unwrap(), date(2024, 2, 29));
        match date_from_parts(2024, 13, 1) {
            Err(SiteError::InvalidDate { input, .. }) => assert_eq!(input, "2024-13-01"),
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_calculator_uses_injected_clock() {
        let calculator = AgeCalculator::new(FixedClock(date(2026, 10, 14)));
        assert_eq!(calculator.today(), date(2026, 10, 14));
        assert_eq!(calculator.age_in_years(date(2026, 10, 14)), 0);
        assert_eq!(calculator.age_in_years(date(2025, 10, 14)), 1);
        assert_eq!(calculator.age_in_years(date(2000, 10, 15)), 25);
    }
}
