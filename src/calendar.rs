use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday through Friday dates in the inclusive range `[start, end]`.
/// Holidays are not excluded. Zero when `end` precedes `start`.
pub fn business_days_since(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    let count = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_business_day(*day))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Quotas accrue through yesterday; the current day never counts.
pub fn accrual_end(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

pub fn elapsed_business_days(start: NaiveDate, today: NaiveDate) -> u32 {
    business_days_since(start, accrual_end(today))
}

pub fn reference_today(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_before_start_is_zero() {
        let start = date(2025, 9, 16);
        assert_eq!(business_days_since(start, date(2025, 9, 15)), 0);
        assert_eq!(business_days_since(start, date(2024, 1, 1)), 0);
    }

    #[test]
    fn single_day_counts_only_on_weekdays() {
        let tuesday = date(2025, 9, 16);
        let saturday = date(2025, 9, 20);
        assert_eq!(business_days_since(tuesday, tuesday), 1);
        assert_eq!(business_days_since(saturday, saturday), 0);
    }

    #[test]
    fn weekends_are_skipped_across_weeks() {
        let start = date(2025, 9, 16);
        assert_eq!(business_days_since(start, date(2025, 9, 20)), 4);
        assert_eq!(business_days_since(start, date(2025, 9, 22)), 5);
        assert_eq!(business_days_since(start, date(2025, 9, 29)), 10);
        assert_eq!(business_days_since(start, date(2025, 10, 13)), 20);
    }

    #[test]
    fn weekend_start_is_not_validated() {
        let sunday = date(2025, 9, 14);
        assert_eq!(business_days_since(sunday, date(2025, 9, 16)), 2);
    }

    #[test]
    fn accrual_stops_at_yesterday() {
        let start = date(2025, 9, 16);
        assert_eq!(accrual_end(date(2025, 9, 30)), date(2025, 9, 29));
        assert_eq!(elapsed_business_days(start, date(2025, 9, 30)), 10);
        assert_eq!(elapsed_business_days(start, start), 0);
    }
}
