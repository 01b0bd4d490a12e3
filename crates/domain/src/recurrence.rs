use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

/// Returns the smallest occurrence of `expr` strictly after `reference`,
/// or `None` when the expression does not parse.
///
/// Expressions are standard 5-field cron (minute, hour, day of month,
/// month, day of week) interpreted in UTC. The underlying parser expects
/// a seconds field, so a `0` seconds field is prepended.
pub fn next_occurrence(expr: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let schedule = parse(expr)?;
    schedule.after(&reference).next()
}

/// Whether `expr` is a parsable cron expression.
pub fn is_valid_cron(expr: &str) -> bool {
    parse(expr).is_some()
}

fn parse(expr: &str) -> Option<Schedule> {
    let expr = expr.trim();
    let with_seconds = if expr.split_whitespace().count() == 5 {
        format!("0 {}", expr)
    } else {
        expr.to_string()
    };
    Schedule::from_str(&with_seconds).ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn computes_next_occurrence_of_five_field_expressions() {
        let reference = Utc.with_ymd_and_hms(2025, 6, 1, 10, 4, 59).unwrap();
        assert_eq!(
            next_occurrence("*/5 * * * *", reference),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 5, 0).unwrap())
        );

        let reference = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(
            next_occurrence("0 9 * * *", reference),
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn occurrence_is_strictly_after_the_reference() {
        let reference = Utc.with_ymd_and_hms(2025, 6, 1, 10, 5, 0).unwrap();
        assert_eq!(
            next_occurrence("*/5 * * * *", reference),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 10, 0).unwrap())
        );
    }

    #[test]
    fn rejects_malformed_expressions() {
        let reference = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(next_occurrence("every day at nine", reference).is_none());
        assert!(next_occurrence("61 * * * *", reference).is_none());
        assert!(next_occurrence("", reference).is_none());
        assert!(!is_valid_cron("* * *"));
        assert!(is_valid_cron("0 9 * * 1-5"));
    }
}
