mod common;

use budgetter::{
    errors::BudgetError,
    ledger::{Schedule, TimeInterval, TimeUnit},
};
use chrono::{Datelike, Days, NaiveDate};
use common::{date, Lcg};

const TOKENS: &[&str] = &[
    "daily",
    "weekly",
    "bi-weekly",
    "monthly",
    "yearly",
    "annually",
    "3 days",
    "1 week",
    "2 weeks",
    "6 months",
    "2 years",
];

#[test]
fn named_tokens_map_to_intervals() {
    let cases = [
        ("daily", 1, TimeUnit::Day),
        ("Weekly", 1, TimeUnit::Week),
        (" bi-weekly ", 2, TimeUnit::Week),
        ("MONTHLY", 1, TimeUnit::Month),
        ("yearly", 1, TimeUnit::Year),
        ("annually", 1, TimeUnit::Year),
        ("10 days", 10, TimeUnit::Day),
        ("1 month", 1, TimeUnit::Month),
    ];
    for (token, every, unit) in cases {
        let interval: TimeInterval = token.parse().unwrap();
        assert_eq!(interval, TimeInterval { every, unit }, "{token}");
    }
}

#[test]
fn unknown_and_zero_tokens_are_invalid_schedules() {
    for token in ["fortnightly", "", "0 days", "two weeks", "3 decades", "-1 weeks"] {
        let err = TimeInterval::parse(token).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidSchedule(_)), "{token}: {err}");
    }
    assert!(Schedule::payment("x", "checking", "sometimes", 1.0, date(2024, 1, 1)).is_err());
}

#[test]
fn occurrences_are_strictly_increasing_and_bounded() {
    let mut rng = Lcg::new(7);
    for token in TOKENS {
        for _ in 0..20 {
            let start = date(2020, 1, 1) + Days::new(rng.between(0, 1500) as u64);
            let end = start + Days::new(rng.between(0, 1200) as u64);
            let schedule = Schedule::payment("rule", "checking", *token, -10.0, start).unwrap();
            let days: Vec<NaiveDate> = schedule.occurrences(end).collect();

            if start < end {
                assert_eq!(days.first(), Some(&start), "{token} from {start}");
            } else {
                assert!(days.is_empty(), "{token} from {start} to {end}");
            }
            assert!(days.iter().all(|day| *day >= start && *day < end));
            for pair in days.windows(2) {
                assert!(pair[0] < pair[1], "{token}: {pair:?}");
                assert_eq!(schedule.repeat().next_date(pair[0]), Some(pair[1]));
            }
            if let Some(last) = days.last() {
                let following = schedule.repeat().next_date(*last).unwrap();
                assert!(following >= end, "{token}: {following} should be past {end}");
            }
        }
    }
}

#[test]
fn monthly_steps_clamp_and_stay_clamped() {
    let schedule = Schedule::payment("Rent", "checking", "monthly", -1.0, date(2023, 1, 31)).unwrap();
    let days: Vec<NaiveDate> = schedule.occurrences(date(2023, 5, 1)).collect();
    assert_eq!(
        days,
        vec![date(2023, 1, 31), date(2023, 2, 28), date(2023, 3, 28), date(2023, 4, 28)]
    );
}

#[test]
fn yearly_step_from_leap_day_lands_on_february_28() {
    let interval = TimeInterval::parse("yearly").unwrap();
    let next = interval.next_date(date(2024, 2, 29)).unwrap();
    assert_eq!((next.year(), next.month(), next.day()), (2025, 2, 28));
}

#[test]
fn labels_describe_the_cadence() {
    assert_eq!(TimeInterval::parse("monthly").unwrap().to_string(), "Monthly");
    assert_eq!(TimeInterval::parse("bi-weekly").unwrap().to_string(), "Every 2 Weeks");
}
