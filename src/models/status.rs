use chrono::NaiveDate;
use serde::Serialize;

pub const FORMER_AFTER_DAYS: i64 = 60;
pub const NEW_WINDOW_DAYS: i64 = 90;
pub const NEW_MAX_EVENTS: i64 = 5;

/// Engagement status derived from attendance at read time. Never
/// persisted; recomputed per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "No attendance")]
    NoAttendance,
    New,
    Current,
    Former,
}

/// Classifies an activist from their attendance summary.
///
/// Rule order matters: an activist who has been inactive for more than
/// 60 days is Former even if they would also qualify as New.
pub fn classify(
    first_event: Option<NaiveDate>,
    last_event: Option<NaiveDate>,
    total_events: i64,
    today: NaiveDate,
) -> Status {
    let (first, last) = match (first_event, last_event) {
        (Some(first), Some(last)) => (first, last),
        _ => return Status::NoAttendance,
    };

    if (today - last).num_days() > FORMER_AFTER_DAYS {
        return Status::Former;
    }
    if (today - first).num_days() < NEW_WINDOW_DAYS && total_events < NEW_MAX_EVENTS {
        return Status::New;
    }
    Status::Current
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::NoAttendance => "No attendance",
            Status::New => "New",
            Status::Current => "Current",
            Status::Former => "Former",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2024, 6, 15)
    }

    #[test]
    fn missing_dates_mean_no_attendance() {
        let today = today();
        assert_eq!(classify(None, None, 0, today), Status::NoAttendance);
        assert_eq!(
            classify(Some(day(2024, 1, 1)), None, 3, today),
            Status::NoAttendance
        );
        assert_eq!(
            classify(None, Some(day(2024, 6, 1)), 3, today),
            Status::NoAttendance
        );
    }

    #[test]
    fn former_wins_over_new() {
        // First event 40 days ago (inside the New window, under 5 events),
        // but last event 65 days ago. Former takes precedence.
        let today = today();
        let first = today - chrono::Duration::days(40);
        let last = today - chrono::Duration::days(65);
        assert_eq!(classify(Some(first), Some(last), 2, today), Status::Former);
    }

    #[test]
    fn inactive_61_days_is_former() {
        let today = today();
        let last = today - chrono::Duration::days(61);
        assert_eq!(
            classify(Some(last), Some(last), 1, today),
            Status::Former
        );
    }

    #[test]
    fn recent_first_event_and_few_events_is_new() {
        let today = today();
        let first = today - chrono::Duration::days(30);
        let last = today - chrono::Duration::days(5);
        assert_eq!(classify(Some(first), Some(last), 4, today), Status::New);
    }

    #[test]
    fn recent_but_many_events_is_current() {
        let today = today();
        let first = today - chrono::Duration::days(30);
        let last = today - chrono::Duration::days(5);
        assert_eq!(classify(Some(first), Some(last), 5, today), Status::Current);
    }

    #[test]
    fn long_standing_attendee_is_current() {
        let today = today();
        let first = today - chrono::Duration::days(400);
        let last = today - chrono::Duration::days(10);
        assert_eq!(classify(Some(first), Some(last), 2, today), Status::Current);
    }

    #[test]
    fn boundary_exactly_60_days_is_not_former() {
        let today = today();
        let first = today - chrono::Duration::days(400);
        let last = today - chrono::Duration::days(60);
        assert_eq!(classify(Some(first), Some(last), 9, today), Status::Current);
    }

    #[test]
    fn total_over_all_combinations() {
        // classify is defined for every input shape, including degenerate
        // ones like last-before-first or negative totals.
        let today = today();
        let dates = [
            None,
            Some(today),
            Some(today - chrono::Duration::days(61)),
            Some(today - chrono::Duration::days(91)),
            Some(today + chrono::Duration::days(10)),
        ];
        for first in dates {
            for last in dates {
                for total in [-1, 0, 4, 5, 100] {
                    let status = classify(first, last, total, today);
                    assert!(matches!(
                        status,
                        Status::NoAttendance | Status::New | Status::Current | Status::Former
                    ));
                }
            }
        }
    }
}
