use crate::types::Frequency;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Half-open date range `[start, end_exclusive)` covering one recurrence period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end_exclusive: NaiveDate,
}

impl PeriodWindow {
    /// Resolve the period `today` falls in. Weeks start on Monday.
    pub fn resolve(frequency: Frequency, today: NaiveDate) -> Self {
        match frequency {
            Frequency::Daily => Self {
                start: today,
                end_exclusive: today + Days::new(1),
            },
            Frequency::Weekly => {
                let dow = u64::from(today.weekday().num_days_from_sunday());
                let start = today - Days::new((dow + 6) % 7);
                Self {
                    start,
                    end_exclusive: start + Days::new(7),
                }
            }
        }
    }

    /// Inclusive last day, for display.
    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive - Days::new(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end_exclusive
    }

    /// Smallest window covering every window in `windows`, or `None` when empty.
    pub fn union<I>(windows: I) -> Option<Self>
    where
        I: IntoIterator<Item = PeriodWindow>,
    {
        windows.into_iter().reduce(|acc, w| Self {
            start: acc.start.min(w.start),
            end_exclusive: acc.end_exclusive.max(w.end_exclusive),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_window_is_one_day() {
        let w = PeriodWindow::resolve(Frequency::Daily, d(2024, 3, 14));
        assert_eq!(w.start, d(2024, 3, 14));
        assert_eq!(w.end_exclusive, d(2024, 3, 15));
        assert_eq!(w.last_day(), d(2024, 3, 14));
    }

    #[test]
    fn weekly_window_starts_on_monday() {
        let w = PeriodWindow::resolve(Frequency::Weekly, d(2024, 3, 14));
        assert_eq!(w.start, d(2024, 3, 11));
        assert_eq!(w.end_exclusive, d(2024, 3, 18));
        assert_eq!(w.last_day(), d(2024, 3, 17));
    }

    #[test]
    fn monday_opens_its_own_week() {
        let w = PeriodWindow::resolve(Frequency::Weekly, d(2024, 3, 11));
        assert_eq!(w.start, d(2024, 3, 11));
        assert_eq!(w.end_exclusive, d(2024, 3, 18));
    }

    #[test]
    fn sunday_closes_the_week() {
        let w = PeriodWindow::resolve(Frequency::Weekly, d(2024, 3, 17));
        assert_eq!(w.start, d(2024, 3, 11));
        assert!(w.contains(d(2024, 3, 17)));
        assert!(!w.contains(d(2024, 3, 18)));
    }

    #[test]
    fn weekly_window_crosses_month_boundary() {
        let w = PeriodWindow::resolve(Frequency::Weekly, d(2024, 3, 1));
        assert_eq!(w.start, d(2024, 2, 26));
        assert_eq!(w.end_exclusive, d(2024, 3, 4));
    }

    #[test]
    fn union_spans_all_windows() {
        let today = d(2024, 3, 14);
        let u = PeriodWindow::union([
            PeriodWindow::resolve(Frequency::Daily, today),
            PeriodWindow::resolve(Frequency::Weekly, today),
        ])
        .unwrap();
        assert_eq!(u.start, d(2024, 3, 11));
        assert_eq!(u.end_exclusive, d(2024, 3, 18));
    }

    #[test]
    fn union_of_nothing_is_none() {
        assert!(PeriodWindow::union(std::iter::empty()).is_none());
    }
}
