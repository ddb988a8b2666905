//! VAT period identity and due-date policy.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use std::fmt;

use dds_shared::types::CompanyId;

use crate::vat::error::VatError;

/// Identity of a VAT period: one company, one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodKey {
    company_id: CompanyId,
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl PeriodKey {
    /// Earliest supported period year.
    pub const MIN_YEAR: i32 = 2000;
    /// Latest supported period year (the period field holds four digits).
    pub const MAX_YEAR: i32 = 9999;

    /// Creates a period key, validating the month and year.
    ///
    /// # Errors
    ///
    /// Returns `VatError::InvalidPeriod` if `month` is outside 1-12 or the
    /// year cannot be written as four digits.
    pub fn new(company_id: CompanyId, year: i32, month: u32) -> Result<Self, VatError> {
        let invalid = || VatError::InvalidPeriod { year, month };

        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(invalid());
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            company_id,
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// Company the period belongs to.
    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Period year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Period month (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the period.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last calendar day of the period.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Returns true if `date` falls within the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.first_day..=self.last_day).contains(&date)
    }

    /// The `YYYYMM` label used in the export files.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:04}-{:02}", self.company_id, self.year, self.month)
    }
}

/// Computes the payment deadline of a period.
///
/// Jurisdictions with holiday calendars plug in their own policy.
pub trait DueDatePolicy: Send + Sync {
    /// Returns the due date of `period`.
    fn due_date(&self, period: &PeriodKey) -> NaiveDate;
}

/// Fixed day of the following month, optionally moved off weekends.
#[derive(Debug, Clone, Copy)]
pub struct StatutoryDueDate {
    day: u32,
    roll_weekends: bool,
}

impl StatutoryDueDate {
    /// Creates the policy. `day` is clamped to 1-28 so it exists in every month.
    #[must_use]
    pub fn new(day: u32, roll_weekends: bool) -> Self {
        Self {
            day: day.clamp(1, 28),
            roll_weekends,
        }
    }
}

impl Default for StatutoryDueDate {
    fn default() -> Self {
        Self::new(14, true)
    }
}

impl DueDatePolicy for StatutoryDueDate {
    fn due_date(&self, period: &PeriodKey) -> NaiveDate {
        let due = period.last_day() + TimeDelta::days(i64::from(self.day));
        if !self.roll_weekends {
            return due;
        }
        match due.weekday() {
            Weekday::Sat => due + TimeDelta::days(2),
            Weekday::Sun => due + TimeDelta::days(1),
            _ => due,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(year: i32, month: u32) -> PeriodKey {
        PeriodKey::new(CompanyId::new(), year, month).unwrap()
    }

    #[rstest]
    #[case(2025, 0)]
    #[case(2025, 13)]
    #[case(1999, 5)]
    #[case(10_000, 1)]
    fn test_invalid_periods_rejected(#[case] year: i32, #[case] month: u32) {
        let err = PeriodKey::new(CompanyId::new(), year, month).unwrap_err();
        assert!(matches!(err, VatError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_month_bounds() {
        let feb = key(2024, 2);
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = key(2025, 12);
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(dec.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!dec.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn test_label() {
        assert_eq!(key(2025, 3).label(), "202503");
        assert_eq!(key(2025, 11).label(), "202511");
    }

    #[rstest]
    // 14 April 2025 is a Monday
    #[case(2025, 3, NaiveDate::from_ymd_opt(2025, 4, 14))]
    // 14 June 2025 is a Saturday
    #[case(2025, 5, NaiveDate::from_ymd_opt(2025, 6, 16))]
    // 14 September 2025 is a Sunday
    #[case(2025, 8, NaiveDate::from_ymd_opt(2025, 9, 15))]
    // December rolls into the next year
    #[case(2025, 12, NaiveDate::from_ymd_opt(2026, 1, 14))]
    fn test_statutory_due_date(
        #[case] year: i32,
        #[case] month: u32,
        #[case] expected: Option<NaiveDate>,
    ) {
        let policy = StatutoryDueDate::default();
        assert_eq!(Some(policy.due_date(&key(year, month))), expected);
    }

    #[test]
    fn test_due_date_without_weekend_roll() {
        let policy = StatutoryDueDate::new(14, false);
        assert_eq!(
            policy.due_date(&key(2025, 5)),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
        );
    }
}
