//! Work period totals computation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::WorkPeriodError;
use super::types::{WorkPeriod, WorkPeriodStatus};

/// The derived totals of a work period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTotals {
    /// Inclusive day count from start to effective end.
    pub total_days: i64,
    /// `total_days * daily_rate`.
    pub total_salary: Decimal,
    /// Sum of loan principal charged against the period.
    pub total_loans: Decimal,
    /// `total_salary - total_loans`.
    pub net_payable: Decimal,
}

/// Work period service for business logic.
pub struct WorkPeriodService;

impl WorkPeriodService {
    /// Inclusive day count between two dates.
    ///
    /// Both boundary days count: a period starting and ending on the same
    /// calendar day is 1 day.
    ///
    /// # Errors
    ///
    /// Returns `WorkPeriodError::EndBeforeStart` when `end < start`.
    pub fn day_count(start: NaiveDate, end: NaiveDate) -> Result<i64, WorkPeriodError> {
        if end < start {
            return Err(WorkPeriodError::EndBeforeStart { start, end });
        }
        Ok((end - start).num_days() + 1)
    }

    /// Computes the derived totals for a period.
    ///
    /// `loan_principals` are the principal amounts of every loan referencing
    /// the period, regardless of repayment status: `total_loans` tracks
    /// disbursement, so `net_payable` does not improve as loans are repaid
    /// within the period.
    ///
    /// This computation is a pure function of its inputs and therefore
    /// idempotent: recomputing with unchanged inputs yields unchanged totals.
    ///
    /// # Errors
    ///
    /// Returns `WorkPeriodError::EndBeforeStart` when the effective end
    /// precedes the start.
    pub fn compute_totals(
        start: NaiveDate,
        effective_end: NaiveDate,
        daily_rate: Decimal,
        loan_principals: &[Decimal],
    ) -> Result<PeriodTotals, WorkPeriodError> {
        let total_days = Self::day_count(start, effective_end)?;
        let total_salary = Decimal::from(total_days) * daily_rate;
        let total_loans: Decimal = loan_principals.iter().copied().sum();

        Ok(PeriodTotals {
            total_days,
            total_salary,
            total_loans,
            net_payable: total_salary - total_loans,
        })
    }

    /// Validates the inputs to `start_period`.
    ///
    /// # Errors
    ///
    /// Returns `WorkPeriodError::NonPositiveDailyRate` for `daily_rate <= 0`.
    pub fn validate_start(daily_rate: Decimal) -> Result<(), WorkPeriodError> {
        if daily_rate <= Decimal::ZERO {
            return Err(WorkPeriodError::NonPositiveDailyRate);
        }
        Ok(())
    }

    /// Validates that a period can still be closed.
    ///
    /// # Errors
    ///
    /// Returns `WorkPeriodError::AlreadyCompleted` for a completed period.
    pub fn validate_end(period: &WorkPeriod) -> Result<(), WorkPeriodError> {
        if period.status == WorkPeriodStatus::Completed {
            return Err(WorkPeriodError::AlreadyCompleted(period.id));
        }
        Ok(())
    }

    /// Writes a set of totals onto a period.
    pub fn apply_totals(period: &mut WorkPeriod, totals: PeriodTotals) {
        period.total_days = totals.total_days;
        period.total_salary = totals.total_salary;
        period.total_loans = totals.total_loans;
        period.net_payable = totals.net_payable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 3, 1), date(2024, 3, 1), 1)]
    #[case(date(2024, 3, 1), date(2024, 3, 10), 10)]
    #[case(date(2024, 2, 27), date(2024, 3, 2), 5)] // leap year boundary
    #[case(date(2024, 12, 30), date(2025, 1, 2), 4)]
    fn test_day_count_inclusive(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] expected: i64,
    ) {
        assert_eq!(WorkPeriodService::day_count(start, end).unwrap(), expected);
    }

    #[test]
    fn test_day_count_rejects_reversed_range() {
        assert!(matches!(
            WorkPeriodService::day_count(date(2024, 3, 10), date(2024, 3, 1)),
            Err(WorkPeriodError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_totals_scenario_rate_20_loan_100_over_10_days() {
        let totals = WorkPeriodService::compute_totals(
            date(2024, 3, 1),
            date(2024, 3, 10),
            dec!(20),
            &[dec!(100)],
        )
        .unwrap();

        assert_eq!(totals.total_days, 10);
        assert_eq!(totals.total_salary, dec!(200));
        assert_eq!(totals.total_loans, dec!(100));
        assert_eq!(totals.net_payable, dec!(100));
    }

    #[test]
    fn test_totals_track_principal_not_remaining_balance() {
        // A period with one fully repaid loan still carries the principal in
        // total_loans; net payable reflects disbursement, not outstanding debt.
        let totals = WorkPeriodService::compute_totals(
            date(2024, 3, 1),
            date(2024, 3, 5),
            dec!(30),
            &[dec!(80)],
        )
        .unwrap();

        assert_eq!(totals.total_loans, dec!(80));
        assert_eq!(totals.net_payable, dec!(150) - dec!(80));
    }

    #[test]
    fn test_totals_idempotent() {
        let compute = || {
            WorkPeriodService::compute_totals(
                date(2024, 3, 1),
                date(2024, 3, 20),
                dec!(25.50),
                &[dec!(40), dec!(60.25)],
            )
            .unwrap()
        };
        assert_eq!(compute(), compute());
    }

    #[test]
    fn test_net_payable_can_go_negative() {
        // Loans exceeding salary leave a negative net payable; the period
        // does not reject the correction, it just reports the deficit.
        let totals = WorkPeriodService::compute_totals(
            date(2024, 3, 1),
            date(2024, 3, 2),
            dec!(10),
            &[dec!(100)],
        )
        .unwrap();
        assert_eq!(totals.net_payable, dec!(-80));
    }

    #[test]
    fn test_validate_start() {
        assert!(WorkPeriodService::validate_start(dec!(20)).is_ok());
        assert!(matches!(
            WorkPeriodService::validate_start(dec!(0)),
            Err(WorkPeriodError::NonPositiveDailyRate)
        ));
    }
}
