//! Day-by-day valuation of a purchased bond.
//!
//! Within an interest period the bond value grows linearly (actual days
//! elapsed over actual days in the period) from the period base by the period
//! interest. Families that pay interest out keep the nominal as base and emit
//! an interest cash flow at every period end; the rest capitalize the rounded
//! period interest into the next base and pay everything at maturity.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::{BondError, Result};
use crate::models::{Bond, BondSeries, CashFlow, CashFlowKind, DailyValue};

/// Face value of a single retail bond (PLN).
pub const NOMINAL: Decimal = dec!(100);

const PERCENT: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(BondError::DateOutOfRange(date))
}

/// Computes daily values and cash flow of one bond of `series` bought on
/// `purchase_date`.
///
/// Valuation stops at the first period whose rate is not yet published; in
/// that case no maturity cash flow is produced.
pub fn value_bond(series: &BondSeries, purchase_date: NaiveDate) -> Result<Bond> {
    let kind = series.kind;
    let period_months = kind.period_months();
    let periods = kind.periods();
    let maturity_date = add_months(purchase_date, kind.term_months())?;

    let mut base = NOMINAL;
    let mut daily_values = Vec::new();
    let mut cash_flow = Vec::new();
    let mut completed = true;

    for period in 0..periods {
        let Some(rate) = series.rate_for_period(period as usize) else {
            log::debug!(
                "{}: no rate for period {}, valuation ends early",
                series.name,
                period + 1
            );
            completed = false;
            break;
        };

        let start = add_months(purchase_date, period * period_months)?;
        let end = add_months(purchase_date, (period + 1) * period_months)?;
        let period_days = Decimal::from(end.signed_duration_since(start).num_days());
        let interest = (base * rate / PERCENT * Decimal::from(period_months) / MONTHS_PER_YEAR)
            .round_dp(2);

        for day in start.iter_days().take_while(|day| *day < end) {
            let elapsed = Decimal::from(day.signed_duration_since(start).num_days());
            let accrued = (interest * elapsed / period_days).round_dp(2);
            daily_values.push(DailyValue {
                date: day,
                period: period + 1,
                rate,
                value: base + accrued,
                accrued_interest: accrued,
            });
        }

        if kind.pays_interest() {
            cash_flow.push(CashFlow {
                date: end,
                kind: CashFlowKind::Interest,
                amount: interest,
            });
        } else {
            base += interest;
        }
    }

    if completed {
        if !kind.pays_interest() {
            cash_flow.push(CashFlow {
                date: maturity_date,
                kind: CashFlowKind::Interest,
                amount: base - NOMINAL,
            });
        }
        cash_flow.push(CashFlow {
            date: maturity_date,
            kind: CashFlowKind::Redemption,
            amount: NOMINAL,
        });
        daily_values.push(DailyValue {
            date: maturity_date,
            period: periods,
            rate: series
                .rate_for_period(periods as usize - 1)
                .unwrap_or_default(),
            value: base,
            accrued_interest: Decimal::ZERO,
        });
    }

    Ok(Bond {
        name: series.name.clone(),
        kind,
        isin: series.isin.clone(),
        purchase_date,
        maturity_date,
        nominal: NOMINAL,
        daily_values,
        cash_flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ots_single_period() {
        let series = BondSeries::new("OTS0424", vec![dec!(3.00)]).unwrap();
        let bond = value_bond(&series, date(2024, 1, 10)).unwrap();

        assert_eq!(bond.maturity_date, date(2024, 4, 10));
        // 91 days in the period plus the maturity day
        assert_eq!(bond.daily_values.len(), 92);
        assert_eq!(bond.daily_values[0].value, dec!(100));
        assert_eq!(bond.last_value().unwrap().value, dec!(100.75));
        assert_eq!(
            bond.cash_flow,
            vec![
                CashFlow {
                    date: date(2024, 4, 10),
                    kind: CashFlowKind::Interest,
                    amount: dec!(0.75),
                },
                CashFlow {
                    date: date(2024, 4, 10),
                    kind: CashFlowKind::Redemption,
                    amount: dec!(100),
                },
            ]
        );
    }

    #[test]
    fn test_tos_capitalizes_rounded_interest() {
        let series = BondSeries::new("TOS0127", vec![dec!(6.50); 3]).unwrap();
        let bond = value_bond(&series, date(2024, 1, 2)).unwrap();

        // 6.50, then 106.50 * 6.5% = 6.92, then 113.42 * 6.5% = 7.37
        assert_eq!(bond.last_value().unwrap().value, dec!(120.79));
        assert_eq!(bond.interest_to_date(), dec!(20.79));
        assert_eq!(bond.cash_flow.len(), 2);
    }

    #[test]
    fn test_coi_pays_yearly_interest() {
        let series =
            BondSeries::new("COI0128", vec![dec!(7.25), dec!(6.00), dec!(5.00), dec!(4.00)])
                .unwrap();
        let bond = value_bond(&series, date(2024, 1, 5)).unwrap();

        let interest: Vec<_> = bond
            .cash_flow
            .iter()
            .filter(|flow| flow.kind == CashFlowKind::Interest)
            .map(|flow| (flow.date, flow.amount))
            .collect();
        assert_eq!(
            interest,
            vec![
                (date(2025, 1, 5), dec!(7.25)),
                (date(2026, 1, 5), dec!(6.00)),
                (date(2027, 1, 5), dec!(5.00)),
                (date(2028, 1, 5), dec!(4.00)),
            ]
        );
        // Paid-out interest never accumulates into the value
        assert_eq!(bond.last_value().unwrap().value, dec!(100));
        assert_eq!(bond.interest_to_date(), dec!(22.25));
    }

    #[test]
    fn test_partial_coi_counts_paid_and_accrued_interest() {
        let series = BondSeries::new("COI0128", vec![dec!(7.25), dec!(6.00)]).unwrap();
        let bond = value_bond(&series, date(2024, 1, 5)).unwrap();

        assert_eq!(bond.last_value().unwrap().date, date(2026, 1, 4));
        // 7.25 paid, plus 6.00 * 364/365 accrued in the second year
        assert_eq!(bond.interest_to_date(), dec!(13.23));
    }

    #[test]
    fn test_ror_monthly_interest() {
        let series = BondSeries::new("ROR0125", vec![dec!(6.00); 12]).unwrap();
        let bond = value_bond(&series, date(2024, 1, 31)).unwrap();

        assert_eq!(bond.cash_flow[0].amount, dec!(0.50));
        // Month arithmetic clamps to the end of February
        assert_eq!(bond.cash_flow[0].date, date(2024, 2, 29));
        assert_eq!(bond.cash_flow.len(), 13);
    }

    #[test]
    fn test_unpublished_rates_stop_valuation() {
        let series = BondSeries::new("EDO0134", vec![dec!(6.80)]).unwrap();
        let bond = value_bond(&series, date(2024, 1, 15)).unwrap();

        // 2024 is a leap year: 366 days in the first period
        assert_eq!(bond.daily_values.len(), 366);
        assert!(bond.cash_flow.is_empty());
        let last = bond.last_value().unwrap();
        assert_eq!(last.period, 1);
        assert!(last.value < dec!(106.80));
        assert!(last.value > dec!(106.70));
        assert_eq!(bond.interest_to_date(), last.value - dec!(100));
    }
}
