use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kind::BondKind;
use crate::errors::{BondError, Result};

/// One issued bond series, e.g. `EDO0134` (EDO maturing in January 2034).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondSeries {
    pub name: String,
    pub kind: BondKind,
    pub maturity_year: i32,
    pub maturity_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_end: Option<NaiveDate>,
    /// Annual interest rate in percent for each published period, in order.
    pub rates: Vec<Decimal>,
}

impl BondSeries {
    /// Creates a series from its name and published period rates.
    pub fn new(name: &str, rates: Vec<Decimal>) -> Result<Self> {
        let name = name.trim().to_ascii_uppercase();
        let (kind, maturity_year, maturity_month) = Self::parse_name(&name)?;
        Ok(Self {
            name,
            kind,
            maturity_year,
            maturity_month,
            isin: None,
            sale_start: None,
            sale_end: None,
            rates,
        })
    }

    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    pub fn with_sale_window(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.sale_start = start;
        self.sale_end = end;
        self
    }

    /// Splits a series name into its family and maturity month.
    ///
    /// `KKKMMYY`: three-letter family code, two-digit month, two-digit year
    /// (20YY).
    pub fn parse_name(name: &str) -> Result<(BondKind, i32, u32)> {
        let invalid = || BondError::InvalidSeriesName(name.to_string());

        if name.len() != 7 || !name.is_ascii() {
            return Err(invalid());
        }
        let (code, digits) = name.split_at(3);
        let kind = BondKind::from_code(code).ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = digits[..2].parse().map_err(|_| invalid())?;
        let year: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok((kind, 2000 + year, month))
    }

    /// Rate for a zero-based interest period, if already published.
    pub fn rate_for_period(&self, period: usize) -> Option<Decimal> {
        self.rates.get(period).copied()
    }

    /// Checks that a bond of this series could have been bought on `purchase_date`.
    pub fn check_purchase_date(&self, purchase_date: NaiveDate) -> Result<()> {
        let outside_window = self.sale_start.is_some_and(|start| purchase_date < start)
            || self.sale_end.is_some_and(|end| purchase_date > end);
        if outside_window {
            return Err(BondError::OutsideSaleWindow {
                series: self.name.clone(),
                purchase_date,
            });
        }

        let term_months = self.kind.term_months();
        let maturity = purchase_date
            .checked_add_months(Months::new(term_months))
            .ok_or(BondError::DateOutOfRange(purchase_date))?;
        if maturity.year() != self.maturity_year || maturity.month() != self.maturity_month {
            return Err(BondError::MaturityMismatch {
                series: self.name.clone(),
                purchase_date,
                term_months,
            });
        }

        if self.rates.is_empty() {
            return Err(BondError::MissingRate {
                series: self.name.clone(),
                period: 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_name() {
        let (kind, year, month) = BondSeries::parse_name("EDO0134").unwrap();
        assert_eq!(kind, BondKind::Edo);
        assert_eq!(year, 2034);
        assert_eq!(month, 1);
    }

    #[test]
    fn test_parse_name_rejects_garbage() {
        for name in ["EDO134", "XYZ0134", "EDO1334", "EDOAB34", "EDO01345"] {
            assert!(
                matches!(
                    BondSeries::parse_name(name),
                    Err(BondError::InvalidSeriesName(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_normalizes_name() {
        let series = BondSeries::new(" coi0128 ", vec![dec!(6.55)]).unwrap();
        assert_eq!(series.name, "COI0128");
        assert_eq!(series.kind, BondKind::Coi);
    }

    #[test]
    fn test_purchase_must_mature_in_series_month() {
        let series = BondSeries::new("EDO0134", vec![dec!(6.80)]).unwrap();
        assert!(series.check_purchase_date(date(2024, 1, 15)).is_ok());
        assert!(matches!(
            series.check_purchase_date(date(2024, 2, 1)),
            Err(BondError::MaturityMismatch { .. })
        ));
    }

    #[test]
    fn test_purchase_outside_sale_window() {
        let series = BondSeries::new("EDO0134", vec![dec!(6.80)])
            .unwrap()
            .with_sale_window(Some(date(2024, 1, 1)), Some(date(2024, 1, 20)));
        assert!(matches!(
            series.check_purchase_date(date(2024, 1, 25)),
            Err(BondError::OutsideSaleWindow { .. })
        ));
    }

    #[test]
    fn test_purchase_requires_first_rate() {
        let series = BondSeries::new("ROR0225", vec![]).unwrap();
        assert!(matches!(
            series.check_purchase_date(date(2024, 2, 10)),
            Err(BondError::MissingRate { period: 1, .. })
        ));
    }
}
