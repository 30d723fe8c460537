use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kind::BondKind;

/// A single bond of a series bought on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bond {
    pub name: String,
    pub kind: BondKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    pub purchase_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub nominal: Decimal,
    /// Value of the bond for every day from purchase up to the last day with
    /// a published rate (or maturity).
    pub daily_values: Vec<DailyValue>,
    pub cash_flow: Vec<CashFlow>,
}

impl Bond {
    /// Most recent computed value, if any.
    pub fn last_value(&self) -> Option<&DailyValue> {
        self.daily_values.last()
    }

    /// Interest earned up to the last valued day.
    ///
    /// Paid-out interest up to that day plus whatever has accrued or been
    /// capitalized into the value, so bonds valued only part of the way
    /// still report what they have earned so far.
    pub fn interest_to_date(&self) -> Decimal {
        let Some(last) = self.last_value() else {
            return Decimal::ZERO;
        };
        let paid: Decimal = if self.kind.pays_interest() {
            self.cash_flow
                .iter()
                .filter(|flow| flow.kind == CashFlowKind::Interest && flow.date <= last.date)
                .map(|flow| flow.amount)
                .sum()
        } else {
            Decimal::ZERO
        };
        paid + last.value - self.nominal
    }
}

/// Bond value on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyValue {
    pub date: NaiveDate,
    /// One-based interest period.
    pub period: u32,
    /// Annual rate in percent applied in this period.
    pub rate: Decimal,
    pub value: Decimal,
    pub accrued_interest: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowKind {
    Interest,
    Redemption,
}

/// Money paid to the holder on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub kind: CashFlowKind,
    pub amount: Decimal,
}
