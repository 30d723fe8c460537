use bondsite_bonds as bonds;
use bondsite_core::dataset::DatasetStatus as CoreDatasetStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Message {
    pub message: String,
}

/// Bond overview without the per-day tables.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BondSummary {
    pub name: String,
    pub kind: String,
    pub isin: Option<String>,
    pub purchase_date: NaiveDate,
    pub maturity_date: NaiveDate,
    #[schema(value_type = f64)]
    pub nominal: Decimal,
    /// Date of the latest computed value.
    pub value_date: Option<NaiveDate>,
    #[schema(value_type = Option<f64>)]
    pub value: Option<Decimal>,
    /// Interest earned up to `value_date`, paid out or capitalized.
    #[schema(value_type = f64)]
    pub interest_to_date: Decimal,
}

impl From<&bonds::Bond> for BondSummary {
    fn from(b: &bonds::Bond) -> Self {
        let last = b.last_value();
        Self {
            name: b.name.clone(),
            kind: b.kind.code().to_string(),
            isin: b.isin.clone(),
            purchase_date: b.purchase_date,
            maturity_date: b.maturity_date,
            nominal: b.nominal,
            value_date: last.map(|v| v.date),
            value: last.map(|v| v.value),
            interest_to_date: b.interest_to_date(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyValue {
    pub date: NaiveDate,
    pub period: u32,
    #[schema(value_type = f64)]
    pub rate: Decimal,
    #[schema(value_type = f64)]
    pub value: Decimal,
    #[schema(value_type = f64)]
    pub accrued_interest: Decimal,
}

impl From<bonds::DailyValue> for DailyValue {
    fn from(v: bonds::DailyValue) -> Self {
        Self {
            date: v.date,
            period: v.period,
            rate: v.rate,
            value: v.value,
            accrued_interest: v.accrued_interest,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    /// `INTEREST` or `REDEMPTION`.
    pub kind: String,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

impl From<bonds::CashFlow> for CashFlow {
    fn from(c: bonds::CashFlow) -> Self {
        let kind = match c.kind {
            bonds::CashFlowKind::Interest => "INTEREST",
            bonds::CashFlowKind::Redemption => "REDEMPTION",
        }
        .to_string();
        Self {
            date: c.date,
            kind,
            amount: c.amount,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SeriesList {
    pub series: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    pub data_date: Option<NaiveDate>,
    pub file_url: Option<String>,
    pub fresh_until: Option<NaiveDate>,
    pub built_at: Option<DateTime<Utc>>,
    pub series_count: usize,
}

impl From<CoreDatasetStatus> for DatasetStatus {
    fn from(s: CoreDatasetStatus) -> Self {
        Self {
            fresh_until: s.info.as_ref().map(|i| i.fresh_until()),
            data_date: s.info.as_ref().map(|i| i.data_date),
            file_url: s.info.map(|i| i.file_url),
            built_at: s.built_at,
            series_count: s.series_count,
        }
    }
}
