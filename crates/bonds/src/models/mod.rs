//! Bond models
//!
//! - `kind` - Bond families and their term/period rules (BondKind)
//! - `series` - An issued series with its sale window and period rates (BondSeries)
//! - `bond` - A purchased bond with its daily values and cash flow (Bond)

mod bond;
mod kind;
mod series;

pub use bond::{Bond, CashFlow, CashFlowKind, DailyValue};
pub use kind::BondKind;
pub use series::BondSeries;
