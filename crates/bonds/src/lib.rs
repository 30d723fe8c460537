//! Bondsite Bonds Crate
//!
//! Builds queryable Polish retail treasury bonds (OTS, ROR, DOR, TOS, COI,
//! EDO, ROS, ROD) out of the published bond dataset.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! | dataset workbook | --> |   SeriesTable    | --> |       Bond       |
//! |   (.xls/.xlsx)   |     |   (BondMaker)    |     | values/cash flow |
//! +------------------+     +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`BondKind`] - Bond family with its term, interest period and payout rule
//! - [`BondSeries`] - One issued series (e.g. `EDO0134`) and its period rates
//! - [`Bond`] - A single bond bought on a given day, with daily values and cash flow
//! - [`BondMaker`] - Anything that can turn a series name and purchase date into a [`Bond`]
//! - [`BondMakerBuilder`] - Constructs a [`BondMaker`] from a dataset file

pub mod errors;
pub mod maker;
pub mod models;
pub mod valuation;

pub use errors::{BondError, Result};
pub use maker::{
    read_workbook, BondMaker, BondMakerBuilder, SeriesTable, WorkbookBondMakerBuilder,
};
pub use models::{Bond, BondKind, BondSeries, CashFlow, CashFlowKind, DailyValue};
pub use valuation::{value_bond, NOMINAL};
