use serde::{Deserialize, Serialize};

/// Retail treasury bond family.
///
/// The three-letter code is the prefix of every series name of that family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BondKind {
    /// 3-month fixed rate
    Ots,
    /// 1-year floating, monthly interest
    Ror,
    /// 2-year floating, monthly interest
    Dor,
    /// 3-year fixed, capitalized yearly
    Tos,
    /// 4-year inflation-indexed, yearly interest
    Coi,
    /// 10-year inflation-indexed, capitalized yearly
    Edo,
    /// 6-year family bond, capitalized yearly
    Ros,
    /// 12-year family bond, capitalized yearly
    Rod,
}

impl BondKind {
    pub const ALL: [BondKind; 8] = [
        BondKind::Ots,
        BondKind::Ror,
        BondKind::Dor,
        BondKind::Tos,
        BondKind::Coi,
        BondKind::Edo,
        BondKind::Ros,
        BondKind::Rod,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ots => "OTS",
            Self::Ror => "ROR",
            Self::Dor => "DOR",
            Self::Tos => "TOS",
            Self::Coi => "COI",
            Self::Edo => "EDO",
            Self::Ros => "ROS",
            Self::Rod => "ROD",
        }
    }

    /// Looks up a family by its code, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code))
    }

    /// Months from purchase to maturity.
    pub fn term_months(&self) -> u32 {
        match self {
            Self::Ots => 3,
            Self::Ror => 12,
            Self::Dor => 24,
            Self::Tos => 36,
            Self::Coi => 48,
            Self::Edo => 120,
            Self::Ros => 72,
            Self::Rod => 144,
        }
    }

    /// Length of one interest period in months.
    pub fn period_months(&self) -> u32 {
        match self {
            Self::Ots => 3,
            Self::Ror | Self::Dor => 1,
            Self::Tos | Self::Coi | Self::Edo | Self::Ros | Self::Rod => 12,
        }
    }

    pub fn periods(&self) -> u32 {
        self.term_months() / self.period_months()
    }

    /// True when interest is paid out at the end of every period instead of
    /// being added to the bond value.
    pub fn pays_interest(&self) -> bool {
        matches!(self, Self::Ror | Self::Dor | Self::Coi)
    }
}

impl std::fmt::Display for BondKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
