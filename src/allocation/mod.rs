//! Asset-class allocation
//!
//! Splits the portfolio's market value into broad asset classes guessed from
//! fund names. Keyword tables are checked in order Gold, Debt, Hybrid; a name
//! matching none of them is Equity.

use crate::cas_import::ExtractedFund;
use crate::performance::round2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    Equity,
    Debt,
    Hybrid,
    Gold,
}

impl AssetClass {
    /// Report order
    pub const ALL: [AssetClass; 4] = [Self::Equity, Self::Debt, Self::Hybrid, Self::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "Equity",
            Self::Debt => "Debt",
            Self::Hybrid => "Hybrid",
            Self::Gold => "Gold",
        }
    }
}

const GOLD_KEYWORDS: &[&str] = &["GOLD", "SILVER", "COMMODITY"];
const DEBT_KEYWORDS: &[&str] = &[
    "DEBT",
    "INCOME",
    "BOND",
    "LIQUID",
    "OVERNIGHT",
    "MONEY MARKET",
    "GILT",
    "CORPORATE",
    "FIXED",
];
const HYBRID_KEYWORDS: &[&str] = &["HYBRID", "BALANCED", "MULTI ASSET"];

pub fn classify_asset_class(name: &str) -> AssetClass {
    let upper = name.to_uppercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| upper.contains(k));

    if matches(GOLD_KEYWORDS) {
        AssetClass::Gold
    } else if matches(DEBT_KEYWORDS) {
        AssetClass::Debt
    } else if matches(HYBRID_KEYWORDS) {
        AssetClass::Hybrid
    } else {
        AssetClass::Equity
    }
}

/// Market value held in one asset class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub asset_class: AssetClass,
    pub market_value: f64,
    /// Share of total market value in percent, rounded to 2 decimals
    pub percent: f64,
    pub fund_count: usize,
}

/// One slice per asset class, always in `AssetClass::ALL` order
pub fn asset_allocation(funds: &[ExtractedFund]) -> Vec<AllocationSlice> {
    let total: f64 = funds.iter().map(|f| f.market_value).sum();

    AssetClass::ALL
        .iter()
        .map(|&asset_class| {
            let members: Vec<&ExtractedFund> = funds
                .iter()
                .filter(|f| classify_asset_class(&f.name) == asset_class)
                .collect();
            let market_value: f64 = members.iter().map(|f| f.market_value).sum();
            let percent = if total > 0.0 {
                round2(market_value * 100.0 / total)
            } else {
                0.0
            };

            AllocationSlice {
                asset_class,
                market_value,
                percent,
                fund_count: members.len(),
            }
        })
        .collect()
}
