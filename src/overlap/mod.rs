//! Overlap & concentration analysis
//!
//! Holdings are grouped by a coarse category guessed from the fund name.
//! Several funds in one category usually means paying several expense ratios
//! for largely the same underlying stocks.
//!
//! ```text
//! risk tier     count      multiplier
//!   high        > 3        3
//!   medium      > 2        2
//!   low         2          1
//!
//! concentration = min(100, Σ count × multiplier × 10)
//! ```

use crate::cas_import::ExtractedFund;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_CONCENTRATION_SCORE: u32 = 100;
const SCORE_WEIGHT: u32 = 10;

/// Fund category used for overlap grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FundCategory {
    #[serde(rename = "Large Cap")]
    LargeCap,
    #[serde(rename = "Mid Cap")]
    MidCap,
    #[serde(rename = "Small Cap")]
    SmallCap,
    #[serde(rename = "Multi Cap")]
    MultiCap,
    #[serde(rename = "Value")]
    Value,
    #[serde(rename = "Growth")]
    Growth,
    #[serde(rename = "Tax Saving (ELSS)")]
    TaxSaving,
    #[serde(rename = "Debt")]
    Debt,
    #[serde(rename = "Gold")]
    Gold,
    #[serde(rename = "Other")]
    Other,
}

impl FundCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LargeCap => "Large Cap",
            Self::MidCap => "Mid Cap",
            Self::SmallCap => "Small Cap",
            Self::MultiCap => "Multi Cap",
            Self::Value => "Value",
            Self::Growth => "Growth",
            Self::TaxSaving => "Tax Saving (ELSS)",
            Self::Debt => "Debt",
            Self::Gold => "Gold",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for FundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category keywords, matched case-insensitively as substrings of the fund
/// name. First matching row wins.
pub static CATEGORY_KEYWORDS: &[(FundCategory, &[&str])] = &[
    (FundCategory::LargeCap, &["large cap", "bluechip", "sensex", "nifty 50"]),
    (FundCategory::MidCap, &["mid cap", "midcap", "emerging"]),
    (FundCategory::SmallCap, &["small cap", "smallcap", "small"]),
    (FundCategory::MultiCap, &["multi cap", "multicap", "diversified", "balanced"]),
    (FundCategory::Value, &["value", "dividend"]),
    (FundCategory::Growth, &["growth", "aggressive"]),
    (FundCategory::TaxSaving, &["elss", "tax"]),
    (FundCategory::Debt, &["debt", "income", "bond", "liquid", "overnight", "ultra short"]),
    (FundCategory::Gold, &["gold", "goldsavings"]),
];

/// Assign a holding to the first category whose keywords appear in its name
pub fn classify_category(name: &str) -> FundCategory {
    let lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(FundCategory::Other)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_count(count: usize) -> Self {
        if count > 3 {
            Self::High
        } else if count > 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn multiplier(&self) -> u32 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Several holdings in the same category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapAlert {
    pub category: FundCategory,
    /// In statement order
    pub fund_names: Vec<String>,
    pub count: usize,
    pub risk_level: RiskLevel,
    pub message: String,
}

/// Group holdings by category and report crowded categories.
///
/// Alerts come back in category table order. Categories with only two
/// holdings rate as low risk and are not reported.
pub fn detect_overlaps(funds: &[ExtractedFund]) -> Vec<OverlapAlert> {
    let mut groups: BTreeMap<FundCategory, Vec<String>> = BTreeMap::new();
    for fund in funds {
        groups
            .entry(classify_category(&fund.name))
            .or_default()
            .push(fund.name.clone());
    }

    let alerts: Vec<OverlapAlert> = groups
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(category, fund_names)| {
            let count = fund_names.len();
            OverlapAlert {
                category,
                count,
                risk_level: RiskLevel::from_count(count),
                message: format!(
                    "You own {} {} funds. You might be paying multiple fees for overlapping holdings.",
                    count, category
                ),
                fund_names,
            }
        })
        .filter(|alert| alert.risk_level != RiskLevel::Low)
        .collect();

    log::debug!("Overlap: {} alerts over {} funds", alerts.len(), funds.len());
    alerts
}

/// Sum of count × multiplier × 10 over all alerts, capped at 100
pub fn concentration_score(alerts: &[OverlapAlert]) -> u32 {
    alerts
        .iter()
        .map(|a| {
            u32::try_from(a.count)
                .unwrap_or(u32::MAX)
                .saturating_mul(a.risk_level.multiplier())
                .saturating_mul(SCORE_WEIGHT)
        })
        .fold(0u32, u32::saturating_add)
        .min(MAX_CONCENTRATION_SCORE)
}
