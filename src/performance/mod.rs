//! Performance calculation module
//!
//! Derived metrics for extracted holdings. Nothing here is stored on the
//! holding itself; every figure is recomputed from market value, cost value,
//! plan type and a caller-supplied holding period.
//!
//! ## Per-fund formulas
//!
//! ```text
//! gain               = market - cost
//! gain %             = gain / cost × 100            (0 when cost = 0)
//! annualized return  = gain % / max(1, years)
//! annual leakage     = market × 0.01                (Regular plans only)
//! 20y direct savings = market × (1.01^20 - 1)       (Direct plans only)
//! ```
//!
//! The annualized figure is a straight-line approximation, not an XIRR: CAS
//! text gives no dated cash flows to solve against.
//!
//! ## Rating bands (annualized return, percent)
//!
//! ```text
//!   > 20        In-Form
//!   12 ..= 20   On-Track
//!   0 .. 12     Off-Track
//!   < 0         High-Expense/Underperforming
//! ```
//!
//! ## Portfolio health score
//!
//! ```text
//! health = round(clamp(50 + aggregate gain % / 2, 0, 100))
//! ```

use crate::cas_import::{ExtractedFund, PlanType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense ratio differential between Regular and Direct share classes
pub const REGULAR_PLAN_COST_DIFFERENTIAL: f64 = 0.01;

/// Horizon of the Direct-plan savings estimate
pub const DIRECT_SAVINGS_YEARS: i32 = 20;

/// Rating band edges (annualized return, percent)
pub const IN_FORM_ABOVE: f64 = 20.0;
pub const ON_TRACK_FROM: f64 = 12.0;

/// Qualitative rating of a holding's annualized return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceRating {
    #[serde(rename = "In-Form")]
    InForm,
    #[serde(rename = "On-Track")]
    OnTrack,
    #[serde(rename = "Off-Track")]
    OffTrack,
    #[serde(rename = "High-Expense/Underperforming")]
    Underperforming,
}

impl PerformanceRating {
    pub fn from_annualized_return(annualized_return: f64) -> Self {
        if annualized_return > IN_FORM_ABOVE {
            Self::InForm
        } else if annualized_return >= ON_TRACK_FROM {
            Self::OnTrack
        } else if annualized_return >= 0.0 {
            Self::OffTrack
        } else {
            Self::Underperforming
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InForm => "In-Form",
            Self::OnTrack => "On-Track",
            Self::OffTrack => "Off-Track",
            Self::Underperforming => "High-Expense/Underperforming",
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived metrics for one holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundMetrics {
    pub gain: f64,
    /// Gain in percent of cost, rounded to 2 decimals
    pub gain_percent: f64,
    /// Straight-line annualized return in percent, rounded to 2 decimals
    pub annualized_return: f64,
    /// Estimated yearly cost of holding the Regular share class
    pub annual_leakage: f64,
    /// What the fee differential would have cost a Direct holding over 20 years
    pub direct_savings_20y: f64,
    pub rating: PerformanceRating,
}

/// Aggregate metrics over all holdings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub total_market_value: f64,
    pub total_cost_value: f64,
    pub total_gain: f64,
    /// Rounded to 2 decimals
    pub total_gain_percent: f64,
    pub direct_funds: usize,
    pub regular_funds: usize,
    pub total_annual_leakage: f64,
    /// 0 ..= 100
    pub health_score: u32,
}

/// Compute derived metrics for one holding.
///
/// `years` is the holding period; anything below one year (including NaN)
/// is treated as one year.
pub fn compute_fund_metrics(
    market_value: f64,
    cost_value: f64,
    plan_type: PlanType,
    years: f64,
) -> FundMetrics {
    let gain = market_value - cost_value;
    let gain_percent = gain_percent(gain, cost_value);
    let annualized_return = gain_percent / years.max(1.0);

    let (annual_leakage, direct_savings_20y) = match plan_type {
        PlanType::Regular => (annual_leakage(market_value), 0.0),
        PlanType::Direct => (
            0.0,
            market_value
                * ((1.0 + REGULAR_PLAN_COST_DIFFERENTIAL).powi(DIRECT_SAVINGS_YEARS) - 1.0),
        ),
    };

    FundMetrics {
        gain,
        gain_percent: round2(gain_percent),
        annualized_return: round2(annualized_return),
        annual_leakage,
        direct_savings_20y,
        rating: PerformanceRating::from_annualized_return(annualized_return),
    }
}

/// Metrics for an extracted holding
pub fn metrics_for_fund(fund: &ExtractedFund, years: f64) -> FundMetrics {
    compute_fund_metrics(fund.market_value, fund.cost_value, fund.plan_type, years)
}

/// Compute aggregate metrics over all holdings
pub fn compute_portfolio_metrics(funds: &[ExtractedFund]) -> PortfolioMetrics {
    let total_market_value: f64 = funds.iter().map(|f| f.market_value).sum();
    let total_cost_value: f64 = funds.iter().map(|f| f.cost_value).sum();
    let total_gain = total_market_value - total_cost_value;
    let total_gain_percent = gain_percent(total_gain, total_cost_value);

    let direct_funds = funds
        .iter()
        .filter(|f| f.plan_type == PlanType::Direct)
        .count();
    let regular_funds = funds.len() - direct_funds;

    let total_annual_leakage = funds
        .iter()
        .filter(|f| f.plan_type == PlanType::Regular)
        .map(|f| annual_leakage(f.market_value))
        .sum();

    log::debug!(
        "Portfolio: {} funds ({} direct, {} regular), gain {:.2}%",
        funds.len(),
        direct_funds,
        regular_funds,
        total_gain_percent
    );

    PortfolioMetrics {
        total_market_value,
        total_cost_value,
        total_gain,
        total_gain_percent: round2(total_gain_percent),
        direct_funds,
        regular_funds,
        total_annual_leakage,
        health_score: health_score(total_gain_percent),
    }
}

/// Bounded transform of the aggregate gain percentage into 0 ..= 100
pub fn health_score(total_gain_percent: f64) -> u32 {
    if total_gain_percent.is_nan() {
        return 50;
    }
    (50.0 + total_gain_percent / 2.0).clamp(0.0, 100.0).round() as u32
}

fn gain_percent(gain: f64, cost_value: f64) -> f64 {
    if cost_value > 0.0 {
        gain * 100.0 / cost_value
    } else {
        0.0
    }
}

fn annual_leakage(market_value: f64) -> f64 {
    market_value * REGULAR_PLAN_COST_DIFFERENTIAL
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
