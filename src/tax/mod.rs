//! Regular → Direct switch analysis
//!
//! Moving a holding from the Regular to the Direct share class is a
//! redemption followed by a fresh purchase, so the unrealized gain is taxed
//! as long-term capital gains (LTCG). The switch is worth it when the saved
//! expense ratio recovers that tax quickly:
//!
//! ```text
//! annual savings  = Σ regular market value × 0.01
//! total savings   = annual savings × horizon years
//! tax cost        = LTCG rate × Σ max(0, regular gain)
//! breakeven years = tax cost / annual savings
//! ```

use crate::cas_import::{ExtractedFund, PlanType};
use crate::performance::REGULAR_PLAN_COST_DIFFERENTIAL;
use crate::settings::AnalysisSettings;
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwitchVerdict {
    /// Tax cost is recovered within the breakeven threshold
    Switch,
    Hold,
    /// No Regular plan holdings in the statement
    NothingToSwitch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchAnalysis {
    pub regular_funds: usize,
    pub regular_market_value: f64,
    pub annual_savings: f64,
    pub horizon_years: u32,
    pub total_savings: f64,
    /// Sum of positive unrealized gains in Regular holdings
    pub harvestable_gain: f64,
    pub tax_rate: f64,
    pub tax_cost: f64,
    /// None when there are no annual savings to recover the tax from
    pub breakeven_years: Option<f64>,
    pub verdict: SwitchVerdict,
}

// ============================================================================
// Calculation
// ============================================================================

/// Evaluate switching every Regular holding to its Direct counterpart
pub fn analyze_switch(funds: &[ExtractedFund], settings: &AnalysisSettings) -> SwitchAnalysis {
    let regular: Vec<&ExtractedFund> = funds
        .iter()
        .filter(|f| f.plan_type == PlanType::Regular)
        .collect();

    let regular_market_value: f64 = regular.iter().map(|f| f.market_value).sum();
    let harvestable_gain: f64 = regular
        .iter()
        .map(|f| (f.market_value - f.cost_value).max(0.0))
        .sum();

    let annual_savings = regular_market_value * REGULAR_PLAN_COST_DIFFERENTIAL;
    let total_savings = annual_savings * settings.switch_horizon_years as f64;
    let tax_cost = harvestable_gain * settings.ltcg_tax_rate;

    let breakeven_years = if tax_cost <= 0.0 {
        Some(0.0)
    } else if annual_savings > 0.0 {
        Some(tax_cost / annual_savings)
    } else {
        None
    };

    let verdict = if regular.is_empty() {
        SwitchVerdict::NothingToSwitch
    } else {
        match breakeven_years {
            Some(years) if years < settings.switch_breakeven_years => SwitchVerdict::Switch,
            _ => SwitchVerdict::Hold,
        }
    };

    log::debug!(
        "Switch: {} regular funds, savings {:.2}/yr, tax {:.2}, verdict {:?}",
        regular.len(),
        annual_savings,
        tax_cost,
        verdict
    );

    SwitchAnalysis {
        regular_funds: regular.len(),
        regular_market_value,
        annual_savings,
        horizon_years: settings.switch_horizon_years,
        total_savings,
        harvestable_gain,
        tax_rate: settings.ltcg_tax_rate,
        tax_cost,
        breakeven_years,
        verdict,
    }
}
