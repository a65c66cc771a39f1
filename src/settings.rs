//! Analysis settings
//!
//! Optional JSON file, camelCase keys. Missing keys take their defaults:
//!
//! ```json
//! {
//!   "holdingPeriodYears": 1.0,
//!   "ltcgTaxRate": 0.10,
//!   "switchHorizonYears": 5,
//!   "switchBreakevenYears": 2.0
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSettings {
    /// Holding period used to annualize returns
    pub holding_period_years: f64,
    /// Long-term capital gains tax rate applied when switching plans
    pub ltcg_tax_rate: f64,
    pub switch_horizon_years: u32,
    /// A switch pays off when its tax cost is recovered faster than this
    pub switch_breakeven_years: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            holding_period_years: 1.0,
            ltcg_tax_rate: 0.10,
            switch_horizon_years: 5,
            switch_breakeven_years: 2.0,
        }
    }
}

impl AnalysisSettings {
    /// Read settings from a JSON file and validate them
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings JSON in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.holding_period_years.is_finite() || self.holding_period_years < 0.0 {
            bail!("holdingPeriodYears must be a non-negative number, got {}", self.holding_period_years);
        }
        if !self.ltcg_tax_rate.is_finite() || !(0.0..=1.0).contains(&self.ltcg_tax_rate) {
            bail!("ltcgTaxRate must be between 0 and 1, got {}", self.ltcg_tax_rate);
        }
        if !self.switch_breakeven_years.is_finite() || self.switch_breakeven_years < 0.0 {
            bail!(
                "switchBreakevenYears must be a non-negative number, got {}",
                self.switch_breakeven_years
            );
        }
        Ok(())
    }
}
