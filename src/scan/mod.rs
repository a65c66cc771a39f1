//! Full statement scan
//!
//! Runs extraction and every analysis over one statement text and collects
//! the results into a single serializable report.

use crate::allocation::{asset_allocation, classify_asset_class, AllocationSlice, AssetClass};
use crate::cas_import::{CasParseResult, PlanType, StatementParser};
use crate::overlap::{classify_category, concentration_score, detect_overlaps, FundCategory, OverlapAlert};
use crate::performance::{compute_portfolio_metrics, metrics_for_fund, FundMetrics, PortfolioMetrics};
use crate::settings::AnalysisSettings;
use crate::tax::{analyze_switch, SwitchAnalysis};
use serde::{Deserialize, Serialize};

/// One holding with everything derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundReport {
    pub name: String,
    pub folio: String,
    pub amc: String,
    pub plan_type: PlanType,
    pub asset_class: AssetClass,
    pub category: FundCategory,
    pub market_value: f64,
    pub cost_value: f64,
    pub metrics: FundMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub funds: Vec<FundReport>,
    pub portfolio: PortfolioMetrics,
    pub allocation: Vec<AllocationSlice>,
    pub overlaps: Vec<OverlapAlert>,
    pub concentration_score: u32,
    pub switch_analysis: SwitchAnalysis,
}

/// Scan with the default parser
pub fn scan_statement(text: &str, settings: &AnalysisSettings) -> CasParseResult<ScanReport> {
    scan_with_parser(&StatementParser::new(), text, settings)
}

pub fn scan_with_parser(
    parser: &StatementParser,
    text: &str,
    settings: &AnalysisSettings,
) -> CasParseResult<ScanReport> {
    let statement = parser.parse(text)?;
    let funds = &statement.funds;

    let fund_reports = funds
        .iter()
        .map(|fund| FundReport {
            name: fund.name.clone(),
            folio: fund.folio.clone(),
            amc: fund.amc.clone(),
            plan_type: fund.plan_type,
            asset_class: classify_asset_class(&fund.name),
            category: classify_category(&fund.name),
            market_value: fund.market_value,
            cost_value: fund.cost_value,
            metrics: metrics_for_fund(fund, settings.holding_period_years),
        })
        .collect();

    let overlaps = detect_overlaps(funds);
    let concentration_score = concentration_score(&overlaps);

    let report = ScanReport {
        funds: fund_reports,
        portfolio: compute_portfolio_metrics(funds),
        allocation: asset_allocation(funds),
        concentration_score,
        overlaps,
        switch_analysis: analyze_switch(funds, settings),
    };

    log::info!(
        "Scan complete: {} funds, health {}, concentration {}",
        report.funds.len(),
        report.portfolio.health_score,
        report.concentration_score
    );

    Ok(report)
}
