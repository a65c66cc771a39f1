//! Duplicate merging and portfolio totals
//!
//! AMC statements repeat a holding's summary on several lines, so the same
//! fund can be accepted more than once. The first accepted record wins;
//! later records judged to be the same holding are dropped.
//!
//! Totals are always the sum of the surviving rows. A printed grand total is
//! never trusted over the rows it is supposed to summarize.

use super::{ExtractedFund, ParsedStatement};

/// Normalized name characters compared by the default matcher
pub const NAME_PREFIX_CHARS: usize = 20;

/// Decides whether two fund names refer to the same holding
pub trait HoldingMatcher: Send + Sync {
    fn is_same_holding(&self, a: &str, b: &str) -> bool;
}

/// Prefix containment: the first `prefix_chars` normalized characters of one
/// name contain, or are contained in, the other's.
#[derive(Debug, Clone, Copy)]
pub struct PrefixContainmentMatcher {
    pub prefix_chars: usize,
}

impl Default for PrefixContainmentMatcher {
    fn default() -> Self {
        Self {
            prefix_chars: NAME_PREFIX_CHARS,
        }
    }
}

impl HoldingMatcher for PrefixContainmentMatcher {
    fn is_same_holding(&self, a: &str, b: &str) -> bool {
        let a: String = normalize_name(a).chars().take(self.prefix_chars).collect();
        let b: String = normalize_name(b).chars().take(self.prefix_chars).collect();
        if a.is_empty() || b.is_empty() {
            return false;
        }
        a.contains(&b) || b.contains(&a)
    }
}

/// Lowercase, keep alphanumerics, single spaces between words
pub fn normalize_name(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deduplicate accepted holdings and compute totals
pub fn aggregate(candidates: Vec<ExtractedFund>, matcher: &dyn HoldingMatcher) -> ParsedStatement {
    let mut funds: Vec<ExtractedFund> = Vec::with_capacity(candidates.len());

    for fund in candidates {
        if fund.market_value <= 0.0 && fund.cost_value <= 0.0 {
            log::debug!("CAS: '{}' dropped, no values", fund.name);
            continue;
        }

        if let Some(existing) = funds.iter().find(|f| matcher.is_same_holding(&f.name, &fund.name)) {
            log::debug!("CAS: '{}' is a repeat of '{}', skipped", fund.name, existing.name);
            continue;
        }

        funds.push(fund);
    }

    let total_market_value = funds.iter().map(|f| f.market_value).sum();
    let total_cost_value = funds.iter().map(|f| f.cost_value).sum();

    ParsedStatement {
        funds,
        total_market_value,
        total_cost_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cas_import::PlanType;

    fn fund(name: &str, market_value: f64, cost_value: f64) -> ExtractedFund {
        ExtractedFund {
            name: name.to_string(),
            folio: "N/A".to_string(),
            amc: "Unknown".to_string(),
            plan_type: PlanType::Direct,
            market_value,
            cost_value,
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Axis  Bluechip-Fund (G) "), "axis bluechip fund g");
        assert_eq!(normalize_name("L&T India Value"), "l t india value");
    }

    #[test]
    fn test_prefix_containment() {
        let matcher = PrefixContainmentMatcher::default();
        assert!(matcher.is_same_holding("Axis Bluechip Fund", "Axis Bluechip Fund - Direct Plan"));
        assert!(matcher.is_same_holding("AXIS BLUECHIP FUND", "axis bluechip fund"));
        assert!(!matcher.is_same_holding("Axis Bluechip Fund", "Axis Midcap Fund"));
        assert!(!matcher.is_same_holding("", "Axis Midcap Fund"));
    }

    #[test]
    fn test_first_detected_wins() {
        let statement = aggregate(
            vec![
                fund("Axis Bluechip Fund", 1_000.0, 900.0),
                fund("Axis Midcap Fund", 2_000.0, 1_500.0),
                fund("Axis Bluechip Fund Direct Growth", 5_000.0, 4_000.0),
            ],
            &PrefixContainmentMatcher::default(),
        );

        assert_eq!(statement.funds.len(), 2);
        assert!((statement.funds[0].market_value - 1_000.0).abs() < 0.001);
        assert!((statement.total_market_value - 3_000.0).abs() < 0.001);
        assert!((statement.total_cost_value - 2_400.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_value_records_dropped() {
        let statement = aggregate(
            vec![fund("Axis Bluechip Fund", 0.0, 0.0), fund("Axis Bluechip Fund", 10.0, 8.0)],
            &PrefixContainmentMatcher::default(),
        );
        assert_eq!(statement.funds.len(), 1);
        assert!((statement.funds[0].market_value - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_swapped_matcher() {
        struct ExactMatcher;
        impl HoldingMatcher for ExactMatcher {
            fn is_same_holding(&self, a: &str, b: &str) -> bool {
                a == b
            }
        }

        let statement = aggregate(
            vec![
                fund("Axis Bluechip Fund", 1_000.0, 900.0),
                fund("Axis Bluechip Fund Direct Growth", 5_000.0, 4_000.0),
            ],
            &ExactMatcher,
        );
        assert_eq!(statement.funds.len(), 2);
    }

    #[test]
    fn test_empty() {
        let statement = aggregate(vec![], &PrefixContainmentMatcher::default());
        assert!(statement.funds.is_empty());
        assert_eq!(statement.total_market_value, 0.0);
    }
}
