//! CAS Statement Import Module
//!
//! Turns the text layer of a Consolidated Account Statement into a list of
//! mutual fund holdings. The pipeline is a single synchronous pass:
//!
//! ```text
//! raw text → normalize_text → segment_lines → anchor strategies
//!          → extract_fields (bounded window) → numeric guard → aggregate
//! ```
//!
//! Anchor strategies are tried in fixed priority for every line; the first
//! one that detects the line and yields a name decides the rule for that
//! holding. Stricter layouts come first so looser rules never re-detect a
//! name a stricter rule already captured.

pub mod aggregate;
pub mod error;
pub mod fields;
pub mod guard;
pub mod isin_marker;
pub mod normalizer;
pub mod plan_keyword;
pub mod scheme_header;

pub use aggregate::{HoldingMatcher, PrefixContainmentMatcher};
pub use error::{CasParseError, CasParseResult};
pub use normalizer::{normalize_text, segment_lines, LineToken};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest fund name taken from a leading-text capture
pub const NAME_MAX_CHARS: usize = 120;

static RE_ISIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{2}[A-Z0-9]{10})\b").unwrap());
static RE_PLAN_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(direct|regular)\b").unwrap());
static RE_PERFORMANCE_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(growth|dividend)\b").unwrap());
// First token that can no longer be part of a fund name
static RE_NAME_STOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i:\bISIN\b|\bdirect\b|\bregular\b|\bfolio\b|\bINR\b)|\b[A-Z]{2}[A-Z0-9]{10}\b|\d[\d,]*\.\d+|\b\d{1,3}(?:,\d{2,3})+\b",
    )
    .unwrap()
});
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Share class of a holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    Direct,
    Regular,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::Regular => "Regular",
        }
    }

    /// Case-insensitive parse of "Direct" / "Regular"
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Some(Self::Direct),
            "regular" => Some(Self::Regular),
            _ => None,
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which anchor layout matched a holding's first line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRule {
    /// `CODE - Name - Direct Growth`
    SchemeHeader,
    /// ISIN identifier plus Growth/Dividend on the same line
    IsinMarker,
    /// Growth/Dividend plus Direct/Regular on the same line
    PlanKeyword,
}

/// A committed holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFund {
    pub name: String,
    pub folio: String,
    pub amc: String,
    pub plan_type: PlanType,
    pub market_value: f64,
    pub cost_value: f64,
}

/// Result of parsing a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStatement {
    pub funds: Vec<ExtractedFund>,
    /// Sum of `market_value` over `funds`
    pub total_market_value: f64,
    /// Sum of `cost_value` over `funds`
    pub total_cost_value: f64,
}

/// A detected start of a holding record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Position in the `LineToken` slice (not the raw line number)
    pub position: usize,
    pub rule: AnchorRule,
    pub name: String,
}

/// Anchor strategy trait
pub trait AnchorStrategy: Send + Sync {
    /// Check if the line carries this strategy's anchor signal
    fn detect(&self, line: &str) -> bool;

    /// Pull the fund name out of a detected anchor line
    fn extract_name(&self, line: &str) -> Option<String>;

    /// Rule recorded on holdings found by this strategy
    fn rule(&self) -> AnchorRule;
}

/// All anchor strategies, strictest first
pub fn default_strategies() -> Vec<Box<dyn AnchorStrategy>> {
    vec![
        Box::new(scheme_header::SchemeHeaderStrategy::new()),
        Box::new(isin_marker::IsinMarkerStrategy::new()),
        Box::new(plan_keyword::PlanKeywordStrategy::new()),
    ]
}

/// Statement parser with a fixed strategy order and duplicate rule
pub struct StatementParser {
    strategies: Vec<Box<dyn AnchorStrategy>>,
    matcher: Box<dyn HoldingMatcher>,
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser {
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
            matcher: Box::new(PrefixContainmentMatcher::default()),
        }
    }

    /// Replace the strategy list (tried in the given order)
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn AnchorStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Replace the duplicate-holding rule
    pub fn with_matcher(mut self, matcher: Box<dyn HoldingMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// First strategy that detects the line and yields a name
    pub fn detect_anchor(&self, line: &str) -> Option<(AnchorRule, String)> {
        self.strategies.iter().find_map(|strategy| {
            if !strategy.detect(line) {
                return None;
            }
            strategy
                .extract_name(line)
                .map(|name| (strategy.rule(), name))
        })
    }

    /// Find every anchor line, in document order
    pub fn find_anchors(&self, lines: &[LineToken]) -> Vec<Anchor> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(position, line)| {
                self.detect_anchor(&line.text).map(|(rule, name)| Anchor {
                    position,
                    rule,
                    name,
                })
            })
            .collect()
    }

    /// Parse statement text (already extracted from the PDF)
    pub fn parse(&self, text: &str) -> CasParseResult<ParsedStatement> {
        check_usable_text(text)?;

        let normalized = normalize_text(text);
        let lines = segment_lines(&normalized);
        if lines.is_empty() {
            return Err(CasParseError::malformed("input contains no text lines"));
        }

        let anchors = self.find_anchors(&lines);
        log::info!("CAS: {} lines, {} anchor lines", lines.len(), anchors.len());

        let mut accepted = Vec::new();
        for (i, anchor) in anchors.iter().enumerate() {
            let next_anchor = anchors.get(i + 1).map(|a| a.position);
            let candidate = fields::extract_fields(&lines, anchor, next_anchor);
            match candidate.into_fund() {
                Some(fund) => accepted.push(fund),
                None => log::debug!(
                    "CAS: discarded candidate '{}' at line {}",
                    anchor.name,
                    lines[anchor.position].index
                ),
            }
        }

        let statement = aggregate::aggregate(accepted, self.matcher.as_ref());
        log::info!(
            "CAS: {} holdings, market value {:.2}, cost value {:.2}",
            statement.funds.len(),
            statement.total_market_value,
            statement.total_cost_value
        );

        if statement.funds.is_empty() {
            log::warn!("CAS: no holdings found in {} lines", lines.len());
            return Err(CasParseError::no_holdings(text));
        }

        Ok(statement)
    }
}

/// Parse statement text with the default strategies and duplicate rule
pub fn parse_statement_text(text: &str) -> CasParseResult<ParsedStatement> {
    StatementParser::new().parse(text)
}

/// Refuse input that is not extracted statement text at all
fn check_usable_text(text: &str) -> CasParseResult<()> {
    if text.trim().is_empty() {
        return Err(CasParseError::malformed("input is empty"));
    }
    if text.trim_start_matches('\u{feff}').trim_start().starts_with("%PDF") {
        return Err(CasParseError::malformed(
            "input is a raw PDF document, not extracted text",
        ));
    }
    if text.contains('\0') {
        return Err(CasParseError::malformed("input contains NUL bytes"));
    }
    Ok(())
}

/// Extract ISIN from text (12 chars, starts with 2 letters)
pub fn extract_isin(text: &str) -> Option<String> {
    RE_ISIN.captures(text).map(|c| c[1].to_string())
}

/// First Direct/Regular keyword in the text
pub fn find_plan_type(text: &str) -> Option<PlanType> {
    RE_PLAN_TYPE
        .captures(text)
        .and_then(|c| PlanType::parse(&c[1]))
}

/// Whether the text names a Growth or Dividend option
pub fn has_performance_keyword(text: &str) -> bool {
    RE_PERFORMANCE_TYPE.is_match(text)
}

/// Collapse whitespace runs and trim
pub fn clean_name(name: &str) -> String {
    RE_SPACES.replace_all(name.trim(), " ").into_owned()
}

/// Leading text of a line up to the first ISIN, plan type, folio, currency
/// or amount token.
pub fn leading_name(line: &str) -> Option<String> {
    let end = RE_NAME_STOP
        .find(line)
        .map(|m| m.start())
        .unwrap_or(line.len());

    let trimmed = line[..end]
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | '(' | '|' | '/' | ','));
    let name: String = clean_name(trimmed).chars().take(NAME_MAX_CHARS).collect();
    let name = name.trim_end().to_string();

    if name.chars().filter(|c| c.is_alphabetic()).count() < 3 {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_FUND_STATEMENT: &str = r#"
Consolidated Account Statement
01-Jan-2024 To 31-Dec-2024
Folio No: 1234567/89 PAN: ABCDE1234F
LCDGG - Canara Robeco Large Cap Fund - Direct Growth
ISIN: INF760K01JF9 Registrar : CAMS
Opening Unit Balance: 100.000
Closing Unit Balance: 1,234.567 NAV on 31-Dec-2024: ₹ 89.12
Cost Value: Rs. 1,00,000.00 Market Value on 31-Dec-2024: INR 1,10,000.00
Folio No: 99887766
P8042 - Parag Parikh Flexi Cap Fund - Regular Growth
ISIN: INF879O01019
Total Cost Value: INR 2,50,000.00
Market Value on 31-Dec-2024: INR 3,00,000.50
Folio No: 55443322 / 11
B205RG - Aditya Birla Sun Life Liquid Fund - Direct Growth
Cost Value: INR 50,000.00 Market Value on 31-Dec-2024: INR 51,500.00
Grand Total 4,61,500.50 4,00,000.00
"#;

    #[test]
    fn test_three_fund_statement() {
        let statement = parse_statement_text(THREE_FUND_STATEMENT).unwrap();
        assert_eq!(statement.funds.len(), 3);

        let first = &statement.funds[0];
        assert_eq!(first.name, "Canara Robeco Large Cap Fund");
        assert_eq!(first.folio, "1234567/89");
        assert_eq!(first.amc, "Canara Robeco");
        assert_eq!(first.plan_type, PlanType::Direct);
        assert!((first.market_value - 110_000.0).abs() < 0.001);
        assert!((first.cost_value - 100_000.0).abs() < 0.001);

        let second = &statement.funds[1];
        assert_eq!(second.name, "Parag Parikh Flexi Cap Fund");
        assert_eq!(second.folio, "99887766");
        assert_eq!(second.amc, "PPFAS");
        assert_eq!(second.plan_type, PlanType::Regular);
        assert!((second.market_value - 300_000.50).abs() < 0.001);
        assert!((second.cost_value - 250_000.0).abs() < 0.001);

        let third = &statement.funds[2];
        assert_eq!(third.amc, "Aditya Birla Sun Life");
        assert_eq!(third.folio, "55443322");

        let sum: f64 = statement.funds.iter().map(|f| f.market_value).sum();
        assert!((statement.total_market_value - sum).abs() < 0.001);
        assert!((statement.total_market_value - 461_500.50).abs() < 0.001);
        assert!((statement.total_cost_value - 400_000.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = serde_json::to_string(&parse_statement_text(THREE_FUND_STATEMENT).unwrap()).unwrap();
        let b = serde_json::to_string(&parse_statement_text(THREE_FUND_STATEMENT).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_anchor_lines() {
        let text = "Consolidated Account Statement\nNo transactions in this period\nTotal 0.00";
        match parse_statement_text(text) {
            Err(CasParseError::NoHoldingsFound { excerpt }) => {
                assert!(excerpt.starts_with("Consolidated Account Statement"))
            }
            other => panic!("expected NoHoldingsFound, got {:?}", other),
        }
    }

    #[test]
    fn test_anchor_without_values_is_not_a_holding() {
        let text = "LCDGG - Canara Robeco Large Cap Fund - Direct Growth\nISIN: INF760K01JF9";
        assert!(matches!(
            parse_statement_text(text),
            Err(CasParseError::NoHoldingsFound { .. })
        ));
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(parse_statement_text(""), Err(CasParseError::MalformedInput { .. })));
        assert!(matches!(
            parse_statement_text("  \n\t \r\n"),
            Err(CasParseError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_statement_text("%PDF-1.7\n%binary"),
            Err(CasParseError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_statement_text("abc\0def"),
            Err(CasParseError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_raw_pdf_after_bom_or_whitespace() {
        assert!(matches!(
            parse_statement_text("\u{feff}%PDF-1.4\n1 0 obj"),
            Err(CasParseError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_statement_text("\n  %PDF-1.4\n1 0 obj"),
            Err(CasParseError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_date_after_value_label_keeps_holding() {
        let text = r#"
LCDGG - Canara Robeco Large Cap Fund - Direct Growth
Cost Value: INR 1,00,000.00
Market Value: 31-Dec-2024 INR 1,10,000.00
"#;
        let statement = parse_statement_text(text).unwrap();
        assert_eq!(statement.funds.len(), 1);
        assert!((statement.funds[0].market_value - 110_000.0).abs() < 0.001);
        assert!((statement.funds[0].cost_value - 100_000.0).abs() < 0.001);
    }

    #[test]
    fn test_colon_less_cost_label() {
        let text = "LCDGG - Canara Robeco Large Cap Fund - Direct Growth\n\
                    Total Cost Value 1,00,000.00 Market Value on 31-Dec-2024: INR 1,10,000.00";
        let statement = parse_statement_text(text).unwrap();
        let fund = &statement.funds[0];
        assert!((fund.cost_value - 100_000.0).abs() < 0.001, "cost was {}", fund.cost_value);
        assert!((fund.market_value - 110_000.0).abs() < 0.001);
    }

    #[test]
    fn test_implausible_ratio_discards_holding() {
        let text = r#"
LCDGG - Canara Robeco Large Cap Fund - Direct Growth
Cost Value: INR 1.00 Market Value: INR 150.00
P8042 - Parag Parikh Flexi Cap Fund - Direct Growth
Cost Value: INR 1,000.00 Market Value: INR 500.00
"#;
        let statement = parse_statement_text(text).unwrap();
        assert_eq!(statement.funds.len(), 1);
        assert_eq!(statement.funds[0].name, "Parag Parikh Flexi Cap Fund");
    }

    #[test]
    fn test_values_not_attributed_across_holdings() {
        // First holding has no values of its own; the next holding's values
        // must not leak into it.
        let text = r#"
LCDGG - Canara Robeco Large Cap Fund - Direct Growth
P8042 - Parag Parikh Flexi Cap Fund - Direct Growth
Cost Value: INR 1,000.00 Market Value: INR 1,200.00
"#;
        let statement = parse_statement_text(text).unwrap();
        assert_eq!(statement.funds.len(), 1);
        assert_eq!(statement.funds[0].name, "Parag Parikh Flexi Cap Fund");
    }

    #[test]
    fn test_repeated_summary_line_is_deduplicated() {
        let text = r#"
LCDGG - Canara Robeco Large Cap Fund - Direct Growth
Cost Value: INR 1,000.00 Market Value: INR 1,200.00
Canara Robeco Large Cap Fund Direct Growth Market Value: INR 1,250.00
Cost Value: INR 1,100.00
"#;
        let statement = parse_statement_text(text).unwrap();
        assert_eq!(statement.funds.len(), 1);
        assert!((statement.funds[0].market_value - 1_200.0).abs() < 0.001);
        assert!((statement.total_market_value - 1_200.0).abs() < 0.001);
    }

    #[test]
    fn test_detect_anchor_priority() {
        let parser = StatementParser::new();

        let (rule, name) = parser
            .detect_anchor("LCDGG - Canara Robeco Large Cap Fund - Direct Growth ISIN: INF760K01JF9")
            .unwrap();
        assert_eq!(rule, AnchorRule::SchemeHeader);
        assert_eq!(name, "Canara Robeco Large Cap Fund");

        let (rule, name) = parser
            .detect_anchor("Axis Bluechip Fund - Growth ISIN: INF846K01164")
            .unwrap();
        assert_eq!(rule, AnchorRule::IsinMarker);
        assert_eq!(name, "Axis Bluechip Fund - Growth");

        let (rule, name) = parser
            .detect_anchor("HDFC Flexi Cap Fund - Regular Plan - Growth")
            .unwrap();
        assert_eq!(rule, AnchorRule::PlanKeyword);
        assert_eq!(name, "HDFC Flexi Cap Fund");

        // Detail line: ISIN with Growth but no name in front of it
        assert_eq!(parser.detect_anchor("ISIN: INF760K01JF9 Direct Plan Growth"), None);
        assert_eq!(parser.detect_anchor("Market Value: INR 1,000.00"), None);
    }

    #[test]
    fn test_custom_strategy_order() {
        let parser = StatementParser::new()
            .with_strategies(vec![Box::new(plan_keyword::PlanKeywordStrategy::new())]);
        let (rule, _) = parser
            .detect_anchor("LCDGG - Canara Robeco Large Cap Fund - Direct Growth")
            .unwrap();
        assert_eq!(rule, AnchorRule::PlanKeyword);
    }

    #[test]
    fn test_leading_name() {
        assert_eq!(
            leading_name("HDFC Flexi Cap Fund - Direct Plan - Growth"),
            Some("HDFC Flexi Cap Fund".to_string())
        );
        assert_eq!(
            leading_name("Mirae Asset Large Cap Fund Growth INF769K01010"),
            Some("Mirae Asset Large Cap Fund Growth".to_string())
        );
        assert_eq!(
            leading_name("UTI Nifty 50 Index Fund Growth 1,234.56"),
            Some("UTI Nifty 50 Index Fund Growth".to_string())
        );
        assert_eq!(leading_name("ISIN: INF760K01JF9"), None);
        assert_eq!(leading_name("- Direct"), None);

        let long = format!("{} Growth Direct", "Fund ".repeat(60));
        assert!(leading_name(&long).unwrap().chars().count() <= NAME_MAX_CHARS);
    }

    #[test]
    fn test_extract_isin() {
        assert_eq!(extract_isin("ISIN: INF760K01JF9 Registrar"), Some("INF760K01JF9".to_string()));
        assert_eq!(extract_isin("no identifier here"), None);
    }

    #[test]
    fn test_find_plan_type() {
        assert_eq!(find_plan_type("Direct Plan - Growth"), Some(PlanType::Direct));
        assert_eq!(find_plan_type("REGULAR GROWTH"), Some(PlanType::Regular));
        assert_eq!(find_plan_type("Growth Option"), None);
        // Whole words only
        assert_eq!(find_plan_type("Directors Report"), None);
    }

    #[test]
    fn test_plan_type_serde() {
        assert_eq!(serde_json::to_string(&PlanType::Direct).unwrap(), "\"Direct\"");
        assert_eq!(PlanType::parse(" regular "), Some(PlanType::Regular));
        assert_eq!(PlanType::parse("indirect"), None);
    }
}
