//! Field extraction around an anchor line
//!
//! For each anchor the extractor looks at a bounded window of `LineToken`s:
//!
//! ```text
//! position - FOLIO_LOOKBACK_LINES ..  position            folio only
//! position ..= position + LOOKAHEAD_LINES (or next anchor - 1)   all fields
//! ```
//!
//! Windows are index ranges into the token slice; the forward window never
//! crosses the next anchor, so values cannot be attributed to the wrong
//! holding.

use super::guard::{accept_amount, is_plausible_ratio};
use super::{find_plan_type, Anchor, AnchorRule, ExtractedFund, LineToken, PlanType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lines after the anchor searched for fields
pub const LOOKAHEAD_LINES: usize = 10;
/// Lines before the anchor searched for the folio
pub const FOLIO_LOOKBACK_LINES: usize = 5;
/// Folio numbers longer than this are truncated
pub const FOLIO_MAX_CHARS: usize = 25;

pub const UNKNOWN_FOLIO: &str = "N/A";
pub const UNKNOWN_AMC: &str = "Unknown";

static RE_FOLIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfolio\s*(?:no\.?|number)?\s*[:.#]?\s*([A-Z0-9][A-Z0-9/\-]*)").unwrap()
});
// A value label; group 1 is set for market value
static RE_VALUE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(market)\s+value|(?:total\s+)?cost\s+value)\b").unwrap()
});
// Amounts carry a trailing group that is non-empty when the number runs on
// into a date (`31-Dec-2024`, `31/12/2024`)
static RE_INR_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bINR\)?\s*:?\s*(\d[\d,]*(?:\.\d+)?)([-/A-Za-z]?)").unwrap()
});
static RE_BARE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s:])(\d[\d,]*(?:\.\d+)?)([-/A-Za-z]?)").unwrap());

/// Which value a label introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLabel {
    Market,
    Cost,
}

/// Known issuer fragments, matched as whole words against the fund name.
/// Order matters: the first hit wins.
const AMC_FRAGMENTS: &[(&str, &str)] = &[
    ("Parag Parikh", "PPFAS"),
    ("PPFAS", "PPFAS"),
    ("Aditya Birla", "Aditya Birla Sun Life"),
    ("Aditya", "Aditya Birla Sun Life"),
    ("ICICI", "ICICI Prudential"),
    ("HDFC", "HDFC"),
    ("Axis", "Axis"),
    ("SBI", "SBI"),
    ("Motilal", "Motilal Oswal"),
    ("Franklin", "Franklin Templeton"),
    ("Kotak", "Kotak Mahindra"),
    ("DSP", "DSP"),
    ("L&T", "L&T"),
    ("Nippon", "Nippon India"),
    ("JM", "JM Financial"),
    ("IDFC", "IDFC"),
    ("Canara", "Canara Robeco"),
    ("LIC", "LIC"),
    ("UTI", "UTI"),
    ("Tata", "Tata"),
    ("Mahindra", "Mahindra Manulife"),
    ("Quantum", "Quantum"),
    ("Invesco", "Invesco"),
    ("PGIM", "PGIM India"),
    ("Mirae", "Mirae Asset"),
    ("Edelweiss", "Edelweiss"),
    ("Sundaram", "Sundaram"),
];

static AMC_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    AMC_FRAGMENTS
        .iter()
        .map(|(fragment, amc)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(fragment));
            (Regex::new(&pattern).unwrap(), *amc)
        })
        .collect()
});

/// Scratch record filled while scanning an anchor's window
#[derive(Debug, Clone, PartialEq)]
pub struct FundEntryCandidate {
    pub position: usize,
    pub rule: AnchorRule,
    pub name: String,
    pub plan_type: Option<PlanType>,
    pub folio: Option<String>,
    pub amc: String,
    pub market_value: Option<f64>,
    pub cost_value: Option<f64>,
}

impl FundEntryCandidate {
    fn new(anchor: &Anchor) -> Self {
        Self {
            position: anchor.position,
            rule: anchor.rule,
            name: anchor.name.clone(),
            plan_type: None,
            folio: None,
            amc: find_amc(&anchor.name),
            market_value: None,
            cost_value: None,
        }
    }

    /// Promote to a committed holding.
    ///
    /// A single found value stands in for the missing one (zero gain).
    /// Returns `None` when no value was found or the value pair fails the
    /// ratio check.
    pub fn into_fund(self) -> Option<ExtractedFund> {
        let (market_value, cost_value) = match (self.market_value, self.cost_value) {
            (Some(market), Some(cost)) => (market, cost),
            (Some(market), None) => (market, market),
            (None, Some(cost)) => (cost, cost),
            (None, None) => return None,
        };

        if !is_plausible_ratio(market_value, cost_value) {
            log::debug!(
                "CAS: '{}' rejected, market {:.2} vs cost {:.2}",
                self.name,
                market_value,
                cost_value
            );
            return None;
        }

        Some(ExtractedFund {
            name: self.name,
            folio: self.folio.unwrap_or_else(|| UNKNOWN_FOLIO.to_string()),
            amc: self.amc,
            // Unresolved plan type must not understate cost
            plan_type: self.plan_type.unwrap_or(PlanType::Regular),
            market_value,
            cost_value,
        })
    }
}

/// Fill a candidate from the lines around `anchor`.
///
/// `next_anchor` is the position of the following anchor line, if any; the
/// forward window ends just before it.
pub fn extract_fields(
    lines: &[LineToken],
    anchor: &Anchor,
    next_anchor: Option<usize>,
) -> FundEntryCandidate {
    let mut candidate = FundEntryCandidate::new(anchor);
    let window = forward_window(lines.len(), anchor.position, next_anchor);

    for line in &lines[window.clone()] {
        let text = line.text.as_str();

        if candidate.plan_type.is_none() {
            candidate.plan_type = find_plan_type(text);
        }
        if candidate.market_value.is_none() {
            candidate.market_value = find_labelled_amount(text, ValueLabel::Market);
        }
        if candidate.cost_value.is_none() {
            candidate.cost_value = find_labelled_amount(text, ValueLabel::Cost);
        }
    }

    candidate.folio = find_folio_around(lines, anchor.position, window);

    log::debug!(
        "CAS: candidate '{}' ({:?}) plan={:?} folio={:?} market={:?} cost={:?}",
        candidate.name,
        candidate.rule,
        candidate.plan_type,
        candidate.folio,
        candidate.market_value,
        candidate.cost_value
    );

    candidate
}

/// Anchor line plus up to LOOKAHEAD_LINES following lines, stopping before
/// the next anchor.
fn forward_window(
    len: usize,
    position: usize,
    next_anchor: Option<usize>,
) -> std::ops::Range<usize> {
    let mut end = (position + LOOKAHEAD_LINES + 1).min(len);
    if let Some(next) = next_anchor {
        if next > position {
            end = end.min(next);
        }
    }
    position..end
}

/// Folio on the anchor line, then the preceding lines (nearest first), then
/// the rest of the forward window.
fn find_folio_around(
    lines: &[LineToken],
    position: usize,
    window: std::ops::Range<usize>,
) -> Option<String> {
    let lookback_start = position.saturating_sub(FOLIO_LOOKBACK_LINES);

    std::iter::once(position)
        .chain((lookback_start..position).rev())
        .chain(window.filter(|p| *p != position))
        .find_map(|p| find_folio(&lines[p].text))
}

/// Folio number following a "Folio" label
pub fn find_folio(text: &str) -> Option<String> {
    RE_FOLIO
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .find(|token| token.chars().any(|c| c.is_ascii_digit()))
        .map(|token| token.chars().take(FOLIO_MAX_CHARS).collect())
}

/// Issuer of a fund, from its name
pub fn find_amc(fund_name: &str) -> String {
    AMC_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(fund_name))
        .map(|(_, amc)| amc.to_string())
        .unwrap_or_else(|| UNKNOWN_AMC.to_string())
}

/// Amount introduced by a `label` on the line.
///
/// Each label owns the text up to the next value label, so an amount is
/// never taken from a neighbouring label. Within that segment an
/// `INR`-labelled amount wins over a bare number.
pub fn find_labelled_amount(text: &str, label: ValueLabel) -> Option<f64> {
    let labels: Vec<(ValueLabel, usize, usize)> = RE_VALUE_LABEL
        .captures_iter(text)
        .filter_map(|c| {
            let m = c.get(0)?;
            let kind = if c.get(1).is_some() {
                ValueLabel::Market
            } else {
                ValueLabel::Cost
            };
            Some((kind, m.start(), m.end()))
        })
        .collect();

    labels
        .iter()
        .enumerate()
        .filter(|(_, (kind, _, _))| *kind == label)
        .find_map(|(i, (_, _, end))| {
            let segment_end = labels.get(i + 1).map(|(_, start, _)| *start).unwrap_or(text.len());
            segment_amount(&text[*end..segment_end])
        })
}

fn segment_amount(segment: &str) -> Option<f64> {
    first_accepted(&RE_INR_AMOUNT, segment).or_else(|| first_accepted(&RE_BARE_AMOUNT, segment))
}

fn first_accepted(re: &Regex, segment: &str) -> Option<f64> {
    re.captures_iter(segment).find_map(|c| {
        if !c[2].is_empty() {
            log::debug!("CAS: '{}{}' rejected, part of a date", &c[1], &c[2]);
            return None;
        }
        accept_amount(&c[1])
    })
}
