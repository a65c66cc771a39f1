//! ISIN marker anchor
//!
//! Fund name followed by the scheme's ISIN on one line, with the option
//! (Growth/Dividend) somewhere on the same line.
//!
//! ```text
//! Axis Bluechip Fund - Growth ISIN: INF846K01164
//! Mirae Asset Large Cap Fund Direct Plan Growth INF769K01AX2
//! ```

use super::{extract_isin, has_performance_keyword, leading_name, AnchorRule, AnchorStrategy};

pub struct IsinMarkerStrategy;

impl IsinMarkerStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl AnchorStrategy for IsinMarkerStrategy {
    fn detect(&self, line: &str) -> bool {
        extract_isin(line).is_some() && has_performance_keyword(line)
    }

    fn extract_name(&self, line: &str) -> Option<String> {
        leading_name(line)
    }

    fn rule(&self) -> AnchorRule {
        AnchorRule::IsinMarker
    }
}
