//! Plan keyword anchor
//!
//! Loosest layout: any line naming both the option (Growth/Dividend) and the
//! plan (Direct/Regular). Only reached when neither stricter anchor matched.

use super::{find_plan_type, has_performance_keyword, leading_name, AnchorRule, AnchorStrategy};

pub struct PlanKeywordStrategy;

impl PlanKeywordStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl AnchorStrategy for PlanKeywordStrategy {
    fn detect(&self, line: &str) -> bool {
        has_performance_keyword(line) && find_plan_type(line).is_some()
    }

    fn extract_name(&self, line: &str) -> Option<String> {
        leading_name(line)
    }

    fn rule(&self) -> AnchorRule {
        AnchorRule::PlanKeyword
    }
}
