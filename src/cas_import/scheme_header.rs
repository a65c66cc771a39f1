//! Scheme header anchor
//!
//! The strictest layout: a scheme code, the fund name and a plan keyword
//! separated by dashes, as printed by CAMS and KFintech statements.
//!
//! ```text
//! LCDGG - Canara Robeco Large Cap Fund - Direct Growth
//! B205RG - Aditya Birla Sun Life Tax Relief 96 - ELSS - Regular Growth
//! ```

use super::{clean_name, AnchorRule, AnchorStrategy};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_SCHEME_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z0-9]{5,8})\s*-\s*(.+?)\s*-\s*(?i:direct|regular|growth|dividend)\b").unwrap()
});

pub struct SchemeHeaderStrategy;

impl SchemeHeaderStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl AnchorStrategy for SchemeHeaderStrategy {
    fn detect(&self, line: &str) -> bool {
        RE_SCHEME_HEADER.is_match(line)
    }

    fn extract_name(&self, line: &str) -> Option<String> {
        let caps = RE_SCHEME_HEADER.captures(line)?;
        let name = clean_name(&caps[2]);
        if name.chars().filter(|c| c.is_alphabetic()).count() < 3 {
            return None;
        }
        Some(name)
    }

    fn rule(&self) -> AnchorRule {
        AnchorRule::SchemeHeader
    }
}
