//! Holdings extraction and portfolio analysis for Consolidated Account
//! Statements (CAS).
//!
//! The input is the plain text of a statement, already extracted from its
//! PDF. [`cas_import`] turns it into holdings; the other modules derive
//! metrics from those holdings.

pub mod allocation;
pub mod cas_import;
pub mod overlap;
pub mod performance;
pub mod scan;
pub mod settings;
pub mod tax;

pub use cas_import::{parse_statement_text, CasParseError, CasParseResult, ExtractedFund, ParsedStatement, PlanType};
pub use overlap::{concentration_score, detect_overlaps};
pub use performance::{compute_fund_metrics, compute_portfolio_metrics};
pub use scan::scan_statement;
