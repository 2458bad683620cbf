//! Cross-crate integration suites.

pub mod account_flows;
pub mod consent_flows;
pub mod protocol_flows;
