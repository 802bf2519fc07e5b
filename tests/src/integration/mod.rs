//! # Integration Flows
//!
//! Composition scenarios spanning the list controller, the units, the
//! confidential transform and the assembler.

pub mod compose_flows;
pub mod confidential_flows;
pub mod validator_flows;
