//! # Integration Flows
//!
//! Cross-subsystem flows driven through the native runtime dispatch table.

#[cfg(test)]
pub mod fixtures;
pub mod registry_flow;
pub mod relay_flow;
