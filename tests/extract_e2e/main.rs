//! Extraction endpoint E2E test suite.
//!
//! Drives `/extract` through the full actix service stack. Handler contract
//! tests use stub extractors; the Readability tests fetch from an in-process
//! mock site bound to an ephemeral port.
//!
//! Run with: cargo test --test extract_e2e


mod test_contract;
mod test_readability;
