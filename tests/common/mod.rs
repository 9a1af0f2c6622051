//! Common test infrastructure
//!
//! Fixture builders shared across the integration test suite. Tests should
//! only import from this module, not from internal submodules.

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::*;
