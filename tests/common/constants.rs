//! Shared constants for integration tests
//!
//! When test data changes (user ids, track ids, experiment ids),
//! update only this file.

// ============================================================================
// Test Users
// ============================================================================

pub const USER_1: &str = "user-1";
pub const USER_2: &str = "user-2";

pub const SESSION_1: &str = "session-1";

// ============================================================================
// Test Tracks
// ============================================================================

pub const TRACK_1_ID: &str = "T1";
pub const TRACK_2_ID: &str = "T2";
pub const TRACK_3_ID: &str = "T3";

// ============================================================================
// Test Experiments
// ============================================================================

pub const EXPERIMENT_1_ID: &str = "E1";
