//! Integration tests module
//!
//! This module organizes all integration tests for the voxbot application.

// Import individual test modules
pub mod config_test;
pub mod playback_test;
pub mod router_test;
pub mod timer_test;
