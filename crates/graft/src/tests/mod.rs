//! Unit tests for the `graft` engines.

mod criteria_tests;
mod dispatch_tests;
