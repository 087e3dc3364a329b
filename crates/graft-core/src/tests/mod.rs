//! Unit tests for `graft_core` types.
