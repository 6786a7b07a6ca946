//! End-to-end tests for the almanac HTTP API.
//!
//! Every test builds the full router over a fresh in-memory store, so tests
//! are isolated and need no external services.

mod integration;
