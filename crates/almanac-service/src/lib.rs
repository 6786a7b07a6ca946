//! Everything between the HTTP handlers and the date engine: the store
//! interface and its in-memory implementation, accounts and authentication,
//! and the calendar queries that feed stored events through the engine.

pub mod auth;
pub mod calendar;
pub mod error;
pub mod model;
pub mod store;
