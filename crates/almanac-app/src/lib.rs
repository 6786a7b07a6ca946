//! HTTP surface of the almanac calendar server.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod store_handler;
