//! Shared building blocks for the almanac workspace: configuration, the small
//! closed enums every layer agrees on, and route constants.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
