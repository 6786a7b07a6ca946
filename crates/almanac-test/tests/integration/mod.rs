//! Integration tests over the full router.

mod flows;
mod helpers;
mod persistence;
mod recurrence;
