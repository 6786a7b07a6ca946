//! Almanac calendar server - integration test support.
//!
//! Re-exports the workspace crates so integration tests can reach every layer
//! through `almanac_test::` paths.

pub mod component {
    pub use almanac_core::{config, constants, types};
    pub use almanac_engine as engine;
    pub use almanac_service::{auth, calendar, model, store};
}

pub mod app {
    pub use almanac_app::app::{api, service_router};
    pub use almanac_app::error;
}
