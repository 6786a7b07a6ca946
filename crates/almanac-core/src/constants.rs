/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", APP_ROUTE_COMPONENT);

pub const CALENDAR_ROUTE_COMPONENT: &str = "calendar";
pub const CALENDAR_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", CALENDAR_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

pub const TASKS_ROUTE_COMPONENT: &str = "tasks";
pub const TASKS_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", TASKS_ROUTE_COMPONENT);

pub const TASK_LISTS_ROUTE_COMPONENT: &str = "task-lists";
pub const TASK_LISTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", TASK_LISTS_ROUTE_COMPONENT);

/// Vertical scale of the day/week time axis.
pub const DEFAULT_PIXELS_PER_HOUR: f64 = 60.0;

/// Floor applied to the rendered height of short timed events.
pub const DEFAULT_MIN_EVENT_HEIGHT: f64 = 30.0;

pub const DEFAULT_TIMEZONE: &str = "UTC";

pub const DEFAULT_PROXY_HEADER: &str = "X-Remote-User";

/// Env var prefix for settings overrides, e.g. `ALMANAC_SERVER__PORT`.
pub const ENV_PREFIX: &str = "ALMANAC";
