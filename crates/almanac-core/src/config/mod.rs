use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_MIN_EVENT_HEIGHT, DEFAULT_PIXELS_PER_HOUR, DEFAULT_PROXY_HEADER, DEFAULT_TIMEZONE,
    ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};
use crate::types::{EventCategory, WeekStart};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub categories: CategoryPalette,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SingleUser,
    BasicAuth,
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub proxy: Option<ProxyAuthConfig>,
    pub single_user: Option<SingleUserAuthConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyAuthConfig {
    /// Header carrying the identity asserted by the fronting proxy.
    #[serde(default = "default_proxy_header")]
    pub header: String,
}

impl Default for ProxyAuthConfig {
    fn default() -> Self {
        Self {
            header: default_proxy_header(),
        }
    }
}

fn default_proxy_header() -> String {
    DEFAULT_PROXY_HEADER.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserAuthConfig {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Presentation parameters threaded into the grid and layout calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
    pub pixels_per_hour: f64,
    pub min_event_height: f64,
    /// IANA zone used to decide what "today" is.
    pub timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Monday,
            pixels_per_hour: DEFAULT_PIXELS_PER_HOUR,
            min_event_height: DEFAULT_MIN_EVENT_HEIGHT,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl CalendarConfig {
    /// ## Summary
    /// Parses the configured IANA timezone.
    ///
    /// ## Errors
    /// Returns `ConfigError` if the name is not a known zone.
    pub fn tz(&self) -> CoreResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| CoreError::ConfigError(format!("unknown timezone '{}': {e}", self.timezone)))
    }

    /// ## Summary
    /// Returns the current calendar date in the configured timezone.
    ///
    /// ## Errors
    /// Returns `ConfigError` if the timezone is invalid.
    pub fn today(&self) -> CoreResult<NaiveDate> {
        let tz = self.tz()?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}

/// The one category → colour table. Every consumer looks colours up here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryPalette {
    pub work: String,
    pub personal: String,
    pub meeting: String,
    pub reminder: String,
    pub other: String,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            work: "#7986cb".to_string(),
            personal: "#039be5".to_string(),
            meeting: "#33b679".to_string(),
            reminder: "#f6bf26".to_string(),
            other: "#f4511e".to_string(),
        }
    }
}

impl CategoryPalette {
    #[must_use]
    pub fn color_for(&self, category: EventCategory) -> &str {
        match category {
            EventCategory::Work => &self.work,
            EventCategory::Personal => &self.personal,
            EventCategory::Meeting => &self.meeting,
            EventCategory::Reminder => &self.reminder,
            EventCategory::Other => &self.other,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot written after every mutation; in-memory only when unset.
    pub snapshot_path: Option<PathBuf>,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, `config.toml` and `ALMANAC_*`
    /// environment variables into a `Settings`.
    /// Environment variables take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8697)?
            .set_default("logging.level", "debug")?
            .set_default("auth.method", "single_user")?
            .set_default("auth.single_user.name", "Almanac User")?
            .set_default("auth.single_user.email", "user@localhost")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env vars, e.g. ALMANAC_CALENDAR__WEEK_START=sunday
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Rejects settings the calendar cannot work with.
    ///
    /// ## Errors
    /// Returns `ConfigError` for non-positive layout values, an unknown
    /// timezone, or an auth method whose section is missing.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.calendar.pixels_per_hour.is_finite() && self.calendar.pixels_per_hour > 0.0) {
            return Err(CoreError::ConfigError(format!(
                "calendar.pixels_per_hour must be positive, got {}",
                self.calendar.pixels_per_hour
            )));
        }
        if !(self.calendar.min_event_height.is_finite() && self.calendar.min_event_height > 0.0) {
            return Err(CoreError::ConfigError(format!(
                "calendar.min_event_height must be positive, got {}",
                self.calendar.min_event_height
            )));
        }
        self.calendar.tz()?;

        if matches!(self.auth.method, AuthMethod::SingleUser) && self.auth.single_user.is_none() {
            return Err(CoreError::ConfigError(
                "auth.single_user is required for single_user authentication".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => tracing::trace!("No .env file found"),
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let settings = Settings::load()?;
    tracing::debug!(
        auth = ?settings.auth.method,
        week_start = %settings.calendar.week_start,
        timezone = %settings.calendar.timezone,
        snapshot = settings.storage.snapshot_path.is_some(),
        "Configuration loaded"
    );
    Ok(settings)
}
