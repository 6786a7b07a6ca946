//! Request parsing shared by the handlers.

use chrono::NaiveDate;
use salvo::{Depot, Request};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use almanac_core::config::Settings;
use almanac_core::types::WeekStart;
use almanac_service::auth::get_account_from_depot;

use crate::error::{AppError, AppResult};

/// Id of the account the auth middleware stored.
pub(crate) fn owner_id(depot: &Depot) -> AppResult<Uuid> {
    Ok(get_account_from_depot(depot)?.id)
}

pub(crate) fn id_param(req: &Request) -> AppResult<Uuid> {
    let raw = req
        .param::<String>("id")
        .ok_or_else(|| AppError::BadRequest("missing id".to_string()))?;
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("invalid id '{raw}': {e}")))
}

pub(crate) async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest(format!("invalid request body: {e}"))
    })
}

/// A query parameter, `None` when absent or blank.
pub(crate) fn optional_string(req: &Request, key: &str) -> Option<String> {
    req.query::<String>(key)
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// An optional `YYYY-MM-DD` query parameter.
pub(crate) fn optional_date(req: &Request, key: &str) -> AppResult<Option<NaiveDate>> {
    optional_string(req, key)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| AppError::BadRequest(format!("invalid {key} '{raw}': {e}")))
        })
        .transpose()
}

/// A `YYYY-MM-DD` query parameter, today in the configured zone when absent.
pub(crate) fn date_or_today(req: &Request, key: &str, settings: &Settings) -> AppResult<NaiveDate> {
    match optional_date(req, key)? {
        Some(date) => Ok(date),
        None => Ok(settings.calendar.today()?),
    }
}

/// The `week_start` query parameter, the configured one when absent.
pub(crate) fn week_start(req: &Request, settings: &Settings) -> AppResult<WeekStart> {
    match optional_string(req, "week_start") {
        Some(raw) => Ok(raw.parse::<WeekStart>()?),
        None => Ok(settings.calendar.week_start),
    }
}
