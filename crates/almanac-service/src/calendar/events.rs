use chrono::Utc;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::model::event::{EventPatch, NewEvent, StoredEvent};
use crate::store::EventStore;

fn validate(stored: &StoredEvent) -> ServiceResult<()> {
    if stored.event.title.is_empty() {
        return Err(ServiceError::ValidationError(
            "event title must not be empty".to_string(),
        ));
    }
    stored.event.validate()?;
    Ok(())
}

/// ## Summary
/// Validates and stores a new event.
///
/// ## Errors
/// `ValidationError` for an empty title; `InvalidEvent`/`InvalidRule` from the
/// engine for bad dates or a malformed rule.
#[tracing::instrument(skip(store, input), fields(title = %input.title))]
pub fn create_event<S: EventStore + ?Sized>(
    store: &S,
    owner: Uuid,
    input: NewEvent,
) -> ServiceResult<StoredEvent> {
    let stored = input.into_stored(owner);
    validate(&stored)?;
    store.insert_event(stored.clone())?;

    tracing::info!(event_id = %stored.event.id, "Event created");
    Ok(stored)
}

/// ## Errors
/// `NotFound` unless the owner has this event.
pub fn get_event<S: EventStore + ?Sized>(
    store: &S,
    owner: Uuid,
    id: Uuid,
) -> ServiceResult<StoredEvent> {
    store.get_event(owner, id)
}

/// ## Errors
/// Storage errors only.
pub fn list_events<S: EventStore + ?Sized>(store: &S, owner: Uuid) -> ServiceResult<Vec<StoredEvent>> {
    let mut events = store.list_events(owner)?;
    events.sort_by(|a, b| {
        a.event
            .start_date
            .cmp(&b.event.start_date)
            .then_with(|| a.event.title.cmp(&b.event.title))
    });
    Ok(events)
}

/// ## Summary
/// Applies a partial update and re-validates the whole event.
///
/// ## Errors
/// `NotFound`, or the same validation errors as [`create_event`].
#[tracing::instrument(skip(store, patch))]
pub fn update_event<S: EventStore + ?Sized>(
    store: &S,
    owner: Uuid,
    id: Uuid,
    patch: EventPatch,
) -> ServiceResult<StoredEvent> {
    let mut stored = store.get_event(owner, id)?;
    patch.apply(&mut stored.event);
    stored.updated_at = Utc::now();
    validate(&stored)?;
    store.replace_event(stored.clone())?;

    tracing::info!(event_id = %id, "Event updated");
    Ok(stored)
}

/// ## Errors
/// `NotFound` unless the owner has this event.
#[tracing::instrument(skip(store))]
pub fn delete_event<S: EventStore + ?Sized>(store: &S, owner: Uuid, id: Uuid) -> ServiceResult<()> {
    store.delete_event(owner, id)?;
    tracing::info!(event_id = %id, "Event deleted");
    Ok(())
}
