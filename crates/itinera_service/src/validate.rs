//! Mutation validators.
//!
//! Pure functions that check and normalize incoming payloads: required
//! fields, the closed category enumeration, `HH:MM` times (blank collapses to
//! absent), and image shapes. A successful validation yields the typed record
//! the corresponding store accepts.

use crate::error::{ServiceError, ServiceResult};
use itinera_protocol::{
    Category, DayDraft, EventDraft, EventPatch, EventTime, ItineraryPatch,
};
use itinera_store::{EventUpdate, ItineraryUpdate, NewDay, NewEvent};

/// Validates a day creation payload.
pub fn validate_day(draft: &DayDraft) -> ServiceResult<NewDay> {
    let label = draft.label.trim();
    if label.is_empty() {
        return Err(ServiceError::InvalidInput("day label is required".into()));
    }
    if draft.day_number == 0 {
        return Err(ServiceError::InvalidInput(
            "day number must be 1 or greater".into(),
        ));
    }
    Ok(NewDay {
        label: label.to_string(),
        day_number: draft.day_number,
    })
}

/// Validates an event creation payload.
pub fn validate_event(draft: &EventDraft) -> ServiceResult<NewEvent> {
    let label = draft.label.trim();
    if label.is_empty() {
        return Err(ServiceError::InvalidInput("event label is required".into()));
    }
    Ok(NewEvent {
        order_index: draft.order_index,
        label: label.to_string(),
        description: draft.description.clone(),
        category: parse_category(draft.category.as_deref())?,
        image: validate_image(draft.image.as_deref())?,
        start_time: parse_time("startTime", draft.start_time.as_deref())?,
        end_time: parse_time("endTime", draft.end_time.as_deref())?,
    })
}

/// Validates a partial event update. Only supplied fields are checked.
pub fn validate_event_patch(patch: &EventPatch) -> ServiceResult<EventUpdate> {
    let label = match &patch.label {
        Some(label) if label.trim().is_empty() => {
            return Err(ServiceError::InvalidInput(
                "event label must not be blank".into(),
            ));
        }
        Some(label) => Some(label.trim().to_string()),
        None => None,
    };
    Ok(EventUpdate {
        label,
        description: patch.description.clone(),
        category: parse_category(patch.category.as_deref())?,
        image: validate_image(patch.image.as_deref())?,
        start_time: parse_time("startTime", patch.start_time.as_deref())?,
        end_time: parse_time("endTime", patch.end_time.as_deref())?,
    })
}

/// Validates a partial itinerary update. Only supplied fields are checked.
pub fn validate_itinerary_patch(patch: &ItineraryPatch) -> ServiceResult<ItineraryUpdate> {
    let title = match &patch.title {
        Some(title) if title.trim().is_empty() => {
            return Err(ServiceError::InvalidInput(
                "itinerary title must not be blank".into(),
            ));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };
    if let (Some(start), Some(end)) = (patch.start_date, patch.end_date) {
        if end < start {
            return Err(ServiceError::InvalidInput(
                "itinerary end date must not precede its start date".into(),
            ));
        }
    }
    Ok(ItineraryUpdate {
        title,
        description: patch.description.clone(),
        start_date: patch.start_date,
        end_date: patch.end_date,
    })
}

fn parse_category(raw: Option<&str>) -> ServiceResult<Option<Category>> {
    match raw {
        None => Ok(None),
        Some(name) => name.parse::<Category>().map(Some).map_err(|_| {
            let allowed: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
            ServiceError::InvalidInput(format!(
                "event category must be one of: {}",
                allowed.join(", ")
            ))
        }),
    }
}

fn parse_time(field: &str, raw: Option<&str>) -> ServiceResult<Option<EventTime>> {
    match raw {
        // A blank time normalizes to not-supplied; on the patch path the
        // stored time is left untouched.
        None | Some("") => Ok(None),
        Some(value) => value.parse::<EventTime>().map(Some).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "event {field} must be a valid time in HH:MM format"
            ))
        }),
    }
}

fn validate_image(raw: Option<&str>) -> ServiceResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(value)
            if value.starts_with("http://")
                || value.starts_with("https://")
                || value.starts_with("/images/") =>
        {
            Ok(Some(value.to_string()))
        }
        Some(_) => Err(ServiceError::InvalidInput(
            "event image must be a URL or an uploaded-asset path".into(),
        )),
    }
}
