//! Mutation payloads carried by client messages.
//!
//! Drafts and patches are deliberately loose: free-form strings where the
//! client may send anything (category names, `HH:MM` times, blank fields).
//! The mutation validators normalize them into the typed records the stores
//! accept, and reject them with `InvalidInput` otherwise.

use crate::ids::EventId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payload for creating a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDraft {
    /// Display label.
    pub label: String,
    /// 1-based position among the itinerary's days.
    pub day_number: u32,
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// 0-based sort key within the day.
    pub order_index: u32,
    /// Display label.
    pub label: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional category name; must match the closed enumeration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional image URL or uploaded-asset path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional `HH:MM` start time; blank normalizes to absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Optional `HH:MM` end time; blank normalizes to absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Partial update for an event. Only supplied fields are validated and
/// persisted; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New label, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New description, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category name, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New image, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// New `HH:MM` start time, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// New `HH:MM` end time, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl EventPatch {
    /// True when no field is supplied at all.
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

/// Partial update for an itinerary's own attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPatch {
    /// New title, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New start date, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// New end date, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// One entry of a reorder batch: an event and its new sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOrder {
    /// The event being repositioned.
    pub id: EventId,
    /// Its new 0-based index within the day.
    pub order_index: u32,
}
