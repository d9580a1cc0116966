//! Validated records accepted by the stores.
//!
//! These are the normalized counterparts of the wire drafts/patches: category
//! names resolved to the closed enum, times parsed, blanks collapsed to
//! `None`. Only the mutation validators construct them, so a store never sees
//! an unchecked payload.

use chrono::NaiveDate;
use itinera_protocol::{Category, EventTime};

/// A validated day creation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDay {
    /// Display label.
    pub label: String,
    /// 1-based position among the itinerary's days.
    pub day_number: u32,
}

/// A validated event creation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// 0-based sort key within the day.
    pub order_index: u32,
    /// Display label.
    pub label: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category.
    pub category: Option<Category>,
    /// Optional image URL or uploaded-asset path.
    pub image: Option<String>,
    /// Optional start time.
    pub start_time: Option<EventTime>,
    /// Optional end time.
    pub end_time: Option<EventTime>,
}

/// A validated partial event update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    /// New label, if supplied.
    pub label: Option<String>,
    /// New description, if supplied.
    pub description: Option<String>,
    /// New category, if supplied.
    pub category: Option<Category>,
    /// New image, if supplied.
    pub image: Option<String>,
    /// New start time, if supplied.
    pub start_time: Option<EventTime>,
    /// New end time, if supplied.
    pub end_time: Option<EventTime>,
}

impl EventUpdate {
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

/// A validated partial itinerary update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItineraryUpdate {
    /// New title, if supplied.
    pub title: Option<String>,
    /// New description, if supplied.
    pub description: Option<String>,
    /// New start date, if supplied.
    pub start_date: Option<NaiveDate>,
    /// New end date, if supplied.
    pub end_date: Option<NaiveDate>,
}
