//! Domain types shared between the synchronizer and its stores.

use crate::ids::{DayId, EventId, ItineraryId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A sight or point of interest.
    Landmark,
    /// A restaurant, cafe or meal stop.
    Food,
    /// A hotel or other lodging.
    Accommodation,
    /// A guided tour, hike or similar activity.
    Activity,
    /// A flight, train, bus or transfer.
    Transport,
    /// A show, concert or nightlife stop.
    Entertainment,
    /// A market or shopping stop.
    Shopping,
    /// A museum, gallery or exhibition.
    Art,
    /// Downtime: spa, beach, park.
    Relax,
    /// Anything that fits none of the above.
    Other,
}

impl Category {
    /// All categories, in wire order. Used to build validation messages.
    pub const ALL: [Category; 10] = [
        Category::Landmark,
        Category::Food,
        Category::Accommodation,
        Category::Activity,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Art,
        Category::Relax,
        Category::Other,
    ];

    /// The lowercase wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Landmark => "landmark",
            Category::Food => "food",
            Category::Accommodation => "accommodation",
            Category::Activity => "activity",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Art => "art",
            Category::Relax => "relax",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// A wall-clock time of day in `HH:MM` form.
///
/// Parsing accepts one- or two-digit hours and minutes (`9:5` is `09:05`);
/// the serialized form is always zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventTime {
    hour: u8,
    minute: u8,
}

impl EventTime {
    /// Creates a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ParseTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ParseTimeError(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    /// Hour component (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute component (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }
}

/// Error returned when a string is not a valid `HH:MM` time.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid HH:MM time: {0}")]
pub struct ParseTimeError(pub String);

impl FromStr for EventTime {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        if h.is_empty() || h.len() > 2 || m.is_empty() || m.len() > 2 {
            return Err(err());
        }
        let hour: u8 = h.parse().map_err(|_| err())?;
        let minute: u8 = m.parse().map_err(|_| err())?;
        EventTime::new(hour, minute).map_err(|_| err())
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for EventTime {
    type Error = ParseTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventTime> for String {
    fn from(value: EventTime) -> Self {
        value.to_string()
    }
}

/// An itinerary, as far as the synchronizer cares about it.
///
/// The CRUD layer owns the full aggregate; the sync core only reads the date
/// range (to relabel days) and forwards `edit-itinerary` patches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Itinerary identifier.
    pub id: ItineraryId,
    /// Display title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
}

/// One day of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// Day identifier.
    pub id: DayId,
    /// Display label, derived from the day number and the itinerary start
    /// date (e.g. `Day 2 - Tuesday, March 5`).
    pub label: String,
    /// 1-based position among the itinerary's days. Stays contiguous after
    /// any delete.
    pub day_number: u32,
}

/// One event within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// The day this event belongs to.
    pub day_id: DayId,
    /// 0-based sort key within the day. Unique per day; for a settled day the
    /// set of indices is exactly `{0..n-1}`.
    pub order_index: u32,
    /// Display label.
    pub label: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Optional image: a URL or an uploaded-asset path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<EventTime>,
    /// Optional end time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<EventTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trip() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn category_rejects_unknown() {
        let err = "sightseeing".parse::<Category>().unwrap_err();
        assert_eq!(err, ParseCategoryError("sightseeing".into()));
    }

    #[test]
    fn category_wire_name_is_lowercase() {
        let json = serde_json::to_string(&Category::Accommodation).unwrap();
        assert_eq!(json, "\"accommodation\"");
    }

    #[test]
    fn time_parses_unpadded() {
        let t: EventTime = "9:5".parse().unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "09:05");
    }

    #[test]
    fn time_rejects_out_of_range() {
        assert!("24:00".parse::<EventTime>().is_err());
        assert!("12:60".parse::<EventTime>().is_err());
        assert!("noon".parse::<EventTime>().is_err());
        assert!("123:00".parse::<EventTime>().is_err());
        assert!(":30".parse::<EventTime>().is_err());
    }

    #[test]
    fn time_serde_uses_padded_string() {
        let t: EventTime = "7:30".parse().unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:30\"");

        let back: EventTime = serde_json::from_str("\"07:30\"").unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn event_omits_absent_optionals() {
        let event = Event {
            id: EventId::generate(),
            day_id: DayId::generate(),
            order_index: 0,
            label: "Louvre".into(),
            description: None,
            category: Some(Category::Art),
            image: None,
            start_time: None,
            end_time: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("startTime").is_none());
        assert_eq!(json["category"], "art");
        assert_eq!(json["orderIndex"], 0);
    }
}
