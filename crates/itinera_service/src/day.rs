//! Day mutations: validation, persistence orchestration, renumbering.

use crate::error::{ServiceError, ServiceResult};
use crate::validate::validate_day;
use chrono::{Days, NaiveDate};
use itinera_protocol::{Day, DayDraft, DayId, ItineraryId};
use itinera_store::DayStore;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates day mutations: validate, persist, return the normalized row.
#[derive(Clone)]
pub struct DayService {
    store: Arc<dyn DayStore>,
}

impl DayService {
    /// Creates a day service over the given store.
    pub fn new(store: Arc<dyn DayStore>) -> Self {
        Self { store }
    }

    /// Validates and persists a new day, returning it with its generated id.
    pub async fn add_day(
        &self,
        itinerary_id: ItineraryId,
        draft: &DayDraft,
    ) -> ServiceResult<Day> {
        let day = validate_day(draft)?;
        let created = self.store.add_day(itinerary_id, day).await?;
        debug!(%itinerary_id, day_id = %created.id, "day created");
        Ok(created)
    }

    /// Deletes a day.
    ///
    /// Remaining days are NOT renumbered here; the coordinator recomputes
    /// numbers and labels and issues the bulk [`update_days`](Self::update_days).
    pub async fn delete_day(&self, day_id: DayId) -> ServiceResult<()> {
        if !self.store.delete_day(day_id).await? {
            return Err(ServiceError::NotFound(format!("day {day_id} not found")));
        }
        debug!(%day_id, "day deleted");
        Ok(())
    }

    /// Bulk-persists label and day number for each given day. No-op on empty
    /// input.
    pub async fn update_days(&self, days: &[Day]) -> ServiceResult<()> {
        if days.is_empty() {
            return Ok(());
        }
        self.store.update_days(days).await?;
        Ok(())
    }
}

/// Renumbers and relabels the given days against the itinerary start date.
///
/// The days are taken in display order: position `i` becomes day `i + 1`,
/// dated `start_date + i`, with a label derived from both. Original labels
/// are discarded; this is what keeps day numbers contiguous after a delete.
pub fn renumber_days(start_date: NaiveDate, days: &[Day]) -> Vec<Day> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let number = i as u32 + 1;
            let date = start_date
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(start_date);
            Day {
                id: day.id,
                label: format!("Day {} - {}", number, date.format("%A, %B %-d")),
                day_number: number,
            }
        })
        .collect()
}
