//! Tour summary model for listings.

use serde::Serialize;

use super::Tour;

/// One catalog entry together with its persisted completion flag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TourSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_steps: usize,
    pub completed: bool,
    /// Whether the pending slot names this tour
    pub pending: bool,
}

impl TourSummary {
    pub fn new(tour: &Tour, completed: bool, pending: bool) -> Self {
        Self {
            id: tour.id().to_string(),
            title: tour.title().to_string(),
            description: tour.description().map(str::to_string),
            total_steps: tour.len(),
            completed,
            pending,
        }
    }
}
