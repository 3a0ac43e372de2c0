//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use super::datetime::LocalDateTime;
use crate::{models::TourSummary, store::FlagRecord};

/// Newtype wrapper for displaying a catalog listing.
///
/// # Examples
///
/// ```rust
/// use coachmark_core::{display::TourSummaries, models::TourSummary};
///
/// let summaries = TourSummaries(vec![TourSummary {
///     id: "team-invite".to_string(),
///     title: "Invite your team".to_string(),
///     description: None,
///     total_steps: 3,
///     completed: true,
///     pending: false,
/// }]);
/// assert!(summaries.to_string().contains("(completed)"));
/// ```
pub struct TourSummaries(pub Vec<TourSummary>);

impl TourSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&TourSummary> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TourSummary> {
        self.0.iter()
    }
}

impl Index<usize> for TourSummaries {
    type Output = TourSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a TourSummaries {
    type Item = &'a TourSummary;
    type IntoIter = std::slice::Iter<'a, TourSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TourSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tours found.");
        }
        for tour in &self.0 {
            write!(f, "{tour}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying persisted flags.
pub struct FlagRecords(pub Vec<FlagRecord>);

impl FlagRecords {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagRecord> {
        self.0.iter()
    }
}

impl fmt::Display for FlagRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No flags stored.");
        }
        for record in &self.0 {
            writeln!(
                f,
                "- `{}` = {} (updated {})",
                record.key,
                record.value,
                LocalDateTime(&record.updated_at)
            )?;
        }
        Ok(())
    }
}
