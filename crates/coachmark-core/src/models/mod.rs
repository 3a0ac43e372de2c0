//! Data models for tours and steps.
//!
//! A [`Tour`] is the declarative description of one walkthrough: an ordered
//! list of [`Step`]s plus the effects that run when it completes. Each
//! concrete walkthrough is nothing more than a `Tour` value; all behavior
//! lives in [`crate::engine`]. Display implementations for these models are
//! located in [`crate::display`].
//!
//! # Examples
//!
//! ```rust
//! use coachmark_core::models::{Side, Step, Tour};
//!
//! let tour = Tour::builder("welcome", "Welcome")
//!     .step(Step::new("hello", "Hello", "A quick look around."))
//!     .step(
//!         Step::new("create", "Create", "Click here to create a decision.")
//!             .at("btn-create", Side::Bottom)
//!             .on_target_click(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tour.len(), 2);
//! assert!(tour.steps()[1].terminal);
//! ```

pub mod side;
pub mod state;
pub mod step;
pub mod summary;
pub mod tour;

#[cfg(test)]
mod tests;

pub use side::Side;
pub use state::TourState;
pub use step::{Completion, FieldPredicate, SideEffect, Step};
pub use summary::TourSummary;
pub use tour::{Tour, TourBuilder};
