//! What the host draws for the active step.
//!
//! A [`Frame`] is recomputed whenever the target may have moved and is the
//! only thing a host needs to render the coachmark: the tooltip position, the
//! pulsing hotspot, the spotlight cut-out and which controls are enabled.

use serde::Serialize;

use crate::{
    geometry::{Rect, Size},
    placement::Placement,
};

/// Minimum distance between the hotspot and the viewport edges.
const HOTSPOT_INSET: f64 = 8.0;

/// Pulsing indicator drawn beside the element the user should act on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Hotspot {
    /// Places the hotspot `offset` to the right of `rect`, vertically
    /// centered on it, kept inside the viewport.
    pub fn beside(rect: &Rect, viewport: Size, size: f64, offset: f64) -> Self {
        let max_x = (viewport.width - size - HOTSPOT_INSET).max(HOTSPOT_INSET);
        let max_y = (viewport.height - size - HOTSPOT_INSET).max(HOTSPOT_INSET);
        Self {
            x: (rect.right() + offset).clamp(HOTSPOT_INSET, max_x),
            y: (rect.center_y() - size / 2.0).clamp(HOTSPOT_INSET, max_y),
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

/// Which tooltip controls are enabled.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Controls {
    pub can_previous: bool,
    pub can_next: bool,
    /// Skip is offered by the step
    pub show_skip: bool,
    /// Skip is offered and its gate holds
    pub can_skip: bool,
    /// "Finish" on the last step, "Next" elsewhere
    pub next_label: &'static str,
}

impl Controls {
    pub fn next_label(is_last: bool) -> &'static str {
        if is_last {
            "Finish"
        } else {
            "Next"
        }
    }
}

/// Everything needed to render the active step.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Frame {
    pub tour_id: String,
    pub step_id: String,
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub body: String,
    pub tooltip: Placement,
    pub tooltip_size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
    /// Target box padded for the dimmed backdrop cut-out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotlight: Option<Rect>,
    pub controls: Controls,
    /// The target or action element never mounted; the tooltip is centered
    /// and Next is enabled as an escape hatch
    pub degraded: bool,
}

impl Frame {
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.index + 1, self.total)
    }

    /// Rectangle the tooltip occupies.
    pub fn tooltip_rect(&self) -> Rect {
        self.tooltip.rect(self.tooltip_size)
    }
}
