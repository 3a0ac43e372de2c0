//! Viewport-safe tooltip placement.
//!
//! [`PlacementEngine::place`] is a pure function of its inputs. Overflow never
//! produces an error: it walks a fixed fallback ladder and, as a last resort,
//! centers. The returned rectangle always lies inside the viewport whenever
//! the tooltip is no larger than the viewport itself.
//!
//! Ladder for a target in the page body:
//!
//! 1. the preferred side,
//! 2. the opposite side, then the two perpendicular sides,
//! 3. centered in the viewport.
//!
//! Ladder for a target inside a floating container:
//!
//! 1. the preferred side, relative to the target,
//! 2. outside the container: right, then left, then below,
//! 3. centered below the container.
//!
//! A side "fits" when the tooltip fits along that side's main axis; the cross
//! axis is then shifted back inside the viewport.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, Rect, Size},
    models::Side,
};

/// Gap between a tooltip and the box it points at.
pub const DEFAULT_MARGIN: f64 = 24.0;
/// Minimum distance kept from the viewport edges.
pub const DEFAULT_EDGE_PADDING: f64 = 16.0;

/// Inputs to one placement computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub target: Option<Rect>,
    pub container: Option<Rect>,
    pub side: Side,
    pub tooltip: Size,
    pub viewport: Size,
}

/// Which rung of the fallback ladder produced a placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStage {
    /// The requested side fitted
    Preferred,
    /// Another side of the target fitted
    Flipped,
    /// Placed beside the target's container
    OutsideContainer,
    /// Centered under the target's container
    BelowContainer,
    /// Centered in the viewport or container
    Centered,
}

/// Computed tooltip position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    /// Left edge of the tooltip
    pub x: f64,
    /// Top edge of the tooltip
    pub y: f64,
    /// Side of the reference box the tooltip is attached to; `Center` when
    /// it is not attached to anything
    pub anchor: Side,
    pub stage: PlacementStage,
}

impl Placement {
    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// The tooltip's rectangle for a given size.
    pub fn rect(&self, tooltip: Size) -> Rect {
        Rect::from_origin(self.origin(), tooltip)
    }
}

/// Placement calculator configured with margin and edge padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementEngine {
    margin: f64,
    edge_padding: f64,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN, DEFAULT_EDGE_PADDING)
    }
}

impl PlacementEngine {
    pub fn new(margin: f64, edge_padding: f64) -> Self {
        Self {
            margin: margin.max(0.0),
            edge_padding: edge_padding.max(0.0),
        }
    }

    /// Computes where the tooltip goes.
    pub fn place(&self, request: &PlacementRequest) -> Placement {
        let PlacementRequest {
            target,
            container,
            side,
            tooltip,
            viewport,
        } = *request;

        let Some(target) = target else {
            return self.centered(container, tooltip, viewport);
        };
        if side == Side::Center {
            return self.centered(container, tooltip, viewport);
        }

        if let Some(origin) = self.try_side(&target, side, tooltip, viewport) {
            return Self::placement(origin, side, PlacementStage::Preferred);
        }

        match container {
            Some(container) => {
                for candidate in [Side::Right, Side::Left, Side::Bottom] {
                    if let Some(origin) = self.try_side(&container, candidate, tooltip, viewport) {
                        return Self::placement(origin, candidate, PlacementStage::OutsideContainer);
                    }
                }
                let origin = Point {
                    x: self.clamp(container.center_x() - tooltip.width / 2.0, tooltip.width, viewport.width),
                    y: self.clamp(container.bottom() + self.margin, tooltip.height, viewport.height),
                };
                Self::placement(origin, Side::Bottom, PlacementStage::BelowContainer)
            }
            None => {
                for candidate in side.fallbacks() {
                    if let Some(origin) = self.try_side(&target, candidate, tooltip, viewport) {
                        return Self::placement(origin, candidate, PlacementStage::Flipped);
                    }
                }
                self.centered(None, tooltip, viewport)
            }
        }
    }

    fn placement(origin: Point, anchor: Side, stage: PlacementStage) -> Placement {
        Placement {
            x: origin.x,
            y: origin.y,
            anchor,
            stage,
        }
    }

    fn centered(&self, container: Option<Rect>, tooltip: Size, viewport: Size) -> Placement {
        let frame = container.unwrap_or(Rect::new(0.0, 0.0, viewport.width, viewport.height));
        let origin = Point {
            x: self.clamp(frame.center_x() - tooltip.width / 2.0, tooltip.width, viewport.width),
            y: self.clamp(frame.center_y() - tooltip.height / 2.0, tooltip.height, viewport.height),
        };
        Self::placement(origin, Side::Center, PlacementStage::Centered)
    }

    /// Places the tooltip on `side` of `reference` if the main axis fits.
    fn try_side(&self, reference: &Rect, side: Side, tooltip: Size, viewport: Size) -> Option<Point> {
        let (main, cross) = match side {
            Side::Top => (reference.top - self.margin - tooltip.height, reference.center_x() - tooltip.width / 2.0),
            Side::Bottom => (reference.bottom() + self.margin, reference.center_x() - tooltip.width / 2.0),
            Side::Left => (reference.left - self.margin - tooltip.width, reference.center_y() - tooltip.height / 2.0),
            Side::Right => (reference.right() + self.margin, reference.center_y() - tooltip.height / 2.0),
            Side::Center => return None,
        };

        match side {
            Side::Top | Side::Bottom => {
                self.fits(main, tooltip.height, viewport.height).then(|| Point {
                    x: self.clamp(cross, tooltip.width, viewport.width),
                    y: main,
                })
            }
            _ => self.fits(main, tooltip.width, viewport.width).then(|| Point {
                x: main,
                y: self.clamp(cross, tooltip.height, viewport.height),
            }),
        }
    }

    fn fits(&self, position: f64, size: f64, extent: f64) -> bool {
        position >= self.edge_padding && position + size <= extent - self.edge_padding
    }

    /// Shifts `position` so `[position, position + size]` stays on screen.
    fn clamp(&self, position: f64, size: f64, extent: f64) -> f64 {
        let min = self.edge_padding;
        let max = extent - size - self.edge_padding;
        if max >= min {
            position.clamp(min, max)
        } else if size <= extent {
            (extent - size) / 2.0
        } else {
            0.0
        }
    }
}
