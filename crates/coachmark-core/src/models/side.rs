//! Preferred tooltip side relative to a target.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of tooltip sides.
///
/// `Center` ignores the target and centers on the viewport (or the target's
/// container, when it lives inside one).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    /// Default for targeted steps
    #[default]
    Bottom,
    Left,
    Right,
    Center,
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "center" | "centre" => Ok(Side::Center),
            _ => Err(format!("Invalid side: {s}")),
        }
    }
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
            Side::Center => "center",
        }
    }

    /// The side across the target from this one.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Center => Side::Center,
        }
    }

    /// Sides tried, in order, when this side overflows the viewport.
    pub fn fallbacks(&self) -> [Side; 3] {
        match self {
            Side::Right => [Side::Left, Side::Bottom, Side::Top],
            Side::Left => [Side::Right, Side::Bottom, Side::Top],
            Side::Top => [Side::Bottom, Side::Right, Side::Left],
            Side::Bottom | Side::Center => [Side::Top, Side::Right, Side::Left],
        }
    }
}
