//! Areas and information rings: named, colored groupings of places.

use mudmap_core::Color;
use serde::{Deserialize, Serialize};

/// A named region of the world, such as a town or a dungeon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    /// Display name.
    pub name: String,
    /// Fill color used for member places.
    pub color: Color,
}

impl Area {
    /// An area with the given name and color.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// A danger or status classification drawn as a ring around a place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfoRing {
    /// What the ring means.
    pub description: String,
    /// Ring color.
    pub color: Color,
}

impl InfoRing {
    /// A ring with the given description and color.
    pub fn new(description: impl Into<String>, color: Color) -> Self {
        Self {
            description: description.into(),
            color,
        }
    }

    /// The rings a new world starts with, from harmless to deadly.
    pub fn defaults() -> Vec<InfoRing> {
        vec![
            Self::new("not evaluated", Color::rgb(128, 128, 128)),
            Self::new("safe", Color::rgb(0, 160, 0)),
            Self::new("mobs don't attack", Color::rgb(220, 220, 0)),
            Self::new("mobs attack", Color::rgb(240, 130, 0)),
            Self::new("deadly", Color::rgb(200, 0, 0)),
        ]
    }
}
