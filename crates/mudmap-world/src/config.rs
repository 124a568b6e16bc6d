//! World configuration, display settings, and their validation.
//!
//! [`WorldConfig`] is the input to [`WorldGraph::with_config`](crate::WorldGraph::with_config).
//! [`validate()`](WorldConfig::validate) checks it before any layer is
//! built, so a bad root sizing is reported once instead of on every
//! lazily created layer.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use mudmap_core::{Color, Exit};
use mudmap_space::{RootSizing, SpaceError};
use serde::{Deserialize, Serialize};

// ── ShowPlaceId ────────────────────────────────────────────────────

/// When a renderer should print a place's id next to its name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowPlaceId {
    /// Never show ids.
    None,
    /// Show the id only when another place shares the name.
    #[default]
    Unique,
    /// Always show ids.
    Always,
}

// ── WorldSettings ──────────────────────────────────────────────────

/// Per-world display settings carried alongside the map data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Path color overrides keyed by the exit a path leaves through.
    pub path_colors: IndexMap<Exit, Color>,
    /// Color for paths with no override. Default: black.
    pub default_path_color: Color,
    /// Fill color for the center of each tile. Default: white.
    pub tile_center_color: Color,
    /// Id display policy. Default: [`ShowPlaceId::Unique`].
    pub show_place_id: ShowPlaceId,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            path_colors: IndexMap::new(),
            default_path_color: Color::BLACK,
            tile_center_color: Color::WHITE,
            show_place_id: ShowPlaceId::default(),
        }
    }
}

impl WorldSettings {
    /// The color for a path leaving through `exit`.
    pub fn path_color(&self, exit: Exit) -> Color {
        self.path_colors
            .get(&exit)
            .copied()
            .unwrap_or(self.default_path_color)
    }

    /// Check that no color is assigned to [`Exit::Unknown`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(&color) = self.path_colors.get(&Exit::Unknown) {
            return Err(ConfigError::ColorForUnknownExit { color });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`WorldConfig::validate()`] and
/// [`WorldSettings::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The world name is empty or whitespace.
    BlankName,
    /// A path color was assigned to the unknown exit.
    ColorForUnknownExit {
        /// The rejected color.
        color: Color,
    },
    /// The layer root sizing is invalid.
    Sizing(SpaceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankName => write!(f, "world name must not be blank"),
            Self::ColorForUnknownExit { color } => {
                write!(f, "path color {color} assigned to the unknown exit")
            }
            Self::Sizing(e) => write!(f, "root sizing: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sizing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Sizing(e)
    }
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Everything needed to build an empty [`WorldGraph`](crate::WorldGraph).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Display name of the world. Default: `"New World"`.
    pub name: String,
    /// Display settings.
    pub settings: WorldSettings,
    /// Root sizing for layers the world creates. Default: auto.
    pub root_sizing: RootSizing,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "New World".to_string(),
            settings: WorldSettings::default(),
            root_sizing: RootSizing::default(),
        }
    }
}

impl WorldConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::BlankName);
        }
        self.settings.validate()?;
        self.root_sizing.validate()?;
        Ok(())
    }
}
