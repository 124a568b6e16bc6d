//! The closed set of exit directions attached to each end of a path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Direction label on one end of a path.
///
/// The eight compass exits map onto the grid (north is `+y`, east is
/// `+x`) and onto the numeric keypad. `Up`, `Down` and `Unknown` are
/// non-cardinal: they have no grid offset and no keypad number, and are
/// left untouched by compass rotation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Exit {
    /// `n`
    #[serde(rename = "n")]
    North,
    /// `ne`
    #[serde(rename = "ne")]
    NorthEast,
    /// `e`
    #[serde(rename = "e")]
    East,
    /// `se`
    #[serde(rename = "se")]
    SouthEast,
    /// `s`
    #[serde(rename = "s")]
    South,
    /// `sw`
    #[serde(rename = "sw")]
    SouthWest,
    /// `w`
    #[serde(rename = "w")]
    West,
    /// `nw`
    #[serde(rename = "nw")]
    NorthWest,
    /// `u`
    #[serde(rename = "u")]
    Up,
    /// `d`
    #[serde(rename = "d")]
    Down,
    /// `-`: an exit with no direction.
    #[serde(rename = "-")]
    Unknown,
}

/// Compass exits in clockwise order starting at north.
const COMPASS: [Exit; 8] = [
    Exit::North,
    Exit::NorthEast,
    Exit::East,
    Exit::SouthEast,
    Exit::South,
    Exit::SouthWest,
    Exit::West,
    Exit::NorthWest,
];

impl Exit {
    /// Every exit, compass first.
    pub const ALL: [Exit; 11] = [
        Exit::North,
        Exit::NorthEast,
        Exit::East,
        Exit::SouthEast,
        Exit::South,
        Exit::SouthWest,
        Exit::West,
        Exit::NorthWest,
        Exit::Up,
        Exit::Down,
        Exit::Unknown,
    ];

    /// The persisted label (`"n"`, `"ne"`, ..., `"u"`, `"d"`, `"-"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::NorthEast => "ne",
            Self::East => "e",
            Self::SouthEast => "se",
            Self::South => "s",
            Self::SouthWest => "sw",
            Self::West => "w",
            Self::NorthWest => "nw",
            Self::Up => "u",
            Self::Down => "d",
            Self::Unknown => "-",
        }
    }

    /// Whether this is one of the eight compass exits.
    pub fn is_compass(self) -> bool {
        self.compass_index().is_some()
    }

    fn compass_index(self) -> Option<usize> {
        COMPASS.iter().position(|&e| e == self)
    }

    /// The exit facing the other way.
    ///
    /// Compass exits rotate by 180°, `Up` and `Down` swap, and `Unknown`
    /// stays `Unknown`.
    pub fn opposite(self) -> Exit {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Unknown => Self::Unknown,
            compass => compass.rotated(4),
        }
    }

    /// Rotate a compass exit clockwise by `eighths` steps of 45°.
    ///
    /// Negative steps rotate counter-clockwise. Non-compass exits are
    /// returned unchanged.
    pub fn rotated(self, eighths: i32) -> Exit {
        match self.compass_index() {
            Some(i) => COMPASS[(i as i32 + eighths).rem_euclid(8) as usize],
            None => self,
        }
    }

    /// Numeric keypad digit for a compass exit (`n` = 8, `sw` = 1, ...).
    pub fn numpad(self) -> Option<u8> {
        match self {
            Self::North => Some(8),
            Self::NorthEast => Some(9),
            Self::East => Some(6),
            Self::SouthEast => Some(3),
            Self::South => Some(2),
            Self::SouthWest => Some(1),
            Self::West => Some(4),
            Self::NorthWest => Some(7),
            Self::Up | Self::Down | Self::Unknown => None,
        }
    }

    /// Inverse of [`numpad`](Self::numpad).
    pub fn from_numpad(digit: u8) -> Option<Exit> {
        match digit {
            8 => Some(Self::North),
            9 => Some(Self::NorthEast),
            6 => Some(Self::East),
            3 => Some(Self::SouthEast),
            2 => Some(Self::South),
            1 => Some(Self::SouthWest),
            4 => Some(Self::West),
            7 => Some(Self::NorthWest),
            _ => None,
        }
    }

    /// Unit grid step `(dx, dy)` for a compass exit.
    pub fn offset(self) -> Option<(i32, i32)> {
        match self {
            Self::North => Some((0, 1)),
            Self::NorthEast => Some((1, 1)),
            Self::East => Some((1, 0)),
            Self::SouthEast => Some((1, -1)),
            Self::South => Some((0, -1)),
            Self::SouthWest => Some((-1, -1)),
            Self::West => Some((-1, 0)),
            Self::NorthWest => Some((-1, 1)),
            Self::Up | Self::Down | Self::Unknown => None,
        }
    }

    /// The compass exit pointing along `(dx, dy)`.
    ///
    /// Only the sign of each component matters. Returns `None` for the
    /// zero vector.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Exit> {
        match (dx.signum(), dy.signum()) {
            (0, 1) => Some(Self::North),
            (1, 1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, -1) => Some(Self::SouthEast),
            (0, -1) => Some(Self::South),
            (-1, -1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, 1) => Some(Self::NorthWest),
            _ => None,
        }
    }
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Exit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exit::ALL
            .iter()
            .copied()
            .find(|e| e.label() == s)
            .ok_or_else(|| CoreError::UnknownExit {
                label: s.to_string(),
            })
    }
}
