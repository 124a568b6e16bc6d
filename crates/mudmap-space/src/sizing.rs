//! Quadtree root construction modes.

use crate::error::SpaceError;

/// Default root half-extent: large enough that an auto-sized root never
/// has to grow for any map an editor will realistically hold.
pub const DEFAULT_HALF_EXTENT: u32 = 1 << 30;

/// How a [`QuadTree`](crate::QuadTree) sizes its root node.
///
/// # Examples
///
/// ```
/// use mudmap_space::{QuadTree, RootSizing};
///
/// // A loader that knows the persisted root center pins it up front.
/// let sizing = RootSizing::Fixed { center_x: 100, center_y: -40, half_extent: 1 << 20 };
/// let mut tree = QuadTree::with_sizing(sizing).unwrap();
/// tree.insert("gate", 101, -40).unwrap();
/// assert_eq!(tree.root_geometry(), Some((100, -40, 1 << 20)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootSizing {
    /// Create the root lazily, centered on the first inserted coordinate.
    Auto {
        /// Half-extent of the root once created.
        half_extent: u32,
    },
    /// Create the root eagerly at a known center.
    Fixed {
        /// Root center column.
        center_x: i32,
        /// Root center row.
        center_y: i32,
        /// Half-extent of the root.
        half_extent: u32,
    },
}

impl RootSizing {
    /// A fixed root at `(center_x, center_y)` with the default half-extent.
    pub fn centered(center_x: i32, center_y: i32) -> Self {
        Self::Fixed {
            center_x,
            center_y,
            half_extent: DEFAULT_HALF_EXTENT,
        }
    }

    /// The configured root half-extent.
    pub fn half_extent(&self) -> u32 {
        match *self {
            Self::Auto { half_extent } | Self::Fixed { half_extent, .. } => half_extent,
        }
    }

    /// Check that the half-extent is a power of two in `[1, 2^30]`.
    ///
    /// Power-of-two extents keep every synthesised node aligned to the
    /// root's subdivision grid, which is what lets splits be computed by
    /// repeated halving.
    pub fn validate(&self) -> Result<(), SpaceError> {
        let half_extent = self.half_extent();
        if !half_extent.is_power_of_two() || half_extent > DEFAULT_HALF_EXTENT {
            return Err(SpaceError::InvalidRootSizing { half_extent });
        }
        Ok(())
    }
}

impl Default for RootSizing {
    fn default() -> Self {
        Self::Auto {
            half_extent: DEFAULT_HALF_EXTENT,
        }
    }
}
