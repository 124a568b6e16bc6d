//! Strongly-typed identifiers, the per-world [`IdAllocator`], and [`Location`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::error::CoreError;

/// An identifier drawn from a monotonic `u32` sequence.
///
/// Implemented by every id kind that an [`IdAllocator`] hands out.
pub trait SequentialId: Copy + Eq + fmt::Debug {
    /// Human-readable name of the id kind, used in error messages.
    const KIND: &'static str;

    /// Wrap a raw sequence number.
    fn from_raw(raw: u32) -> Self;

    /// The raw sequence number.
    fn raw(self) -> u32;
}

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }

        impl SequentialId for $name {
            const KIND: &'static str = $kind;

            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

sequential_id!(
    /// Identifies a place (room) within a world.
    ///
    /// Unique across every layer of one world and independent of the
    /// place's coordinate: moving a place never changes its id.
    PlaceId,
    "place"
);

sequential_id!(
    /// Identifies a grid layer (map) within a world.
    LayerId,
    "layer"
);

sequential_id!(
    /// Identifies an area (named, colored place group) within a world.
    AreaId,
    "area"
);

sequential_id!(
    /// Identifies an information ring within a world.
    RingId,
    "ring"
);

/// Monotonic id source owned by a single world.
///
/// Each world keeps one allocator per id kind, so two worlds in the same
/// process never interfere. Loaders push the counter past persisted ids
/// with [`reserve`](Self::reserve) or set it outright with
/// [`reseed`](Self::reseed).
///
/// # Examples
///
/// ```
/// use mudmap_core::{IdAllocator, PlaceId};
///
/// let mut ids = IdAllocator::<PlaceId>::new();
/// assert_eq!(ids.allocate().unwrap(), PlaceId(1));
///
/// // A loaded place carried id 40: the next fresh id must not collide.
/// ids.reserve(PlaceId(40)).unwrap();
/// assert_eq!(ids.allocate().unwrap(), PlaceId(41));
/// ```
#[derive(Debug)]
pub struct IdAllocator<I> {
    next: u32,
    _kind: PhantomData<fn() -> I>,
}

impl<I> Clone for IdAllocator<I> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            _kind: PhantomData,
        }
    }
}

impl<I: SequentialId> IdAllocator<I> {
    /// First id handed out by a fresh allocator.
    pub const FIRST: u32 = 1;

    /// Create an allocator whose first id is [`FIRST`](Self::FIRST).
    pub fn new() -> Self {
        Self {
            next: Self::FIRST,
            _kind: PhantomData,
        }
    }

    /// Hand out the next id.
    pub fn allocate(&mut self) -> Result<I, CoreError> {
        if self.next == u32::MAX {
            return Err(CoreError::IdSpaceExhausted { kind: I::KIND });
        }
        let id = I::from_raw(self.next);
        self.next += 1;
        Ok(id)
    }

    /// Ensure `id` is never handed out by [`allocate`](Self::allocate).
    ///
    /// Moves the counter to `id + 1` if it is not already past it.
    pub fn reserve(&mut self, id: I) -> Result<(), CoreError> {
        let raw = id.raw();
        if raw == u32::MAX {
            return Err(CoreError::IdSpaceExhausted { kind: I::KIND });
        }
        if raw >= self.next {
            self.next = raw + 1;
        }
        Ok(())
    }

    /// Set the next id explicitly.
    pub fn reseed(&mut self, next: u32) {
        self.next = next;
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl<I: SequentialId> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A grid address: layer plus integer coordinate.
///
/// `(layer, x, y)` is the stable addressing scheme persisted for every
/// place. Positive `y` points north, positive `x` points east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The layer the coordinate belongs to.
    pub layer: LayerId,
    /// Column, growing eastward.
    pub x: i32,
    /// Row, growing northward.
    pub y: i32,
}

impl Location {
    /// Construct a location.
    pub fn new(layer: LayerId, x: i32, y: i32) -> Self {
        Self { layer, x, y }
    }

    /// The same layer, shifted by `(dx, dy)`.
    ///
    /// Returns `None` if either axis overflows `i32`.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            layer: self.layer,
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Chebyshev distance to `other`, or `None` across layers.
    pub fn chebyshev(self, other: Location) -> Option<u32> {
        if self.layer != other.layer {
            return None;
        }
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        Some(dx.max(dy).min(u32::MAX as u64) as u32)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {} ({}, {})", self.layer, self.x, self.y)
    }
}
