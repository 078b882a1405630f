//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Vehicle and station ids are chosen
//! by the caller and must stay stable across rounds; waypoint ids are handed
//! out sequentially by the road-network builder.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
///
/// The string literal after `=` is the prefix used by `Display`
/// (`VehicleId(3)` prints as `EV3`).
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifier of an electric vehicle.  Unique and stable across rounds.
    pub struct VehicleId(u32) = "EV";
}

typed_id! {
    /// Identifier of a charging station.
    pub struct StationId(u32) = "S";
}

typed_id! {
    /// Index of a road-network waypoint (graph node).
    pub struct WaypointId(u32) = "W";
}
