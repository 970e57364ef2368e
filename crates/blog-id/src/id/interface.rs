use core::{fmt, hash::Hash};

use crate::DecodedId;

/// A 64-bit Snowflake layout with separate timestamp, machine ID, and
/// sequence fields.
///
/// Layouts are declared with [`define_snowflake_id!`], which fixes the field
/// widths at compile time. Generators are generic over this trait so the
/// packing rules live in exactly one place.
///
/// # Example
///
/// ```
/// use blog_id::{BlogId, SnowflakeId};
///
/// let id = BlogId::from_components(5000, 1, 0);
/// assert_eq!(id.timestamp(), 5000);
/// assert_eq!(id.machine_id(), 1);
/// assert_eq!(id.sequence(), 0);
/// ```
///
/// [`define_snowflake_id!`]: crate::define_snowflake_id
pub trait SnowflakeId:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Number of always-zero high bits.
    const RESERVED_BITS: u32;
    /// Width of the timestamp field.
    const TIMESTAMP_BITS: u32;
    /// Width of the machine ID field.
    const MACHINE_ID_BITS: u32;
    /// Width of the sequence field.
    const SEQUENCE_BITS: u32;

    /// Returns the timestamp portion of the ID.
    fn timestamp(&self) -> u64;

    /// Returns the maximum possible value for the timestamp field.
    fn max_timestamp() -> u64;

    /// Returns the machine ID portion of the ID.
    fn machine_id(&self) -> u64;

    /// Returns the maximum possible value for the machine ID field.
    fn max_machine_id() -> u64;

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> u64;

    /// Returns the maximum possible value for the sequence field.
    fn max_sequence() -> u64;

    /// Packs the three fields into an ID.
    fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self;

    /// Converts this type into its raw representation.
    fn to_raw(&self) -> u64;

    /// Reinterprets a raw value as an ID without validation.
    fn from_raw(raw: u64) -> Self;

    /// Returns true if no reserved bits are set.
    fn is_valid(&self) -> bool;

    /// Returns true if the current sequence value can be incremented.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the next sequence value.
    fn next_sequence(&self) -> u64 {
        self.sequence() + 1
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.next_sequence())
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.machine_id(), 0)
    }

    /// Unpacks every field.
    fn decode(&self) -> DecodedId {
        DecodedId {
            timestamp_ms: self.timestamp(),
            machine_id: self.machine_id(),
            sequence: self.sequence(),
        }
    }
}
