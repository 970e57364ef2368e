/// Declares a 64-bit Snowflake layout and implements [`SnowflakeId`] for it.
///
/// Fields are packed most-significant first: reserved, timestamp, machine ID,
/// sequence. The widths must add up to 64; this is checked at compile time.
///
/// ```text
///  Bit Index:  63                                                      0
///              +--------------+---------------+----------------+--------------+
///  Field:      | reserved (R) | timestamp (T) | machine ID (M) | sequence (S) |
///              +--------------+---------------+----------------+--------------+
///              |<------------ MSB ---------- 64 bits ---------- LSB --------->|
/// ```
///
/// ## Example
///
/// ```
/// use blog_id::{define_snowflake_id, SnowflakeId};
///
/// define_snowflake_id!(
///     /// 42-bit timestamp, 6-bit machine, 16-bit sequence.
///     WideSequenceId,
///     reserved: 0,
///     timestamp: 42,
///     machine_id: 6,
///     sequence: 16
/// );
///
/// assert_eq!(WideSequenceId::max_sequence(), 65_535);
/// ```
///
/// [`SnowflakeId`]: crate::SnowflakeId
#[macro_export]
macro_rules! define_snowflake_id {
    (
        $(#[$meta:meta])*
        $name:ident,
        reserved: $reserved_bits:expr,
        timestamp: $timestamp_bits:expr,
        machine_id: $machine_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            id: u64,
        }

        const _: () = {
            assert!(
                $reserved_bits + $timestamp_bits + $machine_bits + $sequence_bits == u64::BITS,
                "Snowflake layout must cover exactly 64 bits"
            );
        };

        impl $name {
            pub const SEQUENCE_SHIFT: u32 = 0;
            pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + $sequence_bits;
            pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_SHIFT + $machine_bits;

            pub const TIMESTAMP_MASK: u64 = (1 << $timestamp_bits) - 1;
            pub const MACHINE_ID_MASK: u64 = (1 << $machine_bits) - 1;
            pub const SEQUENCE_MASK: u64 = (1 << $sequence_bits) - 1;

            /// Every bit that belongs to a field. Anything outside is reserved.
            pub const LAYOUT_MASK: u64 = (Self::TIMESTAMP_MASK << Self::TIMESTAMP_SHIFT)
                | (Self::MACHINE_ID_MASK << Self::MACHINE_ID_SHIFT)
                | (Self::SEQUENCE_MASK << Self::SEQUENCE_SHIFT);

            /// Packs the fields, truncating each to its width.
            pub const fn from(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
                let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
                let m = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
                let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self { id: t | m | s }
            }

            /// Extracts the timestamp from the packed ID.
            pub const fn timestamp(&self) -> u64 {
                (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
            }

            /// Extracts the machine ID from the packed ID.
            pub const fn machine_id(&self) -> u64 {
                (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
            }

            /// Extracts the sequence number from the packed ID.
            pub const fn sequence(&self) -> u64 {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            /// Returns the packed value.
            pub const fn to_raw(&self) -> u64 {
                self.id
            }
        }

        impl $crate::SnowflakeId for $name {
            const RESERVED_BITS: u32 = $reserved_bits;
            const TIMESTAMP_BITS: u32 = $timestamp_bits;
            const MACHINE_ID_BITS: u32 = $machine_bits;
            const SEQUENCE_BITS: u32 = $sequence_bits;

            fn timestamp(&self) -> u64 {
                self.timestamp()
            }

            fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            fn machine_id(&self) -> u64 {
                self.machine_id()
            }

            fn max_machine_id() -> u64 {
                Self::MACHINE_ID_MASK
            }

            fn sequence(&self) -> u64 {
                self.sequence()
            }

            fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }

            fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
                debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
                debug_assert!(machine_id <= Self::MACHINE_ID_MASK, "machine_id overflow");
                debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
                Self::from(timestamp, machine_id, sequence)
            }

            fn to_raw(&self) -> u64 {
                self.id
            }

            fn from_raw(raw: u64) -> Self {
                Self { id: raw }
            }

            fn is_valid(&self) -> bool {
                self.id & !Self::LAYOUT_MASK == 0
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.to_raw()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let full = core::any::type_name::<Self>();
                let name = full.rsplit("::").next().unwrap_or(full);
                f.debug_struct(name)
                    .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
                    .field("timestamp", &self.timestamp())
                    .field("machine_id", &self.machine_id())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }
    };
}

define_snowflake_id!(
    /// The primary key layout used by every blog entity.
    ///
    /// - 1 bit reserved (always zero, so the value also fits a signed
    ///   `BIGINT` column)
    /// - 41 bits timestamp (ms since the generator's custom epoch, roughly
    ///   69 years of range)
    /// - 10 bits machine ID (1024 nodes)
    /// - 12 bits sequence (4096 IDs per millisecond per node)
    ///
    /// ```text
    ///  Bit Index:  63           63 62            22 21             12 11             0
    ///              +--------------+----------------+-----------------+---------------+
    ///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
    ///              +--------------+----------------+-----------------+---------------+
    ///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
    /// ```
    BlogId,
    reserved: 1,
    timestamp: 41,
    machine_id: 10,
    sequence: 12
);
