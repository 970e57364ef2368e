/// The three fields of a Snowflake ID, unpacked.
///
/// `timestamp_ms` is relative to the generator's custom epoch, not the Unix
/// epoch. Use [`Epoch::to_system_time`] to turn it into an absolute time.
///
/// [`Epoch::to_system_time`]: crate::Epoch::to_system_time
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecodedId {
    pub timestamp_ms: u64,
    pub machine_id: u64,
    pub sequence: u64,
}
