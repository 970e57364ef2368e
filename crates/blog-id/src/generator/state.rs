use core::cmp::Ordering;

use crate::{Epoch, Error, Poll, Result, SnowflakeId, TimeSource};

/// Checks the construction-time configuration shared by every generator.
pub(crate) fn validate_config<ID: SnowflakeId>(
    machine_id: u64,
    epoch: Epoch,
    time: &impl TimeSource,
) -> Result<()> {
    if machine_id > ID::max_machine_id() {
        return Err(Error::InvalidMachineId {
            machine_id,
            max: ID::max_machine_id(),
        });
    }

    let now_ms = time.current_millis();
    if epoch.as_unix_millis() > now_ms {
        return Err(Error::EpochInFuture {
            epoch_ms: epoch.as_unix_millis(),
            now_ms,
        });
    }

    Ok(())
}

/// Converts a clock reading into the value of the timestamp field.
pub(crate) fn elapsed_millis<ID: SnowflakeId>(epoch: Epoch, now_unix_ms: u64) -> Result<u64> {
    let elapsed_ms = epoch
        .elapsed_at(now_unix_ms)
        .ok_or(Error::ClockBeforeEpoch {
            now_ms: now_unix_ms,
            epoch_ms: epoch.as_unix_millis(),
        })?;

    if elapsed_ms > ID::max_timestamp() {
        return Err(Error::TimestampOverflow {
            elapsed_ms,
            max: ID::max_timestamp(),
        });
    }

    Ok(elapsed_ms)
}

/// Computes the ID that follows `last` at timestamp `now`.
///
/// `last` is `None` until the generator has issued its first ID. The state
/// only moves forward: a newer timestamp resets the sequence, the same
/// timestamp bumps it, and an exhausted sequence asks the caller to wait one
/// millisecond.
pub(crate) fn next_state<ID: SnowflakeId>(
    last: Option<ID>,
    machine_id: u64,
    now: u64,
) -> Result<Poll<ID>> {
    let Some(last) = last else {
        return Ok(Poll::Ready {
            id: ID::from_components(now, machine_id, 0),
        });
    };

    let last_ts = last.timestamp();
    match now.cmp(&last_ts) {
        Ordering::Equal => {
            if last.has_sequence_room() {
                Ok(Poll::Ready {
                    id: last.increment_sequence(),
                })
            } else {
                Ok(Poll::Pending { yield_for: 1 })
            }
        }
        Ordering::Greater => Ok(Poll::Ready {
            id: last.rollover_to_timestamp(now),
        }),
        Ordering::Less => Err(cold_clock_regression(last_ts, now)),
    }
}

#[cold]
#[inline(never)]
fn cold_clock_regression(last_ms: u64, now_ms: u64) -> Error {
    #[cfg(feature = "tracing")]
    tracing::warn!(last_ms, now_ms, "clock moved backward, refusing to mint an id");
    Error::ClockRegression { last_ms, now_ms }
}
