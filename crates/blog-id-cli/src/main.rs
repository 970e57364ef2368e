#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, BufWriter, Write};
use std::time::SystemTime;

use anyhow::Context;
use blog_id::{
    AtomicSnowflakeGenerator, BlogId, DecodedId, Epoch, LockSnowflakeGenerator, MonotonicClock,
    SnowflakeGenerator, SnowflakeId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;
use config::{AppConfig, CliArgs, Command, GeneratorKind};
use serde::Serialize;
use telemetry::init_telemetry;

/// One line of output for a minted or decoded ID.
#[derive(Debug, Serialize)]
struct IdRecord {
    #[serde(with = "blog_id::serde::as_string")]
    id: BlogId,
    #[serde(flatten)]
    decoded: DecodedId,
    created_at: String,
}

impl IdRecord {
    /// Decodes `raw` against `epoch`. Pure: no clock or generator involved.
    fn new(raw: u64, epoch: Epoch) -> Self {
        let id = BlogId::from_raw(raw);
        Self {
            id,
            decoded: id.decode(),
            created_at: format_time(epoch.to_system_time(id.timestamp())),
        }
    }
}

impl std::fmt::Display for IdRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\ttimestamp_ms={}\tmachine_id={}\tsequence={}\tcreated_at={}",
            self.id,
            self.decoded.timestamp_ms,
            self.decoded.machine_id,
            self.decoded.sequence,
            self.created_at
        )
    }
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match config.command {
        Command::Mint { count, json } => {
            // The process owns exactly one generator; minting borrows it.
            let clock = MonotonicClock::new();
            match config.generator {
                GeneratorKind::Lock => {
                    let generator: LockSnowflakeGenerator<BlogId, _> =
                        LockSnowflakeGenerator::new(config.machine_id, config.epoch, clock)
                            .context("failed to build generator")?;
                    mint(&generator, count, json, &mut out)?;
                }
                GeneratorKind::Atomic => {
                    let generator: AtomicSnowflakeGenerator<BlogId, _> =
                        AtomicSnowflakeGenerator::new(config.machine_id, config.epoch, clock)
                            .context("failed to build generator")?;
                    mint(&generator, count, json, &mut out)?;
                }
            }
        }
        Command::Decode { ids, json } => {
            let records = decode(&ids, config.epoch);
            if json {
                write_json(&mut out, &records)?;
            } else {
                for record in &records {
                    writeln!(out, "{record}")?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn mint<G>(generator: &G, count: usize, json: bool, out: &mut impl Write) -> anyhow::Result<()>
where
    G: SnowflakeGenerator<BlogId, MonotonicClock>,
{
    let mut records = Vec::with_capacity(if json { count } else { 0 });
    for _ in 0..count {
        let id = generator.next_id().context("failed to mint ID")?;
        if json {
            records.push(IdRecord::new(id.to_raw(), generator.epoch()));
        } else {
            writeln!(out, "{id}")?;
        }
    }
    tracing::info!(count, machine_id = generator.machine_id(), "minted IDs");
    if json {
        write_json(out, &records)?;
    }
    Ok(())
}

fn decode(ids: &[u64], epoch: Epoch) -> Vec<IdRecord> {
    ids.iter()
        .map(|&raw| {
            if !BlogId::from_raw(raw).is_valid() {
                tracing::warn!(raw, "ID sets the reserved bit; decoding the remaining fields");
            }
            IdRecord::new(raw, epoch)
        })
        .collect()
}

fn write_json(out: &mut impl Write, records: &[IdRecord]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_text_line() {
        let record = IdRecord::new(20_971_524_096, Epoch::BLOG);
        assert_eq!(
            record.to_string(),
            "20971524096\ttimestamp_ms=5000\tmachine_id=1\tsequence=0\tcreated_at=2025-01-01T00:00:05.000Z"
        );
    }

    #[test]
    fn record_json_keeps_id_as_string() {
        let record = IdRecord::new(20_971_524_097, Epoch::BLOG);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "20971524097",
                "timestamp_ms": 5000,
                "machine_id": 1,
                "sequence": 1,
                "created_at": "2025-01-01T00:00:05.000Z",
            })
        );
    }

    #[test]
    fn decode_works_with_an_epoch_after_now() {
        // 2100-01-01T00:00:00Z, which no generator would accept today.
        let epoch = Epoch::from_unix_millis(4_102_444_800_000);
        let records = decode(&[20_971_524_096], epoch);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decoded.timestamp_ms, 5000);
        assert_eq!(records[0].created_at, "2100-01-01T00:00:05.000Z");
    }

    #[test]
    fn minted_json_records_decode_to_this_machine() {
        let generator: LockSnowflakeGenerator<BlogId, _> =
            LockSnowflakeGenerator::new(1, Epoch::BLOG, MonotonicClock::new()).unwrap();
        let mut out = Vec::new();
        mint(&generator, 2, true, &mut out).unwrap();

        let records: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r["machine_id"] == 1));
    }
}
