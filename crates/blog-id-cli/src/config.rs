use anyhow::{Context, bail};
use blog_id::{BlogId, Epoch, SnowflakeId};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line configuration for the `blog-id` binary.
///
/// Every global option can also be set through the environment (or a `.env`
/// file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "blog-id",
    version,
    about = "Mint and decode 64-bit Snowflake IDs for the blog backend"
)]
pub struct CliArgs {
    /// Machine ID embedded in every minted ID. Must fit in 10 bits.
    ///
    /// Environment variable: `BLOG_ID_MACHINE_ID`
    #[arg(long, global = true, env = "BLOG_ID_MACHINE_ID", default_value_t = 1)]
    pub machine_id: u64,

    /// Custom epoch as an RFC 3339 timestamp. Must match the epoch the IDs
    /// were minted with, or decoded creation times will be shifted.
    ///
    /// Environment variable: `BLOG_ID_EPOCH`
    #[arg(
        long,
        global = true,
        env = "BLOG_ID_EPOCH",
        default_value_t = String::from("2025-01-01T00:00:00Z")
    )]
    pub epoch: String,

    /// Generator implementation.
    ///
    /// Environment variable: `BLOG_ID_GENERATOR`
    #[arg(
        long,
        global = true,
        env = "BLOG_ID_GENERATOR",
        value_enum,
        default_value_t = GeneratorKind::Lock
    )]
    pub generator: GeneratorKind,

    /// Upper bound on `mint --count`.
    ///
    /// Environment variable: `BLOG_ID_MAX_COUNT`
    #[arg(long, global = true, env = "BLOG_ID_MAX_COUNT", default_value_t = 1_000_000)]
    pub max_count: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint new IDs.
    Mint {
        /// Number of IDs to mint.
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Print JSON records instead of one ID per line.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Decode existing IDs into timestamp, machine ID, sequence, and
    /// creation time.
    Decode {
        /// IDs to decode, in decimal.
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Print JSON records instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Mutex-guarded state.
    Lock,
    /// Lock-free compare-and-swap state.
    Atomic,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub machine_id: u64,
    pub epoch: Epoch,
    pub generator: GeneratorKind,
    pub command: Command,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let max_machine_id = BlogId::max_machine_id();
        if args.machine_id > max_machine_id {
            bail!(
                "BLOG_ID_MACHINE_ID ({}) exceeds the machine ID space (max = {})",
                args.machine_id,
                max_machine_id
            );
        }

        let epoch = parse_epoch(&args.epoch)?;

        if let Command::Mint { count, .. } = args.command {
            if count == 0 {
                bail!("--count must be greater than 0");
            }
            if count > args.max_count {
                bail!(
                    "--count ({}) exceeds BLOG_ID_MAX_COUNT ({})",
                    count,
                    args.max_count
                );
            }
        }

        Ok(Self {
            machine_id: args.machine_id,
            epoch,
            generator: args.generator,
            command: args.command,
        })
    }
}

fn parse_epoch(raw: &str) -> anyhow::Result<Epoch> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("BLOG_ID_EPOCH ({raw}) is not an RFC 3339 timestamp"))?;
    let unix_millis = parsed.with_timezone(&Utc).timestamp_millis();
    let Ok(unix_millis) = u64::try_from(unix_millis) else {
        bail!("BLOG_ID_EPOCH ({raw}) is before 1970-01-01T00:00:00Z");
    };
    Ok(Epoch::from_unix_millis(unix_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> anyhow::Result<AppConfig> {
        let args = CliArgs::try_parse_from(args)?;
        AppConfig::try_from(args)
    }

    #[test]
    fn defaults_match_the_blog_deployment() {
        assert_eq!(parse_epoch("2025-01-01T00:00:00Z").unwrap(), Epoch::BLOG);

        let args = CliArgs::try_parse_from(["blog-id", "mint"]).unwrap();
        assert_eq!(
            args.command,
            Command::Mint {
                count: 1,
                json: false
            }
        );
    }

    #[test]
    fn global_flags_after_the_subcommand() {
        let config = config(&[
            "blog-id",
            "mint",
            "--count",
            "3",
            "--machine-id",
            "7",
            "--generator",
            "atomic",
        ])
        .unwrap();
        assert_eq!(config.machine_id, 7);
        assert_eq!(config.generator, GeneratorKind::Atomic);
        assert_eq!(
            config.command,
            Command::Mint {
                count: 3,
                json: false
            }
        );
    }

    #[test]
    fn machine_id_must_fit() {
        assert!(config(&["blog-id", "--machine-id", "1023", "mint"]).is_ok());
        let err = config(&["blog-id", "--machine-id", "1024", "mint"]).unwrap_err();
        assert!(err.to_string().contains("max = 1023"));
    }

    #[test]
    fn epoch_is_parsed_as_rfc3339() {
        let config = config(&["blog-id", "--epoch", "2025-01-01T01:00:00+01:00", "mint"]).unwrap();
        assert_eq!(config.epoch, Epoch::BLOG);

        assert!(parse_epoch("yesterday").is_err());
        assert!(parse_epoch("1969-12-31T23:59:59Z").is_err());
        assert_eq!(parse_epoch("1970-01-01T00:00:00Z").unwrap(), Epoch::UNIX);
    }

    #[test]
    fn count_is_bounded() {
        assert!(config(&["blog-id", "mint", "--count", "0"]).is_err());
        assert!(config(&["blog-id", "--max-count", "10", "mint", "--count", "10"]).is_ok());
        let err = config(&["blog-id", "--max-count", "10", "mint", "--count", "11"]).unwrap_err();
        assert!(err.to_string().contains("BLOG_ID_MAX_COUNT"));
    }

    #[test]
    fn decode_requires_numeric_ids() {
        let config = config(&["blog-id", "decode", "20971524096", "1", "--json"]).unwrap();
        assert_eq!(
            config.command,
            Command::Decode {
                ids: vec![20_971_524_096, 1],
                json: true
            }
        );
        assert!(CliArgs::try_parse_from(["blog-id", "decode"]).is_err());
        assert!(CliArgs::try_parse_from(["blog-id", "decode", "abc"]).is_err());
    }
}
