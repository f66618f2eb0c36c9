use anyhow::{Context, bail};
use capsule_clock::{DurationOptions, Instant};
use clap::{Parser, ValueEnum};

/// Runtime configuration for the `capsule-clock` binary.
///
/// Every setting can come from a flag, an environment variable, or a `.env`
/// file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "capsule-clock",
    version,
    about = "Live readout of time elapsed since a date, or time left until a capsule opens"
)]
pub struct CliArgs {
    /// Date or date-time to count up from, e.g. `2020-06-12` or
    /// `2020-06-12T18:30:00`.
    ///
    /// Environment variable: `CAPSULE_START`
    #[arg(long, env = "CAPSULE_START")]
    pub start: Option<String>,

    /// Date or date-time the capsule opens; counts down to it instead.
    ///
    /// Environment variable: `CAPSULE_OPEN_DATE`
    #[arg(long, env = "CAPSULE_OPEN_DATE")]
    pub open_date: Option<String>,

    /// Milliseconds between readouts. Use 50 together with `--millis` for a
    /// running millisecond display.
    ///
    /// Environment variable: `TICK_INTERVAL_MS`
    #[arg(long, env = "TICK_INTERVAL_MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Split the day count into weeks and days.
    ///
    /// Environment variable: `SHOW_WEEKS`
    #[arg(long, env = "SHOW_WEEKS")]
    pub weeks: bool,

    /// Include milliseconds in elapsed readouts.
    ///
    /// Environment variable: `SHOW_MILLIS`
    #[arg(long, env = "SHOW_MILLIS")]
    pub millis: bool,

    /// What to do when the date cannot be parsed.
    ///
    /// Environment variable: `ON_INVALID`
    #[arg(long, env = "ON_INVALID", value_enum, default_value_t = InvalidPolicy::Error)]
    pub on_invalid: InvalidPolicy,

    /// Print a single readout and exit.
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

/// Fallback for a start or open date that does not parse.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPolicy {
    /// Report the bad input and exit with an error.
    Error,
    /// Render an all-zero readout instead.
    Zero,
}

/// Which readout the binary drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Count up from a start instant.
    Elapsed { start: Instant },
    /// Count down to an open date.
    Countdown { open_date: Instant },
    /// The input was rejected under [`InvalidPolicy::Zero`].
    Zeroed { countdown: bool },
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub mode: Mode,
    pub options: DurationOptions,
    pub interval_ms: u64,
    pub once: bool,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.interval_ms == 0 {
            bail!("TICK_INTERVAL_MS must be greater than 0");
        }

        let (input, countdown) = match (args.start, args.open_date) {
            (Some(start), None) => (start, false),
            (None, Some(open_date)) => (open_date, true),
            (Some(_), Some(_)) => {
                bail!("CAPSULE_START and CAPSULE_OPEN_DATE are mutually exclusive")
            }
            (None, None) => bail!("one of CAPSULE_START or CAPSULE_OPEN_DATE is required"),
        };

        let mode = match (Instant::parse(&input), args.on_invalid) {
            (Ok(start), _) if !countdown => Mode::Elapsed { start },
            (Ok(open_date), _) => Mode::Countdown { open_date },
            (Err(_e), InvalidPolicy::Zero) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("{_e}; rendering zeros");
                Mode::Zeroed { countdown }
            }
            (Err(e), InvalidPolicy::Error) => {
                let name = if countdown {
                    "CAPSULE_OPEN_DATE"
                } else {
                    "CAPSULE_START"
                };
                return Err(e).with_context(|| format!("{name} is not a valid date"));
            }
        };

        let mut options = DurationOptions::default();
        if args.weeks {
            options = options.with_weeks();
        }
        if args.millis {
            options = options.with_milliseconds();
        }

        Ok(Self {
            mode,
            options,
            interval_ms: args.interval_ms,
            once: args.once,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> anyhow::Result<CliConfig> {
        let argv = std::iter::once("capsule-clock").chain(args.iter().copied());
        CliConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn elapsed_mode_with_defaults() {
        let config = config(&["--start", "2020-06-12"]).unwrap();

        assert_eq!(
            config.mode,
            Mode::Elapsed {
                start: Instant::parse("2020-06-12").unwrap()
            }
        );
        assert_eq!(config.interval_ms, 1000);
        assert_eq!(config.options, DurationOptions::default());
        assert!(!config.once);
    }

    #[test]
    fn countdown_mode_with_display_flags() {
        let config = config(&[
            "--open-date",
            "2030-01-01T09:00:00",
            "--interval-ms",
            "50",
            "--weeks",
            "--millis",
            "--once",
        ])
        .unwrap();

        assert_eq!(
            config.mode,
            Mode::Countdown {
                open_date: Instant::parse("2030-01-01T09:00:00").unwrap()
            }
        );
        assert_eq!(config.interval_ms, 50);
        assert_eq!(
            config.options,
            DurationOptions::default().with_weeks().with_milliseconds()
        );
        assert!(config.once);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = config(&["--start", "2020-06-12", "--interval-ms", "0"]).unwrap_err();
        assert!(err.to_string().contains("TICK_INTERVAL_MS"));
    }

    #[test]
    fn needs_exactly_one_date() {
        assert!(config(&[]).is_err());
        assert!(config(&["--start", "2020-06-12", "--open-date", "2030-01-01"]).is_err());
    }

    #[test]
    fn invalid_date_errors_by_default() {
        let err = config(&["--start", "yesterday"]).unwrap_err();
        assert!(err.to_string().contains("CAPSULE_START"));
        assert!(
            err.chain()
                .any(|cause| cause.to_string().contains("yesterday"))
        );
    }

    #[test]
    fn invalid_date_can_render_zeros() {
        let config = config(&["--open-date", "2023-02-30", "--on-invalid", "zero"]).unwrap();
        assert_eq!(config.mode, Mode::Zeroed { countdown: true });
    }
}
