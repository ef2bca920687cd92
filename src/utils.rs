//! Various helper-utilities

use crate::{cli::Opts, config::Config};
use anyhow::Result;
use clap::crate_name;
use flexi_logger::{
    style,
    AdaptiveFormat,
    Age,
    Cleanup,
    Criterion,
    DeferredNow,
    Duplicate,
    FileSpec,
    Level,
    Logger,
    LoggerHandle,
    Naming,
    Record,
    WriteMode,
};
use serde::{de, Deserialize};
use std::{
    env,
    hash::{BuildHasherDefault, Hasher},
    io::{self, Write},
    panic,
    path::PathBuf,
};

/// Used as a custom inner state/hasher for any `Hash` item in the [`std`]
#[derive(Default)]
pub(crate) struct IdHasher {
    /// Current state of the hasher
    state: u64,
}

impl Hasher for IdHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.rotate_left(8).wrapping_add(u64::from(byte));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Type alias to build a `Hash` using [`IdHasher`]
pub(crate) type BuildIdHasher = BuildHasherDefault<IdHasher>;

/// Shorter way of testing if the user wants color for the output of `--help`
pub(crate) fn wants_color() -> bool {
    env::var_os("NO_COLOR").is_none()
}

/// Level spec for the logger: `BWM_LOG` wins over the `-v` count
fn log_spec(verbose: u8) -> String {
    env::var("BWM_LOG").unwrap_or_else(|_| {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_owned()
    })
}

/// Initializes logging for this crate
///
/// The returned handle has to be kept alive for as long as anything logs
pub(crate) fn initialize_logging(config: &Config, args: &Opts) -> Result<LoggerHandle> {
    /// Customize the format of the log (colored)
    fn colored_format(
        w: &mut dyn Write,
        _now: &mut DeferredNow,
        record: &Record,
    ) -> Result<(), io::Error> {
        let level = record.level();
        write!(
            w,
            "{:<5} [{}:{}]: {}",
            style(level, level),
            style(Level::Trace, record.file().unwrap_or("<unnamed>")),
            record.line().unwrap_or(0),
            &record.args()
        )
    }

    /// Customize the format of the log (uncolored)
    fn uncolored_format(
        w: &mut dyn Write,
        now: &mut DeferredNow,
        record: &Record,
    ) -> Result<(), io::Error> {
        // Messages may carry ansi sequences from `colored`
        write!(
            w,
            "[{:>}] {:<5} [{}:{}]: {}",
            now.now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.file().unwrap_or("<unnamed>"),
            record.line().unwrap_or(0),
            String::from_utf8(strip_ansi_escapes::strip(
                &record.args().to_string().as_bytes()
            )?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        )
    }

    if cfg!(debug_assertions) {
        better_panic::install();
        panic::set_hook(Box::new(|panic_info| {
            better_panic::Settings::auto().create_panic_handler()(panic_info);
        }));
    }

    let log_dir = config
        .global
        .log_dir
        .clone()
        .unwrap_or_else(|| env::temp_dir().join(crate_name!()));

    let mut logger = Logger::try_with_str(log_spec(args.verbose))?
        .write_mode(WriteMode::BufferAndFlush)
        .adaptive_format_for_stderr(AdaptiveFormat::Custom(uncolored_format, colored_format))
        .set_palette(String::from("9;11;14;5;13"));

    if config.global.log_to_file {
        logger = logger
            .duplicate_to_stderr(Duplicate::All)
            .rotate(
                Criterion::AgeOrSize(Age::Day, 50_000_000),
                Naming::Numbers,
                Cleanup::KeepLogFiles(2),
            )
            .log_to_file(
                FileSpec::default()
                    .basename(crate_name!())
                    .directory(&log_dir),
            )
            .format_for_files(uncolored_format);
    }

    let handle = logger.start()?;
    if config.global.log_to_file {
        log::debug!("logging to {}", log_dir.display());
    }

    Ok(handle)
}

/// [`Deserialize`] something that has a shell variable
#[allow(single_use_lifetimes)]
pub(crate) fn deserialize_shellexpand<'de, D>(d: D) -> Result<Option<PathBuf>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = PathBuf::deserialize(d)?;

    let value = PathBuf::from(
        shellexpand::full(&value.to_string_lossy())
            .map_err(|e| {
                de::Error::invalid_value(
                    de::Unexpected::Str(value.to_string_lossy().as_ref()),
                    &e.to_string().as_str(),
                )
            })?
            .to_string(),
    );

    Ok(Some(value))
}
