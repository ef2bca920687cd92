//! The command line arguments

use crate::utils::wants_color;
use clap::{crate_description, crate_version, AppSettings, Parser, ValueHint};
use once_cell::sync::Lazy;
use std::{env, fs, path::PathBuf};

/// Options for the [`bwm`] program
#[derive(Parser, Default, Clone, Debug, PartialEq)]
#[clap(
    version = crate_version!(),
    about = <String as AsRef<str>>::as_ref(&APP_ABOUT),
    after_help =  <String as AsRef<str>>::as_ref(&AFTER_HELP),
    override_usage =  <String as AsRef<str>>::as_ref(&OVERRIDE_HELP),
    max_term_width = 100,
    color = clap::ColorChoice::Auto,
    global_setting = AppSettings::DeriveDisplayOrder,
    disable_help_subcommand = true,
    hide_possible_values = true,
)]
pub(crate) struct Opts {
    /// Display debugging messages on various levels
    #[clap(
        long,
        short,
        global = true,
        parse(from_occurrences),
        long_help = "
        Set the verbosity level of the program. There are 2 extra levels after the default (INFO). \
                     If `-v` is used, DEBUG messages are displayed, and if `-vv` is used TRACE \
                     messages are displayed. The verbosity can also be set with the `BWM_LOG` \
                     environment variable"
    )]
    pub(crate) verbose: u8,

    /// Location of configuration file
    #[clap(
        long,
        short,
        takes_value = true,
        number_of_values = 1,
        value_name = "file",
        value_hint = ValueHint::FilePath,
        validator = |t| {
            fs::metadata(
                PathBuf::from(t).components()
                    .collect::<Vec<_>>()
                    .len()
                    .gt(&1_usize)
                    .then(|| PathBuf::from(t))
                    .unwrap_or_else(|| {
                        env::current_dir()
                            .unwrap_or_else(|_| PathBuf::from("."))
                            .join(PathBuf::from(t))
                    }),
            )
            .map_err(|_| "must be a valid path")
            .map(|_| ())
            .map_err(|e| e.to_string())
        },
        long_help = "\
        Specify the location of the configuration file. The default location is \
                `$XDG_CONFIG_HOME/bwm/bwm.yml`, which is created when missing"
    )]
    pub(crate) config: Option<PathBuf>,

    /// The X display to manage
    #[clap(
        long,
        short = 'D',
        takes_value = true,
        number_of_values = 1,
        value_name = "display",
        long_help = "\
        Name of the X display to connect to, such as `:1`. The `DISPLAY` environment \
                variable is used when this is not given"
    )]
    pub(crate) display: Option<String>,

    /// File receiving diagnostic checkpoints
    #[clap(
        long = "diagnostic-log",
        takes_value = true,
        number_of_values = 1,
        value_name = "file",
        value_hint = ValueHint::FilePath,
        long_help = "\
        File receiving one line per diagnostic checkpoint (startup, every received event, \
                every key press). It is truncated when the window manager starts. Overrides \
                `diagnostic-log` from the configuration file"
    )]
    pub(crate) diagnostic_log: Option<PathBuf>,

    /// When to colorize output
    #[clap(
        name = "color",
        long = "color",
        short = 'C',
        value_name = "when",
        possible_values = &["never", "auto", "always"],
        long_help = "\
        When to colorize output (usually meant for piping). Valid values are: always, \
                auto, never. This applies to messages printed outside of the logger"
    )]
    pub(crate) color_when: Option<String>,
}

impl Opts {
    /// Apply `--color` to the `colored` crate
    pub(crate) fn apply_color(&self) {
        match self.color_when.as_deref() {
            Some("always") => colored::control::set_override(true),
            Some("never") => colored::control::set_override(false),
            _ => {},
        }
    }
}

// =============== Prettify Help ==================

/// Yellow ansi code
const YELLOW: &str = "\x1b[0;33m";
/// Green ansi code
const GREEN: &str = "\x1b[0;32m";
/// Bold-red ansi code
const BRED: &str = "\x1b[01;38;5;1m";
/// Reset colors
const RES: &str = "\x1b[0m";

/// Colored options used in the output of `--help`
pub(crate) static APP_ABOUT: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "{}DESCRIPTION: {}{}{}",
                YELLOW,
                GREEN,
                crate_description!(),
                RES
            )
        })
        .unwrap_or_else(|| crate_description!().to_owned())
});

/// Colorized message to override the generated help message
pub(crate) static OVERRIDE_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| format!("{}bwm{} [{}OPTIONS{}]", BRED, RES, GREEN, RES))
        .unwrap_or_else(|| String::from("bwm [OPTIONS]"))
});

/// Colorized message displayed after the help message
pub(crate) static AFTER_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "See {}bwm{} {}--help{} for longer explanations of some options.",
                BRED, RES, GREEN, RES
            )
        })
        .unwrap_or_else(|| {
            String::from("See bwm --help for longer explanations of some options.")
        })
});
