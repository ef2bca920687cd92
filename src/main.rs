//! A minimal reparenting X11 window manager

// session -> handshake -> startup framing -> event loop

#![deny(
    clippy::all,
    clippy::complexity,
    clippy::correctness,
    clippy::nursery,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    absolute_paths_not_starting_with_crate,
    anonymous_parameters,
    bad_style,
    ellipsis_inclusive_range_patterns,
    exported_private_dependencies,
    ill_formed_attribute_input,
    improper_ctypes,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    noop_method_call,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    pub_use_of_private_extern_crate,
    semicolon_in_expressions_from_macros,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unreachable_pub,
    unsafe_code,
    while_true
)]
#![allow(
    clippy::pattern_type_mismatch,
    clippy::redundant_pub_crate,
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::doc_markdown,
    clippy::exit,
    clippy::implicit_return,
    clippy::module_name_repetitions,
    clippy::multiple_inherent_impl,
    clippy::similar_names,
    clippy::upper_case_acronyms,
    clippy::use_debug
)]
#![cfg_attr(
    any(test),
    allow(
        clippy::expect_fun_call,
        clippy::expect_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::unwrap_used,
        clippy::wildcard_enum_match_arm,
    )
)]

mod cli;
mod config;
mod core;
mod diagnostic;
mod error;
mod events;
mod frame;
mod geometry;
mod macros;
mod manager;
mod registry;
mod session;
mod utils;
mod x;

use crate::{
    cli::Opts,
    config::Config,
    core::decoration::Decoration,
    diagnostic::DiagnosticLog,
    error::Error,
    manager::WindowManager,
    session::Session,
    utils::initialize_logging,
};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process;

fn main() {
    let args = Opts::parse();
    args.apply_color();

    let config = match Config::load_from(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            bwm_error!("failed to load the configuration: {:#}", e);
            process::exit(1);
        },
    };

    let _logger = match initialize_logging(&config, &args) {
        Ok(handle) => handle,
        Err(e) => {
            bwm_error!("failed to initialize logging: {:#}", e);
            process::exit(1);
        },
    };

    log::debug!("{}: {:#?}", "Configuration options".bright_blue(), config);

    if let Err(e) = run(&config, &args) {
        if let Some(Error::Connection(_)) = e.downcast_ref::<Error>() {
            log::error!("failed to initialize window manager");
        }
        bwm_error!("{:#}", e);
        log::logger().flush();
        process::exit(1);
    }
}

/// Start the window manager. Returns only on failure
fn run(config: &Config, args: &Opts) -> Result<()> {
    log::info!("starting {} {}", crate::WM_NAME!(), env!("CARGO_PKG_VERSION"));

    let decoration = Decoration::new(config)?;
    let diagnostic = DiagnosticLog::create(config.diagnostic_log(args.diagnostic_log.as_deref()))?;
    let session = Session::open(args.display.as_deref())?;

    WindowManager::new(session, decoration, diagnostic).run()
}
