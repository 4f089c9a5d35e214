// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Multiply two matrix files on a ring of pipelined participants.
//!
//! For example, run using:
//!   cargo run --bin ringmul -- --n1 960 --n2 768 --n3 160 --verify --stdout

use std::io;

use anyhow::Result;
use clap::Parser;
use ringmul::cli::Cli;
use ringmul::run::{run, write_summary};
use ringmul::settings::Settings;
use ringmul_engine::engine::Engine;
use ringmul_track::builder::setup_trackers;

fn main() -> Result<()> {
    let args = Cli::parse();

    let tracker = setup_trackers(&args.trackers_config())?;
    let settings = Settings::load(&args.settings_files(), &args.overrides())?;

    let mut engine = Engine::new(&tracker);
    let result = run(&settings, &mut engine);
    tracker.shutdown();

    let summary = result?;
    write_summary(&summary, &mut io::stdout())?;
    Ok(())
}
