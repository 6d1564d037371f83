//! catdog-prep
//!
//! Loads the datasets described by a JSON config and reports what was built.
//!
//! Run with:
//!   RUST_LOG=info cargo run --release -- prep.json
//!
//! See `PrepConfig` for the config layout.

use std::process::ExitCode;

use log::{error, info};

use catdog_prep::{FsImageSource, ImageClass, PrepConfig, PrepResult, TrainSet};

fn main() -> ExitCode {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: catdog-prep <config.json>");
            return ExitCode::FAILURE;
        }
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> PrepResult<()> {
    let config = PrepConfig::load_json(path)?;
    info!(
        "{}x{} vectors (padding {}x{}), scale [{}, {}]",
        config.normalize.width,
        config.normalize.height,
        config.normalize.x_padding,
        config.normalize.y_padding,
        config.normalize.scale_min,
        config.normalize.scale_max
    );

    let prepared = config.prepare(FsImageSource)?;

    if let Some(train) = &prepared.train {
        report("train", train);
    }
    if let Some(validation) = &prepared.validation {
        report("validation", validation);
    }
    if let Some(test) = &prepared.test {
        info!("test: {} images", test.len());
    }
    Ok(())
}

fn report(name: &str, set: &TrainSet) {
    let counts = set.class_counts();
    let balance: Vec<String> = ImageClass::ALL
        .iter()
        .map(|c| format!("{}={}", c.file_stem(), counts[c.label()]))
        .collect();
    info!("{}: {} samples ({})", name, set.len(), balance.join(", "));
}
