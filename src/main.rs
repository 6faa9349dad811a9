use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use sfmview_data::Document;
use tracing::{error, info};

mod logging;

use logging::LoggingConfig;

fn main() -> ExitCode {
    LoggingConfig::default().init();

    let Some(root) = env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: sfmview <scene-directory>");
        return ExitCode::from(2);
    };

    let (document, loaded) = Document::from_directory(&root);

    // Summary goes to stdout, logs to stderr.
    match serde_json::to_string_pretty(&document.summary()) {
        Ok(json) => println!("{json}"),
        Err(err) => error!("Failed to serialize scene summary: {}", err),
    }

    if loaded {
        info!("Loaded {} cameras from {}", document.camera_count(), root.display());
        ExitCode::SUCCESS
    } else {
        error!("No camera could be loaded from {}", root.display());
        ExitCode::FAILURE
    }
}
