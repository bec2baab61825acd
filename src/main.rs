//! vidfx command-line video editor
//!
//! Applies a trim, color adjustment and timed text/logo overlays to a video
//! by driving ffmpeg with a compiled filter graph.
//!
//! # Usage
//!
//! ```bash
//! vidfx process --input clip.mp4 --trim-start 5 --trim-duration 10 \
//!     --text-overlays '[{"text": "Hello", "x": 50, "y": 90, "start": 6, "end": 9}]' \
//!     --logo-overlays '[{"filename": "logo.png", "x": 5, "y": 5}]' --logo logo.png=./logo.png
//! vidfx info --input clip.mp4 --format json
//! vidfx check
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use vidfx_cli::cli::Cli;

/// Main entry point for the vidfx CLI application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match vidfx_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            let code = vidfx_cli::exit_code_for(&e);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
