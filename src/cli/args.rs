//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::app::inspect_interactor::OutputFormat;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Seconds to skip from the start of the source
    #[arg(long, default_value_t = 0.0)]
    pub trim_start: f64,

    /// Seconds to keep after the trim start (default: until the end)
    #[arg(long)]
    pub trim_duration: Option<f64>,

    /// Brightness adjustment (-1 to 1)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub brightness: f64,

    /// Contrast (0 to 4)
    #[arg(long, default_value_t = 1.0)]
    pub contrast: f64,

    /// Saturation (0 to 4)
    #[arg(long, default_value_t = 1.0)]
    pub saturation: f64,

    /// Text overlays as a JSON array, or @file to read it from a file
    #[arg(long)]
    pub text_overlays: Option<String>,

    /// Logo overlays as a JSON array, or @file to read it from a file
    #[arg(long)]
    pub logo_overlays: Option<String>,

    /// Logo image referenced by overlays, as NAME=PATH (repeatable).
    /// A bare PATH is referenced by its file name.
    #[arg(long = "logo", value_name = "NAME=PATH")]
    pub logos: Vec<String>,

    /// Output directory (overrides configuration)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Keep staged input copies after processing
    #[arg(long)]
    pub keep_temp: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
