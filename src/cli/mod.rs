//! CLI module for vidfx
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

pub use args::{CheckArgs, InfoArgs, ProcessArgs};

/// vidfx video editor
///
/// Applies a trim, color adjustment and timed text/logo overlays to a video
/// by compiling them into an ffmpeg filter graph.
#[derive(Parser, Debug)]
#[command(name = "vidfx")]
#[command(about = "vidfx - trim, adjust and overlay videos through ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: vidfx.toml, then config/vidfx.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim, adjust and overlay a video
    Process(ProcessArgs),
    /// Show container and video stream metadata
    Info(InfoArgs),
    /// Check that ffmpeg and ffprobe can be run
    Check(CheckArgs),
}
