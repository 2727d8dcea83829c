//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Cartaz using clap.

pub mod commands;

use crate::domain::AppError;
use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// Some products were skipped
    pub const PARTIAL: i32 = 1;
    pub const CONFIGURATION: i32 = 2;
    pub const IMPORT: i32 = 3;
    pub const REMOTE: i32 = 4;
    pub const FATAL: i32 = 5;
    /// Stopped by SIGINT/SIGTERM
    pub const INTERRUPTED: i32 = 130;
}

/// Maps an error to the exit code reported for it
pub fn exit_code_for(error: &AppError) -> i32 {
    match error {
        AppError::Configuration(_) | AppError::Validation(_) => exit_code::CONFIGURATION,
        AppError::Import(_) => exit_code::IMPORT,
        AppError::Remote(_) => exit_code::REMOTE,
        AppError::Cancelled(_) => exit_code::INTERRUPTED,
        _ => exit_code::FATAL,
    }
}

/// Cartaz - Retail poster export pipeline
#[derive(Parser, Debug)]
#[command(name = "cartaz")]
#[command(version, about, long_about = None)]
#[command(author = "Cartaz Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cartaz.toml", env = "CARTAZ_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARTAZ_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export posters for a product list as a PDF/PNG or a ZIP bundle
    Export(commands::export::ExportArgs),

    /// List or delete published campaigns
    Campaigns(commands::campaigns::CampaignsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
