//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CartazConfig, RemoteConfig};
use super::secret::secret_string;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CartazConfig
/// 4. Applies environment variable overrides (CARTAZ_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`AppError::Configuration`] if the file cannot be read or parsed,
/// a referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use cartaz::config::loader::load_config;
///
/// let config = load_config("cartaz.toml")?;
/// # Ok::<(), cartaz::domain::AppError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CartazConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<CartazConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CartazConfig = toml::from_str(&contents)
        .map_err(|e| AppError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| AppError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AppError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed = processed.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed);
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| AppError::Configuration(format!("Invalid value for {name}: {e}"))),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using CARTAZ_* prefix
///
/// Environment variables follow the pattern: CARTAZ_<SECTION>_<KEY>
/// For example: CARTAZ_EXPORT_OUTPUT_DIR, CARTAZ_REMOTE_KEY.
/// Setting both CARTAZ_REMOTE_URL and CARTAZ_REMOTE_KEY enables publishing
/// even without a `[remote]` section.
fn apply_env_overrides(config: &mut CartazConfig) -> Result<()> {
    // Application
    if let Some(val) = env("CARTAZ_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = parse_env("CARTAZ_APPLICATION_DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Style
    if let Some(val) = env("CARTAZ_STYLE_PAGE_SIZE") {
        config.style.page_size = val.parse().map_err(AppError::Configuration)?;
    }
    if let Some(val) = env("CARTAZ_STYLE_ORIENTATION") {
        config.style.orientation = val.parse().map_err(AppError::Configuration)?;
    }

    // Export
    if let Some(val) = env("CARTAZ_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = parse_env("CARTAZ_EXPORT_LARGE_BATCH_THRESHOLD")? {
        config.export.large_batch_threshold = val;
    }
    if let Some(val) = parse_env("CARTAZ_EXPORT_PAUSE_MS")? {
        config.export.pause_ms = val;
    }
    if let Some(val) = env("CARTAZ_EXPORT_FONT_PATH") {
        config.export.font_path = Some(val);
    }

    // Remote
    match config.remote {
        Some(ref mut remote) => {
            if let Some(val) = env("CARTAZ_REMOTE_URL") {
                remote.url = val;
            }
            if let Some(val) = env("CARTAZ_REMOTE_KEY") {
                remote.key = secret_string(val);
            }
        }
        None => {
            if let (Some(url), Some(key)) = (env("CARTAZ_REMOTE_URL"), env("CARTAZ_REMOTE_KEY")) {
                config.remote = Some(RemoteConfig {
                    url,
                    key: secret_string(key),
                    bucket: "cartazes".to_string(),
                    table: "shared_files".to_string(),
                    max_upload_mb: 50,
                    timeout_seconds: 60,
                });
            }
        }
    }
    if let Some(ref mut remote) = config.remote {
        if let Some(val) = env("CARTAZ_REMOTE_BUCKET") {
            remote.bucket = val;
        }
        if let Some(val) = env("CARTAZ_REMOTE_TABLE") {
            remote.table = val;
        }
        if let Some(val) = parse_env("CARTAZ_REMOTE_MAX_UPLOAD_MB")? {
            remote.max_upload_mb = val;
        }
    }

    // Logging
    if let Some(val) = parse_env("CARTAZ_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env("CARTAZ_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
