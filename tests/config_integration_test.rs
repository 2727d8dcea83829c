//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold `ENV_MUTEX`.

use cartaz::config::load_config;
use cartaz::domain::{FactoryType, Orientation, PageSize};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for var in [
        "CARTAZ_APPLICATION_LOG_LEVEL",
        "CARTAZ_APPLICATION_DRY_RUN",
        "CARTAZ_STYLE_PAGE_SIZE",
        "CARTAZ_EXPORT_OUTPUT_DIR",
        "CARTAZ_EXPORT_LARGE_BATCH_THRESHOLD",
        "CARTAZ_REMOTE_URL",
        "CARTAZ_REMOTE_KEY",
        "TEST_CARTAZ_SUPABASE_KEY",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_CARTAZ_SUPABASE_KEY", "service-role-key");

    let file = write_config(
        r##"
[application]
log_level = "debug"

[style]
page_size = "a3"
orientation = "landscape"
factory_type = "mega"
show_old_price = false

[style.colors]
price = "#b91c1c"

[style.positions.price]
x = 10
y = -25

[export]
output_dir = "/tmp/cartazes"
large_batch_threshold = 30
pause_ms = 0

[remote]
url = "https://demo.supabase.co"
# key = "${NOT_SET_BUT_COMMENTED}"
key = "${TEST_CARTAZ_SUPABASE_KEY}"
bucket = "posters"

[logging]
local_enabled = false
"##,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.style.page_size, PageSize::A3);
    assert_eq!(config.style.orientation, Orientation::Landscape);
    assert_eq!(config.style.factory_type, FactoryType::Mega);
    assert!(!config.style.show_old_price);
    assert_eq!(config.style.colors.price, "#b91c1c");
    assert_eq!(config.style.positions["price"].y, -25);
    assert_eq!(config.export.large_batch_threshold, 30);
    assert_eq!(config.export.combined_file_name, "Ofertas_Todas_Paginas.pdf");

    let remote = config.remote.unwrap();
    assert_eq!(remote.bucket, "posters");
    assert_eq!(remote.table, "shared_files");
    let key: &str = remote.key.expose_secret().as_ref();
    assert_eq!(key, "service-role-key");
    assert!(!format!("{:?}", remote.key).contains("service-role-key"));

    cleanup_env_vars();
}

#[test]
fn test_empty_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.style.page_size, PageSize::A4);
    assert_eq!(config.export.large_batch_threshold, 50);
    assert!(config.remote.is_none());
}

#[test]
fn test_env_overrides_apply() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("CARTAZ_STYLE_PAGE_SIZE", "a5");
    std::env::set_var("CARTAZ_EXPORT_LARGE_BATCH_THRESHOLD", "10");
    std::env::set_var("CARTAZ_REMOTE_URL", "https://env.supabase.co");
    std::env::set_var("CARTAZ_REMOTE_KEY", "from-env");

    let file = write_config("[export]\nlarge_batch_threshold = 80\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.style.page_size, PageSize::A5);
    assert_eq!(config.export.large_batch_threshold, 10);
    assert_eq!(config.remote.unwrap().url, "https://env.supabase.co");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        "[remote]\nurl = \"https://demo.supabase.co\"\nkey = \"${TEST_CARTAZ_SUPABASE_KEY}\"\n",
    );
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("TEST_CARTAZ_SUPABASE_KEY"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for contents in [
        "[style]\npage_size = \"a0\"\n",
        "[style.colors]\nprice = \"red\"\n",
        "[export]\nbatch_quality = 0\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
        "[remote]\nurl = \"ftp://demo\"\nkey = \"k\"\n",
    ] {
        let file = write_config(contents);
        assert!(load_config(file.path()).is_err(), "accepted: {contents}");
    }
}

#[test]
fn test_missing_file() {
    assert!(load_config("/nonexistent/cartaz.toml").is_err());
}
