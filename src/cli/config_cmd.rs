//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, ScopeConfig};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Directory must not be empty".to_string()));
            }
            config.output_dir = Some(value.to_string());
        }
        "label" => config.label = Some(value.to_string()),
        "duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
            config.duration = Some(value.to_string());
        }
        "save_prompt" => {
            config.save_prompt = Some(parse_bool(value).map_err(|_| bool_error(key))?);
        }
        "scope.width" | "scope.height" => {
            let pixels = parse_pixels(value).map_err(invalid)?;
            let scope = config.scope.get_or_insert_with(ScopeConfig::default);
            if key == "scope.width" {
                scope.width = Some(pixels);
            } else {
                scope.height = Some(pixels);
            }
        }
        "scope.snapshot" => {
            let enabled = parse_bool(value).map_err(|_| bool_error(key))?;
            config
                .scope
                .get_or_insert_with(ScopeConfig::default)
                .snapshot = Some(enabled);
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

/// Current value of `key`, if set
fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let scope = config.scope.as_ref();
    match key {
        "output_dir" => config.output_dir.clone(),
        "label" => config.label.clone(),
        "duration" => config.duration.clone(),
        "save_prompt" => config.save_prompt.map(|b| b.to_string()),
        "scope.width" => scope.and_then(|s| s.width).map(|v| v.to_string()),
        "scope.height" => scope.and_then(|s| s.height).map(|v| v.to_string()),
        "scope.snapshot" => scope.and_then(|s| s.snapshot).map(|b| b.to_string()),
        _ => None,
    }
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match read_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            read_value(&config, key).as_deref().unwrap_or(NOT_SET),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn bool_error(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Canvas dimension: 16..=4096 pixels
fn parse_pixels(value: &str) -> Result<u32, String> {
    let pixels: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number of pixels", value))?;
    if !(16..=4096).contains(&pixels) {
        return Err("Value must be between 16 and 4096".to_string());
    }
    Ok(pixels)
}
