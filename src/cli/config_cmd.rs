//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::codec::AudioCodec;
use crate::domain::config::{AppConfig, VolumePolicyConfig};
use crate::domain::error::ConfigError;
use crate::domain::quality::EncodingQuality;
use crate::domain::recording::Duration;
use crate::domain::volume::VolumeScale;

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

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
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

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "output" => config.output = Some(value.to_string()),
        "codec" => {
            let codec: AudioCodec = value.parse().map_err(|e| invalid(key, format!("{}", e)))?;
            config.codec = Some(codec.name().to_string());
        }
        "quality" => {
            let level = value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(EncodingQuality::from_level)
                .ok_or_else(|| invalid(key, "Value must be an integer from 0 to 4"))?;
            config.quality = Some(level.level());
        }
        "volume" => {
            let volume = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(key, "Value must be a number"))?;
            config.volume = Some(volume);
        }
        "duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.duration = Some(value.to_string());
        }
        "volume_policy.scale" => {
            let scale: VolumeScale = value.parse().map_err(|e| invalid(key, format!("{}", e)))?;
            policy_section(config).scale = Some(scale.to_string());
        }
        "volume_policy.validate" => {
            let validate = parse_bool(value)
                .map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?;
            policy_section(config).validate = Some(validate);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn policy_section(config: &mut AppConfig) -> &mut VolumePolicyConfig {
    config.volume_policy.get_or_insert_with(VolumePolicyConfig::default)
}

/// Display value of a config key, `None` when unset
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    let policy = config.volume_policy.as_ref();
    match key {
        "output" => config.output.clone(),
        "codec" => config.codec.clone(),
        "quality" => config.quality.map(|q| q.to_string()),
        "volume" => config.volume.map(|v| v.to_string()),
        "duration" => config.duration.clone(),
        "volume_policy.scale" => policy.and_then(|p| p.scale.clone()),
        "volume_policy.validate" => policy.and_then(|p| p.validate).map(|b| b.to_string()),
        _ => None,
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
