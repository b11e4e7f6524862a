//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{anyhow, Result};

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&settings)?;
            println!("{}", content);
        }

        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }

        ConfigAction::Set { key, value } => {
            set_value(settings, key, value)?;
            Output::success(&format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

/// Set a dotted-path key (e.g. "rag.model") in the config file.
fn set_value(settings: Settings, key: &str, value: &str) -> Result<()> {
    let mut doc: toml::Value = toml::Value::try_from(&settings)?;

    let mut current = &mut doc;
    let parts: Vec<&str> = key.split('.').collect();
    let (last, path) = parts
        .split_last()
        .ok_or_else(|| anyhow!("Empty configuration key"))?;

    for part in path {
        current = current
            .get_mut(*part)
            .ok_or_else(|| anyhow!("Unknown configuration section: {}", part))?;
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| anyhow!("{} is not a configuration section", key))?;

    let existing = table
        .get(*last)
        .ok_or_else(|| anyhow!("Unknown configuration key: {}", key))?;

    // Parse the new value with the same type as the existing one.
    let new_value = match existing {
        toml::Value::Integer(_) => toml::Value::Integer(value.parse()?),
        toml::Value::Float(_) => toml::Value::Float(value.parse()?),
        toml::Value::Boolean(_) => toml::Value::Boolean(value.parse()?),
        _ => toml::Value::String(value.to_string()),
    };
    table.insert(last.to_string(), new_value);

    let updated: Settings = doc.try_into()?;
    updated.save()?;
    Ok(())
}
