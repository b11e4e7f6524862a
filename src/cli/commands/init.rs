//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the init command: write the default config and check API keys.
pub fn run_init(settings: &Settings) -> Result<()> {
    Output::header("asktube setup");

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config already exists at {}", config_path.display()));
    } else {
        settings.save()?;
        Output::success(&format!("Wrote default config to {}", config_path.display()));
    }

    std::fs::create_dir_all(settings.data_dir())?;
    Output::kv("Data directory", &settings.data_dir().display().to_string());
    Output::kv("Vector store", &settings.sqlite_path().display().to_string());

    println!();
    Output::header("API keys");
    report_key("OPENAI_API_KEY", "embeddings and answers");
    report_key("RAPIDAPI_KEY", "transcript fetching");

    Ok(())
}

fn report_key(name: &str, purpose: &str) {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => {
            Output::success(&format!("{} is set ({})", name, purpose));
        }
        _ => {
            Output::warning(&format!("{} is NOT set ({})", name, purpose));
        }
    }
}
