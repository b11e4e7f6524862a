//! Summarize command implementation.

use crate::chunking::format_seconds;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::extract_video_id;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(video: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let video_id = extract_video_id(video)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Summarizing video...");

    match orchestrator.summarize(&video_id).await {
        Ok((summary, _)) if summary.is_empty() => {
            spinner.finish_and_clear();
            Output::warning(&format!(
                "No indexed chunks for video {}. Run 'asktube process' first.",
                video_id
            ));
        }
        Ok((summary, sources)) => {
            spinner.finish_and_clear();

            println!("\n{}\n", summary);

            if !sources.is_empty() {
                Output::header("Sampled segments");
                for source in &sources {
                    Output::source(
                        &format_seconds(source.start_time),
                        source.score,
                        &source.text,
                    );
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to summarize video: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
