//! Ask command implementation.

use crate::chunking::format_seconds;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::extract_video_id;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, video: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let video_id = extract_video_id(video)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Thinking...");

    match orchestrator.ask(question, &video_id, &[]).await {
        Ok((response, sources)) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response);

            if !sources.is_empty() {
                Output::header("Sources");
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
            Output::error(&format!("Failed to answer question: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
