//! Process command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the process command: fetch, chunk, embed, and index a video.
pub async fn run_process(url: &str, force: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Process) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching and indexing transcript...");

    match orchestrator.process_video(url, force).await {
        Ok(result) if result.skipped => {
            spinner.finish_and_clear();
            Output::info(&format!(
                "Video {} is already indexed (use --force to re-process).",
                result.video_id
            ));
        }
        Ok(result) => {
            spinner.finish_and_clear();
            Output::success(&format!(
                "Video {} indexed: {} chunks.",
                result.video_id, result.chunks_indexed
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to process video: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
