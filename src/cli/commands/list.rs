//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use anyhow::Result;

/// Run the list command.
///
/// Opens the store directly so listing works without any API keys.
pub async fn run_list(settings: Settings) -> Result<()> {
    let store = SqliteVectorStore::new(&settings.sqlite_path())?;
    let videos = store.list_videos().await?;

    if videos.is_empty() {
        Output::info("No videos indexed yet. Use 'asktube process <url>' to add one.");
        return Ok(());
    }

    Output::header(&format!("Indexed videos ({})", videos.len()));
    for video in &videos {
        Output::video_info(
            &video.video_id,
            video.chunk_count,
            &video.indexed_at.format("%Y-%m-%d %H:%M").to_string(),
        );
    }

    Ok(())
}
