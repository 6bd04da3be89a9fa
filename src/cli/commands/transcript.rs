//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::TranscriptExtractor;
use crate::transcript::{parse_video_id, TranscriptResult};
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(videos: &[String], json: bool, settings: Settings) -> Result<()> {
    let video_ids = normalize_inputs(videos);
    let extractor = TranscriptExtractor::new(&settings.transcripts)?;

    let spinner = Output::spinner(&format!("Extracting {} transcript(s)...", video_ids.len()));
    let results = extractor.extract_batch(&video_ids).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }

    let failed = results.iter().filter(|r| !r.success).count();
    if failed == results.len() {
        anyhow::bail!("No transcripts could be extracted");
    }

    Ok(())
}

/// Accept URLs or IDs; anything unrecognized is passed through as an ID.
fn normalize_inputs(inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .map(|input| parse_video_id(input).unwrap_or_else(|| input.trim().to_string()))
        .collect()
}

fn print_results(results: &[TranscriptResult]) {
    for result in results {
        let label = if result.title.is_empty() {
            result.video_id.clone()
        } else {
            format!("{} ({})", result.title, result.video_id)
        };

        match &result.error {
            None => {
                Output::header(&label);
                println!("{}", result.transcript);
            }
            Some(error) => Output::error(&format!("{}: {}", label, error)),
        }
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    println!();
    Output::success(&format!("{}/{} transcripts extracted", succeeded, results.len()));
}
