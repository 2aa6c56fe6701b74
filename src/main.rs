use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use vtt_summarizer::config::CliArgs;
use vtt_summarizer::utils::{read_transcript_lines, validate_transcript_path};
use vtt_summarizer::SummaryPipeline;

/// Single-threaded runtime: chunks are summarized one request at a time
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_filter()))
        .format_timestamp(None)
        .init();

    args.validate().context("Invalid configuration")?;
    validate_transcript_path(&args.transcript)?;

    let settings = args.settings()?;
    let (tokenizer, llm) = args
        .build_services()
        .context("Failed to set up LLM client")?;
    log::info!(
        "Using {} at {} ({:?} token estimate)",
        llm.provider_name(),
        args.base_url(),
        args.tokenizer
    );

    let raw_lines = read_transcript_lines(&args.transcript)
        .with_context(|| format!("Failed to read {}", args.transcript.display()))?;

    let pipeline = SummaryPipeline::new(tokenizer, llm, settings)?;
    let summary = pipeline
        .summarize_lines(&raw_lines)
        .await
        .context("Summarization failed")?;

    println!("{}", summary);
    Ok(())
}
