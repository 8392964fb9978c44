use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;

use word_tutor::config::AppConfig;
use word_tutor::core::lesson::{Envelope, LessonPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let log_dir = config.log_dir();
    let _log_guard = word_tutor::core::logging::init(&config.logging, log_dir.as_deref());
    log::info!("{} v{} starting", word_tutor::NAME, word_tutor::VERSION);

    let pipeline = Arc::new(LessonPipeline::from_config(&config)?);
    let languages = config.languages.clone();

    // Arguments form a single request; otherwise every stdin line is one
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let envelope = pipeline.explain(&args.join(" "), &languages).await;
        deliver(envelope);
        return Ok(());
    }

    let stdin = BufReader::new(tokio::io::stdin());
    pipeline
        .serve(stdin, languages, deliver)
        .await
        .context("Failed to read requests")?;

    log::info!("Input closed, shutting down");
    Ok(())
}

/// Print an envelope the way a chat client would receive it.
fn deliver(mut envelope: Envelope) {
    if !envelope.ok {
        if let Some(error) = &envelope.error {
            log::debug!("Request failed: {}", error);
        }
        println!("{}", envelope.text);
        return;
    }

    match (&envelope.audio, &envelope.caption) {
        (Some(audio), Some(caption)) => {
            println!("[audio: {}]\n{}\n", audio.path().display(), caption);
            println!("{}", envelope.text);
        }
        (Some(audio), None) => {
            println!("[audio: {}]\n", audio.path().display());
            println!("{}", envelope.text);
        }
        (None, _) => println!("{}", envelope.text),
    }

    envelope.release_audio();
}
