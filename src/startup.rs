use crate::components::{GoogleCalendarClient, OpenAiExtractor, WhisperTranscriber};
use crate::config::Config;
use crate::error::Error;
use crate::pipeline::{CommandOutcome, CommandPipeline};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Pending command for the session. The shell owns this value: it is set
/// from text entry or a finished transcription and cleared only after a
/// command schedules successfully, so a rejected or failed command can be
/// edited and resubmitted.
#[derive(Debug, Default)]
struct Session {
    current_command: String,
}

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run the interactive scheduling shell until EOF or `:quit`
pub async fn run(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (config_snapshot, timezone) = {
        let config_read = config.read().await;
        (config_read.clone(), config_read.tz()?)
    };

    let extractor = OpenAiExtractor::new(&config_snapshot);
    let transcriber = WhisperTranscriber::new(&config_snapshot);
    let scheduler = GoogleCalendarClient::new(Arc::clone(&config));
    let pipeline = CommandPipeline::new(&extractor, &scheduler, timezone);

    let mut session = Session::default();

    println!("Enter a meeting command (e.g. \"Schedule a meeting with Bob tomorrow at 2pm\").");
    println!("Use :voice <audio-file> for a recorded command, :quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().map_err(Error::from)?;

        let Some(line) = lines.next_line().await.map_err(Error::from)? else {
            break;
        };
        let input = line.trim();

        match input {
            ":quit" | ":exit" => break,
            "" => {
                // Enter on an empty line resubmits a rejected or failed
                // command; otherwise there is nothing to do
                if session.current_command.trim().is_empty() {
                    continue;
                }
            }
            _ if input.starts_with(":voice") => {
                let path = input.trim_start_matches(":voice").trim();
                if path.is_empty() {
                    println!("Usage: :voice <audio-file>");
                    continue;
                }
                match transcribe_file(&transcriber, path).await {
                    Some(transcript) => {
                        println!("Transcribed text: {}", transcript);
                        session.current_command = transcript;
                    }
                    None => continue,
                }
            }
            command => {
                session.current_command = command.to_string();
            }
        }

        if session.current_command.trim().is_empty() {
            continue;
        }

        info!("Processing command: {}", session.current_command);
        let outcome = pipeline.run(&session.current_command).await;
        report_outcome(&mut session, outcome);
    }

    Ok(())
}

/// Read an audio file and transcribe it, reporting problems to the user
async fn transcribe_file(transcriber: &WhisperTranscriber, path: &str) -> Option<String> {
    let audio = match tokio::fs::read(path).await {
        Ok(audio) => audio,
        Err(e) => {
            println!("Could not read {}: {}", path, e);
            return None;
        }
    };

    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.mp3");

    match transcriber.transcribe(audio, file_name).await {
        Ok(Some(transcript)) => Some(transcript),
        Ok(None) => {
            println!("No speech was recognized in {}.", path);
            None
        }
        Err(e) => {
            error!("Transcription failed: {:?}", e);
            println!("Transcription failed: {}", e);
            None
        }
    }
}

/// Show the resolved record and the outcome banner, clearing the pending
/// command only on success
fn report_outcome(session: &mut Session, outcome: CommandOutcome) {
    let details = match &outcome {
        CommandOutcome::Scheduled { details, .. } => details,
        CommandOutcome::Rejected { details } => details,
        CommandOutcome::Failed { details, .. } => details,
    };

    println!("Meeting details:");
    match serde_json::to_string_pretty(details) {
        Ok(preview) => println!("{}", preview),
        Err(e) => error!("Failed to render details preview: {}", e),
    }

    match outcome {
        CommandOutcome::Scheduled { event_link, .. } => {
            println!("Meeting scheduled successfully! View event: {}", event_link);
            session.current_command.clear();
        }
        CommandOutcome::Rejected { .. } => {
            println!("Insufficient meeting details extracted. Edit the command and try again.");
        }
        CommandOutcome::Failed { error, .. } => {
            println!("Error scheduling meeting: {}", error);
        }
    }
}
