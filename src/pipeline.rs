use crate::error::{AppResult, Error};
use crate::meeting::{DefaultingOutcome, MeetingDetails};
use crate::utils::time::normalize_date_phrase;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Collaborator that turns a raw command into structured meeting details
#[async_trait]
pub trait CommandExtractor: Send + Sync {
    /// Extract meeting details from a command, grounding relative dates
    /// against `reference_date` (a `YYYY-MM-DD` string)
    async fn extract(&self, command: &str, reference_date: &str) -> AppResult<MeetingDetails>;
}

/// Collaborator that persists a meeting as a calendar event
#[async_trait]
pub trait EventScheduler: Send + Sync {
    /// Create the event and return a reference URL for it
    async fn schedule(&self, details: &MeetingDetails) -> AppResult<String>;
}

/// Stages a command moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Extracting,
    Normalizing,
    Defaulting,
    Validating,
    Scheduling,
}

/// Terminal result of running one command through the pipeline.
///
/// Every variant carries the final record so the caller can show the
/// resolved details regardless of how the command ended.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Event created; the caller may clear the pending command
    Scheduled {
        details: MeetingDetails,
        event_link: String,
    },
    /// Record failed the minimum-field gate; command kept for editing
    Rejected { details: MeetingDetails },
    /// The scheduling collaborator failed; command kept for retry
    Failed {
        details: MeetingDetails,
        error: Error,
    },
}

/// Runs one command at a time through extraction, normalization,
/// defaulting, validation and scheduling. Never retries on its own; the
/// user resubmits after a `Rejected` or `Failed` outcome.
pub struct CommandPipeline<'a> {
    extractor: &'a dyn CommandExtractor,
    scheduler: &'a dyn EventScheduler,
    timezone: Tz,
}

impl<'a> CommandPipeline<'a> {
    pub fn new(
        extractor: &'a dyn CommandExtractor,
        scheduler: &'a dyn EventScheduler,
        timezone: Tz,
    ) -> Self {
        Self {
            extractor,
            scheduler,
            timezone,
        }
    }

    /// Run a command anchored at the current wall-clock time
    pub async fn run(&self, command: &str) -> CommandOutcome {
        let reference = Utc::now().with_timezone(&self.timezone);
        self.run_at(command, reference).await
    }

    /// Run a command anchored at an explicit reference instant
    pub async fn run_at(&self, command: &str, reference: DateTime<Tz>) -> CommandOutcome {
        if command.trim().is_empty() {
            debug!("Blank command, nothing to schedule");
            return CommandOutcome::Rejected {
                details: MeetingDetails::default(),
            };
        }

        let mut stage = PipelineStage::Idle;

        stage = self.advance(stage, PipelineStage::Extracting);
        let mut details = match self
            .extractor
            .extract(command, &reference.format("%Y-%m-%d").to_string())
            .await
        {
            Ok(details) => details,
            Err(e) => {
                // Degrade to an empty record so the rest of the pipeline
                // always sees a well-typed value; the validation gate will
                // reject it with one coherent message
                warn!("Extraction failed, continuing with empty details: {}", e);
                MeetingDetails::default()
            }
        };

        stage = self.advance(stage, PipelineStage::Normalizing);
        details.start_time = normalize_date_phrase(&details.start_time, reference);
        details.end_time = normalize_date_phrase(&details.end_time, reference);

        stage = self.advance(stage, PipelineStage::Defaulting);
        if let DefaultingOutcome::StartUnparseable(e) = details.apply_default_end_time() {
            warn!(
                "Cannot derive default end time, start time is malformed ({}): {}",
                details.start_time, e
            );
        }

        stage = self.advance(stage, PipelineStage::Validating);
        if !details.is_schedulable() {
            debug!("Record is not schedulable, rejecting");
            return CommandOutcome::Rejected { details };
        }

        self.advance(stage, PipelineStage::Scheduling);
        match self.scheduler.schedule(&details).await {
            Ok(event_link) => CommandOutcome::Scheduled {
                details,
                event_link,
            },
            Err(error) => CommandOutcome::Failed { details, error },
        }
    }

    fn advance(&self, from: PipelineStage, to: PipelineStage) -> PipelineStage {
        debug!("Pipeline stage: {:?} -> {:?}", from, to);
        to
    }
}
