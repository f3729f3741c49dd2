// Export components
pub mod google_calendar;
pub mod openai_assistant;

// Re-export collaborator implementations
pub use google_calendar::GoogleCalendarClient;
pub use openai_assistant::{OpenAiExtractor, WhisperTranscriber};
