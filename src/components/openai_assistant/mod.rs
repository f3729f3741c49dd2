pub mod extractor;
pub mod transcription;

pub use extractor::OpenAiExtractor;
pub use transcription::WhisperTranscriber;
