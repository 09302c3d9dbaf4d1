// Services module
// Provider chains for the three pipeline stages

pub mod transcript;  // Stage 1: transcript acquisition
pub mod translation; // Stage 2: translation providers
pub mod tts;         // Stage 3: speech synthesis

pub use transcript::TranscriptFetcher;
pub use translation::Translator;
pub use tts::SpeechSynthesizer;
