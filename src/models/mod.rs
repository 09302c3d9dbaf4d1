// Domain models module
// Contains core data structures used throughout the application

pub mod audio;
pub mod task;
pub mod transcript;

pub use audio::{AudioHandle, AudioPayload, SpeechRequest, SpeechSource};
pub use task::{TabId, Task, TaskId};
pub use transcript::{Segment, Transcript, TranscriptView, split_sentences};
