pub mod common;
pub mod language;
pub mod logger;
