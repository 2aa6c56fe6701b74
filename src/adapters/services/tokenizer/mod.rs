//! Token counting adapters
//!
//! The KoboldCpp adapter also implements TokenCounterPort; it lives with the
//! other KoboldCpp code under `llm`.

pub mod word_count;

pub use word_count::WordCountTokenizer;
