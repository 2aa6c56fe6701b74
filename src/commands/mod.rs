//! Application commands
//!
//! Use cases wired together from the domain and the ports.

pub mod summarize;

pub use summarize::{SummarizeSettings, SummaryPipeline};
