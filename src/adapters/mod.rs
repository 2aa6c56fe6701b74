/// Adapters - concrete implementations of the ports
///
/// These modules implement the port traits for specific services.
pub mod services;

pub use services::llm::{KoboldCppService, OpenAICompatService};
pub use services::tokenizer::WordCountTokenizer;
