/// Domain layer - transcript models and the condense/chunk algorithms
///
/// Nothing in here performs I/O; collaborators live behind the ports.
pub mod chunker;
pub mod condenser;
pub mod models;
pub mod prompts;

pub use chunker::chunk_transcript;
pub use condenser::{condense, condense_text};
pub use models::{
    Chunk, ChunkingConfig, CondensedTranscript, TimeRange, Timestamp, TranscriptLine,
};
pub use prompts::{InstructFormat, PromptTemplates};
