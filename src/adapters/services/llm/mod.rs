//! LLM service adapters
//!
//! Implementations of the LlmServicePort trait for local inference servers:
//! - KoboldCpp (native generate API)
//! - OpenAI-compatible chat completions (llama.cpp server, vLLM, OpenAI)

pub mod koboldcpp;
pub mod openai;

pub use koboldcpp::KoboldCppService;
pub use openai::OpenAICompatService;
