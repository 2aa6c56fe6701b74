//! External service adapters
//!
//! This module contains adapters for external APIs including:
//! - LLM (Large Language Model) services
//! - Token counting services

pub mod llm;
pub mod tokenizer;
