//! Prompt templates for chunk summarization
//!
//! Provides the default summary instruction and the instruction-delimiter
//! conventions understood by common local models.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Instruction placed before every chunk of transcript
    pub fn summary() -> &'static str {
        "Write a detailed summary of the following transcript from a work meeting. \
Organize the content into clear, chronological paragraphs that maintain a natural narrative flow. \
Make sure to include all important details, technical insights, and notable terms, \
suitable for a technical reader. Ensure to integrate the contributions of all speakers, \
omitting only minor interjections. The summary should provide a comprehensive and detailed \
overview that logically progresses through the discussions, targeted at two pages in length.\n\n"
    }

    /// Builds the full prompt for one chunk
    pub fn chunk_prompt(preamble: &str, chunk_text: &str, format: InstructFormat) -> String {
        format.wrap(&format!("{}{}", preamble, chunk_text))
    }
}

/// Instruction-delimiter convention wrapped around the prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructFormat {
    /// Send the prompt as-is (chat endpoints apply their own template)
    #[default]
    None,
    Alpaca,
    ChatMl,
    Llama3,
    Mistral,
}

impl InstructFormat {
    pub fn wrap(&self, instruction: &str) -> String {
        match self {
            InstructFormat::None => instruction.to_string(),
            InstructFormat::Alpaca => {
                format!("### Instruction:\n{}\n\n### Response:\n", instruction)
            }
            InstructFormat::ChatMl => format!(
                "<|im_start|>user\n{}<|im_end|>\n<|im_start|>assistant\n",
                instruction
            ),
            InstructFormat::Llama3 => format!(
                "<|start_header_id|>user<|end_header_id|>\n\n{}<|eot_id|>\
                 <|start_header_id|>assistant<|end_header_id|>\n\n",
                instruction
            ),
            InstructFormat::Mistral => format!("[INST] {} [/INST]", instruction),
        }
    }
}

impl std::fmt::Display for InstructFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructFormat::None => write!(f, "none"),
            InstructFormat::Alpaca => write!(f, "alpaca"),
            InstructFormat::ChatMl => write!(f, "chatml"),
            InstructFormat::Llama3 => write!(f, "llama3"),
            InstructFormat::Mistral => write!(f, "mistral"),
        }
    }
}

impl FromStr for InstructFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(InstructFormat::None),
            "alpaca" => Ok(InstructFormat::Alpaca),
            "chatml" => Ok(InstructFormat::ChatMl),
            "llama3" => Ok(InstructFormat::Llama3),
            "mistral" => Ok(InstructFormat::Mistral),
            other => Err(AppError::Config(format!(
                "Unknown instruct format: {}",
                other
            ))),
        }
    }
}
