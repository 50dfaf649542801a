// ABOUTME: Gemini-backed analysis for Milemap
// ABOUTME: Prompt catalog plus the generateContent client

pub mod prompt;
pub mod service;

pub use prompt::{
    item_prompt, portfolio_prompt, prompt_summary, ItemAnalysisRequest, PORTFOLIO_PROMPT_SUMMARY,
};
pub use service::{AnalysisError, AnalysisResult, AnalysisService};
