//! Optimizer — rewrites a LaTeX resume against a job description via the LLM.
//!
//! The provider reply is untrusted: it is fence-stripped, sliced to its JSON
//! object, and normalized field-by-field. An unparsable reply degrades to a
//! synthetic success (original document unchanged) rather than an error, so
//! the UI always gets a renderable result.

pub mod handlers;
pub mod prompts;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::llm_client::{extract_json_object, strip_json_fences, GroqClient, LlmApi, LlmError};
use crate::optimizer::prompts::{build_optimize_prompt, OPTIMIZE_SYSTEM};

const MIN_MATCH_SCORE: u32 = 70;
const MAX_MATCH_SCORE: u32 = 95;
/// Mid-range score reported when the provider reply could not be parsed.
const FALLBACK_MATCH_SCORE: u32 = 72;
const MAX_KEYWORDS: usize = 10;
const MAX_SUGGESTIONS: usize = 5;
/// Replies shorter than this are treated as degenerate/truncated and the
/// original document is kept instead.
const MIN_MODIFIED_LATEX_LEN: usize = 50;

const FALLBACK_KEYWORDS: &[&str] = &["communication", "problem solving", "collaboration"];
const DEFAULT_SUGGESTIONS: &[&str] = &[
    "Quantify achievements with numbers",
    "Mirror key terms from the job description",
];

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Both LaTeX resume and job description required")]
    EmptyFields,

    #[error("API key not configured")]
    MissingApiKey,

    #[error("{0}")]
    Provider(String),

    #[error("AI service timeout. Try again.")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<LlmError> for OptimizeError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => OptimizeError::Timeout,
            LlmError::Network(msg) => OptimizeError::Network(msg),
            LlmError::Api { message, .. } => OptimizeError::Provider(message),
            LlmError::EmptyContent => OptimizeError::Provider(err.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OptimizationRequest {
    pub latex_code: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub success: bool,
    pub original_latex: String,
    pub modified_latex: String,
    pub keywords_added: Vec<String>,
    pub match_score: u32,
    pub changes_made: usize,
    pub suggestions: Vec<String>,
    /// True when the provider reply was unusable and synthetic fallback
    /// content was substituted.
    pub degraded: bool,
}

/// Raw shape of the provider's JSON reply. Every field is optional — the
/// model routinely drops keys despite instructions.
#[derive(Debug, Deserialize)]
struct RawOptimization {
    #[serde(default)]
    modified_latex: Option<String>,
    #[serde(default)]
    keywords_added: Option<Vec<String>>,
    #[serde(default)]
    match_score: Option<f64>,
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

/// Resume optimizer. Holds the LLM client when a credential is configured;
/// without one, every call fails fast with `MissingApiKey` before any
/// network activity.
pub struct Optimizer {
    llm: Option<Arc<dyn LlmApi>>,
}

impl Optimizer {
    pub fn new(config: &Config) -> Self {
        let llm = config.groq_api_key.clone().map(|key| {
            Arc::new(GroqClient::new(key, config.groq_api_url.clone())) as Arc<dyn LlmApi>
        });
        Self { llm }
    }

    /// Constructs an optimizer around an injected client. Test seam.
    pub fn with_client(llm: Arc<dyn LlmApi>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn has_client(&self) -> bool {
        self.llm.is_some()
    }

    /// Single optimization pass: one prompt, one provider call, no retries.
    pub async fn optimize(
        &self,
        latex_code: &str,
        job_description: &str,
    ) -> Result<OptimizationResult, OptimizeError> {
        let latex_code = latex_code.trim();
        let job_description = job_description.trim();
        if latex_code.is_empty() || job_description.is_empty() {
            return Err(OptimizeError::EmptyFields);
        }

        let llm = self.llm.as_ref().ok_or(OptimizeError::MissingApiKey)?;

        let prompt = build_optimize_prompt(latex_code, job_description);
        let reply = llm.send(OPTIMIZE_SYSTEM, &prompt).await?;

        Ok(normalize_reply(&reply, latex_code))
    }
}

/// Recovers a structured result from the provider's free-text reply.
/// Unparsable replies yield the synthetic fallback, never an error.
fn normalize_reply(reply: &str, original_latex: &str) -> OptimizationResult {
    let cleaned = strip_json_fences(reply);
    let parsed = extract_json_object(cleaned)
        .and_then(|slice| serde_json::from_str::<RawOptimization>(slice).ok());

    let Some(raw) = parsed else {
        warn!("Provider reply was not parsable JSON; returning fallback result");
        return fallback_result(original_latex);
    };

    let modified_latex = raw
        .modified_latex
        .filter(|l| l.len() >= MIN_MODIFIED_LATEX_LEN)
        .unwrap_or_else(|| original_latex.to_string());

    let mut keywords_added = raw.keywords_added.unwrap_or_default();
    keywords_added.truncate(MAX_KEYWORDS);

    let match_score = clamp_score(raw.match_score.unwrap_or(0.0));

    let mut suggestions = raw.suggestions.unwrap_or_default();
    if suggestions.is_empty() {
        suggestions = DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }
    suggestions.truncate(MAX_SUGGESTIONS);

    let changes_made = count_changes(original_latex, &modified_latex, keywords_added.len());

    debug!(
        match_score,
        changes_made,
        keywords = keywords_added.len(),
        "optimization reply normalized"
    );

    OptimizationResult {
        success: true,
        original_latex: original_latex.to_string(),
        modified_latex,
        keywords_added,
        match_score,
        changes_made,
        suggestions,
        degraded: false,
    }
}

/// Synthetic success returned when the reply could not be parsed at all.
/// Availability over accuracy: the UI still gets a renderable document.
fn fallback_result(original_latex: &str) -> OptimizationResult {
    OptimizationResult {
        success: true,
        original_latex: original_latex.to_string(),
        modified_latex: original_latex.to_string(),
        keywords_added: FALLBACK_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        match_score: FALLBACK_MATCH_SCORE,
        changes_made: 0,
        suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        degraded: true,
    }
}

fn clamp_score(raw: f64) -> u32 {
    let rounded = raw.round();
    if rounded <= MIN_MATCH_SCORE as f64 {
        MIN_MATCH_SCORE
    } else if rounded >= MAX_MATCH_SCORE as f64 {
        MAX_MATCH_SCORE
    } else {
        rounded as u32
    }
}

/// Line-level change count: lines present in the modified document but not
/// in the original (order-insensitive), floored at the keyword count so
/// in-place edits still register a nonzero signal.
fn count_changes(original: &str, modified: &str, keyword_floor: usize) -> usize {
    let original_lines: HashSet<&str> = original.lines().collect();
    let new_lines = modified
        .lines()
        .filter(|l| !original_lines.contains(l))
        .collect::<HashSet<&str>>()
        .len();
    new_lines.max(keyword_floor)
}
