//! Generation orchestrator: runs one request through the full pipeline.
//!
//! Flow: resolve provider → build_prompt → backend.generate → parse_response →
//!       (ats-optimized only) validate → sanitize + splice when non-compliant.
//!
//! The returned `raw_response` is the backend text, with the CV segment
//! replaced only when sanitization ran. Nothing outside the CV markers changes.

use tracing::{info, warn};
use uuid::Uuid;

use crate::ats::{sanitize, validate, ComplianceReport};
use crate::generation::markers::{parse_response, CV_MARKERS};
use crate::generation::prompt_builder::build_prompt;
use crate::models::profile::{CandidateProfile, GenerationRequest};
use crate::providers::{GenerationBackend, GenerationError, ProviderRegistry};

/// Outcome of one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    /// Backend response, with the CV segment sanitized when required.
    pub raw_response: String,
    /// Display name of the backend that produced the response.
    pub provider: String,
    pub cv_fragment: Option<String>,
    pub cover_letter_fragment: Option<String>,
    /// Present when the validator ran over the CV fragment.
    pub ats_report: Option<ComplianceReport>,
    /// True when the CV segment was rewritten by the sanitizer.
    pub sanitized: bool,
}

impl GenerationResult {
    pub fn ats_validated(&self) -> bool {
        self.ats_report.is_some()
    }
}

/// Resolves the requested backend from `registry` and runs the pipeline.
pub async fn generate_documents(
    registry: &ProviderRegistry,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerationError> {
    let provider = registry.resolve(request.ai_provider.as_deref());
    run_pipeline(provider, request).await
}

/// Runs the pipeline against any backend.
pub async fn run_pipeline(
    backend: &dyn GenerationBackend,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerationError> {
    let request_id = Uuid::new_v4();
    let profile = &request.profile;
    info!(
        "[{request_id}] Generating with {} (template: {})",
        backend.display_name(),
        profile.template_id()
    );

    let prompt = build_prompt(profile);
    let raw = backend.generate(&prompt, &request.options).await?;

    let result = finalize(raw, backend.display_name(), profile);
    match &result.ats_report {
        Some(report) => info!(
            "[{request_id}] Generated {} chars, ATS score {}/100 (sanitized: {})",
            result.raw_response.len(),
            report.score,
            result.sanitized
        ),
        None => info!(
            "[{request_id}] Generated {} chars",
            result.raw_response.len()
        ),
    }
    Ok(result)
}

/// Parses markers and applies the ATS pass to a raw backend response.
pub fn finalize(raw: String, provider: &str, profile: &CandidateProfile) -> GenerationResult {
    let parsed = parse_response(&raw);
    if !parsed.is_structured() {
        warn!("{provider} response has no document markers; returning it as-is");
    }

    let mut result = GenerationResult {
        raw_response: raw,
        provider: provider.to_string(),
        cv_fragment: parsed.cv,
        cover_letter_fragment: parsed.cover_letter,
        ats_report: None,
        sanitized: false,
    };

    if !profile.is_ats_optimized() {
        return result;
    }
    let Some(cv) = result.cv_fragment.as_deref() else {
        return result;
    };

    let report = validate(cv);
    if !report.is_compliant {
        warn!(
            "CV from {provider} is not ATS compliant (score {}): {}",
            report.score,
            report.issues.join("; ")
        );
        let cleaned = sanitize(cv);
        if let Some(spliced) = CV_MARKERS.splice(&result.raw_response, &cleaned) {
            result.raw_response = spliced;
            result.cv_fragment = Some(cleaned);
            result.sanitized = true;
        }
    }
    result.ats_report = Some(report);
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
