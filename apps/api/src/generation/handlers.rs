//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::ats::{sanitize, validate, ComplianceReport};
use crate::errors::AppError;
use crate::generation::generator::generate_documents;
use crate::models::profile::GenerationRequest;
use crate::providers::ProviderDescriptor;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Raw backend response, CV and cover letter between their markers.
    pub result: String,
    pub provider: String,
    pub ats_validated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats_report: Option<ComplianceReport>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderDescriptor>,
    /// Id used when a request names no provider.
    pub current: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct AtsValidateRequest {
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct AtsValidateResponse {
    pub report: ComplianceReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate
///
/// Generates a CV and cover letter. A request without a template uses the
/// deployment default.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(mut request): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let template_missing = request
        .profile
        .template
        .as_deref()
        .map_or(true, |t| t.trim().is_empty());
    if template_missing {
        request.profile.template = Some(state.config.default_template.clone());
    }

    let result = generate_documents(&state.registry, &request).await?;

    Ok(Json(GenerateResponse {
        ats_validated: result.ats_validated(),
        result: result.raw_response,
        provider: result.provider,
        ats_report: result.ats_report,
    }))
}

/// GET /ai-providers
///
/// Lists registered backends and whether each has its credentials.
pub async fn handle_list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.registry.list(),
        current: state.registry.default_id(),
    })
}

/// POST /ats/validate
///
/// Scores a CV fragment; non-compliant input also gets a sanitized rewrite.
pub async fn handle_ats_validate(
    Json(request): Json<AtsValidateRequest>,
) -> Json<AtsValidateResponse> {
    let report = validate(&request.html);
    let sanitized = (!report.is_compliant).then(|| sanitize(&request.html));
    Json(AtsValidateResponse { report, sanitized })
}
