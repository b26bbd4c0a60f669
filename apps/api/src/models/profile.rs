use serde::{Deserialize, Deserializer, Serialize};

/// Structured education record as submitted by the form UI.
/// Every field is optional; the prompt builder omits whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    /// May be the sentinel `Present`.
    pub end_date: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub gpa: Option<String>,
    pub honors: Option<String>,
    pub description: Option<String>,
}

/// Structured work-experience record as submitted by the form UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    /// May be the sentinel `Present`.
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

/// An education or experience item: either free text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryInput<T> {
    Text(String),
    Record(T),
}

/// Candidate data the prompt is built from. Constructed per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub education: Vec<EntryInput<EducationEntry>>,
    #[serde(deserialize_with = "one_or_many")]
    pub experience: Vec<EntryInput<ExperienceEntry>>,
    pub skills: String,
    pub job_title: String,
    pub job_description: String,
    /// Template identifier; `None` means the deployment default applies.
    pub template: Option<String>,
}

pub const ATS_TEMPLATE_ID: &str = "ats-optimized";

impl CandidateProfile {
    /// The template identifier, falling back to `classic` when none was chosen.
    pub fn template_id(&self) -> &str {
        self.template.as_deref().unwrap_or("classic")
    }

    pub fn is_ats_optimized(&self) -> bool {
        self.template_id() == ATS_TEMPLATE_ID
    }
}

/// Per-request overrides forwarded to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Full body of `POST /generate`: profile fields, provider choice and overrides, all flat.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    #[serde(default)]
    pub ai_provider: Option<String>,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

// `Many` goes first: a struct also deserializes from a sequence, so a
// one-element list would otherwise be taken as a single record.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accepts `null`, a single item, or a list of items.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(
        match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(item)) => vec![item],
            Some(OneOrMany::Many(items)) => items,
        },
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}
