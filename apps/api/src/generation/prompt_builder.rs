//! Prompt Builder: turns a candidate profile into deterministic instruction text.
//!
//! `build_prompt` is pure: the same profile always yields byte-identical text.
//! Nothing here reads the clock, the environment or any unordered collection.

use crate::formatting::format_date_for_cv;
use crate::generation::prompts::{
    custom_style_guidance, TemplateStyle, GENERATION_PREAMBLE, NOT_PROVIDED, OUTPUT_CONTRACT,
};
use crate::models::profile::{CandidateProfile, EducationEntry, EntryInput, ExperienceEntry};

/// A structured record that can be rendered as one prompt paragraph.
pub trait EntryParagraph {
    fn to_paragraph(&self) -> String;
}

impl<T: EntryParagraph> EntryInput<T> {
    /// Free text passes through verbatim; records are rendered.
    pub fn normalize(&self) -> String {
        match self {
            EntryInput::Text(text) => text.clone(),
            EntryInput::Record(record) => record.to_paragraph(),
        }
    }
}

impl EntryParagraph for EducationEntry {
    fn to_paragraph(&self) -> String {
        let title = match (filled(&self.degree), filled(&self.field)) {
            (Some(degree), Some(field)) => Some(format!("{degree} in {field}")),
            (degree, field) => degree.or(field).map(str::to_string),
        };
        let head = headline(
            [title.as_deref(), filled(&self.institution), filled(&self.location)],
            date_range(&self.start_date, &self.end_date),
        );

        let mut lines: Vec<String> = head.into_iter().collect();
        if let Some(gpa) = filled(&self.gpa) {
            lines.push(format!("GPA: {gpa}"));
        }
        if let Some(honors) = filled(&self.honors) {
            lines.push(format!("Honors: {honors}"));
        }
        if let Some(description) = filled(&self.description) {
            lines.push(description.to_string());
        }
        lines.join("\n")
    }
}

impl EntryParagraph for ExperienceEntry {
    fn to_paragraph(&self) -> String {
        let role = match (filled(&self.job_title), filled(&self.company)) {
            (Some(title), Some(company)) => Some(format!("{title} at {company}")),
            (title, company) => title.or(company).map(str::to_string),
        };
        let head = headline(
            [role.as_deref(), filled(&self.location), None],
            date_range(&self.start_date, &self.end_date),
        );

        let mut lines: Vec<String> = head.into_iter().collect();
        if let Some(description) = filled(&self.description) {
            lines.push(description.to_string());
        }
        lines.extend(
            self.achievements
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(|a| format!("- {a}")),
        );
        lines.join("\n")
    }
}

/// Builds the full generation prompt for `profile`.
pub fn build_prompt(profile: &CandidateProfile) -> String {
    let template = profile.template_id();
    let guidance = match TemplateStyle::from_id(template) {
        Some(style) => style.guidance().to_string(),
        None => custom_style_guidance(template),
    };

    format!(
        "{GENERATION_PREAMBLE}

CANDIDATE INFORMATION:
Name: {name}
Email: {email}
Phone: {phone}
Address: {address}
LinkedIn: {linkedin}
Portfolio: {portfolio}

EDUCATION:
{education}

WORK EXPERIENCE:
{experience}

SKILLS:
{skills}

TARGET JOB:
Position: {position}
Job Description: {job_description}

INSTRUCTIONS:
Use the \"{template}\" template style.
{guidance}

{OUTPUT_CONTRACT}
",
        name = scalar(&profile.name),
        email = scalar(&profile.email),
        phone = scalar(&profile.phone),
        address = optional_scalar(&profile.address),
        linkedin = optional_scalar(&profile.linkedin),
        portfolio = optional_scalar(&profile.portfolio),
        education = section(&profile.education),
        experience = section(&profile.experience),
        skills = scalar(&profile.skills),
        position = scalar(&profile.job_title),
        job_description = scalar(&profile.job_description),
    )
}

/// Joins normalized entries with a blank line, in input order.
pub fn section<T: EntryParagraph>(entries: &[EntryInput<T>]) -> String {
    let paragraphs: Vec<String> = entries
        .iter()
        .map(EntryInput::normalize)
        .filter(|p| !p.trim().is_empty())
        .collect();

    if paragraphs.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        paragraphs.join("\n\n")
    }
}

fn scalar(value: &str) -> &str {
    match value.trim() {
        "" => NOT_PROVIDED,
        trimmed => trimmed,
    }
}

fn optional_scalar(value: &Option<String>) -> &str {
    scalar(value.as_deref().unwrap_or_default())
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// `part, part, part (dates)`, skipping absent parts.
fn headline(parts: [Option<&str>; 3], dates: Option<String>) -> Option<String> {
    let joined = parts.into_iter().flatten().collect::<Vec<_>>().join(", ");
    match (joined.is_empty(), dates) {
        (true, None) => None,
        (true, Some(dates)) => Some(format!("({dates})")),
        (false, None) => Some(joined),
        (false, Some(dates)) => Some(format!("{joined} ({dates})")),
    }
}

fn date_range(start: &Option<String>, end: &Option<String>) -> Option<String> {
    match (
        filled(start).map(format_date_for_cv),
        filled(end).map(format_date_for_cv),
    ) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (start, end) => start.or(end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::markers::{COVER_LETTER_END, COVER_LETTER_START, CV_END, CV_START};

    fn ada() -> CandidateProfile {
        CandidateProfile {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+1 555 000 1111".to_string(),
            education: vec![EntryInput::Text("BSc Mathematics, Kings College".to_string())],
            experience: vec![EntryInput::Text("Analyst at Acme, 2020-2022".to_string())],
            skills: "Python, Statistics".to_string(),
            job_title: "Data Analyst".to_string(),
            job_description: "...".to_string(),
            template: Some("classic".to_string()),
            ..CandidateProfile::default()
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let profile = ada();
        assert_eq!(build_prompt(&profile), build_prompt(&profile));
        assert_eq!(build_prompt(&profile), build_prompt(&profile.clone()));
    }

    #[test]
    fn test_prompt_carries_labelled_candidate_data() {
        let prompt = build_prompt(&ada());
        assert!(prompt.contains("Name: Ada Lovelace\n"));
        assert!(prompt.contains("Phone: +1 555 000 1111\n"));
        assert!(prompt.contains("EDUCATION:\nBSc Mathematics, Kings College\n"));
        assert!(prompt.contains("WORK EXPERIENCE:\nAnalyst at Acme, 2020-2022\n"));
        assert!(prompt.contains("SKILLS:\nPython, Statistics\n"));
        assert!(prompt.contains("Position: Data Analyst\n"));
        assert!(prompt.contains("Use the \"classic\" template style."));
        assert!(prompt.contains(TemplateStyle::Classic.guidance()));
    }

    #[test]
    fn test_prompt_embeds_marker_contract() {
        let prompt = build_prompt(&ada());
        for marker in [CV_START, CV_END, COVER_LETTER_START, COVER_LETTER_END] {
            assert!(prompt.lines().any(|line| line == marker));
        }
    }

    #[test]
    fn test_absent_fields_render_placeholder() {
        let prompt = build_prompt(&CandidateProfile::default());
        assert!(prompt.contains("Address: Not provided\n"));
        assert!(prompt.contains("EDUCATION:\nNot provided\n"));
        assert!(prompt.contains("WORK EXPERIENCE:\nNot provided\n"));
        assert!(prompt.contains("SKILLS:\nNot provided\n"));
    }

    #[test]
    fn test_template_selects_guidance() {
        let mut profile = ada();
        profile.template = Some("ats-optimized".to_string());
        assert!(build_prompt(&profile).contains(TemplateStyle::AtsOptimized.guidance()));

        profile.template = Some("modern".to_string());
        assert!(build_prompt(&profile).contains(TemplateStyle::Modern.guidance()));

        profile.template = Some("creative".to_string());
        assert!(build_prompt(&profile).contains(TemplateStyle::Creative.guidance()));
    }

    #[test]
    fn test_unknown_template_is_an_opaque_label() {
        let mut profile = ada();
        profile.template = Some("minimal-mono".to_string());
        let prompt = build_prompt(&profile);
        assert!(prompt.contains("Use the \"minimal-mono\" template style."));
        assert!(prompt.contains(&custom_style_guidance("minimal-mono")));
    }

    #[test]
    fn test_education_record_renders_all_parts() {
        let entry = EducationEntry {
            degree: Some("BSc".to_string()),
            field: Some("Mathematics".to_string()),
            institution: Some("Kings College".to_string()),
            location: Some("London".to_string()),
            start_date: Some("2015-09".to_string()),
            end_date: Some("06/2018".to_string()),
            gpa: Some("3.9".to_string()),
            honors: Some("First Class".to_string()),
            description: Some("Thesis on analytical engines".to_string()),
        };
        assert_eq!(
            entry.to_paragraph(),
            "BSc in Mathematics, Kings College, London (September 2015 - June 2018)\n\
             GPA: 3.9\n\
             Honors: First Class\n\
             Thesis on analytical engines"
        );
    }

    #[test]
    fn test_experience_record_renders_achievements_in_order() {
        let entry = ExperienceEntry {
            job_title: Some("Analyst".to_string()),
            company: Some("Acme".to_string()),
            location: None,
            start_date: Some("2020-01".to_string()),
            end_date: Some("Present".to_string()),
            description: Some("Built reporting pipelines.".to_string()),
            achievements: vec![
                "Cut report latency by 40%".to_string(),
                "  ".to_string(),
                "Trained 5 analysts".to_string(),
            ],
        };
        assert_eq!(
            entry.to_paragraph(),
            "Analyst at Acme (January 2020 - Present)\n\
             Built reporting pipelines.\n\
             - Cut report latency by 40%\n\
             - Trained 5 analysts"
        );
    }

    #[test]
    fn test_mixed_entries_keep_order_and_blank_line_separator() {
        let entries = vec![
            EntryInput::Record(ExperienceEntry {
                job_title: Some("Engineer".to_string()),
                company: Some("Initech".to_string()),
                ..ExperienceEntry::default()
            }),
            EntryInput::Text("   ".to_string()),
            EntryInput::Text("Intern at Acme".to_string()),
        ];
        assert_eq!(section(&entries), "Engineer at Initech\n\nIntern at Acme");
    }

    #[test]
    fn test_text_entries_pass_through_verbatim() {
        let text = "  Analyst at Acme\n  - reports  ";
        let entry: EntryInput<ExperienceEntry> = EntryInput::Text(text.to_string());
        assert_eq!(entry.normalize(), text);
    }

    #[test]
    fn test_day_precision_dates_are_kept() {
        let entry = ExperienceEntry {
            company: Some("Acme".to_string()),
            start_date: Some("2021-03-15".to_string()),
            ..ExperienceEntry::default()
        };
        assert_eq!(entry.to_paragraph(), "Acme (2021-03-15)");
    }
}
