//! Offline backend: renders a CV and cover letter from the labelled prompt
//! without calling any model. Used when no AI backend is available.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{GenerationBackend, GenerationError, ProviderKind};
use crate::formatting::format_phone_international;
use crate::generation::markers::{COVER_LETTER_END, COVER_LETTER_START, CV_END, CV_START};
use crate::generation::prompts::NOT_PROVIDED;
use crate::models::profile::{GenerationOptions, ATS_TEMPLATE_ID};

static TEMPLATE_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)"\s+template style"#).expect("Should compile: TEMPLATE_STYLE_RE")
});

/// Characters of the job description quoted in the cover letter.
const JOB_DESCRIPTION_EXCERPT: usize = 200;

/// Candidate details recovered from the prompt text.
#[derive(Debug, Clone, PartialEq)]
struct PromptFields {
    name: String,
    email: String,
    phone: String,
    position: String,
    education: String,
    experience: String,
    skills: String,
    job_description: String,
    template: String,
}

pub struct TemplateProvider;

#[async_trait]
impl GenerationBackend for TemplateProvider {
    fn display_name(&self) -> &str {
        ProviderKind::Template.display_name()
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let fields = PromptFields::parse(prompt);
        let date = Utc::now().format("%B %-d, %Y").to_string();

        Ok(format!(
            "{CV_START}\n{}\n{CV_END}\n\n{COVER_LETTER_START}\n{}\n{COVER_LETTER_END}",
            render_cv(&fields),
            render_cover_letter(&fields, &date),
        ))
    }
}

impl PromptFields {
    fn parse(prompt: &str) -> Self {
        let instructions_at = prompt.find("\nINSTRUCTIONS:").unwrap_or(prompt.len());
        let template = TEMPLATE_STYLE_RE
            .captures(&prompt[instructions_at..])
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "classic".to_string());

        PromptFields {
            name: line_field(prompt, "Name:").unwrap_or_else(|| "Your Name".to_string()),
            email: present(line_field(prompt, "Email:")),
            phone: present(line_field(prompt, "Phone:")),
            position: present(line_field(prompt, "Position:")),
            education: block_field(
                prompt,
                "EDUCATION:",
                &["WORK EXPERIENCE:", "SKILLS:", "TARGET JOB:", "INSTRUCTIONS:"],
            )
            .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            experience: block_field(
                prompt,
                "WORK EXPERIENCE:",
                &["SKILLS:", "TARGET JOB:", "INSTRUCTIONS:"],
            )
            .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            skills: present(block_field(
                prompt,
                "SKILLS:",
                &["TARGET JOB:", "INSTRUCTIONS:"],
            )),
            job_description: present(block_field(
                prompt,
                "Job Description:",
                &["INSTRUCTIONS:"],
            )),
            template,
        }
    }
}

/// Drops the placeholder so the renderer can treat it as empty.
fn present(value: Option<String>) -> String {
    value.filter(|v| v != NOT_PROVIDED).unwrap_or_default()
}

/// Byte offset just past `label` where it starts a line.
fn label_end(prompt: &str, label: &str) -> Option<usize> {
    if prompt.starts_with(label) {
        return Some(label.len());
    }
    prompt
        .find(&format!("\n{label}"))
        .map(|at| at + 1 + label.len())
}

/// The rest of the line after `label`.
fn line_field(prompt: &str, label: &str) -> Option<String> {
    let start = label_end(prompt, label)?;
    let rest = &prompt[start..];
    let line = rest.split('\n').next().unwrap_or_default().trim();
    (!line.is_empty()).then(|| line.to_string())
}

/// Everything after `label` up to the first line starting with a terminator.
fn block_field(prompt: &str, label: &str, terminators: &[&str]) -> Option<String> {
    let start = label_end(prompt, label)?;
    let rest = &prompt[start..];
    let end = terminators
        .iter()
        .filter_map(|t| rest.find(&format!("\n{t}")))
        .min()
        .unwrap_or(rest.len());
    let block = rest[..end].trim();
    (!block.is_empty()).then(|| block.to_string())
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

fn render_cv(f: &PromptFields) -> String {
    let phone = format_phone_international(&f.phone);

    if f.template == ATS_TEMPLATE_ID {
        let contact = [
            (!f.email.is_empty()).then(|| format!("Email: {}", f.email)),
            (!phone.is_empty()).then(|| format!("Phone: {phone}")),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" | ");

        let heading = "font-size: 16px; font-weight: bold; margin-top: 20px; margin-bottom: 10px; color: #000000; border-bottom: 1px solid #cccccc; padding-bottom: 5px;";
        let summary = if f.position.is_empty() {
            "Experienced professional with a strong background in relevant skills and proven track record of achievements.".to_string()
        } else {
            format!(
                "Experienced professional targeting the {} role, with a strong background in relevant skills and proven track record of achievements.",
                f.position
            )
        };

        return format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; line-height: 1.6;">
  <h1 style="font-size: 24px; font-weight: bold; margin-bottom: 10px; color: #000000;">{name}</h1>
  <div style="margin-bottom: 20px; font-size: 12px; color: #333333;">{contact}</div>

  <h2 style="{heading}">PROFESSIONAL SUMMARY</h2>
  <p style="margin-bottom: 15px; font-size: 12px;">{summary}</p>

  <h2 style="{heading}">WORK EXPERIENCE</h2>
  <div style="margin-bottom: 20px; font-size: 12px; white-space: pre-wrap;">{experience}</div>

  <h2 style="{heading}">EDUCATION</h2>
  <div style="margin-bottom: 20px; font-size: 12px; white-space: pre-wrap;">{education}</div>

  <h2 style="{heading}">SKILLS</h2>
  <div style="margin-bottom: 20px; font-size: 12px;">{skills}</div>
</div>"#,
            name = f.name,
            experience = f.experience,
            education = f.education,
            skills = or_placeholder(&f.skills),
        );
    }

    let (accent, frame, card, title_extra) = match f.template.as_str() {
        "modern" => (
            "#667eea",
            " background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px;",
            "background: white; padding: 30px; border-radius: 10px;",
            "",
        ),
        "creative" => ("#ff6b6b", "", "", " text-transform: uppercase; letter-spacing: 2px;"),
        _ => ("#333", "", "", ""),
    };
    let rule = if f.template == "modern" { "#667eea" } else { "#333" };
    let heading = format!(
        "color: {rule}; border-bottom: 2px solid #ddd; padding-bottom: 5px; font-size: 18px;"
    );

    let mut contact = String::new();
    if !f.email.is_empty() {
        contact.push_str(&format!("<span>{}</span>", f.email));
    }
    if !phone.is_empty() {
        contact.push_str(&format!(r#"<span style="margin-left: 15px;">{phone}</span>"#));
    }

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px;{frame}">
  <div style="{card}">
    <h1 style="color: {accent}; margin-bottom: 10px;{title_extra}">{name}</h1>
    <div style="margin-bottom: 20px; color: #666; font-size: 14px;">{contact}</div>

    <hr style="border: 2px solid {rule}; margin: 20px 0;">

    <h2 style="{heading}">EDUCATION</h2>
    <div style="white-space: pre-wrap; margin-bottom: 20px; font-size: 12px;">{education}</div>

    <h2 style="{heading}">WORK EXPERIENCE</h2>
    <div style="white-space: pre-wrap; margin-bottom: 20px; font-size: 12px;">{experience}</div>

    <h2 style="{heading}">SKILLS</h2>
    <div style="margin-bottom: 20px; font-size: 12px;">{skills}</div>
  </div>
</div>"#,
        name = f.name,
        education = f.education,
        experience = f.experience,
        skills = or_placeholder(&f.skills),
    )
}

fn render_cover_letter(f: &PromptFields, date: &str) -> String {
    let role = if f.position.is_empty() {
        "position"
    } else {
        f.position.as_str()
    };
    let subject = if f.position.is_empty() {
        "Job Application"
    } else {
        f.position.as_str()
    };

    let mut header = format!("      <div>{}</div>\n", f.name);
    if !f.email.is_empty() {
        header.push_str(&format!("      <div>{}</div>\n", f.email));
    }
    if !f.phone.is_empty() {
        header.push_str(&format!(
            "      <div>{}</div>\n",
            format_phone_international(&f.phone)
        ));
    }

    let mut body = String::new();
    if f.experience != NOT_PROVIDED {
        let highlights: Vec<&str> = f
            .experience
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(3)
            .collect();
        if !highlights.is_empty() {
            body.push_str(&format!(
                "\n    <p>My relevant experience includes:</p><ul><li>{}</li></ul>\n",
                highlights.join("</li><li>")
            ));
        }
    }
    if !f.job_description.is_empty() {
        let excerpt: String = f.job_description.chars().take(JOB_DESCRIPTION_EXCERPT).collect();
        body.push_str(&format!(
            "\n    <p>I am particularly excited about this opportunity because {excerpt}...</p>\n"
        ));
    }

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px;">
  <div style="margin-bottom: 30px;">
    <div style="text-align: right; margin-bottom: 20px;">
{header}      <div style="margin-top: 10px;">{date}</div>
    </div>

    <div style="margin-bottom: 20px;">
      <strong>Re: {subject}</strong>
    </div>
  </div>

  <div style="line-height: 1.8;">
    <p>Dear Hiring Manager,</p>

    <p>I am writing to express my interest in the {role} role. With my background and experience, I am confident that I would be a valuable addition to your team.</p>
{body}
    <p>I would welcome the opportunity to discuss how my skills and experience align with your needs. Thank you for considering my application.</p>

    <p>Sincerely,<br>{name}</p>
  </div>
</div>"#,
        name = f.name,
    )
}
