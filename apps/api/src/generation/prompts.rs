// Prompt fragments for CV and cover letter generation.
// The builder in prompt_builder.rs stitches these together; nothing here
// depends on request data except through `TemplateStyle::guidance`.

/// Placeholder for absent fields and empty sections.
pub const NOT_PROVIDED: &str = "Not provided";

/// Opening instruction for every generation prompt.
pub const GENERATION_PREAMBLE: &str = "You are an expert career consultant and professional CV writer. \
    Create a tailored CV and a matching cover letter for the candidate below, \
    targeting the job described at the end. \
    Use ONLY the facts provided; do NOT invent employers, dates, degrees or metrics.";

/// Output contract. The marker lines must match `generation::markers` byte for byte.
pub const OUTPUT_CONTRACT: &str = r#"OUTPUT FORMAT (mandatory):
Return HTML fragments with inline styles only (no <html>, <head> or <body> tags).
Wrap the CV and the cover letter in these exact marker lines:
<!-- CV_START -->
...CV HTML...
<!-- CV_END -->

<!-- COVER_LETTER_START -->
...cover letter HTML...
<!-- COVER_LETTER_END -->
Do not write anything outside the two marked sections."#;

/// The four template styles the builder has dedicated guidance for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStyle {
    AtsOptimized,
    Classic,
    Modern,
    Creative,
}

impl TemplateStyle {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "ats-optimized" => Some(TemplateStyle::AtsOptimized),
            "classic" => Some(TemplateStyle::Classic),
            "modern" => Some(TemplateStyle::Modern),
            "creative" => Some(TemplateStyle::Creative),
            _ => None,
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            TemplateStyle::AtsOptimized => "ATS-OPTIMIZED REQUIREMENTS (strict):\n\
                - Single-column layout built from simple block elements; NO tables, NO images, NO multi-column layouts.\n\
                - Inline styles limited to fonts, sizes, colours, margins and padding; NO position, float, transform, grid or flex.\n\
                - Use exactly these section headings, in capitals: PROFESSIONAL SUMMARY, WORK EXPERIENCE, EDUCATION, SKILLS.\n\
                - Use simple bullet points (•) for achievements; no decorative symbols.\n\
                - Standard fonts (Arial, Calibri, Helvetica) and internationally readable dates (Month YYYY).\n\
                - Mirror relevant keywords from the job description naturally; never keyword-stuff.",
            TemplateStyle::Classic => "STYLE: Classic. Traditional, conservative formatting with clear section headings, \
                restrained colours and professional typography. Keep the structure ATS-friendly.",
            TemplateStyle::Modern => "STYLE: Modern. Contemporary design with a clear visual hierarchy, an accent colour \
                and generous spacing, while remaining ATS-compatible.",
            TemplateStyle::Creative => "STYLE: Creative. An expressive, innovative presentation suited to creative fields, \
                while keeping the text readable and ATS-compatible.",
        }
    }
}

/// Guidance for an identifier with no dedicated style; the id is used as an opaque label.
pub fn custom_style_guidance(label: &str) -> String {
    format!(
        "STYLE: {label}. Follow the \"{label}\" style as closely as you can while keeping \
         the document readable, professional and ATS-friendly."
    )
}
