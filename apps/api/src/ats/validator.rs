//! ATS compliance validator: classifies generated CV markup against a fixed rule set.
//!
//! Pure and total: any input text yields a report.
//!
//! # Rules
//! - tables, images → blocking issues (−25 each)
//! - layout CSS in an inline style → warning (−5)
//! - no canonical section heading → warning; its cost is the withheld +10 bonus
//! - ASCII-style bullets → positive signal (+5)
//! - columns, decorative glyphs, header/footer blocks → recorded in `checks` only
//!
//! The score is clamped to 0–100, and a fragment with blocking issues never
//! scores above `100 − 25·issues`. Compliance depends on blocking issues alone.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Decorative glyphs ATS parsers tend to mangle.
pub const BULLET_GLYPHS: [char; 8] = ['●', '○', '◆', '◇', '■', '□', '▲', '△'];

pub const CANONICAL_HEADINGS: [&str; 4] =
    ["PROFESSIONAL SUMMARY", "WORK EXPERIENCE", "EDUCATION", "SKILLS"];

const BASE_SCORE: i32 = 100;
const ISSUE_PENALTY: i32 = 25;
const WARNING_PENALTY: i32 = 5;
const BULLET_BONUS: i32 = 5;
const HEADINGS_BONUS: i32 = 10;

pub const TABLES_ISSUE: &str = "Contains tables - ATS systems struggle with table layouts";
pub const IMAGES_ISSUE: &str = "Contains images - ATS cannot read image content";
pub const COMPLEX_CSS_WARNING: &str = "Contains complex CSS - May cause parsing issues";
pub const MISSING_SECTIONS_WARNING: &str =
    "Missing standard section headers - May affect ATS parsing";
pub const BULLETS_POSITIVE: &str = "Uses bullet points - Good for ATS";

static TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<table[^>]*>").expect("Should compile: TABLE_RE"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<img[^>]*>").expect("Should compile: IMAGE_RE"));
static COMPLEX_CSS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)style="[^"]*(?:position|float|absolute|relative|transform|grid|flex)[^"]*""#)
        .expect("Should compile: COMPLEX_CSS_RE")
});
static COLUMNS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)column|col-").expect("Should compile: COLUMNS_RE"));
static HEADER_FOOTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<header|<footer").expect("Should compile: HEADER_FOOTER_RE"));
static STANDARD_SECTIONS_RE: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = CANONICAL_HEADINGS.iter().map(|h| regex::escape(h)).collect();
    Regex::new(&format!("(?i){}", alternatives.join("|")))
        .expect("Should compile: STANDARD_SECTIONS_RE")
});
static BULLET_POINTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[•·-]\s").expect("Should compile: BULLET_POINTS_RE"));

/// Boolean structural checks, one per rule, always all present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceChecks {
    pub has_tables: bool,
    pub has_images: bool,
    pub has_complex_css: bool,
    pub has_columns: bool,
    pub has_special_chars: bool,
    /// Recorded for callers; not part of the score.
    pub has_headers_footers: bool,
    pub has_standard_sections: bool,
    pub has_bullet_points: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// 0 – 100
    pub score: u8,
    /// True iff `issues` is empty. Warnings never affect it.
    pub is_compliant: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub positives: Vec<String>,
    pub checks: ComplianceChecks,
}

/// Runs every check over `fragment`.
pub fn run_checks(fragment: &str) -> ComplianceChecks {
    ComplianceChecks {
        has_tables: TABLE_RE.is_match(fragment),
        has_images: IMAGE_RE.is_match(fragment),
        has_complex_css: COMPLEX_CSS_RE.is_match(fragment),
        has_columns: COLUMNS_RE.is_match(fragment),
        has_special_chars: fragment.contains(&BULLET_GLYPHS[..]),
        has_headers_footers: HEADER_FOOTER_RE.is_match(fragment),
        has_standard_sections: STANDARD_SECTIONS_RE.is_match(fragment),
        has_bullet_points: BULLET_POINTS_RE.is_match(fragment),
    }
}

/// Validates a CV fragment and scores it.
pub fn validate(fragment: &str) -> ComplianceReport {
    let checks = run_checks(fragment);

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut positives = Vec::new();

    if checks.has_tables {
        issues.push(TABLES_ISSUE.to_string());
    }
    if checks.has_images {
        issues.push(IMAGES_ISSUE.to_string());
    }
    if checks.has_complex_css {
        warnings.push(COMPLEX_CSS_WARNING.to_string());
    }
    if !checks.has_standard_sections {
        warnings.push(MISSING_SECTIONS_WARNING.to_string());
    }
    if checks.has_bullet_points {
        positives.push(BULLETS_POSITIVE.to_string());
    }

    let score = compute_score(&checks);

    ComplianceReport {
        score,
        is_compliant: issues.is_empty(),
        issues,
        warnings,
        positives,
        checks,
    }
}

/// Scores a set of checks.
///
/// Bonuses cannot lift a fragment with blocking issues above the ceiling those
/// issues impose, so one table always caps the score at 75.
pub fn compute_score(checks: &ComplianceChecks) -> u8 {
    let issue_count = i32::from(checks.has_tables) + i32::from(checks.has_images);
    let ceiling = BASE_SCORE - ISSUE_PENALTY * issue_count;

    let mut score = ceiling;
    if checks.has_complex_css {
        score -= WARNING_PENALTY;
    }
    if checks.has_bullet_points {
        score += BULLET_BONUS;
    }
    if checks.has_standard_sections {
        score += HEADINGS_BONUS;
    }
    score.min(ceiling).clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_table_scores_75() {
        let report = validate("<table><tr><td>x</td></tr></table>");
        assert!(!report.is_compliant);
        assert_eq!(report.score, 75);
        assert_eq!(report.issues, vec![TABLES_ISSUE.to_string()]);
        assert!(report.issues[0].contains("table"));
        assert_eq!(report.warnings, vec![MISSING_SECTIONS_WARNING.to_string()]);
    }

    #[test]
    fn test_table_with_headings_is_still_non_compliant() {
        let report = validate("<h2>SKILLS</h2><TABLE class=\"x\"><tr><td>Rust</td></tr></TABLE>");
        assert!(!report.is_compliant);
        assert!(report.score <= 75);
        assert!(report.checks.has_tables);
    }

    #[test]
    fn test_images_are_blocking() {
        let report = validate("<h2>EDUCATION</h2><img src=\"logo.png\" alt=\"logo\">");
        assert!(!report.is_compliant);
        assert_eq!(report.issues, vec![IMAGES_ISSUE.to_string()]);
        // the heading bonus cannot lift it above the 75 ceiling
        assert_eq!(report.score, 75);
    }

    #[test]
    fn test_clean_fragment_scores_full_marks() {
        let report = validate(
            "<h2>WORK EXPERIENCE</h2><p>• Shipped the analytics platform</p><h2>SKILLS</h2>",
        );
        assert!(report.is_compliant);
        assert!(report.issues.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.positives, vec![BULLETS_POSITIVE.to_string()]);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_fragment_without_table_or_image_is_compliant() {
        for fragment in [
            "",
            "plain text",
            "<div style=\"display: flex; position: absolute\">●</div>",
            "<header>Top</header><div class=\"col-6\">x</div>",
        ] {
            assert!(validate(fragment).is_compliant, "{fragment}");
        }
    }

    #[test]
    fn test_complex_css_is_a_warning() {
        let report = validate("<h2>SKILLS</h2><div style=\"display: grid;\">x</div>");
        assert!(report.is_compliant);
        assert_eq!(report.warnings, vec![COMPLEX_CSS_WARNING.to_string()]);
        // 100 - 5 + 10 clamps to 100
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_layout_words_outside_style_are_not_complex_css() {
        let report = validate("<p>Position: Senior Analyst; relative growth of 40%</p>");
        assert!(!report.checks.has_complex_css);
    }

    #[test]
    fn test_each_canonical_heading_counts() {
        for heading in CANONICAL_HEADINGS {
            assert!(run_checks(&format!("<h2>{heading}</h2>")).has_standard_sections, "{heading}");
        }
    }

    #[test]
    fn test_headings_are_case_insensitive() {
        assert!(run_checks("<h2>Work Experience</h2>").has_standard_sections);
        assert!(!run_checks("<h2>Career</h2>").has_standard_sections);
    }

    #[test]
    fn test_informational_checks_do_not_affect_score() {
        let plain = validate("<h2>SKILLS</h2>");
        let noisy = validate(
            "<header>h</header><h2>SKILLS</h2><div class=\"two-column col-6\">■ item</div><footer>f</footer>",
        );
        assert!(noisy.checks.has_columns);
        assert!(noisy.checks.has_special_chars);
        assert!(noisy.checks.has_headers_footers);
        assert_eq!(plain.score, noisy.score);
        assert_eq!(plain.issues, noisy.issues);
        assert_eq!(plain.warnings, noisy.warnings);
    }

    #[test]
    fn test_bullet_markers() {
        assert!(run_checks("• one").has_bullet_points);
        assert!(run_checks("· one").has_bullet_points);
        assert!(run_checks("- one").has_bullet_points);
        assert!(!run_checks("sans-serif").has_bullet_points);
    }

    #[test]
    fn test_any_table_caps_score_at_75() {
        let report = validate(
            "<h2>PROFESSIONAL SUMMARY</h2><p>• Analyst</p><table><tr><td>x</td></tr></table>",
        );
        assert!(!report.is_compliant);
        assert_eq!(report.score, 75);
    }

    #[test]
    fn test_score_penalties_stack() {
        let checks = ComplianceChecks {
            has_tables: true,
            has_images: true,
            has_complex_css: true,
            ..ComplianceChecks::default()
        };
        assert_eq!(compute_score(&checks), 45);
    }

    #[test]
    fn test_score_is_clamped_at_100() {
        let checks = ComplianceChecks {
            has_standard_sections: true,
            has_bullet_points: true,
            ..ComplianceChecks::default()
        };
        assert_eq!(compute_score(&checks), 100);
    }

    #[test]
    fn test_missing_headings_is_reported_as_warning() {
        let report = validate("<p>Ada Lovelace</p>");
        assert!(report.is_compliant);
        assert_eq!(report.warnings, vec![MISSING_SECTIONS_WARNING.to_string()]);
        assert!(!report.checks.has_standard_sections);
    }

    #[test]
    fn test_report_serializes_with_fixed_check_keys() {
        let json = serde_json::to_value(validate("<img src=x>")).unwrap();
        assert_eq!(json["isCompliant"], false);
        let keys: Vec<_> = json["checks"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 8);
        for key in [
            "hasTables",
            "hasImages",
            "hasComplexCss",
            "hasColumns",
            "hasSpecialChars",
            "hasHeadersFooters",
            "hasStandardSections",
            "hasBulletPoints",
        ] {
            assert!(keys.iter().any(|k| k == key), "missing {key}");
        }
    }
}
