//! Match report CSV.
//!
//! One row per match in batch order. Text fields are double-quoted and the
//! score is written bare, so spreadsheets read it as a number.

use std::sync::OnceLock;

use anyhow::Context;
use csv::{QuoteStyle, WriterBuilder};
use regex::Regex;

use crate::errors::AppError;
use crate::models::employer::EmployerMatch;

pub const REPORT_HEADERS: [&str; 7] = ["Employer", "Score", "Segment", "Website", "Phone", "Email", "Rationale"];

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// `employer_match_report_<title>.csv` with whitespace runs collapsed to `_`,
/// the title lowercased and anything outside `[a-z0-9_-]` dropped, so the
/// name is always safe inside a quoted `Content-Disposition` header.
pub fn report_filename(title: &str) -> String {
    let slug: String = whitespace_run()
        .replace_all(title.trim(), "_")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect();
    let slug = if slug.is_empty() { "program".to_string() } else { slug };
    format!("employer_match_report_{slug}.csv")
}

pub fn match_report_csv(matches: &[EmployerMatch]) -> Result<String, AppError> {
    if matches.is_empty() {
        return Err(AppError::Precondition(
            "Run employer discovery before downloading the report".to_string(),
        ));
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer.write_record(REPORT_HEADERS).context("Failed to write CSV header")?;
    for m in matches {
        writer
            .write_record([
                m.name.as_str(),
                &m.score.to_string(),
                m.segment.label(),
                m.website.as_deref().unwrap_or_default(),
                m.phone.as_deref().unwrap_or_default(),
                m.contact_email.as_deref().unwrap_or_default(),
                m.rationale.as_str(),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", m.name))?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("Failed to flush CSV: {e}"))?;
    String::from_utf8(bytes)
        .context("CSV output was not UTF-8")
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employer::fixtures::employer;

    #[test]
    fn test_filename_slugifies_title() {
        assert_eq!(
            report_filename("Welding  Technician Program"),
            "employer_match_report_welding_technician_program.csv"
        );
    }

    #[test]
    fn test_filename_drops_header_breaking_characters() {
        assert_eq!(
            report_filename("Welder \"Level 2\"\u{7}; HVAC/R"),
            "employer_match_report_welder_level_2_hvacr.csv"
        );
        assert_eq!(report_filename("\"\"\r"), "employer_match_report_program.csv");
    }

    #[test]
    fn test_csv_has_header_and_row_per_match() {
        let csv = match_report_csv(&[employer("Acme"), employer("Globex")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"Employer\",\"Score\""));
        assert!(lines[1].starts_with(r#""Acme",80,"Talent Pipeline & Retention","https://acme.example","#));
        assert!(lines[1].ends_with(r#","Acme hires welders""#));
    }

    #[test]
    fn test_csv_escapes_embedded_quotes_and_commas() {
        let mut m = employer("Acme");
        m.rationale = r#"Says "we hire", often"#.to_string();
        let csv = match_report_csv(&[m]).unwrap();
        assert!(csv.contains(r#""Says ""we hire"", often""#));
    }

    #[test]
    fn test_empty_report_is_rejected() {
        assert!(matches!(match_report_csv(&[]), Err(AppError::Precondition(_))));
    }
}
