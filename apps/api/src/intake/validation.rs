use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::intake::{is_filled, IntakeField, IntakeForm};

/// Scheme-optional `host.tld` with an optional path.
const URL_PATTERN: &str = r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$";
/// Generic `local@domain.tld` shape.
const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Field → message mapping. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<IntakeField, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The field that should be brought into view, in on-screen order.
    pub fn first_invalid(&self) -> Option<IntakeField> {
        self.errors.keys().next().copied()
    }

    #[cfg(test)]
    pub fn get(&self, field: IntakeField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = IntakeField> + '_ {
        self.errors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear_field(&mut self, field: IntakeField) {
        self.errors.remove(&field);
    }

    fn insert(&mut self, field: IntakeField, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

pub fn is_valid_url(value: &str) -> bool {
    url_regex().is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Validates an intake form. Pure; never touches session state.
pub fn validate_form(form: &IntakeForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !is_filled(&form.title) {
        report.insert(IntakeField::Title, "Title or description is required");
    }
    if !is_filled(&form.region) {
        report.insert(IntakeField::Region, "Region / Service Area is required");
    }
    if !is_filled(&form.industries) {
        report.insert(IntakeField::Industries, "Please list at least one industry");
    }
    if !form.terms_accepted {
        report.insert(
            IntakeField::TermsAccepted,
            "You must accept the terms and conditions to proceed",
        );
    }
    if is_filled(&form.program_link) && !is_valid_url(&form.program_link) {
        report.insert(
            IntakeField::ProgramLink,
            "Please enter a valid URL (e.g., https://college.edu)",
        );
    }
    if is_filled(&form.contact_email) && !is_valid_email(&form.contact_email) {
        report.insert(IntakeField::ContactEmail, "Please enter a valid email address");
    }

    report
}
