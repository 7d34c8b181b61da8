//! Form state store: intake values plus the errors from the last validation.

use serde::Serialize;

use crate::intake::validation::{validate_form, ValidationReport};
use crate::models::intake::{FormPatch, IntakeField, IntakeForm};
use crate::models::profile::{ContactInfo, EnhanceRequest};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub values: IntakeForm,
    pub errors: ValidationReport,
}

impl FormState {
    /// Applies a partial edit. Every field that is written has its stale
    /// validation error cleared.
    pub fn apply(&mut self, patch: FormPatch) {
        let FormPatch {
            title,
            region,
            industries,
            wage_range,
            contact_name,
            contact_email,
            contact_phone,
            program_link,
            terms_accepted,
        } = patch;

        let text_fields = [
            (IntakeField::Title, title),
            (IntakeField::Region, region),
            (IntakeField::Industries, industries),
            (IntakeField::WageRange, wage_range),
            (IntakeField::ContactName, contact_name),
            (IntakeField::ContactEmail, contact_email),
            (IntakeField::ContactPhone, contact_phone),
            (IntakeField::ProgramLink, program_link),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                self.set_text(field, value);
            }
        }
        if let Some(accepted) = terms_accepted {
            self.values.terms_accepted = accepted;
            self.errors.clear_field(IntakeField::TermsAccepted);
        }
    }

    /// Writes a single text field and clears its error. `TermsAccepted` is
    /// not a text field and is ignored here.
    pub fn set_text(&mut self, field: IntakeField, value: String) {
        let slot = match field {
            IntakeField::Title => &mut self.values.title,
            IntakeField::Region => &mut self.values.region,
            IntakeField::Industries => &mut self.values.industries,
            IntakeField::WageRange => &mut self.values.wage_range,
            IntakeField::ContactName => &mut self.values.contact_name,
            IntakeField::ContactEmail => &mut self.values.contact_email,
            IntakeField::ContactPhone => &mut self.values.contact_phone,
            IntakeField::ProgramLink => &mut self.values.program_link,
            IntakeField::TermsAccepted => return,
        };
        *slot = value;
        self.errors.clear_field(field);
    }

    /// Re-validates and stores the resulting errors.
    pub fn validate(&mut self) -> &ValidationReport {
        self.errors = validate_form(&self.values);
        &self.errors
    }

    /// Builds the enhancement input. Industries are split here and only here.
    pub fn to_enhance_request(&self) -> EnhanceRequest {
        let v = &self.values;
        EnhanceRequest {
            title: v.title.trim().to_string(),
            region: v.region.trim().to_string(),
            industries: v.industry_list(),
            wage_range: non_blank(&v.wage_range),
            start_date: "TBD".to_string(),
            cta_link: non_blank(&v.program_link),
            primary_contact_info: ContactInfo {
                name: non_blank(&v.contact_name),
                email: non_blank(&v.contact_email),
                phone: non_blank(&v.contact_phone),
            },
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
