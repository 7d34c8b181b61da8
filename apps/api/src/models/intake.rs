use serde::{Deserialize, Serialize};

/// Raw intake form as the user edits it.
///
/// `industries` stays free text while editing; it is only split into a list
/// when the form is submitted (see [`IntakeForm::industry_list`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    pub title: String,
    pub region: String,
    pub industries: String,
    pub wage_range: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub program_link: String,
    pub terms_accepted: bool,
}

/// Field identifiers, declared in on-screen order. `Ord` follows this order,
/// which is what decides the "first invalid field".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntakeField {
    Title,
    Region,
    Industries,
    WageRange,
    ContactName,
    ContactEmail,
    ContactPhone,
    ProgramLink,
    TermsAccepted,
}

impl IntakeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeField::Title => "title",
            IntakeField::Region => "region",
            IntakeField::Industries => "industries",
            IntakeField::WageRange => "wageRange",
            IntakeField::ContactName => "contactName",
            IntakeField::ContactEmail => "contactEmail",
            IntakeField::ContactPhone => "contactPhone",
            IntakeField::ProgramLink => "programLink",
            IntakeField::TermsAccepted => "termsAccepted",
        }
    }
}

impl IntakeForm {
    /// Splits the comma-separated industries into trimmed, non-empty entries.
    pub fn industry_list(&self) -> Vec<String> {
        self.industries
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Title, region and industries are all filled in.
    pub fn has_substantial_data(&self) -> bool {
        [&self.title, &self.region, &self.industries]
            .iter()
            .all(|v| is_filled(v))
    }

    /// Number of the three core fields (title, region, industries) that are filled.
    pub fn core_fields_filled(&self) -> usize {
        [&self.title, &self.region, &self.industries]
            .iter()
            .filter(|v| is_filled(v))
            .count()
    }
}

pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Partial form update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPatch {
    pub title: Option<String>,
    pub region: Option<String>,
    pub industries: Option<String>,
    pub wage_range: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub program_link: Option<String>,
    pub terms_accepted: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_list_splits_and_trims() {
        let form = IntakeForm {
            industries: " Manufacturing, Logistics ,, Healthcare ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.industry_list(),
            vec!["Manufacturing", "Logistics", "Healthcare"]
        );
    }

    #[test]
    fn test_industries_kept_raw_until_split() {
        let form = IntakeForm {
            industries: "A, B".to_string(),
            ..Default::default()
        };
        assert_eq!(form.industries, "A, B");
    }

    #[test]
    fn test_core_fields_filled_ignores_whitespace() {
        let form = IntakeForm {
            title: "Welding".to_string(),
            region: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(form.core_fields_filled(), 1);
        assert!(!form.has_substantial_data());
    }

    #[test]
    fn test_field_order_puts_title_first() {
        assert!(IntakeField::Title < IntakeField::Region);
        assert!(IntakeField::ProgramLink < IntakeField::TermsAccepted);
    }

    #[test]
    fn test_form_serializes_camel_case() {
        let json = serde_json::to_value(IntakeForm::default()).unwrap();
        assert!(json.get("termsAccepted").is_some());
        assert!(json.get("programLink").is_some());
    }
}
