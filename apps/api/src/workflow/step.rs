use serde::{Deserialize, Serialize};

use crate::models::intake::IntakeForm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Landing,
    Intake,
    Discovery,
    Report,
    Outreach,
    Linkedin,
    Chat,
    Docs,
    Terms,
}

/// The five steps that make up the linear campaign flow.
pub const LINEAR_STEPS: [Step; 5] = [
    Step::Intake,
    Step::Discovery,
    Step::Report,
    Step::Outreach,
    Step::Linkedin,
];

pub const ALL_STEPS: [Step; 9] = [
    Step::Landing,
    Step::Intake,
    Step::Discovery,
    Step::Report,
    Step::Outreach,
    Step::Linkedin,
    Step::Chat,
    Step::Docs,
    Step::Terms,
];

impl Step {
    /// Steps that only make sense once a profile exists. They are hidden from
    /// navigation until then; `goTo` itself is never gated.
    pub fn requires_profile(&self) -> bool {
        matches!(
            self,
            Step::Discovery | Step::Report | Step::Outreach | Step::Linkedin
        )
    }
}

/// Completion percentage for the current step, 0..=100.
///
/// - landing: 0
/// - chat: share of {title, region, industries} filled in
/// - linear steps: (index + 1) / 5, except linkedin reads 95 until a post exists
/// - docs / terms: 100
pub fn progress(step: Step, form: &IntakeForm, post_count: usize) -> f64 {
    match step {
        Step::Landing => 0.0,
        Step::Chat => form.core_fields_filled() as f64 / 3.0 * 100.0,
        Step::Linkedin => {
            if post_count > 0 {
                100.0
            } else {
                95.0
            }
        }
        other => match LINEAR_STEPS.iter().position(|s| *s == other) {
            Some(index) => (index + 1) as f64 / LINEAR_STEPS.len() as f64 * 100.0,
            None => 100.0,
        },
    }
}

/// Steps to show in navigation.
pub fn visible_steps(has_profile: bool) -> Vec<Step> {
    ALL_STEPS
        .into_iter()
        .filter(|s| has_profile || !s.requires_profile())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_landing_is_zero() {
        assert_eq!(progress(Step::Landing, &IntakeForm::default(), 3), 0.0);
    }

    #[test]
    fn test_linear_steps() {
        let form = IntakeForm::default();
        assert!(approx(progress(Step::Intake, &form, 0), 20.0));
        assert!(approx(progress(Step::Discovery, &form, 0), 40.0));
        assert!(approx(progress(Step::Report, &form, 0), 60.0));
        assert!(approx(progress(Step::Outreach, &form, 0), 80.0));
    }

    #[test]
    fn test_linkedin_waits_for_first_post() {
        let form = IntakeForm::default();
        assert_eq!(progress(Step::Linkedin, &form, 0), 95.0);
        assert_eq!(progress(Step::Linkedin, &form, 1), 100.0);
    }

    #[test]
    fn test_chat_counts_core_fields() {
        let mut form = IntakeForm::default();
        assert_eq!(progress(Step::Chat, &form, 0), 0.0);
        form.title = "Welding".to_string();
        assert!(approx(progress(Step::Chat, &form, 0), 100.0 / 3.0));
        form.region = "Fresno".to_string();
        form.industries = "Energy".to_string();
        assert!(approx(progress(Step::Chat, &form, 0), 100.0));
    }

    #[test]
    fn test_docs_and_terms_are_complete() {
        let form = IntakeForm::default();
        assert_eq!(progress(Step::Docs, &form, 0), 100.0);
        assert_eq!(progress(Step::Terms, &form, 0), 100.0);
    }

    #[test]
    fn test_nav_hides_profile_steps_until_profile_exists() {
        let hidden = visible_steps(false);
        assert!(hidden.contains(&Step::Intake));
        assert!(hidden.contains(&Step::Chat));
        assert!(!hidden.contains(&Step::Report));
        assert_eq!(visible_steps(true).len(), ALL_STEPS.len());
    }

    #[test]
    fn test_step_serde_lowercase() {
        let s: Step = serde_json::from_str(r#""linkedin""#).unwrap();
        assert_eq!(s, Step::Linkedin);
    }
}
