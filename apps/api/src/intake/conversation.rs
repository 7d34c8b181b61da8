//! Conversational intake: a chat transcript whose turns feed structured
//! fields into the shared form.
//!
//! A turn is split in two so the caller can release the session lock while
//! the provider call is pending:
//! `begin_turn` (validate, append user message, mark in flight) →
//! provider `extract_intake` → `complete_turn` (merge, pick reply, append).

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::intake::form::FormState;
use crate::models::chat::ChatMessage;
use crate::models::intake::{is_filled, IntakeField, IntakeForm};

/// Appended when the provider call fails.
pub const APOLOGY_REPLY: &str = "Connection issue. Please try again.";
pub const READY_REPLY: &str = "I have the core details! Ready to open the form and finalize?";

/// Fields the extraction tool may report. `None` means "not mentioned".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub region: Option<String>,
    pub industries: Option<String>,
    pub wage_range: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub program_link: Option<String>,
}

impl ExtractedFields {
    /// Later values win over earlier ones; absent values never erase.
    pub fn absorb(&mut self, other: ExtractedFields) {
        let ExtractedFields {
            title,
            region,
            industries,
            wage_range,
            contact_name,
            contact_email,
            contact_phone,
            program_link,
        } = other;
        let pairs = [
            (&mut self.title, title),
            (&mut self.region, region),
            (&mut self.industries, industries),
            (&mut self.wage_range, wage_range),
            (&mut self.contact_name, contact_name),
            (&mut self.contact_email, contact_email),
            (&mut self.contact_phone, contact_phone),
            (&mut self.program_link, program_link),
        ];
        for (slot, value) in pairs {
            if value.is_some() {
                *slot = value;
            }
        }
    }

    /// Writes every mentioned value into the form and returns the fields
    /// touched. Unmentioned fields, and values that are blank after trimming,
    /// leave the form untouched.
    pub fn merge_into(self, form: &mut FormState) -> Vec<IntakeField> {
        let pairs = [
            (IntakeField::Title, self.title),
            (IntakeField::Region, self.region),
            (IntakeField::Industries, self.industries),
            (IntakeField::WageRange, self.wage_range),
            (IntakeField::ContactName, self.contact_name),
            (IntakeField::ContactEmail, self.contact_email),
            (IntakeField::ContactPhone, self.contact_phone),
            (IntakeField::ProgramLink, self.program_link),
        ];

        let mut written = Vec::new();
        for (field, value) in pairs {
            if let Some(value) = value.filter(|v| is_filled(v)) {
                form.set_text(field, value);
                written.push(field);
            }
        }
        written
    }
}

/// What the provider returned for one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub fields: ExtractedFields,
    pub reply: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnRejected {
    #[error("Message is empty")]
    Empty,
    #[error("A chat turn is already in flight")]
    InFlight,
}

/// Inputs the provider needs for one turn, captured when the turn begins.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Transcript before the new message.
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    transcript: Vec<ChatMessage>,
    in_flight: bool,
}

impl Conversation {
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Rejects blank input and overlapping turns; otherwise appends the user
    /// message right away and marks the turn in flight.
    pub fn begin_turn(&mut self, text: &str) -> Result<TurnRequest, TurnRejected> {
        if text.trim().is_empty() {
            return Err(TurnRejected::Empty);
        }
        if self.in_flight {
            return Err(TurnRejected::InFlight);
        }

        let history = self.transcript.clone();
        self.transcript.push(ChatMessage::user(text));
        self.in_flight = true;

        Ok(TurnRequest {
            history,
            message: text.to_string(),
        })
    }

    /// Finishes the in-flight turn. On success the extracted fields are merged
    /// into `form` and a reply is appended; on failure a fixed apology is
    /// appended and the user's message stays. Returns the appended reply.
    pub fn complete_turn<E: Display>(
        &mut self,
        form: &mut FormState,
        outcome: Result<Extraction, E>,
    ) -> ChatMessage {
        let reply = match outcome {
            Ok(extraction) => {
                let written = extraction.fields.merge_into(form);
                debug!("Chat turn merged fields: {:?}", written);
                match extraction.reply.filter(|r| !r.trim().is_empty()) {
                    Some(text) => text,
                    None => fallback_reply(&form.values).to_string(),
                }
            }
            Err(e) => {
                warn!("Chat turn failed: {e}");
                APOLOGY_REPLY.to_string()
            }
        };

        let message = ChatMessage::model(reply);
        self.transcript.push(message.clone());
        self.in_flight = false;
        message
    }
}

/// Deterministic follow-up question used when the model gave no text:
/// asks for the first missing field in priority order.
pub fn fallback_reply(form: &IntakeForm) -> &'static str {
    if !is_filled(&form.title) {
        "What's the name of the program?"
    } else if !is_filled(&form.region) {
        "Which region or city will this serve?"
    } else if !is_filled(&form.industries) {
        "Which industries are we targeting?"
    } else if !is_filled(&form.contact_name) || !is_filled(&form.contact_email) {
        "Who is the primary contact? (Name and Email please)"
    } else {
        READY_REPLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;

    fn extraction(fields: ExtractedFields, reply: Option<&str>) -> Extraction {
        Extraction {
            fields,
            reply: reply.map(str::to_string),
        }
    }

    #[test]
    fn test_merge_preserves_unmentioned_fields() {
        let mut form = FormState::default();
        form.values.title = "Welding".to_string();

        let written = ExtractedFields {
            region: Some("Fresno".to_string()),
            ..Default::default()
        }
        .merge_into(&mut form);

        assert_eq!(written, vec![IntakeField::Region]);
        assert_eq!(
            form.values,
            IntakeForm {
                title: "Welding".to_string(),
                region: "Fresno".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_merge_overwrites_mentioned_field() {
        let mut form = FormState::default();
        form.values.title = "Welding".to_string();
        ExtractedFields {
            title: Some("Advanced Welding".to_string()),
            ..Default::default()
        }
        .merge_into(&mut form);
        assert_eq!(form.values.title, "Advanced Welding");
    }

    #[test]
    fn test_merge_ignores_blank_values() {
        let mut form = FormState::default();
        form.values.region = "Fresno".to_string();
        let written = ExtractedFields {
            region: Some("  ".to_string()),
            ..Default::default()
        }
        .merge_into(&mut form);
        assert!(written.is_empty());
        assert_eq!(form.values.region, "Fresno");
    }

    #[test]
    fn test_absorb_keeps_earlier_values_when_later_absent() {
        let mut acc = ExtractedFields {
            title: Some("Welding".to_string()),
            ..Default::default()
        };
        acc.absorb(ExtractedFields {
            region: Some("Fresno".to_string()),
            ..Default::default()
        });
        assert_eq!(acc.title.as_deref(), Some("Welding"));
        assert_eq!(acc.region.as_deref(), Some("Fresno"));
    }

    #[test]
    fn test_fallback_asks_for_region_when_only_region_missing() {
        let form = IntakeForm {
            title: "Welding".to_string(),
            industries: "Manufacturing".to_string(),
            contact_name: "Jo".to_string(),
            contact_email: "jo@college.edu".to_string(),
            ..Default::default()
        };
        assert_eq!(fallback_reply(&form), "Which region or city will this serve?");
    }

    #[test]
    fn test_fallback_priority_order() {
        let mut form = IntakeForm::default();
        assert_eq!(fallback_reply(&form), "What's the name of the program?");
        form.title = "Welding".to_string();
        form.region = "Fresno".to_string();
        assert_eq!(fallback_reply(&form), "Which industries are we targeting?");
        form.industries = "Energy".to_string();
        form.contact_name = "Jo".to_string();
        assert!(fallback_reply(&form).starts_with("Who is the primary contact"));
        form.contact_email = "jo@college.edu".to_string();
        assert_eq!(fallback_reply(&form), READY_REPLY);
    }

    #[test]
    fn test_begin_turn_rejects_blank_and_overlap() {
        let mut convo = Conversation::default();
        assert_eq!(convo.begin_turn("   ").unwrap_err(), TurnRejected::Empty);
        assert!(convo.transcript().is_empty());

        convo.begin_turn("Welding program").unwrap();
        assert_eq!(convo.begin_turn("again").unwrap_err(), TurnRejected::InFlight);
        assert_eq!(convo.transcript().len(), 1);
    }

    #[test]
    fn test_begin_turn_appends_user_message_and_snapshots_history() {
        let mut convo = Conversation::default();
        let mut form = FormState::default();
        convo.begin_turn("first").unwrap();
        convo.complete_turn::<String>(&mut form, Ok(extraction(Default::default(), Some("ok"))));

        let req = convo.begin_turn("second").unwrap();
        assert_eq!(req.history.len(), 2);
        assert_eq!(req.message, "second");
        assert_eq!(convo.transcript().len(), 3);
        assert!(convo.is_in_flight());
    }

    #[test]
    fn test_complete_turn_uses_model_text_verbatim() {
        let mut convo = Conversation::default();
        let mut form = FormState::default();
        convo.begin_turn("hi").unwrap();
        let reply = convo.complete_turn::<String>(
            &mut form,
            Ok(extraction(Default::default(), Some("Which city?"))),
        );
        assert_eq!(reply.text, "Which city?");
        assert_eq!(reply.role, ChatRole::Model);
        assert!(!convo.is_in_flight());
    }

    #[test]
    fn test_complete_turn_synthesizes_reply_for_blank_text() {
        let mut convo = Conversation::default();
        let mut form = FormState::default();
        convo.begin_turn("Welding in Fresno").unwrap();
        let reply = convo.complete_turn::<String>(
            &mut form,
            Ok(extraction(
                ExtractedFields {
                    title: Some("Welding".to_string()),
                    region: Some("Fresno".to_string()),
                    ..Default::default()
                },
                Some("   "),
            )),
        );
        assert_eq!(reply.text, "Which industries are we targeting?");
        assert_eq!(form.values.region, "Fresno");
    }

    #[test]
    fn test_failed_turn_appends_apology_and_keeps_user_message() {
        let mut convo = Conversation::default();
        let mut form = FormState::default();
        convo.begin_turn("hello").unwrap();
        let reply = convo.complete_turn(&mut form, Err::<Extraction, _>("timeout"));

        assert_eq!(reply.text, APOLOGY_REPLY);
        assert_eq!(convo.transcript().len(), 2);
        assert_eq!(convo.transcript()[0], ChatMessage::user("hello"));
        assert!(!convo.is_in_flight());
    }
}
