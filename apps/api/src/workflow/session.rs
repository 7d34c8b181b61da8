//! The session context: every store one user's engine run touches, owned in
//! one place so that reset is a single assignment.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::intake::conversation::Conversation;
use crate::intake::form::FormState;
use crate::models::chat::ChatMessage;
use crate::models::employer::{EmployerMatch, OutreachAssets};
use crate::models::intake::IntakeForm;
use crate::models::linkedin::LinkedInPost;
use crate::models::profile::ProgramProfile;
use crate::workflow::flags::{InFlight, Operation};
use crate::workflow::outreach::OutreachCache;
use crate::workflow::posts::PostBatch;
use crate::workflow::selection::SelectionSet;
use crate::workflow::speech::{SpeechController, SpeechState};
use crate::workflow::step::{progress, visible_steps, Step};

pub type SessionId = Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    /// Bumped on every reset. External results are only applied when the
    /// epoch they started in is still current.
    pub epoch: u64,
    pub step: Step,
    pub form: FormState,
    pub profile: Option<ProgramProfile>,
    pub matches: Vec<EmployerMatch>,
    pub selection: SelectionSet,
    pub outreach: OutreachCache,
    pub building_outreach: InFlight<String>,
    pub posts: PostBatch,
    pub conversation: Conversation,
    pub speech: SpeechController,
    pub busy: InFlight<Operation>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            epoch: 0,
            step: Step::Landing,
            form: FormState::default(),
            profile: None,
            matches: Vec::new(),
            selection: SelectionSet::default(),
            outreach: OutreachCache::default(),
            building_outreach: InFlight::default(),
            posts: PostBatch::default(),
            conversation: Conversation::default(),
            speech: SpeechController::default(),
            busy: InFlight::default(),
        }
    }

    /// Navigation is never gated here; hiding profile-only steps is a
    /// presentation concern (see [`visible_steps`]).
    pub fn go_to(&mut self, step: Step) {
        self.step = step;
    }

    pub fn progress(&self) -> f64 {
        progress(self.step, &self.form.values, self.posts.len())
    }

    /// Clears every store, stops speech and lands on intake, in one
    /// assignment. In-flight work from before the reset is orphaned by the
    /// epoch bump.
    pub fn reset(&mut self) {
        let mut speech = std::mem::take(&mut self.speech);
        speech.stop();

        *self = Session {
            epoch: self.epoch + 1,
            step: Step::Intake,
            speech,
            created_at: self.created_at,
            ..Session::new(self.id)
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            step: self.step,
            progress: self.progress(),
            nav: visible_steps(self.profile.is_some()),
            form: self.form.values.clone(),
            errors: serde_json::to_value(&self.form.errors).unwrap_or_default(),
            has_substantial_data: self.form.values.has_substantial_data(),
            profile: self.profile.clone(),
            matches: self.matches.clone(),
            selected: self.selection.filter(&self.matches).map(|m| m.name.clone()).collect(),
            outreach: self
                .matches
                .iter()
                .filter_map(|m| {
                    self.outreach.get(&m.name).map(|a| OutreachEntry {
                        employer: m.name.clone(),
                        assets: a.clone(),
                    })
                })
                .collect(),
            building_outreach: sorted(self.building_outreach.keys().cloned()),
            posts: self.posts.posts().to_vec(),
            generating_graphics: sorted(
                (0..self.posts.len()).filter(|i| self.posts.is_generating_graphic(*i)),
            ),
            busy: sorted(self.busy.keys().copied()),
            chat: self.conversation.transcript().to_vec(),
            chat_in_flight: self.conversation.is_in_flight(),
            speech: self.speech.state().clone(),
        }
    }
}

fn sorted<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut v: Vec<T> = items.collect();
    v.sort();
    v
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachEntry {
    pub employer: String,
    pub assets: OutreachAssets,
}

/// Read model handed to the view layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub step: Step,
    pub progress: f64,
    pub nav: Vec<Step>,
    pub form: IntakeForm,
    pub errors: serde_json::Value,
    pub has_substantial_data: bool,
    pub profile: Option<ProgramProfile>,
    pub matches: Vec<EmployerMatch>,
    pub selected: Vec<String>,
    pub outreach: Vec<OutreachEntry>,
    pub building_outreach: Vec<String>,
    pub posts: Vec<LinkedInPost>,
    pub generating_graphics: Vec<usize>,
    pub busy: Vec<Operation>,
    pub chat: Vec<ChatMessage>,
    pub chat_in_flight: bool,
    pub speech: SpeechState,
}
