//! Workflow engine: the async operations that involve the AI provider.
//!
//! Every operation follows the same shape:
//! 1. lock the session, check preconditions, set the in-flight flag, copy inputs
//! 2. release the lock and await the provider
//! 3. re-lock; if the session was reset meanwhile (epoch changed) drop the
//!    result; otherwise clear the flag and apply the result
//!
//! Failures leave earlier state untouched and always clear their flag.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::provider::AiProvider;
use crate::intake::conversation::TurnRejected;
use crate::models::intake::IntakeField;
use crate::models::profile::ProgramProfile;
use crate::workflow::flags::Operation;
use crate::workflow::selection::SelectionSet;
use crate::workflow::session::{Session, SessionSnapshot};
use crate::workflow::speech::{AudioClip, Toggle, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
use crate::workflow::step::Step;
use crate::workflow::store::SessionHandle;

impl From<TurnRejected> for AppError {
    fn from(e: TurnRejected) -> Self {
        match e {
            TurnRejected::Empty => AppError::Validation(e.to_string()),
            TurnRejected::InFlight => AppError::Conflict(e.to_string()),
        }
    }
}

/// Runs `f` under the session lock; returns its output and the epoch it ran in.
async fn with_session<T>(
    handle: &SessionHandle,
    f: impl FnOnce(&mut Session) -> Result<T, AppError>,
) -> Result<(u64, T), AppError> {
    let mut session = handle.lock().await;
    let out = f(&mut session)?;
    Ok((session.epoch, out))
}

fn require_profile(session: &Session) -> Result<ProgramProfile, AppError> {
    session.profile.clone().ok_or_else(|| {
        AppError::Precondition("Complete the intake step to create a program profile first".to_string())
    })
}

fn begin_operation(session: &mut Session, op: Operation) -> Result<(), AppError> {
    if session.busy.try_begin(op) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!("{op:?} is already running")))
    }
}

fn discarded(session: &Session, what: &str) -> SessionSnapshot {
    debug!("Session {} was reset; discarding {what} result", session.id);
    session.snapshot()
}

/// Validates the form, enhances it into a profile and moves to discovery.
pub async fn submit_intake(handle: &SessionHandle, ai: &dyn AiProvider) -> Result<SessionSnapshot, AppError> {
    let (epoch, request) = with_session(handle, |s| {
        let report = s.form.validate();
        if !report.is_valid() {
            debug!("Intake invalid: {:?}", report.fields().collect::<Vec<_>>());
            return Err(AppError::InvalidForm(report.clone()));
        }
        begin_operation(s, Operation::Enhance)?;
        Ok(s.form.to_enhance_request())
    })
    .await?;

    info!("Enhancing profile '{}'", request.title);
    let result = ai.enhance_profile(&request).await;

    let mut s = handle.lock().await;
    if s.epoch != epoch {
        return Ok(discarded(&s, "profile enhancement"));
    }
    s.busy.finish(&Operation::Enhance);
    let profile = result?;

    s.profile = Some(profile);
    s.step = Step::Discovery;
    Ok(s.snapshot())
}

/// Replaces the match batch and reselects every candidate.
pub async fn run_discovery(handle: &SessionHandle, ai: &dyn AiProvider) -> Result<SessionSnapshot, AppError> {
    let (epoch, profile) = with_session(handle, |s| {
        let profile = require_profile(s)?;
        begin_operation(s, Operation::Discovery)?;
        Ok(profile)
    })
    .await?;

    let result = ai.discover_employers(&profile).await;

    let mut s = handle.lock().await;
    if s.epoch != epoch {
        return Ok(discarded(&s, "discovery"));
    }
    s.busy.finish(&Operation::Discovery);
    let matches = result?;

    info!("Session {}: {} employer matches", s.id, matches.len());
    s.selection = SelectionSet::all_of(&matches);
    s.matches = matches;
    s.step = Step::Report;
    Ok(s.snapshot())
}

/// Builds (or rebuilds) outreach for one employer. Builds for different
/// employers run independently.
pub async fn build_outreach(
    handle: &SessionHandle,
    ai: &dyn AiProvider,
    employer_name: &str,
) -> Result<SessionSnapshot, AppError> {
    let (epoch, (profile, employer)) = with_session(handle, |s| {
        let profile = require_profile(s)?;
        let employer = s
            .matches
            .iter()
            .find(|m| m.name == employer_name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Employer '{employer_name}' is not in the match report")))?;
        if !s.building_outreach.try_begin(employer.name.clone()) {
            return Err(AppError::Conflict(format!(
                "Outreach for '{employer_name}' is already being generated"
            )));
        }
        Ok((profile, employer))
    })
    .await?;

    let result = ai.generate_outreach(&profile, &employer).await;

    let mut s = handle.lock().await;
    if s.epoch != epoch {
        return Ok(discarded(&s, "outreach"));
    }
    s.building_outreach.finish(&employer.name);
    let assets = result?;

    if s.outreach.store(&employer.name, assets).is_some() {
        debug!("Replaced cached outreach for {}", employer.name);
    }
    Ok(s.snapshot())
}

/// Generates a fresh post batch, replacing the old one wholesale.
pub async fn generate_linkedin(handle: &SessionHandle, ai: &dyn AiProvider) -> Result<SessionSnapshot, AppError> {
    let (epoch, profile) = with_session(handle, |s| {
        let profile = require_profile(s)?;
        begin_operation(s, Operation::LinkedinBatch)?;
        Ok(profile)
    })
    .await?;

    let result = ai.generate_linkedin_calendar(&profile).await;

    let mut s = handle.lock().await;
    if s.epoch != epoch {
        return Ok(discarded(&s, "LinkedIn batch"));
    }
    s.busy.finish(&Operation::LinkedinBatch);
    let posts = result?;

    s.posts.replace(posts);
    s.step = Step::Linkedin;
    Ok(s.snapshot())
}

/// Generates a graphic for one post. Posts generate independently.
pub async fn generate_graphic(
    handle: &SessionHandle,
    ai: &dyn AiProvider,
    index: usize,
) -> Result<SessionSnapshot, AppError> {
    let (epoch, (profile, ticket, post)) = with_session(handle, |s| {
        let profile = require_profile(s)?;
        let (ticket, post) = s.posts.begin_graphic(index)?;
        Ok((profile, ticket, post))
    })
    .await?;

    let result = ai.generate_post_graphic(&post, &profile).await;

    let mut s = handle.lock().await;
    if s.epoch != epoch {
        return Ok(discarded(&s, "graphic"));
    }
    s.posts.finish_graphic(ticket, result.as_ref().ok().cloned());
    result?;
    Ok(s.snapshot())
}

async fn run_turn(
    handle: &SessionHandle,
    ai: &dyn AiProvider,
    text: &str,
    seed_title: bool,
) -> Result<SessionSnapshot, AppError> {
    let (epoch, (turn, form)) = with_session(handle, |s| {
        if s.conversation.is_in_flight() {
            return Err(TurnRejected::InFlight.into());
        }
        if seed_title {
            s.step = Step::Chat;
            s.form.set_text(IntakeField::Title, text.to_string());
        }
        let turn = s.conversation.begin_turn(text)?;
        Ok((turn, s.form.values.clone()))
    })
    .await?;

    let outcome = ai.extract_intake(&turn.history, &turn.message, &form).await;

    let mut guard = handle.lock().await;
    if guard.epoch != epoch {
        return Ok(discarded(&guard, "chat turn"));
    }
    let s = &mut *guard;
    s.conversation.complete_turn(&mut s.form, outcome);
    Ok(s.snapshot())
}

/// One conversational intake turn. Provider failures become an apology
/// message in the transcript, not an error.
pub async fn send_chat(handle: &SessionHandle, ai: &dyn AiProvider, text: &str) -> Result<SessionSnapshot, AppError> {
    run_turn(handle, ai, text, false).await
}

/// Starts chat intake from the one-line home prompt: switches to the chat
/// step and seeds the title with the raw prompt before the first turn.
pub async fn launch_chat(handle: &SessionHandle, ai: &dyn AiProvider, prompt: &str) -> Result<SessionSnapshot, AppError> {
    if prompt.trim().is_empty() {
        return Err(TurnRejected::Empty.into());
    }
    run_turn(handle, ai, prompt, true).await
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SpeechOutcome {
    /// The same text was active and has been stopped.
    Stopped,
    /// Audio is ready; the client should play it and report `ended`.
    #[serde(rename_all = "camelCase")]
    Playing {
        playback_id: u64,
        sample_rate: u32,
        channels: u16,
        duration_ms: u64,
        /// 16-bit little-endian PCM, base64-encoded.
        audio: String,
    },
    /// Another playback (or a stop) happened while this one was loading.
    Superseded,
}

/// Read-aloud toggle: stops if `text` is active, otherwise preempts any
/// current clip and synthesizes `text`.
pub async fn toggle_speech(handle: &SessionHandle, ai: &dyn AiProvider, text: &str) -> Result<SpeechOutcome, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Nothing to read aloud".to_string()));
    }

    let (epoch, toggle) = with_session(handle, |s| Ok(s.speech.toggle(text))).await?;
    let (playback_id, text) = match toggle {
        Toggle::Stopped => return Ok(SpeechOutcome::Stopped),
        Toggle::Started { playback_id, text } => (playback_id, text),
    };

    let result = match ai.generate_speech(&text).await {
        Ok(pcm) => AudioClip::from_pcm16(&pcm, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS).map(|clip| (pcm, clip)),
        Err(e) => Err(e),
    };

    let mut s = handle.lock().await;
    if s.epoch != epoch {
        debug!("Session {} was reset; discarding speech", s.id);
        return Ok(SpeechOutcome::Superseded);
    }
    match result {
        Ok((pcm, clip)) => {
            if !s.speech.loaded(playback_id) {
                return Ok(SpeechOutcome::Superseded);
            }
            Ok(SpeechOutcome::Playing {
                playback_id,
                sample_rate: clip.sample_rate,
                channels: clip.channels,
                duration_ms: clip.duration_ms(),
                audio: BASE64.encode(&pcm),
            })
        }
        Err(e) => {
            if !s.speech.failed(playback_id) {
                debug!("Speech playback {playback_id} failed after being superseded: {e}");
                return Ok(SpeechOutcome::Superseded);
            }
            warn!("Speech playback {playback_id} failed: {e}");
            Err(e)
        }
    }
}
