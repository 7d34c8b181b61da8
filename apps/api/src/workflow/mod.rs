// Workflow: the session context, its step progression and the per-session
// stores (selection, outreach cache, post batch, speech playback).
// External AI calls go through generation::provider, never directly from here.

pub mod engine;
pub mod flags;
pub mod handlers;
pub mod outreach;
pub mod posts;
pub mod selection;
pub mod session;
pub mod speech;
pub mod step;
pub mod store;
