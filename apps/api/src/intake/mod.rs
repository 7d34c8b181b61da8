// Intake: structured form, field validation and the conversational intake agent.

pub mod conversation;
pub mod form;
pub mod handlers;
pub mod validation;
