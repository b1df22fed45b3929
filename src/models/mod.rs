pub mod event;
pub mod outcome;
pub mod question;

pub use event::{file_identity, ChangeEvent};
pub use outcome::{OutcomeKind, ProcessingOutcome};
pub use question::ParsedQuestion;
