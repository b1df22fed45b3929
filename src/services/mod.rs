pub mod dedup_tracker;
pub mod outcome_sink;
pub mod question_parser;
pub mod readiness_gate;
pub mod text_extractor;

pub use dedup_tracker::DedupTracker;
pub use outcome_sink::{ConsoleSink, FanoutSink, JsonlSink, OutcomeSink};
pub use question_parser::QuestionParser;
pub use readiness_gate::{ReadinessGate, RetryPolicy};
pub use text_extractor::{TesseractExtractor, TextExtractor};
