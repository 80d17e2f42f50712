//! The dead-link verification workflow: extraction, verification,
//! classification, and aggregation.
//!
//! All state here is request-scoped. A check invocation builds its candidate
//! links, verifies them, folds a summary, and drops everything when the
//! response is returned — nothing is persisted between checks.

mod archive;
mod extractor;
mod orchestrator;
mod report;
mod types;
mod verifier;

pub use archive::ArchiveClient;
pub use extractor::extract_links;
pub use orchestrator::{CheckScope, run_check};
pub use report::recommendations;
pub use types::{CandidateLink, CheckSummary, LinkOutcome, PostReport};
pub use verifier::{Verifier, suggest};
