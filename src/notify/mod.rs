//! Pure consumers of a finished check: webhook fan-out and file export.
//! Neither feeds back into the verification core.

mod export;
mod webhook;

pub use export::export_summary;
pub use webhook::{WebhookPayload, WebhookSink, sign_payload};
