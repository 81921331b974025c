//! Request extractors that reject with envelope-shaped errors.
//!
//! Drop-in replacements for the axum extractors whose rejections would
//! otherwise be plain text.

mod enhanced_path;
mod enhanced_query;
mod form_input;

pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::form_input::{FormInput, MAX_FORM_PAYLOAD_SIZE};

/// Keeps rejection details short enough for logs.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}
