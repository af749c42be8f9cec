//! `mailto:` URI construction.
//!
//! Recipients are comma-joined and the whole string percent-encoded into the
//! address position; `subject` and `body` are percent-encoded independently as
//! query parameters.

/// Build the `mailto:` URI handed to the system dispatcher.
pub fn build_mailto(recipients: &[String], subject: &str, body: &str) -> String {
    let to = recipients.join(",");
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(&to),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}
