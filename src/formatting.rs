// src/formatting.rs

/// Builds the raw message handed to the relay: five header lines joined by
/// CRLF, a blank line, then the body verbatim. The body is declared as HTML
/// by the fixed content-type header.
///
/// Header values are substituted literally, with no escaping. A value
/// containing a CRLF sequence would inject additional headers; callers own
/// that boundary.
pub fn compose(from_email: &str, subject: &str, to_email: &str, body: &str) -> String {
    let header = [
        format!("from: {}", from_email),
        format!("subject: {}", subject),
        format!("to: {}", to_email),
        "mime-version: 1.0".to_string(),
        "content-type: text/html".to_string(),
    ]
    .join("\r\n");

    format!("{}\r\n\r\n{}", header, body)
}
