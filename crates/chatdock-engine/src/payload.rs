//! Response payload classification and output markup.
//!
//! The backend answers with a bare string. A leading `data:image/png;` marks
//! an image data URI; anything else is plain text. [`classify`] is the only
//! place that sniffs the prefix.

use std::fmt::Write;

/// Prefix that marks a payload as a PNG data URI.
pub const IMAGE_PREFIX: &str = "data:image/png;";

/// Fallback message shown when the outbound request fails.
pub const ERROR_PREAMBLE: &str = "I'm sorry, but something went wrong";

/// A classified response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// PNG image as a data URI, kept verbatim.
    Image(String),
    /// Plain text, newlines intact.
    Text(String),
}

/// Classify a response body by its prefix.
pub fn classify(body: impl Into<String>) -> Payload {
    let body = body.into();
    if body.starts_with(IMAGE_PREFIX) {
        Payload::Image(body)
    } else {
        Payload::Text(body)
    }
}

impl Payload {
    /// Whether this payload is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    /// The raw payload string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Image(uri) | Self::Text(uri) => uri,
        }
    }
}

/// What the output panel shows at the end of a request cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A successful response.
    Payload(Payload),
    /// The request failed; holds the failure message.
    Error(String),
}

impl Output {
    /// Build the output for a successful response body.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self::Payload(classify(body))
    }

    /// Build the fallback output for a failed request.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Whether this output is the failure fallback.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Render the HTML markup written into the output panel.
    pub fn markup(&self) -> String {
        match self {
            Self::Payload(Payload::Image(uri)) => {
                format!(r#"<img src="{uri}" class="zoom" alt="chart" >"#)
            }
            Self::Payload(Payload::Text(text)) => {
                format!(r#"<p class="zoom">{}</p>"#, text.replace('\n', "<br>"))
            }
            Self::Error(message) => format!("{ERROR_PREAMBLE} ({message})"),
        }
    }

    /// Plain-text rendering, one entry per line.
    ///
    /// Images collapse to a single summary line since a terminal cannot
    /// show them inline.
    pub fn plain_lines(&self) -> Vec<String> {
        match self {
            Self::Payload(Payload::Text(text)) => text.split('\n').map(String::from).collect(),
            Self::Payload(Payload::Image(uri)) => {
                let mut line = String::from("[chart] PNG image");
                if let Some(size) = encoded_len_hint(uri) {
                    let _ = write!(line, ", ~{size} bytes");
                }
                vec![line]
            }
            Self::Error(message) => vec![format!("{ERROR_PREAMBLE} ({message})")],
        }
    }
}

/// Approximate decoded size of a base64 data URI.
fn encoded_len_hint(uri: &str) -> Option<usize> {
    let (_, data) = uri.split_once(";base64,")?;
    let padding = data.bytes().rev().take_while(|b| *b == b'=').count();
    Some((data.len() / 4 * 3).saturating_sub(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_classify_image_prefix() {
        let payload = classify("data:image/png;base64,AAAA");
        assert_eq!(payload, Payload::Image("data:image/png;base64,AAAA".into()));
        assert!(payload.is_image());
    }

    #[test]
    fn test_classify_other_image_types_are_text() {
        // Only PNG is recognised by the backend contract.
        assert!(!classify("data:image/jpeg;base64,AAAA").is_image());
        assert!(!classify(" data:image/png;base64,AAAA").is_image());
        assert!(!classify("").is_image());
    }

    #[test]
    fn test_image_markup() {
        let output = Output::from_body("data:image/png;base64,AAAA");
        assert_snapshot!(
            output.markup(),
            @r#"<img src="data:image/png;base64,AAAA" class="zoom" alt="chart" >"#
        );
    }

    #[test]
    fn test_text_markup_replaces_newlines() {
        let output = Output::from_body("line1\nline2");
        assert_snapshot!(output.markup(), @r#"<p class="zoom">line1<br>line2</p>"#);
    }

    #[test]
    fn test_text_markup_does_not_escape() {
        let output = Output::from_body("a < b & c");
        assert_eq!(output.markup(), r#"<p class="zoom">a < b & c</p>"#);
    }

    #[test]
    fn test_error_markup_embeds_message() {
        let output = Output::error("network down");
        assert!(output.is_error());
        assert_snapshot!(output.markup(), @"I'm sorry, but something went wrong (network down)");
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(
            Output::from_body("one\ntwo").plain_lines(),
            vec!["one".to_string(), "two".to_string()]
        );
        assert_eq!(
            Output::from_body("data:image/png;base64,AAAAAA==").plain_lines(),
            vec!["[chart] PNG image, ~4 bytes".to_string()]
        );
    }
}
