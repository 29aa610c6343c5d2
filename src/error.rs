use thiserror::Error;

pub type SuiteResult<T> = Result<T, SuiteError>;

/// Error classification carried in a W3C WebDriver error response.
///
/// The server reports failures as a well-known error string plus a free-form
/// message; the string is what the fallback ladders branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireErrorKind {
    NoSuchElement,
    StaleElementReference,
    ElementClickIntercepted,
    ElementNotInteractable,
    JavascriptError,
    InvalidSessionId,
    Timeout,
    Other,
}

impl WireErrorKind {
    pub fn parse(error: &str) -> Self {
        match error {
            "no such element" => WireErrorKind::NoSuchElement,
            "stale element reference" => WireErrorKind::StaleElementReference,
            "element click intercepted" => WireErrorKind::ElementClickIntercepted,
            "element not interactable" => WireErrorKind::ElementNotInteractable,
            "javascript error" => WireErrorKind::JavascriptError,
            "invalid session id" => WireErrorKind::InvalidSessionId,
            "timeout" | "script timeout" => WireErrorKind::Timeout,
            _ => WireErrorKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WireErrorKind::NoSuchElement => "no such element",
            WireErrorKind::StaleElementReference => "stale element reference",
            WireErrorKind::ElementClickIntercepted => "element click intercepted",
            WireErrorKind::ElementNotInteractable => "element not interactable",
            WireErrorKind::JavascriptError => "javascript error",
            WireErrorKind::InvalidSessionId => "invalid session id",
            WireErrorKind::Timeout => "timeout",
            WireErrorKind::Other => "unknown error",
        }
    }
}

impl std::fmt::Display for WireErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("webdriver error ({kind}): {message}")]
    Wire { kind: WireErrorKind, message: String },

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session error: {0}")]
    Session(String),
}

impl SuiteError {
    /// Build a `Wire` error from the server's error string and message.
    pub fn wire(error: &str, message: impl Into<String>) -> Self {
        SuiteError::Wire {
            kind: WireErrorKind::parse(error),
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        SuiteError::Timeout(message.into())
    }

    pub fn wire_kind(&self) -> Option<WireErrorKind> {
        match self {
            SuiteError::Wire { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_click_intercepted(&self) -> bool {
        self.wire_kind() == Some(WireErrorKind::ElementClickIntercepted)
    }

    pub fn is_stale(&self) -> bool {
        self.wire_kind() == Some(WireErrorKind::StaleElementReference)
    }

    /// Failures the escalation ladders are allowed to absorb. Anything else
    /// (lost session, transport breakage) still gets absorbed by the ladder,
    /// but is logged at a higher level by callers.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.wire_kind(),
            Some(
                WireErrorKind::NoSuchElement
                    | WireErrorKind::StaleElementReference
                    | WireErrorKind::ElementClickIntercepted
                    | WireErrorKind::ElementNotInteractable
            )
        ) || matches!(self, SuiteError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_error_strings() {
        assert_eq!(
            WireErrorKind::parse("element click intercepted"),
            WireErrorKind::ElementClickIntercepted
        );
        assert_eq!(
            WireErrorKind::parse("stale element reference"),
            WireErrorKind::StaleElementReference
        );
        assert_eq!(WireErrorKind::parse("totally new error"), WireErrorKind::Other);
    }

    #[test]
    fn classifies_transient_failures() {
        let err = SuiteError::wire("element not interactable", "covered by overlay");
        assert!(err.is_transient());
        assert!(!err.is_click_intercepted());

        let err = SuiteError::timeout("element never appeared");
        assert!(err.is_transient());

        let err = SuiteError::Session("browser went away".to_string());
        assert!(!err.is_transient());
    }
}
