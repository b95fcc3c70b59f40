use std::fmt;

use anyhow::Error;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedErrorKind {
    Usage,
    Config,
}

#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub kind: CodedErrorKind,
}

impl CodedError {
    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            kind: CodedErrorKind::Usage,
        }
    }

    pub fn config(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            kind: CodedErrorKind::Config,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            ok: false,
            error: ErrorEnvelopeBody {
                code: self.code.to_owned(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorEnvelopeBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelopeBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};
    use serde_json::json;

    use super::*;

    #[test]
    fn coded_errors_survive_a_context_chain() {
        let error = anyhow!(CodedError::usage("INVALID_DURATION", "invalid duration '45s'"))
            .context("while parsing settings");
        let coded = find_coded_error(&error).expect("should find the coded cause");
        assert_eq!(coded.code, "INVALID_DURATION");
        assert_eq!(coded.kind, CodedErrorKind::Usage);
    }

    #[test]
    fn envelope_carries_code_message_and_details() {
        let coded = CodedError::config("MISSING_API_KEY", "GEMINI_API_KEY is not set")
            .with_details(json!({ "env": "GEMINI_API_KEY" }));
        let envelope = coded.envelope();
        assert!(!envelope.ok);

        let value = serde_json::to_value(&envelope).expect("envelope serializes");
        assert_eq!(value["error"]["code"], "MISSING_API_KEY");
        assert_eq!(value["error"]["details"]["env"], "GEMINI_API_KEY");
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let envelope = CodedError::usage("EMPTY_FORM", "provide input").envelope();
        let value = serde_json::to_value(&envelope).expect("envelope serializes");
        assert!(value["error"].get("details").is_none());
    }
}
