//! Result record produced by rules and chains.
//!
//! Validation failures are data rather than `Err` values so an API layer can
//! inspect them uniformly: the messages are surfaced verbatim, the code is
//! stable for client branching, and `kind` drives the transport status.
use super::error::{ErrorCode, FailureKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    is_valid: bool,
    messages: Vec<String>,
    error_code: Option<ErrorCode>,
    kind: Option<FailureKind>,
    rule_name: Option<String>,
}

impl ValidationOutcome {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            messages: Vec::new(),
            error_code: None,
            kind: None,
            rule_name: None,
        }
    }

    /// Failure carrying the code's own message and classification.
    pub fn failure(rule_name: impl Into<String>, code: ErrorCode) -> Self {
        Self::failure_message(rule_name, code, code.to_string())
    }

    pub fn failure_message(
        rule_name: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            is_valid: false,
            messages: vec![message.into()],
            error_code: Some(code),
            kind: Some(code.kind()),
            rule_name: Some(rule_name.into()),
        }
    }

    /// Fold independent outcomes into one. Messages are concatenated in input
    /// order; the code, kind and rule name of the first failure are kept.
    pub fn combine<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ValidationOutcome>,
    {
        let mut combined = Self::success();

        for outcome in outcomes {
            if outcome.is_valid {
                continue;
            }
            if combined.is_valid {
                combined.is_valid = false;
                combined.error_code = outcome.error_code;
                combined.kind = outcome.kind;
                combined.rule_name = outcome.rule_name;
            }
            combined.messages.extend(outcome.messages);
        }

        combined
    }

    /// Re-attribute a failure to `rule_name`. Successes are returned as is.
    pub(crate) fn attributed_to(mut self, rule_name: &str) -> Self {
        if !self.is_valid {
            self.rule_name = Some(rule_name.to_string());
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }
    pub fn kind(&self) -> Option<FailureKind> {
        self.kind
    }
    pub fn rule_name(&self) -> Option<&str> {
        self.rule_name.as_deref()
    }
    pub fn first_message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }
}
