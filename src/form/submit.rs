use std::fmt;

use serde_json::Value;

use super::rules::FieldErrors;

pub type SuccessCallback = Box<dyn FnMut(&Value)>;
pub type FailureCallback = Box<dyn FnMut(&FieldErrors)>;

/// The pair of callbacks a submit is dispatched to: exactly one of them runs
/// per submit.
pub struct SubmitHandlers {
    on_success: SuccessCallback,
    on_failure: Option<FailureCallback>,
}

impl SubmitHandlers {
    pub fn new(on_success: impl FnMut(&Value) + 'static) -> Self {
        Self {
            on_success: Box::new(on_success),
            on_failure: None,
        }
    }

    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn with_failure(mut self, on_failure: impl FnMut(&FieldErrors) + 'static) -> Self {
        self.on_failure = Some(Box::new(on_failure));
        self
    }

    pub(crate) fn from_parts(
        on_success: Option<SuccessCallback>,
        on_failure: Option<FailureCallback>,
    ) -> Self {
        Self {
            on_success: on_success.unwrap_or_else(|| Box::new(|_| {})),
            on_failure,
        }
    }

    pub(crate) fn succeed(&mut self, values: &Value) {
        (self.on_success)(values);
    }

    pub(crate) fn fail(&mut self, errors: &FieldErrors) {
        if let Some(on_failure) = self.on_failure.as_mut() {
            on_failure(errors);
        }
    }
}

impl fmt::Debug for SubmitHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitHandlers")
            .field("on_failure", &self.on_failure.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Value),
    Rejected(FieldErrors),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}
