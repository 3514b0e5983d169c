use serde_json::Value;
use tracing::debug;

use super::{
    rules::{FieldErrors, FieldRules},
    submit::{SubmitHandlers, SubmitOutcome},
};

/// Form-state capability the renderers and the form view are bound to.
///
/// Values are addressed by field name; a name with dots addresses a nested
/// object. Writing `None` removes the value, which is how every renderer
/// reports an empty input.
pub trait FormController {
    fn value(&self, name: &str) -> Option<&Value>;

    /// Writes a field value, marking it dirty and touched and clearing its error.
    fn set_value(&mut self, name: &str, value: Option<Value>);

    /// Snapshot of every current value as one object.
    fn values(&self) -> Value;

    fn register(&mut self, name: &str, rules: FieldRules);

    fn error(&self, name: &str) -> Option<&str>;

    fn set_error(&mut self, name: &str, message: String);

    fn clear_errors(&mut self);

    fn errors(&self) -> FieldErrors;

    fn is_dirty(&self) -> bool;

    /// Whether `set_value` ran for `name` since the last reset.
    fn is_touched(&self, name: &str) -> bool;

    /// Runs every registered rule and returns the values or the error set.
    /// Errors are also stored so renderers can show them.
    fn validate(&mut self) -> Result<Value, FieldErrors>;

    /// Restores the default values and forgets errors, dirty and touched flags.
    fn reset(&mut self);

    /// Validates and dispatches to exactly one of the submit callbacks.
    fn handle_submit(&mut self, handlers: &mut SubmitHandlers) -> SubmitOutcome {
        match self.validate() {
            Ok(values) => {
                debug!("submit accepted");
                handlers.succeed(&values);
                SubmitOutcome::Submitted(values)
            }
            Err(errors) => {
                debug!(issues = errors.len(), "submit rejected");
                handlers.fail(&errors);
                SubmitOutcome::Rejected(errors)
            }
        }
    }
}
