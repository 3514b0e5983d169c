use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::{
    domain::{FormSpec, SpecIssue, inspect_form_spec_with},
    field::{ComponentContext, CustomWidget, WidgetRegistry},
    form::{
        FailureCallback, FieldErrors, FormController, FormState, SubmitHandlers, SuccessCallback,
    },
    io::{self, OutputOptions},
};

use super::{options::UiOptions, runtime::App};

/// Entry point: renders a [`FormSpec`] in the terminal and returns the
/// submitted values.
///
/// ```no_run
/// use gridform::{FieldDescriptor, FieldKind, FormSpec, GridForm};
///
/// let spec = FormSpec::new(vec![vec![
///     FieldDescriptor::new("email", "Email", FieldKind::Text).required(),
/// ]]);
/// let values = GridForm::new(spec).with_title("Sign up").run()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct GridForm {
    spec: FormSpec,
    options: UiOptions,
    defaults: Option<Value>,
    controller: Option<Box<dyn FormController>>,
    widgets: WidgetRegistry,
    on_success: Option<SuccessCallback>,
    on_failure: Option<FailureCallback>,
    output: Option<OutputOptions>,
}

impl std::fmt::Debug for GridForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridForm")
            .field("spec", &self.spec)
            .field("options", &self.options)
            .field("defaults", &self.defaults)
            .field("widgets", &self.widgets)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl GridForm {
    pub fn new(spec: FormSpec) -> Self {
        Self {
            spec,
            options: UiOptions::default(),
            defaults: None,
            controller: None,
            widgets: WidgetRegistry::default(),
            on_success: None,
            on_failure: None,
            output: None,
        }
    }

    /// Title drawn on the form container.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.spec.container.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial values for the built-in [`FormState`]; reset returns to them.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Binds the form to a caller-owned controller instead of a [`FormState`].
    pub fn with_controller(mut self, controller: impl FormController + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }

    pub fn with_custom_widget<W, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        W: CustomWidget + 'static,
        F: Fn() -> W + 'static,
    {
        self.widgets.register(name, factory);
        self
    }

    pub fn on_submit(mut self, on_success: impl FnMut(&Value) + 'static) -> Self {
        self.on_success = Some(Box::new(on_success));
        self
    }

    pub fn on_submit_error(mut self, on_failure: impl FnMut(&FieldErrors) + 'static) -> Self {
        self.on_failure = Some(Box::new(on_failure));
        self
    }

    /// Writes the submitted values once the form closes.
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    /// Descriptor problems, including custom fields naming an unregistered
    /// widget.
    pub fn issues(&self) -> Vec<SpecIssue> {
        inspect_form_spec_with(&self.spec, |name| self.widgets.contains(name))
    }

    fn build_controller(
        spec: &FormSpec,
        controller: Option<Box<dyn FormController>>,
        defaults: Option<Value>,
    ) -> Result<Box<dyn FormController>> {
        if let Some(controller) = controller {
            return Ok(controller);
        }
        let mut state = FormState::for_spec(spec)?;
        if let Some(defaults) = defaults {
            state = state.with_defaults(defaults);
        }
        Ok(Box::new(state))
    }

    pub fn run(self) -> Result<Option<Value>> {
        for issue in self.issues() {
            debug!(field = %issue.field, "{}", issue.message);
        }
        let GridForm {
            spec,
            options,
            defaults,
            controller,
            widgets,
            on_success,
            on_failure,
            output,
        } = self;

        let controller = Self::build_controller(&spec, controller, defaults)?;
        let context = ComponentContext {
            widgets,
            ..ComponentContext::default()
        };
        let handlers = SubmitHandlers::from_parts(on_success, on_failure);

        let mut app = App::new(spec, controller, context, handlers, options);
        let result = app.run()?;
        if let (Some(values), Some(output)) = (result.as_ref(), output.as_ref()) {
            io::emit(values, output).context("failed to write submitted values")?;
        }
        Ok(result)
    }
}
