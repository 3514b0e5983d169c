use serde::{Deserialize, Serialize};

use super::descriptor::{FieldDescriptor, FieldGroup};

/// Visibility and label of an action button, written either as a bare flag or
/// as an object: `"resetButton": true` / `"submitButton": {"label": "Send"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonSetting {
    Flag(bool),
    Props {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        visible: Option<bool>,
    },
}

impl ButtonSetting {
    fn resolve(&self, default_label: &str) -> ActionButton {
        match self {
            ButtonSetting::Flag(visible) => ActionButton {
                visible: *visible,
                label: default_label.to_string(),
            },
            ButtonSetting::Props { label, visible } => ActionButton {
                visible: visible.unwrap_or(true),
                label: label.clone().unwrap_or_else(|| default_label.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub visible: bool,
    pub label: String,
}

/// Horizontal distribution of the action button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionsPlacement {
    #[serde(alias = "start")]
    FlexStart,
    Center,
    #[default]
    #[serde(alias = "end")]
    FlexEnd,
    SpaceBetween,
    SpaceAround,
}

/// Direction in which field groups are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormLayout {
    #[default]
    Column,
    Row,
}

/// Pass-through properties of the outer container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerProps {
    pub title: Option<String>,
    pub borders: bool,
    /// Blank lines between groups.
    pub spacing: u16,
}

impl Default for ContainerProps {
    fn default() -> Self {
        Self {
            title: None,
            borders: true,
            spacing: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSpec {
    #[serde(alias = "fieldsGroups")]
    pub groups: Vec<FieldGroup>,
    #[serde(default = "default_submit_button")]
    pub submit_button: ButtonSetting,
    #[serde(default = "default_reset_button")]
    pub reset_button: ButtonSetting,
    #[serde(default)]
    pub actions_placement: ActionsPlacement,
    #[serde(default)]
    pub layout: FormLayout,
    #[serde(default, alias = "otherProps")]
    pub container: ContainerProps,
}

fn default_submit_button() -> ButtonSetting {
    ButtonSetting::Flag(true)
}

fn default_reset_button() -> ButtonSetting {
    ButtonSetting::Flag(false)
}

impl FormSpec {
    pub fn new(groups: Vec<FieldGroup>) -> Self {
        Self {
            groups,
            submit_button: default_submit_button(),
            reset_button: default_reset_button(),
            actions_placement: ActionsPlacement::default(),
            layout: FormLayout::default(),
            container: ContainerProps::default(),
        }
    }

    pub fn with_reset_button(mut self, setting: ButtonSetting) -> Self {
        self.reset_button = setting;
        self
    }

    pub fn with_submit_button(mut self, setting: ButtonSetting) -> Self {
        self.submit_button = setting;
        self
    }

    pub fn with_actions_placement(mut self, placement: ActionsPlacement) -> Self {
        self.actions_placement = placement;
        self
    }

    pub fn with_layout(mut self, layout: FormLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_container(mut self, container: ContainerProps) -> Self {
        self.container = container;
        self
    }

    pub fn submit(&self) -> ActionButton {
        self.submit_button.resolve("Submit")
    }

    pub fn reset(&self) -> ActionButton {
        self.reset_button.resolve("Reset")
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.groups.iter().flat_map(|group| group.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn buttons_default_to_submit_only() {
        let spec: FormSpec = serde_json::from_value(json!({"groups": []})).unwrap();
        assert!(spec.submit().visible);
        assert!(!spec.reset().visible);
        assert_eq!(spec.actions_placement, ActionsPlacement::FlexEnd);
        assert_eq!(spec.layout, FormLayout::Column);
    }

    #[test]
    fn button_props_override_label() {
        let spec: FormSpec = serde_json::from_value(json!({
            "fieldsGroups": [],
            "resetButton": {"label": "Clear"},
            "submitButton": false,
            "actionsPlacement": "space-between"
        }))
        .unwrap();
        let reset = spec.reset();
        assert!(reset.visible);
        assert_eq!(reset.label, "Clear");
        assert!(!spec.submit().visible);
        assert_eq!(spec.actions_placement, ActionsPlacement::SpaceBetween);
    }
}
