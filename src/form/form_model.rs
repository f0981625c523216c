use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the form every session starts on, and returns to on reauthentication.
pub const LOGIN_FORM: &str = "users::LoginRequest";

/// Named reference to a server-side form definition.
///
/// The name doubles as the navigation key and as the seed of the remote
/// method name used when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormIdentity {
    name: String,
}

impl FormIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn login() -> Self {
        Self::new(LOGIN_FORM)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonPosition {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonKind {
    Submit,
    Navigate(FormIdentity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub name: String,
    pub kind: ButtonKind,
    pub position: ButtonPosition,
}

impl ButtonSpec {
    pub fn submit(name: &str, position: ButtonPosition) -> Self {
        Self {
            name: name.to_string(),
            kind: ButtonKind::Submit,
            position,
        }
    }

    pub fn navigate(name: &str, position: ButtonPosition, target: FormIdentity) -> Self {
        Self {
            name: name.to_string(),
            kind: ButtonKind::Navigate(target),
            position,
        }
    }

    pub fn target(&self) -> Option<&FormIdentity> {
        match &self.kind {
            ButtonKind::Navigate(target) => Some(target),
            ButtonKind::Submit => None,
        }
    }
}

/// Renderable description of a form, replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDefinition {
    pub title: String,
    pub schema: Value,
    pub layout: Value,
    #[serde(skip)]
    pub buttons: Vec<ButtonSpec>,
}

impl FormDefinition {
    pub fn buttons_at(&self, position: ButtonPosition) -> impl Iterator<Item = &ButtonSpec> {
        self.buttons.iter().filter(move |b| b.position == position)
    }

    /// Property names declared by the schema.
    pub fn field_names(&self) -> Vec<String> {
        self.schema["properties"]
            .as_object()
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireButtonType {
    Submit,
    NextForm,
}

/// Button exactly as the server serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireButton {
    pub name: String,
    pub btype: WireButtonType,
    pub bpos: ButtonPosition,
    #[serde(default)]
    pub form: Option<FormIdentity>,
}

impl WireButton {
    /// `None` when a `NextForm` button arrives without a target form.
    pub fn into_spec(self) -> Option<ButtonSpec> {
        let kind = match (self.btype, self.form) {
            (WireButtonType::Submit, _) => ButtonKind::Submit,
            (WireButtonType::NextForm, Some(target)) => ButtonKind::Navigate(target),
            (WireButtonType::NextForm, None) => return None,
        };
        Some(ButtonSpec {
            name: self.name,
            kind,
            position: self.bpos,
        })
    }
}

/// Form-definition payload. `schema` and `uischema` are JSON documents
/// encoded as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFormDefinition {
    pub schema: String,
    pub uischema: String,
    #[serde(default)]
    pub buttons: Vec<WireButton>,
    #[serde(default)]
    pub title: Option<String>,
}

impl WireFormDefinition {
    pub fn into_definition(self) -> Result<FormDefinition, serde_json::Error> {
        let schema: Value = serde_json::from_str(&self.schema)?;
        let layout: Value = serde_json::from_str(&self.uischema)?;

        let buttons = self
            .buttons
            .into_iter()
            .filter_map(|b| {
                let name = b.name.clone();
                let spec = b.into_spec();
                if spec.is_none() {
                    tracing::warn!(
                        button = %name,
                        "dropping NextForm button without a target form"
                    );
                }
                spec
            })
            .collect();

        Ok(FormDefinition {
            title: self.title.unwrap_or_default(),
            schema,
            layout,
            buttons,
        })
    }
}
