use std::{collections::BTreeMap, sync::Arc};

use serde_json::Value;

/// Schema marker selecting the password control.
pub const PASSWORD_MARKER: &str = "passwordFmt";
/// `passwordFmt` value that turns on the strength rules.
pub const PASSWORD_FMT_STRONG: u64 = 2;
pub const PASSWORD_HELP: &str =
    "At least 8 characters, upper and lower case letters, digits, punctuation";

const PASSWORD_PUNCTUATION: &str = ".,\\/#!$%^&*;:{}=-_`~()@";

/// Field-level check attached to a schema property.
pub trait FieldValidator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Problem with `value`, if any, given the property's schema.
    fn validate(&self, field_schema: &Value, value: &Value) -> Option<String>;

    /// Hint shown next to the field regardless of its value.
    fn helper_text(&self, _field_schema: &Value) -> Option<&'static str> {
        None
    }
}

pub type SchemaPredicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

struct Entry {
    rank: u32,
    predicate: SchemaPredicate,
    validator: Arc<dyn FieldValidator>,
}

/// Open table of (rank, schema predicate) → validator.
///
/// Resolution picks, per property, the highest-ranked entry whose predicate
/// matches; on equal rank the earlier registration wins.
#[derive(Default)]
pub struct ValidatorRegistry {
    entries: Vec<Entry>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in password strength control.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            3,
            Box::new(|schema| is_string_control(schema) && has_marker(schema, PASSWORD_MARKER)),
            Arc::new(PasswordStrength),
        );
        registry
    }

    pub fn register(
        &mut self,
        rank: u32,
        predicate: SchemaPredicate,
        validator: Arc<dyn FieldValidator>,
    ) {
        self.entries.push(Entry {
            rank,
            predicate,
            validator,
        });
    }

    pub fn resolve(&self, schema: &Value) -> FieldValidators {
        let mut fields = BTreeMap::new();

        if let Some(props) = schema["properties"].as_object() {
            for (name, field_schema) in props {
                let mut best: Option<&Entry> = None;
                for entry in &self.entries {
                    if !(entry.predicate)(field_schema) {
                        continue;
                    }
                    if best.is_none_or(|b| entry.rank > b.rank) {
                        best = Some(entry);
                    }
                }
                if let Some(entry) = best {
                    fields.insert(
                        name.clone(),
                        (field_schema.clone(), Arc::clone(&entry.validator)),
                    );
                }
            }
        }

        FieldValidators { fields }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Validators resolved for one form definition.
pub struct FieldValidators {
    fields: BTreeMap<String, (Value, Arc<dyn FieldValidator>)>,
}

impl FieldValidators {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn validator_for(&self, field: &str) -> Option<&dyn FieldValidator> {
        self.fields.get(field).map(|(_, v)| v.as_ref())
    }

    pub fn helper_text(&self, field: &str) -> Option<&'static str> {
        self.fields
            .get(field)
            .and_then(|(schema, v)| v.helper_text(schema))
    }

    pub fn check_field(&self, field: &str, value: &Value) -> Option<String> {
        self.fields
            .get(field)
            .and_then(|(schema, v)| v.validate(schema, value))
    }

    /// Check every resolved field of a form data object.
    pub fn check(&self, data: &Value) -> Vec<FieldIssue> {
        self.fields
            .iter()
            .filter_map(|(field, (schema, v))| {
                let value = data.get(field).unwrap_or(&Value::Null);
                v.validate(schema, value).map(|message| FieldIssue {
                    field: field.clone(),
                    message,
                })
            })
            .collect()
    }
}

pub fn is_string_control(schema: &Value) -> bool {
    schema["type"].as_str() == Some("string")
}

pub fn has_marker(schema: &Value, marker: &str) -> bool {
    schema.get(marker).is_some()
}

// ============================================================================
// Password strength
// ============================================================================

pub struct PasswordStrength;

impl PasswordStrength {
    fn enforced(field_schema: &Value) -> bool {
        field_schema[PASSWORD_MARKER].as_u64() == Some(PASSWORD_FMT_STRONG)
    }
}

pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_PUNCTUATION.contains(c))
}

impl FieldValidator for PasswordStrength {
    fn name(&self) -> &'static str {
        "password"
    }

    fn validate(&self, field_schema: &Value, value: &Value) -> Option<String> {
        if !Self::enforced(field_schema) {
            return None;
        }
        match value.as_str() {
            Some(password) if is_strong_password(password) => None,
            _ => Some(PASSWORD_HELP.to_string()),
        }
    }

    fn helper_text(&self, field_schema: &Value) -> Option<&'static str> {
        Self::enforced(field_schema).then_some(PASSWORD_HELP)
    }
}
