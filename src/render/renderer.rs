use std::io::{self, BufRead, Write};

use serde_json::{Map, Value};

use crate::{
    form::form_model::{ButtonKind, ButtonPosition, ButtonSpec, FormDefinition},
    render::validator::FieldValidators,
};

/// Event emitted by a form renderer back to the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Edit(Value),
    Click(ButtonSpec),
    Reload,
    Quit,
}

/// Turns a form definition into something a user can act on.
pub trait FormRenderer {
    fn render(
        &mut self,
        form: &FormDefinition,
        data: Option<&Value>,
        error: Option<&str>,
        validators: &FieldValidators,
    ) -> io::Result<()>;

    fn next_action(
        &mut self,
        form: &FormDefinition,
        data: Option<&Value>,
        validators: &FieldValidators,
    ) -> io::Result<UserAction>;
}

/// Buttons in display order: left group, then center, then right.
pub fn ordered_buttons(form: &FormDefinition) -> Vec<&ButtonSpec> {
    [ButtonPosition::Left, ButtonPosition::Center, ButtonPosition::Right]
        .into_iter()
        .flat_map(|p| form.buttons_at(p))
        .collect()
}

/// Label for a property: layout control label, then schema title, then the name.
pub fn field_label(form: &FormDefinition, field: &str) -> String {
    let scope = format!("#/properties/{}", field);
    find_layout_label(&form.layout, &scope)
        .or_else(|| form.schema["properties"][field]["title"].as_str())
        .unwrap_or(field)
        .to_string()
}

fn find_layout_label<'a>(layout: &'a Value, scope: &str) -> Option<&'a str> {
    if layout["scope"].as_str() == Some(scope) {
        if let Some(label) = layout["label"].as_str() {
            return Some(label);
        }
    }
    layout["elements"]
        .as_array()?
        .iter()
        .find_map(|el| find_layout_label(el, scope))
}

/// Parse typed input for a property according to its schema type.
pub fn parse_field_value(field_schema: &Value, raw: &str) -> Value {
    match field_schema["type"].as_str() {
        Some("integer") => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))
            .unwrap_or_else(|| Value::String(raw.to_string())),
        Some("boolean") => Value::Bool(matches!(raw, "true" | "yes" | "y" | "1")),
        Some("array") | Some("object") => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        _ => Value::String(raw.to_string()),
    }
}

// ============================================================================
// Terminal renderer
// ============================================================================

/// Line-oriented renderer over any reader/writer pair.
pub struct TerminalRenderer<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalRenderer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn edit(
        &mut self,
        form: &FormDefinition,
        data: Option<&Value>,
        validators: &FieldValidators,
    ) -> io::Result<Option<Value>> {
        let mut values = data
            .and_then(|d| d.as_object().cloned())
            .unwrap_or_else(Map::new);

        for field in form.field_names() {
            let label = field_label(form, &field);
            write!(self.output, "{}: ", label)?;
            self.output.flush()?;

            let Some(raw) = self.read_line()? else {
                return Ok(None);
            };
            if raw.is_empty() {
                continue;
            }

            let value = parse_field_value(&form.schema["properties"][&field], &raw);
            if let Some(problem) = validators.check_field(&field, &value) {
                writeln!(self.output, "  ! {}", problem)?;
            }
            values.insert(field, value);
        }

        Ok(Some(Value::Object(values)))
    }
}

impl<R: BufRead, W: Write> FormRenderer for TerminalRenderer<R, W> {
    fn render(
        &mut self,
        form: &FormDefinition,
        data: Option<&Value>,
        error: Option<&str>,
        validators: &FieldValidators,
    ) -> io::Result<()> {
        writeln!(self.output, "== {} ==", form.title)?;

        for field in form.field_names() {
            let label = field_label(form, &field);
            let secret = form.schema["properties"][&field]["format"].as_str() == Some("password");
            let current = match data.and_then(|d| d.get(&field)) {
                Some(_) if secret => "********".to_string(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            write!(self.output, "  {}: {}", label, current)?;
            if let Some(help) = validators.helper_text(&field) {
                write!(self.output, "  ({})", help)?;
            }
            writeln!(self.output)?;
        }

        if let Some(data) = data {
            for issue in validators.check(data) {
                let label = field_label(form, &issue.field);
                writeln!(self.output, "  ! {}: {}", label, issue.message)?;
            }
        }

        for (i, button) in ordered_buttons(form).iter().enumerate() {
            let marker = match button.kind {
                ButtonKind::Submit => "*",
                ButtonKind::Navigate(_) => ">",
            };
            writeln!(self.output, "  [{}] {} {}", i + 1, marker, button.name)?;
        }

        if let Some(error) = error {
            writeln!(self.output, "!! {}", error)?;
        }
        self.output.flush()
    }

    fn next_action(
        &mut self,
        form: &FormDefinition,
        data: Option<&Value>,
        validators: &FieldValidators,
    ) -> io::Result<UserAction> {
        let buttons = ordered_buttons(form);
        loop {
            write!(self.output, "[e]dit, [1-{}] button, [r]eload, [q]uit > ", buttons.len())?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(UserAction::Quit);
            };

            match line.as_str() {
                "e" => {
                    return Ok(match self.edit(form, data, validators)? {
                        Some(values) => UserAction::Edit(values),
                        None => UserAction::Quit,
                    });
                }
                "r" => return Ok(UserAction::Reload),
                "q" => return Ok(UserAction::Quit),
                other => {
                    let picked = other
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| buttons.get(i));
                    match picked {
                        Some(button) => return Ok(UserAction::Click((*button).clone())),
                        None => writeln!(self.output, "unknown choice '{}'", other)?,
                    }
                }
            }
        }
    }
}
