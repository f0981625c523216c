use serde::Deserialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::form::form_model::{FormDefinition, FormIdentity, WireFormDefinition};

/// Payload kind carrying a freshly issued credential.
pub const LOGIN_KIND: &str = "UsersLogin";
/// Payload kind carrying a form definition; also the key of the form-fetch request.
pub const FORM_KIND: &str = "JsonForms";

/// Body of a form fetch: `{ "JsonForms": { "name": ... } }`.
pub fn form_request_body(form: &FormIdentity) -> Value {
    submit_body(FORM_KIND, json!({ "name": form.name() }))
}

/// Body of an action submit: `{ <method>: <data> }`.
pub fn submit_body(method: &str, data: Value) -> Value {
    let mut body = Map::new();
    body.insert(method.to_string(), data);
    Value::Object(body)
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("envelope carries more than one payload: {0:?}")]
    MultiplePayloads(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    LoginResult { token: String },
    FormDefinition(FormDefinition),
    /// Application payload handed to the post-processing hook untouched
    App { kind: String, body: Value },
}

impl Payload {
    pub fn kind(&self) -> &str {
        match self {
            Payload::LoginResult { .. } => LOGIN_KIND,
            Payload::FormDefinition(_) => FORM_KIND,
            Payload::App { kind, .. } => kind,
        }
    }
}

/// Server-issued move to another API library and form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUpdate {
    #[serde(rename = "user_lib")]
    pub library_path: String,
    #[serde(rename = "json_form")]
    pub next_form: FormIdentity,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseEnvelope {
    pub payload: Option<Payload>,
    pub session_update: Option<SessionUpdate>,
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    response: Option<Map<String, Value>>,
    #[serde(default)]
    user_state: Option<SessionUpdate>,
}

#[derive(Deserialize)]
struct WireLogin {
    token: String,
}

impl ResponseEnvelope {
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope = serde_json::from_value(value).map_err(|e| EnvelopeError::Json {
            context: "envelope".into(),
            source: e,
        })?;

        let payload = match wire.response {
            Some(map) => decode_payload(map)?,
            None => None,
        };

        Ok(ResponseEnvelope {
            payload,
            session_update: wire.user_state,
        })
    }
}

fn decode_payload(map: Map<String, Value>) -> Result<Option<Payload>, EnvelopeError> {
    if map.len() > 1 {
        return Err(EnvelopeError::MultiplePayloads(map.keys().cloned().collect()));
    }
    let Some((kind, body)) = map.into_iter().next() else {
        return Ok(None);
    };

    let payload = match kind.as_str() {
        LOGIN_KIND => {
            let login: WireLogin = serde_json::from_value(body).map_err(|e| EnvelopeError::Json {
                context: LOGIN_KIND.into(),
                source: e,
            })?;
            Payload::LoginResult { token: login.token }
        }
        FORM_KIND => {
            let wire: WireFormDefinition =
                serde_json::from_value(body).map_err(|e| EnvelopeError::Json {
                    context: FORM_KIND.into(),
                    source: e,
                })?;
            let definition = wire.into_definition().map_err(|e| EnvelopeError::Json {
                context: "schema/uischema".into(),
                source: e,
            })?;
            Payload::FormDefinition(definition)
        }
        _ => Payload::App { kind, body },
    };
    Ok(Some(payload))
}
