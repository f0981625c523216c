use forms_client::api::error::DispatchError;
use serde_json::{Value, json};

pub const BASE_URL: &str = "http://localhost:8080/api/v1";

pub fn login_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user": { "type": "string", "minLength": 4, "title": "Login User" },
            "password": { "type": "string", "passwordFmt": 1, "format": "password", "title": "Login Password" }
        },
        "required": ["user", "password"]
    })
}

pub fn signup_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user": { "type": "string", "minLength": 4, "title": "Login User" },
            "name": { "type": "string", "minLength": 4 },
            "password": { "type": "string", "passwordFmt": 2, "format": "password", "title": "New Password" },
            "confirm_password": { "type": "string", "passwordFmt": 1, "format": "password", "title": "Confirm Password" }
        }
    })
}

pub fn vertical_layout(fields: &[&str]) -> Value {
    let elements: Vec<Value> = fields
        .iter()
        .map(|f| json!({ "type": "Control", "scope": format!("#/properties/{}", f) }))
        .collect();
    json!({ "type": "VerticalLayout", "elements": elements })
}

/// Envelope carrying a form definition, encoded the way the server does it.
pub fn form_reply(title: &str, schema: Value, layout: Value, buttons: Value) -> Value {
    json!({
        "response": {
            "JsonForms": {
                "schema": schema.to_string(),
                "uischema": layout.to_string(),
                "buttons": buttons,
                "title": title
            }
        },
        "user_state": null
    })
}

pub fn login_form_reply() -> Value {
    form_reply(
        "Login",
        login_schema(),
        vertical_layout(&["user", "password"]),
        json!([
            { "name": "Sign In", "btype": "Submit", "bpos": "Center", "form": null },
            { "name": "Sign Up", "btype": "NextForm", "bpos": "Right", "form": { "name": "users::NewRequest" } }
        ]),
    )
}

pub fn signup_form_reply() -> Value {
    form_reply(
        "User Sign Up",
        signup_schema(),
        vertical_layout(&["user", "name", "password", "confirm_password"]),
        json!([
            { "name": "Sign Up", "btype": "Submit", "bpos": "Center", "form": null },
            { "name": "Sign In", "btype": "NextForm", "bpos": "Right", "form": { "name": "users::LoginRequest" } }
        ]),
    )
}

pub fn main_form_reply() -> Value {
    form_reply(
        "Main User Form",
        json!({ "type": "object", "properties": { "app_str": { "type": "string" } } }),
        vertical_layout(&["app_str"]),
        json!([{ "name": "Submit", "btype": "Submit", "bpos": "Center", "form": null }]),
    )
}

pub fn login_success(token: &str, library: &str, next_form: &str) -> Value {
    json!({
        "response": { "UsersLogin": { "token": token } },
        "user_state": { "id": 1, "user_lib": library, "json_form": { "name": next_form } }
    })
}

pub fn app_main_reply(hello: &str, next_form: &str) -> Value {
    json!({
        "response": { "AppMain": { "hello": hello } },
        "user_state": { "id": 1, "user_lib": "user_app", "json_form": { "name": next_form } }
    })
}

pub fn http_error(status: u16, body: &str) -> DispatchError {
    DispatchError::Http {
        status,
        body: body.to_string(),
    }
}

pub fn network_error(path: &str) -> DispatchError {
    DispatchError::Network {
        path: path.to_string(),
        source: "connection refused".into(),
    }
}
