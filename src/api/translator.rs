pub const UNAUTHORIZED: u16 = 401;

/// Error body the server sends when the bearer credential is missing, expired or forged.
pub const INVALID_TOKEN: &str = "InvalidToken";

const MESSAGES: &[(&str, &str)] = &[(
    "InvalidUser",
    "Invalid Username or Password does not match !!!",
)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Credential rejected: return to the login form without showing a banner
    Reauthenticate,
    DisplayMessage(String),
}

/// Map an HTTP error status and body to what the user should see.
pub fn classify(status: u16, body: &str) -> Translation {
    if status == UNAUTHORIZED && body == INVALID_TOKEN {
        return Translation::Reauthenticate;
    }
    Translation::DisplayMessage(translate_message(body))
}

/// Look a raw error body up in the message table; unknown bodies pass through.
pub fn translate_message(body: &str) -> String {
    MESSAGES
        .iter()
        .find(|(code, _)| *code == body)
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| body.to_string())
}
