use crate::{form::form_model::FormIdentity, state::state_model::SessionState};

/// Navigation identity a form fetch was issued under.
///
/// The credential is kept only as a fingerprint so tags can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub form: FormIdentity,
    pub base_path: String,
    pub credential: Option<String>,
}

impl FetchTag {
    pub fn capture(form: &FormIdentity, session: &SessionState) -> Self {
        Self {
            form: form.clone(),
            base_path: session.base_path.clone(),
            credential: session.credential.as_deref().map(fingerprint),
        }
    }
}

/// A fetch in flight: its tag plus a sequence number that only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub tag: FetchTag,
}

pub fn fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
