const REQUEST_SUFFIX: &str = "Request";

fn is_separator(c: char) -> bool {
    c == '_' || c == ':' || c.is_whitespace()
}

/// Derive the remote method name a form is submitted under.
///
/// One trailing `Request` is dropped, then every segment between `_`, `:`
/// or whitespace gets its first letter upper-cased and the separators are
/// removed: `users::LoginRequest` becomes `UsersLogin`.
pub fn derive_method_name(form_name: &str) -> String {
    let stem = form_name.strip_suffix(REQUEST_SUFFIX).unwrap_or(form_name);

    let mut out = String::with_capacity(stem.len());
    for segment in stem.split(is_separator).filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

