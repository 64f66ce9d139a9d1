//! `HEAD` resolution: symbolic (`ref: <path>`) or detached (raw object id).

use serde::Serialize;

use super::leading_oid;

/// What the `HEAD` file points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Head {
    /// `ref: refs/heads/main`
    Symbolic { target: String },
    /// A bare object id.
    Detached { id: String },
}

impl Head {
    /// Branch name for a symbolic head under `refs/heads/`.
    pub fn branch(&self) -> Option<&str> {
        match self {
            Head::Symbolic { target } => target.strip_prefix("refs/heads/"),
            Head::Detached { .. } => None,
        }
    }
}

/// Parse the content of `HEAD`. Malformed content yields `None`.
///
/// The symbolic form is `ref:` (any case) followed by whitespace and a
/// single-line target. Anything else is read as a detached id from its
/// first token.
pub fn parse_head(content: &str) -> Option<Head> {
    let text = content.trim();
    if let Some(target) = symbolic_target(text) {
        return Some(Head::Symbolic { target: target.to_string() });
    }
    leading_oid(text).map(|id| Head::Detached { id })
}

fn symbolic_target(text: &str) -> Option<&str> {
    let keyword = text.get(..4)?;
    if !keyword.eq_ignore_ascii_case("ref:") {
        return None;
    }
    let rest = &text[4..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    // The target may not span lines; leading whitespace (newlines included) may.
    let target = rest.trim_start();
    if target.is_empty() || target.contains(['\n', '\r']) {
        return None;
    }
    Some(target.trim())
}
