//! Minimal `config` reader: extracts `[remote "<name>"]` sections only.

use std::collections::HashMap;

use serde::Serialize;

/// One configured remote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteInfo {
    pub name: String,
    /// Last `url` or `fetch` value seen in the section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,
}

/// Remote summary of a config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Deduplicated by name, last definition wins.
    pub remotes: Vec<RemoteInfo>,
    /// Verbatim config text, only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl RemoteConfig {
    pub fn find(&self, name: &str) -> Option<&RemoteInfo> {
        self.remotes.iter().find(|r| r.name == name)
    }
}

/// Parse config text into a remote summary.
///
/// Key/value lines outside a `remote` section are discarded. A remote
/// defined in two sections collapses to the later definition, keeping the
/// position where the name first appeared.
pub fn parse_remotes(content: &str, include_raw: bool) -> RemoteConfig {
    let mut parsed: Vec<RemoteInfo> = Vec::new();
    let mut current: Option<RemoteInfo> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(section) = section_header(line) {
            parsed.extend(current.take());
            current = remote_name(section).map(|name| RemoteInfo {
                name: name.to_string(),
                ..RemoteInfo::default()
            });
            continue;
        }

        let Some(remote) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = key_value(line) else {
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "url" | "fetch" => remote.fetch_url = Some(value.to_string()),
            "pushurl" => remote.push_url = Some(value.to_string()),
            _ => {}
        }
    }
    parsed.extend(current);

    RemoteConfig {
        remotes: dedup_by_name(parsed),
        raw: include_raw.then(|| content.to_string()),
    }
}

/// `[section]` → `section`. The brackets must enclose the whole line.
fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    (!inner.is_empty()).then_some(inner)
}

/// `remote "origin"` → `origin`; the `remote` keyword is case-insensitive.
fn remote_name(section: &str) -> Option<&str> {
    let keyword = section.get(..6)?;
    if !keyword.eq_ignore_ascii_case("remote") {
        return None;
    }
    let rest = &section[6..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let quoted = rest.trim_start();
    let name = quoted.strip_prefix('"')?.strip_suffix('"')?;
    (!name.is_empty()).then_some(name)
}

/// `key = value` with the key required and the value possibly empty.
fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then(|| (key, value.trim()))
}

fn dedup_by_name(remotes: Vec<RemoteInfo>) -> Vec<RemoteInfo> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<RemoteInfo> = Vec::with_capacity(remotes.len());
    for remote in remotes {
        match slots.get(&remote.name) {
            Some(&slot) => unique[slot] = remote,
            None => {
                slots.insert(remote.name.clone(), unique.len());
                unique.push(remote);
            }
        }
    }
    unique
}
