//! Ref table: `packed-refs`, loose `refs/**` files, and special single-file refs.
//!
//! Precedence is purely by write order. Packed entries go in first, loose
//! files overwrite them, and the special refs go in last.

use std::collections::BTreeMap;

use tracing::debug;

use super::{canonical_oid, leading_oid};
use crate::byte_index::ByteIndex;
use crate::error::SnapshotError;

/// Ref name → lowercase object id.
pub type RefTable = BTreeMap<String, String>;

/// Single-file refs probed by exact path at the top of the control directory.
pub const SPECIAL_REFS: [&str; 5] = [
    "ORIG_HEAD",
    "FETCH_HEAD",
    "MERGE_HEAD",
    "CHERRY_PICK_HEAD",
    "REBASE_HEAD",
];

/// Parse `packed-refs` content into `(ref name, id)` pairs, in file order.
///
/// Skips blank lines, `#` comments, and `^<id>` peeled-tag lines. Every other
/// line needs an id token and a name token; extra tokens are ignored.
pub fn parse_packed_refs(content: &str) -> Vec<(String, String)> {
    let mut refs = Vec::new();
    let mut skipped = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('^') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let parsed = match (tokens.next(), tokens.next()) {
            (Some(id), Some(name)) => canonical_oid(id).map(|id| (name.to_string(), id)),
            _ => None,
        };
        match parsed {
            Some(entry) => refs.push(entry),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "packed-refs: skipped malformed lines");
    }
    refs
}

/// Build the ref table from a normalized byte index.
///
/// Missing `packed-refs` is not an error. Only a failure to read bytes is.
pub fn build_ref_table(index: &ByteIndex) -> Result<RefTable, SnapshotError> {
    let mut table = RefTable::new();

    if let Some(text) = index.read_text("packed-refs")? {
        let packed = parse_packed_refs(&text);
        debug!(count = packed.len(), "packed-refs parsed");
        table.extend(packed);
    }

    let mut loose = 0usize;
    for (path, entry) in index.with_prefix("refs/") {
        let text = entry.text(path)?;
        match leading_oid(&text) {
            Some(id) => {
                table.insert(path.to_string(), id);
                loose += 1;
            }
            None => debug!(path, "loose ref skipped: no object id"),
        }
    }
    debug!(count = loose, "loose refs read");

    for name in SPECIAL_REFS {
        let Some(text) = index.read_text(name)? else {
            continue;
        };
        if let Some(id) = leading_oid(&text) {
            table.insert(name.to_string(), id);
        }
    }

    Ok(table)
}
