use std::collections::BTreeSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Datelike, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::node::{NodeKind, NodeKinds};

/// Random alphanumeric string, used to name temporary cache files.
pub fn random_suffix(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// SHA-256 of `input`, URL-safe base64 without padding (safe as a file name).
pub fn fingerprint(input: &str) -> String {
    let hash = Sha256::digest(input.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn now_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Release year of a unix timestamp as the API reports it (`released_at`).
pub fn year_from_timestamp(timestamp: i64) -> Option<i32> {
    DateTime::from_timestamp(timestamp, 0).map(|date| date.year())
}

/// Parses a comma separated list of node kinds, as accepted by
/// `--include`/`--exclude`.
///
/// `all` selects every kind and `none` the empty set. Kind names are case
/// insensitive and accept `-` in place of `_`.
pub fn parse_node_kinds(input: &str) -> Result<NodeKinds, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("node kind list cannot be empty".to_string());
    }

    match trimmed.to_lowercase().as_str() {
        "all" => return Ok(NodeKinds::all()),
        "none" => return Ok(NodeKinds::none()),
        _ => {}
    }

    let mut kinds = BTreeSet::new();
    for segment in trimmed.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(format!("empty segment in '{}'", input));
        }
        let kind: NodeKind = segment
            .parse()
            .map_err(|_| format!("invalid value '{}'", segment))?;
        kinds.insert(kind);
    }

    Ok(NodeKinds(kinds))
}
