use serde::{Deserialize, Serialize};

pub const FLAGS_KEY: &str = "flagged_questions";

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedData {
    pub schema_version: u32,
    /// Flagged question ids in the order they were flagged.
    pub ids: Vec<String>,
}

impl Default for FlaggedData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ids: Vec::new(),
        }
    }
}

impl FlaggedData {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ids,
        }
    }
}

/// Accepts both the versioned document and a bare JSON array of ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlaggedDocument {
    Versioned(FlaggedData),
    Bare(Vec<String>),
}

pub fn parse_flagged(json: &str) -> Result<FlaggedData, serde_json::Error> {
    let data = match serde_json::from_str(json)? {
        FlaggedDocument::Versioned(data) => data,
        FlaggedDocument::Bare(ids) => FlaggedData::new(ids),
    };
    let mut seen = std::collections::HashSet::new();
    let ids = data.ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
    Ok(FlaggedData::new(ids))
}
