use serde::{Deserialize, Serialize};

use crate::corpus::CorpusAssets;
use crate::error::CorpusError;

const CATEGORIES_FILE: &str = "categories.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// Display metadata for category tags. Tags without an entry display as-is.
#[derive(Clone, Debug, Default)]
pub struct CategoryCatalog {
    entries: Vec<CategoryInfo>,
}

impl CategoryCatalog {
    pub fn new(entries: Vec<CategoryInfo>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn bundled() -> Result<Self, CorpusError> {
        let file = CorpusAssets::get(CATEGORIES_FILE)
            .ok_or(CorpusError::MissingAsset(CATEGORIES_FILE))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|_| CorpusError::MissingAsset(CATEGORIES_FILE))?;
        Self::from_json(content)
    }

    pub fn get(&self, tag: &str) -> Option<&CategoryInfo> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn display_name<'a>(&'a self, tag: &'a str) -> &'a str {
        self.get(tag).map(|e| e.name.as_str()).unwrap_or(tag)
    }

    pub fn icon(&self, tag: &str) -> &str {
        self.get(tag).map(|e| e.icon.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;

    #[test]
    fn unknown_tag_falls_back_to_raw_tag() {
        let catalog = CategoryCatalog::new(vec![CategoryInfo {
            tag: "sleep".into(),
            name: "Sleep & Rest".into(),
            icon: "z".into(),
        }]);
        assert_eq!(catalog.display_name("sleep"), "Sleep & Rest");
        assert_eq!(catalog.display_name("astronomy"), "astronomy");
        assert_eq!(catalog.icon("astronomy"), "");
    }

    #[test]
    fn bundled_catalog_covers_bundled_corpus() {
        let catalog = CategoryCatalog::bundled().unwrap();
        let corpus = Corpus::bundled().unwrap();
        for tag in corpus.categories() {
            assert!(catalog.contains(tag), "no catalog entry for {tag}");
        }
    }
}
