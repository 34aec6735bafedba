//! Class label -> destination folder mapping, loaded from a RON file:
//!
//! ```ron
//! (
//!     classes: {
//!         "Fresa": "frutas/Fresa",
//!         "Higo": "frutas/Higo",
//!     },
//! )
//! ```
//!
//! Relative folders are resolved against the catalog file's own directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use harvester_engine::ClassificationTarget;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCatalog {
    pub classes: BTreeMap<String, PathBuf>,
}

impl ClassCatalog {
    pub fn single(label: impl Into<String>, directory: PathBuf) -> Self {
        let mut classes = BTreeMap::new();
        classes.insert(label.into(), directory);
        Self { classes }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading class catalog {}", path.display()))?;
        let mut catalog = Self::parse(&text)
            .with_context(|| format!("parsing class catalog {}", path.display()))?;
        if let Some(base) = path.parent() {
            catalog.resolve_relative_to(base);
        }
        Ok(catalog)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let catalog: Self = ron::from_str(text)?;
        if catalog.classes.is_empty() {
            bail!("catalog defines no classes");
        }
        Ok(catalog)
    }

    pub fn labels(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    pub fn target(&self, label: &str) -> Option<ClassificationTarget> {
        self.classes
            .get(label)
            .map(|dir| ClassificationTarget::new(label, dir.clone()))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for dir in self.classes.values_mut() {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}
