// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expands species records into gallery entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vitrine_agents::ViewerProps;
use vitrine_core::asset::AssetPath;

/// Scale the gallery applies to every model.
pub const GALLERY_MODEL_SCALE: f32 = 0.8;

/// One species as supplied by the data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    /// National number.
    pub id: u32,
    /// Lowercase API name, e.g. `mr-mime`.
    pub name: String,
    /// Type tags, primary first.
    #[serde(default)]
    pub types: Vec<String>,
}

/// A model variant of a species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// File suffix, e.g. `M`.
    pub code: String,
    /// Display label, e.g. `Male`.
    pub label: String,
}

impl Variant {
    /// Creates a variant.
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Species that ship one model per variant instead of a single model.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantTable {
    variants: HashMap<u32, Vec<Variant>>,
}

impl Default for VariantTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for id in [521, 668, 916] {
            table.insert(id, vec![Variant::new("M", "Male"), Variant::new("F", "Female")]);
        }
        table
    }
}

impl VariantTable {
    /// A table without variants.
    pub fn empty() -> Self {
        Self {
            variants: HashMap::new(),
        }
    }

    /// Declares the variants of `species_id`.
    pub fn insert(&mut self, species_id: u32, variants: Vec<Variant>) {
        self.variants.insert(species_id, variants);
    }

    /// The variants of `species_id`; empty for single-model species.
    pub fn variants_of(&self, species_id: u32) -> &[Variant] {
        self.variants
            .get(&species_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One row of the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Unique key: the padded id, plus `-{variant}` for variants.
    pub key: String,
    /// National number.
    pub species_id: u32,
    /// Human-readable name.
    pub display_name: String,
    /// Variant code, if any.
    pub variant: Option<String>,
    /// The model to show.
    pub asset_path: AssetPath,
    /// Type tags, primary first.
    pub type_tags: Vec<String>,
}

impl CatalogEntry {
    /// Props for a viewer showing this entry.
    pub fn props(&self, base: &str, container_height: f32) -> ViewerProps {
        let mut props = ViewerProps::new(self.asset_path.clone(), AssetPath::fallback(base))
            .with_type_tags(self.type_tags.iter().cloned())
            .with_scale(GALLERY_MODEL_SCALE);
        props.container_height = container_height;
        props
    }
}

/// Capitalizes each word of an API name. Hyphenated names keep their hyphens.
pub fn display_name(name: &str) -> String {
    let capitalized: Vec<String> = name
        .split([' ', '-'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();
    if name.contains('-') {
        capitalized.join("-")
    } else {
        capitalized.join(" ")
    }
}

/// The ordered list of gallery entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Expands `records` in order, one entry per variant where the table has any.
    pub fn build(records: &[SpeciesRecord], variants: &VariantTable, base: &str) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let name = display_name(&record.name);
            let species_variants = variants.variants_of(record.id);
            if species_variants.is_empty() {
                entries.push(CatalogEntry {
                    key: format!("{:04}", record.id),
                    species_id: record.id,
                    display_name: name,
                    variant: None,
                    asset_path: AssetPath::for_species(base, record.id, None),
                    type_tags: record.types.clone(),
                });
                continue;
            }
            for variant in species_variants {
                entries.push(CatalogEntry {
                    key: format!("{:04}-{}", record.id, variant.code),
                    species_id: record.id,
                    display_name: format!("{name} ({})", variant.label),
                    variant: Some(variant.code.clone()),
                    asset_path: AssetPath::for_species(base, record.id, Some(&variant.code)),
                    type_tags: record.types.clone(),
                });
            }
        }
        log::debug!("Catalog: {} records expanded into {} entries.", records.len(), entries.len());
        Self { entries }
    }

    /// Parses a JSON array of records and expands it.
    pub fn from_json_str(
        text: &str,
        variants: &VariantTable,
        base: &str,
    ) -> Result<Self, serde_json::Error> {
        let records: Vec<SpeciesRecord> = serde_json::from_str(text)?;
        Ok(Self::build(&records, variants, base))
    }

    /// All entries in list order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The entry at list position `index`.
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str, types: &[&str]) -> SpeciesRecord {
        SpeciesRecord {
            id,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn variant_species_expand_into_one_entry_per_variant() {
        let records = [
            record(520, "tranquill", &["normal", "flying"]),
            record(521, "unfezant", &["normal", "flying"]),
        ];
        let catalog = Catalog::build(&records, &VariantTable::default(), "");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries()[0].asset_path.as_str(), "/glbs/0520.glb");
        assert_eq!(catalog.entries()[1].key, "0521-M");
        assert_eq!(catalog.entries()[1].display_name, "Unfezant (Male)");
        assert_eq!(catalog.entries()[2].asset_path.as_str(), "/glbs/0521-F.glb");
        assert_eq!(catalog.entries()[2].variant.as_deref(), Some("F"));
    }

    #[test]
    fn names_are_capitalized_per_word() {
        assert_eq!(display_name("mr-mime"), "Mr-Mime");
        assert_eq!(display_name("BULBASAUR"), "Bulbasaur");
        assert_eq!(display_name("type null"), "Type Null");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn props_use_the_gallery_presentation() {
        let catalog = Catalog::from_json_str(
            r#"[{"id": 4, "name": "charmander", "types": ["fire"]}, {"id": 7, "name": "squirtle"}]"#,
            &VariantTable::empty(),
            "/cdn",
        )
        .unwrap();
        let props = catalog.get(0).unwrap().props("/cdn", 300.0);
        assert_eq!(props.asset_path.as_str(), "/cdn/glbs/0004.glb");
        assert_eq!(props.fallback_path.as_str(), "/cdn/glbs/0000.glb");
        assert_eq!(props.transform.scale, GALLERY_MODEL_SCALE);
        assert_eq!(props.type_tags, vec!["fire".to_string()]);
        assert!(catalog.get(1).unwrap().type_tags.is_empty());
    }
}
