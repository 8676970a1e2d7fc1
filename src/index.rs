use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Advisory, AdvisorySink, SpeciesQuery};
use crate::error::GeseError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpeciesMetadata {
    #[serde(default)]
    pub n_markers: Option<u64>,
    #[serde(default)]
    pub n_genotypes: Option<u64>,
    #[serde(default)]
    pub n_traits: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeciesEntry {
    #[serde(rename = "X")]
    pub x: String,
    #[serde(rename = "Y")]
    pub y: String,
    #[serde(rename = "Z")]
    pub z: String,
    #[serde(default)]
    pub citation: Option<String>,
    #[serde(default)]
    pub metadata: SpeciesMetadata,
}

/// The remote manifest: canonical species name to per-file URLs plus
/// citation metadata. Parsed wholesale; never merged with a previous copy.
#[derive(Debug, Clone)]
pub struct Index {
    entries: BTreeMap<String, SpeciesEntry>,
}

impl Index {
    /// A successful byte fetch that fails to parse is a schema mismatch, not
    /// a network problem, and is reported as such.
    pub fn parse(bytes: &[u8]) -> Result<Self, GeseError> {
        let entries = serde_json::from_slice(bytes)
            .map_err(|err| GeseError::MalformedIndex(err.to_string()))?;
        Ok(Self { entries })
    }

    /// Canonical names in lexicographic order.
    pub fn species_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn get(&self, species: &str) -> Option<&SpeciesEntry> {
        self.entries.get(species)
    }

    pub fn entries(&self) -> &BTreeMap<String, SpeciesEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase alias to canonical name. Canonical names need not appear as
/// keys; resolution falls back to a direct match against the index.
pub type AliasMap = BTreeMap<String, String>;

pub fn parse_aliases(bytes: &[u8], file: &str) -> Result<AliasMap, GeseError> {
    serde_json::from_slice(bytes).map_err(|err| GeseError::MalformedPayload {
        file: file.to_string(),
        message: err.to_string(),
    })
}

/// Map a user-supplied name to a canonical one. Lookup is case-insensitive
/// through the alias map, then directly against the canonical names. A
/// substitution (any difference from the literal input) is surfaced as an
/// advisory; a miss, or an alias pointing outside the current index, fails
/// with the full sorted list of valid names.
pub fn resolve_species(
    input: &SpeciesQuery,
    canonical_names: &[String],
    aliases: &AliasMap,
    sink: &dyn AdvisorySink,
) -> Result<String, GeseError> {
    let needle = input.as_str().to_lowercase();
    let resolved = aliases.get(&needle).cloned().or_else(|| {
        canonical_names
            .iter()
            .find(|name| name.to_lowercase() == needle)
            .cloned()
    });

    match resolved {
        Some(name) if canonical_names.contains(&name) => {
            if name != input.as_str() {
                sink.advise(Advisory::AliasSubstitution {
                    input: input.as_str().to_string(),
                    canonical: name.clone(),
                });
            }
            Ok(name)
        }
        _ => {
            let mut available = canonical_names.to_vec();
            available.sort();
            Err(GeseError::UnknownSpecies {
                input: input.as_str().to_string(),
                available,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::domain::NoopSink;

    use super::*;

    fn canonical() -> Vec<String> {
        vec![
            "barley".to_string(),
            "bean".to_string(),
            "lentil".to_string(),
            "wheatG".to_string(),
        ]
    }

    fn aliases() -> AliasMap {
        AliasMap::from([
            ("lentil".to_string(), "lentil".to_string()),
            ("lentils".to_string(), "lentil".to_string()),
            ("lens culinaris".to_string(), "lentil".to_string()),
            ("wheat".to_string(), "wheatG".to_string()),
        ])
    }

    #[test]
    fn parse_index_entry() {
        let bytes = br#"{
            "lentil": {
                "X": "https://data.test/lentilX.csv",
                "Y": "https://data.test/lentilY.csv",
                "Z": "https://data.test/lentilZ.json",
                "citation": "Haile et al. 2020",
                "metadata": {"n_markers": 23591, "n_genotypes": 324, "n_traits": 6}
            }
        }"#;
        let index = Index::parse(bytes).unwrap();
        let entry = index.get("lentil").unwrap();
        assert_eq!(entry.x, "https://data.test/lentilX.csv");
        assert_eq!(entry.metadata.n_traits, Some(6));
    }

    #[test]
    fn parse_index_rejects_wrong_shape() {
        let err = Index::parse(b"[1, 2, 3]").unwrap_err();
        assert_matches!(err, GeseError::MalformedIndex(_));
    }

    #[test]
    fn resolve_identity() {
        let name = resolve_species(
            &"lentil".parse().unwrap(),
            &canonical(),
            &aliases(),
            &NoopSink,
        )
        .unwrap();
        assert_eq!(name, "lentil");
    }

    #[test]
    fn resolve_alias_case_insensitive() {
        let name = resolve_species(
            &"LENS CULINARIS".parse().unwrap(),
            &canonical(),
            &aliases(),
            &NoopSink,
        )
        .unwrap();
        assert_eq!(name, "lentil");
    }

    #[test]
    fn resolve_canonical_without_alias_entry() {
        let name = resolve_species(
            &"WHEATG".parse().unwrap(),
            &canonical(),
            &aliases(),
            &NoopSink,
        )
        .unwrap();
        assert_eq!(name, "wheatG");
    }

    #[test]
    fn resolve_unknown_enumerates_sorted_names() {
        let err = resolve_species(
            &"potato".parse().unwrap(),
            &canonical(),
            &aliases(),
            &NoopSink,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid species name: 'potato'. Available options are: barley, bean, lentil, wheatG"
        );
    }

    #[test]
    fn resolve_alias_to_missing_canonical_fails() {
        let mut aliases = aliases();
        aliases.insert("corn".to_string(), "maize".to_string());
        let err = resolve_species(&"corn".parse().unwrap(), &canonical(), &aliases, &NoopSink)
            .unwrap_err();
        assert_matches!(err, GeseError::UnknownSpecies { .. });
    }
}
