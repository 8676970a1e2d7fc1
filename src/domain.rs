use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::GeseError;
use crate::table::NumericTable;

/// A validated species request as typed by the user. The resolver maps it to
/// a canonical name; until then it is just a trimmed, non-empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesQuery(String);

impl SpeciesQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpeciesQuery {
    type Err = GeseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(GeseError::InvalidSpecies(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Genotype matrix: rows are genotype identifiers, columns are markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenotypeTable(NumericTable);

impl GenotypeTable {
    pub fn new(table: NumericTable) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &NumericTable {
        &self.0
    }

    pub fn genotypes(&self) -> &[String] {
        self.0.index()
    }

    pub fn markers(&self) -> &[String] {
        self.0.columns()
    }
}

/// Phenotype table: rows are genotype identifiers, columns are trait names.
/// Cells may be missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhenotypeTable(NumericTable);

impl PhenotypeTable {
    pub fn new(table: NumericTable) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &NumericTable {
        &self.0
    }

    pub fn genotypes(&self) -> &[String] {
        self.0.index()
    }

    pub fn traits(&self) -> &[String] {
        self.0.columns()
    }
}

/// Cross-validation split assignments: one membership table per trait, all
/// sharing the same fixed 25-column schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvSplitSet {
    traits: BTreeMap<String, NumericTable>,
}

impl CvSplitSet {
    pub fn new(traits: BTreeMap<String, NumericTable>) -> Self {
        Self { traits }
    }

    pub fn traits(&self) -> Vec<String> {
        self.traits.keys().cloned().collect()
    }

    /// Membership table for one trait: rows are genotypes, columns are the 25
    /// split labels, cells are 0/1 or missing.
    pub fn cv_indices(&self, trait_name: &str) -> Result<&NumericTable, GeseError> {
        self.traits
            .get(trait_name)
            .ok_or_else(|| GeseError::UnknownTrait {
                name: trait_name.to_string(),
                available: self.traits(),
            })
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

/// Non-fatal signal surfaced to the caller without interrupting control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    AliasSubstitution { input: String, canonical: String },
    StaleCacheFallback { filename: String, url: String },
    EmptyFilterResult,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::AliasSubstitution { input, canonical } => {
                write!(f, "species '{input}' resolved to '{canonical}'")
            }
            Advisory::StaleCacheFallback { filename, url } => {
                write!(f, "fetch of {url} failed, using cached copy of {filename}")
            }
            Advisory::EmptyFilterResult => write!(f, "benchmark filters matched no rows"),
        }
    }
}

pub trait AdvisorySink {
    fn advise(&self, advisory: Advisory);
}

pub struct NoopSink;

impl AdvisorySink for NoopSink {
    fn advise(&self, _advisory: Advisory) {}
}
