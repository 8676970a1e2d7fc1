use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::benchmark::{self, BenchmarkFilter};
use crate::cv;
use crate::domain::{AdvisorySink, CvSplitSet, GenotypeTable, PhenotypeTable, SpeciesQuery};
use crate::error::GeseError;
use crate::fetch::{Ensured, Fetcher};
use crate::index::{AliasMap, Index, parse_aliases, resolve_species};
use crate::registry::RegistryClient;
use crate::sources::Sources;
use crate::store::Store;
use crate::table::{BenchmarkTable, NumericTable};

/// How a load request may use the network: `download` persists fetched files
/// into the effective directory, otherwise missing files are streamed without
/// touching the cache. `data_dir` overrides the default user cache location.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub download: bool,
    pub data_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesListEntry {
    pub species: String,
    pub n_markers: Option<u64>,
    pub n_genotypes: Option<u64>,
    pub n_traits: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesList {
    pub species: Vec<SpeciesListEntry>,
}

/// One species' complete data triple, plus how to cite it.
#[derive(Debug, Clone)]
pub struct SpeciesData {
    pub species: String,
    pub citation: Option<String>,
    pub x: GenotypeTable,
    pub y: PhenotypeTable,
    pub z: CvSplitSet,
}

impl SpeciesData {
    pub fn summary(&self) -> SpeciesSummary {
        SpeciesSummary {
            species: self.species.clone(),
            citation: self.citation.clone(),
            n_genotypes: self.x.genotypes().len(),
            n_markers: self.x.markers().len(),
            traits: self.y.traits().to_vec(),
            cv_traits: self.z.traits(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesSummary {
    pub species: String,
    pub citation: Option<String>,
    pub n_genotypes: usize,
    pub n_markers: usize,
    pub traits: Vec<String>,
    pub cv_traits: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrimeItemResult {
    pub filename: String,
    pub url: String,
    pub path: String,
    pub action: String,
    pub downloaded_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrimeResult {
    pub items: Vec<PrimeItemResult>,
}

#[derive(Clone)]
pub struct App<R: RegistryClient> {
    store: Store,
    registry: R,
    sources: Sources,
}

impl<R: RegistryClient> App<R> {
    pub fn new(store: Store, registry: R, sources: Sources) -> Self {
        Self {
            store,
            registry,
            sources,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn fetcher(&self) -> Fetcher<'_, R> {
        Fetcher::new(&self.store, &self.registry)
    }

    pub fn load_index(
        &self,
        force_refresh: bool,
        sink: &dyn AdvisorySink,
    ) -> Result<Index, GeseError> {
        let ensured = self.fetcher().ensure_cached(
            &self.sources.index_url,
            self.sources.index_filename(),
            None,
            force_refresh,
            sink,
        )?;
        let bytes = Store::read_bytes(&ensured.path)?;
        Index::parse(&bytes)
    }

    pub fn load_aliases(
        &self,
        force_refresh: bool,
        sink: &dyn AdvisorySink,
    ) -> Result<AliasMap, GeseError> {
        let filename = self.sources.aliases_filename();
        let ensured = self.fetcher().ensure_cached(
            &self.sources.aliases_url,
            filename,
            None,
            force_refresh,
            sink,
        )?;
        let bytes = Store::read_bytes(&ensured.path)?;
        parse_aliases(&bytes, filename)
    }

    pub fn list_species(&self, sink: &dyn AdvisorySink) -> Result<SpeciesList, GeseError> {
        let index = self.load_index(false, sink)?;
        let species = index
            .entries()
            .iter()
            .map(|(name, entry)| SpeciesListEntry {
                species: name.clone(),
                n_markers: entry.metadata.n_markers,
                n_genotypes: entry.metadata.n_genotypes,
                n_traits: entry.metadata.n_traits,
            })
            .collect();
        Ok(SpeciesList { species })
    }

    /// Resolve a species name and load its X/Y/Z triple. Each file goes
    /// through the three-tier fetch policy independently.
    pub fn load_species(
        &self,
        species: &str,
        options: &LoadOptions,
        sink: &dyn AdvisorySink,
    ) -> Result<SpeciesData, GeseError> {
        let query: SpeciesQuery = species.parse()?;
        let index = self.load_index(false, sink)?;
        let aliases = self.load_aliases(false, sink)?;
        let canonical_names = index.species_names();
        let resolved = resolve_species(&query, &canonical_names, &aliases, sink)?;
        let entry = index
            .get(&resolved)
            .ok_or_else(|| GeseError::UnknownSpecies {
                input: resolved.clone(),
                available: canonical_names.clone(),
            })?;

        let directory = options.data_dir.as_deref();
        let fetcher = self.fetcher();

        let x_file = format!("{resolved}X.csv");
        let x_bytes = fetcher.load(&entry.x, &x_file, options.download, directory)?;
        let x = GenotypeTable::new(NumericTable::from_csv(&x_bytes, &x_file)?);

        let y_file = format!("{resolved}Y.csv");
        let y_bytes = fetcher.load(&entry.y, &y_file, options.download, directory)?;
        let y = PhenotypeTable::new(NumericTable::from_csv(&y_bytes, &y_file)?);

        let z_file = format!("{resolved}Z.json");
        let z_bytes = fetcher.load(&entry.z, &z_file, options.download, directory)?;
        let z = cv::parse(&z_bytes, &z_file)?;

        Ok(SpeciesData {
            species: resolved,
            citation: entry.citation.clone(),
            x,
            y,
            z,
        })
    }

    /// Load the summary or raw results file and apply the filter. Species
    /// filter values are alias-resolved before comparison; trait and model
    /// values are taken literally.
    pub fn load_benchmark_results(
        &self,
        filter: &BenchmarkFilter,
        summarize: bool,
        options: &LoadOptions,
        sink: &dyn AdvisorySink,
    ) -> Result<BenchmarkTable, GeseError> {
        let filename = if summarize {
            benchmark::RESULTS_SUMMARY_FILE
        } else {
            benchmark::RESULTS_RAW_FILE
        };
        let url = self.sources.benchmark_url(filename);
        let bytes = self
            .fetcher()
            .load(&url, filename, options.download, options.data_dir.as_deref())?;
        let table = BenchmarkTable::from_csv(&bytes, filename)?;

        if filter.is_empty() {
            return Ok(table);
        }

        let mut effective = filter.clone();
        if !filter.species.is_empty() && table.column_position_ci("species").is_some() {
            let index = self.load_index(false, sink)?;
            let aliases = self.load_aliases(false, sink)?;
            let canonical_names = index.species_names();
            effective.species = filter
                .species
                .iter()
                .map(|value| {
                    let query: SpeciesQuery = value.parse()?;
                    resolve_species(&query, &canonical_names, &aliases, sink)
                })
                .collect::<Result<Vec<_>, GeseError>>()?;
        }

        Ok(benchmark::filter_results(&table, &effective, sink))
    }

    /// Download the manifest and alias file into the cache.
    pub fn prime_index(
        &self,
        force: bool,
        sink: &dyn AdvisorySink,
    ) -> Result<PrimeResult, GeseError> {
        let fetcher = self.fetcher();
        let mut items = Vec::new();
        for (url, filename) in [
            (self.sources.index_url.as_str(), self.sources.index_filename()),
            (
                self.sources.aliases_url.as_str(),
                self.sources.aliases_filename(),
            ),
        ] {
            let ensured = fetcher.ensure_cached(url, filename, None, force, sink)?;
            items.push(prime_item(filename, url, &ensured));
        }
        Ok(PrimeResult { items })
    }

    /// Download one species' X/Y/Z triple for offline use.
    pub fn prime_species(
        &self,
        species: &str,
        directory: Option<&Utf8Path>,
        force: bool,
        sink: &dyn AdvisorySink,
    ) -> Result<PrimeResult, GeseError> {
        let query: SpeciesQuery = species.parse()?;
        let index = self.load_index(false, sink)?;
        let aliases = self.load_aliases(false, sink)?;
        let canonical_names = index.species_names();
        let resolved = resolve_species(&query, &canonical_names, &aliases, sink)?;
        let entry = index
            .get(&resolved)
            .ok_or_else(|| GeseError::UnknownSpecies {
                input: resolved.clone(),
                available: canonical_names.clone(),
            })?;

        let fetcher = self.fetcher();
        let mut items = Vec::new();
        for (url, filename) in [
            (entry.x.as_str(), format!("{resolved}X.csv")),
            (entry.y.as_str(), format!("{resolved}Y.csv")),
            (entry.z.as_str(), format!("{resolved}Z.json")),
        ] {
            let ensured = fetcher.ensure_cached(url, &filename, directory, force, sink)?;
            items.push(prime_item(&filename, url, &ensured));
        }
        Ok(PrimeResult { items })
    }

    /// Download both benchmark result files into the cache.
    pub fn prime_benchmarks(
        &self,
        force: bool,
        sink: &dyn AdvisorySink,
    ) -> Result<PrimeResult, GeseError> {
        let fetcher = self.fetcher();
        let mut items = Vec::new();
        for filename in [benchmark::RESULTS_RAW_FILE, benchmark::RESULTS_SUMMARY_FILE] {
            let url = self.sources.benchmark_url(filename);
            let ensured = fetcher.ensure_cached(&url, filename, None, force, sink)?;
            items.push(prime_item(filename, &url, &ensured));
        }
        Ok(PrimeResult { items })
    }
}

fn prime_item(filename: &str, url: &str, ensured: &Ensured) -> PrimeItemResult {
    PrimeItemResult {
        filename: filename.to_string(),
        url: url.to_string(),
        path: ensured.path.to_string(),
        action: if ensured.refreshed { "download" } else { "cache" }.to_string(),
        downloaded_at: chrono::Utc::now().to_rfc3339(),
    }
}
