pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/cquesadat/EasyGeSe/main/datasets/index.json";
pub const DEFAULT_ALIASES_URL: &str =
    "https://raw.githubusercontent.com/cquesadat/EasyGeSe/main/datasets/species_aliases.json";

/// Remote endpoints for the dataset collection, threaded into [`crate::app::App`]
/// at construction so tests can point everything at local fixtures.
#[derive(Debug, Clone)]
pub struct Sources {
    pub index_url: String,
    pub aliases_url: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            aliases_url: DEFAULT_ALIASES_URL.to_string(),
        }
    }
}

impl Sources {
    pub fn index_filename(&self) -> &str {
        basename(&self.index_url)
    }

    pub fn aliases_filename(&self) -> &str {
        basename(&self.aliases_url)
    }

    /// Benchmark files live next to the index file, so their URLs are derived
    /// by replacing the last path segment of the index URL.
    pub fn benchmark_url(&self, filename: &str) -> String {
        match self.index_url.rsplit_once('/') {
            Some((base, _)) => format!("{base}/{filename}"),
            None => filename.to_string(),
        }
    }
}

fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_from_urls() {
        let sources = Sources::default();
        assert_eq!(sources.index_filename(), "index.json");
        assert_eq!(sources.aliases_filename(), "species_aliases.json");
    }

    #[test]
    fn benchmark_url_next_to_index() {
        let sources = Sources {
            index_url: "https://data.test/datasets/index.json".to_string(),
            aliases_url: "https://data.test/datasets/species_aliases.json".to_string(),
        };
        assert_eq!(
            sources.benchmark_url("results_raw.csv"),
            "https://data.test/datasets/results_raw.csv"
        );
    }
}
