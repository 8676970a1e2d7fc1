use std::io::{self, Write};

use serde::Serialize;

use crate::app::{PrimeResult, SpeciesList, SpeciesSummary};
use crate::domain::{Advisory, AdvisorySink};
use crate::table::{BenchmarkTable, NumericTable};

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_species_list(result: &SpeciesList) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_species_summary(result: &SpeciesSummary) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_traits(species: &str, traits: &[String]) -> io::Result<()> {
        #[derive(Serialize)]
        struct TraitList<'a> {
            species: &'a str,
            traits: &'a [String],
        }
        Self::print_json(&TraitList { species, traits })
    }

    pub fn print_cv_table(table: &NumericTable) -> io::Result<()> {
        Self::print_json(table)
    }

    pub fn print_benchmark(table: &BenchmarkTable) -> io::Result<()> {
        Self::print_json(table)
    }

    pub fn print_prime(result: &PrimeResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl AdvisorySink for JsonOutput {
    fn advise(&self, _advisory: Advisory) {}
}

/// Routes advisories to the log stream so they never mix with JSON on stdout.
pub struct LogSink;

impl AdvisorySink for LogSink {
    fn advise(&self, advisory: Advisory) {
        tracing::warn!("{advisory}");
    }
}
