use std::collections::BTreeMap;

use crate::domain::CvSplitSet;
use crate::error::GeseError;
use crate::table::NumericTable;

pub const SPLIT_COUNT: usize = 5;
pub const FOLD_COUNT: usize = 5;

/// The fixed column schema shared by every trait in every dataset:
/// `Split1CV1 .. Split1CV5, Split2CV1 .. Split5CV5`, split-major.
pub fn split_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(SPLIT_COUNT * FOLD_COUNT);
    for split in 1..=SPLIT_COUNT {
        for fold in 1..=FOLD_COUNT {
            columns.push(format!("Split{split}CV{fold}"));
        }
    }
    columns
}

/// Raw wire shape: trait name -> genotype name -> split label -> 0/1.
pub type RawSplits = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

pub fn parse(bytes: &[u8], file: &str) -> Result<CvSplitSet, GeseError> {
    let raw: RawSplits =
        serde_json::from_slice(bytes).map_err(|err| GeseError::MalformedPayload {
            file: file.to_string(),
            message: err.to_string(),
        })?;
    Ok(normalize(&raw))
}

/// Reshape the nested payload into one table per trait. Rows are the
/// genotypes present for that trait; columns are always the full 25-label
/// schema. A label absent from the payload becomes a missing cell, never 0:
/// "no membership information" and "excluded from this fold" are different
/// statements.
pub fn normalize(raw: &RawSplits) -> CvSplitSet {
    let columns = split_columns();
    let mut traits = BTreeMap::new();
    for (trait_name, genotypes) in raw {
        let index: Vec<String> = genotypes.keys().cloned().collect();
        let cells: Vec<Vec<Option<f64>>> = genotypes
            .values()
            .map(|memberships| {
                columns
                    .iter()
                    .map(|column| memberships.get(column).copied())
                    .collect()
            })
            .collect();
        traits.insert(
            trait_name.clone(),
            NumericTable::new(index, columns.clone(), cells),
        );
    }
    CvSplitSet::new(traits)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn schema_is_25_columns_split_major() {
        let columns = split_columns();
        assert_eq!(columns.len(), 25);
        assert_eq!(columns[0], "Split1CV1");
        assert_eq!(columns[4], "Split1CV5");
        assert_eq!(columns[5], "Split2CV1");
        assert_eq!(columns[24], "Split5CV5");
    }

    #[test]
    fn normalize_fills_absent_cells_with_missing() {
        let bytes = br#"{
            "DF": {
                "g1": {"Split1CV1": 1, "Split1CV2": 0},
                "g2": {"Split1CV1": 0}
            }
        }"#;
        let splits = parse(bytes, "testZ.json").unwrap();
        let table = splits.cv_indices("DF").unwrap();

        assert_eq!(table.columns().len(), 25);
        assert_eq!(table.index(), ["g1", "g2"]);
        assert_eq!(table.get("g1", "Split1CV1"), Some(1.0));
        assert_eq!(table.get("g2", "Split1CV1"), Some(0.0));
        assert_eq!(table.get("g2", "Split1CV2"), None);
        assert_eq!(table.get("g1", "Split5CV5"), None);
    }

    #[test]
    fn every_trait_gets_the_same_schema() {
        let bytes = br#"{
            "DF": {"g1": {"Split1CV1": 1}},
            "YLD": {"g9": {"Split3CV2": 0}}
        }"#;
        let splits = parse(bytes, "testZ.json").unwrap();
        assert_eq!(splits.traits(), ["DF", "YLD"]);
        for trait_name in splits.traits() {
            let table = splits.cv_indices(&trait_name).unwrap();
            assert_eq!(table.columns(), split_columns().as_slice());
        }
    }

    #[test]
    fn parse_rejects_non_numeric_membership() {
        let bytes = br#"{"DF": {"g1": {"Split1CV1": "yes"}}}"#;
        let err = parse(bytes, "testZ.json").unwrap_err();
        assert_matches!(err, GeseError::MalformedPayload { ref file, .. } if file == "testZ.json");
    }
}
