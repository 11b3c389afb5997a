//! Loading guideline datasets from TOML and JSON.
#![cfg(feature = "serde")]

use ecsa_fees::{DatasetError, GuidelineDataset, MIN_PROJECT_VALUE};

const SMALL_DATASET: &str = r#"
name = "Test guideline"

[[tables]]
id = "A"
name = "Civil"
factor_set = "FA"
stage_set = "Civil"

[[tables.brackets]]
min = 1050000.0
max = 2100000.0
primary_fee = 178500.0
secondary_rate = 17.0

[[tables.brackets]]
min = 2100000.0
primary_fee = 336000.0
secondary_rate = 12.5

[[factor_sets]]
key = "FA"

[[factor_sets.factors]]
name = "Rural roads"
multiplier = 0.85
note = "Applies to gravel roads"

[[stage_sets]]
key = "Civil"
stages = [
    { stage = "Design", weight = 70.0 },
    { stage = "Construction", weight = 30.0 },
]
"#;

#[test]
fn toml_dataset_loads_with_default_minimum() {
    let dataset = GuidelineDataset::from_toml_str(SMALL_DATASET).unwrap();
    assert_eq!(dataset.name(), "Test guideline");
    assert_eq!(dataset.minimum_project_value(), MIN_PROJECT_VALUE);

    let table = dataset.table("A").unwrap();
    assert!(table.brackets[1].is_unbounded());
    let factor = dataset.factors_for_table("A").unwrap().get("Rural roads").unwrap();
    assert_eq!(factor.note.as_deref(), Some("Applies to gravel roads"));
}

#[test]
fn toml_dataset_is_validated() {
    let broken = SMALL_DATASET.replace("weight = 30.0", "weight = 20.0");
    let err = GuidelineDataset::from_toml_str(&broken).unwrap_err();
    assert!(matches!(err, DatasetError::StageWeightsNotHundred { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = GuidelineDataset::from_toml_str("name = ").unwrap_err();
    assert!(matches!(err, DatasetError::Parse(_)));
}

#[test]
fn builtin_dataset_survives_json() {
    let dataset = GuidelineDataset::ecsa_2025().unwrap();
    let json = serde_json::to_string(&dataset).unwrap();
    let loaded = GuidelineDataset::from_json_str(&json).unwrap();
    assert_eq!(loaded, dataset);

    // Deserializing straight into the validated type also validates.
    let direct: GuidelineDataset = serde_json::from_str(&json).unwrap();
    assert_eq!(direct.tables().len(), 8);
}

#[test]
fn json_with_dangling_stage_set_is_rejected() {
    let dataset = GuidelineDataset::ecsa_2025().unwrap();
    let mut definition = dataset.into_definition();
    definition.tables[0].stage_set = "Missing".to_string();
    let json = serde_json::to_string(&definition).unwrap();

    let err = serde_json::from_str::<GuidelineDataset>(&json).unwrap_err();
    assert!(err.to_string().contains("missing stage set Missing"));
}
