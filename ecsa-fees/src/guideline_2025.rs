//! Built-in ECSA guideline dataset (Government Gazette No. 52691, 16 May 2025).

use crate::dataset::{
    AdjustmentFactor, DatasetDefinition, FactorSet, FeeBracket, GuidelineDataset, StageWeight,
    StageWeightSet, TableDefinition,
};
use crate::error::DatasetResult;
use crate::fee::MIN_PROJECT_VALUE;

pub const GUIDELINE_NAME: &str = "Government Gazette No. 52691 (16 May 2025)";

const CIVIL: &str = "Civil Engineering Projects";
const STRUCTURAL: &str = "Structural Engineering Projects";
const BUILDING: &str = "Building Projects";
const MECH_ELEC: &str = "Mechanical and Electrical Projects";

const ALTERATIONS: &str = "Alterations to existing works";
const DUPLICATION: &str = "Duplication of works";
const QS_ADMIN: &str = "Financial administration handled by QS";
const MULTI_TENANT: &str = "Multi-tenant installations";
const MASS_CONCRETE: &str = "Mass concrete foundations, brickwork and cladding";

// Bracket rows shared by most tables: (min, max, primary, secondary %).
const ENGINEERING_ROWS: [(f64, f64, f64, f64); 6] = [
    (1_050_000.0, 2_100_000.0, 178_500.0, 17.0),
    (2_100_000.0, 10_500_000.0, 336_000.0, 12.5),
    (10_500_000.0, 21_000_000.0, 1_386_000.0, 10.5),
    (21_000_000.0, 52_500_000.0, 2_488_500.0, 9.0),
    (52_500_000.0, 105_000_000.0, 5_323_500.0, 8.0),
    (105_000_000.0, 630_000_000.0, 9_523_500.0, 7.0),
];

const BUILDING_ROWS: [(f64, f64, f64, f64); 4] = [
    (1_050_000.0, 2_100_000.0, 178_500.0, 17.0),
    (2_100_000.0, 10_500_000.0, 336_000.0, 12.5),
    (10_500_000.0, 21_000_000.0, 1_386_000.0, 10.5),
    (21_000_000.0, 52_500_000.0, 2_488_500.0, 9.5),
];

const BUILDING_SERVICES_ROWS: [(f64, f64, f64, f64); 5] = [
    (1_050_000.0, 2_100_000.0, 210_000.0, 20.0),
    (2_100_000.0, 10_500_000.0, 399_000.0, 15.0),
    (10_500_000.0, 21_000_000.0, 1_659_000.0, 13.0),
    (21_000_000.0, 52_500_000.0, 3_024_000.0, 11.5),
    (52_500_000.0, 105_000_000.0, 6_646_500.0, 10.5),
];

fn rows(rows: &[(f64, f64, f64, f64)]) -> Vec<FeeBracket> {
    rows.iter()
        .map(|&(min, max, primary, secondary)| FeeBracket::new(min, max, primary, secondary))
        .collect()
}

fn table(
    id: &str,
    name: &str,
    factor_set: &str,
    stage_set: &str,
    brackets: Vec<FeeBracket>,
) -> TableDefinition {
    TableDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        factor_set: factor_set.to_string(),
        stage_set: stage_set.to_string(),
        brackets,
    }
}

fn factor_set(key: &str, factors: &[(&str, f64)]) -> FactorSet {
    FactorSet {
        key: key.to_string(),
        factors: factors
            .iter()
            .map(|&(name, multiplier)| AdjustmentFactor::new(name, multiplier))
            .collect(),
    }
}

fn stage_set(key: &str, weights: [f64; 6]) -> StageWeightSet {
    const STAGES: [&str; 6] = [
        "Inception",
        "Concept and Viability",
        "Design Development",
        "Documentation and Procurement",
        "Contract Administration and Inspection",
        "Close-Out",
    ];
    StageWeightSet {
        key: key.to_string(),
        stages: STAGES
            .iter()
            .zip(weights)
            .map(|(stage, weight)| StageWeight::new(*stage, weight))
            .collect(),
    }
}

fn definition() -> DatasetDefinition {
    let mut table_1 = rows(&ENGINEERING_ROWS);
    table_1.push(FeeBracket::open(630_000_000.0, 46_273_500.0, 6.0));

    let table_2 = vec![
        FeeBracket::new(1_050_000.0, 2_100_000.0, 84_000.0, 8.0),
        FeeBracket::new(2_100_000.0, 10_500_000.0, 157_500.0, 5.5),
        FeeBracket::new(10_500_000.0, 21_000_000.0, 619_500.0, 4.5),
        FeeBracket::new(21_000_000.0, 52_500_000.0, 1_092_000.0, 3.5),
        FeeBracket::new(52_500_000.0, 105_000_000.0, 2_194_500.0, 3.0),
        FeeBracket::open(105_000_000.0, 3_769_500.0, 2.5),
    ];

    let mut building = rows(&BUILDING_ROWS);
    building.push(FeeBracket::open(52_500_000.0, 5_481_000.0, 8.5));

    let mut mech_elec = rows(&ENGINEERING_ROWS);
    mech_elec.push(FeeBracket::open(630_000_000.0, 46_273_500.0, 6.5));

    // Table 7 is published with a finite top bracket.
    let mut table_7 = rows(&BUILDING_SERVICES_ROWS);
    table_7.push(FeeBracket::new(105_000_000.0, 630_000_000.0, 12_159_000.0, 10.0));

    let mut table_8 = rows(&BUILDING_SERVICES_ROWS);
    table_8.push(FeeBracket::open(105_000_000.0, 12_159_000.0, 10.0));

    let mut table_1 = table(
        "1",
        "Civil & Structural Engineering (Engineering Projects)",
        "2A",
        CIVIL,
        table_1,
    );
    table_1.description =
        Some("Guideline fees for engineering projects as per Table 1.".to_string());

    let mut table_2 = table(
        "2",
        "Additional Design Fee: Reinforced Concrete & Structural Steel",
        "2A",
        CIVIL,
        table_2,
    );
    table_2.description = Some(
        "Supplementary fees in addition to Table 1 for reinforced concrete and structural steel."
            .to_string(),
    );

    let services = [
        (MULTI_TENANT, 1.25),
        (ALTERATIONS, 1.25),
        (DUPLICATION, 0.25),
        (QS_ADMIN, 0.85),
    ];

    DatasetDefinition {
        name: GUIDELINE_NAME.to_string(),
        minimum_project_value: MIN_PROJECT_VALUE,
        tables: vec![
            table_1,
            table_2,
            table(
                "3",
                "Civil Engineering (Building Projects)",
                "3A",
                BUILDING,
                building.clone(),
            ),
            table(
                "4",
                "Structural Engineering (Building Projects)",
                "4A",
                STRUCTURAL,
                building,
            ),
            table(
                "5",
                "Mechanical Engineering (Engineering Projects)",
                "5A",
                MECH_ELEC,
                mech_elec.clone(),
            ),
            table(
                "6",
                "Electrical Engineering (Engineering Projects)",
                "6A",
                MECH_ELEC,
                mech_elec,
            ),
            table(
                "7",
                "Mechanical Engineering (Building Projects)",
                "7A",
                MECH_ELEC,
                table_7,
            ),
            table(
                "8",
                "Electrical Engineering (Building Projects)",
                "8A",
                MECH_ELEC,
                table_8,
            ),
        ],
        factor_sets: vec![
            factor_set(
                "2A",
                &[
                    ("Rural roads", 0.85),
                    (ALTERATIONS, 1.25),
                    (DUPLICATION, 0.25),
                    (QS_ADMIN, 0.85),
                ],
            ),
            factor_set(
                "3A",
                &[
                    (ALTERATIONS, 1.25),
                    ("Internal water and drainage for buildings", 1.25),
                    (MASS_CONCRETE, 0.33),
                    (DUPLICATION, 0.25),
                ],
            ),
            factor_set(
                "4A",
                &[(ALTERATIONS, 1.25), (MASS_CONCRETE, 0.33), (DUPLICATION, 0.25)],
            ),
            factor_set("5A", &services),
            factor_set("6A", &services),
            factor_set("7A", &services),
            factor_set("8A", &services),
        ],
        stage_sets: vec![
            stage_set(CIVIL, [5.0, 25.0, 25.0, 25.0, 15.0, 5.0]),
            stage_set(STRUCTURAL, [5.0, 25.0, 30.0, 10.0, 25.0, 5.0]),
            stage_set(BUILDING, [5.0, 25.0, 25.0, 15.0, 25.0, 5.0]),
            stage_set(MECH_ELEC, [5.0, 15.0, 20.0, 20.0, 35.0, 5.0]),
        ],
    }
}

impl GuidelineDataset {
    /// The 2025 ECSA guideline tables.
    pub fn ecsa_2025() -> DatasetResult<Self> {
        Self::new(definition())
    }
}
