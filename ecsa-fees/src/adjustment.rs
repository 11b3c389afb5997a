//! Adjustment factors and discounts.
//!
//! ```text
//! final_fee = basic_fee × Π(selected multipliers) × (1 - discount / 100)
//! ```
//!
//! The adjustment is always applied before the discount. Discounts are not
//! clamped: a discount above 100% gives a negative fee, a negative discount
//! inflates it.

use crate::dataset::GuidelineDataset;

/// Keep only the requested factor names that the table may use.
///
/// Unknown names (e.g. left over from another category) are dropped without
/// error. The result follows the order of the table's factor set, so it does
/// not depend on the order names were selected in.
pub fn resolve_factors<I, S>(
    dataset: &GuidelineDataset,
    table_id: &str,
    requested: I,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(set) = dataset.factors_for_table(table_id) else {
        return Vec::new();
    };

    let requested: Vec<S> = requested.into_iter().collect();
    if requested.is_empty() {
        return Vec::new();
    }

    set.factors
        .iter()
        .filter(|factor| requested.iter().any(|name| name.as_ref() == factor.name))
        .map(|factor| factor.name.clone())
        .collect()
}

/// Product of the multipliers of `names`, starting from 1.0.
///
/// Names missing from the table's factor set contribute nothing.
pub fn compound_multiplier<S: AsRef<str>>(
    dataset: &GuidelineDataset,
    table_id: &str,
    names: &[S],
) -> f64 {
    let Some(set) = dataset.factors_for_table(table_id) else {
        return 1.0;
    };

    names.iter().fold(1.0, |acc, name| match set.get(name.as_ref()) {
        Some(factor) => acc * factor.multiplier,
        None => acc,
    })
}

/// Apply the adjustment multiplier, then the discount percentage.
pub fn apply_discount(basic_fee: f64, multiplier: f64, discount_percent: f64) -> f64 {
    basic_fee * multiplier * (1.0 - discount_percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> GuidelineDataset {
        GuidelineDataset::ecsa_2025().unwrap()
    }

    #[test]
    fn test_resolve_drops_unknown_names() {
        let dataset = dataset();
        let resolved = resolve_factors(
            &dataset,
            "3",
            ["Rural roads", "Alterations to existing works"],
        );
        // "Rural roads" belongs to set 2A only.
        assert_eq!(resolved, vec!["Alterations to existing works".to_string()]);
    }

    #[test]
    fn test_tables_sharing_a_set_resolve_identically() {
        let dataset = dataset();
        let requested = ["Rural roads", "Duplication of works"];
        assert_eq!(
            resolve_factors(&dataset, "1", requested),
            resolve_factors(&dataset, "2", requested)
        );
        assert_eq!(resolve_factors(&dataset, "1", requested).len(), 2);
    }

    #[test]
    fn test_resolve_unknown_table_is_empty() {
        let dataset = dataset();
        assert!(resolve_factors(&dataset, "99", ["Rural roads"]).is_empty());
        assert_eq!(
            compound_multiplier(&dataset, "99", ["Rural roads"].as_slice()),
            1.0
        );
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let dataset = dataset();
        let forward = ["Rural roads", "Alterations to existing works"];
        let reverse = ["Alterations to existing works", "Rural roads"];
        assert_eq!(
            resolve_factors(&dataset, "1", forward),
            resolve_factors(&dataset, "1", reverse)
        );
    }

    #[test]
    fn test_compound_multiplier() {
        let dataset = dataset();
        let names = ["Rural roads", "Alterations to existing works"];
        assert_eq!(compound_multiplier(&dataset, "1", names.as_slice()), 1.0625);

        let empty: [&str; 0] = [];
        assert_eq!(compound_multiplier(&dataset, "1", empty.as_slice()), 1.0);
    }

    #[test]
    fn test_adjustment_before_discount() {
        assert_eq!(apply_discount(255_000.0, 1.0625, 10.0), 243_843.75);
        assert_eq!(apply_discount(255_000.0, 1.0, 0.0), 255_000.0);
    }

    #[test]
    fn test_discount_not_clamped() {
        assert!(apply_discount(100_000.0, 1.0, 150.0) < 0.0);
        assert!(apply_discount(100_000.0, 1.0, -10.0) > 100_000.0);
    }
}
