//! Property-based tests for the fee calculator.
//!
//! These run against the built-in 2025 dataset so every published table is
//! covered, not just hand-picked examples.

use std::collections::BTreeSet;

use ecsa_fees::{
    apply_discount, calculate_category, calculate_fees, compound_multiplier, compute_basic_fee,
    resolve_factors, CalculationInput, GuidelineDataset,
};
use proptest::prelude::*;

fn dataset() -> GuidelineDataset {
    GuidelineDataset::ecsa_2025().expect("built-in dataset is valid")
}

fn table_ids() -> Vec<String> {
    dataset().tables().iter().map(|t| t.id.clone()).collect()
}

fn close(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= 1e-6 * scale
}

// ============================================================================
// Exhaustive checks over the published tables
// ============================================================================

#[test]
fn cost_at_bracket_min_selects_that_bracket() {
    let dataset = dataset();
    for table in dataset.tables() {
        for bracket in &table.brackets {
            let fee = compute_basic_fee(table, bracket.min, dataset.minimum_project_value());
            assert!(fee.is_covered(), "table {} at {}", table.id, bracket.min);
            assert_eq!(fee.primary_fee, bracket.primary_fee, "table {}", table.id);
            assert_eq!(fee.secondary_fee, 0.0);
        }
    }
}

#[test]
fn cost_just_below_minimum_is_advisory() {
    let dataset = dataset();
    let cost = dataset.minimum_project_value() - 1.0;
    for table in dataset.tables() {
        let fee = compute_basic_fee(table, cost, dataset.minimum_project_value());
        assert_eq!(fee.basic_fee, 0.0, "table {}", table.id);
        assert!(fee.advisory_note.is_some(), "table {}", table.id);
    }
}

#[test]
fn every_stage_set_sums_to_hundred() {
    for set in dataset().stage_sets() {
        assert!((set.total_weight() - 100.0).abs() < 1e-9, "{}", set.key);
    }
}

// ============================================================================
// Randomized properties
// ============================================================================

fn factor_selection(dataset: &GuidelineDataset, table_id: &str, mask: u8) -> Vec<String> {
    dataset
        .factors_for_table(table_id)
        .map(|set| {
            set.factors
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, f)| f.name.clone())
                .collect()
        })
        .unwrap_or_default()
}

proptest! {
    /// Property: stage amounts add back up to the final fee.
    #[test]
    fn prop_stage_amounts_sum_to_final_fee(
        table_index in 0usize..8,
        cost in 1_000_000.0f64..2_000_000_000.0,
        discount in -50.0f64..150.0,
        mask in any::<u8>(),
    ) {
        let dataset = dataset();
        let ids = table_ids();
        let table_id = &ids[table_index];
        let requested: BTreeSet<String> =
            factor_selection(&dataset, table_id, mask).into_iter().collect();

        let (computation, breakdown) =
            calculate_category(&dataset, table_id, cost, discount, &requested).unwrap();

        prop_assert!(
            close(breakdown.total(), computation.final_fee),
            "stages {} vs final {}",
            breakdown.total(),
            computation.final_fee
        );
    }

    /// Property: the compound multiplier does not depend on selection order.
    #[test]
    fn prop_multiplier_order_independent(table_index in 0usize..8, mask in any::<u8>()) {
        let dataset = dataset();
        let ids = table_ids();
        let table_id = &ids[table_index];
        let forward = factor_selection(&dataset, table_id, mask);
        let mut reverse = forward.clone();
        reverse.reverse();

        let a = compound_multiplier(&dataset, table_id, forward.as_slice());
        let b = compound_multiplier(&dataset, table_id, reverse.as_slice());
        prop_assert!(close(a, b));

        prop_assert_eq!(
            resolve_factors(&dataset, table_id, &forward),
            resolve_factors(&dataset, table_id, &reverse)
        );
    }

    /// Property: no factors and no discount leave the basic fee untouched.
    #[test]
    fn prop_identity_adjustment(table_index in 0usize..8, cost in 1_000_000.0f64..1e10) {
        let dataset = dataset();
        let ids = table_ids();
        let table_id = &ids[table_index];
        let (computation, _) =
            calculate_category(&dataset, table_id, cost, 0.0, &BTreeSet::new()).unwrap();

        prop_assert_eq!(computation.compound_multiplier, 1.0);
        prop_assert_eq!(computation.final_fee, computation.basic_fee);
        prop_assert_eq!(apply_discount(computation.basic_fee, 1.0, 0.0), computation.basic_fee);
    }

    /// Property: totals are the plain sums of the included categories.
    #[test]
    fn prop_totals_are_category_sums(
        costs in proptest::collection::vec(0.0f64..50_000_000.0, 8),
        discounts in proptest::collection::vec(0.0f64..30.0, 8),
    ) {
        let dataset = dataset();
        let mut input = CalculationInput::category();
        for (i, id) in table_ids().iter().enumerate() {
            input = input.with_cost(id.clone(), costs[i]).with_discount(id.clone(), discounts[i]);
        }

        let result = calculate_fees(&dataset, &input);
        let undiscounted: f64 = result.categories.iter().map(|c| c.adjusted_fee()).sum();
        let discounted: f64 = result.categories.iter().map(|c| c.final_fee).sum();

        prop_assert!(close(result.totals.undiscounted_sum, undiscounted));
        prop_assert!(close(result.totals.discounted_sum, discounted));
        prop_assert_eq!(result.categories.len(), costs.iter().filter(|c| **c != 0.0).count());
        prop_assert!(result.totals.overall_discount_percent.is_finite());
    }
}
