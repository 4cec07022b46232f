//! Property-based tests for the cash-flow graph.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::CategoryId;

use super::builder::{FlowGraphBuilder, SAVINGS_NODE};
use crate::aggregation::CategoryTotal;

fn totals(offset: u128) -> impl Strategy<Value = Vec<CategoryTotal>> {
    prop::collection::vec(0i64..1_000_000, 0..6).prop_map(move |amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, cents)| CategoryTotal {
                id: Some(CategoryId::from_u128(offset + i as u128)),
                name: format!("Category {}", offset + i as u128),
                icon: None,
                color: None,
                total: Decimal::new(cents, 2),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Links are empty when a total is not positive; otherwise every link is
    /// non-negative and the savings node exists iff income exceeds expenses.
    #[test]
    fn prop_flow_graph_invariants(income in totals(1), expenses in totals(100)) {
        let total_income: Decimal = income.iter().map(|c| c.total).sum();
        let total_expenses: Decimal = expenses.iter().map(|c| c.total).sum();

        let graph = FlowGraphBuilder::build(&income, &expenses, total_income, total_expenses);

        if total_income <= Decimal::ZERO || total_expenses <= Decimal::ZERO {
            prop_assert!(graph.links.is_empty());
        }
        prop_assert!(graph.links.iter().all(|l| l.value >= Decimal::ZERO));
        prop_assert!(graph.links.iter().all(|l| l.source < income.len() && l.target < graph.nodes.len()));

        let has_savings = graph.nodes.iter().any(|n| n.name == SAVINGS_NODE);
        prop_assert_eq!(has_savings, total_income > total_expenses);
    }

    /// Each source's outgoing links approximate its income up to rounding.
    #[test]
    fn prop_outgoing_matches_share(income in totals(1), expenses in totals(100)) {
        let total_income: Decimal = income.iter().map(|c| c.total).sum();
        let total_expenses: Decimal = expenses.iter().map(|c| c.total).sum();
        prop_assume!(total_income > total_expenses && total_expenses > Decimal::ZERO);

        let graph = FlowGraphBuilder::build(&income, &expenses, total_income, total_expenses);

        for (source, category) in income.iter().enumerate() {
            let outgoing: Decimal = graph
                .links
                .iter()
                .filter(|l| l.source == source)
                .map(|l| l.value)
                .sum();
            let tolerance = Decimal::new(1, 2) * Decimal::from(expenses.len() + 1);
            prop_assert!((outgoing - category.total).abs() <= tolerance);
        }
    }
}
