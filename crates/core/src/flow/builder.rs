//! Cash-flow graph construction.
//!
//! Link values are a proportional allocation for visualization: each income
//! source is assumed to fund every expense category and savings in the
//! proportion it contributes to total income. They are not traced money
//! movements and must not be read as an audit trail.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::round_money;

use crate::aggregation::CategoryTotal;

/// Name of the savings node.
pub const SAVINGS_NODE: &str = "Savings";

const SAVINGS_COLOR: &str = "#22c55e";

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: Option<String>,
}

/// A weighted edge between two nodes, by node index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowLink {
    /// Index of the source node.
    pub source: usize,
    /// Index of the target node.
    pub target: usize,
    /// Allocated amount, rounded to 2 dp. Never negative.
    pub value: Decimal,
}

/// Nodes and links of a cash-flow graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    /// Income nodes, then expense nodes, then the savings node if any.
    pub nodes: Vec<FlowNode>,
    /// Links from income nodes.
    pub links: Vec<FlowLink>,
}

/// Builds cash-flow graphs.
pub struct FlowGraphBuilder;

impl FlowGraphBuilder {
    /// Builds the graph for the given category totals.
    ///
    /// A savings node is added when income exceeds expenses. When either
    /// total is not positive the graph has nodes but no links.
    #[must_use]
    pub fn build(
        income: &[CategoryTotal],
        expenses: &[CategoryTotal],
        total_income: Decimal,
        total_expenses: Decimal,
    ) -> FlowGraph {
        let savings = total_income - total_expenses;

        let mut nodes: Vec<FlowNode> = income
            .iter()
            .chain(expenses)
            .map(|c| FlowNode {
                name: c.name.clone(),
                color: c.color.clone(),
            })
            .collect();
        let savings_index = (savings > Decimal::ZERO).then(|| {
            nodes.push(FlowNode {
                name: SAVINGS_NODE.to_string(),
                color: Some(SAVINGS_COLOR.to_string()),
            });
            nodes.len() - 1
        });

        if total_income <= Decimal::ZERO || total_expenses <= Decimal::ZERO {
            return FlowGraph {
                nodes,
                links: Vec::new(),
            };
        }

        let mut links = Vec::new();
        for (source, source_total) in income.iter().map(|c| c.total).enumerate() {
            let share = source_total / total_income;

            for (offset, expense) in expenses.iter().enumerate() {
                let value = round_money(share * expense.total);
                if value > Decimal::ZERO {
                    links.push(FlowLink {
                        source,
                        target: income.len() + offset,
                        value,
                    });
                }
            }

            if let Some(target) = savings_index {
                let value = round_money(share * savings);
                if value > Decimal::ZERO {
                    links.push(FlowLink {
                        source,
                        target,
                        value,
                    });
                }
            }
        }

        FlowGraph { nodes, links }
    }
}
