//! Proportional cash-flow graph (income sources to expenses and savings).

pub mod builder;

#[cfg(test)]
mod builder_props;

pub use builder::{FlowGraph, FlowGraphBuilder, FlowLink, FlowNode, SAVINGS_NODE};
