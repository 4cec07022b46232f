//! Point-in-time balance reconstruction by ledger replay.

pub mod reconstructor;

#[cfg(test)]
mod reconstructor_props;

pub use reconstructor::{AccountBalance, BalanceReconstructor};
