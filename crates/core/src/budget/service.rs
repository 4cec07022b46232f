//! Budget service for targets and variance calculation.

use rust_decimal::Decimal;
use tally_shared::types::CategoryId;

use super::error::BudgetError;
use super::types::{Budget, VarianceResult, VarianceStatus};
use crate::currency::CurrencyConverter;
use crate::ledger::CategoryKind;
use crate::period::Period;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Calculate variance between budgeted and actual amounts.
    ///
    /// For expense categories: variance = budgeted - actual
    ///   - Positive variance (under budget) is favorable
    ///   - Negative variance (over budget) is unfavorable
    ///
    /// For income categories: variance = actual - budgeted
    ///   - Positive variance (over target) is favorable
    ///   - Negative variance (under target) is unfavorable
    ///
    /// Percentages keep full precision; callers round for presentation.
    #[must_use]
    pub fn calculate_variance(budgeted: Decimal, actual: Decimal, kind: CategoryKind) -> VarianceResult {
        let variance = match kind {
            CategoryKind::Income => actual - budgeted,
            CategoryKind::Expense => budgeted - actual,
        };

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        let variance_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            variance / budgeted * Decimal::ONE_HUNDRED
        };

        let utilization_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            actual / budgeted * Decimal::ONE_HUNDRED
        };

        VarianceResult {
            budgeted,
            actual,
            variance,
            variance_percent,
            utilization_percent,
            status,
        }
    }

    /// Sum of budget targets for `range` in the base currency.
    ///
    /// When `category_id` is given only budgets covering that category count.
    ///
    /// # Errors
    ///
    /// Fails on unknown budget currencies, invalid rates, or date overflow.
    pub fn target_in_base(
        budgets: &[Budget],
        range: &Period,
        category_id: Option<CategoryId>,
        converter: &CurrencyConverter,
    ) -> Result<Decimal, BudgetError> {
        let mut total = Decimal::ZERO;
        for budget in budgets {
            if category_id.is_some() && !budget.covers(category_id) {
                continue;
            }
            let target = budget.target_for(range)?;
            total += converter.to_base_by_id(target, budget.currency_id)?;
        }
        Ok(total)
    }
}
