//! Budget domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{BudgetId, CategoryId, CurrencyId};

use crate::period::calendar::{add_days, add_months, month_start, quarter_start, year_start};
use crate::period::{Period, PeriodError};

/// Recurrence of a budget amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Amount per week.
    Weekly,
    /// Amount per calendar month.
    Monthly,
    /// Amount per calendar quarter.
    Quarterly,
    /// Amount per calendar year.
    Yearly,
}

/// A spending limit for a set of expense categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget id.
    pub id: BudgetId,
    /// Display name.
    pub name: String,
    /// Amount per period, in `currency_id`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency_id: CurrencyId,
    /// Recurrence.
    pub period: BudgetPeriod,
    /// Covered categories. Empty covers every expense category.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    /// First active day.
    pub start_date: NaiveDate,
    /// Last active day, open-ended when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Budget {
    /// Whether the budget is active on `date`.
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// Whether the budget covers `category_id`.
    #[must_use]
    pub fn covers(&self, category_id: Option<CategoryId>) -> bool {
        self.category_ids.is_empty()
            || category_id.is_some_and(|id| self.category_ids.contains(&id))
    }

    /// Target amount for `range`, in the budget's currency.
    ///
    /// Each calendar unit of the recurrence that intersects both `range` and
    /// the budget's active window contributes `amount * overlap / unit_days`.
    /// Weekly budgets contribute `amount * days / 7`.
    pub fn target_for(&self, range: &Period) -> Result<Decimal, PeriodError> {
        let start = range.start.max(self.start_date);
        let end = self.end_date.map_or(range.end, |e| e.min(range.end));
        if start > end {
            return Ok(Decimal::ZERO);
        }

        if self.period == BudgetPeriod::Weekly {
            let days = Period::new(start, end)?.duration_days();
            return Ok(self.amount * Decimal::from(days) / Decimal::from(7));
        }

        let (mut cursor, step) = match self.period {
            BudgetPeriod::Monthly => (month_start(start), 1),
            BudgetPeriod::Quarterly => (quarter_start(start)?, 3),
            BudgetPeriod::Weekly | BudgetPeriod::Yearly => (year_start(start)?, 12),
        };

        let mut total = Decimal::ZERO;
        while cursor <= end {
            let next = add_months(cursor, step)?;
            let unit = Period::new(cursor, add_days(next, -1)?)?;
            let overlap = Period::new(cursor.max(start), unit.end.min(end))?;
            total += self.amount * Decimal::from(overlap.duration_days())
                / Decimal::from(unit.duration_days());
            cursor = next;
        }
        Ok(total)
    }
}

/// Variance calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Variance amount.
    pub variance: Decimal,
    /// Variance percentage.
    pub variance_percent: Decimal,
    /// Utilization percentage.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Under budget for expenses, over target for income.
    Favorable,
    /// Over budget for expenses, under target for income.
    Unfavorable,
    /// Exactly on budget.
    OnBudget,
}
