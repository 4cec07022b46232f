//! Ledger read-model types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CategoryId, CurrencyId, TagId, TransactionId};

/// Kind of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming into an account.
    Income,
    /// Money leaving an account.
    Expense,
    /// Movement between two own accounts.
    Transfer,
    /// Paying down a debt account.
    DebtPayment,
    /// Collecting money owed through a debt account.
    DebtCollection,
}

impl TransactionType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::DebtPayment => "debt_payment",
            Self::DebtCollection => "debt_collection",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            "debt_payment" => Ok(Self::DebtPayment),
            "debt_collection" => Ok(Self::DebtCollection),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

/// Read-only projection of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Transaction id.
    pub id: TransactionId,
    /// Transaction kind.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Booking date.
    pub date: NaiveDate,
    /// Source account.
    pub account_id: AccountId,
    /// Counterpart account for transfers and debt movements.
    #[serde(default)]
    pub to_account_id: Option<AccountId>,
    /// Category, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Amount in the source account's currency. Always positive.
    pub amount: Decimal,
    /// Amount credited to the counterpart, in its currency.
    #[serde(default)]
    pub to_amount: Option<Decimal>,
    /// Currency of the source account.
    pub currency_id: CurrencyId,
    /// Currency of the counterpart account.
    #[serde(default)]
    pub to_currency_id: Option<CurrencyId>,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Attached tags.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

impl LedgerEntry {
    /// Amount that lands on the counterpart account.
    #[must_use]
    pub fn counterpart_amount(&self) -> Decimal {
        self.to_amount.unwrap_or(self.amount)
    }

    /// Signed effects of this entry on account balances, in each account's currency.
    ///
    /// Income credits the source account, expenses debit it. Transfers and
    /// debt payments move money out of the source account into the
    /// counterpart; debt collections move it in from the counterpart.
    #[must_use]
    pub fn effects(&self) -> Vec<(AccountId, Decimal)> {
        let mut effects = Vec::with_capacity(2);
        match self.transaction_type {
            TransactionType::Income => effects.push((self.account_id, self.amount)),
            TransactionType::Expense => effects.push((self.account_id, -self.amount)),
            TransactionType::Transfer | TransactionType::DebtPayment => {
                effects.push((self.account_id, -self.amount));
                if let Some(to) = self.to_account_id {
                    effects.push((to, self.counterpart_amount()));
                }
            }
            TransactionType::DebtCollection => {
                effects.push((self.account_id, self.amount));
                if let Some(to) = self.to_account_id {
                    effects.push((to, -self.counterpart_amount()));
                }
            }
        }
        effects
    }
}

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Cash on hand.
    Cash,
    /// Bank account.
    Bank,
    /// Credit or debit card.
    Card,
    /// Savings account.
    Savings,
    /// Investment account.
    Investment,
    /// Money owed to or by someone. Excluded from net worth.
    Debt,
}

/// An account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account id.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Account kind.
    pub account_type: AccountType,
    /// Currency the account is kept in.
    pub currency_id: CurrencyId,
    /// Balance before any recorded transaction.
    #[serde(default)]
    pub initial_balance: Decimal,
    /// Inactive accounts are left out of net worth.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Day the account was opened.
    #[serde(default)]
    pub created_on: Option<NaiveDate>,
}

const fn default_true() -> bool {
    true
}

impl Account {
    /// Whether this account counts towards net worth.
    #[must_use]
    pub fn counts_towards_net_worth(&self) -> bool {
        self.is_active && self.account_type != AccountType::Debt
    }
}

/// Whether a category classifies income or expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Income category.
    Income,
    /// Expense category.
    Expense,
}

/// A transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Display color.
    #[serde(default)]
    pub color: Option<String>,
    /// Income or expense.
    pub kind: CategoryKind,
}

/// A transaction tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id.
    pub id: TagId,
    /// Display name.
    pub name: String,
    /// Display color.
    #[serde(default)]
    pub color: Option<String>,
}
