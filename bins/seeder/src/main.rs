//! Demo ledger generator for Tally development and testing.
//!
//! Writes a deterministic ledger snapshot: two currencies, a handful of
//! accounts, income and expense categories, tags, a monthly budget and one
//! year of recurring transactions.
//!
//! Usage: cargo run --bin seeder -- [path] [year]

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::budget::{Budget, BudgetPeriod};
use tally_core::currency::Currency;
use tally_core::ledger::{
    Account, AccountType, Category, CategoryKind, LedgerData, LedgerEntry, Tag, TransactionType,
};
use tally_shared::types::{AccountId, BudgetId, CategoryId, CurrencyId, TagId, TransactionId};

const USD: CurrencyId = CurrencyId::from_u128(1);
const EUR: CurrencyId = CurrencyId::from_u128(2);

const CHECKING: AccountId = AccountId::from_u128(10);
const CASH: AccountId = AccountId::from_u128(11);
const EURO_SAVINGS: AccountId = AccountId::from_u128(12);
const CAR_LOAN: AccountId = AccountId::from_u128(13);

const SALARY: CategoryId = CategoryId::from_u128(100);
const FREELANCE: CategoryId = CategoryId::from_u128(101);
const RENT: CategoryId = CategoryId::from_u128(200);
const GROCERIES: CategoryId = CategoryId::from_u128(201);
const TRANSPORT: CategoryId = CategoryId::from_u128(202);
const DINING: CategoryId = CategoryId::from_u128(203);
const UTILITIES: CategoryId = CategoryId::from_u128(204);

const ESSENTIAL: TagId = TagId::from_u128(300);
const WEEKEND: TagId = TagId::from_u128(301);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/ledger.json".to_string());
    let year: i32 = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("Invalid year '{raw}'"))?,
        None => 2025,
    };

    println!("Generating demo ledger for {year}...");
    let data = demo_ledger(year)?;

    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let json = serde_json::to_vec_pretty(&data)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {path}"))?;

    println!(
        "Wrote {} transactions across {} accounts to {path}",
        data.transactions.len(),
        data.accounts.len()
    );
    Ok(())
}

fn demo_ledger(year: i32) -> anyhow::Result<LedgerData> {
    let mut transactions = Vec::new();
    let mut next_id = 1000_u128;
    let mut push = |entry: Draft| {
        next_id += 1;
        transactions.push(entry.into_entry(TransactionId::from_u128(next_id)));
    };

    for month in 1..=12 {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(year, month, d)
                .with_context(|| format!("Invalid date {year}-{month}-{d}"))
        };
        // Small deterministic month-to-month variation.
        let wobble = Decimal::from(month % 4) * dec!(12.5);

        push(Draft::new(TransactionType::Income, day(1)?, CHECKING, dec!(4200)).category(SALARY));
        if month % 3 == 0 {
            push(
                Draft::new(TransactionType::Income, day(15)?, EURO_SAVINGS, dec!(900))
                    .category(FREELANCE)
                    .currency(EUR),
            );
        }
        push(
            Draft::new(TransactionType::Expense, day(2)?, CHECKING, dec!(1450))
                .category(RENT)
                .tag(ESSENTIAL),
        );
        push(
            Draft::new(TransactionType::Expense, day(5)?, CHECKING, dec!(180) + wobble)
                .category(UTILITIES)
                .tag(ESSENTIAL),
        );
        for week in 0..4 {
            push(
                Draft::new(TransactionType::Expense, day(6 + week * 7)?, CHECKING, dec!(95) + wobble)
                    .category(GROCERIES)
                    .tag(ESSENTIAL),
            );
            push(
                Draft::new(TransactionType::Expense, day(7 + week * 7)?, CASH, dec!(42))
                    .category(DINING)
                    .tag(WEEKEND),
            );
        }
        push(Draft::new(TransactionType::Expense, day(12)?, CASH, dec!(60)).category(TRANSPORT));
        push(Draft::new(TransactionType::Transfer, day(20)?, CHECKING, dec!(200)).to(CASH, dec!(200)));
        push(
            Draft::new(TransactionType::DebtPayment, day(25)?, CHECKING, dec!(350))
                .to(CAR_LOAN, dec!(350)),
        );
    }

    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1).context("Invalid year")?;

    Ok(LedgerData {
        currencies: vec![
            Currency {
                id: USD,
                code: "USD".into(),
                symbol: "$".into(),
                decimals: 2,
                is_base: true,
                rate: Decimal::ONE,
            },
            Currency {
                id: EUR,
                code: "EUR".into(),
                symbol: "€".into(),
                decimals: 2,
                is_base: false,
                rate: dec!(1.08),
            },
        ],
        accounts: vec![
            account(CHECKING, "Checking", AccountType::Bank, USD, dec!(2500)),
            account(CASH, "Wallet", AccountType::Cash, USD, dec!(100)),
            account(EURO_SAVINGS, "Euro savings", AccountType::Savings, EUR, dec!(3000)),
            account(CAR_LOAN, "Car loan", AccountType::Debt, USD, dec!(-8000)),
        ],
        categories: vec![
            category(SALARY, "Salary", CategoryKind::Income, "#2e7d32"),
            category(FREELANCE, "Freelance", CategoryKind::Income, "#66bb6a"),
            category(RENT, "Rent", CategoryKind::Expense, "#c62828"),
            category(GROCERIES, "Groceries", CategoryKind::Expense, "#ef6c00"),
            category(TRANSPORT, "Transport", CategoryKind::Expense, "#1565c0"),
            category(DINING, "Dining out", CategoryKind::Expense, "#6a1b9a"),
            category(UTILITIES, "Utilities", CategoryKind::Expense, "#455a64"),
        ],
        tags: vec![
            Tag {
                id: ESSENTIAL,
                name: "essential".into(),
                color: Some("#9e9e9e".into()),
            },
            Tag {
                id: WEEKEND,
                name: "weekend".into(),
                color: None,
            },
        ],
        budgets: vec![Budget {
            id: BudgetId::from_u128(500),
            name: "Monthly spending".into(),
            amount: dec!(2800),
            currency_id: USD,
            period: BudgetPeriod::Monthly,
            category_ids: Vec::new(),
            start_date: jan_first,
            end_date: None,
        }],
        transactions,
    })
}

fn account(
    id: AccountId,
    name: &str,
    account_type: AccountType,
    currency_id: CurrencyId,
    initial_balance: Decimal,
) -> Account {
    Account {
        id,
        name: name.into(),
        account_type,
        currency_id,
        initial_balance,
        is_active: true,
        created_on: None,
    }
}

fn category(id: CategoryId, name: &str, kind: CategoryKind, color: &str) -> Category {
    Category {
        id,
        name: name.into(),
        icon: None,
        color: Some(color.into()),
        kind,
    }
}

/// Transaction under construction.
struct Draft {
    transaction_type: TransactionType,
    date: NaiveDate,
    account_id: AccountId,
    amount: Decimal,
    currency_id: CurrencyId,
    category_id: Option<CategoryId>,
    counterpart: Option<(AccountId, Decimal)>,
    tag_ids: Vec<TagId>,
}

impl Draft {
    fn new(
        transaction_type: TransactionType,
        date: NaiveDate,
        account_id: AccountId,
        amount: Decimal,
    ) -> Self {
        Self {
            transaction_type,
            date,
            account_id,
            amount,
            currency_id: USD,
            category_id: None,
            counterpart: None,
            tag_ids: Vec::new(),
        }
    }

    fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    fn currency(mut self, id: CurrencyId) -> Self {
        self.currency_id = id;
        self
    }

    fn tag(mut self, id: TagId) -> Self {
        self.tag_ids.push(id);
        self
    }

    fn to(mut self, account_id: AccountId, amount: Decimal) -> Self {
        self.counterpart = Some((account_id, amount));
        self
    }

    fn into_entry(self, id: TransactionId) -> LedgerEntry {
        LedgerEntry {
            id,
            transaction_type: self.transaction_type,
            date: self.date,
            account_id: self.account_id,
            to_account_id: self.counterpart.map(|(account, _)| account),
            category_id: self.category_id,
            amount: self.amount,
            to_amount: self.counterpart.map(|(_, amount)| amount),
            currency_id: self.currency_id,
            to_currency_id: self.counterpart.map(|_| USD),
            description: format!("{} on {}", self.transaction_type.as_str(), self.date),
            tag_ids: self.tag_ids,
        }
    }
}
