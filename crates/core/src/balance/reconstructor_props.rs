//! Property-based tests for balance reconstruction.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CurrencyId, TransactionId};

use super::reconstructor::BalanceReconstructor;
use crate::currency::{Currency, CurrencyConverter};
use crate::ledger::{Account, AccountType, LedgerEntry, TransactionType};

const ACCOUNTS: u128 = 4;

fn converter() -> CurrencyConverter {
    CurrencyConverter::new([
        Currency {
            id: CurrencyId::from_u128(1),
            code: "USD".into(),
            symbol: "$".into(),
            decimals: 2,
            is_base: true,
            rate: Decimal::ONE,
        },
        Currency {
            id: CurrencyId::from_u128(2),
            code: "EUR".into(),
            symbol: "€".into(),
            decimals: 2,
            is_base: false,
            rate: Decimal::new(855, 3),
        },
    ])
    .unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Income),
        Just(TransactionType::Expense),
        Just(TransactionType::Transfer),
        Just(TransactionType::DebtPayment),
        Just(TransactionType::DebtCollection),
    ]
}

fn accounts() -> impl Strategy<Value = Vec<Account>> {
    prop::collection::vec((0i64..1_000_000, any::<bool>(), any::<bool>()), ACCOUNTS as usize)
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (cents, active, eur))| Account {
                    id: AccountId::from_u128(i as u128 + 1),
                    name: format!("Account {i}"),
                    account_type: if i == 3 { AccountType::Debt } else { AccountType::Bank },
                    currency_id: CurrencyId::from_u128(if eur { 2 } else { 1 }),
                    initial_balance: Decimal::new(cents, 2),
                    is_active: active,
                    created_on: None,
                })
                .collect()
        })
}

fn entries() -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec(
        (
            transaction_type(),
            0i64..365,
            1u128..=ACCOUNTS,
            1u128..=ACCOUNTS,
            1i64..1_000_000,
        ),
        0..40,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (transaction_type, day, from, to, cents))| LedgerEntry {
                id: TransactionId::from_u128(i as u128 + 1),
                transaction_type,
                date: base_date() + chrono::Duration::days(day),
                account_id: AccountId::from_u128(from),
                to_account_id: Some(AccountId::from_u128(to)),
                category_id: None,
                amount: Decimal::new(cents, 2),
                to_amount: None,
                currency_id: CurrencyId::from_u128(1),
                to_currency_id: None,
                description: String::new(),
                tag_ids: vec![],
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The running-balance history equals naive per-date recomputation.
    #[test]
    fn prop_history_equals_naive(
        accounts in accounts(),
        entries in entries(),
        mut offsets in prop::collection::vec(-10i64..400, 1..12),
    ) {
        offsets.sort_unstable();
        let dates: Vec<_> = offsets
            .iter()
            .map(|o| base_date() + chrono::Duration::days(*o))
            .collect();
        let converter = converter();

        let history = BalanceReconstructor::history(&accounts, &entries, &dates, &[], &converter).unwrap();
        for (date, value) in dates.iter().zip(&history) {
            let naive = BalanceReconstructor::net_worth_at_date(&accounts, &entries, *date, &[], &converter)
                .unwrap();
            prop_assert_eq!(*value, naive);
        }
    }

    /// Before the first transaction every balance is the initial balance.
    #[test]
    fn prop_balance_before_first_transaction(accounts in accounts(), entries in entries()) {
        let before = base_date().pred_opt().unwrap();
        for account in &accounts {
            prop_assert_eq!(
                BalanceReconstructor::balance_at_date(account, &entries, before),
                account.initial_balance
            );
        }
    }

    /// Net worth over no accounts is zero.
    #[test]
    fn prop_empty_net_worth_is_zero(entries in entries(), day in 0i64..400) {
        let date = base_date() + chrono::Duration::days(day);
        prop_assert_eq!(
            BalanceReconstructor::net_worth_at_date(&[], &entries, date, &[], &converter()).unwrap(),
            Decimal::ZERO
        );
    }
}
