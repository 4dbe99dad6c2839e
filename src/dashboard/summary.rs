//! Derivation of the dashboard summary from raw backend collections.
//!
//! Everything in this module is pure: the handlers fetch the collections,
//! this module folds them into a [Summary], and the view code renders it.
//! The summary is recomputed from scratch on every refresh, nothing is
//! cached between requests.

use std::{cmp::Reverse, collections::HashMap};

use time::OffsetDateTime;

use crate::api::{Account, Budget, SavingsGoal, Transaction};

/// The total spent in one expense category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label as it appears on the transactions.
    pub category: String,
    /// The summed absolute amount spent in this category.
    pub amount: f64,
}

/// The derived financial overview shown on the dashboard.
///
/// All fields are recomputed fresh from the collections passed to
/// [compute_summary]; none of this is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The sum of all positive transaction amounts, or the sum of account
    /// balances when there is no transaction income yet.
    pub total_income: f64,
    /// The absolute sum of all negative transaction amounts. Never negative.
    pub total_expenses: f64,
    /// The amount of the most recently created budget, or zero when no
    /// budget has been set.
    pub active_budget_amount: f64,
    /// The sum of `current_amount` across all savings goals.
    pub total_savings: f64,
    /// The sum of `target_amount` across all savings goals, or the
    /// configured default target when that sum is zero.
    pub savings_goal_target: f64,
    /// Expense totals per category, ordered largest first. Ties keep the
    /// order in which the categories first appear in the transaction list.
    pub expense_categories: Vec<CategoryTotal>,
}

/// Derive the dashboard [Summary] from the four backend collections.
///
/// Tolerates empty input for every collection and produces a zero-filled
/// summary in that case. Performs no validation of amount signs against
/// category semantics.
///
/// `default_goal_target` is substituted for the savings goal target when no
/// goal defines one (see [crate::AppState::default_savings_target]).
pub fn compute_summary(
    accounts: &[Account],
    budgets: &[Budget],
    transactions: &[Transaction],
    savings_goals: &[SavingsGoal],
    default_goal_target: f64,
) -> Summary {
    let mut total_income: f64 = transactions
        .iter()
        .filter(|transaction| transaction.amount > 0.0)
        .map(|transaction| transaction.amount)
        .sum();

    // Before any income is recorded, seed the income figure from the linked
    // account balances. This is a one-time fallback, never a blend: any
    // transaction income at all and the balances are ignored entirely.
    if total_income == 0.0 && !accounts.is_empty() {
        total_income = accounts.iter().map(|account| account.current_balance).sum();
    }

    let total_expenses: f64 = transactions
        .iter()
        .filter(|transaction| transaction.amount < 0.0)
        .map(|transaction| transaction.amount)
        .sum::<f64>()
        .abs();

    let total_savings = savings_goals.iter().map(|goal| goal.current_amount).sum();

    let summed_target: f64 = savings_goals.iter().map(|goal| goal.target_amount).sum();
    let savings_goal_target = if summed_target == 0.0 {
        default_goal_target
    } else {
        summed_target
    };

    Summary {
        total_income,
        total_expenses,
        active_budget_amount: active_budget_amount(budgets),
        total_savings,
        savings_goal_target,
        expense_categories: expense_category_totals(transactions),
    }
}

/// The amount of the most recently created budget record.
///
/// Records without a creation timestamp sort as oldest. When two records
/// share a timestamp, the one listed first by the backend wins.
fn active_budget_amount(budgets: &[Budget]) -> f64 {
    let mut sorted: Vec<&Budget> = budgets.iter().collect();
    sorted.sort_by_key(|budget| {
        Reverse(budget.created_at.unwrap_or(OffsetDateTime::UNIX_EPOCH))
    });

    sorted
        .first()
        .map(|budget| budget.monthly_budget)
        .unwrap_or(0.0)
}

/// Group expense transactions by category, summing absolute amounts, and
/// order the groups largest first.
///
/// The sort is stable, so categories with equal totals keep the order in
/// which they first appeared in `transactions`.
fn expense_category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.amount < 0.0) {
        match index_by_category.get(transaction.category.as_str()) {
            Some(&index) => totals[index].amount += transaction.amount.abs(),
            None => {
                index_by_category.insert(&transaction.category, totals.len());
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    amount: transaction.amount.abs(),
                });
            }
        }
    }

    totals.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    totals
}

/// The percentage of the active budget consumed by expenses, rounded and
/// capped at 100.
///
/// Returns `NaN` when there is no active budget (zero amount), so that no
/// threshold comparison against the result can succeed. Display code must
/// guard with [f64::is_nan]; in particular a non-finite percentage
/// suppresses the budget warning banner.
pub fn budget_percent_used(total_expenses: f64, active_budget_amount: f64) -> f64 {
    if active_budget_amount == 0.0 {
        return f64::NAN;
    }

    (total_expenses / active_budget_amount * 100.0)
        .min(100.0)
        .round()
}

#[cfg(test)]
mod summary_tests {
    use time::macros::datetime;

    use crate::api::{Account, Budget, SavingsGoal, Transaction};

    use super::{CategoryTotal, budget_percent_used, compute_summary};

    const DEFAULT_GOAL_TARGET: f64 = 20_000.0;

    fn create_test_transaction(amount: f64, category: &str) -> Transaction {
        Transaction {
            transaction_id: 0,
            amount,
            category: category.to_owned(),
            description: String::new(),
            date: datetime!(2024-05-01 00:00:00).assume_utc(),
            payment_method: "Cash".to_owned(),
        }
    }

    fn create_test_account(current_balance: f64) -> Account {
        Account {
            account_id: 0,
            account_number: "1234".to_owned(),
            current_balance,
            created_at: None,
        }
    }

    fn create_test_budget(monthly_budget: f64, created_at: Option<&str>) -> Budget {
        Budget {
            budget_id: 0,
            monthly_budget,
            start_date: None,
            end_date: None,
            created_at: created_at
                .map(|value| crate::api::timestamp::parse(value).expect("invalid test timestamp")),
        }
    }

    fn create_test_goal(target_amount: f64, current_amount: f64) -> SavingsGoal {
        SavingsGoal {
            goal_id: 0,
            goal_name: "Test goal".to_owned(),
            target_amount,
            current_amount,
            deadline: None,
        }
    }

    #[test]
    fn empty_inputs_produce_zero_filled_summary() {
        let summary = compute_summary(&[], &[], &[], &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.active_budget_amount, 0.0);
        assert_eq!(summary.total_savings, 0.0);
        assert_eq!(summary.savings_goal_target, DEFAULT_GOAL_TARGET);
        assert!(summary.expense_categories.is_empty());
    }

    #[test]
    fn income_sums_positive_amounts_only() {
        let transactions = vec![
            create_test_transaction(1000.0, "Salary"),
            create_test_transaction(-200.0, "Food"),
            create_test_transaction(500.0, "Investment"),
        ];

        let summary = compute_summary(&[], &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_income, 1500.0);
    }

    #[test]
    fn income_falls_back_to_account_balances_when_no_positive_transactions() {
        let accounts = vec![create_test_account(3000.0), create_test_account(2000.0)];
        let transactions = vec![
            create_test_transaction(-200.0, "Food"),
            create_test_transaction(-50.0, "Transport"),
        ];

        let summary = compute_summary(&accounts, &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_income, 5000.0);
    }

    #[test]
    fn income_ignores_account_balances_when_any_positive_transaction_exists() {
        let accounts = vec![create_test_account(99_999.0)];
        let transactions = vec![create_test_transaction(0.01, "Salary")];

        let summary = compute_summary(&accounts, &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_income, 0.01);
    }

    #[test]
    fn income_is_zero_with_no_accounts_and_no_income() {
        let transactions = vec![create_test_transaction(-200.0, "Food")];

        let summary = compute_summary(&[], &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_income, 0.0);
    }

    #[test]
    fn expenses_are_never_negative() {
        let transactions = vec![
            create_test_transaction(-200.0, "Food"),
            create_test_transaction(-300.0, "Transport"),
            create_test_transaction(100.0, "Salary"),
        ];

        let summary = compute_summary(&[], &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_expenses, 500.0);
    }

    #[test]
    fn latest_created_budget_wins() {
        let budgets = vec![
            create_test_budget(100.0, Some("2024-01-01T00:00:00")),
            create_test_budget(200.0, Some("2024-03-01T00:00:00")),
        ];

        let summary = compute_summary(&[], &budgets, &[], &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.active_budget_amount, 200.0);
    }

    #[test]
    fn budget_without_timestamp_sorts_as_oldest() {
        let budgets = vec![
            create_test_budget(999.0, None),
            create_test_budget(200.0, Some("2024-03-01T00:00:00")),
        ];

        let summary = compute_summary(&[], &budgets, &[], &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.active_budget_amount, 200.0);
    }

    #[test]
    fn first_listed_budget_wins_on_equal_timestamps() {
        let budgets = vec![
            create_test_budget(100.0, Some("2024-03-01T00:00:00")),
            create_test_budget(200.0, Some("2024-03-01T00:00:00")),
        ];

        let summary = compute_summary(&[], &budgets, &[], &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.active_budget_amount, 100.0);
    }

    #[test]
    fn savings_totals_sum_across_goals() {
        let goals = vec![create_test_goal(10_000.0, 2500.0), create_test_goal(5000.0, 1000.0)];

        let summary = compute_summary(&[], &[], &[], &goals, DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_savings, 3500.0);
        assert_eq!(summary.savings_goal_target, 15_000.0);
    }

    #[test]
    fn zero_goal_target_substitutes_default() {
        let goals = vec![create_test_goal(0.0, 750.0)];

        let summary = compute_summary(&[], &[], &[], &goals, DEFAULT_GOAL_TARGET);

        assert_eq!(summary.total_savings, 750.0);
        assert_eq!(summary.savings_goal_target, DEFAULT_GOAL_TARGET);
    }

    #[test]
    fn expense_categories_accumulate_and_sort_descending() {
        let transactions = vec![
            create_test_transaction(-50.0, "Food"),
            create_test_transaction(-30.0, "Food"),
            create_test_transaction(-20.0, "Transport"),
        ];

        let summary = compute_summary(&[], &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(
            summary.expense_categories,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    amount: 80.0
                },
                CategoryTotal {
                    category: "Transport".to_owned(),
                    amount: 20.0
                },
            ]
        );
    }

    #[test]
    fn expense_category_ties_keep_first_seen_order() {
        let transactions = vec![
            create_test_transaction(-20.0, "Zebra"),
            create_test_transaction(-20.0, "Alpha"),
        ];

        let summary = compute_summary(&[], &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.expense_categories[0].category, "Zebra");
        assert_eq!(summary.expense_categories[1].category, "Alpha");
    }

    #[test]
    fn income_transactions_do_not_appear_in_expense_categories() {
        let transactions = vec![
            create_test_transaction(1000.0, "Salary"),
            create_test_transaction(-20.0, "Transport"),
        ];

        let summary = compute_summary(&[], &[], &transactions, &[], DEFAULT_GOAL_TARGET);

        assert_eq!(summary.expense_categories.len(), 1);
        assert_eq!(summary.expense_categories[0].category, "Transport");
    }

    #[test]
    fn summary_is_deterministic_for_identical_inputs() {
        let accounts = vec![create_test_account(3000.0)];
        let budgets = vec![create_test_budget(40_000.0, Some("2024-03-01T00:00:00"))];
        let transactions = vec![
            create_test_transaction(-12_000.0, "Housing"),
            create_test_transaction(-8000.0, "Food"),
            create_test_transaction(45_000.0, "Salary"),
        ];
        let goals = vec![create_test_goal(20_000.0, 12_550.0)];

        let first = compute_summary(&accounts, &budgets, &transactions, &goals, DEFAULT_GOAL_TARGET);
        let second = compute_summary(&accounts, &budgets, &transactions, &goals, DEFAULT_GOAL_TARGET);

        assert_eq!(first, second);
    }

    #[test]
    fn percent_used_rounds_and_caps_at_100() {
        assert_eq!(budget_percent_used(32_450.0, 40_000.0), 81.0);
        assert_eq!(budget_percent_used(50_000.0, 40_000.0), 100.0);
        assert_eq!(budget_percent_used(0.0, 40_000.0), 0.0);
    }

    #[test]
    fn percent_used_with_zero_budget_is_not_finite() {
        let percent = budget_percent_used(32_450.0, 0.0);

        assert!(percent.is_nan());
        // No threshold comparison against the result may succeed.
        assert!(!(percent >= 90.0));
        assert!(!(percent <= 90.0));

        assert!(budget_percent_used(0.0, 0.0).is_nan());
    }
}
