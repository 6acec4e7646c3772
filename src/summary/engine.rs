use serde::Serialize;
use time::Date;

use crate::categories::Category;
use crate::error::ApiError;
use crate::transactions::repo_types::{Transaction, TxKind};

/// Spend aggregated under one category key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub emoji: String,
    pub total: f64,
}

/// The single largest expense in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighestExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: Date,
}

/// Savings-goal progress for a caller-supplied goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal: f64,
    pub current_savings: f64,
    pub percent: f64,
    pub achieved: bool,
}

/// Every derived view over one ledger snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
    pub total_savings: f64,
    pub transaction_count: usize,
    /// Net amount per calendar month, Jan..Dec, years folded together.
    pub monthly_net: [f64; 12],
    /// Expense spend per category, largest first.
    pub category_totals: Vec<CategoryTotal>,
    pub highest_expense: Option<HighestExpense>,
}

fn signed(tx: &Transaction) -> f64 {
    match tx.kind {
        TxKind::Income => tx.amount,
        TxKind::Expense => -tx.amount,
    }
}

/// Compute every summary view in one pass over the snapshot.
///
/// Pure: the same snapshot always yields the same summary, and nothing is
/// cached between calls.
pub fn summarize(transactions: &[Transaction]) -> LedgerSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut monthly_net = [0.0; 12];
    let mut category_totals: std::collections::BTreeMap<(String, String), f64> =
        std::collections::BTreeMap::new();
    let mut highest_expense: Option<HighestExpense> = None;

    for tx in transactions {
        match tx.kind {
            TxKind::Income => total_income += tx.amount,
            TxKind::Expense => total_expense += tx.amount,
        }

        let month = u8::from(tx.date.month()) as usize - 1;
        monthly_net[month] += signed(tx);

        if tx.kind == TxKind::Expense {
            *category_totals
                .entry((tx.category_name.clone(), tx.category_emoji.clone()))
                .or_insert(0.0) += tx.amount;

            // Largest amount wins; equal amounts go to the earlier date.
            let beats = match &highest_expense {
                None => true,
                Some(current) => {
                    tx.amount > current.amount
                        || (tx.amount == current.amount && tx.date < current.date)
                }
            };
            if beats {
                highest_expense = Some(HighestExpense {
                    description: tx.description.clone(),
                    amount: tx.amount,
                    category: Category {
                        name: tx.category_name.clone(),
                        emoji: tx.category_emoji.clone(),
                    },
                    date: tx.date,
                });
            }
        }
    }

    let mut category_totals: Vec<CategoryTotal> = category_totals
        .into_iter()
        .map(|((name, emoji), total)| CategoryTotal { name, emoji, total })
        .collect();
    category_totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    LedgerSummary {
        balance: total_income - total_expense,
        total_income,
        total_expense,
        total_savings: total_income - total_expense,
        transaction_count: transactions.len(),
        monthly_net,
        category_totals,
        highest_expense,
    }
}

/// Progress toward a savings goal. The goal itself lives on the client; the
/// server only checks it and does the arithmetic.
pub fn goal_progress(goal: f64, total_savings: f64) -> Result<GoalProgress, ApiError> {
    if !goal.is_finite() || goal <= 0.0 {
        return Err(ApiError::Validation(
            "Please enter a valid goal amount".into(),
        ));
    }

    let current_savings = total_savings.max(0.0);
    let percent = (current_savings / goal * 100.0).min(100.0);
    Ok(GoalProgress {
        goal,
        current_savings,
        percent,
        achieved: percent >= 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn tx(description: &str, amount: f64, kind: TxKind, date: Date, category: (&str, &str)) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            description: description.into(),
            amount,
            kind,
            category_name: category.0.into(),
            category_emoji: category.1.into(),
            date,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_snapshot_yields_zeroes() {
        let summary = summarize(&[]);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.total_savings, 0.0);
        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.monthly_net, [0.0; 12]);
        assert!(summary.category_totals.is_empty());
        assert!(summary.highest_expense.is_none());
    }

    #[test]
    fn coffee_and_salary_scenario() {
        let snapshot = vec![
            tx("Coffee", 50.0, TxKind::Expense, date!(2024 - 03 - 05), ("Food", "🍔")),
            tx("Salary", 1000.0, TxKind::Income, date!(2024 - 03 - 01), ("Salary", "💰")),
        ];
        let summary = summarize(&snapshot);

        assert_eq!(summary.balance, 950.0);
        assert_eq!(summary.total_savings, 950.0);
        assert_eq!(summary.monthly_net[2], 950.0);
        assert_eq!(summary.transaction_count, 2);

        let highest = summary.highest_expense.expect("one expense present");
        assert_eq!(highest.category, Category::new("Food", "🍔"));
        assert_eq!(highest.amount, 50.0);
    }

    #[test]
    fn balance_equals_savings_and_monthly_sum() {
        let snapshot = vec![
            tx("Salary", 1200.0, TxKind::Income, date!(2023 - 01 - 15), ("Salary", "💰")),
            tx("Rent", 700.0, TxKind::Expense, date!(2023 - 01 - 31), ("Bills", "💡")),
            tx("Groceries", 80.5, TxKind::Expense, date!(2023 - 06 - 02), ("Food", "🍔")),
            tx("Bonus", 300.0, TxKind::Income, date!(2024 - 06 - 20), ("Salary", "💰")),
            tx("Flight", 250.0, TxKind::Expense, date!(2024 - 12 - 24), ("Travel", "✈️")),
        ];
        let summary = summarize(&snapshot);

        assert_eq!(summary.balance, summary.total_savings);
        let bucket_sum: f64 = summary.monthly_net.iter().sum();
        assert!((summary.balance - bucket_sum).abs() < 1e-9);
    }

    #[test]
    fn months_fold_across_years() {
        let snapshot = vec![
            tx("Bonus 2023", 100.0, TxKind::Income, date!(2023 - 06 - 10), ("Salary", "💰")),
            tx("Bonus 2024", 40.0, TxKind::Income, date!(2024 - 06 - 11), ("Salary", "💰")),
        ];
        let summary = summarize(&snapshot);
        assert_eq!(summary.monthly_net[5], 140.0);
    }

    #[test]
    fn category_totals_cover_expenses_only() {
        let snapshot = vec![
            tx("Salary", 1000.0, TxKind::Income, date!(2024 - 03 - 01), ("Salary", "💰")),
            tx("Dinner", 60.0, TxKind::Expense, date!(2024 - 03 - 02), ("Food", "🍔")),
            tx("Lunch", 40.0, TxKind::Expense, date!(2024 - 03 - 03), ("Food", "🍔")),
            tx("Bus", 10.0, TxKind::Expense, date!(2024 - 03 - 04), ("Transport", "🚗")),
        ];
        let summary = summarize(&snapshot);

        assert_eq!(
            summary.category_totals,
            vec![
                CategoryTotal { name: "Food".into(), emoji: "🍔".into(), total: 100.0 },
                CategoryTotal { name: "Transport".into(), emoji: "🚗".into(), total: 10.0 },
            ]
        );
    }

    #[test]
    fn category_total_ties_order_by_name() {
        let snapshot = vec![
            tx("Bus", 25.0, TxKind::Expense, date!(2024 - 03 - 04), ("Transport", "🚗")),
            tx("Lunch", 25.0, TxKind::Expense, date!(2024 - 03 - 03), ("Food", "🍔")),
        ];
        let summary = summarize(&snapshot);
        assert_eq!(summary.category_totals[0].name, "Food");
        assert_eq!(summary.category_totals[1].name, "Transport");
    }

    #[test]
    fn highest_expense_ties_break_on_earlier_date() {
        let snapshot = vec![
            tx("Later", 75.0, TxKind::Expense, date!(2024 - 05 - 20), ("Shopping", "🛍️")),
            tx("Earlier", 75.0, TxKind::Expense, date!(2024 - 02 - 01), ("Bills", "💡")),
        ];
        let summary = summarize(&snapshot);
        let highest = summary.highest_expense.expect("expenses present");
        assert_eq!(highest.description, "Earlier");
        assert_eq!(highest.date, date!(2024 - 02 - 01));
    }

    #[test]
    fn no_expenses_means_no_highest() {
        let snapshot = vec![tx(
            "Salary",
            1000.0,
            TxKind::Income,
            date!(2024 - 03 - 01),
            ("Salary", "💰"),
        )];
        assert!(summarize(&snapshot).highest_expense.is_none());
    }

    #[test]
    fn summarize_is_deterministic() {
        let snapshot = vec![
            tx("Coffee", 50.0, TxKind::Expense, date!(2024 - 03 - 05), ("Food", "🍔")),
            tx("Salary", 1000.0, TxKind::Income, date!(2024 - 03 - 01), ("Salary", "💰")),
        ];
        assert_eq!(summarize(&snapshot), summarize(&snapshot));
    }

    #[test]
    fn goal_progress_caps_at_hundred() {
        let progress = goal_progress(500.0, 950.0).expect("valid goal");
        assert_eq!(progress.percent, 100.0);
        assert!(progress.achieved);
        assert_eq!(progress.current_savings, 950.0);
    }

    #[test]
    fn goal_progress_partial() {
        let progress = goal_progress(1000.0, 250.0).expect("valid goal");
        assert_eq!(progress.percent, 25.0);
        assert!(!progress.achieved);
    }

    #[test]
    fn negative_savings_count_as_zero() {
        let progress = goal_progress(100.0, -40.0).expect("valid goal");
        assert_eq!(progress.current_savings, 0.0);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn non_positive_goal_is_rejected() {
        assert!(matches!(
            goal_progress(0.0, 100.0).unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            goal_progress(-5.0, 100.0).unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            goal_progress(f64::NAN, 100.0).unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
