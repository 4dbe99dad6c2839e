//! The summary cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    dashboard::summary::Summary,
    html::{CARD_STYLE, format_currency, format_currency_rounded},
};

/// One summary card: a label, a currency amount, and an indicator glyph.
fn summary_card(
    label: &str,
    amount: f64,
    sub_label: Option<String>,
    glyph: &str,
    glyph_style: &str,
) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            div class="flex items-center justify-between" {
                div {
                    p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
                    // Rounded for the big figure; the tooltip has the cents.
                    h3
                        class="text-2xl font-bold"
                        title=(format_currency(amount))
                    {
                        (format_currency_rounded(amount))
                    }

                    @if let Some(sub_label) = sub_label {
                        p class="text-xs text-gray-600 dark:text-gray-400" { (sub_label) }
                    }
                }

                div class=(format!(
                    "w-10 h-10 rounded-full flex items-center justify-center {glyph_style}"
                )) {
                    span aria-hidden="true" { (glyph) }
                }
            }
        }
    }
}

/// Renders the four summary cards: income, expenses, budget, and savings.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    html! {
        section class="w-full mx-auto mb-8" {
            div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4" {
                (summary_card(
                    "Total Income",
                    summary.total_income,
                    None,
                    "↑",
                    "bg-green-100 text-green-700 dark:bg-green-900/40 dark:text-green-300",
                ))
                (summary_card(
                    "Total Expenses",
                    summary.total_expenses,
                    None,
                    "↓",
                    "bg-red-100 text-red-700 dark:bg-red-900/40 dark:text-red-300",
                ))
                (summary_card(
                    "Monthly Budget",
                    summary.active_budget_amount,
                    None,
                    "₹",
                    "bg-amber-100 text-amber-700 dark:bg-amber-900/40 dark:text-amber-300",
                ))
                (summary_card(
                    "Total Savings",
                    summary.total_savings,
                    Some(format!(
                        "Goal: {}",
                        format_currency_rounded(summary.savings_goal_target)
                    )),
                    "◎",
                    "bg-blue-100 text-blue-700 dark:bg-blue-900/40 dark:text-blue-300",
                ))
            }
        }
    }
}

#[cfg(test)]
mod card_tests {
    use crate::dashboard::summary::Summary;

    use super::summary_cards_view;

    #[test]
    fn renders_all_four_totals() {
        let summary = Summary {
            total_income: 45_000.0,
            total_expenses: 32_450.0,
            active_budget_amount: 40_000.0,
            total_savings: 12_550.0,
            savings_goal_target: 20_000.0,
            expense_categories: vec![],
        };

        let html = summary_cards_view(&summary).into_string();

        assert!(html.contains("Total Income"));
        assert!(html.contains("₹45,000"));
        assert!(html.contains("Total Expenses"));
        assert!(html.contains("₹32,450"));
        assert!(html.contains("Monthly Budget"));
        assert!(html.contains("₹40,000"));
        assert!(html.contains("Total Savings"));
        assert!(html.contains("₹12,550"));
        // Exact amounts are kept in the tooltips.
        assert!(html.contains("₹32,450.00"));
        // The savings card shows the goal target underneath.
        assert!(html.contains("Goal: ₹20,000"));
    }
}
