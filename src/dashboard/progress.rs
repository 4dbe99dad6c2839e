//! Budget progress meters and the budget warning banner.
//!
//! All thresholds here compare against the rounded percentage from
//! [crate::dashboard::summary::budget_percent_used]. When no budget is set
//! that percentage is `NaN`: every threshold comparison fails, the meters
//! render an em-dash, and the warning banner is suppressed.

use maud::{Markup, html};

use crate::{
    dashboard::summary::Summary,
    html::{CARD_STYLE, format_currency},
};

/// Usage at or above this percentage triggers the warning banner.
const WARNING_THRESHOLD: f64 = 90.0;

/// The bar color for a given usage percentage.
fn meter_color_class(percent_used: f64) -> &'static str {
    if percent_used > 90.0 {
        "bg-red-600"
    } else if percent_used > 75.0 {
        "bg-amber-500"
    } else {
        "bg-blue-600"
    }
}

/// The status line under the meters.
fn status_message(percent_used: f64) -> &'static str {
    if percent_used > 90.0 {
        "You've almost reached your budget limit!"
    } else if percent_used > 75.0 {
        "You're approaching your budget limit."
    } else {
        "You're managing your budget well."
    }
}

/// The "N% used" label, or an em-dash when no budget is set.
fn percent_label(percent_used: f64) -> String {
    if percent_used.is_nan() {
        "—".to_owned()
    } else {
        format!("{percent_used:.0}% used")
    }
}

/// A horizontal meter showing how much of the budget has been spent.
fn usage_meter(percent_used: f64) -> Markup {
    // NaN (no budget set) renders an empty track.
    let width = if percent_used.is_nan() {
        0.0
    } else {
        percent_used.clamp(0.0, 100.0)
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5"
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if width > 0.0 {
                div
                    class=(format!("{} h-2.5 rounded-full transition-all", meter_color_class(percent_used)))
                    style=(format!("width: {width:.1}%"))
                {}
            }
        }
    }
}

/// The banner shown when budget usage crosses [WARNING_THRESHOLD].
///
/// Returns `None` when usage is below the threshold or when no budget is set
/// (a non-finite percentage must never trigger the warning).
pub(super) fn budget_warning_banner(percent_used: f64) -> Option<Markup> {
    if percent_used.is_nan() || percent_used < WARNING_THRESHOLD {
        return None;
    }

    Some(html! {
        div
            class="w-full mb-4 p-4 rounded-lg border border-red-300 bg-red-50
                text-red-800 dark:border-red-800 dark:bg-gray-800 dark:text-red-400"
            role="alert"
        {
            p class="font-medium" { "Budget Warning" }
            p class="text-sm" {
                "You've used " (format!("{percent_used:.0}")) "% of your budget. \
                Consider reducing spending."
            }
        }
    })
}

/// The "Monthly Budget Progress" card with spent/budget figures and a meter.
pub(super) fn budget_progress_card(summary: &Summary, percent_used: f64) -> Markup {
    html! {
        section class=(CARD_STYLE) {
            h2 class="text-lg font-semibold mb-4" { "Monthly Budget Progress" }

            div class="flex justify-between mb-2" {
                span class="text-sm text-gray-600 dark:text-gray-400" {
                    "Spent: " (format_currency(summary.total_expenses))
                }
                span class="text-sm text-gray-600 dark:text-gray-400" {
                    "Budget: " (format_currency(summary.active_budget_amount))
                }
            }

            (usage_meter(percent_used))

            div class="mt-2 text-sm text-right" {
                span class="font-medium" { (percent_label(percent_used)) }
            }

            div class="pt-4 border-t border-gray-200 dark:border-gray-700" {
                p class="text-sm text-gray-600 dark:text-gray-400" {
                    @if percent_used.is_nan() {
                        "Set a budget to start tracking your spending."
                    } @else {
                        (status_message(percent_used))
                    }
                }
            }
        }
    }
}

/// The "Budget Analysis" card: budget vs spent, remaining amount, and a hint.
///
/// Only rendered when a budget has been set.
pub(super) fn budget_analysis_card(summary: &Summary, percent_used: f64) -> Option<Markup> {
    if summary.active_budget_amount <= 0.0 {
        return None;
    }

    let remaining = summary.active_budget_amount - summary.total_expenses;
    let remaining_style = if remaining < 0.0 {
        "font-medium text-red-600 dark:text-red-400"
    } else {
        "font-medium text-green-600 dark:text-green-400"
    };
    let hint = if remaining < 0.0 {
        format!(
            "You've exceeded your budget by {}",
            format_currency(remaining.abs())
        )
    } else if percent_used > 80.0 {
        "You're close to your budget limit".to_owned()
    } else if percent_used > 60.0 {
        "You're on track with your budget".to_owned()
    } else {
        "You're well within your budget".to_owned()
    };

    Some(html! {
        section class=(CARD_STYLE) {
            h2 class="text-lg font-semibold mb-4" { "Budget Analysis" }

            div class="grid grid-cols-2 gap-4 mb-4" {
                div class="text-center p-3 bg-gray-100 dark:bg-gray-700 rounded-lg" {
                    div class="text-2xl font-bold text-blue-600 dark:text-blue-400" {
                        (format_currency(summary.active_budget_amount))
                    }
                    div class="text-sm text-gray-600 dark:text-gray-400" { "Budget Set" }
                }
                div class="text-center p-3 bg-gray-100 dark:bg-gray-700 rounded-lg" {
                    div class="text-2xl font-bold text-red-600 dark:text-red-400" {
                        (format_currency(summary.total_expenses))
                    }
                    div class="text-sm text-gray-600 dark:text-gray-400" { "Spent" }
                }
            }

            (usage_meter(percent_used))

            div class="pt-4 mt-2 border-t border-gray-200 dark:border-gray-700" {
                div class="flex justify-between text-sm mb-2" {
                    span { "Remaining Budget" }
                    span class=(remaining_style) { (format_currency(remaining)) }
                }
                p class="text-xs text-gray-600 dark:text-gray-400" { (hint) }
            }
        }
    })
}
