//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations from the derived
//! summary:
//! - **Income vs Expenses**: a donut comparing the two totals
//! - **Top Expense Categories**: a bar chart of the five largest categories
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{dashboard::summary::Summary, html::HeadElement};

/// How many expense categories the bar chart shows.
const TOP_CATEGORY_COUNT: usize = 5;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Creates the array of dashboard charts from the derived summary.
pub(super) fn build_dashboard_charts(summary: &Summary) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "income-expenses-chart",
            options: income_vs_expenses_chart(summary).to_string(),
        },
        DashboardChart {
            id: "top-categories-chart",
            options: top_categories_chart(summary).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn income_vs_expenses_chart(summary: &Summary) -> Chart {
    Chart::new()
        .title(Title::new().text("Income vs Expenses"))
        .tooltip(Tooltip::new().value_formatter(currency_formatter()))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Income vs Expenses")
                .radius(vec!["45%", "70%"])
                .data(vec![
                    (summary.total_income, "Income"),
                    (summary.total_expenses, "Expenses"),
                ]),
        )
}

pub(super) fn top_categories_chart(summary: &Summary) -> Chart {
    let top_categories: Vec<_> = summary
        .expense_categories
        .iter()
        .take(TOP_CATEGORY_COUNT)
        .collect();

    let labels: Vec<String> = top_categories
        .iter()
        .map(|entry| entry.category.clone())
        .collect();
    let values: Vec<f64> = top_categories.iter().map(|entry| entry.amount).collect();

    Chart::new()
        .title(Title::new().text("Top 5 Expense Categories"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Expenses").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
