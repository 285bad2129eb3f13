//! Dashboard rendering.
//!
//! This module renders the dashboard state as Markdown, plain text or JSON.
//! The yearly table honours the chosen sort; the trend is always year
//! ascending.

use crate::analysis::{paginate, salary_trend, sort_summaries, SortColumn, SortOrder};
use crate::dashboard::{DashboardState, DrillDown};
use crate::models::{ChatMessage, DashboardTotals, YearSummary};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Width of the longest bar in the trend view.
const TREND_WIDTH: usize = 40;

/// Rendering options for one dashboard snapshot.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub state: &'a DashboardState,
    pub sort: SortColumn,
    pub order: SortOrder,
    /// 1-based drill-down page.
    pub page: usize,
    pub page_size: usize,
    pub generated_at: DateTime<Utc>,
}

impl DashboardView<'_> {
    fn sorted_summaries(&self) -> Vec<YearSummary> {
        let mut summaries = self.state.summaries.clone();
        sort_summaries(&mut summaries, self.sort, self.order);
        summaries
    }
}

/// Format a whole-dollar amount as `$1,234,567`.
pub fn format_usd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Format a count with thousands separators.
pub fn format_count(count: usize) -> String {
    format_usd(count as i64).trim_start_matches('$').to_string()
}

fn format_average(totals: &DashboardTotals) -> String {
    totals
        .average_salary
        .map(format_usd)
        .unwrap_or_else(|| "n/a".to_string())
}

fn trend_bar(value: i64, max: i64) -> String {
    if max <= 0 || value <= 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * TREND_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

/// Generate the Markdown dashboard.
pub fn generate_markdown_report(view: &DashboardView<'_>) -> String {
    let mut output = String::new();

    output.push_str("# ML Engineer and Data Science Salaries\n\n");
    output.push_str(&format!(
        "*Generated {}*\n\n",
        view.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&generate_cards_section(&view.state.totals));
    output.push_str(&generate_trend_section(&view.state.summaries));
    output.push_str(&generate_yearly_table(&view.sorted_summaries()));

    if let Some(ref drill_down) = view.state.drill_down {
        output.push_str(&generate_drill_down_section(
            drill_down,
            view.page,
            view.page_size,
        ));
    }

    output.push_str(&generate_chat_section(&view.state.chat));

    output
}

/// Generate the summary cards.
fn generate_cards_section(totals: &DashboardTotals) -> String {
    let mut section = String::new();

    section.push_str("| Total Jobs | Average Salary | Years of Data |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | **{}** | **{}** |\n\n",
        format_count(totals.total_jobs),
        format_average(totals),
        totals.years_of_data
    ));

    section
}

/// Generate the average salary trend.
fn generate_trend_section(summaries: &[YearSummary]) -> String {
    let mut section = String::new();
    section.push_str("## Average Salary Trend\n\n");

    let points = salary_trend(summaries);
    if points.is_empty() {
        section.push_str("No salary data available.\n\n");
        return section;
    }

    let max = points.iter().map(|(_, avg)| *avg).max().unwrap_or(0);

    section.push_str("```\n");
    for (year, avg) in &points {
        section.push_str(&format!(
            "{} {:>12} {}\n",
            year,
            format_usd(*avg),
            trend_bar(*avg, max)
        ));
    }
    section.push_str("```\n\n");

    section
}

/// Generate the yearly salary table.
fn generate_yearly_table(summaries: &[YearSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Yearly Salary Data\n\n");
    if summaries.is_empty() {
        section.push_str("No salary data available.\n\n");
        return section;
    }

    section.push_str("| Year | Number of Jobs | Average Salary (USD) |\n");
    section.push_str("|:---|---:|---:|\n");
    for summary in summaries {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            summary.work_year,
            format_count(summary.job_count),
            format_usd(summary.avg_salary)
        ));
    }
    section.push('\n');

    section
}

/// Generate the job titles table of the selected year.
fn generate_drill_down_section(drill_down: &DrillDown, page: usize, page_size: usize) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Job Titles for {}\n\n", drill_down.year));

    if drill_down.titles.is_empty() {
        section.push_str("No jobs recorded for this year.\n\n");
        return section;
    }

    let page = paginate(&drill_down.titles, page, page_size);

    section.push_str("| Job Title | Number of Jobs |\n");
    section.push_str("|:---|---:|\n");
    for entry in page.items {
        section.push_str(&format!(
            "| {} | {} |\n",
            entry.job_title.replace('|', "\\|"),
            format_count(entry.job_count)
        ));
    }
    section.push_str(&format!(
        "\n*Page {} of {}*\n\n",
        page.number, page.total_pages
    ));

    section
}

/// Generate the chat transcript.
fn generate_chat_section(chat: &[ChatMessage]) -> String {
    if chat.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Chat\n\n");

    for message in chat {
        section.push_str(&format!("**{}:** {}\n\n", message.sender, message.text));
    }

    section
}

/// Generate the plain-text dashboard for terminals.
pub fn generate_text_report(view: &DashboardView<'_>) -> String {
    let mut output = String::new();
    let totals = &view.state.totals;

    output.push_str(&format!(
        "Total Jobs: {}   Average Salary: {}   Years of Data: {}\n\n",
        format_count(totals.total_jobs),
        format_average(totals),
        totals.years_of_data
    ));

    let summaries = view.sorted_summaries();
    if summaries.is_empty() {
        output.push_str("No salary data available.\n");
    } else {
        output.push_str(&format!("{:<6} {:>8} {:>14}\n", "Year", "Jobs", "Avg Salary"));
        for s in &summaries {
            output.push_str(&format!(
                "{:<6} {:>8} {:>14}\n",
                s.work_year,
                format_count(s.job_count),
                format_usd(s.avg_salary)
            ));
        }
    }

    if let Some(ref drill_down) = view.state.drill_down {
        let page = paginate(&drill_down.titles, view.page, view.page_size);
        output.push_str(&format!(
            "\nJob Titles for {} (page {}/{})\n",
            drill_down.year, page.number, page.total_pages
        ));
        for entry in page.items {
            output.push_str(&format!("  {:>5}  {}\n", entry.job_count, entry.job_title));
        }
    }

    if !view.state.chat.is_empty() {
        output.push('\n');
        for message in &view.state.chat {
            output.push_str(&format!("{}: {}\n", message.sender, message.text));
        }
    }

    output
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDashboard<'a> {
    generated_at: DateTime<Utc>,
    totals: &'a DashboardTotals,
    summaries: Vec<YearSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    drill_down: Option<&'a DrillDown>,
    #[serde(skip_serializing_if = "no_messages")]
    chat: &'a [ChatMessage],
}

fn no_messages(chat: &&[ChatMessage]) -> bool {
    chat.is_empty()
}

/// Generate a JSON dashboard.
pub fn generate_json_report(view: &DashboardView<'_>) -> Result<String> {
    let dashboard = JsonDashboard {
        generated_at: view.generated_at,
        totals: &view.state.totals,
        summaries: view.sorted_summaries(),
        drill_down: view.state.drill_down.as_ref(),
        chat: &view.state.chat,
    };
    serde_json::to_string_pretty(&dashboard).map_err(Into::into)
}
