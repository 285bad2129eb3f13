//! Salary aggregation and statistics.
//!
//! This module turns flat lists of salary records into the per-year
//! summaries, job title rankings and headline totals the dashboard renders.

use crate::models::{DashboardTotals, JobTitleCount, SalaryRecord, YearSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Running totals for one work year.
#[derive(Debug, Clone, Copy, Default)]
struct YearAccumulator {
    job_count: usize,
    total_salary: f64,
}

impl YearAccumulator {
    fn add(&mut self, salary_in_usd: f64) {
        self.job_count += 1;
        self.total_salary += salary_in_usd;
    }
}

/// Round half up, so `x.5` always goes towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Aggregate records into one summary per work year.
///
/// Years come out in the order they were first seen; callers that need a
/// particular order sort with [`sort_summaries`].
pub fn aggregate_by_year(records: &[SalaryRecord]) -> Vec<YearSummary> {
    let mut order: Vec<i32> = Vec::new();
    let mut buckets: HashMap<i32, YearAccumulator> = HashMap::new();

    for record in records {
        buckets
            .entry(record.work_year)
            .or_insert_with(|| {
                order.push(record.work_year);
                YearAccumulator::default()
            })
            .add(record.salary_in_usd);
    }

    order
        .into_iter()
        .filter_map(|year| buckets.get(&year).map(|acc| (year, *acc)))
        .map(|(work_year, acc)| YearSummary {
            work_year,
            job_count: acc.job_count,
            total_salary: acc.total_salary,
            // Buckets only exist with at least one record in them
            avg_salary: round_half_up(acc.total_salary / acc.job_count as f64),
        })
        .collect()
}

/// Count records per job title, most common first.
///
/// Titles are compared exactly. Ties keep the order in which the titles
/// first appeared.
pub fn rank_job_titles(records: &[SalaryRecord]) -> Vec<JobTitleCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<JobTitleCount> = Vec::new();

    for record in records {
        match index.get(record.job_title.as_str()) {
            Some(&i) => ranked[i].job_count += 1,
            None => {
                index.insert(record.job_title.as_str(), ranked.len());
                ranked.push(JobTitleCount {
                    job_title: record.job_title.clone(),
                    job_count: 1,
                });
            }
        }
    }

    // sort_by_key is stable
    ranked.sort_by_key(|entry| std::cmp::Reverse(entry.job_count));
    ranked
}

/// Compute the headline card values from the yearly summaries.
///
/// The average salary is the average of the yearly averages, which is
/// undefined without any year, so it is `None` for an empty input.
pub fn dashboard_totals(summaries: &[YearSummary]) -> DashboardTotals {
    let total_jobs = summaries.iter().map(|s| s.job_count).sum();
    let years_of_data = summaries.len();

    let average_salary = if years_of_data == 0 {
        None
    } else {
        let sum: i64 = summaries.iter().map(|s| s.avg_salary).sum();
        Some(round_half_up(sum as f64 / years_of_data as f64))
    };

    DashboardTotals {
        total_jobs,
        average_salary,
        years_of_data,
    }
}

/// Column of the yearly table to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortColumn {
    #[default]
    Year,
    Jobs,
    AvgSalary,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Stable sort of the yearly table by one column.
pub fn sort_summaries(summaries: &mut [YearSummary], column: SortColumn, order: SortOrder) {
    summaries.sort_by(|a, b| {
        let ordering = match column {
            SortColumn::Year => a.work_year.cmp(&b.work_year),
            SortColumn::Jobs => a.job_count.cmp(&b.job_count),
            SortColumn::AvgSalary => a.avg_salary.cmp(&b.avg_salary),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// One page of a longer listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number actually shown.
    pub number: usize,
    pub total_pages: usize,
}

/// Slice out a 1-based page.
///
/// Out-of-range page numbers are clamped to the last page; an empty input
/// gives a single empty page.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let number = page.clamp(1, total_pages);

    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages,
    }
}

/// Years ascending with their average salary, for the trend view.
pub fn salary_trend(summaries: &[YearSummary]) -> Vec<(i32, i64)> {
    let mut points: Vec<(i32, i64)> = summaries
        .iter()
        .map(|s| (s.work_year, s.avg_salary))
        .collect();
    points.sort_by_key(|(year, _)| *year);
    points
}
