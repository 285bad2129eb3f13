//! Dashboard state and its transitions.
//!
//! The state is an immutable value. Every trigger (initial load, year
//! selection, chat message) becomes an [`Event`] and [`DashboardState::apply`]
//! returns the next state.

use crate::analysis::{aggregate_by_year, dashboard_totals, rank_job_titles};
use crate::models::{ChatMessage, DashboardTotals, JobTitleCount, SalaryRecord, YearSummary};
use serde::Serialize;
use tracing::debug;

/// Identifies one drill-down request.
///
/// Sequence numbers are handed out in increasing order, so only the ticket
/// of the most recent request is ever pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrillDownTicket {
    pub year: i32,
    pub seq: u64,
}

/// Job titles shown for the selected year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDown {
    pub year: i32,
    pub titles: Vec<JobTitleCount>,
}

/// Things that can happen to the dashboard.
#[derive(Debug, Clone)]
pub enum Event {
    SummaryRequested,
    SummaryLoaded(Vec<SalaryRecord>),
    SummaryFailed,
    DrillDownRequested(DrillDownTicket),
    DrillDownLoaded {
        ticket: DrillDownTicket,
        records: Vec<SalaryRecord>,
    },
    DrillDownFailed(DrillDownTicket),
    DrillDownClosed,
    ChatUpdated(Vec<ChatMessage>),
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    #[serde(skip)]
    pub records: Vec<SalaryRecord>,
    pub summaries: Vec<YearSummary>,
    pub totals: DashboardTotals,
    pub loading: bool,
    pub drill_down: Option<DrillDown>,
    #[serde(skip)]
    pub pending: Option<DrillDownTicket>,
    pub chat: Vec<ChatMessage>,
}

impl DashboardState {
    /// Returns the state after `event`.
    pub fn apply(self, event: Event) -> Self {
        match event {
            Event::SummaryRequested => Self {
                loading: true,
                ..self
            },
            Event::SummaryLoaded(records) => {
                let summaries = aggregate_by_year(&records);
                let totals = dashboard_totals(&summaries);
                Self {
                    records,
                    summaries,
                    totals,
                    loading: false,
                    ..self
                }
            }
            Event::SummaryFailed => Self {
                records: Vec::new(),
                summaries: Vec::new(),
                totals: DashboardTotals::default(),
                loading: false,
                ..self
            },
            Event::DrillDownRequested(ticket) => Self {
                pending: Some(ticket),
                ..self
            },
            Event::DrillDownLoaded { ticket, records } => {
                if self.pending != Some(ticket) {
                    debug!(
                        "Discarding stale drill-down for {} (seq {})",
                        ticket.year, ticket.seq
                    );
                    return self;
                }
                Self {
                    drill_down: Some(DrillDown {
                        year: ticket.year,
                        titles: rank_job_titles(&records),
                    }),
                    pending: None,
                    ..self
                }
            }
            Event::DrillDownFailed(ticket) => {
                if self.pending != Some(ticket) {
                    return self;
                }
                Self {
                    pending: None,
                    ..self
                }
            }
            Event::DrillDownClosed => Self {
                drill_down: None,
                ..self
            },
            Event::ChatUpdated(chat) => Self { chat, ..self },
        }
    }

    /// Year currently shown in the drill-down, if any.
    pub fn selected_year(&self) -> Option<i32> {
        self.drill_down.as_ref().map(|d| d.year)
    }
}
