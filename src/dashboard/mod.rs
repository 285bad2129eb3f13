//! Dashboard controller.
//!
//! Owns the API client, the chat relay and the current [`DashboardState`],
//! and turns each user action into reducer events.

pub mod state;

pub use state::{DashboardState, DrillDown, DrillDownTicket, Event};

use crate::chat::{ChatRelay, SendOutcome};
use crate::client::{ClientError, SalaryClient};
use crate::models::SalaryRecord;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// Drives the dashboard for one session.
pub struct Dashboard {
    client: SalaryClient,
    chat: ChatRelay,
    state: DashboardState,
    next_seq: u64,
    show_progress: bool,
}

impl Dashboard {
    pub fn new(client: SalaryClient, show_progress: bool) -> Self {
        Self {
            chat: ChatRelay::new(client.clone()),
            client,
            state: DashboardState::default(),
            next_seq: 0,
            show_progress,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }

    fn issue_ticket(&mut self, year: i32) -> DrillDownTicket {
        self.next_seq += 1;
        DrillDownTicket {
            year,
            seq: self.next_seq,
        }
    }

    fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Load the full dataset.
    ///
    /// A failed fetch is logged and leaves an empty dashboard.
    pub async fn load(&mut self) {
        self.dispatch(Event::SummaryRequested);
        let pb = self.spinner(format!("Loading salaries from {}", self.client.base_url()));

        let result = self.client.fetch_all().await;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        match result {
            Ok(records) => {
                info!("Loaded {} salary records", records.len());
                self.dispatch(Event::SummaryLoaded(records));
            }
            Err(e) => {
                warn!("Error fetching salary data: {}", e);
                self.dispatch(Event::SummaryFailed);
            }
        }
    }

    /// Show the job titles of one year.
    ///
    /// Returns `false` if the year's records could not be fetched.
    pub async fn drill_down(&mut self, year: i32) -> bool {
        let ticket = self.issue_ticket(year);
        self.dispatch(Event::DrillDownRequested(ticket));
        let pb = self.spinner(format!("Loading job titles for {year}"));

        let result = self.client.fetch_year(year).await;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        self.complete_drill_down(ticket, result)
    }

    /// Request several years at once.
    ///
    /// Fetches run concurrently and may finish in any order. Each response
    /// goes through the reducer as it arrives, and only the last requested
    /// year ends up displayed.
    pub async fn drill_down_all(&mut self, years: &[i32], concurrency: usize) -> Option<i32> {
        let tickets: Vec<DrillDownTicket> = years.iter().map(|&y| self.issue_ticket(y)).collect();
        for ticket in &tickets {
            self.dispatch(Event::DrillDownRequested(*ticket));
        }

        let pb = self.spinner(format!("Loading job titles for {} years", tickets.len()));

        let client = self.client.clone();
        let mut responses = stream::iter(tickets)
            .map(|ticket| {
                let client = client.clone();
                async move { (ticket, client.fetch_year(ticket.year).await) }
            })
            .buffer_unordered(concurrency.max(1));

        while let Some((ticket, result)) = responses.next().await {
            self.complete_drill_down(ticket, result);
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        self.state.selected_year()
    }

    fn complete_drill_down(
        &mut self,
        ticket: DrillDownTicket,
        result: Result<Vec<SalaryRecord>, ClientError>,
    ) -> bool {
        match result {
            Ok(records) => {
                info!("Loaded {} records for {}", records.len(), ticket.year);
                self.dispatch(Event::DrillDownLoaded { ticket, records });
                true
            }
            Err(e) => {
                warn!("Error fetching data for {}: {}", ticket.year, e);
                self.dispatch(Event::DrillDownFailed(ticket));
                false
            }
        }
    }

    /// Hide the drill-down.
    #[allow(dead_code)] // The CLI renders one snapshot per run
    pub fn close_drill_down(&mut self) {
        self.dispatch(Event::DrillDownClosed);
    }

    /// Relay a chat message and record the updated log.
    pub async fn ask(&mut self, message: &str) -> SendOutcome {
        let outcome = self.chat.send(message).await;
        if outcome != SendOutcome::Ignored {
            let log = self.chat.log().to_vec();
            self.dispatch(Event::ChatUpdated(log));
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn year_body(year: i32, title: &str) -> serde_json::Value {
        json!([{
            "work_year": year, "experience_level": "SE", "employment_type": "FT",
            "job_title": title, "salary": 1000, "salary_currency": "USD",
            "salary_in_usd": 1000, "employee_residence": "US", "remote_ratio": 0,
            "company_location": "US", "company_size": "M"
        }])
    }

    fn dashboard_for(server: &MockServer) -> Dashboard {
        let client = SalaryClient::new(ClientConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        })
        .unwrap();
        Dashboard::new(client, false)
    }

    #[tokio::test]
    async fn test_load_populates_summaries() {
        let server = MockServer::start().await;
        let body: serde_json::Value =
            serde_json::from_str(include_str!("../../fixtures/salaries.json")).unwrap();
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load().await;

        let state = dashboard.state();
        assert!(!state.loading);
        assert_eq!(state.totals.total_jobs, 3);
        assert_eq!(state.totals.years_of_data, 2);
    }

    #[tokio::test]
    async fn test_load_failure_is_silent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        dashboard.load().await;

        let state = dashboard.state();
        assert!(!state.loading);
        assert!(state.summaries.is_empty());
        assert_eq!(state.totals.average_salary, None);
    }

    #[tokio::test]
    async fn test_drill_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2023"))
            .respond_with(ResponseTemplate::new(200).set_body_json(year_body(2023, "ML Engineer")))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        assert!(dashboard.drill_down(2023).await);
        assert_eq!(dashboard.state().selected_year(), Some(2023));

        dashboard.close_drill_down();
        assert_eq!(dashboard.state().selected_year(), None);
    }

    #[tokio::test]
    async fn test_drill_down_failure_reports_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        assert!(!dashboard.drill_down(1999).await);
        assert!(dashboard.state().drill_down.is_none());
    }

    #[tokio::test]
    async fn test_slow_earlier_request_does_not_clobber_latest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2022"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(year_body(2022, "Analyst"))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(year_body(2024, "Researcher")))
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        let shown = dashboard.drill_down_all(&[2022, 2024], 2).await;

        assert_eq!(shown, Some(2024));
        let drill_down = dashboard.state().drill_down.clone().unwrap();
        assert_eq!(drill_down.titles[0].job_title, "Researcher");
    }

    #[tokio::test]
    async fn test_blank_chat_does_not_touch_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut dashboard = dashboard_for(&server);
        assert_eq!(dashboard.ask("  ").await, SendOutcome::Ignored);
        assert!(dashboard.state().chat.is_empty());

        assert_eq!(dashboard.ask("hello").await, SendOutcome::Answered);
        assert_eq!(dashboard.state().chat.len(), 2);
    }
}
