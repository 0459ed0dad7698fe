//! The strategic report collaborator.
//!
//! The report itself is written by an external generative service. This
//! module only decides what the service gets to see (the [Snapshot]), what
//! it is asked to do ([STRATEGY_BRIEF]) and what shape the answer must have
//! ([StrategicReport]). The service is reached through the [ReportSource]
//! trait so that everything else stays testable offline.

use std::cell::Cell;
use std::error::Error;
use std::fmt::Display;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::state::ScopedView;

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateSummary {
    pub chamber_id: ChamberId,
    pub status: String,
    pub risk: f64,
    pub group: FactionId,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ChamberSummary {
    pub name: String,
    pub total: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct FactionSummary {
    pub id: FactionId,
    pub name: String,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub chamber_id: ChamberId,
    pub year: i32,
    pub votes: u32,
    pub faction_id: FactionId,
}

/// The data handed to the report service.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Snapshot {
    pub delegates: Vec<DelegateSummary>,
    pub chambers: Vec<ChamberSummary>,
    pub factions: Vec<FactionSummary>,
    pub history: Vec<HistoryRow>,
}

impl Snapshot {
    pub fn capture(view: &ScopedView, factions: &[Faction]) -> Snapshot {
        Snapshot {
            delegates: view
                .delegates
                .iter()
                .map(|d| DelegateSummary {
                    chamber_id: d.chamber_id.clone(),
                    status: d.status.tag().to_string(),
                    risk: d.risk_score,
                    group: d.current_group.clone(),
                })
                .collect(),
            chambers: view
                .chambers
                .iter()
                .map(|c| ChamberSummary {
                    name: c.name.clone(),
                    total: c.total_delegates,
                })
                .collect(),
            factions: factions
                .iter()
                .map(|f| FactionSummary {
                    id: f.id.clone(),
                    name: f.name.clone(),
                })
                .collect(),
            history: view
                .results
                .iter()
                .map(|r| HistoryRow {
                    chamber_id: r.chamber_id.clone(),
                    year: r.year,
                    votes: r.votes,
                    faction_id: r.faction_id.clone(),
                })
                .collect(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthTarget {
    pub chamber: String,
    pub potential_gain: f64,
    pub reason: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub predicted_votes: f64,
    pub description: String,
}

/// The report returned by the service.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicReport {
    pub executive_summary: String,
    pub prediction: String,
    pub risk_summary: Vec<String>,
    pub strategic_suggestions: Vec<String>,
    #[serde(rename = "estimatedVotes2028")]
    pub estimated_votes_2028: f64,
    pub weighted_total_votes: f64,
    pub micro_growth_targets: Vec<GrowthTarget>,
    pub scenarios: Vec<Scenario>,
    pub algorithm_audit_log: String,
    pub faction_transition_analysis: String,
}

/// The fixed instruction sent along with every snapshot.
pub const STRATEGY_BRIEF: &str = "\
You are a senior data analyst on the TÜMDEP 2028 election strategy desk.
Analyse the delegate, chamber and historical result data below.

SCORING STANDARD:
W (weighted vote) = Status * Time * Risk * Chamber
Risk score (R) = (withdrawal rate * 0.4) + (lack of contact * 0.6)

REQUESTED ANALYSIS:
1. Executive summary: summarise the position against the 460-480 vote target band.
2. Growth analysis: the historical trend (2020 vs 2024) and the 2028 projection.
3. Group transition analysis: how likely votes are to move from the current rivals (especially the Çağdaş group) to TÜMDEP.
4. Scenario engine: produce \"Alliances\", \"Turnout increase\" and \"Rival break-up\" scenarios.

Answer strictly in JSON, in an audit-ready format.";

/// The complete prompt: the brief followed by the snapshot as JSON.
pub fn build_prompt(snapshot: &Snapshot) -> Result<String, ReportFailure> {
    let data =
        serde_json::to_string(snapshot).map_err(|e| ReportFailure::Request(e.to_string()))?;
    Ok(format!("{}\n\nData: {}\n", STRATEGY_BRIEF, data))
}

/// Why a report could not be obtained.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportFailure {
    /// The service cannot be reached or is not configured.
    Unavailable(String),
    /// The service answered with an error.
    Request(String),
    /// The answer does not have the expected shape.
    Parse(String),
}

impl Error for ReportFailure {}

impl Display for ReportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFailure::Unavailable(x) => write!(f, "report service unavailable: {}", x),
            ReportFailure::Request(x) => write!(f, "report request failed: {}", x),
            ReportFailure::Parse(x) => write!(f, "report could not be parsed: {}", x),
        }
    }
}

/// Something that turns a snapshot into a strategic report.
pub trait ReportSource {
    /// A short name for logging (e.g. the model name).
    fn id(&self) -> &str;

    fn fetch_strategic_report(&self, snapshot: &Snapshot) -> Result<StrategicReport, ReportFailure>;
}

/// Asks the source for a report. Failures are logged and give `None`:
/// there is no retry.
pub fn request_strategic_report(
    source: &dyn ReportSource,
    snapshot: &Snapshot,
) -> Option<StrategicReport> {
    info!(
        "request_strategic_report: asking {} ({} delegates, {} chambers, {} history rows)",
        source.id(),
        snapshot.delegates.len(),
        snapshot.chambers.len(),
        snapshot.history.len()
    );
    match source.fetch_strategic_report(snapshot) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("request_strategic_report: {} failed: {}", source.id(), e);
            None
        }
    }
}

/// A source answering with a fixed report, or failing.
///
/// Used in tests and for running the desk without network access.
pub struct MockReportSource {
    response: Result<StrategicReport, ReportFailure>,
    call_count: Cell<u32>,
}

impl MockReportSource {
    pub fn new(report: StrategicReport) -> Self {
        Self {
            response: Ok(report),
            call_count: Cell::new(0),
        }
    }

    pub fn failing(failure: ReportFailure) -> Self {
        Self {
            response: Err(failure),
            call_count: Cell::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.get()
    }
}

impl ReportSource for MockReportSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn fetch_strategic_report(&self, _snapshot: &Snapshot) -> Result<StrategicReport, ReportFailure> {
        self.call_count.set(self.call_count.get() + 1);
        self.response.clone()
    }
}
