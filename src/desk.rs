use log::{debug, info, warn};

use delegate_desk::report::*;
use delegate_desk::stats::*;
use delegate_desk::*;
use snafu::{prelude::*, Snafu};

use chrono::{DateTime, Utc};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use std::fs;
use text_diff::print_diff;

use crate::args::{Args, Command};
use crate::desk::config_reader::*;
use crate::desk::io_common::*;
use crate::desk::io_gemini::GeminiReportSource;

mod config_reader;
mod io_common;
mod io_gemini;

#[derive(Debug, Snafu)]
pub enum DeskError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing the output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid date {value:?}, expected YYYY-MM-DD"))]
    InvalidDate {
        source: chrono::ParseError,
        value: String,
    },
    #[snafu(display("Invalid {field} {tag:?}"))]
    InvalidTag { field: &'static str, tag: String },
    #[snafu(display("Unknown user {id}"))]
    UnknownUser { id: String },
    #[snafu(display("The desk has no users"))]
    NoUsers {},
    #[snafu(display("The desk data is inconsistent: {source}"))]
    InvalidDesk { source: DeskErrors },
    #[snafu(display("Action #{index} was rejected: {source}"))]
    RejectedAction { source: DeskErrors, index: usize },
    #[snafu(display("Difference detected between the output and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DeskResult<T> = Result<T, DeskError>;

const NO_ANALYSIS: &str = "no analysis available";

/// Figures are written as strings with 4 decimals, so that outputs can be
/// compared textually.
fn format_figure(x: f64) -> String {
    format!("{:.4}", x)
}

pub fn load_desk(config_path: Option<&str>) -> DeskResult<(DeskState, ProjectionRules)> {
    let config = match config_path {
        Some(p) => read_desk_config(p)?,
        None => {
            info!("No desk file given, starting from the seed data");
            DeskConfig::default()
        }
    };
    validate_desk(&config)
}

/// The acting user: the given id, or the first user of the desk.
pub fn select_user<'a>(state: &'a DeskState, user_id: Option<&str>) -> DeskResult<&'a User> {
    let user = match user_id {
        Some(id) => state.user(id).context(UnknownUserSnafu { id })?,
        None => state.users.first().context(NoUsersSnafu {})?,
    };
    if !user.is_active {
        warn!("user {} is not active", user.id);
    }
    Ok(user)
}

/// Midnight UTC of the given day, or the current time.
pub fn clock(as_of: Option<&str>) -> DeskResult<DateTime<Utc>> {
    match as_of {
        Some(s) => Ok(start_of_day(parse_date(s)?)),
        None => Ok(Utc::now()),
    }
}

fn read_status_filter(status: Option<&str>) -> DeskResult<Option<VoteStatus>> {
    match status {
        None => Ok(None),
        Some(s) => match VoteStatus::from_tag(s.to_uppercase().as_str()) {
            VoteStatus::Other(_) => InvalidTagSnafu {
                field: "status",
                tag: s.to_string(),
            }
            .fail(),
            x => Ok(Some(x)),
        },
    }
}

fn user_js(state: &DeskState, user: &User) -> JSValue {
    json!({
        "id": user.id,
        "name": user.name,
        "role": user.role.tag(),
        "scope": scope_label(user, &state.regions, &state.chambers),
    })
}

fn weight_js(w: &DelegateWeight) -> JSValue {
    json!({
        "delegate": w.delegate_id,
        "daysSinceContact": w.days_since_contact,
        "status": format_figure(w.status_coefficient),
        "recency": format_figure(w.recency_coefficient),
        "risk": format_figure(w.risk_discount),
        "weight": format_figure(w.weight),
    })
}

fn dashboard_js(
    state: &DeskState,
    user: &User,
    rules: &ProjectionRules,
    now: DateTime<Utc>,
) -> JSValue {
    let view = state.scoped_view(user);
    let summary = DashboardSummary::compute(&view, rules, now);
    let b = summary.breakdown;
    let p = &summary.projection;
    json!({
        "user": user_js(state, user),
        "asOf": now.date_naive().to_string(),
        "activePeriod": state.active_period().map(|x| x.id.clone()),
        "accessibleDelegates": summary.accessible_delegates,
        "statusBreakdown": {
            "certain": b.certain,
            "undecided": b.undecided,
            "risky": b.risky,
            "negative": b.negative,
            "unrecognized": b.unrecognized,
        },
        "projection": {
            "total": format_figure(p.total),
            "target": format_figure(p.target),
            "progressPercent": format_figure(p.progress_percent()),
            "weights": p.weights.iter().map(weight_js).collect::<Vec<JSValue>>(),
        },
    })
}

fn chambers_js(state: &DeskState, user: &User, search: Option<String>) -> JSValue {
    let view = state.scoped_view(user);
    let found = ChamberFilter { search }.apply(&view.chambers);
    let period_id = state.active_period().map(|p| p.id.as_str());
    let chambers: Vec<JSValue> = found
        .iter()
        .map(|c| {
            let region = c
                .region_id
                .as_deref()
                .and_then(|rid| state.regions.iter().find(|r| r.id == rid))
                .map(|r| r.name.clone());
            json!({
                "id": c.id,
                "name": c.name,
                "city": c.city,
                "region": region,
                "totalMembers": c.total_members,
                "totalDelegates": c.total_delegates,
                "enteredVotes": period_id.map(|pid| entered_votes(&state.results, &state.factions, pid, &c.id)),
            })
        })
        .collect();
    json!({
        "activePeriod": period_id,
        "chambers": chambers,
        "totalDelegateSeats": total_delegate_seats(found.iter().copied()),
    })
}

fn delegates_js(
    state: &DeskState,
    user: &User,
    rules: &ProjectionRules,
    now: DateTime<Utc>,
    filter: &DelegateFilter,
) -> JSValue {
    let view = state.scoped_view(user);
    let found = filter.apply(&view.delegates, &view.chambers);
    let projection = run_projection(found.iter().copied(), rules, now);
    let delegates: Vec<JSValue> = found
        .iter()
        .zip(projection.weights.iter())
        .map(|(d, w)| {
            let chamber = state
                .chamber(&d.chamber_id)
                .map_or("Unknown".to_string(), |c| c.name.clone());
            json!({
                "id": d.id,
                "name": d.name,
                "chamber": chamber,
                "status": d.status.tag(),
                "riskScore": format_figure(d.risk_score),
                "group": d.current_group,
                "tendency": d.tendency,
                "lastContactDate": d.last_contact_date.to_string(),
                "daysSinceContact": w.days_since_contact,
                "weight": format_figure(w.weight),
            })
        })
        .collect();
    json!({
        "delegates": delegates,
        "projectedTotal": format_figure(projection.total),
    })
}

fn results_js(state: &DeskState, user: &User) -> JSValue {
    let view = state.scoped_view(user);
    let rows: Vec<JSValue> = view
        .results
        .iter()
        .map(|r| {
            json!({
                "period": r.period_id,
                "year": r.year,
                "chamber": r.chamber_id,
                "faction": r.faction_id,
                "votes": r.votes,
            })
        })
        .collect();
    let trend: Vec<JSValue> = faction_trend(&view.results, &state.factions)
        .into_iter()
        .map(|t| {
            let mut votes: JSMap<String, JSValue> = JSMap::new();
            for (fid, count) in t.votes {
                votes.insert(fid, json!(count));
            }
            json!({"year": t.year, "votes": votes})
        })
        .collect();
    json!({"results": rows, "trend": trend})
}

/// Applies every action in order. The first rejected action stops the run.
pub fn apply_actions(
    state: &DeskState,
    actor: &User,
    specs: &[ActionSpec],
    now: DateTime<Utc>,
) -> DeskResult<DeskState> {
    let mut current = state.clone();
    for (index, spec) in specs.iter().enumerate() {
        let action = spec.validate(&actor.id)?;
        current = reduce(&current, action, now).context(RejectedActionSnafu { index })?;
    }
    info!("apply_actions: {} actions applied", specs.len());
    Ok(current)
}

fn audit_js(trail: &AuditTrail) -> Vec<JSValue> {
    trail
        .iter()
        .map(|e| {
            json!({
                "timestamp": e.timestamp.to_rfc3339(),
                "userId": e.user_id,
                "action": e.action.tag(),
                "details": e.details,
            })
        })
        .collect()
}

/// The analysis of the data visible to `user`. Collaborator failures are
/// reported in the output, never as an error.
pub fn analyze_js(state: &DeskState, user: &User, source: &dyn ReportSource) -> JSValue {
    let view = state.scoped_view(user);
    let snapshot = Snapshot::capture(&view, &state.factions);
    match request_strategic_report(source, &snapshot) {
        Some(report) => json!({"source": source.id(), "report": report}),
        None => json!({"source": source.id(), "report": null, "message": NO_ANALYSIS}),
    }
}

pub fn run_command(args: &Args) -> DeskResult<JSValue> {
    let (state, rules) = load_desk(args.config.as_deref())?;
    let now = clock(args.as_of.as_deref())?;
    let user = select_user(&state, args.user.as_deref())?;
    debug!("run_command: user {:?}, now {}", user.id, now);

    let res = match args.command.clone() {
        Command::Dashboard => dashboard_js(&state, user, &rules, now),
        Command::Chambers { search } => chambers_js(&state, user, search),
        Command::Delegates {
            search,
            status,
            group,
        } => {
            let filter = DelegateFilter {
                search,
                status: read_status_filter(status.as_deref())?,
                group,
            };
            delegates_js(&state, user, &rules, now, &filter)
        }
        Command::Results => results_js(&state, user),
        Command::Apply { actions } => {
            let specs = read_actions(&actions)?;
            let next = apply_actions(&state, user, &specs, now)?;
            json!({
                "applied": specs.len(),
                "auditLog": audit_js(&next.audit),
                "dashboard": dashboard_js(&next, user, &rules, now),
            })
        }
        Command::Analyze { model } => {
            let source = GeminiReportSource::from_env(model);
            analyze_js(&state, user, &source)
        }
    };
    Ok(res)
}

fn write_output(pretty: &str, out: Option<&str>) -> DeskResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty);
            Ok(())
        }
        Some(path) => {
            info!("Writing output to {}", path);
            fs::write(path, pretty).context(WritingOutputSnafu { path })
        }
    }
}

fn check_reference(pretty: &str, reference_path: &str) -> DeskResult<()> {
    let reference = read_summary(reference_path)?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {
        path: reference_path,
    })?;
    if pretty_reference != pretty {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

pub fn run(args: &Args) -> DeskResult<()> {
    let js = run_command(args)?;
    let pretty = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu { path: "<output>" })?;
    write_output(&pretty, args.out.as_deref())?;
    if let Some(reference_path) = args.reference.as_deref() {
        check_reference(&pretty, reference_path)?;
    }
    Ok(())
}
