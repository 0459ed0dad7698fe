//! Summary figures shown on the desk: status breakdown, projection progress,
//! faction trends and the search filters of the delegate and chamber lists.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::config::*;
use crate::state::ScopedView;
use crate::{run_projection, Projection};

const UNKNOWN: &str = "Unknown";

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct StatusBreakdown {
    pub certain: usize,
    pub undecided: usize,
    pub risky: usize,
    pub negative: usize,
    pub unrecognized: usize,
}

impl StatusBreakdown {
    pub fn of<'a, I>(delegates: I) -> StatusBreakdown
    where
        I: IntoIterator<Item = &'a Delegate>,
    {
        let mut res = StatusBreakdown::default();
        for d in delegates {
            match d.status {
                VoteStatus::Certain => res.certain += 1,
                VoteStatus::Undecided => res.undecided += 1,
                VoteStatus::Risky => res.risky += 1,
                VoteStatus::Negative => res.negative += 1,
                VoteStatus::Other(_) => res.unrecognized += 1,
            }
        }
        res
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct DashboardSummary {
    pub accessible_delegates: usize,
    pub breakdown: StatusBreakdown,
    pub projection: Projection,
}

impl DashboardSummary {
    pub fn compute(view: &ScopedView, rules: &ProjectionRules, now: DateTime<Utc>) -> DashboardSummary {
        DashboardSummary {
            accessible_delegates: view.delegates.len(),
            breakdown: StatusBreakdown::of(view.delegates.iter()),
            projection: run_projection(view.delegates.iter(), rules, now),
        }
    }
}

/// Votes per faction for one election year, in faction order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct YearTrend {
    pub year: i32,
    pub votes: Vec<(FactionId, u64)>,
}

/// Total votes per faction for every year present in the results, oldest first.
pub fn faction_trend(results: &[ElectionResult], factions: &[Faction]) -> Vec<YearTrend> {
    let years: BTreeSet<i32> = results.iter().map(|r| r.year).collect();
    years
        .into_iter()
        .map(|year| YearTrend {
            year,
            votes: factions
                .iter()
                .map(|f| {
                    let total: u64 = results
                        .iter()
                        .filter(|r| r.year == year && r.faction_id == f.id)
                        .map(|r| r.votes as u64)
                        .sum();
                    (f.id.clone(), total)
                })
                .collect(),
        })
        .collect()
}

/// The votes entered so far for one chamber in one period, over the known factions.
/// Rows left behind by a deleted faction are not counted.
pub fn entered_votes(
    results: &[ElectionResult],
    factions: &[Faction],
    period_id: &str,
    chamber_id: &str,
) -> u64 {
    results
        .iter()
        .filter(|r| r.period_id == period_id && r.chamber_id == chamber_id)
        .filter(|r| factions.iter().any(|f| f.id == r.faction_id))
        .map(|r| r.votes as u64)
        .sum()
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// The filters of the delegate list. An empty filter keeps everything.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DelegateFilter {
    pub search: Option<String>,
    pub status: Option<VoteStatus>,
    pub group: Option<FactionId>,
}

impl DelegateFilter {
    /// The search term is matched, ignoring case, against the delegate name,
    /// the chamber name and city, and the tendency.
    pub fn matches(&self, delegate: &Delegate, chambers: &[Chamber]) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                let chamber = chambers.iter().find(|c| c.id == delegate.chamber_id);
                let (name, city) = chamber
                    .map(|c| (c.name.as_str(), c.city.as_str()))
                    .unwrap_or((UNKNOWN, UNKNOWN));
                contains_folded(&delegate.name, &term)
                    || contains_folded(city, &term)
                    || contains_folded(name, &term)
                    || contains_folded(&delegate.tendency, &term)
            }
        };
        let matches_status = self.status.as_ref().map_or(true, |s| *s == delegate.status);
        let matches_group = self
            .group
            .as_deref()
            .map_or(true, |g| g == delegate.current_group);
        matches_search && matches_status && matches_group
    }

    pub fn apply<'a>(&self, delegates: &'a [Delegate], chambers: &[Chamber]) -> Vec<&'a Delegate> {
        delegates
            .iter()
            .filter(|d| self.matches(d, chambers))
            .collect()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ChamberFilter {
    pub search: Option<String>,
}

impl ChamberFilter {
    pub fn apply<'a>(&self, chambers: &'a [Chamber]) -> Vec<&'a Chamber> {
        match self.search.as_deref() {
            None | Some("") => chambers.iter().collect(),
            Some(term) => {
                let term = term.to_lowercase();
                chambers
                    .iter()
                    .filter(|c| contains_folded(&c.name, &term) || contains_folded(&c.city, &term))
                    .collect()
            }
        }
    }
}

/// The delegate seats of a list of chambers.
pub fn total_delegate_seats<'a, I>(chambers: I) -> u64
where
    I: IntoIterator<Item = &'a Chamber>,
{
    chambers.into_iter().map(|c| c.total_delegates as u64).sum()
}

/// A readable description of what a user can see.
pub fn scope_label(user: &User, regions: &[Region], chambers: &[Chamber]) -> String {
    match &user.scope {
        Scope::Global => "Headquarters (all regions)".to_string(),
        Scope::Region(id) => {
            let name = regions
                .iter()
                .find(|r| r.id == *id)
                .map_or(UNKNOWN, |r| r.name.as_str());
            format!("Region: {}", name)
        }
        Scope::Chamber(id) => {
            let name = chambers
                .iter()
                .find(|c| c.id == *id)
                .map_or("no chamber selected", |c| c.name.as_str());
            format!("Chamber: {}", name)
        }
        Scope::Unrecognized(tag) => format!("Undefined scope ({})", tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DeskState;
    use chrono::TimeZone;

    #[test]
    fn breakdown_counts_every_status() {
        let s = DeskState::seeded();
        let mut ds = s.delegates.clone();
        ds.push(Delegate {
            id: "9".to_string(),
            status: VoteStatus::Other("LOST".to_string()),
            ..ds[0].clone()
        });
        let b = StatusBreakdown::of(ds.iter());
        assert_eq!(
            b,
            StatusBreakdown {
                certain: 1,
                undecided: 1,
                risky: 1,
                negative: 0,
                unrecognized: 1
            }
        );
    }

    #[test]
    fn dashboard_for_a_region() {
        let s = DeskState::seeded();
        let view = s.scoped_view(s.user("u-2").unwrap());
        // 2025-05-20: delegate 1 last seen 10 days ago, delegate 2 8 days ago.
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap();
        let summary = DashboardSummary::compute(&view, &ProjectionRules::DEFAULT_RULES, now);
        assert_eq!(summary.accessible_delegates, 2);
        assert_eq!(summary.breakdown.certain, 1);
        assert_eq!(summary.breakdown.undecided, 1);
        let expected = (1.0 - 5.0 / 150.0) + 0.55 * (1.0 - 45.0 / 150.0);
        assert!((summary.projection.total - expected).abs() < 1e-9);
    }

    #[test]
    fn trend_years_are_sorted() {
        let s = DeskState::seeded();
        let mut results = s.results.clone();
        results.push(ElectionResult {
            id: "res-3".to_string(),
            period_id: "ep-20".to_string(),
            year: 2020,
            chamber_id: "ch-s39".to_string(),
            faction_id: "f-01".to_string(),
            votes: 60,
        });
        let trend = faction_trend(&results, &s.factions);
        let years: Vec<i32> = trend.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![2020, 2024]);
        assert_eq!(trend[1].votes[0], ("f-01".to_string(), 72));
        assert_eq!(trend[1].votes[1], ("f-02".to_string(), 90));
        assert_eq!(trend[1].votes[3], ("f-04".to_string(), 0));
        assert_eq!(trend[0].votes[0].1, 60);
    }

    #[test]
    fn entered_votes_sum_factions() {
        let s = DeskState::seeded();
        assert_eq!(entered_votes(&s.results, &s.factions, "ep-24", "ch-s39"), 162);
        assert_eq!(entered_votes(&s.results, &s.factions, "ep-28", "ch-s39"), 0);
    }

    #[test]
    fn entered_votes_skip_deleted_factions() {
        let s = DeskState::seeded();
        let remaining: Vec<Faction> = s.factions.iter().filter(|f| f.id != "f-02").cloned().collect();
        let f02: u64 = s
            .results
            .iter()
            .filter(|r| r.period_id == "ep-24" && r.chamber_id == "ch-s39" && r.faction_id == "f-02")
            .map(|r| r.votes as u64)
            .sum();
        assert!(f02 > 0);
        assert_eq!(entered_votes(&s.results, &remaining, "ep-24", "ch-s39"), 162 - f02);
    }

    #[test]
    fn delegate_search_looks_at_chambers() {
        let s = DeskState::seeded();
        let by_city = DelegateFilter {
            search: Some("ankara".to_string()),
            ..DelegateFilter::default()
        };
        let ids: Vec<&str> = by_city
            .apply(&s.delegates, &s.chambers)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3"]);

        let by_status_and_group = DelegateFilter {
            search: None,
            status: Some(VoteStatus::Undecided),
            group: Some("f-03".to_string()),
        };
        assert_eq!(by_status_and_group.apply(&s.delegates, &s.chambers).len(), 1);

        let orphans = DelegateFilter {
            search: Some("unknown".to_string()),
            ..DelegateFilter::default()
        };
        assert_eq!(orphans.apply(&s.delegates, &[]).len(), 3);
    }

    #[test]
    fn chamber_search_and_seats() {
        let s = DeskState::seeded();
        let f = ChamberFilter {
            search: Some("YMMO".to_string()),
        };
        let found = f.apply(&s.chambers);
        assert_eq!(found.len(), 3);
        assert_eq!(total_delegate_seats(found), 39);
        assert_eq!(ChamberFilter::default().apply(&s.chambers).len(), 29);
    }

    #[test]
    fn scope_labels() {
        let s = DeskState::seeded();
        assert_eq!(
            scope_label(&s.users[1], &s.regions, &s.chambers),
            "Region: Marmara Bölgesi"
        );
        let lost = User {
            scope: Scope::Chamber("ch-x".to_string()),
            ..s.users[0].clone()
        };
        assert_eq!(
            scope_label(&lost, &s.regions, &s.chambers),
            "Chamber: no chamber selected"
        );
    }
}
