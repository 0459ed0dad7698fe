/*!

`delegate_desk` keeps track of the voting intentions of the delegates of a
professional association ahead of its general assembly.

It covers two computations and the state that feeds them:

* the scope filter: which chambers, delegates and results a user may see,
  given the region or chamber their account is restricted to;
* the weighted vote projection: a probability-adjusted support value for
  each delegate, summed and compared against the target.

```
use chrono::{TimeZone, Utc};
use delegate_desk::*;

let state = DeskState::seeded();
let user = &state.users[1]; // restricted to one region
let view = state.scoped_view(user);
let now = Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap();
let projection = run_projection(view.delegates.iter(), &ProjectionRules::DEFAULT_RULES, now);
assert!(projection.total > 0.0);
```

See the [manual] for the details of the formula and the desk file format.
*/

mod config;
use log::{debug, info};

use std::collections::HashSet;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};

pub use crate::config::*;

pub mod audit;
pub mod builder;
pub mod manual;
pub mod report;
pub mod seed;
pub mod state;
pub mod stats;

pub use crate::audit::{AuditAction, AuditEntry, AuditTrail};
pub use crate::state::{reduce, Action, DelegatePatch, DeskState, ScopedView};

const MILLIS_PER_DAY: i64 = 86_400_000;

// ********* Scope filter **********

/// The chambers a user is allowed to see, in their original order.
///
/// A region or chamber reference that matches nothing gives an empty list,
/// as does an unrecognized scope.
pub fn visible_chambers<'a>(user: &User, chambers: &'a [Chamber]) -> Vec<&'a Chamber> {
    let res: Vec<&Chamber> = match &user.scope {
        Scope::Global => chambers.iter().collect(),
        Scope::Region(region_id) => chambers
            .iter()
            .filter(|c| c.region_id.as_deref() == Some(region_id.as_str()))
            .collect(),
        Scope::Chamber(chamber_id) => chambers.iter().filter(|c| c.id == *chamber_id).collect(),
        Scope::Unrecognized(tag) => {
            debug!(
                "visible_chambers: user {:?} has unrecognized scope {:?}",
                user.id, tag
            );
            Vec::new()
        }
    };
    debug!(
        "visible_chambers: user {:?} scope {:?}: {} of {} chambers",
        user.id,
        user.scope,
        res.len(),
        chambers.len()
    );
    res
}

fn chamber_ids<'a>(visible: &[&'a Chamber]) -> HashSet<&'a str> {
    visible.iter().map(|c| c.id.as_str()).collect()
}

/// The delegates attached to one of the visible chambers.
pub fn visible_delegates<'a>(visible: &[&Chamber], delegates: &'a [Delegate]) -> Vec<&'a Delegate> {
    let ids = chamber_ids(visible);
    delegates
        .iter()
        .filter(|d| ids.contains(d.chamber_id.as_str()))
        .collect()
}

/// The historical results recorded for one of the visible chambers.
pub fn visible_results<'a>(
    visible: &[&Chamber],
    results: &'a [ElectionResult],
) -> Vec<&'a ElectionResult> {
    let ids = chamber_ids(visible);
    results
        .iter()
        .filter(|r| ids.contains(r.chamber_id.as_str()))
        .collect()
}

// ********* Weighted vote projection **********

/// The weight of a single delegate and the factors it is made of.
#[derive(PartialEq, Debug, Clone)]
pub struct DelegateWeight {
    pub delegate_id: DelegateId,
    pub days_since_contact: i64,
    pub status_coefficient: f64,
    pub recency_coefficient: f64,
    pub risk_discount: f64,
    pub weight: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Projection {
    pub weights: Vec<DelegateWeight>,
    pub total: f64,
    pub target: f64,
}

impl Projection {
    /// Not clamped: the total may exceed the target.
    pub fn progress_percent(&self) -> f64 {
        self.total / self.target * 100.0
    }
}

/// Whole days between the last contact (midnight UTC) and `now`, rounded down.
///
/// A contact date in the future gives a negative count.
pub fn days_since_contact(delegate: &Delegate, now: DateTime<Utc>) -> i64 {
    let contact = Utc.from_utc_datetime(&delegate.last_contact_date.and_time(NaiveTime::MIN));
    (now - contact).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub fn status_coefficient(status: &VoteStatus, rules: &ProjectionRules) -> f64 {
    match status {
        VoteStatus::Certain => rules.certain_coefficient,
        VoteStatus::Undecided => rules.undecided_coefficient,
        VoteStatus::Risky => rules.risky_coefficient,
        VoteStatus::Negative | VoteStatus::Other(_) => rules.negative_coefficient,
    }
}

pub fn recency_coefficient(days: i64, rules: &ProjectionRules) -> f64 {
    if days <= rules.recent_contact_days {
        rules.recent_coefficient
    } else if days <= rules.aging_contact_days {
        rules.aging_coefficient
    } else {
        rules.stale_coefficient
    }
}

pub fn risk_discount(risk_score: f64, rules: &ProjectionRules) -> f64 {
    1.0 - risk_score / rules.risk_divisor
}

pub fn delegate_weight(
    delegate: &Delegate,
    rules: &ProjectionRules,
    now: DateTime<Utc>,
) -> DelegateWeight {
    let days = days_since_contact(delegate, now);
    let s = status_coefficient(&delegate.status, rules);
    let t = recency_coefficient(days, rules);
    let r = risk_discount(delegate.risk_score, rules);
    DelegateWeight {
        delegate_id: delegate.id.clone(),
        days_since_contact: days,
        status_coefficient: s,
        recency_coefficient: t,
        risk_discount: r,
        weight: s * t * r,
    }
}

/// Runs the projection over a set of delegates.
///
/// The total is the plain sum of the individual weights.
pub fn run_projection<'a, I>(delegates: I, rules: &ProjectionRules, now: DateTime<Utc>) -> Projection
where
    I: IntoIterator<Item = &'a Delegate>,
{
    let weights: Vec<DelegateWeight> = delegates
        .into_iter()
        .map(|d| delegate_weight(d, rules, now))
        .collect();
    let total: f64 = weights.iter().map(|w| w.weight).sum();
    info!(
        "run_projection: {} delegates, projected {:.3} / {}",
        weights.len(),
        total,
        rules.target_votes
    );
    for w in weights.iter() {
        debug!(
            "run_projection: {}: S={} T={} R={:.4} (days: {}) -> {:.4}",
            w.delegate_id,
            w.status_coefficient,
            w.recency_coefficient,
            w.risk_discount,
            w.days_since_contact,
            w.weight
        );
    }
    Projection {
        weights,
        total,
        target: rules.target_votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    const EPS: f64 = 1e-9;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap()
    }

    fn delegate(status: VoteStatus, risk_score: f64, days_ago: i64) -> Delegate {
        Delegate {
            id: "d-1".to_string(),
            name: "Test Delegate".to_string(),
            chamber_id: "ch-1".to_string(),
            status,
            last_contact_date: now().date_naive() - Duration::days(days_ago),
            assigned_manager: String::new(),
            notes: String::new(),
            risk_score,
            current_group: "f-01".to_string(),
            previous_group: None,
            tendency: String::new(),
            election_year: 2028,
        }
    }

    fn chamber(id: &str, region: Option<&str>) -> Chamber {
        Chamber {
            id: id.to_string(),
            name: format!("{} chamber", id),
            city: "City".to_string(),
            region_id: region.map(|r| r.to_string()),
            total_members: 100,
            total_delegates: 10,
            voted_delegates_count: 0,
        }
    }

    fn user(scope: Scope) -> User {
        User {
            id: "u-1".to_string(),
            name: "Tester".to_string(),
            email: "tester@example.org".to_string(),
            role: UserRole::Manager,
            scope,
            is_active: true,
        }
    }

    fn chambers() -> Vec<Chamber> {
        vec![
            chamber("ch-1", Some("reg-01")),
            chamber("ch-2", Some("reg-02")),
            chamber("ch-3", None),
            chamber("ch-4", Some("reg-01")),
        ]
    }

    #[test]
    fn negative_weighs_nothing() {
        init();
        for (risk, days) in [(0.0, 0), (50.0, 45), (100.0, 400)] {
            let d = delegate(VoteStatus::Negative, risk, days);
            assert_eq!(delegate_weight(&d, &ProjectionRules::DEFAULT_RULES, now()).weight, 0.0);
        }
        let d = delegate(VoteStatus::Other("WAVERING".to_string()), 0.0, 0);
        assert_eq!(delegate_weight(&d, &ProjectionRules::DEFAULT_RULES, now()).weight, 0.0);
    }

    #[test]
    fn certain_contacted_today_weighs_one() {
        let d = delegate(VoteStatus::Certain, 0.0, 0);
        assert_eq!(delegate_weight(&d, &ProjectionRules::DEFAULT_RULES, now()).weight, 1.0);
    }

    #[test]
    fn recency_boundaries() {
        let rules = ProjectionRules::DEFAULT_RULES;
        for (days, expected) in [(30, 1.0), (31, 0.85), (60, 0.85), (61, 0.65)] {
            let d = delegate(VoteStatus::Certain, 0.0, days);
            let w = delegate_weight(&d, &rules, now());
            assert_eq!(w.days_since_contact, days);
            assert_eq!(w.recency_coefficient, expected, "days: {}", days);
        }
    }

    #[test]
    fn future_contact_counts_as_recent() {
        let d = delegate(VoteStatus::Undecided, 0.0, -3);
        let w = delegate_weight(&d, &ProjectionRules::DEFAULT_RULES, now());
        assert_eq!(w.days_since_contact, -3);
        assert_eq!(w.recency_coefficient, 1.0);
        assert!((w.weight - 0.55).abs() < EPS);
    }

    #[test]
    fn days_are_floored() {
        let d = Delegate {
            last_contact_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            ..delegate(VoteStatus::Certain, 0.0, 0)
        };
        // 38.5 hours after midnight of the contact date.
        assert_eq!(days_since_contact(&d, now()), 1);
    }

    #[test]
    fn days_are_floored_just_before_contact() {
        let d = Delegate {
            last_contact_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ..delegate(VoteStatus::Certain, 0.0, 0)
        };
        let almost = Utc.with_ymd_and_hms(2025, 5, 31, 23, 59, 59).unwrap()
            + Duration::milliseconds(500);
        assert_eq!(days_since_contact(&d, almost), -1);
        let w = delegate_weight(&d, &ProjectionRules::DEFAULT_RULES, almost);
        assert_eq!(w.weight, 1.0);
    }

    #[test]
    fn worked_examples() {
        let rules = ProjectionRules::DEFAULT_RULES;
        let a = delegate_weight(&delegate(VoteStatus::Certain, 5.0, 2), &rules, now());
        assert!((a.risk_discount - (1.0 - 5.0 / 150.0)).abs() < EPS);
        assert!((a.weight - 0.966_666_666_7).abs() < 1e-6);

        let b = delegate_weight(&delegate(VoteStatus::Risky, 75.0, 90), &rules, now());
        assert_eq!(b.status_coefficient, 0.25);
        assert_eq!(b.recency_coefficient, 0.65);
        assert_eq!(b.risk_discount, 0.5);
        assert!((b.weight - 0.08125).abs() < EPS);
    }

    #[test]
    fn total_is_sum_of_weights() {
        let rules = ProjectionRules::DEFAULT_RULES;
        let ds = vec![
            delegate(VoteStatus::Certain, 5.0, 2),
            delegate(VoteStatus::Undecided, 45.0, 40),
            delegate(VoteStatus::Risky, 75.0, 90),
            delegate(VoteStatus::Negative, 10.0, 1),
        ];
        let p = run_projection(ds.iter(), &rules, now());
        let expected: f64 = ds
            .iter()
            .map(|d| delegate_weight(d, &rules, now()).weight)
            .sum();
        assert_eq!(p.weights.len(), 4);
        assert_eq!(p.total, expected);
        assert!((p.progress_percent() - expected / 450.0 * 100.0).abs() < EPS);
    }

    #[test]
    fn progress_is_not_clamped() {
        let ds: Vec<Delegate> = (0..500)
            .map(|_| delegate(VoteStatus::Certain, 0.0, 0))
            .collect();
        let p = run_projection(ds.iter(), &ProjectionRules::DEFAULT_RULES, now());
        assert!(p.progress_percent() > 100.0);
    }

    #[test]
    fn global_scope_sees_everything() {
        init();
        let cs = chambers();
        let visible = visible_chambers(&user(Scope::Global), &cs);
        let ids: Vec<&str> = visible.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ch-1", "ch-2", "ch-3", "ch-4"]);
    }

    #[test]
    fn region_scope_matches_exactly() {
        let cs = chambers();
        let visible = visible_chambers(&user(Scope::Region("reg-01".to_string())), &cs);
        let ids: Vec<&str> = visible.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ch-1", "ch-4"]);
    }

    #[test]
    fn chamber_scope_misses_are_empty() {
        let cs = chambers();
        let hit = visible_chambers(&user(Scope::Chamber("ch-3".to_string())), &cs);
        assert_eq!(hit.len(), 1);
        let miss = visible_chambers(&user(Scope::Chamber("ch-99".to_string())), &cs);
        assert!(miss.is_empty());
        let unknown = visible_chambers(&user(Scope::Unrecognized("CITY".to_string())), &cs);
        assert!(unknown.is_empty());
    }

    #[test]
    fn delegates_and_results_follow_chambers() {
        let cs = chambers();
        let visible = visible_chambers(&user(Scope::Region("reg-02".to_string())), &cs);
        let ds = vec![
            Delegate {
                id: "a".to_string(),
                chamber_id: "ch-2".to_string(),
                ..delegate(VoteStatus::Certain, 0.0, 0)
            },
            Delegate {
                id: "b".to_string(),
                chamber_id: "ch-1".to_string(),
                ..delegate(VoteStatus::Certain, 0.0, 0)
            },
        ];
        let rs = vec![
            ElectionResult {
                id: "r1".to_string(),
                period_id: "ep-24".to_string(),
                year: 2024,
                chamber_id: "ch-1".to_string(),
                faction_id: "f-01".to_string(),
                votes: 3,
            },
            ElectionResult {
                id: "r2".to_string(),
                period_id: "ep-24".to_string(),
                year: 2024,
                chamber_id: "ch-2".to_string(),
                faction_id: "f-01".to_string(),
                votes: 4,
            },
        ];
        let vd = visible_delegates(&visible, &ds);
        assert_eq!(vd.len(), 1);
        assert_eq!(vd[0].id, "a");
        let vr = visible_results(&visible, &rs);
        assert_eq!(vr.len(), 1);
        assert_eq!(vr[0].id, "r2");
    }
}
