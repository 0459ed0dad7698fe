//! The desk state and the reducer that moves it forward.
//!
//! Every change goes through [reduce]: it takes the current state and an
//! [Action] and returns the next state, or an error and no change at all.

use chrono::{DateTime, Datelike, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::audit::{AuditAction, AuditEntry, AuditTrail};
use crate::config::*;
use crate::seed;
use crate::{visible_chambers, visible_delegates, visible_results};

/// The tendency written on a delegate that is marked as certain.
pub const LOYAL_TENDENCY: &str = "TÜMDEP Sadık";
/// Added to the risk score by a risk escalation.
pub const RISK_ESCALATION_STEP: f64 = 15.0;
/// Above this previous score, an escalation also marks the delegate as risky.
pub const RISKY_THRESHOLD: f64 = 50.0;

const MAX_RISK: f64 = 100.0;

#[derive(PartialEq, Debug, Clone, Default)]
pub struct DeskState {
    pub regions: Vec<Region>,
    pub chambers: Vec<Chamber>,
    pub factions: Vec<Faction>,
    pub periods: Vec<ElectionPeriod>,
    pub results: Vec<ElectionResult>,
    pub delegates: Vec<Delegate>,
    pub users: Vec<User>,
    pub audit: AuditTrail,
}

/// The part of the desk one user can see. Factions and periods are not
/// scoped and are read from the state directly.
#[derive(PartialEq, Debug, Clone)]
pub struct ScopedView {
    pub chambers: Vec<Chamber>,
    pub delegates: Vec<Delegate>,
    pub results: Vec<ElectionResult>,
}

impl DeskState {
    /// The state the desk starts with when nothing else is provided.
    pub fn seeded() -> DeskState {
        DeskState {
            regions: seed::regions(),
            chambers: seed::chambers(),
            factions: seed::factions(),
            periods: seed::periods(),
            results: seed::results(),
            delegates: seed::delegates(),
            users: seed::users(),
            audit: AuditTrail::new(),
        }
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn chamber(&self, id: &str) -> Option<&Chamber> {
        self.chambers.iter().find(|c| c.id == id)
    }

    pub fn active_period(&self) -> Option<&ElectionPeriod> {
        self.periods.iter().find(|p| p.is_active)
    }

    pub fn scoped_view(&self, user: &User) -> ScopedView {
        let chambers = visible_chambers(user, &self.chambers);
        let delegates = visible_delegates(&chambers, &self.delegates);
        let results = visible_results(&chambers, &self.results);
        debug!(
            "scoped_view: user {:?}: {} chambers, {} delegates, {} results",
            user.id,
            chambers.len(),
            delegates.len(),
            results.len()
        );
        ScopedView {
            chambers: chambers.into_iter().cloned().collect(),
            delegates: delegates.into_iter().cloned().collect(),
            results: results.into_iter().cloned().collect(),
        }
    }
}

/// Field replacements for a delegate. Unset fields are left as they are.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DelegatePatch {
    pub name: Option<String>,
    pub chamber_id: Option<ChamberId>,
    pub status: Option<VoteStatus>,
    pub last_contact_date: Option<chrono::NaiveDate>,
    pub assigned_manager: Option<String>,
    pub notes: Option<String>,
    pub risk_score: Option<f64>,
    pub current_group: Option<FactionId>,
    pub previous_group: Option<FactionId>,
    pub tendency: Option<String>,
    pub election_year: Option<i32>,
}

impl DelegatePatch {
    fn apply_to(self, d: &mut Delegate) {
        if let Some(x) = self.name {
            d.name = x;
        }
        if let Some(x) = self.chamber_id {
            d.chamber_id = x;
        }
        if let Some(x) = self.status {
            d.status = x;
        }
        if let Some(x) = self.last_contact_date {
            d.last_contact_date = x;
        }
        if let Some(x) = self.assigned_manager {
            d.assigned_manager = x;
        }
        if let Some(x) = self.notes {
            d.notes = x;
        }
        if let Some(x) = self.risk_score {
            d.risk_score = clamp_risk(x);
        }
        if let Some(x) = self.current_group {
            d.current_group = x;
        }
        if let Some(x) = self.previous_group {
            d.previous_group = Some(x);
        }
        if let Some(x) = self.tendency {
            d.tendency = x;
        }
        if let Some(x) = self.election_year {
            d.election_year = x;
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum Action {
    AddRegion(Region),
    UpdateRegion(Region),
    DeleteRegion(RegionId),
    AddChamber(Chamber),
    UpdateChamber(Chamber),
    DeleteChamber(ChamberId),
    AssignChamberRegion {
        chamber_id: ChamberId,
        region_id: Option<RegionId>,
    },
    AddFaction(Faction),
    UpdateFaction(Faction),
    DeleteFaction(FactionId),
    AddPeriod(ElectionPeriod),
    UpdatePeriod(ElectionPeriod),
    SetActivePeriod(PeriodId),
    RecordResult {
        period_id: PeriodId,
        chamber_id: ChamberId,
        faction_id: FactionId,
        votes: u32,
    },
    AddDelegate(Delegate),
    UpdateDelegate {
        actor: UserId,
        delegate_id: DelegateId,
        patch: DelegatePatch,
    },
    MarkCertain {
        actor: UserId,
        delegate_id: DelegateId,
    },
    EscalateRisk {
        actor: UserId,
        delegate_id: DelegateId,
    },
    DeleteDelegate(DelegateId),
    AddUser(User),
    UpdateUser(User),
    DeleteUser(UserId),
}

/// Applies one action. On error the given state is the one to keep.
pub fn reduce(
    state: &DeskState,
    action: Action,
    now: DateTime<Utc>,
) -> Result<DeskState, DeskErrors> {
    debug!("reduce: {:?}", action);
    let mut next = state.clone();
    apply(&mut next, action, now)?;
    Ok(next)
}

fn apply(s: &mut DeskState, action: Action, now: DateTime<Utc>) -> Result<(), DeskErrors> {
    match action {
        Action::AddRegion(r) => add(&mut s.regions, r),
        Action::UpdateRegion(r) => replace(&mut s.regions, r),
        Action::DeleteRegion(id) => remove(&mut s.regions, &id),
        Action::AddChamber(c) => {
            check_region(s, c.region_id.as_deref())?;
            add(&mut s.chambers, c)
        }
        Action::UpdateChamber(c) => {
            check_region(s, c.region_id.as_deref())?;
            replace(&mut s.chambers, c)
        }
        Action::DeleteChamber(id) => remove(&mut s.chambers, &id),
        Action::AssignChamberRegion {
            chamber_id,
            region_id,
        } => {
            check_region(s, region_id.as_deref())?;
            find_mut(&mut s.chambers, &chamber_id)?.region_id = region_id;
            Ok(())
        }
        Action::AddFaction(f) => add(&mut s.factions, f),
        Action::UpdateFaction(f) => replace(&mut s.factions, f),
        Action::DeleteFaction(id) => remove(&mut s.factions, &id),
        Action::AddPeriod(p) => add(
            &mut s.periods,
            ElectionPeriod {
                is_active: false,
                ..p
            },
        ),
        Action::UpdatePeriod(p) => {
            let current = find_mut(&mut s.periods, &p.id)?;
            *current = ElectionPeriod {
                is_active: current.is_active,
                ..p
            };
            Ok(())
        }
        Action::SetActivePeriod(id) => {
            find_mut(&mut s.periods, &id)?;
            for p in s.periods.iter_mut() {
                p.is_active = p.id == id;
            }
            info!("reduce: period {} is now active", id);
            Ok(())
        }
        Action::RecordResult {
            period_id,
            chamber_id,
            faction_id,
            votes,
        } => {
            record_result(s, period_id, chamber_id, faction_id, votes, now);
            Ok(())
        }
        Action::AddDelegate(d) => {
            check_chamber(s, &d.chamber_id)?;
            add(
                &mut s.delegates,
                Delegate {
                    risk_score: clamp_risk(d.risk_score),
                    ..d
                },
            )
        }
        Action::UpdateDelegate {
            actor,
            delegate_id,
            patch,
        } => {
            if let Some(chamber_id) = patch.chamber_id.as_deref() {
                check_chamber(s, chamber_id)?;
            }
            patch.apply_to(find_mut(&mut s.delegates, &delegate_id)?);
            log_delegate_update(s, &actor, &delegate_id, now);
            Ok(())
        }
        Action::MarkCertain { actor, delegate_id } => {
            let d = find_mut(&mut s.delegates, &delegate_id)?;
            d.status = VoteStatus::Certain;
            d.risk_score = 0.0;
            d.tendency = LOYAL_TENDENCY.to_string();
            log_delegate_update(s, &actor, &delegate_id, now);
            Ok(())
        }
        Action::EscalateRisk { actor, delegate_id } => {
            let d = find_mut(&mut s.delegates, &delegate_id)?;
            if d.risk_score > RISKY_THRESHOLD {
                d.status = VoteStatus::Risky;
            }
            d.risk_score = (d.risk_score + RISK_ESCALATION_STEP).min(MAX_RISK);
            log_delegate_update(s, &actor, &delegate_id, now);
            Ok(())
        }
        Action::DeleteDelegate(id) => remove(&mut s.delegates, &id),
        Action::AddUser(u) => add(&mut s.users, u),
        Action::UpdateUser(u) => replace(&mut s.users, u),
        Action::DeleteUser(id) => remove(&mut s.users, &id),
    }
}

fn record_result(
    s: &mut DeskState,
    period_id: PeriodId,
    chamber_id: ChamberId,
    faction_id: FactionId,
    votes: u32,
    now: DateTime<Utc>,
) {
    let year = s
        .periods
        .iter()
        .find(|p| p.id == period_id)
        .map(|p| p.year)
        .unwrap_or_else(|| now.year());
    let existing = s.results.iter_mut().find(|r| {
        r.period_id == period_id && r.chamber_id == chamber_id && r.faction_id == faction_id
    });
    if let Some(r) = existing {
        debug!("record_result: updating {} to {} votes", r.id, votes);
        r.votes = votes;
        r.year = year;
    } else {
        let id = format!("res-{}", Uuid::new_v4().simple());
        debug!("record_result: new row {} with {} votes", id, votes);
        s.results.push(ElectionResult {
            id,
            period_id,
            year,
            chamber_id,
            faction_id,
            votes,
        });
    }
}

fn log_delegate_update(s: &mut DeskState, actor: &str, delegate_id: &str, now: DateTime<Utc>) {
    let actor_name = s
        .users
        .iter()
        .find(|u| u.id == actor)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| actor.to_string());
    let details = format!(
        "User ({}) updated the records of delegate {}.",
        actor_name, delegate_id
    );
    s.audit.record(AuditEntry::new(
        actor,
        AuditAction::DelegateUpdate,
        details,
        now,
    ));
}

pub(crate) fn clamp_risk(x: f64) -> f64 {
    if x.is_nan() {
        warn!("risk score is not a number, using 0");
        0.0
    } else if !(0.0..=MAX_RISK).contains(&x) {
        warn!("risk score {} out of range, clamping to [0, {}]", x, MAX_RISK);
        x.clamp(0.0, MAX_RISK)
    } else {
        x
    }
}

fn check_region(s: &DeskState, region_id: Option<&str>) -> Result<(), DeskErrors> {
    match region_id {
        Some(id) if !s.regions.iter().any(|r| r.id == id) => {
            Err(DeskErrors::UnknownRegion(id.to_string()))
        }
        _ => Ok(()),
    }
}

fn check_chamber(s: &DeskState, chamber_id: &str) -> Result<(), DeskErrors> {
    if s.chambers.iter().any(|c| c.id == chamber_id) {
        Ok(())
    } else {
        Err(DeskErrors::UnknownChamber(chamber_id.to_string()))
    }
}

// ******** Keyed collections *********

pub(crate) trait Record {
    const KIND: &'static str;
    fn key(&self) -> &str;
    fn unknown(id: String) -> DeskErrors;
}

macro_rules! record {
    ($t:ty, $kind:expr, $unknown:path) => {
        impl Record for $t {
            const KIND: &'static str = $kind;
            fn key(&self) -> &str {
                &self.id
            }
            fn unknown(id: String) -> DeskErrors {
                $unknown(id)
            }
        }
    };
}

record!(Region, "region", DeskErrors::UnknownRegion);
record!(Chamber, "chamber", DeskErrors::UnknownChamber);
record!(Faction, "faction", DeskErrors::UnknownFaction);
record!(ElectionPeriod, "election period", DeskErrors::UnknownPeriod);
record!(Delegate, "delegate", DeskErrors::UnknownDelegate);
record!(User, "user", DeskErrors::UnknownUser);

pub(crate) fn add<T: Record>(list: &mut Vec<T>, item: T) -> Result<(), DeskErrors> {
    if list.iter().any(|x| x.key() == item.key()) {
        return Err(DeskErrors::DuplicateId {
            kind: T::KIND,
            id: item.key().to_string(),
        });
    }
    list.push(item);
    Ok(())
}

fn find_mut<'a, T: Record>(list: &'a mut [T], id: &str) -> Result<&'a mut T, DeskErrors> {
    list.iter_mut()
        .find(|x| x.key() == id)
        .ok_or_else(|| T::unknown(id.to_string()))
}

fn replace<T: Record>(list: &mut [T], item: T) -> Result<(), DeskErrors> {
    let slot = find_mut(list, item.key())?;
    *slot = item;
    Ok(())
}

fn remove<T: Record>(list: &mut Vec<T>, id: &str) -> Result<(), DeskErrors> {
    let idx = list
        .iter()
        .position(|x| x.key() == id)
        .ok_or_else(|| T::unknown(id.to_string()))?;
    list.remove(idx);
    Ok(())
}
