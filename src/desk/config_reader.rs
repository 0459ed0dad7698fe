use crate::desk::io_common::*;
use crate::desk::*;

use log::{info, warn};
use std::fs;

use delegate_desk::builder::Builder;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawRegion {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawChamber {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    #[serde(rename = "regionId")]
    pub region_id: Option<String>,
    #[serde(rename = "totalMembers")]
    pub total_members: Option<JSValue>,
    #[serde(rename = "totalDelegates")]
    pub total_delegates: Option<JSValue>,
    #[serde(rename = "votedDelegatesCount")]
    pub voted_delegates_count: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawFaction {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "isMainCompetitor")]
    pub is_main_competitor: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawPeriod {
    pub id: String,
    pub year: Option<JSValue>,
    pub label: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    #[serde(rename = "totalDelegates")]
    pub total_delegates: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    pub id: String,
    #[serde(rename = "periodId")]
    pub period_id: String,
    pub year: Option<JSValue>,
    #[serde(rename = "chamberId")]
    pub chamber_id: String,
    #[serde(rename = "factionId")]
    pub faction_id: String,
    pub votes: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawDelegate {
    pub id: String,
    pub name: String,
    #[serde(rename = "chamberId")]
    pub chamber_id: String,
    pub status: String,
    #[serde(rename = "lastContactDate")]
    pub last_contact_date: String,
    #[serde(rename = "assignedManager")]
    pub assigned_manager: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "riskScore")]
    pub risk_score: Option<JSValue>,
    #[serde(rename = "currentGroup")]
    pub current_group: String,
    #[serde(rename = "previousGroup")]
    pub previous_group: Option<String>,
    pub tendency: Option<String>,
    #[serde(rename = "electionYear")]
    pub election_year: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RawUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    #[serde(rename = "scopeType")]
    pub scope_type: String,
    #[serde(rename = "scopeId")]
    pub scope_id: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

/// Overrides of the projection coefficients. Unset fields keep their default.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProjection {
    #[serde(rename = "certainCoefficient")]
    pub certain_coefficient: Option<JSValue>,
    #[serde(rename = "undecidedCoefficient")]
    pub undecided_coefficient: Option<JSValue>,
    #[serde(rename = "riskyCoefficient")]
    pub risky_coefficient: Option<JSValue>,
    #[serde(rename = "negativeCoefficient")]
    pub negative_coefficient: Option<JSValue>,
    #[serde(rename = "recentContactDays")]
    pub recent_contact_days: Option<JSValue>,
    #[serde(rename = "agingContactDays")]
    pub aging_contact_days: Option<JSValue>,
    #[serde(rename = "recentCoefficient")]
    pub recent_coefficient: Option<JSValue>,
    #[serde(rename = "agingCoefficient")]
    pub aging_coefficient: Option<JSValue>,
    #[serde(rename = "staleCoefficient")]
    pub stale_coefficient: Option<JSValue>,
    #[serde(rename = "riskDivisor")]
    pub risk_divisor: Option<JSValue>,
    #[serde(rename = "targetVotes")]
    pub target_votes: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    pub regions: Option<Vec<RawRegion>>,
    pub chambers: Option<Vec<RawChamber>>,
    pub factions: Option<Vec<RawFaction>>,
    pub periods: Option<Vec<RawPeriod>>,
    pub results: Option<Vec<RawResult>>,
    pub delegates: Option<Vec<RawDelegate>>,
    pub users: Option<Vec<RawUser>>,
    pub projection: Option<RawProjection>,
}

/// Field replacements in an `updateDelegate` action.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPatch {
    pub name: Option<String>,
    #[serde(rename = "chamberId")]
    pub chamber_id: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "lastContactDate")]
    pub last_contact_date: Option<String>,
    #[serde(rename = "assignedManager")]
    pub assigned_manager: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "riskScore")]
    pub risk_score: Option<JSValue>,
    #[serde(rename = "currentGroup")]
    pub current_group: Option<String>,
    #[serde(rename = "previousGroup")]
    pub previous_group: Option<String>,
    pub tendency: Option<String>,
    #[serde(rename = "electionYear")]
    pub election_year: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionSpec {
    AddRegion(RawRegion),
    UpdateRegion(RawRegion),
    DeleteRegion {
        id: String,
    },
    AddChamber(RawChamber),
    UpdateChamber(RawChamber),
    DeleteChamber {
        id: String,
    },
    AssignChamberRegion {
        #[serde(rename = "chamberId")]
        chamber_id: String,
        #[serde(rename = "regionId")]
        region_id: Option<String>,
    },
    AddFaction(RawFaction),
    UpdateFaction(RawFaction),
    DeleteFaction {
        id: String,
    },
    AddPeriod(RawPeriod),
    UpdatePeriod(RawPeriod),
    SetActivePeriod {
        id: String,
    },
    RecordResult {
        #[serde(rename = "periodId")]
        period_id: String,
        #[serde(rename = "chamberId")]
        chamber_id: String,
        #[serde(rename = "factionId")]
        faction_id: String,
        votes: Option<JSValue>,
    },
    AddDelegate(RawDelegate),
    UpdateDelegate {
        #[serde(rename = "delegateId")]
        delegate_id: String,
        patch: RawPatch,
    },
    MarkCertain {
        #[serde(rename = "delegateId")]
        delegate_id: String,
    },
    EscalateRisk {
        #[serde(rename = "delegateId")]
        delegate_id: String,
    },
    DeleteDelegate {
        id: String,
    },
    AddUser(RawUser),
    UpdateUser(RawUser),
    DeleteUser {
        id: String,
    },
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &str) -> DeskResult<T> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn read_desk_config(path: &str) -> DeskResult<DeskConfig> {
    info!("Attempting to read desk file {:?}", path);
    read_json_file(path)
}

pub fn read_actions(path: &str) -> DeskResult<Vec<ActionSpec>> {
    info!("Attempting to read actions file {:?}", path);
    read_json_file(path)
}

pub fn read_summary(path: &str) -> DeskResult<JSValue> {
    read_json_file(path)
}

impl RawRegion {
    fn validate(&self) -> Region {
        Region {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

impl RawChamber {
    fn validate(&self) -> Chamber {
        Chamber {
            id: self.id.clone(),
            name: self.name.clone(),
            city: self.city.clone().unwrap_or_default(),
            region_id: match self.region_id.clone() {
                Some(x) if x.is_empty() => None,
                x => x,
            },
            total_members: read_js_count(&self.total_members, "totalMembers"),
            total_delegates: read_js_count(&self.total_delegates, "totalDelegates"),
            voted_delegates_count: read_js_count(
                &self.voted_delegates_count,
                "votedDelegatesCount",
            ),
        }
    }
}

impl RawFaction {
    fn validate(&self) -> Faction {
        Faction {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            color: self.color.clone().unwrap_or_default(),
            is_main_competitor: self.is_main_competitor.unwrap_or(false),
        }
    }
}

impl RawPeriod {
    fn validate(&self) -> ElectionPeriod {
        let year = read_js_year(&self.year, "year");
        ElectionPeriod {
            id: self.id.clone(),
            year,
            label: self.label.clone().unwrap_or_else(|| year.to_string()),
            is_active: self.is_active.unwrap_or(false),
            total_delegates: read_js_count(&self.total_delegates, "totalDelegates"),
        }
    }
}

impl RawResult {
    fn validate(&self) -> ElectionResult {
        ElectionResult {
            id: self.id.clone(),
            period_id: self.period_id.clone(),
            year: read_js_year(&self.year, "year"),
            chamber_id: self.chamber_id.clone(),
            faction_id: self.faction_id.clone(),
            votes: read_js_count(&self.votes, "votes"),
        }
    }
}

impl RawDelegate {
    fn validate(&self) -> DeskResult<Delegate> {
        Ok(Delegate {
            id: self.id.clone(),
            name: self.name.clone(),
            chamber_id: self.chamber_id.clone(),
            status: VoteStatus::from_tag(self.status.as_str()),
            last_contact_date: parse_date(&self.last_contact_date)?,
            assigned_manager: self.assigned_manager.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
            risk_score: read_js_float(&self.risk_score, "riskScore"),
            current_group: self.current_group.clone(),
            previous_group: self.previous_group.clone(),
            tendency: self.tendency.clone().unwrap_or_default(),
            election_year: read_js_year(&self.election_year, "electionYear"),
        })
    }
}

impl RawUser {
    fn validate(&self) -> DeskResult<User> {
        let role = UserRole::from_tag(self.role.as_str()).context(InvalidTagSnafu {
            field: "role",
            tag: self.role.clone(),
        })?;
        let scope = Scope::from_parts(self.scope_type.as_str(), self.scope_id.as_deref());
        if let Scope::Unrecognized(_) = scope {
            warn!(
                "user {}: scope {:?} ({:?}) is not recognized, the user will see nothing",
                self.id, self.scope_type, self.scope_id
            );
        }
        Ok(User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone().unwrap_or_default(),
            role,
            scope,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl RawPatch {
    fn validate(&self) -> DeskResult<DelegatePatch> {
        Ok(DelegatePatch {
            name: self.name.clone(),
            chamber_id: self.chamber_id.clone(),
            status: match self.status.as_deref() {
                Some(s) => Some(known_status(VoteStatus::from_tag(s))?),
                None => None,
            },
            last_contact_date: match self.last_contact_date.as_deref() {
                Some(s) => Some(parse_date(s)?),
                None => None,
            },
            assigned_manager: self.assigned_manager.clone(),
            notes: self.notes.clone(),
            risk_score: self
                .risk_score
                .as_ref()
                .map(|_| read_js_float(&self.risk_score, "riskScore")),
            current_group: self.current_group.clone(),
            previous_group: self.previous_group.clone(),
            tendency: self.tendency.clone(),
            election_year: self
                .election_year
                .as_ref()
                .map(|_| read_js_year(&self.election_year, "electionYear")),
        })
    }
}

/// Actions only accept the four known statuses.
fn known_status(status: VoteStatus) -> DeskResult<VoteStatus> {
    match status {
        VoteStatus::Other(tag) => InvalidTagSnafu {
            field: "status",
            tag,
        }
        .fail(),
        x => Ok(x),
    }
}

impl RawProjection {
    fn validate(&self) -> ProjectionRules {
        let d = ProjectionRules::DEFAULT_RULES;
        let float = |x: &Option<JSValue>, field: &str, default: f64| match x {
            Some(_) => read_js_float(x, field),
            None => default,
        };
        let days = |x: &Option<JSValue>, field: &str, default: i64| match x {
            Some(_) => read_js_year(x, field) as i64,
            None => default,
        };
        ProjectionRules {
            certain_coefficient: float(
                &self.certain_coefficient,
                "certainCoefficient",
                d.certain_coefficient,
            ),
            undecided_coefficient: float(
                &self.undecided_coefficient,
                "undecidedCoefficient",
                d.undecided_coefficient,
            ),
            risky_coefficient: float(&self.risky_coefficient, "riskyCoefficient", d.risky_coefficient),
            negative_coefficient: float(
                &self.negative_coefficient,
                "negativeCoefficient",
                d.negative_coefficient,
            ),
            recent_contact_days: days(
                &self.recent_contact_days,
                "recentContactDays",
                d.recent_contact_days,
            ),
            aging_contact_days: days(
                &self.aging_contact_days,
                "agingContactDays",
                d.aging_contact_days,
            ),
            recent_coefficient: float(
                &self.recent_coefficient,
                "recentCoefficient",
                d.recent_coefficient,
            ),
            aging_coefficient: float(&self.aging_coefficient, "agingCoefficient", d.aging_coefficient),
            stale_coefficient: float(&self.stale_coefficient, "staleCoefficient", d.stale_coefficient),
            risk_divisor: float(&self.risk_divisor, "riskDivisor", d.risk_divisor),
            target_votes: float(&self.target_votes, "targetVotes", d.target_votes),
        }
    }
}

/// Builds the desk: every section present in the file replaces the seed data.
pub fn validate_desk(config: &DeskConfig) -> DeskResult<(DeskState, ProjectionRules)> {
    let rules = config
        .projection
        .as_ref()
        .map(|p| p.validate())
        .unwrap_or_default();
    if rules.risk_divisor == 0.0 || rules.target_votes == 0.0 {
        whatever!("riskDivisor and targetVotes may not be zero: {:?}", rules);
    }
    let mut builder = Builder::new(&rules);
    if let Some(xs) = &config.regions {
        builder = builder
            .regions(xs.iter().map(|x| x.validate()).collect())
            .context(InvalidDeskSnafu {})?;
    }
    if let Some(xs) = &config.chambers {
        builder = builder
            .chambers(xs.iter().map(|x| x.validate()).collect())
            .context(InvalidDeskSnafu {})?;
    }
    if let Some(xs) = &config.factions {
        builder = builder
            .factions(xs.iter().map(|x| x.validate()).collect())
            .context(InvalidDeskSnafu {})?;
    }
    if let Some(xs) = &config.periods {
        builder = builder
            .periods(xs.iter().map(|x| x.validate()).collect())
            .context(InvalidDeskSnafu {})?;
    }
    if let Some(xs) = &config.results {
        builder = builder
            .results(xs.iter().map(|x| x.validate()).collect())
            .context(InvalidDeskSnafu {})?;
    }
    if let Some(xs) = &config.delegates {
        let delegates = xs
            .iter()
            .map(|x| x.validate())
            .collect::<DeskResult<Vec<Delegate>>>()?;
        builder = builder.delegates(delegates).context(InvalidDeskSnafu {})?;
    }
    if let Some(xs) = &config.users {
        let users = xs
            .iter()
            .map(|x| x.validate())
            .collect::<DeskResult<Vec<User>>>()?;
        builder = builder.users(users).context(InvalidDeskSnafu {})?;
    }
    builder.build().context(InvalidDeskSnafu {})
}

impl ActionSpec {
    /// The library action. Delegate updates are performed on behalf of `actor`.
    pub fn validate(&self, actor: &str) -> DeskResult<Action> {
        let res = match self {
            ActionSpec::AddRegion(x) => Action::AddRegion(x.validate()),
            ActionSpec::UpdateRegion(x) => Action::UpdateRegion(x.validate()),
            ActionSpec::DeleteRegion { id } => Action::DeleteRegion(id.clone()),
            ActionSpec::AddChamber(x) => Action::AddChamber(x.validate()),
            ActionSpec::UpdateChamber(x) => Action::UpdateChamber(x.validate()),
            ActionSpec::DeleteChamber { id } => Action::DeleteChamber(id.clone()),
            ActionSpec::AssignChamberRegion {
                chamber_id,
                region_id,
            } => Action::AssignChamberRegion {
                chamber_id: chamber_id.clone(),
                region_id: region_id.clone(),
            },
            ActionSpec::AddFaction(x) => Action::AddFaction(x.validate()),
            ActionSpec::UpdateFaction(x) => Action::UpdateFaction(x.validate()),
            ActionSpec::DeleteFaction { id } => Action::DeleteFaction(id.clone()),
            ActionSpec::AddPeriod(x) => Action::AddPeriod(x.validate()),
            ActionSpec::UpdatePeriod(x) => Action::UpdatePeriod(x.validate()),
            ActionSpec::SetActivePeriod { id } => Action::SetActivePeriod(id.clone()),
            ActionSpec::RecordResult {
                period_id,
                chamber_id,
                faction_id,
                votes,
            } => Action::RecordResult {
                period_id: period_id.clone(),
                chamber_id: chamber_id.clone(),
                faction_id: faction_id.clone(),
                votes: read_js_count(votes, "votes"),
            },
            ActionSpec::AddDelegate(x) => {
                let mut d = x.validate()?;
                d.status = known_status(d.status)?;
                Action::AddDelegate(d)
            }
            ActionSpec::UpdateDelegate { delegate_id, patch } => Action::UpdateDelegate {
                actor: actor.to_string(),
                delegate_id: delegate_id.clone(),
                patch: patch.validate()?,
            },
            ActionSpec::MarkCertain { delegate_id } => Action::MarkCertain {
                actor: actor.to_string(),
                delegate_id: delegate_id.clone(),
            },
            ActionSpec::EscalateRisk { delegate_id } => Action::EscalateRisk {
                actor: actor.to_string(),
                delegate_id: delegate_id.clone(),
            },
            ActionSpec::DeleteDelegate { id } => Action::DeleteDelegate(id.clone()),
            ActionSpec::AddUser(x) => Action::AddUser(x.validate()?),
            ActionSpec::UpdateUser(x) => Action::UpdateUser(x.validate()?),
            ActionSpec::DeleteUser { id } => Action::DeleteUser(id.clone()),
        };
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_desk_is_the_seed() {
        let config: DeskConfig = serde_json::from_value(json!({})).unwrap();
        let (state, rules) = validate_desk(&config).unwrap();
        assert_eq!(state, DeskState::seeded());
        assert_eq!(rules, ProjectionRules::DEFAULT_RULES);
    }

    #[test]
    fn sections_replace_the_seed() {
        let config: DeskConfig = serde_json::from_value(json!({
            "regions": [{"id": "r1", "name": "North"}],
            "chambers": [
                {"id": "c1", "name": "North Chamber", "city": "Trabzon", "regionId": "r1",
                 "totalMembers": "n/a", "totalDelegates": "12"},
                {"id": "c2", "name": "Free Chamber", "regionId": ""}
            ],
            "delegates": [
                {"id": "d1", "name": "A", "chamberId": "c1", "status": "WAVERING",
                 "lastContactDate": "2025-01-02", "riskScore": "130", "currentGroup": "f-01"}
            ],
            "users": [
                {"id": "u1", "name": "Field", "role": "MANAGER", "scopeType": "CHAMBER", "scopeId": "c1"},
                {"id": "u2", "name": "Lost", "role": "AUDITOR", "scopeType": "REGION"}
            ],
            "projection": {"targetVotes": 12, "undecidedCoefficient": "0.5"}
        }))
        .unwrap();
        let (state, rules) = validate_desk(&config).unwrap();
        assert_eq!(state.regions.len(), 1);
        assert_eq!(state.chambers[0].total_members, 0);
        assert_eq!(state.chambers[0].total_delegates, 12);
        assert_eq!(state.chambers[1].region_id, None);
        let d = &state.delegates[0];
        assert_eq!(d.status, VoteStatus::Other("WAVERING".to_string()));
        assert_eq!(d.risk_score, 100.0);
        assert_eq!(state.users[0].scope, Scope::Chamber("c1".to_string()));
        assert_eq!(state.users[1].scope, Scope::Unrecognized("REGION".to_string()));
        // Untouched sections come from the seed.
        assert_eq!(state.factions.len(), 4);
        assert_eq!(rules.target_votes, 12.0);
        assert_eq!(rules.undecided_coefficient, 0.5);
        assert_eq!(rules.risky_coefficient, 0.25);
    }

    #[test]
    fn dangling_delegate_is_rejected() {
        let config: DeskConfig = serde_json::from_value(json!({
            "delegates": [
                {"id": "d1", "name": "A", "chamberId": "ch-nowhere", "status": "CERTAIN",
                 "lastContactDate": "2025-01-02", "currentGroup": "f-01"}
            ]
        }))
        .unwrap();
        let res = validate_desk(&config);
        assert!(matches!(res, Err(DeskError::InvalidDesk { .. })));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let config: DeskConfig = serde_json::from_value(json!({
            "users": [{"id": "u1", "name": "X", "role": "OWNER", "scopeType": "GLOBAL"}]
        }))
        .unwrap();
        let res = validate_desk(&config);
        assert!(matches!(res, Err(DeskError::InvalidTag { field: "role", .. })));
    }

    #[test]
    fn actions_are_read() {
        let specs: Vec<ActionSpec> = serde_json::from_value(json!([
            {"type": "setActivePeriod", "id": "ep-24"},
            {"type": "recordResult", "periodId": "ep-24", "chamberId": "ch-s7",
             "factionId": "f-01", "votes": "40"},
            {"type": "markCertain", "delegateId": "3"},
            {"type": "updateDelegate", "delegateId": "2",
             "patch": {"tendency": "Close", "riskScore": 20, "lastContactDate": "2025-05-30"}},
            {"type": "assignChamberRegion", "chamberId": "ch-s66", "regionId": null},
            {"type": "addRegion", "id": "reg-08", "name": "Trakya"}
        ]))
        .unwrap();
        let actions = specs
            .iter()
            .map(|s| s.validate("u-2"))
            .collect::<DeskResult<Vec<Action>>>()
            .unwrap();
        assert_eq!(actions[0], Action::SetActivePeriod("ep-24".to_string()));
        assert_eq!(
            actions[1],
            Action::RecordResult {
                period_id: "ep-24".to_string(),
                chamber_id: "ch-s7".to_string(),
                faction_id: "f-01".to_string(),
                votes: 40,
            }
        );
        assert_eq!(
            actions[2],
            Action::MarkCertain {
                actor: "u-2".to_string(),
                delegate_id: "3".to_string(),
            }
        );
        match &actions[3] {
            Action::UpdateDelegate { actor, patch, .. } => {
                assert_eq!(actor, "u-2");
                assert_eq!(patch.tendency.as_deref(), Some("Close"));
                assert_eq!(patch.risk_score, Some(20.0));
                assert_eq!(patch.status, None);
                assert!(patch.last_contact_date.is_some());
            }
            x => panic!("unexpected action {:?}", x),
        }
        assert_eq!(
            actions[4],
            Action::AssignChamberRegion {
                chamber_id: "ch-s66".to_string(),
                region_id: None,
            }
        );
        match &actions[5] {
            Action::AddRegion(r) => assert_eq!(r.description, ""),
            x => panic!("unexpected action {:?}", x),
        }
    }

    #[test]
    fn actions_reject_unknown_status() {
        let specs: Vec<ActionSpec> = serde_json::from_value(json!([
            {"type": "updateDelegate", "delegateId": "1", "patch": {"status": "CERTIAN"}},
            {"type": "addDelegate", "id": "d9", "name": "A", "chamberId": "ch-s7",
             "status": "WAVERING", "lastContactDate": "2025-05-01", "currentGroup": "f-01"},
            {"type": "updateDelegate", "delegateId": "1", "patch": {"status": "RISKY"}}
        ]))
        .unwrap();
        for spec in &specs[..2] {
            match spec.validate("u-1") {
                Err(DeskError::InvalidTag { field, .. }) => assert_eq!(field, "status"),
                x => panic!("unexpected result {:?}", x),
            }
        }
        match specs[2].validate("u-1").unwrap() {
            Action::UpdateDelegate { patch, .. } => assert_eq!(patch.status, Some(VoteStatus::Risky)),
            x => panic!("unexpected action {:?}", x),
        }
    }

    #[test]
    fn unknown_action_type_fails_to_parse() {
        let res: Result<Vec<ActionSpec>, _> =
            serde_json::from_value(json!([{"type": "launchRockets"}]));
        assert!(res.is_err());
    }
}
