// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use chrono::NaiveDate;

pub type RegionId = String;
pub type ChamberId = String;
pub type FactionId = String;
pub type PeriodId = String;
pub type DelegateId = String;
pub type UserId = String;

/// The voting intention recorded for a delegate.
///
/// Tags that are not recognized when reading data are kept as `Other`
/// and weigh nothing in the projection.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum VoteStatus {
    Certain,
    Undecided,
    Risky,
    Negative,
    Other(String),
}

impl VoteStatus {
    pub fn from_tag(tag: &str) -> VoteStatus {
        match tag {
            "CERTAIN" => VoteStatus::Certain,
            "UNDECIDED" => VoteStatus::Undecided,
            "RISKY" => VoteStatus::Risky,
            "NEGATIVE" => VoteStatus::Negative,
            x => VoteStatus::Other(x.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            VoteStatus::Certain => "CERTAIN",
            VoteStatus::Undecided => "UNDECIDED",
            VoteStatus::Risky => "RISKY",
            VoteStatus::Negative => "NEGATIVE",
            VoteStatus::Other(x) => x.as_str(),
        }
    }
}

/// Advisory only: nothing in this crate checks roles.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum UserRole {
    Admin,
    Strategy,
    Manager,
    Auditor,
}

impl UserRole {
    pub fn from_tag(tag: &str) -> Option<UserRole> {
        match tag {
            "ADMIN" => Some(UserRole::Admin),
            "STRATEGY" => Some(UserRole::Strategy),
            "MANAGER" => Some(UserRole::Manager),
            "AUDITOR" => Some(UserRole::Auditor),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Strategy => "STRATEGY",
            UserRole::Manager => "MANAGER",
            UserRole::Auditor => "AUDITOR",
        }
    }
}

/// The visibility boundary of a user.
///
/// `Unrecognized` covers any scope that could not be resolved when reading
/// the data (unknown tag, or a region/chamber scope without an id). It sees
/// nothing.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Scope {
    Global,
    Region(RegionId),
    Chamber(ChamberId),
    Unrecognized(String),
}

impl Scope {
    /// Builds a scope from its tag and the optional target id.
    pub fn from_parts(tag: &str, scope_id: Option<&str>) -> Scope {
        match (tag, scope_id) {
            ("GLOBAL", _) => Scope::Global,
            ("REGION", Some(id)) => Scope::Region(id.to_string()),
            ("CHAMBER", Some(id)) => Scope::Chamber(id.to_string()),
            (x, _) => Scope::Unrecognized(x.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Scope::Global => "GLOBAL",
            Scope::Region(_) => "REGION",
            Scope::Chamber(_) => "CHAMBER",
            Scope::Unrecognized(x) => x.as_str(),
        }
    }

    pub fn target_id(&self) -> Option<&str> {
        match self {
            Scope::Region(id) | Scope::Chamber(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub description: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Chamber {
    pub id: ChamberId,
    pub name: String,
    pub city: String,
    pub region_id: Option<RegionId>,
    pub total_members: u32,
    pub total_delegates: u32,
    pub voted_delegates_count: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_main_competitor: bool,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ElectionPeriod {
    pub id: PeriodId,
    pub year: i32,
    pub label: String,
    pub is_active: bool,
    pub total_delegates: u32,
}

/// One historical tally cell. Unique per (period, chamber, faction).
#[derive(PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub id: String,
    pub period_id: PeriodId,
    pub year: i32,
    pub chamber_id: ChamberId,
    pub faction_id: FactionId,
    pub votes: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Delegate {
    pub id: DelegateId,
    pub name: String,
    pub chamber_id: ChamberId,
    pub status: VoteStatus,
    pub last_contact_date: NaiveDate,
    pub assigned_manager: String,
    pub notes: String,
    /// Expected in [0, 100]. The projection does not check it.
    pub risk_score: f64,
    pub current_group: FactionId,
    pub previous_group: Option<FactionId>,
    pub tendency: String,
    pub election_year: i32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub scope: Scope,
    pub is_active: bool,
}

// ******** Configuration **********

/// The coefficients of the weighted vote projection.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectionRules {
    pub certain_coefficient: f64,
    pub undecided_coefficient: f64,
    pub risky_coefficient: f64,
    /// Used for NEGATIVE and for any unrecognized status.
    pub negative_coefficient: f64,
    /// Contacts at most this many days old are recent.
    pub recent_contact_days: i64,
    /// Contacts at most this many days old (and not recent) are aging.
    pub aging_contact_days: i64,
    pub recent_coefficient: f64,
    pub aging_coefficient: f64,
    pub stale_coefficient: f64,
    pub risk_divisor: f64,
    pub target_votes: f64,
}

impl ProjectionRules {
    pub const DEFAULT_RULES: ProjectionRules = ProjectionRules {
        certain_coefficient: 1.0,
        undecided_coefficient: 0.55,
        risky_coefficient: 0.25,
        negative_coefficient: 0.0,
        recent_contact_days: 30,
        aging_contact_days: 60,
        recent_coefficient: 1.0,
        aging_coefficient: 0.85,
        stale_coefficient: 0.65,
        risk_divisor: 150.0,
        target_votes: 450.0,
    };
}

impl Default for ProjectionRules {
    fn default() -> Self {
        ProjectionRules::DEFAULT_RULES
    }
}

// ******** Errors *********

/// Reasons for the desk to refuse a change. The state is left untouched.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DeskErrors {
    DuplicateId { kind: &'static str, id: String },
    UnknownRegion(RegionId),
    UnknownChamber(ChamberId),
    UnknownFaction(FactionId),
    UnknownPeriod(PeriodId),
    UnknownDelegate(DelegateId),
    UnknownUser(UserId),
}

impl Error for DeskErrors {}

impl Display for DeskErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeskErrors::DuplicateId { kind, id } => write!(f, "{} {} already exists", kind, id),
            DeskErrors::UnknownRegion(id) => write!(f, "unknown region {}", id),
            DeskErrors::UnknownChamber(id) => write!(f, "unknown chamber {}", id),
            DeskErrors::UnknownFaction(id) => write!(f, "unknown faction {}", id),
            DeskErrors::UnknownPeriod(id) => write!(f, "unknown election period {}", id),
            DeskErrors::UnknownDelegate(id) => write!(f, "unknown delegate {}", id),
            DeskErrors::UnknownUser(id) => write!(f, "unknown user {}", id),
        }
    }
}
