use log::{debug, warn};

pub use crate::config::*;
use crate::state::{add, clamp_risk, DeskState};

/// A builder for assembling a desk state from separate record lists.
///
/// Every section starts from the seed data and can be replaced as a whole.
/// References between sections are checked when building.
///
/// ```
/// pub use delegate_desk::builder::Builder;
/// pub use delegate_desk::ProjectionRules;
/// # use delegate_desk::DeskErrors;
///
/// let (state, rules) = Builder::new(&ProjectionRules::DEFAULT_RULES)
///     .delegates(Vec::new())?
///     .build()?;
/// assert!(state.delegates.is_empty());
/// assert_eq!(rules.target_votes, 450.0);
///
/// # Ok::<(), DeskErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ProjectionRules,
    pub(crate) _state: DeskState,
}

fn unique<T: crate::state::Record>(items: Vec<T>) -> Result<Vec<T>, DeskErrors> {
    let mut res: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        add(&mut res, item)?;
    }
    Ok(res)
}

impl Builder {
    pub fn new(rules: &ProjectionRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _state: DeskState::seeded(),
        }
    }

    pub fn regions(mut self, regions: Vec<Region>) -> Result<Builder, DeskErrors> {
        self._state.regions = unique(regions)?;
        Ok(self)
    }

    pub fn chambers(mut self, chambers: Vec<Chamber>) -> Result<Builder, DeskErrors> {
        self._state.chambers = unique(chambers)?;
        Ok(self)
    }

    pub fn factions(mut self, factions: Vec<Faction>) -> Result<Builder, DeskErrors> {
        self._state.factions = unique(factions)?;
        Ok(self)
    }

    /// Only the first active period stays active.
    pub fn periods(mut self, periods: Vec<ElectionPeriod>) -> Result<Builder, DeskErrors> {
        let mut seen_active = false;
        let periods: Vec<ElectionPeriod> = periods
            .into_iter()
            .map(|p| {
                if p.is_active && seen_active {
                    warn!("periods: {} is also marked active, deactivating it", p.id);
                    ElectionPeriod {
                        is_active: false,
                        ..p
                    }
                } else {
                    seen_active |= p.is_active;
                    p
                }
            })
            .collect();
        self._state.periods = unique(periods)?;
        Ok(self)
    }

    /// Rows sharing a (period, chamber, faction) key collapse into the first
    /// one, which takes the votes of the last.
    pub fn results(mut self, results: Vec<ElectionResult>) -> Result<Builder, DeskErrors> {
        let mut res: Vec<ElectionResult> = Vec::with_capacity(results.len());
        for r in results {
            let existing = res.iter_mut().find(|x| {
                x.period_id == r.period_id
                    && x.chamber_id == r.chamber_id
                    && x.faction_id == r.faction_id
            });
            match existing {
                Some(x) => {
                    debug!("results: {} merged into {}", r.id, x.id);
                    x.votes = r.votes;
                    x.year = r.year;
                }
                None => res.push(r),
            }
        }
        self._state.results = res;
        Ok(self)
    }

    /// Risk scores are clamped into [0, 100].
    pub fn delegates(mut self, delegates: Vec<Delegate>) -> Result<Builder, DeskErrors> {
        let delegates = delegates
            .into_iter()
            .map(|d| Delegate {
                risk_score: clamp_risk(d.risk_score),
                ..d
            })
            .collect();
        self._state.delegates = unique(delegates)?;
        Ok(self)
    }

    pub fn users(mut self, users: Vec<User>) -> Result<Builder, DeskErrors> {
        self._state.users = unique(users)?;
        Ok(self)
    }

    pub fn build(self) -> Result<(DeskState, ProjectionRules), DeskErrors> {
        let s = &self._state;
        for c in s.chambers.iter() {
            if let Some(rid) = c.region_id.as_deref() {
                if !s.regions.iter().any(|r| r.id == rid) {
                    return Err(DeskErrors::UnknownRegion(rid.to_string()));
                }
            }
        }
        for d in s.delegates.iter() {
            if !s.chambers.iter().any(|c| c.id == d.chamber_id) {
                return Err(DeskErrors::UnknownChamber(d.chamber_id.clone()));
            }
        }
        debug!(
            "build: {} regions, {} chambers, {} factions, {} periods, {} results, {} delegates, {} users",
            s.regions.len(),
            s.chambers.len(),
            s.factions.len(),
            s.periods.len(),
            s.results.len(),
            s.delegates.len(),
            s.users.len()
        );
        Ok((self._state, self._rules))
    }
}
