//! Mission orchestration: deciding when to show a tour and resuming progress.
//!
//! Thin glue over the tour machine and the progress store: it never renders
//! anything itself, and all persistence flows through the injected
//! [`ProgressStore`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::error::{WaypostError, WaypostResult};
use crate::mission::store::{self, MissionRecord, ProgressStore};
use crate::tour::lifecycle::{ExitHandle, ExitResult};
use crate::tour::machine::{CallbackHooks, Tour};
use crate::tour::step::Sequence;

/// Mission name used when the host does not name one.
pub const DEFAULT_MISSION: &str = "default";

/// Host-supplied decision points for mission orchestration.
///
/// The prompts may block on user input; the engine treats them as suspension
/// points and only proceeds on a `true` answer.
pub trait MissionHooks {
    /// Identifier of the current site/page.
    fn site_id(&mut self) -> String;

    /// Offer a fresh tutorial; `false` skips the run.
    fn offer_tutorial(&mut self) -> bool {
        true
    }

    /// Offer to continue an unfinished tour; `false` skips the run.
    fn offer_continue(&mut self) -> bool {
        true
    }

    /// Confirm an `Escape` press; `false` keeps the run showing.
    fn confirm_escape(&mut self, progress: usize) -> bool {
        let _ = progress;
        true
    }

    /// Progress pass-through after persistence.
    fn on_progress(&mut self, progress: usize) {
        let _ = progress;
    }

    /// Exit pass-through after persistence.
    fn on_exit(&mut self, result: &ExitResult) {
        let _ = result;
    }
}

/// Hooks pinned to a fixed site id, accepting every prompt.
#[derive(Clone, Debug)]
pub struct StaticSite(pub String);

impl MissionHooks for StaticSite {
    fn site_id(&mut self) -> String {
        self.0.clone()
    }
}

type SharedStore = Rc<RefCell<Box<dyn ProgressStore>>>;
type SharedHooks = Rc<RefCell<Box<dyn MissionHooks>>>;

/// Resumable-tour orchestrator bound to one tour instance and one store.
pub struct MissionRunner {
    tour: Tour,
    store: SharedStore,
    hooks: SharedHooks,
    mission: String,
}

impl MissionRunner {
    /// Create a runner over a tour, a store and mission hooks.
    pub fn new(
        tour: Tour,
        store: impl ProgressStore + 'static,
        hooks: impl MissionHooks + 'static,
    ) -> Self {
        Self {
            tour,
            store: Rc::new(RefCell::new(Box::new(store))),
            hooks: Rc::new(RefCell::new(Box::new(hooks))),
            mission: DEFAULT_MISSION.to_string(),
        }
    }

    /// The wrapped tour, for host event dispatch.
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Mutable access to the wrapped tour.
    pub fn tour_mut(&mut self) -> &mut Tour {
        &mut self.tour
    }

    /// The currently active mission name.
    pub fn mission(&self) -> &str {
        &self.mission
    }

    /// Persist a sequence for a mission and load it into the tour.
    pub fn prepare(
        &mut self,
        sequence: Sequence,
        mission: &str,
        progress: usize,
    ) -> WaypostResult<()> {
        let site = self.hooks.borrow_mut().site_id();
        self.store_mission(&site, mission, sequence.clone(), progress)?;
        self.tour.load(sequence, progress);
        self.mission = mission.to_string();
        Ok(())
    }

    /// Run a mission: resume-aware, prompt-gated.
    ///
    /// Returns `Ok(None)` when the host declined the prompt or the mission is
    /// already finished; [`WaypostError::MissingSequence`] when nothing is
    /// stored for this mission/site.
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, mission: &str) -> WaypostResult<Option<ExitHandle>> {
        let site = self.hooks.borrow_mut().site_id();
        let record = self
            .get_mission(mission)?
            .ok_or_else(|| {
                WaypostError::missing_sequence(format!(
                    "mission '{mission}' on site '{site}'"
                ))
            })?;

        if !Self::record_unfinished(&record) {
            return Ok(None);
        }
        let show = if record.progress == 0 {
            self.hooks.borrow_mut().offer_tutorial()
        } else {
            self.hooks.borrow_mut().offer_continue()
        };
        if !show {
            return Ok(None);
        }

        self.mission = mission.to_string();
        self.attach_persistence(&site, mission);
        self.tour.load(record.sequence, record.progress);
        Ok(Some(self.tour.fire()))
    }

    /// Whether a mission exists and is not yet consumed to the end.
    pub fn has_unfinished(&mut self, mission: &str) -> WaypostResult<bool> {
        Ok(self
            .get_mission(mission)?
            .is_some_and(|r| Self::record_unfinished(&r)))
    }

    /// All missions stored for the current site.
    pub fn missions(&mut self) -> WaypostResult<Vec<MissionRecord>> {
        let site = self.hooks.borrow_mut().site_id();
        let sites = store::read_sites(self.store.borrow().as_ref())?;
        Ok(sites.get(&site).cloned().unwrap_or_default())
    }

    /// The stored record for `mission` on the current site, if any.
    pub fn get_mission(&mut self, mission: &str) -> WaypostResult<Option<MissionRecord>> {
        let site = self.hooks.borrow_mut().site_id();
        let sites = store::read_sites(self.store.borrow().as_ref())?;
        Ok(sites
            .get(&site)
            .and_then(|missions| missions.iter().find(|r| r.mission == mission))
            .cloned())
    }

    /// Persist a new progress value for `mission` on the current site.
    pub fn set_progress(&mut self, progress: usize, mission: &str) -> WaypostResult<()> {
        let site = self.hooks.borrow_mut().site_id();
        Self::persist_progress(&self.store, &site, mission, progress)
    }

    /// Rewind a mission to the start.
    pub fn reset(&mut self, mission: &str) -> WaypostResult<()> {
        self.set_progress(0, mission)
    }

    /// Delete one mission from the current site.
    pub fn remove_mission(&mut self, mission: &str) -> WaypostResult<()> {
        let site = self.hooks.borrow_mut().site_id();
        let mut store = self.store.borrow_mut();
        let mut sites = store::read_sites(store.as_ref())?;
        if let Some(missions) = sites.get_mut(&site) {
            missions.retain(|r| r.mission != mission);
        }
        store::write_sites(store.as_mut(), &sites)
    }

    /// Delete everything stored for the current site.
    pub fn remove_site(&mut self) -> WaypostResult<()> {
        let site = self.hooks.borrow_mut().site_id();
        let mut store = self.store.borrow_mut();
        let mut sites = store::read_sites(store.as_ref())?;
        sites.remove(&site);
        store::write_sites(store.as_mut(), &sites)
    }

    fn record_unfinished(record: &MissionRecord) -> bool {
        record.progress == 0 || record.progress < record.sequence.len()
    }

    fn store_mission(
        &mut self,
        site: &str,
        mission: &str,
        sequence: Sequence,
        progress: usize,
    ) -> WaypostResult<()> {
        let mut store = self.store.borrow_mut();
        let mut sites = store::read_sites(store.as_ref())?;
        let missions = sites.entry(site.to_string()).or_default();
        match missions.iter_mut().find(|r| r.mission == mission) {
            Some(record) => {
                record.sequence = sequence;
                record.progress = progress;
            }
            None => missions.push(MissionRecord {
                mission: mission.to_string(),
                sequence,
                progress,
            }),
        }
        store::write_sites(store.as_mut(), &sites)
    }

    /// Wire tour hooks so every progress/exit event is persisted before the
    /// host hooks observe it.
    fn attach_persistence(&mut self, site: &str, mission: &str) {
        let store_p = Rc::clone(&self.store);
        let hooks_p = Rc::clone(&self.hooks);
        let site_p = site.to_string();
        let mission_p = mission.to_string();
        let store_e = Rc::clone(&self.store);
        let hooks_e = Rc::clone(&self.hooks);
        let site_e = site.to_string();
        let mission_e = mission.to_string();
        let hooks_c = Rc::clone(&self.hooks);
        self.tour.set_hooks(Box::new(CallbackHooks {
            progress: Some(Box::new(move |progress| {
                if let Err(e) = Self::persist_progress(&store_p, &site_p, &mission_p, progress) {
                    tracing::warn!(error = %e, "failed to persist progress");
                }
                hooks_p.borrow_mut().on_progress(progress);
            })),
            exit: Some(Box::new(move |result| {
                if let Err(e) =
                    Self::persist_progress(&store_e, &site_e, &mission_e, result.progress)
                {
                    tracing::warn!(error = %e, "failed to persist exit progress");
                }
                hooks_e.borrow_mut().on_exit(result);
            })),
            escape: Some(Box::new(move |progress| {
                hooks_c.borrow_mut().confirm_escape(progress)
            })),
        }));
    }

    fn persist_progress(
        store: &SharedStore,
        site: &str,
        mission: &str,
        progress: usize,
    ) -> WaypostResult<()> {
        let mut store = store.borrow_mut();
        let mut sites = store::read_sites(store.as_ref())?;
        let record = sites
            .get_mut(site)
            .and_then(|missions| missions.iter_mut().find(|r| r.mission == mission))
            .ok_or_else(|| {
                WaypostError::missing_sequence(format!("mission '{mission}' on site '{site}'"))
            })?;
        record.progress = progress;
        store::write_sites(store.as_mut(), &sites)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mission/runner.rs"]
mod tests;
