//! Readiness join for placement
//!
//! Placement needs two independent events: the first GPS fix, and each
//! content slot becoming ready (immediately for primitives, after an async
//! load for models). The two arrive in either order; the gate holds
//! whichever side came first and releases a slot exactly when both are
//! present.

use crate::geo::GeoFix;
use crate::scene::node::ContentBlueprint;

/// One prepared slot waiting behind the gate.
#[derive(Clone, Debug)]
pub struct ReadySlot {
    /// Index into the session's placement offset list.
    pub slot: usize,
    pub blueprint: ContentBlueprint,
}

/// Joins "first fix captured" with "content prepared".
pub struct PlacementGate {
    fix: Option<GeoFix>,
    ready: Vec<ReadySlot>,
}

impl PlacementGate {
    pub fn new() -> Self {
        Self {
            fix: None,
            ready: Vec::new(),
        }
    }

    /// Record the first fix. Returns `true` if this call captured it;
    /// every later fix is ignored.
    pub fn set_fix(&mut self, fix: GeoFix) -> bool {
        if self.fix.is_some() {
            log::debug!("ignoring subsequent GPS fix {:?}", fix);
            return false;
        }
        log::info!(
            "first GPS fix captured: lat {:.6}, lon {:.6}",
            fix.latitude,
            fix.longitude
        );
        self.fix = Some(fix);
        true
    }

    /// The captured fix, if any.
    pub fn fix(&self) -> Option<&GeoFix> {
        self.fix.as_ref()
    }

    /// Queue a prepared slot behind the gate.
    pub fn offer(&mut self, slot: usize, blueprint: ContentBlueprint) {
        self.ready.push(ReadySlot { slot, blueprint });
    }

    /// Release everything that is ready, if the fix is present.
    ///
    /// Drains the ready queue; calling again without new offers returns
    /// `None`, so each slot is released exactly once no matter how many
    /// trigger points drive the drain.
    pub fn take_ready(&mut self) -> Option<(GeoFix, Vec<ReadySlot>)> {
        let fix = self.fix?;
        if self.ready.is_empty() {
            return None;
        }
        Some((fix, std::mem::take(&mut self.ready)))
    }

    /// Number of slots waiting behind the gate.
    pub fn waiting(&self) -> usize {
        self.ready.len()
    }
}

impl Default for PlacementGate {
    fn default() -> Self {
        Self::new()
    }
}
