//! AR session - the context object owning all per-session state
//!
//! One [`ArSession`] per AR view. The host wires it to the outside world:
//! GPS fixes via [`ArSession::handle_gps_update`], sensor permission via
//! [`ArSession::handle_permission`], the viewer pose via
//! [`ArSession::set_viewer_pose`], and one [`ArSession::tick`] per rendered
//! frame. Everything else (placement, registration, hover, animation)
//! happens inside the tick.

pub mod config;

pub use config::SessionConfig;

use serde::Serialize;

use crate::anchor::{AnchorId, ContentRegistry, GeoAnchorPlacer, PlacementGate};
use crate::assets::{AssetLoader, FetchFn, LoadCoordinator};
use crate::core::time::FrameTimer;
use crate::core::viewer::ViewerPose;
use crate::geo::{GeoFix, Projector};
use crate::interact::{HoverDetector, HoverHit, PoseAnimator};
use crate::scene::graph::ContentGraph;

/// Sensor-permission state machine.
///
/// Denial is not fatal: the session runs degraded, with the viewer
/// orientation simply never updating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PermissionState {
    NotRequested,
    Pending,
    Granted,
    Denied,
}

/// Per-frame summary for the renderer and debug overlays.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    /// The hovered anchor, if the crosshair hit one this frame.
    pub hovered: Option<AnchorId>,
    /// Distance to the hovered instance.
    pub hover_distance: Option<f32>,
    /// Instances placed and registered so far.
    pub anchor_count: usize,
    /// Content slots still waiting on asset loads.
    pub pending_loads: usize,
    /// Content slots that failed permanently.
    pub failed_loads: usize,
}

/// A single AR session.
pub struct ArSession<P: Projector> {
    config: SessionConfig,
    projector: P,
    graph: ContentGraph,
    registry: ContentRegistry,
    gate: PlacementGate,
    placer: GeoAnchorPlacer,
    coordinator: LoadCoordinator,
    loader: AssetLoader,
    hover: HoverDetector,
    animator: PoseAnimator,
    viewer: ViewerPose,
    timer: FrameTimer,
    permission: PermissionState,
}

impl<P: Projector> ArSession<P> {
    /// Create a session with its own asset-loading runtime.
    pub fn new(config: SessionConfig, projector: P, fetch: FetchFn) -> Self {
        let loader = AssetLoader::new(fetch, config.max_concurrent_loads);
        Self::with_loader(config, projector, loader)
    }

    /// Create a session on the current tokio runtime.
    pub fn new_with_current_runtime(config: SessionConfig, projector: P, fetch: FetchFn) -> Self {
        let loader = AssetLoader::new_with_current_runtime(fetch, config.max_concurrent_loads);
        Self::with_loader(config, projector, loader)
    }

    fn with_loader(config: SessionConfig, projector: P, mut loader: AssetLoader) -> Self {
        let mut gate = PlacementGate::new();
        let mut coordinator = LoadCoordinator::new(&config.offsets);
        coordinator.offer_primitives(&mut gate);
        coordinator.request_models(&mut loader);

        let placer = GeoAnchorPlacer::new(
            config.offsets.clone(),
            config.distance_multiplier,
            config.height_offset,
        );
        let hover = HoverDetector::new(config.hover);
        let animator = PoseAnimator::new(config.animator);

        Self {
            config,
            projector,
            graph: ContentGraph::new(),
            registry: ContentRegistry::new(),
            gate,
            placer,
            coordinator,
            loader,
            hover,
            animator,
            viewer: ViewerPose::default(),
            timer: FrameTimer::new(),
            permission: PermissionState::NotRequested,
        }
    }

    /// Feed a GPS fix. Only the first is consumed; it triggers placement of
    /// everything already prepared.
    pub fn handle_gps_update(&mut self, fix: GeoFix) {
        self.gate.set_fix(fix);
        self.placer.place_ready(
            &mut self.gate,
            &mut self.graph,
            &mut self.registry,
            &mut self.projector,
        );
    }

    /// Mark the sensor-permission request as in flight.
    pub fn request_permission(&mut self) {
        if self.permission == PermissionState::NotRequested {
            self.permission = PermissionState::Pending;
        }
    }

    /// Resolve the sensor-permission request.
    pub fn handle_permission(&mut self, result: std::result::Result<(), String>) {
        match result {
            Ok(()) => {
                self.permission = PermissionState::Granted;
                log::info!("orientation permission granted");
            }
            Err(reason) => {
                self.permission = PermissionState::Denied;
                log::error!("{}", crate::core::Error::PermissionDenied(reason));
            }
        }
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Update the viewer pose from the orientation/location services.
    ///
    /// Ignored until permission is granted; the session runs degraded with
    /// the viewer frozen at its initial pose.
    pub fn set_viewer_pose(&mut self, pose: ViewerPose) {
        if self.permission != PermissionState::Granted {
            log::debug!("ignoring viewer pose update before permission grant");
            return;
        }
        self.viewer = pose;
    }

    pub fn viewer(&self) -> &ViewerPose {
        &self.viewer
    }

    pub fn graph(&self) -> &ContentGraph {
        &self.graph
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Advance the session by one frame.
    ///
    /// Drains asset completions, places whatever became ready, runs hover
    /// detection against pre-animation poses, then animates every anchor.
    pub fn tick(&mut self) -> FrameReport {
        self.timer.tick();
        let frame = self.timer.frame_count();

        for event in self.loader.poll_events() {
            self.coordinator.handle_event(event, &mut self.gate);
        }
        self.placer.place_ready(
            &mut self.gate,
            &mut self.graph,
            &mut self.registry,
            &mut self.projector,
        );

        self.graph.propagate_transforms();
        let hover: Option<HoverHit> = self.hover.detect(&self.graph, &self.registry, &self.viewer);
        self.animator.step(
            &mut self.graph,
            &mut self.registry,
            &self.viewer,
            hover.map(|h| h.anchor),
            frame,
            self.timer.delta_secs(),
        );

        FrameReport {
            frame,
            hovered: hover.map(|h| h.anchor),
            hover_distance: hover.map(|h| h.distance),
            anchor_count: self.registry.len(),
            pending_loads: self.coordinator.pending_count(),
            failed_loads: self.coordinator.failed_count(),
        }
    }
}
