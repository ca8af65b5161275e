//! Waypost - headless session driver
//!
//! Runs a session without a renderer: a simulated GPS fix and asset fetch
//! feed a viewer that pans across the anchors. Useful for checking
//! placement and hover behavior from a terminal.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;

use waypost::assets::{AssetData, FetchFn, FetchFuture};
use waypost::core::logging;
use waypost::core::viewer::ViewerPose;
use waypost::geo::{GeoFix, LocalTangentPlane};
use waypost::math::Aabb;
use waypost::scene::MeshBounds;
use waypost::session::{ArSession, SessionConfig};

const FRAMES: u64 = 600;
const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SessionConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };

    // Stand-in fetch: a real host downloads and parses a model here and
    // reports its mesh bounds.
    let fetch: FetchFn = Arc::new(|url, progress| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(80)).await;
            progress.report(0.5);
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok(AssetData {
                url,
                meshes: vec![MeshBounds {
                    name: "mesh".into(),
                    bounds: Aabb::cube(4.0),
                }],
            })
        }) as FetchFuture
    });

    let mut session = ArSession::new(config, LocalTangentPlane::new(), fetch);

    session.request_permission();
    session.handle_permission(Ok(()));
    session.handle_gps_update(GeoFix::new(51.5, -0.1));

    let mut last_hover = None;
    for frame in 0..FRAMES {
        // pan a full circle over the run
        let angle = frame as f32 / FRAMES as f32 * std::f32::consts::TAU;
        let mut pose = ViewerPose::new(Vec3::ZERO);
        pose.look_at(Vec3::new(angle.sin() * 10.0, 0.0, -angle.cos() * 10.0));
        session.set_viewer_pose(pose);

        let report = session.tick();

        if report.hovered != last_hover {
            match report.hovered {
                Some(anchor) => log::info!(
                    "frame {}: hovering {:?} at {:.1} units",
                    report.frame,
                    anchor,
                    report.hover_distance.unwrap_or_default()
                ),
                None => log::info!("frame {}: hover lost", report.frame),
            }
            last_hover = report.hovered;
        }

        std::thread::sleep(FRAME_TIME);
    }

    let report = session.tick();
    log::info!(
        "session done: {} anchors, {} pending loads, {} failed",
        report.anchor_count,
        report.pending_loads,
        report.failed_loads
    );
}
