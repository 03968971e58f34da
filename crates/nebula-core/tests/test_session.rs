mod common;

use std::io::Write;

use tempfile::NamedTempFile;

use nebula_core::config::SessionConfig;
use nebula_core::geometry::{point, size, Point};
use nebula_core::session::{EventOutcome, InputEvent, Session};
use nebula_core::sync::SyncPolicy;
use nebula_core::viewport::ViewportId;

use common::{image, session_with};

#[test]
fn test_config_file_drives_session() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[zoom]
min = 0.5
max = 4.0

[sync]
zoom_locked = true
pan_locked = false

[input]
scroll_sensitivity = 0.01
"#
    )
    .unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let config = SessionConfig::from_toml_str(&text).unwrap();
    let mut session = Session::new(config).unwrap();
    let id = session
        .add_image(image(100, 100, None), size(100.0, 100.0))
        .unwrap();

    session.set_zoom(id, 0.0001).unwrap();
    assert_eq!(session.viewport(id).unwrap().zoom(), 0.5);
    session.set_zoom(id, 1000.0).unwrap();
    assert_eq!(session.viewport(id).unwrap().zoom(), 4.0);
    assert!(!session.sync_policy().pan_locked);
}

#[test]
fn test_native_zoom_clamped_by_limits() {
    let mut config = SessionConfig::default();
    config.zoom.max = 0.2;
    let mut session = Session::new(config).unwrap();
    let id = session
        .add_image(image(10, 10, None), size(10.0, 10.0))
        .unwrap();
    assert_eq!(session.viewport(id).unwrap().zoom(), 0.2);
}

#[test]
fn test_fit_to_view_is_broadcast() {
    let (mut session, ids) = session_with(&[(1280, 960, None), (640, 480, Some(0.5))]);
    session.fit_to_view(ids[0]).unwrap();
    let a = session.viewport(ids[0]).unwrap();
    let b = session.viewport(ids[1]).unwrap();
    assert_eq!(a.zoom(), 2.0);
    assert_eq!(b.zoom(), a.zoom());
    assert_eq!(b.pan(), a.pan());
}

#[test]
fn test_zoom_out_then_in_restores_zoom() {
    let (mut session, ids) = session_with(&[(100, 100, None), (100, 100, None)]);
    session.zoom_out().unwrap();
    session.zoom_in().unwrap();
    for id in ids {
        let zoom = session.viewport(id).unwrap().zoom();
        // 1/0.8 then 1/1.2 magnification
        assert!((zoom - 1.0 / 0.96).abs() < 1e-12, "zoom = {zoom}");
    }
}

#[test]
fn test_unsynced_viewport_zooms_on_its_own_in_zoom_all() {
    let (mut session, ids) = session_with(&[(100, 100, None), (100, 100, None)]);
    session.leave_sync(ids[1]).unwrap();
    session.zoom_all(2.0).unwrap();
    assert_eq!(session.viewport(ids[0]).unwrap().zoom(), 0.5);
    assert_eq!(session.viewport(ids[1]).unwrap().zoom(), 0.5);
    session.reset_zoom().unwrap();
    assert_eq!(session.viewport(ids[1]).unwrap().zoom(), 1.0);
}

#[test]
fn test_events_parse_from_toml() {
    #[derive(serde::Deserialize)]
    struct Script {
        event: Vec<InputEvent>,
    }

    let script: Script = toml::from_str(
        r#"
[[event]]
kind = "pointer_move"
viewport = 0
position = { x = 10.0, y = 20.0 }

[[event]]
kind = "scroll"
viewport = 1
position = { x = 0.0, y = 0.0 }
delta = -120.0

[[event]]
kind = "drag"
viewport = 0
delta = { x = 3.0, y = 4.0 }

[[event]]
kind = "click"
viewport = 1
position = { x = 1.0, y = 1.0 }
"#,
    )
    .unwrap();

    assert_eq!(script.event.len(), 4);
    assert_eq!(
        script.event[0],
        InputEvent::PointerMove {
            viewport: ViewportId(0),
            position: point(10.0, 20.0)
        }
    );

    let (mut session, _) = session_with(&[(100, 100, None), (100, 100, None)]);
    let outcomes: Vec<EventOutcome> = script
        .event
        .into_iter()
        .map(|e| session.handle(e).unwrap())
        .collect();
    assert!(matches!(outcomes[3], EventOutcome::MarkerFixed(_)));
}

#[test]
fn test_snapshot_reports_every_viewport() {
    let (mut session, ids) = session_with(&[(800, 600, Some(2.0)), (400, 300, None)]);
    session
        .handle(InputEvent::Click {
            viewport: ids[1],
            position: point(12.0, 34.0),
        })
        .unwrap();
    session.leave_sync(ids[1]).unwrap();

    let snap = session.snapshot();
    assert_eq!(snap.viewports.len(), 2);
    assert_eq!(snap.markers.len(), 2);
    assert!(snap.viewports[0].synced);
    assert!(!snap.viewports[1].synced);
    assert_eq!(snap.viewports[0].pixel_width, 800);
    assert_eq!(snap.viewports[0].scale, 2.0);
    assert_eq!(snap.viewports[1].projected.len(), 2);
    assert_eq!(snap.viewports[0].pan, Point::ORIGIN);

    let text = toml::to_string(&snap).unwrap();
    assert!(text.contains("pixel_width"));
}

#[test]
fn test_zoom_in_reaches_every_viewport_without_zoom_lock() {
    let (mut session, ids) = session_with(&[(100, 100, None), (100, 100, Some(2.0))]);
    session.set_sync_policy(SyncPolicy::UNLOCKED).unwrap();
    session.zoom_in().unwrap();
    assert!((session.viewport(ids[0]).unwrap().zoom() - 1.0 / 1.2).abs() < 1e-12);
    assert!((session.viewport(ids[1]).unwrap().zoom() - 0.5 / 1.2).abs() < 1e-12);
}

#[test]
fn test_reset_zoom_reaches_every_viewport_under_pan_lock_only() {
    let (mut session, ids) = session_with(&[(100, 100, None), (100, 100, None)]);
    session
        .set_sync_policy(SyncPolicy {
            zoom_locked: false,
            pan_locked: true,
        })
        .unwrap();
    session.set_zoom(ids[1], 0.5).unwrap();
    assert_eq!(session.viewport(ids[0]).unwrap().zoom(), 1.0);

    session.reset_zoom().unwrap();
    for id in &ids {
        assert_eq!(session.viewport(*id).unwrap().zoom(), 1.0);
    }
    assert_eq!(
        session.viewport(ids[0]).unwrap().pan(),
        session.viewport(ids[1]).unwrap().pan()
    );
}

#[test]
fn test_extreme_scroll_clamps_instead_of_failing() {
    let (mut session, ids) = session_with(&[(100, 100, None), (100, 100, None)]);
    let zoomed_in = session
        .handle(InputEvent::Scroll {
            viewport: ids[0],
            position: point(50.0, 50.0),
            delta: 1.0e6,
        })
        .unwrap();
    assert_eq!(zoomed_in, EventOutcome::Zoomed { zoom: 0.01, synced: 1 });

    session
        .handle(InputEvent::Scroll {
            viewport: ids[1],
            position: point(10.0, 10.0),
            delta: -1.0e6,
        })
        .unwrap();
    for id in &ids {
        let vp = session.viewport(*id).unwrap();
        assert_eq!(vp.zoom(), 100.0);
        assert!(vp.pan().is_finite());
    }

    let rejected = session.handle(InputEvent::Scroll {
        viewport: ids[0],
        position: point(0.0, 0.0),
        delta: f64::NAN,
    });
    assert!(rejected.is_err());
    assert_eq!(session.viewport(ids[0]).unwrap().zoom(), 100.0);
}

#[test]
fn test_share_image_offset_registers_all_images() {
    let (mut session, ids) = session_with(&[(100, 100, None), (50, 50, Some(0.5)), (80, 80, None)]);
    session.set_image_offset(ids[1], point(-4.0, 12.0)).unwrap();
    session.share_image_offset(ids[1]).unwrap();
    for id in &ids {
        assert_eq!(
            session.viewport(*id).unwrap().image_logical_rect().min,
            point(-4.0, 12.0)
        );
    }
    assert_eq!(session.snapshot().viewports[2].offset, point(-4.0, 12.0));
    assert!(session
        .set_image_offset(ids[0], point(f64::INFINITY, 0.0))
        .is_err());
}
