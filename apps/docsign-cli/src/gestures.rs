//! Scripted pointer gestures
//!
//! A gesture script is a JSON array of events replayed against the signing
//! session in order, as a browser would deliver them:
//!
//! ```json
//! [
//!   {"type": "Down", "x": 150, "y": 120},
//!   {"type": "Move", "x": 420, "y": 610},
//!   {"type": "Up"},
//!   {"type": "Down", "x": 470, "y": 670, "target": "bottom-right"},
//!   {"type": "Move", "x": 520, "y": 690},
//!   {"type": "Leave"}
//! ]
//! ```

use anyhow::Context;
use docsign_core::{Point, PointerTarget, ResizeHandle, SigningSession, ViewportBounds};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GestureEvent {
    Viewport {
        width: f64,
        height: f64,
    },
    Down {
        x: f64,
        y: f64,
        /// Part of the overlay grabbed; hit-tested from the point when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<TargetName>,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetName {
    Body,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<TargetName> for PointerTarget {
    fn from(name: TargetName) -> Self {
        match name {
            TargetName::Body => PointerTarget::Body,
            TargetName::TopLeft => PointerTarget::Handle(ResizeHandle::TopLeft),
            TargetName::TopRight => PointerTarget::Handle(ResizeHandle::TopRight),
            TargetName::BottomLeft => PointerTarget::Handle(ResizeHandle::BottomLeft),
            TargetName::BottomRight => PointerTarget::Handle(ResizeHandle::BottomRight),
        }
    }
}

pub fn load_script<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<GestureEvent>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read gesture script: {}", path.display()))?;
    parse_script(&content)
}

pub fn parse_script(s: &str) -> anyhow::Result<Vec<GestureEvent>> {
    serde_json::from_str(s).context("Failed to parse gesture script")
}

/// Feed every event to the session. Returns how many pointer-downs missed
/// the overlay.
pub fn replay(session: &mut SigningSession, events: &[GestureEvent]) -> usize {
    let mut missed = 0;

    for event in events {
        match *event {
            GestureEvent::Viewport { width, height } => {
                session.report_viewport(ViewportBounds::new(width, height));
            }
            GestureEvent::Down { x, y, target } => {
                let point = Point::new(x, y);
                match target {
                    Some(name) => session.pointer_down(point, name.into()),
                    None => {
                        if session.pointer_down_at(point).is_none() {
                            tracing::warn!(x, y, "pointer-down missed the overlay");
                            missed += 1;
                        }
                    }
                }
            }
            GestureEvent::Move { x, y } => {
                session.pointer_move(Point::new(x, y));
            }
            GestureEvent::Up => session.pointer_up(),
            GestureEvent::Leave => session.pointer_leave(),
        }
    }

    tracing::debug!(events = events.len(), missed, rect = ?session.current_rect(), "replayed gestures");
    missed
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsign_core::{GestureState, OverlayRect, PlacementConfig, SourceDocument};
    use pretty_assertions::assert_eq;

    fn png_session() -> SigningSession {
        let page = image::RgbaImage::from_pixel(800, 600, image::Rgba([255, 255, 255, 255]));
        let mut png = std::io::Cursor::new(Vec::new());
        page.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let document = SourceDocument::load(Some("page.png"), png.into_inner()).unwrap();
        SigningSession::new(document, PlacementConfig::default())
    }

    #[test]
    fn test_parse_all_event_types() {
        let script = r#"[
            {"type": "Viewport", "width": 800, "height": 600},
            {"type": "Down", "x": 150, "y": 120},
            {"type": "Down", "x": 300, "y": 180, "target": "bottom-right"},
            {"type": "Move", "x": 420.5, "y": 610},
            {"type": "Up"},
            {"type": "Leave"}
        ]"#;

        let events = parse_script(script).unwrap();
        assert_eq!(
            events,
            vec![
                GestureEvent::Viewport {
                    width: 800.0,
                    height: 600.0
                },
                GestureEvent::Down {
                    x: 150.0,
                    y: 120.0,
                    target: None
                },
                GestureEvent::Down {
                    x: 300.0,
                    y: 180.0,
                    target: Some(TargetName::BottomRight)
                },
                GestureEvent::Move { x: 420.5, y: 610.0 },
                GestureEvent::Up,
                GestureEvent::Leave,
            ]
        );
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let err = parse_script(r#"[{"type": "Wheel", "delta": 3}]"#).unwrap_err();
        assert!(err.to_string().contains("gesture script"));
    }

    #[test]
    fn test_replay_drag_then_resize() {
        let mut session = png_session();
        let events = parse_script(
            r#"[
                {"type": "Viewport", "width": 800, "height": 600},
                {"type": "Down", "x": 150, "y": 120},
                {"type": "Move", "x": 250, "y": 220},
                {"type": "Up"},
                {"type": "Down", "x": 400, "y": 280, "target": "bottom-right"},
                {"type": "Move", "x": 450, "y": 300},
                {"type": "Leave"}
            ]"#,
        )
        .unwrap();

        let missed = replay(&mut session, &events);
        assert_eq!(missed, 0);
        assert_eq!(session.gesture_state(), GestureState::Idle);
        assert_eq!(session.current_rect(), OverlayRect::new(200.0, 200.0, 250.0, 100.0));
    }

    #[test]
    fn test_replay_counts_misses() {
        let mut session = png_session();
        let events = vec![
            GestureEvent::Viewport {
                width: 800.0,
                height: 600.0,
            },
            GestureEvent::Down {
                x: 10.0,
                y: 10.0,
                target: None,
            },
            GestureEvent::Move { x: 500.0, y: 500.0 },
        ];

        assert_eq!(replay(&mut session, &events), 1);
        assert_eq!(session.current_rect(), PlacementConfig::default().initial_rect);
    }
}
