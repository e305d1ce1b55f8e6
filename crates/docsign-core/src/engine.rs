//! Overlay placement engine
//!
//! Owns the signature overlay's display-space rectangle and turns pointer
//! gestures into moves and corner resizes. The host reports the measured
//! size of the rendered page or image and forwards pointer events; after
//! every call the rect lies inside the last reported viewport and is at
//! least the configured minimum size.
//!
//! The engine holds no reference to any rendering surface, so it can be
//! driven from a UI event loop, a replayed gesture script, or a test.

use crate::geometry::{
    apply_resize, clip_to_viewport_bounds, enforce_min_size, fit_rect_to_viewport,
};
use serde::{Deserialize, Serialize};
use shared_types::{
    Delta, OverlayRect, Point, PointerTarget, ResizeHandle, ViewportBounds, DEFAULT_OVERLAY_RECT,
    MIN_OVERLAY_HEIGHT, MIN_OVERLAY_WIDTH,
};

/// Tunables for overlay placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub min_width: f64,
    pub min_height: f64,
    /// How far from a corner, in display pixels, a pointer-down still grabs
    /// that corner's handle
    pub handle_radius: f64,
    pub initial_rect: OverlayRect,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_width: MIN_OVERLAY_WIDTH,
            min_height: MIN_OVERLAY_HEIGHT,
            handle_radius: 8.0,
            initial_rect: DEFAULT_OVERLAY_RECT,
        }
    }
}

/// Transient state of an in-progress gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSession {
    /// Moving the whole overlay; the offset is where inside the overlay the
    /// pointer grabbed it
    Moving { pointer_offset: Delta },
    /// Resizing from one corner, relative to the rect at pointer-down
    Resizing {
        start_pointer: Point,
        start_rect: OverlayRect,
        handle: ResizeHandle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    Resizing(ResizeHandle),
}

#[derive(Debug, Clone)]
pub struct OverlayEngine {
    config: PlacementConfig,
    rect: OverlayRect,
    viewport: Option<ViewportBounds>,
    session: Option<DragSession>,
}

impl Default for OverlayEngine {
    fn default() -> Self {
        Self::new(PlacementConfig::default())
    }
}

impl OverlayEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            rect: config.initial_rect,
            viewport: None,
            session: None,
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn current_rect(&self) -> OverlayRect {
        self.rect
    }

    /// The last viewport reported by the host, if any
    pub fn viewport(&self) -> Option<ViewportBounds> {
        self.viewport
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    pub fn state(&self) -> GestureState {
        match self.session {
            None => GestureState::Idle,
            Some(DragSession::Moving { .. }) => GestureState::Dragging,
            Some(DragSession::Resizing { handle, .. }) => GestureState::Resizing(handle),
        }
    }

    /// Record the on-screen size of the document surface and pull the
    /// overlay back inside it. Called whenever the page, zoom, or window
    /// size changes.
    pub fn report_viewport(&mut self, bounds: ViewportBounds) {
        if !bounds.is_measurable() {
            tracing::warn!(?bounds, "ignoring unmeasurable viewport");
            return;
        }

        self.viewport = Some(bounds);
        let fitted = self.fit(self.rect, bounds);
        if fitted != self.rect {
            tracing::debug!(from = ?self.rect, to = ?fitted, "re-bounded overlay to new viewport");
        }
        self.commit(fitted, bounds);
    }

    /// Forget the measured viewport, e.g. when a different page is shown.
    /// The rect stays put; moves are ignored until the next report.
    pub fn invalidate_viewport(&mut self) {
        if self.viewport.take().is_some() {
            tracing::debug!(rect = ?self.rect, "viewport invalidated");
        }
    }

    /// What a pointer at `point` would grab. Handles sit above the body.
    pub fn hit_test(&self, point: Point) -> Option<PointerTarget> {
        if !point.is_finite() {
            return None;
        }

        let radius = self.config.handle_radius;
        let handle = ResizeHandle::ALL
            .into_iter()
            .map(|handle| (handle, handle.position_on(&self.rect).distance_to(point)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle);

        match handle {
            Some(handle) => Some(PointerTarget::Handle(handle)),
            None if self.rect.contains(point) => Some(PointerTarget::Body),
            None => None,
        }
    }

    /// Begin a gesture on an already-resolved target. A pointer-down while a
    /// gesture is active starts over from the current rect.
    pub fn pointer_down(&mut self, point: Point, target: PointerTarget) {
        if !point.is_finite() {
            tracing::warn!(?point, "ignoring non-finite pointer-down");
            return;
        }

        let session = match target {
            PointerTarget::Handle(handle) => DragSession::Resizing {
                start_pointer: point,
                start_rect: self.rect,
                handle,
            },
            PointerTarget::Body => DragSession::Moving {
                pointer_offset: point.delta_from(self.rect.origin()),
            },
        };

        tracing::debug!(?point, ?target, "gesture started");
        self.session = Some(session);
    }

    /// Hit-test `point` and begin whatever gesture it lands on. Returns the
    /// target, or `None` when the pointer missed the overlay.
    pub fn pointer_down_at(&mut self, point: Point) -> Option<PointerTarget> {
        let target = self.hit_test(point)?;
        self.pointer_down(point, target);
        Some(target)
    }

    /// Continue the active gesture against the last reported viewport.
    /// Returns whether the rect changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        let Some(viewport) = self.viewport else {
            tracing::warn!("pointer-move before any viewport was reported");
            return false;
        };
        if !point.is_finite() {
            tracing::warn!(?point, "ignoring non-finite pointer-move");
            return false;
        }

        let next = match session {
            DragSession::Moving { pointer_offset } => {
                let origin = point.offset_by(pointer_offset.negate());
                self.fit(self.rect.with_origin(origin), viewport)
            }
            DragSession::Resizing {
                start_pointer,
                start_rect,
                handle,
            } => {
                let delta = point.delta_from(start_pointer);
                let resized = apply_resize(start_rect, handle, delta);
                let floored =
                    enforce_min_size(resized, handle, self.config.min_width, self.config.min_height);
                let clipped = clip_to_viewport_bounds(floored, viewport);
                // Clipping against an edge can undercut the minimum when the
                // anchored corner itself sits near that edge
                self.fit(clipped, viewport)
            }
        };

        let changed = next != self.rect;
        self.commit(next, viewport);
        changed
    }

    /// Report a new viewport snapshot and continue the gesture against it
    pub fn pointer_move_within(&mut self, point: Point, viewport: ViewportBounds) -> bool {
        let before = self.rect;
        self.report_viewport(viewport);
        let moved = self.pointer_move(point);
        moved || before != self.rect
    }

    /// End the gesture, keeping the rect where the last move left it
    pub fn pointer_up(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(?session, rect = ?self.rect, "gesture ended");
        }
    }

    /// The pointer left the tracking area. Treated as pointer-up: the
    /// in-progress position is committed, not rolled back.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    fn fit(&self, rect: OverlayRect, viewport: ViewportBounds) -> OverlayRect {
        fit_rect_to_viewport(rect, viewport, self.config.min_width, self.config.min_height)
    }

    fn commit(&mut self, rect: OverlayRect, viewport: ViewportBounds) {
        debug_assert!(
            rect.satisfies_bounds(viewport, self.config.min_width, self.config.min_height),
            "overlay {:?} escaped viewport {:?}",
            rect,
            viewport
        );
        self.rect = rect;
    }
}
