//! Canvas view state: zoom, scroll, and client↔canvas transforms.
//!
//! All editing math runs in canvas space (unscaled virtual-canvas
//! coordinates). Pointer events arrive in client space; the view is the
//! single place that converts between the two, so drop placement, drag
//! deltas, and marquee rectangles all agree under any zoom/scroll.

use crate::model::Point;
use crate::wire::ProjectSettings;

pub const MIN_ZOOM: u32 = 50;
pub const MAX_ZOOM: u32 = 200;
pub const ZOOM_STEP: u32 = 10;

/// Where the scrollable canvas viewport sits in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Per-session view state. Never persisted; zoom is seeded from project
/// settings on load.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasView {
    pub zoom_percent: u32,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub viewport: ViewportRect,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl CanvasView {
    pub fn new(viewport: ViewportRect) -> Self {
        Self {
            zoom_percent: 100,
            scroll_left: 0.0,
            scroll_top: 0.0,
            viewport,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
        }
    }

    pub fn from_settings(settings: &ProjectSettings, viewport: ViewportRect) -> Self {
        let mut view = Self::new(viewport);
        view.zoom_percent = settings.zoom_percent.clamp(MIN_ZOOM, MAX_ZOOM);
        view.canvas_width = settings.canvas_width;
        view.canvas_height = settings.canvas_height;
        view
    }

    /// Zoom as a scale factor (100% → 1.0).
    pub fn scale(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    /// Client point → canvas-space point:
    /// `(client − viewport origin + scroll) / scale`.
    pub fn to_canvas_space(&self, client_x: f64, client_y: f64) -> Point {
        let scale = self.scale();
        Point {
            x: (client_x - self.viewport.left + self.scroll_left) / scale,
            y: (client_y - self.viewport.top + self.scroll_top) / scale,
        }
    }

    /// Exact inverse of `to_canvas_space`.
    pub fn to_client_space(&self, point: Point) -> (f64, f64) {
        let scale = self.scale();
        (
            point.x * scale - self.scroll_left + self.viewport.left,
            point.y * scale - self.scroll_top + self.viewport.top,
        )
    }

    /// Change zoom, keeping the canvas point under the viewport center
    /// fixed: capture the center point pre-zoom, then
    /// `scroll = point·scale′ − viewport_dim/2`, clamped ≥ 0.
    pub fn set_zoom(&mut self, zoom_percent: u32) {
        let zoom_percent = zoom_percent.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom_percent == self.zoom_percent {
            return;
        }
        let anchor = self.to_canvas_space(
            self.viewport.left + self.viewport.width / 2.0,
            self.viewport.top + self.viewport.height / 2.0,
        );
        self.zoom_percent = zoom_percent;
        let scale = self.scale();
        self.scroll_left = (anchor.x * scale - self.viewport.width / 2.0).max(0.0);
        self.scroll_top = (anchor.y * scale - self.viewport.height / 2.0).max(0.0);
    }

    /// One wheel notch: ±10, clamped to [50, 200].
    pub fn zoom_by_notches(&mut self, notches: i32) {
        let delta = notches * ZOOM_STEP as i32;
        let target = (self.zoom_percent as i32 + delta).clamp(MIN_ZOOM as i32, MAX_ZOOM as i32);
        self.set_zoom(target as u32);
    }

    /// Scroll so the virtual canvas center sits at the viewport center.
    /// Used on load.
    pub fn center(&mut self) {
        let scale = self.scale();
        self.scroll_left = (self.canvas_width * scale - self.viewport.width).max(0.0) / 2.0;
        self.scroll_top = (self.canvas_height * scale - self.viewport.height).max(0.0) / 2.0;
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_left = (self.scroll_left + dx).max(0.0);
        self.scroll_top = (self.scroll_top + dy).max(0.0);
    }
}
