//! Oscilloscope canvas rendered with tiny-skia

use std::path::Path;

use thiserror::Error;
use tiny_skia::{
    Color, LineCap, LineJoin, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::application::ports::ScopeSurface;
use crate::domain::audio::WaveformTrace;

/// Scope errors
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Invalid scope size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to encode scope snapshot: {0}")]
    Encode(String),

    #[error("Failed to write scope snapshot to {path}: {message}")]
    Write { path: String, message: String },
}

/// Phosphor green (57, 255, 20) at the given alpha
fn phosphor(alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(57, 255, 20, alpha);
    paint.anti_alias = true;
    paint
}

fn shade(alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, alpha);
    paint
}

/// Dims the previous frame, leaving a short trail
const FADE_ALPHA: u8 = 46;
/// Background painted by `clear`
const IDLE_ALPHA: u8 = 140;
const CENTER_LINE_ALPHA: u8 = 31;
const TRACE_ALPHA: u8 = 242;
const GLOW_ALPHA: u8 = 64;

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn polyline(points: &[(f32, f32)]) -> Option<SkPath> {
    let (&(x0, y0), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.finish()
}

/// Offscreen scope that keeps its last frame, so it can be snapshotted
pub struct PixmapScope {
    pixmap: Pixmap,
}

impl PixmapScope {
    pub fn new(width: u32, height: u32) -> Result<Self, ScopeError> {
        let pixmap = Pixmap::new(width, height).ok_or(ScopeError::InvalidSize { width, height })?;
        let mut scope = Self { pixmap };
        scope.clear();
        Ok(scope)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn full_rect(&self) -> Option<Rect> {
        Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        )
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ScopeError> {
        self.pixmap
            .encode_png()
            .map_err(|e| ScopeError::Encode(e.to_string()))
    }

    /// Write the current frame as a PNG
    pub fn save_png(&self, path: &Path) -> Result<(), ScopeError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).map_err(|e| ScopeError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl ScopeSurface for PixmapScope {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn draw(&mut self, trace: &WaveformTrace) {
        let Some(rect) = self.full_rect() else {
            return;
        };
        let identity = Transform::identity();
        self.pixmap.fill_rect(rect, &shade(FADE_ALPHA), identity, None);

        let width = self.pixmap.width() as f32;
        let mid = self.pixmap.height() as f32 / 2.0;
        if let Some(center) = polyline(&[(0.0, mid), (width, mid)]) {
            self.pixmap
                .stroke_path(&center, &phosphor(CENTER_LINE_ALPHA), &stroke(2.0), identity, None);
        }

        if let Some(wave) = polyline(&trace.points) {
            self.pixmap
                .stroke_path(&wave, &phosphor(TRACE_ALPHA), &stroke(3.0), identity, None);
            // Outer glow
            self.pixmap
                .stroke_path(&wave, &phosphor(GLOW_ALPHA), &stroke(10.0), identity, None);
        }
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        if let Some(rect) = self.full_rect() {
            self.pixmap
                .fill_rect(rect, &shade(IDLE_ALPHA), Transform::identity(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            PixmapScope::new(0, 160),
            Err(ScopeError::InvalidSize { width: 0, height: 160 })
        ));
    }

    #[test]
    fn cleared_scope_is_translucent_black() {
        let scope = PixmapScope::new(32, 16).unwrap();
        let px = scope.pixmap().pixel(5, 5).unwrap();
        assert_eq!(px.alpha(), IDLE_ALPHA);
        assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 0));
    }

    #[test]
    fn flat_trace_lights_the_center_row() {
        let mut scope = PixmapScope::new(64, 32).unwrap();
        let trace = WaveformTrace::from_window(&[0.0; 128], 64, 32);
        scope.draw(&trace);

        let center = scope.pixmap().pixel(32, 16).unwrap();
        assert!(center.green() > 150);
        assert!(center.green() > center.red());

        let corner = scope.pixmap().pixel(0, 0).unwrap();
        assert!(corner.green() < 10);
    }

    #[test]
    fn snapshot_is_png() {
        let scope = PixmapScope::new(8, 8).unwrap();
        let bytes = scope.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scope.png");
        PixmapScope::new(8, 8).unwrap().save_png(&path).unwrap();
        assert!(path.exists());
    }
}
