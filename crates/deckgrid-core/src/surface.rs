#![forbid(unsafe_code)]

//! The presentation surface contract.
//!
//! A [`Surface`] is the external presentation document model: the thing that
//! actually creates shapes, text boxes, pictures, and tables on a slide. The
//! layout engine computes bounding boxes and forwards them here together with
//! an opaque [`ContentSpec`] of formatting parameters it never interprets.
//!
//! Collaborator failures are the surface's own error type and are propagated
//! to callers unchanged, never translated or swallowed.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Built-in auto-shape kinds a surface is expected to understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    Oval,
    Diamond,
    Triangle,
    Chevron,
}

/// An open, ordered key-value bag forwarded verbatim to the surface.
///
/// Keys the layout engine does not define (fonts, colors, text payloads, …)
/// pass through untouched; the surface alone gives them meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSpec(BTreeMap<String, String>);

impl ContentSpec {
    /// Create an empty spec.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returning the spec for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an entry.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the spec holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The external presentation document model consumed by the layout engine.
///
/// Implementations own all document state and I/O. The engine only ever
/// hands over finished absolute bounding boxes; `Handle` is whatever the
/// document model returns for a created object, stored back in the grid cell
/// that placed it.
pub trait Surface {
    /// Opaque handle to a created content object.
    type Handle;
    /// The surface's own failure type, surfaced to callers unchanged.
    type Error;

    /// Absolute slide dimensions.
    fn dimensions(&self) -> Size;

    /// The full slide region, anchored at the origin.
    fn frame(&self) -> Rect {
        let size = self.dimensions();
        Rect::from_size(size.width, size.height)
    }

    /// Create an auto-shape covering `bounds`.
    fn create_shape(
        &mut self,
        kind: ShapeKind,
        bounds: Rect,
        spec: &ContentSpec,
    ) -> Result<Self::Handle, Self::Error>;

    /// Create a text box covering `bounds`.
    fn create_text_box(
        &mut self,
        bounds: Rect,
        spec: &ContentSpec,
    ) -> Result<Self::Handle, Self::Error>;

    /// Create a picture from `path` covering `bounds`.
    fn create_picture(
        &mut self,
        path: &Path,
        bounds: Rect,
        spec: &ContentSpec,
    ) -> Result<Self::Handle, Self::Error>;

    /// Create a `rows` x `cols` table covering `bounds`.
    fn create_table(
        &mut self,
        rows: usize,
        cols: usize,
        bounds: Rect,
        spec: &ContentSpec,
    ) -> Result<Self::Handle, Self::Error>;
}

#[cfg(any(test, feature = "test-helpers"))]
pub use recording::{CreatedContent, CreatedKind, RecordingError, RecordingSurface};

/// In-memory fake surface for tests.
#[cfg(any(test, feature = "test-helpers"))]
pub mod recording {
    use std::fmt;
    use std::path::{Path, PathBuf};

    use super::{ContentSpec, ShapeKind, Surface};
    use crate::geometry::{Rect, Size};

    /// What a [`RecordingSurface`] call created.
    #[derive(Debug, Clone, PartialEq)]
    pub enum CreatedKind {
        Shape(ShapeKind),
        TextBox,
        Picture(PathBuf),
        Table { rows: usize, cols: usize },
    }

    /// One recorded creation call.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreatedContent {
        pub handle: u64,
        pub kind: CreatedKind,
        pub bounds: Rect,
        pub spec: ContentSpec,
    }

    /// Scripted failure raised by [`RecordingSurface::fail_next`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordingError(pub String);

    impl fmt::Display for RecordingError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "scripted surface failure: {}", self.0)
        }
    }

    impl std::error::Error for RecordingError {}

    /// A surface that records every creation call instead of rendering.
    ///
    /// Handles are monotonically increasing integers; an armed
    /// [`fail_next`](RecordingSurface::fail_next) makes the next creation
    /// call fail once, for exercising error propagation.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSurface {
        size: Size,
        next_handle: u64,
        created: Vec<CreatedContent>,
        fail_next: Option<String>,
    }

    impl RecordingSurface {
        /// A surface with the given slide dimensions.
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                size: Size::new(width, height),
                ..Self::default()
            }
        }

        /// A 16:9 surface at the conventional 13.333" x 7.5".
        pub fn widescreen() -> Self {
            Self::new(40.0 / 3.0, 7.5)
        }

        /// Arm a one-shot failure for the next creation call.
        pub fn fail_next(&mut self, message: impl Into<String>) {
            self.fail_next = Some(message.into());
        }

        /// Everything created so far, in call order.
        pub fn created(&self) -> &[CreatedContent] {
            &self.created
        }

        fn record(
            &mut self,
            kind: CreatedKind,
            bounds: Rect,
            spec: &ContentSpec,
        ) -> Result<u64, RecordingError> {
            if let Some(message) = self.fail_next.take() {
                return Err(RecordingError(message));
            }
            let handle = self.next_handle;
            self.next_handle += 1;
            self.created.push(CreatedContent {
                handle,
                kind,
                bounds,
                spec: spec.clone(),
            });
            Ok(handle)
        }
    }

    impl Surface for RecordingSurface {
        type Handle = u64;
        type Error = RecordingError;

        fn dimensions(&self) -> Size {
            self.size
        }

        fn create_shape(
            &mut self,
            kind: ShapeKind,
            bounds: Rect,
            spec: &ContentSpec,
        ) -> Result<u64, RecordingError> {
            self.record(CreatedKind::Shape(kind), bounds, spec)
        }

        fn create_text_box(
            &mut self,
            bounds: Rect,
            spec: &ContentSpec,
        ) -> Result<u64, RecordingError> {
            self.record(CreatedKind::TextBox, bounds, spec)
        }

        fn create_picture(
            &mut self,
            path: &Path,
            bounds: Rect,
            spec: &ContentSpec,
        ) -> Result<u64, RecordingError> {
            self.record(CreatedKind::Picture(path.to_path_buf()), bounds, spec)
        }

        fn create_table(
            &mut self,
            rows: usize,
            cols: usize,
            bounds: Rect,
            spec: &ContentSpec,
        ) -> Result<u64, RecordingError> {
            self.record(CreatedKind::Table { rows, cols }, bounds, spec)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::recording::{CreatedKind, RecordingSurface};
    use super::{ContentSpec, ShapeKind, Surface};
    use crate::geometry::Rect;

    #[test]
    fn content_spec_builder_and_lookup() {
        let spec = ContentSpec::new()
            .with("font_size", "24")
            .with("text", "Title");
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("text"), Some("Title"));
        assert_eq!(spec.get("missing"), None);
        // Entries iterate in key order.
        let keys: Vec<_> = spec.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["font_size", "text"]);
    }

    #[test]
    fn content_spec_set_replaces() {
        let mut spec = ContentSpec::new().with("align", "left");
        spec.set("align", "center");
        assert_eq!(spec.get("align"), Some("center"));
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn recording_surface_records_in_order() {
        let mut surface = RecordingSurface::widescreen();
        let bounds = Rect::new(1.0, 1.0, 4.0, 3.0);
        let spec = ContentSpec::new();

        let a = surface.create_text_box(bounds, &spec).unwrap();
        let b = surface
            .create_shape(ShapeKind::Oval, bounds, &spec)
            .unwrap();
        let c = surface
            .create_picture(Path::new("logo.png"), bounds, &spec)
            .unwrap();
        let d = surface.create_table(2, 3, bounds, &spec).unwrap();

        assert_eq!([a, b, c, d], [0, 1, 2, 3]);
        let created = surface.created();
        assert_eq!(created.len(), 4);
        assert_eq!(created[0].kind, CreatedKind::TextBox);
        assert_eq!(created[1].kind, CreatedKind::Shape(ShapeKind::Oval));
        assert_eq!(created[3].kind, CreatedKind::Table { rows: 2, cols: 3 });
        assert_eq!(created[2].bounds, bounds);
    }

    #[test]
    fn fail_next_fires_once() {
        let mut surface = RecordingSurface::widescreen();
        surface.fail_next("disk full");
        let spec = ContentSpec::new();
        let bounds = Rect::from_size(1.0, 1.0);

        let err = surface.create_text_box(bounds, &spec).unwrap_err();
        assert_eq!(err.0, "disk full");
        assert!(surface.created().is_empty());

        // The next call succeeds again.
        assert!(surface.create_text_box(bounds, &spec).is_ok());
        assert_eq!(surface.created().len(), 1);
    }

    #[test]
    fn frame_is_origin_anchored() {
        let surface = RecordingSurface::new(10.0, 7.5);
        assert_eq!(surface.frame(), Rect::new(0.0, 0.0, 10.0, 7.5));
        assert_eq!(surface.dimensions().aspect(), 10.0 / 7.5);
    }
}
