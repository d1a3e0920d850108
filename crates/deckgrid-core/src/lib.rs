#![forbid(unsafe_code)]

//! Core: geometry, length units, and the presentation surface contract.
//!
//! # Role in DeckGrid
//! `deckgrid-core` is the boundary layer. It owns the geometric primitives
//! the layout engine computes with, the absolute-or-percentage length model
//! resolved against parent regions, and the [`surface::Surface`] trait
//! through which content lands in an actual presentation document.
//!
//! # Primary responsibilities
//! - **Rect**: absolute `{x, y, width, height}` regions in document units.
//! - **Length**: `"50%"`-style parent-relative values and absolute lengths,
//!   including the responsive centering adjustment for non-16:9 decks.
//! - **Surface**: the narrow collaborator contract (shape/text/picture/table
//!   creation) plus the opaque [`surface::ContentSpec`] passthrough bag.
//!
//! # How it fits in the system
//! The layout engine (`deckgrid-layout`) resolves [`units::Length`] values
//! against parent [`geometry::Rect`]s and forwards finished bounding boxes to
//! a [`surface::Surface`]. Nothing in this crate performs I/O; serialization
//! and file handling belong entirely to the collaborator behind the trait.

pub mod geometry;
pub mod logging;
pub mod surface;
pub mod units;

pub use geometry::{Rect, Size};
pub use surface::{ContentSpec, ShapeKind, Surface};
pub use units::{HAlign, Length};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
