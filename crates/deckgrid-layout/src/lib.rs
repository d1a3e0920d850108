#![forbid(unsafe_code)]

//! Percentage-based grid layouts for slide decks.
//!
//! A [`Grid`] partitions a parent region (the slide, or a cell of another
//! grid) into a rows x cols table of cells with symmetric inter-cell
//! padding, then lets callers address cells in 2D or flat row-major form,
//! merge rectangular ranges, nest sub-grids, and delegate content creation
//! to a [`deckgrid_core::Surface`].
//!
//! # Example
//!
//! ```
//! use deckgrid_core::geometry::Rect;
//! use deckgrid_layout::{Grid, GridSpec};
//!
//! let slide = Rect::from_size(13.333, 7.5);
//! let mut grid = Grid::<u64>::new(slide, &GridSpec::tiled(2, 3)).unwrap();
//!
//! // Merge the top row into one header cell.
//! let outcome = grid.merge_cells(0, 0, 0, 2).unwrap();
//! assert!(outcome.overwritten.is_empty());
//! assert_eq!(grid.cell_at(0, 2).unwrap().col_span(), 3);
//! ```

pub mod autogrid;
pub mod grid;

pub use deckgrid_core::geometry::{Rect, Size};
pub use deckgrid_core::units::{HAlign, Length};

pub use autogrid::{Autogrid, AutogridSpec, auto_shape, autogrid};
pub use grid::{
    Cell, Content, Grid, GridError, GridSpec, MergeOutcome, PlaceError, RowView,
};
