#![forbid(unsafe_code)]

//! 2D grid layout over a parent region, with merging and nested sub-grids.
//!
//! A [`Grid`] eagerly partitions its resolved bounding box into rows x cols
//! cells separated by symmetric inter-cell padding (no padding at the outer
//! edges). Cells live in an arena; a row-major slot table maps every logical
//! `(row, col)` address to its authoritative cell, so a merge is an
//! indirection update rather than object aliasing. Addresses stay valid
//! across merges: looking up a slot absorbed by a merge transparently
//! returns the covering cell.
//!
//! # Invariants
//!
//! 1. Every logical address in `[0, rows) x [0, cols)` resolves to exactly
//!    one authoritative cell; authoritative spans never overlap.
//! 2. Cell geometry is fixed at construction; only a merge rewrites the
//!    anchor's bounding box (to the union of the covered region, interior
//!    gaps included).
//! 3. Failed operations leave the grid exactly as it was: validation
//!    always precedes mutation.

use std::fmt;
use std::path::Path;

use deckgrid_core::geometry::Rect;
use deckgrid_core::surface::{ContentSpec, ShapeKind, Surface};
use deckgrid_core::units::{HAlign, Length};
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`Grid`].
///
/// Positions and extents resolve against the **parent** region (the slide
/// frame, or the owning cell for nested grids). Defaults cover the parent
/// exactly: `0% / 0% / 100% / 100%`, one cell, 5% padding, centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Horizontal offset from the parent's left edge.
    pub x: Length,
    /// Vertical offset from the parent's top edge.
    pub y: Length,
    /// Grid width.
    pub width: Length,
    /// Grid height.
    pub height: Length,
    /// Number of rows (> 0).
    pub rows: usize,
    /// Number of columns (> 0).
    pub cols: usize,
    /// Inter-cell padding as a percentage of one cell slot, `[0, 50)`.
    pub padding: f64,
    /// Horizontal alignment hint for responsive positioning.
    pub h_align: HAlign,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x: Length::Percent(0.0),
            y: Length::Percent(0.0),
            width: Length::Percent(100.0),
            height: Length::Percent(100.0),
            rows: 1,
            cols: 1,
            padding: 5.0,
            h_align: HAlign::Center,
        }
    }
}

impl GridSpec {
    /// A full-parent grid with the given shape.
    #[must_use]
    pub fn tiled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Set the region within the parent.
    #[must_use]
    pub fn bounds(mut self, x: Length, y: Length, width: Length, height: Length) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Set the inter-cell padding percentage.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the horizontal alignment hint.
    #[must_use]
    pub fn h_align(mut self, h_align: HAlign) -> Self {
        self.h_align = h_align;
        self
    }
}

/// Errors raised by grid construction, addressing, and mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    /// Rows and columns must both be positive.
    InvalidDimension { rows: usize, cols: usize },
    /// Padding must lie in `[0, 50)`; at 50% no cell area would remain.
    InvalidPadding { padding: f64 },
    /// Address outside `[0, rows) x [0, cols)`, a flat index outside
    /// `[0, rows*cols)`, or a merge start corner past its end corner.
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// The requested rectangle overlaps an existing, non-identical merge.
    MergeConflict {
        row: usize,
        col: usize,
        anchor_row: usize,
        anchor_col: usize,
    },
    /// The target cell already owns a nested grid.
    CellAlreadyHasGrid { row: usize, col: usize },
    /// No unoccupied cell remains in the row.
    RowFull { row: usize },
    /// The target cell already holds content and overwrite was not requested.
    CellOccupied { row: usize, col: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { rows, cols } => write!(
                f,
                "invalid grid dimensions {rows}x{cols}: rows and cols must be positive"
            ),
            Self::InvalidPadding { padding } => {
                write!(f, "invalid padding {padding}%: must be in [0, 50)")
            }
            Self::IndexOutOfRange {
                row,
                col,
                rows,
                cols,
            } => write!(
                f,
                "cell ({row}, {col}) is out of range for a {rows}x{cols} grid"
            ),
            Self::MergeConflict {
                row,
                col,
                anchor_row,
                anchor_col,
            } => write!(
                f,
                "cell ({row}, {col}) already belongs to the merge anchored at ({anchor_row}, {anchor_col})"
            ),
            Self::CellAlreadyHasGrid { row, col } => {
                write!(f, "cell ({row}, {col}) already owns a nested grid")
            }
            Self::RowFull { row } => write!(f, "row {row} has no unoccupied cell left"),
            Self::CellOccupied { row, col } => {
                write!(f, "cell ({row}, {col}) already holds content")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A placement failure: either the grid engine refused, or the surface did.
///
/// Surface failures carry the collaborator's own error type, untranslated.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceError<E> {
    Grid(GridError),
    Surface(E),
}

impl<E> From<GridError> for PlaceError<E> {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

impl<E: fmt::Display> fmt::Display for PlaceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(err) => err.fmt(f),
            Self::Surface(err) => write!(f, "surface rejected content: {err}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for PlaceError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            Self::Surface(err) => Some(err),
        }
    }
}

/// Content to create through the surface when placing into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    Shape(ShapeKind),
    Text,
    Picture(&'a Path),
    Table { rows: usize, cols: usize },
}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Anchor row of the merged cell.
    pub row: usize,
    /// Anchor column of the merged cell.
    pub col: usize,
    /// Addresses whose content or nested grid the merge released.
    ///
    /// Non-fatal advisory: the merge itself succeeded, but previously placed
    /// handles were dropped. Callers decide whether that matters.
    pub overwritten: Vec<(usize, usize)>,
}

/// One addressable region of a grid.
///
/// `row`/`col` anchor the cell at its top-left logical position; spans grow
/// past 1 only through [`Grid::merge_cells`].
#[derive(Debug, Clone)]
pub struct Cell<H> {
    row: usize,
    col: usize,
    row_span: usize,
    col_span: usize,
    bounds: Rect,
    occupied: bool,
    content: Option<H>,
    child: Option<Box<Grid<H>>>,
}

impl<H> Cell<H> {
    /// Anchor row.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Anchor column.
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Rows covered (1 unless merged).
    #[inline]
    pub fn row_span(&self) -> usize {
        self.row_span
    }

    /// Columns covered (1 unless merged).
    #[inline]
    pub fn col_span(&self) -> usize {
        self.col_span
    }

    /// Absolute bounding box.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether content has been placed here.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Handle of the content placed here, if any.
    #[inline]
    pub fn content(&self) -> Option<&H> {
        self.content.as_ref()
    }

    /// The nested grid attached to this cell, if any.
    #[inline]
    pub fn child(&self) -> Option<&Grid<H>> {
        self.child.as_deref()
    }
}

/// A rows x cols logical table anchored to a resolved bounding region.
///
/// `H` is the surface's content handle type; grids built purely for
/// geometry can use any placeholder (e.g. `Grid::<u64>`).
#[derive(Debug, Clone)]
pub struct Grid<H> {
    rows: usize,
    cols: usize,
    bounds: Rect,
    padding: f64,
    h_align: HAlign,
    /// Arena of cell records. Records covered by a merge stay allocated so
    /// their original geometry remains available; they simply become
    /// unreachable through `slots`.
    cells: Vec<Cell<H>>,
    /// Row-major `(row, col) -> cells` index; merges redirect covered slots
    /// to the anchor.
    slots: Vec<usize>,
}

impl<H> Grid<H> {
    /// Build a grid inside `parent`, resolving percentage lengths against it.
    ///
    /// All validation happens before any cell is created; on error no grid
    /// exists. The x offset goes through the responsive centering adjustment
    /// for the parent's aspect ratio (see [`Length::resolve_aligned`]).
    pub fn new(parent: Rect, spec: &GridSpec) -> Result<Self, GridError> {
        if spec.rows == 0 || spec.cols == 0 {
            return Err(GridError::InvalidDimension {
                rows: spec.rows,
                cols: spec.cols,
            });
        }
        if !(0.0..50.0).contains(&spec.padding) {
            return Err(GridError::InvalidPadding {
                padding: spec.padding,
            });
        }

        let aspect = parent.size().aspect();
        let x = parent.x + spec.x.resolve_aligned(parent.width, aspect, spec.h_align);
        let y = parent.y + spec.y.resolve(parent.height);
        let width = spec.width.resolve(parent.width);
        let height = spec.height.resolve(parent.height);
        let bounds = Rect::new(x, y, width, height);

        let (rows, cols) = (spec.rows, spec.cols);
        // One slot is width/cols; padding carves the gap out of the slots so
        // that cols cells and cols-1 interior gaps exactly fill the width.
        let gap_x = spec.padding / 100.0 * (width / cols as f64);
        let gap_y = spec.padding / 100.0 * (height / rows as f64);
        let cell_w = (width - gap_x * (cols - 1) as f64) / cols as f64;
        let cell_h = (height - gap_y * (rows - 1) as f64) / rows as f64;

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let cx = x + col as f64 * (cell_w + gap_x);
                let cy = y + row as f64 * (cell_h + gap_y);
                cells.push(Cell {
                    row,
                    col,
                    row_span: 1,
                    col_span: 1,
                    bounds: Rect::new(cx, cy, cell_w, cell_h),
                    occupied: false,
                    content: None,
                    child: None,
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            bounds,
            padding: spec.padding,
            h_align: spec.h_align,
            cells,
            slots: (0..rows * cols).collect(),
        })
    }

    /// Build a top-level grid covering the surface's slide frame.
    pub fn on_surface<S: Surface>(surface: &S, spec: &GridSpec) -> Result<Self, GridError> {
        Self::new(surface.frame(), spec)
    }

    /// Number of logical rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of logical columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Resolved bounding box.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Inter-cell padding percentage.
    #[inline]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Horizontal alignment hint.
    #[inline]
    pub fn h_align(&self) -> HAlign {
        self.h_align
    }

    fn check(&self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    #[inline]
    fn slot_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    fn resolve(&self, row: usize, col: usize) -> usize {
        self.slots[self.slot_index(row, col)]
    }

    /// The authoritative cell at `(row, col)`.
    ///
    /// Slots absorbed by a merge resolve to the covering cell.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<&Cell<H>, GridError> {
        self.check(row, col)?;
        Ok(&self.cells[self.resolve(row, col)])
    }

    /// The authoritative cell at a flat row-major index (`row * cols + col`).
    pub fn cell_at_flat(&self, index: usize) -> Result<&Cell<H>, GridError> {
        if index >= self.rows * self.cols {
            return Err(GridError::IndexOutOfRange {
                row: index / self.cols,
                col: index % self.cols,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(&self.cells[self.slots[index]])
    }

    /// Iterate authoritative cells in row-major order.
    ///
    /// Slots absorbed by a merge are skipped, so each cell appears exactly
    /// once. Every call starts a fresh pass.
    pub fn cells(&self) -> impl Iterator<Item = &Cell<H>> + '_ {
        self.slots.iter().enumerate().filter_map(move |(slot, &idx)| {
            let cell = &self.cells[idx];
            (cell.row * self.cols + cell.col == slot).then_some(cell)
        })
    }

    /// Number of authoritative cells (shrinks as merges absorb slots).
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Merge the inclusive rectangle from `(start_row, start_col)` to
    /// `(end_row, end_col)` into one cell.
    ///
    /// The anchor keeps its address and receives the union bounding box of
    /// the covered region, interior gaps included. Re-requesting an existing
    /// merge with identical bounds is a no-op; any other overlap with a
    /// previous merge fails with [`GridError::MergeConflict`] and changes
    /// nothing. Content and nested grids in covered cells are released and
    /// reported through [`MergeOutcome::overwritten`].
    pub fn merge_cells(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<MergeOutcome, GridError> {
        self.check(start_row, start_col)?;
        self.check(end_row, end_col)?;
        if start_row > end_row || start_col > end_col {
            return Err(GridError::IndexOutOfRange {
                row: start_row,
                col: start_col,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let row_span = end_row - start_row + 1;
        let col_span = end_col - start_col + 1;
        let anchor_idx = self.resolve(start_row, start_col);

        // An exact duplicate of an existing merge (or a 1x1 request on a
        // plain cell) is idempotent.
        let anchor = &self.cells[anchor_idx];
        if anchor.row == start_row
            && anchor.col == start_col
            && anchor.row_span == row_span
            && anchor.col_span == col_span
        {
            return Ok(MergeOutcome {
                row: start_row,
                col: start_col,
                overwritten: Vec::new(),
            });
        }

        // Validate the whole rectangle before touching anything: every
        // covered slot must be a plain, unmerged cell.
        for row in start_row..=end_row {
            for col in start_col..=end_col {
                let cell = &self.cells[self.resolve(row, col)];
                if cell.row != row || cell.col != col || cell.row_span != 1 || cell.col_span != 1 {
                    return Err(GridError::MergeConflict {
                        row,
                        col,
                        anchor_row: cell.row,
                        anchor_col: cell.col,
                    });
                }
            }
        }

        // Union of the corner cells' original boxes covers the region,
        // interior gaps included.
        let top_left = self.cells[self.resolve(start_row, start_col)].bounds;
        let bottom_right = self.cells[self.resolve(end_row, end_col)].bounds;
        let merged = top_left.union(&bottom_right);

        let mut overwritten = Vec::new();
        for row in start_row..=end_row {
            for col in start_col..=end_col {
                let slot = self.slot_index(row, col);
                let idx = self.slots[slot];
                let cell = &mut self.cells[idx];
                if cell.occupied || cell.child.is_some() {
                    cell.occupied = false;
                    cell.content = None;
                    cell.child = None;
                    overwritten.push((row, col));
                }
                self.slots[slot] = anchor_idx;
            }
        }

        let anchor = &mut self.cells[anchor_idx];
        anchor.row_span = row_span;
        anchor.col_span = col_span;
        anchor.bounds = merged;

        #[cfg(feature = "tracing")]
        if !overwritten.is_empty() {
            tracing::warn!(
                row = start_row,
                col = start_col,
                released = overwritten.len(),
                "merge released existing cell content"
            );
        }

        Ok(MergeOutcome {
            row: start_row,
            col: start_col,
            overwritten,
        })
    }

    /// Attach a nested grid to the cell at `(row, col)`.
    ///
    /// The child's percentage lengths resolve against the target cell's
    /// (post-merge) bounding box, not the slide. The parent cell owns the
    /// child exclusively; merging over the cell releases it.
    pub fn attach_grid(
        &mut self,
        row: usize,
        col: usize,
        spec: &GridSpec,
    ) -> Result<&mut Grid<H>, GridError> {
        self.check(row, col)?;
        let idx = self.resolve(row, col);
        if self.cells[idx].child.is_some() {
            return Err(GridError::CellAlreadyHasGrid {
                row: self.cells[idx].row,
                col: self.cells[idx].col,
            });
        }
        let child = Grid::new(self.cells[idx].bounds, spec)?;
        Ok(&mut **self.cells[idx].child.insert(Box::new(child)))
    }

    /// Record an externally created handle in the cell at `(row, col)`.
    ///
    /// For callers that fetch a cell's bounding box and talk to the surface
    /// themselves; marks the cell occupied without going through
    /// [`Grid::place`]. Reassigning an occupied cell (overwrite) also
    /// releases its nested grid, like [`Grid::place`] does.
    pub fn set_content(
        &mut self,
        row: usize,
        col: usize,
        handle: H,
        overwrite: bool,
    ) -> Result<(usize, usize), GridError> {
        self.check(row, col)?;
        let idx = self.resolve(row, col);
        let cell = &mut self.cells[idx];
        if cell.occupied {
            if !overwrite {
                return Err(GridError::CellOccupied {
                    row: cell.row,
                    col: cell.col,
                });
            }
            cell.child = None;
        }
        cell.content = Some(handle);
        cell.occupied = true;
        Ok((cell.row, cell.col))
    }

    /// Create `content` through the surface inside the cell at `(row, col)`.
    ///
    /// Resolves aliases like [`Grid::cell_at`], forwards the cell's bounding
    /// box plus `spec` verbatim, and stores the returned handle. Surface
    /// failures propagate unchanged and leave the cell untouched. Reassigning
    /// an occupied cell (overwrite) also releases its nested grid. Returns
    /// the anchor address of the cell that received the content.
    pub fn place<S>(
        &mut self,
        surface: &mut S,
        row: usize,
        col: usize,
        content: Content<'_>,
        spec: &ContentSpec,
        overwrite: bool,
    ) -> Result<(usize, usize), PlaceError<S::Error>>
    where
        S: Surface<Handle = H>,
    {
        self.check(row, col)?;
        let idx = self.resolve(row, col);
        let bounds = {
            let cell = &self.cells[idx];
            if cell.occupied && !overwrite {
                return Err(PlaceError::Grid(GridError::CellOccupied {
                    row: cell.row,
                    col: cell.col,
                }));
            }
            cell.bounds
        };

        let handle = match content {
            Content::Shape(kind) => surface.create_shape(kind, bounds, spec),
            Content::Text => surface.create_text_box(bounds, spec),
            Content::Picture(path) => surface.create_picture(path, bounds, spec),
            Content::Table { rows, cols } => surface.create_table(rows, cols, bounds, spec),
        }
        .map_err(PlaceError::Surface)?;

        let cell = &mut self.cells[idx];
        if cell.occupied {
            cell.child = None;
        }
        cell.content = Some(handle);
        cell.occupied = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(row = cell.row, col = cell.col, "placed content in grid cell");

        Ok((cell.row, cell.col))
    }

    /// Place a text box; fails on an occupied cell.
    pub fn add_text<S>(
        &mut self,
        surface: &mut S,
        row: usize,
        col: usize,
        spec: &ContentSpec,
    ) -> Result<(usize, usize), PlaceError<S::Error>>
    where
        S: Surface<Handle = H>,
    {
        self.place(surface, row, col, Content::Text, spec, false)
    }

    /// Place a picture; fails on an occupied cell.
    pub fn add_image<S>(
        &mut self,
        surface: &mut S,
        row: usize,
        col: usize,
        path: &Path,
        spec: &ContentSpec,
    ) -> Result<(usize, usize), PlaceError<S::Error>>
    where
        S: Surface<Handle = H>,
    {
        self.place(surface, row, col, Content::Picture(path), spec, false)
    }

    /// Place a table; fails on an occupied cell.
    pub fn add_table<S>(
        &mut self,
        surface: &mut S,
        row: usize,
        col: usize,
        table_rows: usize,
        table_cols: usize,
        spec: &ContentSpec,
    ) -> Result<(usize, usize), PlaceError<S::Error>>
    where
        S: Surface<Handle = H>,
    {
        self.place(
            surface,
            row,
            col,
            Content::Table {
                rows: table_rows,
                cols: table_cols,
            },
            spec,
            false,
        )
    }

    /// Place an auto-shape; fails on an occupied cell.
    pub fn add_shape<S>(
        &mut self,
        surface: &mut S,
        row: usize,
        col: usize,
        kind: ShapeKind,
        spec: &ContentSpec,
    ) -> Result<(usize, usize), PlaceError<S::Error>>
    where
        S: Surface<Handle = H>,
    {
        self.place(surface, row, col, Content::Shape(kind), spec, false)
    }

    /// A row-scoped view for left-to-right insertion.
    pub fn row(&mut self, row: usize) -> Result<RowView<'_, H>, GridError> {
        if row >= self.rows {
            return Err(GridError::IndexOutOfRange {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(RowView { grid: self, row })
    }
}

/// Insertion cursor over one grid row.
///
/// Candidates are the authoritative cells **anchored** in this row; slots a
/// merge absorbed into another row's cell are not part of this row's set.
/// Exhaustion is determined purely by occupancy.
#[derive(Debug)]
pub struct RowView<'g, H> {
    grid: &'g mut Grid<H>,
    row: usize,
}

impl<H> RowView<'_, H> {
    /// The row this view covers.
    #[inline]
    pub fn index(&self) -> usize {
        self.row
    }

    /// Column of the first unoccupied cell anchored in this row.
    pub fn next_free(&self) -> Option<usize> {
        (0..self.grid.cols).find(|&col| {
            let cell = &self.grid.cells[self.grid.resolve(self.row, col)];
            cell.row == self.row && cell.col == col && !cell.occupied
        })
    }

    /// Place `content` in the first unoccupied cell, scanning left to right.
    ///
    /// Fails with [`GridError::RowFull`] when no cell remains.
    pub fn add_next<S>(
        &mut self,
        surface: &mut S,
        content: Content<'_>,
        spec: &ContentSpec,
    ) -> Result<(usize, usize), PlaceError<S::Error>>
    where
        S: Surface<Handle = H>,
    {
        let col = self
            .next_free()
            .ok_or_else(|| PlaceError::Grid(GridError::RowFull { row: self.row }))?;
        self.grid.place(surface, self.row, col, content, spec, false)
    }
}
