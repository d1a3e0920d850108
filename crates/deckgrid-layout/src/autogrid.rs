#![forbid(unsafe_code)]

//! Auto-sized grids: derive a rows x cols shape from an item count and
//! populate the cells row-major from caller-supplied placement closures.
//!
//! The shape heuristic favors near-square layouts: with neither axis given,
//! `cols = max(1, floor(sqrt(n)))` and `rows = ceil(n / cols)`; with one
//! axis given, the other is derived. An optional title band can be carved
//! off the top of the region before the grid is laid out.

use deckgrid_core::geometry::Rect;
use deckgrid_core::surface::Surface;
use deckgrid_core::units::{HAlign, Length};
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, GridSpec, PlaceError};

/// Parameters for [`autogrid`].
///
/// Defaults leave a 5% margin on every side of the parent region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutogridSpec {
    /// Horizontal offset from the parent's left edge.
    pub x: Length,
    /// Vertical offset from the parent's top edge.
    pub y: Length,
    /// Region width.
    pub width: Length,
    /// Region height.
    pub height: Length,
    /// Explicit row count; derived from the item count when `None`.
    pub rows: Option<usize>,
    /// Explicit column count; derived from the item count when `None`.
    pub cols: Option<usize>,
    /// Inter-cell padding percentage, as in [`GridSpec`].
    pub padding: f64,
    /// Horizontal alignment hint.
    pub h_align: HAlign,
    /// Height of a band reserved above the grid (e.g. for a slide title),
    /// resolved against the parent height.
    pub title_height: Option<Length>,
}

impl Default for AutogridSpec {
    fn default() -> Self {
        Self {
            x: Length::Percent(5.0),
            y: Length::Percent(5.0),
            width: Length::Percent(90.0),
            height: Length::Percent(90.0),
            rows: None,
            cols: None,
            padding: 5.0,
            h_align: HAlign::Center,
            title_height: None,
        }
    }
}

impl AutogridSpec {
    /// Fix the grid shape instead of deriving it from the item count.
    #[must_use]
    pub fn shaped(mut self, rows: usize, cols: usize) -> Self {
        self.rows = Some(rows);
        self.cols = Some(cols);
        self
    }

    /// Reserve a title band of the given height above the grid.
    #[must_use]
    pub fn with_title_band(mut self, height: Length) -> Self {
        self.title_height = Some(height);
        self
    }
}

/// A populated auto-sized grid plus its reserved title band, if any.
#[derive(Debug)]
pub struct Autogrid<H> {
    pub grid: Grid<H>,
    pub title_area: Option<Rect>,
}

/// Derive a near-square `(rows, cols)` shape for `count` items.
///
/// Axes given explicitly are kept (clamped to at least 1); missing axes are
/// derived so the grid holds all items.
#[must_use]
pub fn auto_shape(count: usize, rows: Option<usize>, cols: Option<usize>) -> (usize, usize) {
    match (rows, cols) {
        (Some(rows), Some(cols)) => (rows.max(1), cols.max(1)),
        (Some(rows), None) => {
            let rows = rows.max(1);
            (rows, count.div_ceil(rows).max(1))
        }
        (None, Some(cols)) => {
            let cols = cols.max(1);
            (count.div_ceil(cols).max(1), cols)
        }
        (None, None) => {
            let cols = (count.max(1) as f64).sqrt().floor() as usize;
            let cols = cols.max(1);
            (count.div_ceil(cols).max(1), cols)
        }
    }
}

/// Build a grid sized for `items` inside `parent` and populate it row-major.
///
/// Each item is called with the surface and its cell's bounding box and
/// returns the created handle, which is stored in the cell. Items beyond the
/// grid's capacity (only possible with an explicit shape) are dropped
/// unplaced. The first failing item aborts and propagates its error.
pub fn autogrid<S, F>(
    surface: &mut S,
    parent: Rect,
    items: Vec<F>,
    spec: &AutogridSpec,
) -> Result<Autogrid<S::Handle>, PlaceError<S::Error>>
where
    S: Surface,
    F: FnOnce(&mut S, Rect) -> Result<S::Handle, S::Error>,
{
    let (rows, cols) = auto_shape(items.len(), spec.rows, spec.cols);

    let aspect = parent.size().aspect();
    let x = parent.x + spec.x.resolve_aligned(parent.width, aspect, spec.h_align);
    let y = parent.y + spec.y.resolve(parent.height);
    let width = spec.width.resolve(parent.width);
    let height = spec.height.resolve(parent.height);

    let (title_area, region) = match spec.title_height {
        Some(title_height) => {
            let band = title_height.resolve(parent.height);
            (
                Some(Rect::new(x, y, width, band)),
                Rect::new(x, y + band, width, (height - band).max(0.0)),
            )
        }
        None => (None, Rect::new(x, y, width, height)),
    };

    let grid_spec = GridSpec {
        rows,
        cols,
        padding: spec.padding,
        h_align: spec.h_align,
        ..GridSpec::default()
    };
    let mut grid = Grid::new(region, &grid_spec)?;

    let capacity = rows * cols;
    for (index, item) in items.into_iter().take(capacity).enumerate() {
        let row = index / cols;
        let col = index % cols;
        let bounds = grid.cell_at(row, col)?.bounds();
        let handle = item(surface, bounds).map_err(PlaceError::Surface)?;
        grid.set_content(row, col, handle, false)?;
    }

    Ok(Autogrid { grid, title_area })
}

#[cfg(test)]
mod tests {
    use deckgrid_core::surface::{ContentSpec, RecordingError, RecordingSurface, Surface};

    use super::*;

    type BoxedItem = Box<dyn FnOnce(&mut RecordingSurface, Rect) -> Result<u64, RecordingError>>;

    #[test]
    fn shape_is_near_square() {
        assert_eq!(auto_shape(1, None, None), (1, 1));
        assert_eq!(auto_shape(4, None, None), (2, 2));
        assert_eq!(auto_shape(6, None, None), (3, 2));
        assert_eq!(auto_shape(9, None, None), (3, 3));
        assert_eq!(auto_shape(10, None, None), (4, 3));
    }

    #[test]
    fn shape_derives_missing_axis() {
        assert_eq!(auto_shape(6, Some(2), None), (2, 3));
        assert_eq!(auto_shape(7, None, Some(3)), (3, 3));
        assert_eq!(auto_shape(5, Some(2), Some(2)), (2, 2));
    }

    #[test]
    fn shape_handles_empty_input() {
        assert_eq!(auto_shape(0, None, None), (1, 1));
        assert_eq!(auto_shape(0, None, Some(4)), (1, 4));
        assert_eq!(auto_shape(3, Some(0), Some(0)), (1, 1));
    }

    #[test]
    fn populates_cells_row_major() {
        let mut surface = RecordingSurface::widescreen();
        let frame = surface.frame();
        let items: Vec<_> = (0..6)
            .map(|_| {
                |s: &mut RecordingSurface, bounds: Rect| {
                    s.create_text_box(bounds, &ContentSpec::new())
                }
            })
            .collect();

        let auto = autogrid(&mut surface, frame, items, &AutogridSpec::default()).unwrap();

        assert_eq!((auto.grid.rows(), auto.grid.cols()), (3, 2));
        assert_eq!(surface.created().len(), 6);
        // Creation order follows row-major cell order.
        for (index, created) in surface.created().iter().enumerate() {
            let cell = auto.grid.cell_at_flat(index).unwrap();
            assert_eq!(created.bounds, cell.bounds());
            assert_eq!(cell.content(), Some(&created.handle));
            assert!(cell.is_occupied());
        }
        assert!(auto.title_area.is_none());
    }

    #[test]
    fn title_band_is_carved_off_the_top() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let frame = surface.frame();
        let items = vec![|s: &mut RecordingSurface, bounds: Rect| {
            s.create_text_box(bounds, &ContentSpec::new())
        }];

        let spec = AutogridSpec {
            x: Length::Percent(0.0),
            y: Length::Percent(0.0),
            width: Length::Percent(100.0),
            height: Length::Percent(100.0),
            h_align: HAlign::Left,
            ..AutogridSpec::default()
        }
        .with_title_band(Length::Percent(10.0));

        let auto = autogrid(&mut surface, frame, items, &spec).unwrap();
        let band = auto.title_area.unwrap();
        assert!(band.approx_eq(&Rect::new(0.0, 0.0, 10.0, 1.0), 1e-9));
        // The grid starts below the band and fills the rest.
        assert!(auto
            .grid
            .bounds()
            .approx_eq(&Rect::new(0.0, 1.0, 10.0, 9.0), 1e-9));
    }

    #[test]
    fn surplus_items_are_dropped_with_explicit_shape() {
        let mut surface = RecordingSurface::widescreen();
        let frame = surface.frame();
        let items: Vec<_> = (0..5)
            .map(|_| {
                |s: &mut RecordingSurface, bounds: Rect| {
                    s.create_text_box(bounds, &ContentSpec::new())
                }
            })
            .collect();

        let auto = autogrid(
            &mut surface,
            frame,
            items,
            &AutogridSpec::default().shaped(2, 2),
        )
        .unwrap();

        assert_eq!((auto.grid.rows(), auto.grid.cols()), (2, 2));
        assert_eq!(surface.created().len(), 4);
    }

    #[test]
    fn failing_item_aborts_population() {
        let mut surface = RecordingSurface::widescreen();
        // The third item arms a one-shot failure before creating.
        let items: Vec<BoxedItem> = (0..4)
            .map(|index| {
                Box::new(move |s: &mut RecordingSurface, bounds: Rect| {
                    if index == 2 {
                        s.fail_next("out of media");
                    }
                    s.create_text_box(bounds, &ContentSpec::new())
                }) as BoxedItem
            })
            .collect();

        let auto = autogrid(
            &mut surface,
            Rect::from_size(12.0, 9.0),
            items,
            &AutogridSpec::default(),
        );

        match auto {
            Err(PlaceError::Surface(err)) => assert_eq!(err.0, "out of media"),
            other => panic!("expected surface error, got {other:?}"),
        }
        assert_eq!(surface.created().len(), 2);
    }
}
