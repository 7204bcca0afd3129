/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use super::{Dimensions, Position};

/// A generic container holding one element for every square of a grid, playable or not.
///
/// Elements are stored row-major, starting at the bottom-left square.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table<T> {
    dims: Dimensions,
    cells: Vec<T>,
}

impl<T> Table<T> {
    /// Create a new [`Table`] by applying `f` to the column and row of every square.
    pub fn from_fn<F>(dims: Dimensions, mut f: F) -> Self
    where
        F: FnMut(u8, u8) -> T,
    {
        let mut cells = Vec::with_capacity(dims.square_count());
        for row in 0..dims.height() {
            for col in 0..dims.width() {
                cells.push(f(col, row));
            }
        }

        Self { dims, cells }
    }

    /// Create a new [`Table`] with every value set to `value`.
    pub fn splat(dims: Dimensions, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            dims,
            cells: vec![value; dims.square_count()],
        }
    }

    /// The grid this [`Table`] covers.
    #[inline(always)]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Get the value at `(col, row)`, if that lies on the grid.
    #[inline(always)]
    pub fn get(&self, col: u8, row: u8) -> Option<&T> {
        if self.dims.contains(col as i16, row as i16) {
            Some(&self.cells[self.dims.index(col, row)])
        } else {
            None
        }
    }

    /// Set the value of this [`Table`] at `position`.
    #[inline(always)]
    pub fn set(&mut self, position: Position, value: T) {
        self[position] = value;
    }

    /// Returns an iterator over all rows, top row first, each row ordered left-to-right.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.dims.width() as usize).rev()
    }

    /// Returns an iterator over all values, in the same order as [`Table::rows`].
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows().flatten()
    }

    /// Creates a new [`Table`] by applying `f` to every value.
    pub fn map<U, F>(&self, f: F) -> Table<U>
    where
        F: FnMut(&T) -> U,
    {
        Table {
            dims: self.dims,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<Position> for Table<T> {
    type Output = T;
    /// A [`Position`] can be used to index into a [`Table`].
    #[inline(always)]
    fn index(&self, position: Position) -> &Self::Output {
        &self.cells[self.dims.index(position.col(), position.row())]
    }
}

impl<T> IndexMut<Position> for Table<T> {
    #[inline(always)]
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        &mut self.cells[self.dims.index(position.col(), position.row())]
    }
}

impl<T> fmt::Display for Table<T>
where
    T: fmt::Display,
{
    /// Prints the grid top row first, with row indices on the left and column indices below.
    ///
    /// Every cell is centered in a column as wide as the widest value, unless a width is given.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = f.width().unwrap_or_else(|| {
            self.cells
                .iter()
                .map(|value| value.to_string().len())
                .max()
                .unwrap_or(1)
        });

        let label_width = (self.dims.height() as usize - 1).to_string().len();

        for (i, row) in self.rows().enumerate() {
            let rank = self.dims.height() as usize - 1 - i;
            write!(f, "{rank:>label_width$} |")?;
            for value in row {
                write!(f, " {:^width$}", value.to_string())?;
            }
            writeln!(f)?;
        }

        write!(f, "{} +", " ".repeat(label_width))?;
        for _ in 0..self.dims.width() {
            write!(f, "-{}", "-".repeat(width))?;
        }
        writeln!(f)?;

        write!(f, "{}  ", " ".repeat(label_width))?;
        for col in 0..self.dims.width() {
            write!(f, " {col:^width$}")?;
        }

        Ok(())
    }
}
