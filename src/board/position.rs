/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use thiserror::Error;

/// Errors raised when a [`Position`] is constructed from invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The position number is not within `[1, max]`.
    #[error("Invalid position number: Must be between [1, {max}]. Got {number}")]
    OutOfRange { number: u16, max: u16 },

    /// The column or row lies outside of the grid.
    #[error("Invalid coordinates ({col}, {row}): Must be within a {width}x{height} grid")]
    OutOfBounds {
        col: i16,
        row: i16,
        width: u8,
        height: u8,
    },

    /// The column and row indicate a light (non-playable) square.
    #[error("Coordinates ({col}, {row}) indicate a non-playable square")]
    NotPlayable { col: u8, row: u8 },
}

/// Errors raised when [`Dimensions`] cannot host a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DimensionsError {
    #[error("Board width must be even. Got {0}")]
    OddWidth(u8),

    #[error(
        "Board size must be between {min}x{min} and {max}x{max}. Got {width}x{height}",
        min = Dimensions::MIN,
        max = Dimensions::MAX
    )]
    OutOfRange { width: u8, height: u8 },
}

/// The size of the grid a game is played on, counting both playable (dark) and non-playable (light) squares.
///
/// Only the width has to be even: every row then holds exactly `width / 2` playable squares,
/// which is what makes the position numbering a plain arithmetic formula.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Dimensions {
    width: u8,
    height: u8,
}

impl Dimensions {
    /// The 10x10 board of international draughts.
    pub const INTERNATIONAL: Self = Self {
        width: 10,
        height: 10,
    };

    /// Smallest supported width/height.
    pub const MIN: u8 = 4;

    /// Largest supported width/height.
    pub const MAX: u8 = 26;

    /// Creates new [`Dimensions`], validating that the grid can host a game.
    ///
    /// # Example
    /// ```
    /// # use draughts::Dimensions;
    /// assert!(Dimensions::new(8, 8).is_ok());
    /// assert!(Dimensions::new(9, 10).is_err());
    /// assert!(Dimensions::new(2, 2).is_err());
    /// ```
    pub const fn new(width: u8, height: u8) -> Result<Self, DimensionsError> {
        if width < Self::MIN || width > Self::MAX || height < Self::MIN || height > Self::MAX {
            return Err(DimensionsError::OutOfRange { width, height });
        }
        if width % 2 != 0 {
            return Err(DimensionsError::OddWidth(width));
        }

        Ok(Self { width, height })
    }

    /// Creates new square [`Dimensions`] of `size` by `size`.
    #[inline(always)]
    pub const fn square(size: u8) -> Result<Self, DimensionsError> {
        Self::new(size, size)
    }

    /// Number of columns.
    #[inline(always)]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows.
    #[inline(always)]
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Total number of squares, playable or not.
    #[inline(always)]
    pub const fn square_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of playable squares on a single row.
    #[inline(always)]
    pub const fn playable_per_row(&self) -> u16 {
        self.width as u16 / 2
    }

    /// The highest valid position number.
    ///
    /// # Example
    /// ```
    /// # use draughts::Dimensions;
    /// assert_eq!(Dimensions::INTERNATIONAL.max_position(), 50);
    /// assert_eq!(Dimensions::square(8).unwrap().max_position(), 32);
    /// ```
    #[inline(always)]
    pub const fn max_position(&self) -> u16 {
        self.playable_per_row() * self.height as u16
    }

    /// Number of rows each side occupies at the start of a game.
    ///
    /// This always leaves at least two empty rows between both sides.
    #[inline(always)]
    pub const fn rows_per_side(&self) -> u8 {
        self.height / 2 - 1
    }

    /// Number of pieces each side starts with.
    ///
    /// # Example
    /// ```
    /// # use draughts::Dimensions;
    /// assert_eq!(Dimensions::INTERNATIONAL.pieces_per_side(), 20);
    /// assert_eq!(Dimensions::square(8).unwrap().pieces_per_side(), 12);
    /// ```
    #[inline(always)]
    pub const fn pieces_per_side(&self) -> u16 {
        self.playable_per_row() * self.rows_per_side() as u16
    }

    /// Returns `true` if `(col, row)` lies on the grid.
    #[inline(always)]
    pub const fn contains(&self, col: i16, row: i16) -> bool {
        col >= 0 && row >= 0 && col < self.width as i16 && row < self.height as i16
    }

    /// Row-major index of `(col, row)`, for indexing into per-square storage.
    #[inline(always)]
    pub(crate) const fn index(&self, col: u8, row: u8) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Returns an iterator over every valid [`Position`] on this grid, in ascending order of their numbers.
    pub fn positions(self) -> impl DoubleEndedIterator<Item = Position> + ExactSizeIterator {
        (1..=self.max_position()).map(move |n| Position::from_number_unchecked(n, self))
    }
}

impl Default for Dimensions {
    /// Defaults to [`Dimensions::INTERNATIONAL`].
    #[inline(always)]
    fn default() -> Self {
        Self::INTERNATIONAL
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A playable (dark) square, addressable both by its position number and by its grid coordinates.
///
/// Position numbers follow the draughts convention: the playable squares are numbered from 1,
/// left-to-right and top-to-bottom, skipping the non-playable squares.
/// Columns count left-to-right and rows count bottom-to-top, both starting at 0.
/// The top-left square is always non-playable, so on a 10x10 board:
/// ```text
///  9|    1     2     3     4     5
///  8| 6     7     8     9    10
///  7|   11    12    13    14    15
///    ...
///  1|   41    42    43    44    45
///  0|46    47    48    49    50
///   +------------------------------
///    0  1  2  3  4  5  6  7  8  9
/// ```
///
/// Two [`Position`]s are equal if their position numbers are equal.
#[derive(Clone, Copy)]
pub struct Position {
    number: u16,
    col: u8,
    row: u8,
}

impl Position {
    /// Creates a [`Position`] from its position number.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Dimensions, Position};
    /// let dims = Dimensions::INTERNATIONAL;
    /// let pos = Position::from_number(6, dims).unwrap();
    /// assert_eq!((pos.col(), pos.row()), (0, 8));
    ///
    /// assert!(Position::from_number(0, dims).is_err());
    /// assert!(Position::from_number(51, dims).is_err());
    /// ```
    pub fn from_number(number: u16, dims: Dimensions) -> Result<Self, PositionError> {
        let max = dims.max_position();
        if number < 1 || number > max {
            return Err(PositionError::OutOfRange { number, max });
        }

        Ok(Self::from_number_unchecked(number, dims))
    }

    /// Creates a [`Position`] from its position number, without bounds checking.
    ///
    /// `number` must be within `[1, dims.max_position()]`.
    #[inline(always)]
    pub(crate) const fn from_number_unchecked(number: u16, dims: Dimensions) -> Self {
        let per_row = dims.playable_per_row();
        let from_top = (number - 1) / per_row;
        let nth = (number - 1) % per_row;

        // Even rows (counted from the top) start with a light square
        let col = 2 * nth + if from_top % 2 == 0 { 1 } else { 0 };
        let row = dims.height as u16 - 1 - from_top;

        Self {
            number,
            col: col as u8,
            row: row as u8,
        }
    }

    /// Creates a [`Position`] from grid coordinates.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Dimensions, Position, PositionError};
    /// let dims = Dimensions::INTERNATIONAL;
    /// assert_eq!(Position::from_coords(1, 9, dims).unwrap().number(), 1);
    /// assert_eq!(Position::from_coords(8, 0, dims).unwrap().number(), 50);
    ///
    /// assert!(matches!(
    ///     Position::from_coords(0, 9, dims),
    ///     Err(PositionError::NotPlayable { .. })
    /// ));
    /// assert!(matches!(
    ///     Position::from_coords(10, 0, dims),
    ///     Err(PositionError::OutOfBounds { .. })
    /// ));
    /// ```
    pub fn from_coords(col: i16, row: i16, dims: Dimensions) -> Result<Self, PositionError> {
        if !dims.contains(col, row) {
            return Err(PositionError::OutOfBounds {
                col,
                row,
                width: dims.width,
                height: dims.height,
            });
        }

        let (col, row) = (col as u8, row as u8);
        let from_top = (dims.height - 1 - row) as u16;
        if (col as u16 + from_top) % 2 == 0 {
            return Err(PositionError::NotPlayable { col, row });
        }

        let number = from_top * dims.playable_per_row() + col as u16 / 2 + 1;
        Ok(Self { number, col, row })
    }

    /// The position number of this [`Position`].
    #[inline(always)]
    pub const fn number(&self) -> u16 {
        self.number
    }

    /// Zero-based column, left-to-right.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Zero-based row, bottom-to-top.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Attempt to step `distance` squares along `diagonal`.
    ///
    /// Returns `None` if that would leave the grid.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Diagonal, Dimensions, Position};
    /// let dims = Dimensions::INTERNATIONAL;
    /// let pos = Position::from_number(32, dims).unwrap();
    /// assert_eq!(pos.step(Diagonal::UP_LEFT, 1, dims).unwrap().number(), 27);
    /// assert_eq!(pos.step(Diagonal::UP_RIGHT, 2, dims).unwrap().number(), 23);
    ///
    /// let edge = Position::from_number(46, dims).unwrap();
    /// assert!(edge.step(Diagonal::DOWN_LEFT, 1, dims).is_none());
    /// ```
    #[inline(always)]
    pub fn step(&self, diagonal: Diagonal, distance: u8, dims: Dimensions) -> Option<Self> {
        let col = self.col as i16 + diagonal.dc as i16 * distance as i16;
        let row = self.row as i16 + diagonal.dr as i16 * distance as i16;

        // Diagonal steps from a playable square always land on a playable square
        Self::from_coords(col, row, dims).ok()
    }

    /// Returns an iterator over every square along `diagonal`, nearest first, until the edge of the grid.
    pub fn ray(self, diagonal: Diagonal, dims: Dimensions) -> impl Iterator<Item = Self> {
        (1..).map_while(move |distance| self.step(diagonal, distance, dims))
    }
}

impl PartialEq for Position {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number)
    }
}

impl fmt::Display for Position {
    /// A [`Position`] is displayed as its position number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.number.fmt(f)
    }
}

impl fmt::Debug for Position {
    /// Displays the position number along with the grid coordinates.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.number, self.col, self.row)
    }
}

/// One of the four diagonal directions a piece can travel in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Diagonal {
    pub(crate) dc: i8,
    pub(crate) dr: i8,
}

impl Diagonal {
    pub const UP_LEFT: Self = Self { dc: -1, dr: 1 };
    pub const UP_RIGHT: Self = Self { dc: 1, dr: 1 };
    pub const DOWN_LEFT: Self = Self { dc: -1, dr: -1 };
    pub const DOWN_RIGHT: Self = Self { dc: 1, dr: -1 };

    pub const COUNT: usize = 4;

    /// All four diagonals.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::UP_LEFT,
            Self::UP_RIGHT,
            Self::DOWN_LEFT,
            Self::DOWN_RIGHT,
        ]
    }

    /// Column delta of a single step.
    #[inline(always)]
    pub const fn dc(&self) -> i8 {
        self.dc
    }

    /// Row delta of a single step.
    #[inline(always)]
    pub const fn dr(&self) -> i8 {
        self.dr
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_number_round_trip() {
        for dims in [
            Dimensions::INTERNATIONAL,
            Dimensions::square(8).unwrap(),
            Dimensions::square(12).unwrap(),
            Dimensions::new(10, 8).unwrap(),
        ] {
            for n in 1..=dims.max_position() {
                let pos = Position::from_number(n, dims).unwrap();
                let back = Position::from_coords(pos.col() as i16, pos.row() as i16, dims).unwrap();
                assert_eq!(back.number(), n, "{dims}: {pos:?}");
                assert_eq!((back.col(), back.row()), (pos.col(), pos.row()));
            }
        }
    }

    #[test]
    fn test_coords_round_trip() {
        let dims = Dimensions::INTERNATIONAL;
        let mut playable = 0;
        for col in 0..10 {
            for row in 0..10 {
                match Position::from_coords(col, row, dims) {
                    Ok(pos) => {
                        playable += 1;
                        let again = Position::from_number(pos.number(), dims).unwrap();
                        assert_eq!((again.col() as i16, again.row() as i16), (col, row));
                    }
                    Err(err) => assert_eq!(
                        err,
                        PositionError::NotPlayable {
                            col: col as u8,
                            row: row as u8
                        }
                    ),
                }
            }
        }
        assert_eq!(playable, 50);
    }

    #[test]
    fn test_known_positions() {
        let dims = Dimensions::INTERNATIONAL;
        let expected = [
            (1, (1, 9)),
            (2, (3, 9)),
            (5, (9, 9)),
            (6, (0, 8)),
            (10, (8, 8)),
            (11, (1, 7)),
            (41, (1, 1)),
            (46, (0, 0)),
            (50, (8, 0)),
        ];
        for (n, (col, row)) in expected {
            let pos = Position::from_number(n, dims).unwrap();
            assert_eq!((pos.col(), pos.row()), (col, row), "position {n}");
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let dims = Dimensions::INTERNATIONAL;
        for (col, row) in [(-1, 0), (0, -1), (10, 1), (1, 10), (-3, 12)] {
            assert!(matches!(
                Position::from_coords(col, row, dims),
                Err(PositionError::OutOfBounds { .. })
            ));
        }
        assert_eq!(
            Position::from_number(51, dims),
            Err(PositionError::OutOfRange {
                number: 51,
                max: 50
            })
        );
    }

    #[test]
    fn test_ray_stops_at_edge() {
        let dims = Dimensions::INTERNATIONAL;
        let pos = Position::from_number(46, dims).unwrap();
        let ray = pos
            .ray(Diagonal::UP_RIGHT, dims)
            .map(|p| p.number())
            .collect::<Vec<_>>();
        assert_eq!(ray, vec![41, 37, 32, 28, 23, 19, 14, 10, 5]);
        assert_eq!(pos.ray(Diagonal::DOWN_RIGHT, dims).count(), 0);
    }

    #[test]
    fn test_dimensions_validation() {
        assert_eq!(Dimensions::new(7, 8), Err(DimensionsError::OddWidth(7)));
        assert!(matches!(
            Dimensions::new(28, 28),
            Err(DimensionsError::OutOfRange { .. })
        ));
        assert_eq!(Dimensions::default().rows_per_side(), 4);
    }
}
