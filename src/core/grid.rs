use generic_array::{ArrayLength, GenericArray};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, Index, IndexMut};

/// Index struct to access elements in the [`Grid`].
/// `col` counts from the left, `row` counts from the bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GridIndex {
    col: usize,
    row: usize,
}

impl From<(usize, usize)> for GridIndex {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for GridIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl GridIndex {
    /// Constructs a new [`GridIndex`].
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the neighbouring index in `direction`,
    /// or [`None`] if it would go below zero on either axis.
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (dcol, drow) = direction.offsets();
        Some(Self::new(
            self.col.checked_add_signed(dcol)?,
            self.row.checked_add_signed(drow)?,
        ))
    }
}

/// Directions of the lines a [`Grid`] can be scanned along.
/// Opposite directions are left out, a line reads the same either way for run counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    UpRight,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::UpRight,
        Direction::DownRight,
    ];

    /// Column and row increments of a single step.
    pub fn offsets(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
            Direction::UpRight => (1, 1),
            Direction::DownRight => (1, -1),
        }
    }
}

/// Two-dimensional fixed-length array stored column by column.
/// Width and height are defined by generic parameters `C` and `R`.
#[derive(Clone, Debug)]
pub struct Grid<T, C: ArrayLength, R: ArrayLength> {
    contents: GenericArray<GenericArray<T, R>, C>,
}

impl<T: Default, C: ArrayLength, R: ArrayLength> Default for Grid<T, C, R> {
    fn default() -> Self {
        Self {
            contents: Default::default(),
        }
    }
}

/// Derefs to the slice of columns.
impl<T, C: ArrayLength, R: ArrayLength> Deref for Grid<T, C, R> {
    type Target = [GenericArray<T, R>];

    fn deref(&self) -> &Self::Target {
        self.contents.as_slice()
    }
}

impl<T, C: ArrayLength, R: ArrayLength> Index<GridIndex> for Grid<T, C, R> {
    type Output = T;

    fn index(&self, index: GridIndex) -> &Self::Output {
        &self.contents[index.col()][index.row()]
    }
}

impl<T, C: ArrayLength, R: ArrayLength> IndexMut<GridIndex> for Grid<T, C, R> {
    fn index_mut(&mut self, index: GridIndex) -> &mut Self::Output {
        &mut self.contents[index.col()][index.row()]
    }
}

impl<T, C: ArrayLength, R: ArrayLength> Grid<T, C, R> {
    pub fn width(&self) -> usize {
        C::to_usize()
    }

    pub fn height(&self) -> usize {
        R::to_usize()
    }

    /// Returns `true` if `index` points inside the grid.
    pub fn contains(&self, index: GridIndex) -> bool {
        index.col() < self.width() && index.row() < self.height()
    }

    /// Returns an iterator to indexed grid elements column by column, bottom to top.
    pub fn all_indexed(&self) -> impl Iterator<Item = (GridIndex, &T)> {
        (0..self.width())
            .flat_map(move |col| self.line(GridIndex::new(col, 0), Direction::Up).indexed())
    }

    /// Returns an iterator in `direction` that starts with `start`.
    pub fn line(&self, start: GridIndex, direction: Direction) -> LineIterator<'_, T, C, R> {
        LineIterator {
            current: Some(start),
            direction,
            grid: self,
        }
    }

    /// Returns every maximal line in `direction`.
    /// Each cell of the grid belongs to exactly one of them.
    pub fn lines(&self, direction: Direction) -> impl Iterator<Item = LineIterator<'_, T, C, R>> {
        let (width, height) = (self.width(), self.height());
        let starts: Vec<GridIndex> = match direction {
            Direction::Up => (0..width).map(|col| GridIndex::new(col, 0)).collect(),
            Direction::Right => (0..height).map(|row| GridIndex::new(0, row)).collect(),
            Direction::UpRight => (0..height)
                .rev()
                .map(|row| GridIndex::new(0, row))
                .chain((1..width).map(|col| GridIndex::new(col, 0)))
                .collect(),
            Direction::DownRight => (0..height)
                .map(|row| GridIndex::new(0, row))
                .chain((1..width).map(|col| GridIndex::new(col, height - 1)))
                .collect(),
        };
        starts
            .into_iter()
            .map(move |start| self.line(start, direction))
    }
}

/// An iterator walking the [`Grid`] in a fixed [`Direction`].
/// Stops when the underlying [`GridIndex`] goes out of [`Grid`] scope.
pub struct LineIterator<'a, T, C: ArrayLength, R: ArrayLength> {
    current: Option<GridIndex>,
    direction: Direction,
    grid: &'a Grid<T, C, R>,
}

impl<T, C: ArrayLength, R: ArrayLength> Clone for LineIterator<'_, T, C, R> {
    fn clone(&self) -> Self {
        Self {
            current: self.current,
            direction: self.direction,
            grid: self.grid,
        }
    }
}

impl<'a, T, C: ArrayLength, R: ArrayLength> Iterator for LineIterator<'a, T, C, R> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.get_index()?;
        self.current = current.step(self.direction);
        Some(&self.grid[current])
    }
}

/// Needed to create iterator adapter which gives the current iteration [`GridIndex`]
/// as well as the next value.
pub trait WithGridIndex {
    /// Returns current [`GridIndex`] if it is valid, otherwise [`None`].
    fn get_index(&self) -> Option<GridIndex>;

    /// Returns an iterator which gives the current iteration [`GridIndex`]
    /// as well as the next value.
    fn indexed(self) -> IndexedGridIterator<Self>
    where
        Self: Sized,
    {
        IndexedGridIterator { it: self }
    }
}

impl<T, C: ArrayLength, R: ArrayLength> WithGridIndex for LineIterator<'_, T, C, R> {
    fn get_index(&self) -> Option<GridIndex> {
        self.current.filter(|index| self.grid.contains(*index))
    }
}

/// An iterator that yields the current [`GridIndex`] and the element during iteration.
pub struct IndexedGridIterator<It> {
    it: It,
}

impl<It> Iterator for IndexedGridIterator<It>
where
    It: Iterator + WithGridIndex,
{
    type Item = (GridIndex, It::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.it.get_index()?;
        let item = self.it.next()?;
        Some((index, item))
    }
}
