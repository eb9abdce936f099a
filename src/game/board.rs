use super::state::{Position, Snake};

/// What a board cell holds in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Snake,
    Food,
}

/// Read-only N x N view of the snake and food, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Derive the board from the snake and food. Food is marked last.
    pub fn derive(size: usize, snake: &Snake, food: Position) -> Self {
        let mut board = Self {
            size,
            cells: vec![Cell::Empty; size * size],
        };

        for &segment in snake.segments() {
            board.set(segment, Cell::Snake);
        }
        board.set(food, Cell::Food);

        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are off the board.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.size && col < self.size, "cell ({row}, {col}) off board");
        self.cells[row * self.size + col]
    }

    pub fn at(&self, pos: Position) -> Cell {
        self.get(pos.row as usize, pos.col as usize)
    }

    /// Iterate the board one row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        let idx = pos.row as usize * self.size + pos.col as usize;
        self.cells[idx] = cell;
    }
}
