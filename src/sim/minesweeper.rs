//! Minesweeper
//!
//! Not tick-driven: the board changes only through [`Minesweeper::reveal`] and
//! [`Minesweeper::toggle_flag`]. The first reveal of a game never hits a mine;
//! if it would, the mines are laid again around it.

use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::lang::Label;

/// Board dimensions and mine count
///
/// Always at least one cell and one safe cell, also when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardFields")]
pub struct BoardSpec {
    rows: usize,
    cols: usize,
    mines: usize,
}

#[derive(Deserialize)]
struct BoardFields {
    rows: usize,
    cols: usize,
    mines: usize,
}

impl TryFrom<BoardFields> for BoardSpec {
    type Error = ArcadeError;

    fn try_from(fields: BoardFields) -> Result<Self, ArcadeError> {
        Self::checked(fields.rows, fields.cols, fields.mines)
    }
}

impl BoardSpec {
    pub const fn new(rows: usize, cols: usize, mines: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        assert!(mines < rows * cols, "board needs at least one safe cell");
        Self { rows, cols, mines }
    }

    /// Like [`BoardSpec::new`] but reports a bad shape instead of panicking
    pub fn checked(rows: usize, cols: usize, mines: usize) -> Result<Self, ArcadeError> {
        match rows.checked_mul(cols) {
            Some(cells) if cells > 0 && mines < cells => Ok(Self { rows, cols, mines }),
            _ => Err(ArcadeError::InvalidSetting {
                key: "board",
                value: format!("{rows}x{cols} with {mines} mines"),
            }),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn safe_cells(&self) -> usize {
        self.cells() - self.mines
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    fn index(&self, at: Coord) -> usize {
        assert!(self.contains(at), "{at:?} is outside a {}x{} board", self.rows, self.cols);
        at.row * self.cols + at.col
    }

    fn coord(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    /// The up-to-eight cells around `at`
    pub fn neighbors(self, at: Coord) -> impl Iterator<Item = Coord> {
        let (row, col) = (at.row as isize, at.col as isize);
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
            .filter(|&offset| offset != (0, 0))
            .filter_map(move |(dr, dc)| {
                let (r, c) = (row + dr, col + dc);
                let inside =
                    (0..self.rows as isize).contains(&r) && (0..self.cols as isize).contains(&c);
                inside.then(|| Coord::new(r as usize, c as usize))
            })
    }
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self::new(9, 9, 10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    /// Adjacent mines, 0..=8. Zero for mines themselves.
    pub neighbors: u8,
}

/// What a tile shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileView {
    Hidden,
    Flagged,
    Mine,
    Empty,
    Number(u8, NumberTint),
}

impl Tile {
    pub fn view(&self) -> TileView {
        if self.flagged {
            return TileView::Flagged;
        }
        if !self.revealed {
            return TileView::Hidden;
        }
        if self.mine {
            return TileView::Mine;
        }
        match NumberTint::for_count(self.neighbors) {
            Some(tint) => TileView::Number(self.neighbors, tint),
            None => TileView::Empty,
        }
    }
}

/// Text color of a revealed neighbor count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberTint {
    Blue,
    Green,
    Red,
    Purple,
    Yellow,
    Pink,
    Black,
    Gray,
}

impl NumberTint {
    /// None for zero (nothing drawn)
    pub fn for_count(count: u8) -> Option<Self> {
        let tint = match count {
            0 => return None,
            1 => NumberTint::Blue,
            2 => NumberTint::Green,
            3 => NumberTint::Red,
            4 => NumberTint::Purple,
            5 => NumberTint::Yellow,
            6 => NumberTint::Pink,
            7 => NumberTint::Black,
            8 => NumberTint::Gray,
            _ => panic!("a cell has at most 8 neighbors, got {count}"),
        };
        Some(tint)
    }

    pub fn hex(&self) -> &'static str {
        match self {
            NumberTint::Blue => "#2563eb",
            NumberTint::Green => "#16a34a",
            NumberTint::Red => "#dc2626",
            NumberTint::Purple => "#9333ea",
            NumberTint::Yellow => "#ca8a04",
            NumberTint::Pink => "#db2777",
            NumberTint::Black => "#000000",
            NumberTint::Gray => "#4b5563",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl BoardStatus {
    pub fn label(&self) -> Label {
        match self {
            BoardStatus::Playing => Label::Playing,
            BoardStatus::Won => Label::YouWin,
            BoardStatus::Lost => Label::GameOver,
        }
    }
}

/// Result of a reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Already revealed, flagged, or the game is over
    Ignored,
    /// Safe; this many tiles were newly revealed
    Opened(usize),
    Detonated,
}

/// Lay `spec.mines` mines uniformly, never on `exclude`
fn lay_mines(spec: BoardSpec, exclude: Option<Coord>, rng: &mut Pcg32) -> Vec<Tile> {
    let skip = exclude.map(|at| spec.index(at));
    let sites: Vec<usize> = (0..spec.cells()).filter(|&i| Some(i) != skip).collect();
    let mines: Vec<Coord> = sites
        .choose_multiple(rng, spec.mines)
        .map(|&i| spec.coord(i))
        .collect();
    build_tiles(spec, &mines)
}

fn build_tiles(spec: BoardSpec, mines: &[Coord]) -> Vec<Tile> {
    let mut tiles = vec![Tile::default(); spec.cells()];
    for &at in mines {
        tiles[spec.index(at)].mine = true;
    }
    for index in 0..tiles.len() {
        if tiles[index].mine {
            continue;
        }
        let at = spec.coord(index);
        let count = spec
            .neighbors(at)
            .filter(|&n| tiles[spec.index(n)].mine)
            .count();
        tiles[index].neighbors = count as u8;
    }
    tiles
}

#[derive(Debug, Clone, Serialize)]
pub struct Minesweeper {
    spec: BoardSpec,
    /// Row-major
    tiles: Vec<Tile>,
    status: BoardStatus,
    flags_remaining: usize,
    #[serde(skip)]
    first_reveal: bool,
    #[serde(skip)]
    rng: Pcg32,
}

impl Minesweeper {
    pub fn new(spec: BoardSpec, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let tiles = lay_mines(spec, None, &mut rng);
        Self::from_parts(spec, tiles, rng)
    }

    /// Board with mines at fixed positions
    pub fn with_mines(spec: BoardSpec, mines: &[Coord], seed: u64) -> Self {
        let unique: HashSet<Coord> = mines.iter().copied().collect();
        assert_eq!(unique.len(), spec.mines, "mine list must match the board spec");
        let tiles = build_tiles(spec, mines);
        Self::from_parts(spec, tiles, Pcg32::seed_from_u64(seed))
    }

    fn from_parts(spec: BoardSpec, tiles: Vec<Tile>, rng: Pcg32) -> Self {
        assert!(spec.mines < spec.cells(), "board needs at least one safe cell");
        assert_eq!(tiles.len(), spec.cells());
        log::debug!(
            "minesweeper: {}x{} board with {} mines",
            spec.rows,
            spec.cols,
            spec.mines
        );
        Self {
            spec,
            tiles,
            status: BoardStatus::Playing,
            flags_remaining: spec.mines,
            first_reveal: true,
            rng,
        }
    }

    /// Fresh board with the same dimensions
    pub fn reset(&mut self) {
        self.tiles = lay_mines(self.spec, None, &mut self.rng);
        self.status = BoardStatus::Playing;
        self.flags_remaining = self.spec.mines;
        self.first_reveal = true;
        log::info!("minesweeper reset");
    }

    pub fn reveal(&mut self, at: Coord) -> Reveal {
        if self.status != BoardStatus::Playing {
            return Reveal::Ignored;
        }
        let tile = self.tile(at);
        if tile.revealed || tile.flagged {
            return Reveal::Ignored;
        }

        if std::mem::take(&mut self.first_reveal) && tile.mine {
            self.relay_around(at);
        }

        let index = self.spec.index(at);
        self.tiles[index].revealed = true;

        if self.tiles[index].mine {
            for tile in self.tiles.iter_mut().filter(|tile| tile.mine) {
                tile.revealed = true;
            }
            self.status = BoardStatus::Lost;
            log::info!("minesweeper: mine at ({}, {})", at.row, at.col);
            return Reveal::Detonated;
        }

        let mut opened = 1;
        if self.tiles[index].neighbors == 0 {
            opened += self.flood_from(at);
        }

        if self.revealed_safe() == self.spec.safe_cells() {
            self.status = BoardStatus::Won;
            log::info!("minesweeper: board cleared");
        }
        Reveal::Opened(opened)
    }

    /// Lay the mines again with `at` kept clear. Flags stay where they are.
    fn relay_around(&mut self, at: Coord) {
        log::debug!("minesweeper: first reveal on a mine, relaying board");
        let mut tiles = lay_mines(self.spec, Some(at), &mut self.rng);
        for (fresh, old) in tiles.iter_mut().zip(&self.tiles) {
            fresh.flagged = old.flagged;
        }
        self.tiles = tiles;
    }

    /// Breadth-first reveal out of a zero cell. Returns tiles newly revealed.
    fn flood_from(&mut self, start: Coord) -> usize {
        let mut opened = 0;
        let mut queue = VecDeque::from([start]);
        let mut visited = HashSet::new();

        while let Some(at) = queue.pop_front() {
            if !visited.insert(at) {
                continue;
            }
            for n in self.spec.neighbors(at) {
                let tile = &mut self.tiles[self.spec.index(n)];
                if tile.revealed || tile.flagged || tile.mine {
                    continue;
                }
                tile.revealed = true;
                opened += 1;
                if tile.neighbors == 0 {
                    queue.push_back(n);
                }
            }
        }
        opened
    }

    /// Flag or unflag a hidden tile. Returns false if nothing changed.
    pub fn toggle_flag(&mut self, at: Coord) -> bool {
        if self.status != BoardStatus::Playing {
            return false;
        }
        let index = self.spec.index(at);
        let tile = &mut self.tiles[index];
        if tile.revealed {
            return false;
        }
        if tile.flagged {
            tile.flagged = false;
            self.flags_remaining += 1;
        } else if self.flags_remaining > 0 {
            tile.flagged = true;
            self.flags_remaining -= 1;
        } else {
            log::trace!("minesweeper: no flags left");
            return false;
        }
        true
    }

    pub fn spec(&self) -> BoardSpec {
        self.spec
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn flags_remaining(&self) -> usize {
        self.flags_remaining
    }

    pub fn tile(&self, at: Coord) -> Tile {
        self.tiles[self.spec.index(at)]
    }

    /// Tiles one row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.spec.cols)
    }

    pub fn revealed_safe(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.revealed && !tile.mine)
            .count()
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.mine)
            .map(|(i, _)| self.spec.coord(i))
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(self)?)
    }
}
