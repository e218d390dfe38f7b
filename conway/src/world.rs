// world.rs - Bounded Game of Life grid with anti-stagnation policy
// Cells are stored flat in column-major order: index = x * height + y.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::patterns::{GLIDER_SPAN, Pattern, Quadrant};

/// A cell is seeded when a draw from `0..100` is strictly greater than this.
pub const SEED_THRESHOLD: u32 = 90;
/// Diversity scores below this count as stuck.
pub const DIVERSITY_FLOOR: usize = 3;
/// Populations below this are reseeded.
pub const MIN_POPULATION: usize = 2;

// Moore neighborhood, no wraparound.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Live/dead layout of a whole generation, one bit per cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Which interventions a `handle_stuck` call applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StuckReport {
    /// Coordinate of the cell spawned next to an existing one.
    pub perturbed: Option<(usize, usize)>,
    pub reseeded: bool,
    pub glider: Option<Quadrant>,
}

impl StuckReport {
    pub fn is_quiet(&self) -> bool {
        self.perturbed.is_none() && !self.reseeded && self.glider.is_none()
    }
}

/// Read-only `cols x rows` view into a world, indexed from its own origin.
#[derive(Debug, Clone)]
pub struct ScreenWindow<'a> {
    cols: usize,
    rows: usize,
    cells: Vec<&'a Cell>,
}

impl<'a> ScreenWindow<'a> {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&'a Cell> {
        if i < self.cols && j < self.rows {
            Some(self.cells[i * self.rows + j])
        } else {
            None
        }
    }

    /// Live cells with their window-relative coordinates, column by column.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize, &'a Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_live())
            .map(|(idx, cell)| (idx / self.rows, idx % self.rows, *cell))
    }
}

pub struct World {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    history: VecDeque<Fingerprint>,
    max_history: usize,
    glider_chance_percent: u32,
    generation: u64,
    rng: StdRng,
}

impl World {
    /// All-dead world with default policy settings, seeded from the OS.
    pub fn new(width: usize, height: usize) -> WorldResult<Self> {
        Self::from_config(&WorldConfig {
            width,
            height,
            ..WorldConfig::default()
        })
    }

    /// All-dead world whose random choices are reproducible from `seed`.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> WorldResult<Self> {
        Self::from_config(&WorldConfig {
            width,
            height,
            seed: Some(seed),
            ..WorldConfig::default()
        })
    }

    pub fn from_config(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            width: config.width,
            height: config.height,
            cells: vec![Cell::Dead; config.width * config.height],
            history: VecDeque::with_capacity(config.max_history + 1),
            max_history: config.max_history,
            glider_chance_percent: config.glider_chance_percent,
            generation: 0,
            rng,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Ticks applied since creation or the last `clear`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// All cells, column-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.in_bounds(nx, ny).then_some((nx, ny))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> WorldResult<()> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y, 1, 1));
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        Ok(())
    }

    /// Brings a fresh, randomly colored cell to life at `(x, y)`.
    fn spawn(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        self.cells[idx] = Cell::live(&mut self.rng);
    }

    /// Kills every cell and forgets history and generation count.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
        self.history.clear();
        self.generation = 0;
    }

    /// Sets every cell of `pattern` live with its upper-left corner at `(x, y)`.
    /// Cells outside the pattern are left as they are.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) -> WorldResult<()> {
        let (cols, rows) = pattern.extent();
        if !self.window_fits(x, y, cols, rows) {
            return Err(self.out_of_bounds(x, y, cols, rows));
        }
        for &(dx, dy) in pattern.cells {
            self.spawn(x + dx, y + dy);
        }
        Ok(())
    }

    /// Randomly brings roughly 9% of the cells to life; the rest keep their state.
    pub fn seed_random(&mut self) {
        for idx in 0..self.cells.len() {
            if self.rng.random_range(0..100) > SEED_THRESHOLD {
                self.cells[idx] = Cell::live(&mut self.rng);
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_live()).count()
    }

    pub fn live_neighbor_count(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for &(dx, dy) in &NEIGHBOR_OFFSETS {
            if let Some((nx, ny)) = self.offset(x, y, dx, dy) {
                if self.cells[self.index(nx, ny)].is_live() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Advances the whole grid by one generation and records its fingerprint.
    pub fn tick(&mut self) {
        let mut counts = Vec::with_capacity(self.cells.len());
        for x in 0..self.width {
            for y in 0..self.height {
                counts.push(self.live_neighbor_count(x, y));
            }
        }

        let current = std::mem::take(&mut self.cells);
        let mut next = Vec::with_capacity(current.len());
        for (mut cell, count) in current.into_iter().zip(counts) {
            let next_cell = match (cell.is_live(), count) {
                // Survival keeps the same cell, color included
                (true, 2) | (true, 3) => {
                    cell.advance_age();
                    cell
                }
                (false, 3) => Cell::live(&mut self.rng), // Birth
                _ => Cell::Dead,                         // Death or stays dead
            };
            next.push(next_cell);
        }
        self.cells = next;
        self.generation += 1;

        self.record_fingerprint();
        trace!(
            generation = self.generation,
            live = self.live_count(),
            diversity = self.history_diversity_score(),
            "tick"
        );
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut bits = vec![0u8; self.cells.len().div_ceil(8)];
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.is_live() {
                bits[idx / 8] |= 1 << (idx % 8);
            }
        }
        Fingerprint(bits)
    }

    fn record_fingerprint(&mut self) {
        self.history.push_back(self.fingerprint());
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Number of distinct generations in the recent history window.
    pub fn history_diversity_score(&self) -> usize {
        self.history.iter().collect::<HashSet<_>>().len()
    }

    /// Applies the anti-stagnation policy once. Meant to run after every `tick`.
    pub fn handle_stuck(&mut self) -> StuckReport {
        let mut report = StuckReport::default();

        let diversity = self.history_diversity_score();
        if diversity < DIVERSITY_FLOOR {
            report.perturbed = self.inject_random_new_neighbor();
            debug!(diversity, spawned = ?report.perturbed, "low diversity, perturbing");
        }

        let live = self.live_count();
        if live < MIN_POPULATION {
            self.seed_random();
            report.reseeded = true;
            debug!(live, reseeded_live = self.live_count(), "population collapsed, reseeding");
        }

        if self.glider_chance_percent > self.rng.random_range(0..100) {
            report.glider = self.inject_random_glider();
        }

        report
    }

    /// Spawns a live cell next to a randomly chosen live one, overwriting
    /// whatever was there. Returns the spawned coordinate.
    pub fn inject_random_new_neighbor(&mut self) -> Option<(usize, usize)> {
        // A single-cell grid has no in-bounds neighbor to pick
        if self.cells.len() < 2 {
            return None;
        }
        let live: Vec<(usize, usize)> = (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| (x, y)))
            .filter(|&(x, y)| self.cells[self.index(x, y)].is_live())
            .collect();
        if live.is_empty() {
            return None;
        }

        let (x, y) = live[self.rng.random_range(0..live.len())];
        let target = loop {
            let dx = self.rng.random_range(-1i32..=1) as isize;
            let dy = self.rng.random_range(-1i32..=1) as isize;
            if dx == 0 && dy == 0 {
                continue;
            }
            if let Some(pos) = self.offset(x, y, dx, dy) {
                break pos;
            }
        };

        self.spawn(target.0, target.1);
        Some(target)
    }

    /// Stamps a glider at a uniformly chosen corner.
    /// Returns `None` when the grid is too small to hold one.
    pub fn inject_random_glider(&mut self) -> Option<Quadrant> {
        let quadrant = Quadrant::ALL[self.rng.random_range(0..Quadrant::ALL.len())];
        self.inject_glider(quadrant).then_some(quadrant)
    }

    /// Stamps the glider for `quadrant` into its corner, heading inward.
    pub fn inject_glider(&mut self, quadrant: Quadrant) -> bool {
        if self.width < GLIDER_SPAN || self.height < GLIDER_SPAN {
            return false;
        }
        let (ax, ay) = quadrant.anchor(self.width, self.height);
        for &(dx, dy) in quadrant.glider().cells {
            self.spawn(ax + dx, ay + dy);
        }
        debug!(?quadrant, generation = self.generation, "glider injected");
        true
    }

    fn window_fits(&self, origin_x: usize, origin_y: usize, cols: usize, rows: usize) -> bool {
        origin_x.checked_add(cols).is_some_and(|end| end <= self.width)
            && origin_y.checked_add(rows).is_some_and(|end| end <= self.height)
    }

    fn out_of_bounds(&self, origin_x: usize, origin_y: usize, cols: usize, rows: usize) -> WorldError {
        WorldError::OutOfBounds {
            origin_x,
            origin_y,
            cols,
            rows,
            width: self.width,
            height: self.height,
        }
    }

    /// Borrows the `cols x rows` window whose upper-left corner is `(origin_x, origin_y)`.
    pub fn get_screen_cells(
        &self,
        origin_x: usize,
        origin_y: usize,
        cols: usize,
        rows: usize,
    ) -> WorldResult<ScreenWindow<'_>> {
        if !self.window_fits(origin_x, origin_y, cols, rows) {
            return Err(self.out_of_bounds(origin_x, origin_y, cols, rows));
        }
        let mut cells = Vec::with_capacity(cols * rows);
        for x in origin_x..origin_x + cols {
            for y in origin_y..origin_y + rows {
                cells.push(&self.cells[self.index(x, y)]);
            }
        }
        Ok(ScreenWindow { cols, rows, cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Rgb;
    use crate::patterns::BLINKER;

    fn world_with(width: usize, height: usize, live: &[(usize, usize)]) -> World {
        let mut world = World::with_seed(width, height, 42).unwrap();
        for &(x, y) in live {
            world.set(x, y, Cell::with_color(Rgb::new(200, 100, 50))).unwrap();
        }
        world
    }

    fn quiet_config(width: usize, height: usize) -> WorldConfig {
        WorldConfig {
            width,
            height,
            glider_chance_percent: 0,
            seed: Some(3),
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            World::new(0, 5),
            Err(WorldError::InvalidDimension { width: 0, height: 5 })
        ));
        assert!(matches!(
            World::new(5, 0),
            Err(WorldError::InvalidDimension { width: 5, height: 0 })
        ));
    }

    #[test]
    fn test_new_world_is_dead() {
        let world = World::with_seed(7, 4, 1).unwrap();
        assert_eq!(world.cells().len(), 28);
        assert_eq!(world.live_count(), 0);
        assert_eq!(world.history_len(), 0);
    }

    #[test]
    fn test_count_neighbors_at_edges() {
        let world = world_with(3, 3, &[(0, 0), (1, 0), (2, 2)]);
        assert_eq!(world.live_neighbor_count(0, 0), 1);
        assert_eq!(world.live_neighbor_count(1, 1), 3);
        assert_eq!(world.live_neighbor_count(2, 0), 1);
        assert_eq!(world.live_neighbor_count(2, 1), 2);
    }

    #[test]
    fn test_seed_random_rate() {
        let mut world = World::with_seed(100, 100, 11).unwrap();
        world.seed_random();
        let live = world.live_count();
        // 9 of every 100 draws exceed the threshold
        assert!((700..=1100).contains(&live), "live = {live}");
    }

    #[test]
    fn test_fingerprint_ignores_color_and_age() {
        let a = world_with(4, 4, &[(1, 1), (2, 2)]);
        let mut b = World::with_seed(4, 4, 99).unwrap();
        b.set(1, 1, Cell::with_color(Rgb::new(1, 1, 1))).unwrap();
        b.set(2, 2, Cell::Live { color: Rgb::new(9, 9, 9), age: 5 }).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.set(0, 0, Cell::with_color(Rgb::BLACK)).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut world = World::with_seed(20, 20, 5).unwrap();
        world.seed_random();
        for _ in 0..25 {
            world.tick();
            assert!(world.history_len() <= 10);
            let score = world.history_diversity_score();
            assert!((1..=10).contains(&score));
        }
        assert_eq!(world.history_len(), 10);
        assert_eq!(world.generation(), 25);
    }

    #[test]
    fn test_static_grid_scores_one() {
        let mut world = world_with(6, 6, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        for _ in 0..12 {
            world.tick();
        }
        assert_eq!(world.history_diversity_score(), 1);
    }

    #[test]
    fn test_blinker_scores_two() {
        let mut world = World::with_seed(5, 5, 1).unwrap();
        world.stamp(&BLINKER, 1, 2).unwrap();
        for _ in 0..10 {
            world.tick();
        }
        assert_eq!(world.history_diversity_score(), 2);
    }

    #[test]
    fn test_inject_neighbor_noop_when_empty() {
        let mut world = World::with_seed(5, 5, 1).unwrap();
        assert_eq!(world.inject_random_new_neighbor(), None);
        assert_eq!(world.live_count(), 0);
    }

    #[test]
    fn test_inject_neighbor_noop_on_single_cell_grid() {
        let mut world = world_with(1, 1, &[(0, 0)]);
        assert_eq!(world.inject_random_new_neighbor(), None);
        assert_eq!(world.live_count(), 1);
    }

    #[test]
    fn test_inject_neighbor_lands_next_to_live_cell() {
        let mut world = world_with(5, 5, &[(0, 0)]);
        let (x, y) = world.inject_random_new_neighbor().unwrap();
        assert!(x <= 1 && y <= 1 && (x, y) != (0, 0));
        assert!(world.get(x, y).unwrap().is_live());
        assert_eq!(world.live_count(), 2);
    }

    #[test]
    fn test_inject_neighbor_from_corner_stays_in_bounds() {
        for seed in 0..20 {
            let mut world = World::with_seed(2, 2, seed).unwrap();
            world.set(1, 1, Cell::with_color(Rgb::new(4, 4, 4))).unwrap();
            let spawned = world.inject_random_new_neighbor().unwrap();
            assert!(matches!(spawned, (0, 0) | (0, 1) | (1, 0)), "seed {seed}: {spawned:?}");
            assert!(world.get(spawned.0, spawned.1).unwrap().is_live());
        }
    }

    #[test]
    fn test_handle_stuck_reseeds_collapsed_world() {
        let mut world = World::from_config(&quiet_config(38, 38)).unwrap();
        let report = world.handle_stuck();
        assert!(report.reseeded);
        assert_eq!(report.perturbed, None);
        assert_eq!(report.glider, None);
        assert!(world.live_count() >= MIN_POPULATION);
    }

    #[test]
    fn test_handle_stuck_perturbs_still_life() {
        let mut world = World::from_config(&quiet_config(8, 8)).unwrap();
        world.stamp(&crate::patterns::BLOCK, 3, 3).unwrap();
        world.tick();
        world.tick();
        let report = world.handle_stuck();
        let (x, y) = report.perturbed.unwrap();
        assert!(world.get(x, y).unwrap().is_live());
        assert!(x.abs_diff(4) <= 2 && y.abs_diff(4) <= 2);
        assert!(!report.reseeded);
    }

    #[test]
    fn test_handle_stuck_quiet_when_diverse() {
        let mut world = World::from_config(&quiet_config(10, 10)).unwrap();
        world.inject_glider(Quadrant::UpperLeft);
        for _ in 0..4 {
            world.tick();
        }
        assert!(world.handle_stuck().is_quiet());
    }

    #[test]
    fn test_certain_glider_chance_always_fires() {
        let config = WorldConfig {
            glider_chance_percent: 100,
            ..quiet_config(12, 12)
        };
        let mut world = World::from_config(&config).unwrap();
        world.seed_random();
        world.tick();
        let report = world.handle_stuck();
        assert!(report.glider.is_some());
    }

    #[test]
    fn test_glider_skipped_on_narrow_grid() {
        let mut world = World::with_seed(2, 10, 1).unwrap();
        assert!(!world.inject_glider(Quadrant::LowerLeft));
        assert_eq!(world.live_count(), 0);
    }

    #[test]
    fn test_stamp_out_of_bounds() {
        let mut world = World::with_seed(4, 4, 1).unwrap();
        assert!(matches!(
            world.stamp(&BLINKER, 2, 0),
            Err(WorldError::OutOfBounds { cols: 3, rows: 1, .. })
        ));
        assert_eq!(world.live_count(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut world = World::with_seed(6, 6, 8).unwrap();
        world.seed_random();
        world.tick();
        world.clear();
        assert_eq!(world.live_count(), 0);
        assert_eq!(world.history_len(), 0);
        assert_eq!(world.generation(), 0);
    }

    #[test]
    fn test_window_live_cells_are_relative() {
        let world = world_with(6, 6, &[(2, 3), (4, 4), (0, 0)]);
        let window = world.get_screen_cells(2, 2, 3, 3).unwrap();
        let live: Vec<(usize, usize)> = window.live_cells().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(live, vec![(0, 1), (2, 2)]);
        assert!(window.get(3, 0).is_none());
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let run = || {
            let mut world = World::with_seed(16, 16, 2024).unwrap();
            world.seed_random();
            for _ in 0..30 {
                world.tick();
                world.handle_stuck();
            }
            world.fingerprint()
        };
        assert_eq!(run(), run());
    }
}
