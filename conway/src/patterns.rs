// patterns.rs - Static cell layouts that can be stamped into a world
// Offsets are (x, y) relative to the pattern's upper-left corner.

use serde::{Deserialize, Serialize};

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

impl Pattern {
    /// Bounding box (width, height) of the pattern.
    pub fn extent(&self) -> (usize, usize) {
        self.cells
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
    }
}

pub const BLOCK: Pattern = Pattern {
    name: "Block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

pub const BLINKER: Pattern = Pattern {
    name: "Blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

pub const TOAD: Pattern = Pattern {
    name: "Toad",
    cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
};

pub const BEACON: Pattern = Pattern {
    name: "Beacon",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "R-pentomino",
    cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
};

// The four glider orientations, each heading away from its corner.
pub const GLIDER_UPPER_LEFT: Pattern = Pattern {
    name: "Glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

pub const GLIDER_UPPER_RIGHT: Pattern = Pattern {
    name: "Glider (upper right)",
    cells: &[(1, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
};

pub const GLIDER_LOWER_LEFT: Pattern = Pattern {
    name: "Glider (lower left)",
    cells: &[(0, 0), (1, 0), (2, 0), (2, 1), (1, 2)],
};

pub const GLIDER_LOWER_RIGHT: Pattern = Pattern {
    name: "Glider (lower right)",
    cells: &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 2)],
};

/// Patterns selectable by name.
pub const PATTERNS: &[Pattern] = &[BLOCK, BLINKER, TOAD, BEACON, GLIDER_UPPER_LEFT, R_PENTOMINO];

/// Case-insensitive lookup in [`PATTERNS`].
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Grid corner used as the anchor for glider injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// Side length of the box a glider occupies.
pub const GLIDER_SPAN: usize = 3;

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    pub fn glider(self) -> &'static Pattern {
        match self {
            Quadrant::UpperLeft => &GLIDER_UPPER_LEFT,
            Quadrant::UpperRight => &GLIDER_UPPER_RIGHT,
            Quadrant::LowerLeft => &GLIDER_LOWER_LEFT,
            Quadrant::LowerRight => &GLIDER_LOWER_RIGHT,
        }
    }

    /// Upper-left corner of the glider's box in a `width x height` grid.
    /// Both dimensions must be at least [`GLIDER_SPAN`].
    pub fn anchor(self, width: usize, height: usize) -> (usize, usize) {
        let right = width - GLIDER_SPAN;
        let bottom = height - GLIDER_SPAN;
        match self {
            Quadrant::UpperLeft => (0, 0),
            Quadrant::UpperRight => (right, 0),
            Quadrant::LowerLeft => (0, bottom),
            Quadrant::LowerRight => (right, bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_glider_has_five_cells_in_its_box() {
        for quadrant in Quadrant::ALL {
            let glider = quadrant.glider();
            assert_eq!(glider.cells.len(), 5);
            assert_eq!(glider.extent(), (GLIDER_SPAN, GLIDER_SPAN));
        }
    }

    #[test]
    fn test_glider_anchors_hit_corners() {
        // Absolute cells for the upper-right glider in a 10x10 grid
        let (ax, ay) = Quadrant::UpperRight.anchor(10, 10);
        let mut cells: Vec<(usize, usize)> = Quadrant::UpperRight
            .glider()
            .cells
            .iter()
            .map(|&(x, y)| (ax + x, ay + y))
            .collect();
        cells.sort();
        assert_eq!(cells, vec![(7, 1), (7, 2), (8, 0), (8, 2), (9, 2)]);

        let (ax, ay) = Quadrant::LowerRight.anchor(10, 10);
        let mut cells: Vec<(usize, usize)> = Quadrant::LowerRight
            .glider()
            .cells
            .iter()
            .map(|&(x, y)| (ax + x, ay + y))
            .collect();
        cells.sort();
        assert_eq!(cells, vec![(7, 7), (7, 8), (8, 7), (8, 9), (9, 7)]);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("blinker").map(|p| p.name), Some("Blinker"));
        assert_eq!(find("R-PENTOMINO").map(|p| p.name), Some("R-pentomino"));
        assert!(find("spaceship").is_none());
    }

    #[test]
    fn test_extent() {
        assert_eq!(BLINKER.extent(), (3, 1));
        assert_eq!(BEACON.extent(), (4, 4));
    }
}
