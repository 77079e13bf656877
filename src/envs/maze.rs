use crate::common::{defs::*, error::*};
use crate::mdps::mdp::TabularMdp;
use itertools::iproduct;
use ndarray::{Array2, Array3};

pub const N_ROWS: usize = 4;
pub const N_COLS: usize = 4;
const N_CELLS: usize = N_ROWS * N_COLS;

/// Absorbing state entered after leaving the goal.
pub const END: Discrete = N_CELLS;
pub const N_STATES: usize = N_CELLS + 1;
pub const N_ACTIONS: usize = 4;

pub const START: Discrete = 0;
pub const GOAL: Discrete = N_CELLS - 1;
pub const TRAPS: [Discrete; 2] = [6, 9];

const STEP_REWARD: Continous = -1.;
const TRAP_REWARD: Continous = -70.;
const GOAL_REWARD: Continous = 100.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Move {
    const ALL: [Move; N_ACTIONS] = [Move::Up, Move::Down, Move::Left, Move::Right];

    fn perpendicular(self) -> [Move; 2] {
        match self {
            Move::Up | Move::Down => [Move::Left, Move::Right],
            Move::Left | Move::Right => [Move::Up, Move::Down],
        }
    }

    /// Cell reached from `cell`; bumping into a wall stays put.
    fn apply(self, cell: Discrete) -> Discrete {
        let (row, col) = (cell / N_COLS, cell % N_COLS);
        match self {
            Move::Up if row > 0 => cell - N_COLS,
            Move::Down if row + 1 < N_ROWS => cell + N_COLS,
            Move::Left if col > 0 => cell - 1,
            Move::Right if col + 1 < N_COLS => cell + 1,
            _ => cell,
        }
    }
}

/// 4x4 grid maze. The intended move succeeds with probability `1 - 2b` and each
/// perpendicular move happens with probability `b`.
///
/// Every step costs 1, trap cells cost 70, and any action taken at the goal pays
/// 100 and moves to the absorbing [`END`] state.
pub fn build_maze_mdp(b: Continous, discount: Continous) -> Result<TabularMdp> {
    if !(0. ..=0.5).contains(&b) {
        return Err(Error::InvalidMdp(format!(
            "maze slip probability {b} is outside [0, 0.5]"
        )));
    }

    let mut t = Array3::zeros((N_ACTIONS, N_STATES, N_STATES));
    let mut r = Array2::from_elem((N_ACTIONS, N_STATES), STEP_REWARD);

    for (mv, cell) in iproduct!(Move::ALL, 0..N_CELLS) {
        let a = mv as usize;
        if cell == GOAL {
            t[[a, cell, END]] = 1.;
            r[[a, cell]] = GOAL_REWARD;
            continue;
        }
        if TRAPS.contains(&cell) {
            r[[a, cell]] = TRAP_REWARD;
        }

        let [side_a, side_b] = mv.perpendicular();
        t[[a, cell, mv.apply(cell)]] += 1. - 2. * b;
        t[[a, cell, side_a.apply(cell)]] += b;
        t[[a, cell, side_b.apply(cell)]] += b;
    }

    for a in 0..N_ACTIONS {
        t[[a, END, END]] = 1.;
        r[[a, END]] = 0.;
    }

    TabularMdp::new(t, r, discount)
}
