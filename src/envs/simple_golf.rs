use crate::common::{defs::*, error::*};
use crate::mdps::mdp::TabularMdp;
use ndarray::{Array2, Array3};

pub const N_STATES: usize = 3;
pub const N_ACTIONS: usize = 3;

/// https://towardsdatascience.com/reinforcement-learning-an-easy-introduction-to-value-iteration-e4cfe0731fd5
///
/// State 2 is the hole. Pairs the article leaves undefined stay put with no reward.
pub fn build_simple_golf(discount: Continous) -> Result<TabularMdp> {
    // (s, a) -> [(s', p, r)]
    let moves: [((Discrete, Discrete), [(Discrete, Continous, Continous); 2]); 3] = [
        ((0, 0), [(1, 0.9, 0.), (0, 0.1, 0.)]),
        ((1, 1), [(0, 0.9, 0.), (1, 0.1, 0.)]),
        ((1, 2), [(2, 0.9, 10.), (1, 0.1, 0.)]),
    ];

    let mut t = Array3::zeros((N_ACTIONS, N_STATES, N_STATES));
    for a in 0..N_ACTIONS {
        for s in 0..N_STATES {
            t[[a, s, s]] = 1.;
        }
    }

    let mut r = Array2::zeros((N_ACTIONS, N_STATES));
    for ((s, a), outcomes) in moves {
        t[[a, s, s]] = 0.;
        for (next, p, reward) in outcomes {
            t[[a, s, next]] += p;
            r[[a, s]] += p * reward;
        }
    }

    TabularMdp::new(t, r, discount)
}
