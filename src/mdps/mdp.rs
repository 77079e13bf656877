use crate::common::{defs::*, error::*};
use ndarray::{Array2, Array3, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Markov Decision Process - Sutton & Barto 2018.
///
/// Indices handed to `transition_probs` and `mean_reward` are assumed in range;
/// callers bound-check them first.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// Pr(s'|s,a) as a row over next states.
    fn transition_probs(&self, a: Discrete, s: Discrete) -> ArrayView1<'_, Continous>;

    fn mean_reward(&self, a: Discrete, s: Discrete) -> Continous;

    fn gamma(&self) -> Continous;
}

/// MDP with transitions `t[a, s, s']` and mean rewards `r[a, s]` stored in lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularMdp {
    t: Array3<Continous>,
    r: Array2<Continous>,
    discount: Continous,
}

impl TabularMdp {
    pub fn new(t: Array3<Continous>, r: Array2<Continous>, discount: Continous) -> Result<Self> {
        let mdp = Self { t, r, discount };
        mdp.validate()?;
        Ok(mdp)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mdp: Self = serde_json::from_reader(reader)?;
        mdp.validate()?;
        Ok(mdp)
    }

    pub fn t(&self) -> &Array3<Continous> {
        &self.t
    }

    pub fn r(&self) -> &Array2<Continous> {
        &self.r
    }

    fn validate(&self) -> Result<()> {
        let (n_a, n_s, n_s_next) = self.t.dim();
        if n_a == 0 || n_s == 0 {
            return Err(Error::InvalidMdp(
                "at least one state and one action are required".to_string(),
            ));
        }
        if n_s != n_s_next {
            return Err(Error::InvalidMdp(format!(
                "transition tensor must be [n_a, n_s, n_s], got {:?}",
                self.t.dim()
            )));
        }
        if self.r.dim() != (n_a, n_s) {
            return Err(Error::InvalidMdp(format!(
                "reward matrix must be {:?}, got {:?}",
                (n_a, n_s),
                self.r.dim()
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::InvalidMdp(format!(
                "discount {} is outside [0, 1]",
                self.discount
            )));
        }

        for a in 0..n_a {
            for s in 0..n_s {
                check_distribution(a, s, self.transition_probs(a, s))?;
            }
        }

        Ok(())
    }
}

impl Mdp for TabularMdp {
    fn n_s(&self) -> usize {
        self.t.dim().1
    }

    fn n_a(&self) -> usize {
        self.t.dim().0
    }

    fn transition_probs(&self, a: Discrete, s: Discrete) -> ArrayView1<'_, Continous> {
        self.t.slice(ndarray::s![a, s, ..])
    }

    fn mean_reward(&self, a: Discrete, s: Discrete) -> Continous {
        self.r[[a, s]]
    }

    fn gamma(&self) -> Continous {
        self.discount
    }
}

/// Non-negative entries summing to one within [`DISTRIBUTION_TOLERANCE`].
pub fn check_distribution(
    action: Discrete,
    state: Discrete,
    probs: ArrayView1<'_, Continous>,
) -> Result<()> {
    if let Some(p) = probs.iter().find(|p| !p.is_finite() || **p < 0.) {
        return Err(Error::InvalidDistribution {
            action,
            state,
            reason: format!("contains entry {p}"),
        });
    }

    let total = probs.sum();
    if (total - 1.).abs() > DISTRIBUTION_TOLERANCE {
        return Err(Error::InvalidDistribution {
            action,
            state,
            reason: format!("sums to {total}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use ndarray::{array, Array3};

    fn uniform(n_a: usize, n_s: usize) -> Array3<Continous> {
        Array3::from_elem((n_a, n_s, n_s), 1. / n_s as Continous)
    }

    #[test]
    fn tabular_mdp_exposes_tables() {
        let r = array![[1., 2.], [3., 4.]];
        let mdp = TabularMdp::new(uniform(2, 2), r, 0.9).unwrap();

        assert_eq!(mdp.n_a(), 2);
        assert_eq!(mdp.n_s(), 2);
        assert_float_eq!(mdp.gamma(), 0.9, abs <= 1e-12);
        assert_float_eq!(mdp.mean_reward(1, 0), 3., abs <= 1e-12);
        assert_eq!(mdp.r(), &array![[1., 2.], [3., 4.]]);
        assert_eq!(mdp.t(), &uniform(2, 2));
        assert_float_eq!(
            mdp.transition_probs(0, 1).to_vec(),
            vec![0.5, 0.5],
            abs_all <= 1e-12
        );
    }

    #[test]
    fn rejects_rows_that_do_not_sum_to_one() {
        let mut t = uniform(1, 2);
        t[[0, 1, 0]] = 0.7;

        let err = TabularMdp::new(t, Array2::zeros((1, 2)), 0.9).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDistribution {
                action: 0,
                state: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_probabilities() {
        let t = Array3::from_shape_vec((1, 2, 2), vec![1.5, -0.5, 0.5, 0.5]).unwrap();

        let err = TabularMdp::new(t, Array2::zeros((1, 2)), 0.9).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDistribution {
                action: 0,
                state: 0,
                ..
            }
        ));
    }

    #[test]
    fn rejects_mismatched_shapes_and_discount() {
        let err = TabularMdp::new(uniform(2, 2), Array2::zeros((2, 3)), 0.9).unwrap_err();
        assert!(matches!(err, Error::InvalidMdp(_)));

        let err = TabularMdp::new(uniform(2, 2), Array2::zeros((2, 2)), 1.5).unwrap_err();
        assert!(matches!(err, Error::InvalidMdp(_)));
    }

    #[test]
    fn json_round_trip_is_validated() {
        let mdp = TabularMdp::new(uniform(2, 3), Array2::zeros((2, 3)), 0.5).unwrap();
        let path = std::env::temp_dir().join(format!("rl_pg_mdp_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&mdp).unwrap()).unwrap();

        let loaded = TabularMdp::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, mdp);
    }
}
