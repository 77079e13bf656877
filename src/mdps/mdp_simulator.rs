use super::mdp::{check_distribution, Mdp};
use crate::common::{defs::*, error::*};
use ndarray::ArrayView1;
use rand::distributions::{Bernoulli, Distribution};
use rand::prelude::*;
use rand_distr::Normal;

/// Draws a scalar reward given the mean reward of a (state, action) pair.
pub trait RewardSampler {
    fn sample(&self, mean: Continous, rng: &mut dyn RngCore) -> Result<Continous>;
}

/// Deterministic samplers, e.g. `|mean| mean`.
impl<F> RewardSampler for F
where
    F: Fn(Continous) -> Continous,
{
    fn sample(&self, mean: Continous, _rng: &mut dyn RngCore) -> Result<Continous> {
        Ok(self(mean))
    }
}

/// reward ~ N(mean, std^2)
#[derive(Debug, Clone, Copy)]
pub struct GaussianReward {
    pub std: Continous,
}

impl Default for GaussianReward {
    fn default() -> Self {
        Self { std: 1. }
    }
}

impl RewardSampler for GaussianReward {
    fn sample(&self, mean: Continous, rng: &mut dyn RngCore) -> Result<Continous> {
        let dist = Normal::new(mean, self.std)
            .map_err(|e| Error::Config(format!("gaussian reward: {e}")))?;
        Ok(dist.sample(rng))
    }
}

/// reward is 1 with probability `mean` (clamped to [0, 1]), 0 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BernoulliReward;

impl RewardSampler for BernoulliReward {
    fn sample(&self, mean: Continous, rng: &mut dyn RngCore) -> Result<Continous> {
        let dist = Bernoulli::new(mean.clamp(0., 1.))
            .map_err(|e| Error::Config(format!("bernoulli reward: {e}")))?;
        Ok(if dist.sample(rng) { 1. } else { 0. })
    }
}

/// Inverse-CDF draw: the smallest `i` with `cum_prob[i] >= u`, `u ~ U[0, 1)`.
/// Falls back to the last index when rounding leaves the total just under `u`.
pub fn pick_next<R>(rng: &mut R, probs: ArrayView1<'_, Continous>) -> Discrete
where
    R: Rng + ?Sized,
{
    let u: Continous = rng.gen();
    let mut cum_prob = 0.;
    for (i, p) in probs.iter().enumerate() {
        cum_prob += p;
        if cum_prob >= u {
            return i;
        }
    }

    probs.len().saturating_sub(1)
}

/// Environment step function over a read-only MDP and a pluggable reward sampler.
pub struct MdpSimulator<M, S> {
    mdp: M,
    sample_reward: S,
}

impl<M, S> MdpSimulator<M, S>
where
    M: Mdp,
    S: RewardSampler,
{
    pub fn new(mdp: M, sample_reward: S) -> Self {
        Self { mdp, sample_reward }
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    /// reward ~ Pr(r | mean = R[a, s]), next_state ~ Pr(s'|s,a)
    pub fn step<R>(
        &self,
        rng: &mut R,
        state: Discrete,
        action: Discrete,
    ) -> Result<(Continous, Discrete)>
    where
        R: Rng,
    {
        check_index(IndexKind::State, state, self.mdp.n_s())?;
        check_index(IndexKind::Action, action, self.mdp.n_a())?;

        let probs = self.mdp.transition_probs(action, state);
        check_distribution(action, state, probs)?;

        let reward = self
            .sample_reward
            .sample(self.mdp.mean_reward(action, state), rng)?;
        let next_state = pick_next(rng, probs);

        Ok((reward, next_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdps::mdp::TabularMdp;
    use float_eq::*;
    use ndarray::{array, Array2, Array3};
    use rstest::rstest;

    /// Always draws the same `u`.
    struct FixedDraw(u64);

    impl RngCore for FixedDraw {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            rand_core_fill(self.0, dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            rand_core_fill(self.0, dest);
            Ok(())
        }
    }

    fn rand_core_fill(v: u64, dest: &mut [u8]) {
        for (d, b) in dest.iter_mut().zip(v.to_le_bytes().iter().cycle()) {
            *d = *b;
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(u64::MAX / 4, 0)]
    #[case(u64::MAX / 2, 1)]
    #[case(u64::MAX - 1024, 2)]
    fn pick_next_follows_cumulative_sum(#[case] draw: u64, #[case] expected: Discrete) {
        let probs = array![0.25, 0.25, 0.5];
        assert_eq!(pick_next(&mut FixedDraw(draw), probs.view()), expected);
    }

    #[test]
    fn pick_next_tie_breaks_to_lowest_index() {
        let probs = array![0., 0., 1.];
        assert_eq!(pick_next(&mut FixedDraw(0), probs.view()), 0);
        assert_eq!(pick_next(&mut FixedDraw(u64::MAX / 3), probs.view()), 2);
    }

    #[test]
    fn pick_next_falls_back_to_last_index() {
        let probs = array![0.3, 0.3, 0.3999];
        assert_eq!(pick_next(&mut FixedDraw(u64::MAX - 1024), probs.view()), 2);
    }

    #[test]
    fn pick_next_unseeded() {
        let probs = array![0.2, 0.8];
        let rng = &mut StdRng::from_entropy();
        let n = 10000;
        let mut counts = [0; 2];
        for _ in 0..n {
            counts[pick_next(rng, probs.view())] += 1;
        }

        assert_float_eq!(counts[0] as f64 / n as f64, 0.2, abs <= 2e-2);
        assert_float_eq!(counts[1] as f64 / n as f64, 0.8, abs <= 2e-2);
    }

    fn two_state_mdp() -> TabularMdp {
        let t = Array3::from_shape_vec(
            (2, 2, 2),
            vec![0., 1., 1., 0., 1., 0., 0., 1.],
        )
        .unwrap();
        TabularMdp::new(t, array![[1., 2.], [3., 4.]], 0.9).unwrap()
    }

    #[test]
    fn step_uses_mean_reward_and_transitions() {
        let sim = MdpSimulator::new(two_state_mdp(), |mean: Continous| mean);
        let rng = &mut StdRng::seed_from_u64(2718);

        assert_eq!(sim.step(rng, 0, 0).unwrap(), (1., 1));
        assert_eq!(sim.step(rng, 1, 0).unwrap(), (2., 0));
        assert_eq!(sim.step(rng, 0, 1).unwrap(), (3., 0));
        assert_eq!(sim.step(rng, 1, 1).unwrap(), (4., 1));
    }

    #[test]
    fn step_always_lands_in_state_space() {
        let t = Array3::from_elem((3, 5, 5), 0.2);
        let mdp = TabularMdp::new(t, Array2::zeros((3, 5)), 0.9).unwrap();
        let sim = MdpSimulator::new(mdp, GaussianReward::default());
        let rng = &mut StdRng::seed_from_u64(31415);

        for i in 0..1000 {
            let (_, next) = sim.step(rng, i % 5, i % 3).unwrap();
            assert!(next < 5);
        }
    }

    #[rstest]
    #[case(2, 0, IndexKind::State)]
    #[case(0, 2, IndexKind::Action)]
    fn step_rejects_out_of_range(
        #[case] state: Discrete,
        #[case] action: Discrete,
        #[case] expected: IndexKind,
    ) {
        let sim = MdpSimulator::new(two_state_mdp(), |mean: Continous| mean);
        let rng = &mut StdRng::seed_from_u64(0);

        let err = sim.step(rng, state, action).unwrap_err();
        assert!(matches!(err, Error::OutOfRangeIndex { kind, index: 2, bound: 2 } if kind == expected));
    }

    /// Unvalidated MDP whose every transition row is `self.0`.
    struct BrokenMdp(&'static [Continous]);

    impl Mdp for BrokenMdp {
        fn n_s(&self) -> usize {
            2
        }

        fn n_a(&self) -> usize {
            1
        }

        fn transition_probs(&self, _a: Discrete, _s: Discrete) -> ArrayView1<'_, Continous> {
            ArrayView1::from(self.0)
        }

        fn mean_reward(&self, _a: Discrete, _s: Discrete) -> Continous {
            0.
        }

        fn gamma(&self) -> Continous {
            0.9
        }
    }

    #[rstest]
    #[case(&[0.1, 0.2])]
    #[case(&[1.5, -0.5])]
    fn step_rejects_invalid_distribution(#[case] row: &'static [Continous]) {
        let sim = MdpSimulator::new(BrokenMdp(row), |mean: Continous| mean);
        let rng = &mut StdRng::seed_from_u64(0);

        let err = sim.step(rng, 1, 0).unwrap_err();
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
    fn gaussian_reward_is_centred_on_mean() {
        let sampler = GaussianReward { std: 1. };
        let rng = &mut StdRng::seed_from_u64(2718);
        let n = 20000;
        let mean = (0..n)
            .map(|_| sampler.sample(3., rng).unwrap())
            .sum::<Continous>()
            / n as Continous;

        assert_float_eq!(mean, 3., abs <= 5e-2);
    }

    #[test]
    fn bernoulli_reward_is_binary() {
        let rng = &mut StdRng::seed_from_u64(2718);
        for mean in [-1., 0., 0.3, 1., 2.] {
            let r = BernoulliReward.sample(mean, rng).unwrap();
            assert!(r == 0. || r == 1.);
        }
        assert_eq!(BernoulliReward.sample(0., rng).unwrap(), 0.);
        assert_eq!(BernoulliReward.sample(1., rng).unwrap(), 1.);
    }
}
