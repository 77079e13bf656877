use crate::common::{defs::*, error::*};
use crate::mdps::{mdp::Mdp, mdp_simulator::*};
use crate::policies::softmax::*;
use ndarray::Array2;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use tracing::{debug, info};

/// Where a [`PolicyGradient`] trainer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running { episode: usize, step: usize },
    Done,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Discounted return of each episode.
    pub cum_rewards: Vec<Continous>,
    /// Learned logits, `[n_a, n_s]`.
    pub theta: Array2<Continous>,
    /// Visit counts `N[a, s]` over the whole run.
    pub visits: Array2<u64>,
}

/// Episodic policy-gradient trainer with a softmax policy over a tabular MDP.
///
/// Every episode starts in state 0 and lasts a fixed number of steps.
pub struct PolicyGradient<M, S> {
    simulator: MdpSimulator<M, S>,
    rng: StdRng,
    visits: Array2<u64>,
    phase: Phase,
}

impl<M, S> PolicyGradient<M, S>
where
    M: Mdp,
    S: RewardSampler,
{
    pub fn new(mdp: M, sample_reward: S) -> Self {
        Self::with_rng(mdp, sample_reward, StdRng::from_entropy())
    }

    pub fn with_seed(mdp: M, sample_reward: S, seed: u64) -> Self {
        Self::with_rng(mdp, sample_reward, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mdp: M, sample_reward: S, rng: StdRng) -> Self {
        let visits = Array2::zeros((mdp.n_a(), mdp.n_s()));
        Self {
            simulator: MdpSimulator::new(mdp, sample_reward),
            rng,
            visits,
            phase: Phase::Idle,
        }
    }

    pub fn mdp(&self) -> &M {
        self.simulator.mdp()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Visit counts of the latest run.
    pub fn visits(&self) -> &Array2<u64> {
        &self.visits
    }

    pub fn sample_reward_and_next_state(
        &mut self,
        state: Discrete,
        action: Discrete,
    ) -> Result<(Continous, Discrete)> {
        self.simulator.step(&mut self.rng, state, action)
    }

    /// Trains `theta` in place for `n_episodes` episodes of `n_steps` steps each.
    ///
    /// After every step the logit column of the visited state moves by
    /// `(reward - cum_reward) * policy`, where `cum_reward` is the discounted
    /// return of the episode so far. Parameters carry over between episodes;
    /// the return accumulator does not.
    pub fn reinforce(
        &mut self,
        theta: Option<Array2<Continous>>,
        n_episodes: usize,
        n_steps: usize,
    ) -> Result<TrainingOutcome> {
        let mut theta = theta.ok_or(Error::MissingParameters)?;
        let expected = (self.mdp().n_a(), self.mdp().n_s());
        if theta.dim() != expected {
            return Err(Error::InvalidParameterShape {
                expected,
                found: theta.dim(),
            });
        }

        self.visits.fill(0);
        if n_episodes == 0 || n_steps == 0 {
            self.phase = Phase::Done;
            return Ok(TrainingOutcome {
                cum_rewards: vec![],
                theta,
                visits: self.visits.clone(),
            });
        }

        info!(n_episodes, n_steps, "Starting REINFORCE run.");
        let mut cum_rewards = vec![0 as Continous; n_episodes];
        match self.run(&mut theta, &mut cum_rewards, n_steps) {
            Ok(()) => {
                self.phase = Phase::Done;
                info!(
                    last_return = cum_rewards[n_episodes - 1],
                    "REINFORCE run finished."
                );
                Ok(TrainingOutcome {
                    cum_rewards,
                    theta,
                    visits: self.visits.clone(),
                })
            }
            Err(e) => {
                self.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    fn run(
        &mut self,
        theta: &mut Array2<Continous>,
        cum_rewards: &mut [Continous],
        n_steps: usize,
    ) -> Result<()> {
        let gamma = self.mdp().gamma();
        for (episode, cum_reward) in cum_rewards.iter_mut().enumerate() {
            let mut state: Discrete = 0;
            *cum_reward = 0.;
            let mut discount_t: Continous = 1.;
            for step in 0..n_steps {
                self.phase = Phase::Running { episode, step };

                let policy = softmax_column(theta, state)?;
                let action = WeightedIndex::new(policy.iter())
                    .map_err(|e| Error::InvalidPolicy {
                        state,
                        reason: e.to_string(),
                    })?
                    .sample(&mut self.rng);
                let (reward, next_state) = self.sample_reward_and_next_state(state, action)?;

                *cum_reward += reward * discount_t;
                discount_t *= gamma;
                self.visits[[action, state]] += 1;
                theta
                    .column_mut(state)
                    .scaled_add(reward - *cum_reward, &policy);

                state = next_state;
            }
            debug!(episode, cum_reward = *cum_reward, "Episode finished.");
        }

        Ok(())
    }
}
