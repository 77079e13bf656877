use super::reinforce::PolicyGradient;
use crate::common::defs::*;
use crate::mdps::{mdp::Mdp, mdp_simulator::RewardSampler};
use ndarray::Array2;
use tracing::warn;

impl<M, S> PolicyGradient<M, S>
where
    M: Mdp,
    S: RewardSampler,
{
    /// Placeholder for a learned-critic variant: returns an empty history and `theta` as given.
    // TODO: add a state-value critic and use its TD error in place of the running-return baseline.
    pub fn actor_critic(
        &mut self,
        theta: Option<Array2<Continous>>,
    ) -> (Vec<Continous>, Option<Array2<Continous>>) {
        warn!("Actor-critic is not implemented; returning parameters unchanged.");

        (vec![], theta)
    }
}
