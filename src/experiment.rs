use crate::algos::model_free::gradient_based::on_policy::reinforce::PolicyGradient;
use crate::common::{defs::*, error::*};
use crate::config::*;
use crate::envs::{maze::build_maze_mdp, simple_golf::build_simple_golf};
use crate::mdps::{mdp::*, mdp_simulator::*};
use ndarray::Array2;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub algorithm: Algorithm,
    pub n_trials: usize,
    pub n_episodes: usize,
    pub n_steps: usize,
    /// Per-trial discounted return of each episode.
    pub trials: Vec<Vec<Continous>>,
    /// Episode-wise mean over trials.
    pub mean_cum_rewards: Vec<Continous>,
}

pub fn build_mdp(config: &ExperimentConfig) -> Result<TabularMdp> {
    match config.env {
        EnvKind::Maze => build_maze_mdp(config.slip, config.discount),
        EnvKind::Golf => build_simple_golf(config.discount),
        EnvKind::File => {
            let path = config
                .mdp_path
                .as_ref()
                .ok_or_else(|| Error::Config("env 'file' requires mdp_path".to_string()))?;
            TabularMdp::from_json_file(path)
        }
    }
}

/// Runs `n_trials` independent trainings from zero-initialised parameters.
pub fn run_trials(config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;
    let mdp = build_mdp(config)?;
    info!(
        n_s = mdp.n_s(),
        n_a = mdp.n_a(),
        algorithm = ?config.algorithm,
        "Built MDP."
    );

    match config.reward {
        RewardKind::Gaussian => run_with(
            config,
            &mdp,
            GaussianReward {
                std: config.reward_std,
            },
        ),
        RewardKind::Bernoulli => run_with(config, &mdp, BernoulliReward),
        RewardKind::Exact => run_with(config, &mdp, |mean: Continous| mean),
    }
}

fn run_with<S>(config: &ExperimentConfig, mdp: &TabularMdp, sampler: S) -> Result<ExperimentReport>
where
    S: RewardSampler + Clone,
{
    let trials = (0..config.n_trials)
        .map(|trial| {
            let rl = &mut match config.seed {
                Some(seed) => PolicyGradient::with_seed(
                    mdp.clone(),
                    sampler.clone(),
                    seed.wrapping_add(trial as u64),
                ),
                None => PolicyGradient::new(mdp.clone(), sampler.clone()),
            };
            let theta = Array2::zeros((mdp.n_a(), mdp.n_s()));

            info!(trial, "Running trial.");
            match config.algorithm {
                Algorithm::Reinforce => rl
                    .reinforce(Some(theta), config.n_episodes, config.n_steps)
                    .map(|out| out.cum_rewards),
                Algorithm::ActorCritic => Ok(rl.actor_critic(Some(theta)).0),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let mean_cum_rewards = mean_curve(&trials);
    if mean_cum_rewards.is_empty() {
        warn!("No episodes were recorded.");
    }

    Ok(ExperimentReport {
        algorithm: config.algorithm,
        n_trials: config.n_trials,
        n_episodes: config.n_episodes,
        n_steps: config.n_steps,
        trials,
        mean_cum_rewards,
    })
}

/// Episode-wise average, truncated to the shortest curve.
pub fn mean_curve(trials: &[Vec<Continous>]) -> Vec<Continous> {
    let len = trials.iter().map(Vec::len).min().unwrap_or(0);
    let n = trials.len() as Continous;

    (0..len)
        .map(|e| trials.iter().map(|t| t[e]).sum::<Continous>() / n)
        .collect()
}
