use crate::common::{defs::*, error::*};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EnvKind {
    Maze,
    Golf,
    /// A serialized `TabularMdp` read from `mdp_path`.
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RewardKind {
    Gaussian,
    Bernoulli,
    /// The mean reward itself.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Reinforce,
    ActorCritic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub env: EnvKind,
    pub mdp_path: Option<PathBuf>,
    /// Maze slip probability `b`.
    pub slip: Continous,
    pub discount: Continous,
    pub reward: RewardKind,
    pub reward_std: Continous,
    pub algorithm: Algorithm,
    pub n_trials: usize,
    pub n_episodes: usize,
    pub n_steps: usize,
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            env: EnvKind::Maze,
            mdp_path: None,
            slip: 0.1,
            discount: 0.95,
            reward: RewardKind::Gaussian,
            reward_std: 1.,
            algorithm: Algorithm::Reinforce,
            n_trials: 10,
            n_episodes: 3000,
            n_steps: 100,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0. ..=1.).contains(&self.discount) {
            return Err(Error::Config(format!(
                "discount {} is outside [0, 1]",
                self.discount
            )));
        }
        if !(0. ..=0.5).contains(&self.slip) {
            return Err(Error::Config(format!(
                "slip {} is outside [0, 0.5]",
                self.slip
            )));
        }
        if self.reward_std <= 0. || !self.reward_std.is_finite() {
            return Err(Error::Config(format!(
                "reward_std must be positive, got {}",
                self.reward_std
            )));
        }
        if self.n_trials == 0 {
            return Err(Error::Config("n_trials must be at least 1".to_string()));
        }
        if self.env == EnvKind::File && self.mdp_path.is_none() {
            return Err(Error::Config(
                "env 'file' requires mdp_path".to_string(),
            ));
        }

        Ok(())
    }
}
