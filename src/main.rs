use anyhow::{Context, Result};
use clap::Parser;
use rl_pg::{config::*, experiment::run_trials, Continous};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Train a softmax policy with REINFORCE on a tabular MDP and report per-episode returns.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON experiment configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    env: Option<EnvKind>,

    /// Serialized MDP, used with `--env file`.
    #[arg(long)]
    mdp: Option<PathBuf>,

    /// Maze slip probability.
    #[arg(long)]
    slip: Option<Continous>,

    #[arg(long)]
    discount: Option<Continous>,

    #[arg(long, value_enum)]
    reward: Option<RewardKind>,

    #[arg(long)]
    reward_std: Option<Continous>,

    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,

    #[arg(long)]
    trials: Option<usize>,

    #[arg(long)]
    episodes: Option<usize>,

    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Write the JSON report here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut ExperimentConfig) {
        if let Some(env) = self.env {
            config.env = env;
        }
        if let Some(mdp) = &self.mdp {
            config.mdp_path = Some(mdp.clone());
        }
        if let Some(slip) = self.slip {
            config.slip = slip;
        }
        if let Some(discount) = self.discount {
            config.discount = discount;
        }
        if let Some(reward) = self.reward {
            config.reward = reward;
        }
        if let Some(reward_std) = self.reward_std {
            config.reward_std = reward_std;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(trials) = self.trials {
            config.n_trials = trials;
        }
        if let Some(episodes) = self.episodes {
            config.n_episodes = episodes;
        }
        if let Some(steps) = self.steps {
            config.n_steps = steps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    args.apply(&mut config);

    let report = run_trials(&config)?;
    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Report written.");
        }
        None => println!("{json}"),
    }

    Ok(())
}
