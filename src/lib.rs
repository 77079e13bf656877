pub mod algos;
pub mod common;
pub mod config;
pub mod envs;
pub mod experiment;
pub mod mdps;
pub mod policies;

pub use algos::model_free::gradient_based::on_policy::reinforce::{
    Phase, PolicyGradient, TrainingOutcome,
};
pub use common::defs::{Continous, Discrete};
pub use common::error::{Error, Result};
pub use mdps::mdp::{Mdp, TabularMdp};
pub use mdps::mdp_simulator::{BernoulliReward, GaussianReward, MdpSimulator, RewardSampler};
pub use policies::softmax::{softmax_column, softmax_policy_full};
