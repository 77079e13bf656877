pub mod actor_critic;
pub mod reinforce;
