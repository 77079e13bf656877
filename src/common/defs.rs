/// Index into a finite state or action space.
pub type Discrete = usize;
pub type Continous = f64;

/// Slack allowed when checking that a transition row sums to one.
pub const DISTRIBUTION_TOLERANCE: Continous = 1e-6;
