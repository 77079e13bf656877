use crate::common::{defs::*, error::*};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Action distribution for `state` from the logit column `params[:, state]`.
///
/// The column max is subtracted before exponentiating so large logits cannot overflow.
pub fn softmax_column(params: &Array2<Continous>, state: Discrete) -> Result<Array1<Continous>> {
    check_index(IndexKind::State, state, params.ncols())?;
    Ok(softmax(params.column(state)))
}

/// Applies [`softmax_column`] to every state, giving a `[n_a, n_s]` policy matrix.
pub fn softmax_policy_full(params: &Array2<Continous>) -> Array2<Continous> {
    let mut policy = Array2::zeros(params.raw_dim());
    for (mut out, x) in policy
        .axis_iter_mut(Axis(1))
        .zip(params.axis_iter(Axis(1)))
    {
        out.assign(&softmax(x));
    }

    policy
}

fn softmax(x: ArrayView1<'_, Continous>) -> Array1<Continous> {
    let max = x.fold(Continous::NEG_INFINITY, |m, &v| m.max(v));
    let exps = x.mapv(|v| (v - max).exp());
    let total = exps.sum();
    exps / total
}
