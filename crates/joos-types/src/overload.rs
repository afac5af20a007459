use crate::{is_assignable, Type, TypeEnv};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodResolution<T> {
    Found(T),
    /// No candidate accepts the argument types.
    NotFound,
    /// Several applicable candidates, none more specific than all others.
    Ambiguous(Vec<T>),
}

/// Pick the most specific applicable candidate for `args`.
///
/// A candidate is applicable when it has one parameter per argument and every
/// argument is assignable to its parameter. Among applicable candidates the
/// result is the unique one whose parameters are pointwise assignable to the
/// parameters of every other applicable candidate. The outcome does not depend
/// on the order of `candidates`.
pub fn select_overload<T: Clone>(
    env: &dyn TypeEnv,
    candidates: &[(T, &[Type])],
    args: &[Type],
) -> MethodResolution<T> {
    let applicable: Vec<&(T, &[Type])> = candidates
        .iter()
        .filter(|(_, params)| {
            params.len() == args.len()
                && args
                    .iter()
                    .zip(params.iter())
                    .all(|(arg, param)| is_assignable(env, arg, param))
        })
        .collect();

    if applicable.is_empty() {
        return MethodResolution::NotFound;
    }

    let more_specific = |a: &[Type], b: &[Type]| {
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| is_assignable(env, x, y))
    };

    let maximal: Vec<&(T, &[Type])> = applicable
        .iter()
        .copied()
        .filter(|(_, params)| {
            applicable
                .iter()
                .all(|(_, other)| more_specific(params, other))
        })
        .collect();

    match maximal.as_slice() {
        [(only, _)] => MethodResolution::Found(only.clone()),
        _ => MethodResolution::Ambiguous(applicable.iter().map(|(t, _)| t.clone()).collect()),
    }
}
