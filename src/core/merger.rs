use crate::domain::model::{AggregateState, PerSourceResult, SourceOutcome};

/// Fold every outcome into one [`AggregateState`].
///
/// Outcomes are merged in source-list order, so the representative name for
/// an age comes from the earliest listed source that has it.
pub fn merge_outcomes(mut outcomes: Vec<SourceOutcome>) -> AggregateState {
    outcomes.sort_by_key(|outcome| outcome.index);

    let mut state = AggregateState::default();
    for outcome in outcomes {
        match outcome.result {
            Ok(result) => merge_result(&mut state, result),
            Err(_) => state.failed_sources.push(outcome.source),
        }
    }

    tracing::debug!(
        "Merged {} sources: {} distinct ages, {} failed",
        state.sources_succeeded,
        state.counts.len(),
        state.failed_sources.len()
    );
    state
}

/// Add one source's counts to the aggregate; existing names are never replaced.
pub fn merge_result(state: &mut AggregateState, result: PerSourceResult) {
    for (age, count) in result.counts {
        *state.counts.entry(age).or_insert(0) += count;
    }
    for (age, name) in result.names {
        state.names.entry(age).or_insert(name);
    }
    state.sources_succeeded += 1;
}
