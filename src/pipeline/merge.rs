use crate::models::{CategoryOutcome, CategoryResult, CategoryResults, MergedMessage, Utterance};

/// Reconcile the three category results against the canonical utterance
/// sequence.
///
/// Pure and infallible: the output always has exactly one entry per
/// utterance, in the same order. A whole-category `Failure` is broadcast to
/// every message's field for that category; a `Success` assigns entries
/// positionally, truncating excess and leaving uncovered positions absent.
/// Categories merge independently, so the operation is commutative across
/// them.
pub fn merge(utterances: &[Utterance], results: &CategoryResults) -> Vec<MergedMessage> {
    let sentiment = category_column(utterances.len(), &results.sentiment);
    let dear_man = category_column(utterances.len(), &results.dear_man);
    let fast = category_column(utterances.len(), &results.fast);

    utterances
        .iter()
        .zip(sentiment)
        .zip(dear_man)
        .zip(fast)
        .map(|(((utterance, sentiment), dear_man), fast)| MergedMessage {
            speaker: utterance.speaker.clone(),
            text: utterance.message.clone(),
            sentiment,
            dear_man,
            fast,
        })
        .collect()
}

/// Expand one category result into a column of exactly `len` outcomes.
fn category_column<T: Clone>(len: usize, result: &CategoryResult<T>) -> Vec<CategoryOutcome<T>> {
    match result {
        CategoryResult::Failure(failure) => {
            vec![CategoryOutcome::Failed(failure.clone()); len]
        }
        CategoryResult::Success { messages } => {
            let mut column = vec![CategoryOutcome::Absent; len];
            for (slot, entry) in column.iter_mut().zip(messages.iter()) {
                *slot = entry.clone();
            }
            column
        }
    }
}
