//! Ranking of high-risk verdicts.

use risk_core::RiskVerdict;

/// Composite ranking score: reason count plus both probabilities.
///
/// The count dominates; probabilities only separate equal counts.
pub fn score(verdict: &RiskVerdict) -> f64 {
    verdict.reasons.len() as f64
        + verdict.cardio_probability.unwrap_or(0.0)
        + verdict.diabetes_probability.unwrap_or(0.0)
}

/// Keep the high-risk verdicts, order them by [`score`] descending and
/// truncate to `limit`.
///
/// Verdicts that are not high-risk are dropped before ordering. Equal scores
/// keep their input order.
pub fn rank<T>(entries: Vec<(T, RiskVerdict)>, limit: usize) -> Vec<(T, RiskVerdict)> {
    let total = entries.len();
    let mut flagged: Vec<(T, RiskVerdict)> = entries
        .into_iter()
        .filter(|(_, verdict)| verdict.is_high_risk)
        .collect();

    let eligible = flagged.len();

    // Stable sort: ties keep first-seen order.
    flagged.sort_by(|(_, a), (_, b)| score(b).total_cmp(&score(a)));
    flagged.truncate(limit);

    log::info!(
        "{eligible} of {total} verdict(s) high-risk, returning top {}",
        flagged.len()
    );

    flagged
}
