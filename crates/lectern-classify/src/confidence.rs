//! Weighted confidence scoring.
//!
//! Combines three signals into a single confidence value: average evidence
//! similarity (40%), evidence coverage against a four-context target (30%),
//! and the model's self-rating when it gives one (30%, default 0.7).

/// Inputs to a confidence computation.
#[derive(Clone, Debug, Default)]
pub struct ConfidenceInputs<'a> {
    /// Similarity scores of the supporting evidence.
    pub similarities: &'a [f64],
    /// How many supporting contexts were found.
    pub context_count: usize,
    /// The model's own rating, if it provided one.
    pub self_rated: Option<f64>,
}

/// Compute a weighted confidence in `[0, 1]`, rounded to two decimals.
#[must_use]
pub fn compute_confidence(inputs: &ConfidenceInputs<'_>) -> f64 {
    let similarity_score = if inputs.similarities.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = inputs.similarities.len() as f64;
        inputs.similarities.iter().sum::<f64>() / n
    };

    #[allow(clippy::cast_precision_loss)]
    let coverage_score = (inputs.context_count as f64 / 4.0).min(1.0);

    let model_score = inputs.self_rated.unwrap_or(0.7);

    let confidence = similarity_score * 0.4 + coverage_score * 0.3 + model_score * 0.3;
    (confidence * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_as_expected() {
        let c = compute_confidence(&ConfidenceInputs {
            similarities: &[1.0],
            context_count: 4,
            self_rated: Some(1.0),
        });
        assert!((c - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarities_averaged() {
        let c = compute_confidence(&ConfidenceInputs {
            similarities: &[0.5, 1.0],
            context_count: 0,
            self_rated: Some(0.0),
        });
        // 0.75 * 0.4 = 0.3
        assert!((c - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn coverage_capped_at_four_contexts() {
        let at_four = compute_confidence(&ConfidenceInputs {
            similarities: &[],
            context_count: 4,
            self_rated: Some(0.0),
        });
        let at_ten = compute_confidence(&ConfidenceInputs {
            similarities: &[],
            context_count: 10,
            self_rated: Some(0.0),
        });
        assert!((at_four - at_ten).abs() < f64::EPSILON);
        assert!((at_four - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_self_rating_defaults() {
        let c = compute_confidence(&ConfidenceInputs {
            similarities: &[],
            context_count: 0,
            self_rated: None,
        });
        // 0.7 * 0.3 = 0.21
        assert!((c - 0.21).abs() < f64::EPSILON);
    }

    #[test]
    fn no_evidence_is_not_a_panic() {
        let c = compute_confidence(&ConfidenceInputs::default());
        assert!(c > 0.0, "model default keeps the floor above zero");
    }

    #[test]
    fn rounded_to_two_decimals() {
        let c = compute_confidence(&ConfidenceInputs {
            similarities: &[0.333],
            context_count: 1,
            self_rated: Some(0.333),
        });
        let rescaled = c * 100.0;
        assert!((rescaled - rescaled.round()).abs() < 1e-9);
    }
}
