use crate::enums::AlertOperator;

const PERCENT_TOLERANCE: f64 = 1e-9;

/// Decide whether `current_value` satisfies `operator` against `threshold`.
///
/// `above`/`below` are strict: a value equal to the threshold never matches.
///
/// Percent operators have no stored baseline. They rebuild an implied prior
/// value from the current value and the threshold itself and then check the
/// change against the threshold. A prior that comes out non-positive or
/// non-finite (e.g. a 100% decrease) never matches. The rebuilt change equals
/// the threshold up to rounding, so the comparison allows a relative error of
/// `PERCENT_TOLERANCE`.
pub fn evaluate(operator: AlertOperator, threshold: f64, current_value: f64) -> bool {
    if !current_value.is_finite() || !threshold.is_finite() {
        return false;
    }

    match operator {
        AlertOperator::Above => current_value > threshold,
        AlertOperator::Below => current_value < threshold,
        AlertOperator::PercentIncrease => {
            let prior = current_value / (1.0 + threshold / 100.0);
            match percent_change(prior, current_value) {
                Some(change) => reaches(change, threshold),
                None => false,
            }
        }
        AlertOperator::PercentDecrease => {
            let prior = current_value / (1.0 - threshold / 100.0);
            match percent_change(prior, current_value) {
                Some(change) => reaches(-change, threshold),
                None => false,
            }
        }
    }
}

fn reaches(change: f64, threshold: f64) -> bool {
    change >= threshold - threshold.abs() * PERCENT_TOLERANCE
}

fn percent_change(prior: f64, current: f64) -> Option<f64> {
    if !prior.is_finite() || prior <= 0.0 {
        return None;
    }
    Some(((current - prior) / prior) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_above_is_strict() {
        assert!(evaluate(AlertOperator::Above, 100.0, 100.01));
        assert!(evaluate(AlertOperator::Above, 100.0, 150.0));
        assert!(!evaluate(AlertOperator::Above, 100.0, 100.0));
        assert!(!evaluate(AlertOperator::Above, 100.0, 99.99));
    }

    #[test]
    fn test_below_is_strict() {
        assert!(evaluate(AlertOperator::Below, 100.0, 50.0));
        assert!(!evaluate(AlertOperator::Below, 100.0, 100.0));
        assert!(!evaluate(AlertOperator::Below, 100.0, 120.0));
    }

    #[test]
    fn test_percent_increase_reconstruction() {
        assert!(evaluate(AlertOperator::PercentIncrease, 50.0, 150.0));
    }

    #[test]
    fn test_percent_decrease_reconstruction() {
        assert!(evaluate(AlertOperator::PercentDecrease, 50.0, 50.0));
    }

    #[test]
    fn test_percent_operators_match_on_common_values() {
        let thresholds = [1.0, 5.0, 10.0, 15.0, 20.0, 25.0, 33.0, 50.0];
        let prices = [0.5, 1.0, 3.0, 110.0, 123.45, 2000.0, 65000.0];

        for threshold in thresholds {
            for price in prices {
                assert!(
                    evaluate(AlertOperator::PercentIncrease, threshold, price),
                    "percent_increase {}% at {}",
                    threshold,
                    price
                );
                assert!(
                    evaluate(AlertOperator::PercentDecrease, threshold, price),
                    "percent_decrease {}% at {}",
                    threshold,
                    price
                );
            }
        }
    }

    #[test]
    fn test_one_percent_increase_at_110() {
        assert!(evaluate(AlertOperator::PercentIncrease, 1.0, 110.0));
    }

    #[test]
    fn test_percent_decrease_of_full_value_never_matches() {
        assert!(!evaluate(AlertOperator::PercentDecrease, 100.0, 10.0));
        assert!(!evaluate(AlertOperator::PercentDecrease, 150.0, 10.0));
    }

    #[test]
    fn test_non_finite_inputs_never_match() {
        assert!(!evaluate(AlertOperator::Above, 100.0, f64::NAN));
        assert!(!evaluate(AlertOperator::Below, f64::INFINITY, 1.0));
        assert!(!evaluate(AlertOperator::PercentIncrease, 10.0, f64::NAN));
    }
}
