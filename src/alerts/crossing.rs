use crate::enums::AlertOperator;

/// Whether a portfolio value moved across `threshold` between two observations.
///
/// With no previous observation the first one always counts as a crossing, so
/// a freshly created alert can fire once. Percent operators are not supported
/// for portfolio alerts and never cross.
pub fn has_crossed(
    operator: AlertOperator,
    threshold: f64,
    previous_value: Option<f64>,
    current_value: f64
) -> bool {
    let previous = match previous_value {
        Some(previous) => previous,
        None => {
            return true;
        }
    };

    match operator {
        AlertOperator::Above => previous <= threshold && current_value > threshold,
        AlertOperator::Below => previous >= threshold && current_value < threshold,
        AlertOperator::PercentIncrease | AlertOperator::PercentDecrease => false,
    }
}
