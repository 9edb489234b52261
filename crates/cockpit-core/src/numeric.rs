//! Small numeric helpers shared by the engines.

/// Round to the nearest integer with ties going toward positive infinity
/// (`2.5 -> 3`, `-2.5 -> -2`), matching dashboard rounding of unit counts.
pub fn round_half_up(x: f64) -> f64 {
    let r = x.round();
    // f64::round sends negative ties away from zero
    if x - r == 0.5 {
        r + 1.0
    } else {
        r
    }
}

/// Replace NaN and infinities with zero.
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Arithmetic mean; zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(708.4), 708.0);
    }

    #[test]
    fn non_finite_becomes_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(-3.5), -3.5);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }
}
