use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Fixes the scale at two fractional digits so `0` renders as `"0.00"`.
pub fn two_places(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

/// Only used when building report bodies; all arithmetic stays in `Decimal`.
pub fn to_float(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn zero_gets_two_places() {
        assert_eq!(two_places(Decimal::ZERO).to_string(), "0.00");
        assert_eq!(two_places(Decimal::from(150)).to_string(), "150.00");
        assert_eq!(two_places(Decimal::from_str("2.5").unwrap()).to_string(), "2.50");
    }

    #[test]
    fn float_conversion_is_exact_for_cents() {
        assert_eq!(to_float(Decimal::from_str("2350.00").unwrap()), 2350.0);
    }
}
