use serde::Serialize;

/// One converted unit buys this many remainder units.
const EXCHANGE_RATE: u64 = 3;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct ExchangeOutcome {
    /// Total units consumed over the whole exchange, initial stake included.
    pub converted_units: u64,
    /// Units left over once no further trade is possible.
    pub remainder_units: u64,
}

/// Runs the exchange to convergence for an initial stake.
///
/// Each round trades `remainder / EXCHANGE_RATE` wholesale, crediting every
/// trade back into the remainder, until the remainder falls below the rate.
/// Total for non-negative input; non-positive input yields zero/zero.
pub fn exchange(initial_units: i64) -> ExchangeOutcome {
    if initial_units <= 0 {
        return ExchangeOutcome {
            converted_units: 0,
            remainder_units: 0,
        };
    }

    let mut converted = initial_units as u64;
    let mut remainder = initial_units as u64;

    while remainder >= EXCHANGE_RATE {
        let traded = remainder / EXCHANGE_RATE;
        converted += traded;
        remainder -= traded * EXCHANGE_RATE;
        remainder += traded;
    }

    ExchangeOutcome {
        converted_units: converted,
        remainder_units: remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(converted_units: u64, remainder_units: u64) -> ExchangeOutcome {
        ExchangeOutcome {
            converted_units,
            remainder_units,
        }
    }

    #[test]
    fn test_exchange_of_ten_units() {
        assert_eq!(exchange(10), outcome(14, 2));
    }

    #[test]
    fn test_exchange_reference_values() {
        assert_eq!(exchange(5), outcome(7, 1));
        assert_eq!(exchange(15), outcome(22, 1));
        assert_eq!(exchange(20), outcome(29, 2));
    }

    #[test]
    fn test_non_positive_input_yields_zero() {
        assert_eq!(exchange(0), outcome(0, 0));
        assert_eq!(exchange(-3), outcome(0, 0));
    }

    #[test]
    fn test_below_rate_input_converges_immediately() {
        assert_eq!(exchange(2), outcome(2, 2));
    }
}
