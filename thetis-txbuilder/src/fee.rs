//! Fee arithmetic
//!
//! All formulas follow the Conway ledger rules: a linear fee over the
//! serialized transaction size, execution-unit pricing for Plutus scripts,
//! a tiered surcharge for reference scripts and the per-byte minimum
//! lovelace requirement for outputs.

use crate::params::ProtocolParameters;
use thetis_primitives::{ExUnitPrices, ExUnits, RationalNumber, UnitInterval};

/// Bytes per reference-script pricing tier
const REF_SCRIPT_TIER_SIZE: u64 = 25_600;

/// Implicit ledger overhead of a utxo entry, in bytes
const UTXO_ENTRY_OVERHEAD: u64 = 160;

fn ceil_mul(rational: &RationalNumber, value: u64) -> u64 {
    let numerator = rational.numerator as u128 * value as u128;
    let denominator = rational.denominator as u128;

    numerator.div_ceil(denominator) as u64
}

/// The base fee: `a * size + b`
pub fn linear_fee(params: &ProtocolParameters, tx_size: u64) -> u64 {
    params.minfee_a * tx_size + params.minfee_b
}

/// Execution-unit pricing: `ceil(mem_price * mem) + ceil(step_price * steps)`
pub fn script_fee(prices: &ExUnitPrices, units: &ExUnits) -> u64 {
    ceil_mul(&prices.mem_price, units.mem) + ceil_mul(&prices.step_price, units.steps)
}

/// Surcharge for reference scripts attached to resolved inputs
///
/// The per-byte cost grows by a factor of 1.2 for every full 25,600-byte
/// tier the scripts occupy; the total is floored once at the end, matching
/// the ledger's rational arithmetic.
pub fn ref_script_fee(cost_per_byte: &UnitInterval, total_size: u64) -> u64 {
    if total_size == 0 || cost_per_byte.numerator == 0 {
        return 0;
    }

    let tiers = total_size.div_ceil(REF_SCRIPT_TIER_SIZE) as u32;

    // sum of chunk * cost * (6/5)^tier over a common denominator
    let mut numerator: u128 = 0;
    let mut remaining = total_size;

    for tier in 0..tiers {
        let chunk = remaining.min(REF_SCRIPT_TIER_SIZE);
        remaining -= chunk;

        numerator += chunk as u128
            * cost_per_byte.numerator as u128
            * 6u128.pow(tier)
            * 5u128.pow(tiers - 1 - tier);
    }

    let denominator = cost_per_byte.denominator as u128 * 5u128.pow(tiers - 1);

    (numerator / denominator) as u64
}

/// Minimum lovelace an output must carry, given its serialized size
pub fn min_utxo_value(params: &ProtocolParameters, output_size: u64) -> u64 {
    params.ada_per_utxo_byte * (output_size + UTXO_ENTRY_OVERHEAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fee_matches_by_hand() {
        let params = ProtocolParameters::default();
        assert_eq!(linear_fee(&params, 300), 44 * 300 + 155381);
    }

    #[test]
    fn script_fee_rounds_each_component_up() {
        let prices = ExUnitPrices {
            mem_price: RationalNumber {
                numerator: 577,
                denominator: 10_000,
            },
            step_price: RationalNumber {
                numerator: 721,
                denominator: 10_000_000,
            },
        };

        let units = ExUnits {
            mem: 1_000_000_000,
            steps: 5_000_000_000,
        };

        // 577/10000 * 1e9 = 57_700_000 exactly; 721/1e7 * 5e9 = 360_500 exactly
        assert_eq!(script_fee(&prices, &units), 57_700_000 + 360_500);

        // one mem unit costs a fraction of a lovelace and is rounded up
        let tiny = ExUnits { mem: 1, steps: 0 };
        assert_eq!(script_fee(&prices, &tiny), 1);
    }

    #[test]
    fn ref_script_fee_first_tier_is_flat() {
        let cost = RationalNumber {
            numerator: 15,
            denominator: 1,
        };

        assert_eq!(ref_script_fee(&cost, 0), 0);
        assert_eq!(ref_script_fee(&cost, 100), 1500);
        assert_eq!(ref_script_fee(&cost, 25_600), 25_600 * 15);
    }

    #[test]
    fn ref_script_fee_later_tiers_scale_up() {
        let cost = RationalNumber {
            numerator: 15,
            denominator: 1,
        };

        // one full tier at 1.0x plus one full tier at 1.2x
        let expected = 25_600 * 15 + 25_600 * 15 * 6 / 5;
        assert_eq!(ref_script_fee(&cost, 2 * 25_600), expected);

        // a fractional-cost parameter floors the total, not each tier
        let fractional = RationalNumber {
            numerator: 1,
            denominator: 3,
        };
        assert_eq!(ref_script_fee(&fractional, 10), 3); // floor(10/3)
    }

    #[test]
    fn min_utxo_accounts_for_entry_overhead() {
        let params = ProtocolParameters::default();
        assert_eq!(min_utxo_value(&params, 67), (67 + 160) * 4310);
    }
}
