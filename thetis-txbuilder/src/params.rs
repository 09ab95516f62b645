//! Resolved protocol parameters
//!
//! Unlike the on-chain parameter-update payload (where every field is
//! optional), balancing needs the full, resolved parameter set a provider
//! hands back for the current epoch.

use serde::{Deserialize, Serialize};
use thetis_primitives::{
    Coin, CostModels, Epoch, ExUnitPrices, ExUnits, ProtocolVersion, RationalNumber, UnitInterval,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ProtocolParameters {
    pub minfee_a: u64,
    pub minfee_b: u64,
    pub max_block_body_size: u64,
    pub max_transaction_size: u64,
    pub max_block_header_size: u64,
    pub key_deposit: Coin,
    pub pool_deposit: Coin,
    pub maximum_epoch: Epoch,
    pub desired_number_of_stake_pools: u64,
    pub pool_pledge_influence: RationalNumber,
    pub expansion_rate: UnitInterval,
    pub treasury_growth_rate: UnitInterval,
    pub min_pool_cost: Coin,
    pub ada_per_utxo_byte: Coin,
    pub cost_models: CostModels,
    pub execution_costs: ExUnitPrices,
    pub max_tx_ex_units: ExUnits,
    pub max_block_ex_units: ExUnits,
    pub max_value_size: u64,
    pub collateral_percentage: u64,
    pub max_collateral_inputs: u64,
    pub governance_action_deposit: Coin,
    pub drep_deposit: Coin,
    pub minfee_refscript_cost_per_byte: UnitInterval,
    pub protocol_version: ProtocolVersion,
}

impl Default for ProtocolParameters {
    /// Mainnet values as of the Conway hard fork; callers talking to a
    /// provider should prefer the live parameters it returns
    fn default() -> Self {
        Self {
            minfee_a: 44,
            minfee_b: 155381,
            max_block_body_size: 90112,
            max_transaction_size: 16384,
            max_block_header_size: 1100,
            key_deposit: 2_000_000,
            pool_deposit: 500_000_000,
            maximum_epoch: 18,
            desired_number_of_stake_pools: 500,
            pool_pledge_influence: RationalNumber {
                numerator: 3,
                denominator: 10,
            },
            expansion_rate: RationalNumber {
                numerator: 3,
                denominator: 1000,
            },
            treasury_growth_rate: RationalNumber {
                numerator: 2,
                denominator: 10,
            },
            min_pool_cost: 170_000_000,
            ada_per_utxo_byte: 4310,
            cost_models: CostModels::default(),
            execution_costs: ExUnitPrices {
                mem_price: RationalNumber {
                    numerator: 577,
                    denominator: 10_000,
                },
                step_price: RationalNumber {
                    numerator: 721,
                    denominator: 10_000_000,
                },
            },
            max_tx_ex_units: ExUnits {
                mem: 14_000_000,
                steps: 10_000_000_000,
            },
            max_block_ex_units: ExUnits {
                mem: 62_000_000,
                steps: 20_000_000_000,
            },
            max_value_size: 5000,
            collateral_percentage: 150,
            max_collateral_inputs: 3,
            governance_action_deposit: 100_000_000_000,
            drep_deposit: 500_000_000,
            minfee_refscript_cost_per_byte: RationalNumber {
                numerator: 15,
                denominator: 1,
            },
            protocol_version: (9, 0),
        }
    }
}
