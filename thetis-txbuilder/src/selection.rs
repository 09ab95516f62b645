//! Coin selection
//!
//! A selector decides which unspent outputs fund a transaction. The target
//! is what the outputs consume; the implicit balance captures value entering
//! or leaving outside inputs and outputs (withdrawals, deposits, mint, the
//! fee). Selection is deterministic: the same inputs always pick the same
//! outputs.

use thiserror::Error;

use crate::utxo::Utxo;
use crate::value::{AssetClass, Balance};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("insufficient funds for {0}")]
    InsufficientFunds(AssetClass),
}

#[derive(Debug, Clone)]
pub struct Selection<'b> {
    /// Everything that funds the transaction, pre-selected inputs included
    pub selected: Vec<Utxo<'b>>,

    /// Leftover value: `sum(selected) + implicit - target`
    pub change: Balance,
}

pub trait CoinSelector {
    fn select<'b>(
        &self,
        available: &[Utxo<'b>],
        pre_selected: &[Utxo<'b>],
        target: &Balance,
        implicit: &Balance,
    ) -> Result<Selection<'b>, SelectionError>;
}

/// Largest-quantity-first selection
///
/// Settles each asset deficit by pulling available outputs in descending
/// order of the quantity they hold of that asset. Coin goes last, because
/// outputs picked for their tokens bring coin along anyway. Ties break on
/// the output reference, so identical inputs always produce identical
/// selections.
#[derive(Debug, Clone, Default)]
pub struct LargeFirstSelector;

impl CoinSelector for LargeFirstSelector {
    fn select<'b>(
        &self,
        available: &[Utxo<'b>],
        pre_selected: &[Utxo<'b>],
        target: &Balance,
        implicit: &Balance,
    ) -> Result<Selection<'b>, SelectionError> {
        let mut selected: Vec<Utxo<'b>> = pre_selected.to_vec();

        let mut pool: Vec<Utxo<'b>> = available
            .iter()
            .filter(|candidate| !selected.iter().any(|x| x.input == candidate.input))
            .cloned()
            .collect();

        let mut remaining = selected.iter().fold(
            target.clone() - implicit.clone(),
            |acc, utxo| acc - Balance::from(utxo.output.value()),
        );

        let token_deficits: Vec<AssetClass> = remaining
            .tokens()
            .filter(|(_, _, qty)| *qty > 0)
            .map(|(policy, name, _)| AssetClass::Token(*policy, name.clone()))
            .collect();

        for class in token_deficits {
            drain_deficit(&mut pool, &mut selected, &mut remaining, &class)?;
        }

        drain_deficit(&mut pool, &mut selected, &mut remaining, &AssetClass::Coin)?;

        let total = selected
            .iter()
            .fold(Balance::zero(), |acc, utxo| {
                acc + Balance::from(utxo.output.value())
            });

        let change = total + implicit.clone() - target.clone();

        Ok(Selection { selected, change })
    }
}

fn drain_deficit<'b>(
    pool: &mut Vec<Utxo<'b>>,
    selected: &mut Vec<Utxo<'b>>,
    remaining: &mut Balance,
    class: &AssetClass,
) -> Result<(), SelectionError> {
    if remaining.quantity_of(class) <= 0 {
        return Ok(());
    }

    // quantity descending, then output reference ascending
    pool.sort_by(|a, b| {
        Balance::from(b.output.value())
            .quantity_of(class)
            .cmp(&Balance::from(a.output.value()).quantity_of(class))
            .then_with(|| a.input.cmp(&b.input))
    });

    while remaining.quantity_of(class) > 0 {
        if pool.is_empty() || Balance::from(pool[0].output.value()).quantity_of(class) == 0 {
            return Err(SelectionError::InsufficientFunds(class.clone()));
        }

        let utxo = pool.remove(0);
        *remaining -= Balance::from(utxo.output.value());
        selected.push(utxo);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thetis_crypto::hash::Hash;
    use thetis_primitives::{
        AssetName, PolicyId, PositiveCoin, TransactionInput, TransactionOutput, Value,
    };

    fn input(n: u8, index: u64) -> TransactionInput {
        TransactionInput {
            transaction_id: Hash::from([n; 32]),
            index,
        }
    }

    fn coin_utxo(n: u8, coin: u64) -> Utxo<'static> {
        Utxo::new(
            input(n, 0),
            TransactionOutput::PostAlonzo(thetis_primitives::PostAlonzoTransactionOutput {
                address: vec![0u8; 29].into(),
                value: Value::Coin(coin),
                datum_option: None,
                script_ref: None,
            }),
        )
    }

    fn token_utxo(n: u8, coin: u64, policy: u8, name: &str, qty: u64) -> Utxo<'static> {
        let policy: PolicyId = Hash::from([policy; 28]);
        let name: AssetName = Vec::from(name.as_bytes()).into();

        let assets = [(
            policy,
            [(name, PositiveCoin::try_from(qty).unwrap())].into_iter().collect(),
        )]
        .into_iter()
        .collect();

        Utxo::new(
            input(n, 0),
            TransactionOutput::PostAlonzo(thetis_primitives::PostAlonzoTransactionOutput {
                address: vec![0u8; 29].into(),
                value: Value::Multiasset(coin, assets),
                datum_option: None,
                script_ref: None,
            }),
        )
    }

    #[test]
    fn picks_largest_coin_first() {
        let available = [coin_utxo(1, 18_000_000), coin_utxo(2, 235_000_000), coin_utxo(3, 40_000_000)];

        let selection = LargeFirstSelector
            .select(
                &available,
                &[],
                &Balance::from_coin(15_000_000),
                &Balance::zero(),
            )
            .unwrap();

        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.selected[0].input, input(2, 0));
        assert_eq!(selection.change.coin(), 220_000_000);
    }

    #[test]
    fn settles_token_deficits_before_coin() {
        let available = [
            coin_utxo(1, 100_000_000),
            token_utxo(2, 5_000_000, 9, "tkn", 40),
        ];

        let mut target = Balance::from_coin(20_000_000);
        target.set_quantity(Hash::from([9; 28]), Vec::from("tkn".as_bytes()).into(), 7);

        let selection = LargeFirstSelector
            .select(&available, &[], &target, &Balance::zero())
            .unwrap();

        // the token utxo comes in for the asset, the large one for the coin gap
        assert_eq!(selection.selected.len(), 2);
        assert_eq!(selection.change.coin(), 85_000_000);
        assert_eq!(
            selection.change.quantity_of(&AssetClass::Token(
                Hash::from([9; 28]),
                Vec::from("tkn".as_bytes()).into()
            )),
            33
        );
    }

    #[test]
    fn is_deterministic_on_equal_quantities() {
        let available = [coin_utxo(7, 50_000_000), coin_utxo(3, 50_000_000)];

        let first = LargeFirstSelector
            .select(&available, &[], &Balance::from_coin(10), &Balance::zero())
            .unwrap();

        let flipped: Vec<_> = available.iter().rev().cloned().collect();
        let second = LargeFirstSelector
            .select(&flipped, &[], &Balance::from_coin(10), &Balance::zero())
            .unwrap();

        // tie breaks on the output reference, not the order given
        assert_eq!(first.selected[0].input, input(3, 0));
        assert_eq!(second.selected[0].input, input(3, 0));
    }

    #[test]
    fn reports_the_missing_asset() {
        let available = [coin_utxo(1, 5)];

        let result = LargeFirstSelector.select(
            &available,
            &[],
            &Balance::from_coin(10),
            &Balance::zero(),
        );

        assert_eq!(
            result.unwrap_err(),
            SelectionError::InsufficientFunds(AssetClass::Coin)
        );
    }

    #[test]
    fn implicit_value_reduces_the_deficit() {
        let available = [coin_utxo(1, 5)];

        // withdrawals cover most of the target
        let selection = LargeFirstSelector
            .select(
                &available,
                &[],
                &Balance::from_coin(10),
                &Balance::from_coin(8),
            )
            .unwrap();

        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.change.coin(), 3);
    }
}
