use thetis_primitives::{ExUnits, RedeemerTag, Tx};
use thiserror::Error;

use crate::utxo::Utxo;

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("script evaluation failed: {0}")]
    Failed(String),

    #[error("missing resolved output for a script input")]
    MissingUtxo,
}

/// Execution units measured for one redeemer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedRedeemer {
    pub tag: RedeemerTag,
    pub index: u32,
    pub ex_units: ExUnits,
}

/// Measures the execution cost of every Plutus script a transaction runs.
///
/// Implementations range from a local Plutus machine to a provider that
/// evaluates remotely; balancing only needs the measured units back.
pub trait TxEvaluator {
    fn evaluate(
        &self,
        tx: &Tx<'_>,
        utxos: &[Utxo<'_>],
    ) -> Result<Vec<EvaluatedRedeemer>, EvaluationError>;
}
