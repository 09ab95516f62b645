//! Remote lookup contract
//!
//! Everything the balancing layers need from the outside world, behind one
//! trait so callers can plug any chain-indexer or node client in. Transport
//! concerns stay on the implementor's side; every operation reports a typed
//! error and the provider names itself for diagnostics.

use thetis_addresses::Address;
use thetis_primitives::{AssetName, Hash, PlutusData, PolicyId, TransactionInput, Tx};
use thiserror::Error;

use crate::eval::EvaluatedRedeemer;
use crate::params::ProtocolParameters;
use crate::utxo::Utxo;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("timed out after {0} ms")]
    Timeout(u64),
}

pub trait Provider {
    /// Name used in diagnostic messages
    fn name(&self) -> &str;

    /// Protocol parameters for the current epoch
    fn parameters(&self) -> Result<ProtocolParameters, ProviderError>;

    /// Every unspent output sitting at the given address
    fn unspent_outputs(&self, address: &Address) -> Result<Vec<Utxo<'static>>, ProviderError>;

    /// Withdrawable rewards of the given reward address
    fn rewards_available(&self, reward_address: &Address) -> Result<u64, ProviderError>;

    /// Unspent outputs at the address that carry the given asset
    fn unspent_outputs_with_asset(
        &self,
        address: &Address,
        policy: &PolicyId,
        name: &AssetName,
    ) -> Result<Vec<Utxo<'static>>, ProviderError>;

    /// The single unspent output holding the given NFT
    fn unspent_output_by_nft(
        &self,
        policy: &PolicyId,
        name: &AssetName,
    ) -> Result<Utxo<'static>, ProviderError>;

    /// Resolves each input to the output it points at
    fn resolve_unspent_outputs(
        &self,
        inputs: &[TransactionInput],
    ) -> Result<Vec<Utxo<'static>>, ProviderError>;

    /// Looks a datum up by its hash
    fn resolve_datum(&self, hash: &Hash<32>) -> Result<PlutusData, ProviderError>;

    /// Waits until the transaction is on-chain or the timeout elapses;
    /// returns whether it was confirmed
    fn confirm_transaction(&self, tx_id: Hash<32>, timeout_ms: u64) -> Result<bool, ProviderError>;

    /// Submits a signed transaction, returning its id
    fn submit_transaction(&self, tx: &Tx<'_>) -> Result<Hash<32>, ProviderError>;

    /// Measures execution units for the scripts the transaction runs
    fn evaluate_transaction(
        &self,
        tx: &Tx<'_>,
        extra_utxos: &[Utxo<'_>],
    ) -> Result<Vec<EvaluatedRedeemer>, ProviderError>;
}
