//! Transaction fee estimation, coin selection and balancing
//!
//! The entry point is [Balancer], which drives a draft transaction to a
//! ledger-valid one: evaluate scripts, select inputs, attach change, settle
//! the fee and re-check until the books close.

pub mod balance;
pub mod eval;
pub mod fee;
pub mod params;
pub mod provider;
pub mod scripts;
pub mod selection;
pub mod utxo;
pub mod value;

pub use balance::{estimate_min_fee, is_balanced, BalanceError, Balancer};
pub use eval::{EvaluatedRedeemer, EvaluationError, TxEvaluator};
pub use fee::{linear_fee, min_utxo_value, ref_script_fee, script_fee};
pub use params::ProtocolParameters;
pub use provider::{Provider, ProviderError};
pub use selection::{CoinSelector, LargeFirstSelector, Selection, SelectionError};
pub use utxo::Utxo;
pub use value::{AssetClass, Balance};
