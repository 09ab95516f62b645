//! Rust-native building blocks for constructing and balancing Cardano
//! transactions
//!
//! This crate doesn't provide any particular application, it is the base
//! layer for wallets and dapp backends that need to build, inspect, sign and
//! balance transactions off-chain.

#[doc(inline)]
pub use thetis_codec as codec;

#[doc(inline)]
pub use thetis_crypto as crypto;

pub mod ledger {
    //! Ledger primitives and cbor codecs

    #[doc(inline)]
    pub use thetis_addresses as addresses;

    #[doc(inline)]
    pub use thetis_primitives as primitives;
}

#[doc(inline)]
pub use thetis_txbuilder as txbuilder;
