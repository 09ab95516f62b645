//! Ledger primitives and cbor codec for Cardano transactions
//!
//! Handcrafted, idiomatic rust artifacts based on the Conway CDDL published
//! in the IntersectMBO cardano-ledger repo.

mod plutus_data;

pub mod hashes;
pub mod model;
pub mod script_data;

pub use model::*;
pub use plutus_data::*;

pub use thetis_codec::utils::{
    Bytes, Int, KeepRaw, KeyValuePairs, NonEmptySet, NonZeroInt, Nullable, PositiveCoin, Set,
};
pub use thetis_crypto::hash::Hash;

use serde::{Deserialize, Serialize};
use thetis_codec::codec_by_datatype;
use thetis_codec::minicbor::{self, data::Tag, Decode, Encode};

// ----- Common type definitions

pub type AddrKeyhash = Hash<28>;

/// Name of an asset under a policy, 0 to 32 bytes
pub type AssetName = Bytes;

pub type Coin = u64;

pub type CostModel = Vec<i64>;

pub type DatumHash = Hash<32>;

pub type DnsName = String;

pub type Epoch = u64;

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct ExUnits {
    #[n(0)]
    pub mem: u64,
    #[n(1)]
    pub steps: u64,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct ExUnitPrices {
    #[n(0)]
    pub mem_price: PositiveInterval,

    #[n(1)]
    pub step_price: PositiveInterval,
}

pub type Genesishash = Bytes;

pub type GenesisDelegateHash = Bytes;

pub type IPv4 = Bytes;

pub type IPv6 = Bytes;

pub type Metadata = KeyValuePairs<MetadatumLabel, Metadatum>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum Metadatum {
    Int(Int),
    Bytes(Bytes),
    Text(String),
    Array(Vec<Metadatum>),
    Map(KeyValuePairs<Metadatum, Metadatum>),
}

codec_by_datatype! {
    Metadatum,
    U8 | U16 | U32 | U64 | I8 | I16 | I32 | I64 | Int => Int,
    Bytes => Bytes,
    String => Text,
    Array | ArrayIndef => Array,
    Map | MapIndef => Map,
    ()
}

pub type MetadatumLabel = u64;

#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy,
)]
#[cbor(index_only)]
pub enum NetworkId {
    #[n(0)]
    Testnet,
    #[n(1)]
    Mainnet,
}

impl From<NetworkId> for u8 {
    fn from(network_id: NetworkId) -> u8 {
        match network_id {
            NetworkId::Testnet => 0,
            NetworkId::Mainnet => 1,
        }
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = ();

    fn try_from(i: u8) -> Result<Self, Self::Error> {
        match i {
            0 => Ok(Self::Testnet),
            1 => Ok(Self::Mainnet),
            _ => Err(()),
        }
    }
}

/// Compiled Plutus code of the given language `VERSION`, kept opaque
#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
#[cbor(transparent)]
pub struct PlutusScript<const VERSION: usize>(#[n(0)] pub Bytes);

impl<const VERSION: usize> AsRef<[u8]> for PlutusScript<VERSION> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

pub type PolicyId = Hash<28>;

pub type PoolKeyhash = Hash<28>;

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct PoolMetadata {
    #[n(0)]
    pub url: String,

    #[n(1)]
    pub hash: PoolMetadataHash,
}

pub type PoolMetadataHash = Hash<32>;

pub type Port = u32;

pub type PositiveInterval = RationalNumber;

pub type ProtocolVersion = (u64, u64);

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct RationalNumber {
    pub numerator: u64,
    pub denominator: u64,
}

impl<'b, C> minicbor::decode::Decode<'b, C> for RationalNumber {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let tag = d.tag()?;

        if tag != Tag::new(30) {
            return Err(minicbor::decode::Error::message(
                "expected tag 30 for rational number",
            ));
        }

        d.array()?;

        Ok(RationalNumber {
            numerator: d.decode_with(ctx)?,
            denominator: d.decode_with(ctx)?,
        })
    }
}

impl<C> minicbor::encode::Encode<C> for RationalNumber {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.tag(Tag::new(30))?;
        e.array(2)?;
        e.encode_with(self.numerator, ctx)?;
        e.encode_with(self.denominator, ctx)?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Relay {
    SingleHostAddr(Nullable<Port>, Nullable<IPv4>, Nullable<IPv6>),
    SingleHostName(Nullable<Port>, DnsName),
    MultiHostName(DnsName),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for Relay {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(Relay::SingleHostAddr(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            1 => Ok(Relay::SingleHostName(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            2 => Ok(Relay::MultiHostName(d.decode_with(ctx)?)),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for Relay",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for Relay {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Relay::SingleHostAddr(a, b, c) => {
                e.array(4)?;
                e.encode_with(0, ctx)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;

                Ok(())
            }
            Relay::SingleHostName(a, b) => {
                e.array(3)?;
                e.encode_with(1, ctx)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;

                Ok(())
            }
            Relay::MultiHostName(a) => {
                e.array(2)?;
                e.encode_with(2, ctx)?;
                e.encode_with(a, ctx)?;

                Ok(())
            }
        }
    }
}

/// Reward account bytes: one header byte plus a 28-byte stake credential
pub type RewardAccount = Bytes;

pub type ScriptHash = Hash<28>;

/// A 28-byte digest tagged as either a key hash or a script hash
///
/// The total order follows the wire discriminants (key hashes before script
/// hashes) and then the hash bytes, which is what the derived instances
/// produce from this declaration order. Maps keyed by credentials across the
/// model rely on it.
#[derive(
    Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, std::hash::Hash,
)]
pub enum Credential {
    KeyHash(AddrKeyhash),
    ScriptHash(ScriptHash),
}

impl Credential {
    /// Get a reference to the inner digest, whichever kind it tags
    pub fn as_hash(&self) -> &Hash<28> {
        match self {
            Credential::KeyHash(x) => x,
            Credential::ScriptHash(x) => x,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Credential::ScriptHash(_))
    }
}

impl<'b, C> minicbor::decode::Decode<'b, C> for Credential {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(Credential::KeyHash(d.decode_with(ctx)?)),
            1 => Ok(Credential::ScriptHash(d.decode_with(ctx)?)),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for Credential",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for Credential {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Credential::KeyHash(x) => {
                e.array(2)?;
                e.encode_with(0, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Credential::ScriptHash(x) => {
                e.array(2)?;
                e.encode_with(1, ctx)?;
                e.encode_with(x, ctx)?;
            }
        }

        Ok(())
    }
}

pub type StakeCredential = Credential;

pub type DRepCredential = Credential;

pub type CommitteeColdCredential = Credential;

pub type CommitteeHotCredential = Credential;

#[derive(
    Serialize,
    Deserialize,
    Encode,
    Decode,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    std::hash::Hash,
)]
pub struct TransactionInput {
    #[n(0)]
    pub transaction_id: Hash<32>,

    #[n(1)]
    pub index: u64,
}

pub type UnitInterval = RationalNumber;

pub type VrfKeyhash = Hash<32>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::str::FromStr;
    use test_case::test_case;

    fn key(hex_digest: &str) -> Credential {
        Credential::KeyHash(Hash::from_str(hex_digest).unwrap())
    }

    fn script(hex_digest: &str) -> Credential {
        Credential::ScriptHash(Hash::from_str(hex_digest).unwrap())
    }

    const LO: &str = "00000000000000000000000000000000000000000000000000000000";
    const HI: &str = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

    #[test_case(key(LO), key(LO) => Ordering::Equal)]
    #[test_case(key(LO), key(HI) => Ordering::Less)]
    #[test_case(key(HI), key(LO) => Ordering::Greater)]
    #[test_case(key(HI), script(LO) => Ordering::Less; "any key hash before any script hash")]
    #[test_case(script(LO), key(HI) => Ordering::Greater)]
    #[test_case(script(LO), script(HI) => Ordering::Less)]
    #[test_case(script(HI), script(HI) => Ordering::Equal)]
    fn credential_ordering(left: Credential, right: Credential) -> Ordering {
        left.cmp(&right)
    }

    #[test]
    fn credential_codec_roundtrip() {
        for cred in [key(LO), script(HI)] {
            let bytes = minicbor::to_vec(&cred).unwrap();
            let decoded: Credential = minicbor::decode(&bytes).unwrap();
            assert_eq!(decoded, cred);
            assert_eq!(minicbor::to_vec(&decoded).unwrap(), bytes);
        }
    }

    #[test]
    fn rational_number_codec() {
        let bytes = hex::decode("d81e820105").unwrap();
        let rational: RationalNumber = minicbor::decode(&bytes).unwrap();

        assert_eq!(rational.numerator, 1);
        assert_eq!(rational.denominator, 5);
        assert_eq!(minicbor::to_vec(&rational).unwrap(), bytes);
    }
}
