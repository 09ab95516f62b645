//! Legacy Byron-era addresses
//!
//! A Byron address is a cbor envelope `[#6.24(payload), crc32(payload)]`
//! where the payload carries a 28-byte root hash, an attribute bag and a
//! discriminant for the kind of root. The textual form is Base58 over the
//! envelope bytes.

use base58::{FromBase58, ToBase58};
use thetis_codec::{
    minicbor::{self, Decode, Encode},
    utils::{Bytes, KeyValuePairs, TagWrap},
};
use thetis_crypto::hash::Hash;

use crate::Error;

pub type AddressId = Hash<28>;

/// Attribute bag of a Byron address, keys and values preserved as seen
///
/// Key 0 holds the stake distribution, key 1 the encrypted derivation path,
/// key 2 the protocol magic of non-mainnet networks. Values stay as opaque
/// cbor bytes.
pub type AddrAttrs = KeyValuePairs<u8, Bytes>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddrType {
    PubKey,
    Script,
    Redeem,
    Other(u64),
}

impl<'b, C> minicbor::Decode<'b, C> for AddrType {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _ctx: &mut C,
    ) -> Result<Self, minicbor::decode::Error> {
        let variant = d.u64()?;

        match variant {
            0 => Ok(AddrType::PubKey),
            1 => Ok(AddrType::Script),
            2 => Ok(AddrType::Redeem),
            x => Ok(AddrType::Other(x)),
        }
    }
}

impl<C> minicbor::Encode<C> for AddrType {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            AddrType::PubKey => e.u64(0)?,
            AddrType::Script => e.u64(1)?,
            AddrType::Redeem => e.u64(2)?,
            AddrType::Other(x) => e.u64(*x)?,
        };

        Ok(())
    }
}

/// The decoded contents of the tag-24 payload
#[derive(Debug, Encode, Decode, Clone, PartialEq)]
pub struct AddressPayload {
    #[n(0)]
    pub root: AddressId,

    #[n(1)]
    pub attributes: AddrAttrs,

    #[n(2)]
    pub addrtype: AddrType,
}

/// A Byron address kept in its wire envelope
#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct ByronAddress {
    #[n(0)]
    payload: TagWrap<Bytes, 24>,

    #[n(1)]
    crc: u32,
}

fn payload_crc(payload: &[u8]) -> u32 {
    crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC).checksum(payload)
}

impl ByronAddress {
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: TagWrap::new(Vec::from(payload).into()),
            crc: payload_crc(payload),
        }
    }

    pub fn from_bytes(value: &[u8]) -> Result<Self, Error> {
        let address: Self = minicbor::decode(value).map_err(Error::InvalidByronCbor)?;

        if payload_crc(&address.payload.0) != address.crc {
            return Err(Error::BadByronCrc);
        }

        Ok(address)
    }

    /// Decodes the payload into its root hash, attributes and type
    pub fn decode_payload(&self) -> Result<AddressPayload, Error> {
        minicbor::decode(&self.payload.0).map_err(Error::InvalidByronCbor)
    }

    pub fn typeid(&self) -> u8 {
        0b1000
    }

    pub fn to_vec(&self) -> Vec<u8> {
        minicbor::to_vec(self).unwrap()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }

    pub fn to_base58(&self) -> String {
        self.to_vec().to_base58()
    }

    pub fn from_base58(value: &str) -> Result<Self, Error> {
        let bytes = value.from_base58().map_err(Error::BadBase58)?;
        Self::from_bytes(&bytes)
    }
}
