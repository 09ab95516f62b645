//! Plutus data trees
//!
//! Datums and redeemer arguments are trees of constructors, maps, lists,
//! integers and bytestrings. Their digests are computed over the exact bytes
//! the reference (Haskell) encoder produces, so the encoders here reproduce
//! its framing choices: indefinite lists when non-empty, definite maps,
//! bytestrings split into 64-byte chunks past that length, and the
//! three-way constructor tag scheme.

use crate::KeyValuePairs;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};
use thetis_codec::minicbor::{
    self,
    data::{Tag, Type},
    decode::Error,
};
use thetis_codec::utils::Int;

/// cbor tags routing inside a plutus data item
const TAG_BIG_UINT: u64 = 2;
const TAG_BIG_NINT: u64 = 3;
const TAG_CONSTR_GENERAL: u64 = 102;

/// Compact tag windows for constructor indexes 0..=6 and 7..=127
const TAG_CONSTR_SMALL: u64 = 121;
const TAG_CONSTR_WIDE: u64 = 1280;

fn is_integer(datatype: Type) -> bool {
    matches!(
        datatype,
        Type::U8
            | Type::U16
            | Type::U32
            | Type::U64
            | Type::I8
            | Type::I16
            | Type::I32
            | Type::I64
            | Type::Int
    )
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum PlutusData {
    Constr(Constr<PlutusData>),
    Map(KeyValuePairs<PlutusData, PlutusData>),
    List(Vec<PlutusData>),
    Int(BigInt),
    Bytes(BoundedBytes),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for PlutusData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, Error> {
        let datatype = d.datatype()?;

        match datatype {
            Type::Tag => {
                // peek at the tag to route without consuming it; the nested
                // decoders read it again themselves
                let tag = d.probe().tag()?.as_u64();

                match tag {
                    TAG_BIG_UINT | TAG_BIG_NINT => Ok(Self::Int(d.decode_with(ctx)?)),
                    TAG_CONSTR_GENERAL | 121..=127 | 1280..=1400 => {
                        Ok(Self::Constr(d.decode_with(ctx)?))
                    }
                    _ => Err(Error::message(format!(
                        "tag {tag} does not begin a plutus data item"
                    ))),
                }
            }
            Type::Map | Type::MapIndef => Ok(Self::Map(d.decode_with(ctx)?)),
            Type::Array | Type::ArrayIndef => Ok(Self::List(d.decode_with(ctx)?)),
            Type::Bytes | Type::BytesIndef => Ok(Self::Bytes(d.decode_with(ctx)?)),
            _ if is_integer(datatype) => Ok(Self::Int(d.decode_with(ctx)?)),
            other => Err(Error::message(format!(
                "data type {other:?} does not begin a plutus data item"
            ))),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for PlutusData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Self::Constr(constr) => {
                e.encode_with(constr, ctx)?;
            }
            Self::Map(entries) => {
                // maps stay definite-length whatever their size; only lists
                // get the indefinite treatment from the reference encoder
                e.map(entries.len() as u64)?;

                for (key, value) in entries.iter() {
                    e.encode_with(key, ctx)?;
                    e.encode_with(value, ctx)?;
                }
            }
            Self::List(items) => encode_reference_list(items, e, ctx)?,
            Self::Int(value) => {
                e.encode_with(value, ctx)?;
            }
            Self::Bytes(value) => {
                e.encode_with(value, ctx)?;
            }
        }

        Ok(())
    }
}

/// An integer of arbitrary width
///
/// Values outside the 64-bit range ride the bignum tags (2 for positive,
/// 3 for negative) over a bytestring of their magnitude.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub enum BigInt {
    Int(Int),
    BigUInt(BoundedBytes),
    BigNInt(BoundedBytes),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for BigInt {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, Error> {
        let datatype = d.datatype()?;

        if is_integer(datatype) {
            return Ok(Self::Int(d.decode_with(ctx)?));
        }

        if datatype != Type::Tag {
            return Err(Error::message(format!(
                "data type {datatype:?} does not begin an integer"
            )));
        }

        match d.tag()?.as_u64() {
            TAG_BIG_UINT => Ok(Self::BigUInt(d.decode_with(ctx)?)),
            TAG_BIG_NINT => Ok(Self::BigNInt(d.decode_with(ctx)?)),
            other => Err(Error::message(format!("tag {other} is not a bignum tag"))),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for BigInt {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            BigInt::Int(value) => {
                e.encode_with(value, ctx)?;
            }
            BigInt::BigUInt(magnitude) => {
                e.tag(Tag::new(TAG_BIG_UINT))?;
                e.encode_with(magnitude, ctx)?;
            }
            BigInt::BigNInt(magnitude) => {
                e.tag(Tag::new(TAG_BIG_NINT))?;
                e.encode_with(magnitude, ctx)?;
            }
        };

        Ok(())
    }
}

/// A constructor application: which constructor of a sum type this value is,
/// plus its fields
///
/// Indexes 0..=6 ride cbor tags 121..=127, indexes 7..=127 ride tags
/// 1280..=1400, and anything larger falls back to the general tag 102 where
/// the index travels inside the payload. The wire tag that was seen (or
/// chosen) is kept verbatim so re-encoding is stable.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct Constr<A> {
    pub tag: u64,
    pub constructor: Option<u64>,
    pub fields: Vec<A>,
}

impl<A> Constr<A> {
    /// Builds a constructor application, picking the most compact framing
    /// that can carry the index
    pub fn new(index: u64, fields: Vec<A>) -> Self {
        match index {
            0..=6 => Constr {
                tag: TAG_CONSTR_SMALL + index,
                constructor: None,
                fields,
            },
            7..=127 => Constr {
                tag: TAG_CONSTR_WIDE + index - 7,
                constructor: None,
                fields,
            },
            _ => Constr {
                tag: TAG_CONSTR_GENERAL,
                constructor: Some(index),
                fields,
            },
        }
    }

    /// The logical constructor index, whichever framing carries it
    pub fn index(&self) -> u64 {
        match self.tag {
            TAG_CONSTR_GENERAL => self.constructor.unwrap_or_default(),
            121..=127 => self.tag - TAG_CONSTR_SMALL,
            _ => self.tag - TAG_CONSTR_WIDE + 7,
        }
    }
}

impl<'b, C, A> minicbor::decode::Decode<'b, C> for Constr<A>
where
    A: minicbor::decode::Decode<'b, C>,
{
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, Error> {
        let tag = d.tag()?.as_u64();

        match tag {
            TAG_CONSTR_GENERAL => {
                d.array()?;

                Ok(Constr {
                    tag,
                    constructor: Some(d.decode_with(ctx)?),
                    fields: d.decode_with(ctx)?,
                })
            }
            121..=127 | 1280..=1400 => Ok(Constr {
                tag,
                constructor: None,
                fields: d.decode_with(ctx)?,
            }),
            other => Err(Error::message(format!(
                "tag {other} is not a constructor tag"
            ))),
        }
    }
}

impl<C, A> minicbor::encode::Encode<C> for Constr<A>
where
    A: minicbor::encode::Encode<C>,
{
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.tag(Tag::new(self.tag))?;

        if self.tag == TAG_CONSTR_GENERAL {
            // general framing: a definite pair of index and field list
            e.array(2)?;
            e.u64(self.constructor.unwrap_or_default())?;
        }

        encode_reference_list(&self.fields, e, ctx)?;

        Ok(())
    }
}

/// A plutus bytestring
///
/// Up to 64 bytes travel as a single definite bytestring; anything longer
/// becomes an indefinite sequence of 64-byte chunks, as the reference
/// encoder splits them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct BoundedBytes(Vec<u8>);

const BYTES_CHUNK: usize = 64;

impl From<Vec<u8>> for BoundedBytes {
    fn from(value: Vec<u8>) -> Self {
        BoundedBytes(value)
    }
}

impl From<BoundedBytes> for Vec<u8> {
    fn from(value: BoundedBytes) -> Self {
        value.0
    }
}

impl Deref for BoundedBytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<String> for BoundedBytes {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(BoundedBytes(hex::decode(value)?))
    }
}

impl From<BoundedBytes> for String {
    fn from(value: BoundedBytes) -> Self {
        hex::encode(value.0)
    }
}

impl fmt::Display for BoundedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl<'b, C> minicbor::decode::Decode<'b, C> for BoundedBytes {
    fn decode(d: &mut minicbor::Decoder<'b>, _ctx: &mut C) -> Result<Self, Error> {
        // the chunk iterator yields a single slice for definite strings and
        // every chunk of an indefinite one
        let mut joined = Vec::new();

        for chunk in d.bytes_iter()? {
            joined.extend_from_slice(chunk?);
        }

        Ok(BoundedBytes(joined))
    }
}

impl<C> minicbor::encode::Encode<C> for BoundedBytes {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if self.0.len() <= BYTES_CHUNK {
            e.bytes(&self.0)?;
            return Ok(());
        }

        e.begin_bytes()?;

        for chunk in self.0.chunks(BYTES_CHUNK) {
            e.bytes(chunk)?;
        }

        e.end()?;

        Ok(())
    }
}

/// List framing as the reference encoder does it: a zero-length definite
/// array when empty, indefinite otherwise
fn encode_reference_list<C, W, A>(
    items: &[A],
    e: &mut minicbor::Encoder<W>,
    ctx: &mut C,
) -> Result<(), minicbor::encode::Error<W::Error>>
where
    W: minicbor::encode::Write,
    A: minicbor::encode::Encode<C>,
{
    if items.is_empty() {
        e.array(0)?;
        return Ok(());
    }

    e.begin_array()?;

    for item in items {
        e.encode_with(item, ctx)?;
    }

    e.end()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thetis_codec::minicbor;

    #[test]
    fn constr_roundtrip() {
        // constructor 1 with a single int field, indefinite field list
        let bytes = hex::decode("d87a9f187bff").unwrap();
        let data: PlutusData = minicbor::decode(&bytes).unwrap();

        match &data {
            PlutusData::Constr(constr) => {
                assert_eq!(constr.index(), 1);
                assert_eq!(constr.fields.len(), 1);
            }
            _ => panic!("expected constr"),
        }

        assert_eq!(minicbor::to_vec(&data).unwrap(), bytes);
    }

    #[test]
    fn constr_framing_follows_the_index() {
        assert_eq!(Constr::<PlutusData>::new(0, vec![]).tag, 121);
        assert_eq!(Constr::<PlutusData>::new(6, vec![]).tag, 127);
        assert_eq!(Constr::<PlutusData>::new(7, vec![]).tag, 1280);
        assert_eq!(Constr::<PlutusData>::new(127, vec![]).tag, 1400);

        let general = Constr::<PlutusData>::new(453, vec![]);
        assert_eq!(general.tag, 102);
        assert_eq!(general.constructor, Some(453));

        for index in [0, 6, 7, 127, 453] {
            assert_eq!(Constr::<PlutusData>::new(index, vec![]).index(), index);
        }
    }

    #[test]
    fn empty_constr_uses_definite_list() {
        let data = PlutusData::Constr(Constr::new(0, vec![]));
        assert_eq!(hex::encode(minicbor::to_vec(&data).unwrap()), "d87980");
    }

    #[test]
    fn long_bytestrings_are_chunked() {
        let data = PlutusData::Bytes(BoundedBytes::from(vec![7u8; 100]));
        let bytes = minicbor::to_vec(&data).unwrap();

        // indefinite bytes: one 64-byte chunk, one 36-byte chunk, break
        assert_eq!(bytes[0], 0x5f);
        assert_eq!(*bytes.last().unwrap(), 0xff);

        let decoded: PlutusData = minicbor::decode(&bytes).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn bignums_ride_their_tags() {
        let positive = PlutusData::Int(BigInt::BigUInt(vec![1u8, 2, 3].into()));
        let bytes = minicbor::to_vec(&positive).unwrap();
        assert_eq!(hex::encode(&bytes), "c243010203");

        let decoded: PlutusData = minicbor::decode(&bytes).unwrap();
        assert_eq!(decoded, positive);
    }
}
