//! Digests over domain structures
//!
//! Wherever a structure came off the wire wrapped in [KeepRaw], the digest is
//! taken over the original bytes; structures built in memory hash their
//! canonical encoding.

use crate::model::{
    AuxiliaryData, DatumOption, NativeScript, Script, TransactionBody, Tx,
};
use crate::{KeepRaw, PlutusData, PlutusScript};
use thetis_crypto::hash::{Hash, Hasher};

pub trait ComputeHash<const SIZE: usize> {
    fn compute_hash(&self) -> Hash<SIZE>;
}

impl ComputeHash<32> for TransactionBody<'_> {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ComputeHash<32> for KeepRaw<'_, TransactionBody<'_>> {
    fn compute_hash(&self) -> Hash<32> {
        match self.raw_cbor() {
            Some(raw) => Hasher::<256>::hash(raw),
            None => Hasher::<256>::hash_cbor(&**self),
        }
    }
}

impl ComputeHash<28> for NativeScript {
    fn compute_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 0)
    }
}

impl ComputeHash<28> for KeepRaw<'_, NativeScript> {
    fn compute_hash(&self) -> Hash<28> {
        match self.raw_cbor() {
            Some(raw) => Hasher::<224>::hash_tagged(raw, 0),
            None => Hasher::<224>::hash_tagged_cbor(&**self, 0),
        }
    }
}

impl ComputeHash<28> for PlutusScript<1> {
    fn compute_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 1)
    }
}

impl ComputeHash<28> for PlutusScript<2> {
    fn compute_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 2)
    }
}

impl ComputeHash<28> for PlutusScript<3> {
    fn compute_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 3)
    }
}

impl ComputeHash<28> for Script<'_> {
    fn compute_hash(&self) -> Hash<28> {
        match self {
            Script::Native(x) => x.compute_hash(),
            Script::PlutusV1(x) => x.compute_hash(),
            Script::PlutusV2(x) => x.compute_hash(),
            Script::PlutusV3(x) => x.compute_hash(),
        }
    }
}

impl ComputeHash<32> for PlutusData {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ComputeHash<32> for KeepRaw<'_, PlutusData> {
    fn compute_hash(&self) -> Hash<32> {
        match self.raw_cbor() {
            Some(raw) => Hasher::<256>::hash(raw),
            None => Hasher::<256>::hash_cbor(&**self),
        }
    }
}

impl ComputeHash<32> for AuxiliaryData {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ComputeHash<32> for KeepRaw<'_, AuxiliaryData> {
    fn compute_hash(&self) -> Hash<32> {
        match self.raw_cbor() {
            Some(raw) => Hasher::<256>::hash(raw),
            None => Hasher::<256>::hash_cbor(&**self),
        }
    }
}

/// The datum a hash-only option points at is already a digest; an inline
/// datum hashes its payload bytes
impl ComputeHash<32> for DatumOption<'_> {
    fn compute_hash(&self) -> Hash<32> {
        match self {
            DatumOption::Hash(hash) => *hash,
            DatumOption::Data(data) => data.0.compute_hash(),
        }
    }
}

impl Tx<'_> {
    /// Identity of the transaction: the digest of its body bytes
    pub fn tx_id(&self) -> Hash<32> {
        self.transaction_body.compute_hash()
    }
}
