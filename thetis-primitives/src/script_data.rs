//! Script-data digest
//!
//! The body's script-data hash commits to the redeemers, the supplemental
//! datums and the cost models of the Plutus languages the transaction
//! actually uses. Redeemers and datums are hashed as they appeared on the
//! wire, which is why this works over the [KeepRaw] wrappers.

use std::collections::BTreeMap;

use crate::model::{CostModels, Language, Redeemers, WitnessSet};
use crate::{CostModel, KeepRaw, NonEmptySet, PlutusData};
use thetis_codec::minicbor::{self, Encode};

pub type PlutusVersion = u8;

/// Cost models keyed by language, encoded with the historical quirks the
/// ledger preserves for hashing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageViews(pub BTreeMap<PlutusVersion, CostModel>);

impl LanguageViews {
    /// Picks the cost models for the given languages out of the protocol
    /// parameters; returns None when nothing is selected
    pub fn select(
        models: &CostModels,
        used: impl IntoIterator<Item = Language>,
    ) -> Option<Self> {
        let mut views = BTreeMap::new();

        for language in used {
            let version = match language {
                Language::PlutusV1 => 0,
                Language::PlutusV2 => 1,
                Language::PlutusV3 => 2,
            };

            if let Some(model) = models.for_language(language) {
                views.insert(version, model.clone());
            }
        }

        if views.is_empty() {
            None
        } else {
            Some(Self(views))
        }
    }
}

impl FromIterator<(PlutusVersion, CostModel)> for LanguageViews {
    fn from_iter<I: IntoIterator<Item = (PlutusVersion, CostModel)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<C> Encode<C> for LanguageViews {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.map(self.0.len() as u64)?;

        // plain uint keys go out in ascending order, which the map already
        // provides; the v1 entry is appended last because its key encodes
        // as the two-byte string 0x4100 and canonical key order puts that
        // after any small uint
        for (version, cost_model) in self.0.iter().filter(|(version, _)| **version != 0) {
            e.u8(*version)?;
            e.encode_with(cost_model, ctx)?;
        }

        if let Some(cost_model) = self.0.get(&0) {
            // v1 predates the settled view encoding: its key is the
            // serialized bytes of the uint 0, and its value wraps an
            // indefinite-length copy of the cost model in a second layer
            // of serialized bytes
            e.bytes(&[0x00])?;

            let mut wrapped = Vec::new();
            let mut view = minicbor::Encoder::new(&mut wrapped);
            view.begin_array().unwrap(); // writing into a vec cannot fail
            for operation_cost in cost_model {
                view.i64(*operation_cost).unwrap();
            }
            view.end().unwrap();

            e.bytes(&wrapped)?;
        }

        Ok(())
    }
}

/// The three ingredients of the script-data hash
#[derive(Debug, Clone)]
pub struct ScriptData<'b> {
    pub redeemers: Option<KeepRaw<'b, Redeemers>>,
    pub datums: Option<KeepRaw<'b, NonEmptySet<KeepRaw<'b, PlutusData>>>>,
    pub language_views: Option<LanguageViews>,
}

impl ScriptData<'_> {
    pub fn hash(&self) -> thetis_crypto::hash::Hash<32> {
        let mut buf = vec![];

        if let Some(redeemers) = &self.redeemers {
            minicbor::encode(redeemers, &mut buf).unwrap(); // infallible
        } else {
            buf.push(0xa0);
        }

        if let Some(datums) = &self.datums {
            minicbor::encode(datums, &mut buf).unwrap(); // infallible
        }

        if let Some(language_views) = &self.language_views {
            minicbor::encode(language_views, &mut buf).unwrap(); // infallible
        } else {
            buf.push(0xa0);
        }

        thetis_crypto::hash::Hasher::<256>::hash(&buf)
    }
}

impl<'b> ScriptData<'b> {
    /// Collects the hash ingredients out of a witness set; None when the
    /// transaction carries neither redeemers nor datums
    pub fn build_for(
        witness: &WitnessSet<'b>,
        language_views: Option<LanguageViews>,
    ) -> Option<Self> {
        let redeemers = witness.redeemer.clone();
        let datums = witness.plutus_data.clone();

        if redeemers.is_none() && datums.is_none() {
            return None;
        }

        let language_views = if redeemers.is_some() {
            language_views
        } else {
            None
        };

        Some(ScriptData {
            redeemers,
            datums,
            language_views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExUnits, Redeemer, RedeemerTag};
    use crate::{BigInt, Int};

    fn sample_redeemers() -> Redeemers {
        Redeemers::List(vec![Redeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            data: PlutusData::Int(BigInt::Int(Int::from(42))),
            ex_units: ExUnits { mem: 1, steps: 2 },
        }])
    }

    #[test]
    fn datum_only_hash_brackets_with_empty_maps() {
        let datums: NonEmptySet<KeepRaw<PlutusData>> =
            vec![KeepRaw::from(PlutusData::Int(BigInt::Int(Int::from(1))))]
                .try_into()
                .unwrap();

        let script_data = ScriptData {
            redeemers: None,
            datums: Some(KeepRaw::from(datums.clone())),
            language_views: None,
        };

        // a0 || datums || a0
        let mut expected = vec![0xa0];
        minicbor::encode(&datums, &mut expected).unwrap();
        expected.push(0xa0);

        assert_eq!(
            script_data.hash(),
            thetis_crypto::hash::Hasher::<256>::hash(&expected)
        );
    }

    #[test]
    fn hash_tracks_redeemer_changes() {
        let base = ScriptData {
            redeemers: Some(KeepRaw::from(sample_redeemers())),
            datums: None,
            language_views: None,
        };

        let mut changed_redeemers = sample_redeemers();
        changed_redeemers.set_ex_units(RedeemerTag::Spend, 0, ExUnits { mem: 9, steps: 9 });

        let changed = ScriptData {
            redeemers: Some(KeepRaw::from(changed_redeemers)),
            datums: None,
            language_views: None,
        };

        assert_ne!(base.hash(), changed.hash());
    }

    #[test]
    fn v1_views_keep_the_bytestring_key_quirk() {
        let views: LanguageViews = [(0u8, vec![1i64, 2, 3])].into_iter().collect();
        let bytes = minicbor::to_vec(&views).unwrap();

        // {0x4100: <double-serialized indefinite list>}
        assert_eq!(hex::encode(&bytes), "a14100459f010203ff");
    }
}
