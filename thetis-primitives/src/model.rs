//! Transaction model and cbor codec
//!
//! The structures here mirror the Conway CDDL one to one. Wherever a hash or
//! signature may be computed over a substructure, the substructure is held in
//! a [KeepRaw] so the bytes it was decoded from survive a round-trip.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use thetis_codec::codec_by_datatype;
use thetis_codec::minicbor::{self, data::Tag, Decode, Encode};

use crate::{
    AddrKeyhash, AssetName, Bytes, Coin, CommitteeColdCredential, CommitteeHotCredential,
    CostModel, DRepCredential, Epoch, ExUnitPrices, GenesisDelegateHash, Genesishash, Hash,
    KeepRaw, Metadata, NetworkId, NonEmptySet, NonZeroInt, Nullable, PlutusData, PlutusScript,
    PolicyId, PoolKeyhash, PoolMetadata, PositiveCoin, RationalNumber, Relay, RewardAccount,
    ScriptHash, Set, StakeCredential, TransactionInput, UnitInterval, VrfKeyhash,
};
pub use crate::ExUnits;

pub type Multiasset<A> = BTreeMap<PolicyId, BTreeMap<AssetName, A>>;

pub type Mint = Multiasset<NonZeroInt>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Value {
    Coin(Coin),
    Multiasset(Coin, Multiasset<PositiveCoin>),
}

codec_by_datatype! {
    Value,
    U8 | U16 | U32 | U64 => Coin,
    (coin, assets => Multiasset)
}

impl Value {
    pub fn coin(&self) -> Coin {
        match self {
            Value::Coin(x) => *x,
            Value::Multiasset(x, _) => *x,
        }
    }

    pub fn assets(&self) -> Option<&Multiasset<PositiveCoin>> {
        match self {
            Value::Coin(_) => None,
            Value::Multiasset(_, x) => Some(x),
        }
    }
}

pub type Withdrawals = BTreeMap<RewardAccount, Coin>;

pub type RequiredSigners = NonEmptySet<AddrKeyhash>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub enum Certificate {
    StakeRegistration(StakeCredential),
    StakeDeregistration(StakeCredential),
    StakeDelegation(StakeCredential, PoolKeyhash),
    PoolRegistration {
        operator: PoolKeyhash,
        vrf_keyhash: VrfKeyhash,
        pledge: Coin,
        cost: Coin,
        margin: UnitInterval,
        reward_account: RewardAccount,
        pool_owners: Set<AddrKeyhash>,
        relays: Vec<Relay>,
        pool_metadata: Option<PoolMetadata>,
    },
    PoolRetirement(PoolKeyhash, Epoch),
    GenesisKeyDelegation(Genesishash, GenesisDelegateHash, VrfKeyhash),
    MoveInstantaneousRewardsCert(MoveInstantaneousReward),

    Reg(StakeCredential, Coin),
    UnReg(StakeCredential, Coin),
    VoteDeleg(StakeCredential, DRep),
    StakeVoteDeleg(StakeCredential, PoolKeyhash, DRep),
    StakeRegDeleg(StakeCredential, PoolKeyhash, Coin),
    VoteRegDeleg(StakeCredential, DRep, Coin),
    StakeVoteRegDeleg(StakeCredential, PoolKeyhash, DRep, Coin),

    AuthCommitteeHot(CommitteeColdCredential, CommitteeHotCredential),
    ResignCommitteeCold(CommitteeColdCredential, Option<Anchor>),
    RegDRepCert(DRepCredential, Coin, Option<Anchor>),
    UnRegDRepCert(DRepCredential, Coin),
    UpdateDRepCert(DRepCredential, Option<Anchor>),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for Certificate {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(Certificate::StakeRegistration(d.decode_with(ctx)?)),
            1 => Ok(Certificate::StakeDeregistration(d.decode_with(ctx)?)),
            2 => Ok(Certificate::StakeDelegation(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            3 => Ok(Certificate::PoolRegistration {
                operator: d.decode_with(ctx)?,
                vrf_keyhash: d.decode_with(ctx)?,
                pledge: d.decode_with(ctx)?,
                cost: d.decode_with(ctx)?,
                margin: d.decode_with(ctx)?,
                reward_account: d.decode_with(ctx)?,
                pool_owners: d.decode_with(ctx)?,
                relays: d.decode_with(ctx)?,
                pool_metadata: d.decode_with(ctx)?,
            }),
            4 => Ok(Certificate::PoolRetirement(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            5 => Ok(Certificate::GenesisKeyDelegation(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            6 => Ok(Certificate::MoveInstantaneousRewardsCert(
                d.decode_with(ctx)?,
            )),
            7 => Ok(Certificate::Reg(d.decode_with(ctx)?, d.decode_with(ctx)?)),
            8 => Ok(Certificate::UnReg(d.decode_with(ctx)?, d.decode_with(ctx)?)),
            9 => Ok(Certificate::VoteDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            10 => Ok(Certificate::StakeVoteDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            11 => Ok(Certificate::StakeRegDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            12 => Ok(Certificate::VoteRegDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            13 => Ok(Certificate::StakeVoteRegDeleg(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            14 => Ok(Certificate::AuthCommitteeHot(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            15 => Ok(Certificate::ResignCommitteeCold(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            16 => Ok(Certificate::RegDRepCert(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            17 => Ok(Certificate::UnRegDRepCert(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            18 => Ok(Certificate::UpdateDRepCert(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for Certificate",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for Certificate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Certificate::StakeRegistration(a) => {
                e.array(2)?;
                e.u16(0)?;
                e.encode_with(a, ctx)?;
            }
            Certificate::StakeDeregistration(a) => {
                e.array(2)?;
                e.u16(1)?;
                e.encode_with(a, ctx)?;
            }
            Certificate::StakeDelegation(a, b) => {
                e.array(3)?;
                e.u16(2)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::PoolRegistration {
                operator,
                vrf_keyhash,
                pledge,
                cost,
                margin,
                reward_account,
                pool_owners,
                relays,
                pool_metadata,
            } => {
                e.array(10)?;
                e.u16(3)?;
                e.encode_with(operator, ctx)?;
                e.encode_with(vrf_keyhash, ctx)?;
                e.encode_with(pledge, ctx)?;
                e.encode_with(cost, ctx)?;
                e.encode_with(margin, ctx)?;
                e.encode_with(reward_account, ctx)?;
                e.encode_with(pool_owners, ctx)?;
                e.encode_with(relays, ctx)?;
                e.encode_with(pool_metadata, ctx)?;
            }
            Certificate::PoolRetirement(a, b) => {
                e.array(3)?;
                e.u16(4)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::GenesisKeyDelegation(a, b, c) => {
                e.array(4)?;
                e.u16(5)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            Certificate::MoveInstantaneousRewardsCert(a) => {
                e.array(2)?;
                e.u16(6)?;
                e.encode_with(a, ctx)?;
            }
            Certificate::Reg(a, b) => {
                e.array(3)?;
                e.u16(7)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::UnReg(a, b) => {
                e.array(3)?;
                e.u16(8)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::VoteDeleg(a, b) => {
                e.array(3)?;
                e.u16(9)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::StakeVoteDeleg(a, b, c) => {
                e.array(4)?;
                e.u16(10)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            Certificate::StakeRegDeleg(a, b, c) => {
                e.array(4)?;
                e.u16(11)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            Certificate::VoteRegDeleg(a, b, c) => {
                e.array(4)?;
                e.u16(12)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            Certificate::StakeVoteRegDeleg(a, b, c, d) => {
                e.array(5)?;
                e.u16(13)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
                e.encode_with(d, ctx)?;
            }
            Certificate::AuthCommitteeHot(a, b) => {
                e.array(3)?;
                e.u16(14)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::ResignCommitteeCold(a, b) => {
                e.array(3)?;
                e.u16(15)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::RegDRepCert(a, b, c) => {
                e.array(4)?;
                e.u16(16)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            Certificate::UnRegDRepCert(a, b) => {
                e.array(3)?;
                e.u16(17)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            Certificate::UpdateDRepCert(a, b) => {
                e.array(3)?;
                e.u16(18)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum InstantaneousRewardSource {
    Reserves,
    Treasury,
}

impl<'b, C> minicbor::decode::Decode<'b, C> for InstantaneousRewardSource {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _ctx: &mut C,
    ) -> Result<Self, minicbor::decode::Error> {
        let variant = d.u32()?;

        match variant {
            0 => Ok(Self::Reserves),
            1 => Ok(Self::Treasury),
            _ => Err(minicbor::decode::Error::message("invalid funds variant")),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for InstantaneousRewardSource {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let variant = match self {
            Self::Reserves => 0,
            Self::Treasury => 1,
        };

        e.u32(variant)?;

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub enum InstantaneousRewardTarget {
    StakeCredentials(crate::KeyValuePairs<StakeCredential, i64>),
    OtherAccountingPot(Coin),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for InstantaneousRewardTarget {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let datatype = d.datatype()?;

        match datatype {
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                Ok(Self::StakeCredentials(d.decode_with(ctx)?))
            }
            _ => Ok(Self::OtherAccountingPot(d.decode_with(ctx)?)),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for InstantaneousRewardTarget {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            InstantaneousRewardTarget::StakeCredentials(a) => {
                e.encode_with(a, ctx)?;
            }
            InstantaneousRewardTarget::OtherAccountingPot(a) => {
                e.encode_with(a, ctx)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Clone)]
pub struct MoveInstantaneousReward {
    #[n(0)]
    pub source: InstantaneousRewardSource,

    #[n(1)]
    pub target: InstantaneousRewardTarget,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub enum DRep {
    Key(AddrKeyhash),
    Script(ScriptHash),
    Abstain,
    NoConfidence,
}

impl<'b, C> minicbor::decode::Decode<'b, C> for DRep {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(DRep::Key(d.decode_with(ctx)?)),
            1 => Ok(DRep::Script(d.decode_with(ctx)?)),
            2 => Ok(DRep::Abstain),
            3 => Ok(DRep::NoConfidence),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for DRep",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for DRep {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            DRep::Key(x) => {
                e.array(2)?;
                e.u16(0)?;
                e.encode_with(x, ctx)?;
            }
            DRep::Script(x) => {
                e.array(2)?;
                e.u16(1)?;
                e.encode_with(x, ctx)?;
            }
            DRep::Abstain => {
                e.array(1)?;
                e.u16(2)?;
            }
            DRep::NoConfidence => {
                e.array(1)?;
                e.u16(3)?;
            }
        }

        Ok(())
    }
}

#[derive(
    Serialize,
    Deserialize,
    Encode,
    Decode,
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    std::hash::Hash,
)]
#[cbor(index_only)]
pub enum Language {
    #[n(0)]
    PlutusV1,

    #[n(1)]
    PlutusV2,

    #[n(2)]
    PlutusV3,
}

#[derive(Serialize, Deserialize, Encode, Debug, PartialEq, Eq, Clone, Default)]
#[cbor(map)]
pub struct CostModels {
    #[n(0)]
    pub plutus_v1: Option<CostModel>,

    #[n(1)]
    pub plutus_v2: Option<CostModel>,

    #[n(2)]
    pub plutus_v3: Option<CostModel>,

    #[cbor(skip)]
    pub unknown: BTreeMap<u64, CostModel>,
}

impl<'b, C> minicbor::Decode<'b, C> for CostModels {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        let models: BTreeMap<u64, CostModel> = d.decode_with(ctx)?;

        let mut out = Self::default();

        for (k, v) in models {
            match k {
                0 => out.plutus_v1 = Some(v),
                1 => out.plutus_v2 = Some(v),
                2 => out.plutus_v3 = Some(v),
                _ => {
                    out.unknown.insert(k, v);
                }
            }
        }

        Ok(out)
    }
}

impl CostModels {
    pub fn for_language(&self, language: Language) -> Option<&CostModel> {
        match language {
            Language::PlutusV1 => self.plutus_v1.as_ref(),
            Language::PlutusV2 => self.plutus_v2.as_ref(),
            Language::PlutusV3 => self.plutus_v3.as_ref(),
        }
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, Default)]
#[cbor(map)]
pub struct ProtocolParamUpdate {
    #[n(0)]
    pub minfee_a: Option<u64>,
    #[n(1)]
    pub minfee_b: Option<u64>,
    #[n(2)]
    pub max_block_body_size: Option<u64>,
    #[n(3)]
    pub max_transaction_size: Option<u64>,
    #[n(4)]
    pub max_block_header_size: Option<u64>,
    #[n(5)]
    pub key_deposit: Option<Coin>,
    #[n(6)]
    pub pool_deposit: Option<Coin>,
    #[n(7)]
    pub maximum_epoch: Option<Epoch>,
    #[n(8)]
    pub desired_number_of_stake_pools: Option<u64>,
    #[n(9)]
    pub pool_pledge_influence: Option<RationalNumber>,
    #[n(10)]
    pub expansion_rate: Option<UnitInterval>,
    #[n(11)]
    pub treasury_growth_rate: Option<UnitInterval>,

    #[n(16)]
    pub min_pool_cost: Option<Coin>,
    #[n(17)]
    pub ada_per_utxo_byte: Option<Coin>,
    #[n(18)]
    pub cost_models_for_script_languages: Option<CostModels>,
    #[n(19)]
    pub execution_costs: Option<ExUnitPrices>,
    #[n(20)]
    pub max_tx_ex_units: Option<ExUnits>,
    #[n(21)]
    pub max_block_ex_units: Option<ExUnits>,
    #[n(22)]
    pub max_value_size: Option<u64>,
    #[n(23)]
    pub collateral_percentage: Option<u64>,
    #[n(24)]
    pub max_collateral_inputs: Option<u64>,

    #[n(25)]
    pub pool_voting_thresholds: Option<PoolVotingThresholds>,
    #[n(26)]
    pub drep_voting_thresholds: Option<DRepVotingThresholds>,
    #[n(27)]
    pub min_committee_size: Option<u64>,
    #[n(28)]
    pub committee_term_limit: Option<Epoch>,
    #[n(29)]
    pub governance_action_validity_period: Option<Epoch>,
    #[n(30)]
    pub governance_action_deposit: Option<Coin>,
    #[n(31)]
    pub drep_deposit: Option<Coin>,
    #[n(32)]
    pub drep_inactivity_period: Option<Epoch>,
    #[n(33)]
    pub minfee_refscript_cost_per_byte: Option<UnitInterval>,
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PoolVotingThresholds {
    #[n(0)]
    pub motion_no_confidence: UnitInterval,
    #[n(1)]
    pub committee_normal: UnitInterval,
    #[n(2)]
    pub committee_no_confidence: UnitInterval,
    #[n(3)]
    pub hard_fork_initiation: UnitInterval,
    #[n(4)]
    pub security_voting_threshold: UnitInterval,
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct DRepVotingThresholds {
    #[n(0)]
    pub motion_no_confidence: UnitInterval,
    #[n(1)]
    pub committee_normal: UnitInterval,
    #[n(2)]
    pub committee_no_confidence: UnitInterval,
    #[n(3)]
    pub update_constitution: UnitInterval,
    #[n(4)]
    pub hard_fork_initiation: UnitInterval,
    #[n(5)]
    pub pp_network_group: UnitInterval,
    #[n(6)]
    pub pp_economic_group: UnitInterval,
    #[n(7)]
    pub pp_technical_group: UnitInterval,
    #[n(8)]
    pub pp_governance_group: UnitInterval,
    #[n(9)]
    pub treasury_withdrawal: UnitInterval,
}

#[derive(Encode, Decode, Debug, PartialEq, Clone, Default)]
#[cbor(map)]
pub struct TransactionBody<'b> {
    #[n(0)]
    pub inputs: Set<TransactionInput>,

    #[b(1)]
    pub outputs: Vec<TransactionOutput<'b>>,

    #[n(2)]
    pub fee: Coin,

    #[n(3)]
    pub ttl: Option<u64>,

    #[n(4)]
    pub certificates: Option<NonEmptySet<Certificate>>,

    #[n(5)]
    pub withdrawals: Option<Withdrawals>,

    #[n(7)]
    pub auxiliary_data_hash: Option<Hash<32>>,

    #[n(8)]
    pub validity_interval_start: Option<u64>,

    #[n(9)]
    pub mint: Option<Mint>,

    #[n(11)]
    pub script_data_hash: Option<Hash<32>>,

    #[n(13)]
    pub collateral: Option<NonEmptySet<TransactionInput>>,

    #[n(14)]
    pub required_signers: Option<RequiredSigners>,

    #[n(15)]
    pub network_id: Option<NetworkId>,

    #[b(16)]
    pub collateral_return: Option<TransactionOutput<'b>>,

    #[n(17)]
    pub total_collateral: Option<Coin>,

    #[n(18)]
    pub reference_inputs: Option<NonEmptySet<TransactionInput>>,

    #[n(19)]
    pub voting_procedures: Option<VotingProcedures>,

    #[n(20)]
    pub proposal_procedures: Option<NonEmptySet<ProposalProcedure>>,

    #[n(21)]
    pub treasury_value: Option<Coin>,

    #[n(22)]
    pub donation: Option<PositiveCoin>,
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[cbor(index_only)]
pub enum Vote {
    #[n(0)]
    No,
    #[n(1)]
    Yes,
    #[n(2)]
    Abstain,
}

pub type VotingProcedures = BTreeMap<Voter, BTreeMap<GovActionId, VotingProcedure>>;

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct VotingProcedure {
    #[n(0)]
    pub vote: Vote,
    #[n(1)]
    pub anchor: Option<Anchor>,
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ProposalProcedure {
    #[n(0)]
    pub deposit: Coin,
    #[n(1)]
    pub reward_account: RewardAccount,
    #[n(2)]
    pub gov_action: GovAction,
    #[n(3)]
    pub anchor: Anchor,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub enum GovAction {
    ParameterChange(
        Option<GovActionId>,
        Box<ProtocolParamUpdate>,
        Option<ScriptHash>,
    ),
    HardForkInitiation(Option<GovActionId>, crate::ProtocolVersion),
    TreasuryWithdrawals(BTreeMap<RewardAccount, Coin>, Option<ScriptHash>),
    NoConfidence(Option<GovActionId>),
    UpdateCommittee(
        Option<GovActionId>,
        Set<CommitteeColdCredential>,
        BTreeMap<CommitteeColdCredential, Epoch>,
        UnitInterval,
    ),
    NewConstitution(Option<GovActionId>, Constitution),
    Information,
}

impl<'b, C> minicbor::decode::Decode<'b, C> for GovAction {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(GovAction::ParameterChange(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            1 => Ok(GovAction::HardForkInitiation(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            2 => Ok(GovAction::TreasuryWithdrawals(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            3 => Ok(GovAction::NoConfidence(d.decode_with(ctx)?)),
            4 => Ok(GovAction::UpdateCommittee(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            5 => Ok(GovAction::NewConstitution(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            6 => Ok(GovAction::Information),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for GovAction",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for GovAction {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            GovAction::ParameterChange(a, b, c) => {
                e.array(4)?;
                e.u16(0)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
            }
            GovAction::HardForkInitiation(a, b) => {
                e.array(3)?;
                e.u16(1)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            GovAction::TreasuryWithdrawals(a, b) => {
                e.array(3)?;
                e.u16(2)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            GovAction::NoConfidence(a) => {
                e.array(2)?;
                e.u16(3)?;
                e.encode_with(a, ctx)?;
            }
            GovAction::UpdateCommittee(a, b, c, d) => {
                e.array(5)?;
                e.u16(4)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
                e.encode_with(c, ctx)?;
                e.encode_with(d, ctx)?;
            }
            GovAction::NewConstitution(a, b) => {
                e.array(3)?;
                e.u16(5)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            GovAction::Information => {
                e.array(1)?;
                e.u16(6)?;
            }
        }

        Ok(())
    }
}

/// A link to off-chain metadata plus the hash of its content
#[derive(
    Encode, Decode, Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone,
)]
pub struct Anchor {
    #[n(0)]
    pub url: String,

    #[n(1)]
    pub content_hash: Hash<32>,
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Constitution {
    #[n(0)]
    pub anchor: Anchor,
    #[n(1)]
    pub guardrail_script: Option<ScriptHash>,
}

/// Ordering is derived from the declaration order, which the ledger relies
/// on for maps keyed by voter, so do not reorder the variants.
#[derive(Serialize, Deserialize, Debug, PartialEq, PartialOrd, Eq, Ord, Clone)]
pub enum Voter {
    ConstitutionalCommitteeScript(ScriptHash),
    ConstitutionalCommitteeKey(AddrKeyhash),
    DRepScript(ScriptHash),
    DRepKey(AddrKeyhash),
    StakePoolKey(AddrKeyhash),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for Voter {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u16()?;

        match variant {
            0 => Ok(Voter::ConstitutionalCommitteeKey(d.decode_with(ctx)?)),
            1 => Ok(Voter::ConstitutionalCommitteeScript(d.decode_with(ctx)?)),
            2 => Ok(Voter::DRepKey(d.decode_with(ctx)?)),
            3 => Ok(Voter::DRepScript(d.decode_with(ctx)?)),
            4 => Ok(Voter::StakePoolKey(d.decode_with(ctx)?)),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for Voter",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for Voter {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;

        match self {
            Voter::ConstitutionalCommitteeKey(x) => {
                e.u16(0)?;
                e.encode_with(x, ctx)?;
            }
            Voter::ConstitutionalCommitteeScript(x) => {
                e.u16(1)?;
                e.encode_with(x, ctx)?;
            }
            Voter::DRepKey(x) => {
                e.u16(2)?;
                e.encode_with(x, ctx)?;
            }
            Voter::DRepScript(x) => {
                e.u16(3)?;
                e.encode_with(x, ctx)?;
            }
            Voter::StakePoolKey(x) => {
                e.u16(4)?;
                e.encode_with(x, ctx)?;
            }
        }

        Ok(())
    }
}

#[derive(Encode, Decode, Serialize, Deserialize, Debug, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct GovActionId {
    #[n(0)]
    pub transaction_id: Hash<32>,

    #[n(1)]
    pub action_index: u32,
}

/// Output in the original Shelley framing: a positional array
#[derive(Encode, Decode, Debug, PartialEq, Clone)]
pub struct LegacyTransactionOutput {
    #[n(0)]
    pub address: Bytes,

    #[n(1)]
    pub amount: Value,

    #[n(2)]
    pub datum_hash: Option<Hash<32>>,
}

/// Output in the post-Alonzo framing: a sparse map
#[derive(Encode, Decode, Debug, PartialEq, Clone)]
#[cbor(map)]
pub struct PostAlonzoTransactionOutput<'b> {
    #[n(0)]
    pub address: Bytes,

    #[n(1)]
    pub value: Value,

    #[b(2)]
    pub datum_option: Option<DatumOption<'b>>,

    #[b(3)]
    pub script_ref: Option<thetis_codec::utils::CborWrap<Script<'b>>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TransactionOutput<'b> {
    Legacy(LegacyTransactionOutput),
    PostAlonzo(PostAlonzoTransactionOutput<'b>),
}

impl<'b, C> minicbor::Decode<'b, C> for TransactionOutput<'b> {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                Ok(Self::Legacy(d.decode_with(ctx)?))
            }
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                Ok(Self::PostAlonzo(d.decode_with(ctx)?))
            }
            _ => Err(minicbor::decode::Error::message(
                "unexpected cbor data type for TransactionOutput",
            )),
        }
    }
}

impl<C> minicbor::Encode<C> for TransactionOutput<'_> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            Self::Legacy(x) => e.encode_with(x, ctx)?,
            Self::PostAlonzo(x) => e.encode_with(x, ctx)?,
        };

        Ok(())
    }
}

impl<'b> TransactionOutput<'b> {
    pub fn address(&self) -> &Bytes {
        match self {
            TransactionOutput::Legacy(x) => &x.address,
            TransactionOutput::PostAlonzo(x) => &x.address,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            TransactionOutput::Legacy(x) => &x.amount,
            TransactionOutput::PostAlonzo(x) => &x.value,
        }
    }

    pub fn script_ref(&self) -> Option<&Script<'b>> {
        match self {
            TransactionOutput::Legacy(_) => None,
            TransactionOutput::PostAlonzo(x) => x.script_ref.as_ref().map(|x| &x.0),
        }
    }

    pub fn datum_option(&self) -> Option<&DatumOption<'b>> {
        match self {
            TransactionOutput::Legacy(_) => None,
            TransactionOutput::PostAlonzo(x) => x.datum_option.as_ref(),
        }
    }
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct VKeyWitness {
    #[n(0)]
    pub vkey: Bytes,

    #[n(1)]
    pub signature: Bytes,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone)]
pub struct BootstrapWitness {
    #[n(0)]
    pub public_key: Bytes,

    #[n(1)]
    pub signature: Bytes,

    #[n(2)]
    pub chain_code: Bytes,

    #[n(3)]
    pub attributes: Bytes,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum NativeScript {
    ScriptPubkey(AddrKeyhash),
    ScriptAll(Vec<NativeScript>),
    ScriptAny(Vec<NativeScript>),
    ScriptNOfK(u32, Vec<NativeScript>),
    InvalidBefore(u64),
    InvalidHereafter(u64),
}

impl<'b, C> minicbor::decode::Decode<'b, C> for NativeScript {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;
        let variant = d.u32()?;

        match variant {
            0 => Ok(NativeScript::ScriptPubkey(d.decode_with(ctx)?)),
            1 => Ok(NativeScript::ScriptAll(d.decode_with(ctx)?)),
            2 => Ok(NativeScript::ScriptAny(d.decode_with(ctx)?)),
            3 => Ok(NativeScript::ScriptNOfK(
                d.decode_with(ctx)?,
                d.decode_with(ctx)?,
            )),
            4 => Ok(NativeScript::InvalidBefore(d.decode_with(ctx)?)),
            5 => Ok(NativeScript::InvalidHereafter(d.decode_with(ctx)?)),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for NativeScript",
            )),
        }
    }
}

impl<C> minicbor::encode::Encode<C> for NativeScript {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            NativeScript::ScriptPubkey(v) => {
                e.array(2)?;
                e.encode_with(0, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::ScriptAll(v) => {
                e.array(2)?;
                e.encode_with(1, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::ScriptAny(v) => {
                e.array(2)?;
                e.encode_with(2, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::ScriptNOfK(a, b) => {
                e.array(3)?;
                e.encode_with(3, ctx)?;
                e.encode_with(a, ctx)?;
                e.encode_with(b, ctx)?;
            }
            NativeScript::InvalidBefore(v) => {
                e.array(2)?;
                e.encode_with(4, ctx)?;
                e.encode_with(v, ctx)?;
            }
            NativeScript::InvalidHereafter(v) => {
                e.array(2)?;
                e.encode_with(5, ctx)?;
                e.encode_with(v, ctx)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DatumOption<'b> {
    Hash(Hash<32>),
    Data(thetis_codec::utils::CborWrap<KeepRaw<'b, PlutusData>>),
}

impl<'b, C> minicbor::Decode<'b, C> for DatumOption<'b> {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;

        match d.u8()? {
            0 => Ok(Self::Hash(d.decode_with(ctx)?)),
            1 => Ok(Self::Data(d.decode_with(ctx)?)),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for DatumOption",
            )),
        }
    }
}

impl<C> minicbor::Encode<C> for DatumOption<'_> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;

        match self {
            Self::Hash(x) => {
                e.encode_with(0, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::Data(x) => {
                e.encode_with(1, ctx)?;
                e.encode_with(x, ctx)?;
            }
        }

        Ok(())
    }
}

/// A script of any language, tagged with which language it is
#[derive(Debug, PartialEq, Clone)]
pub enum Script<'b> {
    Native(KeepRaw<'b, NativeScript>),
    PlutusV1(PlutusScript<1>),
    PlutusV2(PlutusScript<2>),
    PlutusV3(PlutusScript<3>),
}

impl Script<'_> {
    pub fn language(&self) -> Option<Language> {
        match self {
            Script::Native(_) => None,
            Script::PlutusV1(_) => Some(Language::PlutusV1),
            Script::PlutusV2(_) => Some(Language::PlutusV2),
            Script::PlutusV3(_) => Some(Language::PlutusV3),
        }
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Script<'b> {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        d.array()?;

        match d.u8()? {
            0 => Ok(Self::Native(d.decode_with(ctx)?)),
            1 => Ok(Self::PlutusV1(d.decode_with(ctx)?)),
            2 => Ok(Self::PlutusV2(d.decode_with(ctx)?)),
            3 => Ok(Self::PlutusV3(d.decode_with(ctx)?)),
            _ => Err(minicbor::decode::Error::message(
                "invalid variant id for Script",
            )),
        }
    }
}

impl<C> minicbor::Encode<C> for Script<'_> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?;

        match self {
            Self::Native(x) => {
                e.encode_with(0, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::PlutusV1(x) => {
                e.encode_with(1, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::PlutusV2(x) => {
                e.encode_with(2, ctx)?;
                e.encode_with(x, ctx)?;
            }
            Self::PlutusV3(x) => {
                e.encode_with(3, ctx)?;
                e.encode_with(x, ctx)?;
            }
        }

        Ok(())
    }
}

#[derive(
    Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord,
)]
#[cbor(index_only)]
pub enum RedeemerTag {
    #[n(0)]
    Spend,
    #[n(1)]
    Mint,
    #[n(2)]
    Cert,
    #[n(3)]
    Reward,
    #[n(4)]
    Vote,
    #[n(5)]
    Propose,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Clone)]
pub struct Redeemer {
    #[n(0)]
    pub tag: RedeemerTag,

    #[n(1)]
    pub index: u32,

    #[n(2)]
    pub data: PlutusData,

    #[n(3)]
    pub ex_units: ExUnits,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct RedeemersKey {
    #[n(0)]
    pub tag: RedeemerTag,
    #[n(1)]
    pub index: u32,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Clone)]
pub struct RedeemersValue {
    #[n(0)]
    pub data: PlutusData,
    #[n(1)]
    pub ex_units: ExUnits,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Redeemers {
    List(Vec<Redeemer>),
    Map(BTreeMap<RedeemersKey, RedeemersValue>),
}

codec_by_datatype! {
    Redeemers,
    Array | ArrayIndef => List,
    Map | MapIndef => Map,
    ()
}

impl From<BTreeMap<RedeemersKey, RedeemersValue>> for Redeemers {
    fn from(value: BTreeMap<RedeemersKey, RedeemersValue>) -> Self {
        Redeemers::Map(value)
    }
}

impl Redeemers {
    pub fn len(&self) -> usize {
        match self {
            Redeemers::List(x) => x.len(),
            Redeemers::Map(x) => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the execution units over every redeemer
    pub fn total_ex_units(&self) -> ExUnits {
        let mut total = ExUnits::default();

        let mut add = |x: &ExUnits| {
            total.mem += x.mem;
            total.steps += x.steps;
        };

        match self {
            Redeemers::List(xs) => xs.iter().for_each(|x| add(&x.ex_units)),
            Redeemers::Map(xs) => xs.values().for_each(|x| add(&x.ex_units)),
        }

        total
    }

    /// True when some redeemer still carries zeroed execution units
    pub fn any_zero_ex_units(&self) -> bool {
        let is_zero = |x: &ExUnits| x.mem == 0 && x.steps == 0;

        match self {
            Redeemers::List(xs) => xs.iter().any(|x| is_zero(&x.ex_units)),
            Redeemers::Map(xs) => xs.values().any(|x| is_zero(&x.ex_units)),
        }
    }

    /// Replaces the execution units of the redeemer at (tag, index); returns
    /// false when no such redeemer exists
    pub fn set_ex_units(&mut self, tag: RedeemerTag, index: u32, ex_units: ExUnits) -> bool {
        match self {
            Redeemers::List(xs) => {
                for x in xs.iter_mut() {
                    if x.tag == tag && x.index == index {
                        x.ex_units = ex_units;
                        return true;
                    }
                }

                false
            }
            Redeemers::Map(xs) => {
                if let Some(value) = xs.get_mut(&RedeemersKey { tag, index }) {
                    value.ex_units = ex_units;
                    return true;
                }

                false
            }
        }
    }
}

#[derive(Encode, Decode, Debug, PartialEq, Clone, Default)]
#[cbor(map)]
pub struct WitnessSet<'b> {
    #[n(0)]
    pub vkeywitness: Option<NonEmptySet<VKeyWitness>>,

    #[b(1)]
    pub native_script: Option<NonEmptySet<KeepRaw<'b, NativeScript>>>,

    #[n(2)]
    pub bootstrap_witness: Option<NonEmptySet<BootstrapWitness>>,

    #[n(3)]
    pub plutus_v1_script: Option<NonEmptySet<PlutusScript<1>>>,

    #[b(4)]
    pub plutus_data: Option<KeepRaw<'b, NonEmptySet<KeepRaw<'b, PlutusData>>>>,

    #[b(5)]
    pub redeemer: Option<KeepRaw<'b, Redeemers>>,

    #[n(6)]
    pub plutus_v2_script: Option<NonEmptySet<PlutusScript<2>>>,

    #[n(7)]
    pub plutus_v3_script: Option<NonEmptySet<PlutusScript<3>>>,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, PartialEq, Clone)]
#[cbor(map)]
pub struct PostAlonzoAuxiliaryData {
    #[n(0)]
    pub metadata: Option<Metadata>,

    #[n(1)]
    pub native_scripts: Option<Vec<NativeScript>>,

    #[n(2)]
    pub plutus_v1_scripts: Option<Vec<PlutusScript<1>>>,

    #[n(3)]
    pub plutus_v2_scripts: Option<Vec<PlutusScript<2>>>,

    #[n(4)]
    pub plutus_v3_scripts: Option<Vec<PlutusScript<3>>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub enum AuxiliaryData {
    Shelley(Metadata),
    ShelleyMa {
        transaction_metadata: Metadata,
        auxiliary_scripts: Option<Vec<NativeScript>>,
    },
    PostAlonzo(PostAlonzoAuxiliaryData),
}

impl<'b, C> minicbor::Decode<'b, C> for AuxiliaryData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        match d.datatype()? {
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                Ok(AuxiliaryData::Shelley(d.decode_with(ctx)?))
            }
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                let len = d.array()?;
                let transaction_metadata = d.decode_with(ctx)?;

                let auxiliary_scripts = match len {
                    Some(1) => None,
                    _ => Some(d.decode_with(ctx)?),
                };

                Ok(AuxiliaryData::ShelleyMa {
                    transaction_metadata,
                    auxiliary_scripts,
                })
            }
            minicbor::data::Type::Tag => {
                let tag = d.tag()?;

                if tag != Tag::new(259) {
                    return Err(minicbor::decode::Error::message(
                        "unknown tag for auxiliary data",
                    ));
                }

                Ok(AuxiliaryData::PostAlonzo(d.decode_with(ctx)?))
            }
            _ => Err(minicbor::decode::Error::message(
                "unknown data type for auxiliary data",
            )),
        }
    }
}

impl<C> minicbor::Encode<C> for AuxiliaryData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self {
            AuxiliaryData::Shelley(m) => {
                e.encode_with(m, ctx)?;
            }
            AuxiliaryData::ShelleyMa {
                transaction_metadata,
                auxiliary_scripts,
            } => match auxiliary_scripts {
                Some(scripts) => {
                    e.array(2)?;
                    e.encode_with(transaction_metadata, ctx)?;
                    e.encode_with(scripts, ctx)?;
                }
                None => {
                    e.array(1)?;
                    e.encode_with(transaction_metadata, ctx)?;
                }
            },
            AuxiliaryData::PostAlonzo(aux) => {
                e.tag(Tag::new(259))?;
                e.encode_with(aux, ctx)?;
            }
        }

        Ok(())
    }
}

/// A transaction as it travels on the wire
///
/// Body, witness set and auxiliary data each keep the cbor bytes they were
/// decoded from, so hashes computed over them match what exists on-chain.
#[derive(Encode, Decode, Debug, PartialEq, Clone)]
pub struct Tx<'b> {
    #[b(0)]
    pub transaction_body: KeepRaw<'b, TransactionBody<'b>>,

    #[b(1)]
    pub transaction_witness_set: KeepRaw<'b, WitnessSet<'b>>,

    #[n(2)]
    pub success: bool,

    #[b(3)]
    pub auxiliary_data: Nullable<KeepRaw<'b, AuxiliaryData>>,
}

#[cfg(test)]
mod tests {
    use super::Tx;
    use thetis_codec::minicbor;

    #[test]
    fn tx_isomorphic_decoding_encoding() {
        let test_txs = [
            include_str!("../test_data/simple.tx"),
            // exercises certificates, withdrawals, mint, native scripts,
            // redeemers, bootstrap witnesses and proposals in one go
            include_str!("../test_data/kitchen_sink.tx"),
        ];

        for (idx, tx_str) in test_txs.iter().enumerate() {
            let bytes = hex::decode(tx_str.trim()).unwrap_or_else(|_| panic!("bad tx file {idx}"));

            let tx: Tx = minicbor::decode(&bytes)
                .unwrap_or_else(|e| panic!("error decoding cbor for file {idx}: {e:?}"));

            let bytes2 = minicbor::to_vec(&tx)
                .unwrap_or_else(|e| panic!("error encoding tx cbor for file {idx}: {e:?}"));

            assert!(bytes.eq(&bytes2), "re-encoded bytes didn't match original");
        }
    }

    #[test]
    fn built_certificates_roundtrip_canonically() {
        use super::*;
        use crate::{Credential, Hash, KeyValuePairs, RationalNumber};

        let key = |n: u8| Credential::KeyHash(Hash::from([n; 28]));
        let script = |n: u8| Credential::ScriptHash(Hash::from([n; 28]));
        let pool = |n: u8| Hash::<28>::from([n; 28]);

        let anchor = Anchor {
            url: String::from("https://example.com"),
            content_hash: Hash::from([5u8; 32]),
        };

        let certificates = vec![
            Certificate::StakeRegistration(key(1)),
            Certificate::StakeDeregistration(script(1)),
            Certificate::StakeDelegation(key(1), pool(2)),
            Certificate::PoolRegistration {
                operator: pool(2),
                vrf_keyhash: Hash::from([3u8; 32]),
                pledge: 10_000,
                cost: 1_000,
                margin: RationalNumber {
                    numerator: 1,
                    denominator: 5,
                },
                reward_account: vec![0xe1; 29].into(),
                pool_owners: Set::from(vec![pool(4)]),
                relays: vec![
                    Relay::SingleHostAddr(
                        Nullable::Some(3001),
                        Nullable::Some(vec![127, 0, 0, 1].into()),
                        Nullable::Null,
                    ),
                    Relay::SingleHostName(Nullable::Some(3001), String::from("example.com")),
                    Relay::MultiHostName(String::from("example.com")),
                ],
                pool_metadata: Some(PoolMetadata {
                    url: String::from("https://example.com"),
                    hash: Hash::from([6u8; 32]),
                }),
            },
            Certificate::PoolRetirement(pool(2), 500),
            Certificate::GenesisKeyDelegation(
                vec![7u8; 28].into(),
                vec![8u8; 28].into(),
                Hash::from([9u8; 32]),
            ),
            Certificate::MoveInstantaneousRewardsCert(MoveInstantaneousReward {
                source: InstantaneousRewardSource::Reserves,
                target: InstantaneousRewardTarget::StakeCredentials(KeyValuePairs::Def(vec![(
                    key(1),
                    5,
                )])),
            }),
            Certificate::MoveInstantaneousRewardsCert(MoveInstantaneousReward {
                source: InstantaneousRewardSource::Treasury,
                target: InstantaneousRewardTarget::OtherAccountingPot(42),
            }),
            Certificate::Reg(key(1), 2_000_000),
            Certificate::UnReg(key(1), 2_000_000),
            Certificate::VoteDeleg(key(1), DRep::Abstain),
            Certificate::StakeVoteDeleg(key(1), pool(2), DRep::Key(*key(3).as_hash())),
            Certificate::StakeRegDeleg(key(1), pool(2), 2_000_000),
            Certificate::VoteRegDeleg(key(1), DRep::NoConfidence, 2_000_000),
            Certificate::StakeVoteRegDeleg(key(1), pool(2), DRep::Script(*script(3).as_hash()), 2_000_000),
            Certificate::AuthCommitteeHot(key(1), key(2)),
            Certificate::ResignCommitteeCold(key(1), Some(anchor.clone())),
            Certificate::RegDRepCert(key(1), 500_000_000, None),
            Certificate::UnRegDRepCert(key(1), 500_000_000),
            Certificate::UpdateDRepCert(key(1), Some(anchor)),
        ];

        for cert in certificates {
            let bytes = minicbor::to_vec(&cert).unwrap();
            let decoded: Certificate = minicbor::decode(&bytes).unwrap();

            assert_eq!(decoded, cert);
            assert_eq!(minicbor::to_vec(&decoded).unwrap(), bytes);
        }
    }

    #[test]
    fn built_governance_actions_roundtrip_canonically() {
        use super::*;
        use crate::{Credential, Hash};

        let action_id = GovActionId {
            transaction_id: Hash::from([1u8; 32]),
            action_index: 0,
        };

        let anchor = Anchor {
            url: String::from("https://example.com"),
            content_hash: Hash::from([5u8; 32]),
        };

        let update = ProtocolParamUpdate {
            minfee_a: Some(44),
            minfee_b: Some(155381),
            ..Default::default()
        };

        let actions = vec![
            GovAction::ParameterChange(
                Some(action_id.clone()),
                Box::new(update),
                Some(Hash::from([2u8; 28])),
            ),
            GovAction::HardForkInitiation(None, (10, 0)),
            GovAction::TreasuryWithdrawals(
                [(crate::Bytes::from(vec![0xe1; 29]), 7u64)].into_iter().collect(),
                None,
            ),
            GovAction::NoConfidence(Some(action_id.clone())),
            GovAction::UpdateCommittee(
                None,
                Set::from(vec![Credential::KeyHash(Hash::from([3u8; 28]))]),
                [(Credential::KeyHash(Hash::from([4u8; 28])), 500u64)]
                    .into_iter()
                    .collect(),
                crate::RationalNumber {
                    numerator: 2,
                    denominator: 3,
                },
            ),
            GovAction::NewConstitution(
                None,
                Constitution {
                    anchor: anchor.clone(),
                    guardrail_script: None,
                },
            ),
            GovAction::Information,
        ];

        for action in actions {
            let proposal = ProposalProcedure {
                deposit: 100_000_000_000,
                reward_account: vec![0xe1; 29].into(),
                gov_action: action,
                anchor: anchor.clone(),
            };

            let bytes = minicbor::to_vec(&proposal).unwrap();
            let decoded: ProposalProcedure = minicbor::decode(&bytes).unwrap();

            assert_eq!(decoded, proposal);
            assert_eq!(minicbor::to_vec(&decoded).unwrap(), bytes);
        }
    }

    #[test]
    fn built_voting_procedures_roundtrip_canonically() {
        use super::*;
        use crate::Hash;
        use std::collections::BTreeMap;

        let voter = Voter::DRepKey(Hash::from([1u8; 28]));

        let ballot: BTreeMap<GovActionId, VotingProcedure> = [(
            GovActionId {
                transaction_id: Hash::from([2u8; 32]),
                action_index: 1,
            },
            VotingProcedure {
                vote: Vote::Yes,
                anchor: None,
            },
        )]
        .into_iter()
        .collect();

        let procedures: VotingProcedures = [(voter, ballot)].into_iter().collect();

        let bytes = minicbor::to_vec(&procedures).unwrap();
        let decoded: VotingProcedures = minicbor::decode(&bytes).unwrap();

        assert_eq!(decoded, procedures);
        assert_eq!(minicbor::to_vec(&decoded).unwrap(), bytes);
    }

    #[test]
    fn map_form_redeemers_roundtrip() {
        use super::*;
        use crate::{BigInt, Int, PlutusData};
        use std::collections::BTreeMap;

        let entries: BTreeMap<RedeemersKey, RedeemersValue> = [(
            RedeemersKey {
                tag: RedeemerTag::Spend,
                index: 0,
            },
            RedeemersValue {
                data: PlutusData::Int(BigInt::Int(Int::from(7))),
                ex_units: ExUnits { mem: 10, steps: 20 },
            },
        )]
        .into_iter()
        .collect();

        let redeemers = Redeemers::from(entries);

        let bytes = minicbor::to_vec(&redeemers).unwrap();
        assert_eq!(bytes[0], 0xa1);

        let decoded: Redeemers = minicbor::decode(&bytes).unwrap();
        assert_eq!(decoded, redeemers);
        assert_eq!(minicbor::to_vec(&decoded).unwrap(), bytes);
    }

    #[test]
    fn certificates_and_proposals_decode() {
        let bytes = hex::decode(include_str!("../test_data/kitchen_sink.tx").trim()).unwrap();
        let tx: Tx = minicbor::decode(&bytes).unwrap();

        let body = &tx.transaction_body;

        let certs = body.certificates.as_ref().unwrap();
        assert!(!certs.is_empty());

        assert!(body.withdrawals.is_some());
        assert!(body.mint.is_some());
        assert!(body.proposal_procedures.is_some());

        let witness = &tx.transaction_witness_set;
        assert!(witness.vkeywitness.is_some());
        assert!(witness.native_script.is_some());
        assert!(witness.bootstrap_witness.is_some());
        assert!(witness.redeemer.is_some());
    }
}
