//! Transaction balancing
//!
//! [Balancer] drives a draft transaction to a ledger-valid one: evaluate
//! scripts, select inputs, attach a change output, settle the fee and
//! re-check, looping until the books close exactly. Each round either grows
//! the fee toward its fixed point or shrinks the change toward zero, so the
//! round cap only ever trips on pathological parameter settings.

use tracing::{debug, trace};

use thetis_addresses::Address;
use thetis_codec::minicbor;
use thetis_primitives::hashes::ComputeHash;
use thetis_primitives::script_data::{LanguageViews, ScriptData};
use thetis_primitives::{
    Certificate, Language, NonEmptySet, Nullable, PostAlonzoTransactionOutput, Set,
    TransactionBody, TransactionInput, TransactionOutput, Tx, VKeyWitness, Value,
};
use thiserror::Error;

use crate::eval::{EvaluationError, TxEvaluator};
use crate::fee::{linear_fee, min_utxo_value, ref_script_fee, script_fee};
use crate::params::ProtocolParameters;
use crate::selection::{CoinSelector, SelectionError};
use crate::utxo::Utxo;
use crate::value::{AssetClass, Balance};

const MAX_ROUNDS: usize = 8;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("a redeemer still has zero execution units after evaluation")]
    MissingExUnits,

    #[error("transaction carries redeemers but no evaluator was configured")]
    NoEvaluator,

    #[error("no resolved output for input {0:?}")]
    UnresolvedInput(TransactionInput),

    #[error("change stays {0} lovelace short of the minimum for its own output")]
    ChangeBelowMinUtxo(u64),

    #[error("balancing did not converge after {0} rounds")]
    NotConverged(usize),
}

/// Balances draft transactions against a set of protocol parameters
pub struct Balancer<'a> {
    params: &'a ProtocolParameters,
    selector: &'a dyn CoinSelector,
    evaluator: Option<&'a dyn TxEvaluator>,
    change_address: Address,
    extra_signers: u8,
    fee: Option<u64>,
}

impl<'a> Balancer<'a> {
    pub fn new(
        params: &'a ProtocolParameters,
        selector: &'a dyn CoinSelector,
        change_address: Address,
    ) -> Self {
        Self {
            params,
            selector,
            evaluator: None,
            change_address,
            extra_signers: 1,
            fee: None,
        }
    }

    /// Evaluator for the execution units of Plutus redeemers; required only
    /// when the draft carries redeemers
    pub fn with_evaluator(mut self, evaluator: &'a dyn TxEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Number of additional dummy signatures to budget for when sizing the
    /// unsigned transaction. The caller attaches the real witnesses after
    /// balancing; each one counted here reserves the bytes of a zeroed
    /// 32-byte key plus a 64-byte signature.
    pub fn with_extra_signers(mut self, count: u8) -> Self {
        self.extra_signers = count;
        self
    }

    /// A fee suggestion; the engine keeps it when it covers the computed
    /// minimum and raises it otherwise
    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Produces a balanced copy of the draft. The draft itself is never
    /// mutated, so a failure leaves the caller's transaction untouched.
    ///
    /// `resolved` must cover every input and reference input the draft
    /// already spends; `available` is the pool the selector may pull from.
    pub fn balance<'b>(
        &self,
        draft: &Tx<'b>,
        resolved: &[Utxo<'b>],
        available: &[Utxo<'b>],
    ) -> Result<Tx<'b>, BalanceError> {
        let mut tx = draft.clone();

        self.apply_evaluation(&mut tx, resolved)?;

        let mut known: Vec<Utxo<'b>> = resolved.to_vec();
        for candidate in available {
            if !known.iter().any(|x| x.input == candidate.input) {
                known.push(candidate.clone());
            }
        }

        let mut change_index: Option<usize> = None;
        let mut change_floor: u64 = 0;

        for round in 0..MAX_ROUNDS {
            let (target, implicit, pre_selected) = {
                let body = &*tx.transaction_body;

                let target = outputs_total(body, change_index) + Balance::from_coin(change_floor);

                let implicit = implicit_in(self.params, body)
                    - implicit_out(self.params, body)
                    - Balance::from_coin(body.fee);

                (target, implicit, resolve_all(&known, &body.inputs)?)
            };

            let selection = match self
                .selector
                .select(available, &pre_selected, &target, &implicit)
            {
                Ok(x) => x,
                Err(SelectionError::InsufficientFunds(AssetClass::Coin)) if change_floor > 0 => {
                    return Err(BalanceError::ChangeBelowMinUtxo(change_floor))
                }
                Err(e) => return Err(e.into()),
            };

            trace!(round, selected = selection.selected.len(), "inputs selected");

            {
                let body = tx.transaction_body.to_mut();
                let mut inputs: Vec<TransactionInput> = body.inputs.iter().cloned().collect();

                for utxo in &selection.selected {
                    if !inputs.contains(&utxo.input) {
                        inputs.push(utxo.input.clone());
                    }
                }

                inputs.sort();
                body.inputs = Set::from(inputs);
            }

            // provisional change so the fee estimate sees a realistic size
            let provisional = (selection.change + Balance::from_coin(change_floor))
                .try_into_value()
                .unwrap_or(Value::Coin(0));
            self.upsert_change(&mut tx, &mut change_index, provisional);

            let ref_size = {
                let body = &*tx.transaction_body;
                ref_scripts_size(body, &known)
            };

            let mut fee = estimate_min_fee(&tx, self.params, self.extra_signers, ref_size);
            if let Some(suggested) = self.fee {
                fee = fee.max(suggested);
            }
            tx.transaction_body.to_mut().fee = fee;

            // what is actually left over once the fee is in place
            let leftover = {
                let body = &*tx.transaction_body;
                inputs_total(&known, &body.inputs)? + implicit_in(self.params, body)
                    - implicit_out(self.params, body)
                    - outputs_total(body, change_index)
                    - Balance::from_coin(fee)
            };

            debug!(round, fee, change = %leftover.coin(), "balancing round");

            if leftover.coin() < 0 {
                // the fee ate into the change; select more next round
                continue;
            }

            if leftover.is_zero() {
                self.remove_change(&mut tx, &mut change_index);
                self.refresh_hashes(&mut tx, &known);

                if self.settled(&tx, &known, ref_size) {
                    return Ok(tx);
                }

                continue;
            }

            let change_value = match leftover.try_into_value() {
                Ok(x) => x,
                Err(_) => continue,
            };

            self.upsert_change(&mut tx, &mut change_index, change_value);

            let change_size = {
                let body = &*tx.transaction_body;
                match change_index {
                    Some(i) => minicbor::to_vec(&body.outputs[i]).unwrap().len() as u64,
                    None => 0,
                }
            };

            let min_change = min_utxo_value(self.params, change_size);

            if (leftover.coin() as u64) < min_change {
                if leftover.has_tokens() {
                    // tokens cannot fold into the fee; demand more coin
                    change_floor += min_change - leftover.coin() as u64;
                    continue;
                }

                self.remove_change(&mut tx, &mut change_index);
                tx.transaction_body.to_mut().fee = fee + leftover.coin() as u64;
            }

            self.refresh_hashes(&mut tx, &known);

            if self.settled(&tx, &known, ref_size) {
                return Ok(tx);
            }
        }

        Err(BalanceError::NotConverged(MAX_ROUNDS))
    }

    fn apply_evaluation<'b>(
        &self,
        tx: &mut Tx<'b>,
        resolved: &[Utxo<'b>],
    ) -> Result<(), BalanceError> {
        let needs_eval = tx
            .transaction_witness_set
            .redeemer
            .as_ref()
            .map(|x| !x.is_empty())
            .unwrap_or(false);

        if !needs_eval {
            return Ok(());
        }

        let evaluator = self.evaluator.ok_or(BalanceError::NoEvaluator)?;
        let reports = evaluator.evaluate(&*tx, resolved)?;

        let witness = tx.transaction_witness_set.to_mut();

        if let Some(redeemer) = witness.redeemer.as_mut() {
            let redeemers = redeemer.to_mut();

            for report in reports {
                redeemers.set_ex_units(report.tag, report.index, report.ex_units);
            }

            if redeemers.any_zero_ex_units() {
                return Err(BalanceError::MissingExUnits);
            }
        }

        Ok(())
    }

    fn upsert_change<'b>(
        &self,
        tx: &mut Tx<'b>,
        change_index: &mut Option<usize>,
        value: Value,
    ) {
        let body = tx.transaction_body.to_mut();

        match *change_index {
            Some(i) => {
                if let TransactionOutput::PostAlonzo(output) = &mut body.outputs[i] {
                    output.value = value;
                }
            }
            None => {
                body.outputs
                    .push(TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
                        address: self.change_address.to_vec().into(),
                        value,
                        datum_option: None,
                        script_ref: None,
                    }));

                *change_index = Some(body.outputs.len() - 1);
            }
        }
    }

    fn remove_change(&self, tx: &mut Tx<'_>, change_index: &mut Option<usize>) {
        if let Some(i) = change_index.take() {
            tx.transaction_body.to_mut().outputs.remove(i);
        }
    }

    fn refresh_hashes<'b>(&self, tx: &mut Tx<'b>, known: &[Utxo<'b>]) {
        let script_data_hash = {
            let witness = &*tx.transaction_witness_set;
            let body = &*tx.transaction_body;

            let views =
                LanguageViews::select(&self.params.cost_models, used_languages(witness, body, known));

            ScriptData::build_for(witness, views).map(|x| x.hash())
        };

        if let Some(hash) = script_data_hash {
            tx.transaction_body.to_mut().script_data_hash = Some(hash);
        }

        if let Nullable::Some(aux) = &tx.auxiliary_data {
            let hash = aux.compute_hash();
            tx.transaction_body.to_mut().auxiliary_data_hash = Some(hash);
        }
    }

    fn settled<'b>(&self, tx: &Tx<'b>, known: &[Utxo<'b>], ref_size: u64) -> bool {
        let min = estimate_min_fee(tx, self.params, self.extra_signers, ref_size);

        tx.transaction_body.fee >= min && is_balanced(tx, known, self.params)
    }
}

/// Minimum fee of the transaction as it stands, with `extra_signers` zeroed
/// vkey witnesses appended for sizing
pub fn estimate_min_fee(
    tx: &Tx<'_>,
    params: &ProtocolParameters,
    extra_signers: u8,
    ref_scripts_size: u64,
) -> u64 {
    let mut sized = tx.clone();

    if extra_signers > 0 {
        let witness = sized.transaction_witness_set.to_mut();

        let mut vkeys: Vec<VKeyWitness> = witness
            .vkeywitness
            .take()
            .map(|x| x.to_vec())
            .unwrap_or_default();

        for _ in 0..extra_signers {
            vkeys.push(VKeyWitness {
                vkey: vec![0u8; 32].into(),
                signature: vec![0u8; 64].into(),
            });
        }

        witness.vkeywitness = NonEmptySet::try_from(vkeys).ok();
    }

    let size = minicbor::to_vec(&sized).unwrap().len() as u64; // infallible

    let mut fee = linear_fee(params, size);

    if let Some(redeemers) = sized.transaction_witness_set.redeemer.as_ref() {
        fee += script_fee(&params.execution_costs, &redeemers.total_ex_units());
    }

    fee + ref_script_fee(&params.minfee_refscript_cost_per_byte, ref_scripts_size)
}

/// Whether consumed and produced value match exactly
pub fn is_balanced(tx: &Tx<'_>, resolved: &[Utxo<'_>], params: &ProtocolParameters) -> bool {
    let body = &*tx.transaction_body;

    let inputs = match inputs_total(resolved, &body.inputs) {
        Ok(x) => x,
        Err(_) => return false,
    };

    let consumed = inputs + implicit_in(params, body);
    let produced =
        outputs_total(body, None) + Balance::from_coin(body.fee) + implicit_out(params, body);

    consumed == produced
}

fn resolve<'a, 'b>(known: &'a [Utxo<'b>], input: &TransactionInput) -> Option<&'a Utxo<'b>> {
    known.iter().find(|x| &x.input == input)
}

fn resolve_all<'b>(
    known: &[Utxo<'b>],
    inputs: &Set<TransactionInput>,
) -> Result<Vec<Utxo<'b>>, BalanceError> {
    inputs
        .iter()
        .map(|input| {
            resolve(known, input)
                .cloned()
                .ok_or_else(|| BalanceError::UnresolvedInput(input.clone()))
        })
        .collect()
}

fn inputs_total(known: &[Utxo<'_>], inputs: &Set<TransactionInput>) -> Result<Balance, BalanceError> {
    inputs.iter().try_fold(Balance::zero(), |acc, input| {
        let utxo =
            resolve(known, input).ok_or_else(|| BalanceError::UnresolvedInput(input.clone()))?;

        Ok(acc + Balance::from(utxo.output.value()))
    })
}

fn outputs_total(body: &TransactionBody<'_>, skip: Option<usize>) -> Balance {
    body.outputs
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .fold(Balance::zero(), |acc, (_, output)| {
            acc + Balance::from(output.value())
        })
}

/// Value entering the transaction besides its inputs: withdrawals, deposit
/// refunds and net minting
fn implicit_in(params: &ProtocolParameters, body: &TransactionBody<'_>) -> Balance {
    let withdrawals: u64 = body
        .withdrawals
        .as_ref()
        .map(|x| x.values().sum())
        .unwrap_or_default();

    let refunds: u64 = body
        .certificates
        .iter()
        .flat_map(|certs| certs.iter())
        .map(|cert| match cert {
            Certificate::StakeDeregistration(_) => params.key_deposit,
            Certificate::UnReg(_, deposit) => *deposit,
            Certificate::UnRegDRepCert(_, deposit) => *deposit,
            _ => 0,
        })
        .sum();

    let mint = body.mint.as_ref().map(Balance::from).unwrap_or_default();

    Balance::from_coin(withdrawals) + Balance::from_coin(refunds) + mint
}

/// Value leaving the transaction besides its outputs and fee: deposits and
/// the treasury donation
fn implicit_out(params: &ProtocolParameters, body: &TransactionBody<'_>) -> Balance {
    let deposits: u64 = body
        .certificates
        .iter()
        .flat_map(|certs| certs.iter())
        .map(|cert| match cert {
            Certificate::StakeRegistration(_) => params.key_deposit,
            Certificate::PoolRegistration { .. } => params.pool_deposit,
            Certificate::Reg(_, deposit) => *deposit,
            Certificate::StakeRegDeleg(_, _, deposit) => *deposit,
            Certificate::VoteRegDeleg(_, _, deposit) => *deposit,
            Certificate::StakeVoteRegDeleg(_, _, _, deposit) => *deposit,
            Certificate::RegDRepCert(_, deposit, _) => *deposit,
            _ => 0,
        })
        .sum();

    let proposals: u64 = body
        .proposal_procedures
        .iter()
        .flat_map(|proposals| proposals.iter())
        .map(|x| x.deposit)
        .sum();

    let donation: u64 = body.donation.map(u64::from).unwrap_or_default();

    Balance::from_coin(deposits + proposals + donation)
}

fn ref_scripts_size(body: &TransactionBody<'_>, known: &[Utxo<'_>]) -> u64 {
    let reference_inputs = body
        .reference_inputs
        .iter()
        .flat_map(|inputs| inputs.iter());

    body.inputs
        .iter()
        .chain(reference_inputs)
        .filter_map(|input| resolve(known, input))
        .filter_map(|utxo| utxo.output.script_ref())
        .map(|script| minicbor::to_vec(script).unwrap().len() as u64)
        .sum()
}

fn used_languages(
    witness: &thetis_primitives::WitnessSet<'_>,
    body: &TransactionBody<'_>,
    known: &[Utxo<'_>],
) -> Vec<Language> {
    let mut used = vec![];

    if witness.plutus_v1_script.is_some() {
        used.push(Language::PlutusV1);
    }

    if witness.plutus_v2_script.is_some() {
        used.push(Language::PlutusV2);
    }

    if witness.plutus_v3_script.is_some() {
        used.push(Language::PlutusV3);
    }

    let reference_inputs = body
        .reference_inputs
        .iter()
        .flat_map(|inputs| inputs.iter());

    for input in body.inputs.iter().chain(reference_inputs) {
        if let Some(language) = resolve(known, input)
            .and_then(|utxo| utxo.output.script_ref())
            .and_then(|script| script.language())
        {
            used.push(language);
        }
    }

    used.sort();
    used.dedup();
    used
}
