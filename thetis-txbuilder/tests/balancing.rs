use std::str::FromStr;

use thetis_addresses::Address;
use thetis_crypto::hash::Hash;
use thetis_primitives::script_data::{LanguageViews, ScriptData};
use thetis_primitives::{
    AssetName, Bytes, Certificate, Constr, Credential, ExUnits, KeepRaw, Language, NonEmptySet,
    Nullable, PlutusData, PlutusScript, PolicyId, PositiveCoin, PostAlonzoTransactionOutput,
    Redeemer, RedeemerTag, Redeemers, Set, TransactionBody, TransactionInput, TransactionOutput,
    Tx, Value, WitnessSet,
};
use thetis_txbuilder::{
    estimate_min_fee, is_balanced, min_utxo_value, script_fee, AssetClass, BalanceError, Balancer,
    EvaluatedRedeemer, EvaluationError, LargeFirstSelector, ProtocolParameters, SelectionError,
    TxEvaluator, Utxo,
};

const CHANGE_ADDRESS: &str = "addr_test1qqnqfr70emn3kyywffxja44znvdw0y4aeyh0vdc3s3rky48vlp50u6nrq5s7k6h89uqrjnmr538y6e50crvz6jdv3vqqxah5fk";

fn change_address() -> Address {
    Address::from_str(CHANGE_ADDRESS).unwrap()
}

fn address_bytes() -> Bytes {
    change_address().to_vec().into()
}

fn input(seed: u8, index: u64) -> TransactionInput {
    TransactionInput {
        transaction_id: Hash::from([seed; 32]),
        index,
    }
}

fn payment_output(coin: u64) -> TransactionOutput<'static> {
    TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
        address: address_bytes(),
        value: Value::Coin(coin),
        datum_option: None,
        script_ref: None,
    })
}

fn coin_utxo(seed: u8, coin: u64) -> Utxo<'static> {
    Utxo::new(
        input(seed, 0),
        TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
            address: address_bytes(),
            value: Value::Coin(coin),
            datum_option: None,
            script_ref: None,
        }),
    )
}

fn token_policy() -> PolicyId {
    Hash::from([9u8; 28])
}

fn token_name() -> AssetName {
    Vec::from("tkn".as_bytes()).into()
}

fn token_value(coin: u64, quantity: u64) -> Value {
    let assets = [(
        token_policy(),
        [(token_name(), PositiveCoin::try_from(quantity).unwrap())]
            .into_iter()
            .collect(),
    )]
    .into_iter()
    .collect();

    Value::Multiasset(coin, assets)
}

fn token_utxo(seed: u8, coin: u64, quantity: u64) -> Utxo<'static> {
    Utxo::new(
        input(seed, 0),
        TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
            address: address_bytes(),
            value: token_value(coin, quantity),
            datum_option: None,
            script_ref: None,
        }),
    )
}

fn draft(outputs: Vec<TransactionOutput<'static>>) -> Tx<'static> {
    draft_with(outputs, Vec::new(), WitnessSet::default())
}

fn draft_with(
    outputs: Vec<TransactionOutput<'static>>,
    inputs: Vec<TransactionInput>,
    witness: WitnessSet<'static>,
) -> Tx<'static> {
    Tx {
        transaction_body: KeepRaw::from(TransactionBody {
            inputs: Set::from(inputs),
            outputs,
            fee: 0,
            ..Default::default()
        }),
        transaction_witness_set: KeepRaw::from(witness),
        success: true,
        auxiliary_data: Nullable::Null,
    }
}

fn candidates() -> [Utxo<'static>; 3] {
    [
        coin_utxo(1, 18_000_000),
        coin_utxo(2, 235_000_000),
        token_utxo(3, 40_000_000, 40),
    ]
}

#[test]
fn balances_a_minimal_payment() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    let draft = draft(vec![payment_output(15_000_000)]);
    let available = candidates();

    let tx = balancer.balance(&draft, &[], &available).unwrap();
    let body = &tx.transaction_body;

    assert!(is_balanced(&tx, &available, &params));

    // the biggest candidate funds the payment on its own
    assert_eq!(body.inputs.len(), 1);
    assert_eq!(body.inputs[0], available[1].input);

    // change comes back to the change address and respects the minimum
    assert_eq!(body.outputs.len(), 2);
    assert_eq!(body.outputs[1].address(), &address_bytes());

    let change_size = thetis_codec::minicbor::to_vec(&body.outputs[1]).unwrap().len() as u64;
    assert!(body.outputs[1].value().coin() >= min_utxo_value(&params, change_size));

    assert!(body.fee >= estimate_min_fee(&tx, &params, 1, 0));
}

#[test]
fn balances_with_native_assets() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    let target = TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
        address: address_bytes(),
        value: token_value(15_000_000, 7),
        datum_option: None,
        script_ref: None,
    });

    let available = candidates();
    let tx = balancer.balance(&draft(vec![target]), &[], &available).unwrap();
    let body = &tx.transaction_body;

    assert!(is_balanced(&tx, &available, &params));

    // the token-bearing candidate must be part of the selection
    assert!(body.inputs.contains(&available[2].input));

    // residual tokens land in the change output, nothing is lost
    let change = body.outputs.last().unwrap();
    let change_tokens = change
        .value()
        .assets()
        .and_then(|x| x.get(&token_policy()))
        .and_then(|x| x.get(&token_name()))
        .copied()
        .map(u64::from);

    assert_eq!(change_tokens, Some(33));
}

struct FixedEvaluator(ExUnits);

impl TxEvaluator for FixedEvaluator {
    fn evaluate(
        &self,
        _tx: &Tx<'_>,
        _utxos: &[Utxo<'_>],
    ) -> Result<Vec<EvaluatedRedeemer>, EvaluationError> {
        Ok(vec![EvaluatedRedeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            ex_units: self.0,
        }])
    }
}

fn unit_datum() -> PlutusData {
    PlutusData::Constr(Constr::new(0, vec![]))
}

fn script_witness() -> WitnessSet<'static> {
    let script: PlutusScript<2> =
        PlutusScript(hex::decode("4e4d01000033222220051200120011").unwrap().into());

    WitnessSet {
        plutus_v2_script: Some(NonEmptySet::try_from(vec![script]).unwrap()),
        redeemer: Some(KeepRaw::from(Redeemers::List(vec![Redeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            data: unit_datum(),
            ex_units: ExUnits { mem: 0, steps: 0 },
        }]))),
        ..Default::default()
    }
}

fn script_params() -> ProtocolParameters {
    let mut params = ProtocolParameters::default();
    params.cost_models.plutus_v2 = Some(vec![205665, 812, 1, 1, 1000, 571, 0, 1]);
    params
}

#[test]
fn script_evaluation_feeds_ex_units_fee_and_hash() {
    let params = script_params();
    let selector = LargeFirstSelector;

    let measured = ExUnits {
        mem: 1_000_000_000,
        steps: 5_000_000_000,
    };
    let evaluator = FixedEvaluator(measured);

    let balancer =
        Balancer::new(&params, &selector, change_address()).with_evaluator(&evaluator);

    // the script input has the all-zero tx id so it stays first in the
    // canonically ordered input set
    let script_input = input(0, 0);
    let resolved = [coin_utxo(0, 50_000_000)];
    let available = candidates();

    let draft = draft_with(
        vec![payment_output(15_000_000)],
        vec![script_input],
        script_witness(),
    );

    let tx = balancer.balance(&draft, &resolved, &available).unwrap();
    let body = &tx.transaction_body;
    let witness = &tx.transaction_witness_set;

    // the evaluator's measurement replaced the zeroed units
    let redeemers = witness.redeemer.as_ref().unwrap();
    assert_eq!(redeemers.total_ex_units(), measured);

    // the fee carries the execution-unit component
    assert!(body.fee >= script_fee(&params.execution_costs, &measured));

    // script-data hash matches the new redeemers and the cost models in use
    let views = LanguageViews::select(&params.cost_models, [Language::PlutusV2]);
    let expected = ScriptData::build_for(witness, views).unwrap().hash();
    assert_eq!(body.script_data_hash, Some(expected));

    let mut known: Vec<Utxo> = resolved.to_vec();
    known.extend(available.iter().cloned());
    assert!(is_balanced(&tx, &known, &params));
}

#[test]
fn rejects_redeemers_without_an_evaluator() {
    let params = script_params();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    let draft = draft_with(
        vec![payment_output(15_000_000)],
        vec![input(0, 0)],
        script_witness(),
    );

    let err = balancer
        .balance(&draft, &[coin_utxo(0, 50_000_000)], &candidates())
        .unwrap_err();

    assert!(matches!(err, BalanceError::NoEvaluator));
}

#[test]
fn insufficient_funds_leaves_the_draft_alone() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    // one lovelace more than everything available together
    let total: u64 = candidates().iter().map(|x| x.coin()).sum();
    let draft = draft(vec![payment_output(total + 1_000_000)]);
    let untouched = draft.clone();

    let err = balancer.balance(&draft, &[], &candidates()).unwrap_err();

    assert!(matches!(
        err,
        BalanceError::Selection(SelectionError::InsufficientFunds(AssetClass::Coin))
    ));
    assert_eq!(draft, untouched);
}

#[test]
fn generous_fee_suggestions_are_kept() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address()).with_fee(1_000_000);

    let tx = balancer
        .balance(&draft(vec![payment_output(15_000_000)]), &[], &candidates())
        .unwrap();

    assert_eq!(tx.transaction_body.fee, 1_000_000);
    assert!(is_balanced(&tx, &candidates(), &params));
}

#[test]
fn lowball_fee_suggestions_are_raised() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address()).with_fee(10);

    let tx = balancer
        .balance(&draft(vec![payment_output(15_000_000)]), &[], &candidates())
        .unwrap();

    assert!(tx.transaction_body.fee > 10);
    assert!(tx.transaction_body.fee >= estimate_min_fee(&tx, &params, 1, 0));
}

#[test]
fn tiny_change_folds_into_the_fee() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    let available = [coin_utxo(1, 15_500_000)];
    let tx = balancer
        .balance(&draft(vec![payment_output(15_000_000)]), &[], &available)
        .unwrap();

    let body = &tx.transaction_body;

    // no change output survives; the leftover became fee
    assert_eq!(body.outputs.len(), 1);
    assert_eq!(body.fee, 500_000);
    assert!(is_balanced(&tx, &available, &params));
}

#[test]
fn certificate_deposits_are_accounted_for() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    let mut base = draft(vec![payment_output(15_000_000)]);
    {
        let body = base.transaction_body.to_mut();
        body.certificates = Some(
            NonEmptySet::try_from(vec![Certificate::Reg(
                Credential::KeyHash(Hash::from([7u8; 28])),
                2_000_000,
            )])
            .unwrap(),
        );
    }

    let available = candidates();
    let tx = balancer.balance(&base, &[], &available).unwrap();

    assert!(is_balanced(&tx, &available, &params));

    // the deposit shows up as consumed value next to the outputs and fee
    let body = &tx.transaction_body;
    let change = body.outputs[1].value().coin();
    let inputs_coin: u64 = body
        .inputs
        .iter()
        .map(|i| available.iter().find(|u| &u.input == i).unwrap().coin())
        .sum();

    assert_eq!(
        inputs_coin,
        15_000_000 + change + body.fee + 2_000_000
    );
}

#[test]
fn withdrawals_reduce_the_inputs_needed() {
    let params = ProtocolParameters::default();
    let selector = LargeFirstSelector;
    let balancer = Balancer::new(&params, &selector, change_address());

    let mut base = draft(vec![payment_output(15_000_000)]);
    {
        let body = base.transaction_body.to_mut();
        let account: Bytes = vec![0xe0; 29].into();
        body.withdrawals = Some([(account, 5_000_000u64)].into_iter().collect());
    }

    let available = candidates();
    let tx = balancer.balance(&base, &[], &available).unwrap();

    assert!(is_balanced(&tx, &available, &params));

    let body = &tx.transaction_body;
    let change = body.outputs[1].value().coin();
    let inputs_coin: u64 = body
        .inputs
        .iter()
        .map(|i| available.iter().find(|u| &u.input == i).unwrap().coin())
        .sum();

    assert_eq!(inputs_coin + 5_000_000, 15_000_000 + change + body.fee);
}
