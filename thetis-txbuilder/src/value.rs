//! Signed value arithmetic for balancing
//!
//! Wire values carry unsigned quantities; balancing needs to add
//! withdrawals, subtract deposits, net out mint against burn and detect
//! deficits. [Balance] is the working representation for all of that: a
//! signed coin amount plus signed per-asset quantities, kept normalized
//! (no zero quantities, no empty policies).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use thetis_primitives::{AssetName, Mint, PolicyId, PositiveCoin, Value};

/// One spendable asset kind: ada, or a token under a minting policy
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetClass {
    Coin,
    Token(PolicyId, AssetName),
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Coin => f.write_str("coin"),
            AssetClass::Token(policy, name) => write!(f, "{policy}.{name}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balance {
    coin: i128,
    assets: BTreeMap<PolicyId, BTreeMap<AssetName, i128>>,
}

impl Balance {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_coin(coin: u64) -> Self {
        Self {
            coin: coin as i128,
            assets: BTreeMap::new(),
        }
    }

    pub fn coin(&self) -> i128 {
        self.coin
    }

    pub fn quantity_of(&self, class: &AssetClass) -> i128 {
        match class {
            AssetClass::Coin => self.coin,
            AssetClass::Token(policy, name) => self
                .assets
                .get(policy)
                .and_then(|names| names.get(name))
                .copied()
                .unwrap_or_default(),
        }
    }

    pub fn set_quantity(&mut self, policy: PolicyId, name: AssetName, quantity: i128) {
        self.assets.entry(policy).or_default().insert(name, quantity);
        self.normalize();
    }

    pub fn is_zero(&self) -> bool {
        self.coin == 0 && self.assets.is_empty()
    }

    pub fn has_tokens(&self) -> bool {
        !self.assets.is_empty()
    }

    /// Iterates over every non-zero token quantity
    pub fn tokens(&self) -> impl Iterator<Item = (&PolicyId, &AssetName, i128)> {
        self.assets
            .iter()
            .flat_map(|(policy, names)| names.iter().map(move |(name, qty)| (policy, name, *qty)))
    }

    /// Every asset class present in self or other, coin excluded
    fn token_classes_with(&self, other: &Balance) -> Vec<AssetClass> {
        let mut classes: Vec<AssetClass> = self
            .tokens()
            .chain(other.tokens())
            .map(|(policy, name, _)| AssetClass::Token(*policy, name.clone()))
            .collect();

        classes.sort();
        classes.dedup();
        classes
    }

    fn normalize(&mut self) {
        for names in self.assets.values_mut() {
            names.retain(|_, qty| *qty != 0);
        }

        self.assets.retain(|_, names| !names.is_empty());
    }

    /// Turns this balance into an output value; fails with the offending
    /// asset class when any component is negative or out of range
    pub fn try_into_value(&self) -> Result<Value, AssetClass> {
        if self.coin < 0 || self.coin > u64::MAX as i128 {
            return Err(AssetClass::Coin);
        }

        if self.assets.is_empty() {
            return Ok(Value::Coin(self.coin as u64));
        }

        let mut assets: BTreeMap<PolicyId, BTreeMap<AssetName, PositiveCoin>> = BTreeMap::new();

        for (policy, name, qty) in self.tokens() {
            let qty = u64::try_from(qty)
                .ok()
                .and_then(|x| PositiveCoin::try_from(x).ok())
                .ok_or_else(|| AssetClass::Token(*policy, name.clone()))?;

            assets.entry(*policy).or_default().insert(name.clone(), qty);
        }

        Ok(Value::Multiasset(self.coin as u64, assets))
    }
}

impl From<&Value> for Balance {
    fn from(value: &Value) -> Self {
        let mut out = Balance {
            coin: value.coin() as i128,
            assets: BTreeMap::new(),
        };

        if let Some(multiasset) = value.assets() {
            for (policy, names) in multiasset {
                for (name, qty) in names {
                    out.assets
                        .entry(*policy)
                        .or_default()
                        .insert(name.clone(), u64::from(qty) as i128);
                }
            }
        }

        out.normalize();
        out
    }
}

impl From<&Mint> for Balance {
    fn from(mint: &Mint) -> Self {
        let mut out = Balance::zero();

        for (policy, names) in mint {
            for (name, qty) in names {
                out.assets
                    .entry(*policy)
                    .or_default()
                    .insert(name.clone(), i64::from(qty) as i128);
            }
        }

        out.normalize();
        out
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(mut self, rhs: Balance) -> Balance {
        self += rhs;
        self
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Balance) {
        self.coin += rhs.coin;

        for (policy, names) in rhs.assets {
            let entry = self.assets.entry(policy).or_default();
            for (name, qty) in names {
                *entry.entry(name).or_default() += qty;
            }
        }

        self.normalize();
    }
}

impl Sub for Balance {
    type Output = Balance;

    fn sub(mut self, rhs: Balance) -> Balance {
        self -= rhs;
        self
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Balance) {
        self.coin -= rhs.coin;

        for (policy, names) in rhs.assets {
            let entry = self.assets.entry(policy).or_default();
            for (name, qty) in names {
                *entry.entry(name).or_default() -= qty;
            }
        }

        self.normalize();
    }
}

impl Neg for Balance {
    type Output = Balance;

    fn neg(mut self) -> Balance {
        self.coin = -self.coin;

        for names in self.assets.values_mut() {
            for qty in names.values_mut() {
                *qty = -*qty;
            }
        }

        self
    }
}

/// Componentwise partial order; values holding different asset mixes where
/// neither dominates the other are incomparable (None)
impl PartialOrd for Balance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut any_less = self.coin < other.coin;
        let mut any_greater = self.coin > other.coin;

        for class in self.token_classes_with(other) {
            match self.quantity_of(&class).cmp(&other.quantity_of(&class)) {
                Ordering::Less => any_less = true,
                Ordering::Greater => any_greater = true,
                Ordering::Equal => (),
            }
        }

        match (any_less, any_greater) {
            (false, false) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (true, true) => None,
        }
    }
}
