//! Encode and decode Cardano addresses
//!
//! Every address kind defined by [CIP-19](https://cips.cardano.org/cips/cip19/)
//! has a concrete type here: [BaseAddress], [EnterpriseAddress],
//! [PointerAddress], [RewardAddress] and the legacy [byron::ByronAddress].
//! The erased [Address] enum carries any of them and is the entry point for
//! parsing bytes or strings; the concrete types convert to and from it, with
//! narrowing conversions failing when the header does not match.

pub mod byron;
pub mod varuint;

use std::{fmt, io::Cursor, str::FromStr};

use thetis_crypto::hash::Hash;
use thiserror::Error;

pub use byron::ByronAddress;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error converting from/to bech32 {0}")]
    BadBech32(bech32::Error),

    #[error("error decoding base58 value")]
    BadBase58(base58::FromBase58Error),

    #[error("error decoding hex value")]
    BadHex,

    #[error("unknown or bad string format for address {0}")]
    UnknownStringFormat(String),

    #[error("address header not found")]
    MissingHeader,

    #[error("address header is invalid {0:08b}")]
    InvalidHeader(u8),

    #[error("address is not a {0} address")]
    WrongAddressKind(&'static str),

    #[error("invalid operation for Byron address")]
    InvalidForByron,

    #[error("invalid CBOR for Byron address {0}")]
    InvalidByronCbor(thetis_codec::minicbor::decode::Error),

    #[error("byron address crc does not match payload")]
    BadByronCrc,

    #[error("unknown hrp for network {0:08b}")]
    UnknownNetworkHrp(u8),

    #[error("invalid hash size {0}")]
    InvalidHashSize(usize),

    #[error("variable-length uint error: {0}")]
    VarUint(varuint::Error),
}

pub type Slot = u64;
pub type TxIdx = u64;
pub type CertIdx = u64;

/// The network tag of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash)]
pub enum Network {
    Testnet,
    Mainnet,
    Other(u8),
}

impl From<u8> for Network {
    fn from(id: u8) -> Self {
        match id {
            0 => Network::Testnet,
            1 => Network::Mainnet,
            x => Network::Other(x),
        }
    }
}

impl Network {
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Network::Mainnet)
    }

    pub fn value(&self) -> u8 {
        match self {
            Network::Testnet => 0,
            Network::Mainnet => 1,
            Network::Other(x) => *x,
        }
    }
}

/// A credential inside an address: the hash of a key or of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Credential {
    Key(Hash<28>),
    Script(Hash<28>),
}

impl Credential {
    pub fn key_hash(hash: Hash<28>) -> Self {
        Self::Key(hash)
    }

    pub fn script_hash(hash: Hash<28>) -> Self {
        Self::Script(hash)
    }

    /// Get a reference to the inner hash of this credential
    pub fn as_hash(&self) -> &Hash<28> {
        match self {
            Self::Key(x) => x,
            Self::Script(x) => x,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script(_))
    }

    fn type_bit(&self) -> u8 {
        match self {
            Self::Key(_) => 0,
            Self::Script(_) => 1,
        }
    }
}

impl AsRef<[u8]> for Credential {
    fn as_ref(&self) -> &[u8] {
        self.as_hash().as_ref()
    }
}

/// An on-chain pointer to the certificate that registered a stake key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pointer(Slot, TxIdx, CertIdx);

impl Pointer {
    pub fn new(slot: Slot, tx_idx: TxIdx, cert_idx: CertIdx) -> Self {
        Pointer(slot, tx_idx, cert_idx)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes);
        let slot = varuint::read(&mut cursor).map_err(Error::VarUint)?;
        let tx_idx = varuint::read(&mut cursor).map_err(Error::VarUint)?;
        let cert_idx = varuint::read(&mut cursor).map_err(Error::VarUint)?;

        Ok(Pointer(slot, tx_idx, cert_idx))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut cursor = Cursor::new(vec![]);
        varuint::write(&mut cursor, self.0);
        varuint::write(&mut cursor, self.1);
        varuint::write(&mut cursor, self.2);

        cursor.into_inner()
    }

    pub fn slot(&self) -> u64 {
        self.0
    }

    pub fn tx_idx(&self) -> u64 {
        self.1
    }

    pub fn cert_idx(&self) -> u64 {
        self.2
    }
}

/// Payment credential plus delegation credential
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct BaseAddress {
    network: Network,
    payment: Credential,
    stake: Credential,
}

/// Payment credential only, no delegation part
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct EnterpriseAddress {
    network: Network,
    payment: Credential,
}

/// Payment credential plus a pointer to a stake registration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct PointerAddress {
    network: Network,
    payment: Credential,
    pointer: Pointer,
}

/// Stake credential on its own, the destination of withdrawals
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct RewardAddress {
    network: Network,
    stake: Credential,
}

/// A decoded Cardano address of any kind
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Hash)]
pub enum Address {
    Base(BaseAddress),
    Enterprise(EnterpriseAddress),
    Pointer(PointerAddress),
    Reward(RewardAddress),
    Byron(ByronAddress),
}

/// Well-known bech32 prefixes for hash identities that are not addresses
pub mod hrp {
    pub const POOL: &str = "pool";
    pub const DREP: &str = "drep";
    pub const CC_COLD: &str = "cc_cold";
    pub const CC_HOT: &str = "cc_hot";
}

pub fn encode_bech32(data: &[u8], hrp: &str) -> Result<String, Error> {
    let base32 = bech32::ToBase32::to_base32(&data);
    bech32::encode(hrp, base32, bech32::Variant::Bech32).map_err(Error::BadBech32)
}

pub fn decode_bech32(bech32: &str) -> Result<(String, Vec<u8>), Error> {
    let (hrp, data, _) = bech32::decode(bech32).map_err(Error::BadBech32)?;
    let base10 = bech32::FromBase32::from_base32(&data).map_err(Error::BadBech32)?;
    Ok((hrp, base10))
}

fn parse_network(header: u8) -> Network {
    Network::from(header & 0b0000_1111)
}

fn slice_to_hash(slice: Option<&[u8]>) -> Result<Hash<28>, Error> {
    let slice = slice.ok_or(Error::InvalidHashSize(0))?;

    if slice.len() != 28 {
        return Err(Error::InvalidHashSize(slice.len()));
    }

    let mut sized = [0u8; 28];
    sized.copy_from_slice(slice);
    Ok(sized.into())
}

fn parse_base(header: u8, payload: &[u8]) -> Result<Address, Error> {
    let h1 = slice_to_hash(payload.get(0..28))?;
    let h2 = slice_to_hash(payload.get(28..56))?;

    let (payment, stake) = match header & 0b0011_0000 {
        0b0000_0000 => (Credential::Key(h1), Credential::Key(h2)),
        0b0001_0000 => (Credential::Script(h1), Credential::Key(h2)),
        0b0010_0000 => (Credential::Key(h1), Credential::Script(h2)),
        _ => (Credential::Script(h1), Credential::Script(h2)),
    };

    Ok(BaseAddress {
        network: parse_network(header),
        payment,
        stake,
    }
    .into())
}

fn parse_pointer(header: u8, payload: &[u8]) -> Result<Address, Error> {
    let h1 = slice_to_hash(payload.get(0..28))?;

    let payment = match header & 0b0001_0000 {
        0 => Credential::Key(h1),
        _ => Credential::Script(h1),
    };

    let pointer = Pointer::parse(&payload[28..])?;

    Ok(PointerAddress {
        network: parse_network(header),
        payment,
        pointer,
    }
    .into())
}

fn parse_enterprise(header: u8, payload: &[u8]) -> Result<Address, Error> {
    let h1 = slice_to_hash(payload.get(0..28))?;

    let payment = match header & 0b0001_0000 {
        0 => Credential::Key(h1),
        _ => Credential::Script(h1),
    };

    Ok(EnterpriseAddress {
        network: parse_network(header),
        payment,
    }
    .into())
}

fn parse_reward(header: u8, payload: &[u8]) -> Result<Address, Error> {
    let h1 = slice_to_hash(payload.get(0..28))?;

    let stake = match header & 0b0001_0000 {
        0 => Credential::Key(h1),
        _ => Credential::Script(h1),
    };

    Ok(RewardAddress {
        network: parse_network(header),
        stake,
    }
    .into())
}

fn parse_byron(header: u8, payload: &[u8]) -> Result<Address, Error> {
    let envelope = [&[header], payload].concat();
    let inner = ByronAddress::from_bytes(&envelope)?;
    Ok(Address::Byron(inner))
}

fn bytes_to_address(bytes: &[u8]) -> Result<Address, Error> {
    let header = *bytes.first().ok_or(Error::MissingHeader)?;
    let payload = &bytes[1..];

    match header & 0b1111_0000 {
        0b0000_0000 | 0b0001_0000 | 0b0010_0000 | 0b0011_0000 => parse_base(header, payload),
        0b0100_0000 | 0b0101_0000 => parse_pointer(header, payload),
        0b0110_0000 | 0b0111_0000 => parse_enterprise(header, payload),
        0b1000_0000 => parse_byron(header, payload),
        0b1110_0000 | 0b1111_0000 => parse_reward(header, payload),
        _ => Err(Error::InvalidHeader(header)),
    }
}

fn payment_hrp(network: &Network) -> Result<&'static str, Error> {
    match network {
        Network::Testnet => Ok("addr_test"),
        Network::Mainnet => Ok("addr"),
        Network::Other(x) => Err(Error::UnknownNetworkHrp(*x)),
    }
}

fn stake_hrp(network: &Network) -> Result<&'static str, Error> {
    match network {
        Network::Testnet => Ok("stake_test"),
        Network::Mainnet => Ok("stake"),
        Network::Other(x) => Err(Error::UnknownNetworkHrp(*x)),
    }
}

impl BaseAddress {
    pub fn new(network: Network, payment: Credential, stake: Credential) -> Self {
        Self {
            network,
            payment,
            stake,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn payment(&self) -> &Credential {
        &self.payment
    }

    pub fn stake(&self) -> &Credential {
        &self.stake
    }

    pub fn typeid(&self) -> u8 {
        (self.stake.type_bit() << 1) | self.payment.type_bit()
    }

    pub fn to_header(&self) -> u8 {
        (self.typeid() << 4) | self.network.value()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        [
            &[self.to_header()],
            self.payment.as_ref(),
            self.stake.as_ref(),
        ]
        .concat()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }

    pub fn hrp(&self) -> Result<&'static str, Error> {
        payment_hrp(&self.network)
    }

    pub fn to_bech32(&self) -> Result<String, Error> {
        encode_bech32(&self.to_vec(), self.hrp()?)
    }

    pub fn has_script(&self) -> bool {
        self.payment.is_script() || self.stake.is_script()
    }
}

impl EnterpriseAddress {
    pub fn new(network: Network, payment: Credential) -> Self {
        Self { network, payment }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn payment(&self) -> &Credential {
        &self.payment
    }

    pub fn typeid(&self) -> u8 {
        0b0110 | self.payment.type_bit()
    }

    pub fn to_header(&self) -> u8 {
        (self.typeid() << 4) | self.network.value()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        [&[self.to_header()], self.payment.as_ref()].concat()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }

    pub fn hrp(&self) -> Result<&'static str, Error> {
        payment_hrp(&self.network)
    }

    pub fn to_bech32(&self) -> Result<String, Error> {
        encode_bech32(&self.to_vec(), self.hrp()?)
    }

    pub fn has_script(&self) -> bool {
        self.payment.is_script()
    }
}

impl PointerAddress {
    pub fn new(network: Network, payment: Credential, pointer: Pointer) -> Self {
        Self {
            network,
            payment,
            pointer,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn payment(&self) -> &Credential {
        &self.payment
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn typeid(&self) -> u8 {
        0b0100 | self.payment.type_bit()
    }

    pub fn to_header(&self) -> u8 {
        (self.typeid() << 4) | self.network.value()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        [
            &[self.to_header()],
            self.payment.as_ref(),
            self.pointer.to_vec().as_slice(),
        ]
        .concat()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }

    pub fn hrp(&self) -> Result<&'static str, Error> {
        payment_hrp(&self.network)
    }

    pub fn to_bech32(&self) -> Result<String, Error> {
        encode_bech32(&self.to_vec(), self.hrp()?)
    }

    pub fn has_script(&self) -> bool {
        self.payment.is_script()
    }
}

impl RewardAddress {
    pub fn new(network: Network, stake: Credential) -> Self {
        Self { network, stake }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn stake(&self) -> &Credential {
        &self.stake
    }

    pub fn typeid(&self) -> u8 {
        0b1110 | self.stake.type_bit()
    }

    pub fn to_header(&self) -> u8 {
        (self.typeid() << 4) | self.network.value()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        [&[self.to_header()], self.stake.as_ref()].concat()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }

    pub fn hrp(&self) -> Result<&'static str, Error> {
        stake_hrp(&self.network)
    }

    pub fn to_bech32(&self) -> Result<String, Error> {
        encode_bech32(&self.to_vec(), self.hrp()?)
    }

    pub fn has_script(&self) -> bool {
        self.stake.is_script()
    }
}

impl Address {
    /// Tries to decode the raw bytes of an address
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        bytes_to_address(bytes)
    }

    /// Tries to parse a hex value into an Address
    pub fn from_hex(value: &str) -> Result<Self, Error> {
        let bytes = hex::decode(value).map_err(|_| Error::BadHex)?;
        bytes_to_address(&bytes)
    }

    /// Tries to parse a bech32 value into an Address
    pub fn from_bech32(value: &str) -> Result<Self, Error> {
        let (_, bytes) = decode_bech32(value)?;
        bytes_to_address(&bytes)
    }

    /// Tries to encode this address into its bech32 form
    pub fn to_bech32(&self) -> Result<String, Error> {
        match self {
            Address::Base(x) => x.to_bech32(),
            Address::Enterprise(x) => x.to_bech32(),
            Address::Pointer(x) => x.to_bech32(),
            Address::Reward(x) => x.to_bech32(),
            Address::Byron(_) => Err(Error::InvalidForByron),
        }
    }

    /// Gets the network associated with this address
    pub fn network(&self) -> Option<Network> {
        match self {
            Address::Base(x) => Some(x.network()),
            Address::Enterprise(x) => Some(x.network()),
            Address::Pointer(x) => Some(x.network()),
            Address::Reward(x) => Some(x.network()),
            Address::Byron(_) => None,
        }
    }

    /// Gets a numeric id describing the type of the address
    pub fn typeid(&self) -> u8 {
        match self {
            Address::Base(x) => x.typeid(),
            Address::Enterprise(x) => x.typeid(),
            Address::Pointer(x) => x.typeid(),
            Address::Reward(x) => x.typeid(),
            Address::Byron(x) => x.typeid(),
        }
    }

    /// Gets the bech32 human-readable-part for this address
    pub fn hrp(&self) -> Result<&'static str, Error> {
        match self {
            Address::Base(x) => x.hrp(),
            Address::Enterprise(x) => x.hrp(),
            Address::Pointer(x) => x.hrp(),
            Address::Reward(x) => x.hrp(),
            Address::Byron(_) => Err(Error::InvalidForByron),
        }
    }

    /// Indicates if any part of this address is a script hash
    pub fn has_script(&self) -> bool {
        match self {
            Address::Base(x) => x.has_script(),
            Address::Enterprise(x) => x.has_script(),
            Address::Pointer(x) => x.has_script(),
            Address::Reward(x) => x.has_script(),
            Address::Byron(_) => false,
        }
    }

    pub fn is_enterprise(&self) -> bool {
        matches!(self, Address::Enterprise(_))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            Address::Base(x) => x.to_vec(),
            Address::Enterprise(x) => x.to_vec(),
            Address::Pointer(x) => x.to_vec(),
            Address::Reward(x) => x.to_vec(),
            Address::Byron(x) => x.to_vec(),
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Byron(x) => f.write_str(&x.to_base58()),
            other => f.write_str(&other.to_bech32().unwrap_or_else(|_| other.to_hex())),
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(x) = Address::from_bech32(s) {
            return Ok(x);
        }

        if let Ok(x) = ByronAddress::from_base58(s) {
            return Ok(x.into());
        }

        if let Ok(x) = Address::from_hex(s) {
            return Ok(x);
        }

        Err(Error::UnknownStringFormat(s.to_owned()))
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        bytes_to_address(value)
    }
}

impl From<BaseAddress> for Address {
    fn from(addr: BaseAddress) -> Self {
        Address::Base(addr)
    }
}

impl From<EnterpriseAddress> for Address {
    fn from(addr: EnterpriseAddress) -> Self {
        Address::Enterprise(addr)
    }
}

impl From<PointerAddress> for Address {
    fn from(addr: PointerAddress) -> Self {
        Address::Pointer(addr)
    }
}

impl From<RewardAddress> for Address {
    fn from(addr: RewardAddress) -> Self {
        Address::Reward(addr)
    }
}

impl From<ByronAddress> for Address {
    fn from(addr: ByronAddress) -> Self {
        Address::Byron(addr)
    }
}

impl TryFrom<Address> for BaseAddress {
    type Error = Error;

    fn try_from(value: Address) -> Result<Self, Self::Error> {
        match value {
            Address::Base(x) => Ok(x),
            _ => Err(Error::WrongAddressKind("base")),
        }
    }
}

impl TryFrom<Address> for EnterpriseAddress {
    type Error = Error;

    fn try_from(value: Address) -> Result<Self, Self::Error> {
        match value {
            Address::Enterprise(x) => Ok(x),
            _ => Err(Error::WrongAddressKind("enterprise")),
        }
    }
}

impl TryFrom<Address> for PointerAddress {
    type Error = Error;

    fn try_from(value: Address) -> Result<Self, Self::Error> {
        match value {
            Address::Pointer(x) => Ok(x),
            _ => Err(Error::WrongAddressKind("pointer")),
        }
    }
}

impl TryFrom<Address> for RewardAddress {
    type Error = Error;

    fn try_from(value: Address) -> Result<Self, Self::Error> {
        match value {
            Address::Reward(x) => Ok(x),
            _ => Err(Error::WrongAddressKind("reward")),
        }
    }
}

impl TryFrom<Address> for ByronAddress {
    type Error = Error;

    fn try_from(value: Address) -> Result<Self, Self::Error> {
        match value {
            Address::Byron(x) => Ok(x),
            _ => Err(Error::WrongAddressKind("byron")),
        }
    }
}

/// Derives the reward counterpart of a base address
impl TryFrom<BaseAddress> for RewardAddress {
    type Error = Error;

    fn try_from(value: BaseAddress) -> Result<Self, Self::Error> {
        Ok(RewardAddress {
            network: value.network,
            stake: value.stake,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CIP-19 test vectors, one per address type id
    const MAINNET_TEST_VECTORS: &[(&str, u8)] = &[
        ("addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgse35a3x", 0u8),
        ("addr1z8phkx6acpnf78fuvxn0mkew3l0fd058hzquvz7w36x4gten0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgs9yc0hh", 1u8),
        ("addr1yx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzerkr0vd4msrxnuwnccdxlhdjar77j6lg0wypcc9uar5d2shs2z78ve", 2u8),
        ("addr1x8phkx6acpnf78fuvxn0mkew3l0fd058hzquvz7w36x4gt7r0vd4msrxnuwnccdxlhdjar77j6lg0wypcc9uar5d2shskhj42g", 3u8),
        ("addr1gx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer5pnz75xxcrzqf96k", 4u8),
        ("addr128phkx6acpnf78fuvxn0mkew3l0fd058hzquvz7w36x4gtupnz75xxcrtw79hu", 5u8),
        ("addr1vx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzers66hrl8", 6u8),
        ("addr1w8phkx6acpnf78fuvxn0mkew3l0fd058hzquvz7w36x4gtcyjy7wx", 7u8),
        ("stake1uyehkck0lajq8gr28t9uxnuvgcqrc6070x3k9r8048z8y5gh6ffgw", 14u8),
        ("stake178phkx6acpnf78fuvxn0mkew3l0fd058hzquvz7w36x4gtcccycj5", 15u8),
        ("37btjrVyb4KDXBNC4haBVPCrro8AQPHwvCMp3RFhhSVWwfFmZ6wwzSK6JK1hY6wHNmtrpTf1kdbva8TCneM2YsiXT7mrzT21EacHnPpz5YyUdj64na", 8u8),
    ];

    #[test]
    fn roundtrip_string() {
        for (original, _) in MAINNET_TEST_VECTORS {
            let addr = Address::from_str(original).unwrap();
            assert_eq!(&addr.to_string(), original);
        }
    }

    #[test]
    fn roundtrip_bytes() {
        for (original, _) in MAINNET_TEST_VECTORS {
            let addr = Address::from_str(original).unwrap();
            let again = Address::from_bytes(&addr.to_vec()).unwrap();
            assert_eq!(again, addr);
        }
    }

    #[test]
    fn typeid_matches() {
        for (original, typeid) in MAINNET_TEST_VECTORS {
            let addr = Address::from_str(original).unwrap();
            assert_eq!(addr.typeid(), *typeid);
        }
    }

    #[test]
    fn network_matches() {
        for (original, _) in MAINNET_TEST_VECTORS {
            let addr = Address::from_str(original).unwrap();

            match addr {
                Address::Byron(_) => assert!(addr.network().is_none()),
                _ => assert!(matches!(addr.network(), Some(Network::Mainnet))),
            }
        }
    }

    #[test]
    fn network_nibble_only_changes_network() {
        let (original, _) = MAINNET_TEST_VECTORS[0];
        let addr = Address::from_str(original).unwrap();

        let mut bytes = addr.to_vec();
        bytes[0] &= 0b1111_0000; // mainnet -> testnet

        let testnet = Address::from_bytes(&bytes).unwrap();
        assert_eq!(testnet.network(), Some(Network::Testnet));
        assert_eq!(testnet.typeid(), addr.typeid());

        match (&addr, &testnet) {
            (Address::Base(a), Address::Base(b)) => {
                assert_eq!(a.payment(), b.payment());
                assert_eq!(a.stake(), b.stake());
            }
            _ => panic!("expected base addresses"),
        }
    }

    #[test]
    fn pointer_fields_decode() {
        let addr = Address::from_str(MAINNET_TEST_VECTORS[4].0).unwrap();

        match addr {
            Address::Pointer(x) => {
                assert_eq!(x.pointer().slot(), 2498243);
                assert_eq!(x.pointer().tx_idx(), 27);
                assert_eq!(x.pointer().cert_idx(), 3);
            }
            _ => panic!("expected pointer address"),
        }
    }

    #[test]
    fn narrowing_rejects_other_kinds() {
        let addr = Address::from_str(MAINNET_TEST_VECTORS[0].0).unwrap();
        let narrowed: Result<RewardAddress, _> = addr.try_into();
        assert!(matches!(narrowed, Err(Error::WrongAddressKind("reward"))));
    }

    #[test]
    fn base_into_reward_counterpart() {
        let addr = Address::from_str(MAINNET_TEST_VECTORS[0].0).unwrap();

        let base: BaseAddress = addr.try_into().unwrap();
        let stake = *base.stake();
        let reward: RewardAddress = base.try_into().unwrap();

        assert_eq!(reward.stake(), &stake);
        assert_eq!(reward.to_bech32().unwrap(), MAINNET_TEST_VECTORS[8].0);
    }

    #[test]
    fn construct_from_parts() {
        let source = Address::from_str(MAINNET_TEST_VECTORS[0].0).unwrap();
        let base: BaseAddress = source.try_into().unwrap();

        let rebuilt = BaseAddress::new(Network::Mainnet, *base.payment(), *base.stake());
        assert_eq!(rebuilt.to_bech32().unwrap(), MAINNET_TEST_VECTORS[0].0);
    }

    #[test]
    fn tolerates_oversized_pointers() {
        let addr = Address::from_hex("40C19D7D05E90EEB6394B53313FE79D47077DE33068C6B813BBE5C9D5681FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7F81FFFFFFFFFFFFFFFF7F81FFFFFFFFFFFFFFFF7F");
        assert!(matches!(addr, Ok(Address::Pointer(_))));
    }
}
