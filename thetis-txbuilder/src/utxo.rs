use thetis_primitives::{TransactionInput, TransactionOutput};

/// An unspent output: the reference that spends it plus the output it
/// points at
#[derive(Debug, Clone, PartialEq)]
pub struct Utxo<'b> {
    pub input: TransactionInput,
    pub output: TransactionOutput<'b>,
}

impl<'b> Utxo<'b> {
    pub fn new(input: TransactionInput, output: TransactionOutput<'b>) -> Self {
        Self { input, output }
    }

    pub fn coin(&self) -> u64 {
        self.output.value().coin()
    }
}
