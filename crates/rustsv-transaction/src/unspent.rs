//! Unspent transaction output records.
//!
//! An `Unspent` is an immutable snapshot of a UTXO as reported by an
//! indexer service. The sanitizer filters and orders these snapshots;
//! nothing ever mutates one in place.

use serde::{Deserialize, Serialize};

/// An unspent transaction output (UTXO).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unspent {
    /// Value of the output in satoshis.
    pub amount: u64,

    /// Number of confirmations at the time of the snapshot.
    pub confirmations: u32,

    /// Hex-encoded locking script of the output.
    pub script: String,

    /// Transaction ID in display (big-endian) order.
    pub txid: String,

    /// Index of the output within its transaction.
    pub tx_index: u32,
}

impl Unspent {
    /// Create a new `Unspent` record.
    ///
    /// # Arguments
    /// * `amount` - Value in satoshis.
    /// * `confirmations` - Confirmation count.
    /// * `script` - Hex-encoded locking script.
    /// * `txid` - Transaction ID in display order.
    /// * `tx_index` - Output index within the transaction.
    ///
    /// # Returns
    /// The new record.
    pub fn new(
        amount: u64,
        confirmations: u32,
        script: impl Into<String>,
        txid: impl Into<String>,
        tx_index: u32,
    ) -> Self {
        Unspent {
            amount,
            confirmations,
            script: script.into(),
            txid: txid.into(),
            tx_index,
        }
    }
}

/// Sort unspents ascending by amount. Stable: ties keep their input order.
///
/// # Arguments
/// * `unspents` - The slice to sort in place.
pub fn sort_by_amount(unspents: &mut [Unspent]) {
    unspents.sort_by_key(|u| u.amount);
}

/// Sort unspents ascending by confirmation count. Stable.
///
/// # Arguments
/// * `unspents` - The slice to sort in place.
pub fn sort_by_confirmations(unspents: &mut [Unspent]) {
    unspents.sort_by_key(|u| u.confirmations);
}

/// Sort unspents lexicographically by display txid. Stable.
///
/// # Arguments
/// * `unspents` - The slice to sort in place.
pub fn sort_by_txid(unspents: &mut [Unspent]) {
    unspents.sort_by(|a, b| a.txid.cmp(&b.txid));
}

/// Sort unspents ascending by output index. Stable.
///
/// # Arguments
/// * `unspents` - The slice to sort in place.
pub fn sort_by_tx_index(unspents: &mut [Unspent]) {
    unspents.sort_by_key(|u| u.tx_index);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unspent(amount: u64, txid: &str) -> Unspent {
        Unspent::new(amount, 1, "76a914", txid, 0)
    }

    #[test]
    fn test_sort_by_amount() {
        let mut utxos = vec![unspent(500, "c"), unspent(100, "a"), unspent(300, "b")];
        sort_by_amount(&mut utxos);
        let amounts: Vec<u64> = utxos.iter().map(|u| u.amount).collect();
        assert_eq!(amounts, vec![100, 300, 500]);
    }

    /// Equal amounts keep their original relative order.
    #[test]
    fn test_sort_by_amount_stable() {
        let mut utxos = vec![
            unspent(100, "first"),
            unspent(50, "x"),
            unspent(100, "second"),
        ];
        sort_by_amount(&mut utxos);
        assert_eq!(utxos[0].txid, "x");
        assert_eq!(utxos[1].txid, "first");
        assert_eq!(utxos[2].txid, "second");
    }

    #[test]
    fn test_sort_by_tx_index() {
        let mut utxos = vec![
            Unspent::new(1, 0, "", "t", 7),
            Unspent::new(1, 0, "", "t", 2),
        ];
        sort_by_tx_index(&mut utxos);
        assert_eq!(utxos[0].tx_index, 2);
    }

    #[test]
    fn test_serde_roundtrip() {
        let u = Unspent::new(
            1500,
            6,
            "76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac",
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d",
            1,
        );
        let json = serde_json::to_string(&u).unwrap();
        let back: Unspent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }
}
