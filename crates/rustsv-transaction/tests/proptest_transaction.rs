use proptest::prelude::*;

use rustsv_script::Script;
use rustsv_transaction::{Transaction, TransactionInput, TransactionOutput};

/// Strategy to generate a valid random transaction.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let arb_input = (
        prop::array::uniform32(any::<u8>()),       // prev tx hash
        any::<u32>(),                              // prev tx index
        prop::collection::vec(any::<u8>(), 1..64), // script bytes
        any::<u32>(),                              // sequence
    )
        .prop_map(|(hash, idx, script_bytes, seq)| {
            let mut input = TransactionInput::new();
            input.source_txid = hash;
            input.source_tx_out_index = idx;
            input.unlocking_script = Some(Script::from_bytes(&script_bytes));
            input.sequence_number = seq;
            input
        });

    let arb_output = (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64)).prop_map(
        |(satoshis, script_bytes)| TransactionOutput {
            satoshis,
            locking_script: Script::from_bytes(&script_bytes),
            change: false,
        },
    );

    (
        any::<u32>(), // version
        prop::collection::vec(arb_input, 1..4),
        prop::collection::vec(arb_output, 1..4),
        any::<u32>(), // locktime
    )
        .prop_map(|(version, inputs, outputs, locktime)| {
            let mut tx = Transaction::new();
            tx.version = version;
            tx.lock_time = locktime;
            for i in inputs {
                tx.add_input(i);
            }
            for o in outputs {
                tx.add_output(o);
            }
            tx
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transaction_serialize_deserialize_roundtrip(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        let tx2 = Transaction::from_bytes(&bytes).unwrap();
        let bytes2 = tx2.to_bytes();
        prop_assert_eq!(bytes, bytes2);
    }

    #[test]
    fn transaction_hex_roundtrip(tx in arb_transaction()) {
        let hex_str = tx.to_hex();
        let tx2 = Transaction::from_hex(&hex_str).unwrap();
        prop_assert_eq!(tx.to_hex(), tx2.to_hex());
    }

    #[test]
    fn txid_is_stable(tx in arb_transaction()) {
        let reparsed = Transaction::from_hex(&tx.to_hex()).unwrap();
        prop_assert_eq!(tx.tx_id_hex(), reparsed.tx_id_hex());
    }
}
