//! Tests for the rustsv-transaction crate.
//!
//! Covers transaction parsing and serialization round-trips, txid
//! computation against published chain data, sighash preimage structure,
//! exact signed-output vectors, UTXO selection, and the end-to-end
//! build-and-sign scenarios.

use rustsv_primitives::ec::{PrivateKey, PublicKey, Signature};
use rustsv_script::{Address, Network, Script};

use crate::build::{
    build_p2pkh_transaction, calc_txid, sanitize_tx_data, Payment, PreparedOutput, TxOptions,
};
use crate::convert::CurrencyConverter;
use crate::input::DEFAULT_SEQUENCE_NUMBER;
use crate::output::TransactionOutput;
use crate::sighash::{self, SighashComponents, SIGHASH_ALL_FORKID};
use crate::template::p2pkh;
use crate::transaction::Transaction;
use crate::unspent::Unspent;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Raw transaction test vectors
// -----------------------------------------------------------------------

/// A standard 1-input 2-output transaction (payment + OP_RETURN "hello").
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";

/// Display-order txid of `SOURCE_RAW_TX`.
const SOURCE_RAW_TXID: &str = "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d";

/// A version-2 transaction with 3 inputs and 2 outputs, lock time 103.
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";

/// The Bitcoin genesis coinbase transaction.
const GENESIS_TX_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";

/// Published txid of the genesis coinbase transaction.
const GENESIS_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

/// Testnet WIF used by the exact-signing vectors.
const TEST_WIF: &str = "cNGwGSc7KRrTmdLUZ54fiSXWbhLNDc2Eg5zNucgQxyQCzuQ5YRDq";

// -----------------------------------------------------------------------
// Test fixtures
// -----------------------------------------------------------------------

/// Converter fixture that only understands raw satoshi amounts.
struct SatoshiConverter;

impl CurrencyConverter for SatoshiConverter {
    fn to_satoshis(&self, amount: &str, currency: &str) -> Result<u64, TransactionError> {
        if currency != "satoshi" {
            return Err(TransactionError::ConversionError(format!(
                "unsupported currency {}",
                currency
            )));
        }
        amount
            .parse()
            .map_err(|_| TransactionError::ConversionError(format!("bad amount {}", amount)))
    }
}

/// A wallet key with a funded UTXO locked to its own address.
fn funded_key(amount: u64) -> (PrivateKey, Address, Unspent) {
    let key = PrivateKey::from_wif(TEST_WIF).expect("should parse WIF");
    let own_address = Address::from_public_key_bytes(
        &key.pub_key().serialize(key.is_compressed()),
        Network::Mainnet,
    );
    let unspent = Unspent::new(
        amount,
        10,
        p2pkh::script_code(&key).to_hex(),
        "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d",
        0,
    );
    (key, own_address, unspent)
}

// -----------------------------------------------------------------------
// Parsing and serialization
// -----------------------------------------------------------------------

/// A transaction parses from hex and re-serializes byte-identically.
#[test]
fn test_from_hex_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx hex");

    assert_eq!(tx.version, 1, "version should be 1");
    assert_eq!(tx.input_count(), 1, "should have 1 input");
    assert_eq!(tx.output_count(), 2, "should have 2 outputs");
    assert_eq!(tx.lock_time, 0, "lock time should be 0");

    assert_eq!(
        tx.to_hex(),
        SOURCE_RAW_TX,
        "hex roundtrip should produce identical output"
    );
}

/// Multi-input parse and roundtrip.
#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse multi-input tx");

    assert_eq!(tx.version, 2);
    assert_eq!(tx.input_count(), 3);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 103);

    assert_eq!(tx.to_hex(), MULTI_INPUT_TX_HEX);
}

/// Trailing bytes after a complete transaction are rejected.
#[test]
fn test_trailing_bytes_error() {
    let extended_hex = format!("{}deadbeef", SOURCE_RAW_TX);
    assert!(Transaction::from_hex(&extended_hex).is_err());
}

#[test]
fn test_invalid_hex_error() {
    assert!(Transaction::from_hex("not_valid_hex").is_err());
}

#[test]
fn test_empty_bytes_error() {
    assert!(Transaction::from_bytes(&[]).is_err());
}

/// Output values decode from the raw bytes.
#[test]
fn test_output_satoshis() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    assert_eq!(tx.outputs[0].satoshis, 1500);
    assert_eq!(tx.outputs[1].satoshis, 3498);
    assert_eq!(tx.total_output_satoshis(), 1500 + 3498);
    assert_eq!(
        tx.outputs[1].locking_script_hex(),
        "76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac"
    );
}

/// The source txid bytes are kept in internal byte order as parsed.
#[test]
fn test_input_source_txid() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");
    let input = &tx.inputs[0];

    let expected_hex = "38c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2";
    assert_eq!(hex::encode(input.source_txid), expected_hex);
    assert_eq!(input.sequence_number, DEFAULT_SEQUENCE_NUMBER);
}

// -----------------------------------------------------------------------
// Transaction ID
// -----------------------------------------------------------------------

/// The txid matches the published identifier for known raw bytes.
#[test]
fn test_tx_id_known_vector() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse tx");
    assert_eq!(tx.tx_id_hex(), SOURCE_RAW_TXID);
}

/// calc_txid reproduces the published genesis coinbase txid.
#[test]
fn test_calc_txid_genesis() {
    let txid = calc_txid(GENESIS_TX_HEX).expect("should compute txid");
    assert_eq!(txid, GENESIS_TXID);
}

/// calc_txid agrees with Transaction::tx_id_hex and is idempotent.
#[test]
fn test_calc_txid_matches_tx_id_hex() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let from_hex = calc_txid(MULTI_INPUT_TX_HEX).unwrap();
    assert_eq!(from_hex, tx.tx_id_hex());
    assert_eq!(calc_txid(MULTI_INPUT_TX_HEX).unwrap(), from_hex);
}

#[test]
fn test_calc_txid_invalid_hex() {
    assert!(calc_txid("zz").is_err());
}

// -----------------------------------------------------------------------
// Sighash
// -----------------------------------------------------------------------

/// Preimage layout: version(4) + hashPrevouts(32) + hashSequence(32) +
/// outpoint(36) + varint+scriptCode + value(8) + sequence(4) +
/// hashOutputs(32) + locktime(4) + sighashType(4).
#[test]
fn test_sighash_preimage_structure() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx");

    let prev_script = hex::decode("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap();
    let preimage =
        sighash::calc_preimage(&tx, 0, &prev_script, SIGHASH_ALL_FORKID, 1500).unwrap();

    let expected_len = 4 + 32 + 32 + 36 + 1 + prev_script.len() + 8 + 4 + 32 + 4 + 4;
    assert_eq!(preimage.len(), expected_len);

    let version = u32::from_le_bytes([preimage[0], preimage[1], preimage[2], preimage[3]]);
    assert_eq!(version, 1);

    let tail = preimage.len();
    let sighash_type = u32::from_le_bytes([
        preimage[tail - 4],
        preimage[tail - 3],
        preimage[tail - 2],
        preimage[tail - 1],
    ]);
    assert_eq!(sighash_type, SIGHASH_ALL_FORKID);
}

/// The shared components match the one-off helper.
#[test]
fn test_sighash_components_consistent() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let prev_script = hex::decode("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap();

    let components = SighashComponents::new(&tx);
    let via_components = components
        .sighash(&tx, 0, &prev_script, 1500, SIGHASH_ALL_FORKID)
        .unwrap();
    let via_helper =
        sighash::signature_hash(&tx, 0, &prev_script, SIGHASH_ALL_FORKID, 1500).unwrap();
    assert_eq!(via_components, via_helper);
}

#[test]
fn test_sighash_out_of_range() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    assert!(sighash::signature_hash(&tx, 99, &[], SIGHASH_ALL_FORKID, 0).is_err());
}

/// Only the SIGHASH_ALL base type is supported.
#[test]
fn test_sighash_unsupported_base_type() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let result = sighash::signature_hash(&tx, 0, &[], 0x42, 0); // NONE | FORKID
    assert!(result.is_err());
}

// -----------------------------------------------------------------------
// P2PKH signing - exact vectors
// -----------------------------------------------------------------------

/// Signing a known unsigned transaction reproduces the reference signed
/// hex byte-for-byte (RFC6979 makes the signature deterministic).
#[test]
fn test_sign_exact_match() {
    let incomplete_tx_hex = "010000000193a35408b6068499e0d5abd799d3e827d9bfe70c9b75ebe209c91d25072326510000000000ffffffff02404b4c00000000001976a91404ff367be719efa79d76e4416ffb072cd53b208888acde94a905000000001976a91404d03f746652cfcb6cb55119ab473a045137d26588ac00000000";
    let mut tx = Transaction::from_hex(incomplete_tx_hex).expect("should parse unsigned tx");

    let locking_script =
        Script::from_hex("76a914c0a3c167a28cabb9fbb495affa0761e6e74ac60d88ac").unwrap();
    tx.inputs[0].set_source_output(Some(TransactionOutput {
        satoshis: 100_000_000,
        locking_script: locking_script.clone(),
        change: false,
    }));

    let priv_key = PrivateKey::from_wif(TEST_WIF).expect("should parse WIF");

    let components = SighashComponents::new(&tx);
    let unlocking_script =
        p2pkh::sign_input(&tx, 0, &components, &locking_script, &priv_key)
            .expect("signing should succeed");
    tx.inputs[0].unlocking_script = Some(unlocking_script);

    let expected_signed_tx = "010000000193a35408b6068499e0d5abd799d3e827d9bfe70c9b75ebe209c91d2507232651000000006b483045022100c1d77036dc6cd1f3fa1214b0688391ab7f7a16cd31ea4e5a1f7a415ef167df820220751aced6d24649fa235132f1e6969e163b9400f80043a72879237dab4a1190ad412103b8b40a84123121d260f5c109bc5a46ec819c2e4002e5ba08638783bfb4e01435ffffffff02404b4c00000000001976a91404ff367be719efa79d76e4416ffb072cd53b208888acde94a905000000001976a91404d03f746652cfcb6cb55119ab473a045137d26588ac00000000";
    assert_eq!(
        tx.to_hex(),
        expected_signed_tx,
        "signed tx hex must match the reference byte-for-byte"
    );
    assert_ne!(tx.to_hex(), incomplete_tx_hex);
}

/// The produced signature verifies against the recomputed sighash.
#[test]
fn test_signature_verifies() {
    let mut tx = Transaction::new();
    tx.add_input_from(
        "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d",
        0,
        "76a914c7c6987b6e2345a6b138e3384141520a0fbc18c588ac",
        15564838601,
    )
    .expect("should add input");

    tx.add_output(TransactionOutput {
        satoshis: 375041432,
        locking_script: Script::from_hex("76a91442f9682260509ac80722b1963aec8a896593d16688ac")
            .unwrap(),
        change: false,
    });
    tx.add_output(TransactionOutput {
        satoshis: 15189796941,
        locking_script: Script::from_hex("76a914c36538e91213a8100dcb2aed456ade363de8483f88ac")
            .unwrap(),
        change: false,
    });

    let priv_key = PrivateKey::from_wif(TEST_WIF).expect("should parse WIF");
    let script_code =
        Script::from_hex("76a914c7c6987b6e2345a6b138e3384141520a0fbc18c588ac").unwrap();

    let components = SighashComponents::new(&tx);
    let uscript = p2pkh::sign_input(&tx, 0, &components, &script_code, &priv_key)
        .expect("signing should succeed");
    tx.inputs[0].unlocking_script = Some(uscript);

    // Extract sig and pubkey from the unlocking script chunks.
    let chunks = tx.inputs[0]
        .unlocking_script
        .as_ref()
        .unwrap()
        .chunks()
        .expect("should decode chunks");
    let sig_bytes = chunks[0].data.as_ref().expect("sig chunk should have data");
    let pubkey_bytes = chunks[1].data.as_ref().expect("pubkey chunk should have data");

    let public_key = PublicKey::from_bytes(pubkey_bytes).expect("should parse public key");
    // Last byte of the signature push is the sighash flag.
    assert_eq!(*sig_bytes.last().unwrap(), SIGHASH_ALL_FORKID as u8);
    let sig = Signature::from_der(&sig_bytes[..sig_bytes.len() - 1])
        .expect("should parse DER signature");

    let sig_hash = tx
        .calc_input_signature_hash(0, SIGHASH_ALL_FORKID)
        .expect("should compute sighash");
    assert!(sig.verify(&sig_hash, &public_key));
}

/// Signing fails when the input has no source output info.
#[test]
fn test_sign_missing_source_info() {
    let mut tx = Transaction::new();
    tx.add_input_from(
        "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d",
        0,
        "",
        0,
    )
    .expect("should add input");
    tx.inputs[0].set_source_output(None);

    let priv_key = PrivateKey::from_wif(TEST_WIF).unwrap();
    let components = SighashComponents::new(&tx);
    let script_code = p2pkh::script_code(&priv_key);
    assert!(p2pkh::sign_input(&tx, 0, &components, &script_code, &priv_key).is_err());
}

// -----------------------------------------------------------------------
// UTXO selection
// -----------------------------------------------------------------------

/// Combine mode: one 100000-sat UTXO, 50000-sat payment at 1 sat/byte
/// yields a 226-sat fee and a 49774-sat change output.
#[test]
fn test_sanitize_combine_with_change() {
    let (_key, own_address, unspent) = funded_key(100_000);
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 50_000)];

    let (selected, outputs) = sanitize_tx_data(
        &[unspent],
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &TxOptions::default(),
    )
    .expect("sanitize should succeed");

    assert_eq!(selected.len(), 1);
    assert_eq!(outputs.len(), 2, "payment + change");
    assert_eq!(outputs[0].satoshis(), 50_000);
    assert_eq!(outputs[1].satoshis(), 49_774, "change = 100000 - 50000 - 226");

    // Conservation: inputs == outputs + fee.
    let total_in: u64 = selected.iter().map(|u| u.amount).sum();
    let total_out: u64 = outputs.iter().map(|o| o.satoshis()).sum();
    assert_eq!(total_in, total_out + 226);
}

/// An exact remainder of zero appends no change output.
#[test]
fn test_sanitize_exact_change_omitted() {
    // fee(1 input, 2 reserved outputs, 1 sat/byte) = 226
    let (_key, own_address, unspent) = funded_key(2_000 + 226);
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 2_000)];

    let (_selected, outputs) = sanitize_tx_data(
        &[unspent],
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &TxOptions::default(),
    )
    .expect("sanitize should succeed");

    assert_eq!(outputs.len(), 1, "no change output at remaining == 0");
    assert_eq!(outputs[0].satoshis(), 2_000);
}

/// Insufficient funds surface the balance and requirement, not a partial result.
#[test]
fn test_sanitize_insufficient_funds() {
    let (_key, own_address, unspent) = funded_key(1_000);
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 2_000)];

    let result = sanitize_tx_data(
        &[unspent],
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &TxOptions::default(),
    );

    match result {
        Err(TransactionError::InsufficientFunds { balance, required }) => {
            assert_eq!(balance, 1_000);
            assert_eq!(required, 2_000 + 226);
        }
        other => panic!("expected InsufficientFunds, got {:?}", other),
    }
}

/// An empty UTXO set is a fatal precondition failure.
#[test]
fn test_sanitize_empty_unspents() {
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 2_000)];
    let result = sanitize_tx_data(
        &[],
        &payments,
        1,
        "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr",
        &SatoshiConverter,
        &TxOptions::default(),
    );
    assert!(matches!(result, Err(TransactionError::EmptyUnspents)));
}

/// Minimal-subset mode consumes the smallest UTXOs first and truncates.
#[test]
fn test_sanitize_minimal_subset() {
    let (key, own_address, _unspent) = funded_key(0);
    let script_hex = p2pkh::script_code(&key).to_hex();
    let txid = "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d";
    let unspents = vec![
        Unspent::new(5_000, 1, script_hex.clone(), txid, 0),
        Unspent::new(1_000, 1, script_hex.clone(), txid, 1),
        Unspent::new(20_000, 1, script_hex.clone(), txid, 2),
        Unspent::new(3_000, 1, script_hex.clone(), txid, 3),
    ];
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 2_000)];

    let opts = TxOptions {
        combine: false,
        ..TxOptions::default()
    };
    let (selected, outputs) = sanitize_tx_data(
        &unspents,
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &opts,
    )
    .expect("sanitize should succeed");

    // 1000 alone cannot cover 2000 + fee(1,2) = 2226; adding 3000 covers
    // 2000 + fee(2,2) = 2374.
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].amount, 1_000);
    assert_eq!(selected[1].amount, 3_000);

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[1].satoshis(), 4_000 - 2_374, "change = 1626");
}

/// Minimal-subset mode still fails when every UTXO together is not enough.
#[test]
fn test_sanitize_minimal_subset_insufficient() {
    let (key, own_address, _unspent) = funded_key(0);
    let script_hex = p2pkh::script_code(&key).to_hex();
    let txid = "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d";
    let unspents = vec![
        Unspent::new(100, 1, script_hex.clone(), txid, 0),
        Unspent::new(200, 1, script_hex.clone(), txid, 1),
    ];
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 2_000)];

    let opts = TxOptions {
        combine: false,
        ..TxOptions::default()
    };
    let result = sanitize_tx_data(
        &unspents,
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &opts,
    );
    assert!(matches!(
        result,
        Err(TransactionError::InsufficientFunds { balance: 300, .. })
    ));
}

/// Paying outputs precede data outputs; each message chunk becomes its
/// own zero-value output.
#[test]
fn test_sanitize_message_ordering() {
    let (_key, own_address, unspent) = funded_key(100_000);
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 2_000)];

    let opts = TxOptions {
        message: Some(b"abcdefgh".to_vec()),
        message_limit: 3,
        ..TxOptions::default()
    };
    let (_selected, outputs) = sanitize_tx_data(
        &[unspent],
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &opts,
    )
    .expect("sanitize should succeed");

    // payment + change + 3 data chunks
    assert_eq!(outputs.len(), 5);
    assert!(matches!(outputs[0], PreparedOutput::Payment { .. }));
    assert!(matches!(outputs[1], PreparedOutput::Payment { .. }));
    assert!(matches!(
        &outputs[2],
        PreparedOutput::Data { payload } if payload == b"abc"
    ));
    assert!(matches!(
        &outputs[3],
        PreparedOutput::Data { payload } if payload == b"def"
    ));
    assert!(matches!(
        &outputs[4],
        PreparedOutput::Data { payload } if payload == b"gh"
    ));
}

/// A malformed destination address aborts the whole call.
#[test]
fn test_sanitize_invalid_address() {
    let (_key, own_address, unspent) = funded_key(100_000);
    let payments = [Payment::from_satoshis("not-an-address", 2_000)];

    let result = sanitize_tx_data(
        &[unspent],
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &TxOptions::default(),
    );
    assert!(result.is_err());
}

// -----------------------------------------------------------------------
// End-to-end build scenarios
// -----------------------------------------------------------------------

/// Full pipeline: one 100000-sat UTXO, one 50000-sat payment, 1 sat/byte,
/// combine mode, compressed key. The signed hex decodes back into the
/// expected field values and the signature verifies.
#[test]
fn test_build_end_to_end() {
    let (key, own_address, unspent) = funded_key(100_000);
    let destination = "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr";
    let payments = [Payment::from_satoshis(destination, 50_000)];

    let (selected, outputs) = sanitize_tx_data(
        &[unspent.clone()],
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &TxOptions::default(),
    )
    .expect("sanitize should succeed");

    let tx_hex = build_p2pkh_transaction(&key, &selected, &outputs).expect("build should succeed");

    // Decode back with the independent parser and check the fields.
    let tx = Transaction::from_hex(&tx_hex).expect("signed hex should parse");
    assert_eq!(tx.version, 1);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.inputs[0].sequence_number, DEFAULT_SEQUENCE_NUMBER);

    // Payment output locks to the destination, change returns to the key.
    let dest = Address::from_string(destination).unwrap();
    assert_eq!(tx.outputs[0].satoshis, 50_000);
    assert_eq!(tx.outputs[0].locking_script, p2pkh::lock(&dest));
    assert_eq!(tx.outputs[1].satoshis, 49_774);
    assert_eq!(tx.outputs[1].locking_script, p2pkh::lock(&own_address));

    // The input spends the UTXO (txid stored reversed internally).
    let mut internal = hex::decode(&unspent.txid).unwrap();
    internal.reverse();
    assert_eq!(&tx.inputs[0].source_txid[..], &internal[..]);

    // Verify the signature against the recomputed sighash.
    let mut check_tx = tx.clone();
    check_tx.inputs[0].set_source_output(Some(TransactionOutput {
        satoshis: unspent.amount,
        locking_script: Script::from_hex(&unspent.script).unwrap(),
        change: false,
    }));
    let digest = check_tx
        .calc_input_signature_hash(0, SIGHASH_ALL_FORKID)
        .unwrap();
    let chunks = tx.inputs[0].unlocking_script.as_ref().unwrap().chunks().unwrap();
    let sig_bytes = chunks[0].data.as_ref().unwrap();
    let pubkey = PublicKey::from_bytes(chunks[1].data.as_ref().unwrap()).unwrap();
    let sig = Signature::from_der(&sig_bytes[..sig_bytes.len() - 1]).unwrap();
    assert!(sig.verify(&digest, &pubkey));

    // Deterministic signing: building twice yields identical bytes.
    let again = build_p2pkh_transaction(&key, &selected, &outputs).unwrap();
    assert_eq!(again, tx_hex);
}

/// OP_RETURN scenario: message "hello" with a UTXO covering fee alone.
/// The data output's script is OP_RETURN 0x05 "hello" with a zero amount.
#[test]
fn test_build_op_return_scenario() {
    let (key, own_address, unspent) = funded_key(1_000);

    let opts = TxOptions {
        message: Some(b"hello".to_vec()),
        ..TxOptions::default()
    };
    let (selected, outputs) = sanitize_tx_data(
        &[unspent],
        &[],
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &opts,
    )
    .expect("sanitize should succeed");

    // fee(1 input, 1 reserved output, 16 data bytes) = 208; change = 792.
    assert_eq!(outputs.len(), 2, "change + data output");
    assert_eq!(outputs[0].satoshis(), 792);
    assert!(matches!(&outputs[1], PreparedOutput::Data { payload } if payload == b"hello"));

    let tx_hex = build_p2pkh_transaction(&key, &selected, &outputs).expect("build should succeed");
    let tx = Transaction::from_hex(&tx_hex).expect("signed hex should parse");

    assert_eq!(tx.output_count(), 2);
    let data_output = &tx.outputs[1];
    assert_eq!(data_output.satoshis, 0, "data output amount is zero");
    assert_eq!(data_output.locking_script_hex(), "6a0568656c6c6f");

    // The serialized amount field is eight 0x00 bytes.
    let out_bytes = data_output.to_bytes();
    assert_eq!(&out_bytes[..8], &[0u8; 8]);
}

/// A UTXO with an undecodable locking script aborts the whole build.
#[test]
fn test_build_malformed_unspent() {
    let (key, own_address, _unspent) = funded_key(0);
    let bad = Unspent::new(
        10_000,
        1,
        "zz-not-hex",
        "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d",
        0,
    );
    let outputs = [PreparedOutput::Payment {
        address: own_address,
        satoshis: 5_000,
    }];

    let result = build_p2pkh_transaction(&key, &[bad], &outputs);
    assert!(matches!(
        result,
        Err(TransactionError::MalformedUnspent(_))
    ));
}

/// Multi-input build: every input gets its own valid signature.
#[test]
fn test_build_multi_input() {
    let (key, own_address, _unspent) = funded_key(0);
    let script_hex = p2pkh::script_code(&key).to_hex();
    let unspents = vec![
        Unspent::new(
            30_000,
            1,
            script_hex.clone(),
            "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d",
            0,
        ),
        Unspent::new(
            20_000,
            1,
            script_hex.clone(),
            "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d",
            1,
        ),
    ];
    let payments = [Payment::from_satoshis("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", 40_000)];

    let (selected, outputs) = sanitize_tx_data(
        &unspents,
        &payments,
        1,
        &own_address.address_string,
        &SatoshiConverter,
        &TxOptions::default(),
    )
    .expect("sanitize should succeed");
    assert_eq!(selected.len(), 2, "combine mode uses every UTXO");

    let tx_hex = build_p2pkh_transaction(&key, &selected, &outputs).expect("build should succeed");
    let tx = Transaction::from_hex(&tx_hex).unwrap();
    assert_eq!(tx.input_count(), 2);

    for (i, unspent) in selected.iter().enumerate() {
        let mut check_tx = tx.clone();
        for (j, u) in selected.iter().enumerate() {
            check_tx.inputs[j].set_source_output(Some(TransactionOutput {
                satoshis: u.amount,
                locking_script: Script::from_hex(&u.script).unwrap(),
                change: false,
            }));
        }
        let digest = check_tx
            .calc_input_signature_hash(i, SIGHASH_ALL_FORKID)
            .unwrap();
        let chunks = tx.inputs[i].unlocking_script.as_ref().unwrap().chunks().unwrap();
        let sig_bytes = chunks[0].data.as_ref().unwrap();
        let pubkey = PublicKey::from_bytes(chunks[1].data.as_ref().unwrap()).unwrap();
        let sig = Signature::from_der(&sig_bytes[..sig_bytes.len() - 1]).unwrap();
        assert!(
            sig.verify(&digest, &pubkey),
            "signature on input {} (spending {}) should verify",
            i,
            unspent.txid
        );
    }
}
