//! Transaction coordinator tests: sign doc contents, sequencing, and retry.

use std::sync::Arc;
use std::time::Duration;

use feeder_crypto::verify_signature;
use feeder_nullables::{NullChain, NullSigner};
use feeder_oracle::{
    OracleError, OracleQuerier, RetryPolicy, Signer, TxBroadcaster, TxCoordinator,
};
use feeder_types::{
    AccAddress, Coin, MsgPricePrevote, OracleMsg, PublicKey, StdFee, StdTx, ValAddress,
    DEFAULT_GAS,
};

fn coordinator(chain: &Arc<NullChain>, signer: &Arc<NullSigner>) -> TxCoordinator {
    TxCoordinator::new(
        chain.clone() as Arc<dyn OracleQuerier>,
        chain.clone() as Arc<dyn TxBroadcaster>,
        signer.clone() as Arc<dyn Signer>,
        "soju-0008",
        StdFee::new(Coin::new(750, "ukrw"), DEFAULT_GAS),
    )
}

fn prevote(feeder: &AccAddress) -> OracleMsg {
    OracleMsg::PricePrevote(MsgPricePrevote {
        denom: "ukrw".into(),
        feeder: feeder.clone(),
        hash: "38823740efc03ff93cebeb5dd08e8d7f8afebf61".into(),
        validator: ValAddress::new("terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2"),
    })
}

#[tokio::test]
async fn signs_account_number_sequence_and_chain_id() {
    let chain = Arc::new(NullChain::default());
    chain.set_account(42, 9);
    let signer = Arc::new(NullSigner::default());
    let coordinator = coordinator(&chain, &signer);

    let receipt = coordinator
        .submit(vec![prevote(signer.address())], 1)
        .await
        .unwrap();
    assert_eq!(receipt.sequence, 10);
    assert_eq!(receipt.hash, "NULLTX1");

    let doc: serde_json::Value = serde_json::from_slice(&signer.signed()[0]).unwrap();
    assert_eq!(doc["account_number"], "42");
    assert_eq!(doc["sequence"], "10");
    assert_eq!(doc["chain_id"], "soju-0008");
    assert_eq!(doc["memo"], "");
    assert_eq!(doc["fee"]["gas"], "50000");

    let tx = &chain.broadcasts()[0];
    assert_eq!(tx.msgs, vec![prevote(signer.address())]);
    assert_eq!(tx.signatures.len(), 1);
    assert_eq!(tx.signatures[0].pub_key.key_type, "tendermint/PubKeySecp256k1");
    let key = PublicKey::try_from(tx.signatures[0].pub_key.value.as_slice()).unwrap();
    assert!(verify_signature(
        &signer.signed()[0],
        &tx.signatures[0].signature,
        &key
    ));
}

#[tokio::test]
async fn broadcasts_length_prefixed_amino_binary() {
    let chain = Arc::new(NullChain::default());
    let signer = Arc::new(NullSigner::default());
    coordinator(&chain, &signer)
        .submit(vec![prevote(signer.address())], 0)
        .await
        .unwrap();

    let bytes = &chain.broadcast_bytes()[0];
    assert_ne!(bytes.first(), Some(&b'{'));
    // uvarint length of the rest, then the auth/StdTx prefix.
    let (len, prefix_at) = if bytes[0] & 0x80 == 0 {
        (bytes[0] as usize, 1)
    } else {
        ((bytes[0] & 0x7f) as usize | (bytes[1] as usize) << 7, 2)
    };
    assert_eq!(len, bytes.len() - prefix_at);
    assert_eq!(&bytes[prefix_at..prefix_at + 4], &[0xf0, 0x62, 0x5d, 0xee]);
    assert_eq!(
        StdTx::decode(bytes, "terra").unwrap().msgs,
        vec![prevote(signer.address())]
    );
}

#[tokio::test]
async fn single_shot_by_default() {
    let chain = Arc::new(NullChain::default());
    let signer = Arc::new(NullSigner::default());
    chain.fail_broadcasts(1);

    let result = coordinator(&chain, &signer)
        .submit(vec![prevote(signer.address())], 0)
        .await;
    assert!(matches!(result, Err(OracleError::Rpc(_))));
    assert_eq!(chain.broadcast_attempts(), 1);
}

#[tokio::test]
async fn retries_with_backoff_when_enabled() {
    let chain = Arc::new(NullChain::default());
    let signer = Arc::new(NullSigner::default());
    chain.fail_broadcasts(1);
    chain.reject_broadcasts(1, 32);

    let coordinator = coordinator(&chain, &signer)
        .with_retry(RetryPolicy::with_attempts(3, Duration::from_millis(1)));
    let receipt = coordinator
        .submit(vec![prevote(signer.address())], 0)
        .await
        .unwrap();
    assert_eq!(receipt.sequence, 0);
    assert_eq!(chain.broadcast_attempts(), 3);
    assert_eq!(chain.broadcasts().len(), 1);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let chain = Arc::new(NullChain::default());
    let signer = Arc::new(NullSigner::default());
    chain.reject_broadcasts(5, 4);

    let coordinator = coordinator(&chain, &signer)
        .with_retry(RetryPolicy::with_attempts(2, Duration::from_millis(1)));
    let result = coordinator.submit(vec![prevote(signer.address())], 0).await;
    assert!(matches!(result, Err(OracleError::Rejected { code: 4, .. })));
    assert_eq!(chain.broadcast_attempts(), 2);
}
