use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feeder_types::{AccAddress, Dec, ValAddress, Vote};

const ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn commit_hash_bench(c: &mut Criterion) {
    let vote = Vote {
        price: Dec::with_prec(123_456, 3).unwrap(),
        salt: "a1f".into(),
        denom: "ukrw".into(),
        feeder: AccAddress::new("terra19rl4cm2hmr8afy4kldpxz3fka4jguq0a6yhaa4"),
        validator: ValAddress::new("terravaloper1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn9a88r2"),
    };

    c.bench_function("commit_hash", |b| {
        b.iter(|| feeder_crypto::commit_hash(black_box(&vote)))
    });
}

fn secp256k1_sign_bench(c: &mut Criterion) {
    let kp = feeder_crypto::keypair_from_secret(&[7u8; 32]).unwrap();
    let msg = [42u8; 512];

    c.bench_function("secp256k1_sign_512B", |b| {
        b.iter(|| feeder_crypto::sign_message(black_box(&msg), &kp.private))
    });
}

fn secp256k1_verify_bench(c: &mut Criterion) {
    let kp = feeder_crypto::keypair_from_secret(&[7u8; 32]).unwrap();
    let msg = [42u8; 512];
    let sig = feeder_crypto::sign_message(&msg, &kp.private).unwrap();

    c.bench_function("secp256k1_verify_512B", |b| {
        b.iter(|| feeder_crypto::verify_signature(black_box(&msg), &sig, &kp.public))
    });
}

fn derive_address_bench(c: &mut Criterion) {
    let kp = feeder_crypto::keypair_from_secret(&[7u8; 32]).unwrap();

    c.bench_function("derive_acc_address", |b| {
        b.iter(|| feeder_crypto::derive_acc_address(black_box(&kp.public), "terra"))
    });
}

fn mnemonic_derivation_bench(c: &mut Criterion) {
    c.bench_function("keypair_from_mnemonic", |b| {
        b.iter(|| feeder_crypto::keypair_from_mnemonic(black_box(ABOUT)))
    });
}

criterion_group!(
    benches,
    commit_hash_bench,
    secp256k1_sign_bench,
    secp256k1_verify_bench,
    derive_address_bench,
    mnemonic_derivation_bench,
);
criterion_main!(benches);
