//! Sign/validate throughput for the default token codec.
//!
//! Run: `cargo bench --bench token_codec`

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use zeroclaw_token::security::{mac, AesTokenCipher, TokenCipher};
use zeroclaw_token::{Token, TokenCodec};

fn codec() -> TokenCodec {
    TokenCodec::new("bench-secret", AesTokenCipher::derive_from_secret("bench-secret"))
}

fn sample_token(codec: &TokenCodec) -> Token {
    Token::new("device-0001")
        .with_account(codec.cipher().encrypt_digit(4242).unwrap())
        .with_expiry(i64::MAX)
        .with_payload(serde_json::json!({"plan": "pro", "scopes": ["chat", "voice"]}))
        .authorize()
}

fn bench_sign(c: &mut Criterion) {
    let codec = codec();
    let token = sample_token(&codec);
    c.bench_function("token_sign", |b| {
        b.iter(|| codec.sign(black_box(&token)).unwrap());
    });
}

fn bench_validate(c: &mut Criterion) {
    let codec = codec();
    let signed = codec.sign(&sample_token(&codec)).unwrap();
    c.bench_function("token_validate", |b| {
        b.iter(|| codec.validate(black_box(&signed)).unwrap());
    });
}

fn bench_reject_forged(c: &mut Criterion) {
    let codec = codec();
    let signed = codec.sign(&sample_token(&codec)).unwrap();
    let (hash, _) = signed.split_once('.').unwrap();
    let forged = format!("{hash}.{}", mac::sign(hash.as_bytes(), b"wrong").unwrap());
    c.bench_function("token_reject_forged", |b| {
        b.iter(|| codec.validate(black_box(&forged)).unwrap_err());
    });
}

criterion_group!(benches, bench_sign, bench_validate, bench_reject_forged);
criterion_main!(benches);
