//! Deterministic obfuscation of integers.
//!
//! Each `i64` is run through a 4-round balanced Feistel network over its
//! two's-complement bits, with HMAC-SHA256 as the round function. The result
//! is a keyed bijection on 64-bit values: equal inputs give equal outputs, so
//! an account id always maps to the same public reference.
//!
//! A single value encodes to 11 URL-safe base64 chars. Lists encode as the
//! concatenated 8-byte blocks.

use super::cipher::CipherError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const FEISTEL_ROUNDS: u8 = 4;

const BLOCK_SIZE: usize = 8;

/// Keyed 64-bit permutation.
pub struct DigitPermutation {
    key: [u8; 32],
}

impl DigitPermutation {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn round(&self, round: u8, half: u32) -> u32 {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can accept any key length");
        mac.update(b"digits");
        mac.update(&[round]);
        mac.update(&half.to_be_bytes());
        let out = mac.finalize().into_bytes();
        u32::from_be_bytes([out[0], out[1], out[2], out[3]])
    }

    fn permute(&self, value: u64) -> u64 {
        let mut left = (value >> 32) as u32;
        let mut right = value as u32;
        for i in 0..FEISTEL_ROUNDS {
            let next = left ^ self.round(i, right);
            left = right;
            right = next;
        }
        (u64::from(left) << 32) | u64::from(right)
    }

    fn unpermute(&self, value: u64) -> u64 {
        let mut left = (value >> 32) as u32;
        let mut right = value as u32;
        for i in (0..FEISTEL_ROUNDS).rev() {
            let prev = right ^ self.round(i, left);
            right = left;
            left = prev;
        }
        (u64::from(left) << 32) | u64::from(right)
    }

    fn seal_block(&self, num: i64) -> [u8; BLOCK_SIZE] {
        self.permute(num as u64).to_be_bytes()
    }

    fn open_block(&self, block: &[u8]) -> Result<i64, CipherError> {
        let bytes: [u8; BLOCK_SIZE] = block
            .try_into()
            .map_err(|_| CipherError::Length(block.len()))?;
        Ok(self.unpermute(u64::from_be_bytes(bytes)) as i64)
    }

    pub fn encode(&self, num: i64) -> String {
        URL_SAFE_NO_PAD.encode(self.seal_block(num))
    }

    pub fn decode(&self, encoded: &str) -> Result<i64, CipherError> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded)?;
        self.open_block(&bytes)
    }

    pub fn encode_many(&self, nums: &[i64]) -> String {
        let mut bytes = Vec::with_capacity(nums.len() * BLOCK_SIZE);
        for &num in nums {
            bytes.extend_from_slice(&self.seal_block(num));
        }
        URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn decode_many(&self, encoded: &str) -> Result<Vec<i64>, CipherError> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded)?;
        if bytes.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::Length(bytes.len()));
        }
        bytes
            .chunks_exact(BLOCK_SIZE)
            .map(|block| self.open_block(block))
            .collect()
    }
}
