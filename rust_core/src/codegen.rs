//! Booking code synthesis for the target platform.
//!
//! Codes are `<prefix><5 digits>`: the platform's two-letter prefix followed
//! by a zero-padded suffix derived from the source code.
//!
//! Hash scheme v1: SHA-256 over the UTF-8 bytes of the source code, first 8
//! bytes read as a big-endian u64, reduced modulo 100000. Changing the scheme
//! changes every issued code, so bump [`CODE_HASH_VERSION`] when doing so.

use crate::models::Platform;
use sha2::{Digest, Sha256};

pub const CODE_HASH_VERSION: u32 = 1;

const SUFFIX_MODULUS: u64 = 100_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeSynthesizer;

impl CodeSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, target: Platform, source_code: &str) -> String {
        format!("{}{:05}", target.code_prefix(), stable_suffix(source_code))
    }
}

fn stable_suffix(source_code: &str) -> u64 {
    let digest = Sha256::digest(source_code.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) % SUFFIX_MODULUS
}
