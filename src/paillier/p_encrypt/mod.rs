pub mod p_encrypt;

pub use p_encrypt::{encrypt, encrypt_with_rng};
