pub mod p_keygen;

pub use p_keygen::{
    PublicKey, PrivateKey, MIN_KEY_BITS,
    generate_key_pair, generate_key_pair_with_rng,
    require_public_keys_equal,
};
