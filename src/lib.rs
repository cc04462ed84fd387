// Déclaration des modules
pub mod crypto_error;
pub mod paillier;

pub use crate::paillier::math;
pub use crate::paillier::p_keygen;
pub use crate::paillier::p_encrypt;
pub use crate::paillier::p_decrypt;
pub use crate::paillier::encrypted_int;

// Clés et génération
pub use p_keygen::{PublicKey, PrivateKey, generate_key_pair, generate_key_pair_with_rng};

// Chiffrement / déchiffrement
pub use p_encrypt::{encrypt, encrypt_with_rng};
pub use p_decrypt::decrypt;

// Entier chiffré et opérateurs homomorphes
pub use encrypted_int::EncryptedInt;

// Erreur centralisée
pub use crypto_error::CryptoError;
