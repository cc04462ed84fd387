use std::sync::Arc;
use num_bigint::{BigInt, Sign};
use rand_core::{CryptoRng, OsRng, RngCore};
use crate::paillier::encrypted_int::EncryptedInt;
use num_traits::One;
use crate::paillier::math::{gcd, generate_prime, reduce_signed};
use crate::paillier::p_keygen::PublicKey;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Chiffrement Paillier : c = g^m * r^n  mod n²
//
// m peut être négatif : il est réduit dans [0, n) avant exponentiation,
// le déchiffrement le relit comme négatif s'il dépasse le seuil.
// Err(CryptoError::PlaintextTooLarge) si m >= n.
//
// ATTENTION : r est tiré comme un PREMIER de pk.length bits, pas comme un
// élément quelconque de Z*_n. C'est un cas particulier (coûteux) de
// gcd(r, n) = 1, conservé tel quel ; voir DESIGN.md. Le tirage est refait
// si r tombe sur p1 ou p2 (seul cas où gcd(r, n) != 1, probable pour de
// petites clés).
// ---------------------------------------------------------------------------
pub fn encrypt(pk: &Arc<PublicKey>, m: &BigInt) -> Result<EncryptedInt, CryptoError> {
    encrypt_with_rng(pk, m, &mut OsRng)
}

pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
    pk: &Arc<PublicKey>,
    m: &BigInt,
    rng: &mut R,
) -> Result<EncryptedInt, CryptoError> {
    if m.sign() == Sign::Plus && m.magnitude() >= &pk.n {
        return Err(CryptoError::PlaintextTooLarge);
    }

    let r = loop {
        let candidate = generate_prime(pk.length, rng)?;
        if gcd(&candidate, &pk.n).is_one() {
            break candidate;
        }
    };

    let g_m = pk.g_pow(&reduce_signed(m, &pk.n));
    let r_n = r.modpow(&pk.n, &pk.n_squared);
    let cipher = (&g_m * &r_n) % &pk.n_squared;

    Ok(EncryptedInt {
        cipher,
        public_key: Arc::clone(pk),
    })
}
