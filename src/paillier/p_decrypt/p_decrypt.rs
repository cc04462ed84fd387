use num_bigint::BigInt;
use num_traits::Zero;
use crate::paillier::encrypted_int::EncryptedInt;
use crate::paillier::math::l_function;
use crate::paillier::p_keygen::{require_public_keys_equal, PrivateKey};
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Déchiffrement : m = L(c^lambda mod n²) * mu  mod n
//
// Récupération du signe : m > threshold est relu comme m - n.
// [0, threshold] reste positif, (threshold, n) devient (threshold - n, 0).
// Un seuil trop petit pour les valeurs chiffrées donne un résultat faux
// sans erreur.
// ---------------------------------------------------------------------------
pub fn decrypt(sk: &PrivateKey, c: &EncryptedInt) -> Result<BigInt, CryptoError> {
    require_public_keys_equal(&c.public_key, &sk.public_key)?;

    let pk = &sk.public_key;
    if c.cipher >= pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    let c_lambda = c.cipher.modpow(&sk.lambda, &pk.n_squared);

    // c multiple de n : pas un élément de Z*_{n²}, L() n'est pas défini
    if c_lambda.is_zero() {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    let m = (l_function(&c_lambda, &pk.n) * &sk.mu) % &pk.n;

    let m = BigInt::from(m);
    if m > sk.threshold {
        Ok(m - BigInt::from(pk.n.clone()))
    } else {
        Ok(m)
    }
}
