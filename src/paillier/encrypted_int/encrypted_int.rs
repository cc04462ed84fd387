use std::sync::Arc;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use crate::paillier::math::{mod_inverse, reduce_signed};
use crate::paillier::p_decrypt::decrypt;
use crate::paillier::p_keygen::{require_public_keys_equal, PrivateKey, PublicKey};
use crate::crypto_error::CryptoError;

// ============================================================================
// Entier chiffré Paillier
//
// cipher ∈ [0, n²), public_key désigne l'espace de clés du chiffré.
// Chaque opérateur emprunte ses opérandes et renvoie un NOUVEL EncryptedInt
// portant la clé publique de l'opérande gauche : aucun opérande n'est muté.
// ============================================================================
/// Les champs ne sont pas modifiables hors de la crate : `new` est le seul
/// chemin, et il vérifie cipher < n².
///
/// ```compile_fail
/// use paillier_int::EncryptedInt;
/// fn forger(c: &mut EncryptedInt) { c.cipher = Default::default(); }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInt {
    pub(crate) cipher:     BigUint,
    pub(crate) public_key: Arc<PublicKey>,
}

impl EncryptedInt {
    /// Reconstruit un chiffré reçu d'ailleurs. Err(CiphertextOutOfRange) si cipher >= n².
    pub fn new(cipher: BigUint, public_key: Arc<PublicKey>) -> Result<Self, CryptoError> {
        if cipher >= public_key.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        Ok(EncryptedInt { cipher, public_key })
    }

    pub fn cipher(&self) -> &BigUint {
        &self.cipher
    }

    pub fn public_key(&self) -> &Arc<PublicKey> {
        &self.public_key
    }

    pub fn decrypt(&self, sk: &PrivateKey) -> Result<BigInt, CryptoError> {
        decrypt(sk, self)
    }

    fn with_cipher(&self, cipher: BigUint) -> Self {
        EncryptedInt {
            cipher,
            public_key: Arc::clone(&self.public_key),
        }
    }

    // -----------------------------------------------------------------------
    // E(x) · E(y) mod n²  =  E(x + y)
    // -----------------------------------------------------------------------
    pub fn add(&self, other: &EncryptedInt) -> Result<Self, CryptoError> {
        require_public_keys_equal(&self.public_key, &other.public_key)?;

        let n_squared = &self.public_key.n_squared;
        Ok(self.with_cipher((&self.cipher * &other.cipher) % n_squared))
    }

    // -----------------------------------------------------------------------
    // E(x) · E(y)^-1 mod n²  =  E(x - y), avec E(y)^-1 = E(y)^(n-1)
    // -----------------------------------------------------------------------
    pub fn sub(&self, other: &EncryptedInt) -> Result<Self, CryptoError> {
        require_public_keys_equal(&self.public_key, &other.public_key)?;

        let neg_other = other.mul_plaintext(&BigInt::from(-1));
        let n_squared = &self.public_key.n_squared;
        Ok(self.with_cipher((&self.cipher * &neg_other.cipher) % n_squared))
    }

    // -----------------------------------------------------------------------
    // E(x) · g^k mod n²  =  E(x + k)
    // -----------------------------------------------------------------------
    pub fn add_plaintext(&self, k: &BigInt) -> Self {
        let pk = &self.public_key;
        let g_k = pk.g_pow(&reduce_signed(k, &pk.n));
        self.with_cipher((&self.cipher * &g_k) % &pk.n_squared)
    }

    // -----------------------------------------------------------------------
    // E(x)^k mod n²  =  E(x · k)
    // -----------------------------------------------------------------------
    pub fn mul_plaintext(&self, k: &BigInt) -> Self {
        let pk = &self.public_key;
        let exponent = reduce_signed(k, &pk.n);
        self.with_cipher(self.cipher.modpow(&exponent, &pk.n_squared))
    }

    // -----------------------------------------------------------------------
    // E(x)^(k^-1 mod n) mod n²  =  E(x / k)
    //
    // Exact uniquement si k divise x. Sinon le résultat est un chiffré
    // valide de x·k^-1 mod n, sans rapport avec x / k, et rien ne le
    // signale : c'est à l'appelant de garantir la divisibilité.
    // -----------------------------------------------------------------------
    pub fn div_plaintext(&self, k: &BigInt) -> Result<Self, CryptoError> {
        if k.is_zero() {
            return Err(CryptoError::DivisionByZero);
        }

        let pk = &self.public_key;
        let k_inv = mod_inverse(&reduce_signed(k, &pk.n), &pk.n)?;
        Ok(self.with_cipher(self.cipher.modpow(&k_inv, &pk.n_squared)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_encrypt::encrypt;
    use crate::paillier::p_keygen::generate_key_pair;
    use std::thread;

    fn key_pair() -> (Arc<PublicKey>, PrivateKey) {
        generate_key_pair(256, BigInt::from(i64::MAX)).unwrap()
    }

    fn enc(pk: &Arc<PublicKey>, m: i64) -> EncryptedInt {
        encrypt(pk, &BigInt::from(m)).unwrap()
    }

    fn operands() -> Vec<(i64, i64)> {
        vec![
            (100, 75),
            (20, 0),
            (20, 21),
            (75, 100),
            (-100, 75),
            (100, -75),
            (-100, -75),
        ]
    }

    fn div_operands() -> Vec<(i64, i64)> {
        vec![
            (4, 2),
            (100, 25),
            (9, 3),
            (-9, 3),
            (9, -3),
            (-9, -3),
            (15, 1),
        ]
    }

    #[test]
    fn test_add() {
        let (pk, sk) = key_pair();
        for (x, y) in operands() {
            let sum = enc(&pk, x).add(&enc(&pk, y)).unwrap();
            assert_eq!(sum.decrypt(&sk).unwrap(), BigInt::from(x + y), "{x} + {y}");
        }
    }

    #[test]
    fn test_add_key_mismatch() {
        let (pk1, _) = key_pair();
        let (pk2, _) = key_pair();
        let res = enc(&pk1, -100).add(&enc(&pk2, -75));
        assert_eq!(res, Err(CryptoError::KeyMismatch));
    }

    #[test]
    fn test_sub() {
        let (pk, sk) = key_pair();
        for (x, y) in operands() {
            let diff = enc(&pk, x).sub(&enc(&pk, y)).unwrap();
            assert_eq!(diff.decrypt(&sk).unwrap(), BigInt::from(x - y), "{x} - {y}");
        }
    }

    #[test]
    fn test_sub_key_mismatch() {
        let (pk1, _) = key_pair();
        let (pk2, _) = key_pair();
        let res = enc(&pk1, 20).sub(&enc(&pk2, 21));
        assert_eq!(res, Err(CryptoError::KeyMismatch));
    }

    #[test]
    fn test_add_plaintext() {
        let (pk, sk) = key_pair();
        for (x, y) in operands() {
            let sum = enc(&pk, x).add_plaintext(&BigInt::from(y));
            assert_eq!(sum.decrypt(&sk).unwrap(), BigInt::from(x + y), "{x} + {y}");
        }
    }

    #[test]
    fn test_mul_plaintext() {
        let (pk, sk) = key_pair();
        for (x, y) in operands() {
            let prod = enc(&pk, x).mul_plaintext(&BigInt::from(y));
            assert_eq!(prod.decrypt(&sk).unwrap(), BigInt::from(x * y), "{x} * {y}");
        }
    }

    #[test]
    fn test_div_plaintext() {
        let (pk, sk) = key_pair();
        for (x, y) in div_operands() {
            let quotient = enc(&pk, x).div_plaintext(&BigInt::from(y)).unwrap();
            assert_eq!(quotient.decrypt(&sk).unwrap(), BigInt::from(x / y), "{x} / {y}");
        }
    }

    #[test]
    fn test_div_plaintext_by_zero() {
        let (pk, _) = key_pair();
        let res = enc(&pk, 9).div_plaintext(&BigInt::from(0));
        assert_eq!(res, Err(CryptoError::DivisionByZero));
    }

    #[test]
    fn test_div_plaintext_not_invertible() {
        let (pk, _) = key_pair();
        let n = BigInt::from(pk.n.clone());
        let res = enc(&pk, 9).div_plaintext(&n);
        assert_eq!(res, Err(CryptoError::NoModularInverse));
    }

    #[test]
    fn test_div_plaintext_inexact_is_silent() {
        // 10 / 3 ne donne pas 3 : x·3^-1 mod n, relu hors de la plage attendue
        let (pk, sk) = key_pair();
        let res = enc(&pk, 10).div_plaintext(&BigInt::from(3)).unwrap();
        assert_ne!(res.decrypt(&sk).unwrap(), BigInt::from(3));
    }

    #[test]
    fn test_scenario_256_bits() {
        let (pk, sk) = key_pair();

        let sum = enc(&pk, 100).add(&enc(&pk, 75)).unwrap();
        assert_eq!(sum.decrypt(&sk).unwrap(), BigInt::from(175));

        let sum = enc(&pk, -100).add(&enc(&pk, 75)).unwrap();
        assert_eq!(sum.decrypt(&sk).unwrap(), BigInt::from(-25));

        let quotient = enc(&pk, 9).div_plaintext(&BigInt::from(3)).unwrap();
        assert_eq!(quotient.decrypt(&sk).unwrap(), BigInt::from(3));

        assert_eq!(
            enc(&pk, 9).div_plaintext(&BigInt::from(0)),
            Err(CryptoError::DivisionByZero)
        );
    }

    #[test]
    fn test_chained_operations() {
        // ((3·x + 5) - y) / 2 avec x = -7, y = 12  →  -14
        let (pk, sk) = key_pair();
        let x = enc(&pk, -7);
        let y = enc(&pk, 12);
        let res = x
            .mul_plaintext(&BigInt::from(3))
            .add_plaintext(&BigInt::from(5))
            .sub(&y)
            .unwrap()
            .div_plaintext(&BigInt::from(2))
            .unwrap();
        assert_eq!(res.decrypt(&sk).unwrap(), BigInt::from(-14));
    }

    #[test]
    fn test_operands_untouched() {
        let (pk, sk) = key_pair();
        let x = enc(&pk, 40);
        let y = enc(&pk, 2);
        let (x0, y0) = (x.clone(), y.clone());

        let _ = x.add(&y).unwrap();
        let _ = x.sub(&y).unwrap();
        let _ = x.add_plaintext(&BigInt::from(1));
        let _ = x.mul_plaintext(&BigInt::from(3));
        let _ = x.div_plaintext(&BigInt::from(2)).unwrap();

        assert_eq!(x, x0);
        assert_eq!(y, y0);
        assert_eq!(x.decrypt(&sk).unwrap(), BigInt::from(40));
    }

    #[test]
    fn test_results_stay_in_range_and_share_key() {
        let (pk, _) = key_pair();
        let x = enc(&pk, 123);
        let y = enc(&pk, -45);
        let results = [
            x.add(&y).unwrap(),
            x.sub(&y).unwrap(),
            x.add_plaintext(&BigInt::from(-1000)),
            x.mul_plaintext(&BigInt::from(-2)),
            x.div_plaintext(&BigInt::from(41)).unwrap(),
        ];
        for r in &results {
            assert!(r.cipher() < &pk.n_squared);
            assert!(Arc::ptr_eq(r.public_key(), &pk));
        }
    }

    #[test]
    fn test_new_checks_range() {
        let (pk, _) = key_pair();
        let c = enc(&pk, 5);
        let rebuilt = EncryptedInt::new(c.cipher.clone(), Arc::clone(&pk)).unwrap();
        assert_eq!(rebuilt, c);

        let res = EncryptedInt::new(pk.n_squared.clone(), Arc::clone(&pk));
        assert_eq!(res, Err(CryptoError::CiphertextOutOfRange));

        let res = EncryptedInt::new(pk.n_squared() + BigUint::from(1u32), Arc::clone(&pk));
        assert_eq!(res, Err(CryptoError::CiphertextOutOfRange));
    }

    #[test]
    fn test_equal_key_copies_are_compatible() {
        // Égalité structurelle : une copie indépendante de la clé reste compatible
        let (pk, sk) = key_pair();
        let copy = Arc::new(pk.as_ref().clone());
        let x = enc(&pk, 8);
        let y = enc(&copy, 9);
        assert_eq!(x.add(&y).unwrap().decrypt(&sk).unwrap(), BigInt::from(17));
    }

    #[test]
    fn test_concurrent_use_of_shared_keys() {
        let (pk, sk) = key_pair();
        let sk = Arc::new(sk);

        let handles: Vec<_> = (0..4i64).map(|i| {
            let pk = Arc::clone(&pk);
            let sk = Arc::clone(&sk);
            thread::spawn(move || {
                let a = enc(&pk, i * 10);
                let b = enc(&pk, -i);
                let sum = a.add(&b).unwrap();
                assert_eq!(sum.decrypt(&sk).unwrap(), BigInt::from(i * 9));
            })
        }).collect();

        for h in handles { h.join().unwrap(); }
    }
}
