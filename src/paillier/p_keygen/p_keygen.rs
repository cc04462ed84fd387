use std::sync::Arc;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroize;
use crate::paillier::math::{generate_prime, mod_inverse};
use crate::crypto_error::CryptoError;

// Plus petite taille de premier acceptée pour une paire de clés.
// generate_prime force les deux bits de poids fort et le bit de poids faible :
// à 5 bits il ne reste que 29 et 31, soit p1 et p2, et le facteur
// d'aveuglement (premier de la même taille) tomberait toujours sur un facteur
// de n. À 6 bits (53, 59, 61) il reste un troisième premier.
pub const MIN_KEY_BITS: u64 = 6;

// ============================================================================
// Clé publique Paillier, partagée (Arc) par la clé privée et tous les chiffrés
// ============================================================================
/// Construite uniquement par generate_key_pair : n, n² et g restent cohérents.
///
/// ```compile_fail
/// use paillier_int::PublicKey;
/// fn forger(pk: &mut PublicKey) { pk.n = Default::default(); }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// Taille en bits de chacun des deux premiers (aussi celle du facteur d'aveuglement)
    pub(crate) length:    u64,
    pub(crate) n:         BigUint,
    pub(crate) n_squared: BigUint,
    /// g = n + 1
    pub(crate) g:         BigUint,
}

impl PublicKey {
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Taille effective du module n, environ 2·length
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    // g^k mod n² sans modpow : (n+1)^k = 1 + k·n  (mod n²), termes en n² nuls
    pub fn g_pow(&self, k: &BigUint) -> BigUint {
        (BigUint::one() + k * &self.n) % &self.n_squared
    }
}

// ============================================================================
// Helper : remet un BigUint à zéro
//
// BigUint n'expose pas son tampon : set_zero() vide le vecteur de limbs sans
// écraser les anciens octets, qui restent en mémoire jusqu'à réallocation.
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    n.set_zero();
}

// ============================================================================
// Clé privée Paillier : lambda et mu remis à zéro à la destruction
// (valeur seulement, voir zeroize_biguint)
//
// lambda = (p1-1)(p2-1), mu = lambda^-1 mod n.
// threshold : tout clair déchiffré strictement supérieur est relu comme
// négatif (m - n). Stocké tel quel, sans interprétation.
// ============================================================================
#[derive(Clone, Debug)]
pub struct PrivateKey {
    pub(crate) length:     u64,
    pub(crate) public_key: Arc<PublicKey>,
    pub(crate) lambda:     BigUint,
    pub(crate) mu:         BigUint,
    pub(crate) threshold:  BigInt,
}

impl PrivateKey {
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn threshold(&self) -> &BigInt {
        &self.threshold
    }

    pub fn public_key(&self) -> &Arc<PublicKey> {
        &self.public_key
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.lambda);
        zeroize_biguint(&mut self.mu);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Génération d'une paire de clés (variante simplifiée g = n+1)
//
// (n+1)^m mod n² = 1 + m·n, donc g = n+1 est toujours un générateur valide
// et L(g^lambda mod n²) = lambda mod n : mu se réduit à lambda^-1 mod n.
//
// `bits` est la taille de chaque premier, le module fait ~2·bits bits.
// Err(KeySizeTooSmall) si bits < MIN_KEY_BITS.
// `threshold` doit dépasser le plus grand |m| que l'appelant chiffrera.
// ============================================================================
pub fn generate_key_pair(bits: u64, threshold: BigInt) -> Result<(Arc<PublicKey>, PrivateKey), CryptoError> {
    generate_key_pair_with_rng(bits, threshold, &mut OsRng)
}

pub fn generate_key_pair_with_rng<R: RngCore + CryptoRng>(
    bits: u64,
    threshold: BigInt,
    rng: &mut R,
) -> Result<(Arc<PublicKey>, PrivateKey), CryptoError> {
    if bits < MIN_KEY_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: bits,
            minimum:   MIN_KEY_BITS,
        });
    }

    let p1 = generate_prime(bits, rng)?;
    let mut p2 = generate_prime(bits, rng)?;
    while p1 == p2 {
        p2 = generate_prime(bits, rng)?;
    }

    let n         = &p1 * &p2;
    let n_squared = &n * &n;
    let g         = &n + BigUint::one();

    let lambda = (&p1 - BigUint::one()) * (&p2 - BigUint::one());
    let mu     = mod_inverse(&lambda, &n)?;

    let public_key = Arc::new(PublicKey { length: bits, n, n_squared, g });

    let private_key = PrivateKey {
        length: bits,
        public_key: Arc::clone(&public_key),
        lambda,
        mu,
        threshold,
    };

    Ok((public_key, private_key))
}

// ---------------------------------------------------------------------------
// Deux chiffrés (ou un chiffré et une clé privée) ne sont compatibles que si
// leurs clés publiques sont structurellement égales (length, n, n², g).
// ---------------------------------------------------------------------------
pub fn require_public_keys_equal(x: &PublicKey, y: &PublicKey) -> Result<(), CryptoError> {
    if x == y {
        Ok(())
    } else {
        Err(CryptoError::KeyMismatch)
    }
}
