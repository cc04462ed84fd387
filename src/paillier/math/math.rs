use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;

// Plus petite taille de premier qu'on sait produire (p = 3 pour 2 bits)
pub const MIN_PRIME_BITS: u64 = 2;

// Nombre de témoins Miller-Rabin par candidat
pub const MILLER_RABIN_ROUNDS: u32 = 20;

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251,
];

// Fonction L(u) = (u-1)/n, division entière exacte quand u = 1 mod n
pub fn l_function(u: &BigUint, n: &BigUint) -> BigUint {
    (u - BigUint::one()) / n
}

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

// ---------------------------------------------------------------------------
// Réduit un entier signé dans [0, n).
//
// Les clairs et scalaires négatifs passent par ici avant tout modpow :
// g = n+1 est d'ordre n dans Z*_{n²}, donc g^k = g^(k mod n).
// ---------------------------------------------------------------------------
pub fn reduce_signed(k: &BigInt, n: &BigUint) -> BigUint {
    let r = k.magnitude() % n;
    if k.sign() == Sign::Minus && !r.is_zero() {
        n - r
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// Tirage de `nbits` bits aléatoires.
//
// Passe par try_fill_bytes : une panne d'entropie remonte en
// CryptoError::Randomness au lieu de paniquer dans OsRng::fill_bytes.
// Le tampon est effacé après usage (il contient des facteurs secrets).
// ---------------------------------------------------------------------------
pub fn random_bits<R: RngCore + ?Sized>(rng: &mut R, nbits: u64) -> Result<BigUint, CryptoError> {
    if nbits == 0 {
        return Ok(BigUint::zero());
    }

    let nbytes = ((nbits + 7) / 8) as usize;
    let mut buf = vec![0u8; nbytes];
    rng.try_fill_bytes(&mut buf)?;

    // Big-endian : les bits en trop sont en tête du premier octet
    let excess = nbytes as u64 * 8 - nbits;
    buf[0] &= 0xFFu8 >> excess;

    let value = BigUint::from_bytes_be(&buf);
    buf.zeroize();
    Ok(value)
}

/// Entier uniforme dans [0, bound) par rejet. `bound` doit être > 0.
pub fn random_below<R: RngCore + ?Sized>(rng: &mut R, bound: &BigUint) -> Result<BigUint, CryptoError> {
    let nbits = bound.bits();
    loop {
        let candidate = random_bits(rng, nbits)?;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

// ---------------------------------------------------------------------------
// Génère un premier aléatoire d'exactement `nbits` bits.
//
// Les deux bits de poids fort sont forcés à 1 : le produit de deux
// premiers de `nbits` bits a alors exactement 2·nbits bits.
// Le bit de poids faible est forcé à 1 (candidat impair).
// ---------------------------------------------------------------------------
pub fn generate_prime<R: RngCore + ?Sized>(nbits: u64, rng: &mut R) -> Result<BigUint, CryptoError> {
    if nbits < MIN_PRIME_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum:   MIN_PRIME_BITS,
        });
    }

    loop {
        let mut candidate = random_bits(rng, nbits)?;
        candidate.set_bit(nbits - 1, true);
        candidate.set_bit(nbits - 2, true);
        candidate.set_bit(0, true);

        if has_small_factor(&candidate) {
            continue;
        }

        if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS, rng)? {
            debug_assert_eq!(candidate.bits(), nbits);
            return Ok(candidate);
        }
    }
}

// Vrai si n est divisible par un petit premier autre que lui-même
fn has_small_factor(n: &BigUint) -> bool {
    for &sp in SMALL_PRIMES {
        let bp = BigUint::from(sp);
        if n == &bp {
            return false;
        }
        if (n % &bp).is_zero() {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Test de Miller-Rabin avec `rounds` témoins tirés dans [2, n-2].
// ---------------------------------------------------------------------------
pub fn is_probable_prime<R: RngCore + ?Sized>(n: &BigUint, rounds: u32, rng: &mut R) -> Result<bool, CryptoError> {
    let two = BigUint::from(2u32);
    if n < &two { return Ok(false); }
    if n == &two || n == &BigUint::from(3u32) { return Ok(true); }
    if n.is_even() { return Ok(false); }
    if SMALL_PRIMES.iter().any(|&p| n == &BigUint::from(p)) {
        return Ok(true);
    }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    // n >= 5 ici, donc n - 3 >= 2
    let witness_span = n - BigUint::from(3u32);

    'witness: for _ in 0..rounds {
        let a = random_below(rng, &witness_span)? + &two;
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a,n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    let (g, x) = extended_gcd(a, n);
    if !g.is_one() {
        return Err(CryptoError::NoModularInverse);
    }
    Ok(reduce_signed(&x, n))
}

// Retourne (gcd(a, b), s) avec a·s + b·t = gcd(a, b)
fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r, old_s)
}
