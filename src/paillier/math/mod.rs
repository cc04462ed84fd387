// Réexporte les primitives arithmétiques utilisées par keygen / encrypt / decrypt

pub mod math;

pub use math::{
    l_function, gcd, mod_inverse, reduce_signed,
    random_bits, random_below, generate_prime, is_probable_prime,
    MIN_PRIME_BITS, MILLER_RABIN_ROUNDS,
};

#[cfg(test)]
pub(crate) use math::test_rng;
