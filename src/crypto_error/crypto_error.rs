// ===========================================================================
// Gestion centralisée des erreurs
//
// Aucun module de la bibliothèque ne fait panic!/unwrap() : chaque condition
// fatale remonte en Err(...) et l'appelant décide quoi en faire.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Aléa ---
    /// La source d'entropie n'a pas pu fournir d'octets (premier ou facteur d'aveuglement)
    Randomness(String),

    // --- Paramètres d'entrée ---
    /// Les opérandes (ou la clé privée) ne partagent pas la même clé publique
    KeyMismatch,
    /// Le clair m est >= n
    PlaintextTooLarge,
    /// Le chiffré c est >= n²
    CiphertextOutOfRange,
    /// Division homomorphe par un scalaire nul
    DivisionByZero,
    /// Taille de premier demandée trop petite
    KeySizeTooSmall { requested: u64, minimum: u64 },

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::Randomness(msg) =>
                write!(f, "Source d'entropie indisponible : {msg}"),
            CryptoError::KeyMismatch =>
                write!(f, "Clés publiques différentes entre les opérandes"),
            CryptoError::PlaintextTooLarge =>
                write!(f, "Le clair doit être strictement inférieur à n"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n²)"),
            CryptoError::DivisionByZero =>
                write!(f, "Division par zéro"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de premier {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<rand_core::Error> for CryptoError {
    fn from(e: rand_core::Error) -> Self {
        CryptoError::Randomness(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_key_size() {
        let e = CryptoError::KeySizeTooSmall { requested: 1, minimum: 2 };
        assert_eq!(e.to_string(), "Taille de premier 1 bits insuffisante, minimum requis : 2 bits");
    }

    #[test]
    fn test_from_rand_core_error() {
        let inner = rand_core::Error::new(std::io::Error::new(std::io::ErrorKind::Other, "plus d'entropie"));
        let e: CryptoError = inner.into();
        assert!(matches!(e, CryptoError::Randomness(ref msg) if msg.contains("plus d'entropie")));
    }
}
