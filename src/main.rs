// =========================================================
// Démonstration : Entiers chiffrés Paillier
// Opérateurs homomorphes chronométrés (choix interactif)
// =========================================================

use paillier_int::{generate_key_pair, encrypt, CryptoError, EncryptedInt, PrivateKey, PublicKey};

use num_bigint::BigInt;
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ── Paramètres de la démonstration ────────────────────────
const KEY_BITS:  u64 = 256;
const THRESHOLD: i64 = i64::MAX;

// Borne des opérandes tirés au hasard (|x| <= OPERAND_BOUND)
const OPERAND_BOUND: i64 = 1_000_000;

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError et io::Error pour propager toutes les
// erreurs via ? sans conversion manuelle.
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(std::io::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    println!("\n  Génération des clés ({} bits par premier)...", KEY_BITS);
    let t = Instant::now();
    let (pk, sk) = match generate_key_pair(KEY_BITS, BigInt::from(THRESHOLD)) {
        Ok(kp) => kp,
        Err(e) => {
            eprintln!("[FATAL] Génération des clés impossible : {}", e);
            std::process::exit(1);
        }
    };
    let duree_keygen = t.elapsed();
    afficher_cles(&pk, &sk, duree_keygen);

    loop {
        if let Err(e) = afficher_menu() {
            eprintln!("[FATAL] {}", AppError::from(e));
            std::process::exit(1);
        }

        // Entrée standard fermée : on quitte au lieu de boucler sur "Choix invalide"
        let Some(choix) = lire_choix(&mut io::stdin().lock()) else {
            println!("\nAu revoir !\n");
            break;
        };

        let res = match choix.as_str() {
            "1" => scenario_reference(&pk, &sk),
            "2" => operations_aleatoires(&pk, &sk),
            "3" => { println!("\nAu revoir !\n"); break; }
            _   => { println!("\nChoix invalide. Veuillez choisir 1, 2 ou 3.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[ERREUR] {}\n", e);
        }
    }
}

// ─────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────

fn afficher_menu() -> io::Result<()> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   ENTIERS CHIFFRÉS PAILLIER — MENU            ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] Scénario de référence");
    println!("  [2] Opérations sur opérandes aléatoires");
    println!("  [3] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush()
}

// None sur fin de flux ou erreur de lecture
fn lire_choix<R: BufRead>(entree: &mut R) -> Option<String> {
    let mut input = String::new();
    match entree.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_)          => Some(input.trim().to_string()),
    }
}

fn afficher_cles(pk: &PublicKey, sk: &PrivateKey, duree: Duration) {
    println!("  Clés générées — temps : {:.3?}\n", duree);
    println!("--- CLÉ PUBLIQUE ---");
    println!("  |n|         = {} bits", pk.bits());
    println!("  |n_squared| = {} bits", pk.n_squared().bits());
    println!("  |premiers|  = {} bits", pk.length());
    println!("--- CLÉ PRIVÉE ---");
    println!("  seuil       = {}", sk.threshold());
}

fn verifier(libelle: &str, obtenu: &BigInt, attendu: &BigInt, duree: Duration) {
    let statut = if obtenu == attendu { "OK " } else { "KO " };
    println!("  [{}] {:<28} = {:>14}  ({:.3?})", statut, libelle, obtenu, duree);
}

// Chronomètre une opération homomorphe puis vérifie son déchiffrement
fn mesurer<F>(sk: &PrivateKey, libelle: &str, op: F, attendu: i64) -> Result<(), AppError>
where
    F: FnOnce() -> Result<EncryptedInt, CryptoError>,
{
    let t = Instant::now();
    let c = op()?;
    let duree = t.elapsed();
    verifier(libelle, &c.decrypt(sk)?, &BigInt::from(attendu), duree);
    Ok(())
}

// ─────────────────────────────────────────────────────────
// [1] Scénario de référence
// ─────────────────────────────────────────────────────────

fn scenario_reference(pk: &Arc<PublicKey>, sk: &PrivateKey) -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    Scénario de référence");
    println!("==============================================");

    let c100     = encrypt(pk, &BigInt::from(100))?;
    let c75      = encrypt(pk, &BigInt::from(75))?;
    let c_neg100 = encrypt(pk, &BigInt::from(-100))?;
    let c9       = encrypt(pk, &BigInt::from(9))?;

    let t = Instant::now();
    let somme = c100.add(&c75)?.decrypt(sk)?;
    verifier("D(E(100) + E(75))", &somme, &BigInt::from(175), t.elapsed());

    let t = Instant::now();
    let somme = c_neg100.add(&c75)?.decrypt(sk)?;
    verifier("D(E(-100) + E(75))", &somme, &BigInt::from(-25), t.elapsed());

    let t = Instant::now();
    let quotient = c9.div_plaintext(&BigInt::from(3))?.decrypt(sk)?;
    verifier("D(E(9) / 3)", &quotient, &BigInt::from(3), t.elapsed());

    match c9.div_plaintext(&BigInt::from(0)) {
        Err(CryptoError::DivisionByZero) => println!("  [OK ] E(9) / 0 rejeté : {}", CryptoError::DivisionByZero),
        Err(e)                           => println!("  [KO ] E(9) / 0 : erreur inattendue {}", e),
        Ok(_)                            => println!("  [KO ] E(9) / 0 accepté"),
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [2] Opérations sur opérandes aléatoires : résumé des temps
// ─────────────────────────────────────────────────────────

fn operations_aleatoires(pk: &Arc<PublicKey>, sk: &PrivateKey) -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    Opérations homomorphes — opérandes aléatoires");
    println!("==============================================");

    let mut rng = rand::thread_rng();
    let x = rng.gen_range(-OPERAND_BOUND..=OPERAND_BOUND);
    let y = rng.gen_range(-OPERAND_BOUND..=OPERAND_BOUND);
    let k = rng.gen_range(1..=100i64);
    println!("\n  x = {}, y = {}, k = {}\n", x, y, k);

    let t         = Instant::now();
    let cx        = encrypt(pk, &BigInt::from(x))?;
    let duree_enc = t.elapsed();
    let cy        = encrypt(pk, &BigInt::from(y))?;

    mesurer(sk, "x + y",         || cx.add(&cy),                             x + y)?;
    mesurer(sk, "x - y",         || cx.sub(&cy),                             x - y)?;
    mesurer(sk, "x + k (clair)", || Ok(cx.add_plaintext(&BigInt::from(k))), x + k)?;
    mesurer(sk, "x * k (clair)", || Ok(cx.mul_plaintext(&BigInt::from(k))), x * k)?;
    mesurer(sk, "(x * k) / k",   || cx.mul_plaintext(&BigInt::from(k)).div_plaintext(&BigInt::from(k)), x)?;

    let t = Instant::now();
    let _ = cx.decrypt(sk)?;
    let duree_dec = t.elapsed();

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS");
    println!("==============================================");
    println!("  Chiffrement (premier d'aveuglement inclus) : {:.3?}", duree_enc);
    println!("  Déchiffrement                              : {:.3?}", duree_dec);
    println!("==============================================");

    Ok(())
}
