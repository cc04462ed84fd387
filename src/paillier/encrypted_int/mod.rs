pub mod encrypted_int;

pub use encrypted_int::EncryptedInt;
