//! # Token Session Security
//! 
//! Key derivation and authenticated encryption for session tokens.

pub mod cipher;

pub use cipher::{CipherError, TokenCipher};
