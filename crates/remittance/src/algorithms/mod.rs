//! # Algorithms Module
//!
//! Puzzle hashing, instance address derivation and fee arithmetic.

pub mod fees;
pub mod puzzle;

pub use fees::{minimum_deposit, split_fee};
pub use puzzle::{derive_instance_address, generate_puzzle, generate_random_secret, puzzle_hash};
