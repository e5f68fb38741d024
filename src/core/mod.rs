// src/core/mod.rs

pub mod enumerator;
pub mod finder;
pub mod types;
pub mod window;
