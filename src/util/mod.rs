#![warn(missing_docs)]

#[cfg(test)]
pub mod counted;
pub mod panic;
pub mod result;
