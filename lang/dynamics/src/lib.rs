#![allow(clippy::style)]
#![allow(clippy::useless_format)]

pub mod syntax;
pub use syntax::{Loader, Options, Runtime, UnboundPolicy};
pub mod env;
pub use env::{Environment, Scope};
pub mod builtin;
mod impls;
pub mod eval;
pub use eval::*;
pub mod err;
pub use err::*;

#[cfg(test)]
mod tests;
