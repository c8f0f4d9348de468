//! AST-native polynomial functions.
//!
//! Simplify, Expand, monomial extraction, opaque-subterm abstraction and
//! generalized polynomial long division.

mod coefficient;
mod expand;
mod helpers;
mod polynomial_division;
mod polynomial_information;
mod simplify;
mod subtree;

pub use coefficient::*;
pub use expand::*;
pub use helpers::*;
pub use polynomial_division::*;
pub use polynomial_information::*;
pub use simplify::*;
pub use subtree::*;
