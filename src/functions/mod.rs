// Functions are organized by categories
pub mod numeric;
pub mod polynomial_ast;
