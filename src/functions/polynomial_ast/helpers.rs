use num::{One, Zero};

use crate::syntax::{Exponent, Expr, Variable};

// ─── Helper functions for building expressions ─────────────────────

/// Build a sum from parts, flattening nested sums.
pub fn build_sum(terms: Vec<Expr>) -> Expr {
  let mut flat: Vec<Expr> = terms
    .into_iter()
    .flat_map(|t| match t {
      Expr::Plus(items) => items,
      other => vec![other],
    })
    .collect();
  match flat.len() {
    0 => Expr::zero(),
    1 => flat.remove(0),
    _ => Expr::Plus(flat),
  }
}

/// Build a product from parts, flattening nested products.
pub fn build_product(factors: Vec<Expr>) -> Expr {
  let mut flat: Vec<Expr> = factors
    .into_iter()
    .flat_map(|f| match f {
      Expr::Times(items) => items,
      other => vec![other],
    })
    .collect();
  match flat.len() {
    0 => Expr::one(),
    1 => flat.remove(0),
    _ => Expr::Times(flat),
  }
}

/// Build a division expression
pub fn build_div(a: &Expr, b: &Expr) -> Expr {
  if a.is_zero() {
    return Expr::zero();
  }
  if b.is_one() {
    return a.clone();
  }
  a.clone() / b.clone()
}

/// Build `coefficient * var^exponent`, dropping unit factors and exponents.
pub fn build_monomial(
  coefficient: &Expr,
  var: &Variable,
  exponent: &Exponent,
) -> Expr {
  if exponent.is_zero() {
    return coefficient.clone();
  }
  let var_part = if exponent.is_one() {
    var.to_expr()
  } else {
    Expr::power(var.to_expr(), Expr::Number(exponent.clone()))
  };
  if coefficient.is_one() {
    var_part
  } else {
    build_product(vec![coefficient.clone(), var_part])
  }
}

/// Check if an expression is a sum (Plus).
pub fn is_sum(expr: &Expr) -> bool {
  matches!(expr, Expr::Plus(_))
}
