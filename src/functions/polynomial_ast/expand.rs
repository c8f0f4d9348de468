use num::ToPrimitive;

use super::{build_sum, is_sum, simplify};
use crate::syntax::Expr;

/// Largest integer power of a sum that Expand multiplies out.
pub const MAX_EXPAND_POWER: i64 = 1024;

// ─── Expand ─────────────────────────────────────────────────────────

/// Expand an expression and combine like terms.
pub fn expand_and_combine(expr: &Expr) -> Expr {
  simplify(expand_expr(expr))
}

/// Recursively expand an expression. Function arguments are left alone.
pub fn expand_expr(expr: &Expr) -> Expr {
  match expr {
    Expr::Number(_)
    | Expr::Identifier(_)
    | Expr::Constant(_)
    | Expr::FunctionCall { .. } => expr.clone(),

    Expr::Plus(items) => build_sum(
      items
        .iter()
        .flat_map(|item| expand_expr(item).linear_children())
        .collect(),
    ),

    Expr::Times(items) => {
      let mut result = Expr::one();
      for item in items {
        result = combine(distribute_product(&result, &expand_expr(item)));
      }
      result
    }

    Expr::Power { base, exponent } => {
      let base = expand_expr(base);
      let exponent = expand_expr(exponent);
      // (sum)^n where n is a small positive integer
      if let Some(n) = small_integer_power(&exponent) {
        if is_sum(&base) {
          return expand_power(&base, n);
        }
      }
      Expr::power(base, exponent)
    }
  }
}

fn small_integer_power(exponent: &Expr) -> Option<i64> {
  let n = exponent.as_number()?;
  if !n.is_integer() {
    return None;
  }
  let n = n.to_integer().to_i64()?;
  (2..=MAX_EXPAND_POWER).contains(&n).then_some(n)
}

/// Distribute the product of two expanded expressions.
/// If either is a sum, produce all cross-products.
pub fn distribute_product(left: &Expr, right: &Expr) -> Expr {
  let left_terms = left.linear_children();
  let right_terms = right.linear_children();

  if left_terms.len() == 1 && right_terms.len() == 1 {
    // Neither is a sum, just multiply
    return multiply_terms(&left_terms[0], &right_terms[0]);
  }

  let mut result_terms = Vec::with_capacity(left_terms.len() * right_terms.len());
  for l in &left_terms {
    for r in &right_terms {
      result_terms.push(multiply_terms(l, r));
    }
  }
  build_sum(result_terms)
}

fn multiply_terms(left: &Expr, right: &Expr) -> Expr {
  if left.is_one() {
    return right.clone();
  }
  if right.is_one() {
    return left.clone();
  }
  left.clone() * right.clone()
}

/// Expand (sum)^n by repeated distribution.
pub fn expand_power(base: &Expr, n: i64) -> Expr {
  let mut result = Expr::one();
  for _ in 0..n {
    // Combine like terms to keep the expression manageable
    result = combine(distribute_product(&result, base));
  }
  result
}

fn combine(expr: Expr) -> Expr {
  if is_sum(&expr) {
    simplify(expr)
  } else {
    expr
  }
}
