use crate::functions::numeric::is_non_negative_integer;
use crate::syntax::{Expr, Variable};

// ─── Opaque subterms ────────────────────────────────────────────────

/// The smallest sub-expression that must be treated as one symbol when
/// viewing `expr` as a polynomial in `var`.
///
/// Every occurrence of `var` belongs to the outermost ancestor that is not
/// polynomial structure (a function call, or a power that is not a numeric
/// power of a bare symbol or a non-negative integer power). When all
/// occurrences belong to the same sub-expression that sub-expression is
/// returned, e.g. `Sin[x]` for `Sin[x]^2 + Sin[x]`. Otherwise, and for bare
/// polynomial occurrences, the result is `var` itself.
pub fn get_minimum_subtree(expr: &Expr, var: &Variable) -> Expr {
  let mut units = Vec::new();
  collect_atomic_units(expr, var, None, &mut units);
  match units.split_first() {
    Some((first, rest)) if rest.iter().all(|unit| unit == first) => {
      (*first).clone()
    }
    _ => var.to_expr(),
  }
}

fn collect_atomic_units<'a>(
  expr: &'a Expr,
  var: &Variable,
  unit: Option<&'a Expr>,
  out: &mut Vec<&'a Expr>,
) {
  match expr {
    Expr::Identifier(name) => {
      if name == var.name() {
        out.push(unit.unwrap_or(expr));
      }
    }
    Expr::Number(_) | Expr::Constant(_) => {}
    Expr::Plus(items) | Expr::Times(items) => {
      for item in items {
        collect_atomic_units(item, var, unit, out);
      }
    }
    Expr::Power { base, exponent } => {
      let unit = if unit.is_none() && is_polynomial_power(base, exponent) {
        None
      } else {
        Some(unit.unwrap_or(expr))
      };
      collect_atomic_units(base, var, unit, out);
      collect_atomic_units(exponent, var, unit, out);
    }
    Expr::FunctionCall { args, .. } => {
      let unit = Some(unit.unwrap_or(expr));
      for arg in args {
        collect_atomic_units(arg, var, unit, out);
      }
    }
  }
}

/// `x^n` for numeric `n`, or `(...)^k` for integer `k >= 0`.
fn is_polynomial_power(base: &Expr, exponent: &Expr) -> bool {
  match exponent.as_number() {
    Some(n) => {
      is_non_negative_integer(n) || matches!(base, Expr::Identifier(_))
    }
    None => false,
  }
}
