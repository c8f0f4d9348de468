use num::One;
use std::collections::BTreeMap;

use super::{build_product, simplify};
use crate::syntax::{Exponent, Expr, Variable};

/// `exponent -> coefficient` for one variable: the polynomial
/// `sum(coefficient * var^exponent)`. The leading term is the last entry.
pub type MonomialMap = BTreeMap<Exponent, Expr>;

// ─── Monomial information ───────────────────────────────────────────

/// Decompose a list of additive terms into monomials of `var`.
///
/// Returns None as soon as one term is not `coefficient * var^n` with a
/// numeric `n` and a coefficient free of `var`. Coefficients are simplified
/// and exact zeros are dropped.
pub fn gather_monomial_information(
  terms: &[Expr],
  var: &Variable,
) -> Option<MonomialMap> {
  let mut powers = MonomialMap::new();
  for term in terms {
    let (exponent, coefficient) = split_monomial(term, var)?;
    match powers.remove(&exponent) {
      Some(existing) => powers.insert(exponent, existing + coefficient),
      None => powers.insert(exponent, coefficient),
    };
  }
  Some(
    powers
      .into_iter()
      .map(|(exponent, coefficient)| (exponent, simplify(coefficient)))
      .filter(|(_, coefficient)| !coefficient.is_zero())
      .collect(),
  )
}

/// Split one term into `(exponent of var, coefficient)`.
fn split_monomial(term: &Expr, var: &Variable) -> Option<(Exponent, Expr)> {
  let mut exponent = Exponent::from_integer(0.into());
  let mut coefficient = Vec::new();
  for factor in term.factors() {
    match &factor {
      Expr::Identifier(name) if name == var.name() => {
        exponent += Exponent::one();
      }
      Expr::Power {
        base,
        exponent: power,
      } if is_var(base, var) => {
        exponent += power.as_number()?;
      }
      other if !other.contains_var(var) => coefficient.push(factor.clone()),
      _ => return None,
    }
  }
  Some((exponent, build_product(coefficient)))
}

fn is_var(expr: &Expr, var: &Variable) -> bool {
  matches!(expr, Expr::Identifier(name) if name == var.name())
}

/// Polynomial degree of `expr` in `var`, if it is a polynomial in `var`.
pub fn max_power(expr: &Expr, var: &Variable) -> Option<Exponent> {
  gather_monomial_information(&expr.linear_children(), var)?
    .keys()
    .next_back()
    .cloned()
}
