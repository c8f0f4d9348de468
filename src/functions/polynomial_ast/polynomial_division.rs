use log::{debug, trace, warn};

use super::{
  MonomialMap, build_div, build_monomial, build_sum, expand_and_combine,
  gather_all_possible_polynomials, simplify, simplify_to_level,
};
use crate::syntax::{Exponent, Expr};

/// Simplification passes spent on each quotient coefficient.
pub const QUOTIENT_SIMPLIFY_LEVEL: usize = 5;

/// Divide one polynomial by another:
/// <https://en.wikipedia.org/wiki/Polynomial_long_division>
///
/// Both operands may be polynomials in an opaque sub-expression
/// (`Sin[x]^2 - 1` by `Sin[x] + 1`) and may use fractional exponents
/// (`x^0.6 + 2*x^0.3 + 1` by `x^0.3 + 1`). The division runs in the first
/// variable, in order of appearance in the dividend, in which both operands
/// are polynomials. That is the first common variable, not necessarily the
/// best one.
///
/// Returns `(quotient, remainder)` where the remainder is already divided by
/// `q`, so `p / q == quotient + remainder`. Returns None when either operand has
/// no variables, when there is no common polynomial variable, or when the
/// degree of `p` is below the degree of `q`.
///
/// A dividend whose exponents are all non-positive is only caught by the
/// degree check; the result is otherwise unspecified.
pub fn polynomial_long_division(p: &Expr, q: &Expr) -> Option<(Expr, Expr)> {
  if !p.has_vars() || !q.has_vars() {
    debug!("no variables to find a polynomial in: {} / {}", p, q);
    return None;
  }

  // Gather placeholders over p + q so both sides share them
  let replacement_info =
    gather_all_possible_polynomials(&(p.clone() + q.clone()), true);
  let p = replacement_info.apply_replacements(p);
  let q = replacement_info.apply_replacements(q);

  let mono_p = gather_all_possible_polynomials(&expand_and_combine(&p), false);
  let mono_q = gather_all_possible_polynomials(&expand_and_combine(&q), false);

  let Some(poly_var) = mono_p
    .variables()
    .find(|var| mono_q.monomials(var).is_some())
    .cloned()
  else {
    debug!("no common polynomial variable in {} and {}", p, q);
    return None;
  };
  let mut powers_p = mono_p.into_monomials(&poly_var)?;
  let powers_q = mono_q.into_monomials(&poly_var)?;

  let (mut max_pow_p, mut max_val_p) = leading_term(&powers_p)?;
  let (max_pow_q, max_val_q) = leading_term(&powers_q)?;

  if max_pow_p < max_pow_q {
    debug!(
      "degree {} of dividend is below degree {} of divisor in {}",
      max_pow_p, max_pow_q, poly_var
    );
    return None;
  }
  debug!("dividing in {}", poly_var);

  let mut result = MonomialMap::new();
  while max_pow_p >= max_pow_q {
    let delta_pow = &max_pow_p - &max_pow_q;
    let delta_mul = max_val_p.clone() / max_val_q.clone();
    trace!("quotient term ({}) * {}^{}", delta_mul, poly_var, delta_pow);
    if let Some(previous) = result.insert(delta_pow.clone(), delta_mul.clone())
    {
      warn!(
        "quotient coefficient of {}^{} overwritten (was {})",
        poly_var, delta_pow, previous
      );
    }

    // Subtract delta_mul * var^delta_pow * q
    for (pow_q, coeff_q) in &powers_q {
      // Exact rational addition; long chains of fractional exponents can
      // still produce keys that never cancel.
      let new_pow = &delta_pow + pow_q;
      let subtrahend = delta_mul.clone() * coeff_q.clone();
      let updated = match powers_p.remove(&new_pow) {
        Some(existing) => simplify(existing - subtrahend),
        None => simplify(-subtrahend),
      };
      if !updated.is_zero() {
        powers_p.insert(new_pow, updated);
      }
    }
    powers_p.remove(&max_pow_p);

    match leading_term(&powers_p) {
      Some((pow, val)) => {
        max_pow_p = pow;
        max_val_p = val;
      }
      None => break,
    }
  }

  // Whatever is left of p and not zero stays over q
  let leftover = simplify(build_sum(
    powers_p
      .iter()
      .rev()
      .filter_map(|(pow, coeff)| {
        let simplified = simplify(coeff.clone());
        (!simplified.is_zero())
          .then(|| build_monomial(&simplified, &poly_var, pow))
      })
      .collect(),
  ));
  let remainder = build_div(&leftover, &q);

  let quotient = build_sum(
    result
      .iter()
      .rev()
      .filter_map(|(pow, coeff)| {
        let simplified =
          simplify_to_level(coeff.clone(), QUOTIENT_SIMPLIFY_LEVEL);
        (!simplified.is_zero())
          .then(|| build_monomial(&simplified, &poly_var, pow))
      })
      .collect(),
  );

  Some((
    replacement_info.revert(&quotient),
    replacement_info.revert(&remainder),
  ))
}

/// PolynomialQuotient - the quotient of [`polynomial_long_division`].
pub fn polynomial_quotient(p: &Expr, q: &Expr) -> Option<Expr> {
  polynomial_long_division(p, q).map(|(quotient, _)| quotient)
}

/// PolynomialRemainder - the remainder of [`polynomial_long_division`],
/// expressed over `q`.
pub fn polynomial_remainder(p: &Expr, q: &Expr) -> Option<Expr> {
  polynomial_long_division(p, q).map(|(_, remainder)| remainder)
}

fn leading_term(powers: &MonomialMap) -> Option<(Exponent, Expr)> {
  powers
    .iter()
    .next_back()
    .map(|(pow, coeff)| (pow.clone(), coeff.clone()))
}
