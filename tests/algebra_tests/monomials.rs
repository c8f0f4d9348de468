use super::*;
use num::rational::BigRational;
use polydiv::{MonomialMap, Variable, gather_monomial_information, max_power};

fn monomials(expr: &str, var: &str) -> Option<MonomialMap> {
  let expr = parse_expr(expr).unwrap();
  gather_monomial_information(&expr.linear_children(), &Variable::new(var))
}

fn exp(numer: i64, denom: i64) -> BigRational {
  BigRational::new(numer.into(), denom.into())
}

fn coefficient(powers: &MonomialMap, numer: i64, denom: i64) -> String {
  powers[&exp(numer, denom)].to_string()
}

#[test]
fn integer_polynomial() {
  let powers = monomials("x^2 + 3x + 2", "x").unwrap();
  assert_eq!(powers.len(), 3);
  assert_eq!(coefficient(&powers, 2, 1), "1");
  assert_eq!(coefficient(&powers, 1, 1), "3");
  assert_eq!(coefficient(&powers, 0, 1), "2");
}

#[test]
fn like_terms_are_summed() {
  let powers = monomials("x + 2x + x^2 - x^2", "x").unwrap();
  assert_eq!(powers.len(), 1);
  assert_eq!(coefficient(&powers, 1, 1), "3");
}

#[test]
fn symbolic_coefficients() {
  let powers = monomials("a*x^2 + b*x + c", "x").unwrap();
  assert_eq!(coefficient(&powers, 2, 1), "a");
  assert_eq!(coefficient(&powers, 1, 1), "b");
  assert_eq!(coefficient(&powers, 0, 1), "c");

  let powers = monomials("a*x^2 + b*x + c", "a").unwrap();
  assert_eq!(coefficient(&powers, 1, 1), "x^2");
  assert_eq!(coefficient(&powers, 0, 1), "b*x + c");
}

#[test]
fn fractional_and_negative_exponents() {
  let powers = monomials("x^0.6 + 2x^0.3 + x^-1", "x").unwrap();
  assert_eq!(coefficient(&powers, 3, 5), "1");
  assert_eq!(coefficient(&powers, 3, 10), "2");
  assert_eq!(coefficient(&powers, -1, 1), "1");
  assert_eq!(powers.keys().next_back(), Some(&exp(3, 5)));
}

#[test]
fn repeated_factor_adds_exponents() {
  let powers = monomials("x*x^2*y", "x").unwrap();
  assert_eq!(coefficient(&powers, 3, 1), "y");
}

#[test]
fn not_a_polynomial() {
  assert_eq!(monomials("Sin[x] + 1", "x"), None);
  assert_eq!(monomials("x^y", "x"), None);
  assert_eq!(monomials("(x + 1)^2", "x"), None);
}

#[test]
fn variable_absent_gives_constant_term() {
  let powers = monomials("y + 1", "x").unwrap();
  assert_eq!(coefficient(&powers, 0, 1), "y + 1");
}

#[test]
fn degree() {
  let x = Variable::new("x");
  let expr = parse_expr("3x^5 + x^0.5").unwrap();
  assert_eq!(max_power(&expr, &x), Some(exp(5, 1)));
  assert_eq!(max_power(&parse_expr("Sin[x]").unwrap(), &x), None);
}
