use super::*;
use polydiv::{Variable, gather_all_possible_polynomials};

#[test]
fn every_polynomial_variable_gets_an_entry() {
  let info = gather("x^2 + y", false).unwrap();
  assert_eq!(info["monomials"]["x"]["2"], "1");
  assert_eq!(info["monomials"]["x"]["0"], "y");
  assert_eq!(info["monomials"]["y"]["1"], "1");
  assert_eq!(info["monomials"]["y"]["0"], "x^2");
}

#[test]
fn non_polynomial_variable_is_absent() {
  let info = gather("x + Sin[x] + y", false).unwrap();
  assert!(info["monomials"].get("x").is_none());
  assert_eq!(info["monomials"]["y"]["1"], "1");
}

#[test]
fn opaque_subterm_becomes_placeholder() {
  let info = gather("Sin[x]^2 + Sin[x]", true).unwrap();
  assert_eq!(info["replacements"]["t_1"], "Sin[x]");
  assert_eq!(info["monomials"]["t_1"]["2"], "1");
  assert_eq!(info["monomials"]["t_1"]["1"], "1");
  assert!(info["monomials"].get("x").is_none());
}

#[test]
fn without_replacement_opaque_subterm_fails() {
  let info = gather("Sin[x]^2 + Sin[x]", false).unwrap();
  assert_eq!(info["monomials"].as_object().unwrap().len(), 0);
  assert_eq!(info["replacements"].as_object().unwrap().len(), 0);
}

#[test]
fn fractional_exponents_are_keys() {
  let info = gather("x^0.6 + 2x^0.3 + 1", true).unwrap();
  assert_eq!(info["monomials"]["x"]["0.6"], "1");
  assert_eq!(info["monomials"]["x"]["0.3"], "2");
  assert_eq!(info["monomials"]["x"]["0"], "1");
}

#[test]
fn variables_follow_order_of_appearance() {
  let expr = parse_expr("b*x + a").unwrap();
  let info = gather_all_possible_polynomials(&expr, false);
  let order: Vec<&str> = info.variables().map(Variable::name).collect();
  assert_eq!(order, vec!["b", "x", "a"]);
}

#[test]
fn gathering_is_deterministic() {
  let expr = parse_expr("Sin[x]^2 + y*Sin[x] + Cos[y]").unwrap();
  let first = gather_all_possible_polynomials(&expr, true);
  let second = gather_all_possible_polynomials(&expr, true);
  assert_eq!(first.mono_info(), second.mono_info());
  assert_eq!(first.replacements(), second.replacements());
}
