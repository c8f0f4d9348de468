use num::rational::BigRational;
use num::{One, Signed, Zero};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::build_product;
use crate::functions::numeric::rational_pow;
use crate::syntax::{Expr, expr_to_string};

/// Upper bound on rewrite passes for a full simplification.
pub const DEFAULT_SIMPLIFY_LEVEL: usize = 64;

// ─── Simplify ───────────────────────────────────────────────────────

/// Simplify until nothing changes (or `DEFAULT_SIMPLIFY_LEVEL` passes).
pub fn simplify(expr: Expr) -> Expr {
  simplify_to_level(expr, DEFAULT_SIMPLIFY_LEVEL)
}

/// Simplify with at most `level` bottom-up passes.
pub fn simplify_to_level(expr: Expr, level: usize) -> Expr {
  let mut current = expr;
  for _ in 0..level {
    let next = simplify_pass(&current);
    if next == current {
      break;
    }
    current = next;
  }
  current
}

fn simplify_pass(expr: &Expr) -> Expr {
  match expr {
    Expr::Number(_) | Expr::Identifier(_) | Expr::Constant(_) => expr.clone(),
    Expr::FunctionCall { name, args } => Expr::FunctionCall {
      name: name.clone(),
      args: args.iter().map(simplify_pass).collect(),
    },
    Expr::Power { base, exponent } => {
      simplify_power(simplify_pass(base), simplify_pass(exponent))
    }
    Expr::Times(items) => {
      simplify_times(items.iter().map(simplify_pass).collect())
    }
    Expr::Plus(items) => simplify_plus(items.iter().map(simplify_pass).collect()),
  }
}

fn simplify_power(base: Expr, exponent: Expr) -> Expr {
  if let Some(e) = exponent.as_number() {
    if e.is_zero() {
      return Expr::one();
    }
    if e.is_one() {
      return base;
    }
  }
  match (&base, &exponent) {
    (Expr::Number(b), _) if b.is_one() => return Expr::one(),
    (Expr::Number(b), Expr::Number(e)) => {
      if b.is_zero() && e.is_positive() {
        return Expr::zero();
      }
      if let Some(value) = rational_pow(b, e) {
        return Expr::Number(value);
      }
    }
    // (a^m)^n -> a^(m*n) for integer n; (x^2)^0.5 is not x
    (
      Expr::Power {
        base: inner,
        exponent: inner_exp,
      },
      Expr::Number(e),
    ) if e.is_integer() => {
      if let Some(m) = inner_exp.as_number() {
        return simplify_power(inner.as_ref().clone(), Expr::Number(m * e));
      }
    }
    // (a*b)^n -> a^n * b^n for integer n
    (Expr::Times(factors), Expr::Number(e)) if e.is_integer() => {
      return simplify_times(
        factors
          .iter()
          .map(|f| simplify_power(f.clone(), exponent.clone()))
          .collect(),
      );
    }
    _ => {}
  }
  Expr::power(base, exponent)
}

fn simplify_times(items: Vec<Expr>) -> Expr {
  let mut coefficient = BigRational::one();
  // base -> exponents, in order of first appearance
  let mut bases: Vec<(Expr, Vec<Expr>)> = Vec::new();
  let mut index: HashMap<Expr, usize> = HashMap::new();

  for item in items.iter().flat_map(Expr::factors) {
    let (base, exponent) = match item {
      Expr::Number(n) => {
        coefficient *= n;
        continue;
      }
      Expr::Power { base, exponent } => (*base, *exponent),
      other => (other, Expr::one()),
    };
    match index.get(&base) {
      Some(&i) => bases[i].1.push(exponent),
      None => {
        index.insert(base.clone(), bases.len());
        bases.push((base, vec![exponent]));
      }
    }
  }

  if coefficient.is_zero() {
    return Expr::zero();
  }

  let mut factors = Vec::new();
  for (base, mut exponents) in bases {
    let exponent = if exponents.len() == 1 {
      exponents.remove(0)
    } else {
      simplify_plus(exponents)
    };
    for factor in simplify_power(base, exponent).factors() {
      match factor {
        Expr::Number(n) => coefficient *= n,
        other => factors.push(other),
      }
    }
  }

  if coefficient.is_zero() {
    return Expr::zero();
  }
  factors.sort_by(factor_order);
  if factors.is_empty() {
    return Expr::Number(coefficient);
  }
  if !coefficient.is_one() {
    // c*(a + b) -> c*a + c*b
    if let [Expr::Plus(terms)] = factors.as_slice() {
      return simplify_plus(
        terms
          .iter()
          .map(|term| {
            simplify_times(vec![Expr::Number(coefficient.clone()), term.clone()])
          })
          .collect(),
      );
    }
    factors.insert(0, Expr::Number(coefficient));
  }
  build_product(factors)
}

fn simplify_plus(items: Vec<Expr>) -> Expr {
  let mut constant = BigRational::zero();
  let mut terms: Vec<(Expr, BigRational)> = Vec::new();
  let mut index: HashMap<Expr, usize> = HashMap::new();

  for item in items.iter().flat_map(Expr::linear_children) {
    let (c, rest) = match item {
      Expr::Number(n) => {
        constant += n;
        continue;
      }
      other => split_coefficient(other),
    };
    match index.get(&rest) {
      Some(&i) => terms[i].1 += c,
      None => {
        index.insert(rest.clone(), terms.len());
        terms.push((rest, c));
      }
    }
  }

  let mut built: Vec<Expr> = terms
    .into_iter()
    .filter(|(_, c)| !c.is_zero())
    .map(|(rest, c)| {
      if c.is_one() {
        rest
      } else {
        build_product(vec![Expr::Number(c), rest])
      }
    })
    .collect();
  built.sort_by(term_order);
  if !constant.is_zero() {
    built.push(Expr::Number(constant));
  }
  match built.len() {
    0 => Expr::zero(),
    1 => built.remove(0),
    _ => Expr::Plus(built),
  }
}

/// Split `c * rest` into its numeric coefficient and the rest.
fn split_coefficient(term: Expr) -> (BigRational, Expr) {
  match term {
    Expr::Times(mut items) => match items.first() {
      Some(Expr::Number(c)) => {
        let c = c.clone();
        items.remove(0);
        (c, build_product(items))
      }
      _ => (BigRational::one(), Expr::Times(items)),
    },
    other => (BigRational::one(), other),
  }
}

// ─── Canonical ordering ─────────────────────────────────────────────

/// Polynomial degree used for ordering terms, highest first.
fn degree(expr: &Expr) -> BigRational {
  match expr {
    Expr::Identifier(_) => BigRational::one(),
    Expr::Power { base, exponent } => match exponent.as_number() {
      Some(n) => n * degree(base),
      None => BigRational::zero(),
    },
    Expr::Times(items) => items.iter().map(degree).sum(),
    Expr::Plus(items) => items
      .iter()
      .map(degree)
      .max()
      .unwrap_or_else(BigRational::zero),
    _ => BigRational::zero(),
  }
}

fn rank(expr: &Expr) -> u8 {
  match expr {
    Expr::Number(_) => 0,
    Expr::Constant(_) => 1,
    Expr::Identifier(_) => 2,
    Expr::FunctionCall { .. } => 3,
    Expr::Plus(_) => 4,
    Expr::Times(_) | Expr::Power { .. } => 5,
  }
}

fn power_base(expr: &Expr) -> &Expr {
  match expr {
    Expr::Power { base, .. } => base,
    other => other,
  }
}

fn factor_order(a: &Expr, b: &Expr) -> Ordering {
  let (base_a, base_b) = (power_base(a), power_base(b));
  rank(base_a)
    .cmp(&rank(base_b))
    .then_with(|| expr_to_string(base_a).cmp(&expr_to_string(base_b)))
    .then_with(|| a.cmp(b))
}

fn term_order(a: &Expr, b: &Expr) -> Ordering {
  let (_, rest_a) = split_coefficient(a.clone());
  let (_, rest_b) = split_coefficient(b.clone());
  degree(b)
    .cmp(&degree(a))
    .then_with(|| expr_to_string(&rest_a).cmp(&expr_to_string(&rest_b)))
    .then_with(|| a.cmp(b))
}
