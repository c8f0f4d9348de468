use num::rational::BigRational;
use num::{One, Signed, Zero};
use pest::iterators::Pair;
use std::collections::HashSet;
use std::fmt;

use crate::{ExprError, Rule};
use crate::functions::numeric::{format_number, parse_number};

/// Exponent of a monomial: exact, totally ordered, may be fractional,
/// zero or negative.
pub type Exponent = BigRational;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
  Number(BigRational),
  Identifier(String),
  Constant(String),
  Plus(Vec<Expr>),
  Times(Vec<Expr>),
  Power {
    base: Box<Expr>,
    exponent: Box<Expr>,
  },
  FunctionCall {
    name: String,
    args: Vec<Expr>,
  },
}

/// A free variable of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
  pub fn new(name: impl Into<String>) -> Self {
    Variable(name.into())
  }

  pub fn name(&self) -> &str {
    &self.0
  }

  pub fn to_expr(&self) -> Expr {
    Expr::Identifier(self.0.clone())
  }

  /// The first of `t_1`, `t_2`, ... that is not in `existing`.
  pub fn fresh<'a, I>(existing: I) -> Self
  where
    I: IntoIterator<Item = &'a Variable>,
  {
    let taken: HashSet<&str> =
      existing.into_iter().map(|v| v.name()).collect();
    let mut index = 1usize;
    loop {
      let candidate = format!("t_{index}");
      if !taken.contains(candidate.as_str()) {
        return Variable(candidate);
      }
      index += 1;
    }
  }
}

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Expr {
  pub fn integer(n: i64) -> Self {
    Expr::Number(BigRational::from_integer(n.into()))
  }

  pub fn zero() -> Self {
    Expr::integer(0)
  }

  pub fn one() -> Self {
    Expr::integer(1)
  }

  pub fn power(base: Expr, exponent: Expr) -> Self {
    Expr::Power {
      base: Box::new(base),
      exponent: Box::new(exponent),
    }
  }

  /// Exact zero literal. Does not simplify.
  pub fn is_zero(&self) -> bool {
    matches!(self, Expr::Number(n) if n.is_zero())
  }

  pub fn is_one(&self) -> bool {
    matches!(self, Expr::Number(n) if n.is_one())
  }

  pub fn as_number(&self) -> Option<&BigRational> {
    match self {
      Expr::Number(n) => Some(n),
      _ => None,
    }
  }

  /// Free variables, in order of first appearance.
  pub fn vars(&self) -> Vec<Variable> {
    let mut out = Vec::new();
    self.collect_vars(&mut out);
    out
  }

  fn collect_vars(&self, out: &mut Vec<Variable>) {
    match self {
      Expr::Identifier(name) => {
        if !out.iter().any(|v| v.name() == name) {
          out.push(Variable::new(name.clone()));
        }
      }
      Expr::Number(_) | Expr::Constant(_) => {}
      Expr::Plus(items) | Expr::Times(items) => {
        items.iter().for_each(|e| e.collect_vars(out))
      }
      Expr::Power { base, exponent } => {
        base.collect_vars(out);
        exponent.collect_vars(out);
      }
      Expr::FunctionCall { args, .. } => {
        args.iter().for_each(|e| e.collect_vars(out))
      }
    }
  }

  pub fn has_vars(&self) -> bool {
    match self {
      Expr::Identifier(_) => true,
      Expr::Number(_) | Expr::Constant(_) => false,
      Expr::Plus(items) | Expr::Times(items) => items.iter().any(Expr::has_vars),
      Expr::Power { base, exponent } => base.has_vars() || exponent.has_vars(),
      Expr::FunctionCall { args, .. } => args.iter().any(Expr::has_vars),
    }
  }

  pub fn contains_var(&self, var: &Variable) -> bool {
    match self {
      Expr::Identifier(name) => name == var.name(),
      Expr::Number(_) | Expr::Constant(_) => false,
      Expr::Plus(items) | Expr::Times(items) => {
        items.iter().any(|e| e.contains_var(var))
      }
      Expr::Power { base, exponent } => {
        base.contains_var(var) || exponent.contains_var(var)
      }
      Expr::FunctionCall { args, .. } => {
        args.iter().any(|e| e.contains_var(var))
      }
    }
  }

  /// Replace every node for which `lookup` returns a value. Matching is
  /// top-down and simultaneous: a replaced node is not visited again.
  pub fn substitute_with<F>(&self, lookup: &F) -> Expr
  where
    F: Fn(&Expr) -> Option<Expr>,
  {
    if let Some(replacement) = lookup(self) {
      return replacement;
    }
    match self {
      Expr::Number(_) | Expr::Identifier(_) | Expr::Constant(_) => {
        self.clone()
      }
      Expr::Plus(items) => {
        Expr::Plus(items.iter().map(|e| e.substitute_with(lookup)).collect())
      }
      Expr::Times(items) => {
        Expr::Times(items.iter().map(|e| e.substitute_with(lookup)).collect())
      }
      Expr::Power { base, exponent } => Expr::power(
        base.substitute_with(lookup),
        exponent.substitute_with(lookup),
      ),
      Expr::FunctionCall { name, args } => Expr::FunctionCall {
        name: name.clone(),
        args: args.iter().map(|e| e.substitute_with(lookup)).collect(),
      },
    }
  }

  /// Top-level additive terms. A non-sum is a single term.
  pub fn linear_children(&self) -> Vec<Expr> {
    match self {
      Expr::Plus(items) => items.iter().flat_map(Expr::linear_children).collect(),
      _ => vec![self.clone()],
    }
  }

  /// Top-level multiplicative factors. A non-product is a single factor.
  pub fn factors(&self) -> Vec<Expr> {
    match self {
      Expr::Times(items) => items.iter().flat_map(Expr::factors).collect(),
      _ => vec![self.clone()],
    }
  }
}

// ─── Arithmetic ─────────────────────────────────────────────────────
//
// The operators only build nodes. Sums and products are flattened, nothing
// else is rewritten; use `simplify` for that.

impl std::ops::Add for Expr {
  type Output = Expr;

  fn add(self, rhs: Expr) -> Expr {
    let mut items = match self {
      Expr::Plus(items) => items,
      other => vec![other],
    };
    match rhs {
      Expr::Plus(more) => items.extend(more),
      other => items.push(other),
    }
    Expr::Plus(items)
  }
}

impl std::ops::Mul for Expr {
  type Output = Expr;

  fn mul(self, rhs: Expr) -> Expr {
    let mut items = match self {
      Expr::Times(items) => items,
      other => vec![other],
    };
    match rhs {
      Expr::Times(more) => items.extend(more),
      other => items.push(other),
    }
    Expr::Times(items)
  }
}

impl std::ops::Neg for Expr {
  type Output = Expr;

  fn neg(self) -> Expr {
    match self {
      Expr::Number(n) => Expr::Number(-n),
      other => Expr::integer(-1) * other,
    }
  }
}

impl std::ops::Sub for Expr {
  type Output = Expr;

  fn sub(self, rhs: Expr) -> Expr {
    self + (-rhs)
  }
}

impl std::ops::Div for Expr {
  type Output = Expr;

  fn div(self, rhs: Expr) -> Expr {
    self * Expr::power(rhs, Expr::integer(-1))
  }
}

// ─── Parsing ────────────────────────────────────────────────────────

/// Convert a parsed pair into an expression tree. Numeric literals are
/// folded while building so that `x^(1/2)` and `x^-1` carry numeric
/// exponents.
pub fn pair_to_expr(pair: Pair<Rule>) -> Result<Expr, ExprError> {
  let rule = pair.as_rule();
  match rule {
    Rule::Program => {
      let inner = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::Expression)
        .ok_or(ExprError::EmptyInput)?;
      pair_to_expr(inner)
    }
    Rule::Expression => {
      let mut terms = Vec::new();
      let mut negate_next = false;
      for p in pair.into_inner() {
        match p.as_rule() {
          Rule::AddOp => negate_next = p.as_str() == "-",
          _ => {
            let term = pair_to_expr(p)?;
            terms.push(if negate_next { -term } else { term });
            negate_next = false;
          }
        }
      }
      match terms.len() {
        0 => Err(missing(rule)),
        1 => Ok(terms.remove(0)),
        _ => Ok(Expr::Plus(terms)),
      }
    }
    Rule::Term => {
      let mut factors = Vec::new();
      let mut divide_next = false;
      for p in pair.into_inner() {
        match p.as_rule() {
          Rule::MulOp => divide_next = p.as_str() == "/",
          _ => {
            let factor = pair_to_expr(p)?;
            factors.push(if divide_next {
              reciprocal(factor)
            } else {
              factor
            });
            divide_next = false;
          }
        }
      }
      if factors.is_empty() {
        return Err(missing(rule));
      }
      Ok(fold_numeric_factors(factors))
    }
    Rule::ImplicitFactor | Rule::Group => {
      pair_to_expr(pair.into_inner().next().ok_or_else(|| missing(rule))?)
    }
    Rule::Unary => {
      let mut negations = 0usize;
      let mut operand = None;
      for p in pair.into_inner() {
        match p.as_rule() {
          Rule::Minus => negations += 1,
          _ => operand = Some(pair_to_expr(p)?),
        }
      }
      let operand = operand.ok_or_else(|| missing(rule))?;
      Ok(if negations % 2 == 1 { -operand } else { operand })
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = pair_to_expr(inner.next().ok_or_else(|| missing(rule))?)?;
      match inner.next() {
        Some(exponent) => Ok(Expr::power(base, pair_to_expr(exponent)?)),
        None => Ok(base),
      }
    }
    Rule::PowerExponent => {
      let mut negate = false;
      let mut operand = None;
      for p in pair.into_inner() {
        match p.as_rule() {
          Rule::Minus => negate = true,
          _ => operand = Some(pair_to_expr(p)?),
        }
      }
      let operand = operand.ok_or_else(|| missing(rule))?;
      Ok(if negate { -operand } else { operand })
    }
    Rule::FunctionCall => {
      let mut inner = pair.into_inner();
      let name = inner
        .next()
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| missing(rule))?;
      let args = inner.map(pair_to_expr).collect::<Result<Vec<_>, _>>()?;
      Ok(match (name.as_str(), args.as_slice()) {
        ("Sqrt", [arg]) => Expr::power(
          arg.clone(),
          Expr::Number(BigRational::new(1.into(), 2.into())),
        ),
        _ => Expr::FunctionCall { name, args },
      })
    }
    Rule::Number => parse_number(pair.as_str())
      .map(Expr::Number)
      .ok_or_else(|| {
        ExprError::EvaluationError(format!(
          "invalid number literal {}",
          pair.as_str()
        ))
      }),
    Rule::Constant => Ok(Expr::Constant(pair.as_str().to_string())),
    Rule::Identifier => Ok(Expr::Identifier(pair.as_str().to_string())),
    _ => Err(ExprError::EvaluationError(format!(
      "{:?} is not an expression: {}",
      rule,
      pair.as_str()
    ))),
  }
}

fn missing(rule: Rule) -> ExprError {
  ExprError::EvaluationError(format!("{rule:?} without operand"))
}

fn reciprocal(expr: Expr) -> Expr {
  match expr {
    Expr::Number(n) if !n.is_zero() => Expr::Number(n.recip()),
    other => Expr::power(other, Expr::integer(-1)),
  }
}

/// Multiply the numeric literals of a product into one leading factor.
fn fold_numeric_factors(factors: Vec<Expr>) -> Expr {
  let mut coefficient = BigRational::one();
  let mut rest = Vec::new();
  let mut saw_number = false;
  for factor in factors {
    match factor {
      Expr::Number(n) => {
        coefficient *= n;
        saw_number = true;
      }
      other => rest.push(other),
    }
  }
  if saw_number && (rest.is_empty() || !coefficient.is_one()) {
    rest.insert(0, Expr::Number(coefficient));
  }
  match rest.len() {
    0 => Expr::one(),
    1 => rest.remove(0),
    _ => Expr::Times(rest),
  }
}

// ─── Printing ───────────────────────────────────────────────────────

pub fn expr_to_string(expr: &Expr) -> String {
  match expr {
    Expr::Number(n) => format_number(n),
    Expr::Identifier(name) | Expr::Constant(name) => name.clone(),
    Expr::Plus(items) => plus_to_string(items),
    Expr::Times(items) => times_to_string(items),
    Expr::Power { base, exponent } => power_to_string(base, exponent),
    Expr::FunctionCall { name, args } => {
      let parts: Vec<String> = args.iter().map(expr_to_string).collect();
      format!("{}[{}]", name, parts.join(", "))
    }
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&expr_to_string(self))
  }
}

fn plus_to_string(items: &[Expr]) -> String {
  if items.is_empty() {
    return "0".to_string();
  }
  let mut out = String::new();
  for (i, item) in items.iter().enumerate() {
    let (negative, magnitude) = split_sign(item);
    let text = match &magnitude {
      Expr::Plus(_) => format!("({})", expr_to_string(&magnitude)),
      other => expr_to_string(other),
    };
    match (i, negative) {
      (0, true) => {
        out.push('-');
        out.push_str(&text);
      }
      (0, false) => out.push_str(&text),
      (_, true) => {
        out.push_str(" - ");
        out.push_str(&text);
      }
      (_, false) => {
        out.push_str(" + ");
        out.push_str(&text);
      }
    }
  }
  out
}

/// Split a leading negative numeric coefficient off a term.
fn split_sign(term: &Expr) -> (bool, Expr) {
  match term {
    Expr::Number(n) if n.is_negative() => (true, Expr::Number(-n)),
    Expr::Times(items) => match items.first() {
      Some(Expr::Number(n)) if n.is_negative() => {
        let magnitude = -n;
        let mut rest: Vec<Expr> = items[1..].to_vec();
        if !magnitude.is_one() || rest.is_empty() {
          rest.insert(0, Expr::Number(magnitude));
        }
        let rest = if rest.len() == 1 {
          rest.remove(0)
        } else {
          Expr::Times(rest)
        };
        (true, rest)
      }
      _ => (false, term.clone()),
    },
    _ => (false, term.clone()),
  }
}

fn times_to_string(items: &[Expr]) -> String {
  if items.is_empty() {
    return "1".to_string();
  }
  let (negative, magnitude) = split_sign(&Expr::Times(items.to_vec()));
  if negative {
    let text = match &magnitude {
      Expr::Plus(_) => format!("({})", expr_to_string(&magnitude)),
      other => expr_to_string(other),
    };
    return format!("-{text}");
  }

  let mut numerator = Vec::new();
  let mut denominator = Vec::new();
  for item in items {
    match item {
      Expr::Power { base, exponent } => match exponent.as_number() {
        Some(n) if n.is_negative() => {
          let positive = -n;
          if positive.is_one() {
            denominator.push(base.as_ref().clone());
          } else {
            denominator
              .push(Expr::power(base.as_ref().clone(), Expr::Number(positive)));
          }
        }
        _ => numerator.push(item.clone()),
      },
      _ => numerator.push(item.clone()),
    }
  }

  let numerator_text = if numerator.is_empty() {
    "1".to_string()
  } else {
    join_factors(&numerator)
  };
  if denominator.is_empty() {
    return numerator_text;
  }
  let denominator_text = if denominator.len() == 1 {
    factor_to_string(&denominator[0])
  } else {
    format!("({})", join_factors(&denominator))
  };
  let numerator_text = if numerator.len() > 1 {
    format!("({numerator_text})")
  } else {
    numerator_text
  };
  format!("{numerator_text}/{denominator_text}")
}

fn join_factors(factors: &[Expr]) -> String {
  factors
    .iter()
    .map(factor_to_string)
    .collect::<Vec<_>>()
    .join("*")
}

fn factor_to_string(factor: &Expr) -> String {
  match factor {
    Expr::Plus(_) | Expr::Times(_) => format!("({})", expr_to_string(factor)),
    Expr::Number(n) if !n.is_integer() && !format_number(n).contains('.') => {
      format!("({})", format_number(n))
    }
    Expr::Number(n) if n.is_negative() => format!("({})", format_number(n)),
    _ => expr_to_string(factor),
  }
}

fn power_to_string(base: &Expr, exponent: &Expr) -> String {
  let base_text = match base {
    Expr::Plus(_) | Expr::Times(_) | Expr::Power { .. } => {
      format!("({})", expr_to_string(base))
    }
    Expr::Number(n) if n.is_negative() || !n.is_integer() => {
      format!("({})", format_number(n))
    }
    _ => expr_to_string(base),
  };
  let exponent_text = match exponent {
    Expr::Number(n) if !n.is_negative() && !format_number(n).contains('/') => {
      format_number(n)
    }
    Expr::Identifier(_) | Expr::Constant(_) | Expr::FunctionCall { .. } => {
      expr_to_string(exponent)
    }
    _ => format!("({})", expr_to_string(exponent)),
  };
  format!("{base_text}^{exponent_text}")
}
