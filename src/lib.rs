use pest::Parser;
use pest_derive::Parser;
use serde_json::{Value, json};
use thiserror::Error;

pub mod functions;
pub mod syntax;

pub use functions::polynomial_ast::{
  DEFAULT_SIMPLIFY_LEVEL, MonomialMap, PolynomialInformation,
  expand_and_combine, gather_all_possible_polynomials,
  gather_monomial_information, get_minimum_subtree, max_power,
  polynomial_long_division,
  polynomial_quotient, polynomial_remainder, simplify, simplify_to_level,
};
pub use syntax::{Exponent, Expr, Variable, expr_to_string};

#[derive(Parser)]
#[grammar = "expr.pest"]
pub struct ExprParser;

#[derive(Error, Debug)]
pub enum ExprError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Evaluation error: {0}")]
  EvaluationError(String),
}

impl ExprParser {
  pub fn parse_program(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  ExprParser::parse_program(input)
}

/// Parse a single expression.
pub fn parse_expr(input: &str) -> Result<Expr, ExprError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ExprError::EmptyInput);
  }
  let mut pairs = parse(trimmed)?;
  let program = pairs.next().ok_or(ExprError::EmptyInput)?;
  if program.as_rule() != Rule::Program {
    return Err(ExprError::EvaluationError(format!(
      "Expected Program, got {:?}",
      program.as_rule()
    )));
  }
  syntax::pair_to_expr(program)
}

// ─── String level API ───────────────────────────────────────────────
//
// Thin wrappers used by the command line front end and the integration
// tests: parse, run one operation, print.

/// Divide `p` by `q`. `Ok(None)` means the division is not applicable.
pub fn divide(p: &str, q: &str) -> Result<Option<(String, String)>, ExprError> {
  let p = parse_expr(p)?;
  let q = parse_expr(q)?;
  Ok(
    polynomial_long_division(&p, &q)
      .map(|(quotient, remainder)| (quotient.to_string(), remainder.to_string())),
  )
}

/// Expand products and integer powers, then combine like terms.
pub fn expand(input: &str) -> Result<String, ExprError> {
  Ok(expand_and_combine(&parse_expr(input)?).to_string())
}

/// Simplify to a fixpoint, or for at most `level` passes when given.
pub fn simplify_str(
  input: &str,
  level: Option<usize>,
) -> Result<String, ExprError> {
  let expr = parse_expr(input)?;
  let simplified = match level {
    Some(level) => simplify_to_level(expr, level),
    None => simplify(expr),
  };
  Ok(simplified.to_string())
}

/// Gather per-variable monomial maps of `input` and describe them as JSON.
///
/// ```text
/// {"monomials": {"x": {"2": "1", "0": "1"}}, "replacements": {"t_1": "Sin[x]"}}
/// ```
pub fn gather(input: &str, replace_vars: bool) -> Result<Value, ExprError> {
  let expr = parse_expr(input)?;
  let info = gather_all_possible_polynomials(&expr, replace_vars);
  Ok(polynomial_information_to_json(&info))
}

pub fn polynomial_information_to_json(info: &PolynomialInformation) -> Value {
  let mut monomials = serde_json::Map::new();
  for (var, powers) in info.mono_info() {
    let mut terms = serde_json::Map::new();
    for (exponent, coefficient) in powers.iter().rev() {
      terms.insert(
        functions::numeric::format_number(exponent),
        Value::String(coefficient.to_string()),
      );
    }
    monomials.insert(var.name().to_string(), Value::Object(terms));
  }
  let mut replacements = serde_json::Map::new();
  for (placeholder, original) in info.revert_replacements() {
    replacements.insert(
      placeholder.name().to_string(),
      Value::String(original.to_string()),
    );
  }
  json!({
    "monomials": monomials,
    "replacements": replacements,
  })
}
