use log::debug;
use std::collections::HashMap;

use super::{MonomialMap, gather_monomial_information, get_minimum_subtree};
use crate::syntax::{Expr, Variable};

/// Per-variable monomial decompositions of one expression, together with
/// the placeholder tables used to hide opaque sub-expressions.
///
/// `replacements` and `revert_replacements` are inverse maps. They are only
/// written through [`PolynomialInformation::add_replacement`], which keeps
/// both sides in step.
#[derive(Debug, Clone, Default)]
pub struct PolynomialInformation {
  mono_info: Vec<(Variable, MonomialMap)>,
  replacements: HashMap<Expr, Variable>,
  revert_replacements: HashMap<Variable, Expr>,
}

impl PolynomialInformation {
  pub fn new() -> Self {
    Self::default()
  }

  /// Successful decompositions, in the order the variables were visited.
  pub fn mono_info(&self) -> &[(Variable, MonomialMap)] {
    &self.mono_info
  }

  pub fn variables(&self) -> impl Iterator<Item = &Variable> {
    self.mono_info.iter().map(|(var, _)| var)
  }

  pub fn monomials(&self, var: &Variable) -> Option<&MonomialMap> {
    self
      .mono_info
      .iter()
      .find(|(v, _)| v == var)
      .map(|(_, powers)| powers)
  }

  /// Move the decomposition for `var` out, for exclusive mutation.
  pub fn into_monomials(self, var: &Variable) -> Option<MonomialMap> {
    self
      .mono_info
      .into_iter()
      .find(|(v, _)| v == var)
      .map(|(_, powers)| powers)
  }

  pub fn replacements(&self) -> &HashMap<Expr, Variable> {
    &self.replacements
  }

  pub fn revert_replacements(&self) -> &HashMap<Variable, Expr> {
    &self.revert_replacements
  }

  /// Register a placeholder for `value` and return it. A value that is
  /// already mapped keeps its placeholder. A new placeholder avoids
  /// `existing_vars` and every placeholder handed out before.
  pub fn add_replacement(
    &mut self,
    existing_vars: &[Variable],
    value: Expr,
  ) -> Variable {
    if let Some(variable) = self.replacements.get(&value) {
      return variable.clone();
    }
    let variable = Variable::fresh(
      existing_vars.iter().chain(self.revert_replacements.keys()),
    );
    debug!("placeholder {} stands for {}", variable, value);
    self.replacements.insert(value.clone(), variable.clone());
    self.revert_replacements.insert(variable.clone(), value);
    variable
  }

  /// Record the decomposition for `variable`; a failed extraction is
  /// dropped.
  pub fn add_mono_info(
    &mut self,
    variable: Variable,
    powers: Option<MonomialMap>,
  ) {
    let Some(powers) = powers else {
      return;
    };
    match self.mono_info.iter_mut().find(|(v, _)| *v == variable) {
      Some((_, existing)) => *existing = powers,
      None => self.mono_info.push((variable, powers)),
    }
  }

  /// Replace every registered opaque sub-expression by its placeholder.
  pub fn apply_replacements(&self, expr: &Expr) -> Expr {
    if self.replacements.is_empty() {
      return expr.clone();
    }
    expr.substitute_with(&|e: &Expr| {
      self.replacements.get(e).map(Variable::to_expr)
    })
  }

  /// Restore the original sub-expressions behind placeholders.
  pub fn revert(&self, expr: &Expr) -> Expr {
    if self.revert_replacements.is_empty() {
      return expr.clone();
    }
    expr.substitute_with(&|e: &Expr| match e {
      Expr::Identifier(name) => self
        .revert_replacements
        .get(&Variable::new(name.clone()))
        .cloned(),
      _ => None,
    })
  }
}

// ─── Gathering ──────────────────────────────────────────────────────

/// Decompose `expr` into monomials for every variable it is a polynomial in.
///
/// With `replace_vars`, opaque sub-expressions (see [`get_minimum_subtree`])
/// are first swapped for fresh placeholders in one simultaneous pass, so the
/// result may describe `expr` as a polynomial in a placeholder.
pub fn gather_all_possible_polynomials(
  expr: &Expr,
  replace_vars: bool,
) -> PolynomialInformation {
  let mut res = PolynomialInformation::new();

  let substituted;
  let expr = if replace_vars {
    let vars = expr.vars();
    for var in &vars {
      let subtree = get_minimum_subtree(expr, var);
      if subtree != var.to_expr() {
        res.add_replacement(&vars, subtree);
      }
    }
    substituted = res.apply_replacements(expr);
    &substituted
  } else {
    expr
  };

  // Treat each variable as if it were the only argument of P(x)
  let children = expr.linear_children();
  for var in expr.vars() {
    let powers = gather_monomial_information(&children, &var);
    if powers.is_none() {
      debug!("{} is not a polynomial in {}", expr, var);
    }
    res.add_mono_info(var, powers);
  }
  res
}
