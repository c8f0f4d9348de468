use super::*;
use polydiv::{
  Expr, Variable, gather_all_possible_polynomials, get_minimum_subtree,
};

fn subtree(expr: &str, var: &str) -> String {
  let expr = parse_expr(expr).unwrap();
  get_minimum_subtree(&expr, &Variable::new(var)).to_string()
}

mod minimum_subtree {
  use super::*;

  #[test]
  fn bare_polynomial_variable() {
    assert_eq!(subtree("x^2 + 3x + 2", "x"), "x");
    assert_eq!(subtree("x^0.5 + x^-1", "x"), "x");
  }

  #[test]
  fn function_argument() {
    assert_eq!(subtree("Sin[x]^2 + Sin[x]", "x"), "Sin[x]");
    assert_eq!(subtree("Cos[x + 1]", "x"), "Cos[x + 1]");
  }

  #[test]
  fn outermost_opaque_ancestor() {
    assert_eq!(subtree("Sin[Cos[x]]^2 + 1", "x"), "Sin[Cos[x]]");
  }

  #[test]
  fn symbolic_exponent_is_opaque() {
    assert_eq!(subtree("2^x + 4^x", "x"), "x");
    assert_eq!(subtree("x^n + x^n", "x"), "x^n");
  }

  #[test]
  fn fractional_power_of_sum_is_opaque() {
    assert_eq!(subtree("(x + 1)^0.5", "x"), "(x + 1)^0.5");
  }

  #[test]
  fn mixed_occurrences_fall_back_to_variable() {
    assert_eq!(subtree("x + Sin[x]", "x"), "x");
    assert_eq!(subtree("Sin[x] + Cos[x]", "x"), "x");
  }

  #[test]
  fn absent_variable() {
    assert_eq!(subtree("y + 1", "x"), "x");
  }
}

mod placeholders {
  use super::*;

  #[test]
  fn round_trip_restores_original() {
    let expr = parse_expr("Sin[x]^2 + 2Sin[x] + Exp[y]").unwrap();
    let info = gather_all_possible_polynomials(&expr, true);

    assert_eq!(info.replacements().len(), 2);
    for (original, placeholder) in info.replacements() {
      assert_eq!(info.revert_replacements().get(placeholder), Some(original));
    }
    let substituted = info.apply_replacements(&expr);
    assert!(!substituted.contains_var(&Variable::new("x")));
    assert!(!substituted.contains_var(&Variable::new("y")));
    assert_eq!(info.revert(&substituted), expr);
  }

  #[test]
  fn shared_subterm_gets_one_placeholder() {
    let expr = parse_expr("Sin[x*y]^2 + Sin[x*y]").unwrap();
    let info = gather_all_possible_polynomials(&expr, true);

    assert_eq!(info.replacements().len(), 1);
    assert_eq!(info.revert_replacements().len(), 1);
    let placeholder = info
      .replacements()
      .get(&parse_expr("Sin[x*y]").unwrap())
      .unwrap();
    assert_eq!(placeholder, &Variable::new("t_1"));
  }

  #[test]
  fn bare_variables_are_not_wrapped() {
    let expr = parse_expr("x^2 + x*y + 1").unwrap();
    let info = gather_all_possible_polynomials(&expr, true);
    assert!(info.replacements().is_empty());
    assert!(info.revert_replacements().is_empty());
  }

  #[test]
  fn fresh_names_skip_taken_ones() {
    let taken = vec![Variable::new("t_1"), Variable::new("t_3")];
    assert_eq!(Variable::fresh(&taken), Variable::new("t_2"));
    let taken = vec![Variable::new("t_1"), Variable::new("t_2")];
    assert_eq!(Variable::fresh(&taken), Variable::new("t_3"));
    assert_eq!(Variable::fresh(&Vec::<Variable>::new()), Variable::new("t_1"));
  }

  #[test]
  fn placeholders_differ_from_free_variables() {
    let expr = parse_expr("Sin[t_1] + Cos[t_2]^2").unwrap();
    let info = gather_all_possible_polynomials(&expr, true);
    let free: Vec<Variable> = expr.vars();
    for placeholder in info.revert_replacements().keys() {
      assert!(!free.contains(placeholder));
    }
    assert_eq!(info.revert_replacements().len(), 2);
  }

  #[test]
  fn constant_only_expression() {
    let info = gather_all_possible_polynomials(&Expr::integer(7), true);
    assert!(info.replacements().is_empty());
    assert!(info.mono_info().is_empty());
  }
}
