use num::bigint::BigInt;
use num::rational::BigRational;
use num::{One, Signed, ToPrimitive, Zero};

/// Largest integer exponent evaluated exactly on a numeric base.
pub const MAX_EXACT_POWER: i64 = 1024;

/// Parse an integer or decimal literal ("42", "0.6") into an exact rational.
pub fn parse_number(num_str: &str) -> Option<BigRational> {
  let (int_part, frac_part) = match num_str.split_once('.') {
    Some((i, f)) => (i, f),
    None => (num_str, ""),
  };
  let digits = format!("{int_part}{frac_part}");
  let numer = digits.parse::<BigInt>().ok()?;
  let denom = num::pow(BigInt::from(10), frac_part.len());
  Some(BigRational::new(numer, denom))
}

/// Format a rational as an integer, a terminating decimal, or `a/b`.
pub fn format_number(n: &BigRational) -> String {
  if n.is_integer() {
    return n.to_integer().to_string();
  }
  match decimal_digits(n.denom()) {
    Some(places) => {
      let scaled = (n * BigRational::from_integer(num::pow(
        BigInt::from(10),
        places,
      )))
      .to_integer();
      let sign = if scaled.is_negative() { "-" } else { "" };
      let digits = scaled.abs().to_string();
      let digits = format!("{:0>width$}", digits, width = places + 1);
      let (int_part, frac_part) = digits.split_at(digits.len() - places);
      format!("{sign}{int_part}.{frac_part}")
    }
    None => format!("{}/{}", n.numer(), n.denom()),
  }
}

/// Number of decimal places needed to write `1/denom` exactly, if finite.
fn decimal_digits(denom: &BigInt) -> Option<usize> {
  let two = BigInt::from(2);
  let five = BigInt::from(5);
  let mut rest = denom.clone();
  let mut twos = 0;
  let mut fives = 0;
  while (&rest % &two).is_zero() {
    rest /= &two;
    twos += 1;
  }
  while (&rest % &five).is_zero() {
    rest /= &five;
    fives += 1;
  }
  if rest.is_one() {
    Some(twos.max(fives))
  } else {
    None
  }
}

/// Exact `base^exponent` for an integer exponent of bounded size.
/// Returns None for non-integer exponents, oversized exponents and `0^-n`.
pub fn rational_pow(
  base: &BigRational,
  exponent: &BigRational,
) -> Option<BigRational> {
  if !exponent.is_integer() {
    return None;
  }
  let e = exponent.to_integer().to_i64()?;
  if e.unsigned_abs() > MAX_EXACT_POWER.unsigned_abs() {
    return None;
  }
  if e < 0 && base.is_zero() {
    return None;
  }
  let magnitude = num::pow(base.clone(), e.unsigned_abs() as usize);
  if e < 0 {
    Some(magnitude.recip())
  } else {
    Some(magnitude)
  }
}

/// True for 0, 1, 2, ...
pub fn is_non_negative_integer(n: &BigRational) -> bool {
  n.is_integer() && !n.is_negative()
}
