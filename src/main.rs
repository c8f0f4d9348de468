use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use serde_json::json;

use polydiv::{divide, expand, gather, simplify_str};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Log more (-v debug, -vv trace). POLYDIV_LOG overrides this.
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Divide one polynomial expression by another
  Divide {
    /// The dividend
    p: String,
    /// The divisor
    q: String,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
  },
  /// Expand products and powers and combine like terms
  Expand {
    expression: String,
  },
  /// Simplify an expression
  Simplify {
    expression: String,
    /// Stop after this many simplification passes
    #[arg(long)]
    level: Option<usize>,
  },
  /// Show the monomials of an expression for each of its variables
  Gather {
    expression: String,
    /// Do not replace opaque sub-expressions with placeholders
    #[arg(long)]
    no_replace: bool,
  },
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let default_filter = match cli.verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  env_logger::Builder::from_env(
    Env::default().filter_or("POLYDIV_LOG", default_filter),
  )
  .init();

  match cli.command {
    Commands::Divide { p, q, json } => {
      let result = divide(&p, &q)
        .with_context(|| format!("cannot divide {p} by {q}"))?;
      if json {
        let value = match result {
          Some((quotient, remainder)) => json!({
            "quotient": quotient,
            "remainder": remainder,
          }),
          None => serde_json::Value::Null,
        };
        println!("{value}");
      } else {
        match result {
          Some((quotient, remainder)) => {
            println!("quotient:  {quotient}");
            println!("remainder: {remainder}");
          }
          None => println!("not applicable"),
        }
      }
    }
    Commands::Expand { expression } => {
      println!("{}", expand(&expression).context("cannot expand")?);
    }
    Commands::Simplify { expression, level } => {
      println!(
        "{}",
        simplify_str(&expression, level).context("cannot simplify")?
      );
    }
    Commands::Gather {
      expression,
      no_replace,
    } => {
      let info = gather(&expression, !no_replace).context("cannot gather")?;
      println!("{}", serde_json::to_string_pretty(&info)?);
    }
  }
  Ok(())
}
