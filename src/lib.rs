//! Calcul pas à pas : lexer, analyse par précédence, évaluation exacte
//! avec démarche complète, export LaTeX et MathML.
//!
//! ```
//! use calcul_etapes::{solve_expression, Config};
//!
//! let s = solve_expression("12 + (5 * 4) - 1", &Config::default()).unwrap();
//! assert_eq!(s.result.final_value.to_string(), "31");
//! assert_eq!(s.steps_readable[0], "5 × 4 = 20");
//! ```

pub mod noyau;

pub use noyau::*;
