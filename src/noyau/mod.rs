//! Noyau de calcul pas à pas
//!
//! Organisation interne :
//! - jetons.rs   : lexer (automate fini sur les nombres) + positions
//! - analyse.rs  : descente récursive par précédence -> AST
//! - expr.rs     : AST (littéral décimal, binaire, moins unaire) + chemins
//! - decimal.rs  : décimaux exacts (BigRational à développement fini) + arrondi
//! - eval.rs     : réduction post-ordre, une étape par noeud, instantanés
//! - format.rs   : affichage texte + parenthésage partagé par les exports
//! - latex.rs    : export LaTeX + lecture LaTeX
//! - mathml.rs   : export MathML 3.0 (présentation)
//! - rpn.rs      : démarche en notation postfix
//! - erreur.rs   : erreurs typées par étape (lexicale, syntaxique, arithmétique)
//! - config.rs   : précision, bornes, styles d'export
//! - pipeline.rs : source -> artefacts complets

pub mod analyse;
pub mod config;
pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod latex;
pub mod mathml;
pub mod pipeline;
pub mod rpn;


#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use analyse::{parse, parse_with_depth};
pub use config::{Config, LatexOperators, LatexOptions, MathmlDivision, PROFONDEUR_PLAFOND};
pub use decimal::{Decimal, DECIMALES_EXPOSANT_MAX};
pub use erreur::{
    ArithmeticError, ArithmeticErrorKind, Error, Expected, LexicalError, LexicalErrorKind,
    SyntaxError,
};
pub use eval::{evaluate, evaluate_with, Derivation, EvaluationStep, ExpressionResult};
pub use expr::{Branche, Expr, Op};
pub use format::{format_expr, format_readable};
pub use jetons::{format_tokens, tokenize, Token, TokenKind};
pub use latex::{latex_derivation, normalize_latex, to_latex, to_latex_with};
pub use mathml::{mathml_derivation, to_mathml, to_mathml_with};
pub use pipeline::{solve_expression, solve_latex, Solution};
pub use rpn::{format_rpn, to_rpn};
