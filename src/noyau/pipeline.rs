//! Noyau — pipeline complet
//!
//! source -> jetons -> AST -> (valeur, étapes) -> (LaTeX, MathML)
//!
//! Point d'entrée de la couche REST (hors noyau) : `solve_expression` pour
//! une expression texte, `solve_latex` pour du LaTeX. Chaque étape rend un
//! artefact complet ou une erreur typée ; rien n'est deviné ni réparé ici.

use super::analyse::parse_with_depth;
use super::config::Config;
use super::erreur::Error;
use super::eval::{evaluate_with, EvaluationStep, ExpressionResult};
use super::expr::Expr;
use super::format::{format_expr, format_readable};
use super::jetons::{format_tokens, tokenize};
use super::latex::{normalize_latex, to_latex_with};
use super::mathml::to_mathml_with;
use super::rpn::format_rpn;

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Expression normalisée (parenthèses minimales, relisible).
    pub expression: String,
    /// Même expression avec `×` et `÷`.
    pub readable: String,
    /// Démarche : jetons `lexème:GENRE`.
    pub tokens: String,
    /// Démarche : notation postfix.
    pub rpn: String,
    pub result: ExpressionResult,
    /// Une ligne par étape : `3 × 4 = 12`.
    pub steps_readable: Vec<String>,
    pub latex: String,
    pub mathml: String,
}

/// Ligne de démarche : `3 × 4 = 12`, `-(3) = -3`.
fn ligne_lisible(etape: &EvaluationStep) -> String {
    let avant = match &etape.reduced {
        // opérande toujours entre parenthèses : `-(3)`, `-(-2)`
        Expr::Neg(x) => format!("-({})", format_readable(x)),
        e => format_readable(e),
    };
    format!("{avant} = {}", etape.sub_expression_after)
}

/// Exécute le pipeline complet sur une expression texte.
pub fn solve_expression(source: &str, config: &Config) -> Result<Solution, Error> {
    let jetons = tokenize(source)?;
    log::debug!("[pipeline] {} jetons pour {source:?}", jetons.len());

    let ast = parse_with_depth(&jetons, config.max_depth)?;
    let expression = format_expr(&ast);
    log::debug!("[pipeline] AST : {expression}");

    let result = evaluate_with(&ast, config)?;

    let steps_readable = result.steps.iter().map(ligne_lisible).collect();

    let solution = Solution {
        readable: format_readable(&ast),
        tokens: format_tokens(&jetons),
        rpn: format_rpn(&ast),
        latex: to_latex_with(&ast, &config.latex),
        mathml: to_mathml_with(&ast, config.mathml_division),
        expression,
        steps_readable,
        result,
    };

    log::debug!(
        "[pipeline] {} étapes, valeur finale {}",
        solution.result.steps.len(),
        solution.result.final_value
    );
    Ok(solution)
}

/// Comme `solve_expression`, à partir de LaTeX (mode math).
pub fn solve_latex(source: &str, config: &Config) -> Result<Solution, Error> {
    let texte = normalize_latex(source)?;
    solve_expression(&texte, config)
}
