//! Noyau — évaluation pas à pas
//!
//! Parcours post-ordre (sous-arbre gauche entièrement réduit, puis le droit, puis le noeud).
//! Chaque noeud dont les enfants sont des littéraux est réduit en une étape :
//! - valeur calculée sur les deux décimaux ;
//! - l'étape garde le chemin du noeud et le sous-arbre réécrit (un littéral).
//!
//! L'AST d'entrée n'est jamais modifié : l'export peut passer avant ou après.
//! Les arbres complets de la démarche sont reconstruits à la demande
//! (`derivation`), une étape à la fois : la mémoire reste linéaire.

use super::config::Config;
use super::decimal::Decimal;
use super::erreur::{ArithmeticError, ArithmeticErrorKind};
use super::expr::{Branche, Expr, Op};
use super::format::format_expr;

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationStep {
    /// ex: "evaluate 3 * 4", "negate 4"
    pub description: String,
    /// Sous-expression réduite, ex: "3 * 4".
    pub sub_expression_before: String,
    /// La même, en arbre (enfants littéraux).
    pub reduced: Expr,
    /// Valeur obtenue, ex: "12".
    pub sub_expression_after: String,
    /// Sous-arbre réécrit : le littéral qui remplace le noeud réduit.
    pub resulting_subtree: Expr,
    /// Chemin du noeud réduit depuis la racine.
    pub path: Vec<Branche>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionResult {
    pub ast: Expr,
    pub steps: Vec<EvaluationStep>,
    pub final_value: Decimal,
}

impl ExpressionResult {
    /// Paires (avant, après) sur l'arbre complet, dans l'ordre exact des étapes.
    pub fn derivation(&self) -> Derivation<'_> {
        Derivation {
            courant: self.ast.clone(),
            etapes: self.steps.iter(),
        }
    }

    /// Arbre complet après l'étape `index`.
    pub fn snapshot(&self, index: usize) -> Option<Expr> {
        self.derivation().nth(index).map(|(_, apres)| apres)
    }
}

/// Rejoue les étapes sur une copie de l'AST (voir `ExpressionResult::derivation`).
pub struct Derivation<'r> {
    courant: Expr,
    etapes: std::slice::Iter<'r, EvaluationStep>,
}

impl Iterator for Derivation<'_> {
    type Item = (Expr, Expr);

    fn next(&mut self) -> Option<Self::Item> {
        let etape = self.etapes.next()?;
        let avant = self.courant.clone();
        if let Some(cible) = self.courant.subtree_mut(&etape.path) {
            *cible = etape.resulting_subtree.clone();
        }
        Some((avant, self.courant.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.etapes.size_hint()
    }
}

/// Applique un opérateur à deux décimaux (dispatch exhaustif sur l'ensemble fermé).
fn appliquer(op: Op, a: &Decimal, b: &Decimal, config: &Config) -> Result<Decimal, ArithmeticErrorKind> {
    match op {
        Op::Add => Ok(a + b),
        Op::Sub => Ok(a - b),
        Op::Mul => Ok(a * b),
        Op::Div => a
            .checked_div(b, config.precision)
            .ok_or(ArithmeticErrorKind::DivisionByZero),
        Op::Pow => a.pow(b, config.precision, config.max_exponent),
    }
}

struct Evaluateur<'c> {
    config: &'c Config,
    steps: Vec<EvaluationStep>,
}

impl Evaluateur<'_> {
    fn echec(&self, kind: ArithmeticErrorKind) -> ArithmeticError {
        log::debug!("[eval] {kind:?} à l'étape {}", self.steps.len());
        ArithmeticError {
            kind,
            step_index: self.steps.len(),
            partial_steps: self.steps.clone(),
        }
    }

    /// Note la réduction du noeud au bout de `chemin`.
    fn enregistrer(&mut self, chemin: &[Branche], description: String, reduit: Expr, valeur: &Decimal) {
        let avant = format_expr(&reduit);
        let apres = valeur.to_string();
        log::trace!("[eval] #{} {avant} -> {apres}", self.steps.len());

        self.steps.push(EvaluationStep {
            description,
            sub_expression_before: avant,
            reduced: reduit,
            sub_expression_after: apres,
            resulting_subtree: Expr::literal(valeur.clone()),
            path: chemin.to_vec(),
        });
    }

    fn visiter(&mut self, noeud: &Expr, chemin: &mut Vec<Branche>) -> Result<Decimal, ArithmeticError> {
        match noeud {
            Expr::Literal(v) => Ok(v.clone()),

            Expr::Binary(op, g, d) => {
                chemin.push(Branche::Gauche);
                let a = self.visiter(g, chemin)?;
                chemin.pop();

                chemin.push(Branche::Droite);
                let b = self.visiter(d, chemin)?;
                chemin.pop();

                let v = appliquer(*op, &a, &b, self.config).map_err(|k| self.echec(k))?;

                let reduit = Expr::binary(*op, Expr::literal(a), Expr::literal(b));
                let description = format!("evaluate {}", format_expr(&reduit));
                self.enregistrer(chemin, description, reduit, &v);
                Ok(v)
            }

            Expr::Neg(x) => {
                chemin.push(Branche::Operande);
                let a = self.visiter(x, chemin)?;
                chemin.pop();

                let v = -&a;
                let description = format!("negate {}", format_expr(&Expr::literal(a.clone())));
                self.enregistrer(chemin, description, Expr::neg(Expr::literal(a)), &v);
                Ok(v)
            }
        }
    }
}

/// Évalue avec la configuration par défaut (10 chiffres significatifs).
pub fn evaluate(ast: &Expr) -> Result<ExpressionResult, ArithmeticError> {
    evaluate_with(ast, &Config::default())
}

/// Évalue un AST : valeur finale + suite ordonnée des réductions.
///
/// En cas d'erreur, l'évaluation s'arrête immédiatement ; l'erreur porte
/// les étapes déjà calculées.
pub fn evaluate_with(ast: &Expr, config: &Config) -> Result<ExpressionResult, ArithmeticError> {
    let mut ev = Evaluateur {
        config,
        steps: Vec::new(),
    };

    let mut chemin = Vec::new();
    let final_value = ev.visiter(ast, &mut chemin)?;

    log::debug!("[eval] {} étapes, valeur {final_value}", ev.steps.len());

    Ok(ExpressionResult {
        ast: ast.clone(),
        steps: ev.steps,
        final_value,
    })
}
