// src/noyau/format.rs
//
// Affichage texte de l'AST + règles de parenthésage partagées par les exports.
//
// Règle : on ne met de parenthèses que là où l'ordre de l'arbre serait perdu
// à la relecture, plus autour d'une négation à droite d'un opérateur binaire
// ou sous `^` (lisibilité : `3 - (-4)`, `(-2)^2`, `2^(-1)`).

use super::expr::{Expr, Op, PRECEDENCE_NEG};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cote {
    Gauche,
    Droite,
}

/// Faut-il grouper `operande`, placé du côté `cote` de `op` ?
pub(crate) fn parens_operande(op: Op, cote: Cote, operande: &Expr) -> bool {
    if operande.is_negation() {
        return cote == Cote::Droite || op == Op::Pow;
    }

    let p = operande.precedence();
    let p_op = op.precedence();
    match cote {
        Cote::Gauche => p < p_op || (p == p_op && op.is_right_associative()),
        Cote::Droite => p < p_op || (p == p_op && !op.is_right_associative()),
    }
}

/// Faut-il grouper l'opérande d'un moins unaire ? (`-(1 + 2)`, `-(-3)`)
pub(crate) fn parens_negation(operande: &Expr) -> bool {
    operande.precedence() <= PRECEDENCE_NEG
}

/// Notation des opérateurs à l'affichage texte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notation {
    /// `*` `/` : relisible par `tokenize`.
    Ascii,
    /// `×` `÷` : lecture humaine.
    Lisible,
}

fn symbole(op: Op, notation: Notation) -> &'static str {
    match (op, notation) {
        (Op::Mul, Notation::Lisible) => "×",
        (Op::Div, Notation::Lisible) => "÷",
        _ => op.symbol(),
    }
}

fn format_en(e: &Expr, notation: Notation) -> String {
    let groupe = |x: &Expr, parens: bool| {
        let s = format_en(x, notation);
        if parens {
            format!("({s})")
        } else {
            s
        }
    };

    match e {
        Expr::Literal(v) => v.to_string(),

        Expr::Neg(x) => format!("-{}", groupe(x, parens_negation(x))),

        Expr::Binary(op, a, b) => {
            let sa = groupe(a, parens_operande(*op, Cote::Gauche, a));
            let sb = groupe(b, parens_operande(*op, Cote::Droite, b));
            match op {
                Op::Pow => format!("{sa}^{sb}"),
                _ => format!("{sa} {} {sb}", symbole(*op, notation)),
            }
        }
    }
}

/// Forme infixe minimale, relisible : `2 + 3 * 4`, `(1 + 2) * 3`, `2^3^2`.
pub fn format_expr(e: &Expr) -> String {
    format_en(e, Notation::Ascii)
}

/// Forme lisible : `2 + 3 × 4`, `8 ÷ 2`.
pub fn format_readable(e: &Expr) -> String {
    format_en(e, Notation::Lisible)
}
