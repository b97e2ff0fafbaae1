// src/noyau/mathml.rs
//
// Export MathML 3.0 (présentation) : <math>, <mrow>, <mn>, <mo>, <msup>, <mfrac>.
// Chaque noeud composé est une <mrow> ; les enfants sont rendus avant l'opérateur.
// `/` : <mo>÷</mo> en ligne (défaut) ou <mfrac> selon la configuration.

use super::config::MathmlDivision;
use super::decimal::Decimal;
use super::eval::ExpressionResult;
use super::expr::{Expr, Op};
use super::format::{parens_negation, parens_operande, Cote};

const ESPACE_DE_NOMS: &str = "http://www.w3.org/1998/Math/MathML";

fn mo(s: &str) -> String {
    format!("<mo>{s}</mo>")
}

fn mrow(contenu: &str) -> String {
    format!("<mrow>{contenu}</mrow>")
}

fn nombre(v: &Decimal) -> String {
    if v.is_negative() {
        mrow(&format!("{}<mn>{}</mn>", mo("-"), v.abs()))
    } else {
        format!("<mn>{v}</mn>")
    }
}

fn grouper(s: String, parens: bool) -> String {
    if parens {
        mrow(&format!("{}{s}{}", mo("("), mo(")")))
    } else {
        s
    }
}

fn symbole(op: Op) -> &'static str {
    match op {
        Op::Add => "+",
        Op::Sub => "-",
        Op::Mul => "×",
        Op::Div => "÷",
        Op::Pow => "^",
    }
}

fn rendre(e: &Expr, division: MathmlDivision) -> String {
    match e {
        Expr::Literal(v) => nombre(v),

        Expr::Neg(x) => {
            let sx = grouper(rendre(x, division), parens_negation(x));
            mrow(&format!("{}{sx}", mo("-")))
        }

        // l'exposant est groupé par <msup> lui-même
        Expr::Binary(Op::Pow, a, b) => {
            let base = grouper(rendre(a, division), parens_operande(Op::Pow, Cote::Gauche, a));
            format!("<msup>{}{}</msup>", mrow(&base), mrow(&rendre(b, division)))
        }

        // la barre de fraction groupe numérateur et dénominateur
        Expr::Binary(Op::Div, a, b) if division == MathmlDivision::Fraction => format!(
            "<mfrac>{}{}</mfrac>",
            mrow(&rendre(a, division)),
            mrow(&rendre(b, division))
        ),

        Expr::Binary(op, a, b) => {
            let sa = grouper(rendre(a, division), parens_operande(*op, Cote::Gauche, a));
            let sb = grouper(rendre(b, division), parens_operande(*op, Cote::Droite, b));
            mrow(&format!("{sa}{}{sb}", mo(symbole(*op))))
        }
    }
}

fn envelopper(corps: String) -> String {
    format!("<math xmlns=\"{ESPACE_DE_NOMS}\">{corps}</math>")
}

/// MathML (division en ligne).
pub fn to_mathml(e: &Expr) -> String {
    to_mathml_with(e, MathmlDivision::default())
}

pub fn to_mathml_with(e: &Expr, division: MathmlDivision) -> String {
    envelopper(rendre(e, division))
}

/// Dérivation : paires (avant, après), une par étape, dans l'ordre de l'évaluation.
pub fn mathml_derivation(r: &ExpressionResult, division: MathmlDivision) -> Vec<(String, String)> {
    r.derivation()
        .map(|(avant, apres)| {
            (
                envelopper(rendre(&avant, division)),
                envelopper(rendre(&apres, division)),
            )
        })
        .collect()
}
