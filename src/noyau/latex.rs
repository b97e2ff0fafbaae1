// src/noyau/latex.rs
//
// Export LaTeX (mode math) + lecture LaTeX -> entrée du lexer.
//
// Styles :
// - Symbols : `+ - \times \div`, `a^{b}`, groupes `\left( … \right)`
// - Bare    : `+ - * / ^`, groupes `( … )` ; sortie relisible telle quelle par `tokenize`
//
// Parenthésage : mêmes règles que l'affichage texte (format.rs). En style Symbols
// l'exposant est groupé par les accolades, jamais par des parenthèses.

use super::config::{LatexOperators, LatexOptions};
use super::decimal::Decimal;
use super::erreur::LexicalError;
use super::eval::ExpressionResult;
use super::expr::{Expr, Op};
use super::format::{parens_negation, parens_operande, Cote};

/* ------------------------ Export ------------------------ */

fn nombre(v: &Decimal, options: &LatexOptions) -> String {
    let s = v.to_string();
    if options.decimal_comma && options.operators == LatexOperators::Symbols {
        s.replace('.', "{,}")
    } else {
        s
    }
}

fn grouper(s: String, parens: bool, options: &LatexOptions) -> String {
    if !parens {
        return s;
    }
    match options.operators {
        LatexOperators::Symbols => format!("\\left({s}\\right)"),
        LatexOperators::Bare => format!("({s})"),
    }
}

fn symbole(op: Op, options: &LatexOptions) -> &'static str {
    match (op, options.operators) {
        (Op::Mul, LatexOperators::Symbols) => "\\times",
        (Op::Div, LatexOperators::Symbols) => "\\div",
        _ => op.symbol(),
    }
}

fn rendre(e: &Expr, options: &LatexOptions) -> String {
    match e {
        Expr::Literal(v) => nombre(v, options),

        Expr::Neg(x) => format!("-{}", grouper(rendre(x, options), parens_negation(x), options)),

        Expr::Binary(Op::Pow, a, b) => {
            let base = grouper(rendre(a, options), parens_operande(Op::Pow, Cote::Gauche, a), options);
            match options.operators {
                LatexOperators::Symbols => format!("{base}^{{{}}}", rendre(b, options)),
                LatexOperators::Bare => {
                    let exposant =
                        grouper(rendre(b, options), parens_operande(Op::Pow, Cote::Droite, b), options);
                    format!("{base}^{exposant}")
                }
            }
        }

        Expr::Binary(op, a, b) => {
            let sa = grouper(rendre(a, options), parens_operande(*op, Cote::Gauche, a), options);
            let sb = grouper(rendre(b, options), parens_operande(*op, Cote::Droite, b), options);
            format!("{sa} {} {sb}", symbole(*op, options))
        }
    }
}

/// LaTeX (style par défaut : Symbols).
pub fn to_latex(e: &Expr) -> String {
    to_latex_with(e, &LatexOptions::default())
}

pub fn to_latex_with(e: &Expr, options: &LatexOptions) -> String {
    rendre(e, options)
}

/// Dérivation : paires (avant, après), une par étape, dans l'ordre de l'évaluation.
pub fn latex_derivation(r: &ExpressionResult, options: &LatexOptions) -> Vec<(String, String)> {
    r.derivation()
        .map(|(avant, apres)| (rendre(&avant, options), rendre(&apres, options)))
        .collect()
}

/* ------------------------ Lecture LaTeX ------------------------ */

/// Lit un groupe `{…}` à partir de `i` (qui doit pointer sur `{`).
/// Renvoie (contenu normalisé, index après `}`).
fn groupe_accolades(chars: &[char], i: usize) -> Result<(String, usize), LexicalError> {
    match chars.get(i) {
        Some('{') => {}
        Some(&c) => return Err(LexicalError::unexpected(i, c)),
        None => return Err(LexicalError::empty(i)),
    }

    let mut niveau = 0usize;
    let mut j = i;
    while let Some(&c) = chars.get(j) {
        match c {
            '{' => niveau += 1,
            '}' => {
                niveau -= 1;
                if niveau == 0 {
                    let contenu = normaliser(&chars[i + 1..j], i + 1)?;
                    return Ok((contenu, j + 1));
                }
            }
            _ => {}
        }
        j += 1;
    }

    Err(LexicalError::unexpected(i, '{'))
}

/// `decalage` : position de `chars[0]` dans la source complète (pour les erreurs).
fn normaliser(chars: &[char], decalage: usize) -> Result<String, LexicalError> {
    let mut out = String::new();
    let mut i = 0;

    let decale = |mut e: LexicalError| {
        e.position += decalage;
        e
    };

    while i < chars.len() {
        let c = chars[i];

        // séparateur décimal `{,}`
        if chars[i..].starts_with(&['{', ',', '}']) {
            out.push('.');
            i += 3;
            continue;
        }

        match c {
            '$' => i += 1,
            '{' => {
                out.push('(');
                i += 1;
            }
            '}' => {
                out.push(')');
                i += 1;
            }
            '\\' => {
                let debut = i;
                i += 1;
                let nom_debut = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let nom: String = chars[nom_debut..i].iter().collect();

                match nom.as_str() {
                    "left" | "right" => {}
                    "times" | "cdot" | "ast" => out.push('*'),
                    "div" => out.push('/'),
                    "frac" => {
                        let (num, apres) = groupe_accolades(chars, i).map_err(decale)?;
                        let (den, apres) = groupe_accolades(chars, apres).map_err(decale)?;
                        out.push_str(&format!("({num})/({den})"));
                        i = apres;
                    }
                    // espacements `\,` `\;` `\!` `\ `
                    "" if matches!(chars.get(i), Some(',' | ';' | '!' | ':' | ' ')) => i += 1,
                    _ => return Err(decale(LexicalError::unexpected(debut, '\\'))),
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// LaTeX mode math -> entrée du lexer.
///
/// Reconnu : `$`, `\left( \right)`, `\times`, `\cdot`, `\ast`, `\div`,
/// `\frac{a}{b}`, groupes `{…}`, virgule décimale `{,}`, espacements.
/// Toute autre commande : LexicalError sur la barre oblique inverse.
/// Les erreurs du lexer qui suivent portent sur la chaîne normalisée.
pub fn normalize_latex(source: &str) -> Result<String, LexicalError> {
    let chars: Vec<char> = source.chars().collect();
    let out = normaliser(&chars, 0)?;
    log::trace!("[latex] {source:?} -> {out:?}");
    Ok(out)
}
