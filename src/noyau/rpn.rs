// src/noyau/rpn.rs
//
// AST -> notation polonaise inversée (postfix), pour la démarche.
// Le moins unaire s'écrit `neg` pour ne pas se confondre avec la soustraction.
//
// Exemple:
//   2 + 3 * 4   ->  2 3 4 * +
//   -(1 + 2)    ->  1 2 + neg

use super::expr::Expr;

/// Suite postfix des symboles (itératif : profondeur d'arbre quelconque).
pub fn to_rpn(e: &Expr) -> Vec<String> {
    enum Tache<'a> {
        Visiter(&'a Expr),
        Emettre(String),
    }

    let mut out = Vec::new();
    let mut pile = vec![Tache::Visiter(e)];

    while let Some(t) = pile.pop() {
        match t {
            Tache::Emettre(s) => out.push(s),
            Tache::Visiter(Expr::Literal(v)) => out.push(v.to_string()),
            Tache::Visiter(Expr::Neg(x)) => {
                pile.push(Tache::Emettre("neg".to_string()));
                pile.push(Tache::Visiter(x));
            }
            Tache::Visiter(Expr::Binary(op, a, b)) => {
                // ordre inverse : la pile ressort a, puis b, puis op
                pile.push(Tache::Emettre(op.symbol().to_string()));
                pile.push(Tache::Visiter(b));
                pile.push(Tache::Visiter(a));
            }
        }
    }

    out
}

pub fn format_rpn(e: &Expr) -> String {
    to_rpn(e).join(" ")
}
