// src/noyau/expr.rs
//
// AST exact (sans flottants).
// - Literal : nombre décimal exact
// - Binary  : opérateur binaire (ensemble fermé : + - * / ^)
// - Neg     : moins unaire
//
// Arbre strict : chaque noeud possède ses enfants (Box), pas de partage, pas de cycle.
// Aucune méthode ne modifie un arbre existant : on reconstruit ou on clone.

use super::decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "^",
        }
    }

    /// Niveau de liaison (plus grand = plus fort).
    /// Le moins unaire se place entre `* /` et `^` (voir PRECEDENCE_NEG).
    pub fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
            Op::Pow => 4,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Op::Pow)
    }
}

/// Liaison du moins unaire : `-2^2` = `-(2^2)`, `-2*3` = `(-2)*3`.
pub const PRECEDENCE_NEG: u8 = 3;

/// Liaison d'un atome (littéral positif).
pub const PRECEDENCE_ATOME: u8 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Decimal),
    Binary(Op, Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

/// Branche suivie depuis un noeud vers un enfant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branche {
    Gauche,
    Droite,
    Operande,
}

impl Expr {
    pub fn literal(v: Decimal) -> Self {
        Expr::Literal(v)
    }

    pub fn binary(op: Op, a: Expr, b: Expr) -> Self {
        Expr::Binary(op, Box::new(a), Box::new(b))
    }

    pub fn neg(x: Expr) -> Self {
        Expr::Neg(Box::new(x))
    }

    pub fn as_literal(&self) -> Option<&Decimal> {
        match self {
            Expr::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Niveau de liaison du noeud, tel qu'il apparaît à l'affichage.
    /// Un littéral négatif (issu d'une réduction) s'affiche comme un moins unaire.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Literal(v) if v.is_negative() => PRECEDENCE_NEG,
            Expr::Literal(_) => PRECEDENCE_ATOME,
            Expr::Binary(op, _, _) => op.precedence(),
            Expr::Neg(_) => PRECEDENCE_NEG,
        }
    }

    /// Vrai pour `Neg(_)` ou un littéral négatif.
    pub fn is_negation(&self) -> bool {
        self.precedence() == PRECEDENCE_NEG
    }

    /// Noeud réductible : tous ses enfants sont des littéraux.
    pub fn is_reducible(&self) -> bool {
        match self {
            Expr::Literal(_) => false,
            Expr::Binary(_, a, b) => a.as_literal().is_some() && b.as_literal().is_some(),
            Expr::Neg(x) => x.as_literal().is_some(),
        }
    }

    /// Nombre de noeuds (itératif : pas de récursion sur les gros arbres).
    pub fn node_count(&self) -> usize {
        let mut pile = vec![self];
        let mut n = 0;
        while let Some(e) = pile.pop() {
            n += 1;
            match e {
                Expr::Literal(_) => {}
                Expr::Binary(_, a, b) => {
                    pile.push(a);
                    pile.push(b);
                }
                Expr::Neg(x) => pile.push(x),
            }
        }
        n
    }

    /// Sous-arbre mutable au bout d'un chemin (None si le chemin ne colle pas à l'arbre).
    pub fn subtree_mut(&mut self, chemin: &[Branche]) -> Option<&mut Expr> {
        let mut courant = self;
        for branche in chemin {
            courant = match (courant, branche) {
                (Expr::Binary(_, a, _), Branche::Gauche) => a.as_mut(),
                (Expr::Binary(_, _, b), Branche::Droite) => b.as_mut(),
                (Expr::Neg(x), Branche::Operande) => x.as_mut(),
                _ => return None,
            };
        }
        Some(courant)
    }
}
