// src/noyau/analyse.rs
//
// Analyse syntaxique : descente récursive par niveaux de précédence.
//
//   expression := term (('+' | '-') term)*
//   term       := unary (('*' | '/') unary)*
//   unary      := '-' unary | power
//   power      := primary ('^' unary)?        (associatif à droite)
//   primary    := NUMBER | '(' expression ')'
//
// Conséquences : 2+3*4 = 2+(3*4), 2^3^2 = 2^(3^2), -2^2 = -(2^2), 2^-1 accepté.
// Pas de récupération : la première violation est la seule erreur rendue.
//
// Deux bornes, toutes deux à `profondeur_max` :
// - imbrication des appels (parenthèses, moins unaire, exposants) ;
// - hauteur de l'arbre construit (noeuds opérateurs sur la plus longue branche),
//   pour qu'une chaîne plate `1+1+…+1` ne produise pas un arbre que les étapes
//   suivantes ne pourraient pas parcourir.

use super::config::{PROFONDEUR_MAX_DEFAUT, PROFONDEUR_PLAFOND};
use super::decimal::Decimal;
use super::erreur::{Expected, SyntaxError};
use super::expr::{Expr, Op};
use super::jetons::{Token, TokenKind};

/// Sous-arbre et sa hauteur.
type Noeud = (Expr, usize);

struct Analyseur<'a> {
    tokens: &'a [Token],
    pos: usize,
    profondeur: usize,
    profondeur_max: usize,
}

impl<'a> Analyseur<'a> {
    fn new(tokens: &'a [Token], profondeur_max: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            profondeur: 0,
            profondeur_max,
        }
    }

    fn courant(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Genre du jeton courant ; une suite tronquée se lit comme EOF.
    fn genre(&self) -> TokenKind {
        self.courant().map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Position du jeton courant (fin de la source si la suite est tronquée).
    fn position(&self) -> usize {
        match self.courant() {
            Some(t) => t.position,
            None => self
                .tokens
                .last()
                .map_or(0, |t| t.position + t.lexeme.chars().count()),
        }
    }

    fn avancer(&mut self) -> Option<&'a Token> {
        let t = self.courant();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn erreur(&self, expected: Expected) -> SyntaxError {
        SyntaxError {
            position: self.position(),
            expected,
            found: self.genre(),
        }
    }

    /// Garde-fou contre l'explosion de pile : `(((((…` ou `-----…`.
    fn entrer(&mut self) -> Result<(), SyntaxError> {
        if self.profondeur >= self.profondeur_max {
            return Err(self.erreur(Expected::NestingWithin(self.profondeur_max)));
        }
        self.profondeur += 1;
        Ok(())
    }

    fn sortir(&mut self) {
        self.profondeur -= 1;
    }

    /// Noeud opérateur au-dessus de sous-arbres de hauteur `hauteur - 1`.
    /// `operateur` : jeton de l'opérateur, désigné par l'erreur.
    fn noeud(&self, e: Expr, hauteur: usize, operateur: &Token) -> Result<Noeud, SyntaxError> {
        if hauteur > self.profondeur_max {
            return Err(SyntaxError {
                position: operateur.position,
                expected: Expected::NestingWithin(self.profondeur_max),
                found: operateur.kind,
            });
        }
        Ok((e, hauteur))
    }

    /// Jeton opérateur courant (déjà reconnu par l'appelant), puis avance.
    fn operateur(&mut self) -> Result<&'a Token, SyntaxError> {
        let erreur = self.erreur(Expected::Operand);
        self.avancer().ok_or(erreur)
    }

    fn expression(&mut self) -> Result<Noeud, SyntaxError> {
        let (mut gauche, mut h) = self.term()?;

        loop {
            let op = match self.genre() {
                TokenKind::Plus => Op::Add,
                TokenKind::Minus => Op::Sub,
                _ => break,
            };
            let jeton = self.operateur()?;
            let (droite, hd) = self.term()?;
            (gauche, h) = self.noeud(Expr::binary(op, gauche, droite), h.max(hd) + 1, jeton)?;
        }

        Ok((gauche, h))
    }

    fn term(&mut self) -> Result<Noeud, SyntaxError> {
        let (mut gauche, mut h) = self.unary()?;

        loop {
            let op = match self.genre() {
                TokenKind::Star => Op::Mul,
                TokenKind::Slash => Op::Div,
                _ => break,
            };
            let jeton = self.operateur()?;
            let (droite, hd) = self.unary()?;
            (gauche, h) = self.noeud(Expr::binary(op, gauche, droite), h.max(hd) + 1, jeton)?;
        }

        Ok((gauche, h))
    }

    fn unary(&mut self) -> Result<Noeud, SyntaxError> {
        if self.genre() != TokenKind::Minus {
            return self.power();
        }

        self.entrer()?;
        let jeton = self.operateur()?;
        let (operande, h) = self.unary()?;
        self.sortir();

        self.noeud(Expr::neg(operande), h + 1, jeton)
    }

    fn power(&mut self) -> Result<Noeud, SyntaxError> {
        let (base, hb) = self.primary()?;

        if self.genre() != TokenKind::Caret {
            return Ok((base, hb));
        }

        self.entrer()?;
        let jeton = self.operateur()?;
        // `unary` redescend dans `power` : associativité à droite
        let (exposant, he) = self.unary()?;
        self.sortir();

        self.noeud(Expr::binary(Op::Pow, base, exposant), hb.max(he) + 1, jeton)
    }

    fn primary(&mut self) -> Result<Noeud, SyntaxError> {
        match self.genre() {
            TokenKind::Number => {
                let erreur = self.erreur(Expected::Operand);
                let t = self.avancer().ok_or(erreur.clone())?;
                // le lexer a déjà validé le lexème ; on reste total quand même
                let v = Decimal::parse(&t.lexeme).ok_or(erreur)?;
                Ok((Expr::literal(v), 0))
            }

            TokenKind::LParen => {
                self.entrer()?;
                self.avancer();
                let e = self.expression()?;
                if self.genre() != TokenKind::RParen {
                    return Err(self.erreur(Expected::ClosingParen));
                }
                self.avancer();
                self.sortir();
                Ok(e)
            }

            _ => Err(self.erreur(Expected::Operand)),
        }
    }
}

/// Construit l'AST d'une suite de jetons (terminée par EOF).
pub fn parse(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    parse_with_depth(tokens, PROFONDEUR_MAX_DEFAUT)
}

/// Comme `parse`, avec une limite d'imbrication explicite (bornée à `PROFONDEUR_PLAFOND`).
pub fn parse_with_depth(tokens: &[Token], profondeur_max: usize) -> Result<Expr, SyntaxError> {
    let mut a = Analyseur::new(tokens, profondeur_max.clamp(1, PROFONDEUR_PLAFOND));
    let (e, hauteur) = a.expression()?;

    // jeton restant après une expression complète (ex: `1)` ou `2 3`)
    if a.genre() != TokenKind::Eof {
        return Err(a.erreur(Expected::EndOfInput));
    }

    log::trace!("[parser] {} noeuds, hauteur {hauteur}", e.node_count());
    Ok(e)
}
