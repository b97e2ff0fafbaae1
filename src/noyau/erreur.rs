// src/noyau/erreur.rs
//
// Erreurs structurées du noyau.
// Aucun message “joli” ici : Display ne fait que reprendre les champs.
// La couche REST (hors noyau) se charge des messages utilisateur.

use super::eval::EvaluationStep;
use super::jetons::TokenKind;

/* ------------------------ Lexique ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexicalErrorKind {
    UnexpectedCharacter,
    /// Deux points décimaux, ou point sans chiffre après.
    MalformedNumber,
    EmptyInput,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("lexical error ({kind:?}) at {position}: {character:?}")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    /// Position (en caractères) dans la source.
    pub position: usize,
    /// None pour une entrée vide.
    pub character: Option<char>,
}

impl LexicalError {
    pub fn unexpected(position: usize, character: char) -> Self {
        Self {
            kind: LexicalErrorKind::UnexpectedCharacter,
            position,
            character: Some(character),
        }
    }

    pub fn malformed_number(position: usize, character: char) -> Self {
        Self {
            kind: LexicalErrorKind::MalformedNumber,
            position,
            character: Some(character),
        }
    }

    pub fn empty(position: usize) -> Self {
        Self {
            kind: LexicalErrorKind::EmptyInput,
            position,
            character: None,
        }
    }
}

/* ------------------------ Syntaxe ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expected {
    /// Nombre, `(` ou `-`.
    Operand,
    ClosingParen,
    EndOfInput,
    /// Imbrication au-delà de la limite configurée.
    NestingWithin(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at {position}: expected {expected:?}, found {found:?}")]
pub struct SyntaxError {
    pub position: usize,
    pub expected: Expected,
    pub found: TokenKind,
}

/* ------------------------ Arithmétique ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticErrorKind {
    DivisionByZero,
    /// Base négative, exposant non entier.
    ComplexResult,
    /// Exposant ou résultat hors des garde-fous.
    Overflow,
}

/// Erreur d'évaluation : garde la trace partielle (diagnostic seulement).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("arithmetic error ({kind:?}) at step {step_index}")]
pub struct ArithmeticError {
    pub kind: ArithmeticErrorKind,
    /// Index de la réduction qui a échoué (= nombre d'étapes réussies).
    pub step_index: usize,
    pub partial_steps: Vec<EvaluationStep>,
}

/* ------------------------ Erreur globale (pipeline) ------------------------ */

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
