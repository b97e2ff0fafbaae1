// src/noyau/jetons.rs
//
// Tokenisation par automate fini.
// - nombres : chiffres ASCII avec au plus un point décimal (lexème conservé tel quel)
// - opérateurs + - * / ^, parenthèses ( )
// - espaces ignorés
// - EOF termine toujours la suite, exactement une fois

use std::fmt;

use super::erreur::LexicalError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Eof,
}

impl TokenKind {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Caret => "CARET",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Eof => "EOF",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Position (en caractères) dans la source.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

/// États de l'automate “nombre”.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EtatNombre {
    /// `12`
    Entier,
    /// `.` sans chiffre avant
    PointInitial,
    /// `12.`
    PointFinal,
    /// `12.5` ou `.5`
    Fraction,
}

impl EtatNombre {
    fn accepte(self) -> bool {
        matches!(self, EtatNombre::Entier | EtatNombre::Fraction)
    }
}

/// Lit un nombre à partir de `debut`. Renvoie l'index qui suit le lexème.
fn scan_number(chars: &[char], debut: usize, out: &mut Vec<Token>) -> Result<usize, LexicalError> {
    let mut etat = if chars[debut] == '.' {
        EtatNombre::PointInitial
    } else {
        EtatNombre::Entier
    };
    let mut i = debut + 1;

    while let Some(&c) = chars.get(i) {
        etat = match (etat, c) {
            (EtatNombre::Entier, '0'..='9') => EtatNombre::Entier,
            (EtatNombre::Entier, '.') => EtatNombre::PointFinal,
            (EtatNombre::PointInitial | EtatNombre::PointFinal | EtatNombre::Fraction, '0'..='9') => {
                EtatNombre::Fraction
            }
            // second point décimal
            (_, '.') => return Err(LexicalError::malformed_number(i, '.')),
            _ => break,
        };
        i += 1;
    }

    if !etat.accepte() {
        // point sans chiffre après : on pointe sur le point lui-même
        return Err(LexicalError::malformed_number(i - 1, '.'));
    }

    let lexeme: String = chars[debut..i].iter().collect();
    log::trace!("[lexer] NUMBER {lexeme:?} @{debut}");
    out.push(Token::new(TokenKind::Number, lexeme, debut));
    Ok(i)
}

/// Tokenize une chaîne normalisée.
///
/// Erreurs :
/// - caractère hors alphabet => UnexpectedCharacter
/// - `1.2.3`, `5.`, `.` => MalformedNumber
/// - entrée vide (après retrait des espaces) => EmptyInput
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if let Some(kind) = TokenKind::from_symbol(c) {
            out.push(Token::new(kind, c, i));
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            i = scan_number(&chars, i, &mut out)?;
            continue;
        }

        return Err(LexicalError::unexpected(i, c));
    }

    if out.is_empty() {
        return Err(LexicalError::empty(chars.len()));
    }

    out.push(Token::new(TokenKind::Eof, "", chars.len()));
    Ok(out)
}

/// Format utilitaire (démarche) : `lexème:GENRE` séparés par des espaces, EOF omis.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| format!("{}:{}", t.lexeme, t.kind))
        .collect::<Vec<_>>()
        .join(" ")
}
