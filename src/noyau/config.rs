// src/noyau/config.rs
//
// Paramètres du noyau (précision, garde-fous, styles d'export).
// Valeurs bornées à la construction : pas de gel possible via un réglage absurde.

/// Chiffres significatifs par défaut pour une valeur non décimale finie (ex: 1/3).
pub const PRECISION_DEFAUT: u32 = 10;

/// Garde-fou : précision maximale acceptée.
pub const PRECISION_MAX: u32 = 100;

/// Garde-fou : |exposant| maximal pour `^`.
pub const EXPOSANT_MAX_DEFAUT: u64 = 10_000;

/// Garde-fou : imbrication maximale côté parseur, et hauteur maximale de l'AST
/// (une chaîne plate `1+1+…` compte un niveau par opérateur).
pub const PROFONDEUR_MAX_DEFAUT: usize = 256;

/// Plafond de `max_depth` : évaluation et exports parcourent l'arbre récursivement.
pub const PROFONDEUR_PLAFOND: usize = 400;

/// Opérateurs LaTeX.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LatexOperators {
    /// `\times`, `\div`, `^{}`, `\left( \right)`
    #[default]
    Symbols,
    /// `*`, `/`, `^`, `( )` : sortie relisible telle quelle par `tokenize`.
    Bare,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LatexOptions {
    pub operators: LatexOperators,
    /// Séparateur décimal `{,}` au lieu de `.` (style Symbols seulement).
    pub decimal_comma: bool,
}

/// Rendu MathML de `/`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MathmlDivision {
    /// `<mo>÷</mo>` en ligne.
    #[default]
    Inline,
    /// `<mfrac>`.
    Fraction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub precision: u32,
    pub max_exponent: u64,
    pub max_depth: usize,
    pub latex: LatexOptions,
    pub mathml_division: MathmlDivision,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
            max_exponent: EXPOSANT_MAX_DEFAUT,
            max_depth: PROFONDEUR_MAX_DEFAUT,
            latex: LatexOptions::default(),
            mathml_division: MathmlDivision::default(),
        }
    }
}

impl Config {
    /// Précision bornée à 1..=PRECISION_MAX.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.clamp(1, PRECISION_MAX);
        self
    }

    pub fn with_max_exponent(mut self, max_exponent: u64) -> Self {
        self.max_exponent = max_exponent;
        self
    }

    /// Bornée à 1..=PROFONDEUR_PLAFOND (0 refuserait même `(1)`).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.clamp(1, PROFONDEUR_PLAFOND);
        self
    }

    pub fn with_latex(mut self, latex: LatexOptions) -> Self {
        self.latex = latex;
        self
    }

    pub fn with_mathml_division(mut self, division: MathmlDivision) -> Self {
        self.mathml_division = division;
        self
    }
}
