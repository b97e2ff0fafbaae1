// src/noyau/decimal.rs
//
// Nombre décimal exact (sans flottants).
//
// Contrat public (observable dans chaque étape) :
// - la valeur est un rationnel dont le développement décimal est FINI ;
// - + - * restent exacts (fini op fini = fini) ;
// - un quotient ou une puissance non finis sont arrondis à `precision`
//   chiffres significatifs, demi éloigné de zéro, au moment où ils sont produits ;
// - affichage : développement exact, sans notation scientifique, sans zéros inutiles.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::erreur::ArithmeticErrorKind;

/// Budget (en bits) d'un résultat exact de puissance entière.
const BITS_MAX: u64 = 1 << 20;

/// Chiffres de garde des racines en virgule fixe.
const CHIFFRES_GARDE: u32 = 30;

/// Décimales maximales d'un exposant non entier (au-delà : Overflow).
pub const DECIMALES_EXPOSANT_MAX: u32 = 200;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(BigRational);

/* ------------------------ Helpers entiers ------------------------ */

fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// 10^e en rationnel (e peut être négatif).
fn puissance_dix(e: i64) -> BigRational {
    let n = pow10(e.unsigned_abs() as u32);
    if e >= 0 {
        BigRational::from_integer(n)
    } else {
        BigRational::new(BigInt::one(), n)
    }
}

/// d = 2^a · 5^b · reste
fn facteurs_2_5(d: &BigInt) -> (u32, u32, BigInt) {
    let mut reste = d.clone();
    let mut a = 0;
    let mut b = 0;

    if reste.is_zero() {
        return (0, 0, reste);
    }
    while (&reste % 2u32).is_zero() {
        reste /= 2u32;
        a += 1;
    }
    while (&reste % 5u32).is_zero() {
        reste /= 5u32;
        b += 1;
    }
    (a, b, reste)
}

fn est_decimal_fini(r: &BigRational) -> bool {
    facteurs_2_5(r.denom()).2.is_one()
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal, sans zéros finaux.
fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits as u32);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    let signe = if neg { "-" } else { "" };
    if digits == 0 || frac_part.is_zero() {
        return format!("{signe}{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }
    let frac = frac.trim_end_matches('0');

    format!("{signe}{int_part}.{frac}")
}

/* ------------------------ Arrondi ------------------------ */

/// e tel que 10^e <= a < 10^(e+1), pour a > 0.
fn exposant_decimal(a: &BigRational) -> i64 {
    let mut e = a.numer().to_string().len() as i64 - a.denom().to_string().len() as i64;
    while puissance_dix(e) > *a {
        e -= 1;
    }
    while puissance_dix(e + 1) <= *a {
        e += 1;
    }
    e
}

/// floor(x + 1/2) pour x >= 0.
fn arrondi_demi_eloigne(x: &BigRational) -> BigInt {
    let deux = BigInt::from(2);
    (x.numer() * &deux + x.denom()) / (x.denom() * &deux)
}

fn arrondi_significatif(r: &BigRational, chiffres: u32) -> BigRational {
    if r.is_zero() {
        return r.clone();
    }

    let a = r.abs();
    let decalage = chiffres as i64 - 1 - exposant_decimal(&a);
    let n = arrondi_demi_eloigne(&(a * puissance_dix(decalage)));
    let arrondi = BigRational::from_integer(n) * puissance_dix(-decalage);

    if r.is_negative() {
        -arrondi
    } else {
        arrondi
    }
}

/* ------------------------ Puissances ------------------------ */

fn rational_pow_int(base: &BigRational, exp: u64) -> BigRational {
    let mut e = exp;
    let mut acc = BigRational::one();
    let mut b = base.clone();

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}

fn taille_bits(r: &BigRational) -> u64 {
    r.numer().bits().max(r.denom().bits())
}

/// x^(p/q) approché en virgule fixe, avec x > 0, 0 < p < q et q = 2^a · 5^b.
///
/// On travaille sur x >= 1 (sinon 1/x puis inverse) : toutes les valeurs
/// intermédiaires restent >= 1, donc l'erreur absolue de troncature est aussi
/// une erreur relative.
///
/// Les racines laissent une erreur relative de l'ordre de 1/S, que y^p
/// multiplie par environ p < q : l'échelle S grandit avec les chiffres de q.
fn puissance_fractionnaire(x: &BigRational, p: &BigInt, q: &BigInt, precision: u32) -> BigRational {
    let inverse = *x < BigRational::one();
    let x = if inverse { x.recip() } else { x.clone() };

    let chiffres_q = q.to_str_radix(10).len() as u32;
    let echelle = pow10(precision + CHIFFRES_GARDE + 2 * chiffres_q);

    // y ≈ x · S
    let mut y = (x.numer() * &echelle) / x.denom();

    // racines successives : sqrt(y/S)·S = sqrt(y·S), racine5(y/S)·S = racine5(y·S^4)
    let (a, b, _) = facteurs_2_5(q);
    for _ in 0..a {
        y = (&y * &echelle).sqrt();
    }
    let echelle4 = echelle.pow(4);
    for _ in 0..b {
        y = (&y * &echelle4).nth_root(5);
    }

    // y^p en virgule fixe (carré-multiplie)
    let mut acc = echelle.clone();
    let mut base = y;
    let mut e = p.clone();
    while !e.is_zero() {
        if (&e % 2u32).is_one() {
            acc = &acc * &base / &echelle;
        }
        e /= 2u32;
        if !e.is_zero() {
            base = &base * &base / &echelle;
        }
    }

    let r = BigRational::new(acc, echelle);
    if inverse {
        r.recip()
    } else {
        r
    }
}

/* ------------------------ API ------------------------ */

impl Decimal {
    pub fn zero() -> Self {
        Decimal(BigRational::zero())
    }

    pub fn from_integer(n: i64) -> Self {
        Decimal(BigRational::from_integer(BigInt::from(n)))
    }

    /// Lecture exacte d'un lexème `chiffres[.chiffres]` (ou `.chiffres`).
    pub fn parse(lexeme: &str) -> Option<Self> {
        let (entier, fraction) = lexeme.split_once('.').unwrap_or((lexeme, ""));
        if entier.is_empty() && fraction.is_empty() {
            return None;
        }
        let tous_chiffres = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !tous_chiffres(entier) || !tous_chiffres(fraction) {
            return None;
        }

        let n = BigInt::parse_bytes(format!("{entier}{fraction}").as_bytes(), 10)?;
        Some(Decimal(BigRational::new(n, pow10(fraction.len() as u32))))
    }

    /// Rationnel quelconque -> Decimal : exact si fini, sinon arrondi à `precision`.
    pub fn from_rational(r: BigRational, precision: u32) -> Self {
        if est_decimal_fini(&r) {
            Decimal(r)
        } else {
            Decimal(arrondi_significatif(&r, precision))
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    pub fn round_significant(&self, chiffres: u32) -> Self {
        Decimal(arrondi_significatif(&self.0, chiffres.max(1)))
    }

    /// None si diviseur nul.
    pub fn checked_div(&self, diviseur: &Decimal, precision: u32) -> Option<Self> {
        if diviseur.is_zero() {
            return None;
        }
        Some(Self::from_rational(&self.0 / &diviseur.0, precision))
    }

    /// Puissance. Conventions : x^0 = 1 (y compris 0^0).
    ///
    /// - exposant entier : exact (carré-multiplie), sauf 0^(-n) => DivisionByZero ;
    /// - exposant non entier : base < 0 => ComplexResult, sinon approché puis arrondi ;
    /// - |exposant| > `max_exponent`, résultat exact trop gros ou plus de
    ///   `DECIMALES_EXPOSANT_MAX` décimales d'exposant => Overflow.
    pub fn pow(
        &self,
        exposant: &Decimal,
        precision: u32,
        max_exponent: u64,
    ) -> Result<Self, ArithmeticErrorKind> {
        let base = &self.0;
        let e = &exposant.0;

        if e.is_zero() {
            return Ok(Decimal(BigRational::one()));
        }
        if base.is_zero() {
            return if e.is_negative() {
                Err(ArithmeticErrorKind::DivisionByZero)
            } else {
                Ok(Decimal::zero())
            };
        }
        if base.is_one() {
            return Ok(self.clone());
        }
        if !e.is_integer() && base.is_negative() {
            return Err(ArithmeticErrorKind::ComplexResult);
        }

        let n = e
            .abs()
            .trunc()
            .to_integer()
            .to_u64()
            .filter(|n| *n <= max_exponent)
            .ok_or(ArithmeticErrorKind::Overflow)?;

        if taille_bits(base).saturating_mul(n) > BITS_MAX {
            return Err(ArithmeticErrorKind::Overflow);
        }

        let partie_entiere = rational_pow_int(base, n);

        if e.is_integer() {
            let r = if e.is_negative() {
                partie_entiere.recip()
            } else {
                partie_entiere
            };
            return Ok(Self::from_rational(r, precision));
        }

        let fraction = e.abs() - BigRational::from_integer(BigInt::from(n));
        let (a, b, _) = facteurs_2_5(fraction.denom());
        if a.max(b) > DECIMALES_EXPOSANT_MAX {
            return Err(ArithmeticErrorKind::Overflow);
        }
        let approx = puissance_fractionnaire(base, fraction.numer(), fraction.denom(), precision);

        let valeur = partie_entiere * approx;
        let valeur = if e.is_negative() {
            valeur.recip()
        } else {
            valeur
        };

        Ok(Decimal(arrondi_significatif(&valeur, precision)))
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 + &rhs.0)
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 - &rhs.0)
    }
}

impl Mul for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 * &rhs.0)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-&self.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b, reste) = facteurs_2_5(self.0.denom());

        // inaccessible via l'API publique (toute valeur est finie), on reste total
        if !reste.is_one() {
            return write!(f, "{}/{}", self.0.numer(), self.0.denom());
        }

        let k = a.max(b);
        let scaled = self.0.numer() * pow10(k) / self.0.denom();
        f.write_str(&scaled_to_decimal(scaled, k as usize))
    }
}
