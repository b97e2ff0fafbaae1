//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée, exposants petits ou à longue partie décimale
//! - budget temps global
//! - seules les erreurs arithmétiques sont acceptées sur une entrée bien formée
//! - une entrée abîmée rend exactement une erreur typée, jamais de panique

use std::time::{Duration, Instant};

use super::*;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        2 => format!(".{}", 1 + rng.pick(9)),
        _ => format!("{}", 1 + rng.pick(12)),
    }
}

fn gen_chiffres(rng: &mut Rng, n: u32) -> String {
    (0..n).map(|_| char::from(b'0' + rng.pick(10) as u8)).collect()
}

fn gen_exposant(rng: &mut Rng) -> String {
    // partie entière petite, partie décimale parfois longue
    match rng.pick(8) {
        0 => "0".to_string(),
        1 => "0.5".to_string(),
        2 => "-1".to_string(),
        3 => "(1+1)".to_string(),
        4 => {
            let entier = rng.pick(3);
            let n = 20 + rng.pick(41);
            format!("{}.{}", entier, gen_chiffres(rng, n))
        }
        5 => format!("0.{}", "9".repeat(20 + rng.pick(60) as usize)),
        _ => format!("{}", 1 + rng.pick(3)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_nombre(rng);
    }

    let a = gen_expr(rng, depth - 1);
    let e = match rng.pick(7) {
        0 => gen_nombre(rng),
        1 => format!("{a} + {}", gen_expr(rng, depth - 1)),
        2 => format!("{a} - {}", gen_expr(rng, depth - 1)),
        3 => format!("{a} * {}", gen_expr(rng, depth - 1)),
        4 => format!("{a} / {}", gen_expr(rng, depth - 1)),
        5 => format!("({a})^{}", gen_exposant(rng)),
        _ => format!("-({a})"),
    };

    // parenthèses pas toujours nécessaires : la précédence fait le reste
    if rng.coin() {
        format!("({e})")
    } else {
        e
    }
}

/// Abîme une entrée valide : caractère étranger, opérateur en trop, parenthèse orpheline…
fn abimer(rng: &mut Rng, source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let i = rng.pick(chars.len() as u32 + 1) as usize;
    let (avant, apres) = chars.split_at(i);
    let avant: String = avant.iter().collect();
    let apres: String = apres.iter().collect();

    match rng.pick(6) {
        0 => format!("{avant}@{apres}"),
        1 => format!("{avant}x{apres}"),
        2 => format!("{source}+"),
        3 => format!("({source}"),
        4 => format!("{source})"),
        _ => format!("{avant}1.2.3{apres}"),
    }
}

fn erreur_arithmetique_attendue(e: &Error) -> bool {
    match e {
        Error::Arithmetic(a) => matches!(
            a.kind,
            ArithmeticErrorKind::DivisionByZero
                | ArithmeticErrorKind::ComplexResult
                | ArithmeticErrorKind::Overflow
        ),
        _ => false,
    }
}

/* ------------------------ Vérifications par expression ------------------------ */

fn verifier_solution(source: &str, s: &Solution) {
    let ast = &s.result.ast;

    // texte normalisé : relu, même arbre
    let relu = parse(&tokenize(&s.expression).unwrap()).unwrap();
    assert_eq!(&relu, ast, "source={source:?} normalisée={:?}", s.expression);

    // LaTeX symboles : relu après normalisation, même arbre
    let latex = normalize_latex(&s.latex).unwrap();
    let relu = parse(&tokenize(&latex).unwrap()).unwrap();
    assert_eq!(&relu, ast, "source={source:?} latex={:?}", s.latex);

    // postfix : un symbole par noeud
    assert_eq!(s.rpn.split(' ').count(), ast.node_count(), "source={source:?}");

    // dernière étape = valeur finale
    match s.result.steps.last() {
        Some(etape) => {
            assert_eq!(etape.resulting_subtree.as_literal(), Some(&s.result.final_value));
            assert_eq!(etape.sub_expression_after, s.result.final_value.to_string());
            let (_, apres) = s.result.derivation().last().unwrap();
            assert_eq!(apres.as_literal(), Some(&s.result.final_value));
        }
        None => assert_eq!(ast.as_literal(), Some(&s.result.final_value)),
    }
    assert_eq!(s.steps_readable.len(), s.result.steps.len());
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_exports() {
    let _ = env_logger::builder().is_test(true).try_init();

    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let config = Config::default();

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let source = gen_expr(&mut rng, 4);

        match solve_expression(&source, &config) {
            Ok(s) => {
                verifier_solution(&source, &s);
                let encore = solve_expression(&source, &config).unwrap();
                assert_eq!(s, encore, "source={source:?}");
                seen_ok += 1;
            }
            Err(e) => {
                assert!(
                    erreur_arithmetique_attendue(&e),
                    "erreur non attendue: source={source:?} err={e}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_entrees_abimees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let config = Config::default();

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..150 {
        budget(t0, max);

        let saine = gen_expr(&mut rng, 3);
        let source = abimer(&mut rng, &saine);

        // chaque mutation casse l'entrée : une seule erreur, typée
        match solve_expression(&source, &config) {
            Ok(s) => panic!("entrée abîmée acceptée: source={source:?} valeur={}", s.result.final_value),
            Err(Error::Lexical(e)) => {
                assert!(e.position <= source.chars().count(), "source={source:?} err={e}");
            }
            Err(Error::Syntax(e)) => {
                assert!(e.position <= source.chars().count(), "source={source:?} err={e}");
            }
            Err(e) => assert!(
                erreur_arithmetique_attendue(&e),
                "erreur non attendue: source={source:?} err={e}"
            ),
        }
    }
}

#[test]
fn fuzz_safe_operateur_final() {
    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..60 {
        let source = format!("{} *", gen_expr(&mut rng, 3));
        let e = parse(&tokenize(&source).unwrap()).unwrap_err();
        assert_eq!(e.expected, Expected::Operand, "source={source:?}");
        assert_eq!(e.found, TokenKind::Eof, "source={source:?}");
        assert_eq!(e.position, source.chars().count(), "source={source:?}");
    }
}

#[test]
fn fuzz_safe_exposants_longs_encadres() {
    let t0 = Instant::now();
    let max = Duration::from_millis(3000);

    let mut rng = Rng::new(0xE4_u64);

    for _ in 0..40 {
        budget(t0, max);

        // x^(k+f) strictement entre x^k et x^(k+1) pour x > 1
        let x = 2 + rng.pick(8);
        let k = rng.pick(3);
        let n = 20 + rng.pick(60);
        let f = format!("0.{}{}", gen_chiffres(&mut rng, n), 1 + rng.pick(9));
        let source = format!("{x}^{k}{}", &f[1..]);

        let v = evaluate(&parse(&tokenize(&source).unwrap()).unwrap())
            .unwrap_or_else(|e| panic!("source={source:?} err={e}"))
            .final_value;
        let bas = Decimal::from_integer(i64::from(x).pow(k));
        let haut = Decimal::from_integer(i64::from(x).pow(k + 1));
        assert!(bas <= v && v <= haut, "source={source:?} valeur={v}");

        // f ≥ 0.5 : au-dessus de x^k·√x, donc loin de x^k
        if f.as_bytes()[2] >= b'5' {
            assert!(v > bas, "source={source:?} valeur={v}");
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    // 256 termes 0.5 en arbre équilibré : profondeur 8 seulement
    let mut items: Vec<String> = vec!["0.5".to_string(); 256];
    while items.len() > 1 {
        items = items
            .chunks(2)
            .map(|p| match p {
                [a, b] => format!("({a}+{b})"),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }
    let source = items.pop().unwrap_or_else(|| "0".to_string());

    let s = solve_expression(&source, &Config::default()).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    assert_eq!(s.result.final_value.to_string(), "128");
    assert_eq!(s.result.steps.len(), 255);
}
