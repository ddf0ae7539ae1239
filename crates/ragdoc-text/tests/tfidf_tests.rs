use std::collections::HashSet;

use ragdoc_core::chunker::split;
use ragdoc_core::tokenize::{tokenize, Term};
use ragdoc_text::{vectorize, vectorize_against, IdfWeights, TfIdfVectorizer, Vocabulary};

fn terms(text: &str) -> Vec<Term> {
    tokenize(text)
}

fn corpus() -> Vec<Vec<Term>> {
    vec![
        terms("rivers flow into the sea"),
        terms("mountains rise above the rivers"),
        terms("the desert has no water"),
    ]
}

#[test]
fn vocabulary_keeps_first_occurrence_order() {
    let vocab = Vocabulary::build(&corpus());
    assert_eq!(
        vocab.terms(),
        ["rivers", "flow", "into", "the", "sea", "mountains", "rise", "above", "desert", "has", "water"]
    );
    assert_eq!(vocab.position("the"), Some(3));
    assert!(!vocab.contains("ocean"));
}

#[test]
fn idf_matches_formula_and_allows_negative_values() {
    let docs = corpus();
    let vocab = Vocabulary::build(&docs);
    let idf = IdfWeights::fit(&vocab, &docs);
    assert_eq!(idf.corpus_size(), 3);
    // "the" appears in all three chunks: ln(3 / 4) < 0
    let the = idf.get(vocab.position("the").unwrap()).unwrap();
    assert!((the - (3.0f64 / 4.0).ln()).abs() < 1e-12);
    assert!(the < 0.0);
    // "rivers" appears in two: ln(3 / 3) == 0
    assert!(idf.get(vocab.position("rivers").unwrap()).unwrap().abs() < 1e-12);
    // "sea" appears in one: ln(3 / 2)
    let sea = idf.get(vocab.position("sea").unwrap()).unwrap();
    assert!((sea - 1.5f64.ln()).abs() < 1e-12);
}

#[test]
fn term_frequency_uses_token_count_not_unique_count() {
    let docs = corpus();
    let vocab = Vocabulary::build(&docs);
    let idf = IdfWeights::fit(&vocab, &docs);
    let query = terms("sea sea desert water");
    let v = vectorize(&query, &vocab, &idf);
    let sea = v[vocab.position("sea").unwrap()];
    let expected = (2.0 / 4.0) * 1.5f64.ln();
    assert!((sea - expected).abs() < 1e-12);
}

#[test]
fn unknown_terms_are_skipped() {
    let docs = corpus();
    let vectorizer = TfIdfVectorizer::fit(&docs);
    let v = vectorizer.transform_text("ocean waves crash");
    assert_eq!(v.len(), vectorizer.dimension());
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn empty_terms_give_zero_vector_without_nan() {
    let vectorizer = TfIdfVectorizer::fit(&corpus());
    let v = vectorizer.transform(&[]);
    assert_eq!(v.len(), vectorizer.dimension());
    assert!(v.iter().all(|x| *x == 0.0 && !x.is_nan()));
}

#[test]
fn fitted_vectorizer_matches_corpus_form() {
    let docs = corpus();
    let vectorizer = TfIdfVectorizer::fit(&docs);
    for doc in &docs {
        assert_eq!(vectorizer.transform(doc), vectorize_against(doc, vectorizer.vocabulary(), &docs));
    }
}

#[test]
fn re_ingesting_same_text_gives_same_vocabulary() {
    let text = "Rivers carve valleys.\n\nMountains shape weather. Deserts stay dry for decades.\n\nOceans cover most of the planet and regulate climate over long periods.";
    let build = || {
        let tokenized: Vec<Vec<Term>> = split(text, 100, 20).iter().map(|c| tokenize(&c.text)).collect();
        Vocabulary::build(&tokenized)
    };
    let (a, b) = (build(), build());
    assert_eq!(a.len(), b.len());
    let set_a: HashSet<&Term> = a.terms().iter().collect();
    let set_b: HashSet<&Term> = b.terms().iter().collect();
    assert_eq!(set_a, set_b);
}
