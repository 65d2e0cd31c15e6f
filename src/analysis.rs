//! Text normalization and tokenization for the trained classification
//! pipeline.
//!
//! The normalization chain mirrors what the training corpus was prepared
//! with: lowercasing, folding the six accented Turkish characters to their
//! ASCII equivalents, stripping punctuation, and collapsing whitespace.
//! Stopwords are deliberately kept; short function words ("değil", "mı")
//! carry intent signal in this domain.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[[:punct:]]+").expect("static punctuation regex");
}

/// The accented characters of the target language and their ASCII folds.
const TURKISH_FOLD: [(char, char); 6] = [
    ('ç', 'c'),
    ('ğ', 'g'),
    ('ı', 'i'),
    ('ö', 'o'),
    ('ş', 's'),
    ('ü', 'u'),
];

fn fold_char(c: char) -> char {
    for (from, to) in TURKISH_FOLD {
        if c == from {
            return to;
        }
    }
    c
}

/// Normalize raw text: lowercase, fold accented characters, strip
/// punctuation, collapse whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    // Lowercasing 'İ' yields "i" plus a combining dot; drop the artifact so
    // "İade" and "iade" normalize identically.
    let folded: String = lowered
        .chars()
        .filter(|c| *c != '\u{0307}')
        .map(fold_char)
        .collect();
    let stripped = PUNCTUATION.replace_all(&folded, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokenize text into normalized whitespace-delimited terms.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Unigram and bigram features over the token sequence, in input order.
/// Bigrams are joined with a single space.
pub fn ngram_features(tokens: &[String]) -> Vec<String> {
    let mut features = tokens.to_vec();
    features.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_turkish_characters() {
        assert_eq!(normalize("ödeme yapamıyorum"), "odeme yapamiyorum");
        assert_eq!(normalize("KARGO ÜCRETİ"), normalize("kargo ücreti"));
        assert_eq!(normalize("çğışöü"), "cgisou");
    }

    #[test]
    fn test_normalize_strips_punctuation_and_whitespace() {
        assert_eq!(normalize("Siparişim   nerede?!"), "siparisim nerede");
        assert_eq!(normalize("  merhaba,  nasılsınız?  "), "merhaba nasilsiniz");
    }

    #[test]
    fn test_normalize_drops_dotted_capital_i_artifact() {
        assert_eq!(normalize("İade"), "iade");
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Sepete ekle!"), vec!["sepete", "ekle"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_ngram_features_include_bigrams() {
        let tokens = tokenize("kargo ne kadar");
        let features = ngram_features(&tokens);
        assert!(features.contains(&"kargo".to_string()));
        assert!(features.contains(&"kargo ne".to_string()));
        assert!(features.contains(&"ne kadar".to_string()));
        assert_eq!(features.len(), 5);
    }
}
