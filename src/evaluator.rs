//! Guess scoring.
//!
//! [`evaluate`] classifies every letter of a guess as an exact match, a
//! misplaced match or absent. Duplicate letters share a budget equal to the
//! number of times the letter occurs in the secret word: exact matches spend
//! it first, then misplaced matches are awarded in ascending guess-index
//! order until the budget runs out.

use crate::debug_log;
use crate::error::{GameError, Result};
use log::error;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Per-letter classification of a scored guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feedback {
    Match,        // Green
    PartialMatch, // Yellow
    NoMatch,      // Gray
}

impl Feedback {
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Match => 'G',
            Self::PartialMatch => 'Y',
            Self::NoMatch => 'X',
        }
    }
}

/// Classify each of `len` positions from its exact and misplaced sets.
#[must_use]
pub fn feedback_for(
    len: usize,
    exact_positions: &BTreeSet<usize>,
    misplaced_positions: &BTreeSet<usize>,
) -> Vec<Feedback> {
    (0..len)
        .map(|i| {
            if exact_positions.contains(&i) {
                Feedback::Match
            } else if misplaced_positions.contains(&i) {
                Feedback::PartialMatch
            } else {
                Feedback::NoMatch
            }
        })
        .collect()
}

/// The word the player is trying to find. Always lowercase ASCII letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecretWord(String);

impl SecretWord {
    pub fn new(word: &str) -> Result<Self> {
        let normalized = word.trim().to_ascii_lowercase();
        if normalized.is_empty() || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GameError::InvalidSecretWord(word.to_string()));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn letters(&self) -> Vec<char> {
        self.0.chars().collect()
    }
}

impl fmt::Display for SecretWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of scoring a single guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    letters: Vec<char>,
    exact_positions: BTreeSet<usize>,
    misplaced_positions: BTreeSet<usize>,
}

impl Evaluation {
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    #[must_use]
    pub fn exact_positions(&self) -> &BTreeSet<usize> {
        &self.exact_positions
    }

    #[must_use]
    pub fn misplaced_positions(&self) -> &BTreeSet<usize> {
        &self.misplaced_positions
    }

    /// True when every position is an exact match.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.exact_positions.len() == self.letters.len()
    }

    /// Uppercased letters found at their exact position.
    #[must_use]
    pub fn exact_letters(&self) -> BTreeSet<char> {
        self.letters_at(&self.exact_positions)
    }

    /// Uppercased letters awarded a misplaced match.
    #[must_use]
    pub fn misplaced_letters(&self) -> BTreeSet<char> {
        self.letters_at(&self.misplaced_positions)
    }

    fn letters_at(&self, positions: &BTreeSet<usize>) -> BTreeSet<char> {
        positions
            .iter()
            .map(|&i| self.letters[i].to_ascii_uppercase())
            .collect()
    }

    #[must_use]
    pub fn feedback(&self) -> Vec<Feedback> {
        feedback_for(
            self.letters.len(),
            &self.exact_positions,
            &self.misplaced_positions,
        )
    }

    /// Feedback as a `G`/`Y`/`X` string, e.g. `"YXYXG"`.
    #[must_use]
    pub fn pattern(&self) -> String {
        self.feedback().into_iter().map(Feedback::to_char).collect()
    }
}

/// Score `guess` against `secret`.
///
/// The guess must have exactly as many letters as the secret word and
/// contain only lowercase ASCII letters; anything else is a caller bug and
/// yields [`GameError::ContractViolation`].
pub fn evaluate(secret: &SecretWord, guess: &[char]) -> Result<Evaluation> {
    let secret_letters = secret.letters();

    if guess.len() != secret_letters.len() {
        error!(
            "evaluate() called with {} letters for a {}-letter word",
            guess.len(),
            secret_letters.len()
        );
        return Err(GameError::ContractViolation(format!(
            "guess has {} letters but the secret word has {}",
            guess.len(),
            secret_letters.len()
        )));
    }
    if let Some(bad) = guess.iter().find(|c| !c.is_ascii_lowercase()) {
        error!("evaluate() called with non-letter {bad:?}");
        return Err(GameError::ContractViolation(format!(
            "guess contains {bad:?}, expected lowercase letters only"
        )));
    }

    let exact_positions: BTreeSet<usize> = guess
        .iter()
        .zip(&secret_letters)
        .enumerate()
        .filter(|(_, (g, s))| g == s)
        .map(|(i, _)| i)
        .collect();

    // Occurrences of each letter not already spent on an exact match.
    let mut budget: HashMap<char, usize> = HashMap::new();
    for (i, &c) in secret_letters.iter().enumerate() {
        if !exact_positions.contains(&i) {
            *budget.entry(c).or_insert(0) += 1;
        }
    }

    let mut misplaced_positions = BTreeSet::new();
    for (i, c) in guess.iter().enumerate() {
        if exact_positions.contains(&i) {
            continue;
        }
        if let Some(remaining) = budget.get_mut(c)
            && *remaining > 0
        {
            *remaining -= 1;
            misplaced_positions.insert(i);
        }
    }

    let evaluation = Evaluation {
        letters: guess.to_vec(),
        exact_positions,
        misplaced_positions,
    };
    debug_log!(
        "evaluate() - guess '{}' scored {}",
        guess.iter().collect::<String>(),
        evaluation.pattern()
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn secret(word: &str) -> SecretWord {
        SecretWord::new(word).unwrap()
    }

    fn chars(word: &str) -> Vec<char> {
        word.chars().collect()
    }

    fn positions(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    /// Scores the way the game historically did: for every mismatched
    /// index, take the secret letter there and rescan the whole guess for it.
    fn rescan_reference(secret: &[char], guess: &[char]) -> (BTreeSet<usize>, BTreeSet<usize>) {
        let mut exact = BTreeSet::new();
        let mut misplaced = BTreeSet::new();
        for i in 0..secret.len() {
            if guess[i] == secret[i] {
                exact.insert(i);
                continue;
            }
            let target = secret[i];
            let total = secret.iter().filter(|&&c| c == target).count();
            let matches: Vec<usize> = (0..guess.len()).filter(|&j| guess[j] == target).collect();
            let greens: Vec<usize> = matches
                .iter()
                .copied()
                .filter(|&j| guess[j] == secret[j])
                .collect();
            let mut highlighted = greens.len();
            for &j in &matches {
                if greens.contains(&j) {
                    continue;
                }
                if highlighted >= total {
                    break;
                }
                misplaced.insert(j);
                highlighted += 1;
            }
        }
        (exact, misplaced)
    }

    fn random_word<R: Rng>(rng: &mut R, len: usize) -> Vec<char> {
        // Small alphabet so duplicates are common.
        const ALPHABET: &[u8] = b"abcde";
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }

    #[test]
    fn test_secret_word_normalized_to_lowercase() {
        let word = secret("  DeIcE ");
        assert_eq!(word.as_str(), "deice");
        assert_eq!(word.len(), 5);
    }

    #[test]
    fn test_secret_word_rejects_non_letters() {
        assert!(SecretWord::new("").is_err());
        assert!(SecretWord::new("de1ce").is_err());
        assert!(SecretWord::new("de ce").is_err());
    }

    #[test]
    fn test_exact_guess_is_solved() {
        let eval = evaluate(&secret("deice"), &chars("deice")).unwrap();
        assert_eq!(eval.exact_positions(), &positions(&[0, 1, 2, 3, 4]));
        assert!(eval.misplaced_positions().is_empty());
        assert!(eval.is_solved());
        assert_eq!(eval.pattern(), "GGGGG");
    }

    #[test]
    fn test_there_eerie_tie_break() {
        let eval = evaluate(&secret("there"), &chars("eerie")).unwrap();
        // Last E is exact, first E takes the remaining budget, second E gets nothing.
        assert_eq!(eval.exact_positions(), &positions(&[4]));
        // R sits at index 3 of the secret word.
        assert_eq!(eval.misplaced_positions(), &positions(&[0, 2]));
        assert_eq!(eval.pattern(), "YXYXG");
        assert!(!eval.is_solved());
    }

    #[test]
    fn test_surplus_duplicates_after_exact_matches() {
        let eval = evaluate(&secret("there"), &chars("theee")).unwrap();
        assert_eq!(eval.exact_positions(), &positions(&[0, 1, 2, 4]));
        assert!(eval.misplaced_positions().is_empty());
    }

    #[test]
    fn test_duplicate_letters_in_secret() {
        let eval = evaluate(&secret("abbey"), &chars("babes")).unwrap();
        assert_eq!(eval.exact_positions(), &positions(&[2, 3]));
        assert_eq!(eval.misplaced_positions(), &positions(&[0, 1]));
        assert_eq!(eval.pattern(), "YYGGX");

        let eval = evaluate(&secret("creep"), &chars("speed")).unwrap();
        assert_eq!(eval.exact_positions(), &positions(&[2, 3]));
        assert_eq!(eval.misplaced_positions(), &positions(&[1]));
    }

    #[test]
    fn test_no_shared_letters() {
        let eval = evaluate(&secret("crane"), &chars("tombs")).unwrap();
        assert!(eval.exact_positions().is_empty());
        assert!(eval.misplaced_positions().is_empty());
        assert_eq!(eval.pattern(), "XXXXX");
    }

    #[test]
    fn test_letter_sets_are_uppercase() {
        let eval = evaluate(&secret("there"), &chars("eerie")).unwrap();
        assert_eq!(eval.exact_letters(), BTreeSet::from(['E']));
        assert_eq!(eval.misplaced_letters(), BTreeSet::from(['E', 'R']));
    }

    #[test]
    fn test_length_mismatch_is_contract_violation() {
        let result = evaluate(&secret("there"), &chars("tree"));
        assert!(matches!(result, Err(GameError::ContractViolation(_))));
    }

    #[test]
    fn test_uppercase_guess_is_contract_violation() {
        let result = evaluate(&secret("there"), &chars("THERE"));
        assert!(matches!(result, Err(GameError::ContractViolation(_))));
    }

    #[test]
    fn test_reevaluation_is_identical() {
        let word = secret("there");
        let guess = chars("eerie");
        let first = evaluate(&word, &guess).unwrap();
        let second = evaluate(&word, &guess).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_feedback_chars() {
        assert_eq!(Feedback::Match.to_char(), 'G');
        assert_eq!(Feedback::PartialMatch.to_char(), 'Y');
        assert_eq!(Feedback::NoMatch.to_char(), 'X');
    }

    #[test]
    fn test_feedback_for_positions() {
        let feedback = feedback_for(5, &BTreeSet::from([4]), &BTreeSet::from([0, 2]));
        assert_eq!(
            feedback,
            vec![
                Feedback::PartialMatch,
                Feedback::NoMatch,
                Feedback::PartialMatch,
                Feedback::NoMatch,
                Feedback::Match,
            ]
        );
        assert!(feedback_for(0, &BTreeSet::new(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_randomized_matches_rescan_reference() {
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        for _ in 0..2000 {
            let len = rng.gen_range(4..=10);
            let secret_letters = random_word(&mut rng, len);
            let guess = random_word(&mut rng, len);
            let word = SecretWord::new(&secret_letters.iter().collect::<String>()).unwrap();

            let eval = evaluate(&word, &guess).unwrap();
            let (exact, misplaced) = rescan_reference(&secret_letters, &guess);
            assert_eq!(eval.exact_positions(), &exact, "{secret_letters:?} / {guess:?}");
            assert_eq!(eval.misplaced_positions(), &misplaced, "{secret_letters:?} / {guess:?}");
        }
    }

    #[test]
    fn test_randomized_budget_conservation() {
        let mut rng = ChaCha8Rng::seed_from_u64(777);
        for _ in 0..2000 {
            let len = rng.gen_range(4..=10);
            let secret_letters = random_word(&mut rng, len);
            let guess = random_word(&mut rng, len);
            let word = SecretWord::new(&secret_letters.iter().collect::<String>()).unwrap();
            let eval = evaluate(&word, &guess).unwrap();

            assert!(eval.exact_positions().is_disjoint(eval.misplaced_positions()));
            for letter in guess.iter().copied().collect::<BTreeSet<_>>() {
                let classified = eval
                    .exact_positions()
                    .union(eval.misplaced_positions())
                    .filter(|&&i| guess[i] == letter)
                    .count();
                let in_secret = secret_letters.iter().filter(|&&c| c == letter).count();
                assert!(classified <= in_secret);
            }
        }
    }
}
