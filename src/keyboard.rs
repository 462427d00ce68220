use crate::evaluator::Evaluation;
use std::collections::BTreeSet;

/// Highlight shown on the on-screen keyboard for one letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterHighlight {
    CorrectInPosition,
    CorrectButMisplaced,
    Incorrect,
}

/// Per-letter feedback accumulated across every submitted guess of a game.
///
/// Letters are stored uppercase. Once a letter has been found in its exact
/// position it is never reported as misplaced again, even if a later guess
/// places it wrongly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardState {
    correct_in_position: BTreeSet<char>,
    correct_but_misplaced: BTreeSet<char>,
    incorrect: BTreeSet<char>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one scored guess into the running state.
    pub fn record(&mut self, evaluation: &Evaluation) {
        self.correct_in_position.extend(evaluation.exact_letters());
        self.correct_but_misplaced.extend(evaluation.misplaced_letters());

        for letter in evaluation.letters() {
            let upper = letter.to_ascii_uppercase();
            if !self.correct_in_position.contains(&upper)
                && !self.correct_but_misplaced.contains(&upper)
            {
                self.incorrect.insert(upper);
            }
        }

        let found = &self.correct_in_position;
        self.correct_but_misplaced.retain(|c| !found.contains(c));
    }

    #[must_use]
    pub fn correct_in_position(&self) -> &BTreeSet<char> {
        &self.correct_in_position
    }

    #[must_use]
    pub fn correct_but_misplaced(&self) -> &BTreeSet<char> {
        &self.correct_but_misplaced
    }

    #[must_use]
    pub fn incorrect(&self) -> &BTreeSet<char> {
        &self.incorrect
    }

    /// Highlight for `letter` (either case), or `None` if it was never guessed.
    #[must_use]
    pub fn highlight(&self, letter: char) -> Option<LetterHighlight> {
        let upper = letter.to_ascii_uppercase();
        if self.correct_in_position.contains(&upper) {
            Some(LetterHighlight::CorrectInPosition)
        } else if self.correct_but_misplaced.contains(&upper) {
            Some(LetterHighlight::CorrectButMisplaced)
        } else if self.incorrect.contains(&upper) {
            Some(LetterHighlight::Incorrect)
        } else {
            None
        }
    }
}
