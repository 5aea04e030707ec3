//! Plurality vote over the four result letters.

use crate::model::Letter;
use tracing::debug;

/// Per-letter answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [usize; 4],
}

impl Tally {
    /// Count the set slots; unset slots are skipped.
    pub fn from_answers<'a, I>(answers: I) -> Self
    where
        I: IntoIterator<Item = &'a Option<Letter>>,
    {
        let mut tally = Self::default();
        for letter in answers.into_iter().flatten() {
            tally.counts[letter.index()] += 1;
        }
        tally
    }

    pub fn count(&self, letter: Letter) -> usize {
        self.counts[letter.index()]
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Most frequent letter; ties go to the earliest of A, B, C, D and an
    /// empty tally yields A.
    pub fn winner(&self) -> Letter {
        let max = self.max();
        if max == 0 {
            return Letter::A;
        }
        Letter::ALL
            .into_iter()
            .find(|&letter| self.count(letter) == max)
            .unwrap_or(Letter::A)
    }
}

/// Pick the winning result letter for a set of answers.
pub fn tally<'a, I>(answers: I) -> Letter
where
    I: IntoIterator<Item = &'a Option<Letter>>,
{
    let tally = Tally::from_answers(answers);
    let winner = tally.winner();
    debug!(
        a = tally.count(Letter::A),
        b = tally.count(Letter::B),
        c = tally.count(Letter::C),
        d = tally.count(Letter::D),
        winner = %winner,
        "Tallied answers"
    );
    winner
}
