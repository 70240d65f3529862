//! The four MBTI trait dimensions and their label/letter decode table.
//!
//! Each dimension is a binary classification problem trained and
//! checkpointed independently. Label 0 decodes to the first pole letter,
//! label 1 to the second; a full personality type concatenates one decoded
//! letter per dimension in fixed order (e.g. "INTJ").

use serde::{Deserialize, Serialize};
use std::fmt;

/// One MBTI trait dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Introversion / Extraversion
    Ei,
    /// Intuition / Sensing
    Ns,
    /// Thinking / Feeling
    Tf,
    /// Judging / Perceiving
    Jp,
}

impl Dimension {
    /// All dimensions in personality-type order.
    pub const ALL: [Dimension; 4] = [Dimension::Ei, Dimension::Ns, Dimension::Tf, Dimension::Jp];

    /// Position of this dimension within a 4-letter type string.
    pub fn index(self) -> usize {
        match self {
            Dimension::Ei => 0,
            Dimension::Ns => 1,
            Dimension::Tf => 2,
            Dimension::Jp => 3,
        }
    }

    /// The two pole letters: `.0` decodes label 0, `.1` decodes label 1.
    pub fn letters(self) -> (char, char) {
        match self {
            Dimension::Ei => ('I', 'E'),
            Dimension::Ns => ('N', 'S'),
            Dimension::Tf => ('T', 'F'),
            Dimension::Jp => ('J', 'P'),
        }
    }

    /// Short code used in file names and CLI flags.
    pub fn code(self) -> &'static str {
        match self {
            Dimension::Ei => "ei",
            Dimension::Ns => "ns",
            Dimension::Tf => "tf",
            Dimension::Jp => "jp",
        }
    }

    /// Decode a predicted binary label into the pole letter.
    pub fn letter_for(self, label: usize) -> char {
        let (zero, one) = self.letters();
        match label {
            0 => zero,
            1 => one,
            _ => panic!("binary label out of range: {}", label),
        }
    }

    /// Binary label for one of this dimension's pole letters.
    pub fn label_for(self, letter: char) -> Option<usize> {
        let (zero, one) = self.letters();
        let upper = letter.to_ascii_uppercase();
        if upper == zero {
            Some(0)
        } else if upper == one {
            Some(1)
        } else {
            None
        }
    }

    /// Label for this dimension's letter within a full 4-letter type string.
    pub fn label_in_type(self, mbti_type: &str) -> Option<usize> {
        mbti_type
            .chars()
            .nth(self.index())
            .and_then(|letter| self.label_for(letter))
    }

    /// Parse a CLI argument such as "ei" or "EI".
    pub fn from_code(code: &str) -> Option<Dimension> {
        match code.to_ascii_lowercase().as_str() {
            "ei" => Some(Dimension::Ei),
            "ns" => Some(Dimension::Ns),
            "tf" => Some(Dimension::Tf),
            "jp" => Some(Dimension::Jp),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (zero, one) = self.letters();
        write!(f, "{}/{}", zero, one)
    }
}
