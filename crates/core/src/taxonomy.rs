//! Closed enumerations of subjects, years, topics and difficulties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subjects offered by the filter selectors.
pub const SUBJECTS: [&str; 6] = [
    "Mathematics",
    "Computer Science",
    "Physics",
    "Chemistry",
    "Biology",
    "Engineering",
];

/// Years offered by the filter selectors.
pub const YEARS: [&str; 6] = ["2020", "2021", "2022", "2023", "2024", "2025"];

/// Topic list used for subjects outside [`SUBJECTS`].
pub const FALLBACK_TOPICS: [&str; 1] = ["General"];

/// Question difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Topics for a subject. Unknown subjects fall back to `["General"]`.
pub fn topics_for_subject(subject: &str) -> &'static [&'static str] {
    match subject {
        "Mathematics" => &[
            "Algebra",
            "Geometry",
            "Calculus",
            "Statistics",
            "Trigonometry",
            "Probability",
        ],
        "Computer Science" => &[
            "UML Diagrams",
            "Algorithms",
            "Data Structures",
            "Programming",
            "Databases",
            "Networks",
        ],
        "Physics" => &[
            "Mechanics",
            "Thermodynamics",
            "Electromagnetism",
            "Optics",
            "Quantum",
            "Waves",
        ],
        "Chemistry" => &[
            "Organic",
            "Inorganic",
            "Physical",
            "Analytical",
            "Biochemistry",
            "Thermochemistry",
        ],
        "Biology" => &[
            "Cell Biology",
            "Genetics",
            "Evolution",
            "Ecology",
            "Anatomy",
            "Physiology",
        ],
        "Engineering" => &[
            "Structural",
            "Electrical",
            "Mechanical",
            "Civil",
            "Software",
            "Chemical",
        ],
        _ => &FALLBACK_TOPICS,
    }
}
