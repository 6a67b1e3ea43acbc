//! Enumeration of the probe space for a filter combination.

use crate::catalog::Item;
use crate::taxonomy::{topics_for_subject, Difficulty};

/// Highest question number probed per topic/difficulty folder.
pub const MAX_QUESTION_NUMBER: u8 = 10;

/// Only this extension is probed.
pub const IMAGE_EXTENSION: &str = "jpeg";

pub const QUESTIONS_FOLDER: &str = "questions";
pub const MARK_SCHEMES_FOLDER: &str = "mark-schemes";

/// Path of a question image relative to the asset root.
pub fn question_path(
    subject: &str,
    year: &str,
    topic: &str,
    difficulty: Difficulty,
    number: u8,
) -> String {
    asset_path(QUESTIONS_FOLDER, subject, year, topic, difficulty, number)
}

/// Path of a mark scheme image relative to the asset root.
pub fn mark_scheme_path(
    subject: &str,
    year: &str,
    topic: &str,
    difficulty: Difficulty,
    number: u8,
) -> String {
    asset_path(MARK_SCHEMES_FOLDER, subject, year, topic, difficulty, number)
}

fn asset_path(
    folder: &str,
    subject: &str,
    year: &str,
    topic: &str,
    difficulty: Difficulty,
    number: u8,
) -> String {
    format!(
        "{}/{}/{}/{}/{}/q{}.{}",
        folder, subject, year, topic, difficulty, number, IMAGE_EXTENSION
    )
}

/// Percent-encode each segment of a relative asset path for use in a URL.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL of an asset under `base`, which may be an origin-relative root
/// (`/`), an http(s) URL or a `file://` URL.
pub fn asset_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), encode_path(path))
}

/// Build every candidate item for a subject/year, optionally narrowed
/// to one topic and/or one difficulty.
///
/// Order is topic-major, then difficulty, then question number. Each
/// candidate carries both its question and mark scheme path; the mark
/// scheme flag starts out false.
pub fn generate_candidates(
    subject: &str,
    year: &str,
    topic: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<Item> {
    let topics: Vec<&str> = match topic {
        Some(t) => vec![t],
        None => topics_for_subject(subject).to_vec(),
    };
    let difficulties: Vec<Difficulty> = match difficulty {
        Some(d) => vec![d],
        None => Difficulty::ALL.to_vec(),
    };

    let mut candidates =
        Vec::with_capacity(topics.len() * difficulties.len() * MAX_QUESTION_NUMBER as usize);

    for topic in &topics {
        for &difficulty in &difficulties {
            for number in 1..=MAX_QUESTION_NUMBER {
                candidates.push(Item {
                    subject: subject.to_string(),
                    year: year.to_string(),
                    topic: topic.to_string(),
                    difficulty,
                    number,
                    question_path: question_path(subject, year, topic, difficulty, number),
                    mark_scheme_path: mark_scheme_path(subject, year, topic, difficulty, number),
                    has_mark_scheme: false,
                    title: format!("Question {}", number),
                });
            }
        }
    }

    candidates
}
