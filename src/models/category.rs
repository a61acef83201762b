use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The three independent evaluation rubrics.
///
/// A closed enum: there is no way to reach the evaluator with a category it
/// does not know about. String forms ("sentiment", "dear_man", "fast") are
/// used for prompts, storage, and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Per-message sentiment classification (positive/negative/neutral).
    Sentiment,
    /// Seven-skill DEAR MAN communication rubric.
    DearMan,
    /// Four-skill FAST values rubric.
    Fast,
}

/// DEAR MAN skill names, in rubric order.
pub const DEAR_MAN_SKILLS: [&str; 7] = [
    "describe",
    "express",
    "assert",
    "reinforce",
    "mindful",
    "appear_confident",
    "negotiate",
];

/// FAST skill names, in rubric order.
pub const FAST_SKILLS: [&str; 4] = ["fair", "apologies", "stick_to_values", "truthful"];

impl Category {
    /// All categories, in evaluation order.
    pub const ALL: [Category; 3] = [Category::Sentiment, Category::DearMan, Category::Fast];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sentiment => "sentiment",
            Category::DearMan => "dear_man",
            Category::Fast => "fast",
        }
    }

    /// Named skills (sub-categories) for rubric categories. Sentiment has none.
    pub fn skills(&self) -> &'static [&'static str] {
        match self {
            Category::Sentiment => &[],
            Category::DearMan => &DEAR_MAN_SKILLS,
            Category::Fast => &FAST_SKILLS,
        }
    }

}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown category `{0}` (expected sentiment, dear_man, or fast)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentiment" => Ok(Category::Sentiment),
            "dear_man" => Ok(Category::DearMan),
            "fast" => Ok(Category::Fast),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = "dearman".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("dearman"));
    }

    #[test]
    fn test_skill_counts() {
        assert_eq!(Category::DearMan.skills().len(), 7);
        assert_eq!(Category::Fast.skills().len(), 4);
        assert!(Category::Sentiment.skills().is_empty());
    }
}
