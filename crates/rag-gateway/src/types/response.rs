//! Response types for completion queries

use serde::{Deserialize, Serialize};

/// Source document referenced by an answer, as reported by the retrieval backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

impl Citation {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Answer with the citations the backend attached to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AugmentedAnswer {
    pub answer: String,
    /// Citations in backend order (may be empty)
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl AugmentedAnswer {
    /// Create an answer with citations
    pub fn new(answer: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            answer: answer.into(),
            citations,
        }
    }

    /// Create an answer without citations
    pub fn uncited(answer: impl Into<String>) -> Self {
        Self::new(answer, Vec::new())
    }
}

/// Result of the image → follow-up chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFollowUpResult {
    /// Raw text the backend produced for the image
    #[serde(rename = "imageResponse")]
    pub image_answer: String,
    /// Retrieval-augmented answer to the follow-up question
    #[serde(rename = "followUpResponse")]
    pub follow_up: AugmentedAnswer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_result_wire_names() {
        let result = ImageFollowUpResult {
            image_answer: "A clock tower".to_string(),
            follow_up: AugmentedAnswer::new(
                "Big Ben is in London",
                vec![Citation::new("London guide", "https://example.com/london")],
            ),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["imageResponse"], "A clock tower");
        assert_eq!(json["followUpResponse"]["answer"], "Big Ben is in London");
        assert_eq!(json["followUpResponse"]["citations"][0]["title"], "London guide");
    }
}
