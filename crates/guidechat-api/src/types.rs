//! Domain and wire types shared by the gateway and its callers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short language code such as `"en"`, passed to the backend unchanged
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::new("en")
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Ordered FAQ questions offered when the primary answer is unavailable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub questions: Vec<String>,
}

impl SuggestionSet {
    pub fn new(questions: Vec<String>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn contains(&self, question: &str) -> bool {
        self.questions.iter().any(|q| q == question)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }
}

/// Normalized reply of the primary `/ask` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    /// The backend found a confident answer
    Answered { text: String },
    /// No confident answer; `text` is the backend's "not available" message
    Unavailable {
        text: String,
        faq_suggestions: Option<SuggestionSet>,
    },
}

/// Reply of the `/faq_answer` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqAnswer {
    pub text: String,
}

/// Reply of the `/google_search` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults {
    pub answers: Vec<String>,
}

// --- Wire formats ---

/// Body of `POST /ask` and `POST /faq_answer`
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
    pub language: &'a LanguageCode,
}

/// Body of `POST /google_search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub language: &'a LanguageCode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: String,
    pub available: bool,
    #[serde(default)]
    pub faq_available: bool,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
}

impl From<AskResponse> for BackendReply {
    fn from(resp: AskResponse) -> Self {
        if resp.available {
            return BackendReply::Answered { text: resp.answer };
        }

        let faq_suggestions = if resp.faq_available {
            resp.suggestions
                .filter(|s| !s.is_empty())
                .map(SuggestionSet::new)
        } else {
            None
        };

        BackendReply::Unavailable {
            text: resp.answer,
            faq_suggestions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqResponse {
    pub answer: String,
}

impl From<FaqResponse> for FaqAnswer {
    fn from(resp: FaqResponse) -> Self {
        Self { text: resp.answer }
    }
}

/// Body of `/google_search`: the results, or the backend's failure message
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Results { answers: Vec<String> },
    Failed { answer: String },
}

impl SearchResponse {
    pub fn into_results(self) -> Result<SearchResults> {
        match self {
            SearchResponse::Results { answers } => Ok(SearchResults { answers }),
            SearchResponse::Failed { answer } => Err(Error::Backend(answer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ask(json: &str) -> BackendReply {
        serde_json::from_str::<AskResponse>(json).unwrap().into()
    }

    #[test]
    fn test_available_collapses_to_answered() {
        let reply = parse_ask(r#"{"answer":"30 days.","available":true,"faq_available":false}"#);
        assert_eq!(
            reply,
            BackendReply::Answered {
                text: "30 days.".into()
            }
        );
    }

    #[test]
    fn test_unavailable_with_faq_keeps_suggestion_order() {
        let reply = parse_ask(
            r#"{"answer":"n/a","available":false,"faq_available":true,"suggestions":["Q1","Q2"]}"#,
        );
        match reply {
            BackendReply::Unavailable {
                faq_suggestions: Some(set),
                ..
            } => assert_eq!(set.questions, vec!["Q1", "Q2"]),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_faq_flag_with_empty_suggestions_means_no_faq() {
        let reply = parse_ask(
            r#"{"answer":"n/a","available":false,"faq_available":true,"suggestions":[]}"#,
        );
        assert!(matches!(
            reply,
            BackendReply::Unavailable {
                faq_suggestions: None,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let reply = parse_ask(r#"{"available":false}"#);
        assert_eq!(
            reply,
            BackendReply::Unavailable {
                text: String::new(),
                faq_suggestions: None
            }
        );
    }

    #[test]
    fn test_suggestions_ignored_without_faq_flag() {
        let reply = parse_ask(
            r#"{"answer":"x","available":false,"faq_available":false,"suggestions":["Q1"]}"#,
        );
        assert!(matches!(
            reply,
            BackendReply::Unavailable {
                faq_suggestions: None,
                ..
            }
        ));
    }

    #[test]
    fn test_question_request_shape() {
        let lang = LanguageCode::new("hi");
        let body = serde_json::to_value(QuestionRequest {
            question: "Q1",
            language: &lang,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"question": "Q1", "language": "hi"}));
    }

    #[test]
    fn test_search_failure_body_carries_backend_text() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"answer":"Error occurred during search: boom"}"#).unwrap();
        match parsed.into_results() {
            Err(Error::Backend(text)) => assert_eq!(text, "Error occurred during search: boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_search_results_keep_order() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"answers":["b","a"]}"#).unwrap();
        assert_eq!(parsed.into_results().unwrap().answers, vec!["b", "a"]);
    }

    #[test]
    fn test_search_body_without_either_field_is_malformed() {
        assert!(serde_json::from_str::<SearchResponse>(r#"{"results":[]}"#).is_err());
    }
}
