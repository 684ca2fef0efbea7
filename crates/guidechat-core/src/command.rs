//! Commands fed into the controller and the backend work it asks for

use guidechat_api::{BackendReply, FaqAnswer, Gateway, LanguageCode, SearchResults};

/// User intents dispatched into the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask a free-form question
    Submit(String),
    /// Pick one of the suggested FAQ questions
    SelectSuggestion(String),
    /// Escalate the last unanswered question to web search
    TriggerSearch,
    /// Switch the conversation language
    SetLanguage(LanguageCode),
    /// Reset the transcript to the greeting
    Clear,
}

/// A backend call the host must perform for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Ask {
        question: String,
        language: LanguageCode,
    },
    FaqAnswer {
        question: String,
        language: LanguageCode,
    },
    Search {
        query: String,
        language: LanguageCode,
    },
}

impl Request {
    /// Perform the call against a gateway
    pub async fn send(&self, gateway: &dyn Gateway) -> guidechat_api::Result<Reply> {
        match self {
            Request::Ask { question, language } => {
                gateway.ask(question, language).await.map(Reply::Asked)
            }
            Request::FaqAnswer { question, language } => gateway
                .answer_faq(question, language)
                .await
                .map(Reply::FaqAnswered),
            Request::Search { query, language } => {
                gateway.search(query, language).await.map(Reply::Searched)
            }
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Request::Ask { .. } => "ask",
            Request::FaqAnswer { .. } => "faq_answer",
            Request::Search { .. } => "search",
        }
    }
}

/// A successful backend reply, tagged by the call that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Asked(BackendReply),
    FaqAnswered(FaqAnswer),
    Searched(SearchResults),
}
