//! Conversation controller: the per-widget state machine
//!
//! ```text
//! Idle --Submit--> AwaitingPrimary --reply--> Idle (+ suggestions | search trigger)
//! Idle --SelectSuggestion--> AwaitingFaq --reply--> Idle
//! Idle --TriggerSearch--> AwaitingSearch --reply--> Idle
//! ```
//!
//! Hosts drive it in two steps: [`Controller::dispatch`] applies a command and
//! returns the backend [`Request`] to perform, and [`Controller::resolve`]
//! feeds the outcome back. [`Controller::handle`] does both for hosts that can
//! simply await the call.

use guidechat_api::{BackendReply, Gateway, LanguageCode, SearchResults, SuggestionSet};
use std::fmt::Display;

use crate::{
    command::{Command, Reply, Request},
    conversation::{ConversationState, Message, Phase, SearchTrigger},
    error::{Rejection, Result},
    language::LanguageCatalog,
    surface::Surface,
};

/// Greeting shown on an empty transcript
pub const DEFAULT_GREETING: &str = "Ask me a question based on the guidelines";
/// System message shown while a web search runs
pub const SEARCHING_TEXT: &str = "Searching the web...";
/// Shown when a web search comes back empty
pub const NO_RESULTS_TEXT: &str = "No results found.";

/// Controller configuration
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Greeting the transcript is reset to
    pub greeting: String,
    /// Initial language
    pub language: LanguageCode,
    /// Languages the user may switch to
    pub languages: LanguageCatalog,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            language: LanguageCode::default(),
            languages: LanguageCatalog::default(),
        }
    }
}

/// Fallback UI shown once a primary turn has unlocked input
enum Fallback {
    Suggestions(SuggestionSet),
    Search(String),
}

/// Drives one chat surface through question/answer turns
pub struct Controller<S: Surface> {
    config: ControllerConfig,
    state: ConversationState,
    phase: Phase,
    in_flight: Option<Request>,
    search_trigger: Option<SearchTrigger>,
    surface: S,
}

impl<S: Surface> Controller<S> {
    /// Create a controller and reset the surface to the greeting
    pub fn new(config: ControllerConfig, mut surface: S) -> Self {
        surface.clear(&Message::system(config.greeting.clone()));
        surface.unlock();
        Self {
            state: ConversationState::new(config.language.clone()),
            config,
            phase: Phase::Idle,
            in_flight: None,
            search_trigger: None,
            surface,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase.is_idle()
    }

    pub fn language(&self) -> &LanguageCode {
        &self.state.language
    }

    pub fn languages(&self) -> &LanguageCatalog {
        &self.config.languages
    }

    pub fn active_suggestions(&self) -> Option<&SuggestionSet> {
        self.state.active_suggestions.as_ref()
    }

    pub fn search_trigger(&self) -> Option<&SearchTrigger> {
        self.search_trigger.as_ref()
    }

    /// The request currently awaited, if any
    pub fn in_flight(&self) -> Option<&Request> {
        self.in_flight.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Apply a command. Returns the backend call to make, if the command needs one.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<Request>> {
        let result = match command {
            Command::Submit(question) => self.submit(&question).map(Some),
            Command::SelectSuggestion(question) => self.select_suggestion(&question).map(Some),
            Command::TriggerSearch => self.trigger_search().map(Some),
            Command::SetLanguage(code) => self.set_language(code).map(|()| None),
            Command::Clear => self.clear().map(|()| None),
        };

        if let Err(rejection) = &result {
            if !rejection.is_silent() {
                tracing::warn!(phase = ?self.phase, "command rejected: {}", rejection);
            }
        }
        result
    }

    /// Dispatch a command and, if it needs the backend, await the reply and resolve it.
    pub async fn handle(&mut self, command: Command, gateway: &dyn Gateway) -> Result<()> {
        let Some(request) = self.dispatch(command)? else {
            return Ok(());
        };
        let outcome = request.send(gateway).await;
        self.resolve(outcome)
    }

    /// Start a primary turn
    pub fn submit(&mut self, question: &str) -> Result<Request> {
        self.ensure_idle()?;
        let question = question.trim();
        if question.is_empty() {
            return Err(Rejection::EmptyQuestion);
        }

        self.retire_fallbacks();
        self.begin(Phase::AwaitingPrimary);
        self.surface.append_message(&Message::user(question));
        self.surface.append_typing();

        Ok(self.track(Request::Ask {
            question: question.to_string(),
            language: self.state.language.clone(),
        }))
    }

    /// Start an FAQ sub-cycle for a question from the visible panel
    pub fn select_suggestion(&mut self, question: &str) -> Result<Request> {
        self.ensure_idle()?;
        let offered = self
            .state
            .active_suggestions
            .as_ref()
            .is_some_and(|set| set.contains(question));
        if !offered {
            return Err(Rejection::UnknownSuggestion(question.to_string()));
        }

        // Consumed now so the same panel can never fire a second time
        self.state.active_suggestions = None;

        self.begin(Phase::AwaitingFaq);
        self.surface.append_message(&Message::user(question));
        self.surface.append_typing();

        Ok(self.track(Request::FaqAnswer {
            question: question.to_string(),
            language: self.state.language.clone(),
        }))
    }

    /// Fire the search trigger
    pub fn trigger_search(&mut self) -> Result<Request> {
        self.ensure_idle()?;
        let query = match self.search_trigger.as_mut() {
            Some(trigger) if trigger.enabled => {
                trigger.enabled = false;
                trigger.query.clone()
            }
            _ => return Err(Rejection::NoSearchTrigger),
        };

        self.begin(Phase::AwaitingSearch);
        self.surface.append_message(&Message::system(SEARCHING_TEXT));
        self.surface.disable_search_trigger();

        Ok(self.track(Request::Search {
            query,
            language: self.state.language.clone(),
        }))
    }

    /// Switch language and start over with a single announcement
    pub fn set_language(&mut self, code: LanguageCode) -> Result<()> {
        self.ensure_idle()?;
        let Some(language) = self.config.languages.find(&code).cloned() else {
            return Err(Rejection::UnknownLanguage(code));
        };

        tracing::debug!(from = %self.state.language, to = %language.code, "language switched");
        self.state.language = language.code;
        self.retire_fallbacks();
        self.surface.clear(&Message::system(format!(
            "Language switched to {}",
            language.name
        )));
        Ok(())
    }

    /// Reset the transcript to the greeting
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.retire_fallbacks();
        self.surface
            .clear(&Message::system(self.config.greeting.clone()));
        Ok(())
    }

    /// Finish the current turn with the backend outcome.
    ///
    /// Success and failure share one cleanup tail, so input is always unlocked
    /// and the controller always returns to `Idle`.
    pub fn resolve(&mut self, outcome: guidechat_api::Result<Reply>) -> Result<()> {
        let phase = self.phase;
        let Some(request) = self.in_flight.take() else {
            return Err(Rejection::NotAwaiting);
        };

        self.surface.remove_typing();

        let mut fallback = None;
        match (phase, outcome) {
            (Phase::AwaitingPrimary, Ok(Reply::Asked(reply))) => {
                fallback = self.render_primary(reply, &request);
            }
            (Phase::AwaitingFaq, Ok(Reply::FaqAnswered(answer))) => {
                self.surface.append_message(&Message::assistant(answer.text));
            }
            (Phase::AwaitingSearch, Ok(Reply::Searched(results))) => {
                self.surface
                    .append_message(&Message::assistant(join_results(results)));
            }
            (_, Ok(reply)) => {
                tracing::warn!(?phase, ?reply, "reply does not match the awaited request");
                self.append_error(&"unexpected reply from the backend");
            }
            (_, Err(e)) => {
                tracing::warn!(endpoint = request.endpoint(), error = %e, "backend call failed");
                self.append_error(&e);
            }
        }

        match phase {
            Phase::AwaitingFaq => self.surface.dismiss_suggestions(),
            Phase::AwaitingSearch => {
                self.search_trigger = None;
                self.surface.remove_search_trigger();
            }
            Phase::AwaitingPrimary | Phase::Idle => {}
        }
        self.finish();

        match fallback {
            Some(Fallback::Suggestions(set)) => {
                self.surface.show_suggestions(&set);
                self.state.active_suggestions = Some(set);
            }
            Some(Fallback::Search(query)) => {
                self.surface.show_search_trigger(&query);
                self.search_trigger = Some(SearchTrigger::new(query));
            }
            None => {}
        }
        Ok(())
    }

    fn render_primary(&mut self, reply: BackendReply, request: &Request) -> Option<Fallback> {
        match reply {
            BackendReply::Answered { text } => {
                self.surface.append_message(&Message::assistant(text));
                None
            }
            BackendReply::Unavailable {
                text,
                faq_suggestions,
            } => {
                if !text.trim().is_empty() {
                    self.surface.append_message(&Message::assistant(text));
                }
                match (faq_suggestions, request) {
                    (Some(set), _) => Some(Fallback::Suggestions(set)),
                    (None, Request::Ask { question, .. }) => {
                        Some(Fallback::Search(question.clone()))
                    }
                    (None, _) => None,
                }
            }
        }
    }

    fn append_error(&mut self, error: &dyn Display) {
        self.surface.append_message(&Message::system(format!(
            "Something went wrong: {}. Please try again.",
            error
        )));
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.phase.is_idle() {
            Ok(())
        } else {
            Err(Rejection::Busy)
        }
    }

    fn begin(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "turn started");
        self.phase = phase;
        self.state.pending = true;
        self.surface.lock();
    }

    fn finish(&mut self) {
        tracing::debug!(from = ?self.phase, "turn finished");
        self.phase = Phase::Idle;
        self.state.pending = false;
        self.surface.unlock();
    }

    fn track(&mut self, request: Request) -> Request {
        self.in_flight = Some(request.clone());
        request
    }

    fn retire_fallbacks(&mut self) {
        if self.state.active_suggestions.take().is_some() {
            self.surface.dismiss_suggestions();
        }
        if self.search_trigger.take().is_some() {
            self.surface.remove_search_trigger();
        }
    }
}

fn join_results(results: SearchResults) -> String {
    if results.answers.is_empty() {
        NO_RESULTS_TEXT.to_string()
    } else {
        results.answers.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::surface::{InputGate, SuggestionPanel, Transcript};
    use async_trait::async_trait;
    use guidechat_api::{Error as GatewayError, FaqAnswer};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    // ===== Recording surface =====

    /// What the fake surface currently shows
    #[derive(Debug, Default)]
    struct Screen {
        messages: Vec<Message>,
        typing: bool,
        locked: bool,
        lock_calls: u32,
        unlock_calls: u32,
        panel: Option<Vec<String>>,
        panels_shown: u32,
        trigger: Option<(String, bool)>,
    }

    #[derive(Clone, Default)]
    struct RecordingSurface {
        screen: Arc<Mutex<Screen>>,
    }

    impl Transcript for RecordingSurface {
        fn append_message(&mut self, message: &Message) {
            self.screen.lock().messages.push(message.clone());
        }
        fn append_typing(&mut self) {
            self.screen.lock().typing = true;
        }
        fn remove_typing(&mut self) {
            self.screen.lock().typing = false;
        }
        fn clear(&mut self, first: &Message) {
            let mut screen = self.screen.lock();
            screen.messages = vec![first.clone()];
            screen.typing = false;
            screen.panel = None;
            screen.trigger = None;
        }
    }

    impl InputGate for RecordingSurface {
        fn lock(&mut self) {
            let mut screen = self.screen.lock();
            screen.locked = true;
            screen.lock_calls += 1;
        }
        fn unlock(&mut self) {
            let mut screen = self.screen.lock();
            screen.locked = false;
            screen.unlock_calls += 1;
        }
    }

    impl SuggestionPanel for RecordingSurface {
        fn show_suggestions(&mut self, suggestions: &SuggestionSet) {
            let mut screen = self.screen.lock();
            assert!(screen.panel.is_none(), "a second panel was shown over the first");
            screen.panel = Some(suggestions.questions.clone());
            screen.panels_shown += 1;
        }
        fn dismiss_suggestions(&mut self) {
            self.screen.lock().panel = None;
        }
        fn show_search_trigger(&mut self, query: &str) {
            self.screen.lock().trigger = Some((query.to_string(), true));
        }
        fn disable_search_trigger(&mut self) {
            if let Some(trigger) = self.screen.lock().trigger.as_mut() {
                trigger.1 = false;
            }
        }
        fn remove_search_trigger(&mut self) {
            self.screen.lock().trigger = None;
        }
    }

    // ===== Scripted gateway =====

    /// A gateway that plays back canned outcomes and records every call.
    struct ScriptedGateway {
        outcomes: Mutex<VecDeque<guidechat_api::Result<Reply>>>,
        calls: Mutex<Vec<(&'static str, String, String)>>,
        /// Whether the surface was locked at the moment of each call
        locked_during_call: Mutex<Vec<bool>>,
        screen: Option<Arc<Mutex<Screen>>>,
    }

    impl ScriptedGateway {
        fn new(outcomes: Vec<guidechat_api::Result<Reply>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(Vec::new()),
                locked_during_call: Mutex::new(Vec::new()),
                screen: None,
            }
        }

        fn watching(mut self, surface: &RecordingSurface) -> Self {
            self.screen = Some(surface.screen.clone());
            self
        }

        fn next(&self, endpoint: &'static str, text: &str, language: &LanguageCode) -> guidechat_api::Result<Reply> {
            self.calls
                .lock()
                .push((endpoint, text.to_string(), language.to_string()));
            if let Some(screen) = &self.screen {
                self.locked_during_call.lock().push(screen.lock().locked);
            }
            self.outcomes
                .lock()
                .pop_front()
                .expect("gateway called more often than scripted")
        }

        fn calls(&self) -> Vec<(&'static str, String, String)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Gateway for ScriptedGateway {
        async fn ask(&self, question: &str, language: &LanguageCode) -> guidechat_api::Result<BackendReply> {
            match self.next("ask", question, language)? {
                Reply::Asked(reply) => Ok(reply),
                other => panic!("scripted {other:?} for ask"),
            }
        }

        async fn answer_faq(&self, question: &str, language: &LanguageCode) -> guidechat_api::Result<FaqAnswer> {
            match self.next("faq_answer", question, language)? {
                Reply::FaqAnswered(answer) => Ok(answer),
                other => panic!("scripted {other:?} for answer_faq"),
            }
        }

        async fn search(&self, query: &str, language: &LanguageCode) -> guidechat_api::Result<SearchResults> {
            match self.next("search", query, language)? {
                Reply::Searched(results) => Ok(results),
                other => panic!("scripted {other:?} for search"),
            }
        }
    }

    // ===== Helpers =====

    fn make_controller() -> (Controller<RecordingSurface>, RecordingSurface) {
        let surface = RecordingSurface::default();
        let controller = Controller::new(ControllerConfig::default(), surface.clone());
        (controller, surface)
    }

    fn answered(text: &str) -> guidechat_api::Result<Reply> {
        Ok(Reply::Asked(BackendReply::Answered { text: text.into() }))
    }

    fn unavailable_with(text: &str, questions: &[&str]) -> guidechat_api::Result<Reply> {
        Ok(Reply::Asked(BackendReply::Unavailable {
            text: text.into(),
            faq_suggestions: Some(SuggestionSet::new(
                questions.iter().map(|q| q.to_string()).collect(),
            )),
        }))
    }

    fn unavailable(text: &str) -> guidechat_api::Result<Reply> {
        Ok(Reply::Asked(BackendReply::Unavailable {
            text: text.into(),
            faq_suggestions: None,
        }))
    }

    fn faq(text: &str) -> guidechat_api::Result<Reply> {
        Ok(Reply::FaqAnswered(FaqAnswer { text: text.into() }))
    }

    fn searched(answers: &[&str]) -> guidechat_api::Result<Reply> {
        Ok(Reply::Searched(SearchResults {
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }))
    }

    // ===== Submission =====

    #[test]
    fn test_new_controller_shows_greeting_unlocked() {
        let (controller, surface) = make_controller();
        let screen = surface.screen.lock();
        assert_eq!(screen.messages, vec![Message::system(DEFAULT_GREETING)]);
        assert!(!screen.locked);
        assert!(controller.is_idle());
        assert!(!controller.state().pending);
    }

    #[test]
    fn test_submit_locks_before_reply() {
        let (mut controller, surface) = make_controller();

        let request = controller
            .dispatch(Command::Submit("  What is the return policy?  ".into()))
            .unwrap();

        assert_eq!(
            request,
            Some(Request::Ask {
                question: "What is the return policy?".into(),
                language: LanguageCode::new("en"),
            })
        );
        assert_eq!(controller.phase(), Phase::AwaitingPrimary);
        assert!(controller.state().pending);

        let screen = surface.screen.lock();
        assert!(screen.locked);
        assert!(screen.typing);
        assert_eq!(
            screen.messages.last(),
            Some(&Message::user("What is the return policy?"))
        );
    }

    #[test]
    fn test_empty_questions_are_ignored() {
        let (mut controller, surface) = make_controller();

        for question in ["", "   ", "\n\t "] {
            let result = controller.dispatch(Command::Submit(question.into()));
            assert_eq!(result, Err(Rejection::EmptyQuestion));
        }

        assert!(controller.is_idle());
        assert!(controller.in_flight().is_none());
        let screen = surface.screen.lock();
        assert!(!screen.locked);
        assert_eq!(screen.lock_calls, 0);
        assert_eq!(screen.messages.len(), 1);
    }

    #[test]
    fn test_second_submit_while_waiting_is_rejected() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("first".into())).unwrap();

        let result = controller.dispatch(Command::Submit("second".into()));
        assert_eq!(result, Err(Rejection::Busy));
        assert_eq!(surface.screen.lock().lock_calls, 1);
        assert_eq!(
            controller.in_flight(),
            Some(&Request::Ask {
                question: "first".into(),
                language: LanguageCode::new("en"),
            })
        );
    }

    #[test]
    fn test_resolve_without_request_is_rejected() {
        let (mut controller, _surface) = make_controller();
        assert_eq!(controller.resolve(answered("x")), Err(Rejection::NotAwaiting));
    }

    // ===== Scenario A: answered =====

    #[tokio::test]
    async fn test_answered_turn() {
        let (mut controller, surface) = make_controller();
        let gateway = ScriptedGateway::new(vec![answered("30 days.")]).watching(&surface);

        controller
            .handle(Command::Submit("What is the return policy?".into()), &gateway)
            .await
            .unwrap();

        assert!(controller.is_idle());
        assert_eq!(*gateway.locked_during_call.lock(), vec![true]);

        let screen = surface.screen.lock();
        assert_eq!(screen.messages.last(), Some(&Message::assistant("30 days.")));
        assert!(!screen.locked);
        assert!(!screen.typing);
        assert_eq!((screen.lock_calls, screen.unlock_calls), (1, 2));
        assert!(screen.panel.is_none());
        assert!(screen.trigger.is_none());
    }

    // ===== Scenario B: FAQ fallback =====

    #[tokio::test]
    async fn test_faq_fallback_turn() {
        let (mut controller, surface) = make_controller();
        let gateway = ScriptedGateway::new(vec![
            unavailable_with("Not available.", &["Q1", "Q2"]),
            faq("Answer one."),
        ]);

        controller
            .handle(Command::Submit("foo".into()), &gateway)
            .await
            .unwrap();

        {
            let screen = surface.screen.lock();
            assert_eq!(screen.panel, Some(vec!["Q1".to_string(), "Q2".to_string()]));
            assert_eq!(screen.messages.last(), Some(&Message::assistant("Not available.")));
            assert!(!screen.locked);
        }
        assert_eq!(
            controller.active_suggestions().map(|s| s.len()),
            Some(2)
        );

        controller
            .handle(Command::SelectSuggestion("Q1".into()), &gateway)
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                ("ask", "foo".to_string(), "en".to_string()),
                ("faq_answer", "Q1".to_string(), "en".to_string()),
            ]
        );

        let screen = surface.screen.lock();
        assert!(screen.panel.is_none());
        assert!(!screen.locked);
        let tail: Vec<_> = screen.messages.iter().rev().take(2).rev().cloned().collect();
        assert_eq!(tail, vec![Message::user("Q1"), Message::assistant("Answer one.")]);
        assert!(controller.active_suggestions().is_none());
    }

    #[test]
    fn test_suggestion_selection_is_one_shot() {
        let (mut controller, _surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller
            .resolve(unavailable_with("", &["Q1", "Q2"]))
            .unwrap();

        controller
            .dispatch(Command::SelectSuggestion("Q1".into()))
            .unwrap();
        controller.resolve(faq("A1")).unwrap();

        let again = controller.dispatch(Command::SelectSuggestion("Q2".into()));
        assert_eq!(again, Err(Rejection::UnknownSuggestion("Q2".into())));
    }

    #[test]
    fn test_unknown_suggestion_is_rejected() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller.resolve(unavailable_with("", &["Q1"])).unwrap();

        let result = controller.dispatch(Command::SelectSuggestion("Q9".into()));
        assert_eq!(result, Err(Rejection::UnknownSuggestion("Q9".into())));
        assert!(controller.is_idle());
        assert!(surface.screen.lock().panel.is_some());
    }

    #[test]
    fn test_empty_unavailable_text_is_not_appended() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller.resolve(unavailable_with("  ", &["Q1"])).unwrap();

        let screen = surface.screen.lock();
        assert_eq!(screen.messages.last(), Some(&Message::user("foo")));
    }

    #[test]
    fn test_new_panel_replaces_old_one() {
        let (mut controller, surface) = make_controller();

        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller.resolve(unavailable_with("", &["Q1", "Q2"])).unwrap();
        controller.dispatch(Command::Submit("baz".into())).unwrap();

        // The old panel disappears as soon as a new question is asked
        assert!(surface.screen.lock().panel.is_none());

        controller.resolve(unavailable_with("", &["Q3"])).unwrap();

        let screen = surface.screen.lock();
        assert_eq!(screen.panel, Some(vec!["Q3".to_string()]));
        assert_eq!(screen.panels_shown, 2);
        assert_eq!(
            controller.active_suggestions(),
            Some(&SuggestionSet::new(vec!["Q3".into()]))
        );
    }

    // ===== Scenario C: web search fallback =====

    #[tokio::test]
    async fn test_search_fallback_turn() {
        let (mut controller, surface) = make_controller();
        let gateway = ScriptedGateway::new(vec![
            unavailable("I don't know."),
            searched(&["first hit", "second hit"]),
        ]);

        controller
            .handle(Command::Submit("bar".into()), &gateway)
            .await
            .unwrap();

        assert_eq!(
            surface.screen.lock().trigger,
            Some(("bar".to_string(), true))
        );
        assert!(surface.screen.lock().panel.is_none());

        controller
            .handle(Command::TriggerSearch, &gateway)
            .await
            .unwrap();

        assert_eq!(gateway.calls()[1], ("search", "bar".to_string(), "en".to_string()));

        let screen = surface.screen.lock();
        assert!(screen.trigger.is_none());
        assert!(!screen.locked);
        let n = screen.messages.len();
        assert_eq!(screen.messages[n - 2], Message::system(SEARCHING_TEXT));
        assert_eq!(
            screen.messages[n - 1],
            Message::assistant("first hit\nsecond hit")
        );
        assert!(controller.search_trigger().is_none());
    }

    #[test]
    fn test_search_trigger_disabled_immediately() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("bar".into())).unwrap();
        controller.resolve(unavailable("")).unwrap();

        controller.dispatch(Command::TriggerSearch).unwrap();

        assert_eq!(controller.phase(), Phase::AwaitingSearch);
        assert_eq!(surface.screen.lock().trigger, Some(("bar".to_string(), false)));
        assert!(surface.screen.lock().locked);
        assert_eq!(controller.dispatch(Command::TriggerSearch), Err(Rejection::Busy));
    }

    #[test]
    fn test_trigger_search_without_trigger() {
        let (mut controller, _surface) = make_controller();
        assert_eq!(
            controller.dispatch(Command::TriggerSearch),
            Err(Rejection::NoSearchTrigger)
        );
    }

    #[test]
    fn test_empty_search_results() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("bar".into())).unwrap();
        controller.resolve(unavailable("")).unwrap();
        controller.dispatch(Command::TriggerSearch).unwrap();
        controller.resolve(searched(&[])).unwrap();

        let screen = surface.screen.lock();
        assert_eq!(screen.messages.last(), Some(&Message::assistant(NO_RESULTS_TEXT)));
    }

    #[test]
    fn test_new_submit_retires_search_trigger() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("bar".into())).unwrap();
        controller.resolve(unavailable("")).unwrap();
        controller.dispatch(Command::Submit("other".into())).unwrap();

        assert!(surface.screen.lock().trigger.is_none());
        assert!(controller.search_trigger().is_none());
    }

    // ===== Scenario D: gateway failure =====

    #[tokio::test]
    async fn test_gateway_failure_unlocks() {
        let (mut controller, surface) = make_controller();
        let gateway = ScriptedGateway::new(vec![Err(GatewayError::status(502, "bad gateway"))]);

        controller
            .handle(Command::Submit("foo".into()), &gateway)
            .await
            .unwrap();

        assert!(controller.is_idle());
        let screen = surface.screen.lock();
        assert!(!screen.locked);
        assert!(!screen.typing);

        // greeting, user question, one error
        assert_eq!(screen.messages.len(), 3);
        let error = &screen.messages[2];
        assert_eq!(error.role, Role::System);
        assert!(error.text.contains("502"), "got: {}", error.text);
        assert!(screen.panel.is_none());
        assert!(screen.trigger.is_none());
    }

    #[test]
    fn test_faq_failure_dismisses_panel_and_unlocks() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller.resolve(unavailable_with("", &["Q1"])).unwrap();
        controller
            .dispatch(Command::SelectSuggestion("Q1".into()))
            .unwrap();

        controller
            .resolve(Err(GatewayError::InvalidBaseUrl("simulated".into())))
            .unwrap();

        let screen = surface.screen.lock();
        assert!(screen.panel.is_none());
        assert!(!screen.locked);
        assert_eq!(screen.messages.last().map(|m| m.role), Some(Role::System));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_search_failure_removes_trigger() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("bar".into())).unwrap();
        controller.resolve(unavailable("")).unwrap();
        controller.dispatch(Command::TriggerSearch).unwrap();
        controller
            .resolve(Err(GatewayError::status(500, "")))
            .unwrap();

        let screen = surface.screen.lock();
        assert!(screen.trigger.is_none());
        assert!(!screen.locked);
        assert!(controller.search_trigger().is_none());
    }

    #[test]
    fn test_mismatched_reply_still_unlocks() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller.resolve(faq("wrong endpoint")).unwrap();

        let screen = surface.screen.lock();
        assert!(!screen.locked);
        assert_eq!(screen.messages.last().map(|m| m.role), Some(Role::System));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_lock_and_unlock_are_balanced_per_turn() {
        let (mut controller, surface) = make_controller();
        let before = surface.screen.lock().unlock_calls;

        controller.dispatch(Command::Submit("a".into())).unwrap();
        controller.resolve(answered("b")).unwrap();
        controller.dispatch(Command::Submit("c".into())).unwrap();
        controller.resolve(Err(GatewayError::status(500, ""))).unwrap();

        let screen = surface.screen.lock();
        assert_eq!(screen.lock_calls, 2);
        assert_eq!(screen.unlock_calls - before, 2);
    }

    // ===== Language and clear =====

    #[test]
    fn test_language_switch_leaves_single_announcement() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        controller.resolve(unavailable_with("", &["Q1"])).unwrap();

        let request = controller
            .dispatch(Command::SetLanguage(LanguageCode::new("hi")))
            .unwrap();
        assert!(request.is_none());

        assert_eq!(controller.language(), &LanguageCode::new("hi"));
        assert!(controller.active_suggestions().is_none());

        let screen = surface.screen.lock();
        assert_eq!(
            screen.messages,
            vec![Message::system("Language switched to Hindi")]
        );
        assert!(screen.panel.is_none());
    }

    #[tokio::test]
    async fn test_requests_carry_current_language() {
        let (mut controller, _surface) = make_controller();
        let gateway = ScriptedGateway::new(vec![answered("ok")]);

        controller
            .dispatch(Command::SetLanguage(LanguageCode::new("ta")))
            .unwrap();
        controller
            .handle(Command::Submit("q".into()), &gateway)
            .await
            .unwrap();

        assert_eq!(gateway.calls(), vec![("ask", "q".to_string(), "ta".to_string())]);
    }

    #[test]
    fn test_language_switch_while_waiting_is_rejected() {
        let (mut controller, _surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();

        let result = controller.dispatch(Command::SetLanguage(LanguageCode::new("hi")));
        assert_eq!(result, Err(Rejection::Busy));
        assert_eq!(controller.language(), &LanguageCode::new("en"));
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let (mut controller, _surface) = make_controller();
        let result = controller.dispatch(Command::SetLanguage(LanguageCode::new("xx")));
        assert_eq!(result, Err(Rejection::UnknownLanguage(LanguageCode::new("xx"))));
    }

    #[test]
    fn test_clear_resets_to_greeting() {
        let (mut controller, surface) = make_controller();
        controller.dispatch(Command::Submit("bar".into())).unwrap();
        controller.resolve(unavailable("nope")).unwrap();

        controller.dispatch(Command::Clear).unwrap();

        let screen = surface.screen.lock();
        assert_eq!(screen.messages, vec![Message::system(DEFAULT_GREETING)]);
        assert!(screen.trigger.is_none());
        assert!(controller.search_trigger().is_none());
    }

    #[test]
    fn test_clear_while_waiting_is_rejected() {
        let (mut controller, _surface) = make_controller();
        controller.dispatch(Command::Submit("foo".into())).unwrap();
        assert_eq!(controller.dispatch(Command::Clear), Err(Rejection::Busy));
    }
}
