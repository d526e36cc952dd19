//! Multi-round recommendation session
//!
//! A session owns the [`ExclusionSet`] for its lifetime: every batch shown
//! is folded into it so later rounds never repeat a title.

use crate::config::OutputConfig;
use crate::i18n::Messages;
use crate::input::{CollectError, InputError, LineSource, PreferenceCollector};
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use bookbot_application::{
    AttemptError, CompletionError, GatewayError, NoProgress, RecommendBooksError,
    RecommendBooksInput, RecommendBooksUseCase, RoundProgressNotifier,
};
use bookbot_domain::{ExclusionSet, InputSanitizer, Language, Preferences};
use std::io::{IsTerminal, Write};
use tracing::{info, warn};

/// How a session ended
#[derive(Debug)]
pub enum SessionEnd {
    /// The user declined more, or `once` was set
    Finished,
    /// A round failed; nothing from it was shown
    Failed(RecommendBooksError),
    /// Input closed or interrupted at the "more?" prompt
    InputClosed,
}

#[derive(Debug)]
pub struct SessionSummary {
    pub rounds: usize,
    pub recommended: usize,
    pub end: SessionEnd,
}

/// Localized lines explaining a failed round
pub fn failure_message(error: &RecommendBooksError, messages: &Messages) -> String {
    match error {
        RecommendBooksError::Cancelled
        | RecommendBooksError::Completion(CompletionError::Cancelled) => {
            messages.cancelled.to_string()
        }
        RecommendBooksError::Completion(CompletionError::Exhausted {
            cause: AttemptError::Gateway(GatewayError::Unauthorized(_)),
            ..
        }) => messages.fail_auth.to_string(),
        RecommendBooksError::OnlyDuplicates { .. } => {
            format!("{}\n{}", messages.fail_duplicates, messages.fail_later)
        }
        _ => format!("{}\n{}", messages.fail_all, messages.fail_later),
    }
}

/// Drives rounds until the user stops or a round fails
pub struct RecommendationSession<'a, S: LineSource, W: Write> {
    use_case: &'a RecommendBooksUseCase,
    source: &'a mut S,
    out: W,
    sanitizer: &'a InputSanitizer,
    language: Language,
    config: OutputConfig,
    exclusions: ExclusionSet,
}

impl<'a, S: LineSource, W: Write> RecommendationSession<'a, S, W> {
    pub fn new(
        use_case: &'a RecommendBooksUseCase,
        source: &'a mut S,
        out: W,
        sanitizer: &'a InputSanitizer,
        language: Language,
        config: OutputConfig,
    ) -> Self {
        Self {
            use_case,
            source,
            out,
            sanitizer,
            language,
            config,
            exclusions: ExclusionSet::new(),
        }
    }

    /// Titles shown so far in this session
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    fn progress(&self) -> Box<dyn RoundProgressNotifier> {
        let messages = Messages::for_language(self.language);
        if !self.config.show_progress {
            Box::new(NoProgress)
        } else if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new(messages))
        } else {
            Box::new(SimpleProgress::new(messages))
        }
    }

    /// Run rounds for `preferences` until the session ends.
    pub async fn run(&mut self, preferences: Preferences) -> Result<SessionSummary, CollectError> {
        let messages = Messages::for_language(self.language);
        let input = RecommendBooksInput::new(preferences, self.language);
        let mut rounds = 0;
        let mut recommended = 0;

        let end = loop {
            let progress = self.progress();
            let output = match self
                .use_case
                .execute(&input, &self.exclusions, progress.as_ref())
                .await
            {
                Ok(output) => output,
                Err(e) => {
                    writeln!(self.out, "\n{}", failure_message(&e, messages))?;
                    break SessionEnd::Failed(e);
                }
            };

            rounds += 1;
            recommended += output.batch.len();
            let rendered = ConsoleFormatter::render(&output.batch, self.config.format, self.language)
                .inspect_err(|e| warn!(error = %e, "Failed to render recommendations"))?;
            writeln!(self.out, "{rendered}")?;
            self.exclusions.extend_from_batch(&output.batch);
            info!(
                round = rounds,
                excluded = self.exclusions.len(),
                "Recommendations shown"
            );

            if self.config.once {
                break SessionEnd::Finished;
            }

            let more = PreferenceCollector::new(
                &mut *self.source,
                &mut self.out,
                self.sanitizer,
                self.language,
            )
            .ask_more();
            match more {
                Ok(true) => writeln!(self.out, "\n{}\n", messages.more_yes)?,
                Ok(false) => {
                    writeln!(self.out, "\n{}", messages.more_no)?;
                    break SessionEnd::Finished;
                }
                Err(CollectError::Input(InputError::Closed | InputError::Interrupted)) => {
                    writeln!(self.out, "\n{}", messages.bye)?;
                    break SessionEnd::InputClosed;
                }
                Err(e) => return Err(e),
            }
        };

        Ok(SessionSummary {
            rounds,
            recommended,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::line_source::testing::ScriptedLines;
    use async_trait::async_trait;
    use bookbot_application::{CompletionRequest, LlmGateway, PipelineConfig};
    use bookbot_domain::{Adventurousness, Genre};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct MockGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        user_prompts: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                user_prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
            self.user_prompts
                .lock()
                .unwrap()
                .push(request.user_prompt.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
        }
    }

    fn books_json(titles: &[&str]) -> String {
        let items: Vec<_> = titles
            .iter()
            .map(|t| {
                serde_json::json!({
                    "title": t,
                    "author": "Some Author",
                    "year": 1990,
                    "explanation": "Fits the requested mood very well."
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    fn preferences() -> Preferences {
        Preferences::new(
            vec![Genre::Mystery],
            vec!["Rebecca".to_string(), "Gone Girl".to_string()],
            Adventurousness::new(2).unwrap(),
            &InputSanitizer::default(),
        )
        .unwrap()
    }

    fn use_case(gateway: Arc<MockGateway>) -> RecommendBooksUseCase {
        RecommendBooksUseCase::new(
            gateway,
            PipelineConfig::default().with_backoff(Duration::ZERO),
        )
    }

    fn quiet_text() -> OutputConfig {
        OutputConfig {
            show_progress: false,
            color: false,
            ..OutputConfig::default()
        }
    }

    #[tokio::test]
    async fn test_two_rounds_exclude_earlier_titles() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(books_json(&["Book A", "Book B", "Book C"])),
            Ok(books_json(&["Book D", "Book E", "Book F"])),
        ]));
        let use_case = use_case(gateway.clone());
        let sanitizer = InputSanitizer::default();
        let mut source = ScriptedLines::new(&["maybe", "yes", "no"]);
        let mut out = Vec::new();

        let mut session = RecommendationSession::new(
            &use_case,
            &mut source,
            &mut out,
            &sanitizer,
            Language::En,
            quiet_text(),
        );
        let summary = session.run(preferences()).await.unwrap();
        assert_eq!(session.exclusions().len(), 6);
        drop(session);

        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.recommended, 6);
        assert!(matches!(summary.end, SessionEnd::Finished));

        let prompts = gateway.user_prompts.lock().unwrap();
        assert!(!prompts[0].contains("Book A"));
        assert!(prompts[1].contains("Book A"));
        assert!(prompts[1].contains("Book C"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please type 'yes' or 'no'."));
        assert!(text.contains("Happy reading!"));
    }

    #[tokio::test]
    async fn test_once_stops_after_first_round() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(books_json(&[
            "Book A", "Book B", "Book C",
        ]))]));
        let use_case = use_case(gateway);
        let sanitizer = InputSanitizer::default();
        let mut source = ScriptedLines::new(&[]);
        let mut out = Vec::new();
        let config = OutputConfig {
            once: true,
            format: bookbot_domain::OutputFormat::Json,
            ..quiet_text()
        };

        let summary = RecommendationSession::new(
            &use_case,
            &mut source,
            &mut out,
            &sanitizer,
            Language::En,
            config,
        )
        .run(preferences())
        .await
        .unwrap();

        assert_eq!(summary.rounds, 1);
        assert!(source.prompts.is_empty());
        let value: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().trim()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_round_shows_localized_message() {
        let gateway = Arc::new(MockGateway::new(vec![
            Err(GatewayError::Timeout),
            Err(GatewayError::Timeout),
            Err(GatewayError::Timeout),
        ]));
        let use_case = use_case(gateway);
        let sanitizer = InputSanitizer::default();
        let mut source = ScriptedLines::new(&[]);
        let mut out = Vec::new();

        let summary = RecommendationSession::new(
            &use_case,
            &mut source,
            &mut out,
            &sanitizer,
            Language::Zh,
            quiet_text(),
        )
        .run(preferences())
        .await
        .unwrap();

        assert_eq!(summary.rounds, 0);
        assert!(matches!(
            summary.end,
            SessionEnd::Failed(RecommendBooksError::Completion(_))
        ));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("抱歉，我暂时无法生成有效的推荐。"));
    }

    #[tokio::test]
    async fn test_closed_input_at_more_prompt() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(books_json(&[
            "Book A", "Book B", "Book C",
        ]))]));
        let use_case = use_case(gateway);
        let sanitizer = InputSanitizer::default();
        let mut source = ScriptedLines::new(&[]);
        let mut out = Vec::new();

        let summary = RecommendationSession::new(
            &use_case,
            &mut source,
            &mut out,
            &sanitizer,
            Language::En,
            quiet_text(),
        )
        .run(preferences())
        .await
        .unwrap();

        assert_eq!(summary.rounds, 1);
        assert!(matches!(summary.end, SessionEnd::InputClosed));
    }

    #[test]
    fn test_failure_messages() {
        let m = Messages::for_language(Language::En);
        assert_eq!(failure_message(&RecommendBooksError::Cancelled, m), m.cancelled);
        assert!(
            failure_message(&RecommendBooksError::OnlyDuplicates { attempts: 3 }, m)
                .starts_with(m.fail_duplicates)
        );
        let auth = RecommendBooksError::Completion(CompletionError::Exhausted {
            attempts: 3,
            cause: AttemptError::Gateway(GatewayError::Unauthorized("bad key".to_string())),
        });
        assert_eq!(failure_message(&auth, m), m.fail_auth);
        let timeout = RecommendBooksError::Completion(CompletionError::Exhausted {
            attempts: 3,
            cause: AttemptError::TimedOut(Duration::from_secs(30)),
        });
        assert!(failure_message(&timeout, m).contains(m.fail_all));
    }
}
