//! Completion client: one model call with bounded retry, timeout and abort.
//!
//! An attempt fails when the gateway returns an error, when the configured
//! timeout elapses, or when the text is empty. Retries resend the identical
//! request. A cancellation token interrupts both in-flight calls and
//! backoff sleeps.

use crate::config::RetryPolicy;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{AttemptFailure, RoundProgressNotifier};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use crate::use_cases::shared::{RetryBudget, is_cancelled, sleep_cancellable};
use bookbot_domain::util::truncate_str;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a single attempt failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("no response within {0:?}")]
    TimedOut(Duration),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("no attempts left in this round")]
    NoAttemptsLeft,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("model call failed after {attempts} attempt(s): {cause}")]
    Exhausted { attempts: usize, cause: AttemptError },

    #[error("cancelled")]
    Cancelled,
}

enum AttemptOutcome {
    Failed(AttemptError),
    Cancelled,
}

/// Wraps an [`LlmGateway`] with the round's retry policy
pub struct CompletionClient {
    gateway: Arc<dyn LlmGateway>,
    policy: RetryPolicy,
    transcript: Arc<dyn TranscriptLogger>,
}

impl Clone for CompletionClient {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            policy: self.policy,
            transcript: self.transcript.clone(),
        }
    }
}

impl CompletionClient {
    pub fn new(gateway: Arc<dyn LlmGateway>, policy: RetryPolicy) -> Self {
        Self {
            gateway,
            policy,
            transcript: Arc::new(NoTranscriptLogger),
        }
    }

    pub fn with_transcript_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = logger;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Complete with a private budget of `policy.max_attempts`.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        progress: &dyn RoundProgressNotifier,
        cancellation_token: &Option<CancellationToken>,
    ) -> Result<String, CompletionError> {
        let mut budget = RetryBudget::new(self.policy.max_attempts);
        self.complete_within(&mut budget, request, progress, cancellation_token)
            .await
    }

    /// Complete, drawing attempts from a caller-owned budget.
    ///
    /// Returns on the first non-empty response. Backoff is applied before
    /// every attempt except the first one of the budget.
    pub async fn complete_within(
        &self,
        budget: &mut RetryBudget,
        request: &CompletionRequest,
        progress: &dyn RoundProgressNotifier,
        cancellation_token: &Option<CancellationToken>,
    ) -> Result<String, CompletionError> {
        let mut last_error = AttemptError::NoAttemptsLeft;

        while !budget.is_exhausted() {
            if budget.used() > 0
                && !sleep_cancellable(self.policy.backoff, cancellation_token).await
            {
                return Err(CompletionError::Cancelled);
            }
            if is_cancelled(cancellation_token) {
                return Err(CompletionError::Cancelled);
            }
            let Some(attempt) = budget.try_consume() else {
                break;
            };

            info!(
                attempt,
                max_attempts = budget.max(),
                model = %request.model,
                provider = self.gateway.provider_name(),
                "Requesting recommendations"
            );
            progress.on_attempt_start(attempt, budget.max());

            match self.attempt(request, cancellation_token).await {
                Ok(text) => {
                    debug!(attempt, raw = %truncate_str(&text, 2000), "Raw completion");
                    self.transcript.log(TranscriptEvent::new(
                        "completion",
                        json!({ "attempt": attempt, "text": text }),
                    ));
                    return Ok(text);
                }
                Err(AttemptOutcome::Cancelled) => return Err(CompletionError::Cancelled),
                Err(AttemptOutcome::Failed(error)) => {
                    warn!(attempt, error = %error, "Model call failed");
                    self.transcript.log(TranscriptEvent::new(
                        "attempt_failed",
                        json!({ "attempt": attempt, "stage": "completion", "error": error.to_string() }),
                    ));
                    progress.on_attempt_failed(attempt, AttemptFailure::Llm, !budget.is_exhausted());
                    last_error = error;
                }
            }
        }

        Err(CompletionError::Exhausted {
            attempts: budget.used(),
            cause: last_error,
        })
    }

    async fn attempt(
        &self,
        request: &CompletionRequest,
        cancellation_token: &Option<CancellationToken>,
    ) -> Result<String, AttemptOutcome> {
        let call = tokio::time::timeout(self.policy.timeout, self.gateway.complete(request));

        let result = if let Some(token) = cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(AttemptOutcome::Cancelled),
                result = call => result,
            }
        } else {
            call.await
        };

        match result {
            Err(_elapsed) => Err(AttemptOutcome::Failed(AttemptError::TimedOut(
                self.policy.timeout,
            ))),
            Ok(Err(e)) => Err(AttemptOutcome::Failed(e.into())),
            Ok(Ok(text)) if text.trim().is_empty() => {
                Err(AttemptOutcome::Failed(AttemptError::EmptyResponse))
            }
            Ok(Ok(text)) => Ok(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use bookbot_domain::Model;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A scripted gateway reply
    enum Reply {
        Text(&'static str),
        Error(GatewayError),
        /// Sleep before answering
        Slow(Duration, &'static str),
    }

    struct ScriptedGateway {
        replies: Mutex<VecDeque<Reply>>,
        calls: Mutex<usize>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Text(t)) => Ok(t.to_string()),
                Some(Reply::Error(e)) => Err(e),
                Some(Reply::Slow(delay, t)) => {
                    tokio::time::sleep(delay).await;
                    Ok(t.to_string())
                }
                None => Err(GatewayError::Other("script exhausted".to_string())),
            }
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: Model::default(),
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    fn policy(max_attempts: usize) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::ZERO,
            timeout: Duration::from_secs(5),
        }
    }

    fn client(gateway: &Arc<ScriptedGateway>, policy: RetryPolicy) -> CompletionClient {
        CompletionClient::new(gateway.clone(), policy)
    }

    #[tokio::test]
    async fn test_first_success_returned() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Text("[]")]));
        let text = client(&gateway, policy(3))
            .complete(&request(), &NoProgress, &None)
            .await
            .unwrap();
        assert_eq!(text, "[]");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_after_error_and_empty_text() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::Error(GatewayError::ConnectionError("reset".to_string())),
            Reply::Text("   \n"),
            Reply::Text("ok"),
        ]));
        let text = client(&gateway, policy(3))
            .complete(&request(), &NoProgress, &None)
            .await
            .unwrap();
        assert_eq!(text, "ok");
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test]
    async fn test_three_transport_failures_exhaust() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::Error(GatewayError::ConnectionError("down".to_string())),
            Reply::Error(GatewayError::RateLimited("slow down".to_string())),
            Reply::Error(GatewayError::ConnectionError("still down".to_string())),
            Reply::Text("never reached"),
        ]));
        let err = client(&gateway, policy(3))
            .complete(&request(), &NoProgress, &None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CompletionError::Exhausted {
                attempts: 3,
                cause: AttemptError::Gateway(GatewayError::ConnectionError(
                    "still down".to_string()
                )),
            }
        );
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failed_attempt() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::Slow(Duration::from_secs(10), "late"),
            Reply::Text("fast"),
        ]));
        let policy = RetryPolicy {
            timeout: Duration::from_millis(20),
            ..policy(2)
        };
        let text = client(&gateway, policy)
            .complete(&request(), &NoProgress, &None)
            .await
            .unwrap();
        assert_eq!(text, "fast");
    }

    #[tokio::test]
    async fn test_shared_budget_is_respected() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::Error(GatewayError::Timeout),
            Reply::Error(GatewayError::Timeout),
        ]));
        let mut budget = RetryBudget::new(3);
        budget.try_consume();
        let err = client(&gateway, policy(3))
            .complete_within(&mut budget, &request(), &NoProgress, &None)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Exhausted { attempts: 3, .. }));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_budget_makes_no_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Text("unused")]));
        let mut budget = RetryBudget::new(0);
        let err = client(&gateway, policy(3))
            .complete_within(&mut budget, &request(), &NoProgress, &None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CompletionError::Exhausted {
                attempts: 0,
                cause: AttemptError::NoAttemptsLeft
            }
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_before_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Text("unused")]));
        let token = CancellationToken::new();
        token.cancel();
        let err = client(&gateway, policy(3))
            .complete(&request(), &NoProgress, &Some(token))
            .await
            .unwrap_err();
        assert_eq!(err, CompletionError::Cancelled);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Slow(
            Duration::from_secs(30),
            "late",
        )]));
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let policy = RetryPolicy {
            timeout: Duration::from_secs(60),
            ..policy(3)
        };
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client(&gateway, policy).complete(&request(), &NoProgress, &Some(token)),
        )
        .await
        .expect("cancellation should be prompt");
        assert_eq!(result, Err(CompletionError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_backoff() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Error(
            GatewayError::Timeout,
        )]));
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let policy = RetryPolicy {
            backoff: Duration::from_secs(30),
            ..policy(3)
        };
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client(&gateway, policy).complete(&request(), &NoProgress, &Some(token)),
        )
        .await
        .expect("cancellation should be prompt");
        assert_eq!(result, Err(CompletionError::Cancelled));
        assert_eq!(gateway.calls(), 1);
    }
}
