use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::AbortHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{Question, QuizSummary, SessionToken};
use storage::{QuestionSource, SourceError};

use super::config::QuizConfig;
use super::session::{Advance, QuizSession};
use super::view::{AnswerFeedback, QuizSnapshot};
use crate::error::QuizError;

enum Command {
    Start {
        reply: oneshot::Sender<SessionToken>,
    },
    Submit {
        option_index: usize,
        reply: oneshot::Sender<Result<AnswerFeedback, QuizError>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Completions of work the actor spawned, tagged with the session they belong to.
enum Event {
    Loaded {
        token: SessionToken,
        result: Result<Vec<Question>, SourceError>,
    },
    AdvanceDue {
        token: SessionToken,
    },
}

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Handle to a quiz engine running as a single actor task.
///
/// Every mutation is serialized through the actor. Clones share the same
/// engine; the high score lives as long as the actor does.
#[derive(Clone)]
pub struct QuizEngine {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<QuizSnapshot>,
}

impl QuizEngine {
    /// Spawn the engine actor on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(source: Arc<dyn QuestionSource>, config: QuizConfig, clock: Clock) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(config.command_buffer());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(QuizSnapshot::default());

        let actor = EngineActor {
            source,
            rng: config.build_rng(),
            config,
            clock,
            commands: commands_rx,
            events: events_rx,
            events_tx,
            snapshots: snapshot_tx,
            token: SessionToken::INITIAL,
            session: None,
            high_score: 0,
            last_summary: None,
            fetch: None,
            pending: None,
        };
        tokio::spawn(actor.run());

        Self {
            commands: commands_tx,
            snapshots: snapshot_rx,
        }
    }

    /// Start a new session and request its questions.
    ///
    /// Returns once the session exists; questions arrive asynchronously and
    /// show up in later snapshots. A running session is superseded.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EngineStopped` if the actor has shut down.
    pub async fn start(&self) -> Result<SessionToken, QuizError> {
        self.request(|reply| Command::Start { reply }).await
    }

    /// Grade the option at `option_index` for the current question.
    ///
    /// The move to the next question (or back to idle after the last one)
    /// happens later, on the engine's timer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` when idle.
    /// Returns `QuizError::NoCurrentQuestion` while loading or with no questions.
    /// Returns `QuizError::AlreadyAnswered` while the current answer is being shown.
    /// Returns `QuizError::OptionOutOfRange` for an invalid option index.
    /// Returns `QuizError::EngineStopped` if the actor has shut down.
    pub async fn submit_answer(&self, option_index: usize) -> Result<AnswerFeedback, QuizError> {
        self.request(|reply| Command::Submit {
            option_index,
            reply,
        })
        .await?
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every engine mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EngineStopped` if the actor shuts down first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&QuizSnapshot) -> bool,
    ) -> Result<QuizSnapshot, QuizError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| QuizError::EngineStopped)?;
        Ok(snapshot.clone())
    }

    /// Stop the actor, cancelling any pending fetch or timed transition.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EngineStopped` if the actor was already gone.
    pub async fn shutdown(&self) -> Result<(), QuizError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, QuizError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(build(reply_tx))
            .await
            .map_err(|_| QuizError::EngineStopped)?;
        reply_rx.await.map_err(|_| QuizError::EngineStopped)
    }
}

//
// ─── ACTOR ─────────────────────────────────────────────────────────────────────
//

struct EngineActor {
    source: Arc<dyn QuestionSource>,
    config: QuizConfig,
    clock: Clock,
    rng: StdRng,
    commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedReceiver<Event>,
    events_tx: mpsc::UnboundedSender<Event>,
    snapshots: watch::Sender<QuizSnapshot>,
    token: SessionToken,
    session: Option<QuizSession>,
    high_score: u32,
    last_summary: Option<QuizSummary>,
    fetch: Option<AbortHandle>,
    pending: Option<AbortHandle>,
}

impl EngineActor {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                Some(event) = self.events.recv() => {
                    self.handle_event(event);
                }

                maybe_command = self.commands.recv() => {
                    match maybe_command {
                        Some(Command::Start { reply }) => {
                            let token = self.start_session();
                            let _ = reply.send(token);
                        }
                        Some(Command::Submit { option_index, reply }) => {
                            let _ = reply.send(self.submit(option_index));
                        }
                        Some(Command::Shutdown { reply }) => {
                            self.cancel_scheduled();
                            let _ = reply.send(());
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        self.cancel_scheduled();
        debug!(high_score = self.high_score, "quiz engine stopped");
    }

    fn start_session(&mut self) -> SessionToken {
        self.cancel_scheduled();
        self.token = self.token.next();
        let token = self.token;
        self.session = Some(QuizSession::begin(token, self.clock.now()));
        self.spawn_fetch(token);
        info!(token = %token, "quiz session started");
        self.publish();
        token
    }

    fn submit(&mut self, option_index: usize) -> Result<AnswerFeedback, QuizError> {
        let Some(session) = self.session.as_mut() else {
            return Err(QuizError::NotStarted);
        };
        let feedback = session.grade(option_index)?;
        debug!(
            token = %feedback.token,
            question = %feedback.question_id,
            tapped = feedback.tapped_index,
            correct = feedback.is_correct,
            score = feedback.score,
            "answer graded"
        );

        let delay = self.config.delay_after(feedback.is_last);
        self.schedule_advance(feedback.token, delay);
        self.publish();
        Ok(feedback)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Loaded { token, result } => self.on_loaded(token, result),
            Event::AdvanceDue { token } => self.on_advance_due(token),
        }
    }

    fn on_loaded(&mut self, token: SessionToken, result: Result<Vec<Question>, SourceError>) {
        if token != self.token {
            debug!(stale = %token, current = %self.token, "dropping questions for superseded session");
            return;
        }
        self.fetch = None;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let questions = result.unwrap_or_else(|err| {
            warn!(token = %token, %err, "question fetch failed; session has no questions");
            Vec::new()
        });
        session.load(questions, &mut self.rng);
        info!(
            token = %token,
            count = session.questions().len(),
            "questions loaded"
        );
        self.publish();
    }

    fn on_advance_due(&mut self, token: SessionToken) {
        if token != self.token {
            debug!(stale = %token, current = %self.token, "ignoring transition for superseded session");
            return;
        }
        self.pending = None;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.advance() {
            Advance::Next { index } => debug!(token = %token, index, "advanced to next question"),
            Advance::Finished { score } => self.finish_session(score),
            Advance::Ignored => return,
        }
        self.publish();
    }

    fn finish_session(&mut self, score: u32) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.high_score = self.high_score.max(score);

        match session.finish(self.clock.now()) {
            Ok(summary) => {
                info!(
                    token = %summary.token(),
                    score,
                    total = summary.total_questions(),
                    high_score = self.high_score,
                    "quiz session finished"
                );
                self.last_summary = Some(summary);
            }
            Err(err) => warn!(%err, "could not summarise finished session"),
        }
    }

    fn spawn_fetch(&mut self, token: SessionToken) {
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        let timeout = self.config.fetch_timeout();

        let task = tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, source.fetch())
                    .await
                    .unwrap_or_else(|_| Err(SourceError::TimedOut(limit))),
                None => source.fetch().await,
            };
            let _ = events.send(Event::Loaded { token, result });
        });
        self.fetch = Some(task.abort_handle());
    }

    fn schedule_advance(&mut self, token: SessionToken, delay: Duration) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        let deadline = Instant::now() + delay;
        let events = self.events_tx.clone();

        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = events.send(Event::AdvanceDue { token });
        });
        self.pending = Some(task.abort_handle());
    }

    fn cancel_scheduled(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    fn publish(&self) {
        let snapshot = match &self.session {
            Some(session) => {
                QuizSnapshot::from_session(session, self.high_score, self.last_summary.clone())
            }
            None => QuizSnapshot::idle(self.token, self.high_score, self.last_summary.clone()),
        };
        self.snapshots.send_replace(snapshot);
    }
}
