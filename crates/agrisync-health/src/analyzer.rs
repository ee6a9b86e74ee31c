//! Plant health analysis attempts and their state machine.
//!
//! An attempt moves `Idle → Encoding → Requesting → Succeeded | Failed`.
//! Every attempt is tagged with an [`AttemptToken`]; a transition is only
//! applied when it comes from the currently active attempt, so a late answer
//! for a superseded or reset attempt can never replace newer state.
//!
//! At most one request is in flight per analyzer. Starting an attempt while a
//! request is outstanding is rejected with [`AnalyzerBusy`], even if the
//! outstanding attempt was already reset and its answer will be discarded.

use agrisync_bridge::analysis::{AnalysisError, AnalysisResult, AnalysisState, ParseError};
use tokio::sync::{RwLock, watch};

use crate::{
    ingest::{ImageFile, ImageIngest},
    inference::{InferenceClient, InferenceError, InferenceRequest},
    schema::parse_analysis,
};

/// Identifies one analysis attempt. Tokens grow monotonically per analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptToken(u64);

impl AttemptToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A new attempt was refused because a request is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an analysis request is already in flight")]
pub struct AnalyzerBusy;

/// The bookkeeping half of the analyzer, free of any I/O.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: AnalysisState,
    /// Attempt whose transitions are currently applied.
    active: Option<AttemptToken>,
    /// Attempt whose request has been submitted and not yet resolved.
    in_flight: Option<AttemptToken>,
    issued: u64,
}

impl AnalysisSession {
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Number of the most recently started attempt, `0` before the first.
    pub fn latest_attempt(&self) -> u64 {
        self.issued
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Starts a new attempt in `Encoding`. An attempt that is still encoding
    /// is superseded; one that is requesting blocks the new attempt.
    pub fn begin(&mut self) -> Result<AttemptToken, AnalyzerBusy> {
        if self.in_flight.is_some() {
            return Err(AnalyzerBusy);
        }

        self.issued += 1;
        let token = AttemptToken(self.issued);
        self.active = Some(token);
        self.state = AnalysisState::Encoding;
        Ok(token)
    }

    /// Moves the attempt from `Encoding` to `Requesting`. Returns `false` if
    /// the attempt is no longer active, in which case no request may be made.
    pub fn start_request(&mut self, token: AttemptToken) -> bool {
        if self.active != Some(token) || self.state != AnalysisState::Encoding {
            return false;
        }

        self.in_flight = Some(token);
        self.state = AnalysisState::Requesting;
        true
    }

    /// Settles the attempt. Returns `false` if the outcome was discarded
    /// because the attempt is stale.
    pub fn complete(
        &mut self,
        token: AttemptToken,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if self.in_flight == Some(token) {
            self.in_flight = None;
        }
        if self.active != Some(token) {
            return false;
        }

        self.active = None;
        self.state = match outcome {
            Ok(result) => AnalysisState::Succeeded(result),
            Err(error) => AnalysisState::Failed(error),
        };
        true
    }

    /// Drops any result and invalidates the active attempt. An outstanding
    /// request keeps the analyzer busy until it resolves.
    pub fn reset(&mut self) {
        self.active = None;
        self.state = AnalysisState::Idle;
    }
}

/// Latest observable state of an analyzer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisSnapshot {
    pub attempt: u64,
    pub state: AnalysisState,
}

/// How an attempt ended for its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Succeeded(AnalysisResult),
    Failed(AnalysisError),
    /// The attempt was superseded or reset before it settled.
    Discarded,
}

/// Runs analysis attempts against an inference service.
pub struct PlantHealthAnalyzer<C> {
    client: C,
    ingest: ImageIngest,
    session: RwLock<AnalysisSession>,
    snapshots: watch::Sender<AnalysisSnapshot>,
}

impl<C: InferenceClient> PlantHealthAnalyzer<C> {
    pub fn new(client: C, ingest: ImageIngest) -> Self {
        let (snapshots, _) = watch::channel(AnalysisSnapshot::default());
        Self {
            client,
            ingest,
            session: RwLock::new(AnalysisSession::default()),
            snapshots,
        }
    }

    /// Receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn state(&self) -> AnalysisState {
        self.session.read().await.state().clone()
    }

    pub async fn snapshot(&self) -> AnalysisSnapshot {
        let session = self.session.read().await;
        Self::snapshot_of(&session)
    }

    fn snapshot_of(session: &AnalysisSession) -> AnalysisSnapshot {
        AnalysisSnapshot {
            attempt: session.latest_attempt(),
            state: session.state().clone(),
        }
    }

    fn publish(&self, session: &AnalysisSession) {
        self.snapshots.send_replace(Self::snapshot_of(session));
    }

    /// Invalidates the active attempt and returns to `Idle`.
    pub async fn reset(&self) {
        let mut session = self.session.write().await;
        session.reset();
        self.publish(&session);
    }

    /// Runs one full attempt: encode the image, query the inference service
    /// and validate its answer. No retries are made.
    pub async fn analyze(&self, image: Option<ImageFile>) -> Result<AttemptOutcome, AnalyzerBusy> {
        let token = {
            let mut session = self.session.write().await;
            let token = session.begin()?;
            self.publish(&session);
            token
        };
        log::info!("Analysis attempt {} started", token.get());

        let encoded = match self.ingest.encode(image.as_ref()).await {
            Ok(encoded) => encoded,
            Err(error) => {
                log::info!("Analysis attempt {} rejected: {error}", token.get());
                return Ok(self.settle(token, Err(error.into())).await);
            }
        };

        {
            let mut session = self.session.write().await;
            if !session.start_request(token) {
                log::debug!("Analysis attempt {} superseded while encoding", token.get());
                return Ok(AttemptOutcome::Discarded);
            }
            self.publish(&session);
        }

        let request = InferenceRequest::plant_health(encoded);
        let outcome = match self.client.generate(&request).await {
            Ok(Some(text)) => parse_analysis(&text).map_err(AnalysisError::from),
            Ok(None) => Err(ParseError::EmptyResponse.into()),
            Err(InferenceError::Transport(reason)) => Err(AnalysisError::Transport(reason)),
            Err(InferenceError::Envelope(reason)) => {
                Err(ParseError::MalformedEnvelope(reason).into())
            }
        };

        match &outcome {
            Ok(result) => log::info!(
                "Analysis attempt {} identified {} ({:.2})",
                token.get(),
                result.disease_name,
                result.confidence
            ),
            Err(AnalysisError::Parse(error)) => {
                log::error!("Analysis attempt {} got an invalid result: {error}", token.get())
            }
            Err(error) => log::warn!("Analysis attempt {} failed: {error}", token.get()),
        }

        Ok(self.settle(token, outcome).await)
    }

    async fn settle(
        &self,
        token: AttemptToken,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> AttemptOutcome {
        let mut session = self.session.write().await;
        if !session.complete(token, outcome.clone()) {
            log::debug!("Discarding outcome of stale analysis attempt {}", token.get());
            return AttemptOutcome::Discarded;
        }
        self.publish(&session);

        match outcome {
            Ok(result) => AttemptOutcome::Succeeded(result),
            Err(error) => AttemptOutcome::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use agrisync_bridge::analysis::ValidationError;

    use super::*;

    fn result() -> AnalysisResult {
        AnalysisResult {
            disease_name: "Early Blight".into(),
            confidence: 0.6,
            description: "Concentric rings on older leaves.".into(),
            recommendations: vec![],
        }
    }

    #[test]
    fn attempt_runs_to_success() {
        let mut session = AnalysisSession::default();
        let token = session.begin().unwrap();
        assert_eq!(session.state(), &AnalysisState::Encoding);
        assert!(session.start_request(token));
        assert_eq!(session.state(), &AnalysisState::Requesting);
        assert!(session.complete(token, Ok(result())));
        assert_eq!(session.state(), &AnalysisState::Succeeded(result()));
        assert!(!session.is_in_flight());
    }

    #[test]
    fn begin_is_refused_while_requesting() {
        let mut session = AnalysisSession::default();
        let token = session.begin().unwrap();
        session.start_request(token);

        assert_eq!(session.begin(), Err(AnalyzerBusy));
        assert_eq!(session.latest_attempt(), 1);
    }

    #[test]
    fn encoding_attempt_is_superseded() {
        let mut session = AnalysisSession::default();
        let first = session.begin().unwrap();
        let second = session.begin().unwrap();

        assert!(!session.start_request(first));
        assert!(!session.complete(first, Err(ValidationError::Empty.into())));
        assert!(session.start_request(second));
    }

    #[test]
    fn reset_discards_late_answer_but_stays_busy() {
        let mut session = AnalysisSession::default();
        let token = session.begin().unwrap();
        session.start_request(token);
        session.reset();

        assert_eq!(session.state(), &AnalysisState::Idle);
        assert_eq!(session.begin(), Err(AnalyzerBusy));

        assert!(!session.complete(token, Ok(result())));
        assert_eq!(session.state(), &AnalysisState::Idle);
        assert!(session.begin().is_ok());
    }

    #[test]
    fn terminal_states_accept_a_new_attempt() {
        let mut session = AnalysisSession::default();
        let token = session.begin().unwrap();
        session.complete(token, Err(ValidationError::NoImageSelected.into()));

        let next = session.begin().unwrap();
        assert!(next > token);
        assert_eq!(session.state(), &AnalysisState::Encoding);
    }

    #[test]
    fn settled_attempt_cannot_be_settled_twice() {
        let mut session = AnalysisSession::default();
        let token = session.begin().unwrap();
        session.start_request(token);
        assert!(session.complete(token, Ok(result())));
        assert!(!session.complete(token, Err(AnalysisError::Transport("late".into()))));
        assert_eq!(session.state(), &AnalysisState::Succeeded(result()));
    }
}
