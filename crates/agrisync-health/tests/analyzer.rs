use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use agrisync_bridge::analysis::{AnalysisError, AnalysisResult, AnalysisState, ParseError};
use agrisync_health::{
    AttemptOutcome, ImageFile, ImageIngest, PlantHealthAnalyzer,
    inference::{InferenceClient, InferenceError, InferenceRequest},
};
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

const JPEG_HEADER: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

/// Collaborator double that answers with a canned response and counts calls.
/// When gated, every call waits for [`ScriptedClient::release`].
#[derive(Clone)]
struct ScriptedClient {
    response: Result<Option<String>, InferenceError>,
    calls: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    fn answering(body: &str) -> Self {
        Self::with(Ok(Some(body.to_owned())))
    }

    fn with(response: Result<Option<String>, InferenceError>) -> Self {
        Self {
            response,
            calls: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceClient for ScriptedClient {
    async fn generate(
        &self,
        request: &InferenceRequest,
    ) -> Result<Option<String>, InferenceError> {
        assert!(!request.image.base64_payload.starts_with("data:"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response.clone()
    }
}

fn image_file(suffix: &str, contents: &[u8]) -> (tempfile::NamedTempFile, ImageFile) {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents).expect("write temp file");
    let image = ImageFile::new(file.path());
    (file, image)
}

fn leaf_blight_body(confidence: &str) -> String {
    format!(
        r#"{{"disease":"Leaf Blight","confidence":{confidence},"description":"Brown lesions spreading from leaf margins.","recommendations":["Remove affected leaves","Apply copper fungicide"]}}"#
    )
}

async fn wait_for_requesting<C: InferenceClient>(analyzer: &PlantHealthAnalyzer<C>) {
    while analyzer.state().await != AnalysisState::Requesting {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn well_formed_answer_succeeds() {
    let client = ScriptedClient::answering(&leaf_blight_body("0.87"));
    let analyzer = PlantHealthAnalyzer::new(client.clone(), ImageIngest::default());
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    let outcome = analyzer.analyze(Some(image)).await.expect("not busy");

    let expected = AnalysisResult {
        disease_name: "Leaf Blight".into(),
        confidence: 0.87,
        description: "Brown lesions spreading from leaf margins.".into(),
        recommendations: vec![
            "Remove affected leaves".into(),
            "Apply copper fungicide".into(),
        ],
    };
    assert_eq!(outcome, AttemptOutcome::Succeeded(expected.clone()));
    assert_eq!(analyzer.state().await, AnalysisState::Succeeded(expected));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn non_image_never_reaches_the_service() {
    let client = ScriptedClient::answering(&leaf_blight_body("0.87"));
    let analyzer = PlantHealthAnalyzer::new(client.clone(), ImageIngest::default());
    let (_file, text) = image_file(".csv", b"field,crop\nF1,Tomatoes\n");

    let outcome = analyzer.analyze(Some(text)).await.expect("not busy");
    assert!(matches!(
        outcome,
        AttemptOutcome::Failed(AnalysisError::Validation(_))
    ));

    let outcome = analyzer.analyze(None).await.expect("not busy");
    assert!(matches!(
        outcome,
        AttemptOutcome::Failed(AnalysisError::Validation(_))
    ));

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn out_of_range_confidence_fails_to_parse() {
    let client = ScriptedClient::answering(&leaf_blight_body("1.4"));
    let analyzer = PlantHealthAnalyzer::new(client, ImageIngest::default());
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    analyzer.analyze(Some(image)).await.expect("not busy");

    assert!(matches!(
        analyzer.state().await,
        AnalysisState::Failed(AnalysisError::Parse(ParseError::InvalidField {
            field: "confidence",
            ..
        }))
    ));
}

#[tokio::test]
async fn missing_recommendations_fail_to_parse() {
    let client = ScriptedClient::answering(
        r#"{"disease":"Leaf Blight","confidence":0.5,"description":"Lesions."}"#,
    );
    let analyzer = PlantHealthAnalyzer::new(client, ImageIngest::default());
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    let outcome = analyzer.analyze(Some(image)).await.expect("not busy");
    assert_eq!(
        outcome,
        AttemptOutcome::Failed(ParseError::MissingField("recommendations").into())
    );
}

#[tokio::test]
async fn transport_and_empty_answers_fail() {
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    let analyzer = PlantHealthAnalyzer::new(
        ScriptedClient::with(Err(InferenceError::Transport("503".into()))),
        ImageIngest::default(),
    );
    let outcome = analyzer.analyze(Some(image.clone())).await.expect("not busy");
    assert_eq!(
        outcome,
        AttemptOutcome::Failed(AnalysisError::Transport("503".into()))
    );

    let analyzer = PlantHealthAnalyzer::new(ScriptedClient::with(Ok(None)), ImageIngest::default());
    let outcome = analyzer.analyze(Some(image)).await.expect("not busy");
    assert_eq!(
        outcome,
        AttemptOutcome::Failed(ParseError::EmptyResponse.into())
    );
}

#[tokio::test]
async fn second_attempt_while_requesting_is_rejected() {
    let client = ScriptedClient::answering(&leaf_blight_body("0.87")).gated();
    let analyzer = PlantHealthAnalyzer::new(client.clone(), ImageIngest::default());
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    let first = analyzer.analyze(Some(image.clone()));
    let second = async {
        wait_for_requesting(&analyzer).await;
        let rejected = analyzer.analyze(Some(image.clone())).await;
        client.release();
        rejected
    };
    let (first, second) = tokio::join!(first, second);

    assert!(second.is_err());
    assert!(matches!(first, Ok(AttemptOutcome::Succeeded(_))));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn late_answer_after_reset_is_discarded() {
    let client = ScriptedClient::answering(&leaf_blight_body("0.87")).gated();
    let analyzer = PlantHealthAnalyzer::new(client.clone(), ImageIngest::default());
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    let attempt = analyzer.analyze(Some(image.clone()));
    let leave_view = async {
        wait_for_requesting(&analyzer).await;
        analyzer.reset().await;
        client.release();
    };
    let (outcome, ()) = tokio::join!(attempt, leave_view);

    assert_eq!(outcome, Ok(AttemptOutcome::Discarded));
    assert_eq!(analyzer.state().await, AnalysisState::Idle);

    // The analyzer accepts a fresh attempt once the old request resolved.
    let outcome = analyzer.analyze(Some(image)).await.expect("not busy");
    assert!(matches!(outcome, AttemptOutcome::Succeeded(_)));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn snapshots_follow_the_latest_attempt() {
    let client = ScriptedClient::answering(&leaf_blight_body("0.2"));
    let analyzer = PlantHealthAnalyzer::new(client, ImageIngest::default());
    let snapshots = analyzer.subscribe();
    let (_file, image) = image_file(".jpg", JPEG_HEADER);

    analyzer.analyze(None).await.expect("not busy");
    analyzer.analyze(Some(image)).await.expect("not busy");

    let latest = snapshots.borrow().clone();
    assert_eq!(latest.attempt, 2);
    assert!(matches!(latest.state, AnalysisState::Succeeded(_)));
    assert_eq!(analyzer.snapshot().await, latest);
}
