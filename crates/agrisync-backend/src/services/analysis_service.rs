//! Per-crop plant health analysis.
//!
//! Every crop-detail session owns one analyzer. Its state changes are
//! forwarded to the frontend tagged with the attempt number, and attempts run
//! on their own task so the dispatch loop stays responsive.

use std::{path::PathBuf, sync::Arc};

use agrisync_bridge::{
    MessageFromBackend,
    analysis::AnalysisError,
    notification::ToastType,
};
use agrisync_health::{AttemptOutcome, ImageFile, ImageIngest, PlantHealthAnalyzer};

use super::AppContextHandle;
use crate::state::Analyzer;

/// Returns the analyzer of the crop, creating it on first use.
async fn analyzer_for(context: &AppContextHandle, crop_id: &str) -> Arc<Analyzer> {
    if let Some(analyzer) = context.state.read().await.analyzers.get(crop_id) {
        return analyzer.clone();
    }

    let mut state = context.state.write().await;
    if let Some(analyzer) = state.analyzers.get(crop_id) {
        return analyzer.clone();
    }

    let client = state.inference_client.clone();
    let ingest = ImageIngest::new(state.config.inference.max_image_bytes);
    let analyzer = Arc::new(PlantHealthAnalyzer::new(client, ingest));
    state
        .analyzers
        .insert(crop_id.to_owned(), analyzer.clone());
    drop(state);

    log::debug!("Created analyzer for crop {crop_id}");
    spawn_state_forwarder(context.clone(), crop_id.to_owned(), &analyzer);
    analyzer
}

fn spawn_state_forwarder(context: AppContextHandle, crop_id: String, analyzer: &Analyzer) {
    let mut snapshots = analyzer.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            context
                .send(MessageFromBackend::AnalysisStateUpdate {
                    crop_id: crop_id.clone(),
                    attempt: snapshot.attempt,
                    state: snapshot.state,
                })
                .await;
        }
    });
}

/// Handles [`agrisync_bridge::MessageToBackend::AnalyzePlantImage`].
pub async fn handle_analyze_request(
    context: AppContextHandle,
    crop_id: String,
    image: Option<PathBuf>,
) {
    let analyzer = analyzer_for(&context, &crop_id).await;

    tokio::spawn(async move {
        match analyzer.analyze(image.map(ImageFile::new)).await {
            Ok(AttemptOutcome::Succeeded(result)) => {
                context
                    .send_toast(
                        ToastType::Success,
                        format!("Analysis complete: {}", result.disease_name),
                    )
                    .await;
            }
            // Validation errors are rendered next to the image picker.
            Ok(AttemptOutcome::Failed(AnalysisError::Validation(_))) => {}
            Ok(AttemptOutcome::Failed(error)) => {
                context
                    .send_toast(ToastType::Error, error.user_message())
                    .await;
            }
            Ok(AttemptOutcome::Discarded) => {}
            Err(busy) => {
                log::info!("Analysis for crop {crop_id} rejected: {busy}");
                context
                    .send(MessageFromBackend::AnalysisRejected { crop_id })
                    .await;
            }
        }
    });
}

/// Handles [`agrisync_bridge::MessageToBackend::ResetAnalysis`].
pub async fn handle_reset_request(context: AppContextHandle, crop_id: String) {
    let analyzer = context.state.read().await.analyzers.get(&crop_id).cloned();
    if let Some(analyzer) = analyzer {
        analyzer.reset().await;
    }
}
