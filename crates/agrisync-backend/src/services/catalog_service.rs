use agrisync_bridge::{MessageFromBackend, farm::FarmCatalog, notification::ToastType};
use chrono::{Local, NaiveDateTime};

use super::AppContextHandle;
use crate::catalog::{self, AttendanceError};

async fn broadcast(context: &AppContextHandle) {
    let catalog = {
        let state = context.state.read().await;
        state.catalog.clone()
    };
    context.send(MessageFromBackend::CatalogResponse(catalog)).await;
}

/// Handles [`agrisync_bridge::MessageToBackend::CatalogRequest`].
pub async fn handle_catalog_request(context: AppContextHandle) {
    broadcast(&context).await;
}

async fn update_attendance(
    context: AppContextHandle,
    worker_id: String,
    verb: &str,
    apply: fn(&mut FarmCatalog, &str, NaiveDateTime) -> Result<(), AttendanceError>,
) {
    let result = {
        let mut state = context.state.write().await;
        let result = apply(&mut state.catalog, &worker_id, Local::now().naive_local());
        result.map(|()| {
            state
                .catalog
                .worker(&worker_id)
                .map(|worker| worker.name.clone())
                .unwrap_or_else(|| worker_id.clone())
        })
    };

    match result {
        Ok(name) => {
            log::info!("Worker {worker_id} {verb}");
            context
                .send_toast(ToastType::Success, format!("{name} {verb}"))
                .await;
            broadcast(&context).await;
        }
        Err(error) => {
            log::warn!("Attendance update rejected: {error}");
            context.send_toast(ToastType::Warning, error.to_string()).await;
        }
    }
}

/// Handles [`agrisync_bridge::MessageToBackend::CheckInWorker`].
pub async fn handle_check_in(context: AppContextHandle, worker_id: String) {
    update_attendance(context, worker_id, "checked in", catalog::check_in).await;
}

/// Handles [`agrisync_bridge::MessageToBackend::CheckOutWorker`].
pub async fn handle_check_out(context: AppContextHandle, worker_id: String) {
    update_attendance(context, worker_id, "checked out", catalog::check_out).await;
}
