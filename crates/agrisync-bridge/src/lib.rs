//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect the graphical
//! dashboard with the asynchronous backend that owns the notification log,
//! the farm catalog and the plant health analyzers.
//!
//! The design is deliberately lightweight and unidirectional:
//! - The frontend sends commands (e.g., request the catalog, mark a
//!   notification as read, analyze a plant image).
//! - The backend pushes events (e.g., notification log updates, analysis
//!   state transitions, toasts).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod access;
pub mod analysis;
pub mod config;
pub mod farm;
pub mod notification;

use std::path::PathBuf;

use tokio::sync::mpsc::{self, Receiver, Sender};

/// Messages emitted by the backend to inform the frontend of state updates.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Transient message shown as a toast.
    Toast(notification::ToastMessage),
    /// Response to the configuration request from the frontend.
    ConfigurationResponse(config::Config),
    /// Current content of the notification log. Sent on request and after
    /// every mutation.
    NotificationsUpdate {
        notifications: Vec<notification::Notification>,
        unread_count: usize,
    },
    /// Current farm catalog. Sent on request and after attendance changes.
    CatalogResponse(farm::FarmCatalog),
    /// The analyzer of a crop-detail session changed state.
    AnalysisStateUpdate {
        crop_id: String,
        /// Attempt that produced this state. Updates from older attempts
        /// must not replace newer ones.
        attempt: u64,
        state: analysis::AnalysisState,
    },
    /// An analysis was requested while another one was still in flight.
    AnalysisRejected { crop_id: String },
}

/// Commands issued by the frontend to control or query the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request for the application configuration.
    ConfigurationRequest,
    /// Request for the notification log.
    NotificationsRequest,
    MarkNotificationRead(notification::NotificationId),
    /// Request for the farm catalog.
    CatalogRequest,
    /// Open an attendance record for a worker.
    CheckInWorker(String),
    /// Close the open attendance record of a worker.
    CheckOutWorker(String),
    /// Start a new analysis attempt for a crop with the selected image.
    AnalyzePlantImage {
        crop_id: String,
        image: Option<PathBuf>,
    },
    /// The crop-detail view was left or a new image was picked.
    ResetAnalysis { crop_id: String },
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
