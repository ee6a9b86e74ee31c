//! Frontend view of the per-crop analysis sessions.

use std::{collections::HashMap, path::PathBuf};

use agrisync_bridge::analysis::AnalysisState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropAnalysis {
    /// Newest attempt seen from the backend.
    pub attempt: u64,
    pub state: AnalysisState,
    pub selected_image: Option<PathBuf>,
    /// Attempts up to this number belong to a dropped image; their outcomes
    /// are not shown.
    pub stale_through: u64,
    /// The last request was refused because another one was in flight.
    pub rejected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisEntity {
    sessions: HashMap<String, CropAnalysis>,
}

impl AnalysisEntity {
    pub fn get(&self, crop_id: &str) -> CropAnalysis {
        self.sessions.get(crop_id).cloned().unwrap_or_default()
    }

    /// Applies a backend state update. Updates from attempts older than the
    /// newest one seen are ignored, as is any progress of an attempt that
    /// was started for a dropped image. Returns whether the update was applied.
    pub fn apply(&mut self, crop_id: &str, attempt: u64, state: AnalysisState) -> bool {
        let session = self.sessions.entry(crop_id.to_owned()).or_default();
        if attempt < session.attempt {
            log::debug!(
                "Ignoring state of attempt {attempt} for crop {crop_id}, already at {}",
                session.attempt
            );
            return false;
        }
        if attempt <= session.stale_through && state != AnalysisState::Idle {
            log::debug!("Ignoring state of invalidated attempt {attempt} for crop {crop_id}");
            return false;
        }

        session.attempt = attempt;
        session.state = state;
        session.rejected = false;
        true
    }

    pub fn mark_rejected(&mut self, crop_id: &str) {
        self.sessions.entry(crop_id.to_owned()).or_default().rejected = true;
    }

    /// Records a newly picked image. Any previous result no longer applies.
    pub fn select_image(&mut self, crop_id: &str, path: PathBuf) {
        let session = self.sessions.entry(crop_id.to_owned()).or_default();
        session.selected_image = Some(path);
        session.stale_through = session.attempt;
        session.state = AnalysisState::Idle;
        session.rejected = false;
    }

    /// Forgets the picked image and result when the crop page is left.
    pub fn clear(&mut self, crop_id: &str) {
        if let Some(session) = self.sessions.get_mut(crop_id) {
            session.selected_image = None;
            session.stale_through = session.attempt;
            session.state = AnalysisState::Idle;
            session.rejected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use agrisync_bridge::analysis::{AnalysisError, AnalysisResult};

    use super::*;

    fn result() -> AnalysisResult {
        AnalysisResult {
            disease_name: "Leaf Blight".into(),
            confidence: 0.87,
            description: "Brown lesions.".into(),
            recommendations: vec!["Remove affected leaves".into()],
        }
    }

    #[test]
    fn stale_attempts_do_not_overwrite_newer_state() {
        let mut analyses = AnalysisEntity::default();
        assert!(analyses.apply("C1", 2, AnalysisState::Requesting));
        assert!(!analyses.apply("C1", 1, AnalysisState::Succeeded(result())));
        assert_eq!(analyses.get("C1").state, AnalysisState::Requesting);

        assert!(analyses.apply(
            "C1",
            2,
            AnalysisState::Failed(AnalysisError::Transport("timeout".into()))
        ));
        assert!(analyses.get("C1").state.error().is_some());
    }

    #[test]
    fn sessions_are_kept_per_crop() {
        let mut analyses = AnalysisEntity::default();
        analyses.apply("C1", 3, AnalysisState::Succeeded(result()));
        analyses.apply("C2", 1, AnalysisState::Encoding);

        assert_eq!(analyses.get("C1").state.result(), Some(&result()));
        assert_eq!(analyses.get("C2").state, AnalysisState::Encoding);
        assert_eq!(analyses.get("C4"), CropAnalysis::default());
    }

    #[test]
    fn picking_an_image_drops_the_previous_result() {
        let mut analyses = AnalysisEntity::default();
        analyses.apply("C1", 1, AnalysisState::Succeeded(result()));
        analyses.mark_rejected("C1");

        analyses.select_image("C1", PathBuf::from("/tmp/leaf.jpg"));
        let session = analyses.get("C1");
        assert_eq!(session.state, AnalysisState::Idle);
        assert!(!session.rejected);
        assert_eq!(session.attempt, 1);
    }

    #[test]
    fn late_result_does_not_follow_a_new_image() {
        let mut analyses = AnalysisEntity::default();
        assert!(analyses.apply("C1", 1, AnalysisState::Requesting));
        analyses.select_image("C1", PathBuf::from("/tmp/new.jpg"));

        assert!(!analyses.apply("C1", 1, AnalysisState::Succeeded(result())));
        assert!(!analyses.apply(
            "C1",
            1,
            AnalysisState::Failed(AnalysisError::Transport("timeout".into()))
        ));
        let session = analyses.get("C1");
        assert_eq!(session.state, AnalysisState::Idle);
        assert_eq!(session.selected_image, Some(PathBuf::from("/tmp/new.jpg")));

        assert!(analyses.apply("C1", 1, AnalysisState::Idle));
        assert!(analyses.apply("C1", 2, AnalysisState::Encoding));
        assert!(analyses.apply("C1", 2, AnalysisState::Succeeded(result())));
        assert_eq!(analyses.get("C1").state.result(), Some(&result()));
    }

    #[test]
    fn leaving_the_page_invalidates_the_running_attempt() {
        let mut analyses = AnalysisEntity::default();
        analyses.select_image("C2", PathBuf::from("/tmp/leaf.jpg"));
        analyses.apply("C2", 3, AnalysisState::Requesting);
        analyses.clear("C2");

        assert!(!analyses.apply("C2", 3, AnalysisState::Succeeded(result())));
        assert_eq!(analyses.get("C2").state, AnalysisState::Idle);
        assert_eq!(analyses.get("C2").selected_image, None);
    }
}
