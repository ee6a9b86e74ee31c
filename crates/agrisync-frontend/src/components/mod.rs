pub mod analysis_card;
pub mod health_badge;
pub mod info_row;
pub mod notification_panel;
