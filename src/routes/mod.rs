pub mod admin_surveys;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod events;
pub mod requests;
pub mod upload;
