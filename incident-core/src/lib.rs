//! State, data access and display rules for the incident management view.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod pagination;
pub mod session;
pub mod store;
pub mod view;

pub use api::{perform, HttpIncidentApi, IncidentApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ConfigError};
pub use model::{Incident, IncidentStatus, IncidentType, NewIncident, Page, PAGE_SIZE};
pub use store::{Action, Effect, Notice, ViewState};
