//! hafenmeister-api – Action-Router
//!
//! Validiert jede eingehende Aktion gegen die feste Allow-List, erzwingt
//! HTTP-Methode und Anmeldepflicht, delegiert an den Befehls-Broker bzw.
//! den Auth-Service und verpackt jedes Ergebnis in den einheitlichen
//! JSON-Umschlag `{success, message?, ...}`.

pub mod aktion;
pub mod anfrage;
pub mod cookie;
pub mod error;
pub mod handler;
pub mod server;

use std::sync::Arc;

use hafenmeister_auth::AuthService;
use hafenmeister_docker::DockerBroker;

/// Axum-State: Session-/Zugangsdaten-Autoritaet plus Befehls-Broker,
/// als expliziter Kontext statt ambienter Globals
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub broker: Arc<DockerBroker>,
}

pub use aktion::Aktion;
pub use anfrage::AktionsAnfrage;
pub use error::{ApiError, ApiResult};
pub use server::router;
