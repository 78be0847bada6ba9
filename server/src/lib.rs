//! hafenmeister-server – Bibliotheks-Root
//!
//! Verdrahtet Zugangsdaten-Speicher, Session-Verwaltung, Befehls-Broker
//! und HTTP-API zu einem lauffaehigen Server.

pub mod config;

use std::sync::Arc;

use anyhow::Result;

use config::ServerConfig;
use hafenmeister_api::ApiState;
use hafenmeister_auth::{AuthService, CredentialStore, SessionStore};
use hafenmeister_docker::{DockerBroker, ProzessAusfuehrer};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Zugangsdaten-Datei initialisieren (legt beim Erststart den
    ///    Standard-Admin an)
    /// 2. Session-Store mit Hintergrund-Cleanup starten
    /// 3. HTTP-Listener binden und die API bedienen
    pub async fn starten(self) -> Result<()> {
        let store = Arc::new(CredentialStore::neu(&self.config.zugangsdaten.datei));
        store.initialisieren()?;

        let sessions = SessionStore::neu_mit_cleanup(SessionStore::neu());
        let auth = Arc::new(AuthService::neu(store, sessions));

        let broker = Arc::new(DockerBroker::neu(
            Box::new(ProzessAusfuehrer),
            self.config.laufzeit.programm.clone(),
        ));

        let state = ApiState { auth, broker };
        let app = hafenmeister_api::router(state, &self.config.api.cors_origins);

        let adresse = self.config.api_bind_adresse();
        let listener = tokio::net::TcpListener::bind(&adresse).await?;
        tracing::info!(
            adresse = %adresse,
            programm = %self.config.laufzeit.programm,
            "Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)..."
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server wird beendet");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(fehler) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %fehler, "Shutdown-Signal nicht verfuegbar");
    }
}
