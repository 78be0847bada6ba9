//! Session-Management fuer Hafenmeister
//!
//! Implementiert kurzlebige Session-Tokens fuer den eingeloggten
//! Administrator. Sessions werden im Speicher gehalten (in-memory
//! HashMap mit TTL). Ein Hintergrund-Task bereinigt abgelaufene
//! Sessions automatisch. Bei jedem erfolgreichen Login wird ein neuer
//! Token ausgestellt und der alte verworfen (verhindert Fixation).

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::RngCore;
use tokio::sync::RwLock;

/// Standard-Session-Lebensdauer: 24 Stunden
const SESSION_TTL_SEKUNDEN: i64 = 24 * 60 * 60;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Eine aktive Administrator-Session
#[derive(Debug, Clone)]
pub struct Session {
    /// Der Token-String (URL-sicheres Base64)
    pub token: String,
    /// Benutzername zum Zeitpunkt des Logins
    pub username: String,
    /// Zeitpunkt der Session-Erstellung
    pub erstellt_am: DateTime<Utc>,
    /// Zeitpunkt des Session-Ablaufs
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Session {
    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }
}

/// In-Memory Session-Store mit TTL-Unterstuetzung
#[derive(Debug, Default)]
pub struct SessionStore {
    /// token -> Session
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Erstellt einen neuen leeren Session-Store
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Startet den Cleanup-Task fuer den gegebenen Store
    pub fn neu_mit_cleanup(store: Arc<Self>) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Sessions bereinigt");
                }
            }
        });
        store
    }

    /// Erstellt eine neue Session mit frisch generiertem Token
    pub async fn erstellen(&self, username: &str) -> Session {
        let token = token_generieren();
        let jetzt = Utc::now();
        let session = Session {
            token: token.clone(),
            username: username.to_string(),
            erstellt_am: jetzt,
            laeuft_ab_am: jetzt + chrono::Duration::seconds(SESSION_TTL_SEKUNDEN),
        };

        self.sessions.write().await.insert(token, session.clone());
        tracing::debug!(username = %username, "Neue Session erstellt");
        session
    }

    /// Validiert einen Token und gibt die Session zurueck, falls gueltig
    pub async fn validieren(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(token).filter(|s| s.ist_gueltig()).cloned()
    }

    /// Invalidiert (loescht) eine Session anhand des Tokens
    pub async fn invalidieren(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            tracing::debug!("Session invalidiert");
        }
    }

    /// Uebernimmt einen geaenderten Benutzernamen in eine laufende Session
    pub async fn umbenennen(&self, token: &str, username: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(token) {
            session.username = username.to_string();
        }
    }

    /// Bereinigt abgelaufene Sessions und gibt die Anzahl der entfernten zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.laeuft_ab_am > jetzt);
        vorher - sessions.len()
    }
}

/// Generiert einen kryptografisch sicheren Session-Token (URL-sicheres Base64)
fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_erstellen_und_validieren() {
        let store = SessionStore::neu();
        let session = store.erstellen("admin").await;
        assert_eq!(session.username, "admin");
        assert!(session.ist_gueltig());

        let gefunden = store.validieren(&session.token).await.expect("Session muss gueltig sein");
        assert_eq!(gefunden.username, "admin");
    }

    #[tokio::test]
    async fn unbekannter_token_ist_ungueltig() {
        let store = SessionStore::neu();
        assert!(store.validieren("gibt_es_nicht").await.is_none());
    }

    #[tokio::test]
    async fn invalidieren_entfernt_session() {
        let store = SessionStore::neu();
        let session = store.erstellen("admin").await;
        store.invalidieren(&session.token).await;
        assert!(store.validieren(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn tokens_sind_einmalig() {
        let store = SessionStore::neu();
        let erste = store.erstellen("admin").await;
        let zweite = store.erstellen("admin").await;
        assert_ne!(erste.token, zweite.token, "Jeder Login braucht einen frischen Token");
    }

    #[tokio::test]
    async fn umbenennen_aendert_laufende_session() {
        let store = SessionStore::neu();
        let session = store.erstellen("admin").await;
        store.umbenennen(&session.token, "verwalter").await;
        let gefunden = store.validieren(&session.token).await.expect("Session muss gueltig sein");
        assert_eq!(gefunden.username, "verwalter");
    }
}
