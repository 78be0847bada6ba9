//! Auth-Service fuer Hafenmeister
//!
//! Zentraler Service fuer Login, Logout, Session-Pruefung und die
//! Aktualisierung der Administrator-Zugangsdaten inklusive erzwungener
//! Passwort-Rotation. Zustandsmaschine mit zwei Zustaenden: Anonym und
//! Angemeldet(username).

use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::password::{passwort_hashen, passwort_verifizieren, zeitkonstant_gleich};
use crate::session::{Session, SessionStore};
use crate::store::{CredentialStore, Zugangsdaten};

/// Sichtbarer Session-Zustand fuer die `session`-Aktion
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub angemeldet: bool,
    pub username: Option<String>,
    pub passwort_wechsel_noetig: bool,
}

impl SessionStatus {
    fn anonym() -> Self {
        Self {
            angemeldet: false,
            username: None,
            passwort_wechsel_noetig: false,
        }
    }
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService {
    store: Arc<CredentialStore>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn neu(store: Arc<CredentialStore>, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    /// Meldet den Administrator an und stellt eine frische Session aus
    ///
    /// Benutzername (zeitkonstant) und Passwort (Argon2-Verifikation)
    /// muessen beide stimmen; die Fehlermeldung verraet nie, welches
    /// Feld falsch war. Ein mitgegebener alter Token wird invalidiert,
    /// damit jeder Login einen neuen Session-Bezeichner traegt.
    ///
    /// Gibt die Session und das Rotations-Flag zurueck.
    pub async fn anmelden(
        &self,
        username: &str,
        passwort: &str,
        alter_token: Option<&str>,
    ) -> AuthResult<(Session, bool)> {
        let daten = self.store.laden()?;

        // Beide Pruefungen laufen unabhaengig vom Zwischenergebnis
        let name_ok = zeitkonstant_gleich(username, &daten.username);
        let passwort_ok = passwort_verifizieren(passwort, &daten.passwort_hash)?;
        if !name_ok || !passwort_ok {
            tracing::warn!("Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        if let Some(token) = alter_token {
            self.sessions.invalidieren(token).await;
        }
        let session = self.sessions.erstellen(&daten.username).await;

        tracing::info!(username = %daten.username, "Administrator angemeldet");
        Ok((session, daten.passwort_wechsel_noetig))
    }

    /// Meldet ab und zerstoert die Session – bedingungslos
    pub async fn abmelden(&self, token: &str) {
        self.sessions.invalidieren(token).await;
        tracing::debug!("Session invalidiert (Abmeldung)");
    }

    /// Guard fuer alle Aktionen ausserhalb von {session, login}
    pub async fn session_pruefen(&self, token: Option<&str>) -> AuthResult<Session> {
        match token {
            Some(t) => self
                .sessions
                .validieren(t)
                .await
                .ok_or(AuthError::AnmeldungErforderlich),
            None => Err(AuthError::AnmeldungErforderlich),
        }
    }

    /// Liefert den sichtbaren Session-Zustand fuer die Oberflaeche
    pub async fn status(&self, token: Option<&str>) -> AuthResult<SessionStatus> {
        let Some(token) = token else {
            return Ok(SessionStatus::anonym());
        };
        let Some(session) = self.sessions.validieren(token).await else {
            return Ok(SessionStatus::anonym());
        };

        let daten = self.store.laden()?;
        Ok(SessionStatus {
            angemeldet: true,
            username: Some(session.username),
            passwort_wechsel_noetig: daten.passwort_wechsel_noetig,
        })
    }

    /// Aktualisiert Benutzername und/oder Passwort des Administrators
    ///
    /// Verlangt eine gueltige Session und das korrekte aktuelle Passwort.
    /// Ein neues Passwort muss mindestens 8 Zeichen lang sein und mit der
    /// Bestaetigung uebereinstimmen; bei Erfolg wird der Hash ersetzt und
    /// das Rotations-Flag geloescht. Ohne neues Passwort schlaegt der
    /// Aufruf fehl, solange das Rotations-Flag gesetzt ist – die Rotation
    /// laesst sich nicht ueberspringen. Reine Namensaenderungen sind
    /// danach erlaubt. Bei jedem Fehler bleibt die laufende Session
    /// unveraendert angemeldet.
    pub async fn zugangsdaten_aktualisieren(
        &self,
        token: &str,
        username: &str,
        aktuelles_passwort: &str,
        neues_passwort: &str,
        bestaetigung: &str,
    ) -> AuthResult<Zugangsdaten> {
        let session = self
            .sessions
            .validieren(token)
            .await
            .ok_or(AuthError::AnmeldungErforderlich)?;

        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::BenutzernameFehlt);
        }

        // Lesen-dann-Schreiben unter der Speicher-Sperre
        let _sperre = self.store.sperren().await;
        let mut daten = self.store.laden()?;

        if !passwort_verifizieren(aktuelles_passwort, &daten.passwort_hash)? {
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        if neues_passwort.is_empty() {
            if daten.passwort_wechsel_noetig {
                return Err(AuthError::RotationErforderlich);
            }
        } else {
            if neues_passwort.chars().count() < 8 {
                return Err(AuthError::PasswortZuKurz);
            }
            if neues_passwort != bestaetigung {
                return Err(AuthError::PasswortBestaetigungFalsch);
            }
            daten.passwort_hash = passwort_hashen(neues_passwort)?;
            daten.passwort_wechsel_noetig = false;
        }

        daten.username = username.to_string();
        self.store.speichern(&daten)?;
        self.sessions.umbenennen(&session.token, username).await;

        tracing::info!(username = %username, "Zugangsdaten aktualisiert");
        Ok(daten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_pfad() -> PathBuf {
        std::env::temp_dir()
            .join("hafenmeister-tests")
            .join(format!("service-{}.json", uuid::Uuid::new_v4()))
    }

    fn test_service() -> AuthService {
        let store = Arc::new(CredentialStore::neu(test_pfad()));
        store.initialisieren().expect("Initialisierung fehlgeschlagen");
        AuthService::neu(store, SessionStore::neu())
    }

    #[tokio::test]
    async fn login_mit_standard_zugangsdaten_meldet_rotation() {
        let service = test_service();
        let (session, wechsel_noetig) = service
            .anmelden("admin", "admin", None)
            .await
            .expect("Login fehlgeschlagen");
        assert_eq!(session.username, "admin");
        assert!(wechsel_noetig, "Erster Login muss Rotation melden");
    }

    #[tokio::test]
    async fn falsche_zugangsdaten_geben_generischen_fehler() {
        let service = test_service();
        for (benutzer, passwort) in [("admin", "falsch"), ("falsch", "admin")] {
            let fehler = service.anmelden(benutzer, passwort, None).await.unwrap_err();
            assert!(
                matches!(fehler, AuthError::UngueltigeAnmeldedaten),
                "Fehler darf nicht verraten, welches Feld falsch war"
            );
        }
    }

    #[tokio::test]
    async fn login_regeneriert_den_session_bezeichner() {
        let service = test_service();
        let (alte, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");
        let (neue, _) = service
            .anmelden("admin", "admin", Some(&alte.token))
            .await
            .expect("Login fehlgeschlagen");

        assert_ne!(alte.token, neue.token);
        assert!(
            service.session_pruefen(Some(&alte.token)).await.is_err(),
            "Alter Token muss nach erneutem Login ungueltig sein"
        );
        assert!(service.session_pruefen(Some(&neue.token)).await.is_ok());
    }

    #[tokio::test]
    async fn abmelden_zerstoert_die_session() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");
        service.abmelden(&session.token).await;
        assert!(matches!(
            service.session_pruefen(Some(&session.token)).await,
            Err(AuthError::AnmeldungErforderlich)
        ));
    }

    #[tokio::test]
    async fn status_ohne_token_ist_anonym() {
        let service = test_service();
        let status = service.status(None).await.expect("Status fehlgeschlagen");
        assert!(!status.angemeldet);
        assert!(status.username.is_none());
    }

    #[tokio::test]
    async fn rotation_laesst_sich_nicht_ueberspringen() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        let fehler = service
            .zugangsdaten_aktualisieren(&session.token, "admin", "admin", "", "")
            .await
            .unwrap_err();
        assert!(matches!(fehler, AuthError::RotationErforderlich));
    }

    #[tokio::test]
    async fn rotation_mit_gueltigem_passwort_loescht_das_flag() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        service
            .zugangsdaten_aktualisieren(&session.token, "admin", "admin", "neues_passwort", "neues_passwort")
            .await
            .expect("Aktualisierung fehlgeschlagen");

        let status = service.status(Some(&session.token)).await.expect("Status fehlgeschlagen");
        assert!(status.angemeldet);
        assert!(!status.passwort_wechsel_noetig, "Rotations-Flag muss geloescht sein");

        // Altes Passwort darf nicht mehr gelten
        assert!(service.anmelden("admin", "admin", None).await.is_err());
        assert!(service.anmelden("admin", "neues_passwort", None).await.is_ok());
    }

    #[tokio::test]
    async fn zu_kurzes_passwort_laesst_hash_unveraendert() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        let fehler = service
            .zugangsdaten_aktualisieren(&session.token, "admin", "admin", "kurz", "kurz")
            .await
            .unwrap_err();
        assert!(matches!(fehler, AuthError::PasswortZuKurz));

        // Altes Passwort gilt weiterhin
        assert!(service.anmelden("admin", "admin", None).await.is_ok());
    }

    #[tokio::test]
    async fn abweichende_bestaetigung_wird_abgelehnt() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        let fehler = service
            .zugangsdaten_aktualisieren(&session.token, "admin", "admin", "neues_passwort", "anders")
            .await
            .unwrap_err();
        assert!(matches!(fehler, AuthError::PasswortBestaetigungFalsch));
    }

    #[tokio::test]
    async fn namensaenderung_ohne_passwort_nach_rotation() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        service
            .zugangsdaten_aktualisieren(&session.token, "admin", "admin", "neues_passwort", "neues_passwort")
            .await
            .expect("Rotation fehlgeschlagen");

        let daten = service
            .zugangsdaten_aktualisieren(&session.token, "verwalter", "neues_passwort", "", "")
            .await
            .expect("Namensaenderung fehlgeschlagen");
        assert_eq!(daten.username, "verwalter");

        // Laufende Session traegt den neuen Namen
        let status = service.status(Some(&session.token)).await.expect("Status fehlgeschlagen");
        assert_eq!(status.username.as_deref(), Some("verwalter"));
    }

    #[tokio::test]
    async fn falsches_aktuelles_passwort_laesst_session_angemeldet() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        let fehler = service
            .zugangsdaten_aktualisieren(&session.token, "admin", "falsch", "neues_passwort", "neues_passwort")
            .await
            .unwrap_err();
        assert!(matches!(fehler, AuthError::UngueltigeAnmeldedaten));
        assert!(service.session_pruefen(Some(&session.token)).await.is_ok());
    }

    #[tokio::test]
    async fn leerer_benutzername_wird_abgelehnt() {
        let service = test_service();
        let (session, _) = service.anmelden("admin", "admin", None).await.expect("Login fehlgeschlagen");

        let fehler = service
            .zugangsdaten_aktualisieren(&session.token, "   ", "admin", "neues_passwort", "neues_passwort")
            .await
            .unwrap_err();
        assert!(matches!(fehler, AuthError::BenutzernameFehlt));
    }
}
