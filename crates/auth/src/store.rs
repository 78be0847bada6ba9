//! Zugangsdaten-Speicher
//!
//! Persistiert genau einen Administrator-Datensatz als JSON-Datei an
//! einem festen Ort. Es existiert zu jedem Zeitpunkt genau ein
//! Datensatz; er wird beim ersten Start mit einer Standard-Identitaet
//! angelegt, nur durch eine erfolgreiche Aktualisierung veraendert und
//! nie geloescht. Gespeichert wird ausschliesslich der Einweg-Hash,
//! niemals ein Klartext-Passwort.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{AuthError, AuthResult};
use crate::password::passwort_hashen;

/// Benutzername der Standard-Identitaet beim ersten Start
pub const STANDARD_BENUTZER: &str = "admin";

/// Standard-Passwort – Rotation wird ueber das Flag erzwungen
const STANDARD_PASSWORT: &str = "admin";

/// Der einzige Administrator-Datensatz
///
/// Die JSON-Schluessel entsprechen der Form der gespeicherten Datei.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zugangsdaten {
    pub username: String,
    #[serde(rename = "passwordHash")]
    pub passwort_hash: String,
    #[serde(rename = "mustChangePassword")]
    pub passwort_wechsel_noetig: bool,
}

/// Exklusiver Eigentuemer des Datensatzes auf Platte
pub struct CredentialStore {
    pfad: PathBuf,
    /// Serialisiert Lesen-dann-Schreiben-Zyklen ueber Anfragen hinweg
    aktualisierungs_sperre: Mutex<()>,
}

impl CredentialStore {
    pub fn neu(pfad: impl Into<PathBuf>) -> Self {
        Self {
            pfad: pfad.into(),
            aktualisierungs_sperre: Mutex::new(()),
        }
    }

    /// Legt idempotent den Standard-Datensatz an, falls noch keiner existiert
    ///
    /// Erstellt bei Bedarf auch das enthaltende Verzeichnis. Das
    /// Standard-Passwort wird frisch gehasht und das Rotations-Flag
    /// gesetzt, sodass der erste Login eine Passwortaenderung erzwingt.
    pub fn initialisieren(&self) -> AuthResult<()> {
        if self.pfad.exists() {
            return Ok(());
        }

        let daten = Zugangsdaten {
            username: STANDARD_BENUTZER.into(),
            passwort_hash: passwort_hashen(STANDARD_PASSWORT)?,
            passwort_wechsel_noetig: true,
        };
        self.speichern(&daten)?;

        tracing::info!(
            pfad = %self.pfad.display(),
            username = STANDARD_BENUTZER,
            "Standard-Zugangsdaten angelegt, Passwort-Rotation erzwungen"
        );
        Ok(())
    }

    /// Laedt den aktuellen Datensatz
    ///
    /// Eine unlesbare Datei oder ein Datensatz mit fehlenden Pflichtfeldern
    /// wird einheitlich als Beschaedigung gemeldet.
    pub fn laden(&self) -> AuthResult<Zugangsdaten> {
        let inhalt = std::fs::read_to_string(&self.pfad).map_err(|e| {
            tracing::error!(pfad = %self.pfad.display(), fehler = %e, "Zugangsdaten nicht lesbar");
            AuthError::SpeicherBeschaedigt(e.to_string())
        })?;

        serde_json::from_str(&inhalt).map_err(|e| {
            tracing::error!(pfad = %self.pfad.display(), fehler = %e, "Zugangsdaten unvollstaendig oder unlesbar");
            AuthError::SpeicherBeschaedigt(e.to_string())
        })
    }

    /// Persistiert den vollstaendigen Datensatz atomar
    ///
    /// Schreibt in eine Temporaerdatei und benennt dann um – kein Leser
    /// sieht je einen teilweise geschriebenen Datensatz.
    pub fn speichern(&self, daten: &Zugangsdaten) -> AuthResult<()> {
        if let Some(verzeichnis) = self.pfad.parent() {
            if !verzeichnis.as_os_str().is_empty() {
                std::fs::create_dir_all(verzeichnis)?;
            }
        }

        let json = serde_json::to_string_pretty(daten)
            .map_err(|e| AuthError::SpeicherBeschaedigt(e.to_string()))?;

        let temp = temp_pfad(&self.pfad);
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.pfad)?;
        Ok(())
    }

    /// Sperrt den Speicher fuer einen Lesen-dann-Schreiben-Zyklus
    pub async fn sperren(&self) -> MutexGuard<'_, ()> {
        self.aktualisierungs_sperre.lock().await
    }
}

fn temp_pfad(pfad: &Path) -> PathBuf {
    let mut name = pfad.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::passwort_verifizieren;

    fn test_pfad() -> PathBuf {
        std::env::temp_dir()
            .join("hafenmeister-tests")
            .join(format!("zugangsdaten-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn initialisieren_legt_standard_datensatz_an() {
        let store = CredentialStore::neu(test_pfad());
        store.initialisieren().expect("Initialisierung fehlgeschlagen");

        let daten = store.laden().expect("Laden fehlgeschlagen");
        assert_eq!(daten.username, STANDARD_BENUTZER);
        assert!(daten.passwort_wechsel_noetig, "Rotation muss erzwungen sein");
        assert!(
            passwort_verifizieren("admin", &daten.passwort_hash).expect("Verifikation fehlgeschlagen"),
            "Standard-Passwort muss gegen den Hash verifizieren"
        );
        assert!(
            !daten.passwort_hash.contains("admin"),
            "Hash darf das Klartext-Passwort nicht enthalten"
        );
    }

    #[test]
    fn initialisieren_ist_idempotent() {
        let store = CredentialStore::neu(test_pfad());
        store.initialisieren().expect("Initialisierung fehlgeschlagen");

        let mut daten = store.laden().expect("Laden fehlgeschlagen");
        daten.username = "umbenannt".into();
        store.speichern(&daten).expect("Speichern fehlgeschlagen");

        // Zweiter Aufruf darf den bestehenden Datensatz nicht anruehren
        store.initialisieren().expect("Initialisierung fehlgeschlagen");
        assert_eq!(store.laden().expect("Laden fehlgeschlagen").username, "umbenannt");
    }

    #[test]
    fn speichern_und_laden_erhaelt_alle_felder() {
        let store = CredentialStore::neu(test_pfad());
        let daten = Zugangsdaten {
            username: "verwalter".into(),
            passwort_hash: "$argon2id$platzhalter".into(),
            passwort_wechsel_noetig: false,
        };
        store.speichern(&daten).expect("Speichern fehlgeschlagen");

        let geladen = store.laden().expect("Laden fehlgeschlagen");
        assert_eq!(geladen.username, "verwalter");
        assert_eq!(geladen.passwort_hash, "$argon2id$platzhalter");
        assert!(!geladen.passwort_wechsel_noetig);
    }

    #[test]
    fn fehlende_pflichtfelder_sind_beschaedigung() {
        let pfad = test_pfad();
        std::fs::create_dir_all(pfad.parent().unwrap()).unwrap();
        std::fs::write(&pfad, r#"{"username":"admin"}"#).unwrap();

        let fehler = CredentialStore::neu(pfad).laden().unwrap_err();
        assert!(matches!(fehler, AuthError::SpeicherBeschaedigt(_)));
    }

    #[test]
    fn unlesbares_json_ist_beschaedigung() {
        let pfad = test_pfad();
        std::fs::create_dir_all(pfad.parent().unwrap()).unwrap();
        std::fs::write(&pfad, "kein json").unwrap();

        let fehler = CredentialStore::neu(pfad).laden().unwrap_err();
        assert!(matches!(fehler, AuthError::SpeicherBeschaedigt(_)));
    }

    #[test]
    fn dateischluessel_entsprechen_dem_dateiformat() {
        let store = CredentialStore::neu(test_pfad());
        store.initialisieren().expect("Initialisierung fehlgeschlagen");

        let roh = std::fs::read_to_string(&store.pfad).expect("Datei nicht lesbar");
        assert!(roh.contains("\"passwordHash\""));
        assert!(roh.contains("\"mustChangePassword\""));
    }
}
