//! Prozess-Ausfuehrer
//!
//! Fuehrt genau einen externen Prozess aus, mit getrennten Pipes fuer
//! stdout und stderr und sofort geschlossenem stdin (keine interaktive
//! Eingabe). Beide Ausgabestroeme werden vollstaendig geleert bevor der
//! Exit-Code gelesen wird, damit volle Pipe-Puffer nicht deadlocken.
//!
//! Kann der Prozess gar nicht erst gestartet werden, liefert der
//! Ausfuehrer ein synthetisches Ergebnis mit fester Fehlermeldung statt
//! eines `Err` – der Broker entscheidet, wie das nach aussen geht.
//! Kein Retry: Ausfuehrung ist fire-once.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Feste Meldung wenn der Prozessstart selbst fehlschlaegt
pub const START_FEHLER_MELDUNG: &str = "Unable to execute command.";

/// Universelles Ergebnis einer Prozessausfuehrung
#[derive(Debug, Clone)]
pub struct BefehlsErgebnis {
    /// Exit-Code des Prozesses (-1 wenn durch Signal beendet)
    pub exit_code: i32,
    /// Vollstaendig geleerter stdout-Strom
    pub stdout: String,
    /// Vollstaendig geleerter stderr-Strom
    pub stderr: String,
    /// Markiert das synthetische Konnte-nicht-starten-Ergebnis
    pub start_fehler: bool,
}

impl BefehlsErgebnis {
    /// Synthetisches Ergebnis fuer einen fehlgeschlagenen Prozessstart
    pub fn start_fehler() -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: START_FEHLER_MELDUNG.into(),
            start_fehler: true,
        }
    }

    /// Gibt `true` zurueck wenn der Prozess mit Exit-Code 0 beendet wurde
    pub fn erfolgreich(&self) -> bool {
        !self.start_fehler && self.exit_code == 0
    }
}

/// Seam zwischen Broker und tatsaechlicher Prozessausfuehrung
///
/// Tests haengen hier einen Mock ein; produktiv laeuft [`ProzessAusfuehrer`].
#[async_trait]
pub trait BefehlsAusfuehrer: Send + Sync {
    /// Fuehrt die vorbereitete Kommandozeile aus und liefert das Ergebnis
    async fn ausfuehren(&self, kommandozeile: &str) -> BefehlsErgebnis;
}

/// Produktiver Ausfuehrer auf Basis von `sh -c`
///
/// Die Kommandozeile ist zu diesem Zeitpunkt bereits vollstaendig durch
/// den Sanitizer gelaufen bzw. eine feste Listenzeile mit den
/// Format-Flags der Laufzeit.
pub struct ProzessAusfuehrer;

#[async_trait]
impl BefehlsAusfuehrer for ProzessAusfuehrer {
    async fn ausfuehren(&self, kommandozeile: &str) -> BefehlsErgebnis {
        tracing::debug!(kommando = %kommandozeile, "Externer Prozess wird gestartet");

        let ausgabe = Command::new("sh")
            .arg("-c")
            .arg(kommandozeile)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match ausgabe {
            Ok(out) => BefehlsErgebnis {
                exit_code: out.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&out.stdout).to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).to_string(),
                start_fehler: false,
            },
            Err(e) => {
                tracing::warn!(fehler = %e, "Prozess konnte nicht gestartet werden");
                BefehlsErgebnis::start_fehler()
            }
        }
    }
}
