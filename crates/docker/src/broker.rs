//! Befehls-Broker
//!
//! Uebersetzt eine Verwaltungsaktion plus typisierte Parameter in eine
//! Shell-sichere Kommandozeile, fuehrt sie ueber den Prozess-Ausfuehrer
//! aus und dekodiert maschinenlesbare Ausgabe in Domaenen-Records.
//!
//! Fehlerpolitik: jeder Exit-Code != 0 der Laufzeit wird als
//! Operationsfehler mit dem stderr-Text (bzw. einer festen
//! Ausweichmeldung) nach oben gereicht. Das ist der einzige
//! Fehlerkanal, den der Action-Router weiterleitet.

use serde::de::DeserializeOwned;

use crate::error::{DockerError, DockerResult};
use crate::invoker::{BefehlsAusfuehrer, BefehlsErgebnis};
use crate::records::{ContainerEintrag, ImageEintrag, NetzwerkEintrag, VolumeEintrag};
use crate::sanitizer::kommandozeile_bauen;

/// Standard-Tail-Tiefe fuer Logabruf wenn der Parameter fehlt oder unbrauchbar ist
const STANDARD_TAIL: i64 = 100;

/// Generische Erfolgsmeldung wenn die Laufzeit nichts auf stdout schreibt
const ERFOLGS_MELDUNG: &str = "Command executed successfully.";

/// Auftrag fuer `create_container`
///
/// Leerer `kommando`-String bedeutet "kein Kommando" – im Gegensatz zu
/// exec, wo ein leeres Kommando ein harter Fehler ist.
#[derive(Debug, Clone, Default)]
pub struct ErstellAuftrag {
    pub name: String,
    pub image: String,
    pub kommando: String,
    pub ports: String,
    pub env: String,
    pub volumes: String,
}

/// Broker zwischen Aktions-Schicht und Laufzeit-CLI
pub struct DockerBroker {
    ausfuehrer: Box<dyn BefehlsAusfuehrer>,
    /// Name bzw. Pfad des Laufzeit-Programms (Standard: "docker")
    programm: String,
}

impl DockerBroker {
    pub fn neu(ausfuehrer: Box<dyn BefehlsAusfuehrer>, programm: impl Into<String>) -> Self {
        Self {
            ausfuehrer,
            programm: programm.into(),
        }
    }

    // --- Listen-Operationen -------------------------------------------------

    pub async fn container_auflisten(&self) -> DockerResult<Vec<ContainerEintrag>> {
        self.auflisten("ps -a", "Unable to list containers.").await
    }

    pub async fn images_auflisten(&self) -> DockerResult<Vec<ImageEintrag>> {
        self.auflisten("images", "Unable to list images.").await
    }

    pub async fn volumes_auflisten(&self) -> DockerResult<Vec<VolumeEintrag>> {
        self.auflisten("volume ls", "Unable to list volumes.").await
    }

    pub async fn netzwerke_auflisten(&self) -> DockerResult<Vec<NetzwerkEintrag>> {
        self.auflisten("network ls", "Unable to list networks.").await
    }

    /// Fuehrt eine Listen-Operation im strukturierten Listenmodus aus
    ///
    /// stdout wird zeilenweise dekodiert; Zeilen, die sich nicht dekodieren
    /// lassen, werden stillschweigend uebersprungen (teilweise oder
    /// verstuemmelte Ausgabe laesst den Aufruf nicht scheitern). Ein
    /// Exit-Code != 0 laesst dagegen immer den ganzen Aufruf scheitern.
    async fn auflisten<T: DeserializeOwned>(
        &self,
        unterbefehl: &str,
        fallback: &str,
    ) -> DockerResult<Vec<T>> {
        // Feste Listenzeile mit den Format-Flags der Laufzeit selbst
        let zeile = format!("{} {} --format '{{{{json .}}}}'", self.programm, unterbefehl);
        let ergebnis = self.ausfuehrer.ausfuehren(&zeile).await;
        self.erfolg_pruefen(&ergebnis, fallback)?;

        let mut eintraege = Vec::new();
        for zeile in ergebnis.stdout.lines() {
            let zeile = zeile.trim();
            if zeile.is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(zeile) {
                Ok(eintrag) => eintraege.push(eintrag),
                Err(e) => {
                    tracing::debug!(fehler = %e, "Unlesbare Listenzeile uebersprungen");
                }
            }
        }
        Ok(eintraege)
    }

    // --- Zustandsaendernde Operationen --------------------------------------

    /// Fester Verb-plus-Bezeichner-Befehl (start/stop/restart/rm/rmi/...)
    ///
    /// `verb` darf aus mehreren Woertern bestehen ("volume rm").
    /// Gibt die getrimmte stdout-Ausgabe als Bestaetigung zurueck, bzw.
    /// eine generische Erfolgsmeldung wenn stdout leer ist.
    pub async fn einfacher_befehl(
        &self,
        verb: &str,
        bezeichner: &str,
        flaggen: &[&str],
    ) -> DockerResult<String> {
        let mut teile: Vec<&str> = vec![self.programm.as_str()];
        teile.extend(verb.split_whitespace());
        teile.extend_from_slice(flaggen);
        teile.push(bezeichner);

        let ergebnis = self.ausfuehren_gebaut(&teile).await;
        self.erfolg_pruefen(&ergebnis, "Docker command failed.")?;
        Ok(bestaetigung(&ergebnis.stdout))
    }

    /// Erstellt und startet einen neuen Container (`run -d`)
    ///
    /// Gibt den Bezeichner des neuen Containers zurueck (getrimmte stdout).
    pub async fn container_erstellen(&self, auftrag: &ErstellAuftrag) -> DockerResult<String> {
        let name = auftrag.name.trim();
        let image = auftrag.image.trim();
        if name.is_empty() || image.is_empty() {
            return Err(DockerError::UngueltigeEingabe(
                "Container name and image are required.".into(),
            ));
        }

        let mut teile: Vec<String> = vec![
            self.programm.clone(),
            "run".into(),
            "-d".into(),
            "--name".into(),
            name.into(),
        ];

        for mapping in kommaliste(&auftrag.ports) {
            teile.push("-p".into());
            teile.push(mapping);
        }
        for zuweisung in kommaliste(&auftrag.env) {
            teile.push("-e".into());
            teile.push(zuweisung);
        }
        for volume in kommaliste(&auftrag.volumes) {
            teile.push("-v".into());
            teile.push(volume);
        }

        teile.push(image.into());

        // Leeres Kommando heisst: kein Kommando anhaengen
        for wort in auftrag.kommando.split_whitespace() {
            teile.push(wort.into());
        }

        let ergebnis = self.ausfuehren_gebaut(&teile).await;
        self.erfolg_pruefen(&ergebnis, "Failed to create container.")?;
        Ok(ergebnis.stdout.trim().to_string())
    }

    /// Holt die letzten Logzeilen eines Containers
    ///
    /// Die Tail-Tiefe faellt bei fehlendem, nicht-numerischem oder
    /// nicht-positivem Parameter auf 100 zurueck. Die Rueckgabe ist der
    /// rohe, ungetrimmte stdout – fuehrender/anhaengender Leerraum kann
    /// in mehrzeiliger Logausgabe bedeutsam sein.
    pub async fn logs_abrufen(&self, bezeichner: &str, tail: Option<&str>) -> DockerResult<String> {
        let tiefe = tail
            .and_then(|t| t.trim().parse::<i64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(STANDARD_TAIL);

        let tiefe = tiefe.to_string();
        let teile = [
            self.programm.as_str(),
            "logs",
            "--tail",
            tiefe.as_str(),
            bezeichner,
        ];
        let ergebnis = self.ausfuehren_gebaut(&teile).await;
        self.erfolg_pruefen(&ergebnis, "Unable to fetch logs.")?;
        Ok(ergebnis.stdout)
    }

    /// Fuehrt ein Ad-hoc-Kommando per Shell im Container aus
    ///
    /// Ein leeres Kommando ist hier – anders als beim Erstellen – ein
    /// harter Fehler.
    pub async fn exec_ausfuehren(&self, bezeichner: &str, kommando: &str) -> DockerResult<String> {
        let kommando = kommando.trim();
        if kommando.is_empty() {
            return Err(DockerError::UngueltigeEingabe(
                "A command is required.".into(),
            ));
        }

        let teile = [
            self.programm.as_str(),
            "exec",
            bezeichner,
            "sh",
            "-c",
            kommando,
        ];
        let ergebnis = self.ausfuehren_gebaut(&teile).await;
        self.erfolg_pruefen(&ergebnis, "Docker command failed.")?;
        Ok(bestaetigung(&ergebnis.stdout))
    }

    // --- Intern -------------------------------------------------------------

    /// Sanitisiert die Teile, fuegt sie zusammen und fuehrt sie aus
    async fn ausfuehren_gebaut<S: AsRef<str>>(&self, teile: &[S]) -> BefehlsErgebnis {
        let zeile = kommandozeile_bauen(teile);
        self.ausfuehrer.ausfuehren(&zeile).await
    }

    /// Mappt Startfehler und Exit-Code != 0 auf den jeweiligen Fehler
    fn erfolg_pruefen(&self, ergebnis: &BefehlsErgebnis, fallback: &str) -> DockerResult<()> {
        if ergebnis.start_fehler {
            return Err(DockerError::ProzessStart);
        }
        if ergebnis.exit_code != 0 {
            let stderr = ergebnis.stderr.trim();
            let meldung = if stderr.is_empty() {
                fallback.to_string()
            } else {
                stderr.to_string()
            };
            tracing::warn!(exit_code = ergebnis.exit_code, "Laufzeit-Befehl fehlgeschlagen");
            return Err(DockerError::Laufzeit(meldung));
        }
        Ok(())
    }
}

/// Getrimmte Bestaetigung aus stdout, mit generischem Fallback
fn bestaetigung(stdout: &str) -> String {
    let getrimmt = stdout.trim();
    if getrimmt.is_empty() {
        ERFOLGS_MELDUNG.to_string()
    } else {
        getrimmt.to_string()
    }
}

/// Zerlegt eine kommaseparierte Liste, trimmt und verwirft leere Eintraege
fn kommaliste(roh: &str) -> Vec<String> {
    roh.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
