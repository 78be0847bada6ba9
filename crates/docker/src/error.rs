//! Fehlertypen fuer den Docker-Broker

use thiserror::Error;

/// Alle moeglichen Fehler bei der Befehlsausfuehrung
///
/// Die Display-Texte sind die Meldungen, die der Action-Router unveraendert
/// in den Antwort-Umschlag uebernimmt.
#[derive(Debug, Error)]
pub enum DockerError {
    /// Die Laufzeit hat mit Exit-Code != 0 geantwortet.
    /// Traegt den stderr-Text bzw. die feste Ausweichmeldung.
    #[error("{0}")]
    Laufzeit(String),

    /// Der externe Prozess konnte gar nicht erst gestartet werden
    #[error("Unable to execute command.")]
    ProzessStart,

    /// Fehlender oder unbrauchbarer Parameter
    #[error("{0}")]
    UngueltigeEingabe(String),
}

pub type DockerResult<T> = Result<T, DockerError>;
