//! Fehlertypen fuer die Auth-Schicht
//!
//! Die Display-Texte gehen unveraendert in den Antwort-Umschlag und
//! duerfen deshalb keine internen Pfade oder Hash-Details enthalten.

use thiserror::Error;

/// Alle moeglichen Fehler in der Auth-Schicht
#[derive(Debug, Error)]
pub enum AuthError {
    /// Generische Login-/Verifikationsmeldung – verraet nie welches Feld falsch war
    #[error("Invalid username or password.")]
    UngueltigeAnmeldedaten,

    /// Keine gueltige Session vorhanden
    #[error("Authentication required.")]
    AnmeldungErforderlich,

    /// Die gespeicherten Zugangsdaten sind unlesbar oder unvollstaendig.
    /// Das Detail landet im Log, nicht in der Antwort.
    #[error("Stored credentials are unreadable.")]
    SpeicherBeschaedigt(String),

    #[error("A username is required.")]
    BenutzernameFehlt,

    #[error("The new password must be at least 8 characters long.")]
    PasswortZuKurz,

    #[error("Passwords must match.")]
    PasswortBestaetigungFalsch,

    /// Rotations-Flag gesetzt, aber kein neues Passwort geliefert
    #[error("A new password is required before other changes can be made.")]
    RotationErforderlich,

    #[error("Internal authentication error.")]
    PasswortHashing(String),

    #[error("Unable to persist credentials.")]
    Speicher(#[from] std::io::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;
