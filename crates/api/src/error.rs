//! Fehlertypen des Action-Routers
//!
//! Alle Fehler werden an der Router-Grenze aufgefangen und auf den
//! einheitlichen Fehler-Umschlag `{success: false, message}` abgebildet.
//! Keiner bringt die Bearbeitung einer einzelnen Anfrage zum Absturz,
//! keiner leakt interne Pfade oder Stack-Details.

use thiserror::Error;

use hafenmeister_auth::AuthError;
use hafenmeister_docker::DockerError;

/// Alle moeglichen Fehler an der Aktionsgrenze
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid or missing action.")]
    UngueltigeAktion,

    #[error("POST method required.")]
    MethodeNichtErlaubt,

    #[error("{0}")]
    Validierung(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Docker(#[from] DockerError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP-Statuscode fuer den Fehler-Umschlag
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UngueltigeAktion => 400,
            Self::MethodeNichtErlaubt => 405,
            Self::Validierung(_) => 400,
            Self::Auth(fehler) => match fehler {
                AuthError::AnmeldungErforderlich => 401,
                AuthError::UngueltigeAnmeldedaten => 401,
                AuthError::BenutzernameFehlt
                | AuthError::PasswortZuKurz
                | AuthError::PasswortBestaetigungFalsch
                | AuthError::RotationErforderlich => 400,
                AuthError::SpeicherBeschaedigt(_)
                | AuthError::PasswortHashing(_)
                | AuthError::Speicher(_) => 500,
            },
            Self::Docker(fehler) => match fehler {
                DockerError::UngueltigeEingabe(_) => 400,
                DockerError::Laufzeit(_) | DockerError::ProzessStart => 500,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuscodes_unterscheiden_die_fehlerarten() {
        assert_eq!(ApiError::UngueltigeAktion.http_status(), 400);
        assert_eq!(ApiError::MethodeNichtErlaubt.http_status(), 405);
        assert_eq!(ApiError::Validierung("x".into()).http_status(), 400);
        assert_eq!(ApiError::Auth(AuthError::AnmeldungErforderlich).http_status(), 401);
        assert_eq!(ApiError::Auth(AuthError::UngueltigeAnmeldedaten).http_status(), 401);
        assert_eq!(
            ApiError::Auth(AuthError::SpeicherBeschaedigt("defekt".into())).http_status(),
            500
        );
        assert_eq!(ApiError::Docker(DockerError::ProzessStart).http_status(), 500);
        assert_eq!(
            ApiError::Docker(DockerError::Laufzeit("kaputt".into())).http_status(),
            500
        );
    }

    #[test]
    fn meldungen_leaken_keine_details() {
        let fehler = ApiError::Auth(AuthError::SpeicherBeschaedigt("/etc/geheim.json".into()));
        assert!(!fehler.to_string().contains("/etc"), "Pfad darf nicht in der Meldung stehen");
    }
}
