//! Normalisierte Aktionsanfrage
//!
//! Query- und Body-Parameter werden einmal an der Router-Grenze zu einer
//! typisierten Anfrage zusammengefuehrt, statt verstreute Einzelzugriffe
//! durch den Broker zu ziehen. Body-Parameter haben Vorrang vor
//! Query-Parametern.

use std::collections::HashMap;

use axum::http::Method;

use crate::aktion::Aktion;
use crate::error::{ApiError, ApiResult};

/// Die normalisierte Form eines eingehenden Aufrufs
#[derive(Debug)]
pub struct AktionsAnfrage {
    pub aktion: Aktion,
    pub methode: Method,
    pub params: HashMap<String, String>,
}

impl AktionsAnfrage {
    /// Liest einen optionalen Parameter (roh, ungetrimmt)
    pub fn optional(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }

    /// Liest einen Pflichtparameter: getrimmt und nicht leer
    pub fn pflicht(&self, name: &str, meldung: &str) -> ApiResult<String> {
        let wert = self.optional(name).trim();
        if wert.is_empty() {
            return Err(ApiError::Validierung(meldung.into()));
        }
        Ok(wert.to_string())
    }

    /// Der uniforme Pflicht-Bezeichner fuer Ressourcen-Aktionen
    pub fn pflicht_id(&self) -> ApiResult<String> {
        self.pflicht("id", "A resource identifier is required.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anfrage(params: &[(&str, &str)]) -> AktionsAnfrage {
        AktionsAnfrage {
            aktion: Aktion::StartContainer,
            methode: Method::POST,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn pflicht_trimmt_und_verlangt_inhalt() {
        let a = anfrage(&[("id", "  web  ")]);
        assert_eq!(a.pflicht_id().expect("id muss vorhanden sein"), "web");

        let leer = anfrage(&[("id", "   ")]);
        assert!(matches!(leer.pflicht_id(), Err(ApiError::Validierung(_))));

        let fehlt = anfrage(&[]);
        assert!(matches!(fehlt.pflicht_id(), Err(ApiError::Validierung(_))));
    }

    #[test]
    fn optional_liefert_rohwert() {
        let a = anfrage(&[("tail", " 50 ")]);
        assert_eq!(a.optional("tail"), " 50 ");
        assert_eq!(a.optional("gibt_es_nicht"), "");
    }
}
