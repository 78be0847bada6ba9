//! Session-Cookie-Transport
//!
//! Der Session-Token wandert als HttpOnly-Cookie zwischen Browser und
//! Server. Kein Cookie-Crate; die Header werden wie beim restlichen
//! Header-Handling von Hand gelesen und gebaut.

use axum::http::HeaderMap;

/// Name des Session-Cookies
pub const SESSION_COOKIE: &str = "hafenmeister_session";

/// Extrahiert den Session-Token aus dem Cookie-Header, falls vorhanden
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let roh = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    roh.split(';')
        .filter_map(|teil| teil.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, wert)| wert.to_string())
}

/// Baut den Set-Cookie-Wert fuer eine frische Session
pub fn cookie_setzen(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Baut den Set-Cookie-Wert, der das Session-Cookie sofort verwirft
pub fn cookie_loeschen() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
