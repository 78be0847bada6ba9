//! Der eine Dispatch-Endpunkt des Action-Routers
//!
//! Ablauf pro Anfrage, in fester Reihenfolge:
//! Aktionsname gegen Allow-List -> HTTP-Methode -> Anmeldepflicht ->
//! Parameter -> Broker/Auth-Aufruf -> Umschlag. Jede Anfrage wird von
//! genau einem Worker-Aufruf Ende-zu-Ende bearbeitet; es gibt keinen
//! Hintergrund-Dispatch und keine Wiederholungen.

use std::collections::HashMap;

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use hafenmeister_auth::AuthError;
use hafenmeister_docker::ErstellAuftrag;

use crate::aktion::Aktion;
use crate::anfrage::AktionsAnfrage;
use crate::cookie;
use crate::error::ApiError;
use crate::ApiState;

/// GET/POST /api?action=... – der einzige Aktions-Endpunkt
pub async fn api_einstieg(
    State(state): State<ApiState>,
    methode: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    form: Option<Form<HashMap<String, String>>>,
) -> Response {
    // Body-Parameter ueberschreiben gleichnamige Query-Parameter
    let mut params = query;
    if let Some(Form(body)) = form {
        params.extend(body);
    }

    // Unbekannte oder fehlende Aktion: Ablehnung vor jeder anderen Arbeit
    let Some(aktion) = params.get("action").and_then(|n| Aktion::parsen(n)) else {
        return fehler_umschlag(&ApiError::UngueltigeAktion);
    };

    let anfrage = AktionsAnfrage {
        aktion,
        methode,
        params,
    };
    let token = cookie::session_token(&headers);

    match verteilen(&state, &anfrage, token).await {
        Ok(antwort) => antwort,
        Err(fehler) => {
            tracing::debug!(aktion = ?anfrage.aktion, fehler = %fehler, "Aktion fehlgeschlagen");
            fehler_umschlag(&fehler)
        }
    }
}

/// Erzwingt Methode und Anmeldepflicht, dann Dispatch auf die Aktion
async fn verteilen(
    state: &ApiState,
    anfrage: &AktionsAnfrage,
    token: Option<String>,
) -> Result<Response, ApiError> {
    if anfrage.aktion.nur_post() && anfrage.methode != Method::POST {
        return Err(ApiError::MethodeNichtErlaubt);
    }
    if !anfrage.aktion.oeffentlich() {
        state.auth.session_pruefen(token.as_deref()).await?;
    }

    match anfrage.aktion {
        // --- Session & Zugangsdaten ---------------------------------------
        Aktion::Session => {
            let status = state.auth.status(token.as_deref()).await?;
            Ok(erfolg_umschlag(json!({
                "authenticated": status.angemeldet,
                "username": status.username,
                "mustChangePassword": status.passwort_wechsel_noetig,
            })))
        }
        Aktion::Login => {
            let username = anfrage.pflicht("username", "Username and password are required.")?;
            let passwort = anfrage.optional("password");
            if passwort.is_empty() {
                return Err(ApiError::Validierung(
                    "Username and password are required.".into(),
                ));
            }

            let (session, wechsel_noetig) = state
                .auth
                .anmelden(&username, passwort, token.as_deref())
                .await?;

            let mut antwort = erfolg_umschlag(json!({
                "username": session.username,
                "mustChangePassword": wechsel_noetig,
            }));
            cookie_anhaengen(&mut antwort, &cookie::cookie_setzen(&session.token));
            Ok(antwort)
        }
        Aktion::Logout => {
            if let Some(token) = token.as_deref() {
                state.auth.abmelden(token).await;
            }
            let mut antwort = erfolg_umschlag(json!({ "message": "Signed out." }));
            cookie_anhaengen(&mut antwort, &cookie::cookie_loeschen());
            Ok(antwort)
        }
        Aktion::UpdateCredentials => {
            let token = token.ok_or(AuthError::AnmeldungErforderlich)?;
            let daten = state
                .auth
                .zugangsdaten_aktualisieren(
                    &token,
                    anfrage.optional("username"),
                    anfrage.optional("currentPassword"),
                    anfrage.optional("newPassword"),
                    anfrage.optional("confirmPassword"),
                )
                .await?;
            Ok(erfolg_umschlag(json!({
                "message": "Credentials updated successfully.",
                "username": daten.username,
                "mustChangePassword": daten.passwort_wechsel_noetig,
            })))
        }

        // --- Listen -------------------------------------------------------
        Aktion::ListContainers => Ok(erfolg_umschlag(json!({
            "containers": state.broker.container_auflisten().await?,
        }))),
        Aktion::ListImages => Ok(erfolg_umschlag(json!({
            "images": state.broker.images_auflisten().await?,
        }))),
        Aktion::ListVolumes => Ok(erfolg_umschlag(json!({
            "volumes": state.broker.volumes_auflisten().await?,
        }))),
        Aktion::ListNetworks => Ok(erfolg_umschlag(json!({
            "networks": state.broker.netzwerke_auflisten().await?,
        }))),

        // --- Feste Verb-plus-Bezeichner-Befehle ---------------------------
        Aktion::StartContainer => einfacher_befehl(state, anfrage, "start", &[]).await,
        Aktion::StopContainer => einfacher_befehl(state, anfrage, "stop", &[]).await,
        Aktion::RestartContainer => einfacher_befehl(state, anfrage, "restart", &[]).await,
        Aktion::RemoveContainer => einfacher_befehl(state, anfrage, "rm", &["-f"]).await,
        Aktion::RemoveImage => einfacher_befehl(state, anfrage, "rmi", &[]).await,
        Aktion::RemoveVolume => einfacher_befehl(state, anfrage, "volume rm", &[]).await,
        Aktion::RemoveNetwork => einfacher_befehl(state, anfrage, "network rm", &[]).await,

        // --- Zusammengesetzte Operationen ---------------------------------
        Aktion::CreateContainer => {
            let auftrag = ErstellAuftrag {
                name: anfrage.optional("name").into(),
                image: anfrage.optional("image").into(),
                kommando: anfrage.optional("command").into(),
                ports: anfrage.optional("ports").into(),
                env: anfrage.optional("env").into(),
                volumes: anfrage.optional("volumes").into(),
            };
            let container_id = state.broker.container_erstellen(&auftrag).await?;
            Ok(erfolg_umschlag(json!({
                "message": "Container created successfully.",
                "containerId": container_id,
            })))
        }
        Aktion::ContainerLogs => {
            let id = anfrage.pflicht_id()?;
            let tail = anfrage.params.get("tail").map(String::as_str);
            let logs = state.broker.logs_abrufen(&id, tail).await?;
            Ok(erfolg_umschlag(json!({ "logs": logs })))
        }
        Aktion::ContainerExec => {
            let id = anfrage.pflicht_id()?;
            let ausgabe = state
                .broker
                .exec_ausfuehren(&id, anfrage.optional("command"))
                .await?;
            Ok(erfolg_umschlag(json!({ "output": ausgabe })))
        }
    }
}

/// Fester Verb-Befehl mit Pflicht-Bezeichner
async fn einfacher_befehl(
    state: &ApiState,
    anfrage: &AktionsAnfrage,
    verb: &str,
    flaggen: &[&str],
) -> Result<Response, ApiError> {
    let id = anfrage.pflicht_id()?;
    let meldung = state.broker.einfacher_befehl(verb, &id, flaggen).await?;
    Ok(erfolg_umschlag(json!({ "message": meldung })))
}

/// Erfolgs-Umschlag: injiziert `success: true` in die Felder der Operation
fn erfolg_umschlag(mut werte: serde_json::Value) -> Response {
    if let serde_json::Value::Object(felder) = &mut werte {
        felder.insert("success".into(), json!(true));
    }
    (StatusCode::OK, Json(werte)).into_response()
}

/// Fehler-Umschlag: `{success: false, message}` mit passendem Statuscode
fn fehler_umschlag(fehler: &ApiError) -> Response {
    let status = StatusCode::from_u16(fehler.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "success": false, "message": fehler.to_string() })),
    )
        .into_response()
}

/// Haengt einen Set-Cookie-Header an eine fertige Antwort an
fn cookie_anhaengen(antwort: &mut Response, wert: &str) {
    if let Ok(wert) = HeaderValue::from_str(wert) {
        antwort.headers_mut().insert(header::SET_COOKIE, wert);
    }
}
