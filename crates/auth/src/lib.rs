//! hafenmeister-auth – Session- und Zugangsdaten-Verwaltung
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Zugangsdaten-Speicher (eine einzige Administrator-Identitaet auf Platte)
//! - Session-Management (in-memory HashMap mit TTL)
//! - AuthService (Login, Logout, erzwungene Passwort-Rotation)

pub mod error;
pub mod password;
pub mod service;
pub mod session;
pub mod store;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use password::{passwort_hashen, passwort_verifizieren, zeitkonstant_gleich};
pub use service::{AuthService, SessionStatus};
pub use session::{Session, SessionStore};
pub use store::{CredentialStore, Zugangsdaten};
