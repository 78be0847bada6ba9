//! hafenmeister-docker – Befehls-Broker fuer die Docker-CLI
//!
//! Dieses Crate implementiert:
//! - Argument-Sanitizer (Allow-List-Klassifizierung einzelner Tokens)
//! - Prozess-Ausfuehrer (externe Prozesse mit getrennten Pipes)
//! - DockerBroker (Aktion + Parameter -> Kommandozeile -> dekodierte Records)
//!
//! Der Broker haelt keinen persistenten Zustand; er ist ein reiner
//! Uebersetzer zwischen der Aktions-Schicht und der Laufzeit-CLI.

pub mod broker;
pub mod error;
pub mod invoker;
pub mod records;
pub mod sanitizer;

// Bequeme Re-Exporte
pub use broker::{DockerBroker, ErstellAuftrag};
pub use error::{DockerError, DockerResult};
pub use invoker::{BefehlsAusfuehrer, BefehlsErgebnis, ProzessAusfuehrer};
pub use records::{ContainerEintrag, ImageEintrag, NetzwerkEintrag, VolumeEintrag};
