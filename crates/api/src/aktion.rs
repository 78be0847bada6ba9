//! Die feste Allow-List aller Verwaltungsaktionen
//!
//! Eine unbekannte oder fehlende Aktion wird abgelehnt, bevor irgendeine
//! andere Arbeit passiert. Pro Aktion sind HTTP-Methode und
//! Anmeldepflicht festgelegt.

/// Eine benannte Verwaltungsaktion an der Systemgrenze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aktion {
    Session,
    Login,
    Logout,
    UpdateCredentials,
    ListContainers,
    StartContainer,
    StopContainer,
    RestartContainer,
    RemoveContainer,
    ListImages,
    RemoveImage,
    ListVolumes,
    RemoveVolume,
    ListNetworks,
    RemoveNetwork,
    CreateContainer,
    ContainerLogs,
    ContainerExec,
}

impl Aktion {
    /// Prueft einen Aktionsnamen gegen die Allow-List
    pub fn parsen(name: &str) -> Option<Self> {
        Some(match name {
            "session" => Self::Session,
            "login" => Self::Login,
            "logout" => Self::Logout,
            "update_credentials" => Self::UpdateCredentials,
            "list_containers" => Self::ListContainers,
            "start_container" => Self::StartContainer,
            "stop_container" => Self::StopContainer,
            "restart_container" => Self::RestartContainer,
            "remove_container" => Self::RemoveContainer,
            "list_images" => Self::ListImages,
            "remove_image" => Self::RemoveImage,
            "list_volumes" => Self::ListVolumes,
            "remove_volume" => Self::RemoveVolume,
            "list_networks" => Self::ListNetworks,
            "remove_network" => Self::RemoveNetwork,
            "create_container" => Self::CreateContainer,
            "container_logs" => Self::ContainerLogs,
            "container_exec" => Self::ContainerExec,
            _ => return None,
        })
    }

    /// Zustandsaendernde Aktionen verlangen eine POST-Anfrage;
    /// reine Lesezugriffe akzeptieren GET oder POST
    pub fn nur_post(self) -> bool {
        !matches!(
            self,
            Self::Session
                | Self::ListContainers
                | Self::ListImages
                | Self::ListVolumes
                | Self::ListNetworks
                | Self::ContainerLogs
        )
    }

    /// Nur Session-Status und Login sind ohne Anmeldung erreichbar
    pub fn oeffentlich(self) -> bool {
        matches!(self, Self::Session | Self::Login)
    }
}
