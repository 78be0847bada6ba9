//! Typisierte Records fuer die Listen-Ausgaben der Laufzeit
//!
//! Die Laufzeit emittiert im strukturierten Listenmodus (`--format
//! '{{json .}}'`) pro Zeile ein selbstbeschreibendes JSON-Objekt mit
//! Grossbuchstaben-Schluesseln (`ID`, `Names`, ...). Diese Records
//! dekodieren genau die Felder, die die Oberflaeche braucht, und
//! serialisieren sie mit stabilen Kleinbuchstaben-Schluesseln.
//!
//! Felder, die die Laufzeit nicht liefert, werden als Leerstring
//! repraesentiert – nie als null oder fehlender Schluessel.

use serde::{Deserialize, Serialize};

/// Ein Container aus `ps -a`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEintrag {
    #[serde(rename(deserialize = "ID"), default)]
    pub id: String,
    #[serde(rename(deserialize = "Names"), default)]
    pub name: String,
    #[serde(rename(deserialize = "Image"), default)]
    pub image: String,
    #[serde(rename(deserialize = "Status"), default)]
    pub status: String,
    #[serde(rename(deserialize = "Ports"), default)]
    pub ports: String,
    #[serde(rename(deserialize = "RunningFor"), default)]
    pub created: String,
}

/// Ein Image aus `images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEintrag {
    #[serde(rename(deserialize = "Repository"), default)]
    pub repository: String,
    #[serde(rename(deserialize = "Tag"), default)]
    pub tag: String,
    #[serde(rename(deserialize = "ID"), default)]
    pub id: String,
    #[serde(rename(deserialize = "Size"), default)]
    pub size: String,
    #[serde(rename(deserialize = "CreatedSince"), default)]
    pub created: String,
}

/// Ein Volume aus `volume ls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeEintrag {
    #[serde(rename(deserialize = "Name"), default)]
    pub name: String,
    #[serde(rename(deserialize = "Driver"), default)]
    pub driver: String,
    #[serde(rename(deserialize = "Mountpoint"), default)]
    pub mountpoint: String,
}

/// Ein Netzwerk aus `network ls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetzwerkEintrag {
    #[serde(rename(deserialize = "ID"), default)]
    pub id: String,
    #[serde(rename(deserialize = "Name"), default)]
    pub name: String,
    #[serde(rename(deserialize = "Driver"), default)]
    pub driver: String,
    #[serde(rename(deserialize = "Scope"), default)]
    pub scope: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_zeile_wird_dekodiert() {
        let zeile = r#"{"ID":"abc123","Names":"web","Image":"nginx:latest","Status":"Up 2 hours","Ports":"0.0.0.0:8080->80/tcp","RunningFor":"2 hours ago","Command":"nginx"}"#;
        let eintrag: ContainerEintrag = serde_json::from_str(zeile).expect("Dekodierung fehlgeschlagen");
        assert_eq!(eintrag.id, "abc123");
        assert_eq!(eintrag.name, "web");
        assert_eq!(eintrag.image, "nginx:latest");
        assert_eq!(eintrag.created, "2 hours ago");
    }

    #[test]
    fn fehlende_felder_werden_leerstrings() {
        let eintrag: ContainerEintrag =
            serde_json::from_str(r#"{"ID":"abc123"}"#).expect("Dekodierung fehlgeschlagen");
        assert_eq!(eintrag.id, "abc123");
        assert_eq!(eintrag.name, "");
        assert_eq!(eintrag.ports, "");
    }

    #[test]
    fn serialisierung_nutzt_kleinbuchstaben_schluessel() {
        let eintrag = VolumeEintrag {
            name: "daten".into(),
            driver: "local".into(),
            mountpoint: "/var/lib/docker/volumes/daten".into(),
        };
        let json = serde_json::to_value(&eintrag).expect("Serialisierung fehlgeschlagen");
        assert_eq!(json["name"], "daten");
        assert_eq!(json["driver"], "local");
        assert_eq!(json["mountpoint"], "/var/lib/docker/volumes/daten");
    }
}
