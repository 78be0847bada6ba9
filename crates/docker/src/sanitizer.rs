//! Argument-Sanitizer
//!
//! Klassifiziert einzelne Befehls-Tokens und escapet sie so, dass die mit
//! Leerzeichen zusammengefuegte Kommandozeile in einer Shell exakt die
//! urspruenglichen Tokens als argv reproduziert. Kein Token darf gesplittet,
//! geglobbt oder als zusaetzlicher Befehl interpretiert werden.
//!
//! Die Regeln sind eine Allow-List in fester Prioritaetsreihenfolge –
//! ein Token koennte mehrere Klassen gleichzeitig treffen:
//! 1. Leeres Token -> explizit gequotetes Leerstring-Literal `''`
//! 2. Kurz-Flag (`-`/`--` gefolgt von Buchstaben/Ziffern/`_`/`-`) -> unveraendert
//! 3. "Sichere" Zeichenklasse (Buchstaben, Ziffern, `.` `_` `:` `/` `-`) -> unveraendert
//! 4. Alles andere -> als einfach gequotetes Shell-Literal

/// Prueft ob ein Token wie eine Befehls-Flag aussieht (`-f`, `--name`, ...)
///
/// Flags muessen unescaped bleiben, damit das aufgerufene Programm sie
/// als Flags erkennt.
fn ist_flagge(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-') else {
        return false;
    };
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Prueft ob ein Token ausschliesslich aus der sicheren Zeichenklasse besteht
fn ist_sicher(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '/' | '-'))
}

/// Escapet ein Token als einfach gequotetes Shell-Literal
///
/// Eingebettete einfache Anfuehrungszeichen werden per `'\''` ausgeklammert.
fn shell_quoten(token: &str) -> String {
    format!("'{}'", token.replace('\'', "'\\''"))
}

/// Escapet ein einzelnes Token gemaess der Prioritaetsreihenfolge
pub fn token_escapen(token: &str) -> String {
    if token.is_empty() {
        return "''".into();
    }
    if ist_flagge(token) || ist_sicher(token) {
        return token.to_string();
    }
    shell_quoten(token)
}

/// Fuegt eine Token-Folge zu einer Shell-sicheren Kommandozeile zusammen
pub fn kommandozeile_bauen<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| token_escapen(t.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sichere_tokens_bleiben_unveraendert() {
        for token in ["nginx:latest", "mein-container", "a.b_c", "/pfad/zu/datei", "8080:80"] {
            assert_eq!(token_escapen(token), token, "Token {token:?} muss unveraendert bleiben");
        }
    }

    #[test]
    fn flags_bleiben_unveraendert() {
        for flag in ["-f", "-d", "--name", "--tail", "--force-rm"] {
            assert_eq!(token_escapen(flag), flag);
        }
    }

    #[test]
    fn leeres_token_wird_explizit_gequotet() {
        assert_eq!(token_escapen(""), "''");
    }

    #[test]
    fn einzelner_strich_wird_gequotet() {
        // "-" allein ist keine Flag und nicht in der sicheren Klasse
        assert_eq!(token_escapen("-"), "'-'");
    }

    #[test]
    fn metazeichen_werden_gequotet() {
        assert_eq!(token_escapen("a;b"), "'a;b'");
        assert_eq!(token_escapen("`id`"), "'`id`'");
        assert_eq!(token_escapen("$(reboot)"), "'$(reboot)'");
        assert_eq!(token_escapen("a b"), "'a b'");
        assert_eq!(token_escapen("KEY=wert mit leerzeichen"), "'KEY=wert mit leerzeichen'");
    }

    #[test]
    fn einfache_anfuehrungszeichen_werden_ausgeklammert() {
        // 'a'\''b' dekodiert in der Shell zurueck zu a'b
        assert_eq!(token_escapen("a'b"), "'a'\\''b'");
    }

    #[test]
    fn kommandozeile_wird_mit_leerzeichen_zusammengefuegt() {
        let zeile = kommandozeile_bauen(&["docker", "rm", "-f", "boeser;name"]);
        assert_eq!(zeile, "docker rm -f 'boeser;name'");
    }

    #[test]
    fn injektionsversuch_bleibt_ein_argument() {
        let zeile = kommandozeile_bauen(&["docker", "start", "x; rm -rf /"]);
        assert_eq!(zeile, "docker start 'x; rm -rf /'");
    }
}
