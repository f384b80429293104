//! Encodage du protocole texte ServerQuery.
//!
//! Une réponse est une suite de lignes terminées par `\n\r`. Une ligne de
//! données contient des enregistrements séparés par `|`, chacun étant une
//! liste de `clé=valeur` séparés par des espaces. Toute commande se termine
//! par une ligne `error id=.. msg=..`.

use std::collections::HashMap;

/// Un enregistrement `clé=valeur` d'une réponse ou d'une notification
pub type Record = HashMap<String, String>;

const ESCAPES: [(char, &str); 11] = [
    ('\\', "\\\\"),
    ('/', "\\/"),
    (' ', "\\s"),
    ('|', "\\p"),
    ('\u{07}', "\\a"),
    ('\u{08}', "\\b"),
    ('\u{0C}', "\\f"),
    ('\n', "\\n"),
    ('\r', "\\r"),
    ('\t', "\\t"),
    ('\u{0B}', "\\v"),
];

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match ESCAPES.iter().find(|(raw, _)| *raw == c) {
            Some((_, escaped)) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    out
}

pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(code) => {
                let raw = ESCAPES
                    .iter()
                    .find(|(_, escaped)| escaped.ends_with(code))
                    .map(|(raw, _)| *raw);
                match raw {
                    Some(raw) => out.push(raw),
                    None => {
                        out.push('\\');
                        out.push(code);
                    }
                }
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Construit une ligne de commande : `cmd k1=v1 k2=v2`
pub fn build_command(name: &str, params: &[(&str, &str)]) -> String {
    let mut line = name.to_string();
    for (key, value) in params {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&escape(value));
    }
    line
}

fn parse_record(chunk: &str) -> Record {
    chunk
        .split(' ')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), unescape(v)),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Découpe une ligne de données en enregistrements
pub fn parse_records(line: &str) -> Vec<Record> {
    line.split('|').map(parse_record).collect()
}

/// Sépare le nom d'une notification (`notifytextmessage ...`) de son contenu
pub fn split_notification(line: &str) -> Option<(&str, Record)> {
    if !line.starts_with("notify") {
        return None;
    }
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    Some((name, parse_record(rest)))
}

/// Décode une ligne `error id=.. msg=..` en (id, msg)
pub fn parse_error_line(line: &str) -> Option<(u32, String)> {
    let rest = line.strip_prefix("error ")?;
    let record = parse_record(rest);
    let id = record.get("id")?.parse().ok()?;
    let msg = record.get("msg").cloned().unwrap_or_default();
    Some((id, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip_special_chars() {
        let raw = "a b|c/d\\e\nf";
        let escaped = escape(raw);
        assert_eq!(escaped, "a\\sb\\pc\\/d\\\\e\\nf");
        assert_eq!(unescape(&escaped), raw);
    }

    #[test]
    fn test_unescape_chinese() {
        assert_eq!(unescape("我想听\\s爱情转移"), "我想听 爱情转移");
    }

    #[test]
    fn test_build_command() {
        assert_eq!(
            build_command("sendtextmessage", &[("targetmode", "3"), ("target", "1"), ("msg", "hi there")]),
            "sendtextmessage targetmode=3 target=1 msg=hi\\sthere"
        );
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records("clid=1 cid=5 client_nickname=a\\sb|clid=2 cid=6 client_nickname=c");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["client_nickname"], "a b");
        assert_eq!(records[1]["cid"], "6");
    }

    #[test]
    fn test_notification_and_error_lines() {
        let (name, record) = split_notification(
            "notifytextmessage targetmode=2 msg=下一首 invokerid=4 invokername=Alice invokeruid=xyz=",
        )
        .unwrap();
        assert_eq!(name, "notifytextmessage");
        assert_eq!(record["msg"], "下一首");
        assert_eq!(record["invokeruid"], "xyz=");

        assert_eq!(parse_error_line("error id=0 msg=ok"), Some((0, "ok".to_string())));
        assert_eq!(
            parse_error_line("error id=1281 msg=database\\sempty\\sresult\\sset"),
            Some((1281, "database empty result set".to_string()))
        );
        assert_eq!(parse_error_line("clid=1"), None);
    }
}
