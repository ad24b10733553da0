//! Text → IR parsers, one per dialect.
//!
//! Parsers never fail. Lines they do not recognize are skipped and missing
//! fields take the values in [`crate::model::defaults`].

pub mod asa;
mod cisco;
pub mod fortigate;
pub mod ftd;
pub mod paloalto;

/// Text following the first `count` whitespace-separated tokens of `line`.
pub(crate) fn rest_after(line: &str, count: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..count {
        match rest.find(char::is_whitespace) {
            Some(idx) => rest = rest[idx..].trim_start(),
            None => return "",
        }
    }
    rest.trim_end()
}

/// Strip one pair of surrounding double quotes.
pub(crate) fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Port number for a well-known Cisco port keyword; numbers pass through.
pub(crate) fn port_number(name: &str) -> String {
    let number = match name.to_ascii_lowercase().as_str() {
        "ftp-data" => "20",
        "ftp" => "21",
        "ssh" => "22",
        "telnet" => "23",
        "smtp" => "25",
        "domain" => "53",
        "www" | "http" => "80",
        "pop3" => "110",
        "ntp" => "123",
        "netbios-ssn" => "139",
        "imap4" => "143",
        "snmp" => "161",
        "ldap" => "389",
        "https" => "443",
        "syslog" => "514",
        "ldaps" => "636",
        "sqlnet" => "1521",
        _ => return name.to_string(),
    };
    number.to_string()
}

#[cfg(test)]
mod tests {
    use super::{port_number, rest_after, unquote};

    #[test]
    fn rest_after_skips_tokens_and_keeps_inner_spacing() {
        assert_eq!(
            rest_after("access-list ACL remark allow  web", 3),
            "allow  web"
        );
        assert_eq!(rest_after(" description uplink", 1), "uplink");
        assert_eq!(rest_after("hostname", 1), "");
    }

    #[test]
    fn unquote_and_ports() {
        assert_eq!(unquote("\"port1\""), "port1");
        assert_eq!(unquote("port1"), "port1");
        assert_eq!(port_number("https"), "443");
        assert_eq!(port_number("8443"), "8443");
    }
}
