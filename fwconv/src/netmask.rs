//! Dotted-quad mask ↔ prefix length lookups.
//!
//! The table covers the 33 contiguous IPv4 masks. Nothing here validates
//! addresses; unknown masks fall back to [`DEFAULT_PREFIX`].

/// Prefix returned for any mask missing from [`MASKS`].
pub const DEFAULT_PREFIX: u8 = 24;

/// Contiguous masks indexed by prefix length.
pub const MASKS: [&str; 33] = [
    "0.0.0.0",
    "128.0.0.0",
    "192.0.0.0",
    "224.0.0.0",
    "240.0.0.0",
    "248.0.0.0",
    "252.0.0.0",
    "254.0.0.0",
    "255.0.0.0",
    "255.128.0.0",
    "255.192.0.0",
    "255.224.0.0",
    "255.240.0.0",
    "255.248.0.0",
    "255.252.0.0",
    "255.254.0.0",
    "255.255.0.0",
    "255.255.128.0",
    "255.255.192.0",
    "255.255.224.0",
    "255.255.240.0",
    "255.255.248.0",
    "255.255.252.0",
    "255.255.254.0",
    "255.255.255.0",
    "255.255.255.128",
    "255.255.255.192",
    "255.255.255.224",
    "255.255.255.240",
    "255.255.255.248",
    "255.255.255.252",
    "255.255.255.254",
    "255.255.255.255",
];

/// Prefix length for a dotted-quad mask; unknown masks yield `24`.
pub fn mask_to_prefix(mask: &str) -> u8 {
    lookup_prefix(mask).unwrap_or(DEFAULT_PREFIX)
}

/// Prefix length for a dotted-quad mask, `None` when not in the table.
pub fn lookup_prefix(mask: &str) -> Option<u8> {
    let mask = mask.trim();
    MASKS
        .iter()
        .position(|m| *m == mask)
        .and_then(|idx| u8::try_from(idx).ok())
}

/// Dotted-quad mask for a prefix length (0..=32).
pub fn prefix_to_mask(prefix: u8) -> Option<&'static str> {
    MASKS.get(usize::from(prefix)).copied()
}

/// `10.0.0.0` + `255.255.255.0` → `10.0.0.0/24`.
pub fn to_cidr(address: &str, mask: &str) -> String {
    format!("{}/{}", address.trim(), mask_to_prefix(mask))
}

/// Split `a.b.c.d/n` into address and dotted mask. A prefix outside 0..=32 or a
/// non-numeric one uses the default prefix.
pub fn split_cidr(cidr: &str) -> Option<(String, String)> {
    let (address, prefix) = cidr.trim().split_once('/')?;
    if address.is_empty() {
        return None;
    }
    let mask = prefix
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(prefix_to_mask)
        .or_else(|| prefix_to_mask(DEFAULT_PREFIX))?;
    Some((address.to_string(), mask.to_string()))
}

/// Accepts either `a.b.c.d/n` or `a.b.c.d m.m.m.m` (also `a.b.c.d/m.m.m.m`).
pub fn split_address_mask(value: &str) -> Option<(String, String)> {
    let value = value.trim();
    let mut parts = value.split_whitespace();
    let first = parts.next()?;
    if let Some(mask) = parts.next() {
        return Some((first.to_string(), mask.to_string()));
    }
    let (address, tail) = first.split_once('/')?;
    if tail.contains('.') {
        return Some((address.to_string(), tail.to_string()));
    }
    split_cidr(first)
}

#[cfg(test)]
mod tests {
    use super::{
        lookup_prefix, mask_to_prefix, prefix_to_mask, split_address_mask, split_cidr, to_cidr,
        MASKS,
    };

    #[test]
    fn every_table_mask_maps_to_its_index() {
        for (idx, mask) in MASKS.iter().enumerate() {
            assert_eq!(usize::from(mask_to_prefix(mask)), idx);
        }
    }

    #[test]
    fn class_c_mask_is_24_every_time() {
        assert_eq!(mask_to_prefix("255.255.255.0"), 24);
        assert_eq!(mask_to_prefix("255.255.255.0"), 24);
    }

    #[test]
    fn unknown_mask_defaults_to_24() {
        assert_eq!(mask_to_prefix("255.0.255.0"), 24);
        assert_eq!(mask_to_prefix("garbage"), 24);
        assert_eq!(mask_to_prefix(""), 24);
        assert_eq!(lookup_prefix("255.0.255.0"), None);
    }

    #[test]
    fn prefix_round_trips_and_rejects_out_of_range() {
        assert_eq!(prefix_to_mask(16), Some("255.255.0.0"));
        assert_eq!(prefix_to_mask(33), None);
    }

    #[test]
    fn cidr_helpers() {
        assert_eq!(to_cidr("10.0.0.0", "255.255.255.0"), "10.0.0.0/24");
        assert_eq!(
            split_cidr("10.1.0.0/16"),
            Some(("10.1.0.0".to_string(), "255.255.0.0".to_string()))
        );
        assert_eq!(
            split_cidr("10.1.0.0/99"),
            Some(("10.1.0.0".to_string(), "255.255.255.0".to_string()))
        );
        assert_eq!(split_cidr("10.1.0.0"), None);
        assert_eq!(
            split_address_mask("10.0.0.1 255.255.255.252"),
            Some(("10.0.0.1".to_string(), "255.255.255.252".to_string()))
        );
        assert_eq!(
            split_address_mask("10.0.0.1/255.255.255.0"),
            Some(("10.0.0.1".to_string(), "255.255.255.0".to_string()))
        );
    }
}
