//! Pure functions over the fixed header fields of a captured frame.
//!
//! Packets arrive as hex text, so all offsets here are hex-character offsets
//! into an untagged Ethernet + IPv4 frame. Nothing in this module validates
//! EtherType or IP version; short or garbled input degrades to zero or
//! partial values instead of failing.
use super::containers::Session;
use thiserror::Error;

/// IP protocol codes as they appear in the header, two hex characters.
pub const PROTOCOL_TCP: &str = "06";
pub const PROTOCOL_UDP: &str = "11";
pub const PROTOCOL_ICMP: &str = "01";

/// Hex offset of the IP total-length field (frame bytes 16..18).
const SIZE_OFFSET: usize = 32;
/// Hex offset of the IP protocol field (frame byte 23).
const PROTOCOL_OFFSET: usize = 46;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The string is not a well-formed four-octet dotted quad.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Extracts the source and destination MAC addresses from a frame.
///
/// Ethernet layout puts the destination in bytes 0..6 and the source in
/// bytes 6..12, so the first 24 hex characters cover both. Output octets are
/// lowercase and colon-joined. A short header truncates to a partial MAC and
/// non-hex input yields empty strings; callers get no error either way.
pub fn extract_macs(packet: &str) -> (String, String) {
    let header = packet.get(..24).unwrap_or(packet);
    let raw = hex::decode(header).unwrap_or_default();

    let destination = &raw[..raw.len().min(6)];
    let source = &raw[raw.len().min(6)..raw.len().min(12)];

    (format_mac(source), format_mac(destination))
}

fn format_mac(octets: &[u8]) -> String {
    octets
        .iter()
        .map(|octet| format!("{octet:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Checks whether a dotted-quad address falls in an RFC1918 private range:
/// 10.0.0.0/8, 172.16.0.0/12 or 192.168.0.0/16.
///
/// Anything that does not split into exactly four u8 octets is rejected as
/// [FieldError::InvalidAddress]; the aggregator treats that as "not private".
pub fn is_private(address: &str) -> Result<bool, FieldError> {
    let octets = address
        .split('.')
        .map(|octet| octet.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| FieldError::InvalidAddress(address.to_owned()))?;

    if octets.len() != 4 {
        return Err(FieldError::InvalidAddress(address.to_owned()));
    }

    let private = match (octets[0], octets[1]) {
        (10, _) => true,
        (172, second) => (16..=31).contains(&second),
        (192, second) => second == 168,
        _ => false,
    };

    Ok(private)
}

/// Reads the IP total-length field of a frame, in bytes.
///
/// Returns 0 when the field is missing or not parseable as hex, so truncated
/// captures simply contribute nothing to size sums.
pub fn packet_size(packet: &str) -> u32 {
    packet
        .get(SIZE_OFFSET..SIZE_OFFSET + 4)
        .and_then(|field| u32::from_str_radix(field, 16).ok())
        .unwrap_or(0)
}

/// Total size of a session in bytes, summed over every packet.
pub fn extract_session_size(session: &Session) -> u64 {
    session
        .iter()
        .map(|record| u64::from(packet_size(record.data())))
        .sum()
}

/// Protocol code of a session, taken from its first packet.
///
/// An empty session or short packet yields an empty string, which matches no
/// known protocol.
pub fn extract_protocol(session: &Session) -> &str {
    session
        .first()
        .and_then(|record| record.data().get(PROTOCOL_OFFSET..PROTOCOL_OFFSET + 2))
        .unwrap_or("")
}

/// Checks whether two addresses belong to different networks.
///
/// Deliberately a character-prefix comparison of the first three characters,
/// not octet parsing. Downstream thresholds were calibrated against this
/// heuristic, so keep it as-is.
pub fn is_external(address_1: &str, address_2: &str) -> bool {
    let prefix_1 = &address_1.as_bytes()[..address_1.len().min(3)];
    let prefix_2 = &address_2.as_bytes()[..address_2.len().min(3)];

    prefix_1 != prefix_2
}

/// Checks whether a session carries the given protocol code.
pub fn is_protocol(session: &Session, protocol: &str) -> bool {
    extract_protocol(session) == protocol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::featurizer::containers::PacketRecord;

    /// Builds a minimal hex frame: Ethernet header, then an IPv4 header with
    /// the total-length and protocol fields at their real offsets.
    fn build_packet(source_mac: &str, destination_mac: &str, size: u16, protocol: &str) -> String {
        let dst = destination_mac.replace(':', "");
        let src = source_mac.replace(':', "");
        format!("{dst}{src}08004500{size:04x}abcd400040{protocol}")
    }

    #[test]
    fn test_extract_macs_roundtrip() {
        let packet = build_packet("aa:bb:cc:dd:ee:ff", "11:22:33:44:55:66", 60, "06");
        let (source, destination) = extract_macs(&packet);

        assert_eq!(source, "aa:bb:cc:dd:ee:ff");
        assert_eq!(destination, "11:22:33:44:55:66");
    }

    #[test]
    fn test_extract_macs_uppercase_input() {
        let packet = build_packet("AA:BB:CC:DD:EE:FF", "11:22:33:44:55:66", 60, "06");
        let (source, _) = extract_macs(&packet);

        assert_eq!(source, "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_extract_macs_short_input() {
        // 20 hex chars: full destination, four source octets
        let (source, destination) = extract_macs("11223344556677889900");

        assert_eq!(destination, "11:22:33:44:55:66");
        assert_eq!(source, "77:88:99:00");
    }

    #[test]
    fn test_extract_macs_garbage_input() {
        let (source, destination) = extract_macs("not hex at all, sorry!!!");

        assert_eq!(source, "");
        assert_eq!(destination, "");
    }

    #[test]
    fn test_is_private_rfc1918() {
        assert!(is_private("10.0.0.1").unwrap());
        assert!(is_private("10.255.255.255").unwrap());
        assert!(is_private("192.168.1.5").unwrap());
        assert!(is_private("172.16.0.1").unwrap());
        assert!(is_private("172.31.200.9").unwrap());

        assert!(!is_private("8.8.8.8").unwrap());
        assert!(!is_private("172.15.0.1").unwrap());
        assert!(!is_private("172.32.0.1").unwrap());
        assert!(!is_private("192.167.0.1").unwrap());
        assert!(!is_private("11.0.0.1").unwrap());
    }

    #[test]
    fn test_is_private_invalid_addresses() {
        assert_eq!(is_private("10"), Err(FieldError::InvalidAddress("10".into())));
        assert!(is_private("").is_err());
        assert!(is_private("10.0.0").is_err());
        assert!(is_private("10.0.0.0.0").is_err());
        assert!(is_private("256.168.0.1").is_err());
        assert!(is_private("abc.def.ghi.jkl").is_err());
    }

    #[test]
    fn test_packet_size() {
        let packet = build_packet("aa:bb:cc:dd:ee:ff", "11:22:33:44:55:66", 1500, "06");
        assert_eq!(packet_size(&packet), 1500);
    }

    #[test]
    fn test_packet_size_fallback() {
        // Too short to contain the field
        assert_eq!(packet_size("abcdef"), 0);
        // Field present but not hex
        assert_eq!(packet_size("001122334455aabbccddeeff08004500zzzz"), 0);
        assert_eq!(packet_size(""), 0);
    }

    #[test]
    fn test_extract_session_size() {
        let session = vec![
            PacketRecord(0.0, build_packet("aa:bb:cc:dd:ee:ff", "11:22:33:44:55:66", 100, "06")),
            PacketRecord(0.1, build_packet("aa:bb:cc:dd:ee:ff", "11:22:33:44:55:66", 250, "06")),
            PacketRecord(0.2, "short".to_string()),
        ];

        assert_eq!(extract_session_size(&session), 350);
    }

    #[test]
    fn test_extract_protocol() {
        let tcp = vec![PacketRecord(0.0, build_packet("aa:bb:cc:dd:ee:ff", "11:22:33:44:55:66", 60, "06"))];
        let udp = vec![PacketRecord(0.0, build_packet("aa:bb:cc:dd:ee:ff", "11:22:33:44:55:66", 60, "11"))];
        let empty: Session = Vec::new();

        assert_eq!(extract_protocol(&tcp), PROTOCOL_TCP);
        assert_eq!(extract_protocol(&udp), PROTOCOL_UDP);
        assert_eq!(extract_protocol(&empty), "");

        assert!(is_protocol(&tcp, PROTOCOL_TCP));
        assert!(!is_protocol(&tcp, PROTOCOL_UDP));
    }

    #[test]
    fn test_is_external() {
        assert!(!is_external("192.168.1.5", "192.168.1.10"));
        assert!(is_external("192.168.1.5", "10.0.0.1"));
        // Prefix heuristic compares characters, not parsed octets
        assert!(!is_external("10.0.0.1", "10.9.0.1"));
        assert!(is_external("10.0.0.1", "100.0.0.1"));
    }
}
