/// Checks that a string is a syntactically valid IPv4 dotted quad: exactly
/// four dot-separated segments, each an integer in [0, 255].
///
/// No DNS resolution, no IPv6, no reachability check. This only gates join
/// launches; rejection must happen before any side effect.
pub fn is_valid_ipv4(address: &str) -> bool {
    let segments: Vec<&str> = address.split('.').collect();
    if segments.len() != 4 {
        return false;
    }
    segments.iter().all(|s| s.parse::<u8>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        for addr in ["127.0.0.1", "0.0.0.0", "255.255.255.255", "26.105.90.12", "1.2.3.4"] {
            assert!(is_valid_ipv4(addr), "expected accept: {}", addr);
        }
    }

    #[test]
    fn rejects_wrong_segment_count() {
        for addr in ["1.2.3", "1.2.3.4.5", "1", "", "..."] {
            assert!(!is_valid_ipv4(addr), "expected reject: {}", addr);
        }
    }

    #[test]
    fn rejects_out_of_range_segments() {
        for addr in ["1.2.3.256", "999.1.1.1", "256.256.256.256", "1.2.3.-1"] {
            assert!(!is_valid_ipv4(addr), "expected reject: {}", addr);
        }
    }

    #[test]
    fn rejects_non_numeric_segments() {
        for addr in ["a.b.c.d", "1.2.3.x", "1..2.3", "localhost"] {
            assert!(!is_valid_ipv4(addr), "expected reject: {}", addr);
        }
    }
}
