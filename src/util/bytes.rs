//! Byte-string helpers for term range scans.

/// Smallest byte string strictly greater than every string starting with `prefix`.
///
/// Trailing `0xFF` bytes are dropped and the last remaining byte is
/// incremented. Returns `None` when no such bound exists (empty or all-`0xFF`
/// prefix); callers treat that as an unbounded upper end.
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b != 0xFF)?;
    let mut end = prefix[..=last].to_vec();
    end[last] += 1;
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_successor() {
        assert_eq!(prefix_successor(b"water"), Some(b"wates".to_vec()));
        assert_eq!(prefix_successor(b"a"), Some(b"b".to_vec()));
        assert_eq!(prefix_successor(&[0x61, 0xFF]), Some(vec![0x62]));
        assert_eq!(prefix_successor(&[0x00, 0xFF, 0xFF]), Some(vec![0x01]));
    }

    #[test]
    fn test_prefix_successor_unbounded() {
        assert_eq!(prefix_successor(&[0xFF, 0xFF, 0xFF]), None);
        assert_eq!(prefix_successor(&[]), None);
    }

    #[test]
    fn test_successor_bounds_every_extension() {
        let prefix = b"be";
        let end = prefix_successor(prefix).unwrap();
        for term in [&b"be"[..], b"beet", b"be\xff\xff"] {
            assert!(term >= &prefix[..] && term < end.as_slice());
        }
        assert!(&b"bf"[..] >= end.as_slice());
    }
}
