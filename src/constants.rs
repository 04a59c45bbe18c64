/// Search depth sentinel meaning "no limit" for the tree lookups.
pub const SEARCH_DEPTH_UNBOUNDED: usize = usize::MAX;

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Size of each growth region created for post-parse mutation.
pub const GROWTH_REGION_SIZE: usize = 1024;

#[inline]
pub fn is_ini_key_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[inline]
pub fn is_ini_value_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.')
}

#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n' | b'\r' | b'\t')
}

#[inline]
pub fn is_tag_name_end(byte: u8) -> bool {
    is_whitespace(byte) || matches!(byte, b'>' | b'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_ini_key_bytes() {
        assert!(is_ini_key_byte(b'a'));
        assert!(is_ini_key_byte(b'Z'));
        assert!(is_ini_key_byte(b'7'));
        assert!(is_ini_key_byte(b'_'));
        assert!(!is_ini_key_byte(b'-'));
        assert!(!is_ini_key_byte(b'.'));
        assert!(!is_ini_key_byte(b' '));
    }

    #[rstest::rstest]
    fn test_ini_value_bytes() {
        assert!(is_ini_value_byte(b'-'));
        assert!(is_ini_value_byte(b'.'));
        assert!(is_ini_value_byte(b'_'));
        assert!(!is_ini_value_byte(b' '));
        assert!(!is_ini_value_byte(b'"'));
        assert!(!is_ini_value_byte(b'\n'));
    }

    #[rstest::rstest]
    fn test_tag_name_end() {
        assert!(is_tag_name_end(b'>'));
        assert!(is_tag_name_end(b'/'));
        assert!(is_tag_name_end(b'\t'));
        assert!(!is_tag_name_end(b'a'));
        assert!(!is_tag_name_end(b'='));
    }
}
