use std::time::Duration;
use byte_unit::{Byte, UnitType};
use pretty_duration::pretty_duration;

/// Duration 的格式化输出
pub fn to_duration_pretty(duration: &Duration) -> String {
    pretty_duration(duration, None)
}

/// 字节大小 的格式化输出
pub fn to_bytes_len_pretty(len: usize) -> String {
    let byte = Byte::from_u128(len as u128).unwrap();
    let adjusted_byte = byte.get_appropriate_unit(UnitType::Decimal);

    format!("{adjusted_byte:.2}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_duration() {
        let s = to_duration_pretty(&Duration::from_secs(65));
        assert!(!s.is_empty());
    }

    #[test]
    fn formats_bytes() {
        let s = to_bytes_len_pretty(2048);
        assert!(!s.is_empty());
    }
}