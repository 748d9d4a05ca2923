//! Мелкие помощники форматирования байтов для dump/CLI/логов.

/// Одна строка hex: байты разделены пробелом ("de ad be ef").
pub fn hex_line(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Компактный hex без разделителей ("deadbeef").
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

pub fn display_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => format!("(binary {} B)", bytes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(hex_line(&[0xde, 0xad, 0xbe, 0xef]), "de ad be ef");
        assert_eq!(hex_line(&[]), "");
        assert_eq!(to_hex(&[0x00, 0x01, 0xff]), "0001ff");
    }

    #[test]
    fn text_or_binary() {
        assert_eq!(display_text(b"hello"), "hello");
        assert_eq!(display_text(&[0xff, 0xfe]), "(binary 2 B)");
    }
}
