//! Modified UTF-8: UTF-16 code units written as one to three bytes, with
//! NUL as two bytes and supplementary chars as encoded surrogate pairs.

pub(crate) fn encode(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007f => bytes.push(unit as u8),
            0x0000 | 0x0080..=0x07ff => {
                bytes.push(0xc0 | (unit >> 6) as u8);
                bytes.push(0x80 | (unit & 0x3f) as u8);
            }
            _ => {
                bytes.push(0xe0 | (unit >> 12) as u8);
                bytes.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                bytes.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }
    bytes
}

/// `None` on malformed sequences and unpaired surrogates.
pub(crate) fn decode(bytes: &[u8]) -> Option<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied();
    while let Some(first) = iter.next() {
        let unit = match first {
            0x00..=0x7f => u16::from(first),
            0xc0..=0xdf => {
                let second = continuation(iter.next())?;
                (u16::from(first & 0x1f) << 6) | second
            }
            0xe0..=0xef => {
                let second = continuation(iter.next())?;
                let third = continuation(iter.next())?;
                (u16::from(first & 0x0f) << 12) | (second << 6) | third
            }
            _ => return None,
        };
        units.push(unit);
    }
    String::from_utf16(&units).ok()
}

fn continuation(byte: Option<u8>) -> Option<u16> {
    byte.filter(|byte| byte & 0xc0 == 0x80)
        .map(|byte| u16::from(byte & 0x3f))
}
