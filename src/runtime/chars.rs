//! UTF-8 character stepping over byte offsets
//!
//! Generated parsers address the input by byte offset and need to consume
//! whole characters. The width of a character is derived from its leading
//! byte with three cumulative mask tests: each of `0xC0`, `0xE0` and `0xF0`
//! that the byte fully contains adds one continuation byte. A four-byte
//! leader satisfies all three. ASCII (and any stray continuation byte)
//! satisfies none and is one byte wide.
//!
//! Widths are clamped to the end of the buffer, and offsets at or past the
//! end yield the empty string without advancing.

/// Width in bytes of the character whose leading byte is at `offset`
///
/// Returns 0 when `offset` is out of range.
#[inline(always)]
pub fn char_len_at(bytes: &[u8], offset: usize) -> usize {
    let Some(&byte1) = bytes.get(offset) else {
        return 0;
    };
    let mut len = 1;
    if byte1 & 0xC0 == 0xC0 {
        len += 1;
    }
    if byte1 & 0xE0 == 0xE0 {
        len += 1;
    }
    if byte1 & 0xF0 == 0xF0 {
        len += 1;
    }
    len.min(bytes.len() - offset)
}

/// Slice of `s` for `offset..offset + width`, or `""` if that is not a
/// character boundary
#[inline]
fn slice_at(s: &str, offset: usize, width: usize) -> &str {
    s.get(offset..offset + width).unwrap_or("")
}

/// The character starting at `offset`, as a string slice
#[inline]
pub fn char_at(s: &str, offset: usize) -> &str {
    let width = char_len_at(s.as_bytes(), offset);
    slice_at(s, offset, width)
}

/// Up to `count` characters starting at `offset`
///
/// Stops early at the end of input.
pub fn chars_at(s: &str, offset: usize, count: usize) -> &str {
    let bytes = s.as_bytes();
    let mut end = offset;
    for _ in 0..count {
        let width = char_len_at(bytes, end);
        if width == 0 {
            break;
        }
        end += width;
    }
    s.get(offset..end).unwrap_or("")
}

/// Return the character at `*offset` and move `*offset` past it
#[inline]
pub fn consume_char<'s>(s: &'s str, offset: &mut usize) -> &'s str {
    let width = char_len_at(s.as_bytes(), *offset);
    let ch = slice_at(s, *offset, width);
    *offset += width;
    ch
}

/// Move `*offset` past the character at `*offset`
#[inline]
pub fn advance_char(s: &str, offset: &mut usize) {
    *offset += char_len_at(s.as_bytes(), *offset);
}
