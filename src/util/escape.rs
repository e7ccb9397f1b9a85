/*!
Provides convenience routines for escaping raw bytes.

The automaton debug output in this crate renders transitions over byte
ranges, so bytes that aren't printable ASCII need an escaped form.
*/

use core::{ascii, fmt, str};

/// A type that wraps a single byte with a convenient fmt::Debug impl that
/// escapes the byte.
#[derive(Clone, Copy)]
pub(crate) struct DebugByte(pub(crate) u8);

impl fmt::Debug for DebugByte {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Special case ASCII space. It's too hard to read otherwise, so
        // put quotes around it. I sometimes wonder whether just '\x20' would
        // be better...
        if self.0 == b' ' {
            return write!(f, "' '");
        }
        // 10 bytes is enough to cover any output from ascii::escape_default.
        let mut bytes = [0u8; 10];
        let mut len = 0;
        for (i, mut b) in ascii::escape_default(self.0).enumerate() {
            // capitalize \xab to \xAB
            if i >= 2 && b'a' <= b && b <= b'f' {
                b -= 32;
            }
            bytes[len] = b;
            len += 1;
        }
        match str::from_utf8(&bytes[..len]) {
            Ok(escaped) => write!(f, "{}", escaped),
            Err(_) => write!(f, "\\x{:02X}", self.0),
        }
    }
}
