// Titan IME Key Type
// Represents a single physical key code from Linux input-event-codes.h

use std::fmt;
use std::str::FromStr;

include!(concat!(env!("OUT_DIR"), "/key_codes.rs"));

impl Key {
    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self.0
    }

    /// Get the name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }

    /// Returns true for the 26 alphabetic keys
    pub fn is_letter(self) -> bool {
        matches!(self.0, 16..=25 | 30..=38 | 44..=50)
    }

    /// Character produced by this key on a US layout.
    ///
    /// Letters follow `shift` for case; digits and punctuation give their
    /// shifted symbol when `shift` is set. Space, Enter and Tab are not
    /// covered here since the processor handles them explicitly.
    pub fn to_char(self, shift: bool) -> Option<char> {
        let (plain, shifted) = match self.0 {
            2 => ('1', '!'),
            3 => ('2', '@'),
            4 => ('3', '#'),
            5 => ('4', '$'),
            6 => ('5', '%'),
            7 => ('6', '^'),
            8 => ('7', '&'),
            9 => ('8', '*'),
            10 => ('9', '('),
            11 => ('0', ')'),
            12 => ('-', '_'),
            13 => ('=', '+'),
            26 => ('[', '{'),
            27 => (']', '}'),
            39 => (';', ':'),
            40 => ('\'', '"'),
            41 => ('`', '~'),
            43 => ('\\', '|'),
            51 => (',', '<'),
            52 => ('.', '>'),
            53 => ('/', '?'),
            _ => {
                let letter = letter_for_code(self.0)?;
                return Some(if shift {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                });
            }
        };
        Some(if shift { shifted } else { plain })
    }
}

fn letter_for_code(code: u16) -> Option<char> {
    const TOP: &[u8] = b"qwertyuiop";
    const HOME: &[u8] = b"asdfghjkl";
    const BOTTOM: &[u8] = b"zxcvbnm";
    let ch = match code {
        16..=25 => TOP[(code - 16) as usize],
        30..=38 => HOME[(code - 30) as usize],
        44..=50 => BOTTOM[(code - 44) as usize],
        _ => return None,
    };
    Some(ch as char)
}
