use std::char;
use std::fmt;


/// A string as the host value system stores it.
///
/// The host keeps strings either as one byte per code unit (Latin-1) or as
/// UTF-16 code units. The wire format preserves whichever representation the
/// source string used, so the two variants are distinct values here even when
/// they spell the same text.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum HostString {
    OneByte(Vec<u8>),
    TwoByte(Vec<u16>),
}

impl HostString {
    /// Picks the narrowest representation that holds every char of `s`.
    pub fn new(s: &str) -> Self {
        if s.chars().all(|c| (c as u32) <= 0xFF) {
            Self::OneByte(s.chars().map(|c| c as u8).collect())
        } else {
            Self::TwoByte(s.encode_utf16().collect())
        }
    }

    pub fn is_one_byte(&self) -> bool {
        matches!(self, Self::OneByte(_))
    }

    /// Length in code units.
    pub fn len(&self) -> usize {
        match self {
            Self::OneByte(units) => units.len(),
            Self::TwoByte(units) => units.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn code_units(&self) -> impl '_ + Iterator<Item = u16> {
        let (one, two) = match self {
            Self::OneByte(units) => (Some(units.iter().map(|u| *u as u16)), None),
            Self::TwoByte(units) => (None, Some(units.iter().copied())),
        };
        one.into_iter().flatten().chain(two.into_iter().flatten())
    }

    /// Lone surrogates become U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        match self {
            Self::OneByte(units) => units.iter().map(|u| *u as char).collect(),
            Self::TwoByte(units) => char::decode_utf16(units.iter().copied())
                .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect(),
        }
    }

    /// Parses the string as a canonical array index (`"0"`, `"17"`, never `"007"`).
    pub fn as_array_index(&self) -> Option<u32> {
        let s = self.to_string_lossy();
        if s.is_empty() || (s.len() > 1 && s.starts_with('0')) {
            return None;
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // 2^32 - 1 is the maximum array length, so it is not a valid index.
        s.parse::<u32>().ok().filter(|i| *i != u32::MAX)
    }
}

impl From<&str> for HostString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for HostString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl fmt::Debug for HostString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_one_byte() { "" } else { "u16" };
        write!(f, "{}{:?}", marker, self.to_string_lossy())
    }
}
