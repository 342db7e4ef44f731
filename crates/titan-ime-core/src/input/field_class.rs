// Titan IME Input Layer - Field Classification
// Decides the base layer of a session from the class of the focused field

use std::fmt;

/// Class of the editable field the session is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldClass {
    /// General text editing
    #[default]
    Text,
    Number,
    DateTime,
    Phone,
    /// Any class the host could not identify
    Other,
}

impl FieldClass {
    /// Mask selecting the class bits of a host input type
    pub const CLASS_MASK: u32 = 0x0000_000f;

    /// Classify a host input-type value by its class bits
    /// (1 = text, 2 = number, 3 = phone, 4 = date/time).
    pub fn from_input_type(input_type: u32) -> Self {
        match input_type & Self::CLASS_MASK {
            1 => FieldClass::Text,
            2 => FieldClass::Number,
            3 => FieldClass::Phone,
            4 => FieldClass::DateTime,
            _ => FieldClass::Other,
        }
    }

    /// Convert string to FieldClass
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(FieldClass::Text),
            "number" | "numeric" => Some(FieldClass::Number),
            "datetime" | "date" | "time" => Some(FieldClass::DateTime),
            "phone" => Some(FieldClass::Phone),
            "other" => Some(FieldClass::Other),
            _ => None,
        }
    }

    /// Convert FieldClass to string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldClass::Text => "text",
            FieldClass::Number => "number",
            FieldClass::DateTime => "datetime",
            FieldClass::Phone => "phone",
            FieldClass::Other => "other",
        }
    }

    /// Number, date/time and phone fields start on the numeric layer
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldClass::Number | FieldClass::DateTime | FieldClass::Phone
        )
    }
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
