#![forbid(unsafe_code)]

//! Text attribute flags and composite style keys.

use bitflags::bitflags;

use crate::class::ColorClass;

/// Prefix for generated style names.
pub const STYLE_NAME_PREFIX: &str = "Difflens";

bitflags! {
    /// Text attributes toggled by SGR 1–4.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StyleFlags: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

impl StyleFlags {
    /// Flag for an SGR attribute code (1–4), if it is one.
    #[must_use]
    pub const fn from_sgr(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::BOLD),
            2 => Some(Self::DIM),
            3 => Some(Self::ITALIC),
            4 => Some(Self::UNDERLINE),
            _ => None,
        }
    }
}

/// Composite style identity: base color class plus attribute flags.
///
/// Equal combinations always produce equal keys, so the key can be used
/// to memoize the concrete style a renderer builds for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleKey {
    /// Active color class, if any color code has been seen since the last reset.
    pub class: Option<ColorClass>,
    /// Active attribute flags.
    pub flags: StyleFlags,
}

impl StyleKey {
    /// The key with no color and no attributes.
    pub const PLAIN: Self = Self {
        class: None,
        flags: StyleFlags::empty(),
    };

    /// Create a key from a class and flags.
    #[must_use]
    pub const fn new(class: Option<ColorClass>, flags: StyleFlags) -> Self {
        Self { class, flags }
    }

    /// Key for a bare color class.
    #[must_use]
    pub const fn class(class: ColorClass) -> Self {
        Self::new(Some(class), StyleFlags::empty())
    }

    /// Whether this key describes any styling at all.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.class.is_some() || !self.flags.is_empty()
    }

    #[must_use]
    pub const fn bold(&self) -> bool {
        self.flags.contains(StyleFlags::BOLD)
    }

    #[must_use]
    pub const fn italic(&self) -> bool {
        self.flags.contains(StyleFlags::ITALIC)
    }

    #[must_use]
    pub const fn dim(&self) -> bool {
        self.flags.contains(StyleFlags::DIM)
    }

    #[must_use]
    pub const fn underline(&self) -> bool {
        self.flags.contains(StyleFlags::UNDERLINE)
    }

    /// Deterministic style name, e.g. `DifflensAddBoldItalic`.
    ///
    /// Suffix order is fixed: bold, italic, dim, underline.
    #[must_use]
    pub fn name(&self) -> String {
        let mut name = String::from(STYLE_NAME_PREFIX);
        name.push_str(self.class.map_or("Plain", ColorClass::name));
        if self.bold() {
            name.push_str("Bold");
        }
        if self.italic() {
            name.push_str("Italic");
        }
        if self.dim() {
            name.push_str("Dim");
        }
        if self.underline() {
            name.push_str("Underline");
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_is_inactive() {
        assert!(!StyleKey::PLAIN.is_active());
        assert!(StyleKey::class(ColorClass::Dim).is_active());
        assert!(StyleKey::new(None, StyleFlags::BOLD).is_active());
    }

    #[test]
    fn names_are_deterministic() {
        let key = StyleKey::new(
            Some(ColorClass::Add),
            StyleFlags::ITALIC | StyleFlags::BOLD,
        );
        assert_eq!(key.name(), "DifflensAddBoldItalic");
        assert_eq!(key.name(), key.name());
        assert_eq!(
            StyleKey::new(None, StyleFlags::UNDERLINE | StyleFlags::DIM).name(),
            "DifflensPlainDimUnderline"
        );
    }

    #[test]
    fn flag_codes() {
        assert_eq!(StyleFlags::from_sgr(1), Some(StyleFlags::BOLD));
        assert_eq!(StyleFlags::from_sgr(2), Some(StyleFlags::DIM));
        assert_eq!(StyleFlags::from_sgr(3), Some(StyleFlags::ITALIC));
        assert_eq!(StyleFlags::from_sgr(4), Some(StyleFlags::UNDERLINE));
        assert_eq!(StyleFlags::from_sgr(5), None);
    }
}
