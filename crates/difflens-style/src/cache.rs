#![forbid(unsafe_code)]

//! Memoized concrete styles keyed by composite style identity.
//!
//! The parser produces a [`StyleKey`] per span. Turning a key into
//! something a surface can draw (a named style with colors and attributes)
//! is done once per distinct key and cached here. The cache is owned by a
//! session; a theme change replaces the theme and clears every entry.
//!
//! # Example
//! ```
//! use difflens_style::{ColorClass, FormatCache, ResolvedTheme, StyleFlags, StyleKey};
//!
//! let mut cache = FormatCache::new(ResolvedTheme::default());
//! let key = StyleKey::new(Some(ColorClass::Add), StyleFlags::BOLD);
//!
//! assert_eq!(cache.get_or_build(key).name, "DifflensAddBold");
//! cache.get_or_build(key);
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//! ```

use rustc_hash::FxHashMap;

use crate::attrs::{StyleFlags, StyleKey};
use crate::color::Rgb;
use crate::theme::ResolvedTheme;

/// A drawable style generated for one [`StyleKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcreteStyle {
    /// Deterministic name, see [`StyleKey::name`].
    pub name: String,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub flags: StyleFlags,
}

impl ConcreteStyle {
    /// Build the style for `key` under `theme`.
    ///
    /// Attribute flags from the key are merged with any flags the theme
    /// attaches to the color class.
    #[must_use]
    pub fn build(key: StyleKey, theme: &ResolvedTheme) -> Self {
        let (fg, bg, base_flags) = match key.class {
            Some(class) => {
                let colors = theme.colors(class);
                (colors.fg, colors.bg, colors.flags)
            }
            None => (None, None, StyleFlags::empty()),
        };
        Self {
            name: key.name(),
            fg,
            bg,
            flags: base_flags | key.flags,
        }
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache of concrete styles for one theme.
///
/// The key space is small (seven classes times sixteen flag combinations
/// plus the plain key), so entries are never evicted.
///
/// `FormatCache` is not thread-safe; each buffer owns its own.
#[derive(Debug, Clone)]
pub struct FormatCache {
    theme: ResolvedTheme,
    entries: FxHashMap<StyleKey, ConcreteStyle>,
    hits: u64,
    misses: u64,
}

impl FormatCache {
    /// Create an empty cache for a theme.
    #[must_use]
    pub fn new(theme: ResolvedTheme) -> Self {
        Self {
            theme,
            entries: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// The theme entries are built from.
    #[must_use]
    pub fn theme(&self) -> &ResolvedTheme {
        &self.theme
    }

    /// Replace the theme and drop every cached entry.
    pub fn set_theme(&mut self, theme: ResolvedTheme) {
        self.theme = theme;
        self.clear();
    }

    /// Get the style for `key`, building it on first use.
    pub fn get_or_build(&mut self, key: StyleKey) -> &ConcreteStyle {
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        let theme = &self.theme;
        self.entries
            .entry(key)
            .or_insert_with(|| ConcreteStyle::build(key, theme))
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FormatCache {
    fn default() -> Self {
        Self::new(ResolvedTheme::default())
    }
}
