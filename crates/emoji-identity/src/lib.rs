//! # Emoji Identity
//!
//! Turns reaction symbols into comparison keys so that visually identical emoji
//! delivered with different byte sequences rank as the same symbol.
//!
//! ## Keys
//!
//! - **Identity** ([`identity`]): variation selectors (U+FE0E text, U+FE0F emoji
//!   presentation) and zero-width joiners (U+200D) removed, then NFC, then trimmed.
//! - **Base identity** ([`base_identity`]): the leading one or two code points of the
//!   identity. Coarse fallback for symbols carrying modifier sequences that the
//!   identity does not collapse.
//!
//! ## Matching
//!
//! [`EmojiTargets`] holds a caller's target set pre-expanded into both tiers. The tiers
//! are kept in separate sets: a candidate's raw form or identity is looked up among
//! raw forms and identities, its base only among bases.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Text presentation selector (VS15).
pub const TEXT_PRESENTATION_SELECTOR: char = '\u{FE0E}';

/// Emoji presentation selector (VS16).
pub const EMOJI_PRESENTATION_SELECTOR: char = '\u{FE0F}';

/// Zero-width joiner used in emoji sequences.
pub const ZERO_WIDTH_JOINER: char = '\u{200D}';

fn is_collapsible(c: char) -> bool {
    matches!(
        c,
        TEXT_PRESENTATION_SELECTOR | EMOJI_PRESENTATION_SELECTOR | ZERO_WIDTH_JOINER
    )
}

/// Canonical identity of a reaction symbol.
///
/// Stable across platform encodings that differ only by presentation selector,
/// joiner or canonical decomposition. Empty input yields an empty identity.
pub fn identity(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !is_collapsible(*c)).collect();
    stripped.nfc().collect::<String>().trim().to_string()
}

/// Coarse identity: the first code point when the identity is a single code point,
/// otherwise the first two.
pub fn base_identity(raw: &str) -> String {
    let id = identity(raw);
    let mut chars = id.chars();
    match (chars.next(), chars.next()) {
        (None, _) => String::new(),
        (Some(first), None) => first.to_string(),
        (Some(first), Some(second)) => [first, second].iter().collect(),
    }
}

/// A user-selected emoji set, expanded into raw/identity forms and base identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiTargets {
    forms: HashSet<String>,
    bases: HashSet<String>,
}

impl EmojiTargets {
    /// Expands `symbols` into both matching tiers. Empty symbols are ignored.
    pub fn expand<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut targets = Self::default();
        for symbol in symbols {
            let raw = symbol.as_ref();
            insert_non_empty(&mut targets.forms, raw.to_string());
            insert_non_empty(&mut targets.forms, identity(raw));
            insert_non_empty(&mut targets.bases, base_identity(raw));
        }
        targets
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty() && self.bases.is_empty()
    }

    /// Raw forms and identities of the targets.
    pub fn forms(&self) -> &HashSet<String> {
        &self.forms
    }

    /// Base identities of the targets.
    pub fn bases(&self) -> &HashSet<String> {
        &self.bases
    }

    /// True if `raw` or its identity is one of the target forms.
    pub fn matches_exact(&self, raw: &str) -> bool {
        self.forms.contains(raw) || self.forms.contains(&identity(raw))
    }

    /// True if the base identity of `raw` is one of the target bases.
    pub fn matches_base(&self, raw: &str) -> bool {
        let base = base_identity(raw);
        !base.is_empty() && self.bases.contains(&base)
    }

    /// Exact tier first, then base tier.
    pub fn matches(&self, raw: &str) -> bool {
        self.matches_exact(raw) || self.matches_base(raw)
    }
}

fn insert_non_empty(set: &mut HashSet<String>, value: String) {
    if !value.is_empty() {
        set.insert(value);
    }
}
