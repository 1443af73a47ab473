//! Color taxonomy for event-storming shapes.
//!
//! Event-storming diagrams encode the semantic category of a shape in its
//! fill color. This module defines the two fixed color sets the importer
//! recognizes:
//!
//! - [`AllowedColor`], the current convention: eight fill colors plus the
//!   unfilled sentinel.
//! - The legacy set, eight colors from the previous convention revision,
//!   each mapped 1:1 onto an allowed color and migrated before validation.
//!
//! Any other fill color is disallowed. Colors are compared as canonical
//! lowercase `#rrggbb` strings; there is no fuzzy or case-insensitive
//! matching, so `#FFA95F` is disallowed even though `#ffa95f` is not.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fill color from the current event-storming convention.
///
/// Every member except [`AllowedColor::Unfilled`] carries a fixed canonical
/// `#rrggbb` value, available through [`AllowedColor::hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllowedColor {
    DomainEvent,
    Command,
    Actor,
    Policy,
    Aggregate,
    ExternalSystem,
    ReadModel,
    Risk,
    /// A shape without a fill color. Valid, and mapped to a fallback kind.
    Unfilled,
}

/// The eight colored members of the allowed set, in taxonomy order.
pub const COLORED_MEMBERS: [AllowedColor; 8] = [
    AllowedColor::DomainEvent,
    AllowedColor::Command,
    AllowedColor::Actor,
    AllowedColor::Policy,
    AllowedColor::Aggregate,
    AllowedColor::ExternalSystem,
    AllowedColor::ReadModel,
    AllowedColor::Risk,
];

/// Legacy convention colors and their migration targets.
///
/// Each legacy color maps 1:1 onto an allowed color; migration rewrites the
/// shape's stored color to the target's hex value before validation.
pub const LEGACY_MIGRATIONS: [(&str, AllowedColor); 8] = [
    ("#f09609", AllowedColor::DomainEvent),
    ("#1ba1e2", AllowedColor::Command),
    ("#e4ed3b", AllowedColor::Actor),
    ("#7900bf", AllowedColor::Policy),
    ("#f08dae", AllowedColor::ExternalSystem),
    ("#75d175", AllowedColor::ReadModel),
    ("#ff6556", AllowedColor::Risk),
    ("#ffff00", AllowedColor::Aggregate),
];

impl AllowedColor {
    /// Canonical lowercase `#rrggbb` value, or `None` for [`Unfilled`].
    ///
    /// [`Unfilled`]: AllowedColor::Unfilled
    pub fn hex(self) -> Option<&'static str> {
        match self {
            AllowedColor::DomainEvent => Some("#ffa95f"),
            AllowedColor::Command => Some("#a7cdf5"),
            AllowedColor::Actor => Some("#fff9b4"),
            AllowedColor::Policy => Some("#bd87c6"),
            AllowedColor::Aggregate => Some("#f3d02b"),
            AllowedColor::ExternalSystem => Some("#eca1c4"),
            AllowedColor::ReadModel => Some("#d5f694"),
            AllowedColor::Risk => Some("#ee6d80"),
            AllowedColor::Unfilled => None,
        }
    }

    /// Look up the allowed member matching a canonical hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        COLORED_MEMBERS
            .into_iter()
            .find(|member| member.hex() == Some(hex))
    }

    /// Encode this color in the repository's native representation: the
    /// decimal value of the reversed-byte-order (BGR) color, with the
    /// unfilled sentinel encoded as −1.
    pub fn encoded(self) -> i32 {
        match self.hex() {
            None => -1,
            Some(hex) => {
                let red = &hex[1..3];
                let green = &hex[3..5];
                let blue = &hex[5..7];
                i32::from_str_radix(&format!("{blue}{green}{red}"), 16)
                    .expect("taxonomy members carry valid #rrggbb values")
            }
        }
    }
}

impl fmt::Display for AllowedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hex() {
            Some(hex) => write!(f, "{hex}"),
            None => write!(f, "(unfilled)"),
        }
    }
}

/// The result of classifying a shape's raw fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    /// A member of the current convention (including the unfilled sentinel).
    Allowed(AllowedColor),
    /// A legacy color; the shape's stored color must be rewritten to
    /// `replacement` before any further classification or kind lookup.
    Legacy { replacement: AllowedColor },
    /// Outside both sets. The shape cannot be imported.
    Disallowed,
}

/// Classify a raw fill color against the taxonomy.
///
/// The legacy set is checked first so that a legacy color is migrated rather
/// than reported as disallowed. `None` (no fill) classifies as
/// `Allowed(Unfilled)`. Classification is pure; the rewrite implied by a
/// [`ColorClass::Legacy`] result is performed by the shape's owner, which
/// makes migration trivially idempotent: reclassifying the replacement
/// yields `Allowed`.
pub fn classify(color: Option<&str>) -> ColorClass {
    let Some(color) = color else {
        return ColorClass::Allowed(AllowedColor::Unfilled);
    };

    if let Some(&(_, replacement)) = LEGACY_MIGRATIONS
        .iter()
        .find(|(legacy, _)| *legacy == color)
    {
        return ColorClass::Legacy { replacement };
    }

    match AllowedColor::from_hex(color) {
        Some(member) => ColorClass::Allowed(member),
        None => ColorClass::Disallowed,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn classify_allowed_members() {
        for member in COLORED_MEMBERS {
            let hex = member.hex().unwrap();
            assert_eq!(classify(Some(hex)), ColorClass::Allowed(member));
        }
    }

    #[test]
    fn classify_unfilled_is_allowed() {
        assert_eq!(
            classify(None),
            ColorClass::Allowed(AllowedColor::Unfilled)
        );
    }

    #[test]
    fn classify_legacy_carries_replacement() {
        for (legacy, replacement) in LEGACY_MIGRATIONS {
            assert_eq!(
                classify(Some(legacy)),
                ColorClass::Legacy { replacement }
            );
        }
    }

    #[test]
    fn migration_is_idempotent() {
        // Reclassifying a migrated color yields Allowed, not a further
        // migration.
        for (legacy, replacement) in LEGACY_MIGRATIONS {
            let ColorClass::Legacy { replacement: target } = classify(Some(legacy)) else {
                panic!("{legacy} must classify as legacy");
            };
            assert_eq!(target, replacement);
            assert_eq!(
                classify(target.hex()),
                ColorClass::Allowed(replacement)
            );
        }
    }

    #[test]
    fn classify_rejects_unknown_colors() {
        assert_eq!(classify(Some("#123456")), ColorClass::Disallowed);
        assert_eq!(classify(Some("red")), ColorClass::Disallowed);
        // Exact matching only: uppercase variants of allowed colors are
        // not allowed.
        assert_eq!(classify(Some("#FFA95F")), ColorClass::Disallowed);
    }

    #[test]
    fn encoded_reverses_byte_order() {
        // #ffa95f -> BGR 0x5fa9ff
        assert_eq!(AllowedColor::DomainEvent.encoded(), 0x5fa9ff);
        // #a7cdf5 -> BGR 0xf5cda7
        assert_eq!(AllowedColor::Command.encoded(), 0xf5cda7);
        assert_eq!(AllowedColor::Unfilled.encoded(), -1);
    }

    #[test]
    fn legacy_and_allowed_sets_are_disjoint() {
        for (legacy, _) in LEGACY_MIGRATIONS {
            assert!(AllowedColor::from_hex(legacy).is_none());
        }
    }

    proptest! {
        // Every input lands in exactly one class, and arbitrary strings
        // never panic the classifier.
        #[test]
        fn classification_is_total(color in "\\PC*") {
            let _ = classify(Some(&color));
        }

        #[test]
        fn random_hex_outside_sets_is_disallowed(rgb in 0u32..0x1000000) {
            let hex = format!("#{rgb:06x}");
            let in_allowed = AllowedColor::from_hex(&hex).is_some();
            let in_legacy = LEGACY_MIGRATIONS.iter().any(|(l, _)| *l == hex);
            match classify(Some(&hex)) {
                ColorClass::Allowed(_) => prop_assert!(in_allowed),
                ColorClass::Legacy { .. } => prop_assert!(in_legacy),
                ColorClass::Disallowed => prop_assert!(!in_allowed && !in_legacy),
            }
        }
    }
}
