//! Semantic element kinds derived from shape colors.
//!
//! The target repository models an event-storming page as an Activity
//! diagram whose elements are typed by the originating shape's fill color.
//! The color-to-kind table is total over [`AllowedColor`]: classification
//! must happen first, so a disallowed or unmigrated legacy color can never
//! reach the lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::AllowedColor;

/// The element kinds the importer creates in the target repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Action,
    Event,
    Entity,
    Constraint,
    Activity,
    Risk,
    Object,
}

impl ElementKind {
    /// Repository type name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Action => "Action",
            ElementKind::Event => "Event",
            ElementKind::Entity => "Entity",
            ElementKind::Constraint => "Constraint",
            ElementKind::Activity => "Activity",
            ElementKind::Risk => "Risk",
            ElementKind::Object => "Object",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AllowedColor {
    /// Resolve the element kind for this color.
    ///
    /// Total over the allowed set; the unfilled sentinel falls back to
    /// [`ElementKind::Object`].
    pub fn element_kind(self) -> ElementKind {
        match self {
            AllowedColor::DomainEvent => ElementKind::Action,
            AllowedColor::Command => ElementKind::Action,
            AllowedColor::Actor => ElementKind::Entity,
            AllowedColor::Policy => ElementKind::Constraint,
            AllowedColor::Aggregate => ElementKind::Activity,
            AllowedColor::ExternalSystem => ElementKind::Event,
            AllowedColor::ReadModel => ElementKind::Object,
            AllowedColor::Risk => ElementKind::Risk,
            AllowedColor::Unfilled => ElementKind::Object,
        }
    }
}

/// Diagram kinds the importer creates. One Activity diagram per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagramKind {
    Activity,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Activity => f.write_str("Activity"),
        }
    }
}

/// Relationship kinds the importer creates between elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorKind {
    ControlFlow,
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::ControlFlow => f.write_str("ControlFlow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::color::COLORED_MEMBERS;

    use super::*;

    #[test]
    fn kind_lookup_is_total_over_allowed_colors() {
        for member in COLORED_MEMBERS {
            // Just exercising every arm; a missing mapping would not compile.
            let _ = member.element_kind();
        }
        assert_eq!(AllowedColor::Unfilled.element_kind(), ElementKind::Object);
    }

    #[test]
    fn event_storming_categories_map_to_expected_kinds() {
        assert_eq!(AllowedColor::DomainEvent.element_kind(), ElementKind::Action);
        assert_eq!(AllowedColor::Command.element_kind(), ElementKind::Action);
        assert_eq!(AllowedColor::Actor.element_kind(), ElementKind::Entity);
        assert_eq!(AllowedColor::Policy.element_kind(), ElementKind::Constraint);
        assert_eq!(AllowedColor::Aggregate.element_kind(), ElementKind::Activity);
        assert_eq!(AllowedColor::ExternalSystem.element_kind(), ElementKind::Event);
        assert_eq!(AllowedColor::ReadModel.element_kind(), ElementKind::Object);
        assert_eq!(AllowedColor::Risk.element_kind(), ElementKind::Risk);
    }
}
