//! The entity model: formatting and semantic spans over plain text.

use crate::units::is_whitespace;

/// A formatting or semantic span over plain text.
///
/// `offset` and `length` are measured in UTF-16 code units, not characters
/// or bytes. The decoders always produce spans inside the text they return;
/// spans arriving from elsewhere are not trusted and the renderer truncates
/// them as needed.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub offset: usize,
    pub length: usize,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(offset: usize, length: usize, kind: EntityKind) -> Self {
        Self {
            offset,
            length,
            kind,
        }
    }

    /// One past the last unit covered by the span.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// The closed set of entity kinds understood by the protocol.
///
/// The first group is produced by the decoders in this crate. The second
/// group only ever arrives from the wire side (the protocol recognizes
/// hashtags, commands and the like server-side); the encoders render those
/// through the plain-text fallback.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum EntityKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Spoiler,
    Code,
    Blockquote,
    Pre { language: String },
    Url,
    Email,
    TextUrl { url: String },
    MentionName { user_id: i64 },
    CustomEmoji { document_id: i64 },
    Mention,
    Hashtag,
    BotCommand,
    Cashtag,
    Phone,
}

/// Trims whitespace from both ends of freshly decoded text, keeping the
/// entity list consistent with the shrinking buffer.
///
/// An entity ending exactly at a trimmed tail unit shrinks with it; an
/// entity at offset 0 shrinks when the head is trimmed, every other entity
/// shifts left. Entities that reach length 0 are dropped.
pub(crate) fn strip_parsed_text(units: &mut Vec<u16>, entities: &mut Vec<Entity>) {
    while units.last().copied().is_some_and(is_whitespace) {
        let end = units.len();
        units.pop();
        entities.retain_mut(|entity| {
            if entity.length > 0 && entity.end() == end {
                entity.length -= 1;
            }
            entity.length > 0
        });
    }
    while units.first().copied().is_some_and(is_whitespace) {
        units.remove(0);
        entities.retain_mut(|entity| {
            if entity.offset > 0 {
                entity.offset -= 1;
            } else if entity.length > 0 {
                entity.length -= 1;
            }
            entity.length > 0
        });
    }
}
