//! The HTML dialect: a tag-event decoder and the matching encoder.
//!
//! Tokenization is html5ever's problem; this module only consumes the
//! start-tag/text/end-tag events it emits and keeps the entity bookkeeping.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::dialect::Dialect;
use crate::entity::{Entity, EntityKind, strip_parsed_text};
use crate::error::ParseError;
use crate::units::{from_units, to_units};

/// The HTML markup dialect. Stateless; see [`Dialect`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlDialect;

/// Decodes HTML markup into plain text plus entities.
///
/// Never fails: tags with missing required attributes produce no entity,
/// unbalanced close tags are ignored, unknown tags contribute only their
/// text content.
pub fn parse(text: &str) -> (String, Vec<Entity>) {
    if text.is_empty() {
        return (String::new(), Vec::new());
    }
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(text));
    let mut tokenizer = Tokenizer::new(EntitySink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    let EntitySink {
        text: mut units,
        mut entities,
        ..
    } = tokenizer.sink;
    strip_parsed_text(&mut units, &mut entities);
    (from_units(&units), entities)
}

/// Renders plain text plus entities as HTML markup.
pub fn unparse(text: &str, entities: &[Entity]) -> String {
    HtmlDialect.unparse(text, entities)
}

impl Dialect for HtmlDialect {
    fn apply_entity(&self, entity: &Entity, inner: &str) -> String {
        match &entity.kind {
            EntityKind::Bold => format!("<b>{inner}</b>"),
            EntityKind::Italic => format!("<i>{inner}</i>"),
            EntityKind::Underline => format!("<u>{inner}</u>"),
            EntityKind::Strike => format!("<s>{inner}</s>"),
            EntityKind::Spoiler => format!("<span class=\"tg-spoiler\">{inner}</span>"),
            EntityKind::Code => format!("<code>{inner}</code>"),
            EntityKind::Pre { language } => {
                if language.is_empty() {
                    format!("<pre>{inner}</pre>")
                } else {
                    format!("<pre><code class=\"language-{language}\">{inner}</code></pre>")
                }
            }
            EntityKind::TextUrl { url } => format!("<a href=\"{url}\">{inner}</a>"),
            EntityKind::Email => format!("<a href=\"mailto:{inner}\">{inner}</a>"),
            EntityKind::MentionName { user_id } => {
                format!("<a href=\"tg://user?id={user_id}\">{inner}</a>")
            }
            EntityKind::CustomEmoji { document_id } => {
                format!("<tg-emoji emoji-id=\"{document_id}\">{inner}</tg-emoji>")
            }
            _ => self.quote(inner, None),
        }
    }

    fn quote(&self, text: &str, _parent: Option<&Entity>) -> String {
        // Ampersand first, or the other replacements would be re-escaped.
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn parse(&self, text: &str) -> Result<(String, Vec<Entity>), ParseError> {
        Ok(parse(text))
    }
}

/// Per-parse decoder state fed by the tokenizer.
///
/// `open_tags` and `open_tags_meta` move in lockstep; the meta entry for an
/// anchor holds the url its visible text is forced to, if any. `building`
/// is an insertion-ordered map from tag name to the entity under
/// construction: the offset is fixed when the tag opens, the length grows
/// with every text event while it stays open. Only one entity per tag name
/// is tracked at a time; a nested same-named tag extends the outer entity
/// instead of opening its own.
#[derive(Default)]
struct EntitySink {
    text: Vec<u16>,
    entities: Vec<Entity>,
    building: Vec<(String, Entity)>,
    open_tags: Vec<String>,
    open_tags_meta: Vec<Option<String>>,
}

impl EntitySink {
    fn handle_start_tag(&mut self, tag: &Tag) {
        let name = tag.name.as_ref().to_string();
        self.open_tags.push(name.clone());
        self.open_tags_meta.push(None);

        let attr = |key: &str| {
            tag.attrs
                .iter()
                .find(|attribute| attribute.name.local.as_ref() == key)
                .map(|attribute| &*attribute.value)
        };

        let kind = match name.as_str() {
            "b" | "strong" => Some(EntityKind::Bold),
            "i" | "em" => Some(EntityKind::Italic),
            "u" | "ins" => Some(EntityKind::Underline),
            "del" | "s" | "strike" => Some(EntityKind::Strike),
            "blockquote" => Some(EntityKind::Blockquote),
            "code" => {
                // <code class="language-x"> inside <pre> names the block
                // language instead of opening an inline code entity.
                if let Some(pre) = self.builder_mut("pre") {
                    if let EntityKind::Pre { language } = &mut pre.kind
                        && let Some(class) = attr("class")
                        && let Some(tag_language) = class.strip_prefix("language-")
                    {
                        *language = tag_language.to_string();
                    }
                    None
                } else {
                    Some(EntityKind::Code)
                }
            }
            "pre" => Some(EntityKind::Pre {
                language: String::new(),
            }),
            "tg-emoji" | "emoji" => attr("emoji-id")
                .filter(|value| !value.is_empty())
                .or_else(|| attr("document_id"))
                .and_then(|value| value.parse::<i64>().ok())
                .map(|document_id| EntityKind::CustomEmoji { document_id }),
            "span" => (attr("class") == Some("tg-spoiler")).then_some(EntityKind::Spoiler),
            "tg-spoiler" => Some(EntityKind::Spoiler),
            "a" => {
                let Some(href) = attr("href") else {
                    // No target: the tag stays on the stack for
                    // bookkeeping but produces no entity.
                    return;
                };
                let href = href.to_string();
                if let Some(address) = href.strip_prefix("mailto:") {
                    self.set_top_meta(Some(address.to_string()));
                    Some(EntityKind::Email)
                } else if raw_start_tag(&href) == href {
                    // A bare autolink: the anchor's raw opening text is its
                    // own target. The tokenizer does not preserve raw tag
                    // text, so the canonical serialization stands in for it.
                    self.set_top_meta(Some(href.clone()));
                    Some(EntityKind::Url)
                } else {
                    Some(EntityKind::TextUrl { url: href })
                }
            }
            _ => None,
        };

        if let Some(kind) = kind
            && self.builder_mut(&name).is_none()
        {
            self.building
                .push((name, Entity::new(self.text.len(), 0, kind)));
        }
    }

    fn handle_text(&mut self, text: &str) {
        // The visible text of an anchor with a resolved target is forced to
        // equal that target.
        let substituted = match (self.open_tags.last(), self.open_tags_meta.last()) {
            (Some(tag), Some(Some(url))) if tag == "a" => url.as_str(),
            _ => text,
        };
        let units = to_units(substituted);
        for (_, entity) in &mut self.building {
            entity.length += units.len();
        }
        self.text.extend_from_slice(&units);
    }

    fn handle_end_tag(&mut self, name: &str) {
        // Unbalanced markup must not crash: popping an empty stack is a no-op.
        self.open_tags.pop();
        self.open_tags_meta.pop();
        if let Some(index) = self.building.iter().position(|(tag, _)| tag == name) {
            let (_, entity) = self.building.remove(index);
            self.entities.push(entity);
        }
    }

    fn builder_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.building
            .iter_mut()
            .find(|(tag, _)| tag == name)
            .map(|(_, entity)| entity)
    }

    fn set_top_meta(&mut self, meta: Option<String>) {
        if let Some(top) = self.open_tags_meta.last_mut() {
            *top = meta;
        }
    }
}

fn raw_start_tag(href: &str) -> String {
    format!("<a href=\"{href}\">")
}

impl TokenSink for EntitySink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => {
                    self.handle_start_tag(&tag);
                    if tag.self_closing {
                        self.handle_end_tag(tag.name.as_ref());
                    }
                }
                TagKind::EndTag => self.handle_end_tag(tag.name.as_ref()),
            },
            Token::CharacterTokens(text) => self.handle_text(&text),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}
