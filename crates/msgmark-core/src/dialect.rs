//! The dialect contract and the shared nested-entity renderer.

use crate::entity::Entity;
use crate::error::ParseError;
use crate::units::{self, from_units, to_units};

/// One markup syntax (HTML-like or Markdown-like).
///
/// A dialect knows how to wrap an entity's rendered body
/// ([`apply_entity`](Dialect::apply_entity)), how to escape a literal run
/// ([`quote`](Dialect::quote)) and how to decode markup back into plain
/// text plus entities ([`parse`](Dialect::parse)). Rendering is shared:
/// [`unparse`](Dialect::unparse) drives both dialects through the same
/// nesting algorithm.
///
/// Dialect values are stateless; one value can serve any number of
/// concurrent callers. Per-call scan state lives inside `parse`.
pub trait Dialect {
    /// Wraps the already-rendered inner text of `entity` in the dialect's
    /// markup for that kind. Unknown kinds fall back to quoting the text,
    /// dropping the formatting but never the content.
    fn apply_entity(&self, entity: &Entity, inner: &str) -> String;

    /// Escapes a literal run. `parent` is the innermost entity the run is
    /// rendered inside, if any; the markdown dialect keeps code and pre
    /// bodies verbatim.
    fn quote(&self, text: &str, parent: Option<&Entity>) -> String;

    /// Decodes markup into plain text plus the entities found in it.
    fn parse(&self, text: &str) -> Result<(String, Vec<Entity>), ParseError>;

    /// Renders plain text plus entities back into markup. Never fails:
    /// unsorted, overlapping or out-of-range entity lists degrade per the
    /// nesting heuristic instead of erroring.
    fn unparse(&self, text: &str, entities: &[Entity]) -> String {
        let units = to_units(text);
        let mut sorted = entities.to_vec();
        // At equal offsets the longer span is the outer one, so a link and
        // a style starting on the same unit nest instead of fragmenting.
        sorted.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));
        let mut out = String::new();
        render_range(self, &units, &sorted, 0, units.len(), None, &mut out);
        out
    }
}

/// Recursively renders `entities` over `units[range_start..range_end]`.
///
/// Entities must be sorted by offset. An entity starting before the cursor
/// is skipped rather than rejected, and the sub-entity collection treats
/// any later entity starting before the current one's end as nested even
/// when it is not fully contained. Both are deliberate tolerance for
/// malformed lists from misbehaving clients; the approximate containment
/// test is part of the contract, not an optimization to tighten.
fn render_range<D: Dialect + ?Sized>(
    dialect: &D,
    units: &[u16],
    entities: &[Entity],
    range_start: usize,
    range_end: usize,
    parent: Option<&Entity>,
    out: &mut String,
) {
    let mut cursor = range_start;
    for (index, entity) in entities.iter().enumerate() {
        if entity.offset < cursor {
            continue;
        }
        if entity.offset > cursor {
            let gap = from_units(units::slice(units, cursor, entity.offset));
            out.push_str(&dialect.quote(&gap, parent));
        }
        let start = entity.offset;
        let end = entity.end();
        cursor = end;

        let nested: Vec<Entity> = entities[index + 1..]
            .iter()
            .filter(|candidate| candidate.offset < end)
            .cloned()
            .collect();
        let mut inner = String::new();
        render_range(dialect, units, &nested, start, end, Some(entity), &mut inner);
        out.push_str(&dialect.apply_entity(entity, &inner));
    }
    if cursor < range_end {
        let tail = from_units(units::slice(units, cursor, range_end));
        out.push_str(&dialect.quote(&tail, parent));
    }
}
