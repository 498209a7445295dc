use msgmark_core::{Entity, EntityKind, html};

fn bold(offset: usize, length: usize) -> Entity {
    Entity::new(offset, length, EntityKind::Bold)
}

fn italic(offset: usize, length: usize) -> Entity {
    Entity::new(offset, length, EntityKind::Italic)
}

fn underline(offset: usize, length: usize) -> Entity {
    Entity::new(offset, length, EntityKind::Underline)
}

fn strike(offset: usize, length: usize) -> Entity {
    Entity::new(offset, length, EntityKind::Strike)
}

fn spoiler(offset: usize, length: usize) -> Entity {
    Entity::new(offset, length, EntityKind::Spoiler)
}

fn code(offset: usize, length: usize) -> Entity {
    Entity::new(offset, length, EntityKind::Code)
}

fn pre(offset: usize, length: usize, language: &str) -> Entity {
    Entity::new(
        offset,
        length,
        EntityKind::Pre {
            language: language.to_string(),
        },
    )
}

fn text_url(offset: usize, length: usize, url: &str) -> Entity {
    Entity::new(
        offset,
        length,
        EntityKind::TextUrl {
            url: url.to_string(),
        },
    )
}

#[test]
fn entity_edges() {
    let text = "Hello, world";
    let entities = vec![bold(0, 5), bold(7, 5)];
    assert_eq!(
        html::unparse(text, &entities),
        "<b>Hello</b>, <b>world</b>"
    );
}

#[test]
fn malformed_entities() {
    let text = "🏆Telegram Official Android Challenge is over🏆.";
    let entities = vec![text_url(2, 43, "https://example.com")];
    assert_eq!(
        html::unparse(text, &entities),
        "🏆<a href=\"https://example.com\">Telegram Official Android Challenge is over</a>🏆."
    );
}

#[test]
fn trailing_malformed_entities() {
    let text = "🏆Telegram Official Android Challenge is over🏆";
    let entities = vec![text_url(2, 43, "https://example.com")];
    assert_eq!(
        html::unparse(text, &entities),
        "🏆<a href=\"https://example.com\">Telegram Official Android Challenge is over</a>🏆"
    );
}

#[test]
fn entities_together() {
    let original = "<b>⚙️</b><i>Settings</i>";
    let stripped = "⚙️Settings";

    let (text, entities) = html::parse(original);
    assert_eq!(text, stripped);
    assert_eq!(entities, vec![bold(0, 2), italic(2, 8)]);

    assert_eq!(html::unparse(&text, &entities), original);
}

#[test]
fn offset_at_emoji() {
    let text = "Hi\n👉 See example";
    let entities = vec![bold(0, 2), italic(3, 2), bold(10, 7)];
    let parsed = "<b>Hi</b>\n<i>👉</i> See <b>example</b>";

    assert_eq!(html::parse(parsed), (text.to_string(), entities.clone()));
    assert_eq!(html::unparse(text, &entities), parsed);
}

#[test]
fn bot_api_example() {
    // The full formatting example from the protocol documentation. The
    // re-rendered markup is canonical: one tag per kind.
    let original = "<b>bold</b>, <strong>bold</strong>
<i>italic</i>, <em>italic</em>
<u>underline</u>, <ins>underline</ins>
<s>strikethrough</s>, <strike>strikethrough</strike>, <del>strikethrough</del>
<span class=\"tg-spoiler\">spoiler</span>, <tg-spoiler>spoiler</tg-spoiler>
<b>bold <i>italic bold <s>italic bold strikethrough <span class=\"tg-spoiler\">italic bold strikethrough spoiler</span></s> <u>underline italic bold</u></i> bold</b>
<a href=\"http://www.example.com/\">inline URL</a>
<a href=\"tg://user?id=123456789\">inline mention of a user</a>
<code>inline fixed-width code</code>
<pre>pre-formatted fixed-width code block</pre>
<pre><code class=\"language-python\">pre-formatted fixed-width code block written in the Python programming language</code></pre>";
    let stripped = "bold, bold
italic, italic
underline, underline
strikethrough, strikethrough, strikethrough
spoiler, spoiler
bold italic bold italic bold strikethrough italic bold strikethrough spoiler underline italic bold bold
inline URL
inline mention of a user
inline fixed-width code
pre-formatted fixed-width code block
pre-formatted fixed-width code block written in the Python programming language";
    let entities = vec![
        bold(0, 4),
        bold(6, 4),
        italic(11, 6),
        italic(19, 6),
        underline(26, 9),
        underline(37, 9),
        strike(47, 13),
        strike(62, 13),
        strike(77, 13),
        spoiler(91, 7),
        spoiler(100, 7),
        spoiler(151, 33),
        strike(125, 59),
        underline(185, 21),
        italic(113, 93),
        bold(108, 103),
        text_url(212, 10, "http://www.example.com/"),
        text_url(223, 24, "tg://user?id=123456789"),
        code(248, 23),
        pre(272, 36, ""),
        pre(309, 79, "python"),
    ];
    let expected = "<b>bold</b>, <b>bold</b>
<i>italic</i>, <i>italic</i>
<u>underline</u>, <u>underline</u>
<s>strikethrough</s>, <s>strikethrough</s>, <s>strikethrough</s>
<span class=\"tg-spoiler\">spoiler</span>, <span class=\"tg-spoiler\">spoiler</span>
<b>bold <i>italic bold <s>italic bold strikethrough <span class=\"tg-spoiler\">italic bold strikethrough spoiler</span></s> <u>underline italic bold</u></i> bold</b>
<a href=\"http://www.example.com/\">inline URL</a>
<a href=\"tg://user?id=123456789\">inline mention of a user</a>
<code>inline fixed-width code</code>
<pre>pre-formatted fixed-width code block</pre>
<pre><code class=\"language-python\">pre-formatted fixed-width code block written in the Python programming language</code></pre>";

    assert_eq!(html::parse(original), (stripped.to_string(), entities.clone()));
    assert_eq!(html::unparse(stripped, &entities), expected);
}

#[test]
fn escaped_characters_round_trip() {
    let (text, entities) = html::parse("2 &lt; 3 &amp;&amp; 3 &gt; 2");
    assert_eq!(text, "2 < 3 && 3 > 2");
    assert!(entities.is_empty());
    assert_eq!(
        html::unparse(&text, &entities),
        "2 &lt; 3 &amp;&amp; 3 &gt; 2"
    );
}

#[test]
fn custom_emoji_attributes() {
    let (text, entities) = html::parse("<tg-emoji emoji-id=\"5368324170671202286\">👍</tg-emoji>");
    assert_eq!(text, "👍");
    assert_eq!(
        entities,
        vec![Entity::new(
            0,
            2,
            EntityKind::CustomEmoji {
                document_id: 5368324170671202286,
            },
        )]
    );
    assert_eq!(
        html::unparse(&text, &entities),
        "<tg-emoji emoji-id=\"5368324170671202286\">👍</tg-emoji>"
    );

    let (text, entities) = html::parse("<emoji document_id=\"42\">x</emoji>");
    assert_eq!(text, "x");
    assert_eq!(
        entities,
        vec![Entity::new(0, 1, EntityKind::CustomEmoji { document_id: 42 })]
    );
}

#[test]
fn mailto_anchor_becomes_email() {
    let (text, entities) = html::parse("<a href=\"mailto:user@example.com\">write me</a>");
    assert_eq!(text, "user@example.com");
    assert_eq!(entities, vec![Entity::new(0, 16, EntityKind::Email)]);
    assert_eq!(
        html::unparse(&text, &entities),
        "<a href=\"mailto:user@example.com\">user@example.com</a>"
    );
}

#[test]
fn mention_renders_as_user_link() {
    let entities = vec![Entity::new(0, 5, EntityKind::MentionName { user_id: 7 })];
    assert_eq!(
        html::unparse("admin", &entities),
        "<a href=\"tg://user?id=7\">admin</a>"
    );
}

#[test]
fn unknown_kind_keeps_text_and_drops_formatting() {
    let entities = vec![Entity::new(0, 8, EntityKind::Hashtag)];
    assert_eq!(html::unparse("#roundup now", &entities), "#roundup now");
}

#[test]
fn entity_past_text_end_truncates() {
    let entities = vec![bold(0, 50)];
    assert_eq!(html::unparse("Hello", &entities), "<b>Hello</b>");
}

#[test]
fn blockquote_parses_to_entity() {
    let (text, entities) = html::parse("<blockquote>quoted</blockquote> rest");
    assert_eq!(text, "quoted rest");
    assert_eq!(entities, vec![Entity::new(0, 6, EntityKind::Blockquote)]);
}

#[test]
fn spoiler_span_requires_the_marker_class() {
    let (text, entities) = html::parse("<span class=\"tg-spoiler\">hush</span><span>loud</span>");
    assert_eq!(text, "hushloud");
    assert_eq!(entities, vec![spoiler(0, 4)]);
}
