#![cfg(feature = "serde")]

use msgmark_core::{Entity, EntityKind};

#[test]
fn entity_json_round_trip() {
    let entities = vec![
        Entity::new(0, 4, EntityKind::Bold),
        Entity::new(
            5,
            9,
            EntityKind::Pre {
                language: "rust".to_string(),
            },
        ),
        Entity::new(
            15,
            3,
            EntityKind::TextUrl {
                url: "https://example.com".to_string(),
            },
        ),
        Entity::new(19, 5, EntityKind::MentionName { user_id: 123456789 }),
    ];

    let json = serde_json::to_string(&entities).unwrap();
    let back: Vec<Entity> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entities);
}

#[test]
fn kind_tag_is_flattened_next_to_the_span() {
    let entity = Entity::new(
        3,
        7,
        EntityKind::Pre {
            language: "python".to_string(),
        },
    );
    let value = serde_json::to_value(&entity).unwrap();
    assert_eq!(value["offset"], 3);
    assert_eq!(value["length"], 7);
    assert_eq!(value["type"], "pre");
    assert_eq!(value["language"], "python");
}
