mod common;

#[cfg(test)]
pub mod section_tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::common::*;

    use pressx_front::frontend::components::render_card;
    use pressx_front::frontend::{
        render_section, render_sections, RenderedSection, SectionContext,
    };
    use pressx_front::models::*;
    use pressx_front::services::queries;

    fn ctx() -> SectionContext {
        SectionContext::new(vec![
            content_node(11, "first-post", "First post"),
            content_node(12, "second-post", "Second post"),
        ])
    }

    #[test]
    fn test_every_section_kind_decodes() {
        let kinds: Vec<Option<SectionKind>> = all_sections().iter().map(Section::kind).collect();
        let expected: Vec<Option<SectionKind>> = SectionKind::ALL.into_iter().map(Some).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_render_section_every_kind_success() {
        for (index, section) in all_sections().iter().enumerate() {
            let kind = section.kind().expect("known kind");
            match render_section(section, index, &ctx()) {
                RenderedSection::Node { key, html } => {
                    assert_eq!(key, format!("section-{index}-{kind}"));
                    assert!(!html.trim().is_empty(), "{kind} rendered empty");
                    assert!(html.contains(&format!("data-section-key=\"{key}\"")));
                }
                RenderedSection::Empty => panic!("{kind} rendered nothing"),
            }
        }
    }

    #[test]
    fn test_render_section_fails_on_unknown_type() {
        let section = Section::from_value(json!({ "type": "video_wall", "title": "Nope" }));
        assert_eq!(section, Section::Unknown);
        assert!(render_section(&section, 0, &SectionContext::default()).is_empty());
    }

    #[test]
    fn test_render_section_fails_on_missing_type() {
        let section = Section::from_value(json!({ "title": "No discriminant" }));
        assert_eq!(section, Section::Unknown);
    }

    #[test]
    fn test_render_sections_keeps_order_and_drops_unknown() {
        let sections = vec![
            Section::from_value(json!({ "type": "newsletter", "title": "First" })),
            Section::from_value(json!({ "type": "mystery" })),
            Section::from_value(json!({ "type": "quote", "quote": "Second" })),
        ];

        let html = render_sections(&sections, &SectionContext::default());
        assert_eq!(html.len(), 2);
        assert!(html[0].contains("First"));
        assert!(html[1].contains("Second"));
        assert!(html[1].contains("section-2-quote"));
    }

    #[test]
    fn test_landing_tolerates_bad_section_entry() {
        let landing = landing(
            5,
            "mixed",
            vec![
                json!({ "type": "hero", "heading": "Ok" }),
                json!({ "type": "hero", "heading": ["not", "a", "string"] }),
                json!(null),
            ],
        );
        assert_eq!(landing.sections.len(), 3);
        assert!(matches!(landing.sections[0], Section::Hero(_)));
        assert_eq!(landing.sections[1], Section::Unknown);
        assert_eq!(landing.sections[2], Section::Unknown);
    }

    #[test]
    fn test_card_group_sub_dispatch_success() {
        let stat = Card::Stat(StatCard {
            heading: Some("42%".into()),
            body: Some("Growth".into()),
            icon: None,
        });
        let custom = Card::Custom(CustomCard {
            heading: Some("Custom".into()),
            summary: Some("Hand made".into()),
            ..Default::default()
        });

        let stat_html = render_card(&stat).expect("stat card");
        let custom_html = render_card(&custom).expect("custom card");

        assert!(stat_html.contains("card--stat"));
        assert!(stat_html.contains("42%"));
        assert!(custom_html.contains("card--custom"));
        assert!(custom_html.contains("Hand made"));
        assert_ne!(stat_html, custom_html);
    }

    #[test]
    fn test_card_group_filters_unknown_cards() {
        let section = Section::from_value(json!({
            "type": "card_group",
            "title": "Mixed cards",
            "cards": [
                { "type": "stat", "heading": "1" },
                { "type": "hologram", "heading": "2" }
            ]
        }));

        let html = render_section(&section, 0, &SectionContext::default());
        assert_eq!(html.html().matches("class=\"card ").count(), 1);
    }

    #[test]
    fn test_card_group_all_unknown_still_renders_title() {
        let section = Section::from_value(json!({
            "type": "card_group",
            "title": "Only strangers",
            "cards": [ { "type": "hologram" }, { "type": "teleporter" } ]
        }));

        let rendered = render_section(&section, 3, &SectionContext::default());
        assert!(!rendered.is_empty());
        assert!(rendered.html().contains("Only strangers"));
        assert!(!rendered.html().contains("class=\"card "));
    }

    #[test]
    fn test_card_group_tolerates_untyped_card() {
        let section = Section::from_value(json!({
            "type": "card_group",
            "title": "Stats",
            "cards": [
                { "type": "stat", "heading": "12" },
                { "heading": "no type" },
                { "type": 7, "heading": "numeric type" }
            ]
        }));

        match &section {
            Section::CardGroup(group) => assert_eq!(
                group.cards[1..].to_vec(),
                vec![Card::Unknown, Card::Unknown]
            ),
            other => panic!("expected card group, got {other:?}"),
        }

        let rendered = render_section(&section, 0, &SectionContext::default());
        assert!(rendered.html().contains("Stats"));
        assert_eq!(rendered.html().matches("class=\"card ").count(), 1);
    }

    #[test]
    fn test_side_by_side_tolerates_untyped_feature() {
        let section = Section::from_value(json!({
            "type": "side_by_side",
            "title": "Why us",
            "features": [
                { "text": "no type" },
                { "type": "bullet", "text": "Typed bullet" }
            ]
        }));

        let rendered = render_section(&section, 0, &SectionContext::default());
        assert!(rendered.html().contains("Why us"));
        assert!(rendered.html().contains("Typed bullet"));
        assert_eq!(rendered.html().matches("class=\"feature ").count(), 1);
    }

    #[test]
    fn test_side_by_side_features_sub_dispatch() {
        let section = Section::from_value(json!({
            "type": "side_by_side",
            "title": "Features",
            "features": [
                { "type": "bullet", "text": "Bullet point" },
                { "type": "stat", "title": "3x", "summary": "faster" },
                { "type": "sparkle" }
            ]
        }));

        let html = render_section(&section, 0, &SectionContext::default());
        assert!(html.html().contains("feature--bullet"));
        assert!(html.html().contains("feature--stat"));
        assert_eq!(html.html().matches("class=\"feature ").count(), 2);
    }

    #[test]
    fn test_media_urls_route_through_image_endpoint() {
        let section = Section::from_value(json!({
            "type": "media",
            "media": media_json("https://cms.example.com/a b.jpg")
        }));

        let html = render_section(&section, 0, &SectionContext::default());
        assert!(html
            .html()
            .contains("image?url=https%3A%2F%2Fcms.example.com%2Fa+b.jpg"));
        assert!(html.html().contains("width=1280"));
        assert!(html.html().contains("width=\"1280\" height=\"640\""));
    }

    #[test]
    fn test_recent_posts_renders_context_posts() {
        let section = Section::from_value(json!({ "type": "recent_posts" }));

        let html = render_section(&section, 0, &ctx());
        assert!(html.html().contains("Recent posts"));
        assert!(html.html().contains("First post"));
        assert!(html.html().contains("second-post"));
    }

    #[test]
    fn test_section_text_is_escaped_but_body_is_not() {
        let section = Section::from_value(json!({
            "type": "text",
            "title": "<script>alert(1)</script>",
            "body": "<em>trusted</em>"
        }));

        let html = render_section(&section, 0, &SectionContext::default());
        assert!(!html.html().contains("<script>"));
        assert!(html.html().contains("<em>trusted</em>"));
    }

    #[test]
    fn test_sections_fragment_covers_every_kind() {
        let doc = queries::sections_fragment();
        for kind in SectionKind::ALL {
            assert!(doc.contains(&format!("...{}", kind.fragment_name())));
            assert!(doc.contains(&format!("fragment {} on LandingSection", kind.fragment_name())));
        }
        assert!(doc.contains("fragment MediaFields"));
        assert!(doc.contains("fragment LinkFields"));
        assert!(queries::landing_query().contains("...Sections"));
    }

    #[test]
    fn test_section_kind_from_str_success() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.as_str().parse::<SectionKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_section_kind_from_str_fails_on_unknown() {
        assert!("video_wall".parse::<SectionKind>().is_err());
    }
}
