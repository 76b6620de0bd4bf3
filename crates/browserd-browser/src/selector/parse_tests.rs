use super::*;

fn text(value: &str, mode: TextMatch) -> Selector {
    Selector::Text {
        text: value.to_string(),
        mode,
    }
}

#[test]
fn test_text_prefixes() {
    assert_eq!(Selector::parse("text=Log in"), text("Log in", TextMatch::Exact));
    assert_eq!(Selector::parse("text:Log in"), text("Log in", TextMatch::Fuzzy));
    assert_eq!(Selector::parse("text:"), text("", TextMatch::Fuzzy));
}

#[test]
fn test_css_xpath_tag_prefixes() {
    assert_eq!(
        Selector::parse("css:input[name=q]"),
        Selector::Css("input[name=q]".to_string())
    );
    assert_eq!(Selector::parse("c:div > a"), Selector::Css("div > a".to_string()));
    assert_eq!(
        Selector::parse("xpath://a[@href]"),
        Selector::XPath("//a[@href]".to_string())
    );
    assert_eq!(Selector::parse("x://h1"), Selector::XPath("//h1".to_string()));
    assert_eq!(Selector::parse("tag:button"), Selector::Tag("button".to_string()));
    assert_eq!(Selector::parse("t:h2"), Selector::Tag("h2".to_string()));
}

#[test]
fn test_attribute_prefix() {
    assert_eq!(
        Selector::parse("@name=q"),
        Selector::Attribute {
            name: "name".to_string(),
            value: "q".to_string(),
            mode: TextMatch::Exact,
        }
    );
    assert_eq!(
        Selector::parse("@href:example.com"),
        Selector::Attribute {
            name: "href".to_string(),
            value: "example.com".to_string(),
            mode: TextMatch::Fuzzy,
        }
    );
}

#[test]
fn test_attribute_first_separator_wins() {
    // The value may itself contain separators.
    assert_eq!(
        Selector::parse("@href=https://example.com/a=b"),
        Selector::Attribute {
            name: "href".to_string(),
            value: "https://example.com/a=b".to_string(),
            mode: TextMatch::Exact,
        }
    );
    assert_eq!(
        Selector::parse("@data-x:a=b"),
        Selector::Attribute {
            name: "data-x".to_string(),
            value: "a=b".to_string(),
            mode: TextMatch::Fuzzy,
        }
    );
}

#[test]
fn test_attribute_without_separator_is_default_text() {
    assert_eq!(
        Selector::parse("@disabled"),
        Selector::DefaultText("@disabled".to_string())
    );
    assert_eq!(Selector::parse("@=x"), Selector::DefaultText("@=x".to_string()));
}

#[test]
fn test_id_and_class() {
    assert_eq!(Selector::parse("#login"), Selector::Id("login".to_string()));
    assert_eq!(Selector::parse(".btn.primary"), Selector::Class("btn.primary".to_string()));
}

#[test]
fn test_unknown_prefix_is_default_text() {
    for raw in ["Log in", "Text=Upper", "CSS:div", "link:foo", "/html/body", "", "  Sign up  "] {
        assert!(
            matches!(Selector::parse(raw), Selector::DefaultText(_)),
            "{raw:?} should be default text"
        );
    }
    assert_eq!(Selector::parse("  Sign up  "), Selector::DefaultText("Sign up".to_string()));
}

#[test]
fn test_every_known_prefix_maps_to_its_variant() {
    let cases = [
        ("text=a", "text"),
        ("text:a", "text"),
        ("css:a", "css"),
        ("c:a", "css"),
        ("xpath:a", "xpath"),
        ("x:a", "xpath"),
        ("tag:a", "tag"),
        ("t:a", "tag"),
        ("@a=b", "attribute"),
        ("@a:b", "attribute"),
        ("#a", "id"),
        (".a", "class"),
    ];
    for (raw, kind) in cases {
        assert_eq!(Selector::parse(raw).kind(), kind, "{raw}");
    }
}

#[test]
fn test_from_str() {
    let selector: Selector = "#q".parse().unwrap();
    assert_eq!(selector, Selector::Id("q".to_string()));
}

#[test]
fn test_display_is_canonical() {
    for raw in ["text=a", "text:a", "css:a b", "xpath://a", "tag:p", "@x=1", "@x:1", "#i", ".c", "plain"] {
        assert_eq!(Selector::parse(raw).to_string(), raw);
    }
    assert_eq!(Selector::parse("c:div").to_string(), "css:div");
}

#[test]
fn test_query_shapes() {
    let q = Selector::parse("text=Hello").query();
    assert_eq!(q["type"], "text");
    assert_eq!(q["exact"], true);

    let q = Selector::parse("Hello").query();
    assert_eq!(q["type"], "text");
    assert_eq!(q["exact"], false);

    let q = Selector::parse("#main").query();
    assert_eq!(q["type"], "attr");
    assert_eq!(q["name"], "id");
    assert_eq!(q["exact"], true);

    let q = Selector::parse("@placeholder:Search").query();
    assert_eq!(q["name"], "placeholder");
    assert_eq!(q["value"], "Search");
    assert_eq!(q["exact"], false);

    let q = Selector::parse(".item").query();
    assert_eq!(q["type"], "class");
}
