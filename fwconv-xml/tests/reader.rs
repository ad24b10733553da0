use fwconv_xml::{parse, ParseError};

#[test]
fn reads_attributes_empty_and_nested_elements() {
    let node = parse(
        r#"<?xml version="1.0"?>
        <!-- comment -->
        <config>
          <settings><enabled/></settings>
          <items>
            <item id="1">one</item>
            <item id="2"/>
            <item id="3"><![CDATA[a < b]]></item>
          </items>
        </config>"#,
    )
    .expect("parse should succeed");
    assert_eq!(node.tag, "config");
    assert!(node.get_path(&["settings", "enabled"]).is_some());

    let items = node.get_child("items").expect("items");
    let item_nodes = items.get_children("item");
    assert_eq!(item_nodes.len(), 3);
    assert_eq!(item_nodes[0].attr("id"), Some("1"));
    assert_eq!(item_nodes[0].text.as_deref(), Some("one"));
    assert_eq!(item_nodes[2].text.as_deref(), Some("a < b"));
}

#[test]
fn rejects_unclosed_elements() {
    let err = parse("<config><system>").expect_err("should fail");
    assert!(matches!(err, ParseError::Malformed(_) | ParseError::Xml(_)));
}

#[test]
fn rejects_empty_document() {
    let err = parse("   ").expect_err("should fail");
    assert!(matches!(err, ParseError::Malformed(_)));
}
