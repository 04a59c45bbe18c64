use cfgparse::{
    Document, ErrorKind, ErrorStage, Format, Indent, NodeKind, ParseOptions, PrintOptions,
    SEARCH_DEPTH_UNBOUNDED,
};
use rstest::rstest;
use serde_json::json;

#[rstest]
fn print_without_content_is_unsupported() {
    let err = Document::new().print().unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFormat);
    assert_eq!(err.stage, ErrorStage::Print);
}

#[rstest]
#[case(Format::Ini, "[s]\nk=v\n")]
#[case(Format::Xml, "<s k=\"v\"/>")]
#[case(Format::Json, r#"{"s":{"k":"v"}}"#)]
fn print_to_writer_matches_print(#[case] format: Format, #[case] input: &str) {
    let doc = cfgparse::parse(input, format).unwrap();
    let mut sink = Vec::new();
    doc.print_to(&mut sink, &PrintOptions::default()).unwrap();
    assert_eq!(sink, doc.print().unwrap());
}

#[rstest]
fn child_search_depth() {
    let doc = cfgparse::parse(
        r#"{"a":{"x":"direct","b":{"y":"deep"}},"y":"root"}"#,
        Format::Json,
    )
    .unwrap();
    let a = doc.find("a", 0).unwrap();
    assert_eq!(a.child("x", 0).unwrap().value_str(), Some("direct"));
    assert!(a.child("y", 0).is_none());
    assert_eq!(a.child("y", 1).unwrap().value_str(), Some("deep"));
    assert_eq!(
        doc.find("y", SEARCH_DEPTH_UNBOUNDED).unwrap().value_str(),
        Some("deep")
    );
    assert_eq!(doc.find("y", 0).unwrap().value_str(), Some("root"));
}

#[rstest]
fn json_array_children_are_unnamed() {
    let doc = cfgparse::parse(r#"{"arr":["a","b"]}"#, Format::Json).unwrap();
    let arr = doc.find("arr", 0).unwrap();
    assert_eq!(arr.kind(), NodeKind::Array);
    let values: Vec<_> = arr
        .children()
        .map(|child| (child.name(), child.value_str()))
        .collect();
    assert_eq!(values, vec![(None, Some("a")), (None, Some("b"))]);
}

#[rstest]
fn scalar_conversions_are_lenient() {
    let doc = cfgparse::parse(
        "<c><n> 42abc</n><f>-1.5e2x</f><z>none</z></c>",
        Format::Xml,
    )
    .unwrap();
    assert_eq!(doc.find("n", 1).unwrap().as_integer(), 42);
    assert_eq!(doc.find("f", 1).unwrap().as_number(), -150.0);
    assert_eq!(doc.find("z", 1).unwrap().as_integer(), 0);
    assert_eq!(doc.find("c", 0).unwrap().as_number(), 0.0);
}

#[rstest]
fn built_xml_document_prints_canonically() {
    let mut doc = Document::empty(Format::Xml);
    let root = doc.append_root("config").unwrap();
    doc.add_attribute(root, "version", "2").unwrap();
    let port = doc.append_child(root, "port").unwrap();
    doc.set_integer(port, -8080).unwrap();
    doc.append_child(root, "flag").unwrap();

    let options = PrintOptions::default().with_indent(Indent::spaces(4));
    let out = String::from_utf8(doc.print_with_options(&options).unwrap()).unwrap();
    assert_eq!(
        out,
        "<config version=\"2\">\n    <port>-8080</port>\n    <flag/>\n</config>\n"
    );
}

#[rstest]
fn structural_dump_includes_format() {
    let doc = cfgparse::parse("[s]\nk=v\n", Format::Ini).unwrap();
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({
            "format": "ini",
            "roots": [{"name": "s", "kind": "empty", "attributes": {"k": "v"}}]
        })
    );
    assert_eq!(
        serde_json::to_value(Document::new()).unwrap(),
        json!({"format": null, "roots": []})
    );
}

#[rstest]
fn parallel_batch_matches_sequential() {
    let inputs = vec![r#"{"a":"1"}"#, r#"{"b":["x"]}"#, "not json"];
    let docs = cfgparse::parallel::parse_all(&inputs, Format::Json, &Default::default());
    assert!(docs[0].is_ok());
    assert!(docs[1].is_ok());
    assert_eq!(docs[2].as_ref().unwrap_err().kind, ErrorKind::Syntax);
}

#[rstest]
#[case(Format::Xml, "<a><b>x</b></a>", "<a><b><c/></b></a>")]
#[case(Format::Json, r#"{"a":{"b":"x"}}"#, r#"{"a":{"b":{"c":{}}}}"#)]
#[case(Format::Json, r#"{"a":["x"]}"#, r#"{"a":[["x"]]}"#)]
fn parse_and_print_agree_on_depth(#[case] format: Format, #[case] fits: &str, #[case] deeper: &str) {
    let parse_options = ParseOptions::default().with_max_depth(2);
    let print_options = PrintOptions::default().with_max_depth(2);

    let doc = cfgparse::parse_with_options(fits, format, &parse_options).unwrap();
    assert!(doc.print_with_options(&print_options).is_ok());

    let err = cfgparse::parse_with_options(deeper, format, &parse_options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthExceeded);
    let doc = cfgparse::parse(deeper, format).unwrap();
    let err = doc.print_with_options(&print_options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthExceeded);
}

#[rstest]
fn built_tree_respects_print_depth() {
    let mut doc = Document::empty(Format::Xml);
    let a = doc.append_root("a").unwrap();
    let b = doc.append_child(a, "b").unwrap();
    let options = PrintOptions::default().with_max_depth(2);
    assert!(doc.print_with_options(&options).is_ok());

    doc.append_child(b, "c").unwrap();
    let err = doc.print_with_options(&options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthExceeded);
}
