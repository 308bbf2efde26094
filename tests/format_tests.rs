use serde::Serialize;
use wax::template::substitute;
use wax::{
    entry, node, parse, render, render_with_options, to_entry, to_node, Entry, Error, Node,
    RenderOptions,
};

#[derive(Serialize)]
struct Endpoint {
    path: String,
    methods: Vec<&'static str>,
}

#[derive(Serialize)]
enum Mode {
    Active,
    Standby { since: u32 },
}

#[derive(Serialize)]
struct Service {
    name: String,
    replicas: Option<u8>,
    timeout: Option<f64>,
    mode: Mode,
    endpoints: Vec<Endpoint>,
}

#[test]
fn test_struct_layout() {
    let service = Service {
        name: "gateway".to_string(),
        replicas: Some(3),
        timeout: None,
        mode: Mode::Active,
        endpoints: vec![Endpoint {
            path: "/health".to_string(),
            methods: vec!["GET"],
        }],
    };
    let text = render(&to_node(&service).unwrap()).unwrap();
    assert_eq!(
        text,
        "name = \"gateway\"\nreplicas = 3\ntimeout = null\nmode = \"Active\"\nendpoints = [{\"path\":\"/health\",\"methods\":[\"GET\"]}]\n"
    );
}

#[test]
fn test_struct_variant_becomes_section() {
    let node = to_node(&node_source()).unwrap();
    assert_eq!(node.get("mode.Standby.since").unwrap().as_i64(), Some(12));
    assert_eq!(
        render(&node).unwrap(),
        "name = \"standby\"\nreplicas = null\ntimeout = 2.5\nendpoints = []\n\n[mode]\n\n[mode.Standby]\nsince = 12\n"
    );
}

fn node_source() -> Service {
    Service {
        name: "standby".to_string(),
        replicas: None,
        timeout: Some(2.5),
        mode: Mode::Standby { since: 12 },
        endpoints: Vec::new(),
    }
}

#[test]
fn test_to_entry_keeps_objects_inline() {
    let entry = to_entry(&node_source()).unwrap();
    let map = entry.as_object().unwrap();
    assert!(map.get("mode").unwrap().is_object());
    assert_eq!(
        map.get("mode").unwrap().to_string(),
        r#"{"Standby":{"since":12}}"#
    );
}

#[test]
fn test_to_node_requires_a_map() {
    assert!(matches!(to_node(&vec![1, 2]), Err(Error::UnsupportedValue(_))));
    assert!(matches!(to_node(&"text"), Err(Error::UnsupportedValue(_))));
}

#[test]
fn test_section_spacing_option() {
    let config = node! { "a": 1, "b": { "c": 2 }, "d": { "e": 3 } };

    let spaced = render(&config).unwrap();
    assert_eq!(spaced, "a = 1\n\n[b]\nc = 2\n\n[d]\ne = 3\n");

    let tight = render_with_options(&config, RenderOptions::new().with_section_spacing(false)).unwrap();
    assert_eq!(tight, "a = 1\n[b]\nc = 2\n[d]\ne = 3\n");
    assert_eq!(parse(&tight).unwrap(), parse(&spaced).unwrap());
}

#[test]
fn test_comments_option() {
    let mut config = node! { "a": 1 };
    config.set_comment("a", "first").unwrap();
    config.set_annotation("a", "checked").unwrap();
    config.set_trailing_comment("end");

    assert_eq!(render(&config).unwrap(), "# first\n; checked\na = 1\n# end\n");
    let bare = render_with_options(&config, RenderOptions::new().with_comments(false)).unwrap();
    assert_eq!(bare, "a = 1\n");
}

#[test]
fn test_trailing_comment_round_trip() {
    let text = "a = 1\n\n# closing remark\n; and a note\n";
    let node = parse(text).unwrap();
    assert_eq!(node.trailing_comment(), Some("closing remark\nand a note"));
    assert_eq!(render(&node).unwrap(), "a = 1\n# closing remark\n# and a note\n");
}

#[test]
fn test_blank_comment_lines() {
    let node = parse("#\n# two\n#\nkey = 1\n").unwrap();
    assert_eq!(node.comment("key"), Some("\ntwo\n"));
    assert_eq!(render(&node).unwrap(), "#\n# two\n#\nkey = 1\n");
}

#[test]
fn test_crlf_and_bom() {
    let node = parse("\u{feff}a = 1\r\n[s]\r\nb = \"x\"\r\n").unwrap();
    assert_eq!(node, node! { "a": 1, "s": { "b": "x" } });
}

#[test]
fn test_indented_lines() {
    let node = parse("  [s]\n\tkey = [1,\n    2]\n").unwrap();
    assert_eq!(node.get("s.key").unwrap(), &entry!([1, 2]));
}

#[test]
fn test_error_positions() {
    match parse("a = 1\nb = tru\n") {
        Err(Error::Syntax { line, column, .. }) => assert_eq!((line, column), (2, 5)),
        other => panic!("unexpected result: {:?}", other),
    }
    match parse("a = 1\n\n[s\n") {
        Err(Error::Syntax { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(parse("x = \"\\ud800\"").unwrap_err().line(), Some(1));
}

#[test]
fn test_parse_rejects_trailing_garbage() {
    for text in ["a = 1 2", "a = \"x\" # no inline comments", "[s] extra", "a = {\"k\": 1,}"] {
        assert!(parse(text).unwrap_err().is_syntax(), "{:?}", text);
    }
}

#[test]
fn test_numbers_keep_their_kind() {
    let node = parse("i = 10\nf = 10.0\ne = 1e2\nbig = 99999999999999999999\n").unwrap();
    assert_eq!(node["i"], Entry::from(10));
    assert_eq!(node["f"], Entry::from(10.0));
    assert_eq!(node["e"], Entry::from(100.0));
    assert!(node["big"].as_f64().is_some());
    assert_eq!(node["big"].as_i64(), None);
    assert_eq!(node["big"].kind(), "an integer");
    assert_eq!(
        render(&node).unwrap(),
        "i = 10\nf = 10.0\ne = 100.0\nbig = 99999999999999999999\n"
    );
}

#[test]
fn test_render_rejects_unrepresentable() {
    let nan = node! { "x": f64::NAN };
    assert!(matches!(render(&nan), Err(Error::UnsupportedValue(_))));

    let mut dotted = Node::new();
    dotted.insert("a.b", Node::new()).unwrap();
    assert!(matches!(render(&dotted), Err(Error::UnsupportedValue(_))));

    let nested = node! { "list": [Entry::Child(Node::new())] };
    assert!(matches!(render(&nested), Err(Error::UnsupportedValue(_))));
}

#[test]
fn test_substitute_against_document() {
    let config = parse(
        "user = \"app\"\n[db]\nhost = \"db1\"\nport = 5432\nopts = {\"ssl\": true}\n",
    )
    .unwrap();
    let flat = config.flat();
    assert_eq!(
        substitute("%(user)s@%(db.host)s:%(db.port)s %(db.opts)s 100%%", &flat).unwrap(),
        "app@db1:5432 {\"ssl\":true} 100%"
    );
    match substitute("%(db.user)s", &flat) {
        Err(Error::KeyNotFound { path }) => assert_eq!(path, "db.user"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(substitute("%(db", &flat), Err(Error::Template { offset: 0, .. })));
}
