//! HTML serialization of the owned document tree.

use super::{DOCUMENT_TAG, Document, NodeData, NodeId};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serialize a node and its subtree to HTML. The synthetic `#document`
/// container serializes as its children only.
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.data(id) {
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Element(el) => {
            let tag = el.tag();
            if tag == DOCUMENT_TAG {
                for &child in doc.children(id) {
                    write_node(doc, child, out);
                }
                return;
            }

            out.push('<');
            out.push_str(tag);
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            for &child in doc.children(id) {
                write_node(doc, child, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use crate::dom::{Document, parse_html};

    #[test]
    fn test_serialize_roundtrips_structure() {
        let doc = parse_html(r#"<body><article><img src="a.png" width="10"></article></body>"#);
        let html = doc.to_html();
        assert!(html.contains("<article><img src=\"a.png\" width=\"10\"></article>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_serialize_escapes() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.create_element_with("p", &[("title", "a\"b&c")]);
        doc.append(body, p);
        let t = doc.create_text("1 < 2 & 3");
        doc.append(p, t);

        let html = doc.to_html();
        assert!(html.contains(r#"title="a&quot;b&amp;c""#));
        assert!(html.contains("1 &lt; 2 &amp; 3"));
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let doc = parse_html("<body><img src=\"x\"></body>");
        let html = doc.to_html();
        assert!(html.contains("<img src=\"x\">"));
        assert!(!html.contains("</img>"));
    }
}
