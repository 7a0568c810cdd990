//! HTML parsing into the owned document tree.
//!
//! html5ever does the heavy lifting; the rcdom it produces is converted
//! into the arena representation and dropped. Comments, doctypes and
//! processing instructions are not carried over.

use html5ever::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::{Document, NodeId};

/// Parse an HTML string into a [`Document`].
///
/// html5ever recovers from malformed markup the same way browsers do, so
/// this never fails; a garbage input just produces a skeletal tree.
pub fn parse_html(html: &str) -> Document {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default()).one(html);

    let mut doc = Document::empty();
    let root = doc.root();
    convert_children(&dom.document, &mut doc, root);
    doc
}

fn convert_children(handle: &Handle, doc: &mut Document, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            RcNodeData::Element { name, attrs, .. } => {
                let id = doc.create_element(name.local.as_ref());
                for attr in attrs.borrow().iter() {
                    doc.set_attr(id, attr.name.local.as_ref(), &attr.value);
                }
                doc.append(parent, id);
                convert_children(child, doc, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.is_empty() {
                    let id = doc.create_text(text);
                    doc.append(parent, id);
                }
            }
            // Comments, doctype, PI: not represented
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_page() {
        let doc = parse_html(
            r#"<html><body><article><p>Happy Friday! Here's my 5x5</p>
            <img src="https://pbs.example/media/abc.jpg" width="800" height="600">
            </article></body></html>"#,
        );

        let body = doc.body();
        let article = doc
            .descendants(body)
            .find(|&id| doc.tag(id) == Some("article"))
            .unwrap();
        assert!(doc.inner_text(article).contains("5x5"));

        let img = doc
            .descendants(article)
            .find(|&id| doc.tag(id) == Some("img"))
            .unwrap();
        assert_eq!(doc.attr(img, "width"), Some("800"));
        assert!(doc.attr(img, "src").unwrap().contains("media"));
    }

    #[test]
    fn test_parse_recovers_fragments() {
        // No html/body wrapper in the input; the parser synthesizes them.
        let doc = parse_html("<div data-testid=\"tweetPhoto\"><img src=\"x\"></div>");
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert!(
            doc.descendants(doc.body())
                .any(|id| doc.attr(id, "data-testid") == Some("tweetPhoto"))
        );
    }

    #[test]
    fn test_parse_skips_comments() {
        let doc = parse_html("<body><!-- hidden --><p>shown</p></body>");
        assert_eq!(doc.inner_text(doc.body()), "shown");
    }
}
