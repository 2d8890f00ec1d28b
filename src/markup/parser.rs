// src/markup/parser.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{normalize_text, Node, TagRole};

// --- CSS Selectors (Lazy Static) ---
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("Failed to compile CELL_SELECTOR"));

/// Parses `html` and maps every element, in document order, to a role-tagged
/// node. The segmenter consumes the resulting sequence and never touches the
/// DOM itself. Parsing is lenient; malformed markup yields whatever nodes the
/// parser can recover, never an error.
pub fn parse_nodes(html: &str) -> Vec<Node> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(element_to_node)
        .collect()
}

fn element_to_node(element: ElementRef) -> Node {
    let text: String = element.text().collect();

    match element.value().name() {
        "h1" => Node::new(TagRole::Heading1, text),
        "h2" => Node::new(TagRole::Heading2, text),
        "h3" => Node::new(TagRole::Heading3, text),
        "table" => Node::table(text, collect_rows(element)),
        "body" => Node::new(TagRole::Body, text),
        "span" | "meta" | "a" | "ul" | "li" => Node::new(TagRole::Structural, text),
        _ => Node::new(TagRole::Text, text),
    }
}

/// Extracts the row/cell structure of a table element. Cell text is
/// normalized; row and column order follow the document.
fn collect_rows(table: ElementRef) -> Vec<Vec<String>> {
    table
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| normalize_text(&cell.text().collect::<String>()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(nodes: &[Node]) -> Vec<TagRole> {
        nodes.iter().map(|n| n.role).collect()
    }

    #[test]
    fn maps_tags_to_roles_in_document_order() {
        let html = r#"
            <html><body>
            <h2>Theorem</h2>
            <p>Let x be prime.</p>
            <span>inline</span>
            <ul><li>item</li></ul>
            </body></html>
        "#;

        let nodes = parse_nodes(html);
        // html and head are plain Text roles; body precedes its children.
        assert_eq!(
            roles(&nodes),
            vec![
                TagRole::Text,       // html
                TagRole::Text,       // head
                TagRole::Body,
                TagRole::Heading2,
                TagRole::Text,       // p
                TagRole::Structural, // span
                TagRole::Structural, // ul
                TagRole::Structural, // li
            ]
        );

        let heading = &nodes[3];
        assert_eq!(heading.text, "Theorem");
        assert_eq!(nodes[4].text, "Let x be prime.");
    }

    #[test]
    fn table_nodes_carry_normalized_rows() {
        let html = r#"
            <table>
              <tr><th> a </th><th>b</th></tr>
              <tr><td>1</td><td>2
              3</td></tr>
            </table>
        "#;

        let nodes = parse_nodes(html);
        let table = nodes
            .iter()
            .find(|n| n.role == TagRole::Table)
            .expect("table node missing");

        assert_eq!(
            table.rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2 3".to_string()],
            ]
        );
        assert_eq!(table.text, "a b 1 2 3");
    }

    #[test]
    fn body_text_is_full_document_text() {
        let html = "<body><h1>T</h1><p>x</p></body>";
        let nodes = parse_nodes(html);
        let body = nodes
            .iter()
            .find(|n| n.role == TagRole::Body)
            .expect("body node missing");
        assert_eq!(body.text, "Tx");
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let nodes = parse_nodes("<h2>unclosed<table><tr><td>cell");
        assert!(nodes.iter().any(|n| n.role == TagRole::Heading2));
        assert!(nodes.iter().any(|n| n.role == TagRole::Table));
    }
}
