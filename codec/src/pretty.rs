//! Tree-based XML/HTML reformatter used for beautified HTTP bodies.
//!
//! Parsing is deliberately shallow: tags, text, comments, CDATA and
//! declarations are recognised, entities and namespaces are left as-is.
//! Whitespace-only text is dropped and every node is re-indented by two
//! spaces per level.

const INDENT: &str = "  ";

/// HTML elements that never have a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Markup dialect of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Strict nesting; a mismatched close tag fails.
    Xml,
    /// Lenient nesting with void elements.
    Html,
}

#[derive(Debug)]
enum Node {
    Element {
        /// Tag text between `<` and `>`, without a trailing `/`.
        open: String,
        name: String,
        children: Vec<Node>,
        close: Close,
    },
    Text(String),
    /// Comments, CDATA sections and declarations, copied verbatim.
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    Normal,
    SelfClosing,
    Void,
}

struct Open {
    open: String,
    name: String,
    children: Vec<Node>,
}

/// Reformats a markup body, or returns `None` when it cannot be parsed.
#[must_use]
pub fn beautify(body: &str, markup: Markup) -> Option<String> {
    let nodes = parse(body, markup)?;
    if nodes.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(body.len() + body.len() / 2);
    for node in &nodes {
        write_node(&mut out, node, 0);
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    Some(out)
}

fn parse(body: &str, markup: Markup) -> Option<Vec<Node>> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let (node, consumed) = if let Some(after) = rest.strip_prefix("<!--") {
            let end = after.find("-->")?;
            let len = "<!--".len() + end + "-->".len();
            (Some(Node::Raw(rest[..len].to_string())), len)
        } else if rest.starts_with("<![CDATA[") {
            let len = rest.find("]]>")? + "]]>".len();
            (Some(Node::Raw(rest[..len].to_string())), len)
        } else if rest.starts_with("<?") || rest.starts_with("<!") {
            let len = rest.find('>')? + 1;
            (Some(Node::Raw(rest[..len].to_string())), len)
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>')?;
            close_element(&mut root, &mut stack, after[..end].trim(), markup)?;
            (None, "</".len() + end + 1)
        } else if rest.starts_with('<') {
            let end = tag_end(rest)?;
            let inner = &rest[1..end];
            let self_closing = inner.ends_with('/');
            let open = inner.trim_end_matches('/').trim();
            let name = open.split_whitespace().next()?.to_string();
            let void = markup == Markup::Html
                && VOID_ELEMENTS
                    .iter()
                    .any(|void| void.eq_ignore_ascii_case(&name));
            if self_closing || void {
                let close = if self_closing {
                    Close::SelfClosing
                } else {
                    Close::Void
                };
                let node = Node::Element {
                    open: open.to_string(),
                    name,
                    children: Vec::new(),
                    close,
                };
                (Some(node), end + 1)
            } else {
                stack.push(Open {
                    open: open.to_string(),
                    name,
                    children: Vec::new(),
                });
                (None, end + 1)
            }
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let text = rest[..end].trim();
            let node = (!text.is_empty()).then(|| Node::Text(text.to_string()));
            (node, end)
        };

        if let Some(node) = node {
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => root.push(node),
            }
        }
        rest = &rest[consumed..];
    }

    if !stack.is_empty() {
        if markup == Markup::Xml {
            return None;
        }
        while let Some(open) = stack.pop() {
            attach(&mut root, &mut stack, open);
        }
    }
    Some(root)
}

/// Byte index of the `>` ending the tag at the start of `text`, skipping
/// quoted attribute values.
fn tag_end(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in text.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            (None, _) => {}
        }
    }
    None
}

fn close_element(root: &mut Vec<Node>, stack: &mut Vec<Open>, name: &str, markup: Markup) -> Option<()> {
    match markup {
        Markup::Xml => {
            let open = stack.pop()?;
            if open.name != name {
                return None;
            }
            attach(root, stack, open);
        }
        Markup::Html => {
            // Unmatched close tags are ignored; a match implicitly closes
            // everything opened after it.
            let Some(depth) = stack
                .iter()
                .rposition(|open| open.name.eq_ignore_ascii_case(name))
            else {
                return Some(());
            };
            while stack.len() > depth {
                let open = stack.pop()?;
                attach(root, stack, open);
            }
        }
    }
    Some(())
}

fn attach(root: &mut Vec<Node>, stack: &mut [Open], open: Open) {
    let node = Node::Element {
        open: open.open,
        name: open.name,
        children: open.children,
        close: Close::Normal,
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = INDENT.repeat(depth);
    match node {
        Node::Text(text) | Node::Raw(text) => {
            out.push_str(&indent);
            out.push_str(text);
            out.push('\n');
        }
        Node::Element {
            open,
            name,
            children,
            close,
        } => match (close, children.as_slice()) {
            (Close::SelfClosing, _) => out.push_str(&format!("{indent}<{open}/>\n")),
            (Close::Void, _) => out.push_str(&format!("{indent}<{open}>\n")),
            (Close::Normal, []) => out.push_str(&format!("{indent}<{open}></{name}>\n")),
            (Close::Normal, [Node::Text(text)]) => {
                out.push_str(&format!("{indent}<{open}>{text}</{name}>\n"));
            }
            (Close::Normal, children) => {
                out.push_str(&format!("{indent}<{open}>\n"));
                for child in children {
                    write_node(out, child, depth + 1);
                }
                out.push_str(&format!("{indent}</{name}>\n"));
            }
        },
    }
}
