//! Lexical/tree reader: bytes to a generic, namespace-resolved element tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::core::{ISDOC_NAMESPACE, IsdocError};

/// Nesting deeper than this is rejected.
const MAX_DEPTH: usize = 256;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: Option<String>,
    pub local: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: String,
}

/// One element with its attributes, children and concatenated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QualifiedName,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
    pub text: String,
    /// Byte offset of the start tag.
    pub position: u64,
}

impl Element {
    fn new(name: QualifiedName, attributes: Vec<Attribute>, position: u64) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
            position,
        }
    }

    /// True when this element is `local` in the ISDOC namespace.
    pub fn is_isdoc(&self, local: &str) -> bool {
        self.name.local == local && self.name.namespace.as_deref() == Some(ISDOC_NAMESPACE)
    }

    /// ISDOC-namespace children named `local`, in document order.
    pub fn isdoc_children<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is_isdoc(local))
    }

    /// Value of an unqualified attribute.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }
}

/// Read `bytes` into a tree rooted at an ISDOC-namespace element.
///
/// The input must be UTF-8 (an optional BOM is skipped). DTDs are rejected
/// outright, so no entity beyond the five predefined ones and character
/// references can be expanded.
pub fn read_tree(bytes: &[u8]) -> Result<Element, IsdocError> {
    let (body, offset) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, UTF8_BOM.len() as u64),
        None => (bytes, 0),
    };
    let text = std::str::from_utf8(body).map_err(|e| {
        IsdocError::malformed(
            format!("invalid UTF-8: {e}"),
            bytes,
            offset + e.valid_up_to() as u64,
        )
    })?;

    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let malformed = |message: String, position: u64| {
        IsdocError::malformed(message, bytes, offset + position)
    };

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let start = reader.buffer_position();
        let (namespace, event) = match reader.read_resolved_event() {
            Ok(resolved) => resolved,
            Err(e) => return Err(malformed(e.to_string(), reader.error_position())),
        };
        let namespace = owned_namespace(namespace);

        match event {
            Event::Start(_) | Event::Empty(_) if root.is_some() && stack.is_empty() => {
                return Err(malformed("second root element".into(), start));
            }
            Event::Start(e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed(
                        format!("elements nested deeper than {MAX_DEPTH} levels"),
                        start,
                    ));
                }
                let element = open_element(&reader, &e, namespace, start)
                    .map_err(|m| malformed(m, start))?;
                check_root(&stack, &element).map_err(|m| malformed(m, start))?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = open_element(&reader, &e, namespace, start)
                    .map_err(|m| malformed(m, start))?;
                check_root(&stack, &element).map_err(|m| malformed(m, start))?;
                close_element(&mut stack, &mut root, element);
            }
            Event::End(_) => match stack.pop() {
                Some(element) => close_element(&mut stack, &mut root, element),
                None => return Err(malformed("unexpected end tag".into(), start)),
            },
            Event::Text(t) => {
                let content = t
                    .unescape()
                    .map_err(|e| malformed(e.to_string(), start))?;
                append_text(&mut stack, &content).map_err(|m| malformed(m, start))?;
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let content = std::str::from_utf8(&raw)
                    .map_err(|e| malformed(format!("invalid UTF-8 in CDATA: {e}"), start))?;
                append_text(&mut stack, content).map_err(|m| malformed(m, start))?;
            }
            Event::Decl(decl) => {
                if let Some(encoding) = decl.encoding() {
                    let encoding = encoding.map_err(|e| malformed(e.to_string(), start))?;
                    let name = String::from_utf8_lossy(&encoding);
                    if !matches!(name.to_ascii_lowercase().as_str(), "utf-8" | "utf8") {
                        return Err(malformed(
                            format!("unsupported encoding '{name}', expected UTF-8"),
                            start,
                        ));
                    }
                }
            }
            Event::DocType(_) => {
                return Err(malformed("DOCTYPE declarations are not allowed".into(), start));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::PI(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(IsdocError::malformed(
            format!("unexpected end of input inside <{}>", open.name.local),
            bytes,
            bytes.len() as u64,
        ));
    }
    let root = root.ok_or_else(|| {
        IsdocError::malformed("document has no root element", bytes, bytes.len() as u64)
    })?;
    log::debug!(
        "read tree rooted at <{}> with {} children",
        root.name.local,
        root.children.len()
    );
    Ok(root)
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        )),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    namespace: Result<Option<String>, String>,
    position: u64,
) -> Result<Element, String> {
    let namespace = namespace?;
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, attr_local) = reader.resolve_attribute(attr.key);
        let attr_namespace = owned_namespace(resolved)?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attributes.push(Attribute {
            name: QualifiedName {
                namespace: attr_namespace,
                local: String::from_utf8_lossy(attr_local.as_ref()).into_owned(),
            },
            value: value.into_owned(),
        });
    }

    Ok(Element::new(QualifiedName { namespace, local }, attributes, position))
}

fn check_root(stack: &[Element], element: &Element) -> Result<(), String> {
    if stack.is_empty() && element.name.namespace.as_deref() != Some(ISDOC_NAMESPACE) {
        return Err(format!(
            "root element <{}> is not in namespace {ISDOC_NAMESPACE}",
            element.name.local
        ));
    }
    Ok(())
}

fn close_element(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [Element], content: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(element) => {
            element.text.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err("text outside the root element".into()),
    }
}
