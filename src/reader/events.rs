//! XML Event Types
//!
//! The event stream every pipeline stage consumes and produces. Events are
//! owned so they can be handed from one stage to the next.

/// Namespace-aware element name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Resolved namespace URI, if the element is in a namespace
    pub namespace: Option<String>,
    /// Local name (after colon)
    pub local_name: String,
    /// Name as written in the source, prefix included
    pub qualified_name: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local_name: &str, qualified_name: &str) -> Self {
        QName {
            namespace: namespace.map(str::to_owned),
            local_name: local_name.to_owned(),
            qualified_name: qualified_name.to_owned(),
        }
    }

    /// Unprefixed name in the given namespace
    pub fn local(namespace: &str, local_name: &str) -> Self {
        QName::new(Some(namespace), local_name, local_name)
    }

    /// Match on namespace URI and local name; the prefix is irrelevant
    #[inline]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }
}

/// Attribute as reported on a start element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name as written
    pub name: String,
    /// Value with entities decoded
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    StartDocument,
    /// Start of an element, attributes in source order
    StartElement { name: QName, attributes: Vec<Attribute> },
    /// Character data, CDATA included
    Characters(String),
    EndElement { name: QName },
    EndDocument,
}

impl XmlEvent {
    pub fn start(name: QName, attributes: Vec<Attribute>) -> Self {
        XmlEvent::StartElement { name, attributes }
    }

    pub fn end(name: QName) -> Self {
        XmlEvent::EndElement { name }
    }

    pub fn text(text: impl Into<String>) -> Self {
        XmlEvent::Characters(text.into())
    }

    /// Get the element name if this is a start or end element
    pub fn element_name(&self) -> Option<&QName> {
        match self {
            XmlEvent::StartElement { name, .. } | XmlEvent::EndElement { name } => Some(name),
            _ => None,
        }
    }
}

/// Look up an attribute value by qualified name
pub fn attribute_value<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}
