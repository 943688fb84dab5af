//! Namespace Resolution
//!
//! Stack-based namespace resolver for XML namespace handling.

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
    pub const WADL: &str = "http://research.sun.com/wadl/2006/10";
    pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
}

/// Namespace binding (prefix -> URI); the default namespace has an empty prefix
#[derive(Debug, Clone)]
struct NsBinding {
    prefix: String,
    uri: String,
    depth: usize,
}

/// Stack-based namespace resolver
#[derive(Debug)]
pub struct NamespaceResolver {
    /// Stack of namespace bindings
    bindings: Vec<NsBinding>,
    /// Current element depth
    depth: usize,
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceResolver {
    /// Create a new namespace resolver with the `xml` prefix pre-bound
    pub fn new() -> Self {
        let mut bindings = Vec::with_capacity(16);
        bindings.push(NsBinding {
            prefix: "xml".to_owned(),
            uri: ns::XML.to_owned(),
            depth: 0,
        });
        NamespaceResolver { bindings, depth: 0 }
    }

    /// Enter a new element scope
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it
    pub fn pop_scope(&mut self) {
        while self.bindings.last().is_some_and(|b| b.depth >= self.depth && b.depth > 0) {
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a binding in the current scope from an `xmlns` / `xmlns:p` attribute.
    ///
    /// An empty URI on the default namespace undeclares it.
    pub fn declare(&mut self, attribute_name: &str, uri: &str) -> Result<(), &'static str> {
        let prefix = match attribute_name.strip_prefix("xmlns") {
            Some("") => "",
            Some(rest) => rest.strip_prefix(':').ok_or("Malformed namespace declaration")?,
            None => return Err("Not a namespace declaration"),
        };

        match prefix {
            "xmlns" => return Err("The xmlns prefix cannot be declared"),
            "xml" if uri != ns::XML => return Err("The xml prefix cannot be rebound"),
            "xml" => return Ok(()),
            p if !p.is_empty() && uri.is_empty() => {
                return Err("A namespace prefix cannot be bound to an empty URI")
            }
            _ => {}
        }

        self.bindings.push(NsBinding {
            prefix: prefix.to_owned(),
            uri: uri.to_owned(),
            depth: self.depth,
        });
        Ok(())
    }

    /// Resolve a prefix to a namespace URI; `""` resolves the default namespace.
    ///
    /// Returns `Ok(None)` for an element without any namespace and an error
    /// for a prefix nobody declared.
    pub fn resolve(&self, prefix: &str) -> Result<Option<&str>, &'static str> {
        // Search from most recent to oldest
        match self.bindings.iter().rev().find(|b| b.prefix == prefix) {
            Some(binding) if binding.uri.is_empty() => Ok(None),
            Some(binding) => Ok(Some(binding.uri.as_str())),
            None if prefix.is_empty() => Ok(None),
            None => Err("Undeclared namespace prefix"),
        }
    }

    /// Get current depth
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Split a qualified name into prefix and local name at the colon
pub fn split_qname(name: &str) -> (&str, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", name),
    }
}
