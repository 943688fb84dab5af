//! Rule tables for the WADL to HTML rewrite
//!
//! Rules are plain data: an element (WADL namespace, local name) in a parent
//! context maps to an action. Lookup takes the first matching rule, so more
//! specific rules come first.

/// The nearest open WADL element, as rules see it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'a> {
    pub element: &'a str,
    /// A `representation` whose mediaType is HTML
    pub html_representation: bool,
}

impl<'a> Context<'a> {
    pub fn element(element: &'a str) -> Self {
        Context {
            element,
            html_representation: false,
        }
    }
}

/// Where a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Under any parent, or at the root
    Any,
    /// Only as the document element
    Root,
    /// Only directly under this WADL element
    Element(&'static str),
    /// Only directly under a representation of HTML content
    HtmlRepresentation,
}

impl Parent {
    pub fn matches(self, parent: Option<Context<'_>>) -> bool {
        match self {
            Parent::Any => true,
            Parent::Root => parent.is_none(),
            Parent::Element(name) => parent.is_some_and(|p| p.element == name),
            Parent::HtmlRepresentation => parent.is_some_and(|p| p.html_representation),
        }
    }
}

/// Piece of a heading line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Text(&'static str),
    /// Attribute value with affixes, left out when the attribute is absent or empty
    Attr {
        prefix: &'static str,
        name: &'static str,
        suffix: &'static str,
    },
}

const fn attr(name: &'static str) -> Part {
    Part::Attr {
        prefix: "",
        name,
        suffix: "",
    }
}

const fn attr_in(prefix: &'static str, name: &'static str, suffix: &'static str) -> Part {
    Part::Attr { prefix, name, suffix }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    pub tag: &'static str,
    pub parts: &'static [Part],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrapper {
    pub tag: &'static str,
    pub class: &'static str,
    pub heading: Option<Heading>,
    /// Whether character data inside is kept
    pub text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The application element: becomes html, head and body
    Document,
    Wrap(Wrapper),
    /// Drop the element and its whole subtree
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub element: &'static str,
    pub parent: Parent,
    pub action: Action,
}

impl Rule {
    pub fn matches(&self, element: &str, parent: Option<Context<'_>>) -> bool {
        self.element == element && self.parent.matches(parent)
    }
}

const fn section(element: &'static str, class: &'static str, heading: Heading) -> Rule {
    Rule {
        element,
        parent: Parent::Any,
        action: Action::Wrap(Wrapper {
            tag: "div",
            class,
            heading: Some(heading),
            text: false,
        }),
    }
}

const fn heading(tag: &'static str, parts: &'static [Part]) -> Heading {
    Heading { tag, parts }
}

const RESOURCES_HEADING: &[Part] = &[Part::Text("Resources"), attr_in(" at ", "base", "")];
const RESOURCE_TYPE_HEADING: &[Part] = &[attr("id")];
const RESOURCE_HEADING: &[Part] = &[attr("path")];
const METHOD_HEADING: &[Part] = &[attr("name"), attr_in(" (", "id", ")"), attr("href")];
const REQUEST_HEADING: &[Part] = &[Part::Text("Request")];
const RESPONSE_HEADING: &[Part] = &[Part::Text("Response"), attr_in(" ", "status", "")];
const PARAM_HEADING: &[Part] = &[
    attr("name"),
    attr_in(" : ", "type", ""),
    attr_in(" [", "style", "]"),
    attr_in(" default ", "default", ""),
];
const OPTION_HEADING: &[Part] = &[attr("value"), attr_in(" (", "mediaType", ")")];
const REPRESENTATION_HEADING: &[Part] = &[attr("mediaType"), attr_in(" ", "element", ""), attr_in(" ", "href", "")];
const FAULT_HEADING: &[Part] = &[Part::Text("Fault"), attr_in(" ", "status", ""), attr_in(" ", "mediaType", "")];
const LINK_HEADING: &[Part] = &[Part::Text("Link"), attr_in(" ", "rel", ""), attr_in(" to ", "resource_type", "")];

/// Rules shared by both rule sets
pub static DOCUMENTATION: &[Rule] = &[
    Rule {
        element: "application",
        parent: Parent::Root,
        action: Action::Document,
    },
    Rule {
        element: "grammars",
        parent: Parent::Any,
        action: Action::Skip,
    },
    Rule {
        element: "doc",
        parent: Parent::Any,
        action: Action::Wrap(Wrapper {
            tag: "div",
            class: "doc",
            heading: None,
            text: true,
        }),
    },
    section("resources", "resources", heading("h2", RESOURCES_HEADING)),
    section("resource_type", "resource-type", heading("h3", RESOURCE_TYPE_HEADING)),
    section("resource", "resource", heading("h3", RESOURCE_HEADING)),
    section("method", "method", heading("h4", METHOD_HEADING)),
    section("request", "request", heading("h5", REQUEST_HEADING)),
    section("response", "response", heading("h5", RESPONSE_HEADING)),
    section("param", "param", heading("h6", PARAM_HEADING)),
    section("option", "option", heading("h6", OPTION_HEADING)),
    section("representation", "representation", heading("h6", REPRESENTATION_HEADING)),
    section("fault", "fault", heading("h6", FAULT_HEADING)),
    section("link", "link", heading("h6", LINK_HEADING)),
];

/// Tried before [`DOCUMENTATION`] when escaped HTML representations are expected
pub static HTML_REPRESENTATIONS: &[Rule] = &[Rule {
    element: "doc",
    parent: Parent::HtmlRepresentation,
    action: Action::Wrap(Wrapper {
        tag: "pre",
        class: "html-representation",
        heading: None,
        text: true,
    }),
}];

/// Inline styles for the generated page
pub const DEFAULT_CSS: &str = "\
body { font-family: sans-serif; margin: 1em 2em; }
h1, h2, h3 { color: #334; }
div.resource { border-top: 1px solid #ccc; margin-top: 1em; }
div.method, div.request, div.response { margin-left: 1.5em; }
div.param, div.representation, div.fault, div.option { margin-left: 1.5em; }
pre.html-representation { background: #f4f4f4; padding: 0.5em; }
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_matching() {
        let html = Context {
            element: "representation",
            html_representation: true,
        };
        assert!(Parent::Any.matches(None));
        assert!(Parent::Any.matches(Some(Context::element("x"))));
        assert!(Parent::Root.matches(None));
        assert!(!Parent::Root.matches(Some(Context::element("x"))));
        assert!(Parent::Element("representation").matches(Some(Context::element("representation"))));
        assert!(!Parent::Element("representation").matches(Some(Context::element("method"))));
        assert!(Parent::HtmlRepresentation.matches(Some(html)));
        assert!(!Parent::HtmlRepresentation.matches(Some(Context::element("representation"))));
        assert!(!Parent::HtmlRepresentation.matches(None));
    }

    #[test]
    fn test_application_only_matches_at_root() {
        let rule = DOCUMENTATION.iter().find(|r| r.element == "application").unwrap();
        assert!(rule.matches("application", None));
        assert!(!rule.matches("application", Some(Context::element("doc"))));
    }
}
