//! Event Source
//!
//! Opens a document from a filesystem path, a `file:` URL or an `http(s)`
//! URL and hands out a single forward-only pass over its events.

use super::events::XmlEvent;
use super::slice::SliceReader;
use crate::core::encoding::decode_document;
use crate::error::Error;
use log::debug;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::{Host, Url};

/// Where a document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Path(PathBuf),
    Url(Url),
}

impl Location {
    /// Interpret a string as a URL when it carries a scheme, as a path otherwise.
    ///
    /// Single-letter schemes are Windows drive letters, not URLs.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if url.scheme().len() > 1 => Location::Url(url),
            _ => Location::Path(PathBuf::from(location)),
        }
    }

    fn read(&self) -> Result<Vec<u8>, Error> {
        let path = match self {
            Location::Path(path) => path.clone(),
            Location::Url(url) if url.scheme() == "file" => {
                url.to_file_path().map_err(|_| Error::UnsupportedLocation {
                    location: self.to_string(),
                })?
            }
            Location::Url(url) if matches!(url.scheme(), "http" | "https") => {
                return fetch(url).map_err(|err| Error::SourceUnavailable {
                    location: self.to_string(),
                    source: io::Error::other(err),
                })
            }
            Location::Url(_) => {
                return Err(Error::UnsupportedLocation {
                    location: self.to_string(),
                })
            }
        };

        std::fs::read(&path).map_err(|source| Error::SourceUnavailable {
            location: self.to_string(),
            source,
        })
    }
}

fn fetch(url: &Url) -> reqwest::Result<Vec<u8>> {
    debug!("Fetching {}", url);
    let mut client = reqwest::blocking::Client::builder();
    if is_loopback(url) {
        client = client.no_proxy();
    }
    let response = client.build()?.get(url.as_str()).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Url(url) => write!(f, "{}", url),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Location::Url(url)
    }
}

/// A document loaded into memory, ready to be read as events
pub struct EventSource {
    location: Location,
    text: String,
}

impl EventSource {
    /// Read the document behind `location`.
    ///
    /// Fails with `SourceUnavailable` if it cannot be read; content problems
    /// other than an undecodable encoding are reported while pulling events.
    pub fn open(location: &Location) -> Result<Self, Error> {
        let bytes = location.read()?;
        let text = decode_document(bytes).map_err(|message| Error::MalformedInput {
            location: location.to_string(),
            line: 1,
            column: 1,
            message,
        })?;
        Ok(EventSource {
            location: location.clone(),
            text,
        })
    }

    /// Wrap a document that is already in memory
    pub fn from_text(location: Location, text: impl Into<String>) -> Self {
        EventSource {
            location,
            text: text.into(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Start the single pass over this document's events
    pub fn events(&self) -> Events<'_> {
        Events {
            reader: SliceReader::new(&self.text),
            location: &self.location,
        }
    }
}

/// Iterator over a source's events; stops after the first error
pub struct Events<'a> {
    reader: SliceReader<'a>,
    location: &'a Location,
}

impl Iterator for Events<'_> {
    type Item = Result<XmlEvent, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.next_event() {
            Ok(event) => event.map(Ok),
            Err(err) => {
                let (line, column) = self.reader.line_col(err.position);
                Some(Err(Error::MalformedInput {
                    location: self.location.to_string(),
                    line,
                    column,
                    message: err.message,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_parse_location() {
        assert!(matches!(Location::parse("src/main/wadl/api.wadl"), Location::Path(_)));
        assert!(matches!(Location::parse("C:\\wadl\\api.wadl"), Location::Path(_)));
        assert!(matches!(Location::parse("file:///tmp/api.wadl"), Location::Url(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let location = Location::parse("/nonexistent/definitely/missing.wadl");
        let err = EventSource::open(&location).err().expect("missing file must fail");
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_unsupported_scheme() {
        let location = Location::parse("ftp://example.com/api.wadl");
        let err = EventSource::open(&location).err().expect("ftp must be rejected");
        assert!(err.is_source_unavailable());
        assert!(matches!(err, Error::UnsupportedLocation { .. }));
    }

    /// Serve one HTTP response on a local port, returning the URL to fetch
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://127.0.0.1:{port}/application.wadl")
    }

    #[test]
    fn test_open_http_url() {
        let url = serve_once("200 OK", "<application><resources/></application>");
        let source = EventSource::open(&Location::parse(&url)).unwrap();
        assert_eq!(source.location().to_string(), url);
        assert_eq!(source.events().count(), 6);
    }

    #[test]
    fn test_http_error_status_is_unavailable() {
        let url = serve_once("404 Not Found", "");
        let err = EventSource::open(&Location::parse(&url)).err().expect("404 must fail");
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_unreachable_http_url_is_unavailable() {
        let location = Location::parse("http://localhost:1/application.wadl");
        let err = EventSource::open(&location).err().expect("nothing listens on port 1");
        match err {
            Error::SourceUnavailable { source, .. } => assert!(source.get_ref().is_some()),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_open_file_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<application/>").unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        let source = EventSource::open(&Location::Url(url)).unwrap();
        assert_eq!(source.events().count(), 4);
    }

    #[test]
    fn test_malformed_input_carries_line_and_column() {
        let source = EventSource::from_text(Location::parse("api.wadl"), "<a>\n  <b></c>\n</a>");
        let err = source.events().find_map(Result::err).unwrap();
        match err {
            Error::MalformedInput { line, column, location, .. } => {
                assert_eq!((line, column), (2, 6));
                assert_eq!(location, "api.wadl");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
