//! XML response document model
//!
//! Web service responses are small, so they are read into an owned tree and
//! queried with a handful of lookup helpers instead of being streamed.

use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{LastfmError, LastfmResult};

/// One element of a parsed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a complete XML document and return its root element
    pub fn parse(content: &str) -> LastfmResult<Self> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::with_capacity(8);
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Self::open(&e)?),
                Event::Empty(e) => {
                    let node = Self::open(&e)?;
                    Self::attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| {
                        LastfmError::MalformedResponse("unbalanced closing tag".to_string())
                    })?;
                    Self::attach(&mut stack, &mut root, node);
                }
                Event::Text(e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(LastfmError::MalformedResponse(
                "document ended inside an element".to_string(),
            ));
        }
        root.ok_or_else(|| LastfmError::MalformedResponse("empty document".to_string()))
    }

    fn open(start: &BytesStart<'_>) -> LastfmResult<Self> {
        let mut node = XmlNode {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Default::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attributes.push((key, value));
        }
        Ok(node)
    }

    fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                if root.is_none() {
                    *root = Some(node);
                }
            }
        }
    }

    /// Element name, including any namespace prefix (`opensearch:totalResults`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content of this element
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first direct child with the given name, `None` when absent or empty
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlNode::text).filter(|t| !t.is_empty())
    }

    /// All descendants (not including `self`) with the given name, in document order
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// First descendant with the given name
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find(name)
            }
        })
    }

    /// Text of the first descendant with the given name
    pub fn extract(&self, name: &str) -> Option<&str> {
        self.find(name).map(XmlNode::text)
    }

    /// Text of the `index`-th (0-based) descendant with the given name
    pub fn extract_nth(&self, name: &str, index: usize) -> Option<&str> {
        self.descendants(name).get(index).map(|n| n.text())
    }

    /// Text of every descendant with the given name
    pub fn extract_all(&self, name: &str) -> Vec<String> {
        self.descendants(name)
            .into_iter()
            .map(|n| n.text().to_string())
            .collect()
    }

    /// Like [`child_text`](Self::child_text) but missing is an error
    pub fn require_child_text(&self, name: &str) -> LastfmResult<&str> {
        self.child_text(name).ok_or_else(|| {
            LastfmError::MalformedResponse(format!("<{}> has no <{}>", self.name, name))
        })
    }

    /// First descendant with the given name, missing is an error
    pub fn require(&self, name: &str) -> LastfmResult<&XmlNode> {
        self.find(name).ok_or_else(|| {
            LastfmError::MalformedResponse(format!("<{}> has no <{}>", self.name, name))
        })
    }

    /// Parse an attribute value, missing or unparseable is an error
    pub fn parse_attr<T: FromStr>(&self, name: &str) -> LastfmResult<T> {
        let raw = self.attr(name).ok_or_else(|| {
            LastfmError::MalformedResponse(format!("<{}> has no {} attribute", self.name, name))
        })?;
        raw.trim().parse().map_err(|_| {
            LastfmError::MalformedResponse(format!(
                "<{}> attribute {}={:?} is not valid",
                self.name, name, raw
            ))
        })
    }

    /// Parse a child's text, `None` when absent, empty or unparseable
    pub fn parse_child<T: FromStr>(&self, name: &str) -> Option<T> {
        self.child_text(name).and_then(|t| t.parse().ok())
    }

    /// Parse a child's text, missing or unparseable is an error
    pub fn require_parse_child<T: FromStr>(&self, name: &str) -> LastfmResult<T> {
        let raw = self.require_child_text(name)?;
        raw.parse().map_err(|_| {
            LastfmError::MalformedResponse(format!("<{}> value {:?} is not valid", name, raw))
        })
    }
}

/// Parse a web service response and unwrap the `<lfm>` envelope
///
/// `status="failed"` responses become [`LastfmError`] values built from the
/// nested `<error code="..">` element.
pub fn parse_response(body: &str) -> LastfmResult<XmlNode> {
    let root = XmlNode::parse(body)?;
    if root.name() != "lfm" {
        return Err(LastfmError::MalformedResponse(format!(
            "expected <lfm> root, found <{}>",
            root.name()
        )));
    }

    match root.attr("status") {
        Some("ok") => Ok(root),
        Some("failed") => {
            let error = root.child("error").ok_or_else(|| {
                LastfmError::MalformedResponse("failed response without <error>".to_string())
            })?;
            let code = error.parse_attr::<i32>("code")?;
            Err(LastfmError::from_api(code, error.text().to_string()))
        }
        other => Err(LastfmError::MalformedResponse(format!(
            "unexpected lfm status {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP_ALBUMS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<lfm status="ok">
  <topalbums tag="disco">
    <album rank="1">
      <name>Discovery</name>
      <tagcount>105</tagcount>
      <artist>
        <name>Daft Punk</name>
      </artist>
    </album>
    <album rank="2">
      <name>Off the Wall</name>
      <tagcount>77</tagcount>
      <artist>
        <name>Michael Jackson</name>
      </artist>
    </album>
  </topalbums>
</lfm>"#;

    #[test]
    fn test_parse_tree() {
        let root = parse_response(TOP_ALBUMS).unwrap();
        let albums = root.descendants("album");
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].attr("rank"), Some("1"));
        assert_eq!(albums[0].child_text("name"), Some("Discovery"));
        assert_eq!(albums[1].extract_nth("name", 1), Some("Michael Jackson"));
    }

    #[test]
    fn test_extract_all_in_document_order() {
        let root = parse_response(TOP_ALBUMS).unwrap();
        assert_eq!(
            root.extract_all("name"),
            vec!["Discovery", "Daft Punk", "Off the Wall", "Michael Jackson"]
        );
    }

    #[test]
    fn test_entities_and_cdata() {
        let body = r#"<lfm status="ok"><wiki><summary>Rock &amp; Roll</summary><content><![CDATA[<b>bold</b>]]></content></wiki></lfm>"#;
        let root = parse_response(body).unwrap();
        assert_eq!(root.extract("summary"), Some("Rock & Roll"));
        assert_eq!(root.extract("content"), Some("<b>bold</b>"));
    }

    #[test]
    fn test_empty_element_is_attached() {
        let body = r#"<lfm status="ok"><weeklychartlist><chart from="1" to="2"/><chart from="2" to="3"/></weeklychartlist></lfm>"#;
        let root = parse_response(body).unwrap();
        let charts = root.descendants("chart");
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[1].parse_attr::<i64>("to").unwrap(), 3);
    }

    #[test]
    fn test_failed_status_maps_error() {
        let body = r#"<lfm status="failed"><error code="10">Invalid API key</error></lfm>"#;
        match parse_response(body) {
            Err(LastfmError::Api { code, message }) => {
                assert_eq!(code, 10);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_failed_status_not_found() {
        let body = r#"<lfm status="failed"><error code="6">Tag not found</error></lfm>"#;
        assert!(matches!(parse_response(body), Err(LastfmError::NotFound(_))));
    }

    #[test]
    fn test_wrong_root_rejected() {
        let body = r#"<html><body>oops</body></html>"#;
        assert!(matches!(
            parse_response(body),
            Err(LastfmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_truncated_document_rejected() {
        let body = r#"<lfm status="ok"><tags><tag>"#;
        assert!(parse_response(body).is_err());
    }

    #[test]
    fn test_namespaced_names_kept() {
        let body = r#"<lfm status="ok"><results xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/"><opensearch:totalResults>42</opensearch:totalResults></results></lfm>"#;
        let root = parse_response(body).unwrap();
        let results = root.require("results").unwrap();
        assert_eq!(results.parse_child::<u64>("opensearch:totalResults"), Some(42));
    }

    #[test]
    fn test_require_helpers_report_missing() {
        let root = parse_response(TOP_ALBUMS).unwrap();
        assert!(root.require("nothing").is_err());
        let album = root.require("album").unwrap();
        assert!(album.require_child_text("mbid").is_err());
        assert_eq!(album.require_parse_child::<u32>("tagcount").unwrap(), 105);
    }
}
