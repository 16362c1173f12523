//! Sitemap and RSS feed generation.
//!
//! Documents with `published: false` are left out of both outputs.

use std::cmp::Reverse;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use docgen_content::Document;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// XML namespace of the sitemap protocol.
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Public site information embedded in the sitemap and feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    /// Absolute base URL without trailing slash.
    pub url: String,
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Documentation".to_owned(),
            description: String::new(),
            url: "http://localhost:3000".to_owned(),
            language: "en".to_owned(),
        }
    }
}

impl SiteInfo {
    /// Absolute URL for a site-relative href.
    #[must_use]
    pub fn absolute_url(&self, href: &str) -> String {
        let base = self.url.trim_end_matches('/');
        if href == "/" {
            base.to_owned()
        } else {
            format!("{base}{href}")
        }
    }
}

/// Error writing XML output.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("XML write error: {0}")]
    Xml(String),
}

/// Parse a frontmatter date (`YYYY-MM-DD` or RFC 3339).
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Last modification date of a document, if declared.
fn document_updated(doc: &Document) -> Option<DateTime<Utc>> {
    let fm = &doc.frontmatter;
    fm.last_modified
        .as_deref()
        .and_then(parse_date)
        .or_else(|| fm.date.as_deref().and_then(parse_date))
}

/// Thin wrapper over the quick-xml writer with string-typed errors.
struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Result<Self, FeedError> {
        let mut writer = Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        writer.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(writer)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), FeedError> {
        self.inner
            .write_event(event)
            .map_err(|e| FeedError::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), FeedError> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.event(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<(), FeedError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn element(&mut self, name: &str, text: &str) -> Result<(), FeedError> {
        self.start(name, &[])?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String, FeedError> {
        String::from_utf8(self.inner.into_inner()).map_err(|e| FeedError::Xml(e.to_string()))
    }
}

/// Render `sitemap.xml`.
///
/// The home URL comes first (priority 1.0, daily), then every non-root
/// document (priority 0.8, weekly). `lastmod` uses the document's declared
/// date, falling back to `generated_at`.
///
/// # Errors
///
/// Returns [`FeedError`] if XML serialisation fails.
pub fn render_sitemap(
    site: &SiteInfo,
    documents: &[Document],
    generated_at: DateTime<Utc>,
) -> Result<String, FeedError> {
    let mut xml = XmlWriter::new()?;
    xml.start("urlset", &[("xmlns", SITEMAP_NS)])?;

    let home_updated = documents
        .iter()
        .find(|doc| doc.slug.is_root())
        .and_then(document_updated)
        .unwrap_or(generated_at);
    write_url(&mut xml, &site.absolute_url("/"), home_updated, "daily", "1.0")?;

    for doc in documents
        .iter()
        .filter(|doc| !doc.slug.is_root() && doc.is_published())
    {
        let updated = document_updated(doc).unwrap_or(generated_at);
        write_url(&mut xml, &site.absolute_url(&doc.href()), updated, "weekly", "0.8")?;
    }

    xml.end("urlset")?;
    xml.finish()
}

fn write_url(
    xml: &mut XmlWriter,
    loc: &str,
    lastmod: DateTime<Utc>,
    changefreq: &str,
    priority: &str,
) -> Result<(), FeedError> {
    xml.start("url", &[])?;
    xml.element("loc", loc)?;
    xml.element("lastmod", &lastmod.to_rfc3339_opts(SecondsFormat::Secs, true))?;
    xml.element("changefreq", changefreq)?;
    xml.element("priority", priority)?;
    xml.end("url")
}

/// Render an RSS 2.0 `feed.xml`.
///
/// Dated documents come first, newest first; undated documents follow,
/// sorted by title. Items without a date use `generated_at`.
///
/// # Errors
///
/// Returns [`FeedError`] if XML serialisation fails.
pub fn render_feed(
    site: &SiteInfo,
    documents: &[Document],
    generated_at: DateTime<Utc>,
) -> Result<String, FeedError> {
    let mut items: Vec<(&Document, Option<DateTime<Utc>>)> = documents
        .iter()
        .filter(|doc| doc.is_published())
        .map(|doc| (doc, doc.frontmatter.date.as_deref().and_then(parse_date)))
        .collect();
    items.sort_by(|(a, a_date), (b, b_date)| {
        a_date
            .is_none()
            .cmp(&b_date.is_none())
            .then_with(|| Reverse(a_date).cmp(&Reverse(b_date)))
            .then_with(|| a.title().cmp(b.title()))
    });

    let mut xml = XmlWriter::new()?;
    xml.start("rss", &[("version", "2.0")])?;
    xml.start("channel", &[])?;
    xml.element("title", &site.name)?;
    xml.element("link", &site.absolute_url("/"))?;
    xml.element("description", &site.description)?;
    xml.element("language", &site.language)?;
    xml.element(
        "copyright",
        &format!("All rights reserved {}, {}", generated_at.year(), site.name),
    )?;
    xml.element("lastBuildDate", &generated_at.to_rfc2822())?;

    for (doc, date) in items {
        let link = site.absolute_url(&doc.href());
        xml.start("item", &[])?;
        xml.element("title", doc.title())?;
        xml.element("link", &link)?;
        xml.element("guid", &link)?;
        xml.element("description", doc.description().unwrap_or_default())?;
        xml.element("pubDate", &date.unwrap_or(generated_at).to_rfc2822())?;
        if let Some(author) = &doc.frontmatter.author {
            xml.element("author", author)?;
        }
        for tag in &doc.frontmatter.tags {
            xml.element("category", tag)?;
        }
        xml.end("item")?;
    }

    xml.end("channel")?;
    xml.end("rss")?;
    xml.finish()
}
