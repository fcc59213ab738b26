//! EPUB packaging.
//!
//! Each section becomes one XHTML document with the heading as `<h1>` and
//! one `<p>` per paragraph. The container is EPUB 2: OPF package document,
//! NCX table of contents and a shared stylesheet.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::novel::Section;

const DEFAULT_LANGUAGE: &str = "zh";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const STYLESHEET: &str = "h1 {
  font-size: 1.4em;
  text-align: center;
  margin: 1em 0;
}
p {
  text-indent: 2em;
  margin: 0.3em 0;
  line-height: 1.6;
}
";

#[derive(Debug, Clone)]
struct Page {
    heading: String,
    href: String,
    paragraphs: Vec<String>,
}

/// Collects sections and writes them out as an EPUB archive.
#[derive(Debug, Clone)]
pub struct EpubBuilder {
    title: String,
    author: String,
    language: String,
    pages: Vec<Page>,
}

impl EpubBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            pages: Vec::new(),
        }
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.author = author.into();
        self
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = language.into();
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append a section. Fails if the heading is blank.
    pub fn add_section(&mut self, heading: &str, paragraphs: &[String]) -> Result<()> {
        let index = self.pages.len() + 1;
        if heading.trim().is_empty() {
            return Err(Error::EmptyHeading(index));
        }

        self.pages.push(Page {
            heading: heading.to_string(),
            href: format!("section_{index:04}.xhtml"),
            paragraphs: paragraphs.to_vec(),
        });
        Ok(())
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // mimetype must come first and uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;

        let identifier = self.identifier();

        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(self.render_opf(&identifier).as_bytes())?;

        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(self.render_ncx(&identifier).as_bytes())?;

        zip.start_file("OEBPS/style.css", deflated)?;
        zip.write_all(STYLESHEET.as_bytes())?;

        for page in &self.pages {
            zip.start_file(format!("OEBPS/{}", page.href), deflated)?;
            let body = render_section(&page.heading, &page.paragraphs, &self.language);
            zip.write_all(body.as_bytes())?;
        }

        zip.finish()?;
        debug!(title = %self.title, sections = self.pages.len(), "epub written");
        Ok(())
    }

    /// `dc:identifier` derived from title and author.
    fn identifier(&self) -> String {
        let digest = md5::compute(format!("{}\n{}", self.title, self.author));
        format!("urn:txt2epub:{digest:x}")
    }

    fn render_opf(&self, identifier: &str) -> String {
        let mut opf = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
        );
        opf.push_str(&format!(
            "    <dc:title>{}</dc:title>\n",
            escape_xml(&self.title)
        ));
        opf.push_str(&format!(
            "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
            escape_xml(identifier)
        ));
        opf.push_str(&format!(
            "    <dc:language>{}</dc:language>\n",
            escape_xml(&self.language)
        ));
        if !self.author.is_empty() {
            opf.push_str(&format!(
                "    <dc:creator opf:role=\"aut\">{}</dc:creator>\n",
                escape_xml(&self.author)
            ));
        }

        opf.push_str("  </metadata>\n  <manifest>\n");
        opf.push_str(
            "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
        );
        opf.push_str("    <item id=\"css\" href=\"style.css\" media-type=\"text/css\"/>\n");
        for page in &self.pages {
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
                href_to_id(&page.href),
                page.href
            ));
        }

        opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
        for page in &self.pages {
            opf.push_str(&format!(
                "    <itemref idref=\"{}\"/>\n",
                href_to_id(&page.href)
            ));
        }
        opf.push_str("  </spine>\n</package>\n");
        opf
    }

    fn render_ncx(&self, identifier: &str) -> String {
        let mut ncx = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>{}</text>
  </docTitle>
  <navMap>
"#,
            escape_xml(identifier),
            escape_xml(&self.title)
        );

        for (index, page) in self.pages.iter().enumerate() {
            let order = index + 1;
            ncx.push_str(&format!(
                "    <navPoint id=\"navpoint-{order}\" playOrder=\"{order}\">\n\
                 \x20     <navLabel>\n\
                 \x20       <text>{}</text>\n\
                 \x20     </navLabel>\n\
                 \x20     <content src=\"{}\"/>\n\
                 \x20   </navPoint>\n",
                escape_xml(&page.heading),
                page.href
            ));
        }

        ncx.push_str("  </navMap>\n</ncx>\n");
        ncx
    }
}

/// Package a finished, ordered list of sections.
pub fn build_epub(title: &str, author: &str, sections: &[Section]) -> Result<EpubBuilder> {
    let mut epub = EpubBuilder::new(title);
    epub.set_author(author);
    for section in sections {
        epub.add_section(&section.heading, &section.paragraphs)?;
    }
    Ok(epub)
}

fn render_section(heading: &str, paragraphs: &[String], language: &str) -> String {
    let heading = escape_xml(heading);
    let mut body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{}">
<head>
  <title>{heading}</title>
  <link rel="stylesheet" type="text/css" href="style.css"/>
</head>
<body>
<h1>{heading}</h1>
<p></p>
"#,
        escape_xml(language)
    );
    for paragraph in paragraphs {
        body.push_str("<p>");
        body.push_str(&escape_xml(paragraph));
        body.push_str("</p>\n");
    }
    body.push_str("</body>\n</html>\n");
    body
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn href_to_id(href: &str) -> String {
    href.replace(['/', '.', ' ', '-'], "_")
}
