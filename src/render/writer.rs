//! Streaming markup output

use std::io;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::error::RenderResult;

/// Writes the rendered document incrementally; nothing is buffered as a tree
pub struct MarkupWriter<'w> {
    inner: Writer<&'w mut dyn io::Write>,
}

impl<'w> MarkupWriter<'w> {
    /// Write to any byte sink
    pub fn new(out: &'w mut dyn io::Write) -> Self {
        Self {
            inner: Writer::new(out),
        }
    }

    /// Open an element
    pub fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> RenderResult<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    /// Close an element
    pub fn end_element(&mut self, name: &str) -> RenderResult<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write a self-closing element
    pub fn empty_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> RenderResult<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.inner.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Write character data; only `<`, `>` and `&` are escaped, quotes stay literal
    pub fn text(&mut self, text: &str) -> RenderResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.inner
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        Ok(())
    }

    /// Write a comment; `--` sequences are broken up to keep the comment well-formed
    pub fn comment(&mut self, text: &str) -> RenderResult<()> {
        let mut sanitized = text.replace("--", "- -");
        if sanitized.ends_with('-') {
            sanitized.push(' ');
        }
        let body = format!(" {sanitized} ");
        self.inner
            .write_event(Event::Comment(BytesText::from_escaped(body.as_str())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn written(f: impl FnOnce(&mut MarkupWriter<'_>) -> RenderResult<()>) -> String {
        let mut out = Vec::new();
        {
            let mut writer = MarkupWriter::new(&mut out);
            f(&mut writer).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_elements_and_escaping() {
        let html = written(|w| {
            w.start_element("td", &[("title", "a \"b\" <c>")])?;
            w.text("1 < 2 & 3")?;
            w.end_element("td")?;
            w.empty_element("br", &[])
        });
        assert_eq!(
            html,
            r#"<td title="a &quot;b&quot; &lt;c&gt;">1 &lt; 2 &amp; 3</td><br/>"#
        );
    }

    #[test]
    fn test_text_keeps_quotes_literal() {
        let html = written(|w| w.text(r#"Invalid element 'if' at "x" > y"#));
        assert_eq!(html, r#"Invalid element 'if' at "x" &gt; y"#);
    }

    #[test]
    fn test_comment_is_sanitized() {
        let html = written(|w| w.comment("a--b-"));
        assert_eq!(html, "<!-- a- -b-  -->");
    }
}
