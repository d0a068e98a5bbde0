//! Output buffer for the HTML renderer.

use super::Options;

/// Accumulates HTML while the tree is walked.
///
/// Markup goes through [`Context::push_raw`]; anything that came from the
/// document goes through [`Context::push_text`] or
/// [`Context::push_attr_value`] so it is always escaped.
pub struct Context<'a> {
    html: String,
    options: &'a Options,
}

impl<'a> Context<'a> {
    /// Creates a new context sized for roughly `capacity` bytes of output.
    pub fn new(options: &'a Options, capacity: usize) -> Self {
        Self {
            html: String::with_capacity(capacity),
            options,
        }
    }

    /// Writes a raw string to the buffer without escaping (for safe HTML tags).
    pub fn push_raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Writes text content with `&`, `<`, `>` and `"` escaped.
    pub fn push_text(&mut self, s: &str) {
        self.html
            .push_str(&html_escape::encode_double_quoted_attribute(s));
    }

    /// Writes an attribute value with both quote characters escaped as well.
    pub fn push_attr_value(&mut self, s: &str) {
        self.html.push_str(&html_escape::encode_quoted_attribute(s));
    }

    /// Writes ` name="value"` with the value escaped.
    pub fn push_attr(&mut self, name: &str, value: &str) {
        self.html.push(' ');
        self.html.push_str(name);
        self.html.push_str("=\"");
        self.push_attr_value(value);
        self.html.push('"');
    }

    /// Marks the end of a block-level tag.
    pub fn end_block(&mut self) {
        if self.options.enable_block_newlines {
            self.html.push('\n');
        }
    }

    /// Returns whether lazy image loading is enabled.
    pub fn lazy_images_enabled(&self) -> bool {
        self.options.enable_lazy_images
    }

    /// Consumes the context and returns the rendered HTML.
    pub fn finish(self) -> String {
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let options = Options::default();
        let mut ctx = Context::new(&options, 0);
        ctx.push_raw("<p>");
        ctx.push_text(r#"a < b & "c" > d"#);
        ctx.push_raw("</p>");
        assert_eq!(ctx.finish(), "<p>a &lt; b &amp; &quot;c&quot; &gt; d</p>");
    }

    #[test]
    fn attributes_cannot_break_out() {
        let options = Options::default();
        let mut ctx = Context::new(&options, 0);
        ctx.push_attr("href", r#"x" onclick='y'"#);
        let html = ctx.finish();
        assert!(html.starts_with(" href=\"x&quot; onclick="));
        assert!(!html.contains('\''));
        assert_eq!(html.matches('"').count(), 2);
    }

    #[test]
    fn block_newlines_follow_options() {
        let compact = Options::default();
        let mut ctx = Context::new(&compact, 0);
        ctx.end_block();
        assert_eq!(ctx.finish(), "");

        let spaced = Options {
            enable_block_newlines: true,
            ..Options::default()
        };
        let mut ctx = Context::new(&spaced, 0);
        ctx.end_block();
        assert_eq!(ctx.finish(), "\n");
    }
}
