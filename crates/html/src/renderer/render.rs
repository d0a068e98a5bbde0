//! Rendering functions for each node type.

use super::context::Context;
use golb_md_core::{Block, CodeBlock, Document, Heading, Inline, List, ListItem, ListKind};

/// Renders every top-level block of a document in order.
pub fn render_document(document: &Document, ctx: &mut Context) {
    for block in &document.children {
        render_block(block, ctx);
    }
}

/// Renders a block node and its children.
pub fn render_block(block: &Block, ctx: &mut Context) {
    match block {
        Block::Heading(heading) => render_heading(heading, ctx),
        Block::Paragraph(inlines) => {
            ctx.push_raw("<p>");
            render_inlines(inlines, ctx);
            ctx.push_raw("</p>");
            ctx.end_block();
        }
        Block::CodeBlock(code) => render_code_block(code, ctx),
        Block::List(list) => render_list(list, ctx),
        Block::HorizontalRule => {
            ctx.push_raw("<hr />");
            ctx.end_block();
        }
    }
}

fn render_heading(heading: &Heading, ctx: &mut Context) {
    let level = heading.level.get();
    ctx.push_raw(&format!("<h{}>", level));
    render_inlines(&heading.content, ctx);
    ctx.push_raw(&format!("</h{}>", level));
    ctx.end_block();
}

/// Renders a fenced code block; content is escaped, never parsed.
fn render_code_block(code: &CodeBlock, ctx: &mut Context) {
    ctx.push_raw("<pre><code");
    if let Some(language) = &code.language {
        ctx.push_attr("class", &format!("language-{}", language));
    }
    ctx.push_raw(">");
    ctx.push_text(&code.code);
    ctx.push_raw("</code></pre>");
    ctx.end_block();
}

/// Renders a list node as `<ul>` or `<ol>`.
fn render_list(list: &List, ctx: &mut Context) {
    let tag = match list.kind {
        ListKind::Ordered { start } => {
            if start == 1 {
                ctx.push_raw("<ol>");
            } else {
                ctx.push_raw(&format!("<ol start=\"{}\">", start));
            }
            "ol"
        }
        ListKind::Unordered => {
            ctx.push_raw("<ul>");
            "ul"
        }
    };
    ctx.end_block();

    for item in &list.items {
        render_list_item(item, ctx);
    }

    ctx.push_raw(&format!("</{}>", tag));
    ctx.end_block();
}

/// Renders a list item: its own text, then any nested lists.
fn render_list_item(item: &ListItem, ctx: &mut Context) {
    ctx.push_raw("<li>");
    render_inlines(&item.content, ctx);
    if !item.children.is_empty() {
        ctx.end_block();
        for child in &item.children {
            render_list(child, ctx);
        }
    }
    ctx.push_raw("</li>");
    ctx.end_block();
}

/// Renders a sequence of inline nodes.
pub fn render_inlines(inlines: &[Inline], ctx: &mut Context) {
    for inline in inlines {
        render_inline(inline, ctx);
    }
}

/// Renders one inline node.
pub fn render_inline(inline: &Inline, ctx: &mut Context) {
    match inline {
        Inline::Text(text) => ctx.push_text(text),
        Inline::Bold(children) => {
            ctx.push_raw("<strong>");
            render_inlines(children, ctx);
            ctx.push_raw("</strong>");
        }
        Inline::Italic(children) => {
            ctx.push_raw("<em>");
            render_inlines(children, ctx);
            ctx.push_raw("</em>");
        }
        Inline::BoldItalic(children) => {
            ctx.push_raw("<em><strong>");
            render_inlines(children, ctx);
            ctx.push_raw("</strong></em>");
        }
        Inline::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(code);
            ctx.push_raw("</code>");
        }
        Inline::Link {
            href,
            title,
            children,
        } => {
            ctx.push_raw("<a");
            ctx.push_attr("href", href);
            if let Some(title) = title {
                ctx.push_attr("title", title);
            }
            ctx.push_raw(">");
            render_inlines(children, ctx);
            ctx.push_raw("</a>");
        }
        Inline::Image { src, alt, title } => {
            ctx.push_raw("<img");
            ctx.push_attr("src", src);
            ctx.push_attr("alt", alt);
            if let Some(title) = title {
                ctx.push_attr("title", title);
            }
            if ctx.lazy_images_enabled() {
                ctx.push_raw(r#" loading="lazy""#);
            }
            ctx.push_raw(" />");
        }
    }
}
