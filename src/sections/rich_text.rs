//! Portable-text blocks to HTML.

use crate::types::{Block, Span};
use maud::{Markup, html};

fn span(s: &Span) -> Markup {
    let mut out = html! { (s.text) };
    for mark in &s.marks {
        out = match mark.as_str() {
            "strong" => html! { strong { (out) } },
            "em" => html! { em { (out) } },
            "code" => html! { code { (out) } },
            "underline" => html! { u { (out) } },
            "strike-through" => html! { s { (out) } },
            _ => out,
        };
    }
    out
}

fn block(b: &Block) -> Markup {
    let inline = html! { @for s in &b.spans { (span(s)) } };
    match b.style.as_str() {
        "h1" | "h2" => html! { h2 { (inline) } },
        "h3" | "h4" | "h5" | "h6" => html! { h3 { (inline) } },
        "blockquote" => html! { blockquote { p { (inline) } } },
        _ => html! { p { (inline) } },
    }
}

/// Render an article body. Empty blocks are skipped.
pub fn render_blocks(blocks: &[Block]) -> Markup {
    html! {
        div.rich-text {
            @for b in blocks.iter().filter(|b| !b.plain_text().trim().is_empty()) {
                (block(b))
            }
        }
    }
}
