//! Server-rendered HTML: the preview fragment and the full editor page.

use std::fmt::Write;

use crate::form::render_fields;
use crate::layout::{BlockKind, PreviewDocument};
use crate::models::CvDocument;
use crate::render::decor::background_markup;

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn tag(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Name => "h1",
        BlockKind::Headline => "h2",
        BlockKind::SectionHeading => "h3",
        BlockKind::Contact | BlockKind::Paragraph => "p",
    }
}

/// The preview subtree. Lines are kept as laid out so the browser wraps
/// exactly where the exported PDF does.
pub fn render_preview(preview: &PreviewDocument) -> String {
    let mut html = format!(
        "<article id=\"cv-preview\" class=\"cv\" style=\"width:{:.1}pt;font-family:{}\">",
        preview.content_width_pt,
        preview.theme.css_stack()
    );
    if preview.is_empty() {
        html.push_str("<p class=\"cv-empty\">Start typing to see your résumé here.</p>");
    }
    for block in &preview.blocks {
        let t = tag(block.kind);
        let _ = write!(
            html,
            "<{t} class=\"{}\" data-field=\"{}\" style=\"font-size:{:.1}pt;margin-top:{:.1}pt\">",
            block.kind.css_class(),
            block.source,
            block.kind.font_size_pt(),
            block.kind.space_before_pt(),
        );
        let lines: Vec<String> = block.lines.iter().map(|l| escape(l)).collect();
        html.push_str(&lines.join("<br>"));
        let _ = write!(html, "</{t}>");
    }
    html.push_str("</article>");
    html
}

const EDITOR_STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;color:#111827}\
.shell{position:relative;display:flex;gap:2rem;padding:2rem;z-index:1}\
.editor{flex:0 0 26rem}.field{display:flex;flex-direction:column;margin-bottom:.8rem}\
.field label{font-weight:600;margin-bottom:.25rem}\
.field input,.field textarea{font:inherit;padding:.4rem;border:1px solid #d1d5db;border-radius:4px}\
.paper{background:#fff;padding:36pt;box-shadow:0 2px 12px rgba(0,0,0,.15)}\
.cv h1,.cv h2,.cv h3,.cv p{margin-bottom:0;line-height:1.3}\
.cv h3{border-bottom:.75pt solid currentColor;color:#1f4e79}.cv-headline{color:#1f4e79}\
.cv-contact{color:#5a5a5a}";

// Posts each change event and swaps in the returned preview.
const EDITOR_SCRIPT: &str = "\
const base=document.body.dataset.api;\
document.querySelectorAll('.field input,.field textarea').forEach(el=>{\
el.addEventListener('input',async()=>{\
await fetch(base+'/fields',{method:'POST',headers:{'content-type':'application/json'},\
body:JSON.stringify({field:el.name,value:el.value})});\
const r=await fetch(base+'/preview');document.getElementById('preview').innerHTML=await r.text();});});\
document.getElementById('export').addEventListener('click',async()=>{\
const r=await fetch(base+'/export',{method:'POST',headers:{'content-type':'application/json'},body:'{}'});\
if(!r.ok)return;const url=URL.createObjectURL(await r.blob());\
const a=document.createElement('a');a.href=url;a.download='resume.pdf';a.click();URL.revokeObjectURL(url);});";

/// The full editor page: decoration, form controls and live preview.
pub fn render_editor_page(doc: &CvDocument, preview: &PreviewDocument) -> String {
    let api = format!("/api/v1/documents/{}", doc.id);
    let title = if doc.full_name.trim().is_empty() {
        "Untitled résumé".to_string()
    } else {
        escape(doc.full_name.trim())
    };
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{EDITOR_STYLE}</style></head>\
         <body data-api=\"{api}\">{decor}<main class=\"shell\">\
         <form class=\"editor\" onsubmit=\"return false\">{fields}\
         <button id=\"export\" type=\"button\">Download PDF</button></form>\
         <section class=\"paper\" id=\"preview\">{preview}</section></main>\
         <script>{EDITOR_SCRIPT}</script></body></html>",
        decor = background_markup(),
        fields = render_fields(doc),
        preview = render_preview(preview),
    )
}
