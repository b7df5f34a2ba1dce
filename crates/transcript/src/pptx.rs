//! Reading slide text out of a `.pptx` package.

use std::io::Read;
use std::path::Path;

use roxmltree::{Document, Node};

use slidecast_common::error::{SlidecastError, SlidecastResult};

const P_NAMESPACE: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const A_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Text of one slide: the non-empty, trimmed text of each shape in z-order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlideText {
    pub number: u32,
    pub shapes: Vec<String>,
}

/// Open a deck and return the text of every slide, ordered by slide number.
pub fn read_slides(path: &Path) -> SlidecastResult<Vec<SlideText>> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        SlidecastError::transcript(format!("{} is not a .pptx package: {e}", path.display()))
    })?;

    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    parts.sort_by_key(|(n, _)| *n);

    let mut slides = Vec::with_capacity(parts.len());
    for (number, name) in parts {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| SlidecastError::transcript(format!("{name}: {e}")))?
            .read_to_string(&mut xml)?;
        let shapes = parse_slide_text(&xml)
            .map_err(|e| SlidecastError::transcript(format!("{name}: {e}")))?;
        slides.push(SlideText { number, shapes });
    }

    tracing::debug!(path = %path.display(), slides = slides.len(), "Read slide text");
    Ok(slides)
}

/// `ppt/slides/slide12.xml` -> `12`.
pub fn slide_number(part_name: &str) -> Option<u32> {
    part_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text of every top-level shape with a text body.
pub fn parse_slide_text(xml: &str) -> Result<Vec<String>, roxmltree::Error> {
    let doc = Document::parse(xml)?;
    let Some(sp_tree) = doc
        .descendants()
        .find(|n| is(n, P_NAMESPACE, "cSld"))
        .and_then(|c_sld| c_sld.children().find(|n| is(n, P_NAMESPACE, "spTree")))
    else {
        return Ok(Vec::new());
    };

    let texts = sp_tree
        .children()
        .filter(|n| is(n, P_NAMESPACE, "sp"))
        .filter_map(|sp| sp.children().find(|n| is(n, P_NAMESPACE, "txBody")))
        .map(|body| text_body(&body))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    Ok(texts)
}

fn text_body(body: &Node) -> String {
    body.children()
        .filter(|n| is(n, A_NAMESPACE, "p"))
        .map(|p| paragraph(&p))
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph(p: &Node) -> String {
    let mut text = String::new();
    for child in p.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "r" | "fld" => {
                if let Some(t) = child.children().find(|n| is(n, A_NAMESPACE, "t")) {
                    text.push_str(t.text().unwrap_or_default());
                }
            }
            "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn is(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}
