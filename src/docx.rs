use std::io::{Cursor, Write};

use thiserror::Error;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::config::SchoolProfile;
use crate::models::{GeneratedContent, LessonRequest};
use crate::render::{compose, Block, DocumentModel, MetaValue, SignatureColumn};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// F4 paper, 215mm x 330mm, 3cm margins, in twips.
const PAGE_WIDTH: u32 = 12189;
const PAGE_HEIGHT: u32 = 18709;
const MARGIN: u32 = 1701;

const HEADING_HALF_POINTS: u32 = 28;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("zip error: {0}")] Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")] Io(#[from] std::io::Error),
}

/// Renders the full document package for download.
pub fn render_docx(
    request: &LessonRequest,
    content: &GeneratedContent,
    school: &SchoolProfile,
) -> Result<Vec<u8>, DocxError> {
    write_package(&compose(request, content, school))
}

/// Packages the OOXML parts into a `.docx` zip.
pub fn write_package(model: &DocumentModel) -> Result<Vec<u8>, DocxError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", options)?;
    zip.write_all(DOCUMENT_RELS.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(model).as_bytes())?;

    zip.start_file("word/styles.xml", options)?;
    zip.write_all(STYLES.as_bytes())?;

    zip.start_file("word/numbering.xml", options)?;
    zip.write_all(NUMBERING.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

// Times New Roman 12pt everywhere unless a run says otherwise.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman" w:cs="Times New Roman"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style></w:styles>"#;

// One bullet list definition (numId 1) for objectives and indicators.
const NUMBERING: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:numbering xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:abstractNum w:abstractNumId=\"0\"><w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"bullet\"/><w:lvlText w:val=\"\u{F0B7}\"/><w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr><w:rPr><w:rFonts w:ascii=\"Symbol\" w:hAnsi=\"Symbol\" w:hint=\"default\"/></w:rPr></w:lvl></w:abstractNum><w:num w:numId=\"1\"><w:abstractNumId w:val=\"0\"/></w:num></w:numbering>";

fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Default, Clone, Copy)]
struct RunStyle {
    bold: bool,
    underline: bool,
    size: Option<u32>,
}

fn run(text: &str, style: RunStyle) -> String {
    let mut props = String::new();
    if style.bold {
        props.push_str("<w:b/>");
    }
    if let Some(size) = style.size {
        props.push_str(&format!("<w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>"));
    }
    if style.underline {
        props.push_str("<w:u w:val=\"single\"/>");
    }
    let props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(
        "<w:r>{props}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        esc(text)
    )
}

fn bold_run(text: &str) -> String {
    run(text, RunStyle { bold: true, ..RunStyle::default() })
}

fn plain_run(text: &str) -> String {
    run(text, RunStyle::default())
}

#[derive(Default, Clone, Copy)]
struct ParaProps {
    center: bool,
    justify: bool,
    indent: Option<u32>,
    bullet: bool,
    before: Option<u32>,
    after: Option<u32>,
}

fn paragraph(props: ParaProps, runs: &str) -> String {
    let mut pr = String::new();
    if props.bullet {
        pr.push_str("<w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr>");
    }
    if props.before.is_some() || props.after.is_some() {
        pr.push_str("<w:spacing");
        if let Some(before) = props.before {
            pr.push_str(&format!(" w:before=\"{before}\""));
        }
        if let Some(after) = props.after {
            pr.push_str(&format!(" w:after=\"{after}\""));
        }
        pr.push_str("/>");
    }
    if let Some(indent) = props.indent {
        pr.push_str(&format!("<w:ind w:left=\"{indent}\"/>"));
    }
    if props.center {
        pr.push_str("<w:jc w:val=\"center\"/>");
    } else if props.justify {
        pr.push_str("<w:jc w:val=\"both\"/>");
    }
    let pr = if pr.is_empty() {
        String::new()
    } else {
        format!("<w:pPr>{pr}</w:pPr>")
    };
    format!("<w:p>{pr}{runs}</w:p>")
}

fn spacer(after: u32) -> String {
    paragraph(ParaProps { after: Some(after), ..ParaProps::default() }, "")
}

fn borderless() -> String {
    let edges: String = ["top", "left", "bottom", "right", "insideH", "insideV"]
        .iter()
        .map(|edge| format!("<w:{edge} w:val=\"none\" w:sz=\"0\" w:space=\"0\" w:color=\"auto\"/>"))
        .collect();
    format!("<w:tblBorders>{edges}</w:tblBorders>")
}

fn cell(width: u32, width_type: &str, paragraphs: &str) -> String {
    format!(
        "<w:tc><w:tcPr><w:tcW w:w=\"{width}\" w:type=\"{width_type}\"/></w:tcPr>{paragraphs}</w:tc>"
    )
}

fn meta_table(model: &DocumentModel) -> String {
    let mut rows = String::new();
    for meta in &model.meta_rows {
        let value_paragraphs = match &meta.value {
            MetaValue::Text { text, bold } => {
                let styled = run(text, RunStyle { bold: *bold, ..RunStyle::default() });
                paragraph(ParaProps::default(), &styled)
            }
            MetaValue::DashedList { items } => items
                .iter()
                .map(|item| paragraph(ParaProps::default(), &plain_run(&format!("- {item}"))))
                .collect(),
        };
        rows.push_str(&format!(
            "<w:tr>{}{}{}</w:tr>",
            cell(3500, "dxa", &paragraph(ParaProps::default(), &plain_run(&meta.label))),
            cell(200, "dxa", &paragraph(ParaProps::default(), &plain_run(":"))),
            cell(6000, "dxa", &value_paragraphs),
        ));
    }
    format!(
        "<w:tbl><w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/>{}</w:tblPr><w:tblGrid><w:gridCol w:w=\"3500\"/><w:gridCol w:w=\"200\"/><w:gridCol w:w=\"6000\"/></w:tblGrid>{rows}</w:tbl>",
        borderless()
    )
}

fn signature_cell(column: &SignatureColumn) -> String {
    let mut paragraphs = String::new();
    for line in &column.lines {
        paragraphs.push_str(&paragraph(
            ParaProps { center: true, ..ParaProps::default() },
            &plain_run(line),
        ));
    }
    paragraphs.push_str(&spacer(1200));
    paragraphs.push_str(&paragraph(
        ParaProps { center: true, ..ParaProps::default() },
        &run(
            &column.signer,
            RunStyle { bold: true, underline: true, ..RunStyle::default() },
        ),
    ));
    cell(2500, "pct", &paragraphs)
}

fn signature_table(model: &DocumentModel) -> String {
    format!(
        "<w:tbl><w:tblPr><w:tblW w:w=\"5000\" w:type=\"pct\"/>{}</w:tblPr><w:tblGrid><w:gridCol w:w=\"4393\"/><w:gridCol w:w=\"4394\"/></w:tblGrid><w:tr>{}{}</w:tr></w:tbl>",
        borderless(),
        signature_cell(&model.signature.left),
        signature_cell(&model.signature.right),
    )
}

fn block_xml(block: &Block) -> String {
    let mut out = String::new();
    match block {
        Block::Bullets { items } => {
            for item in items {
                out.push_str(&paragraph(
                    ParaProps { bullet: true, justify: true, ..ParaProps::default() },
                    &plain_run(item),
                ));
            }
        }
        Block::ModelLine { value } => {
            let runs = format!("{}{}", bold_run("Model: "), plain_run(value));
            out.push_str(&paragraph(
                ParaProps { indent: Some(360), after: Some(200), ..ParaProps::default() },
                &runs,
            ));
        }
        Block::DashedSubsection { title, items } => {
            out.push_str(&paragraph(
                ParaProps { indent: Some(360), before: Some(100), ..ParaProps::default() },
                &bold_run(title),
            ));
            for item in items {
                out.push_str(&paragraph(
                    ParaProps { indent: Some(720), justify: true, ..ParaProps::default() },
                    &plain_run(&format!("- {item}")),
                ));
            }
        }
        Block::StepSubsection { title, steps } => {
            out.push_str(&paragraph(
                ParaProps { indent: Some(360), before: Some(100), ..ParaProps::default() },
                &bold_run(title),
            ));
            for step in steps {
                let runs = format!(
                    "{}{}",
                    bold_run(&format!("{} : ", step.stage_name)),
                    plain_run(&step.activity_description),
                );
                out.push_str(&paragraph(
                    ParaProps {
                        indent: Some(720),
                        justify: true,
                        after: Some(50),
                        ..ParaProps::default()
                    },
                    &runs,
                ));
            }
        }
    }
    out
}

/// The main document part, assembled in model order.
pub fn document_xml(model: &DocumentModel) -> String {
    let mut body = String::new();

    for line in &model.title_lines {
        body.push_str(&paragraph(
            ParaProps { center: true, after: Some(100), ..ParaProps::default() },
            &run(
                line,
                RunStyle { bold: true, size: Some(HEADING_HALF_POINTS), ..RunStyle::default() },
            ),
        ));
    }

    body.push_str(&meta_table(model));
    body.push_str(&spacer(300));

    for section in &model.sections {
        body.push_str(&paragraph(
            ParaProps { before: Some(300), after: Some(100), ..ParaProps::default() },
            &bold_run(&section.title),
        ));
        for block in &section.blocks {
            body.push_str(&block_xml(block));
        }
    }

    body.push_str(&spacer(400));
    body.push_str(&signature_table(model));

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{body}<w:sectPr><w:pgSz w:w=\"{PAGE_WIDTH}\" w:h=\"{PAGE_HEIGHT}\"/><w:pgMar w:top=\"{MARGIN}\" w:right=\"{MARGIN}\" w:bottom=\"{MARGIN}\" w:left=\"{MARGIN}\" w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/></w:sectPr></w:body></w:document>"
    )
}
