mod common;

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use zip::ZipArchive;

use common::*;
use rpp_generator::docx::{render_docx, write_package};
use rpp_generator::models::{ActivityStep, GeneratedContent, LessonRequest};
use rpp_generator::render::{
    compose, export_file_name, render_preview, Block, MetaValue, DATE_PLACEHOLDER,
    TEACHER_PLACEHOLDER,
};

fn request() -> LessonRequest {
    LessonRequest {
        subject: "Matematika".to_string(),
        class_phase: "Fase A / Kelas 1".to_string(),
        topic: "Penjumlahan".to_string(),
        value_themes: vec!["Cinta Ilmu".to_string()],
        learning_model: "Problem Based Learning (PBL)".to_string(),
        time_allocation: "2 x 35 Menit".to_string(),
        teacher_name: "GUSTI RAHAYU, S.Pd.I".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 8, 17),
    }
}

fn document_text(bytes: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut part = archive.by_name("word/document.xml").unwrap();
    let mut text = String::new();
    part.read_to_string(&mut text).unwrap();
    text
}

/// Asserts each needle occurs, strictly after the previous one.
fn assert_in_order(haystack: &str, needles: &[String]) {
    let mut offset = 0;
    for needle in needles {
        match haystack[offset..].find(needle.as_str()) {
            Some(at) => offset += at + needle.len(),
            None => panic!("'{needle}' missing or out of order"),
        }
    }
}

/// Flattens the composed model into the text sequence the document must
/// contain in the same order.
fn expected_sequence(request: &LessonRequest, content: &GeneratedContent) -> Vec<String> {
    let model = compose(request, content, &school());
    let mut sequence = Vec::new();

    for line in &model.title_lines {
        sequence.push(line.clone());
    }
    for row in &model.meta_rows {
        sequence.push(row.label.clone());
        match &row.value {
            MetaValue::Text { text, .. } => sequence.push(text.clone()),
            MetaValue::DashedList { items } => {
                for item in items {
                    sequence.push(format!("- {item}"));
                }
            }
        }
    }
    for section in &model.sections {
        sequence.push(section.title.clone());
        for block in &section.blocks {
            match block {
                Block::Bullets { items } => sequence.extend(items.iter().cloned()),
                Block::ModelLine { value } => sequence.push(value.clone()),
                Block::DashedSubsection { title, items } => {
                    sequence.push(title.clone());
                    for item in items {
                        sequence.push(format!("- {item}"));
                    }
                }
                Block::StepSubsection { title, steps } => {
                    sequence.push(title.clone());
                    for step in steps {
                        sequence.push(format!("{} : ", step.stage_name));
                        sequence.push(step.activity_description.clone());
                    }
                }
            }
        }
    }
    for column in [&model.signature.left, &model.signature.right] {
        for line in &column.lines {
            sequence.push(line.clone());
        }
        sequence.push(column.signer.clone());
    }
    sequence
}

#[test]
fn docx_contains_every_preview_item_in_model_order() {
    let request = request();
    let content = sample_content();

    let bytes = render_docx(&request, &content, &school()).unwrap();
    let text = document_text(&bytes);

    assert_in_order(&text, &expected_sequence(&request, &content));
}

#[test]
fn both_targets_derive_from_the_same_composed_model() {
    let request = request();
    let content = sample_content();

    let preview = render_preview(&request, &content, &school());
    let via_compose = compose(&request, &content, &school());
    assert_eq!(preview, via_compose);

    let direct = render_docx(&request, &content, &school()).unwrap();
    let from_model = write_package(&via_compose).unwrap();
    assert_eq!(document_text(&direct), document_text(&from_model));
}

#[test]
fn section_counts_match_between_targets() {
    let request = request();
    let content = sample_content();

    let preview = render_preview(&request, &content, &school());
    let text = document_text(&render_docx(&request, &content, &school()).unwrap());

    assert_eq!(preview.sections.len(), 4);
    for section in &preview.sections {
        assert!(text.contains(&section.title), "missing {}", section.title);
    }

    let bullet_items: usize = preview
        .sections
        .iter()
        .flat_map(|s| &s.blocks)
        .map(|b| match b {
            Block::Bullets { items } => items.len(),
            _ => 0,
        })
        .sum();
    assert_eq!(
        text.matches("<w:numId w:val=\"1\"/>").count(),
        bullet_items,
        "docx bullet count must match the preview's"
    );
}

#[test]
fn step_boundaries_render_without_truncation_in_both_targets() {
    let request = request();

    for count in [0usize, 1, 8] {
        let mut content = sample_content();
        content.core_activity_steps = (1..=count)
            .map(|i| ActivityStep {
                stage_name: format!("Tahap Ke{i}"),
                activity_description: format!("Kegiatan nomor {i}"),
            })
            .collect();

        let preview = render_preview(&request, &content, &school());
        let steps = preview
            .sections
            .iter()
            .flat_map(|s| &s.blocks)
            .find_map(|b| match b {
                Block::StepSubsection { steps, .. } => Some(steps),
                _ => None,
            })
            .unwrap();
        assert_eq!(steps.len(), count);

        let text = document_text(&render_docx(&request, &content, &school()).unwrap());
        assert!(text.contains("2. Kegiatan Inti"));
        let names: Vec<String> = (1..=count).map(|i| format!("Tahap Ke{i} : ")).collect();
        assert_in_order(&text, &names);
        assert_eq!(text.matches("Tahap Ke").count(), count);
    }
}

#[test]
fn placeholders_appear_in_both_targets_when_date_and_teacher_are_unset() {
    let mut request = request();
    request.date = None;
    request.teacher_name = String::new();
    let content = sample_content();

    let preview = render_preview(&request, &content, &school());
    assert_eq!(
        preview.signature.right.lines[0],
        format!("Kotabaru, {DATE_PLACEHOLDER}")
    );
    assert_eq!(preview.signature.right.signer, TEACHER_PLACEHOLDER);

    let text = document_text(&render_docx(&request, &content, &school()).unwrap());
    assert!(text.contains(&format!("Kotabaru, {DATE_PLACEHOLDER}")));
    assert!(text.contains(TEACHER_PLACEHOLDER));
}

#[test]
fn export_file_name_matches_the_scenario() {
    assert_eq!(export_file_name(&request()), "RPP_Matematika_Fase_A_Kelas_1.docx");
}

#[test]
fn package_parts_and_geometry_survive_a_round_trip() {
    let bytes = render_docx(&request(), &sample_content(), &school()).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    for required in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/_rels/document.xml.rels",
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {required}");
    }

    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut document)
        .unwrap();
    assert!(document.contains("<w:pgSz w:w=\"12189\" w:h=\"18709\"/>"));
    assert!(document.contains(
        "<w:pgMar w:top=\"1701\" w:right=\"1701\" w:bottom=\"1701\" w:left=\"1701\""
    ));

    let mut styles = String::new();
    archive
        .by_name("word/styles.xml")
        .unwrap()
        .read_to_string(&mut styles)
        .unwrap();
    assert!(styles.contains("Times New Roman"));
    assert!(styles.contains("<w:sz w:val=\"24\"/>"));
}
