use std::fs;

use super::*;
use crate::cli::DataArgs;

const HEADER: &str =
    "Type,Title,Note,Source Location,Tags,Notebooks,Study Set,Last Updated,Created,Highlight\n";

const NEPHI_LINK: &str =
    "https://www.churchofjesuschrist.org/study/scriptures/bofm/1-ne/3?lang=eng&id=p7";

fn record(title: &str, source_location: &str, tags: &str) -> RawRecord {
    RawRecord::from_pairs([
        ("type", "Journal"),
        ("title", title),
        ("note_text", "Body"),
        ("source_location", source_location),
        ("tags", tags),
        ("notebooks", ""),
        ("study_set", ""),
        ("last_updated", ""),
        ("created", ""),
        ("highlight", ""),
    ])
}

fn order() -> CanonicalOrder {
    CanonicalOrder::new(vec!["Genesis".to_string(), "1 Nephi".to_string()])
}

fn names() -> DisplayNames {
    [("bofm", "Book of Mormon"), ("1-ne", "1 Nephi")]
        .into_iter()
        .collect()
}

fn convert(records: &[RawRecord]) -> Conversion {
    let sorter = NoteSorter::new().expect("locator regex should compile");
    convert_records(records, &order(), &names(), &sorter)
}

fn convert_args(root: &Path) -> ConvertArgs {
    ConvertArgs {
        inputs: vec![root.join("export.csv")],
        output: root.join("out").join("Study Notes.txt"),
        format: OutputFormat::Text,
        template: None,
        template_dir: root.join("templates"),
        data: DataArgs {
            data_dir: root.join("data"),
            order_path: None,
            names_path: None,
        },
        staging_db: None,
        report_path: None,
    }
}

#[test]
fn convert_records_sorts_notes_and_pairs_references() {
    let records = [
        record("1 Nephi 3:7", NEPHI_LINK, "obedience"),
        record("Genesis 1:1", "", "creation"),
    ];

    let conversion = convert(&records);

    let titles = conversion
        .notes
        .iter()
        .map(|note| note.title.as_str())
        .collect::<Vec<&str>>();
    assert_eq!(titles, vec!["Genesis 1:1", "1 Nephi 3:7"]);
    assert_eq!(conversion.references, vec!["", "Book of Mormon, 1 Nephi 3:7"]);
    assert_eq!(conversion.locator_mismatches, 0);
    assert_eq!(conversion.citation_failures, 0);
    assert!(conversion.accumulator.tags.contains("creation"));
    assert!(conversion.accumulator.tags.contains("obedience"));
}

#[test]
fn convert_records_uses_placeholder_for_unreadable_links() {
    let records = [record(
        "Genesis 1:1",
        "https://example.com/not/a/study/link/at/all",
        "",
    )];

    let conversion = convert(&records);

    assert_eq!(conversion.references, vec![UNRESOLVED_REFERENCE]);
    assert_eq!(conversion.citation_failures, 1);
    assert_eq!(conversion.warnings.len(), 1);
    assert!(conversion.warnings[0].starts_with("Genesis 1:1: "));
}

#[test]
fn convert_records_counts_title_and_link_disagreements() {
    let records = [record("1 Nephi 3:8", NEPHI_LINK, "")];

    let conversion = convert(&records);

    assert_eq!(conversion.references, vec!["Book of Mormon, 1 Nephi 3:7"]);
    assert_eq!(conversion.locator_mismatches, 1);
    assert!(conversion.warnings[0].contains("title locator 3:8 differs from source link 3:7"));
}

#[test]
fn convert_records_checks_manual_links_against_titles() {
    let manual_link =
        "https://www.churchofjesuschrist.org/study/manual/come-follow-me-2023/05?lang=eng&id=p3";
    let records = [
        record("Come, Follow Me 5:4", manual_link, ""),
        record("Come, Follow Me 5:3", manual_link, ""),
    ];

    let conversion = convert(&records);

    assert_eq!(conversion.references[0], "come-follow-me-2023, 5:3");
    assert_eq!(conversion.locator_mismatches, 1);
    assert_eq!(conversion.warnings.len(), 1);
    assert!(conversion.warnings[0].starts_with("Come, Follow Me 5:4: title locator 5:4"));
}

#[test]
fn convert_records_counts_unranked_notes() {
    let records = [
        record("Alma 32:21", "", ""),
        record("Genesis 1:1", "", ""),
        record("Alma 32:27", "", ""),
    ];

    let conversion = convert(&records);

    assert_eq!(conversion.unranked_notes, 2);
    assert_eq!(conversion.notes[0].title, "Genesis 1:1");
    assert_eq!(conversion.notes[1].title, "Alma 32:21");
    assert_eq!(conversion.notes[2].title, "Alma 32:27");
}

#[test]
fn render_convert_command_lists_every_set_option() {
    let root = Path::new("/tmp/run");
    let mut args = convert_args(root);
    args.format = OutputFormat::Json;
    args.staging_db = Some(root.join("staging.db"));

    let command = render_convert_command(&args);

    assert!(command.starts_with("notes-converter convert --input /tmp/run/export.csv"));
    assert!(command.contains("--format json"));
    assert!(command.contains("--staging-db /tmp/run/staging.db"));
    assert!(!command.contains("--template "));
    assert!(!command.contains("--report-path"));
}

#[test]
fn run_writes_document_and_report() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let root = temp.path();

    fs::create_dir_all(root.join("data")).expect("data dir");
    fs::create_dir_all(root.join("templates")).expect("templates dir");
    fs::write(
        root.join("data").join("standard_works_order.json"),
        r#"["Genesis", "1 Nephi"]"#,
    )
    .expect("order file");
    fs::write(
        root.join("data").join("display_names.json"),
        r#"{"bofm": "Book of Mormon", "1-ne": "1 Nephi"}"#,
    )
    .expect("names file");
    fs::write(
        root.join("templates").join("default.txt"),
        "{document_title}\n",
    )
    .expect("template file");

    let export = format!(
        "{HEADER}Journal,1 Nephi 3:7,Go and do,{NEPHI_LINK},faith,Study,,,,\n\
         Journal,Genesis 1:1,In the beginning,,creation,Study,,,,\n\
         Journal,1 Nephi 3:7,Go and do,{NEPHI_LINK},faith,Study,,,,\n"
    );
    fs::write(root.join("export.csv"), export).expect("export file");

    let mut args = convert_args(root);
    args.report_path = Some(root.join("report.json"));
    run(args).expect("conversion should succeed");

    let document =
        fs::read_to_string(root.join("out").join("Study Notes.txt")).expect("document written");
    assert!(document.starts_with("Study Notes\n"));
    let genesis = document.find("Genesis 1:1").expect("genesis note present");
    let nephi = document.find("1 Nephi 3:7").expect("nephi note present");
    assert!(genesis < nephi);
    assert!(document.contains(&format!("Source: Book of Mormon, 1 Nephi 3:7 ({NEPHI_LINK})")));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(root.join("report.json")).expect("report written"),
    )
    .expect("report should be json");
    assert_eq!(report["status"], "completed");
    assert_eq!(report["counts"]["records_loaded"], 3);
    assert_eq!(report["counts"]["duplicates_removed"], 1);
    assert_eq!(report["counts"]["notes_written"], 2);
    assert_eq!(report["sources"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["tags"], serde_json::json!(["creation", "faith"]));
}
