//! Attachment tracker filtering, ordering and removal.

mod common;

use complaint_intake_core::{
    attachments::{
        format_file_size, AttachmentKind, AttachmentTracker, FileCandidate, RejectReason,
    },
    command::FormCommand,
    config::{FormConfig, DOCX_MIME},
    event::FormEvent,
    rng::{RngBank, RngSlot},
    FormError,
};

const MAX: u64 = 10_485_760;

fn file(name: &str, size_bytes: u64, mime_type: &str) -> FileCandidate {
    FileCandidate {
        name: name.to_string(),
        size_bytes,
        mime_type: mime_type.to_string(),
    }
}

fn tracker() -> (AttachmentTracker, RngBank) {
    (AttachmentTracker::new(&FormConfig::default()), RngBank::new(common::SEED))
}

#[test]
fn accepts_every_allowed_type() {
    let (mut tracker, mut bank) = tracker();
    let outcome = tracker.add(
        vec![
            file("a.jpg", 10, "image/jpeg"),
            file("b.png", 10, "image/png"),
            file("c.gif", 10, "image/gif"),
            file("d.pdf", 10, "application/pdf"),
            file("e.doc", 10, "application/msword"),
            file("f.docx", 10, DOCX_MIME),
        ],
        bank.for_slot(RngSlot::Attachment),
    );
    assert_eq!(outcome.accepted.len(), 6);
    assert!(outcome.rejected.is_empty());
    assert_eq!(tracker.len(), 6);
}

#[test]
fn oversized_and_unsupported_files_never_enter_the_list() {
    let (mut tracker, mut bank) = tracker();
    let outcome = tracker.add(
        vec![
            file("exact.pdf", MAX, "application/pdf"),
            file("big.pdf", MAX + 1, "application/pdf"),
            file("run.exe", 100, "application/x-msdownload"),
            file("notes.txt", 100, "text/plain"),
            file("photo.webp", 100, "image/webp"),
        ],
        bank.for_slot(RngSlot::Attachment),
    );

    let names: Vec<_> = tracker.items().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["exact.pdf"]);
    assert_eq!(outcome.rejected.len(), 4);
    assert_eq!(outcome.rejected[0].reason, RejectReason::TooLarge);
    assert!(outcome.rejected[1..]
        .iter()
        .all(|r| r.reason == RejectReason::UnsupportedType));
    assert!(tracker.items().iter().all(|a| a.size_bytes <= MAX));
}

#[test]
fn missing_mime_type_is_resolved_from_extension() {
    let (mut tracker, mut bank) = tracker();
    tracker.add(
        vec![file("Scan.JPEG", 10, ""), file("letter.docx", 10, ""), file("README", 10, "")],
        bank.for_slot(RngSlot::Attachment),
    );
    let mimes: Vec<_> = tracker.items().iter().map(|a| a.mime_type.as_str()).collect();
    assert_eq!(mimes, vec!["image/jpeg", DOCX_MIME]);
}

#[test]
fn generic_mime_type_falls_back_to_extension() {
    let (mut tracker, mut bank) = tracker();
    let outcome = tracker.add(
        vec![
            file("report.docx", 10, "application/octet-stream"),
            file("scan.pdf", 10, "application/x-pdf"),
            file("payload.bin", 10, "application/octet-stream"),
        ],
        bank.for_slot(RngSlot::Attachment),
    );
    let mimes: Vec<_> = tracker.items().iter().map(|a| a.mime_type.as_str()).collect();
    assert_eq!(mimes, vec![DOCX_MIME, "application/pdf"]);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].name, "payload.bin");
    assert_eq!(outcome.rejected[0].reason, RejectReason::UnsupportedType);
}

#[test]
fn add_then_remove_restores_prior_list() {
    let (mut tracker, mut bank) = tracker();
    tracker.add(
        vec![
            file("one.pdf", 1, "application/pdf"),
            file("two.png", 2, "image/png"),
            file("three.gif", 3, "image/gif"),
        ],
        bank.for_slot(RngSlot::Attachment),
    );
    let before = tracker.items().to_vec();

    let added = tracker.add(vec![file("four.pdf", 4, "application/pdf")], bank.for_slot(RngSlot::Attachment));
    assert!(tracker.remove(&added.accepted[0].local_id));
    assert_eq!(tracker.items(), before.as_slice());

    // Removing from the middle keeps the others in order.
    assert!(tracker.remove(&before[1].local_id));
    let names: Vec<_> = tracker.items().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["one.pdf", "three.gif"]);
}

#[test]
fn local_ids_are_unique_within_a_session() {
    let (mut tracker, mut bank) = tracker();
    let files = (0..50).map(|i| file(&format!("f{i}.pdf"), 1, "application/pdf")).collect();
    tracker.add(files, bank.for_slot(RngSlot::Attachment));
    let mut ids: Vec<_> = tracker.items().iter().map(|a| a.local_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn unknown_id_removal_is_reported() {
    let (mut tracker, _) = tracker();
    assert!(!tracker.remove("missing"));

    let mut session = common::session(common::SEED);
    let err = session
        .apply(FormCommand::RemoveFile { local_id: "missing".into() })
        .unwrap_err();
    assert!(matches!(err, FormError::UnknownAttachment { .. }));
}

#[test]
fn file_sizes_render_like_the_file_list() {
    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(512), "512 Bytes");
    assert_eq!(format_file_size(1024), "1 KB");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(248_320), "242.5 KB");
    assert_eq!(format_file_size(MAX), "10 MB");
    assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
}

#[test]
fn summaries_carry_kind_and_size_label() {
    let (mut tracker, mut bank) = tracker();
    tracker.add(
        vec![
            file("a.png", 2048, "image/png"),
            file("b.pdf", 10, "application/pdf"),
            file("c.doc", 10, "application/msword"),
        ],
        bank.for_slot(RngSlot::Attachment),
    );
    let kinds: Vec<_> = tracker.summaries().iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![AttachmentKind::Image, AttachmentKind::Pdf, AttachmentKind::Document]);
    assert_eq!(tracker.summaries()[0].size_label, "2 KB");
}

#[test]
fn session_announces_rejections_and_list_changes() {
    let mut session = common::session(common::SEED);
    let events = session
        .apply(FormCommand::AddFiles {
            files: vec![file("ok.pdf", 10, "application/pdf"), file("no.zip", 10, "application/zip")],
        })
        .unwrap();

    assert!(matches!(&events[0], FormEvent::AttachmentsRejected { rejected } if rejected.len() == 1));
    assert!(matches!(&events[1], FormEvent::AttachmentsChanged { attachments } if attachments.len() == 1));
    assert_eq!(session.snapshot().attachments.len(), 1);
}
