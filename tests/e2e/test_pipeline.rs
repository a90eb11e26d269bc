use crate::e2e::helpers;

use booktape::domain::pipeline::DocumentOutcome;
use helpers::{decode_segment, TestContext};
use pretty_assertions::assert_eq;
use test_context::test_context;

const BOOK: &str = "aaaabbbbccccdddde";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_convert_text_document_into_numbered_segments(ctx: &TestContext) {
    ctx.add_source("book.txt", BOOK.as_bytes());

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.documents.len(), 1);
    assert_eq!(
        summary.documents[0].outcome,
        DocumentOutcome::Completed { segments: 3 }
    );
    assert_eq!(
        ctx.chunk_files("book"),
        vec![
            "book_1_of_5.mp3",
            "book_2_of_5.mp3",
            "book_3_of_5.mp3",
            "book_4_of_5.mp3",
            "book_5_of_5.mp3",
        ]
    );
    assert_eq!(
        ctx.output_files("book"),
        vec!["book_1_of_3.mp3", "book_2_of_3.mp3", "book_3_of_3.mp3"]
    );
    assert_eq!(ctx.done_files(), vec!["book.txt"]);
    assert!(ctx.source_files().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_merge_chunks_in_text_order(ctx: &TestContext) {
    ctx.add_source("book.txt", BOOK.as_bytes());

    ctx.pipeline().run().await.unwrap();

    let segments: Vec<Vec<String>> = ctx
        .output_files("book")
        .iter()
        .map(|name| decode_segment(&ctx.read_output("book", name)))
        .collect();
    assert_eq!(
        segments,
        vec![
            vec!["aaaa".to_string(), "bbbb".to_string()],
            vec!["cccc".to_string(), "dddd".to_string()],
            vec!["e".to_string()],
        ]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_usage_for_the_run(ctx: &TestContext) {
    ctx.add_source("book.txt", BOOK.as_bytes());

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.usage.api_calls, 5);
    assert_eq!(summary.usage.characters_sent, 17);
    assert_eq!(summary.usage.synthesized_ms, 17_000);
    assert_eq!(summary.usage.segments_produced, 3);
    assert_eq!(ctx.tts.call_count(), 5);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_unsupported_formats(ctx: &TestContext) {
    ctx.add_source("notes.docx", b"not really a docx");

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.skipped(), 1);
    assert!(matches!(
        &summary.documents[0].outcome,
        DocumentOutcome::Skipped { reason } if reason.contains(".docx")
    ));
    assert_eq!(ctx.tts.call_count(), 0);
    assert_eq!(ctx.source_files(), vec!["notes.docx"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_documents_without_text(ctx: &TestContext) {
    ctx.add_source("blank.txt", b"  \n\t ");

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.skipped(), 1);
    assert_eq!(ctx.tts.call_count(), 0);
    assert!(ctx.output_files("blank").is_empty());
    assert_eq!(ctx.source_files(), vec!["blank.txt"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_undecodable_text_and_continue(ctx: &TestContext) {
    ctx.add_source("broken.txt", &[0xff, 0xfe, 0x00, 0xc3]);
    ctx.add_source("good.txt", b"abcd");

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.completed(), 1);
    assert_eq!(ctx.output_files("good"), vec!["good_1_of_1.mp3"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_process_documents_in_name_order_ignoring_hidden_files(ctx: &TestContext) {
    ctx.add_source("zeta.txt", b"zzzz");
    ctx.add_source("alpha.TXT", b"aaaa");
    ctx.add_source(".DS_Store", b"junk");

    let summary = ctx.pipeline().run().await.unwrap();

    let names: Vec<String> = summary
        .documents
        .iter()
        .map(|d| d.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha.TXT", "zeta.txt"]);
    assert_eq!(summary.completed(), 2);
    assert_eq!(ctx.tts.calls(), vec!["aaaa", "zzzz"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_retry_transient_provider_failures(ctx: &TestContext) {
    ctx.add_source("book.txt", BOOK.as_bytes());
    ctx.tts.fail_times("cccc", 1);

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.completed(), 1);
    assert_eq!(ctx.tts.call_count(), 6);
    assert_eq!(summary.usage.api_calls, 5);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_remove_intermediate_artifacts_when_configured(ctx: &TestContext) {
    ctx.add_source("book.txt", BOOK.as_bytes());
    let mut settings = ctx.settings.clone();
    settings.delete_intermediate = true;

    let summary = ctx.pipeline_with(settings).run().await.unwrap();

    assert_eq!(summary.completed(), 1);
    assert!(!ctx.chunk_dir("book").exists());
    assert_eq!(ctx.output_files("book").len(), 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_one_segment_when_everything_fits(ctx: &TestContext) {
    ctx.add_source("short.txt", b"abcdefgh");

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(
        summary.documents[0].outcome,
        DocumentOutcome::Completed { segments: 1 }
    );
    assert_eq!(ctx.output_files("short"), vec!["short_1_of_1.mp3"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pad_part_numbers_to_the_total_width(ctx: &TestContext) {
    // 12 chunks of one character, one chunk per segment
    ctx.add_source("long.txt", b"abcdefghijkl");
    let mut settings = ctx.settings.clone();
    settings.chunk_max_chars = 1;
    settings.max_segment_ms = helpers::MS_PER_CHAR;

    ctx.pipeline_with(settings).run().await.unwrap();

    let chunks = ctx.chunk_files("long");
    assert_eq!(chunks.first().unwrap(), "long_01_of_12.mp3");
    assert_eq!(chunks.last().unwrap(), "long_12_of_12.mp3");
    let outputs = ctx.output_files("long");
    assert_eq!(outputs.len(), 12);
    assert_eq!(outputs[0], "long_01_of_12.mp3");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_sources_sharing_a_document_name(ctx: &TestContext) {
    ctx.add_source("book.TXT", b"AAAABBBB");
    ctx.add_source("book.txt", b"zzzzyyyy");

    let summary = ctx.pipeline().run().await.unwrap();

    assert_eq!(summary.completed(), 1);
    assert_eq!(summary.skipped(), 1);
    assert!(matches!(
        &summary.documents[1].outcome,
        DocumentOutcome::Skipped { reason } if reason.contains("book.TXT")
    ));
    assert_eq!(ctx.tts.calls(), vec!["AAAA", "BBBB"]);
    assert_eq!(ctx.output_files("book"), vec!["book_1_of_1.mp3"]);
    assert_eq!(
        decode_segment(&ctx.read_output("book", "book_1_of_1.mp3")),
        vec!["AAAA".to_string(), "BBBB".to_string()]
    );
    assert_eq!(ctx.done_files(), vec!["book.TXT"]);
    assert_eq!(ctx.source_files(), vec!["book.txt"]);
}
