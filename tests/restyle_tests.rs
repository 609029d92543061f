//! End-to-end runs against the in-memory scene host.

mod common;

use std::time::Duration;

use common::{doc_with, drain, inter, progress_of, roboto, sd_gothic, sf_pro, text};
use retrack::run::{Restyler, RunOptions, RunState};
use retrack::scene::{CharRange, Document, LetterSpacing, MemoryDocument, NodeSpec, TextSegment};
use retrack::RestyleError;
use retrack_config::PrewarmScope;
use retrack_fonts::{FontDescriptor, MemoryFontLoader};
use tokio::sync::mpsc;

fn font_at(doc: &MemoryDocument, node: &str, index: usize) -> FontDescriptor {
    let id = doc.find(node).unwrap();
    doc.font_name(id, CharRange::single(index)).uniform().unwrap()
}

fn spacing_at(doc: &MemoryDocument, node: &str, index: usize) -> LetterSpacing {
    let id = doc.find(node).unwrap();
    doc.letter_spacing(id, CharRange::single(index))
        .uniform()
        .unwrap()
}

fn options(apply_tracking: bool) -> RunOptions {
    RunOptions::default().with_apply_tracking(apply_tracking)
}

#[tokio::test]
async fn test_latin_regular_with_tracking() {
    let mut doc = doc_with(vec![text("t", "A", inter("Regular"), 400.0, 12.0)], &["t"]);
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(true), tx);

    let summary = restyler.run(&mut doc).await.unwrap();

    assert_eq!(font_at(&doc, "t", 0), sf_pro("Regular"));
    assert_eq!(spacing_at(&doc, "t", 0), LetterSpacing::pixels(0.0));
    // Font name and letter spacing were both written.
    assert_eq!(doc.mutation_count(), 2);
    assert_eq!(summary.layers_changed, 1);
    assert_eq!(summary.characters_changed, 1);
    assert_eq!(restyler.state(), RunState::Complete);
}

#[tokio::test]
async fn test_korean_bold_never_tracked() {
    let mut doc = doc_with(vec![text("t", "가", inter("Bold"), 700.0, 20.0)], &["t"]);
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(true), tx);

    restyler.run(&mut doc).await.unwrap();

    assert_eq!(font_at(&doc, "t", 0), sd_gothic("Bold"));
    assert_eq!(doc.mutation_count(), 1);
    let scene = doc.to_scene();
    assert_eq!(scene.nodes[0].segments[0].letter_spacing, None);
}

#[tokio::test]
async fn test_mixed_script_node() {
    let mut doc = doc_with(vec![text("t", "A가b", inter("Medium"), 500.0, 20.0)], &["t"]);
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(true), tx);

    restyler.run(&mut doc).await.unwrap();

    assert_eq!(font_at(&doc, "t", 0), sf_pro("Medium"));
    assert_eq!(font_at(&doc, "t", 1), sd_gothic("Medium"));
    assert_eq!(font_at(&doc, "t", 2), sf_pro("Medium"));
    assert_eq!(spacing_at(&doc, "t", 0), LetterSpacing::pixels(-0.45));
    assert_eq!(spacing_at(&doc, "t", 2), LetterSpacing::pixels(-0.45));
    let t = doc.find("t").unwrap();
    assert!(doc.letter_spacing(t, CharRange::new(0, 3)).is_mixed());
}

#[tokio::test]
async fn test_tracking_disabled_or_size_absent() {
    let mut doc = doc_with(
        vec![
            text("a", "x", inter("Regular"), 400.0, 20.0),
            text("b", "y", inter("Regular"), 400.0, 100.0),
        ],
        &["a", "b"],
    );
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();

    Restyler::new(&loader, options(false), tx.clone())
        .run(&mut doc)
        .await
        .unwrap();
    assert_eq!(doc.mutation_count(), 2);

    // Size 100 has no table entry, so only "a" gets spacing.
    Restyler::new(&loader, options(true), tx)
        .run(&mut doc)
        .await
        .unwrap();
    assert_eq!(doc.mutation_count(), 2 + 3);
    assert_eq!(spacing_at(&doc, "a", 0), LetterSpacing::pixels(-0.45));
}

#[tokio::test]
async fn test_empty_selection_issues_no_loads() {
    let mut doc = doc_with(vec![text("t", "A", inter("Regular"), 400.0, 12.0)], &[]);
    let loader = MemoryFontLoader::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(true), tx);

    let result = restyler.run(&mut doc).await;

    assert!(matches!(result, Err(RestyleError::NoSelection)));
    assert_eq!(restyler.state(), RunState::Idle);
    assert_eq!(restyler.counters().processed_layers, 0);
    assert_eq!(restyler.counters().changed_characters, 0);
    assert_eq!(loader.call_count(), 0);
    assert_eq!(doc.mutation_count(), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_selection_without_text_is_no_selection() {
    let mut doc = doc_with(
        vec![NodeSpec::new("frame", "FRAME").with_children(vec![NodeSpec::new("r", "RECTANGLE")])],
        &["frame"],
    );
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let result = Restyler::new(&loader, options(true), tx).run(&mut doc).await;
    assert!(matches!(result, Err(RestyleError::NoSelection)));
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn test_prewarm_loads_each_original_font_once() {
    let mut doc = doc_with(
        vec![
            NodeSpec::text(
                "first",
                vec![
                    TextSegment::new("a".repeat(100), inter("Regular"), 400.0, 14.0),
                    TextSegment::new("b".repeat(50), inter("Bold"), 700.0, 14.0),
                ],
            ),
            text("second", &"c".repeat(100), roboto("Regular"), 400.0, 16.0),
        ],
        &["first", "second"],
    );
    let loader = MemoryFontLoader::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut run_options = options(true);
    run_options.progress_interval = Duration::ZERO;
    let mut restyler = Restyler::new(&loader, run_options, tx);

    let summary = restyler.run(&mut doc).await.unwrap();

    assert_eq!(restyler.prewarm_loads(), 3);
    let mut prewarmed = loader.calls()[..3].to_vec();
    prewarmed.sort();
    assert_eq!(
        prewarmed,
        vec![inter("Bold"), inter("Regular"), roboto("Regular")]
    );
    // Rewrite loads the two target fonts once each.
    assert_eq!(loader.call_count(), 3 + 2);

    assert_eq!(summary.layers_changed, 2);
    assert_eq!(summary.characters_changed, 250);
    assert_eq!(summary.total_characters, 250);

    let progress = progress_of(&drain(&mut rx));
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0].0 <= w[1].0));
    assert!(progress.iter().all(|&(current, total)| total == 250 && current <= total));
}

#[tokio::test]
async fn test_progress_is_throttled() {
    let mut doc = doc_with(
        vec![text("t", &"x".repeat(500), inter("Regular"), 400.0, 14.0)],
        &["t"],
    );
    let loader = MemoryFontLoader::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut run_options = options(false);
    run_options.progress_interval = Duration::from_secs(3600);

    Restyler::new(&loader, run_options, tx)
        .run(&mut doc)
        .await
        .unwrap();

    // Only the first report gets through an hour-long interval.
    assert_eq!(progress_of(&drain(&mut rx)), vec![(1, 500)]);
}

#[tokio::test]
async fn test_prewarmed_font_is_not_loaded_again() {
    let mut doc = doc_with(
        vec![
            text("a", "Hello", sf_pro("Regular"), 400.0, 14.0),
            text("b", "World", sf_pro("Regular"), 400.0, 14.0),
        ],
        &["a", "b"],
    );
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(true), tx);

    let summary = restyler.run(&mut doc).await.unwrap();

    assert_eq!(summary.characters_changed, 10);
    assert_eq!(restyler.prewarm_loads(), 1);
    // One load across prewarm and both rewritten nodes.
    assert_eq!(loader.calls(), vec![sf_pro("Regular")]);
}

#[tokio::test]
async fn test_prewarm_scope_selection() {
    let mut doc = doc_with(
        vec![
            text("picked", "a", inter("Regular"), 400.0, 14.0),
            text("other", "b", roboto("Thin"), 100.0, 14.0),
        ],
        &["picked"],
    );
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();

    let mut run_options = options(false);
    run_options.prewarm_scope = PrewarmScope::Selection;
    let mut restyler = Restyler::new(&loader, run_options, tx.clone());
    restyler.run(&mut doc).await.unwrap();
    assert_eq!(restyler.prewarm_loads(), 1);

    let mut doc = doc_with(
        vec![
            text("picked", "a", inter("Regular"), 400.0, 14.0),
            text("other", "b", roboto("Thin"), 100.0, 14.0),
        ],
        &["picked"],
    );
    let mut restyler = Restyler::new(&loader, options(false), tx);
    restyler.run(&mut doc).await.unwrap();
    assert_eq!(restyler.prewarm_loads(), 2);
    // Unselected nodes are prewarmed but never rewritten.
    assert_eq!(font_at(&doc, "other", 0), roboto("Thin"));
}

#[tokio::test]
async fn test_prewarm_failure_is_swallowed() {
    let mut doc = doc_with(vec![text("t", "ab", inter("Regular"), 400.0, 14.0)], &["t"]);
    let loader = MemoryFontLoader::new().with_unavailable(inter("Regular"));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(true), tx);

    let summary = restyler.run(&mut doc).await.unwrap();

    assert_eq!(summary.characters_changed, 2);
    assert_eq!(font_at(&doc, "t", 1), sf_pro("Regular"));
    assert_eq!(restyler.state(), RunState::Complete);
}

#[tokio::test]
async fn test_rewrite_font_failure_aborts_with_partial_changes() {
    let mut doc = doc_with(
        vec![
            NodeSpec::text(
                "t",
                vec![
                    TextSegment::new("Aa", inter("Regular"), 400.0, 14.0),
                    TextSegment::new("BB", inter("Bold"), 700.0, 14.0),
                ],
            ),
            text("after", "z", inter("Regular"), 400.0, 14.0),
        ],
        &["t", "after"],
    );
    let loader = MemoryFontLoader::new().with_unavailable(sf_pro("Bold"));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut restyler = Restyler::new(&loader, options(false), tx);

    let err = restyler.run(&mut doc).await.unwrap_err();

    assert!(matches!(err, RestyleError::FontLoad(ref e) if *e.font() == sf_pro("Bold")));
    assert_eq!(restyler.state(), RunState::Failed);
    let counters = restyler.counters();
    assert_eq!(counters.total_layers, 1);
    assert_eq!(counters.processed_layers, 0);
    assert_eq!(counters.changed_characters, 2);
    assert_eq!(counters.total_characters, 5);

    assert_eq!(font_at(&doc, "t", 1), sf_pro("Regular"));
    assert_eq!(font_at(&doc, "t", 2), inter("Bold"));
    assert_eq!(font_at(&doc, "after", 0), inter("Regular"));
}

#[tokio::test]
async fn test_rerun_counts_characters_again() {
    let mut doc = doc_with(vec![text("t", "Hello", inter("Regular"), 400.0, 14.0)], &["t"]);
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();

    let first = Restyler::new(&loader, options(true), tx.clone())
        .run(&mut doc)
        .await
        .unwrap();
    let snapshot = doc.to_scene();
    let second = Restyler::new(&loader, options(true), tx)
        .run(&mut doc)
        .await
        .unwrap();

    // Each run has its own cache: Inter Regular and SF Pro Regular on the
    // first run, SF Pro Regular alone on the second.
    assert_eq!(loader.call_count(), 3);
    assert_eq!(first.characters_changed, 5);
    assert_eq!(second.characters_changed, 5);
    assert_eq!(doc.to_scene(), snapshot);
}

#[tokio::test]
async fn test_summary_message() {
    let mut doc = doc_with(vec![text("t", "Hi", inter("Regular"), 400.0, 14.0)], &["t"]);
    let loader = MemoryFontLoader::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let summary = Restyler::new(&loader, options(true), tx)
        .run(&mut doc)
        .await
        .unwrap();
    assert_eq!(
        summary.to_string(),
        "Number of layers changed: 1, characters changed: 2"
    );
}
