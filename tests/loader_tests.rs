use async_trait::async_trait;
use feedreader::config::feeds::{Feed, FeedRegistry};
use feedreader::error::FailureKind;
use feedreader::loader::{Entry, EntryList, FeedLoader, FeedSource, LoadOutcome, Renderer};
use feedreader::page::Page;
use feedreader::{Error, Result};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// In-memory feeds, each answered after a fixed delay
#[derive(Default)]
struct ScriptedSource {
    feeds: HashMap<String, (Duration, Option<EntryList>)>,
}

impl ScriptedSource {
    fn with_feed(mut self, url: &str, delay_ms: u64, titles: &[&str]) -> Self {
        let entries = titles
            .iter()
            .map(|title| Entry {
                title: title.to_string(),
                link: format!("{url}#{title}"),
                content: format!("<p>{title}</p>"),
            })
            .collect();
        self.feeds.insert(
            url.to_string(),
            (Duration::from_millis(delay_ms), Some(entries)),
        );
        self
    }

    fn with_broken_feed(mut self, url: &str) -> Self {
        self.feeds.insert(url.to_string(), (Duration::ZERO, None));
        self
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch_entries(&self, url: &str) -> Result<EntryList> {
        let (delay, entries) = self
            .feeds
            .get(url)
            .ok_or_else(|| Error::FeedParse(format!("unknown feed {url}")))?;
        tokio::time::sleep(*delay).await;
        entries
            .clone()
            .ok_or_else(|| Error::FeedParse(format!("malformed feed at {url}")))
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _name: &str, _entries: &[Entry]) -> Result<()> {
        Err(Error::Render("container detached".to_string()))
    }
}

/// Log sink shared with a test subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn two_feed_registry() -> FeedRegistry {
    FeedRegistry::new(vec![
        Feed::new("https://feeds.example.com/a.xml", "Feed A"),
        Feed::new("https://feeds.example.com/b.xml", "Feed B"),
    ])
    .unwrap()
}

fn two_feed_page() -> Arc<Page> {
    let source = ScriptedSource::default()
        .with_feed("https://feeds.example.com/a.xml", 5, &["Alpha", "Beta"])
        .with_feed("https://feeds.example.com/b.xml", 5, &["Gamma"]);
    Arc::new(Page::new(two_feed_registry(), Arc::new(source)))
}

#[tokio::test]
async fn test_every_valid_load_completes_exactly_once() {
    let page = two_feed_page();
    let calls = Arc::new(AtomicUsize::new(0));

    for index in 0..page.registry().len() {
        let calls = calls.clone();
        let outcome = page
            .loader()
            .load_with(index, move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        assert!(outcome.is_rendered(), "feed #{index}: {outcome:?}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), page.registry().len());
}

#[tokio::test]
async fn test_successful_load_renders_titled_entries() {
    let page = two_feed_page();

    page.load_feed(0).await;

    let rendered = page.entries().snapshot();
    assert_eq!(rendered.title.as_deref(), Some("Feed A"));
    assert!(!rendered.entries.is_empty());
    assert!(rendered.entries.iter().all(|e| !e.title.is_empty()));
    assert!(rendered.html.contains(r#"<article class="entry">"#));
}

#[tokio::test]
async fn test_sequential_loads_replace_titles() {
    let page = two_feed_page();

    page.load_feed(0).await;
    let first = page.entries().titles();

    page.load_feed(1).await;
    let second = page.entries().titles();

    assert_eq!(first, vec!["Alpha".to_string(), "Beta".to_string()]);
    assert_eq!(second, vec!["Gamma".to_string()]);
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_callback_chained_loads_show_different_content() {
    let page = two_feed_page();
    let (done_tx, done_rx) = oneshot::channel();

    let chained = page.clone();
    page.loader().spawn_load(0, move |_| {
        let first = chained.entries().titles();
        let inner = chained.clone();
        chained.loader().spawn_load(1, move |_| {
            let second = inner.entries().titles();
            let _ = done_tx.send((first, second));
        });
    });

    let (first, second) = tokio::time::timeout(Duration::from_secs(5), done_rx)
        .await
        .expect("chained loads never completed")
        .unwrap();

    assert!(!first.is_empty());
    assert!(!second.is_empty());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_out_of_range_index_still_completes() {
    let page = two_feed_page();
    let calls = AtomicUsize::new(0);

    let outcome = page
        .loader()
        .load_with(99, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        outcome,
        LoadOutcome::Failed {
            index: 99,
            kind: FailureKind::InvalidFeedIndex,
        }
    );
    assert!(page.entries().is_empty());
}

#[tokio::test]
async fn test_out_of_range_index_is_logged() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let page = two_feed_page();
    page.load_feed(99).await;

    let logged = logs.contents();
    assert!(logged.contains("ERROR"), "{logged}");
    assert!(
        logged.contains("Failed to load feed #99: Invalid feed index 99 (registry has 2 feeds)"),
        "{logged}"
    );
}

#[tokio::test]
async fn test_retrieval_failure_completes_and_keeps_previous_entries() {
    let source = ScriptedSource::default()
        .with_feed("https://feeds.example.com/a.xml", 0, &["Alpha"])
        .with_broken_feed("https://feeds.example.com/b.xml");
    let page = Page::new(two_feed_registry(), Arc::new(source));

    page.load_feed(0).await;
    let outcome = page.load_feed(1).await;

    assert_eq!(
        outcome,
        LoadOutcome::Failed {
            index: 1,
            kind: FailureKind::RetrievalFailure,
        }
    );
    assert_eq!(page.entries().titles(), vec!["Alpha".to_string()]);
    assert_eq!(page.entries().snapshot().title.as_deref(), Some("Feed A"));
}

#[tokio::test]
async fn test_render_failure_still_completes() {
    let source = ScriptedSource::default()
        .with_feed("https://feeds.example.com/a.xml", 0, &["Alpha"]);
    let loader = FeedLoader::new(
        Arc::new(two_feed_registry()),
        Arc::new(source),
        Arc::new(FailingRenderer),
    );
    let mut completed = false;

    let outcome = loader.load_with(0, |_| completed = true).await;

    assert!(completed);
    assert_eq!(
        outcome,
        LoadOutcome::Failed {
            index: 0,
            kind: FailureKind::RenderFailure,
        }
    );
}

#[tokio::test]
async fn test_slow_earlier_load_is_superseded() {
    let source = ScriptedSource::default()
        .with_feed("https://feeds.example.com/a.xml", 300, &["Stale"])
        .with_feed("https://feeds.example.com/b.xml", 10, &["Fresh"]);
    let page = Arc::new(Page::new(two_feed_registry(), Arc::new(source)));

    let slow = page.loader().spawn_load(0, |_| {});
    // Let the slow load take its generation before the fast one starts
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = page.load_feed(1).await;
    assert!(fast.is_rendered());
    assert_eq!(page.entries().titles(), vec!["Fresh".to_string()]);

    let slow = slow.await.unwrap();
    assert_eq!(
        slow,
        LoadOutcome::Superseded {
            index: 0,
            generation: 1,
            latest: 2,
        }
    );
    assert_eq!(page.entries().titles(), vec!["Fresh".to_string()]);
    assert_eq!(page.entries().snapshot().title.as_deref(), Some("Feed B"));
}

#[tokio::test]
async fn test_generations_increase_per_load() {
    let page = two_feed_page();

    let first = page.load_feed(0).await;
    let second = page.load_feed(0).await;

    match (first, second) {
        (
            LoadOutcome::Rendered { generation: a, .. },
            LoadOutcome::Rendered { generation: b, .. },
        ) => assert!(b > a),
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert_eq!(page.loader().latest_generation(), 2);
}
