//! Headless-browser slip source
//!
//! Renders the platform's public share page, finds the slip container in the
//! rendered DOM and returns its text as a single opaque leg. Leg-level
//! structure is not recovered.
//!
//! Each render runs in its own browser process, owned exclusively by the
//! call: it is killed when the render future is dropped, including on
//! timeout. Renders are bounded by a semaphore so a burst of conversions
//! cannot fan out into an unbounded number of browsers. One deadline covers
//! both the wait for a render slot and the render itself.

use super::html::{text_content, ContainerLocator};
use super::{EndpointTemplates, FetchError, NotFound, SlipSource};
use crate::models::{Leg, Platform, Slip, UNRESOLVED_MARKET, UNRESOLVED_PICK};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Renders a URL to its post-script DOM
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, FetchError>;
}

/// Chromium/Chrome in headless mode, one process per render
#[derive(Debug, Clone)]
pub struct HeadlessChrome {
    binary: String,
    timeout: Duration,
}

impl HeadlessChrome {
    pub fn new(binary: &str, timeout: Duration) -> Self {
        Self {
            binary: binary.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl PageRenderer for HeadlessChrome {
    async fn render(&self, url: &str) -> Result<String, FetchError> {
        // Let page scripts run for most of the budget before the DOM is dumped
        let budget_ms = self.timeout.as_millis().saturating_sub(2_000).max(1_000);

        let child = Command::new(&self.binary)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--virtual-time-budget={}", budget_ms))
            .arg("--dump-dom")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first_line = stderr.lines().next().unwrap_or_default();
            return Err(FetchError::Browser(format!(
                "exited with {}: {}",
                output.status, first_line
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub struct BrowserSlipSource {
    renderer: Arc<dyn PageRenderer>,
    share_urls: EndpointTemplates,
    locator: ContainerLocator,
    render_permits: Arc<Semaphore>,
    deadline: Duration,
}

impl BrowserSlipSource {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        share_urls: EndpointTemplates,
        container_marker: &str,
        max_concurrent_renders: usize,
        deadline: Duration,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            renderer,
            share_urls,
            locator: ContainerLocator::new(container_marker)?,
            render_permits: Arc::new(Semaphore::new(max_concurrent_renders.max(1))),
            deadline,
        })
    }

    async fn fetch(&self, platform: Platform, code: &str) -> Result<Slip, FetchError> {
        let url = self.share_urls.url_for(platform, code)?;

        let dom = tokio::time::timeout(self.deadline, self.render_when_permitted(&url))
            .await
            .map_err(|_| FetchError::Timeout(self.deadline))??;

        let container = self.locator.inner_html(&dom).ok_or(FetchError::NoMatches)?;
        let text = text_content(container);
        if text.is_empty() {
            return Err(FetchError::NoMatches);
        }

        info!(
            "Rendered slip container for {} on {} ({} chars)",
            code,
            platform,
            text.len()
        );

        // TODO: split the container into per-selection blocks to recover legs
        Ok(Slip::new(vec![Leg::new(
            &text,
            "",
            UNRESOLVED_MARKET,
            UNRESOLVED_PICK,
            None,
        )]))
    }

    async fn render_when_permitted(&self, url: &str) -> Result<String, FetchError> {
        let _permit = self
            .render_permits
            .acquire()
            .await
            .map_err(|_| FetchError::Browser("render pool closed".to_string()))?;

        debug!("Rendering share page {}", url);
        self.renderer.render(url).await
    }
}

#[async_trait]
impl SlipSource for BrowserSlipSource {
    async fn resolve(&self, platform: Platform, code: &str) -> Result<Slip, NotFound> {
        self.fetch(platform, code)
            .await
            .map_err(|e| e.collapse(self.source_name(), platform, code))
    }

    fn supports(&self, platform: Platform) -> bool {
        self.share_urls.has(platform)
    }

    fn source_name(&self) -> &str {
        "browser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a canned DOM and tracks how many renders overlap
    struct CannedRenderer {
        dom: String,
        delay: Duration,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CannedRenderer {
        fn new(dom: &str, delay: Duration) -> Self {
            Self {
                dom: dom.to_string(),
                delay,
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageRenderer for CannedRenderer {
        async fn render(&self, _url: &str) -> Result<String, FetchError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(self.dom.clone())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl PageRenderer for FailingRenderer {
        async fn render(&self, _url: &str) -> Result<String, FetchError> {
            Err(FetchError::Timeout(Duration::from_secs(30)))
        }
    }

    fn share_urls() -> EndpointTemplates {
        EndpointTemplates {
            sportybet: Some("https://sporty.test/share/{code}".to_string()),
            bet9ja: None,
        }
    }

    const DEADLINE: Duration = Duration::from_secs(5);

    const DOM: &str = r#"<html><body>
        <div class="m-betslip"><div>Arsenal vs Chelsea</div><span>1X2 Home @ 1.85</span></div>
    </body></html>"#;

    #[tokio::test]
    async fn test_resolve_extracts_container_text() {
        let renderer = Arc::new(CannedRenderer::new(DOM, Duration::ZERO));
        let source =
            BrowserSlipSource::new(renderer, share_urls(), "betslip", 2, DEADLINE).unwrap();

        let slip = source.resolve(Platform::Sportybet, "ABC123").await.unwrap();

        assert_eq!(slip.len(), 1);
        assert_eq!(slip.legs[0].home, "Arsenal vs Chelsea 1X2 Home @ 1.85");
        assert_eq!(slip.legs[0].market, UNRESOLVED_MARKET);
        assert_eq!(slip.legs[0].odds, None);
    }

    #[tokio::test]
    async fn test_missing_container_is_not_found() {
        let renderer = Arc::new(CannedRenderer::new("<html><body>gone</body></html>", Duration::ZERO));
        let source =
            BrowserSlipSource::new(renderer, share_urls(), "betslip", 2, DEADLINE).unwrap();

        let err = source.resolve(Platform::Sportybet, "ABC123").await.unwrap_err();
        assert_eq!(err, NotFound::new(Platform::Sportybet, "ABC123"));
    }

    #[tokio::test]
    async fn test_empty_container_is_not_found() {
        let renderer = Arc::new(CannedRenderer::new(
            "<div id=\"betslip\">  <span></span> </div>",
            Duration::ZERO,
        ));
        let source =
            BrowserSlipSource::new(renderer, share_urls(), "betslip", 2, DEADLINE).unwrap();

        assert!(source.resolve(Platform::Sportybet, "ABC123").await.is_err());
    }

    #[tokio::test]
    async fn test_render_failure_is_not_found() {
        let source = BrowserSlipSource::new(
            Arc::new(FailingRenderer),
            share_urls(),
            "betslip",
            1,
            DEADLINE,
        )
        .unwrap();
        let err = source.resolve(Platform::Sportybet, "ABC123").await.unwrap_err();
        assert_eq!(err.code, "ABC123");
    }

    #[tokio::test]
    async fn test_supports_only_configured_platforms() {
        let source = BrowserSlipSource::new(
            Arc::new(FailingRenderer),
            share_urls(),
            "betslip",
            1,
            DEADLINE,
        )
        .unwrap();
        assert!(source.supports(Platform::Sportybet));
        assert!(!source.supports(Platform::Bet9ja));
        assert!(source.resolve(Platform::Bet9ja, "ABC123").await.is_err());
    }

    #[tokio::test]
    async fn test_renders_are_bounded() {
        let renderer = Arc::new(CannedRenderer::new(DOM, Duration::from_millis(50)));
        let source = Arc::new(
            BrowserSlipSource::new(renderer.clone(), share_urls(), "betslip", 2, DEADLINE).unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..6 {
            let source = source.clone();
            handles.push(tokio::spawn(async move {
                source.resolve(Platform::Sportybet, &format!("C{}", i)).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert!(renderer.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_queued_renders_share_the_deadline() {
        let renderer = Arc::new(CannedRenderer::new(DOM, Duration::from_millis(600)));
        let deadline = Duration::from_millis(200);
        let source = Arc::new(
            BrowserSlipSource::new(renderer, share_urls(), "betslip", 1, deadline).unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..4 {
            let source = source.clone();
            handles.push(tokio::spawn(async move {
                let started = tokio::time::Instant::now();
                let result = source.resolve(Platform::Sportybet, &format!("Q{}", i)).await;
                (result, started.elapsed())
            }));
        }

        for handle in handles {
            let (result, elapsed) = handle.await.unwrap();
            assert!(result.is_err());
            assert!(
                elapsed < Duration::from_millis(450),
                "resolve took {:?} with a {:?} deadline",
                elapsed,
                deadline
            );
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let chrome = HeadlessChrome::new("/nonexistent/slipbridge-chrome", Duration::from_secs(5));
        let err = chrome.render("https://sporty.test/share/X").await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
