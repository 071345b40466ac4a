//! `HttpPageFetcher` against throwaway local sockets.
//!
//! Each test binds 127.0.0.1:0 and answers with a canned HTTP response, so
//! status handling, the User-Agent header and the timeout are exercised
//! without leaving the machine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use strategist_common::ErrorKind;
use strategist_engine::cache::ScrapeCache;
use strategist_engine::competitor::{CompetitorScraper, HttpPageFetcher, BROWSER_USER_AGENT};

/// Serve one canned response; hands back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let mut request = Vec::new();
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!(
            "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    (format!("http://{addr}/blog"), rx)
}

fn scraper_with_timeout(timeout: Duration) -> CompetitorScraper {
    let fetcher = HttpPageFetcher::new(timeout).unwrap();
    CompetitorScraper::new(Arc::new(fetcher), ScrapeCache::new(8, Duration::from_secs(60)))
}

#[tokio::test]
async fn fixture_page_headings_are_deduplicated() {
    let (url, request) = serve_once("HTTP/1.1 200 OK", "<h1>A</h1><h2>B</h2><h2>B</h2>").await;
    let scraper = scraper_with_timeout(Duration::from_secs(10));

    let headlines = scraper.scrape_headlines(&url).await.unwrap();

    assert_eq!(headlines, vec!["A", "B"]);
    let request = request.await.unwrap().to_lowercase();
    assert!(
        request.contains(&format!("user-agent: {}", BROWSER_USER_AGENT.to_lowercase())),
        "browser user agent not sent: {request}"
    );
}

#[tokio::test]
async fn error_status_is_scrape_failure() {
    let (url, _request) = serve_once("HTTP/1.1 403 Forbidden", "denied").await;
    let scraper = scraper_with_timeout(Duration::from_secs(10));

    let err = scraper.scrape_headlines(&url).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
    assert!(err.to_string().contains("403"), "got {err}");
}

#[tokio::test]
async fn unreachable_host_fails_within_timeout() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let scraper = scraper_with_timeout(Duration::from_secs(10));
    let started = Instant::now();
    let err = scraper
        .scrape_headlines(&format!("http://{addr}/"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
    assert!(started.elapsed() <= Duration::from_secs(11));
}

#[tokio::test]
async fn silent_server_hits_the_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let scraper = scraper_with_timeout(Duration::from_secs(1));
    let started = Instant::now();
    let err = scraper
        .scrape_headlines(&format!("http://{addr}/"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ScrapeFailed);
    assert!(err.to_string().contains("timed out"), "got {err}");
    assert!(started.elapsed() < Duration::from_secs(2));
}
