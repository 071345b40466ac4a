//! The cookie / explore / relatedsearches handshake against a local server.
//!
//! The server routes on the request path and answers with canned,
//! guard-prefixed bodies the way the trends endpoints do.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use trends_client::{RelatedQuery, TrendsClient, TrendsError, TrendsSettings};

const EXPLORE_BODY: &str = r#")]}'
{"widgets":[
  {"id":"TIMESERIES","token":"ts-token","request":{"time":"today 1-m"}},
  {"id":"RELATED_QUERIES","token":"rq-token","request":{"restriction":{"geo":{"country":"IN"}},"keywordType":"QUERY"}}
]}"#;

const RELATED_BODY: &str = r#")]}',
{"default":{"rankedList":[
  {"rankedKeyword":[{"query":"ev price","value":100},{"query":"ev charging","value":64}]},
  {"rankedKeyword":[{"query":"ev subsidy 2024","value":450}]}
]}}"#;

#[derive(Clone, Copy)]
struct Reply {
    status_line: &'static str,
    headers: &'static str,
    body: &'static str,
}

const OK_LANDING: Reply = Reply {
    status_line: "HTTP/1.1 200 OK",
    headers: "Set-Cookie: NID=session-42; Path=/\r\n",
    body: "<html></html>",
};

fn ok(body: &'static str) -> Reply {
    Reply {
        status_line: "HTTP/1.1 200 OK",
        headers: "",
        body,
    }
}

fn status(status_line: &'static str, body: &'static str) -> Reply {
    Reply {
        status_line,
        headers: "",
        body,
    }
}

/// Serve until the test ends; returns the base URL and every raw request seen.
async fn serve(explore: Reply, related: Reply) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut raw = Vec::new();
                loop {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    raw.extend_from_slice(&buf[..n]);
                    if n == 0 || raw.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&raw).into_owned();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                log.lock().unwrap().push(request);

                let reply = if path.starts_with("/trends/api/explore") {
                    explore
                } else if path.starts_with("/trends/api/widgetdata/relatedsearches") {
                    related
                } else {
                    OK_LANDING
                };

                let response = format!(
                    "{}\r\n{}Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status_line,
                    reply.headers,
                    reply.body.len(),
                    reply.body
                );
                socket.write_all(response.as_bytes()).await.ok();
                socket.shutdown().await.ok();
            });
        }
    });

    (format!("http://{addr}"), seen)
}

fn client(base_url: &str) -> TrendsClient {
    TrendsClient::new(TrendsSettings::default())
        .unwrap()
        .with_base_url(base_url)
}

fn request_to<'a>(seen: &'a [String], path: &str) -> Option<&'a String> {
    seen.iter()
        .find(|r| r.split_whitespace().nth(1).is_some_and(|p| p.starts_with(path)))
}

#[tokio::test]
async fn handshake_returns_top_and_rising() {
    let (base, seen) = serve(ok(EXPLORE_BODY), ok(RELATED_BODY)).await;

    let related = client(&base).related_queries("electric cars").await.unwrap();

    assert_eq!(
        related.top,
        vec![
            RelatedQuery {
                query: "ev price".into(),
                value: 100
            },
            RelatedQuery {
                query: "ev charging".into(),
                value: 64
            },
        ]
    );
    assert_eq!(related.rising.len(), 1);
    assert_eq!(related.rising[0].query, "ev subsidy 2024");

    let seen = seen.lock().unwrap().clone();
    let explore = request_to(&seen, "/trends/api/explore").expect("explore was called");
    assert!(explore.starts_with("POST "));
    assert!(explore.to_lowercase().contains("cookie: nid=session-42"));

    let widget = request_to(&seen, "/trends/api/widgetdata/relatedsearches")
        .expect("relatedsearches was called");
    assert!(widget.starts_with("GET "));
    assert!(widget.contains("token=rq-token"));
    assert!(widget.contains("tz=330"));
}

#[tokio::test]
async fn missing_widget_is_empty_not_error() {
    let (base, seen) = serve(ok(")]}'\n{\"widgets\":[]}"), ok(RELATED_BODY)).await;

    let related = client(&base).related_queries("zxqv").await.unwrap();

    assert!(related.is_empty());
    let seen = seen.lock().unwrap().clone();
    assert!(request_to(&seen, "/trends/api/widgetdata/relatedsearches").is_none());
}

#[tokio::test]
async fn rate_limited_explore_is_rate_limited() {
    let (base, _) = serve(status("HTTP/1.1 429 Too Many Requests", ""), ok(RELATED_BODY)).await;

    let err = client(&base).related_queries("electric cars").await.unwrap_err();

    assert!(matches!(err, TrendsError::RateLimited), "got {err:?}");
}

#[tokio::test]
async fn server_error_on_widgetdata_is_api_error() {
    let (base, _) = serve(
        ok(EXPLORE_BODY),
        status("HTTP/1.1 500 Internal Server Error", "backend down"),
    )
    .await;

    let err = client(&base).related_queries("electric cars").await.unwrap_err();

    match err {
        TrendsError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
