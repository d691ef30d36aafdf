use anyhow::Result;
use calc_api::server;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{timeout, Duration};

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<()>>,
}

impl TestServer {
    async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::serve(listener, async move {
            let _ = rx.await;
        }));
        Ok(Self {
            addr,
            client: reqwest::Client::new(),
            shutdown,
            handle,
        })
    }

    async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(());
        timeout(Duration::from_secs(5), self.handle).await???;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<(u16, Value)> {
        http_get(&self.client, self.addr, path).await
    }
}

/// Issues a GET against the server and returns the status code and JSON body.
async fn http_get(
    client: &reqwest::Client,
    addr: SocketAddr,
    path: &str,
) -> Result<(u16, Value)> {
    let request = async {
        let response = client.get(format!("http://{}{}", addr, path)).send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok::<_, reqwest::Error>((status, body))
    };
    Ok(timeout(Duration::from_secs(5), request).await??)
}

#[tokio::test]
async fn test_add_endpoint() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/add?a=5&b=3").await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "result": 8 }));

    server.stop().await
}

#[tokio::test]
async fn test_subtract_endpoint() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/subtract?a=5&b=3").await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "result": 2 }));

    // negative result
    let (status, body) = server.get("/subtract?a=3&b=10").await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "result": -7 }));

    server.stop().await
}

#[tokio::test]
async fn test_multiply_endpoint() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/multiply?a=5&b=3").await?;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "result": 15 }));

    server.stop().await
}

#[tokio::test]
async fn test_repeated_requests_are_identical() -> Result<()> {
    let server = TestServer::start().await?;

    let first = server.get("/add?a=-100&b=58").await?;
    for _ in 0..3 {
        assert_eq!(server.get("/add?a=-100&b=58").await?, first);
    }
    assert_eq!(first, (200, json!({ "result": -42 })));

    server.stop().await
}

#[tokio::test]
async fn test_concurrent_requests() -> Result<()> {
    let server = TestServer::start().await?;

    let mut set = JoinSet::new();
    for i in 0..16i64 {
        let addr = server.addr;
        let client = server.client.clone();
        set.spawn(async move {
            let path = format!("/multiply?a={}&b={}", i, i + 1);
            (i, http_get(&client, addr, &path).await)
        });
    }
    while let Some(joined) = set.join_next().await {
        let (i, response) = joined?;
        let (status, body) = response?;
        assert_eq!(status, 200);
        assert_eq!(body["result"], i * (i + 1));
    }

    server.stop().await
}

#[tokio::test]
async fn test_missing_parameter_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/add?a=5").await?;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["detail"][0]["param"], "b");
    assert_eq!(body["detail"][0]["kind"], "missing");

    server.stop().await
}

#[tokio::test]
async fn test_non_integer_parameter_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/multiply?a=foo&b=3").await?;
    assert_eq!(status, 422);
    assert_eq!(body["detail"][0]["param"], "a");
    assert_eq!(body["detail"][0]["kind"], "not_an_integer");

    let (status, _) = server.get("/subtract?a=2.5&b=1").await?;
    assert_eq!(status, 422);

    server.stop().await
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/health").await?;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");

    server.stop().await
}
