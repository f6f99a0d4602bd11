use fake_process::{Codec, DutyCycle, DutyCycleRunner, FakeProcessError, SourceLoader};
use flate2::write::GzEncoder;
use flate2::Compression;
use httpmock::prelude::*;
use std::io::Write;

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_fetch_loads_whole_body() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let body = gzip(&vec![b'x'; 100_000]);

    let payload_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/kernel.tar.gz");
            then.status(200)
                .header("Content-Type", "application/gzip")
                .body(body.clone());
        })
        .await;

    let payload = SourceLoader::new()
        .fetch(&server.url("/kernel.tar.gz"))
        .await?;

    payload_mock.assert_async().await;
    assert_eq!(payload.as_bytes(), body.as_slice());
    assert_eq!(payload.position(), 0);
    Ok(())
}

#[tokio::test]
async fn test_fetched_payload_drives_runner() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let data = b"fake kernel source ".repeat(4096);
    let body = gzip(&data);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/payload.gz");
            then.status(200).body(body.clone());
        })
        .await;

    let payload = SourceLoader::new().fetch(&server.url("/payload.gz")).await?;
    let mut runner = DutyCycleRunner::new(
        payload,
        Codec::Auto,
        DutyCycle::from_millis(1_000_000, 0),
        1024,
    )?;

    for pass in 1..=2 {
        let report = runner.run_pass()?;
        assert_eq!(report.pass, pass);
        assert_eq!(report.bytes_decompressed, data.len() as u64);
    }
    Ok(())
}

#[tokio::test]
async fn test_http_error_status_is_fetch_error() {
    let server = MockServer::start_async().await;
    let missing = server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.tar.gz");
            then.status(404);
        })
        .await;

    let result = SourceLoader::new()
        .fetch(&server.url("/missing.tar.gz"))
        .await;

    missing.assert_async().await;
    let err = result.unwrap_err();
    assert!(matches!(err, FakeProcessError::FetchError { .. }));
    assert!(err.to_string().contains("/missing.tar.gz"));
}

#[tokio::test]
async fn test_connection_refused_is_fetch_error() {
    // 綁定後立即釋放，確保沒有人在聽這個 port
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let result = SourceLoader::new()
        .fetch(&format!("http://127.0.0.1:{}/kernel.tar.gz", port))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, FakeProcessError::FetchError { .. }));
    assert_eq!(err.exit_code(), 2);
}
