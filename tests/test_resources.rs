use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use warden::error::{Error, ErrorKind};
use warden::http::request::{Method, Request, RequestBuilder};
use warden::http::response::StatusCode;
use warden::resources::{self, FileStore, Resources};

fn request(method: Method, target: &str) -> Request {
    RequestBuilder::new()
        .method(method)
        .target(target)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_root_is_empty_200() {
    let resources = Resources::new(None);

    for target in ["/", "/index.html"] {
        let response = resources.handle(&request(Method::GET, target)).await.unwrap();
        assert_eq!(response.status, StatusCode::Ok);
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
    }
}

#[tokio::test]
async fn test_echo_plain() {
    let resources = Resources::new(None);
    let response = resources.handle(&request(Method::GET, "/echo/abc")).await.unwrap();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("Content-Length"), Some("3"));
    assert_eq!(response.header("Content-Encoding"), None);
    assert_eq!(response.body, b"abc".to_vec());
}

#[tokio::test]
async fn test_echo_gzip_is_really_compressed() {
    let resources = Resources::new(None);
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/echo/abc")
        .header("Accept-Encoding", "invalid-encoding, gzip")
        .build()
        .unwrap();

    let response = resources.handle(&req).await.unwrap();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["Content-Type", "Content-Encoding", "Content-Length"]);
    assert_eq!(response.header("Content-Encoding"), Some("gzip"));
    assert_eq!(
        response.header("Content-Length"),
        Some(response.body.len().to_string().as_str())
    );

    let mut decoded = String::new();
    GzDecoder::new(&response.body[..]).read_to_string(&mut decoded).unwrap();
    assert_eq!(decoded, "abc");
}

#[tokio::test]
async fn test_echo_ignores_unknown_encodings() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/echo/abc")
        .header("Accept-Encoding", "invalid-encoding")
        .build()
        .unwrap();

    let response = Resources::new(None).handle(&req).await.unwrap();

    assert_eq!(response.header("Content-Encoding"), None);
    assert_eq!(response.body, b"abc".to_vec());
}

#[tokio::test]
async fn test_user_agent_reflected() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/user-agent")
        .header("User-Agent", "foo/1.0")
        .build()
        .unwrap();

    let response = Resources::new(None).handle(&req).await.unwrap();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Length"), Some("7"));
    assert_eq!(response.body, b"foo/1.0".to_vec());
}

#[tokio::test]
async fn test_user_agent_missing_header() {
    let err = Resources::new(None)
        .handle(&request(Method::GET, "/user-agent"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingHeader);
    assert_eq!(err.to_response().unwrap().status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_unknown_route() {
    let err = Resources::new(None)
        .handle(&request(Method::GET, "/does-not-exist"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ResourceNotFound));
}

#[tokio::test]
async fn test_unsupported_methods() {
    let resources = Resources::new(None);

    for (method, target) in [
        (Method::POST, "/"),
        (Method::POST, "/echo/abc"),
        (Method::Unsupported, "/user-agent"),
        (Method::Unsupported, "/files/a.txt"),
    ] {
        let err = resources.handle(&request(method, target)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod, "{} {}", method, target);
    }
}

#[tokio::test]
async fn test_file_post_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let resources = Resources::new(Some(dir.path().to_path_buf()));

    let post = RequestBuilder::new()
        .method(Method::POST)
        .target("/files/a.txt")
        .body(b"hello".to_vec())
        .build()
        .unwrap();
    let created = resources.handle(&post).await.unwrap();
    assert_eq!(created.status, StatusCode::Created);
    assert!(created.body.is_empty());

    let response = resources.handle(&request(Method::GET, "/files/a.txt")).await.unwrap();
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(response.header("Content-Length"), Some("5"));
    assert_eq!(response.body, b"hello".to_vec());
}

#[tokio::test]
async fn test_file_post_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a much longer original").unwrap();
    let resources = Resources::new(Some(dir.path().to_path_buf()));

    let post = RequestBuilder::new()
        .method(Method::POST)
        .target("/files/a.txt")
        .body(b"new".to_vec())
        .build()
        .unwrap();
    resources.handle(&post).await.unwrap();

    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"new");
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[tokio::test]
async fn test_file_get_reads_fresh_contents() {
    let dir = tempfile::tempdir().unwrap();
    let resources = Resources::new(Some(dir.path().to_path_buf()));
    let path = dir.path().join("b.bin");

    std::fs::write(&path, b"one").unwrap();
    let first = resources.handle(&request(Method::GET, "/files/b.bin")).await.unwrap();
    std::fs::write(&path, b"two!").unwrap();
    let second = resources.handle(&request(Method::GET, "/files/b.bin")).await.unwrap();

    assert_eq!(first.body, b"one".to_vec());
    assert_eq!(second.body, b"two!".to_vec());
}

#[tokio::test]
async fn test_file_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let resources = Resources::new(Some(dir.path().to_path_buf()));

    let err = resources
        .handle(&request(Method::GET, "/files/missing.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_file_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let resources = Resources::new(Some(dir.path().to_path_buf()));

    let err = resources
        .handle(&request(Method::GET, "/files/sub"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_file_routes_disabled_without_root() {
    let resources = Resources::new(None);

    let get = resources.handle(&request(Method::GET, "/files/a.txt")).await.unwrap_err();
    let post = resources.handle(&request(Method::POST, "/files/a.txt")).await.unwrap_err();

    assert_eq!(get.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(post.kind(), ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_file_traversal_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("root");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(dir.path().join("secret"), b"nope").unwrap();
    let resources = Resources::new(Some(root));

    let err = resources
        .handle(&request(Method::GET, "/files/../secret"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_file_write_failure_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("does-not-exist"));

    let err = store.write("a.txt", b"x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert_eq!(err.to_response().unwrap().status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_file_hidden_names_not_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".a.txt.4242-0.tmp"), b"half written").unwrap();
    let resources = Resources::new(Some(dir.path().to_path_buf()));

    let get = resources
        .handle(&request(Method::GET, "/files/.a.txt.4242-0.tmp"))
        .await
        .unwrap_err();
    assert_eq!(get.kind(), ErrorKind::ResourceNotFound);

    let post = RequestBuilder::new()
        .method(Method::POST)
        .target("/files/.hidden")
        .body(b"x".to_vec())
        .build()
        .unwrap();
    let err = resources.handle(&post).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert!(!dir.path().join(".hidden").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_reads_racing_writes_never_tear() {
    const SIZE: usize = 256 * 1024;

    let dir = tempfile::tempdir().unwrap();
    let contents: Arc<Vec<Vec<u8>>> = Arc::new((0..4u8).map(|b| vec![b'a' + b; SIZE]).collect());
    std::fs::write(dir.path().join("race.bin"), &contents[0]).unwrap();
    let resources = Arc::new(Resources::new(Some(dir.path().to_path_buf())));

    let mut tasks = Vec::new();
    for i in 0..4 {
        let resources = resources.clone();
        let contents = contents.clone();
        tasks.push(tokio::spawn(async move {
            for round in 0..10 {
                let post = RequestBuilder::new()
                    .method(Method::POST)
                    .target("/files/race.bin")
                    .body(contents[(i + round) % contents.len()].clone())
                    .build()
                    .unwrap();
                let response = resources.handle(&post).await.unwrap();
                assert_eq!(response.status, StatusCode::Created);
            }
        }));
    }
    for _ in 0..4 {
        let resources = resources.clone();
        let contents = contents.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..20 {
                let response = resources
                    .handle(&request(Method::GET, "/files/race.bin"))
                    .await
                    .unwrap();
                assert_eq!(response.status, StatusCode::Ok);
                assert!(
                    contents.iter().any(|c| *c == response.body),
                    "read {} bytes matching no complete write",
                    response.body.len()
                );
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_root_handler() {
    let response = resources::root();
    assert_eq!(response.status, StatusCode::Ok);
}
