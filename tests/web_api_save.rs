//! Upload Endpoint Tests
//!
//! Integration tests for `POST /save`.

mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};

use common::{
    create_test_server, create_test_server_with, raw_content_type, raw_multipart, Options, BATCH,
};

fn file_part(filename: &str, content: &'static [u8]) -> Part {
    Part::bytes(content).file_name(filename.to_string())
}

// ============================================================================
// Success Paths
// ============================================================================

#[tokio::test]
async fn test_save_single_part() {
    let env = create_test_server();

    let response = env
        .server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("a.txt", b"xyz")))
        .await;

    response.assert_status_ok();
    response.assert_text("all done!");
    assert!(env.batch_dir().is_dir());
    assert_eq!(std::fs::read(env.batch_dir().join("a.txt")).unwrap(), b"xyz");
}

#[tokio::test]
async fn test_save_multiple_parts_same_batch() {
    let env = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", file_part("one.txt", b"1"))
        .add_part("file", file_part("two.bin", &[0, 159, 146, 150]))
        .add_part("file", file_part("three.txt", b""));
    let response = env.server.post("/save").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(std::fs::read(env.batch_dir().join("one.txt")).unwrap(), b"1");
    assert_eq!(
        std::fs::read(env.batch_dir().join("two.bin")).unwrap(),
        vec![0, 159, 146, 150]
    );
    assert_eq!(std::fs::read(env.batch_dir().join("three.txt")).unwrap(), b"");
}

#[tokio::test]
async fn test_save_zero_parts_creates_batch() {
    let env = create_test_server();

    let response = env
        .server
        .post("/save")
        .bytes(Bytes::from(raw_multipart(&[])))
        .content_type(&raw_content_type())
        .await;

    response.assert_status_ok();
    response.assert_text("all done!");
    assert!(env.batch_dir().is_dir());
    assert_eq!(std::fs::read_dir(env.batch_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_save_twice_in_same_minute_reuses_batch() {
    let env = create_test_server();

    env.server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("first.txt", b"1")))
        .await
        .assert_status_ok();
    env.server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("second.txt", b"2")))
        .await
        .assert_status_ok();

    assert!(env.batch_dir().join("first.txt").is_file());
    assert!(env.batch_dir().join("second.txt").is_file());
    let batches = std::fs::read_dir(env.root.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "latest")
        .count();
    assert_eq!(batches, 1);
}

#[tokio::test]
async fn test_save_same_name_overwrites() {
    let env = create_test_server();

    for body in [b"old content".as_slice(), b"new".as_slice()] {
        env.server
            .post("/save")
            .multipart(MultipartForm::new().add_part("file", file_part("same.txt", body)))
            .await
            .assert_status_ok();
    }

    assert_eq!(std::fs::read(env.batch_dir().join("same.txt")).unwrap(), b"new");
}

#[cfg(unix)]
#[tokio::test]
async fn test_save_points_latest_at_batch() {
    let env = create_test_server();

    env.server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("a.txt", b"xyz")))
        .await
        .assert_status_ok();

    let link = env.path("latest");
    assert_eq!(std::fs::read_link(&link).unwrap(), std::path::Path::new(BATCH));
    assert_eq!(std::fs::read(link.join("a.txt")).unwrap(), b"xyz");
}

#[tokio::test]
async fn test_save_without_latest_symlink() {
    let env = create_test_server_with(Options {
        latest_symlink: Some(false),
        ..Options::default()
    });

    env.server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("a.txt", b"xyz")))
        .await
        .assert_status_ok();

    assert!(std::fs::symlink_metadata(env.path("latest")).is_err());
    assert!(env.batch_dir().join("a.txt").is_file());
}

// ============================================================================
// Filename Handling
// ============================================================================

#[tokio::test]
async fn test_save_traversal_is_confined() {
    let env = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", file_part("../../escape.txt", b"nope"))
        .add_part("file", file_part("/abs.txt", b"abs"));
    let response = env.server.post("/save").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(std::fs::read(env.batch_dir().join("escape.txt")).unwrap(), b"nope");
    assert_eq!(std::fs::read(env.batch_dir().join("abs.txt")).unwrap(), b"abs");
    assert!(!env.root.path().parent().unwrap().join("escape.txt").exists());
    assert!(!env.path("escape.txt").exists());
}

#[tokio::test]
async fn test_save_nested_name_fails_without_parent_creation() {
    let env = create_test_server();

    let response = env
        .server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("notes/todo.txt", b"hello")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert!(text.starts_with("couldn't write "), "{text}");
    assert!(text.contains("todo.txt"), "{text}");
    assert!(!env.batch_dir().join("notes").exists());
}

#[tokio::test]
async fn test_save_nested_name_with_parent_creation() {
    let env = create_test_server_with(Options {
        create_parent_dirs: true,
        ..Options::default()
    });

    env.server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("notes/todo.txt", b"hello")))
        .await
        .assert_status_ok();

    assert_eq!(
        std::fs::read(env.batch_dir().join("notes").join("todo.txt")).unwrap(),
        b"hello"
    );
}

#[tokio::test]
async fn test_save_part_without_filename_fails() {
    let env = create_test_server();

    let response = env
        .server
        .post("/save")
        .multipart(MultipartForm::new().add_text("comment", "no file here"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("couldn't write "));
}

// ============================================================================
// Failure Paths
// ============================================================================

#[tokio::test]
async fn test_save_garbage_body_is_parse_error() {
    let env = create_test_server();

    let response = env
        .server
        .post("/save")
        .bytes(Bytes::from_static(b"\x00\x01garbage"))
        .content_type("multipart/form-data")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("error parsing form: "));
    assert!(!env.batch_dir().exists());
    assert_eq!(std::fs::read_dir(env.root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_save_non_multipart_is_parse_error() {
    let env = create_test_server();

    let response = env.server.post("/save").text("just text").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("error parsing form: "));
    assert!(!env.batch_dir().exists());
}

#[tokio::test]
async fn test_save_parse_error_as_bad_request() {
    let env = create_test_server_with(Options {
        client_errors_as_bad_request: true,
        ..Options::default()
    });

    let response = env.server.post("/save").text("just text").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().starts_with("error parsing form: "));
}

#[tokio::test]
async fn test_save_batch_name_taken_by_file() {
    let env = create_test_server();
    std::fs::write(env.batch_dir(), b"squatter").unwrap();

    let response = env
        .server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("a.txt", b"xyz")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert_eq!(
        text,
        format!("error creating directory: path {BATCH} exists and is not a directory\n")
    );
    assert_eq!(std::fs::read(env.batch_dir()).unwrap(), b"squatter");
    assert!(!env.path("a.txt").exists());
}

#[tokio::test]
async fn test_save_latest_taken_by_file() {
    let env = create_test_server();
    std::fs::write(env.path("latest"), b"operator notes").unwrap();

    let response = env
        .server
        .post("/save")
        .multipart(MultipartForm::new().add_part("file", file_part("a.txt", b"xyz")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert!(text.starts_with("error creating symlink: "), "{text}");
    assert_eq!(std::fs::read(env.path("latest")).unwrap(), b"operator notes");
    assert!(!env.batch_dir().join("a.txt").exists());
}

#[tokio::test]
async fn test_save_truncated_body_is_read_error() {
    let env = create_test_server();
    let mut body = raw_multipart(&[("a.txt", b"xyz".as_slice())]);
    body.truncate(20);

    let response = env
        .server
        .post("/save")
        .bytes(Bytes::from(body))
        .content_type(&raw_content_type())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("error reading: "));
}

#[tokio::test]
async fn test_save_large_upload_over_default_body_limit() {
    let env = create_test_server();
    let content = vec![b'z'; 3 * 1024 * 1024];

    let response = env
        .server
        .post("/save")
        .bytes(Bytes::from(raw_multipart(&[("big.bin", content.as_slice())])))
        .content_type(&raw_content_type())
        .await;

    response.assert_status_ok();
    assert_eq!(
        std::fs::metadata(env.batch_dir().join("big.bin")).unwrap().len(),
        content.len() as u64
    );
}

#[tokio::test]
async fn test_save_configured_size_limit() {
    let env = create_test_server_with(Options {
        max_upload_size_mb: 1,
        ..Options::default()
    });
    let content = vec![b'z'; 2 * 1024 * 1024];

    let response = env
        .server
        .post("/save")
        .bytes(Bytes::from(raw_multipart(&[("big.bin", content.as_slice())])))
        .content_type(&raw_content_type())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
