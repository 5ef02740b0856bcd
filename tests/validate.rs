//! End-to-end checks of the public `Validator` against a local HTTP server.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use image::ImageFormat;
use inputgate::validation::{
    Code, FieldStatus, HttpImageFetcher, Status, ValidationError, ValidationOptions, Validator,
};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("Failed to create test image");
    buffer
}

/// Serves the given paths until the test process exits; unknown paths get a 404
fn serve(files: HashMap<&'static str, Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(request_line) = read_request_head(&stream) else { continue };
            let path = request_line.split_whitespace().nth(1).unwrap_or("/");

            let (status, body) = match files.get(path) {
                Some(body) => ("200 OK", body.clone()),
                None => ("404 Not Found", Vec::new()),
            };
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
    });
    base
}

/// Consumes the request head and returns its first line
fn read_request_head(stream: &TcpStream) -> Option<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
    Some(request_line)
}

fn validator() -> Validator<HttpImageFetcher> {
    Validator::new(HttpImageFetcher::new(Duration::from_secs(5)).unwrap())
}

#[test]
fn test_missing_image_is_unreadable() {
    let base = serve(HashMap::new());
    let verdict = validator()
        .validate("", &format!("{}/missing.png", base), &ValidationOptions::default())
        .unwrap();

    assert_eq!(verdict.status_code, Code::ImageUnreadable);
    assert_eq!(verdict.status, Status::Error);
    assert!(verdict.error_message.contains("image 1"));
    assert_eq!(verdict.image_status, FieldStatus::Failed);
}

#[test]
fn test_remote_images_pass_all_rules() {
    let base = serve(HashMap::from([
        ("/wide.png", png(1600, 900)),
        ("/photo.png", png(800, 600)),
    ]));
    let options = ValidationOptions {
        image_count_limit: "1,5".to_string(),
        long_edge_limit: "500,2000".to_string(),
        short_edge_limit: "300,0".to_string(),
        fixed_ratios: "16:9,4:3".to_string(),
        image_formats: "png,jpg".to_string(),
        ..Default::default()
    };
    let urls = format!("{0}/wide.png\n{0}/photo.png", base);

    let verdict = validator().validate("a cat", &urls, &options).unwrap();

    assert!(verdict.is_success(), "unexpected verdict: {:?}", verdict);
    assert_eq!(verdict.image_urls, urls);
    assert_eq!(verdict.prompt_status, FieldStatus::Success);
    assert_eq!(verdict.image_status, FieldStatus::Success);
}

#[test]
fn test_prompt_and_image_failures_together() {
    let base = serve(HashMap::from([("/small.png", png(100, 100))]));
    let options = ValidationOptions {
        supported_languages: "zh".to_string(),
        short_edge_limit: "512,0".to_string(),
        ..Default::default()
    };

    let verdict = validator()
        .validate("english only", &format!("{}/small.png", base), &options)
        .unwrap();

    assert_eq!(verdict.status_code, Code::UnsupportedLanguage);
    assert_eq!(verdict.prompt_status, FieldStatus::Failed);
    assert_eq!(verdict.image_status, FieldStatus::Failed);
}

#[test]
fn test_rejection_is_signalled() {
    let base = serve(HashMap::from([("/small.png", png(100, 100))]));
    let options = ValidationOptions {
        short_edge_limit: "512,0".to_string(),
        trigger_system_error: true,
        ..Default::default()
    };

    let result = validator().validate("", &format!("{}/small.png", base), &options);

    match result {
        Err(ValidationError::Rejected { code, message }) => {
            assert_eq!(code, Code::ShortEdgeTooShort);
            assert!(message.starts_with("image 1: "));
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[test]
fn test_verdict_json_shape() {
    let verdict = validator()
        .validate("", "", &ValidationOptions::default())
        .unwrap();
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["status_code"], "400");
    assert_eq!(json["status"], "error");
    assert_eq!(json["prompt_status"], "no_input");
    assert_eq!(json["image_status"], "no_input");
    assert_eq!(json["image_urls"], "");
}
