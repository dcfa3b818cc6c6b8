use std::io::Write;

use storage::json::DEFAULT_COLLECTION;
use storage::{JsonFileSource, QuestionSource, SourceError};

fn write_collection(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[tokio::test]
async fn json_file_source_reads_exported_collection() {
    let file = write_collection(
        r#"{
            "ChessQuestion": {
                "q1": {
                    "question": "Which opening starts 1.e4 c5?",
                    "correctAnswer": "Sicilian Defense",
                    "option": ["French Defense", "Sicilian Defense", "Pirc Defense"]
                },
                "q2": {
                    "question": "Which opening starts 1.e4 e6?",
                    "correctAnswer": "French Defense",
                    "option": ["French Defense", "Caro-Kann Defense"],
                    "imageURL": "https://example.com/french.png"
                }
            }
        }"#,
    );

    let source = JsonFileSource::new(file.path()).with_collection(DEFAULT_COLLECTION);
    let questions = source.fetch().await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].correct_index(), Some(1));
    assert!(questions[1].image_link().is_some());
}

#[tokio::test]
async fn json_file_source_rereads_on_each_fetch() {
    let file = write_collection(r#"[{"question": "Q1"}]"#);
    let source = JsonFileSource::new(file.path());
    assert_eq!(source.fetch().await.unwrap().len(), 1);

    std::fs::write(file.path(), r#"[{"question": "Q1"}, {"question": "Q2"}]"#).unwrap();
    assert_eq!(source.fetch().await.unwrap().len(), 2);
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("absent.json"));
    let err = source.fetch().await.unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
}

#[tokio::test]
async fn empty_collection_is_not_an_error() {
    let file = write_collection("[]");
    let source = JsonFileSource::new(file.path());
    assert!(source.fetch().await.unwrap().is_empty());
}
