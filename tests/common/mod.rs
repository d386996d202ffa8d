pub mod mock_capture;
pub mod mock_tts;

use std::io::Write;
use tempfile::NamedTempFile;
use vocab_coach::lesson::Lesson;

/// Two-paragraph lesson used across integration tests
pub const LESSON_JSON: &str = r#"{
    "title": "速読英単語　必修編　マスターアプリ",
    "subTitle": "01 お茶の木の種類 [文化]",
    "text": {
        "en": "Tea comes from an evergreen plant. There are two main varieties, and each is cultivated in a different climate. Farmers harvest the young leaves by hand.",
        "ja": "茶は常緑植物から作られる。主な変種は二つあり、それぞれ異なる気候で栽培されている。"
    },
    "vocabulary": [
        { "id": "1", "word": "evergreen", "definition": "常緑の",
          "examples": [ { "en": "Pine trees are evergreen.", "ja": "松の木は常緑だ。" } ] },
        { "id": "2", "word": "climate", "definition": "気候",
          "examples": [ { "en": "Tea grows well in a warm climate.", "ja": "茶は温暖な気候でよく育つ。" } ] },
        { "id": "3", "word": "harvest", "definition": "収穫する",
          "examples": [ { "en": "They harvest tea in spring.", "ja": "彼らは春に茶を収穫する。" } ] },
        { "id": "4", "word": "ambitious", "definition": "野心的な" }
    ]
}"#;

/// Write the test lesson to a temp file and load it back
pub fn lesson_file() -> (NamedTempFile, Lesson) {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(LESSON_JSON.as_bytes())
        .expect("Failed to write lesson");
    let lesson = Lesson::load(file.path()).expect("Failed to load lesson");
    (file, lesson)
}
