//! # クイズ
//!
//! クイズ（`Quizzes` テーブルの1アイテム）と、それに埋め込まれる設問を定義する。
//!
//! ## ライフサイクル
//!
//! 1. 作成: 設問リストは空
//! 2. 設問追加: リスト末尾への追記のみ（既存設問の更新・削除は提供しない）
//! 3. 削除
//!
//! `quizName` / `createdBy` は作成後に変更しない。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::quiz_id::QuizId;

/// 設問
///
/// クイズに埋め込まれ、単独では参照されない。
/// `coordinates` は呼び出し元が渡す任意の JSON 値で、構造を解釈しない。
/// キーの省略は `None`、明示的な `null` は `Some(Value::Null)` として区別する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question:    String,
    pub answer:      String,
    #[serde(
        default,
        deserialize_with = "deserialize_coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Value>,
}

/// キーが存在すれば `null` を含めて `Some` にする
///
/// `#[serde(default)]` と組み合わせ、キーが省略された場合のみ `None` になる。
pub fn deserialize_coordinates<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// クイズ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    quiz_id:    QuizId,
    quiz_name:  String,
    created_by: String,
    questions:  Vec<Question>,
}

impl Quiz {
    /// 設問が空の新しいクイズを作成する
    pub fn new(quiz_id: QuizId, quiz_name: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            quiz_id,
            quiz_name: quiz_name.into(),
            created_by: created_by.into(),
            questions: Vec::new(),
        }
    }

    /// 永続化済みの値から復元する
    pub fn from_stored(
        quiz_id: QuizId,
        quiz_name: String,
        created_by: String,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            quiz_id,
            quiz_name,
            created_by,
            questions,
        }
    }

    /// 設問を末尾に追加したクイズを返す
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn question(text: &str) -> Question {
        Question {
            question:    text.to_string(),
            answer:      "answer".to_string(),
            coordinates: None,
        }
    }

    #[test]
    fn test_新規クイズの設問は空() {
        let sut = Quiz::new(QuizId::new("1"), "Capitals", "alice");

        assert!(sut.questions().is_empty());
        assert_eq!(sut.quiz_name(), "Capitals");
        assert_eq!(sut.created_by(), "alice");
    }

    #[test]
    fn test_設問は追加順に並ぶ() {
        let sut = Quiz::new(QuizId::new("1"), "Capitals", "alice")
            .with_question(question("first"))
            .with_question(question("second"));

        let texts: Vec<&str> = sut.questions().iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_クイズはcamel_caseのjsonになる() {
        let sut = Quiz::new(QuizId::new("1700000000123"), "Capitals", "alice");

        assert_eq!(
            serde_json::to_value(&sut).unwrap(),
            json!({
                "quizId": "1700000000123",
                "quizName": "Capitals",
                "createdBy": "alice",
                "questions": []
            })
        );
    }

    #[test]
    fn test_座標なしの設問はcoordinatesを出力しない() {
        let json = serde_json::to_value(question("q")).unwrap();

        assert!(json.get("coordinates").is_none());
    }

    #[test]
    fn test_座標は任意のjson値をそのまま保持する() {
        let coordinates = json!({ "lat": 35.6812, "lng": 139.7671, "tags": ["station"] });
        let parsed: Question = serde_json::from_value(json!({
            "question": "Where?",
            "answer": "Tokyo",
            "coordinates": coordinates,
        }))
        .unwrap();

        assert_eq!(parsed.coordinates, Some(coordinates));
    }

    #[test]
    fn test_明示的なnullの座標は省略と区別して保持される() {
        let explicit: Question =
            serde_json::from_value(json!({ "question": "Q", "answer": "A", "coordinates": null }))
                .unwrap();
        let omitted: Question =
            serde_json::from_value(json!({ "question": "Q", "answer": "A" })).unwrap();

        assert_eq!(explicit.coordinates, Some(Value::Null));
        assert_eq!(
            serde_json::to_value(&explicit).unwrap(),
            json!({ "question": "Q", "answer": "A", "coordinates": null })
        );
        assert_eq!(omitted.coordinates, None);
    }
}
