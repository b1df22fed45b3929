use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// 从截图中解析出的题目
///
/// 构造后不再修改，处理完一张图片后立即上报
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuestion {
    question_text: String,
    options: Vec<String>,
}

impl ParsedQuestion {
    pub fn new(question_text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            question_text: question_text.into(),
            options,
        }
    }

    /// 题干
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    /// 选项（按出现顺序）
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// 转换为 `{"Question": ..., "Response 1": ..., ...}` 形式的记录
    pub fn to_record(&self) -> JsonValue {
        let mut record = Map::new();
        record.insert(
            "Question".to_string(),
            JsonValue::String(self.question_text.clone()),
        );
        for (idx, option) in self.options.iter().enumerate() {
            record.insert(
                format!("Response {}", idx + 1),
                JsonValue::String(option.clone()),
            );
        }
        JsonValue::Object(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_record_numbers_responses_from_one() {
        let question = ParsedQuestion::new(
            "Which planet is red?",
            vec!["Earth".to_string(), "Mars".to_string()],
        );

        assert_eq!(
            question.to_record(),
            json!({
                "Question": "Which planet is red?",
                "Response 1": "Earth",
                "Response 2": "Mars",
            })
        );
    }

    #[test]
    fn test_to_record_without_options() {
        let question = ParsedQuestion::new("What is the capital?", Vec::new());
        assert_eq!(
            question.to_record(),
            json!({ "Question": "What is the capital?" })
        );
    }
}
