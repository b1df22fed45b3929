use crate::error::OcrError;
use crate::models::question::ParsedQuestion;
use serde::Serialize;
use std::fmt;

/// 单张图片的处理结果
///
/// 每个通过过滤和去重的事件恰好产生一个
#[derive(Debug)]
pub enum ProcessingOutcome {
    /// 成功解析出题目
    Success(ParsedQuestion),
    /// 识别出的文字中没有题目
    NoQuestionFound,
    /// OCR 识别失败
    ExtractionFailed(OcrError),
    /// 多次检查后文件仍不存在
    FileNeverAppeared,
}

impl ProcessingOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ProcessingOutcome::Success(_) => OutcomeKind::Success,
            ProcessingOutcome::NoQuestionFound => OutcomeKind::NoQuestionFound,
            ProcessingOutcome::ExtractionFailed(_) => OutcomeKind::ExtractionFailed,
            ProcessingOutcome::FileNeverAppeared => OutcomeKind::FileNeverAppeared,
        }
    }

    /// 成功时返回解析出的题目
    pub fn question(&self) -> Option<&ParsedQuestion> {
        match self {
            ProcessingOutcome::Success(question) => Some(question),
            _ => None,
        }
    }

    /// 失败原因，成功时为 None
    pub fn reason(&self) -> Option<String> {
        match self {
            ProcessingOutcome::Success(_) => None,
            ProcessingOutcome::NoQuestionFound => {
                Some("No question found in the image.".to_string())
            }
            ProcessingOutcome::ExtractionFailed(e) => Some(e.to_string()),
            ProcessingOutcome::FileNeverAppeared => {
                Some("File not found after multiple attempts.".to_string())
            }
        }
    }
}

/// 处理结果类别（不携带数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    NoQuestionFound,
    ExtractionFailed,
    FileNeverAppeared,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::NoQuestionFound => "no_question_found",
            OutcomeKind::ExtractionFailed => "extraction_failed",
            OutcomeKind::FileNeverAppeared => "file_never_appeared",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
