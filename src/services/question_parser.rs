//! 题目解析服务 - 业务能力层
//!
//! 只负责把 OCR 文本拆成"题干 + 选项"，不关心文件和监听
//!
//! ## 解析规则
//!
//! 两个状态：`Scanning`（初始）和 `CollectingQuestion`。
//! - 每行先 trim，空行跳过
//! - 以 `Question <n> of <m>` 开头的行切换到 `CollectingQuestion`，该行本身丢弃
//! - `CollectingQuestion` 中的行进入题干缓冲区，遇到以 `?` 结尾的行回到 `Scanning`
//! - `Scanning` 中的行原样进入选项缓冲区
//!
//! 选项固定去掉前两个字符（如 `A)`），长度不超过 2 的行直接丢弃。
//! 这依赖题目界面的固定排版，选项格式不同时结果会不准确。

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{ParsedQuestion, ProcessingOutcome};

/// 选项前缀的固定宽度（字符数）
const OPTION_PREFIX_LEN: usize = 2;

fn question_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^Question \d+ of \d+").expect("题号正则必须合法"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Scanning,
    CollectingQuestion,
}

/// 题目解析服务
///
/// 无状态，`parse` 对同样的输入总是给出同样的结果
#[derive(Debug, Default, Clone, Copy)]
pub struct QuestionParser;

impl QuestionParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析 OCR 输出的整段文本
    pub fn parse_text(&self, text: &str) -> ProcessingOutcome {
        self.parse(text.split('\n'))
    }

    /// 解析按行拆分的 OCR 输出
    pub fn parse<I, S>(&self, lines: I) -> ProcessingOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ParserState::Scanning;
        let mut question: Vec<String> = Vec::new();
        let mut responses: Vec<String> = Vec::new();

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            if question_header().is_match(line) {
                state = ParserState::CollectingQuestion;
                continue;
            }

            match state {
                ParserState::CollectingQuestion => {
                    question.push(line.to_string());
                    if line.ends_with('?') {
                        state = ParserState::Scanning;
                    }
                }
                ParserState::Scanning => responses.push(line.to_string()),
            }
        }

        let question_text = question.join(" ").trim().to_string();
        if question_text.is_empty() {
            return ProcessingOutcome::NoQuestionFound;
        }

        let options = responses
            .iter()
            .filter_map(|response| strip_option_prefix(response))
            .collect();

        ProcessingOutcome::Success(ParsedQuestion::new(question_text, options))
    }
}

/// 去掉选项前缀；长度不超过前缀宽度的行返回 None
fn strip_option_prefix(line: &str) -> Option<String> {
    if line.chars().count() <= OPTION_PREFIX_LEN {
        return None;
    }
    Some(line.chars().skip(OPTION_PREFIX_LEN).collect())
}
