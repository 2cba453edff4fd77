//! 试卷翻译服务 - 业务能力层
//!
//! 把整份试卷从阿拉伯语翻译成英语，结构保持完全一致：
//! `type` 和 `id` 字段原样保留，只翻译面向学生的文本
//! （题干、选项、答案、解析、配对项）。

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::clients::{extract_json, LlmClient};
use crate::config::Config;
use crate::error::GatewayError;
use crate::models::exam::{ExamDocument, Language};

/// 试卷翻译服务
pub struct TranslationService {
    client: LlmClient,
}

impl TranslationService {
    /// 创建新的翻译服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }

    /// 翻译试卷（阿拉伯语 → 英语）
    ///
    /// # 返回
    /// 返回结构一致的英文版试卷文档（`language` 已设为 `en`）
    pub async fn translate(&self, document: &ExamDocument) -> Result<ExamDocument> {
        info!("开始翻译试卷: id = {}", document.id);

        let document_json = serde_json::to_string(document)?;

        let prompt = format!(
            r#"Translate the following exam JSON object from Arabic to English.
Keep the structure exactly the same. Translate question text, options, answers, and explanations.
Do NOT translate 'type' or 'id' values.
Return ONLY the translated JSON object.

JSON:
{}"#,
            document_json
        );

        let response = self.client.chat(&prompt, None, None).await?;

        let json_text = extract_json(&response)?;
        let mut translated: ExamDocument =
            serde_json::from_str(&json_text).context("无法解析翻译网关返回的试卷 JSON")?;

        // 结构一致性检查：题目数量和题号必须与原文对得上
        Self::check_structure(document, &translated)?;

        translated.language = Language::En;

        info!("✓ 试卷翻译完成: id = {}", translated.id);

        Ok(translated)
    }

    /// 校验译文与原文的结构一致性
    fn check_structure(original: &ExamDocument, translated: &ExamDocument) -> Result<()> {
        if original.questions.len() != translated.questions.len() {
            warn!(
                "翻译结果题目数量不一致: 原文 {} 道，译文 {} 道",
                original.questions.len(),
                translated.questions.len()
            );
            return Err(GatewayError::TranslationMismatch {
                expected: original.questions.len(),
                actual: translated.questions.len(),
            }
            .into());
        }

        for (orig, trans) in original.questions.iter().zip(&translated.questions) {
            if orig.id != trans.id || orig.question_type() != trans.question_type() {
                warn!(
                    "翻译结果题目 {} 的 id/type 发生变化",
                    orig.id
                );
                return Err(GatewayError::TranslationMismatch {
                    expected: original.questions.len(),
                    actual: translated.questions.len(),
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::{Question, QuestionBody};

    fn make_document(ids: &[u32]) -> ExamDocument {
        let questions = ids
            .iter()
            .map(|&id| Question {
                id,
                text: format!("سؤال {}", id),
                points: 5.0,
                correct_answer: "A".to_string(),
                explanation: String::new(),
                bloom_level: None,
                body: QuestionBody::Mcq { options: vec![] },
            })
            .collect();

        let mut doc = ExamDocument {
            id: "TEST00001".to_string(),
            version: "A".to_string(),
            timestamp: 0,
            questions,
            total_points: 0.0,
            language: Language::Ar,
            header: None,
        };
        doc.recompute_total_points();
        doc
    }

    #[test]
    fn test_check_structure_accepts_matching_documents() {
        let original = make_document(&[1, 2]);
        let translated = make_document(&[1, 2]);
        assert!(TranslationService::check_structure(&original, &translated).is_ok());
    }

    #[test]
    fn test_check_structure_rejects_dropped_question() {
        let original = make_document(&[1, 2]);
        let translated = make_document(&[1]);
        assert!(TranslationService::check_structure(&original, &translated).is_err());
    }

    #[test]
    fn test_check_structure_rejects_changed_ids() {
        let original = make_document(&[1, 2]);
        let translated = make_document(&[1, 3]);
        assert!(TranslationService::check_structure(&original, &translated).is_err());
    }
}
