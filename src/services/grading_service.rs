//! 自动批改服务 - 业务能力层
//!
//! 把学生答题卡的照片和标准答案摘要交给批改网关（OMR 识别），
//! 拿回逐题批改结果。识别是尽力而为的：姓名读不出来会返回 "غير معروف"，
//! 结果只用于展示，绝不回流到本地判分引擎。

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::clients::{extract_json, LlmClient};
use crate::config::Config;
use crate::models::exam::ExamDocument;
use crate::models::grading::GradingResult;

/// 自动批改服务
pub struct GradingService {
    client: LlmClient,
}

impl GradingService {
    /// 创建新的批改服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }

    /// 批改答题卡照片
    ///
    /// # 参数
    /// - `sheet_image`: 答题卡照片（data URL）
    /// - `document`: 对应的试卷文档（提供标准答案摘要）
    ///
    /// # 返回
    /// 返回批改结果（学生姓名、得分、逐题批改记录）
    pub async fn grade_sheet(
        &self,
        sheet_image: &str,
        document: &ExamDocument,
    ) -> Result<GradingResult> {
        info!("开始批改答题卡: 试卷 id = {}", document.id);

        let answer_key = Self::build_answer_key(document)?;

        let prompt = format!(
            r#"أنت نظام تصحيح آلي (OMR) ذكي.
لديك صورة لورقة إجابة طالب (تظليل) ونموذج الإجابة الصحيحة بصيغة JSON.

المهام المطلوبة:
1. ابحث عن الباركود (QR Code) في الورقة للتحقق من أن الورقة تتبع النموذج رقم {id} الإصدار {version}. (تجاوز هذا التحقق إذا لم يكن واضحاً).
2. حاول قراءة اسم الطالب المكتوب بخط اليد. إذا لم يكن واضحاً فاكتب "غير معروف".
3. قارن إجابة الطالب بالإجابة الصحيحة.
4. احسب الدرجة المكتسبة.

نموذج الإجابة الصحيحة:
{answer_key}

أرجع النتيجة بصيغة JSON فقط بالبنية التالية:
{{
  "studentName": "<اسم الطالب أو 'غير معروف'>",
  "score": <number>,
  "totalScore": <number>,
  "corrections": [
    {{"questionId": <integer>, "studentAnswer": "<...>", "correctAnswer": "<...>", "isCorrect": <bool>}}
  ]
}}"#,
            id = document.id,
            version = document.version,
            answer_key = answer_key,
        );

        let images = vec![sheet_image.to_string()];
        let response = self.client.chat(&prompt, None, Some(&images)).await?;

        let json_text = extract_json(&response)?;
        let result: GradingResult =
            serde_json::from_str(&json_text).context("无法解析批改网关返回的结果 JSON")?;

        info!(
            "✓ 批改完成: 学生 {}, 得分 {}/{}",
            result.student_name, result.score, result.total_score
        );

        Ok(result)
    }

    /// 构建标准答案摘要（id、题型、正确答案、分值）
    ///
    /// 题型用线上格式的标签（mcq / true_false / ...），与答题卡布局对应。
    fn build_answer_key(document: &ExamDocument) -> Result<String> {
        let entries: Vec<serde_json::Value> = document
            .questions
            .iter()
            .map(|q| {
                json!({
                    "id": q.id,
                    "type": q.question_type(),
                    "correctAnswer": q.correct_answer,
                    "points": q.points,
                })
            })
            .collect();

        Ok(serde_json::to_string(&entries)?)
    }
}
