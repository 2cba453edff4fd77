//! 试卷生成服务 - 业务能力层
//!
//! 只负责"调用生成网关产出试卷"能力，不关心流程。
//! 提示词约定（prompt 级别契约，不在代码层强制）：
//! 各题分值之和等于请求的总分；每道题必须带答案、解析和布鲁姆层级。
//! 代码层在拿到结果后重新排序、重新编号并重算总分，保证文档不变量成立。

use anyhow::{Context, Result};
use phf::phf_map;
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::clients::{extract_json, LlmClient};
use crate::config::Config;
use crate::error::ValidationError;
use crate::layout;
use crate::models::exam::{
    Difficulty, ExamDocument, ExamType, GenerateRequest, Language, Question, QuestionType,
};

/// 难度的阿拉伯语标签
static DIFFICULTY_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "easy" => "سهل",
    "medium" => "متوسط",
    "hard" => "صعب",
};

/// 考试类型的阿拉伯语标签
static EXAM_TYPE_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "final" => "اختبار نهائي",
    "midterm1" => "اختبار فتري أول",
    "midterm2" => "اختبار فتري ثاني",
    "quiz" => "اختبار قصير",
};

/// 生成网关返回的原始结构（元数据在本地补齐）
#[derive(Debug, Deserialize)]
struct RawExam {
    questions: Vec<Question>,
    #[serde(rename = "totalPoints")]
    total_points: f64,
}

/// 试卷生成服务
///
/// 职责：
/// - 校验教师输入（素材、题型）
/// - 构建生成提示词并调用 LLM
/// - 解析响应、规范排序、补齐元数据
/// - 不接触历史记录，不关心流程顺序
pub struct GenerationService {
    client: LlmClient,
}

impl GenerationService {
    /// 创建新的生成服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }

    /// 生成试卷
    ///
    /// # 参数
    /// - `request`: 教师提供的素材和约束
    ///
    /// # 返回
    /// 返回规范化后的试卷文档（已排序、重新编号、总分与各题之和一致）
    pub async fn generate(&self, request: &GenerateRequest) -> Result<ExamDocument> {
        Self::validate_request(request)?;

        info!(
            "开始生成试卷: 科目 {}, 难度 {:?}, 题数 {}, 总分 {}",
            request.header.subject, request.difficulty, request.question_count, request.total_marks
        );

        let prompt = Self::build_prompt(request);

        // 图片和 PDF 都作为多媒体部分附加到用户消息中
        let mut attachments = request.source_images.clone();
        if let Some(pdf) = &request.source_pdf {
            attachments.push(pdf.clone());
        }
        let attachments = if attachments.is_empty() {
            None
        } else {
            Some(attachments.as_slice())
        };

        let response = self.client.chat(&prompt, None, attachments).await?;

        let json_text = extract_json(&response)?;
        let raw: RawExam =
            serde_json::from_str(&json_text).context("无法解析生成网关返回的试卷 JSON")?;

        debug!("生成网关返回 {} 道题", raw.questions.len());

        Ok(Self::finalize(raw, request))
    }

    /// 输入校验（在调用网关之前拒绝无效请求）
    fn validate_request(request: &GenerateRequest) -> Result<()> {
        let has_source = !request.source_text.trim().is_empty()
            || !request.source_images.is_empty()
            || request.source_pdf.is_some();
        if !has_source {
            return Err(ValidationError::NoSourceMaterial.into());
        }

        if request.include_types.is_empty() {
            return Err(ValidationError::NoQuestionTypes.into());
        }

        if request.question_count == 0 {
            return Err(ValidationError::InvalidQuestionCount { count: 0 }.into());
        }

        Ok(())
    }

    /// 构建生成提示词（阿拉伯语，附 JSON 结构约定）
    fn build_prompt(request: &GenerateRequest) -> String {
        let difficulty_label = difficulty_label(request.difficulty);
        let exam_type_label = exam_type_label(request.header.exam_type);

        // PDF 页码范围限制
        let page_instruction = match (&request.source_pdf, request.pdf_page_range) {
            (Some(_), Some((start, end))) => format!(
                "\nتنبيه هام جداً: الملف المرفق هو كتاب كامل.\n\
                 يجب عليك الالتزام واستخراج الأسئلة حصرياً من المحتوى الموجود بين الصفحة رقم {} والصفحة رقم {} فقط.\n\
                 تجاهل أي محتوى خارج هذا النطاق من الصفحات.\n",
                start, end
            ),
            _ => String::new(),
        };

        // 题型菜单
        let type_menu: Vec<&str> = request
            .include_types
            .iter()
            .map(|t| match t {
                QuestionType::Mcq => "اختيارات متعددة (4 خيارات)",
                QuestionType::TrueFalse => "صح وخطأ",
                QuestionType::Matching => "مزاوجة (صل العمود الأول بالثاني)",
                QuestionType::Essay => "مقالي",
            })
            .collect();

        let source_section = if request.source_text.trim().is_empty() {
            String::new()
        } else {
            format!("\nنص المحتوى المصدري:\n{}\n", request.source_text)
        };

        format!(
            r#"أنت خبير تربوي ومدرس محترف. قم بإنشاء {exam_type} لمادة {subject}.
{page_instruction}
المحتوى المطلوب للاختبار يجب أن يعتمد على النص، ملف PDF، أو الصور المرفقة.
مستوى الصعوبة: {difficulty}.
عدد الأسئلة المطلوبة: {count} تقريباً.
الدرجة الكلية للاختبار يجب أن تكون: {marks}.

أنواع الأسئلة المطلوبة: {types}.

مهم جداً:
1. قم بتوزيع الدرجات ({marks}) على الأسئلة بناءً على صعوبتها ونوعها.
2. لكل سؤال، حدد "تصنيف بلوم" (Bloom's Taxonomy) المناسب (تذكر، فهم، تطبيق، تحليل، تقييم، ابتكار).
3. لكل سؤال، يجب توفير الإجابة الصحيحة وتفسير للإجابة.

أرجع النتيجة بصيغة JSON فقط، بدون أي نص إضافي، بالبنية التالية:
{{
  "totalPoints": <number>,
  "questions": [
    {{
      "id": <integer>,
      "type": "mcq" | "true_false" | "matching" | "essay",
      "text": "<نص السؤال>",
      "points": <number>,
      "bloomLevel": "remember" | "understand" | "apply" | "analyze" | "evaluate" | "create",
      "options": ["..."],
      "correctAnswer": "<الإجابة الصحيحة نصاً>",
      "explanation": "<شرح الإجابة للطلاب>",
      "matchingPairs": [{{"left": "...", "right": "..."}}]
    }}
  ]
}}
حقل "options" مطلوب فقط لأسئلة الاختيارات المتعددة، وحقل "matchingPairs" مطلوب فقط لأسئلة المزاوجة.
{source}"#,
            exam_type = exam_type_label,
            subject = request.header.subject,
            page_instruction = page_instruction,
            difficulty = difficulty_label,
            count = request.question_count,
            marks = request.total_marks,
            types = type_menu.join(", "),
            source = source_section,
        )
    }

    /// 规范化生成结果：排序、重新编号、补齐元数据、重算总分
    fn finalize(raw: RawExam, request: &GenerateRequest) -> ExamDocument {
        let questions = layout::sort_and_reindex(raw.questions);

        let mut document = ExamDocument {
            id: generate_exam_id(),
            version: "A".to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            questions,
            total_points: raw.total_points,
            language: Language::Ar,
            header: Some(request.header.clone()),
        };

        // 以各题分值之和为准：模型分配偏差时总分跟着题目走
        let reported = document.total_points;
        document.recompute_total_points();
        if (reported - document.total_points).abs() > 1e-6 {
            warn!(
                "生成网关报告的总分 {} 与各题之和 {} 不一致，以各题之和为准",
                reported, document.total_points
            );
        }

        info!(
            "✓ 试卷生成完成: id = {}, {} 道题, 总分 {}",
            document.id,
            document.questions.len(),
            document.total_points
        );

        document
    }
}

/// 获取难度的阿拉伯语标签
fn difficulty_label(difficulty: Difficulty) -> &'static str {
    let key = match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    };
    DIFFICULTY_LABELS.get(key).copied().unwrap_or("متوسط")
}

/// 获取考试类型的阿拉伯语标签
fn exam_type_label(exam_type: ExamType) -> &'static str {
    let key = match exam_type {
        ExamType::Final => "final",
        ExamType::Midterm1 => "midterm1",
        ExamType::Midterm2 => "midterm2",
        ExamType::Quiz => "quiz",
    };
    EXAM_TYPE_LABELS.get(key).copied().unwrap_or("اختبار")
}

/// 生成试卷唯一标识（9 位大写字母数字，用于 QR 校验链接）
fn generate_exam_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}
