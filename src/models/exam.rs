//! 试卷数据模型
//!
//! 定义生成的试卷（ExamDocument）及其题目的规范结构。
//! 题目使用带标签的枚举（tagged union）表示：每种题型只携带自己需要的字段，
//! 从根本上避免"字段存在但题型不符"的问题。

use serde::{Deserialize, Serialize};

/// 题型枚举
///
/// 排序优先级固定：选择题 → 判断题 → 连线题 → 问答题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 选择题（四个选项）
    Mcq,
    /// 判断题（对/错）
    TrueFalse,
    /// 连线题（左右配对）
    Matching,
    /// 问答题（主观题）
    Essay,
}

impl QuestionType {
    /// 获取排序优先级（数值越小越靠前）
    pub fn priority(self) -> u8 {
        match self {
            QuestionType::Mcq => 1,
            QuestionType::TrueFalse => 2,
            QuestionType::Matching => 3,
            QuestionType::Essay => 4,
        }
    }

    /// 获取题型名称（用于日志）
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::Mcq => "选择题",
            QuestionType::TrueFalse => "判断题",
            QuestionType::Matching => "连线题",
            QuestionType::Essay => "问答题",
        }
    }
}

/// 连线题的一对配对项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

/// 题目变体数据
///
/// 通过 `type` 字段区分题型，每个变体只包含该题型相关的字段。
/// 连线题的 `matching_pairs` 允许缺失（模型偶尔漏掉），缺失时按空列表处理。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    Mcq {
        options: Vec<String>,
    },
    TrueFalse,
    Matching {
        #[serde(default, rename = "matchingPairs")]
        matching_pairs: Vec<MatchingPair>,
    },
    Essay,
}

impl QuestionBody {
    /// 获取对应的题型
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionBody::Mcq { .. } => QuestionType::Mcq,
            QuestionBody::TrueFalse => QuestionType::TrueFalse,
            QuestionBody::Matching { .. } => QuestionType::Matching,
            QuestionBody::Essay => QuestionType::Essay,
        }
    }
}

/// 布鲁姆认知层级（仅用于展示标注）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

/// 单个题目
///
/// 公共字段 + 题型变体（通过 serde flatten 展平，保持与生成网关的 JSON 结构一致）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 题号（显示顺序中从 1 开始连续编号，由排版解析器维护）
    pub id: u32,
    /// 题干文本
    pub text: String,
    /// 分值
    pub points: f64,
    /// 正确答案（判分时按字符串精确匹配）
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    /// 答案解析（复习模式展示用）
    pub explanation: String,
    /// 布鲁姆层级（可选，仅展示用）
    #[serde(
        rename = "bloomLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bloom_level: Option<BloomLevel>,
    /// 题型变体数据
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl Question {
    /// 获取题型
    pub fn question_type(&self) -> QuestionType {
        self.body.question_type()
    }

    /// 是否可以自动判分（只有选择题和判断题可以）
    pub fn is_auto_gradable(&self) -> bool {
        matches!(
            self.question_type(),
            QuestionType::Mcq | QuestionType::TrueFalse
        )
    }
}

/// 试卷语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// 阿拉伯语（主语言）
    Ar,
    /// 英语（副语言）
    En,
}

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 从配置字符串解析难度
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// 考试类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Final,
    Midterm1,
    Midterm2,
    #[default]
    Quiz,
}

/// 试卷抬头信息（教师/学校标识，核心变换不使用，仅透传给展示层）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamHeader {
    #[serde(rename = "teacherName")]
    pub teacher_name: String,
    #[serde(rename = "schoolName")]
    pub school_name: String,
    pub subject: String,
    #[serde(rename = "gradeLevel")]
    pub grade_level: String,
    pub term: String,
    pub year: String,
    #[serde(rename = "examType", default)]
    pub exam_type: ExamType,
}

/// 试卷文档
///
/// 由生成网关创建，之后只做字段级修改（不改题型），通过显式提交写入历史记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDocument {
    /// 唯一标识（生成时分配，用于 QR 校验和历史记录查找）
    pub id: String,
    /// 试卷版本（'A' / 'B' / 'C'，区分同一考试的平行卷）
    pub version: String,
    /// 创建时间戳（毫秒，仅用于历史记录排序）
    pub timestamp: i64,
    /// 题目列表（顺序有意义：显示顺序即判分顺序）
    pub questions: Vec<Question>,
    /// 总分（不变量：必须等于各题分值之和）
    #[serde(rename = "totalPoints")]
    pub total_points: f64,
    /// 试卷语言
    pub language: Language,
    /// 抬头信息（可选，历史记录中保留副本）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ExamHeader>,
}

impl ExamDocument {
    /// 重新计算总分，使其等于各题分值之和
    ///
    /// 任何修改题目分值的操作之后都必须调用本方法维持不变量。
    pub fn recompute_total_points(&mut self) {
        self.total_points = self.questions.iter().map(|q| q.points).sum();
    }

    /// 校验文档不变量
    ///
    /// - 题号必须从 1 开始连续无重复
    /// - 总分必须等于各题分值之和
    pub fn validate(&self) -> Result<(), String> {
        for (index, question) in self.questions.iter().enumerate() {
            let expected = (index + 1) as u32;
            if question.id != expected {
                return Err(format!(
                    "题号不连续: 第 {} 个题目的题号是 {}",
                    expected, question.id
                ));
            }
        }

        let sum: f64 = self.questions.iter().map(|q| q.points).sum();
        if (sum - self.total_points).abs() > 1e-6 {
            return Err(format!(
                "总分不一致: totalPoints = {}, 各题分值之和 = {}",
                self.total_points, sum
            ));
        }

        Ok(())
    }

    /// 按题型统计题目数量（用于日志输出）
    pub fn type_counts(&self) -> Vec<(QuestionType, usize)> {
        let types = [
            QuestionType::Mcq,
            QuestionType::TrueFalse,
            QuestionType::Matching,
            QuestionType::Essay,
        ];

        types
            .iter()
            .map(|&t| {
                let count = self
                    .questions
                    .iter()
                    .filter(|q| q.question_type() == t)
                    .count();
                (t, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// 生成请求
///
/// 教师提供的素材和约束，交给生成网关产出试卷。
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// 抬头信息
    pub header: ExamHeader,
    /// 素材文本
    pub source_text: String,
    /// 素材图片（data URL 列表）
    pub source_images: Vec<String>,
    /// 素材 PDF（data URL，可选）
    pub source_pdf: Option<String>,
    /// PDF 页码范围（起止页，可选，仅在提供 PDF 时有效）
    pub pdf_page_range: Option<(u32, u32)>,
    /// 难度
    pub difficulty: Difficulty,
    /// 期望题目数量
    pub question_count: u32,
    /// 期望总分
    pub total_marks: f64,
    /// 期望包含的题型
    pub include_types: Vec<QuestionType>,
}
