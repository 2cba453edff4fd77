//! 应用编排层
//!
//! 管理单次"生成 → 提交历史 → 输出报告"的完整流程。
//! 核心变换（排版、判分）都是纯函数，本层负责把结果写回
//! 唯一的文档槽位并显式提交到历史记录。

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::layout;
use crate::models::exam::{
    Difficulty, ExamDocument, ExamHeader, ExamType, GenerateRequest, QuestionType,
};
use crate::services::{GenerationService, HistoryService};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    generation: GenerationService,
    history: HistoryService,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        logging::log_startup(&config.llm_model_name, &config.history_folder);

        let generation = GenerationService::new(&config);
        let history = HistoryService::new(config.history_folder.clone());

        Self {
            config,
            generation,
            history,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 读取素材文本
        let source_text = fs::read_to_string(&self.config.source_file)
            .await
            .with_context(|| format!("无法读取素材文件: {}", self.config.source_file))?;

        info!(
            "📖 素材加载完成: {} ({} 字符)",
            self.config.source_file,
            source_text.chars().count()
        );

        let request = self.build_request(source_text);

        // 生成试卷（单次请求，失败直接上报，由用户重新触发）
        let document = self.generation.generate(&request).await?;

        if let Err(e) = document.validate() {
            warn!("⚠️ 生成的试卷违反文档不变量: {}", e);
        }

        // 显式提交到历史记录
        self.history.save(&document).await?;
        info!("💾 试卷已提交到历史记录: {}", document.id);

        self.report(&document);

        Ok(())
    }

    /// 从配置构建生成请求
    fn build_request(&self, source_text: String) -> GenerateRequest {
        let difficulty = Difficulty::parse(&self.config.difficulty).unwrap_or_else(|| {
            warn!(
                "无法解析难度配置 '{}', 使用默认值 medium",
                self.config.difficulty
            );
            Difficulty::Medium
        });

        GenerateRequest {
            header: ExamHeader {
                teacher_name: self.config.teacher_name.clone(),
                school_name: self.config.school_name.clone(),
                subject: self.config.subject.clone(),
                grade_level: self.config.grade_level.clone(),
                term: "الفصل الدراسي الأول".to_string(),
                year: "1446".to_string(),
                exam_type: ExamType::Quiz,
            },
            source_text,
            source_images: Vec::new(),
            source_pdf: None,
            pdf_page_range: None,
            difficulty,
            question_count: self.config.question_count,
            total_marks: self.config.total_marks,
            include_types: vec![
                QuestionType::Mcq,
                QuestionType::TrueFalse,
                QuestionType::Matching,
                QuestionType::Essay,
            ],
        }
    }

    /// 输出试卷报告（题型构成和答题卡版面信息）
    fn report(&self, document: &ExamDocument) {
        info!("{}", "=".repeat(60));
        info!("📊 试卷报告: {} (版本 {})", document.id, document.version);

        for (question_type, count) in document.type_counts() {
            info!("  {} × {}", question_type.name(), count);
        }
        info!("  总分: {}", document.total_points);

        // 答题卡版面：展平为可作答行，再按两列切分
        let rows = layout::flatten_rows(&document.questions);
        let (col1, col2) = layout::split_columns(&rows);
        let essays = layout::essay_questions(&document.questions);

        info!(
            "🖨️ 答题卡: 共 {} 行（第一列 {} 行，第二列 {} 行），主观题 {} 道",
            rows.len(),
            col1.len(),
            col2.len(),
            essays.len()
        );

        if self.config.verbose_logging {
            for row in &rows {
                info!(
                    "    行 {} ({}{})",
                    row.label,
                    row.question_type.name(),
                    if row.sub_item { "，子项" } else { "" }
                );
            }
        }

        info!("{}", "=".repeat(60));
    }
}
