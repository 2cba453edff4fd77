//! # Exam Generator
//!
//! 一个基于生成式 AI 的试卷生成与判分工具
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 核心变换层（纯函数）
//! - `layout` - 排版解析器：规范排序、答题卡行展平、两列切分
//! - `scoring` - 判分引擎：精确匹配判分、百分比计算
//!
//! ### ② 数据模型层（Models）
//! - `models/exam` - 试卷文档、题目（tagged union）、枚举
//! - `models/grading` - 批改网关的响应结构
//!
//! ### ③ 业务能力层（Services）
//! - `GenerationService` - 试卷生成网关
//! - `TranslationService` - 试卷翻译网关
//! - `GradingService` - 答题卡批改网关（OMR）
//! - `HistoryService` - 历史记录持久化
//!
//! ### ④ 基础设施层（Clients / Utils）
//! - `LlmClient` - OpenAI 兼容 API 客户端（支持图片输入）
//! - `utils/logging` - 日志初始化
//!
//! ### ⑤ 编排层（App）
//! - `app` - 生成 → 提交历史 → 输出报告

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod scoring;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{ConfigError, GatewayError, HistoryError, ValidationError};
pub use layout::{flatten_rows, sort_and_reindex, split_columns, RenderRow};
pub use models::exam::{ExamDocument, GenerateRequest, Question, QuestionType};
pub use models::grading::GradingResult;
pub use scoring::{score_exam, ScoreReport};
