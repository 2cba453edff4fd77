//! 应用程序错误类型
//!
//! 错误分为四类：输入校验错误（调用网关之前就拒绝）、
//! 网关错误（生成/翻译/批改调用失败或返回无法解析的数据）、
//! 历史记录错误（磁盘持久化失败）、配置错误（启动时加载失败）。
//! 核心变换（排版、判分）是全函数，正常情况下不产生错误。

use thiserror::Error;

/// 输入校验错误（在调用任何网关之前拒绝）
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 没有提供任何素材
    #[error("没有提供素材：需要文本、图片或 PDF 中的至少一种")]
    NoSourceMaterial,
    /// 没有选择题型
    #[error("没有选择任何题型")]
    NoQuestionTypes,
    /// 题目数量无效
    #[error("题目数量无效: {count}")]
    InvalidQuestionCount { count: u32 },
}

/// 网关调用错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// LLM API 调用失败
    #[error("LLM API 调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// LLM 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 响应中找不到 JSON
    #[error("响应中找不到 JSON 内容: {preview}")]
    NoJsonInResponse { preview: String },
    /// JSON 解析失败
    #[error("JSON 解析失败: {source}")]
    JsonParseFailed {
        #[from]
        source: serde_json::Error,
    },
    /// 翻译结果结构不一致
    #[error("翻译结果结构不一致: 原文 {expected} 道题，译文 {actual} 道题")]
    TranslationMismatch { expected: usize, actual: usize },
}

/// 历史记录错误
#[derive(Debug, Error)]
pub enum HistoryError {
    /// 指定的试卷不存在
    #[error("试卷不存在: {id}")]
    NotFound { id: String },
    /// 文件读写失败
    #[error("历史记录文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("配置文件读取失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
