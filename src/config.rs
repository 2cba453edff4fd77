use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 存储配置 ---
    /// 历史记录存放目录
    pub history_folder: String,
    /// 素材文本文件路径
    pub source_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 试卷默认参数（无界面模式下代替教师在界面上的输入） ---
    pub teacher_name: String,
    pub school_name: String,
    pub subject: String,
    pub grade_level: String,
    /// 难度（easy / medium / hard）
    pub difficulty: String,
    /// 期望题目数量
    pub question_count: u32,
    /// 期望总分
    pub total_marks: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            history_folder: "exam_history".to_string(),
            source_file: "source.txt".to_string(),
            verbose_logging: false,
            teacher_name: String::new(),
            school_name: String::new(),
            subject: "العلوم".to_string(),
            grade_level: String::new(),
            difficulty: "medium".to_string(),
            question_count: 10,
            total_marks: 20.0,
        }
    }
}

/// 配置文件结构（所有字段可选，缺失的字段用默认值补齐）
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    history_folder: Option<String>,
    source_file: Option<String>,
    verbose_logging: Option<bool>,
    teacher_name: Option<String>,
    school_name: Option<String>,
    subject: Option<String>,
    grade_level: Option<String>,
    difficulty: Option<String>,
    question_count: Option<u32>,
    total_marks: Option<f64>,
}

impl Config {
    /// 从环境变量加载配置（覆盖默认值）
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// 加载配置：先读配置文件（如果存在），再用环境变量覆盖
    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let file = if Path::new(config_path).exists() {
            let content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadFailed {
                    path: config_path.to_string(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| ConfigError::TomlParseFailed {
                path: config_path.to_string(),
                source: e,
            })?
        } else {
            ConfigFile::default()
        };

        let mut config = Self::default().merge(file);
        config.apply_env();
        Ok(config)
    }

    fn merge(self, file: ConfigFile) -> Self {
        Self {
            llm_api_key: file.llm_api_key.unwrap_or(self.llm_api_key),
            llm_api_base_url: file.llm_api_base_url.unwrap_or(self.llm_api_base_url),
            llm_model_name: file.llm_model_name.unwrap_or(self.llm_model_name),
            history_folder: file.history_folder.unwrap_or(self.history_folder),
            source_file: file.source_file.unwrap_or(self.source_file),
            verbose_logging: file.verbose_logging.unwrap_or(self.verbose_logging),
            teacher_name: file.teacher_name.unwrap_or(self.teacher_name),
            school_name: file.school_name.unwrap_or(self.school_name),
            subject: file.subject.unwrap_or(self.subject),
            grade_level: file.grade_level.unwrap_or(self.grade_level),
            difficulty: file.difficulty.unwrap_or(self.difficulty),
            question_count: file.question_count.unwrap_or(self.question_count),
            total_marks: file.total_marks.unwrap_or(self.total_marks),
        }
    }

    /// 环境变量优先级最高
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Ok(v) = std::env::var("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Ok(v) = std::env::var("HISTORY_FOLDER") {
            self.history_folder = v;
        }
        if let Ok(v) = std::env::var("SOURCE_FILE") {
            self.source_file = v;
        }
        if let Ok(v) = std::env::var("VERBOSE_LOGGING") {
            if let Ok(parsed) = v.parse() {
                self.verbose_logging = parsed;
            }
        }
        if let Ok(v) = std::env::var("EXAM_SUBJECT") {
            self.subject = v;
        }
        if let Ok(v) = std::env::var("EXAM_DIFFICULTY") {
            self.difficulty = v;
        }
        if let Ok(v) = std::env::var("EXAM_QUESTION_COUNT") {
            if let Ok(parsed) = v.parse() {
                self.question_count = parsed;
            }
        }
        if let Ok(v) = std::env::var("EXAM_TOTAL_MARKS") {
            if let Ok(parsed) = v.parse() {
                self.total_marks = parsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_sane() {
        let config = Config::default();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.difficulty, "medium");
        assert!(!config.history_folder.is_empty());
    }

    #[test]
    fn test_merge_overrides_only_present_fields() {
        let file: ConfigFile = toml::from_str(
            r#"
            llm_model_name = "gemini-2.5-pro"
            question_count = 15
            "#,
        )
        .unwrap();

        let config = Config::default().merge(file);
        assert_eq!(config.llm_model_name, "gemini-2.5-pro");
        assert_eq!(config.question_count, 15);
        // 未出现的字段保持默认值
        assert_eq!(config.total_marks, 20.0);
    }
}
