//! 历史记录服务 - 业务能力层
//!
//! 把生成的试卷以 JSON 文件的形式持久化到磁盘目录，按 `id` 存取。
//! 提交到历史是显式操作：生成后由调用方决定何时 `save`；
//! 重新生成会产生新的 id（旧记录被"取代"但不会被自动删除），
//! 只有显式 `delete` 才会销毁记录。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::HistoryError;
use crate::models::exam::ExamDocument;

/// 历史记录服务
pub struct HistoryService {
    folder: PathBuf,
}

impl HistoryService {
    /// 创建新的历史记录服务
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// 保存试卷（同 id 覆盖写入）
    pub async fn save(&self, document: &ExamDocument) -> Result<()> {
        if !self.folder.exists() {
            fs::create_dir_all(&self.folder)
                .await
                .with_context(|| format!("无法创建历史记录目录: {}", self.folder.display()))?;
        }

        let path = self.document_path(&document.id);
        let json = serde_json::to_string_pretty(document)?;

        fs::write(&path, json).await.map_err(|e| HistoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!("试卷已保存到历史记录: {}", path.display());
        Ok(())
    }

    /// 按 id 读取试卷
    pub async fn load(&self, id: &str) -> Result<ExamDocument> {
        let path = self.document_path(id);

        if !path.exists() {
            return Err(HistoryError::NotFound { id: id.to_string() }.into());
        }

        let content = fs::read_to_string(&path).await.map_err(|e| HistoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let document: ExamDocument = serde_json::from_str(&content)
            .with_context(|| format!("无法解析历史记录文件: {}", path.display()))?;

        Ok(document)
    }

    /// 列出所有历史试卷（按创建时间倒序，最新的在前）
    ///
    /// 无法解析的文件跳过并记录警告，不影响其余记录。
    pub async fn list(&self) -> Result<Vec<ExamDocument>> {
        if !self.folder.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        let mut entries = fs::read_dir(&self.folder)
            .await
            .with_context(|| format!("无法读取历史记录目录: {}", self.folder.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match self.load_file(&path).await {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!("跳过无法解析的历史记录文件 {}: {}", path.display(), e);
                }
            }
        }

        documents.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(documents)
    }

    /// 按 id 删除试卷
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = self.document_path(id);

        if !path.exists() {
            return Err(HistoryError::NotFound { id: id.to_string() }.into());
        }

        fs::remove_file(&path).await.map_err(|e| HistoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!("已从历史记录中删除试卷: {}", id);
        Ok(())
    }

    /// 读取单个历史记录文件
    async fn load_file(&self, path: &Path) -> Result<ExamDocument> {
        let content = fs::read_to_string(path).await?;
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.folder.join(format!("{}.json", id))
    }
}
