//! 自动批改结果模型
//!
//! 批改网关（OMR 识别）返回的响应结构。识别结果是尽力而为的，
//! 调用方应将其视为不可信的外部判断，绝不回流到本地判分引擎。

use serde::{Deserialize, Serialize};

/// 单题批改记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    /// 题号
    #[serde(rename = "questionId")]
    pub question_id: u32,
    /// 识别出的学生答案（涂卡内容）
    #[serde(rename = "studentAnswer")]
    pub student_answer: String,
    /// 正确答案
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    /// 是否答对
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// 批改结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// 识别出的学生姓名（无法识别时为 "غير معروف" / unknown）
    #[serde(rename = "studentName")]
    pub student_name: String,
    /// 学生得分
    pub score: f64,
    /// 试卷总分
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    /// 逐题批改记录
    #[serde(default)]
    pub corrections: Vec<Correction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_grading_result() {
        let json = r#"{
            "studentName": "أحمد",
            "score": 15,
            "totalScore": 20,
            "corrections": [
                {"questionId": 1, "studentAnswer": "A", "correctAnswer": "A", "isCorrect": true},
                {"questionId": 2, "studentAnswer": "B", "correctAnswer": "C", "isCorrect": false}
            ]
        }"#;

        let result: GradingResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.student_name, "أحمد");
        assert_eq!(result.corrections.len(), 2);
        assert!(result.corrections[0].is_correct);
    }

    #[test]
    fn test_deserialize_without_corrections() {
        // 识别彻底失败时 corrections 可能缺失，按空列表处理
        let json = r#"{"studentName": "غير معروف", "score": 0, "totalScore": 20}"#;
        let result: GradingResult = serde_json::from_str(json).unwrap();
        assert!(result.corrections.is_empty());
    }
}
