//! 判分引擎
//!
//! 针对交互式自测场景，将学生提交的答案与标准答案逐题比对并计算得分。
//! 只有选择题和判断题参与自动判分，判分规则是字符串精确匹配
//! （区分大小写，不做任何归一化，没有部分给分）。
//! 连线题和问答题自动得零分，并在结果中标记为需要人工批改。
//!
//! 本模块是纯函数，与 AI 批改网关（grading_service）完全独立。

use std::collections::HashMap;

use crate::models::exam::ExamDocument;

/// 判分结果
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    /// 自动判分获得的分数
    pub earned_points: f64,
    /// 试卷总分（百分比的分母）
    pub total_points: f64,
    /// 得分百分比（四舍五入取整；总分为零时按 0 处理，不做除法）
    pub percentage: u32,
    /// 参与自动判分的题目数量
    pub graded_count: usize,
    /// 需要人工批改的题号（连线题和问答题）
    pub manual_ids: Vec<u32>,
}

/// 计算学生得分
///
/// `answers` 是题号到提交答案的映射，缺失的条目视为未作答（得零分，不报错）。
pub fn score_exam(document: &ExamDocument, answers: &HashMap<u32, String>) -> ScoreReport {
    let mut earned_points = 0.0;
    let mut graded_count = 0;
    let mut manual_ids = Vec::new();

    for question in &document.questions {
        if !question.is_auto_gradable() {
            manual_ids.push(question.id);
            continue;
        }

        graded_count += 1;

        if let Some(submitted) = answers.get(&question.id) {
            if submitted == &question.correct_answer {
                earned_points += question.points;
            }
        }
    }

    // 总分为零（空卷或无效文档）时百分比按 0 处理，避免除零
    let percentage = if document.total_points > 0.0 {
        (100.0 * earned_points / document.total_points).round() as u32
    } else {
        0
    };

    ScoreReport {
        earned_points,
        total_points: document.total_points,
        percentage,
        graded_count,
        manual_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::{
        Language, MatchingPair, Question, QuestionBody,
    };

    fn make_question(id: u32, points: f64, answer: &str, body: QuestionBody) -> Question {
        Question {
            id,
            text: format!("题目 {}", id),
            points,
            correct_answer: answer.to_string(),
            explanation: String::new(),
            bloom_level: None,
            body,
        }
    }

    fn make_document(questions: Vec<Question>) -> ExamDocument {
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

    fn answers(entries: &[(u32, &str)]) -> HashMap<u32, String> {
        entries
            .iter()
            .map(|(id, ans)| (*id, ans.to_string()))
            .collect()
    }

    #[test]
    fn test_exact_match_earns_full_points() {
        let doc = make_document(vec![make_question(
            1,
            5.0,
            "B",
            QuestionBody::Mcq { options: vec![] },
        )]);

        let report = score_exam(&doc, &answers(&[(1, "B")]));
        assert_eq!(report.earned_points, 5.0);
        assert_eq!(report.percentage, 100);
    }

    #[test]
    fn test_case_mismatch_earns_zero() {
        // 精确匹配是全部的判分契约：大小写不同就是错
        let doc = make_document(vec![make_question(
            1,
            5.0,
            "B",
            QuestionBody::Mcq { options: vec![] },
        )]);

        let report = score_exam(&doc, &answers(&[(1, "b")]));
        assert_eq!(report.earned_points, 0.0);
        assert_eq!(report.percentage, 0);
    }

    #[test]
    fn test_manual_types_excluded_from_auto_total() {
        // 一道 10 分连线题 + 一道 5 分选择题（答对）→ 得 5 分，33%
        let doc = make_document(vec![
            make_question(
                1,
                5.0,
                "A",
                QuestionBody::Mcq { options: vec![] },
            ),
            make_question(
                2,
                10.0,
                "",
                QuestionBody::Matching {
                    matching_pairs: vec![MatchingPair {
                        left: "L".to_string(),
                        right: "R".to_string(),
                    }],
                },
            ),
        ]);

        let report = score_exam(&doc, &answers(&[(1, "A")]));
        assert_eq!(report.earned_points, 5.0);
        assert_eq!(report.total_points, 15.0);
        assert_eq!(report.percentage, 33);
        assert_eq!(report.manual_ids, vec![2]);
        assert_eq!(report.graded_count, 1);
    }

    #[test]
    fn test_unanswered_scores_zero_without_error() {
        let doc = make_document(vec![make_question(
            1,
            10.0,
            "A",
            QuestionBody::Mcq { options: vec![] },
        )]);

        let report = score_exam(&doc, &HashMap::new());
        assert_eq!(report.earned_points, 0.0);
        assert_eq!(report.percentage, 0);
    }

    #[test]
    fn test_mixed_submission_scenario() {
        // 两题各 5 分，第 1 题答对第 2 题答错 → 5 / 10 = 50%
        let doc = make_document(vec![
            make_question(1, 5.0, "A", QuestionBody::Mcq { options: vec![] }),
            make_question(2, 5.0, "صح", QuestionBody::TrueFalse),
        ]);

        let report = score_exam(&doc, &answers(&[(1, "A"), (2, "خطأ")]));
        assert_eq!(report.earned_points, 5.0);
        assert_eq!(report.total_points, 10.0);
        assert_eq!(report.percentage, 50);
    }

    #[test]
    fn test_empty_exam_reports_zero_percentage() {
        // 空卷总分为零：百分比必须是 0 而不是 NaN 或崩溃
        let doc = make_document(vec![]);
        let report = score_exam(&doc, &HashMap::new());
        assert_eq!(report.earned_points, 0.0);
        assert_eq!(report.percentage, 0);
        assert!(report.manual_ids.is_empty());
    }
}
