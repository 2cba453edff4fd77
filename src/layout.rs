//! 排版解析器
//!
//! 负责题目的规范排序和答题卡（涂卡纸）行结构的生成。
//! 本模块全部是纯函数：输入格式良好时不会失败，
//! 连线题缺失配对数据时按零行降级处理而不是报错。

use crate::models::exam::{Question, QuestionBody, QuestionType};

/// 答题卡上的一个可作答行
///
/// 选择题和判断题各占一行；连线题每对配对占一行；问答题不产生行
/// （问答题在答题卡上单独作为主观题区域处理）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    /// 所属题号
    pub question_id: u32,
    /// 行标签（普通题为题号，连线子项为 "题号.序号"）
    pub label: String,
    /// 是否是连线题的子项
    pub sub_item: bool,
    /// 所属题型
    pub question_type: QuestionType,
}

/// 答题卡列数（A4 版面固定两列）
pub const COLUMN_COUNT: usize = 2;

/// 规范排序并重新编号
///
/// 按固定题型优先级排序（选择 → 判断 → 连线 → 问答），同类题保持原有相对顺序，
/// 然后按输出顺序从 1 开始重新分配题号。本操作是幂等的：
/// 对输出再调用一次得到完全相同的序列和题号。
pub fn sort_and_reindex(mut questions: Vec<Question>) -> Vec<Question> {
    // sort_by_key 是稳定排序，同优先级的题目保持输入顺序
    questions.sort_by_key(|q| q.question_type().priority());

    for (index, question) in questions.iter_mut().enumerate() {
        question.id = (index + 1) as u32;
    }

    questions
}

/// 将题目序列展平为答题卡行序列
///
/// 行顺序与题目顺序一致；连线题的子行保持配对顺序。
pub fn flatten_rows(questions: &[Question]) -> Vec<RenderRow> {
    let mut rows = Vec::new();

    for question in questions {
        match &question.body {
            QuestionBody::Mcq { .. } | QuestionBody::TrueFalse => {
                rows.push(RenderRow {
                    question_id: question.id,
                    label: question.id.to_string(),
                    sub_item: false,
                    question_type: question.question_type(),
                });
            }
            QuestionBody::Matching { matching_pairs } => {
                for pair_index in 0..matching_pairs.len() {
                    rows.push(RenderRow {
                        question_id: question.id,
                        label: format!("{}.{}", question.id, pair_index + 1),
                        sub_item: true,
                        question_type: QuestionType::Matching,
                    });
                }
            }
            QuestionBody::Essay => {
                // 问答题不进入涂卡区域
            }
        }
    }

    rows
}

/// 将行序列按两列切分
///
/// 第一列固定取 `ceil(n / 2)` 行，第二列取剩余部分。
/// 纯粹按行数切分，不按题目分组调整；零行（全问答卷）是合法输入。
pub fn split_columns(rows: &[RenderRow]) -> (&[RenderRow], &[RenderRow]) {
    let mid = (rows.len() + COLUMN_COUNT - 1) / COLUMN_COUNT;
    rows.split_at(mid)
}

/// 提取问答题（答题卡的主观题区域）
pub fn essay_questions(questions: &[Question]) -> Vec<&Question> {
    questions
        .iter()
        .filter(|q| q.question_type() == QuestionType::Essay)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::MatchingPair;

    /// 构造测试题目
    fn make_question(id: u32, body: QuestionBody) -> Question {
        Question {
            id,
            text: format!("题目 {}", id),
            points: 5.0,
            correct_answer: "A".to_string(),
            explanation: String::new(),
            bloom_level: None,
            body,
        }
    }

    fn make_matching(id: u32, pair_count: usize) -> Question {
        let pairs = (0..pair_count)
            .map(|i| MatchingPair {
                left: format!("L{}", i),
                right: format!("R{}", i),
            })
            .collect();
        make_question(id, QuestionBody::Matching { matching_pairs: pairs })
    }

    #[test]
    fn test_sort_orders_by_type_priority() {
        let questions = vec![
            make_question(1, QuestionBody::Essay),
            make_question(2, QuestionBody::TrueFalse),
            make_matching(3, 2),
            make_question(4, QuestionBody::Mcq { options: vec![] }),
        ];

        let sorted = sort_and_reindex(questions);

        let types: Vec<QuestionType> = sorted.iter().map(|q| q.question_type()).collect();
        assert_eq!(
            types,
            vec![
                QuestionType::Mcq,
                QuestionType::TrueFalse,
                QuestionType::Matching,
                QuestionType::Essay,
            ]
        );
    }

    #[test]
    fn test_sort_reassigns_dense_ids() {
        let questions = vec![
            make_question(7, QuestionBody::Essay),
            make_question(99, QuestionBody::TrueFalse),
            make_question(0, QuestionBody::Mcq { options: vec![] }),
        ];

        let sorted = sort_and_reindex(questions);
        let ids: Vec<u32> = sorted.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let questions = vec![
            make_question(1, QuestionBody::Mcq { options: vec![] }),
            make_question(2, QuestionBody::Mcq { options: vec![] }),
            make_question(3, QuestionBody::TrueFalse),
        ];
        // 用题干区分同类题的相对顺序
        let mut questions = questions;
        questions[0].text = "第一道选择".to_string();
        questions[1].text = "第二道选择".to_string();

        let once = sort_and_reindex(questions);
        assert_eq!(once[0].text, "第一道选择");
        assert_eq!(once[1].text, "第二道选择");

        let twice = sort_and_reindex(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flatten_skips_essay_questions() {
        let questions = vec![
            make_question(1, QuestionBody::Mcq { options: vec![] }),
            make_question(2, QuestionBody::Essay),
            make_question(3, QuestionBody::TrueFalse),
        ];

        let rows = flatten_rows(&questions);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "1");
        assert_eq!(rows[1].label, "3");
    }

    #[test]
    fn test_flatten_expands_matching_pairs() {
        let questions = vec![
            make_question(1, QuestionBody::TrueFalse),
            make_matching(2, 3),
        ];

        let rows = flatten_rows(&questions);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].label, "2.1");
        assert_eq!(rows[2].label, "2.2");
        assert_eq!(rows[3].label, "2.3");
        assert!(rows[1].sub_item);
        assert!(!rows[0].sub_item);
    }

    #[test]
    fn test_flatten_handles_matching_without_pairs() {
        // 配对数据缺失的连线题降级为零行，不报错
        let questions = vec![make_matching(1, 0)];
        let rows = flatten_rows(&questions);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_split_columns_even_and_odd() {
        let questions: Vec<Question> = (1..=5)
            .map(|id| make_question(id, QuestionBody::TrueFalse))
            .collect();
        let rows = flatten_rows(&questions);

        // 5 行 → 第一列 3 行，第二列 2 行
        let (col1, col2) = split_columns(&rows);
        assert_eq!(col1.len(), 3);
        assert_eq!(col2.len(), 2);

        // 4 行 → 两列各 2 行
        let (col1, col2) = split_columns(&rows[..4]);
        assert_eq!(col1.len(), 2);
        assert_eq!(col2.len(), 2);
    }

    #[test]
    fn test_split_columns_edge_cases() {
        let questions = vec![make_question(1, QuestionBody::TrueFalse)];
        let rows = flatten_rows(&questions);

        // 单行 → 第一列 1 行，第二列空
        let (col1, col2) = split_columns(&rows);
        assert_eq!(col1.len(), 1);
        assert!(col2.is_empty());

        // 零行（全问答卷）→ 两列都为空，不报错
        let (col1, col2) = split_columns(&[]);
        assert!(col1.is_empty());
        assert!(col2.is_empty());
    }

    #[test]
    fn test_essay_questions_extraction() {
        let questions = vec![
            make_question(1, QuestionBody::Mcq { options: vec![] }),
            make_question(2, QuestionBody::Essay),
            make_question(3, QuestionBody::Essay),
        ];

        let essays = essay_questions(&questions);
        assert_eq!(essays.len(), 2);
        assert_eq!(essays[0].id, 2);
    }
}
