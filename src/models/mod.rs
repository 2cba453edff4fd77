pub mod exam;
pub mod grading;

pub use exam::{
    BloomLevel, Difficulty, ExamDocument, ExamHeader, ExamType, GenerateRequest, Language,
    MatchingPair, Question, QuestionBody, QuestionType,
};
pub use grading::{Correction, GradingResult};
