pub mod generation_service;
pub mod grading_service;
pub mod history_service;
pub mod translation_service;

pub use generation_service::GenerationService;
pub use grading_service::GradingService;
pub use history_service::HistoryService;
pub use translation_service::TranslationService;
