pub mod guide_parser;
pub mod llm_service;
pub mod mail_service;
pub mod pdf_service;
pub mod scorer;

pub use guide_parser::GuideParser;
pub use llm_service::{build_guide_prompt, GuideModel, LlmService};
pub use mail_service::{GuideNotifier, MailService};
pub use pdf_service::PdfService;
pub use scorer::{score_submission, ScoreOutcome, WrongQuestion};
