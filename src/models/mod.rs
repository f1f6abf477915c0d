pub mod guide;
pub mod loaders;
pub mod quiz;
pub mod submission;

pub use guide::{ParsedGuide, PracticeQuestion, MAX_PRACTICE_QUESTIONS};
pub use loaders::{load_all_toml_files, load_toml_to_quiz};
pub use quiz::{random_access_code, NewQuiz, Question, Quiz, ACCESS_CODE_LEN};
pub use submission::{AnswerMap, Submission};
