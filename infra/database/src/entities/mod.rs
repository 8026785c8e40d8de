//! `sea-orm` entities for the MCQ schema.

pub mod question;
pub mod result;
pub mod test_paper;
pub mod user;

pub use question::Entity as Question;
pub use result::Entity as QuizResult;
pub use test_paper::Entity as TestPaper;
pub use user::{Entity as User, Role};
