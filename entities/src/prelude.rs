pub use super::lesson::Entity as Lesson;
pub use super::practice::Entity as Practice;
pub use super::program::Entity as Program;
pub use super::shorts::Entity as Shorts;
