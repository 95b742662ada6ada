//! Ports - interfaces the domain expects infrastructure to provide

mod mailer;
mod repositories;

pub use mailer::{MailResult, VerificationMailer};
pub use repositories::{MessageRepository, RepoResult, UserRepository};
