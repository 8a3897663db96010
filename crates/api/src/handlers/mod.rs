pub mod collection;
pub mod contact;
pub mod dashboard;
pub mod media;
pub mod newsletter;
pub mod projects;
