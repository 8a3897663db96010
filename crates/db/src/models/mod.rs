pub mod activity_log;
pub mod career;
pub mod contact_submission;
pub mod explore_content;
pub mod media;
pub mod newsletter_subscriber;
pub mod partner;
pub mod profile;
pub mod project;
pub mod project_category;
pub mod service;
pub mod team_member;
