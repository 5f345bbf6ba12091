pub mod contact;
pub mod meeting;
mod render;
