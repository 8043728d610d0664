pub mod admin;
pub mod deposit;
pub mod lifecycle;
pub mod oracle;
pub mod reward;
