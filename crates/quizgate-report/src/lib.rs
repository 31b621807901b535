//! CSV, HTML and certificate output for quizgate.

pub mod certificate;
pub mod csv;
pub mod html;
