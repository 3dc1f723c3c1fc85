pub mod parse;
pub mod run;
